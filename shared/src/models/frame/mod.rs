use super::resolution::Resolution;

/// A completed render: the full RGBA byte sequence extracted from the
/// shared buffer once every rank has reported, plus its grid dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub resolution: Resolution,
}

impl Frame {
    pub fn new(bytes: Vec<u8>, resolution: Resolution) -> Self {
        Self { bytes, resolution }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
