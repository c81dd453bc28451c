use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub nx: u16,
    pub ny: u16,
}

impl Resolution {
    pub fn new(nx: u16, ny: u16) -> Self {
        Self { nx, ny }
    }

    pub fn pixel_count(&self) -> usize {
        self.nx as usize * self.ny as usize
    }
}
