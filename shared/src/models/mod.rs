pub mod buffer;
pub mod frame;
pub mod point;
pub mod render_config;
pub mod resolution;
pub mod tasks;
