pub mod env;
pub mod errors;
pub mod graphics;
pub mod kernel;
pub mod logger;
pub mod models;
