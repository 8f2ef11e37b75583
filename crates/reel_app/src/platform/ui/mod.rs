pub mod constants;
pub mod render;
