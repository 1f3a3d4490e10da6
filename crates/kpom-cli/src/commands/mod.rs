pub mod config;
pub mod decode;
pub mod merge;
pub mod render;
