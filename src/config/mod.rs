pub mod album;
pub mod app;
pub mod env;
pub mod render;
pub mod storage;
