pub mod album;
pub mod entity;
