pub mod geometry;
pub mod image_rs_processor;
pub mod orientation;
pub mod processor;
pub mod transform;
