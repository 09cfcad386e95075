pub mod blob_store;
pub mod data_url;
pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod photo_store;
pub mod record_store;
