pub mod dir;
pub mod fs_blob_store;
pub mod fs_record_store;
