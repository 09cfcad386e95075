pub mod local_storage;
pub mod sequence;
pub mod storage;
