pub mod export;
pub mod handles;
pub mod manager;
pub mod photo;
pub mod session;
