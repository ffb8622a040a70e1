pub mod clients;
pub mod file_storage;
pub mod http;
pub mod memory_storage;
pub mod models;
