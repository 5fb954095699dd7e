pub mod aes;
pub mod blob_file;
pub mod export;
pub mod index;
pub mod store;
