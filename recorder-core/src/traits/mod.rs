pub mod delegate;
pub mod encryptor;
pub mod media_devices;
pub mod media_track;
pub mod recorder_backend;
