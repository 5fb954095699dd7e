pub mod config;
pub mod constraints;
pub mod device;
pub mod error;
pub mod media;
pub mod recording;
pub mod state;
