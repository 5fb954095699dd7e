pub mod collector;
pub mod recorder;
