pub mod stream;
pub mod studio;
