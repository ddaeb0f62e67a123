pub mod collections;
pub mod revision;
