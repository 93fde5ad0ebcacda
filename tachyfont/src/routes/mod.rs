pub mod base;
pub mod ping;
