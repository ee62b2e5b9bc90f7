pub mod config;
pub mod hash;
