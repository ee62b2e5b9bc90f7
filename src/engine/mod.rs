pub mod batch;
pub mod cache;
pub mod errors;
pub mod handler;
pub mod task;

pub use errors::*;
