//! 领域层

mod bank;
mod repository;
mod status;

pub use bank::*;
pub use repository::*;
pub use status::*;
