//! 持久化实现

mod banking_repository;
pub mod error_mapper;

pub use banking_repository::*;
