//! Infrastructure layer - persistence and audit file

pub mod audit;
pub mod storage;
