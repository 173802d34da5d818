//! API layer - REST routes and native client

pub mod native;
pub mod rest;
