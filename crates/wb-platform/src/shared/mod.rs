//! Shared platform infrastructure

pub mod api_common;
pub mod error;
