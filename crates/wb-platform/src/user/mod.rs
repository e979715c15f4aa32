//! User/Agent aggregate: records, persistence, external shape, admin API

pub mod api;
pub mod entity;
pub mod repository;
pub mod sqlite;
pub mod transform;
