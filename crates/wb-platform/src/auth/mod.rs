pub mod auth_api;
pub mod auth_service;
pub mod code_validator;
pub mod session_token;
