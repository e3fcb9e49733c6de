//! Tipos compartilhados.

pub mod arguments;
pub mod config;
pub mod errors;
pub mod requests;
