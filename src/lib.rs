//! # TestDino MCP
//!
//! Servidor MCP (Model Context Protocol) para o TestDino.
//!
//! Expõe ferramentas para consultar execuções e casos de teste na API do
//! TestDino e para enviar relatórios locais do Playwright pelo uploader `tdpw`.
//!
//! ## Módulos
//!
//! - [`api`] - Cliente HTTP, rotas e query strings da API
//! - [`auth`] - Token de acesso
//! - [`cli`] - Interface de linha de comando
//! - [`mcp`] - Servidor MCP e ferramentas
//! - [`types`] - Configuração, erros e requisições tipadas
//! - [`upload`] - Upload de relatórios locais

pub mod api;
pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod mcp;
pub mod types;
pub mod upload;

pub use types::config::Config;
pub use types::errors::{TestDinoError, TestDinoResult, ValidationError};
