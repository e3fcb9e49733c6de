//! Acesso à API remota do TestDino.
//!
//! - [`query`] - parâmetros normalizados e query string
//! - [`endpoints`] - rotas fixas de cada operação
//! - [`client`] - chamadas HTTP autenticadas

pub mod client;
pub mod endpoints;
pub mod query;

pub use client::{ApiClient, RequestOptions};
pub use endpoints::Endpoint;
pub use query::{NormalizedParameters, QueryValue};
