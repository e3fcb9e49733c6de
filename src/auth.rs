//! Credencial de acesso à API.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::types::arguments::ToolArguments;

/// Token bearer opaco.
///
/// `Debug` e `Display` nunca exibem o valor; use [`fingerprint`](Token::fingerprint) em logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Cria um token, rejeitando strings vazias.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Resolve o token: chave configurada primeiro, argumento `token` como fallback.
    pub fn resolve(configured: Option<&str>, arguments: &ToolArguments) -> Option<Self> {
        configured
            .and_then(Self::new)
            .or_else(|| arguments.string_if_truthy("token").and_then(Self::new))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Valor do cabeçalho `Authorization`.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Primeiros 8 caracteres hex do SHA-256 do token.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..8].to_string()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self.fingerprint())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.fingerprint())
    }
}
