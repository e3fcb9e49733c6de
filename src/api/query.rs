//! Parâmetros normalizados e codificação da query string.

use std::fmt;

use url::form_urlencoded;

use crate::types::arguments::format_number;

/// Valor escalar de um parâmetro de query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => f.write_str(s),
            QueryValue::Number(n) => f.write_str(&format_number(*n)),
            QueryValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        QueryValue::Number(n)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Number(n as f64)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

/// Mapa chave → valor pronto para a query string.
///
/// Só contém chaves com valor; campos ausentes nunca são inseridos.
/// A ordem de inserção é preservada para que a codificação seja determinística.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedParameters {
    pairs: Vec<(String, QueryValue)>,
}

impl NormalizedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere ou substitui `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Insere `key` apenas se houver valor.
    pub fn insert_opt<V: Into<QueryValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Variante encadeável de [`insert_opt`](Self::insert_opt).
    #[must_use]
    pub fn with_opt<V: Into<QueryValue>>(mut self, key: &str, value: Option<V>) -> Self {
        self.insert_opt(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Codifica como `?k1=v1&k2=v2`, ou string vazia se não houver pares.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, &value.to_string());
        }
        format!("?{}", serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(query: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn test_empty_yields_empty_string() {
        assert_eq!(NormalizedParameters::new().to_query_string(), "");
        let none: Option<i64> = None;
        assert_eq!(
            NormalizedParameters::new().with_opt("limit", none).to_query_string(),
            ""
        );
    }

    #[test]
    fn test_absent_values_are_dropped() {
        let query = NormalizedParameters::new()
            .with_opt("by_branch", Some("main"))
            .with_opt("by_author", None::<String>)
            .with_opt("limit", Some(20.0))
            .to_query_string();

        assert_eq!(query, "?by_branch=main&limit=20");
    }

    #[test]
    fn test_falsy_values_are_kept() {
        let mut params = NormalizedParameters::new();
        params.insert("get_all", false);
        params.insert("page", 0.0);
        params.insert("by_tag", "");

        assert_eq!(params.to_query_string(), "?get_all=false&page=0&by_tag=");
    }

    #[test]
    fn test_values_round_trip_through_decoding() {
        let mut params = NormalizedParameters::new();
        params.insert("by_title", "Verify user can logout & login");
        params.insert("by_total_runtime", "<60");
        params.insert("by_time_interval", "2024-01-01,2024-01-31");
        params.insert("counter", 43.0);
        params.insert("by_artifacts", true);

        let decoded = decode(&params.to_query_string());
        let expected: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert_eq!(decoded, expected);
    }

    #[test]
    fn test_space_encoded_as_plus() {
        let mut params = NormalizedParameters::new();
        params.insert("by_title", "login works");
        assert_eq!(params.to_query_string(), "?by_title=login+works");
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut params = NormalizedParameters::new();
        params.insert("by_environment", "staging");
        params.insert("by_environment", "production");

        assert_eq!(params.len(), 1);
        assert_eq!(params.to_query_string(), "?by_environment=production");
    }

    #[test]
    fn test_number_display_matches_js() {
        assert_eq!(QueryValue::Number(20.0).to_string(), "20");
        assert_eq!(QueryValue::Number(1.5).to_string(), "1.5");
        assert_eq!(QueryValue::Number(f64::NAN).to_string(), "NaN");
    }
}
