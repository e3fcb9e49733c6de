//! Cliente HTTP da API TestDino.

use reqwest::{header, Client, Method};
use serde_json::Value;

use crate::auth::Token;
use crate::types::config::ApiConfig;
use crate::{TestDinoError, TestDinoResult};

use super::endpoints::Endpoint;
use super::query::NormalizedParameters;

/// Opções de uma requisição.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Cliente da API MCP do TestDino.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Cria um cliente a partir da configuração.
    pub fn new(config: &ApiConfig) -> TestDinoResult<Self> {
        url::Url::parse(&config.base_url)?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL completa de uma operação.
    pub fn endpoint_url(&self, endpoint: Endpoint, query: &NormalizedParameters) -> String {
        endpoint.url(&self.base_url, query)
    }

    /// `GET` em uma operação, retornando o JSON da resposta.
    pub async fn get_json(
        &self,
        endpoint: Endpoint,
        query: &NormalizedParameters,
        token: &Token,
    ) -> TestDinoResult<Value> {
        let url = self.endpoint_url(endpoint, query);
        self.request_json(&url, token, RequestOptions::default())
            .await
    }

    /// Executa a requisição e interpreta a resposta como JSON.
    ///
    /// Status fora de 2xx vira [`TestDinoError::Remote`] com o corpo em texto.
    /// JSON malformado em uma resposta 2xx é propagado como erro.
    pub async fn request_json(
        &self,
        url: &str,
        token: &Token,
        options: RequestOptions,
    ) -> TestDinoResult<Value> {
        tracing::debug!(
            method = %options.method,
            url = %url,
            token = %token.fingerprint(),
            "API request"
        );

        let mut request = self
            .http
            .request(options.method, url)
            .header(header::AUTHORIZATION, token.bearer());

        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &options.body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<failed to read body: {}>", e),
            };
            tracing::warn!(status = status.as_u16(), url = %url, "API request failed");
            return Err(TestDinoError::Remote {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes)?;
        Ok(value)
    }
}
