//! Rotas da API MCP do TestDino.

use std::fmt;

use super::query::NormalizedParameters;

/// Operações remotas disponíveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTestRuns,
    GetRunDetails,
    ListTestCases,
    GetTestCaseDetails,
    Hello,
}

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::ListTestRuns,
        Endpoint::GetRunDetails,
        Endpoint::ListTestCases,
        Endpoint::GetTestCaseDetails,
        Endpoint::Hello,
    ];

    /// Caminho fixo da operação.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ListTestRuns => "/api/mcp/list-testruns",
            Endpoint::GetRunDetails => "/api/mcp/get-run-details",
            Endpoint::ListTestCases => "/api/mcp/list-testcase",
            Endpoint::GetTestCaseDetails => "/api/mcp/get-testcase-details",
            Endpoint::Hello => "/api/mcp/hello",
        }
    }

    /// URL completa: `base + path + query`, sem barra duplicada.
    pub fn url(&self, base_url: &str, query: &NormalizedParameters) -> String {
        format!(
            "{}{}{}",
            base_url.trim_end_matches('/'),
            self.path(),
            query.to_query_string()
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
