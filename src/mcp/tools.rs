//! Handlers das ferramentas MCP do TestDino.
//!
//! Este módulo implementa as 6 ferramentas expostas pelo servidor MCP:
//!
//! 1. `health` - Saudação e verificação da chave de API
//! 2. `list_testruns` - Lista execuções com filtros
//! 3. `get_run_details` - Detalhes de uma ou mais execuções
//! 4. `list_testcase` - Lista casos de teste
//! 5. `get_testcase_details` - Detalhes de um caso de teste
//! 6. `upload_latest_local_test_runs` - Envia o relatório local do Playwright
//!
//! Fluxo das ferramentas remotas: argumentos → requisição tipada (validação)
//! → token → `GET` na API → JSON indentado. Erros viram `isError: true`.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{ApiClient, Endpoint, NormalizedParameters};
use crate::auth::Token;
use crate::types::arguments::{coerce_string, is_truthy, ToolArguments};
use crate::types::config::Config;
use crate::types::errors::{TestDinoError, ValidationError};
use crate::types::requests::{
    GetRunDetailsRequest, GetTestCaseDetailsRequest, HealthRequest, ListTestCasesRequest,
    ListTestRunsRequest, UploadRequest,
};
use crate::upload::{ProcessRunner, Uploader};
use crate::TestDinoResult;

use super::protocol::{ToolDescription, ToolResult};

pub const HEALTH: &str = "health";
pub const LIST_TESTRUNS: &str = "list_testruns";
pub const GET_RUN_DETAILS: &str = "get_run_details";
pub const LIST_TESTCASE: &str = "list_testcase";
pub const GET_TESTCASE_DETAILS: &str = "get_testcase_details";
pub const UPLOAD_LATEST_LOCAL_TEST_RUNS: &str = "upload_latest_local_test_runs";

// ═══════════════════════════════════════════════════════════════════════════
// Handler de ferramentas
// ═══════════════════════════════════════════════════════════════════════════

/// Handler das ferramentas MCP.
pub struct ToolHandler {
    config: Config,
    api: ApiClient,
    uploader: Uploader,
    working_dir: Option<PathBuf>,
}

impl ToolHandler {
    /// Cria um novo handler a partir da configuração carregada.
    pub fn new(config: Config) -> TestDinoResult<Self> {
        let api = ApiClient::new(&config.api)?;
        let uploader = Uploader::new(config.uploader.clone());

        Ok(Self {
            config,
            api,
            uploader,
            working_dir: None,
        })
    }

    /// Troca o executor do uploader.
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.uploader = Uploader::with_runner(self.config.uploader.clone(), runner);
        self
    }

    /// Diretório usado no lugar do diretório atual do processo.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lista todas as ferramentas disponíveis.
    pub fn list_tools() -> Vec<ToolDescription> {
        vec![
            ToolDescription::new(
                HEALTH,
                "Check if your TestDino connection is working. Verifies your API key and shows your project name. Use this first to make sure everything is set up correctly.",
                json!({
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Your name (used in the greeting message)."
                        }
                    },
                    "required": ["name"]
                }),
            ),
            ToolDescription::new(
                LIST_TESTRUNS,
                "Browse and filter your test runs. Filter by git branch, time interval ('1d', '3d', 'weekly', 'monthly' or a date range), commit author, commit hash or environment. Supports pagination with page/limit, or get_all=true to fetch up to 1000 results. Returns run summaries with pass/fail/skip/flaky counts, duration, status, branch, author and PR information.",
                json!({
                    "type": "object",
                    "properties": {
                        "by_branch": {
                            "type": "string",
                            "description": "Filter by git branch name (e.g., 'main', 'develop', 'feature/login')."
                        },
                        "by_time_interval": {
                            "type": "string",
                            "description": "Filter by time: '1d', '3d', 'weekly', 'monthly', or '2024-01-01,2024-01-31' (date range)."
                        },
                        "by_author": {
                            "type": "string",
                            "description": "Filter by commit author name (case-insensitive, partial match)."
                        },
                        "by_commit": {
                            "type": "string",
                            "description": "Filter by git commit hash (full or partial)."
                        },
                        "by_environment": {
                            "type": "string",
                            "description": "Filter by environment. Example: 'production', 'staging', 'development'."
                        },
                        "limit": {
                            "type": "number",
                            "description": "Number of results per page (default: 20, max: 1000).",
                            "default": 20
                        },
                        "page": {
                            "type": "number",
                            "description": "Page number (default: 1).",
                            "default": 1
                        },
                        "get_all": {
                            "type": "boolean",
                            "description": "Get all results up to 1000 (default: false).",
                            "default": false
                        }
                    },
                    "required": []
                }),
            ),
            ToolDescription::new(
                GET_RUN_DETAILS,
                "Get detailed information about test runs: statistics, suites and cases, git metadata and error details. Supports batch lookups with comma-separated IDs (max 20).",
                json!({
                    "type": "object",
                    "properties": {
                        "testrun_id": {
                            "type": "string",
                            "description": "Test run ID(s). Single ID or comma-separated for batch (max 20). Example: 'test_run_123' or 'run1,run2,run3'."
                        },
                        "counter": {
                            "type": "number",
                            "description": "Filter by test run counter (sequential number)."
                        }
                    }
                }),
            ),
            ToolDescription::new(
                LIST_TESTCASE,
                "List test cases with filtering by test run (ID or counter), status, spec file, error category, browser, tags, runtime, artifacts, error message or attempt number. Test run filters (by_branch, by_commit, by_author, by_environment, by_time_interval, by_pages, page, limit, get_all) first select matching test runs, then return test cases from those runs.",
                json!({
                    "type": "object",
                    "properties": {
                        "by_testrun_id": {
                            "type": "string",
                            "description": "Test run ID(s). Single ID or comma-separated (max 20). Not required when using test run filters."
                        },
                        "counter": {
                            "type": "number",
                            "description": "Test run counter number. Alternative to by_testrun_id. Example: 43."
                        },
                        "by_status": {
                            "type": "string",
                            "description": "Filter by status. Requires a test run ID or counter.",
                            "enum": ["passed", "failed", "skipped", "flaky"]
                        },
                        "by_spec_file_name": {
                            "type": "string",
                            "description": "Filter by spec file name. Example: 'login.spec.js'. Requires a test run ID or counter."
                        },
                        "by_error_category": {
                            "type": "string",
                            "description": "Filter by error category. Example: 'timeout_issues', 'element_not_found', 'assertion_failures', 'network_issues'. Requires a test run ID or counter."
                        },
                        "by_browser_name": {
                            "type": "string",
                            "description": "Filter by browser name. Example: 'chromium', 'firefox', 'webkit'. Requires a test run ID or counter."
                        },
                        "by_tag": {
                            "type": "string",
                            "description": "Filter by tag(s), comma-separated. Example: 'smoke,regression'. Requires a test run ID or counter."
                        },
                        "by_total_runtime": {
                            "type": "string",
                            "description": "Filter by total runtime in seconds. Example: '<60', '>100'. Requires a test run ID or counter."
                        },
                        "by_artifacts": {
                            "type": "boolean",
                            "description": "Only test cases with artifacts (screenshots, videos, traces). Requires a test run ID or counter.",
                            "default": false
                        },
                        "by_error_message": {
                            "type": "string",
                            "description": "Filter by error message (partial match, case-insensitive). Requires a test run ID or counter."
                        },
                        "by_attempt_number": {
                            "type": "number",
                            "description": "Filter by attempt number. Requires a test run ID or counter."
                        },
                        "by_pages": {
                            "type": "number",
                            "description": "Return test cases from all test runs on this page."
                        },
                        "by_branch": {
                            "type": "string",
                            "description": "Test runs on this git branch. Example: 'main'."
                        },
                        "by_time_interval": {
                            "type": "string",
                            "description": "Test runs in this period: '1d', '3d', 'weekly', 'monthly', or '2024-01-01,2024-01-31'."
                        },
                        "limit": {
                            "type": "number",
                            "description": "Number of results per page (default: 1000, max: 1000).",
                            "default": 1000
                        },
                        "by_environment": {
                            "type": "string",
                            "description": "Test runs in this environment. Example: 'production', 'staging', 'development'."
                        },
                        "by_author": {
                            "type": "string",
                            "description": "Test runs by this commit author (case-insensitive, partial match)."
                        },
                        "by_commit": {
                            "type": "string",
                            "description": "Test runs with this commit hash (full or partial)."
                        },
                        "page": {
                            "type": "number",
                            "description": "Page number for pagination (default: 1).",
                            "default": 1
                        },
                        "get_all": {
                            "type": "boolean",
                            "description": "Get all results up to 1000 (default: false).",
                            "default": false
                        }
                    },
                    "required": []
                }),
            ),
            ToolDescription::new(
                GET_TESTCASE_DETAILS,
                "Get detailed information about a specific test case: error messages, stack traces, steps, console logs and artifacts. Identify it by testcase_id alone, or by testcase_name together with testrun_id or counter (names can repeat across runs).",
                json!({
                    "type": "object",
                    "properties": {
                        "testcase_id": {
                            "type": "string",
                            "description": "Test case ID. Can be used alone. Example: 'test_case_123'."
                        },
                        "testcase_name": {
                            "type": "string",
                            "description": "Test case name/title. Must be combined with either testrun_id or counter."
                        },
                        "testrun_id": {
                            "type": "string",
                            "description": "Test run ID. Required with testcase_name unless counter is given."
                        },
                        "counter": {
                            "type": "number",
                            "description": "Test run counter number. Required with testcase_name unless testrun_id is given. Example: 43."
                        }
                    },
                    "required": []
                }),
            ),
            ToolDescription::new(
                UPLOAD_LATEST_LOCAL_TEST_RUNS,
                "Upload your local Playwright test results to TestDino. Git info (branch, commit, author) is detected automatically. Use absolute paths for best results.",
                json!({
                    "type": "object",
                    "properties": {
                        "reportDir": {
                            "type": "string",
                            "description": "Path to the Playwright report directory. Absolute paths are recommended. Default: './playwright-report'.",
                            "default": "./playwright-report"
                        },
                        "uploadHtml": {
                            "type": "boolean",
                            "description": "Upload HTML reports with all data (JSON, images, videos). Recommended. Default: true.",
                            "default": true
                        },
                        "uploadImages": {
                            "type": "boolean",
                            "description": "Upload screenshot images. Default: false (included in uploadHtml).",
                            "default": false
                        },
                        "uploadVideos": {
                            "type": "boolean",
                            "description": "Upload test execution videos. Default: false (included in uploadHtml).",
                            "default": false
                        },
                        "uploadTraces": {
                            "type": "boolean",
                            "description": "Upload Playwright trace files. Default: false.",
                            "default": false
                        },
                        "uploadFiles": {
                            "type": "boolean",
                            "description": "Upload file attachments (.md, .pdf, .txt, .log). Default: false.",
                            "default": false
                        },
                        "uploadFullJson": {
                            "type": "boolean",
                            "description": "Upload the complete JSON bundle with all artifacts (alternative to uploadHtml). Default: false.",
                            "default": false
                        },
                        "jsonReport": {
                            "type": "string",
                            "description": "Specific JSON report file path (overrides reportDir)."
                        },
                        "htmlReport": {
                            "type": "string",
                            "description": "Specific HTML report path (overrides reportDir)."
                        },
                        "traceDir": {
                            "type": "string",
                            "description": "Specific trace directory path (overrides reportDir)."
                        },
                        "verbose": {
                            "type": "boolean",
                            "description": "Show detailed uploader logging. Default: false.",
                            "default": false
                        }
                    },
                    "required": []
                }),
            ),
        ]
    }

    /// Processa uma chamada de ferramenta.
    pub async fn handle_tool_call(&self, name: &str, arguments: Value) -> ToolResult {
        let call_id = Uuid::new_v4();
        tracing::info!(tool = name, call_id = %call_id, "Processing tool call");

        let args = match ToolArguments::from_value(arguments) {
            Ok(args) => args,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let result = match name {
            HEALTH => self.handle_health(&args).await,
            LIST_TESTRUNS => self.handle_list_testruns(&args).await,
            GET_RUN_DETAILS => self.handle_get_run_details(&args).await,
            LIST_TESTCASE => self.handle_list_testcase(&args).await,
            GET_TESTCASE_DETAILS => self.handle_get_testcase_details(&args).await,
            UPLOAD_LATEST_LOCAL_TEST_RUNS => self.handle_upload(&args).await,
            _ => ToolResult::error(format!("Unknown tool: {}", name)),
        };

        if result.is_error {
            tracing::warn!(tool = name, call_id = %call_id, error = result.text(), "Tool call failed");
        } else {
            tracing::info!(tool = name, call_id = %call_id, "Tool call completed");
        }

        result
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Handlers individuais
    // ═══════════════════════════════════════════════════════════════════════

    async fn handle_health(&self, args: &ToolArguments) -> ToolResult {
        let request = match HealthRequest::from_arguments(args) {
            Ok(r) => r,
            Err(e) => return validation_error(e),
        };

        // Problemas de credencial ou da API aparecem na saudação, não como erro.
        let summary = match self.token(args) {
            None => format!(
                "\n\n⚠️ No {} available to verify",
                self.config.api.api_key_env
            ),
            Some(token) => match self
                .api
                .get_json(Endpoint::Hello, &NormalizedParameters::new(), &token)
                .await
            {
                Ok(response) => credential_summary(&response),
                Err(e) => format!("\n\n❌ Error validating API key: {}", e),
            },
        };

        ToolResult::success(format!(
            "Hello, {}! 👋\n\nThis is TestDino's MCP server responding.{}",
            request.name, summary
        ))
    }

    async fn handle_list_testruns(&self, args: &ToolArguments) -> ToolResult {
        match ListTestRunsRequest::from_arguments(args) {
            Ok(request) => {
                self.fetch(
                    Endpoint::ListTestRuns,
                    request.to_query(),
                    args,
                    "Failed to list test runs",
                )
                .await
            }
            Err(e) => validation_error(e),
        }
    }

    async fn handle_get_run_details(&self, args: &ToolArguments) -> ToolResult {
        match GetRunDetailsRequest::from_arguments(args) {
            Ok(request) => {
                self.fetch(
                    Endpoint::GetRunDetails,
                    request.to_query(),
                    args,
                    "Failed to retrieve test run details",
                )
                .await
            }
            Err(e) => validation_error(e),
        }
    }

    async fn handle_list_testcase(&self, args: &ToolArguments) -> ToolResult {
        match ListTestCasesRequest::from_arguments(args) {
            Ok(request) => {
                self.fetch(
                    Endpoint::ListTestCases,
                    request.to_query(),
                    args,
                    "Failed to list test cases",
                )
                .await
            }
            Err(e) => validation_error(e),
        }
    }

    async fn handle_get_testcase_details(&self, args: &ToolArguments) -> ToolResult {
        match GetTestCaseDetailsRequest::from_arguments(args) {
            Ok(request) => {
                tracing::debug!(
                    testcase_id = ?request.testcase_id,
                    testcase_name = ?request.testcase_name,
                    "Looking up test case"
                );
                self.fetch(
                    Endpoint::GetTestCaseDetails,
                    request.to_query(),
                    args,
                    "Failed to retrieve test case details",
                )
                .await
            }
            Err(e) => validation_error(e),
        }
    }

    async fn handle_upload(&self, args: &ToolArguments) -> ToolResult {
        let request =
            match UploadRequest::from_arguments(args, &self.config.uploader.default_report_dir) {
                Ok(r) => r,
                Err(e) => return validation_error(e),
            };

        let Some(token) = self.token(args) else {
            return self.missing_credential();
        };

        let cwd = match self.working_dir() {
            Ok(dir) => dir,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        match self.uploader.upload(&request, &token, &cwd).await {
            Ok(outcome) => ToolResult::success(outcome.render()),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Auxiliares
    // ═══════════════════════════════════════════════════════════════════════

    /// `GET` autenticado; erros da API recebem o prefixo da operação.
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: NormalizedParameters,
        args: &ToolArguments,
        failure_prefix: &str,
    ) -> ToolResult {
        let Some(token) = self.token(args) else {
            return self.missing_credential();
        };

        tracing::debug!(endpoint = %endpoint, params = query.len(), "Calling TestDino API");

        match self.api.get_json(endpoint, &query, &token).await {
            Ok(response) => ToolResult::success_json(&response),
            Err(e) => ToolResult::error(format!("{}: {}", failure_prefix, e)),
        }
    }

    fn token(&self, args: &ToolArguments) -> Option<Token> {
        Token::resolve(self.config.api.api_key.as_deref(), args)
    }

    fn missing_credential(&self) -> ToolResult {
        ToolResult::error(
            TestDinoError::missing_credential(&self.config.api.api_key_env).to_string(),
        )
    }

    fn working_dir(&self) -> TestDinoResult<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

fn validation_error(error: ValidationError) -> ToolResult {
    ToolResult::error(TestDinoError::from(error).to_string())
}

/// Resumo do `/hello`. A resposta pode vir embrulhada em `data`.
fn credential_summary(response: &Value) -> String {
    let data = response
        .get("data")
        .filter(|d| is_truthy(d))
        .unwrap_or(response);

    let authenticated = data.get("authenticated").map(is_truthy).unwrap_or(false);
    if !authenticated {
        return String::new();
    }

    let field = |key: &str| {
        data.get(key)
            .filter(|v| is_truthy(v))
            .map(coerce_string)
            .unwrap_or_else(|| "N/A".to_string())
    };

    format!(
        "\n\n✅ API key validated successfully!\nProject Name: {}\nProject ID: {}",
        field("projectName"),
        field("projectId")
    )
}
