//! Requisições tipadas de cada ferramenta.
//!
//! Cada struct é construída uma única vez a partir de [`ToolArguments`] por
//! `from_arguments`, que aplica as regras de combinação de campos antes de
//! qualquer acesso à rede ou ao disco. Quando a regra falha, o resultado é
//! uma variante de [`ValidationError`].
//!
//! Convenção por campo (mantida igual à API pública da ferramenta):
//!
//! | teste        | conversão  | campos                                      |
//! |--------------|------------|---------------------------------------------|
//! | truthiness   | `String`   | filtros de texto, ids, nomes                 |
//! | presença     | `Number`   | `counter`, `limit`, `page`, `by_pages`, ... |
//! | presença     | `String`   | `get_all`, `by_artifacts`                   |

use crate::api::query::NormalizedParameters;
use crate::types::arguments::ToolArguments;
use crate::types::errors::ValidationError;

/// Parâmetros de `health`.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRequest {
    /// Nome usado na saudação.
    pub name: String,
}

impl HealthRequest {
    pub fn from_arguments(args: &ToolArguments) -> Result<Self, ValidationError> {
        if !args.is_present("name") {
            return Err(ValidationError::MissingField("name"));
        }

        let name = args
            .string_if_truthy("name")
            .unwrap_or_else(|| "World".to_string());

        Ok(Self { name })
    }
}

/// Parâmetros de `list_testruns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListTestRunsRequest {
    pub by_branch: Option<String>,
    pub by_time_interval: Option<String>,
    pub by_author: Option<String>,
    pub by_commit: Option<String>,
    pub by_environment: Option<String>,
    pub limit: Option<f64>,
    pub page: Option<f64>,
    pub get_all: Option<String>,
}

impl ListTestRunsRequest {
    pub fn from_arguments(args: &ToolArguments) -> Result<Self, ValidationError> {
        Ok(Self {
            by_branch: args.string_if_truthy("by_branch"),
            by_time_interval: args.string_if_truthy("by_time_interval"),
            by_author: args.string_if_truthy("by_author"),
            by_commit: args.string_if_truthy("by_commit"),
            by_environment: args.string_if_truthy("by_environment"),
            limit: args.number_if_present("limit"),
            page: args.number_if_present("page"),
            get_all: args.string_if_present("get_all"),
        })
    }

    pub fn to_query(&self) -> NormalizedParameters {
        NormalizedParameters::new()
            .with_opt("by_branch", self.by_branch.clone())
            .with_opt("by_time_interval", self.by_time_interval.clone())
            .with_opt("by_author", self.by_author.clone())
            .with_opt("by_commit", self.by_commit.clone())
            .with_opt("by_environment", self.by_environment.clone())
            .with_opt("limit", self.limit)
            .with_opt("page", self.page)
            .with_opt("get_all", self.get_all.clone())
    }
}

/// Parâmetros de `get_run_details`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetRunDetailsRequest {
    /// Um id ou vários separados por vírgula.
    pub testrun_id: Option<String>,
    pub counter: Option<f64>,
}

impl GetRunDetailsRequest {
    pub fn from_arguments(args: &ToolArguments) -> Result<Self, ValidationError> {
        Ok(Self {
            testrun_id: args.string_if_truthy("testrun_id"),
            counter: args.number_if_present("counter"),
        })
    }

    pub fn to_query(&self) -> NormalizedParameters {
        NormalizedParameters::new()
            .with_opt("testrun_id", self.testrun_id.clone())
            .with_opt("counter", self.counter)
    }
}

/// Parâmetros de `list_testcase`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListTestCasesRequest {
    pub by_testrun_id: Option<String>,
    pub counter: Option<f64>,
    pub by_status: Option<String>,
    pub by_spec_file_name: Option<String>,
    pub by_error_category: Option<String>,
    pub by_browser_name: Option<String>,
    pub by_tag: Option<String>,
    pub by_total_runtime: Option<String>,
    pub by_artifacts: Option<String>,
    pub by_error_message: Option<String>,
    pub by_attempt_number: Option<f64>,
    pub by_pages: Option<f64>,
    pub by_branch: Option<String>,
    pub by_time_interval: Option<String>,
    pub limit: Option<f64>,
    pub by_environment: Option<String>,
    pub by_author: Option<String>,
    pub by_commit: Option<String>,
    pub page: Option<f64>,
    pub get_all: Option<String>,
}

impl ListTestCasesRequest {
    pub fn from_arguments(args: &ToolArguments) -> Result<Self, ValidationError> {
        let has_run_id = args.is_truthy("by_testrun_id");
        let has_counter = args.is_present("counter");
        let has_run_filter = ["by_branch", "by_commit", "by_author", "by_environment", "by_time_interval"]
            .iter()
            .any(|key| args.is_truthy(key))
            || ["by_pages", "page", "limit", "get_all"]
                .iter()
                .any(|key| args.is_present(key));

        if !has_run_id && !has_counter && !has_run_filter {
            return Err(ValidationError::MissingTestRunScope);
        }

        Ok(Self {
            by_testrun_id: args.string_if_truthy("by_testrun_id"),
            counter: args.number_if_present("counter"),
            by_status: args.string_if_truthy("by_status"),
            by_spec_file_name: args.string_if_truthy("by_spec_file_name"),
            by_error_category: args.string_if_truthy("by_error_category"),
            by_browser_name: args.string_if_truthy("by_browser_name"),
            by_tag: args.string_if_truthy("by_tag"),
            by_total_runtime: args.string_if_truthy("by_total_runtime"),
            by_artifacts: args.string_if_present("by_artifacts"),
            by_error_message: args.string_if_truthy("by_error_message"),
            by_attempt_number: args.number_if_present("by_attempt_number"),
            by_pages: args.number_if_present("by_pages"),
            by_branch: args.string_if_truthy("by_branch"),
            by_time_interval: args.string_if_truthy("by_time_interval"),
            limit: args.number_if_present("limit"),
            by_environment: args.string_if_truthy("by_environment"),
            by_author: args.string_if_truthy("by_author"),
            by_commit: args.string_if_truthy("by_commit"),
            page: args.number_if_present("page"),
            get_all: args.string_if_present("get_all"),
        })
    }

    pub fn to_query(&self) -> NormalizedParameters {
        NormalizedParameters::new()
            .with_opt("by_testrun_id", self.by_testrun_id.clone())
            .with_opt("counter", self.counter)
            .with_opt("by_status", self.by_status.clone())
            .with_opt("by_spec_file_name", self.by_spec_file_name.clone())
            .with_opt("by_error_category", self.by_error_category.clone())
            .with_opt("by_browser_name", self.by_browser_name.clone())
            .with_opt("by_tag", self.by_tag.clone())
            .with_opt("by_total_runtime", self.by_total_runtime.clone())
            .with_opt("by_artifacts", self.by_artifacts.clone())
            .with_opt("by_error_message", self.by_error_message.clone())
            .with_opt("by_attempt_number", self.by_attempt_number)
            .with_opt("by_pages", self.by_pages)
            .with_opt("by_branch", self.by_branch.clone())
            .with_opt("by_time_interval", self.by_time_interval.clone())
            .with_opt("limit", self.limit)
            .with_opt("by_environment", self.by_environment.clone())
            .with_opt("by_author", self.by_author.clone())
            .with_opt("by_commit", self.by_commit.clone())
            .with_opt("page", self.page)
            .with_opt("get_all", self.get_all.clone())
    }
}

/// Parâmetros de `get_testcase_details`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetTestCaseDetailsRequest {
    pub testcase_id: Option<String>,
    pub testcase_name: Option<String>,
    pub testrun_id: Option<String>,
    /// Enviado como texto, como a API espera.
    pub counter: Option<String>,
}

impl GetTestCaseDetailsRequest {
    pub fn from_arguments(args: &ToolArguments) -> Result<Self, ValidationError> {
        let has_id = args.is_truthy("testcase_id");
        let has_name = args.is_truthy("testcase_name");
        let has_run_id = args.is_truthy("testrun_id");
        let has_counter = args.is_present("counter");

        if !has_id && !has_name {
            return Err(ValidationError::MissingTestCaseIdentifier);
        }
        if has_name && !has_run_id && !has_counter {
            return Err(ValidationError::TestCaseNameWithoutRun);
        }

        Ok(Self {
            testcase_id: args.string_if_truthy("testcase_id"),
            testcase_name: args.string_if_truthy("testcase_name"),
            testrun_id: args.string_if_truthy("testrun_id"),
            counter: args.string_if_present("counter"),
        })
    }

    pub fn to_query(&self) -> NormalizedParameters {
        NormalizedParameters::new()
            .with_opt("testcaseid", self.testcase_id.clone())
            .with_opt("by_title", self.testcase_name.clone())
            .with_opt("by_testrun_id", self.testrun_id.clone())
            .with_opt("counter", self.counter.clone())
    }
}

/// Parâmetros de `upload_latest_local_test_runs`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub report_dir: String,
    pub upload_html: bool,
    pub upload_images: bool,
    pub upload_videos: bool,
    pub upload_traces: bool,
    pub upload_files: bool,
    pub upload_full_json: bool,
    pub json_report: Option<String>,
    pub html_report: Option<String>,
    pub trace_dir: Option<String>,
    pub verbose: bool,
}

impl UploadRequest {
    /// `default_report_dir` é usado quando `reportDir` está ausente ou vazio.
    pub fn from_arguments(
        args: &ToolArguments,
        default_report_dir: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            report_dir: args
                .string_if_truthy("reportDir")
                .unwrap_or_else(|| default_report_dir.to_string()),
            upload_html: args.flag_or("uploadHtml", true),
            upload_images: args.flag("uploadImages"),
            upload_videos: args.flag("uploadVideos"),
            upload_traces: args.flag("uploadTraces"),
            upload_files: args.flag("uploadFiles"),
            upload_full_json: args.flag("uploadFullJson"),
            json_report: args.string_if_truthy("jsonReport"),
            html_report: args.string_if_truthy("htmlReport"),
            trace_dir: args.string_if_truthy("traceDir"),
            verbose: args.flag("verbose"),
        })
    }

    /// Primeiro caminho explícito informado (json, html, trace), se houver.
    pub fn override_path(&self) -> Option<&str> {
        self.json_report
            .as_deref()
            .or(self.html_report.as_deref())
            .or(self.trace_dir.as_deref())
    }
}

impl Default for UploadRequest {
    fn default() -> Self {
        Self {
            report_dir: "./playwright-report".to_string(),
            upload_html: true,
            upload_images: false,
            upload_videos: false,
            upload_traces: false,
            upload_files: false,
            upload_full_json: false,
            json_report: None,
            html_report: None,
            trace_dir: None,
            verbose: false,
        }
    }
}
