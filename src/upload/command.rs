//! Linha de comando do uploader.

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::auth::Token;
use crate::types::config::UploaderConfig;
use crate::types::requests::UploadRequest;

use super::paths::ResolvedPaths;

/// Variável de ambiente que informa ao uploader qual ambiente usar.
pub const RUNTIME_ENV: &str = "TESTDINO_RUNTIME";

static TOKEN_RUNTIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^trx_([a-z]+)_").expect("token runtime pattern is valid"));

/// Ambiente do TestDino derivado do token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Production,
    Staging,
    Development,
}

impl Runtime {
    /// `trx_<ambiente>_...` define o ambiente; qualquer outra forma é `development`.
    pub fn from_token(token: &str) -> Self {
        TOKEN_RUNTIME
            .captures(token)
            .and_then(|caps| caps.get(1))
            .and_then(|m| match m.as_str().to_ascii_lowercase().as_str() {
                "production" => Some(Runtime::Production),
                "staging" => Some(Runtime::Staging),
                "development" => Some(Runtime::Development),
                _ => None,
            })
            .unwrap_or(Runtime::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Production => "production",
            Runtime::Staging => "staging",
            Runtime::Development => "development",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comando pronto para execução, sem shell.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadCommand {
    program: String,
    args: Vec<String>,
    current_dir: PathBuf,
    env: Vec<(String, String)>,
    runtime: Runtime,
    token_arg: usize,
}

impl UploadCommand {
    /// Monta `<programa> <args> upload [dir] --token=<token> [flags]`.
    pub fn build(
        config: &UploaderConfig,
        request: &UploadRequest,
        paths: &ResolvedPaths,
        token: &Token,
    ) -> Self {
        let runtime = Runtime::from_token(token.as_str());

        let mut args = config.args.clone();
        args.push("upload".to_string());

        if let Some(dir) = &paths.report_dir {
            args.push(dir.to_string_lossy().into_owned());
        }

        let token_arg = args.len();
        args.push(format!("--token={}", token.as_str()));

        args.extend(upload_flags(request).into_iter().map(str::to_string));

        if let Some(path) = &request.json_report {
            args.push(format!("--json-report={}", path));
        }
        if let Some(path) = &request.html_report {
            args.push(format!("--html-report={}", path));
        }
        if let Some(path) = &request.trace_dir {
            args.push(format!("--trace-dir={}", path));
        }

        if request.verbose {
            args.push("--verbose".to_string());
        }

        Self {
            program: config.command.clone(),
            args,
            current_dir: paths.project_root.clone(),
            env: vec![(RUNTIME_ENV.to_string(), runtime.as_str().to_string())],
            runtime,
            token_arg,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Variáveis adicionadas ao ambiente herdado.
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    /// Verifica se um argumento exato está presente.
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Linha de comando com o token mascarado, para logs.
    pub fn redacted(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().enumerate().map(|(i, arg)| {
                if i == self.token_arg {
                    "--token=***".to_string()
                } else {
                    arg.clone()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for UploadCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadCommand")
            .field("command", &self.redacted())
            .field("current_dir", &self.current_dir)
            .field("runtime", &self.runtime)
            .finish()
    }
}

/// Flags de conteúdo: `--upload-full-json` exclui todas as outras.
fn upload_flags(request: &UploadRequest) -> Vec<&'static str> {
    if request.upload_full_json {
        return vec!["--upload-full-json"];
    }

    [
        (request.upload_html, "--upload-html"),
        (request.upload_images, "--upload-images"),
        (request.upload_videos, "--upload-videos"),
        (request.upload_traces, "--upload-traces"),
        (request.upload_files, "--upload-files"),
    ]
    .into_iter()
    .filter_map(|(enabled, flag)| enabled.then_some(flag))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> ResolvedPaths {
        ResolvedPaths {
            report_dir: Some(PathBuf::from("/repo/playwright-report")),
            project_root: PathBuf::from("/repo"),
        }
    }

    fn token(value: &str) -> Token {
        Token::new(value).unwrap()
    }

    fn build(request: &UploadRequest) -> UploadCommand {
        UploadCommand::build(
            &UploaderConfig::default(),
            request,
            &paths(),
            &token("trx_staging_abc123"),
        )
    }

    #[test]
    fn test_runtime_from_token() {
        assert_eq!(Runtime::from_token("trx_staging_abc123"), Runtime::Staging);
        assert_eq!(Runtime::from_token("TRX_Production_x"), Runtime::Production);
        assert_eq!(Runtime::from_token("trx_development_x"), Runtime::Development);
        assert_eq!(Runtime::from_token("abc123"), Runtime::Development);
        assert_eq!(Runtime::from_token("trx_qa_abc"), Runtime::Development);
        assert_eq!(Runtime::from_token("trx_staging"), Runtime::Development);
    }

    #[test]
    fn test_default_command_line() {
        let command = build(&UploadRequest::default());

        assert_eq!(command.program(), "npx");
        assert_eq!(
            command.args(),
            &[
                "tdpw",
                "upload",
                "/repo/playwright-report",
                "--token=trx_staging_abc123",
                "--upload-html",
            ]
        );
        assert_eq!(command.current_dir(), Path::new("/repo"));
        assert_eq!(
            command.env(),
            &[("TESTDINO_RUNTIME".to_string(), "staging".to_string())]
        );
    }

    #[test]
    fn test_full_json_excludes_other_flags() {
        let request = UploadRequest {
            upload_full_json: true,
            upload_html: true,
            upload_images: true,
            ..UploadRequest::default()
        };
        let command = build(&request);

        assert!(command.has_arg("--upload-full-json"));
        assert!(!command.has_arg("--upload-html"));
        assert!(!command.has_arg("--upload-images"));
    }

    #[test]
    fn test_individual_flags_in_fixed_order() {
        let request = UploadRequest {
            upload_html: false,
            upload_images: true,
            ..UploadRequest::default()
        };
        let command = build(&request);
        assert!(command.has_arg("--upload-images"));
        assert!(!command.has_arg("--upload-html"));

        let request = UploadRequest {
            upload_files: true,
            upload_videos: true,
            upload_traces: true,
            ..UploadRequest::default()
        };
        let command = build(&request);
        let flags: Vec<&str> = command
            .args()
            .iter()
            .filter(|a| a.starts_with("--upload-"))
            .map(String::as_str)
            .collect();
        assert_eq!(
            flags,
            vec!["--upload-html", "--upload-videos", "--upload-traces", "--upload-files"]
        );
    }

    #[test]
    fn test_overrides_without_report_dir() {
        let request = UploadRequest {
            json_report: Some("out/report.json".to_string()),
            trace_dir: Some("out/traces".to_string()),
            verbose: true,
            ..UploadRequest::default()
        };
        let paths = ResolvedPaths {
            report_dir: None,
            project_root: PathBuf::from("/repo"),
        };
        let command = UploadCommand::build(
            &UploaderConfig::default(),
            &request,
            &paths,
            &token("abc123"),
        );

        assert_eq!(
            command.args(),
            &[
                "tdpw",
                "upload",
                "--token=abc123",
                "--upload-html",
                "--json-report=out/report.json",
                "--trace-dir=out/traces",
                "--verbose",
            ]
        );
        assert_eq!(command.runtime(), Runtime::Development);
    }

    #[test]
    fn test_token_is_a_single_argument() {
        let command = UploadCommand::build(
            &UploaderConfig::default(),
            &UploadRequest::default(),
            &paths(),
            &token("trx_production_a b\"c"),
        );

        assert!(command.has_arg("--token=trx_production_a b\"c"));
    }

    #[test]
    fn test_redacted_hides_token() {
        let command = build(&UploadRequest::default());
        let redacted = command.redacted();
        let debug = format!("{:?}", command);

        assert!(redacted.contains("--token=***"));
        assert!(!redacted.contains("abc123"));
        assert!(!debug.contains("abc123"));
        assert!(redacted.starts_with("npx tdpw upload"));
    }
}
