//! Upload de relatórios locais do Playwright.
//!
//! O fluxo é: resolver caminhos ([`paths`]), montar o comando ([`command`]),
//! executar o uploader ([`runner`]) e converter o resultado em texto para o
//! cliente. Falhas do subprocesso não são erros da ferramenta: a saída do
//! próprio uploader é o diagnóstico mais útil, então ela volta como conteúdo.

pub mod command;
pub mod paths;
pub mod runner;

use std::path::Path;
use std::sync::Arc;

use crate::auth::Token;
use crate::types::config::UploaderConfig;
use crate::types::requests::UploadRequest;
use crate::TestDinoResult;

pub use command::{Runtime, UploadCommand, RUNTIME_ENV};
pub use paths::{find_git_root, resolve_override_root, resolve_report_dir, ResolvedPaths};
pub use runner::{ProcessOutput, ProcessRunner, TokioProcessRunner};

/// Resultado de um upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success {
        stdout: String,
    },
    Failure {
        /// Diretório pedido pelo chamador, repetido no checklist.
        requested_dir: String,
        error: String,
        stdout: String,
        stderr: String,
        /// Como o usuário testa o uploader, ex. `npx tdpw --help`.
        help_hint: String,
    },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    /// Texto devolvido ao cliente MCP.
    pub fn render(&self) -> String {
        match self {
            UploadOutcome::Success { stdout } => {
                if stdout.trim().is_empty() {
                    "✅ Report uploaded successfully!".to_string()
                } else {
                    format!("✅ Report uploaded successfully!\n\nOutput:\n{}", stdout)
                }
            }
            UploadOutcome::Failure {
                requested_dir,
                error,
                stdout,
                stderr,
                help_hint,
            } => {
                let mut text = format!("❌ Upload failed.\n\nError: {}\n\n", error);
                if !stderr.is_empty() {
                    text.push_str(&format!("Stderr:\n{}\n\n", stderr));
                }
                if !stdout.is_empty() {
                    text.push_str(&format!("Stdout:\n{}\n\n", stdout));
                }
                text.push_str("Please check:\n");
                text.push_str(&format!("1. The report directory exists: {}\n", requested_dir));
                text.push_str("2. Your TestDino token is valid\n");
                text.push_str("3. You have internet connectivity\n");
                text.push_str(&format!(
                    "4. The uploader is available (try: {})",
                    help_hint
                ));
                text
            }
        }
    }
}

/// Orquestra o upload local.
pub struct Uploader {
    config: UploaderConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl Uploader {
    /// Cria um uploader com o executor real.
    pub fn new(config: UploaderConfig) -> Self {
        let runner = TokioProcessRunner::new().with_timeout(config.timeout());
        Self::with_runner(config, Arc::new(runner))
    }

    /// Cria um uploader com um executor arbitrário.
    pub fn with_runner(config: UploaderConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// O uploader configurado responde a `--help`?
    pub async fn is_available(&self) -> bool {
        self.runner
            .is_available(&self.config.command, &self.config.args)
            .await
    }

    /// Resolve os caminhos de um pedido a partir de `cwd`.
    ///
    /// Com caminho explícito não há verificação de existência.
    pub fn resolve_paths(&self, request: &UploadRequest, cwd: &Path) -> TestDinoResult<ResolvedPaths> {
        match request.override_path() {
            Some(path) => Ok(resolve_override_root(path, cwd)),
            None => resolve_report_dir(&request.report_dir, cwd),
        }
    }

    /// Executa o upload.
    ///
    /// Só falha antes do subprocesso (diretório inexistente). Falhas do
    /// uploader voltam como [`UploadOutcome::Failure`].
    pub async fn upload(
        &self,
        request: &UploadRequest,
        token: &Token,
        cwd: &Path,
    ) -> TestDinoResult<UploadOutcome> {
        let paths = self.resolve_paths(request, cwd)?;
        let command = UploadCommand::build(&self.config, request, &paths, token);

        tracing::info!(
            command = %command.redacted(),
            cwd = %command.current_dir().display(),
            runtime = %command.runtime(),
            token = %token.fingerprint(),
            "Running uploader"
        );

        let outcome = match self.runner.run(&command).await {
            Ok(output) if output.success() => UploadOutcome::Success {
                stdout: output.stdout,
            },
            Ok(output) => {
                let error = match output.exit_code {
                    Some(code) => format!("Command failed with exit code {}: {}", code, command.redacted()),
                    None => format!("Command terminated by signal: {}", command.redacted()),
                };
                self.failure(request, error, output.stdout, output.stderr)
            }
            Err(e) => {
                let error = format!("Failed to run '{}': {}", command.program(), e);
                self.failure(request, error, String::new(), String::new())
            }
        };

        if outcome.is_success() {
            tracing::info!("Upload completed");
        } else {
            tracing::warn!("Upload failed");
        }

        Ok(outcome)
    }

    fn failure(
        &self,
        request: &UploadRequest,
        error: String,
        stdout: String,
        stderr: String,
    ) -> UploadOutcome {
        UploadOutcome::Failure {
            requested_dir: request.report_dir.clone(),
            error,
            stdout,
            stderr,
            help_hint: format!("{} --help", self.config.invocation()),
        }
    }
}
