//! Execução do uploader como subprocesso.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::command::UploadCommand;

/// Saída capturada de um subprocesso.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Código de saída; `None` se o processo foi terminado por sinal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Executor de comandos de upload.
///
/// Um erro de I/O significa que o processo não pôde ser iniciado (ou estourou o
/// timeout); um código de saída diferente de zero chega como [`ProcessOutput`].
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Executa o comando e captura stdout e stderr.
    async fn run(&self, command: &UploadCommand) -> std::io::Result<ProcessOutput>;

    /// Verifica se o programa responde a `--help`.
    async fn is_available(&self, program: &str, args: &[String]) -> bool {
        Command::new(program)
            .args(args)
            .arg("--help")
            .stdin(Stdio::null())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

/// Executor real, baseado em `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    timeout: Option<Duration>,
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define o timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &UploadCommand) -> std::io::Result<ProcessOutput> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .current_dir(command.current_dir())
            .envs(command.env().iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("'{}' timed out after {}s", command.program(), limit.as_secs()),
                    )
                })??,
            None => cmd.output().await?,
        };

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::auth::Token;
    use crate::types::config::UploaderConfig;
    use crate::types::requests::UploadRequest;
    use crate::upload::paths::ResolvedPaths;

    fn shell_command(script: &str, dir: &std::path::Path) -> UploadCommand {
        // `sh -c <script> upload ...`: os argumentos extras viram $0, $1, ...
        let config = UploaderConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            ..UploaderConfig::default()
        };
        let paths = ResolvedPaths {
            report_dir: None,
            project_root: dir.to_path_buf(),
        };
        UploadCommand::build(
            &config,
            &UploadRequest::default(),
            &paths,
            &Token::new("trx_production_abc").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_captures_output_env_and_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let command = shell_command("echo \"$TESTDINO_RUNTIME\"; pwd; echo oops >&2", dir.path());

        let output = TokioProcessRunner::new().run(&command).await.unwrap();

        assert!(output.success());
        let mut lines = output.stdout.lines();
        assert_eq!(lines.next(), Some("production"));
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(
            pwd.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let command = shell_command("echo failing >&2; exit 3", dir.path());

        let output = TokioProcessRunner::new().run(&command).await.unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stderr.trim(), "failing");
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploaderConfig {
            command: "testdino-uploader-that-does-not-exist".to_string(),
            args: vec![],
            ..UploaderConfig::default()
        };
        let paths = ResolvedPaths {
            report_dir: None,
            project_root: dir.path().to_path_buf(),
        };
        let command = UploadCommand::build(
            &config,
            &UploadRequest::default(),
            &paths,
            &Token::new("abc").unwrap(),
        );

        let err = TokioProcessRunner::new().run(&command).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let command = shell_command("sleep 5", dir.path());

        let runner = TokioProcessRunner::new().with_timeout(Some(Duration::from_millis(100)));
        let err = runner.run(&command).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
    }
}
