//! Tipos de erro do servidor TestDino MCP.

use std::path::PathBuf;

use thiserror::Error;

/// Tipo de resultado padrão do crate.
pub type TestDinoResult<T> = Result<T, TestDinoError>;

/// Erros possíveis ao atender uma chamada de ferramenta.
#[derive(Error, Debug)]
pub enum TestDinoError {
    /// Combinação de argumentos inválida, detectada antes de qualquer I/O.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Nenhuma credencial disponível (nem no ambiente, nem nos argumentos).
    #[error(
        "Missing {env_var} environment variable. \
         Please configure it in your MCP client configuration under the 'env' section."
    )]
    MissingCredential { env_var: String },

    /// A API remota respondeu com status fora de 2xx.
    #[error("API request failed: {status} {status_text}\n{body}")]
    Remote {
        status: u16,
        status_text: String,
        body: String,
    },

    /// O diretório de relatório resolvido não existe.
    #[error(
        "Report directory does not exist: {}\n\
         Please ensure the Playwright report has been generated at: {requested}\n\
         Searched from: {}\n\
         Tip: Use an absolute path if the report is in a different location.",
        resolved.display(),
        searched_from.display()
    )]
    ReportDirNotFound {
        resolved: PathBuf,
        requested: String,
        searched_from: PathBuf,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl TestDinoError {
    /// Cria um erro de configuração.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Erro de credencial ausente para a variável informada.
    pub fn missing_credential<S: Into<String>>(env_var: S) -> Self {
        Self::MissingCredential {
            env_var: env_var.into(),
        }
    }
}

/// Falhas de validação de argumentos, uma variante por regra.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `get_testcase_details` sem `testcase_id` nem `testcase_name`.
    #[error(
        "testcase_id or testcase_name required: either 'testcase_id' or 'testcase_name' must be provided. \
         If using 'testcase_name', you must also provide either 'testrun_id' or 'counter' \
         to specify which test run's test case you want."
    )]
    MissingTestCaseIdentifier,

    /// `testcase_name` informado sem `testrun_id` nem `counter`.
    #[error(
        "When using 'testcase_name', you must also provide either 'testrun_id' or 'counter' \
         to specify which test run's test case you want. \
         This is required because test cases can have the same name across different test runs."
    )]
    TestCaseNameWithoutRun,

    /// `list_testcase` sem identificador de execução nem filtro de execução.
    #[error(
        "At least one of the following must be provided: by_testrun_id, counter, \
         or any test run filter (by_branch, by_commit, by_author, by_environment, \
         by_time_interval, by_pages, page, limit, get_all)"
    )]
    MissingTestRunScope,

    /// Campo obrigatório ausente.
    #[error("Missing required argument '{0}'")]
    MissingField(&'static str),

    /// Os argumentos não formam um objeto JSON.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
