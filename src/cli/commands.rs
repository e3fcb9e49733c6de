//! Implementação dos comandos CLI.

use std::path::{Path, PathBuf};

use crate::api::{ApiClient, Endpoint, NormalizedParameters};
use crate::auth::Token;
use crate::mcp::{McpServer, ToolHandler};
use crate::types::arguments::ToolArguments;
use crate::types::config::Config;
use crate::upload::{find_git_root, resolve_report_dir, Uploader};
use crate::TestDinoResult;

/// Nome do arquivo criado por `init`.
pub const CONFIG_FILE: &str = "testdino.toml";

/// Writes a default configuration file into `path` (default: current directory).
pub async fn init(path: Option<PathBuf>) -> TestDinoResult<()> {
    let target_dir = path.unwrap_or_else(|| PathBuf::from("."));

    if !target_dir.exists() {
        std::fs::create_dir_all(&target_dir)?;
        tracing::info!("Directory created: {}", target_dir.display());
    }

    let config_path = target_dir.join(CONFIG_FILE);

    if config_path.exists() {
        println!("Configuration already exists at: {}", config_path.display());
        return Ok(());
    }

    Config::default_config().save(&config_path)?;

    println!("Configuration created at: {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Export your project key: export TESTDINO_API_KEY=trx_...");
    println!("  2. Check the setup: testdino-mcp doctor");
    println!("  3. Register the server in your MCP client: testdino-mcp serve");

    Ok(())
}

/// Inicia o servidor MCP via stdio.
pub async fn serve(config: &Config) -> TestDinoResult<()> {
    tracing::debug!(
        base_url = %config.api.base_url,
        uploader = %config.uploader.invocation(),
        credential = config.api.api_key.is_some(),
        "Configuration loaded"
    );

    let mut server = McpServer::new(config.clone())?;
    server.run().await
}

/// Imprime o catálogo de ferramentas.
pub fn tools() -> TestDinoResult<()> {
    let catalogue = serde_json::to_string_pretty(&ToolHandler::list_tools())?;
    println!("{}", catalogue);
    Ok(())
}

/// Diagnostica a configuração.
///
/// Só acessa a rede quando há credencial configurada.
pub async fn doctor(config: &Config, config_path: &Path) -> TestDinoResult<()> {
    println!("Checking TestDino MCP setup...\n");

    let mut issues: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config_path.exists() {
        println!("✓ Configuration loaded from {}", config_path.display());
    } else {
        println!("○ No {} found, using defaults", config_path.display());
    }
    println!("  API: {}", config.api.base_url);

    match Token::resolve(config.api.api_key.as_deref(), &ToolArguments::default()) {
        Some(token) => {
            println!(
                "✓ {} is set (fingerprint {})",
                config.api.api_key_env,
                token.fingerprint()
            );
            check_api(config, &token, &mut issues).await;
        }
        None => issues.push(format!("{} is not set", config.api.api_key_env)),
    }

    let uploader = Uploader::new(config.uploader.clone());
    if uploader.is_available().await {
        println!("✓ Uploader available ({})", config.uploader.invocation());
    } else {
        warnings.push(format!(
            "Uploader not available (try: {} --help)",
            config.uploader.invocation()
        ));
    }

    let cwd = std::env::current_dir()?;
    match find_git_root(&cwd) {
        Some(root) => println!("✓ Git repository: {}", root.display()),
        None => warnings.push(format!("{} is not inside a git repository", cwd.display())),
    }

    match resolve_report_dir(&config.uploader.default_report_dir, &cwd) {
        Ok(paths) => {
            if let Some(dir) = paths.report_dir {
                println!("✓ Report directory: {}", dir.display());
            }
        }
        Err(_) => warnings.push(format!(
            "Default report directory not found: {}",
            config.uploader.default_report_dir
        )),
    }

    println!();
    if issues.is_empty() && warnings.is_empty() {
        println!("✓ All good! TestDino MCP is ready to use.");
    } else {
        if !warnings.is_empty() {
            println!("Warnings:");
            for warning in warnings {
                println!("  ⚠ {}", warning);
            }
        }
        if !issues.is_empty() {
            println!("Problems:");
            for issue in issues {
                println!("  ✗ {}", issue);
            }
        }
    }

    Ok(())
}

async fn check_api(config: &Config, token: &Token, issues: &mut Vec<String>) {
    let client = match ApiClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            issues.push(e.to_string());
            return;
        }
    };

    match client
        .get_json(Endpoint::Hello, &NormalizedParameters::new(), token)
        .await
    {
        Ok(_) => println!("✓ API reachable and key accepted"),
        Err(e) => issues.push(format!("API check failed: {}", e)),
    }
}

/// Mostra versão.
pub fn version() {
    println!("testdino-mcp {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("MCP server for TestDino");
    println!("https://testdino.com");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::UploaderConfig;

    #[tokio::test]
    async fn test_init_writes_loadable_config() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("project");

        init(Some(target.clone())).await.unwrap();

        let config = Config::load(target.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.api.api_key_env, "TESTDINO_API_KEY");
    }

    #[tokio::test]
    async fn test_init_keeps_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "[general]\nlog_level = \"debug\"\n").unwrap();

        init(Some(tmp.path().to_path_buf())).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("debug"));
    }

    #[test]
    fn test_tools() {
        assert!(tools().is_ok());
    }

    #[test]
    fn test_version() {
        version();
    }

    #[tokio::test]
    async fn test_doctor_without_credential() {
        let config = Config {
            uploader: UploaderConfig {
                command: "testdino-uploader-that-does-not-exist".to_string(),
                ..UploaderConfig::default()
            },
            ..Config::default_config()
        };

        let result = doctor(&config, Path::new("missing.toml")).await;
        assert!(result.is_ok());
    }
}
