//! Interface de linha de comando do servidor TestDino MCP.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TestDino MCP - servidor MCP para o TestDino.
#[derive(Parser, Debug)]
#[command(name = "testdino-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arquivo de configuração.
    #[arg(short, long, default_value = "testdino.toml")]
    pub config: PathBuf,

    /// Modo verbose.
    #[arg(short, long)]
    pub verbose: bool,

    /// Modo silencioso.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Comando a executar (padrão: `serve`).
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Nível de log: flags têm precedência sobre a configuração.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            configured
        }
    }
}

/// Comandos disponíveis.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Inicia o servidor MCP via stdio.
    Serve,

    /// Cria um testdino.toml padrão.
    Init {
        /// Diretório de destino (padrão: diretório atual).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Diagnostica configuração, credencial e uploader.
    Doctor,

    /// Mostra o catálogo de ferramentas em JSON.
    Tools,

    /// Mostra versão.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["testdino-mcp"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("testdino.toml"));
    }

    #[test]
    fn test_log_level_flags() {
        let cli = Cli::parse_from(["testdino-mcp", "--verbose", "serve"]);
        assert_eq!(cli.log_level("info"), "debug");
        assert_eq!(cli.command, Some(Commands::Serve));

        let cli = Cli::parse_from(["testdino-mcp", "-q", "doctor"]);
        assert_eq!(cli.log_level("info"), "error");

        let cli = Cli::parse_from(["testdino-mcp", "tools"]);
        assert_eq!(cli.log_level("warn"), "warn");
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["testdino-mcp", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_init_path() {
        let cli = Cli::parse_from(["testdino-mcp", "init", "--path", "/tmp/x"]);
        assert_eq!(
            cli.command,
            Some(Commands::Init {
                path: Some(PathBuf::from("/tmp/x"))
            })
        );
    }
}
