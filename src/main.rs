use clap::Parser;
use testdino_mcp::cli::{commands, Cli, Commands};
use testdino_mcp::types::config::Config;
use testdino_mcp::TestDinoResult;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> TestDinoResult<()> {
    let cli = Cli::parse();

    // Configuration first (no logging yet); the API key comes from the environment.
    let config = Config::load_or_default(&cli.config).with_environment();

    let log_level = cli.log_level(&config.general.log_level);
    let filter = EnvFilter::from_default_env().add_directive(
        format!("testdino_mcp={}", log_level)
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );

    // stdout carries protocol frames, so logs always go to stderr.
    if config.general.log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    tracing::debug!("Configuration path: {}", cli.config.display());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve(&config).await?,
        Commands::Init { path } => commands::init(path).await?,
        Commands::Doctor => commands::doctor(&config, &cli.config).await?,
        Commands::Tools => commands::tools()?,
        Commands::Version => commands::version(),
    }

    Ok(())
}
