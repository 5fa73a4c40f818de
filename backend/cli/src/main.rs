mod protocol_cmd;
mod start_cmd;
mod status_cmd;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use nurseapp_config::{GatewayConfig, ProcessEnvironment};
use nurseapp_executor::{Interpreter, ToolRunner};
use nurseapp_gateway::{GatewayState, start_server};
use nurseapp_logging::{init_console_logger, init_logger};

#[derive(Parser)]
#[command(name = "nurseapp")]
#[command(about = "nurseapp local gateway for the nursing documentation tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway in the foreground
    Serve {
        /// Host to bind (overrides NURSE_UI_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides NURSE_UI_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Start the gateway in the background unless it is already running
    Start {
        /// Activation URI passed by the OS (e.g. nurseapp://start)
        uri: Option<String>,
    },
    /// Register the nurseapp:// URI scheme for the current user
    InstallProtocol,
    /// Report whether a gateway is serving on the configured address
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = GatewayConfig::from_env();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = config.with_host(host).with_port(port);
            init_logger(config.log_dir(), &config.log_level);
            run_server(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Start { uri } => {
            init_console_logger(&config.log_level);
            start_cmd::run(&config, uri.as_deref()).await
        }
        Commands::InstallProtocol => {
            init_console_logger(&config.log_level);
            protocol_cmd::run().await
        }
        Commands::Status => {
            init_console_logger(&config.log_level);
            Ok(status_cmd::run(&config).await)
        }
    }
}

async fn run_server(config: GatewayConfig) -> Result<()> {
    let addr = config.addr();
    info!(
        addr = %addr,
        app_dir = %config.app_dir.display(),
        "Starting nurseapp gateway"
    );

    let env = ProcessEnvironment::from_current();
    let runner = ToolRunner::new(config.app_dir.clone(), Interpreter::python(), env);
    let state = GatewayState::new(Arc::new(runner), config.app_dir.clone());

    start_server(&addr, state)
        .await
        .with_context(|| format!("gateway on {addr} stopped with an error"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_overrides() {
        let cli = Cli::try_parse_from(["nurseapp", "serve", "--host", "0.0.0.0", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn start_uri_is_optional() {
        let bare = Cli::try_parse_from(["nurseapp", "start"]).unwrap();
        assert!(matches!(bare.command, Commands::Start { uri: None }));

        let with_uri = Cli::try_parse_from(["nurseapp", "start", "nurseapp://start"]).unwrap();
        match with_uri.command {
            Commands::Start { uri } => assert_eq!(uri.as_deref(), Some("nurseapp://start")),
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn install_protocol_is_kebab_case() {
        let cli = Cli::try_parse_from(["nurseapp", "install-protocol"]).unwrap();
        assert!(matches!(cli.command, Commands::InstallProtocol));
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(Cli::try_parse_from(["nurseapp", "serve", "--port", "http"]).is_err());
    }
}
