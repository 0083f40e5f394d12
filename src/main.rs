use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{error, info};

use prop279_bridge::bridge::Bridge;
use prop279_bridge::config::{CliOverrides, Config};
use prop279_bridge::engine::UpstreamEngine;
use prop279_bridge::error::{BridgeError, EXIT_FAILURE};
use prop279_bridge::logging::init_logging;
use prop279_bridge::resolver::Resolver;

#[derive(Parser)]
#[command(name = "prop279-bridge")]
#[command(version)]
#[command(about = "Tor Prop279 resolver for Namecoin names", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "PROP279_CONFIG")]
    config: Option<PathBuf>,

    /// DNS server fronting the naming backend (host:port)
    #[arg(short, long, env = "PROP279_UPSTREAM")]
    upstream: Option<SocketAddr>,

    /// Timeout in milliseconds for each upstream exchange
    #[arg(long, env = "PROP279_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Only return onion services
    #[arg(long, env = "PROP279_ONLY_ONION")]
    only_onion: bool,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG wins if set
    #[arg(long)]
    log_level: Option<String>,
}

async fn run(config: Config) -> Result<(), BridgeError> {
    let engine = UpstreamEngine::connect(config.upstream, config.timeout()).await?;
    let resolver = Resolver::new(engine, config.only_onion);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        only_onion = config.only_onion,
        "starting Prop279 bridge"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    Bridge::new(resolver, stdin, stdout).run().await
}

fn main() -> ExitCode {
    let args = Args::parse();

    let overrides = CliOverrides {
        upstream: args.upstream,
        timeout_ms: args.timeout_ms,
        only_onion: args.only_onion,
        log_level: args.log_level,
    };

    let result = Config::load(args.config.as_deref(), overrides)
        .map_err(BridgeError::from)
        .and_then(|config| {
            init_logging(&config.log_level)?;
            Ok(config)
        });
    let config = match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "couldn't start runtime");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match rt.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
