//! linode-mcp-server: MCP server exposing the Linode API as tools
//!
//! Validates CLI options, sets up diagnostics on stderr (stdout belongs
//! to the stdio protocol channel) and hands off to the bootstrap
//! sequence.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use linode_mcp_server::bootstrap;
use linode_mcp_server::config::{self, RawOptions, TOKEN_ENV_VAR};
use linode_mcp_server::tools::ToolCategory;

/// MCP server for the Linode API.
///
/// Exposes Linode resources (instances, volumes, networking, ...) as
/// tools that AI agents can discover and invoke.
#[derive(Parser, Debug)]
#[command(name = "linode-mcp-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Linode API token (overrides the LINODE_API_TOKEN environment variable)
    #[arg(short, long)]
    token: Option<String>,

    /// Tool categories to enable (comma-separated; default: all)
    #[arg(short, long, value_delimiter = ',')]
    categories: Option<Vec<String>>,

    /// List all available tool categories and exit
    #[arg(long)]
    list_categories: bool,

    /// Transport type: stdio (default) or http
    #[arg(long, default_value = "stdio")]
    transport: String,

    /// Server port (http only, default: 8080)
    #[arg(long)]
    port: Option<u16>,

    /// Server bind address (http only, default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Server endpoint path (http only, default: /mcp)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
fn get_log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber on stderr.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the linode-mcp-server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Bypasses all other validation, including the token requirement.
    if args.list_categories {
        println!("Available tool categories:");
        for category in ToolCategory::ALL {
            println!("- {category}");
        }
        return ExitCode::SUCCESS;
    }

    let raw = RawOptions {
        token: args.token,
        categories: args.categories,
        transport: args.transport,
        port: args.port,
        host: args.host,
        endpoint: args.endpoint,
    };
    let env_token = std::env::var(TOKEN_ENV_VAR).ok();

    let options = match config::resolve_options(raw, env_token) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(get_log_level(args.verbose, args.quiet));

    // A panic unwinding out of a connection task must not look like a
    // silent hang: log it, then let the runtime isolate it.
    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "unhandled panic");
    }));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting linode-mcp-server"
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(bootstrap::start_server(options)) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                error!("caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_from_flags() {
        assert_eq!(get_log_level(0, false), Level::WARN);
        assert_eq!(get_log_level(1, false), Level::INFO);
        assert_eq!(get_log_level(2, false), Level::DEBUG);
        assert_eq!(get_log_level(5, false), Level::TRACE);
        // Quiet wins over verbose.
        assert_eq!(get_log_level(3, true), Level::ERROR);
    }
}
