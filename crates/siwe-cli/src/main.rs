//! siwe CLI - Sign-In with Ethereum message parsing, rendering and origin checks.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{check_origin, checksum, create, digest, nonce, parse, render};

#[derive(Parser)]
#[command(name = "siwe")]
#[command(about = "Sign-In with Ethereum message and origin verification CLI")]
struct Cli {
    /// Log verification details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Reject message input larger than SIZE bytes (default: unlimited)
    #[arg(long, global = true)]
    max_bytes: Option<usize>,
    /// Keep a trailing newline in message input instead of dropping it
    #[arg(long, global = true)]
    exact: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse message text and print its fields as JSON
    Parse {
        /// Message text file (or stdin if not provided)
        input: Option<String>,
    },
    /// Render a JSON message as canonical text
    Render {
        /// JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Build a new message for the current time
    Create {
        /// Requesting authority, e.g. `example.com:8443`
        #[arg(long)]
        domain: String,
        /// Signing account address
        #[arg(long)]
        address: String,
        /// Subject URI
        #[arg(long)]
        uri: String,
        /// Chain ID
        #[arg(long, default_value_t = 1)]
        chain_id: u64,
        /// Scheme prefix for the domain
        #[arg(long)]
        scheme: Option<String>,
        /// Statement shown to the user
        #[arg(long)]
        statement: Option<String>,
        /// Nonce (a random one is generated if not provided)
        #[arg(long)]
        nonce: Option<String>,
        /// Expire the message after SECS seconds
        #[arg(long)]
        expires_in: Option<i64>,
        /// Request ID
        #[arg(long)]
        request_id: Option<String>,
        /// Resource URI (repeatable)
        #[arg(long = "resource")]
        resources: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a message's scheme and domain against the requesting origin
    CheckOrigin {
        /// Origin of the signing request, e.g. `https://example.com`
        #[arg(long)]
        origin: String,
        /// Verifier policy file (TOML)
        #[arg(long)]
        config: Option<String>,
        /// Force developer mode on
        #[arg(long)]
        developer_mode: bool,
        /// Additional allowed scheme (repeatable)
        #[arg(long = "allow-scheme")]
        allow_schemes: Vec<String>,
        /// Exit with error code on warnings as well as rejections
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Message text file (or stdin if not provided)
        input: Option<String>,
    },
    /// Print a fresh random nonce
    Nonce,
    /// Print the EIP-55 checksum encoding of an address
    Checksum {
        /// Address to encode
        address: String,
        /// Exit with error code if the input is not already checksummed
        #[arg(long)]
        verify: bool,
    },
    /// Print the EIP-191 personal-sign digest of a message
    Digest {
        /// Message text file (or stdin if not provided)
        input: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let limits = input::Limits {
        max_bytes: cli.max_bytes,
        exact: cli.exact,
    };

    let result = match cli.command {
        Commands::Parse { input } => parse::run(input, limits),
        Commands::Render { input } => render::run(input),
        Commands::Create {
            domain,
            address,
            uri,
            chain_id,
            scheme,
            statement,
            nonce,
            expires_in,
            request_id,
            resources,
            json,
        } => create::run(create::Args {
            domain,
            address,
            uri,
            chain_id,
            scheme,
            statement,
            nonce,
            expires_in,
            request_id,
            resources,
            json,
        }),
        Commands::CheckOrigin {
            origin,
            config,
            developer_mode,
            allow_schemes,
            strict,
            json,
            input,
        } => check_origin::run(check_origin::Args {
            origin,
            config,
            developer_mode,
            allow_schemes,
            strict,
            json,
            input,
            limits,
        }),
        Commands::Nonce => nonce::run(),
        Commands::Checksum { address, verify } => checksum::run(address, verify),
        Commands::Digest { input } => digest::run(input, limits),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
