//! Check-origin command implementation.

use siwe_verifier::{Decision, DeveloperMode, Origin, OriginVerifier, VerifierConfig};

use crate::input::{read_message, Limits};
use crate::output::{format_json, print_outcome};

pub struct Args {
    pub origin: String,
    pub config: Option<String>,
    pub developer_mode: bool,
    pub allow_schemes: Vec<String>,
    pub strict: bool,
    pub json: bool,
    pub input: Option<String>,
    pub limits: Limits,
}

pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => VerifierConfig::from_file(path)?,
        None => VerifierConfig::default(),
    };
    if args.developer_mode {
        config.developer_mode = DeveloperMode::On;
    }
    config.allowed_schemes.extend(args.allow_schemes);
    config.validate()?;

    let origin = Origin::parse(&args.origin).map_err(|e| format!("Invalid origin: {}", e))?;
    let limits = Limits {
        max_bytes: args.limits.max_bytes.or(config.max_message_bytes),
        ..args.limits
    };
    let message = read_message(args.input.as_deref(), limits)?;

    let context = config.context_for(origin);
    tracing::debug!(
        origin = %context.origin,
        developer_mode = context.developer_mode,
        allowed = ?context.allowed_schemes,
        "verification context ready"
    );
    let outcome = OriginVerifier::new().verify(&message, &context);

    if args.json {
        println!("{}", format_json(&outcome));
    } else {
        print_outcome(&outcome);
    }

    let failed = match outcome.decision {
        Decision::Accept => false,
        Decision::Warn => args.strict,
        Decision::Reject => true,
    };
    if failed {
        std::process::exit(1);
    }

    Ok(())
}
