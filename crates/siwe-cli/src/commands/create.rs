//! Create command implementation.

use chrono::{Duration, Utc};
use siwe_codec::{
    Address, ChainId, Domain, Message, Nonce, RequestId, Scheme, Statement, Timestamp, Uri,
};

use crate::output::format_json;

pub struct Args {
    pub domain: String,
    pub address: String,
    pub uri: String,
    pub chain_id: u64,
    pub scheme: Option<String>,
    pub statement: Option<String>,
    pub nonce: Option<String>,
    pub expires_in: Option<i64>,
    pub request_id: Option<String>,
    pub resources: Vec<String>,
    pub json: bool,
}

pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let issued = Utc::now();
    let nonce = match args.nonce {
        Some(nonce) => Nonce::parse(nonce)?,
        None => Nonce::generate(),
    };

    let mut message = Message::new(
        Domain::parse(args.domain)?,
        Address::parse(args.address)?,
        Uri::parse(args.uri)?,
        ChainId::from(args.chain_id),
        nonce,
        Timestamp::from_utc(issued),
    );
    message.scheme = args.scheme.map(Scheme::parse).transpose()?;
    // An empty statement means none.
    message.statement = args
        .statement
        .filter(|s| !s.is_empty())
        .map(Statement::parse)
        .transpose()?;
    message.request_id = args.request_id.map(RequestId::parse).transpose()?;
    message.resources = args
        .resources
        .into_iter()
        .map(Uri::parse)
        .collect::<Result<_, _>>()?;
    if let Some(secs) = args.expires_in {
        let expires = Duration::try_seconds(secs)
            .filter(|d| *d > Duration::zero())
            .ok_or_else(|| format!("Invalid expiry: {} seconds", secs))?;
        message.expiration_time = Some(Timestamp::from_utc(issued + expires));
    }

    if args.json {
        println!("{}", format_json(&message));
    } else {
        println!("{}", message);
    }
    Ok(())
}
