//! Parse command implementation.

use crate::input::{read_message, Limits};
use crate::output::format_json;

pub fn run(input: Option<String>, limits: Limits) -> Result<(), Box<dyn std::error::Error>> {
    let message = read_message(input.as_deref(), limits)?;
    println!("{}", format_json(&message));
    Ok(())
}
