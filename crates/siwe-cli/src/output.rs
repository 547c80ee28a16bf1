//! Output formatting utilities.

use serde::Serialize;
use siwe_verifier::VerificationOutcome;

/// Formats a value as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints an outcome as a decision line followed by a findings table.
#[allow(clippy::print_literal)]
pub fn print_outcome(outcome: &VerificationOutcome) {
    println!("DECISION: {}", outcome.decision);
    if outcome.findings.is_empty() {
        return;
    }
    println!("{:<16} {:<10} {}", "CHECK", "SEVERITY", "REASON");
    println!("{}", "-".repeat(80));
    for finding in &outcome.findings {
        let check = format_json(&finding.check);
        let severity = format_json(&finding.severity);
        println!(
            "{:<16} {:<10} {}",
            check.trim_matches('"'),
            severity.trim_matches('"'),
            truncate(&finding.reason, 52)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
