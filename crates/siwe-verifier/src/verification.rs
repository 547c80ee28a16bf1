//! Wallet-side origin verification.
//!
//! The checks form a table run top to bottom. Each returns pass, warn or
//! reject; a rejection ends the run unless developer mode applies to that
//! check, in which case it is recorded as a warning and the run continues.

use std::fmt;

use serde::Serialize;
use siwe_codec::Message;

use crate::context::VerificationContext;
use crate::origin::default_port;

/// Final decision of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// No findings.
    Accept,
    /// Only warnings; the caller decides whether to proceed.
    Warn,
    /// A check rejected the request.
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Accept => "accept",
            Decision::Warn => "warn",
            Decision::Reject => "reject",
        })
    }
}

/// Individual checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    /// Effective scheme is on the allow-list.
    SchemeAllowed,
    /// Effective scheme equals the origin scheme.
    SchemeMatch,
    /// Message host equals the origin host.
    HostMatch,
    /// Hosts do not differ only by subdomain.
    Subdomain,
    /// Explicit non-default message port equals the origin port.
    ExplicitPort,
    /// Origin carries no non-default port when the message states none.
    ImplicitPort,
}

impl Check {
    /// Whether developer mode turns a rejection from this check into a warning.
    pub fn relaxed_in_developer_mode(&self) -> bool {
        matches!(self, Check::SchemeMatch | Check::HostMatch | Check::Subdomain)
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory.
    Warning,
    /// Fatal to the request.
    Rejection,
}

/// One check's complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Check that produced it.
    pub check: Check,
    /// How serious it is.
    pub severity: Severity,
    /// Human-readable explanation.
    pub reason: String,
}

/// Result of verifying one message against one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    /// Overall decision.
    pub decision: Decision,
    /// Findings in check order; the last one is the rejection, if any.
    pub findings: Vec<Finding>,
}

impl VerificationOutcome {
    /// True if the decision is accept.
    pub fn is_accept(&self) -> bool {
        self.decision == Decision::Accept
    }

    /// True if the decision is reject.
    pub fn is_reject(&self) -> bool {
        self.decision == Decision::Reject
    }

    /// The finding of a given check, if it produced one.
    pub fn finding(&self, check: Check) -> Option<&Finding> {
        self.findings.iter().find(|f| f.check == check)
    }
}

enum Step {
    Pass,
    Warn(String),
    Reject(String),
}

/// Message-side values resolved before the checks run.
struct Subject<'a> {
    scheme: String,
    host: String,
    port: Option<u16>,
    context: &'a VerificationContext,
}

impl Subject<'_> {
    fn default_port(&self) -> Option<u16> {
        default_port(&self.scheme)
    }

    /// Explicit port that differs from the scheme default.
    fn non_default_port(&self) -> Option<u16> {
        self.port.filter(|port| Some(*port) != self.default_port())
    }
}

type CheckFn = fn(&Subject<'_>) -> Step;

const CHECKS: [(Check, CheckFn); 6] = [
    (Check::SchemeAllowed, scheme_allowed),
    (Check::SchemeMatch, scheme_match),
    (Check::HostMatch, host_match),
    (Check::Subdomain, subdomain),
    (Check::ExplicitPort, explicit_port),
    (Check::ImplicitPort, implicit_port),
];

fn scheme_allowed(s: &Subject<'_>) -> Step {
    if s.context.allows_scheme(&s.scheme) {
        Step::Pass
    } else {
        Step::Reject(format!("scheme {:?} is not allowed", s.scheme))
    }
}

fn scheme_match(s: &Subject<'_>) -> Step {
    if s.scheme == s.context.origin.scheme {
        Step::Pass
    } else {
        Step::Reject(format!(
            "message scheme {:?} does not match origin scheme {:?}",
            s.scheme, s.context.origin.scheme
        ))
    }
}

fn host_match(s: &Subject<'_>) -> Step {
    if s.host == s.context.origin.host {
        Step::Pass
    } else {
        Step::Reject(format!(
            "message host {:?} does not match origin host {:?}",
            s.host, s.context.origin.host
        ))
    }
}

fn subdomain(s: &Subject<'_>) -> Step {
    if s.context.subdomain_policy.flags(&s.host, &s.context.origin.host) {
        Step::Warn(format!(
            "message host {:?} and origin host {:?} differ by subdomain",
            s.host, s.context.origin.host
        ))
    } else {
        Step::Pass
    }
}

fn explicit_port(s: &Subject<'_>) -> Step {
    match s.non_default_port() {
        Some(port) if Some(port) != s.context.origin.effective_port() => Step::Warn(format!(
            "message port {} does not match origin port {}",
            port,
            s.context
                .origin
                .effective_port()
                .map_or_else(|| "(none)".to_string(), |p| p.to_string())
        )),
        _ => Step::Pass,
    }
}

fn implicit_port(s: &Subject<'_>) -> Step {
    match s.context.origin.port {
        Some(port) if s.non_default_port().is_none() && s.context.origin.has_non_default_port() => {
            Step::Warn(format!(
                "message uses the default port but origin uses port {}",
                port
            ))
        }
        _ => Step::Pass,
    }
}

/// Decides whether a message's stated origin matches the requesting origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct OriginVerifier;

impl OriginVerifier {
    /// Creates a verifier.
    pub fn new() -> Self {
        Self
    }

    /// Runs every check in order and folds the results into an outcome.
    pub fn verify(&self, message: &Message, context: &VerificationContext) -> VerificationOutcome {
        let scheme = match &message.scheme {
            Some(scheme) => scheme.normalized(),
            None => context.default_scheme.to_ascii_lowercase(),
        };
        let subject = Subject {
            scheme,
            host: message.domain.host().to_ascii_lowercase(),
            port: message.domain.port(),
            context,
        };

        let mut findings = Vec::new();
        let mut decision = Decision::Accept;
        for (check, run) in CHECKS {
            let (severity, reason) = match run(&subject) {
                Step::Pass => continue,
                Step::Warn(reason) => (Severity::Warning, reason),
                Step::Reject(reason)
                    if context.developer_mode && check.relaxed_in_developer_mode() =>
                {
                    (Severity::Warning, format!("{reason} (allowed in developer mode)"))
                }
                Step::Reject(reason) => (Severity::Rejection, reason),
            };
            tracing::debug!(?check, ?severity, %reason, "origin check finding");
            findings.push(Finding {
                check,
                severity,
                reason,
            });
            if severity == Severity::Rejection {
                decision = Decision::Reject;
                break;
            }
            decision = Decision::Warn;
        }

        tracing::info!(
            %decision,
            origin = %context.origin,
            domain = %message.domain,
            findings = findings.len(),
            "origin verification finished"
        );
        VerificationOutcome { decision, findings }
    }
}
