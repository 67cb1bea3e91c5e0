//! Command parser for `!invoice <amount> [name...]`.
//!
//! Pure with respect to its input: no I/O and no logging.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use super::{InvoiceRequest, DEFAULT_CUSTOMER_NAME};

pub const INVOICE_KEYWORD: &str = "invoice";

/// A well-formed invoice command.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub amount: Decimal,
    pub customer_name: String,
}

impl ParsedCommand {
    /// Build the renderer input, injecting the configured company name.
    pub fn into_request(self, company_name: impl Into<String>) -> InvoiceRequest {
        InvoiceRequest::new(self.customer_name, self.amount, company_name)
    }
}

/// Caller-correctable input problem. Carries the text to send back.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageError {
    pub message: String,
}

impl UsageError {
    pub fn new(prefix: char) -> Self {
        Self {
            message: format!(
                "Usage: `{}{} <amount> <name>` — please provide a numeric amount.",
                prefix, INVOICE_KEYWORD
            ),
        }
    }
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UsageError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Not addressed to this bot; take no action.
    NotACommand,
    Usage(UsageError),
    Invoice(ParsedCommand),
}

/// Parse the raw text of a message.
pub fn parse_command(raw: Option<&str>, prefix: char) -> CommandOutcome {
    let Some(text) = raw else {
        return CommandOutcome::NotACommand;
    };
    let Some(rest) = text.strip_prefix(prefix) else {
        return CommandOutcome::NotACommand;
    };

    let mut tokens = rest.split_whitespace();
    match tokens.next() {
        Some(keyword) if keyword.eq_ignore_ascii_case(INVOICE_KEYWORD) => {}
        _ => return CommandOutcome::NotACommand,
    }

    let amount = match tokens.next().and_then(parse_amount) {
        Some(amount) => amount,
        None => return CommandOutcome::Usage(UsageError::new(prefix)),
    };

    let name_tokens: Vec<&str> = tokens.collect();
    let customer_name = if name_tokens.is_empty() {
        DEFAULT_CUSTOMER_NAME.to_string()
    } else {
        name_tokens.join(" ")
    };

    CommandOutcome::Invoice(ParsedCommand {
        amount,
        customer_name,
    })
}

/// Accepts plain and scientific notation; rejects negatives.
/// `-0` becomes `0`. Values beyond 28 significant digits do not fit a `Decimal`.
fn parse_amount(token: &str) -> Option<Decimal> {
    let mut amount = Decimal::from_str(token)
        .or_else(|_| Decimal::from_scientific(token))
        .ok()?;
    if amount.is_zero() {
        amount.set_sign_positive(true);
    } else if amount.is_sign_negative() {
        return None;
    }
    Some(amount)
}
