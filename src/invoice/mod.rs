//! Invoice module - parsing chat commands and rendering invoice PDFs.
//!
//! - `command` - turns raw message text into a `ParsedCommand`
//! - `validation` - request checks with readable messages
//! - `layout` - fixed vertical flow of text lines for the page
//! - `engine` - draws the layout with printpdf and writes it to disk
//! - `generator` - ties id, date, file name and engine together

pub mod command;
pub mod common;
pub mod engine;
pub mod generator;
pub mod layout;
pub mod traits;
pub mod validation;

pub use command::{parse_command, CommandOutcome, ParsedCommand, UsageError};
pub use engine::PdfRenderEngine;
pub use generator::InvoiceGenerator;
pub use traits::{Generator, Validator};

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";

/// Errors that can occur while producing an invoice document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid invoice request: {0}")]
    InvalidRequest(String),
    #[error("failed to load font {path}: {source}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font is not a usable TrueType font: {0}")]
    InvalidFont(String),
    #[error("failed to build PDF document: {0}")]
    Pdf(String),
    #[error("failed to write invoice to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("render task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<printpdf::Error> for RenderError {
    fn from(err: printpdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

/// One itemized entry printed on the invoice. Not reconciled against the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Fields needed to render one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    #[serde(default = "default_customer_name")]
    pub customer_name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub company_name: String,
}

fn default_customer_name() -> String {
    DEFAULT_CUSTOMER_NAME.to_string()
}

impl InvoiceRequest {
    pub fn new(
        customer_name: impl Into<String>,
        amount: Decimal,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            amount,
            line_items: Vec::new(),
            company_name: company_name.into(),
        }
    }

    pub fn with_line_item(
        mut self,
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        self.line_items.push(LineItem {
            description: description.into(),
            quantity,
            unit_price,
        });
        self
    }
}

/// A finished invoice sitting in temporary storage, waiting for upload.
#[derive(Debug)]
pub struct RenderedInvoice {
    pub invoice_id: String,
    pub issue_date: NaiveDate,
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}
