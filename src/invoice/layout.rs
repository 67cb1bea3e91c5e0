//! Fixed vertical layout of an invoice page.
//!
//! The layout is computed as plain data so the document's wording can be
//! checked without parsing the PDF.

use super::common::format_issue_date;
use super::InvoiceRequest;
use chrono::NaiveDate;

pub const COMPANY_FONT_SIZE: f32 = 20.0;
pub const META_FONT_SIZE: f32 = 10.0;
pub const SECTION_FONT_SIZE: f32 = 14.0;
pub const BODY_FONT_SIZE: f32 = 12.0;
pub const TOTAL_FONT_SIZE: f32 = 14.0;
pub const FOOTER_FONT_SIZE: f32 = 10.0;

pub const FOOTER_TEXT: &str = "Thank you for your business!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Size in points.
    pub font_size: f32,
    pub align: Align,
    pub underline: bool,
    /// Blank space above the line, in multiples of its own line height.
    pub gap_before: f32,
}

impl TextLine {
    fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            align: Align::Left,
            underline: false,
            gap_before: 0.0,
        }
    }

    fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    fn after_gap(mut self) -> Self {
        self.gap_before = 1.0;
        self
    }
}

/// Metadata printed alongside the request fields.
#[derive(Debug, Clone)]
pub struct InvoiceMeta<'a> {
    pub invoice_id: &'a str,
    pub issue_date: NaiveDate,
    pub currency_symbol: &'a str,
}

/// Lay out the invoice: header, bill-to, optional items, total, footer.
pub fn layout_invoice(request: &InvoiceRequest, meta: &InvoiceMeta<'_>) -> Vec<TextLine> {
    let mut lines = vec![
        TextLine::new(request.company_name.as_str(), COMPANY_FONT_SIZE),
        TextLine::new(format!("Invoice #: {}", meta.invoice_id), META_FONT_SIZE).align(Align::Right),
        TextLine::new(format!("Date: {}", format_issue_date(meta.issue_date)), META_FONT_SIZE)
            .align(Align::Right),
        TextLine::new("Bill To:", SECTION_FONT_SIZE).after_gap(),
        TextLine::new(request.customer_name.as_str(), BODY_FONT_SIZE),
    ];

    if !request.line_items.is_empty() {
        lines.push(TextLine::new("Items:", BODY_FONT_SIZE).underlined().after_gap());
        for (idx, item) in request.line_items.iter().enumerate() {
            lines.push(TextLine::new(
                format!(
                    "{}. {} — Qty: {} — {}{}",
                    idx + 1,
                    item.description,
                    item.quantity,
                    meta.currency_symbol,
                    item.unit_price
                ),
                BODY_FONT_SIZE,
            ));
        }
    }

    lines.push(
        TextLine::new(
            format!("Total: {}{}", meta.currency_symbol, request.amount),
            TOTAL_FONT_SIZE,
        )
        .align(Align::Right)
        .after_gap(),
    );
    lines.push(
        TextLine::new(FOOTER_TEXT, FOOTER_FONT_SIZE)
            .align(Align::Center)
            .after_gap(),
    );

    lines
}
