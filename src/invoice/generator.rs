//! Invoice renderer.
//!
//! Validates a request, assigns a fresh id and issue date, and hands the
//! layout to the PDF engine. Each call writes exactly one file into the
//! configured temporary directory; the caller owns deleting it.

use std::path::PathBuf;

use async_trait::async_trait;

use super::common::{derive_file_name, generate_invoice_id, today};
use super::engine::PdfRenderEngine;
use super::layout::{layout_invoice, InvoiceMeta};
use super::traits::{Generator, Validator};
use super::{InvoiceRequest, RenderError, RenderedInvoice};
use crate::config::BotConfig;

pub struct InvoiceGenerator {
    currency_symbol: String,
    font_path: Option<PathBuf>,
    output_dir: PathBuf,
}

impl InvoiceGenerator {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            font_path: config.font_path.clone(),
            output_dir: config.temp_dir.clone(),
        }
    }

    pub async fn render(&self, request: InvoiceRequest) -> Result<RenderedInvoice, RenderError> {
        request.validate().map_err(RenderError::InvalidRequest)?;

        let invoice_id = generate_invoice_id();
        let issue_date = today();
        let file_name = derive_file_name(&invoice_id, &request.customer_name);
        let path = self.output_dir.join(&file_name);

        let meta = InvoiceMeta {
            invoice_id: &invoice_id,
            issue_date,
            currency_symbol: &self.currency_symbol,
        };
        let lines = layout_invoice(&request, &meta);

        let bytes = PdfRenderEngine::render_to_file(
            &path,
            invoice_id.clone(),
            lines,
            self.font_path.clone(),
        )
        .await?;

        log::debug!("Rendered {} ({} bytes) to {}", invoice_id, bytes.len(), path.display());

        Ok(RenderedInvoice {
            invoice_id,
            issue_date,
            file_name,
            path,
            bytes,
        })
    }
}

#[async_trait]
impl Generator<InvoiceRequest> for InvoiceGenerator {
    async fn generate(&self, request: InvoiceRequest) -> Result<RenderedInvoice, RenderError> {
        self.render(request).await
    }
}
