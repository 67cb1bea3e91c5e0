//! Traits shared by request types and document generators.

use async_trait::async_trait;

use super::{RenderError, RenderedInvoice};

/// Trait for validating request objects.
pub trait Validator {
    /// Validate the state of the object.
    fn validate(&self) -> Result<(), String>;
}

/// Trait for document generators.
#[async_trait]
pub trait Generator<Req: Send + 'static> {
    /// Render the request into a finished document on temporary storage.
    async fn generate(&self, request: Req) -> Result<RenderedInvoice, RenderError>;
}
