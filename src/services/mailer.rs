//! Invoice mail dispatch
//!
//! Email delivery is an external collaborator; the engine only needs the
//! trait. A failed send never rolls back a confirmation, it only degrades
//! the reported outcome.

use async_trait::async_trait;

use crate::db::models::Invoice;
use crate::utils::AppResult;

#[async_trait]
pub trait InvoiceMailer: Send + Sync {
    async fn send_invoice(&self, to: &str, invoice: &Invoice) -> AppResult<()>;
}

/// Default mailer: records the dispatch in the log and succeeds
///
/// Deployments wire in an SMTP-backed implementation instead.
pub struct LogMailer;

#[async_trait]
impl InvoiceMailer for LogMailer {
    async fn send_invoice(&self, to: &str, invoice: &Invoice) -> AppResult<()> {
        tracing::info!(
            recipient = %to,
            invoice = %invoice.number,
            "Invoice email dispatched"
        );
        Ok(())
    }
}
