//! Per-purchase notification fan-out.

mod template_renderer;

use std::sync::Arc;

use notification::{EmailMessage, NotificationClient};
use order_notifier_core::model::{Order, Purchase};
use snafu::{ensure, OptionExt, ResultExt, Snafu};

pub use self::template_renderer::{subject_for, TemplateRenderer};
use crate::service::{error, recipient_router::RecipientRouter};

/// Why a single purchase could not be notified.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PurchaseError {
    #[snafu(display("No valid recipients for purchase of product `{sku}`"))]
    Unroutable { sku: String },

    #[snafu(display("Failed to render email for product `{sku}`, error: {source}"))]
    Render { sku: String, source: tera::Error },

    #[snafu(display("Failed to send email for product `{sku}`, error: {source}"))]
    Transport { sku: String, source: notification::Error },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationOutcome {
    AllSucceeded,
    PartialSuccess,
    AllFailed,
}

impl NotificationOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllSucceeded => "all_succeeded",
            Self::PartialSuccess => "partial_success",
            Self::AllFailed => "all_failed",
        }
    }
}

/// Per-purchase results of one notification pass.
#[derive(Debug, Default)]
pub struct NotificationReport {
    delivered: usize,

    failures: Vec<PurchaseError>,
}

impl NotificationReport {
    #[inline]
    #[must_use]
    pub const fn delivered(&self) -> usize { self.delivered }

    #[inline]
    #[must_use]
    pub fn failures(&self) -> &[PurchaseError] { &self.failures }

    #[inline]
    #[must_use]
    pub fn total(&self) -> usize { self.delivered + self.failures.len() }

    #[must_use]
    pub fn outcome(&self) -> NotificationOutcome {
        if self.delivered == 0 {
            NotificationOutcome::AllFailed
        } else if self.failures.is_empty() {
            NotificationOutcome::AllSucceeded
        } else {
            NotificationOutcome::PartialSuccess
        }
    }

    fn push(&mut self, result: Result<(), PurchaseError>) {
        match result {
            Ok(()) => self.delivered += 1,
            Err(err) => self.failures.push(err),
        }
    }
}

/// Sends one templated email per purchase to the purchase's recipients.
#[derive(Clone)]
pub struct NotifierService {
    client: Arc<dyn NotificationClient>,

    router: RecipientRouter,

    renderer: TemplateRenderer,

    sender: String,
}

impl NotifierService {
    #[inline]
    #[must_use]
    pub fn new(
        client: Arc<dyn NotificationClient>,
        router: RecipientRouter,
        renderer: TemplateRenderer,
        sender: String,
    ) -> Self {
        Self { client, router, renderer, sender }
    }

    /// Notifies every purchase of `order` in order. A failed purchase never
    /// stops the remaining ones, and mail already sent is never recalled.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` has no purchases.
    pub async fn notify_all(&self, order: &Order) -> error::Result<NotificationReport> {
        ensure!(!order.purchases.is_empty(), error::NoPurchasesSnafu { order_id: order.id.clone() });

        let mut report = NotificationReport::default();

        for purchase in &order.purchases {
            let result = self.notify(order, purchase).await;
            match &result {
                Ok(()) => tracing::info!(
                    order_id = %order.id,
                    sku = %purchase.sku,
                    "Recipients notified for purchase of {}",
                    purchase.purchase_type
                ),
                Err(err) => tracing::warn!(order_id = %order.id, sku = %purchase.sku, "{err}"),
            }
            report.push(result);
        }

        Ok(report)
    }

    async fn notify(&self, order: &Order, purchase: &Purchase) -> Result<(), PurchaseError> {
        let recipients = self
            .router
            .recipients_for(&purchase.sku)
            .context(UnroutableSnafu { sku: purchase.sku.clone() })?;

        let html_body = self
            .renderer
            .render(order, purchase)
            .context(RenderSnafu { sku: purchase.sku.clone() })?;

        let email = EmailMessage {
            sender: self.sender.clone(),
            recipients: recipients.to_vec(),
            subject: subject_for(purchase),
            html_body,
        };

        self.client.send_email(&email).await.context(TransportSnafu { sku: purchase.sku.clone() })
    }
}
