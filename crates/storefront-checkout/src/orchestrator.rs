use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use storefront_api::{OrderSubmission, OrderSubmissionItem};
use storefront_core::OrderStatus;
use storefront_state::{Cart, CartStorage, CartStore};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::CheckoutError;
use crate::gateway::OrderGateway;

/// Where a checkout attempt currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Confirmed,
    Failed,
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::Validating => "validating",
            CheckoutPhase::Submitting => "submitting",
            CheckoutPhase::Confirmed => "confirmed",
            CheckoutPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// What the confirmation view receives after a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfirmation {
    pub order_id: String,
    /// The total of the submitted cart snapshot.
    pub total: Decimal,
    pub item_count: u64,
    pub status: Option<OrderStatus>,
}

/// Freeze the cart into an order-creation request with a fresh request id.
#[must_use]
pub fn build_submission(cart: &Cart) -> OrderSubmission {
    OrderSubmission {
        request_id: Uuid::new_v4(),
        items: cart
            .items()
            .iter()
            .map(|line| OrderSubmissionItem {
                product_id: line.id.clone(),
                name: line.name.clone(),
                price: line.unit_price,
                quantity: line.quantity,
                image: line.image_ref.clone(),
            })
            .collect(),
        total: cart.total_price(),
    }
}

/// Runs checkout attempts against an [`OrderGateway`].
///
/// `checkout` borrows the [`CartStore`] mutably for the whole attempt, so no
/// other cart mutation can run while the order is being submitted.
pub struct CheckoutOrchestrator<G> {
    gateway: G,
    timeout: Duration,
    phase: Arc<watch::Sender<CheckoutPhase>>,
    last_outcome: Option<CheckoutPhase>,
}

impl<G: OrderGateway> CheckoutOrchestrator<G> {
    pub fn new(gateway: G, timeout: Duration) -> Self {
        let (phase, _) = watch::channel(CheckoutPhase::Idle);
        Self {
            gateway,
            timeout,
            phase: Arc::new(phase),
            last_outcome: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        *self.phase.borrow()
    }

    /// Follow phase changes while `checkout` is running, e.g. to show a
    /// progress indicator.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CheckoutPhase> {
        self.phase.subscribe()
    }

    /// `Confirmed` or `Failed` for the previous attempt; `None` before any.
    #[must_use]
    pub fn last_outcome(&self) -> Option<CheckoutPhase> {
        self.last_outcome
    }

    /// Submit the cart as an order.
    ///
    /// The cart is cleared only when the gateway returns an order id. On
    /// every error the cart is left exactly as it was. Dropping the returned
    /// future before the response arrives also leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] or [`CheckoutError::NotAuthenticated`]
    ///   before any network call.
    /// - [`CheckoutError::Timeout`] when the gateway does not answer within
    ///   the configured timeout.
    /// - [`CheckoutError::Rejected`], [`CheckoutError::Transport`] or
    ///   [`CheckoutError::MalformedResponse`] when submission fails.
    pub async fn checkout<S: CartStorage>(
        &mut self,
        store: &mut CartStore<S>,
        bearer: Option<&str>,
    ) -> Result<CheckoutConfirmation, CheckoutError> {
        let mut guard = AttemptGuard {
            phase: Arc::clone(&self.phase),
            finished: false,
        };

        let result = self.attempt(store, bearer).await;
        let outcome = match &result {
            Ok(confirmation) => {
                tracing::info!(
                    order_id = %confirmation.order_id,
                    total = %confirmation.total,
                    items = confirmation.item_count,
                    "order placed"
                );
                CheckoutPhase::Confirmed
            }
            Err(e) => {
                tracing::warn!(error = %e, "checkout failed; cart left unchanged");
                CheckoutPhase::Failed
            }
        };

        transition(&self.phase, outcome);
        self.last_outcome = Some(outcome);
        transition(&self.phase, CheckoutPhase::Idle);
        guard.finished = true;
        result
    }

    async fn attempt<S: CartStorage>(
        &self,
        store: &mut CartStore<S>,
        bearer: Option<&str>,
    ) -> Result<CheckoutConfirmation, CheckoutError> {
        transition(&self.phase, CheckoutPhase::Validating);
        if store.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(CheckoutError::NotAuthenticated)?;

        let submission = build_submission(store.cart());
        let item_count = store.cart().total_item_count();

        transition(&self.phase, CheckoutPhase::Submitting);
        let created = tokio::time::timeout(
            self.timeout,
            self.gateway.create_order(token, &submission),
        )
        .await
        .map_err(|_| CheckoutError::Timeout {
            after: self.timeout,
        })?
        .map_err(|e| CheckoutError::from_api(e, self.timeout))?;

        let order_id = created.id.trim();
        if order_id.is_empty() {
            return Err(CheckoutError::MalformedResponse(
                "order response carried a blank id".to_string(),
            ));
        }
        if let Some(server_total) = created.total {
            if server_total != submission.total {
                tracing::warn!(
                    order_id,
                    submitted = %submission.total,
                    server = %server_total,
                    "server order total differs from submitted cart total"
                );
            }
        }

        store.clear();
        if !store.persistence_healthy() {
            tracing::warn!(order_id, "order placed but the emptied cart could not be saved");
        }

        Ok(CheckoutConfirmation {
            order_id: order_id.to_string(),
            total: submission.total,
            item_count,
            status: created.status,
        })
    }
}

fn transition(phase: &watch::Sender<CheckoutPhase>, to: CheckoutPhase) {
    let from = phase.send_replace(to);
    tracing::debug!(%from, %to, "checkout phase");
}

/// Puts the phase back to `Idle` if a checkout future is dropped mid-attempt.
struct AttemptGuard {
    phase: Arc<watch::Sender<CheckoutPhase>>,
    finished: bool,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("checkout abandoned before the order response; cart left unchanged");
            transition(&self.phase, CheckoutPhase::Idle);
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
