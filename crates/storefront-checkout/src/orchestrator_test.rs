use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use storefront_api::{ApiError, CreatedOrder};
use storefront_state::{MemoryStorage, ProductDescriptor};

use super::*;
use crate::error::FALLBACK_MESSAGE;

#[derive(Debug, Clone)]
enum Reply {
    Created { id: &'static str, total: Option<Decimal> },
    Status(u16, Option<&'static str>),
    Malformed,
}

#[derive(Clone)]
struct FakeGateway {
    reply: Reply,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<(String, OrderSubmission)>>>,
}

impl FakeGateway {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_submission(&self) -> (String, OrderSubmission) {
        self.seen.lock().unwrap().last().cloned().expect("no submission recorded")
    }
}

impl OrderGateway for FakeGateway {
    fn create_order(
        &self,
        token: &str,
        submission: &OrderSubmission,
    ) -> impl Future<Output = Result<CreatedOrder, ApiError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((token.to_string(), submission.clone()));
        let reply = self.reply.clone();
        let delay = self.delay;
        async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match reply {
                Reply::Created { id, total } => Ok(CreatedOrder {
                    id: id.to_string(),
                    status: Some(OrderStatus::Pending),
                    total,
                }),
                Reply::Status(status, message) => Err(ApiError::Status {
                    status,
                    message: message.map(str::to_string),
                }),
                Reply::Malformed => Err(ApiError::Malformed {
                    context: "POST /api/orders".to_string(),
                    reason: "order has no _id".to_string(),
                }),
            }
        }
    }
}

fn product(id: &str, price: i64) -> ProductDescriptor {
    ProductDescriptor::new(
        id,
        format!("Product {id}"),
        Decimal::from(price),
        format!("{id}.png"),
        None,
    )
    .unwrap()
}

fn store_with(lines: &[(&str, i64, i64)]) -> (CartStore<MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let mut store = CartStore::open(storage.clone());
    for (id, price, qty) in lines {
        store.add_item(&product(id, *price), Some(*qty));
    }
    (store, storage)
}

fn orchestrator(gateway: FakeGateway) -> CheckoutOrchestrator<FakeGateway> {
    CheckoutOrchestrator::new(gateway, Duration::from_secs(5))
}

#[tokio::test]
async fn empty_cart_makes_no_network_call() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None });
    let mut orch = orchestrator(gateway.clone());
    let (mut store, _) = store_with(&[]);

    let err = orch.checkout(&mut store, Some("tok")).await.unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(gateway.calls(), 0);
    assert!(store.cart().is_empty());
    assert_eq!(orch.phase(), CheckoutPhase::Idle);
    assert_eq!(orch.last_outcome(), Some(CheckoutPhase::Failed));
}

#[tokio::test]
async fn missing_or_blank_token_is_rejected_before_submission() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None });
    let mut orch = orchestrator(gateway.clone());
    let (mut store, _) = store_with(&[("B", 20, 1)]);
    let before = store.cart().clone();

    let err = orch.checkout(&mut store, None).await.unwrap_err();
    assert!(matches!(err, CheckoutError::NotAuthenticated));
    assert!(err.requires_login());

    let err = orch.checkout(&mut store, Some("   ")).await.unwrap_err();
    assert!(matches!(err, CheckoutError::NotAuthenticated));

    assert_eq!(gateway.calls(), 0);
    assert_eq!(store.cart(), &before);
}

#[tokio::test]
async fn server_error_leaves_cart_intact() {
    let gateway = FakeGateway::new(Reply::Status(500, None));
    let mut orch = orchestrator(gateway.clone());
    let (mut store, storage) = store_with(&[("B", 20, 1)]);
    let before = store.cart().clone();
    let saved_before = storage.raw();

    let err = orch.checkout(&mut store, Some("tok")).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Rejected { status: 500, .. }));
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    assert_eq!(store.cart(), &before);
    assert_eq!(storage.raw(), saved_before, "durable copy must not change");
    assert_eq!(gateway.calls(), 1, "no automatic retry");
    assert_eq!(orch.last_outcome(), Some(CheckoutPhase::Failed));
}

#[tokio::test]
async fn server_message_is_surfaced() {
    let gateway = FakeGateway::new(Reply::Status(400, Some("Product B is out of stock")));
    let mut orch = orchestrator(gateway);
    let (mut store, _) = store_with(&[("B", 20, 1)]);

    let err = orch.checkout(&mut store, Some("tok")).await.unwrap_err();

    assert_eq!(err.user_message(), "Product B is out of stock");
    assert_eq!(store.cart().len(), 1);
}

#[tokio::test]
async fn success_clears_cart_and_confirms() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None });
    let mut orch = orchestrator(gateway.clone());
    let (mut store, storage) = store_with(&[("B", 20, 1)]);

    let confirmation = orch.checkout(&mut store, Some("tok")).await.unwrap();

    assert_eq!(confirmation.order_id, "X");
    assert_eq!(confirmation.total, Decimal::from(20));
    assert_eq!(confirmation.item_count, 1);
    assert_eq!(confirmation.status, Some(OrderStatus::Pending));
    assert!(store.cart().is_empty());
    let raw = storage.raw().expect("cart saved");
    assert!(raw.contains(r#""items":[]"#), "empty cart persisted: {raw}");
    assert_eq!(orch.phase(), CheckoutPhase::Idle);
    assert_eq!(orch.last_outcome(), Some(CheckoutPhase::Confirmed));
}

#[tokio::test]
async fn submission_is_a_snapshot_of_the_cart() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None });
    let mut orch = orchestrator(gateway.clone());
    let (mut store, _) = store_with(&[("A", 10, 2), ("B", 20, 1)]);

    orch.checkout(&mut store, Some(" tok ")).await.unwrap();

    let (token, submission) = gateway.last_submission();
    assert_eq!(token, "tok");
    assert_eq!(submission.total, Decimal::from(40));
    assert_eq!(submission.items.len(), 2);
    assert_eq!(submission.items[0].product_id, "A");
    assert_eq!(submission.items[0].quantity, 2);
    assert_eq!(submission.items[0].price, Decimal::from(10));
    assert_eq!(submission.items[0].image, "A.png");
    assert_eq!(submission.items[1].name, "Product B");
}

#[tokio::test]
async fn confirmation_total_is_the_submitted_total() {
    let gateway = FakeGateway::new(Reply::Created {
        id: "X",
        total: Some(Decimal::from(25)),
    });
    let mut orch = orchestrator(gateway);
    let (mut store, _) = store_with(&[("B", 20, 1)]);

    let confirmation = orch.checkout(&mut store, Some("tok")).await.unwrap();

    assert_eq!(confirmation.total, Decimal::from(20));
}

#[tokio::test]
async fn malformed_response_leaves_cart_intact() {
    let gateway = FakeGateway::new(Reply::Malformed);
    let mut orch = orchestrator(gateway);
    let (mut store, _) = store_with(&[("B", 20, 1)]);
    let before = store.cart().clone();

    let err = orch.checkout(&mut store, Some("tok")).await.unwrap_err();

    assert!(matches!(err, CheckoutError::MalformedResponse(_)));
    assert_eq!(store.cart(), &before);
}

#[tokio::test]
async fn blank_order_id_is_malformed() {
    let gateway = FakeGateway::new(Reply::Created { id: "  ", total: None });
    let mut orch = orchestrator(gateway);
    let (mut store, _) = store_with(&[("B", 20, 1)]);

    let err = orch.checkout(&mut store, Some("tok")).await.unwrap_err();

    assert!(matches!(err, CheckoutError::MalformedResponse(_)));
    assert_eq!(store.cart().len(), 1);
}

#[tokio::test]
async fn timeout_is_a_failed_outcome() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None })
        .with_delay(Duration::from_secs(30));
    let mut orch = CheckoutOrchestrator::new(gateway, Duration::from_millis(50));
    let (mut store, _) = store_with(&[("B", 20, 1)]);
    let before = store.cart().clone();

    let err = orch.checkout(&mut store, Some("tok")).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Timeout { .. }));
    assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    assert_eq!(store.cart(), &before);
    assert_eq!(orch.last_outcome(), Some(CheckoutPhase::Failed));
}

#[tokio::test]
async fn phase_is_submitting_while_waiting_for_the_server() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None })
        .with_delay(Duration::from_millis(50));
    let mut orch = orchestrator(gateway);
    let mut phases = orch.subscribe();
    let (mut store, _) = store_with(&[("B", 20, 1)]);

    let (result, saw_submitting) = tokio::join!(orch.checkout(&mut store, Some("tok")), async {
        phases
            .wait_for(|p| *p == CheckoutPhase::Submitting)
            .await
            .is_ok()
    });

    assert!(result.is_ok());
    assert!(saw_submitting);
}

#[tokio::test]
async fn dropped_checkout_leaves_cart_untouched() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None })
        .with_delay(Duration::from_secs(30));
    let mut orch = orchestrator(gateway.clone());
    let (mut store, _) = store_with(&[("B", 20, 1)]);
    let before = store.cart().clone();

    let abandoned = tokio::time::timeout(
        Duration::from_millis(20),
        orch.checkout(&mut store, Some("tok")),
    )
    .await;

    assert!(abandoned.is_err(), "checkout should still have been pending");
    assert_eq!(gateway.calls(), 1);
    assert_eq!(store.cart(), &before);
    assert_eq!(orch.phase(), CheckoutPhase::Idle);
    assert_eq!(orch.last_outcome(), None);
}

#[tokio::test]
async fn failed_save_after_confirmation_still_confirms() {
    let gateway = FakeGateway::new(Reply::Created { id: "X", total: None });
    let mut orch = orchestrator(gateway);
    let (mut store, storage) = store_with(&[("B", 20, 1)]);
    storage.set_fail_saves(true);

    let confirmation = orch.checkout(&mut store, Some("tok")).await.unwrap();

    assert_eq!(confirmation.order_id, "X");
    assert!(store.cart().is_empty());
    assert!(!store.persistence_healthy());
}

#[tokio::test]
async fn retry_after_failure_resubmits_same_cart() {
    let (mut store, _) = store_with(&[("B", 20, 1)]);

    let failing = FakeGateway::new(Reply::Status(503, None));
    let mut orch = orchestrator(failing);
    assert!(orch.checkout(&mut store, Some("tok")).await.is_err());

    let ok = FakeGateway::new(Reply::Created { id: "Y", total: None });
    let mut orch = orchestrator(ok.clone());
    let confirmation = orch.checkout(&mut store, Some("tok")).await.unwrap();

    assert_eq!(confirmation.order_id, "Y");
    assert_eq!(ok.last_submission().1.total, Decimal::from(20));
}
