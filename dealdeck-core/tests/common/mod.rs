//! Test helpers shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use dealdeck_core::catalog::{DealDetail, DealRecord, GameInfo, StoreOffer};
use dealdeck_core::gateway::DealsGateway;
use dealdeck_core::view::{ChannelView, ViewEvent};
use dealdeck_core::TransportError;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, Once};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::oneshot;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

pub type Response = Result<Vec<DealRecord>, TransportError>;
pub type DetailResponse = Result<DealDetail, TransportError>;

pub fn record(id: &str, store: &str, sale_price: i64) -> DealRecord {
    DealRecord {
        game_id: id.to_string(),
        title: format!("Game {id}"),
        thumb: format!("https://example.com/{id}.jpg"),
        store_id: store.to_string(),
        sale_price: Decimal::from(sale_price),
        normal_price: Decimal::from(sale_price * 2),
        savings: Decimal::from(50),
        steam_rating_percent: None,
        deal_id: None,
        steam_rating_text: None,
    }
}

pub fn records(count: usize) -> Vec<DealRecord> {
    (0..count)
        .map(|i| record(&format!("g{i}"), "1", i as i64 + 1))
        .collect()
}

pub fn detail(title: &str) -> DealDetail {
    DealDetail {
        info: GameInfo {
            title: title.to_string(),
            thumb: String::new(),
            steam_app_id: Some("400".to_string()),
        },
        deals: vec![StoreOffer {
            store_id: "1".to_string(),
            deal_id: None,
            price: Decimal::from(5),
            retail_price: Decimal::from(20),
            savings: Decimal::from(75),
        }],
    }
}

pub fn transport_error() -> TransportError {
    TransportError::new("https://deals.test/deals", "HTTP 503 Service Unavailable")
}

/// Scripted gateway
///
/// Responses are keyed by store id (listings), search term or game id.
/// A term registered with [`FakeGateway::gate_search`] (or a game id with
/// [`FakeGateway::gate_detail`]) blocks until the test releases it, so tests
/// control the order in which responses land.
#[derive(Default)]
pub struct FakeGateway {
    listings: Mutex<HashMap<String, Response>>,
    searches: Mutex<HashMap<String, Response>>,
    details: Mutex<HashMap<String, DetailResponse>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<Response>>>,
    detail_gates: Mutex<HashMap<String, oneshot::Receiver<DetailResponse>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(self, store_id: &str, response: Response) -> Self {
        self.listings
            .lock()
            .unwrap()
            .insert(store_id.to_string(), response);
        self
    }

    pub fn with_search(self, term: &str, response: Response) -> Self {
        self.searches
            .lock()
            .unwrap()
            .insert(term.to_string(), response);
        self
    }

    pub fn with_detail(self, game_id: &str, response: DetailResponse) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(game_id.to_string(), response);
        self
    }

    /// Hold back the response to `term` until the returned sender fires
    pub fn gate_search(&self, term: &str) -> oneshot::Sender<Response> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(term.to_string(), rx);
        tx
    }

    /// Hold back the detail for `game_id` until the returned sender fires
    pub fn gate_detail(&self, game_id: &str) -> oneshot::Sender<DetailResponse> {
        let (tx, rx) = oneshot::channel();
        self.detail_gates
            .lock()
            .unwrap()
            .insert(game_id.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn has_call(&self, call: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == call)
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DealsGateway for FakeGateway {
    async fn list_deals(&self, store_id: &str, limit: usize) -> Response {
        self.record_call(format!("list:{store_id}:{limit}"));
        self.listings
            .lock()
            .unwrap()
            .get(store_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn search_by_title(&self, term: &str, limit: usize) -> Response {
        self.record_call(format!("search:{term}:{limit}"));

        let gate = self.gates.lock().unwrap().remove(term);
        if let Some(gate) = gate {
            return gate.await.unwrap_or_else(|_| Err(transport_error()));
        }

        self.searches
            .lock()
            .unwrap()
            .get(term)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_detail(&self, game_id: &str) -> DetailResponse {
        self.record_call(format!("detail:{game_id}"));

        let gate = self.detail_gates.lock().unwrap().remove(game_id);
        if let Some(gate) = gate {
            return gate.await.unwrap_or_else(|_| Err(transport_error()));
        }

        self.details
            .lock()
            .unwrap()
            .get(game_id)
            .cloned()
            .unwrap_or_else(|| Err(transport_error()))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// A channel-backed view plus the receiving end
pub fn channel_view() -> (ChannelView, UnboundedReceiver<ViewEvent>) {
    let (tx, rx) = unbounded_channel();
    (ChannelView::new(tx), rx)
}

/// Collect every event emitted so far
pub fn drain(rx: &mut UnboundedReceiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// The events that decide what the page shows, without loading toggles
pub fn rendered(events: &[ViewEvent]) -> Vec<ViewEvent> {
    events
        .iter()
        .filter(|event| !matches!(event, ViewEvent::Loading(_)))
        .cloned()
        .collect()
}

pub fn ids(records: &[DealRecord]) -> Vec<String> {
    records.iter().map(|r| r.game_id.clone()).collect()
}
