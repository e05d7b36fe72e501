use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use orders::{
    Config, FetchStatus, Identity, OrderFetcher, OrderHistory, OrdersClient, OutletFilter,
    history::HistoryView,
};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::Mutex, time::sleep};

#[derive(Default)]
struct FakeBackend {
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

fn orders_for(phone: &str) -> Value {
    json!([
        {
            "_id": format!("{phone}-old"),
            "outlet": "Kathi",
            "time": "2025-03-01T09:00:00Z",
            "status": "completed",
            "totalPrice": 200.0,
            "orders": [{ "_id": "l1", "food": "Paneer Roll", "price": 100.0, "quantity": 2 }]
        },
        {
            "_id": format!("{phone}-new"),
            "outlet": "southern",
            "time": "2025-03-02T13:30:00Z",
            "status": "pending",
            "totalPrice": 60.0,
            "orders": [{ "food": "Masala Dosa", "price": 60.0, "quantity": 1 }]
        }
    ])
}

async fn fetch_handler(State(backend): State<Arc<FakeBackend>>, Json(body): Json<Value>) -> Response {
    let phone = body["userPhone"].as_str().unwrap_or_default().to_string();

    let attempt = {
        let mut calls = backend.calls.lock().await;
        calls.push(phone.clone());
        calls.iter().filter(|p| **p == phone).count()
    };

    match phone.as_str() {
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "envelope" => Json(json!({ "error": "no such user" })).into_response(),
        "flaky" if attempt == 1 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "slow" => {
            sleep(Duration::from_millis(300)).await;
            Json(orders_for(&phone)).into_response()
        }
        _ => Json(orders_for(&phone)).into_response(),
    }
}

fn client_for(addr: SocketAddr) -> OrdersClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();

    OrdersClient::with_http(http, &Config::with_api_url(format!("http://{addr}")))
}

async fn spawn_backend() -> (Arc<FakeBackend>, OrdersClient) {
    let backend = Arc::new(FakeBackend::default());

    let app = Router::new()
        .route("/myorders/fetch", post(fetch_handler))
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (backend, client_for(addr))
}

fn order_ids(fetcher: &OrderFetcher) -> Vec<String> {
    fetcher.state().orders.into_iter().map(|o| o.id).collect()
}

#[tokio::test]
async fn fetches_once_with_normalized_phone() {
    let (backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    assert!(fetcher.observe(&Identity::with_phone("+919876543210")));
    fetcher.settle().await;

    assert!(!fetcher.observe(&Identity::with_phone("+919876543210")));
    fetcher.settle().await;

    assert_eq!(backend.calls().await, ["919876543210"]);
    assert_eq!(fetcher.state().status, FetchStatus::Loaded);
    assert_eq!(order_ids(&fetcher), ["919876543210-old", "919876543210-new"]);
}

#[tokio::test]
async fn waits_for_identity() {
    let (backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    assert!(!fetcher.observe(&Identity::loading()));
    assert!(!fetcher.observe(&Identity::signed_out()));
    fetcher.settle().await;

    assert!(backend.calls().await.is_empty());
    assert_eq!(fetcher.state().status, FetchStatus::Idle);

    assert!(fetcher.observe(&Identity::with_phone("+15550100")));
    fetcher.settle().await;

    assert_eq!(backend.calls().await, ["15550100"]);
}

#[tokio::test]
async fn refetches_on_new_phone() {
    let (backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    fetcher.observe(&Identity::with_phone("+111"));
    fetcher.settle().await;
    fetcher.observe(&Identity::with_phone("+222"));
    fetcher.settle().await;

    assert_eq!(backend.calls().await, ["111", "222"]);
    assert_eq!(order_ids(&fetcher), ["222-old", "222-new"]);
}

#[tokio::test]
async fn late_response_is_discarded() {
    let (_backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    fetcher.observe(&Identity::with_phone("slow"));
    fetcher.observe(&Identity::with_phone("+333"));
    fetcher.settle().await;

    sleep(Duration::from_millis(400)).await;

    assert_eq!(order_ids(&fetcher), ["333-old", "333-new"]);
}

#[tokio::test]
async fn dropped_fetcher_ignores_response() {
    let (_backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    fetcher.observe(&Identity::with_phone("slow"));
    let receiver = fetcher.subscribe();
    drop(fetcher);

    sleep(Duration::from_millis(400)).await;

    assert!(receiver.borrow().orders.is_empty());
    assert_eq!(receiver.borrow().status, FetchStatus::Loading);
}

#[tokio::test]
async fn network_failure_keeps_empty_list() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let mut history = OrderHistory::new(client_for(addr));
    let identity = Identity::with_phone("+919876543210");

    history.sync(&identity);
    history.settle().await;

    let state = history.fetcher().state();
    assert!(state.orders.is_empty());
    assert!(matches!(state.status, FetchStatus::Failed { retryable: true, .. }));

    let view = history.render(&identity, &mut StdRng::seed_from_u64(1));
    assert!(view.cards().is_empty());
    assert!(view.to_string().contains("No orders found."));
}

#[tokio::test]
async fn failure_keeps_previous_orders() {
    let (_backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    fetcher.observe(&Identity::with_phone("+444"));
    fetcher.settle().await;

    fetcher.observe(&Identity::with_phone("broken"));
    fetcher.settle().await;

    assert_eq!(order_ids(&fetcher), ["444-old", "444-new"]);
    assert!(matches!(fetcher.state().status, FetchStatus::Failed { retryable: true, .. }));

    fetcher.observe(&Identity::with_phone("envelope"));
    fetcher.settle().await;

    assert_eq!(order_ids(&fetcher), ["444-old", "444-new"]);
    assert!(matches!(fetcher.state().status, FetchStatus::Failed { retryable: false, .. }));
}

#[tokio::test]
async fn retry_after_failure() {
    let (backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    fetcher.observe(&Identity::with_phone("flaky"));
    fetcher.settle().await;
    assert!(matches!(fetcher.state().status, FetchStatus::Failed { .. }));

    assert!(fetcher.retry());
    fetcher.settle().await;

    assert_eq!(backend.calls().await, ["flaky", "flaky"]);
    assert_eq!(fetcher.state().status, FetchStatus::Loaded);
    assert_eq!(order_ids(&fetcher), ["flaky-old", "flaky-new"]);
}

#[tokio::test]
async fn history_renders_selected_outlet() {
    let (_backend, client) = spawn_backend().await;
    let mut history = OrderHistory::new(client);
    let identity = Identity::with_phone("+555");
    let mut rng = StdRng::seed_from_u64(9);

    assert_eq!(history.render(&Identity::loading(), &mut rng), HistoryView::Loading);

    history.sync(&identity);
    history.settle().await;

    let ids: Vec<String> = history.render(&identity, &mut rng).cards().iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, ["555-new", "555-old"]);

    history.select("southern".parse::<OutletFilter>().unwrap());
    let view = history.render(&identity, &mut rng);

    assert_eq!(view.cards().len(), 1);
    assert_eq!(view.cards()[0].heading, "SOUTHERN");
    assert!(view.to_string().contains("[Southern]"));
}

#[tokio::test]
async fn subscribers_see_loaded_orders() {
    let (_backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);
    let mut receiver = fetcher.subscribe();

    fetcher.observe(&Identity::with_phone("+666"));

    while receiver.borrow_and_update().status != FetchStatus::Loaded {
        receiver.changed().await.unwrap();
    }

    assert_eq!(receiver.borrow().orders.len(), 2);
}

#[tokio::test]
async fn sign_out_mid_flight_returns_to_idle() {
    let (_backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    fetcher.observe(&Identity::with_phone("slow"));
    assert!(!fetcher.observe(&Identity::signed_out()));
    fetcher.settle().await;

    sleep(Duration::from_millis(400)).await;

    let state = fetcher.state();
    assert_eq!(state.status, FetchStatus::Idle);
    assert!(state.orders.is_empty());
}

#[tokio::test]
async fn sign_out_mid_refetch_keeps_orders_loaded() {
    let (_backend, client) = spawn_backend().await;
    let mut fetcher = OrderFetcher::new(client);

    fetcher.observe(&Identity::with_phone("+777"));
    fetcher.settle().await;

    fetcher.observe(&Identity::with_phone("slow"));
    fetcher.observe(&Identity::signed_out());
    fetcher.settle().await;

    sleep(Duration::from_millis(400)).await;

    assert_eq!(fetcher.state().status, FetchStatus::Loaded);
    assert_eq!(order_ids(&fetcher), ["777-old", "777-new"]);
}
