use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};

use billgen_billing::{BillRequest, BillStatus, Product, ProductDraft};
use billgen_client::{BillApi, ClientError, ClientSettings, HttpBillClient, to_dto};
use billgen_core::BillId;

#[derive(Clone, Default)]
struct Backend {
    submitted: Arc<Mutex<Vec<Value>>>,
}

struct TestServer {
    base_url: String,
    backend: Backend,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let backend = Backend::default();
        let app = Router::new()
            .route("/api/bills", post(create_bill).get(list_bills))
            .route("/api/bills/:id", get(get_bill))
            .route("/api/bills/:id/available", get(available))
            .route("/api/bills/:id/download", get(download))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            backend,
            handle,
        }
    }

    fn client(&self) -> HttpBillClient {
        HttpBillClient::new(&ClientSettings::default().with_base_url(&self.base_url)).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_bill(State(backend): State<Backend>, axum::Json(body): axum::Json<Value>) -> impl IntoResponse {
    backend.submitted.lock().unwrap().push(body);
    axum::Json(json!({ "id": 42 }))
}

async fn get_bill(Path(id): Path<u64>) -> axum::response::Response {
    match id {
        42 => axum::Json(json!({
            "id": 42,
            "user": "ana",
            "title": "March",
            "created_at": "2024-03-01T10:00:00Z",
            "is_available": true,
            "error": false
        }))
        .into_response(),
        7 => axum::Json(json!({
            "id": 7,
            "user": "ana",
            "title": "Broken",
            "created_at": "2024-03-01T10:00:00",
            "is_available": false,
            "error": true,
            "error_msg": "render failed"
        }))
        .into_response(),
        13 => (StatusCode::OK, "{\"id\": \"thirteen\"}").into_response(),
        _ => (StatusCode::NOT_FOUND, "no such bill").into_response(),
    }
}

async fn available(Path(id): Path<u64>) -> impl IntoResponse {
    axum::Json(json!({ "available": id == 42 }))
}

async fn list_bills(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let bills = if params.get("user").map(String::as_str) == Some("ana lópez") {
        json!([
            { "id": 1, "title": "January", "created_at": "2024-01-31T09:00:00Z" },
            { "id": 2, "title": "February", "created_at": "2024-02-29T09:00:00+01:00" }
        ])
    } else {
        json!([])
    };
    axum::Json(json!({ "bills": bills }))
}

async fn download(Path(id): Path<u64>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 bill {id}").into_bytes(),
    )
}

fn sample_request() -> BillRequest {
    let mut request = BillRequest::default();
    request.user = "ana".to_string();
    request.bill.title = "March".to_string();
    request.bill.seller = "Acme".to_string();
    request.bill.purchaser = "Globex".to_string();
    request.push_product(Product::new(ProductDraft::new("Desk", 120.0, 1.0)).unwrap());
    request
}

#[tokio::test]
async fn submit_posts_wire_shape_and_returns_id() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let id = client.submit_bill(&to_dto(&sample_request())).await.unwrap();
    assert_eq!(id, BillId::new(42));

    let submitted = srv.backend.submitted.lock().unwrap().clone();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0]["user"], json!("ana"));
    assert_eq!(submitted[0]["config"]["paper_size"], json!("a4paper"));
    assert_eq!(submitted[0]["bill"]["products"][0]["name"], json!("Desk"));
}

#[tokio::test]
async fn get_bill_decodes_available_record() {
    let srv = TestServer::spawn().await;
    let bill = srv.client().get_bill(BillId::new(42)).await.unwrap();
    assert_eq!(bill.status(), BillStatus::Available);
    assert_eq!(bill.title, "March");
}

#[tokio::test]
async fn business_error_is_a_normal_result() {
    let srv = TestServer::spawn().await;
    let bill = srv.client().get_bill(BillId::new(7)).await.unwrap();
    assert_eq!(bill.status(), BillStatus::Failed("render failed".to_string()));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let srv = TestServer::spawn().await;
    let err = srv.client().get_bill(BillId::new(999)).await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Status {
            status: 404,
            body: "no such bill".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let srv = TestServer::spawn().await;
    let err = srv.client().get_bill(BillId::new(13)).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn availability_endpoint() {
    let srv = TestServer::spawn().await;
    let client = srv.client();
    assert!(client.check_availability(BillId::new(42)).await.unwrap());
    assert!(!client.check_availability(BillId::new(5)).await.unwrap());
}

#[tokio::test]
async fn list_bills_passes_user_as_query() {
    let srv = TestServer::spawn().await;
    let client = srv.client();

    let bills = client.list_bills("ana lópez").await.unwrap();
    let titles: Vec<&str> = bills.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["January", "February"]);
    assert_eq!(bills[1].created_at.to_rfc3339(), "2024-02-29T08:00:00+00:00");

    assert!(client.list_bills("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn download_returns_raw_bytes() {
    let srv = TestServer::spawn().await;
    let bytes = srv.client().download_bill(BillId::new(42)).await.unwrap();
    assert_eq!(bytes, b"%PDF-1.4 bill 42");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpBillClient::new(&ClientSettings::default().with_base_url(format!("http://{addr}")))
            .unwrap();
    let err = client.get_bill(BillId::new(1)).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
    assert_eq!(err.user_message(), "Server unreachable");
}
