use beerstock_api::app::{build_app, AppServices};
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/beers{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn brahma() -> Value {
    json!({
        "name": "Brahma",
        "brand": "Ambev",
        "max": 50,
        "quantity": 10,
        "type": "LAGER",
    })
}

async fn create(client: &reqwest::Client, server: &TestServer, body: &Value) -> reqwest::Response {
    client
        .post(server.url(""))
        .json(body)
        .send()
        .await
        .expect("create request failed")
}

async fn adjust(
    client: &reqwest::Client,
    server: &TestServer,
    id: i64,
    op: &str,
    quantity: i64,
) -> reqwest::Response {
    client
        .patch(server.url(&format!("/{id}/{op}")))
        .json(&json!({ "quantity": quantity }))
        .send()
        .await
        .expect("patch request failed")
}

#[tokio::test]
async fn health_check() {
    let server = TestServer::spawn().await;
    let resp = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_returns_the_stored_beer() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let resp = create(&client, &server, &brahma()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"id": 1, "name": "Brahma", "brand": "Ambev", "max": 50, "quantity": 10, "type": "LAGER"})
    );
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    assert_eq!(
        create(&client, &server, &brahma()).await.status(),
        StatusCode::CREATED
    );
    let resp = create(&client, &server, &brahma()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "already_registered");
    assert_eq!(
        body["message"],
        "Beer with name Brahma already registered in the system."
    );

    let all: Vec<Value> = client
        .get(server.url(""))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn invalid_create_bodies_are_bad_requests() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut missing_brand = brahma();
    missing_brand.as_object_mut().unwrap().remove("brand");

    let mut unknown_type = brahma();
    unknown_type["type"] = json!("PILSNER");

    let mut over_capacity = brahma();
    over_capacity["quantity"] = json!(60);

    let mut max_too_large = brahma();
    max_too_large["max"] = json!(501);

    for body in [missing_brand, unknown_type, over_capacity, max_too_large] {
        let resp = create(&client, &server, &body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"], "validation_error");
        assert_eq!(err["status"], 400);
        assert!(err["timestamp"].is_string());
    }

    let all: Vec<Value> = client
        .get(server.url(""))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn get_by_name() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &server, &brahma()).await;

    let found = client.get(server.url("/Brahma")).send().await.unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    let body: Value = found.json().await.unwrap();
    assert_eq!(body["brand"], "Ambev");

    let missing = client.get(server.url("/Skol")).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let err: Value = missing.json().await.unwrap();
    assert_eq!(err["message"], "Beer with name Skol not found in the system.");
}

#[tokio::test]
async fn list_is_empty_then_populated() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let empty: Vec<Value> = client
        .get(server.url(""))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(empty.is_empty());

    create(&client, &server, &brahma()).await;
    let mut skol = brahma();
    skol["name"] = json!("Skol");
    create(&client, &server, &skol).await;

    let all: Vec<Value> = client
        .get(server.url(""))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = all.iter().filter_map(|b| b["name"].as_str()).collect();
    assert_eq!(names, vec!["Brahma", "Skol"]);
}

#[tokio::test]
async fn delete_by_id() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &server, &brahma()).await;

    let resp = client.delete(server.url("/1")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let again = client.delete(server.url("/1")).send().await.unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let bad = client.delete(server.url("/abc")).send().await.unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let gone = client.get(server.url("/Brahma")).send().await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn increment_and_decrement_respect_bounds() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &server, &brahma()).await;

    let resp = adjust(&client, &server, 1, "increment", 10).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["quantity"], 20);

    let over = adjust(&client, &server, 1, "increment", 31).await;
    assert_eq!(over.status(), StatusCode::BAD_REQUEST);
    let err: Value = over.json().await.unwrap();
    assert_eq!(err["error"], "stock_exceeded");

    let resp = adjust(&client, &server, 1, "decrement", 20).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["quantity"], 0);

    let under = adjust(&client, &server, 1, "decrement", 1).await;
    assert_eq!(under.status(), StatusCode::BAD_REQUEST);
    let err: Value = under.json().await.unwrap();
    assert_eq!(err["error"], "stock_below_zero");

    let zero = adjust(&client, &server, 1, "increment", 0).await;
    assert_eq!(zero.status(), StatusCode::BAD_REQUEST);

    let unknown = adjust(&client, &server, 99, "increment", 1).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn brahma_stock_lifecycle() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create(&client, &server, &brahma()).await;

    let body: Value = adjust(&client, &server, 1, "increment", 30)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["quantity"], 40);

    let rejected = adjust(&client, &server, 1, "increment", 15).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    let err: Value = rejected.json().await.unwrap();
    assert_eq!(
        err["message"],
        "Beer with ID 1 has quantity greater than stock capacity. Quantity to increment 15"
    );

    let body: Value = adjust(&client, &server, 1, "decrement", 40)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["quantity"], 0);

    let rejected = adjust(&client, &server, 1, "decrement", 1).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let current: Value = client
        .get(server.url("/Brahma"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["quantity"], 0);
}
