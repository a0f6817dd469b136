use anyhow::{Context, Result};
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use rpg::{
    api::{self, AppState},
    auth::TokenConfig,
    store::MemoryStore,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::oneshot};

const SECRET: &str = "integration-test-secret-with-enough-bytes";

struct TestServer {
    base: String,
    client: Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start() -> Result<Self> {
        let tokens = TokenConfig::new(
            SecretString::from(SECRET.to_string()),
            Duration::from_secs(3600),
        )?;
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(&tokens, store.clone(), store)?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = api::serve(listener, state, async move {
                let _ = rx.await;
            })
            .await;
        });

        Ok(Self {
            base: format!("http://{addr}"),
            client: Client::new(),
            _shutdown: tx,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Ok((response.status(), response.json().await?))
    }

    async fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self
            .client
            .request(method, self.url(path))
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Ok((response.status(), response.json().await?))
    }

    async fn register_and_login(&self, username: &str, password: &str) -> Result<String> {
        let credentials = json!({ "username": username, "password": password });
        let (status, _) = self.post("/auth/register", &credentials).await?;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = self.post("/auth/login", &credentials).await?;
        assert_eq!(status, StatusCode::OK);
        body["data"]
            .as_str()
            .map(str::to_string)
            .context("login response without token")
    }
}

#[tokio::test]
async fn register_login_scenario() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server
        .post("/auth/register", &json!({ "username": "alice", "password": "pw1" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["data"].is_i64());
    assert_eq!(body["message"], Value::Null);

    let (status, body) = server
        .post("/auth/register", &json!({ "username": "alice", "password": "pw2" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"], Value::Null);

    let (status, body) = server
        .post("/auth/login", &json!({ "username": "alice", "password": "pw1" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_str().map(|t| t.split('.').count()), Some(3));
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], Value::Null);

    let (wrong_status, wrong) = server
        .post("/auth/login", &json!({ "username": "alice", "password": "wrong" }))
        .await?;
    let (unknown_status, unknown) = server
        .post("/auth/login", &json!({ "username": "nobody", "password": "pw1" }))
        .await?;
    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong, unknown);
    Ok(())
}

#[tokio::test]
async fn invalid_payloads_are_bad_requests() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server
        .client
        .post(server.url("/auth/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], json!(false));

    let (status, _) = server
        .post("/auth/register", &json!({ "username": "   ", "password": "pw" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn character_routes_require_a_valid_token() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.client.get(server.url("/character/GetAll")).send().await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await?;
    assert_eq!(
        body,
        json!({ "data": null, "success": false, "message": "Unauthorized." })
    );

    let token = server.register_and_login("alice", "pw1").await?;
    let mut tampered = token.clone().into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered)?;

    let (status, body) = server
        .authed(reqwest::Method::GET, "/character/GetAll", &tampered, None)
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Unauthorized."));

    let response = server
        .client
        .get(server.url("/character/GetAll"))
        .header(AUTHORIZATION, format!("Basic {token}"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn characters_are_scoped_to_their_owner() -> Result<()> {
    let server = TestServer::start().await?;
    let alice = server.register_and_login("alice", "pw1").await?;
    let bob = server.register_and_login("bob", "pw2").await?;

    let (status, body) = server
        .authed(
            reqwest::Method::POST,
            "/character",
            &alice,
            Some(&json!({ "name": "Frodo", "class": 1 })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    let alice_id = body["data"][0]["id"].as_i64().context("alice character id")?;
    assert!(body["data"][0].get("ownerId").is_none());

    let (status, body) = server
        .authed(
            reqwest::Method::POST,
            "/character",
            &bob,
            Some(&json!({ "name": "Sam", "class": 3 })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    let bob_id = body["data"][0]["id"].as_i64().context("bob character id")?;

    let (_, body) = server
        .authed(reqwest::Method::GET, "/character/GetAll", &bob, None)
        .await?;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .context("list")?
        .iter()
        .filter_map(|c| c["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![bob_id]);

    let path = format!("/character/{alice_id}");
    let (status, body) = server
        .authed(reqwest::Method::GET, &path, &bob, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Character not found."));

    let (status, _) = server
        .authed(reqwest::Method::DELETE, &path, &bob, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server
        .authed(
            reqwest::Method::PUT,
            "/character",
            &bob,
            Some(&json!({ "id": alice_id, "name": "Stolen" })),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server
        .authed(reqwest::Method::GET, &path, &alice, None)
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Frodo"));
    Ok(())
}

#[tokio::test]
async fn character_lifecycle() -> Result<()> {
    let server = TestServer::start().await?;
    let token = server.register_and_login("carol", "pw").await?;

    let (status, body) = server
        .authed(reqwest::Method::POST, "/character", &token, Some(&json!({})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let created = &body["data"][0];
    assert_eq!(created["name"], json!("Frodo"));
    assert_eq!(created["hitPoints"], json!(100));
    assert_eq!(created["strength"], json!(10));
    assert_eq!(created["class"], json!(1));
    let id = created["id"].as_i64().context("character id")?;

    let (status, body) = server
        .authed(
            reqwest::Method::PUT,
            "/character",
            &token,
            Some(&json!({ "id": id, "name": "Gandalf", "intelligence": 40, "class": 2 })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Gandalf"));
    assert_eq!(body["data"]["intelligence"], json!(40));
    assert_eq!(body["data"]["class"], json!(2));

    let (status, body) = server
        .authed(
            reqwest::Method::DELETE,
            &format!("/character/{id}"),
            &token,
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, _) = server
        .authed(reqwest::Method::GET, &format!("/character/{id}"), &token, None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn health_reports_build_and_store() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.client.get(server.url("/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-app"));
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await?;
    assert_eq!(body["name"], json!("rpg"));
    assert_eq!(body["store"], json!("ok"));

    let response = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/health"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
