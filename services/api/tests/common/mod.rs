//! Shared harness: the full router over in-memory store and session backends.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use property_api::session::MemorySessionStore;
use property_api::store::{MemoryStore, Store};
use property_api::{router, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "longenough1";

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Value of the `sid` cookie if the response set or cleared it.
    pub session_cookie: Option<String>,
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub sessions: MemorySessionStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        Self::with_store(Arc::new(store.clone()), store)
    }

    /// Serve through `backend` while `store` still exposes the committed rows.
    pub fn with_store(backend: Arc<dyn Store>, store: MemoryStore) -> Self {
        let sessions = MemorySessionStore::new();
        let state = AppState::new(backend, Arc::new(sessions.clone()), Config::default());
        Self {
            router: router(state),
            store,
            sessions,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, format!("sid={session}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let session_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| value.strip_prefix("sid="))
            .map(|rest| rest.split(';').next().unwrap_or_default().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            body,
            session_cookie,
        }
    }

    pub async fn signup(&self, username: &str, email: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/v1/users",
            Some(json!({"username": username, "email": email, "password": PASSWORD})),
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/v1/auth",
            Some(json!({"email": email, "password": password})),
            None,
        )
        .await
    }

    /// Sign up and log in; returns the user id and session id.
    pub async fn manager(&self, username: &str, email: &str) -> (Uuid, String) {
        let created = self.signup(username, email).await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
        let user_id = id_of(&created.body);

        let login = self.login(email, PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);
        (user_id, login.session_cookie.expect("login sets a session cookie"))
    }

    pub async fn create_property(&self, session: &str, name: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/v1/properties",
                Some(json!({
                    "propertyName": name,
                    "address": "1 Rd",
                    "description": "d",
                    "type": "flat",
                    "numberOfRooms": 2
                })),
                Some(session),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    pub async fn add_tenant(&self, session: &str, property_id: Uuid, name: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/v1/tenants",
            Some(json!({
                "name": name,
                "email": format!("{}@tenants.test", name.to_lowercase()),
                "propertyId": property_id.to_string(),
                "phone": "555-0100"
            })),
            Some(session),
        )
        .await
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(|| panic!("no id in {body}"))
}
