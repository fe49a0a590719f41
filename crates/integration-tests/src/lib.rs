//! Integration tests for the Movenpick ordering client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p movenpick-integration-tests
//! ```
//!
//! No external services are needed. [`FakeSite`] serves the PHP endpoints
//! the client talks to from an in-process axum router on an ephemeral port.
//!
//! # Test Categories
//!
//! - `checkout` - Order submission over HTTP
//! - `auth` - Login, signup and logout
//! - `translations` - Catalogue loading and English fallback

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use movenpick_storefront::config::StorefrontConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Path prefix the fake site is mounted under.
pub const SITE_PREFIX: &str = "/movenpick";

/// How the fake order endpoint answers.
#[derive(Debug, Clone)]
pub enum OrderReply {
    /// `{success: true, orderNumber}`; the number may be a string or integer.
    Accept(Value),
    /// `{success: false, error?}`.
    Reject(Option<String>),
    /// HTTP 200 with a non-JSON body.
    Garbage,
    /// Given status with the given raw body.
    Status(u16, String),
}

/// A registered account on the fake site.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Mutable behaviour and request log of a [`FakeSite`].
#[derive(Debug)]
pub struct SiteState {
    pub order_reply: OrderReply,
    pub order_delay: Option<Duration>,
    pub orders: Vec<HashMap<String, String>>,
    pub accounts: Vec<Account>,
    pub auth_requests: usize,
    pub translations: HashMap<String, Value>,
    pub translation_requests: Vec<String>,
}

impl Default for SiteState {
    fn default() -> Self {
        Self {
            order_reply: OrderReply::Accept(json!("MVP-0001")),
            order_delay: None,
            orders: Vec::new(),
            accounts: Vec::new(),
            auth_requests: 0,
            translations: HashMap::new(),
            translation_requests: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<SiteState>>;

fn lock(state: &Shared) -> std::sync::MutexGuard<'_, SiteState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process stand-in for the restaurant's PHP backend.
pub struct FakeSite {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeSite {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start(initial: SiteState) -> Self {
        let state: Shared = Arc::new(Mutex::new(initial));

        let site = Router::new()
            .route("/orders/place_order.php", post(place_order))
            .route("/auth/login.php", post(login))
            .route("/auth/signup.php", post(signup))
            .route("/{file}", get(translation_file))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest(SITE_PREFIX, site);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Site base URL, ending in `/`.
    ///
    /// # Panics
    ///
    /// Never in practice; the address is always a valid URL.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}{SITE_PREFIX}/", self.addr)).unwrap()
    }

    /// Client configuration pointing at this site.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        let base = self.base_url().to_string();
        StorefrontConfig::from_lookup(|key| match key {
            "MOVENPICK_BASE_URL" => Some(base.clone()),
            _ => None,
        })
        .unwrap()
    }

    /// Inspect or change the site's behaviour.
    pub fn with<T>(&self, f: impl FnOnce(&mut SiteState) -> T) -> T {
        f(&mut lock(&self.state))
    }

    /// Orders received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<HashMap<String, String>> {
        self.with(|s| s.orders.clone())
    }

    /// Stop serving. Later requests fail to connect.
    pub async fn shutdown(self) {
        self.server.abort();
        let _ = self.server.await;
    }
}

async fn place_order(
    State(state): State<Shared>,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    let (reply, delay) = {
        let mut site = lock(&state);
        site.orders.push(fields);
        (site.order_reply.clone(), site.order_delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match reply {
        OrderReply::Accept(number) => Json(json!({"success": true, "orderNumber": number})).into_response(),
        OrderReply::Reject(error) => {
            let mut body = json!({"success": false});
            if let Some(error) = error {
                body["error"] = Value::String(error);
            }
            Json(body).into_response()
        }
        OrderReply::Garbage => "<b>Fatal error</b>: Uncaught mysqli_sql_exception".into_response(),
        OrderReply::Status(code, body) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
    }
}

fn user_json(account: &Account) -> Value {
    json!({"id": account.id.to_string(), "name": account.name, "email": account.email})
}

async fn login(
    State(state): State<Shared>,
    Form(fields): Form<HashMap<String, String>>,
) -> Json<Value> {
    let mut site = lock(&state);
    site.auth_requests += 1;
    let email = fields.get("email").map_or("", String::as_str);
    let password = fields.get("password").map_or("", String::as_str);

    let body = site
        .accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
        .map_or_else(
            || json!({"success": false, "error": "Invalid email or password"}),
            |a| json!({"success": true, "user": user_json(a)}),
        );
    Json(body)
}

async fn signup(
    State(state): State<Shared>,
    Form(fields): Form<HashMap<String, String>>,
) -> Json<Value> {
    let mut site = lock(&state);
    site.auth_requests += 1;
    let field = |name: &str| fields.get(name).cloned().unwrap_or_default();
    let email = field("email");

    if site.accounts.iter().any(|a| a.email == email) {
        return Json(json!({"success": false, "error": "Email already registered"}));
    }

    let account = Account {
        id: i64::try_from(site.accounts.len() + 1).unwrap_or(i64::MAX),
        name: field("name"),
        email,
        password: field("password"),
    };
    let body = json!({"success": true, "user": user_json(&account)});
    site.accounts.push(account);
    Json(body)
}

async fn translation_file(State(state): State<Shared>, Path(file): Path<String>) -> Response {
    let mut site = lock(&state);
    site.translation_requests.push(file.clone());

    let lang = file
        .strip_prefix("about-")
        .and_then(|rest| rest.strip_suffix(".json"));
    match lang.and_then(|lang| site.translations.get(lang)) {
        Some(catalog) => Json(catalog.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
