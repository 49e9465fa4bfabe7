//! Integration tests for Market Eaze.
//!
//! Each test spawns the full storefront router on an ephemeral port with a
//! freshly seeded catalog and drives it over HTTP with a cookie-keeping
//! client, the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p market-eaze-integration-tests
//! ```

use std::net::SocketAddr;

use market_eaze_core::{Catalog, ProductId};
use market_eaze_storefront::{config::StorefrontConfig, state::AppState};
use reqwest::{Client, Response};

/// A storefront running in the background for one test.
pub struct TestServer {
    addr: SocketAddr,
    /// Shared with the running server, for inspecting the catalog.
    pub state: AppState,
    pub client: Client,
}

impl TestServer {
    /// Start a server holding the starter catalog.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn spawn() -> Self {
        Self::spawn_with(Catalog::seeded()).await
    }

    /// Start a server holding `catalog`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound or the client cannot be built.
    pub async fn spawn_with(catalog: Catalog) -> Self {
        let state = AppState::new(StorefrontConfig::default(), catalog);
        let app = market_eaze_storefront::app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            addr,
            state,
            client: Self::new_client(),
        }
    }

    /// A fresh client with its own cookie jar, i.e. another visitor.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn new_client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path`, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a form to `path`, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Units in stock for `id`, or `None` if it is not listed.
    pub async fn stock(&self, id: &str) -> Option<u32> {
        self.state
            .catalog()
            .await
            .find(&ProductId::new(id))
            .map(|p| p.quantity)
    }

    /// Log in as a buyer.
    ///
    /// # Panics
    ///
    /// Panics if the login does not land on the market.
    pub async fn login_buyer(&self) {
        let resp = self.post("/login", &[("role", "Buyer")]).await;
        assert_eq!(resp.url().path(), "/market", "buyer login should land on the market");
    }

    /// Log in as the vendor `username`.
    ///
    /// # Panics
    ///
    /// Panics if the login does not land on the stall.
    pub async fn login_vendor(&self, username: &str) {
        let resp = self
            .post("/login", &[("role", "Vendor"), ("username", username)])
            .await;
        assert_eq!(resp.url().path(), "/stall", "vendor login should land on the stall");
    }
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read.
pub async fn body(resp: Response) -> String {
    resp.text().await.expect("Failed to read response body")
}
