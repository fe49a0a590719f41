//! Session state shared by every front end.

use std::sync::Arc;

use movenpick_core::CheckoutForm;

use crate::cart::{CartStore, CartView};
use crate::checkout::{CheckoutError, HttpOrderEndpoint, OrderConfirmation, OrderSubmitter};
use crate::config::StorefrontConfig;
use crate::i18n::TranslationClient;
use crate::menu::{Menu, MenuError};
use crate::preferences::{Language, Theme};
use crate::services::auth::AuthClient;
use crate::storage::{FileStorage, SharedStorage, StorageError};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("movenpick-client/", env!("CARGO_PKG_VERSION"));

/// Error creating the session state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Everything one client session needs.
///
/// Owns the single [`CartStore`]; views and the order submitter borrow it.
pub struct AppState {
    config: StorefrontConfig,
    storage: SharedStorage,
    cart: CartStore,
    submitter: OrderSubmitter<HttpOrderEndpoint>,
    auth: AuthClient,
    translations: TranslationClient,
}

impl AppState {
    /// Open the session with file storage under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let storage = Arc::new(FileStorage::open(&config.data_dir)?);
        Self::with_storage(config, storage)
    }

    /// Open the session on an existing storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or an endpoint
    /// URL is invalid.
    pub fn with_storage(config: StorefrontConfig, storage: SharedStorage) -> Result<Self, StateError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let cart = CartStore::load(Arc::clone(&storage), config.delivery_fee);
        let submitter = OrderSubmitter::new(HttpOrderEndpoint::new(http.clone(), &config.base_url)?);
        let auth = AuthClient::new(http.clone(), &config.base_url, Arc::clone(&storage))?;
        let translations = TranslationClient::new(http, config.base_url.clone());

        tracing::debug!(
            base_url = %config.base_url,
            items = cart.cart().len(),
            "Session opened"
        );

        Ok(Self {
            config,
            storage,
            cart,
            submitter,
            auth,
            translations,
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// A view subscribed to this session's cart and checkout button.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::new(&self.cart, self.submitter.busy_flag())
    }

    #[must_use]
    pub const fn submitter(&self) -> &OrderSubmitter<HttpOrderEndpoint> {
        &self.submitter
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthClient {
        &self.auth
    }

    #[must_use]
    pub const fn translations(&self) -> &TranslationClient {
        &self.translations
    }

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// See [`OrderSubmitter::submit`].
    pub async fn checkout(&mut self, form: &CheckoutForm) -> Result<OrderConfirmation, CheckoutError> {
        self.submitter.submit(&mut self.cart, form).await
    }

    /// Read the menu file.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu cannot be read or parsed.
    pub fn load_menu(&self) -> Result<Menu, MenuError> {
        Menu::load(&self.config.menu_path)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        Theme::load(self.storage.as_ref())
    }

    #[must_use]
    pub fn language(&self) -> Language {
        Language::load(self.storage.as_ref())
    }
}
