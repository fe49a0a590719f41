//! Authentication client.
//!
//! Posts the login and signup forms to the site's PHP endpoints and caches
//! the returned user under the `user` storage key. The cache is what the
//! rest of the client treats as "signed in".
//!
//! Email and phone fields are validated locally; a form that fails
//! validation never reaches the network.

mod error;

pub use error::{AuthAction, AuthError};

use movenpick_core::{Email, Phone};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::busy::BusyFlag;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::CachedUser;
use crate::storage::{SharedStorage, keys, read_json, write_json};

/// Login endpoint relative to the site base URL.
pub const LOGIN_PATH: &str = "auth/login.php";
/// Signup endpoint relative to the site base URL.
pub const SIGNUP_PATH: &str = "auth/signup.php";

/// Signup form input, as typed.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    /// Optional; validated only when non-blank.
    pub phone: String,
    pub password: SecretString,
    pub confirm: SecretString,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    success: bool,
    #[serde(default)]
    user: Option<CachedUser>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the auth endpoints.
pub struct AuthClient {
    client: reqwest::Client,
    login_url: Url,
    signup_url: Url,
    storage: SharedStorage,
    busy: BusyFlag,
}

impl AuthClient {
    /// Build the client for endpoints under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint URL cannot be joined.
    pub fn new(
        client: reqwest::Client,
        base_url: &Url,
        storage: SharedStorage,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            login_url: base_url.join(LOGIN_PATH)?,
            signup_url: base_url.join(SIGNUP_PATH)?,
            storage,
            busy: BusyFlag::new(),
        })
    }

    /// The flag a view uses to disable the submit buttons.
    #[must_use]
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    /// The cached user, if signed in. A corrupt cache reads as signed out.
    #[must_use]
    pub fn current_user(&self) -> Option<CachedUser> {
        read_json(self.storage.as_ref(), keys::USER)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEmail`] before any request for a
    /// malformed address, [`AuthError::Rejected`] with the endpoint's
    /// message on bad credentials, or a transport/format error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<CachedUser, AuthError> {
        let email = Email::parse(email)?;
        let form = [
            ("email", email.as_str()),
            ("password", password.expose_secret()),
        ];
        self.submit(AuthAction::Login, &self.login_url, &form).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEmail`], [`AuthError::InvalidPhone`] or
    /// [`AuthError::PasswordMismatch`] before any request, checked in form
    /// order; otherwise as [`login`](Self::login).
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn signup(&self, form: &SignupForm) -> Result<CachedUser, AuthError> {
        let email = Email::parse(&form.email)?;
        let phone = match form.phone.trim() {
            "" => None,
            raw => Some(Phone::parse(raw)?),
        };
        if form.password.expose_secret() != form.confirm.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }
        let fields = [
            ("name", form.name.trim()),
            ("email", email.as_str()),
            ("phone", phone.as_ref().map_or("", Phone::as_str)),
            ("password", form.password.expose_secret()),
        ];
        self.submit(AuthAction::Signup, &self.signup_url, &fields).await
    }

    /// Forget the cached user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the cache cannot be erased.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.storage.remove(keys::USER)?;
        clear_sentry_user();
        add_breadcrumb("auth", "Logged out", None);
        tracing::info!("User logged out");
        Ok(())
    }

    async fn submit(
        &self,
        action: AuthAction,
        url: &Url,
        form: &[(&str, &str)],
    ) -> Result<CachedUser, AuthError> {
        let Some(_busy) = self.busy.try_acquire() else {
            return Err(AuthError::InFlight);
        };

        let response = self
            .client
            .post(url.clone())
            .form(form)
            .send()
            .await
            .map_err(|source| AuthError::Http { action, source })?;
        let body = response
            .text()
            .await
            .map_err(|source| AuthError::Http { action, source })?;

        let parsed: AuthResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, ?action, "Failed to parse auth response");
            AuthError::Malformed {
                action,
                message: e.to_string(),
            }
        })?;

        if !parsed.success {
            let message = parsed
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| action.default_error().to_string());
            tracing::info!(?action, error = %message, "Auth rejected");
            return Err(AuthError::Rejected(message));
        }

        let Some(user) = parsed.user else {
            return Err(AuthError::Malformed {
                action,
                message: "missing user".to_string(),
            });
        };

        // The server session exists either way; a failed cache write only
        // means the next run starts signed out.
        if let Err(e) = write_json(self.storage.as_ref(), keys::USER, &user) {
            tracing::error!(error = %e, "Failed to cache user");
        }
        if let Some(id) = user.id {
            set_sentry_user(&id, user.email.as_deref());
        }
        add_breadcrumb("auth", action.success_message(), None);
        tracing::info!(?action, user_id = ?user.id, "Auth succeeded");

        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MemoryStorage, Storage};

    fn client(storage: &Arc<MemoryStorage>) -> AuthClient {
        // Port 9 (discard) is never contacted by these tests.
        let base = Url::parse("http://127.0.0.1:9/movenpick/").unwrap();
        AuthClient::new(reqwest::Client::new(), &base, storage.clone()).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = client(&storage);
        assert_eq!(
            auth.login_url.as_str(),
            "http://127.0.0.1:9/movenpick/auth/login.php"
        );
        assert_eq!(
            auth.signup_url.as_str(),
            "http://127.0.0.1:9/movenpick/auth/signup.php"
        );
    }

    #[tokio::test]
    async fn test_signup_password_mismatch_short_circuits() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = client(&storage);
        let form = SignupForm {
            name: "Aline".into(),
            email: "aline@example.rw".into(),
            phone: String::new(),
            password: SecretString::from("hunter22"),
            confirm: SecretString::from("hunter23"),
        };
        let err = auth.signup(&form).await.unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
        assert_eq!(err.user_message(), "Passwords do not match!");
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_invalid_contact_fields_rejected_locally() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = client(&storage);
        // Holding the flag proves validation runs before it is taken.
        let _guard = auth.busy_flag().try_acquire().unwrap();

        let err = auth
            .login("not-an-email", &SecretString::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
        assert_eq!(err.user_message(), "Please enter a valid email");

        let form = SignupForm {
            name: "Aline".into(),
            email: "aline@example.rw".into(),
            phone: "12".into(),
            password: SecretString::from("brochette!"),
            confirm: SecretString::from("brochette!"),
        };
        let err = auth.signup(&form).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidPhone(_)));
        assert_eq!(err.user_message(), "Please enter a valid phone number");

        let form = SignupForm {
            email: "aline@".into(),
            ..form
        };
        assert!(matches!(auth.signup(&form).await, Err(AuthError::InvalidEmail(_))));
    }

    #[test]
    fn test_current_user_and_logout() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = client(&storage);
        assert!(auth.current_user().is_none());

        storage
            .set(keys::USER, r#"{"id":5,"name":"Eric","email":"eric@example.rw"}"#)
            .unwrap();
        assert_eq!(auth.current_user().unwrap().display_name(), "Eric");

        auth.logout().unwrap();
        assert!(auth.current_user().is_none());
        assert_eq!(storage.get(keys::USER).unwrap(), None);
    }

    #[test]
    fn test_corrupt_cache_reads_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::USER, "not json").unwrap();
        assert!(client(&storage).current_user().is_none());
    }

    #[tokio::test]
    async fn test_busy_rejects_overlap() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = client(&storage);
        let _guard = auth.busy_flag().try_acquire().unwrap();
        let err = auth
            .login("a@b.rw", &SecretString::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InFlight));
    }

    #[test]
    fn test_network_messages_name_the_action() {
        let err = AuthError::Malformed {
            action: AuthAction::Signup,
            message: "eof".into(),
        };
        assert_eq!(err.user_message(), "Signup failed. Please try again.");
    }
}
