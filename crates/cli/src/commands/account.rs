//! Account commands. Passwords are read from standard input.

use movenpick_core::Email;
use movenpick_storefront::error::AppError;
use movenpick_storefront::notify::Notification;
use movenpick_storefront::services::auth::{AuthAction, AuthError, SignupForm};
use movenpick_storefront::state::AppState;

use super::{output, secret};

/// Sign in as `email`.
///
/// # Errors
///
/// Returns an error if the email is malformed, the credentials are rejected
/// or the request fails.
pub async fn login(state: &AppState, email: &str) -> Result<(), AppError> {
    // Fail before prompting for a password.
    Email::parse(email).map_err(AuthError::from)?;
    let password = secret("Password")?;
    let user = state.auth().login(email, &password).await?;
    output(Notification::success(AuthAction::Login.success_message()));
    output(format!("Signed in as {}", user.display_name()));
    Ok(())
}

/// Create an account.
///
/// # Errors
///
/// Returns an error if a field is invalid, the passwords differ or the
/// signup is rejected.
pub async fn signup(
    state: &AppState,
    name: String,
    email: String,
    phone: String,
) -> Result<(), AppError> {
    Email::parse(&email).map_err(AuthError::from)?;
    let password = secret("Password")?;
    let confirm = secret("Confirm password")?;
    let form = SignupForm {
        name,
        email,
        phone,
        password,
        confirm,
    };
    let user = state.auth().signup(&form).await?;
    output(Notification::success(AuthAction::Signup.success_message()));
    output(format!("Signed in as {}", user.display_name()));
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns an error if the cached user cannot be erased.
pub fn logout(state: &AppState) -> Result<(), AppError> {
    state.auth().logout()?;
    output("Signed out");
    Ok(())
}

/// Print the signed-in account.
pub fn whoami(state: &AppState) {
    match state.auth().current_user() {
        Some(user) => match &user.email {
            Some(email) => output(format!("{} <{email}>", user.display_name())),
            None => output(user.display_name()),
        },
        None => output("Not signed in"),
    }
}
