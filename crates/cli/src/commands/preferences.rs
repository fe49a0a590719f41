//! Theme and language commands.

use movenpick_storefront::error::AppError;
use movenpick_storefront::preferences::{Language, Theme};
use movenpick_storefront::state::AppState;

use super::output;

/// Translation key of the greeting shown after a language change.
const GREETING_KEY: &str = "hero-title";

/// Show or set the theme.
///
/// # Errors
///
/// Returns an error for an unknown theme or a failed write.
pub fn theme(state: &AppState, value: Option<&str>) -> Result<(), AppError> {
    let Some(value) = value else {
        output(state.theme());
        return Ok(());
    };
    let theme = value
        .parse::<Theme>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    theme.save(state.storage().as_ref())?;
    output(format!("Theme set to {theme}"));
    Ok(())
}

/// Show or set the language. Setting one also fetches its translations.
///
/// # Errors
///
/// Returns an error for an unknown language or a failed write.
pub async fn language(state: &AppState, code: Option<&str>) -> Result<(), AppError> {
    let Some(code) = code else {
        let current = state.language();
        output(format!("{} ({current})", current.name()));
        return Ok(());
    };
    let language = code
        .parse::<Language>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    language.save(state.storage().as_ref())?;

    let catalog = state.translations().load(language).await;
    output(format!("Language set to {}", language.name()));
    output(catalog.text(GREETING_KEY, "Welcome to Movenpick"));
    Ok(())
}
