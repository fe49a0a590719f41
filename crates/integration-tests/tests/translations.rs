//! Translation loading and English fallback.

#![allow(clippy::unwrap_used)]

use movenpick_integration_tests::{FakeSite, SiteState};
use movenpick_storefront::i18n::TranslationClient;
use movenpick_storefront::preferences::Language;
use serde_json::json;

fn catalogues() -> SiteState {
    let mut state = SiteState::default();
    state
        .translations
        .insert("en".into(), json!({"hero-title": "Welcome to Movenpick"}));
    state
        .translations
        .insert("fr".into(), json!({"hero-title": "Bienvenue chez Movenpick"}));
    state
}

#[tokio::test]
async fn test_language_is_loaded_and_cached() {
    let site = FakeSite::start(catalogues()).await;
    let client = TranslationClient::new(reqwest::Client::new(), site.base_url());

    let french = client.load(Language::French).await;
    assert_eq!(french.text("hero-title", ""), "Bienvenue chez Movenpick");

    client.load(Language::French).await;
    assert_eq!(site.with(|s| s.translation_requests.clone()), ["about-fr.json"]);
}

#[tokio::test]
async fn test_missing_language_falls_back_to_english() {
    let site = FakeSite::start(catalogues()).await;
    let client = TranslationClient::new(reqwest::Client::new(), site.base_url());

    let swahili = client.load(Language::Swahili).await;
    assert_eq!(swahili.text("hero-title", ""), "Welcome to Movenpick");
    assert_eq!(
        site.with(|s| s.translation_requests.clone()),
        ["about-sw.json", "about-en.json"]
    );

    // Both languages are now cached.
    client.load(Language::Swahili).await;
    client.load(Language::English).await;
    assert_eq!(site.with(|s| s.translation_requests.len()), 2);
}

#[tokio::test]
async fn test_no_catalogues_uses_builtin_text() {
    let site = FakeSite::start(SiteState::default()).await;
    let client = TranslationClient::new(reqwest::Client::new(), site.base_url());

    let catalog = client.load(Language::Kinyarwanda).await;
    assert!(catalog.is_empty());
    assert_eq!(catalog.text("hero-title", "Welcome"), "Welcome");
}

#[tokio::test]
async fn test_concurrent_loads_share_one_request() {
    let site = FakeSite::start(catalogues()).await;
    let client = TranslationClient::new(reqwest::Client::new(), site.base_url());

    let (a, b, c) = tokio::join!(
        client.load(Language::French),
        client.load(Language::French),
        client.load(Language::French),
    );
    for catalog in [a, b, c] {
        assert_eq!(catalog.text("hero-title", ""), "Bienvenue chez Movenpick");
    }
    assert_eq!(site.with(|s| s.translation_requests.clone()), ["about-fr.json"]);
}

#[tokio::test]
async fn test_empty_catalogue_falls_back_to_english() {
    let mut state = catalogues();
    state.translations.insert("rw".into(), json!({}));
    let site = FakeSite::start(state).await;
    let client = TranslationClient::new(reqwest::Client::new(), site.base_url());

    let kinyarwanda = client.load(Language::Kinyarwanda).await;
    assert_eq!(kinyarwanda.text("hero-title", ""), "Welcome to Movenpick");
}
