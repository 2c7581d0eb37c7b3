//! Localized client messages
//!
//! The catalog is compiled in from `i18n/messages.toml` and parsed once.
//! Error entries are keyed by machine code and also carry the HTTP status.

use actix_web::{http::header::ACCEPT_LANGUAGE, HttpRequest};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

pub use kh_shared::types::Language;

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedMessage {
    pub ar: String,
    pub en: String,
    pub http_status: Option<u16>,
}

impl LocalizedMessage {
    pub fn text(&self, lang: Language) -> &str {
        match lang {
            Language::Arabic => &self.ar,
            Language::English => &self.en,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageCatalog {
    #[serde(default)]
    pub errors: HashMap<String, LocalizedMessage>,
    #[serde(default)]
    pub success: HashMap<String, LocalizedMessage>,
}

pub static MESSAGES: Lazy<MessageCatalog> = Lazy::new(|| match load_messages() {
    Ok(catalog) => catalog,
    Err(e) => {
        log::error!("Failed to parse embedded message catalog: {}", e);
        MessageCatalog::default()
    }
});

fn load_messages() -> Result<MessageCatalog, toml::de::Error> {
    toml::from_str(include_str!("../../i18n/messages.toml"))
}

/// Negotiate the response language, Arabic when the header is absent
pub fn language_from_request(req: &HttpRequest) -> Language {
    req.headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// Localized text and HTTP status for an error code
pub fn error_message(code: &str, lang: Language) -> Option<(String, u16)> {
    MESSAGES
        .errors
        .get(code)
        .map(|msg| (msg.text(lang).to_string(), msg.http_status.unwrap_or(500)))
}

/// Localized text for a success key, the key itself when unknown
pub fn success_message(key: &str, lang: Language) -> String {
    MESSAGES
        .success
        .get(key)
        .map(|msg| msg.text(lang).to_string())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const ERROR_CODES: [&str; 11] = [
        "INVALID_PHONE_FORMAT",
        "INVALID_CODE_FORMAT",
        "VALIDATION_ERROR",
        "INVALID_VERIFICATION_CODE",
        "VERIFICATION_NOT_FOUND_OR_EXPIRED",
        "MAX_ATTEMPTS_EXCEEDED",
        "SMS_DELIVERY_FAILED",
        "SMS_PROVIDER_UNAVAILABLE",
        "UNAUTHORIZED",
        "NOT_FOUND",
        "INTERNAL_ERROR",
    ];

    #[test]
    fn test_embedded_catalog_parses() {
        let catalog = load_messages().unwrap();
        for code in ERROR_CODES {
            let msg = catalog.errors.get(code).unwrap_or_else(|| panic!("missing {}", code));
            assert!(msg.http_status.is_some(), "{} has no status", code);
            assert!(!msg.ar.is_empty() && !msg.en.is_empty());
        }
        assert_eq!(catalog.success.len(), 3);
    }

    #[test]
    fn test_error_message_statuses() {
        assert_eq!(error_message("MAX_ATTEMPTS_EXCEEDED", Language::English).unwrap().1, 429);
        assert_eq!(error_message("SMS_PROVIDER_UNAVAILABLE", Language::Arabic).unwrap().1, 503);
        assert!(error_message("NO_SUCH_CODE", Language::Arabic).is_none());
    }

    #[test]
    fn test_success_message_fallback() {
        assert_eq!(
            success_message("PHONE_VERIFIED", Language::English),
            "Phone number verified successfully"
        );
        assert_eq!(success_message("UNKNOWN_KEY", Language::Arabic), "UNKNOWN_KEY");
    }

    #[test]
    fn test_language_from_request() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(language_from_request(&req), Language::Arabic);

        let req = TestRequest::default()
            .insert_header((ACCEPT_LANGUAGE, "en-US,en;q=0.9,ar;q=0.5"))
            .to_http_request();
        assert_eq!(language_from_request(&req), Language::English);

        let req = TestRequest::default()
            .insert_header((ACCEPT_LANGUAGE, "fr-FR"))
            .to_http_request();
        assert_eq!(language_from_request(&req), Language::Arabic);
    }
}
