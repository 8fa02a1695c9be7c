// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// O painel é brasileiro: sem Accept-Language, respondemos em português.
const DEFAULT_LANG: &str = "pt";

// Extrator de idioma: guarda só o código primário ("pt-BR" -> "pt").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl Locale {
    pub fn from_header(header_str: &str) -> Self {
        accept_language::parse(header_str)
            .first()
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            .filter(|lang| !lang.is_empty())
            .map(Locale)
            .unwrap_or_default()
    }

    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}
