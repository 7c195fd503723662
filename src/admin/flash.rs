//! One-shot validation feedback carried across a redirect in a cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{FieldErrors, OldInput};

pub const FLASH_COOKIE: &str = "bookshelf_flash";

/// A flash nobody reads within this window is dropped by the browser
const FLASH_MAX_AGE: time::Duration = time::Duration::seconds(60);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub errors: FieldErrors,
    pub old: OldInput,
}

impl Flash {
    pub fn new(errors: FieldErrors, old: OldInput) -> Self {
        Self { errors, old }
    }

    pub fn encode(&self) -> String {
        // Serializing maps of strings cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build((FLASH_COOKIE, self.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(FLASH_MAX_AGE)
            .build()
    }

    /// Read and clear the flash cookie
    pub fn take(jar: CookieJar) -> (CookieJar, Flash) {
        let flash = jar
            .get(FLASH_COOKIE)
            .and_then(|cookie| Flash::decode(cookie.value()))
            .unwrap_or_default();
        let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
        (jar, flash)
    }

    /// All messages, field order
    pub fn messages(&self) -> Vec<String> {
        self.errors.values().flatten().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Flash {
        let mut errors = FieldErrors::new();
        errors.insert("name".to_string(), vec!["Name cannot be empty".to_string()]);
        let mut old = OldInput::new();
        old.insert("name".to_string(), " ".to_string());
        Flash::new(errors, old)
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(Flash::decode("not base64!"), None);
        assert_eq!(Flash::decode(&URL_SAFE_NO_PAD.encode("[1,2]")), None);
    }

    #[test]
    fn test_take_reads_and_clears() {
        let flash = sample();
        let jar = CookieJar::new().add(flash.cookie());

        let (jar, taken) = Flash::take(jar);
        assert_eq!(taken, flash);
        assert_eq!(taken.messages(), vec!["Name cannot be empty".to_string()]);
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn test_take_without_cookie() {
        let (_, taken) = Flash::take(CookieJar::new());
        assert!(taken.errors.is_empty());
        assert!(taken.old.is_empty());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = sample().cookie().to_string();
        assert!(cookie.starts_with("bookshelf_flash="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=60"));
    }
}
