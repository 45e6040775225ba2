//! Security response headers.
//!
//! # Responsibilities
//! - Mint a fresh CSP nonce per HTML response
//! - Build the Content-Security-Policy bound to that nonce
//! - Add the fixed hardening headers shared by every rendered response

use axum::http::header::{
    CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS,
};
use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderValue};
use rand::distributions::Alphanumeric;
use rand::Rng;

const NONCE_LEN: usize = 24;

/// Random alphanumeric nonce, fresh for each call.
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// CSP allowing only the nonce-tagged inline style and script.
pub fn content_security_policy(nonce: &str) -> String {
    format!(
        "default-src 'none'; style-src 'nonce-{nonce}'; script-src 'nonce-{nonce}'; \
         img-src data:; base-uri 'none'; form-action 'none'; frame-ancestors 'none'"
    )
}

/// Headers for every generated response: no caching, no sniffing, no framing.
pub fn apply_common(headers: &mut HeaderMap) {
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
}

/// Common headers plus the nonce-bound CSP for an HTML page.
pub fn apply_html(headers: &mut HeaderMap, nonce: &str) -> Result<(), InvalidHeaderValue> {
    apply_common(headers);
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_str(&content_security_policy(nonce))?,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_shape() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_eq!(a.len(), NONCE_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_csp_binds_nonce() {
        let csp = content_security_policy("xyz");
        assert!(csp.starts_with("default-src 'none';"));
        assert!(csp.contains("style-src 'nonce-xyz'"));
        assert!(csp.contains("script-src 'nonce-xyz'"));
        assert!(csp.contains("frame-ancestors 'none'"));
    }

    #[test]
    fn test_apply_html() {
        let mut headers = HeaderMap::new();
        apply_html(&mut headers, "abc").unwrap();
        assert_eq!(headers[CACHE_CONTROL], "no-store");
        assert_eq!(headers[X_FRAME_OPTIONS], "DENY");
        assert!(headers[CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .contains("'nonce-abc'"));
    }
}
