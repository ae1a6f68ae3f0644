//! Browser-shaped headers and cookies the search endpoint expects.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL, COOKIE, HOST, USER_AGENT};

use crate::error::{BridgeError, BridgeResult};

pub const EDGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36 Edg/133.0.0.0";

const SEC_CH_UA: &str = r#""Not(A:Brand";v="99", "Microsoft Edge";v="133", "Chromium";v="133""#;

const STATIC_HEADERS: &[(&str, &str)] = &[
    ("sec-ch-ua-platform", "Windows"),
    ("sec-ch-ua", SEC_CH_UA),
    ("sec-ch-ua-bitness", "64"),
    ("sec-ch-ua-model", ""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-arch", "x86"),
    ("sec-ch-ua-full-version", "133.0.3065.39"),
    ("sec-ch-ua-platform-version", "19.0.0"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-dest", "empty"),
];

/// `DS=<credential>` for the nonce and upload calls.
pub fn session_cookie(credential: &str) -> String {
    format!("DS={credential}")
}

/// Full cookie jar for the search call.
pub fn search_cookie(credential: &str) -> String {
    [
        "guest_has_seen_legal_disclaimer=true".to_string(),
        "youchat_personalization=true".to_string(),
        session_cookie(credential),
        "you_subscription=youpro_standard_year".to_string(),
        "youpro_subscription=true".to_string(),
        "ai_model=deepseek_r1".to_string(),
        "youchat_smart_learn=true".to_string(),
    ]
    .join(";")
}

fn cookie_value(cookie: &str) -> BridgeResult<HeaderValue> {
    HeaderValue::from_str(cookie).map_err(|_| BridgeError::MissingCredential)
}

/// Header set for the nonce and upload calls.
pub fn session_headers(credential: &str) -> BridgeResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, cookie_value(&session_cookie(credential))?);
    Ok(headers)
}

/// Header set for `GET /api/streamingSearch`.
pub fn search_headers(credential: &str, host: &str) -> BridgeResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(STATIC_HEADERS.len() + 5);
    for &(name, value) in STATIC_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
    headers.insert(USER_AGENT, HeaderValue::from_static(EDGE_USER_AGENT));
    if let Ok(host) = HeaderValue::from_str(host) {
        headers.insert(HOST, host);
    }
    headers.insert(COOKIE, cookie_value(&search_cookie(credential))?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_cookie_order() {
        assert_eq!(
            search_cookie("tok"),
            "guest_has_seen_legal_disclaimer=true;youchat_personalization=true;DS=tok;\
             you_subscription=youpro_standard_year;youpro_subscription=true;\
             ai_model=deepseek_r1;youchat_smart_learn=true"
        );
    }

    #[test]
    fn test_search_headers() {
        let headers = search_headers("tok", "you.com").unwrap();
        assert_eq!(headers[ACCEPT], "text/event-stream");
        assert_eq!(headers[HOST], "you.com");
        assert_eq!(headers["sec-ch-ua-mobile"], "?0");
        assert_eq!(headers["sec-ch-ua-model"], "");
        assert!(headers[USER_AGENT].to_str().unwrap().contains("Edg/133"));
    }

    #[test]
    fn test_invalid_credential_rejected() {
        assert!(matches!(session_headers("bad\ntoken"), Err(BridgeError::MissingCredential)));
    }
}
