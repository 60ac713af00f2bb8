use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, REFERER,
    USER_AGENT,
};

/// User agent presented by the plain retrying client
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// User agent presented by the browser-impersonation client
pub const IMPERSONATE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Referer sent with listing-page requests
pub const SEARCH_REFERER: &str = "https://www.google.com/";

/// Build browser-like headers for listing pages
///
/// Creates a HeaderMap mimicking a regular Chrome navigation so listing
/// pages are served instead of bot challenges.
///
/// # Examples
///
/// ```
/// use marquee::fetch::headers::{browser_headers, DEFAULT_USER_AGENT};
///
/// let headers = browser_headers(DEFAULT_USER_AGENT, "https://www.google.com/");
/// ```
pub fn browser_headers(user_agent: &str, referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent).unwrap());
    headers.insert(REFERER, HeaderValue::from_str(referer).unwrap());
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));

    // Sec-Fetch headers for modern browser compatibility
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("cross-site"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-user"),
        HeaderValue::from_static("?1"),
    );
    headers.insert(
        HeaderName::from_static("upgrade-insecure-requests"),
        HeaderValue::from_static("1"),
    );

    headers
}

/// Build the full Chrome fingerprint used by the impersonation client
///
/// Extends the plain browser profile with client-hint headers so the request
/// shape matches what Chrome 120 actually sends on first navigation.
pub fn impersonation_headers() -> HeaderMap {
    let mut headers = browser_headers(IMPERSONATE_USER_AGENT, SEARCH_REFERER);

    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(
            "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"",
        ),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("\"Windows\""),
    );

    headers
}
