//! Credential redaction for URLs and log-bound text
//!
//! The audience API authenticates with query-string credentials, so raw
//! URLs are radioactive: anything that reaches a log line or an error
//! message goes through here first. Redaction keeps the parameter name and
//! replaces only the value, so redacted output still reads like the
//! original request.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Query parameters whose values must never appear in logs or errors
const SENSITIVE_PARAMS: [&str; 5] = ["k", "api_key", "token", "access_token", "key"];

/// Placeholder substituted for a sensitive value
const REDACTED: &str = "[REDACTED]";

// Matches `k=secret`, `api_key=secret`, ... up to the next delimiter. The
// parameter name must start a token so `network=abc` survives.
#[allow(clippy::expect_used)]
static SENSITIVE_IN_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|[?&\s])(k|api_key|token|access_token|key)=([^&\s]+)")
        .expect("redaction pattern is a valid regex")
});

/// Redact sensitive query-parameter values in a URL.
///
/// Parses the URL properly, so parameter names are matched exactly and
/// ordering and non-sensitive parameters are preserved. Strings that do not
/// parse as URLs fall back to [`redact_message`].
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return redact_message(raw);
    };

    let redacted: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            if SENSITIVE_PARAMS.iter().any(|p| p.eq_ignore_ascii_case(&name)) {
                (name.into_owned(), REDACTED.to_string())
            } else {
                (name.into_owned(), value.into_owned())
            }
        })
        .collect();

    if redacted.is_empty() {
        return url.to_string();
    }
    url.query_pairs_mut().clear().extend_pairs(redacted);
    // extend_pairs percent-encodes the brackets of the placeholder; undo
    // that so the marker stays recognizable
    url.to_string().replace("%5BREDACTED%5D", REDACTED)
}

/// Redact sensitive `name=value` fragments anywhere in free-form text.
///
/// Used for error messages and log lines that may embed URLs or query
/// fragments without being parseable URLs themselves.
pub fn redact_message(message: &str) -> String {
    SENSITIVE_IN_TEXT.replace_all(message, format!("${{1}}${{2}}={REDACTED}")).into_owned()
}
