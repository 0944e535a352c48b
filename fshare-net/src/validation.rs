// fshare-net/src/validation.rs
use fshare_common::error::{FshareError, Result};
use url::Url;

/// Parses a base URL and makes sure it is something reqwest can fetch.
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| FshareError::Config(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" | "http" => Ok(url),
        other => Err(FshareError::ValidationError(format!(
            "Invalid URL scheme for '{url_str}': must be http or https, but got '{other}'"
        ))),
    }
}
