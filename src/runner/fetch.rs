//! Page fetching
//!
//! A single synchronous GET with an overall timeout. Redirects are followed;
//! the effective final URL is reported back so the generate phase can log it,
//! but it never feeds back into identity resolution.

use crate::error::{FetchError, FetchResult};
use std::error::Error as _;
use std::io;
use std::time::Duration;

/// A fetched page body plus response metadata
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    /// Response body as text
    pub text: String,

    /// Effective URL after redirects
    pub final_url: String,

    /// Response Content-Type, when the server sent one
    pub content_type: Option<String>,
}

/// Perform a single GET request with a timeout
///
/// Any non-2xx status is fatal to generation; there are no retries.
pub fn fetch(url: &str, timeout: Duration) -> FetchResult<HtmlDocument> {
    let response = ureq::get(url)
        .timeout(timeout)
        .call()
        .map_err(|e| map_error(e, url, timeout))?;

    let final_url = response.get_url().to_string();
    let content_type = {
        let ct = response.content_type();
        if ct.is_empty() {
            None
        } else {
            Some(ct.to_string())
        }
    };

    let text = response.into_string().map_err(|e| classify_io(e, url, timeout))?;

    Ok(HtmlDocument {
        text,
        final_url,
        content_type,
    })
}

fn map_error(err: ureq::Error, url: &str, timeout: Duration) -> FetchError {
    match err {
        ureq::Error::Status(code, _) => FetchError::HttpStatus {
            url: url.to_string(),
            code,
        },
        ureq::Error::Transport(transport) => {
            let timed_out = transport
                .source()
                .and_then(|s| s.downcast_ref::<io::Error>())
                .map(|e| matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock))
                .unwrap_or(false)
                || transport.to_string().contains("timed out");

            if timed_out {
                FetchError::Timeout {
                    url: url.to_string(),
                    secs: timeout.as_secs(),
                }
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    cause: transport.to_string(),
                }
            }
        }
    }
}

/// Body reads share the deadline, so a stall mid-body is still a timeout
fn classify_io(err: io::Error, url: &str, timeout: Duration) -> FetchError {
    if matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
        FetchError::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            cause: err.to_string(),
        }
    }
}
