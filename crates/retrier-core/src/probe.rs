//! HTTP HEAD probing.
//!
//! One request per call; deciding whether and when to try again is the
//! calling policy's business, which is why failures come back as
//! `ProbeError` instead of anyhow.

use std::str;
use std::time::Duration;

use crate::net::{classify_curl_error, ProbeError};

/// Key facts from a successful probe.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Final HTTP status (2xx).
    pub http_status: u32,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Server` header if present.
    pub server: Option<String>,
}

/// Performs one HEAD request and returns parsed response facts.
///
/// Follows redirects. Transport failures are classified into the status
/// taxonomy; a non-2xx final status comes back as `ProbeError::Http`.
pub fn probe(
    url: &str,
    connect_timeout: Duration,
    request_timeout: Duration,
) -> Result<ProbeResult, ProbeError> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(to_probe_error)?;
    easy.nobody(true).map_err(to_probe_error)?; // HEAD request
    easy.follow_location(true).map_err(to_probe_error)?;
    easy.connect_timeout(connect_timeout).map_err(to_probe_error)?;
    easy.timeout(request_timeout).map_err(to_probe_error)?;

    {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })
            .map_err(to_probe_error)?;
        transfer.perform().map_err(to_probe_error)?;
    }

    let code = easy.response_code().map_err(to_probe_error)?;
    if !(200..300).contains(&code) {
        return Err(ProbeError::Http(code));
    }

    Ok(ProbeResult {
        http_status: code,
        content_length: header_value(&headers, "content-length").and_then(|v| v.parse().ok()),
        server: header_value(&headers, "server").map(str::to_string),
    })
}

fn to_probe_error(e: curl::Error) -> ProbeError {
    ProbeError::Net(classify_curl_error(&e))
}

/// Last occurrence wins so a redirected response overrides the first hop's
/// headers.
fn header_value<'a>(headers: &'a [String], name: &str) -> Option<&'a str> {
    headers.iter().rev().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}
