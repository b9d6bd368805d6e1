//! `retrier probe <url>` – HEAD-probe a URL under the configured policy.

use anyhow::{bail, Context, Result};
use retrier_core::config::RetrierConfig;
use retrier_core::net::{self, ProbeError};
use retrier_core::policy::Policy;
use retrier_core::probe::{self, ProbeResult};
use std::time::Duration;

pub fn run_probe(
    cfg: &RetrierConfig,
    url: &str,
    retries: Option<u32>,
    base_delay_ms: Option<u64>,
) -> Result<()> {
    let parsed = url::Url::parse(url).context("invalid URL")?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        bail!("unsupported URL scheme: {}", parsed.scheme());
    }

    let mut retry_cfg = cfg.retry.clone().unwrap_or_default();
    if let Some(n) = retries {
        retry_cfg.max_retries = n;
    }
    if let Some(ms) = base_delay_ms {
        retry_cfg.base_delay_secs = ms as f64 / 1000.0;
    }
    let probe_cfg = cfg.probe.clone().unwrap_or_default();
    let connect_timeout = Duration::from_secs(probe_cfg.connect_timeout_secs);
    let request_timeout = Duration::from_secs(probe_cfg.request_timeout_secs);

    let policy: Policy<ProbeError> = Policy::builder(retry_cfg.schedule())
        .retry_if(|e| matches!(e, ProbeError::Net(s) if s.is_transient()))
        .retry_if(|e| matches!(e, ProbeError::Http(code) if net::http_status_transient(*code)))
        .on_retry(|err, retry| {
            tracing::warn!("probe failed ({err}), retrying in {:?}", retry.delay);
            eprintln!("probe failed ({err}), retrying in {:?}", retry.delay);
        })
        .build();

    let result = policy
        .execute(|| probe::probe(url, connect_timeout, request_timeout))
        .with_context(|| format!("probe of {url} failed"))?;

    print_result(url, &result);
    Ok(())
}

fn print_result(url: &str, result: &ProbeResult) {
    println!("{url}: HTTP {}", result.http_status);
    match result.content_length {
        Some(len) => println!("  content-length: {len}"),
        None => println!("  content-length: (none)"),
    }
    if let Some(server) = &result.server {
        println!("  server: {server}");
    }
}
