//! Shared `reqwest` plumbing for the upstream clients.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{Outcome, ResolveError};

pub(crate) fn build_client(user_agent: &str, timeout_secs: u64) -> Outcome<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

/// Parses `base_url` with any trailing slashes removed.
pub(crate) fn parse_base_url(base_url: &str) -> Outcome<Url> {
    let trimmed = base_url.trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| ResolveError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Appends path segments to `base`, percent-encoding each one.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Outcome<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ResolveError::InvalidBaseUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Asserts a 2xx status and parses the body as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Outcome<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(ResolveError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ResolveError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}
