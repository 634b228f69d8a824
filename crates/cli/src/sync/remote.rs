// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote API abstraction used to replay queued actions.
//!
//! Provides a trait-based layer that enables:
//! - Real HTTP replay against the listings API for production
//! - Mock remotes for unit testing

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::time::Duration;

use hs_core::{ActionKind, QueuedAction};
use reqwest::{Method, StatusCode};

use crate::config::RemoteConfig;
use crate::error::{Error, Result};

/// Why a replay did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// Transient failure (network, timeout, server error). Keep the action.
    #[error("retryable: {0}")]
    Retryable(String),

    /// The server rejected the action. Retrying will not help.
    #[error("rejected by server: {message}")]
    Terminal {
        status: Option<u16>,
        message: String,
    },

    /// Failure that is neither; aborts the drain.
    #[error("unclassified: {0}")]
    Unclassified(String),
}

/// Remote endpoint that can replay an action.
pub trait Remote: Send + Sync {
    /// Replay a single action.
    fn replay<'a>(
        &'a self,
        action: &'a QueuedAction,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<(), ReplayError>> + Send + 'a>>;
}

/// HTTP method and path an action kind is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: String,
}

impl Route {
    fn new(method: Method, path: &str) -> Self {
        Route {
            method,
            path: path.to_string(),
        }
    }

    /// Built-in route for each action kind.
    pub fn default_for(kind: ActionKind) -> Self {
        match kind {
            ActionKind::UpdateProfile => Route::new(Method::PUT, "/update-profile"),
            ActionKind::CreateListingInquiry => Route::new(Method::POST, "/listing-inquiries"),
            ActionKind::SaveListing => Route::new(Method::POST, "/saved-listings"),
            ActionKind::UnsaveListing => Route::new(Method::DELETE, "/saved-listings"),
        }
    }
}

impl FromStr for Route {
    type Err = Error;

    /// Parses `"METHOD /path"`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(method), Some(path), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::Config(format!(
                "invalid route '{}': expected \"METHOD /path\"",
                s
            )));
        };
        let method = Method::from_str(&method.to_uppercase())
            .map_err(|_| Error::Config(format!("invalid HTTP method in route '{}'", s)))?;
        if !path.starts_with('/') {
            return Err(Error::Config(format!(
                "invalid route '{}': path must start with '/'",
                s
            )));
        }
        Ok(Route::new(method, path))
    }
}

/// Replays actions over HTTP with a JSON body equal to the payload.
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    routes: BTreeMap<ActionKind, Route>,
    auth_token: Option<String>,
}

impl HttpRemote {
    /// Build a remote from configuration, applying route overrides.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid base_url '{}': {}", config.base_url, e)))?;

        let mut routes: BTreeMap<ActionKind, Route> = ActionKind::ALL
            .iter()
            .map(|kind| (*kind, Route::default_for(*kind)))
            .collect();
        for (kind, route) in &config.routes {
            routes.insert(kind.parse()?, route.parse()?);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(HttpRemote {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            routes,
            auth_token: config.auth_token.clone(),
        })
    }

    /// Route used for `kind`.
    pub fn route(&self, kind: ActionKind) -> Route {
        self.routes
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Route::default_for(kind))
    }

    /// Full URL for `kind`.
    pub fn url_for(&self, kind: ActionKind) -> String {
        format!("{}{}", self.base_url, self.route(kind).path)
    }
}

impl Remote for HttpRemote {
    fn replay<'a>(
        &'a self,
        action: &'a QueuedAction,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<(), ReplayError>> + Send + 'a>> {
        Box::pin(async move {
            let route = self.route(action.kind);
            let mut request = self
                .client
                .request(route.method, self.url_for(action.kind))
                .header("Idempotency-Key", action.id.to_string())
                .json(&action.payload);
            if let Some(token) = &self.auth_token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await.map_err(classify_transport_error)?;
            let status = response.status();
            if status.is_success() {
                tracing::debug!(id = %action.id, kind = %action.kind, %status, "replayed action");
                return Ok(());
            }

            let body = response.text().await.unwrap_or_default();
            Err(classify_status(status, &body))
        })
    }
}

/// Maps a non-success HTTP status to a replay error.
pub fn classify_status(status: StatusCode, body: &str) -> ReplayError {
    let message = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.trim())
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            ReplayError::Retryable(message)
        }
        s if s.is_client_error() => ReplayError::Terminal {
            status: Some(s.as_u16()),
            message,
        },
        s if s.is_server_error() => ReplayError::Retryable(message),
        _ => ReplayError::Unclassified(message),
    }
}

fn classify_transport_error(err: reqwest::Error) -> ReplayError {
    if err.is_builder() {
        ReplayError::Unclassified(err.to_string())
    } else {
        ReplayError::Retryable(err.to_string())
    }
}
