// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the Runk backend.
//!
//! Handles:
//! - Joining request paths onto the configured backend origin
//! - Attaching the session cookie jar when credentials are requested
//! - Mapping transport failures, non-2xx statuses and unparseable bodies
//!   onto [`AppError`]
//!
//! There is no retry, timeout or backoff at this layer.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use crate::db::SessionCookies;
use crate::error::{AppError, Result};

/// Backend API client.
///
/// Holds two reqwest clients: one wired to the cookie jar (credentials
/// included) and one without any cookie handling.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    credentialed: reqwest::Client,
    anonymous: reqwest::Client,
    cookies: Arc<SessionCookies>,
}

impl ApiClient {
    /// Create a client for `base_url` sharing the given cookie jar.
    pub fn new(base_url: &str, cookies: Arc<SessionCookies>) -> Result<Self> {
        let credentialed = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        let client = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentialed,
            anonymous: reqwest::Client::new(),
            cookies,
        };

        tracing::info!(base_url = %client.base_url, "API client initialized");
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The cookie jar credentialed requests read from and write to.
    pub fn cookies(&self) -> &Arc<SessionCookies> {
        &self.cookies
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn http(&self, with_credentials: bool) -> &reqwest::Client {
        if with_credentials {
            &self.credentialed
        } else {
            &self.anonymous
        }
    }

    /// GET `path` and parse the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, with_credentials: bool) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, with_credentials, "GET request");

        let response = self
            .http(with_credentials)
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        self.check_response_json(response).await
    }

    /// POST an optional JSON body to `path` and parse the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        with_credentials: bool,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(url = %url, with_credentials, "POST request");

        let mut request = self
            .http(with_credentials)
            .post(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        self.check_response_json(response).await
    }

    /// GET `path` and return the status code with the raw body, whatever the
    /// status. Used where the caller judges the body before the status.
    pub async fn get_text(&self, path: &str, with_credentials: bool) -> Result<(u16, String)> {
        let url = self.url(path);
        tracing::debug!(url = %url, with_credentials, "GET request (raw body)");

        let response = self
            .http(with_credentials)
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.connection_error(e))?;
        Ok((status, body))
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %response.url(), "Backend returned error status");
            return Err(AppError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.connection_error(e))?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Unparseable response body");
            AppError::MalformedBody(body)
        })
    }

    fn connection_error(&self, error: reqwest::Error) -> AppError {
        tracing::error!(error = %error, origin = %self.base_url, "Backend request failed");
        AppError::Connection {
            origin: self.base_url.clone(),
        }
    }
}
