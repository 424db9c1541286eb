// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runk client: connect a Strava account, sync running territories and
//! render them on a map.
//!
//! This crate talks to the Runk backend over HTTP. It keeps the browser-side
//! session state (cookies, local storage, the reconciled auth state) and
//! drives a map widget from the fetched territories.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod map;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use auth::AuthSession;
use config::Config;
use db::{LocalStore, SessionCookies};
use error::Result;
use services::{ApiClient, RunkApi, SyncGate, SyncService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub api: RunkApi,
    pub session: AuthSession,
    pub local_store: Arc<LocalStore>,
    pub sync: SyncService,
}

impl AppState {
    /// Wire the state from explicit stores.
    pub fn new(
        config: Config,
        cookies: Arc<SessionCookies>,
        local_store: Arc<LocalStore>,
    ) -> Result<Self> {
        let api = RunkApi::new(ApiClient::new(&config.backend_url, cookies)?);
        let session = AuthSession::new(api.clone());
        let sync = SyncService::new(api.clone(), SyncGate::new(local_store.clone()));

        Ok(Self {
            config,
            api,
            session,
            local_store,
            sync,
        })
    }

    /// Open the persisted stores under `config.state_dir`.
    pub fn open(config: Config) -> Result<Self> {
        let cookies = Arc::new(SessionCookies::open(config.cookie_store_path())?);
        let local_store = Arc::new(LocalStore::open(config.local_storage_path())?);
        Self::new(config, cookies, local_store)
    }
}
