// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db;
use crate::documents::DocumentStore;
use crate::error::AppResult;
use crate::sms::Notifier;

/// Shared handler state. SQLite connections are opened per unit of work on
/// the blocking pool, so nothing here needs a lock.
#[derive(Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    pub docs: DocumentStore,
    pub notifier: Arc<dyn Notifier>,
    pub otp_ttl: Duration,
}

impl AppState {
    pub fn new(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            db_path: Arc::new(config.db_path.clone()),
            docs: DocumentStore::new(config.docs_dir.clone()),
            notifier,
            otp_ttl: config.otp_ttl,
        }
    }

    /// Runs `f` with a fresh connection on tokio's blocking pool.
    pub async fn with_conn<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = Arc::clone(&self.db_path);
        tokio::task::spawn_blocking(move || {
            let mut conn = db::open(&path)?;
            f(&mut conn)
        })
        .await?
    }
}
