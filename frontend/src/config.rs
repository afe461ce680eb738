// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use reqwest::Url;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_SESSION_DB_URL: &str = "sqlite://database/session.db";

/// Startup settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `TASKS_API_URL`: root of the REST backend.
    pub api_url: Url,
    /// `SESSION_DB_URL`: where the session is kept between runs.
    pub session_db_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("TASKS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url)
            .with_context(|| format!("TASKS_API_URL is not a valid URL: {api_url}"))?;
        let session_db_url =
            lookup("SESSION_DB_URL").unwrap_or_else(|| DEFAULT_SESSION_DB_URL.to_string());
        Ok(Self {
            api_url,
            session_db_url,
        })
    }
}
