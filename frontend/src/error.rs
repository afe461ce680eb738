// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use thiserror::Error;

/// Every failure a view can run into.
///
/// None of them is fatal: each one is scoped to the user action that
/// triggered it and ends up as a message on screen.
#[derive(Debug, Error)]
pub enum AppError {
    /// The backend refused the credentials.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// Network, HTTP status or decoding failure of a backend call.
    #[error("{0}")]
    RequestFailed(String),

    /// No employee id in the session.
    #[error("Employee ID not found. Please log in again.")]
    MissingSession,

    /// The backend returned a role this client does not know about.
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// User input rejected before anything was sent.
    #[error("{0}")]
    Validation(String),

    /// The session database could not be read or written.
    #[error("Session storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
