// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::{Identity, Role};
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};
use crate::gateway::Backend;
use crate::router::Route;
use crate::session::Session;

/// Where the login form stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginState {
    #[default]
    Idle,
    Submitting,
    Authenticated(Role),
    Failed(String),
}

/// The login screen: two fields and the outcome of the last submission.
#[derive(Debug, Default)]
pub struct LoginForm {
    username: String,
    password: String,
    state: LoginState,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Message of the last failed attempt, kept until the user edits a field.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoginState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
        self.clear_failure();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        self.clear_failure();
    }

    fn clear_failure(&mut self) {
        if matches!(self.state, LoginState::Failed(_)) {
            self.state = LoginState::Idle;
        }
    }

    /// Authenticates against the backend and stores the identity.
    ///
    /// Returns the dashboard matching the account's role. Empty fields are
    /// rejected before any request is made and leave the form untouched.
    pub async fn submit(&mut self, backend: &dyn Backend, session: &Session) -> AppResult<Route> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::validation("Username and password are required."));
        }

        debug!("Submitting login for {}", self.username);
        self.state = LoginState::Submitting;

        match authenticate(backend, session, &self.username, &self.password).await {
            Ok(role) => {
                self.state = LoginState::Authenticated(role);
                Ok(Route::for_role(role))
            }
            Err(e) => {
                error!("Login failed for {}: {}", self.username, e);
                self.state = LoginState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

async fn authenticate(
    backend: &dyn Backend,
    session: &Session,
    username: &str,
    password: &str,
) -> AppResult<Role> {
    let employee = backend.login(username, password).await?;
    let role =
        Role::from_wire(&employee.role).ok_or_else(|| AppError::InvalidRole(employee.role.clone()))?;

    session
        .set_identity(Identity {
            id: employee.id.clone(),
            role,
        })
        .await?;

    info!("Employee {} logged in as {}.", employee.id, role);
    Ok(role)
}
