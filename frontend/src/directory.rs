// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use common::Employee;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::AppResult;
use crate::gateway::Backend;

/// Employee list shared by a dashboard and its task form.
///
/// Fetched at most once until invalidated. The lock is held across the
/// fetch, so callers arriving while it is in flight wait for that same
/// response instead of issuing their own.
#[derive(Default)]
pub struct EmployeeDirectory {
    cached: Mutex<Option<Arc<Vec<Employee>>>>,
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, backend: &dyn Backend) -> AppResult<Arc<Vec<Employee>>> {
        let mut cached = self.cached.lock().await;
        if let Some(employees) = cached.as_ref() {
            debug!("Employee list served from cache.");
            return Ok(Arc::clone(employees));
        }
        let employees = Arc::new(backend.list_employees().await?);
        *cached = Some(Arc::clone(&employees));
        Ok(employees)
    }

    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }
}
