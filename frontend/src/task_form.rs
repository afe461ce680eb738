// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! The "create task" modal of the staff dashboards.

use std::sync::Arc;

use common::{Employee, NewTask, Task, TaskDraft, parse_deadline};
use tracing::{debug, error, info};

use crate::directory::EmployeeDirectory;
use crate::error::{AppError, AppResult};
use crate::gateway::Backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Closed,
    LoadingEmployees,
    Ready,
    Submitting,
}

/// Produced once per successful submission. The dashboard owning the form
/// decides what to do with the new task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCreated {
    pub task: Task,
}

#[derive(Default)]
pub struct TaskForm {
    state: FormState,
    draft: TaskDraft,
    employees: Arc<Vec<Employee>>,
    error: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != FormState::Closed
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TaskDraft {
        &mut self.draft
    }

    /// Employees the task can be assigned to.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Why the last load or submission did not go through.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Opens the form with a blank draft and loads the assignable employees.
    ///
    /// A failed employee fetch does not keep the form closed: it opens with
    /// an empty list and the error message.
    pub async fn open(&mut self, backend: &dyn Backend, directory: &EmployeeDirectory) {
        self.draft = TaskDraft::default();
        self.error = None;
        self.state = FormState::LoadingEmployees;

        match directory.get(backend).await {
            Ok(employees) => self.employees = employees,
            Err(e) => {
                error!("Error fetching employees: {}", e);
                self.employees = Arc::default();
                self.error = Some(e.to_string());
            }
        }
        self.state = FormState::Ready;
    }

    pub fn cancel(&mut self) {
        debug!("Task form cancelled.");
        self.close();
    }

    fn close(&mut self) {
        self.state = FormState::Closed;
        self.draft = TaskDraft::default();
        self.error = None;
    }

    /// Validates the draft and sends it.
    ///
    /// On success the form closes and the employee directory is invalidated.
    /// On failure the form stays open with the draft and the error message.
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        directory: &EmployeeDirectory,
    ) -> AppResult<TaskCreated> {
        if self.state != FormState::Ready {
            return Err(AppError::validation("The task form is not open."));
        }

        let new_task = match validate_draft(&self.draft) {
            Ok(new_task) => new_task,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.state = FormState::Submitting;
        match backend.create_task(&new_task).await {
            Ok(task) => {
                info!("Task created successfully with ID: {}", task.id);
                directory.invalidate().await;
                self.close();
                Ok(TaskCreated { task })
            }
            Err(e) => {
                error!("Error creating task: {}", e);
                self.error = Some(e.to_string());
                self.state = FormState::Ready;
                Err(e)
            }
        }
    }
}

/// Checks every required field of the draft and builds the request payload.
pub fn validate_draft(draft: &TaskDraft) -> AppResult<NewTask> {
    if draft.title.trim().is_empty() {
        return Err(AppError::validation("Title is required."));
    }
    if draft.description.trim().is_empty() {
        return Err(AppError::validation("Description is required."));
    }
    if draft.deadline.trim().is_empty() {
        return Err(AppError::validation("Deadline is required."));
    }
    let deadline = parse_deadline(&draft.deadline).ok_or_else(|| {
        AppError::validation("Deadline must be a date and time such as 2025-06-30T17:00.")
    })?;
    if draft.assigned_to.trim().is_empty() {
        return Err(AppError::validation("An employee must be selected."));
    }

    Ok(NewTask {
        title: draft.title.clone(),
        description: draft.description.clone(),
        status: draft.status.clone(),
        deadline,
        assigned_to: draft.assigned_to.trim().to_string(),
    })
}
