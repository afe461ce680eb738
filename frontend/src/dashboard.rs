// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Role dashboards.
//!
//! Each dashboard starts in `Loading` and leaves it when `activate` returns,
//! either with its data or with the message of the failure.

use std::sync::Arc;

use common::{Employee, Task, TaskStatus};
use tracing::{error, info};

use crate::directory::EmployeeDirectory;
use crate::error::{AppError, AppResult};
use crate::gateway::Backend;
use crate::session::Session;
use crate::task_form::{TaskCreated, TaskForm};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Ready(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    fn from_result(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// The logged-in employee's own tasks.
#[derive(Debug, Default)]
pub struct EmployeeDashboard {
    state: LoadState<Vec<Task>>,
}

impl EmployeeDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<Vec<Task>> {
        &self.state
    }

    /// Loads the tasks assigned to the session's employee. Without an
    /// employee id in the session nothing is requested.
    pub async fn activate(&mut self, backend: &dyn Backend, session: &Session) {
        self.state = LoadState::Loading;
        let result = match session.employee_id() {
            Some(employee_id) => backend.tasks_by_employee(&employee_id).await,
            None => Err(AppError::MissingSession),
        };
        if let Err(e) = &result {
            error!("Employee dashboard failed to load: {}", e);
        }
        self.state = LoadState::from_result(result);
    }

    /// Changes the status of one of the listed tasks and keeps the
    /// backend's version of it.
    pub async fn update_status(
        &mut self,
        backend: &dyn Backend,
        task_id: &str,
        status: TaskStatus,
    ) -> AppResult<&Task> {
        let LoadState::Ready(tasks) = &mut self.state else {
            return Err(AppError::validation("Tasks are not loaded."));
        };
        let Some(position) = tasks.iter().position(|task| task.id == task_id) else {
            return Err(AppError::validation(format!("No task with ID {task_id}.")));
        };

        let mut changed = tasks[position].clone();
        changed.status = status;
        let updated = backend.update_task(task_id, &changed).await?;
        info!("Task {} is now {}.", task_id, updated.status);

        tasks[position] = updated;
        Ok(&tasks[position])
    }
}

/// What the manager and admin dashboards show.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffData {
    pub tasks: Vec<Task>,
    pub employees: Arc<Vec<Employee>>,
}

/// Manager and admin dashboard: every task, every employee, task creation.
pub struct StaffDashboard {
    title: &'static str,
    state: LoadState<StaffData>,
    directory: EmployeeDirectory,
    task_form: TaskForm,
}

impl StaffDashboard {
    pub fn manager() -> Self {
        Self::with_title("Manager Dashboard")
    }

    pub fn admin() -> Self {
        Self::with_title("Admin Dashboard")
    }

    fn with_title(title: &'static str) -> Self {
        Self {
            title,
            state: LoadState::Loading,
            directory: EmployeeDirectory::new(),
            task_form: TaskForm::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn state(&self) -> &LoadState<StaffData> {
        &self.state
    }

    pub fn task_form(&self) -> &TaskForm {
        &self.task_form
    }

    pub fn task_form_mut(&mut self) -> &mut TaskForm {
        &mut self.task_form
    }

    /// Fetches all tasks and all employees concurrently. Both must succeed
    /// for the dashboard to be ready.
    pub async fn activate(&mut self, backend: &dyn Backend) {
        self.state = LoadState::Loading;
        self.directory.invalidate().await;

        let result = tokio::try_join!(backend.list_tasks(), self.directory.get(backend))
            .map(|(tasks, employees)| StaffData { tasks, employees });
        match &result {
            Ok(data) => info!(
                "{} loaded {} tasks and {} employees.",
                self.title,
                data.tasks.len(),
                data.employees.len()
            ),
            Err(e) => error!("Failed to fetch data: {}", e),
        }
        self.state = LoadState::from_result(result);
    }

    pub async fn open_task_form(&mut self, backend: &dyn Backend) {
        self.task_form.open(backend, &self.directory).await;
    }

    /// Submits the task form. A created task is added to the task list
    /// without reloading it.
    pub async fn submit_task(&mut self, backend: &dyn Backend) -> AppResult<TaskCreated> {
        let created = self.task_form.submit(backend, &self.directory).await?;
        if let LoadState::Ready(data) = &mut self.state {
            data.tasks.push(created.task.clone());
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubBackend, empty_session};
    use common::{Identity, Role};
    use std::time::Duration;

    async fn session_for(id: &str) -> Session {
        let session = empty_session().await;
        session
            .set_identity(Identity {
                id: id.to_string(),
                role: Role::Employee,
            })
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_employee_dashboard_loads_own_tasks() {
        let backend = StubBackend::default();
        let session = session_for("e-2").await;
        let mut dashboard = EmployeeDashboard::new();
        assert_eq!(dashboard.state(), &LoadState::Loading);

        dashboard.activate(&backend, &session).await;

        let tasks = dashboard.state().ready().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(backend.calls(), vec!["tasks_by_employee e-2".to_string()]);
    }

    #[tokio::test]
    async fn test_employee_dashboard_without_session_errors_without_fetching() {
        let backend = StubBackend::default();
        let session = empty_session().await;
        let mut dashboard = EmployeeDashboard::new();

        dashboard.activate(&backend, &session).await;

        assert_eq!(
            dashboard.state(),
            &LoadState::Error("Employee ID not found. Please log in again.".to_string())
        );
        assert_eq!(backend.count("tasks_by_employee"), 0);
    }

    #[tokio::test]
    async fn test_employee_dashboard_surfaces_fetch_failure() {
        let backend = StubBackend {
            tasks: Err("Failed to fetch: Failed to fetch tasks".to_string()),
            ..StubBackend::default()
        };
        let session = session_for("e-2").await;
        let mut dashboard = EmployeeDashboard::new();

        dashboard.activate(&backend, &session).await;

        assert_eq!(
            dashboard.state(),
            &LoadState::Error("Failed to fetch: Failed to fetch tasks".to_string())
        );
    }

    #[tokio::test]
    async fn test_update_status_replaces_local_copy() {
        let backend = StubBackend::default();
        let session = session_for("e-2").await;
        let mut dashboard = EmployeeDashboard::new();
        dashboard.activate(&backend, &session).await;

        let updated = dashboard
            .update_status(&backend, "t-2", TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);

        let tasks = dashboard.state().ready().unwrap();
        assert_eq!(tasks[1].status, TaskStatus::Completed);
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(backend.count("update_task t-2"), 1);
    }

    #[tokio::test]
    async fn test_update_status_of_unknown_task_is_rejected() {
        let backend = StubBackend::default();
        let session = session_for("e-2").await;
        let mut dashboard = EmployeeDashboard::new();
        dashboard.activate(&backend, &session).await;

        let err = dashboard
            .update_status(&backend, "t-3", TaskStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(backend.count("update_task"), 0);
    }

    #[tokio::test]
    async fn test_staff_dashboard_loads_tasks_and_employees() {
        let backend = StubBackend::default();
        let mut dashboard = StaffDashboard::manager();

        dashboard.activate(&backend).await;

        let data = dashboard.state().ready().unwrap();
        assert_eq!(data.tasks.len(), 3);
        assert_eq!(data.employees.len(), 2);
        assert_eq!(backend.count("list_tasks"), 1);
        assert_eq!(backend.count("list_employees"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_staff_dashboard_is_invariant_to_completion_order() {
        let tasks_first = StubBackend {
            employees_delay: Duration::from_millis(50),
            ..StubBackend::default()
        };
        let employees_first = StubBackend {
            tasks_delay: Duration::from_millis(50),
            ..StubBackend::default()
        };

        let mut a = StaffDashboard::admin();
        a.activate(&tasks_first).await;
        let mut b = StaffDashboard::admin();
        b.activate(&employees_first).await;

        assert_eq!(tasks_first.calls()[0], "list_tasks");
        assert_eq!(employees_first.calls()[0], "list_employees");
        assert!(a.state().ready().is_some());
        assert_eq!(a.state(), b.state());
    }

    #[tokio::test]
    async fn test_staff_dashboard_failure_is_an_error_state() {
        let backend = StubBackend {
            employees: Err("Error fetching employees: down".to_string()),
            ..StubBackend::default()
        };
        let mut dashboard = StaffDashboard::admin();

        dashboard.activate(&backend).await;

        assert_eq!(
            dashboard.state(),
            &LoadState::Error("Error fetching employees: down".to_string())
        );
    }

    #[tokio::test]
    async fn test_task_form_reuses_dashboard_employee_fetch() {
        let backend = StubBackend::default();
        let mut dashboard = StaffDashboard::manager();
        dashboard.activate(&backend).await;

        dashboard.open_task_form(&backend).await;

        assert_eq!(dashboard.task_form().employees().len(), 2);
        assert_eq!(backend.count("list_employees"), 1);
    }

    #[tokio::test]
    async fn test_created_task_is_appended_to_list() {
        let backend = StubBackend::default();
        let mut dashboard = StaffDashboard::manager();
        dashboard.activate(&backend).await;
        dashboard.open_task_form(&backend).await;
        {
            let draft = dashboard.task_form_mut().draft_mut();
            draft.title = "Plan release".to_string();
            draft.description = "Cut the branch".to_string();
            draft.deadline = "2025-07-01T09:00".to_string();
            draft.assigned_to = "e-1".to_string();
        }

        let created = dashboard.submit_task(&backend).await.unwrap();

        let data = dashboard.state().ready().unwrap();
        assert_eq!(data.tasks.len(), 4);
        assert_eq!(data.tasks.last(), Some(&created.task));
        assert!(!dashboard.task_form().is_open());
    }
}
