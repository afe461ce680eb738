// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! In-process backend used by the unit tests of the views.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use common::{AssignedTo, Employee, NewTask, Task, TaskStatus};
use parking_lot::Mutex;

use crate::error::{AppError, AppResult};
use crate::gateway::Backend;
use crate::session::Session;
use crate::storage;

pub fn employee(id: &str, username: &str, role: &str) -> Employee {
    Employee {
        id: id.to_string(),
        username: username.to_string(),
        first_name: username.to_string(),
        last_name: "Doe".to_string(),
        email: format!("{username}@example.com"),
        role: role.to_string(),
        skills: vec!["Rust".to_string()],
    }
}

pub fn task(id: &str, title: &str, assigned_to: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        status: TaskStatus::Pending,
        deadline: Utc.with_ymd_and_hms(2025, 6, 30, 17, 0, 0).unwrap(),
        assigned_to: Some(AssignedTo::Id(assigned_to.to_string())),
    }
}

pub async fn empty_session() -> Session {
    let pool = storage::establish_connection_pool("sqlite::memory:")
        .await
        .unwrap();
    Session::restore(pool).await.unwrap()
}

/// Canned answers plus a log of every call made.
pub struct StubBackend {
    /// Role of the account returned by `login`; `None` refuses the credentials.
    pub login_role: Option<String>,
    pub employees: Result<Vec<Employee>, String>,
    pub tasks: Result<Vec<Task>, String>,
    pub create_error: Option<String>,
    pub tasks_delay: Duration,
    pub employees_delay: Duration,
    pub calls_log: Mutex<Vec<String>>,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            login_role: Some("employee".to_string()),
            employees: Ok(vec![
                employee("e-1", "alice", "manager"),
                employee("e-2", "bob", "employee"),
            ]),
            tasks: Ok(vec![
                task("t-1", "Write report", "e-2"),
                task("t-2", "Review code", "e-2"),
                task("t-3", "Plan sprint", "e-1"),
            ]),
            create_error: None,
            tasks_delay: Duration::ZERO,
            employees_delay: Duration::ZERO,
            calls_log: Mutex::new(Vec::new()),
        }
    }
}

impl StubBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls_log.lock().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls_log.lock().iter().filter(|c| c.starts_with(call)).count()
    }

    fn record(&self, call: String) {
        self.calls_log.lock().push(call);
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn login(&self, username: &str, _password: &str) -> AppResult<Employee> {
        self.record(format!("login {username}"));
        match &self.login_role {
            Some(role) => Ok(employee("e-login", username, role)),
            None => Err(AppError::AuthenticationFailed(
                "Failed to fetch: Invalid credentials".to_string(),
            )),
        }
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        tokio::time::sleep(self.employees_delay).await;
        self.record("list_employees".to_string());
        self.employees.clone().map_err(AppError::RequestFailed)
    }

    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        tokio::time::sleep(self.tasks_delay).await;
        self.record("list_tasks".to_string());
        self.tasks.clone().map_err(AppError::RequestFailed)
    }

    async fn tasks_by_employee(&self, employee_id: &str) -> AppResult<Vec<Task>> {
        self.record(format!("tasks_by_employee {employee_id}"));
        let tasks = self.tasks.clone().map_err(AppError::RequestFailed)?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.assignee_id() == Some(employee_id))
            .collect())
    }

    async fn create_task(&self, new_task: &NewTask) -> AppResult<Task> {
        self.record(format!("create_task {}", new_task.title));
        if let Some(message) = &self.create_error {
            return Err(AppError::RequestFailed(message.clone()));
        }
        Ok(Task {
            id: format!("t-new-{}", self.count("create_task")),
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            status: new_task.status.clone(),
            deadline: new_task.deadline,
            assigned_to: Some(AssignedTo::Id(new_task.assigned_to.clone())),
        })
    }

    async fn update_task(&self, task_id: &str, task: &Task) -> AppResult<Task> {
        self.record(format!("update_task {task_id}"));
        Ok(task.clone())
    }
}
