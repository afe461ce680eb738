// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Backend gateway: one method per REST call.
//!
//! Every call is fired once. There is no timeout, no retry and no
//! classification by status code beyond telling a refused login apart.

use async_trait::async_trait;
use common::{Employee, ErrorBody, LoginRequest, NewTask, Task};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{AppError, AppResult};

/// The calls views make against the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /employees/login`
    async fn login(&self, username: &str, password: &str) -> AppResult<Employee>;

    /// `GET /employees`
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;

    /// `GET /tasks`
    async fn list_tasks(&self) -> AppResult<Vec<Task>>;

    /// `GET /tasks/employee/{employee_id}`
    async fn tasks_by_employee(&self, employee_id: &str) -> AppResult<Vec<Task>>;

    /// `POST /tasks/create`
    async fn create_task(&self, task: &NewTask) -> AppResult<Task>;

    /// `PUT /tasks/{task_id}`
    async fn update_task(&self, task_id: &str, task: &Task) -> AppResult<Task>;
}

/// How one backend call reports its failures.
struct Operation {
    /// Prepended to every failure message.
    prefix: &'static str,
    /// Used when an error response carries no `message`.
    default_message: &'static str,
    /// A rejected status means bad credentials rather than a broken request.
    authenticates: bool,
}

const LOGIN: Operation = Operation {
    prefix: "Failed to fetch",
    default_message: "Login failed",
    authenticates: true,
};
const LIST_EMPLOYEES: Operation = Operation {
    prefix: "Error fetching employees",
    default_message: "Failed to fetch employees",
    authenticates: false,
};
const LIST_TASKS: Operation = Operation {
    prefix: "Error fetching tasks",
    default_message: "Failed to fetch tasks",
    authenticates: false,
};
const TASKS_BY_EMPLOYEE: Operation = Operation {
    prefix: "Failed to fetch",
    default_message: "Failed to fetch tasks",
    authenticates: false,
};
const CREATE_TASK: Operation = Operation {
    prefix: "Error creating task",
    default_message: "Failed to create task",
    authenticates: false,
};
const UPDATE_TASK: Operation = Operation {
    prefix: "Error updating task",
    default_message: "Failed to update task",
    authenticates: false,
};

impl Operation {
    fn transport_error(&self, err: reqwest::Error) -> AppError {
        AppError::RequestFailed(format!("{}: {}", self.prefix, err))
    }

    /// Builds the error for a non-2xx response from its raw body.
    fn status_error(&self, body: &[u8]) -> AppError {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| self.default_message.to_string());
        let message = format!("{}: {}", self.prefix, message);
        if self.authenticates {
            AppError::AuthenticationFailed(message)
        } else {
            AppError::RequestFailed(message)
        }
    }
}

/// [`Backend`] over HTTP.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// Creates a gateway rooted at `base_url`; paths are appended to it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            error!("{}: transport failure: {}", operation.prefix, e);
            operation.transport_error(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = operation.status_error(&body);
            error!("Backend answered {}: {}", status.as_u16(), err);
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            error!("{}: undecodable response: {}", operation.prefix, e);
            operation.transport_error(e)
        })
    }
}

#[async_trait]
impl Backend for HttpGateway {
    async fn login(&self, username: &str, password: &str) -> AppResult<Employee> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let request = self.request(Method::POST, "employees/login").json(&body);
        self.execute(&LOGIN, request).await
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let request = self.request(Method::GET, "employees");
        self.execute(&LIST_EMPLOYEES, request).await
    }

    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        let request = self.request(Method::GET, "tasks");
        self.execute(&LIST_TASKS, request).await
    }

    async fn tasks_by_employee(&self, employee_id: &str) -> AppResult<Vec<Task>> {
        let request = self.request(Method::GET, &format!("tasks/employee/{employee_id}"));
        self.execute(&TASKS_BY_EMPLOYEE, request).await
    }

    async fn create_task(&self, task: &NewTask) -> AppResult<Task> {
        let request = self.request(Method::POST, "tasks/create").json(task);
        self.execute(&CREATE_TASK, request).await
    }

    async fn update_task(&self, task_id: &str, task: &Task) -> AppResult<Task> {
        let request = self
            .request(Method::PUT, &format!("tasks/{task_id}"))
            .json(task);
        self.execute(&UPDATE_TASK, request).await
    }
}
