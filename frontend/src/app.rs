// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use common::TaskStatus;
use tracing::{debug, info};

use crate::dashboard::{EmployeeDashboard, StaffDashboard};
use crate::error::{AppError, AppResult};
use crate::gateway::Backend;
use crate::login::LoginForm;
use crate::render;
use crate::router::Route;
use crate::session::Session;
use crate::task_form::{TaskCreated, TaskForm};

/// The screen currently shown, with its state.
pub enum Screen {
    Login(LoginForm),
    Employee(EmployeeDashboard),
    Staff(StaffDashboard),
}

/// Application shell: owns the session and the gateway, and swaps
/// screens on navigation.
pub struct App {
    backend: Arc<dyn Backend>,
    session: Arc<Session>,
    route: Route,
    screen: Screen,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>, session: Arc<Session>) -> Self {
        Self {
            backend,
            session,
            route: Route::Login,
            screen: Screen::Login(LoginForm::new()),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Lands on the dashboard of a session restored from a previous run,
    /// or on the login screen.
    pub async fn start(&mut self) {
        let route = self
            .session
            .identity()
            .map_or(Route::Login, |identity| Route::for_role(identity.role));
        self.navigate(route).await;
    }

    /// Shows `route` and activates its screen.
    pub async fn navigate(&mut self, route: Route) {
        info!("Navigating to {}", route);
        self.route = route;
        self.screen = match route {
            Route::Login => Screen::Login(LoginForm::new()),
            Route::EmployeeDashboard => {
                let mut dashboard = EmployeeDashboard::new();
                dashboard.activate(self.backend.as_ref(), &self.session).await;
                Screen::Employee(dashboard)
            }
            Route::ManagerDashboard | Route::AdminDashboard => {
                let mut dashboard = if route == Route::AdminDashboard {
                    StaffDashboard::admin()
                } else {
                    StaffDashboard::manager()
                };
                dashboard.activate(self.backend.as_ref()).await;
                Screen::Staff(dashboard)
            }
        };
    }

    /// Navigates by path. Unknown paths fall back to the login screen.
    pub async fn navigate_path(&mut self, path: &str) {
        let route = Route::from_path(path).unwrap_or_else(|| {
            debug!("No screen for {}, showing login.", path);
            Route::Login
        });
        self.navigate(route).await;
    }

    /// Fills the login form, submits it and follows the resulting route.
    /// On failure the login screen stays up with the message.
    pub async fn login(&mut self, username: &str, password: &str) -> AppResult<Route> {
        if !matches!(self.screen, Screen::Login(_)) {
            self.navigate(Route::Login).await;
        }
        let Screen::Login(form) = &mut self.screen else {
            return Err(AppError::validation("The login screen is not shown."));
        };
        form.set_username(username);
        form.set_password(password);
        let route = form.submit(self.backend.as_ref(), &self.session).await?;
        self.navigate(route).await;
        Ok(route)
    }

    /// Ends the session and returns to the login screen.
    pub async fn logout(&mut self) -> AppResult<()> {
        self.session.logout().await?;
        self.navigate(Route::Login).await;
        Ok(())
    }

    /// Re-activates the current screen.
    pub async fn refresh(&mut self) {
        self.navigate(self.route).await;
    }

    /// Sets the status of one of the employee's tasks.
    pub async fn update_task_status(&mut self, task_id: &str, status: TaskStatus) -> AppResult<()> {
        let Screen::Employee(dashboard) = &mut self.screen else {
            return Err(AppError::validation(
                "Task status is changed from the employee dashboard.",
            ));
        };
        dashboard
            .update_status(self.backend.as_ref(), task_id, status)
            .await?;
        Ok(())
    }

    pub async fn open_task_form(&mut self) -> AppResult<()> {
        let Screen::Staff(dashboard) = &mut self.screen else {
            return Err(AppError::validation("Only managers and admins can create tasks."));
        };
        dashboard.open_task_form(self.backend.as_ref()).await;
        Ok(())
    }

    /// The task form, when a staff dashboard is shown and the form is open.
    pub fn task_form_mut(&mut self) -> Option<&mut TaskForm> {
        match &mut self.screen {
            Screen::Staff(dashboard) if dashboard.task_form().is_open() => {
                Some(dashboard.task_form_mut())
            }
            _ => None,
        }
    }

    pub async fn submit_task(&mut self) -> AppResult<TaskCreated> {
        let Screen::Staff(dashboard) = &mut self.screen else {
            return Err(AppError::validation("Only managers and admins can create tasks."));
        };
        dashboard.submit_task(self.backend.as_ref()).await
    }

    pub fn render(&self) -> String {
        match &self.screen {
            Screen::Login(form) => render::login(form),
            Screen::Employee(dashboard) => render::employee_dashboard(dashboard),
            Screen::Staff(dashboard) => render::staff_dashboard(dashboard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::LoadState;
    use crate::testing::{StubBackend, empty_session};
    use common::{Identity, Role};

    async fn app_with(backend: Arc<StubBackend>) -> App {
        App::new(backend, Arc::new(empty_session().await))
    }

    #[tokio::test]
    async fn test_manager_login_lands_on_loaded_dashboard() {
        let backend = Arc::new(StubBackend {
            login_role: Some("manager".to_string()),
            ..StubBackend::default()
        });
        let mut app = app_with(backend.clone()).await;

        let route = app.login("alice", "secret").await.unwrap();

        assert_eq!(route, Route::ManagerDashboard);
        assert_eq!(app.route().path(), "/manager-dashboard");
        assert_eq!(app.session().employee_id(), Some("e-login".to_string()));
        assert_eq!(backend.count("list_tasks"), 1);
        assert_eq!(backend.count("list_employees"), 1);
        assert!(app.render().contains("All Tasks (3)"));
    }

    #[tokio::test]
    async fn test_failed_login_stays_on_login_screen() {
        let backend = Arc::new(StubBackend {
            login_role: Some("guest".to_string()),
            ..StubBackend::default()
        });
        let mut app = app_with(backend.clone()).await;

        let err = app.login("alice", "secret").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidRole(_)));
        assert_eq!(app.route(), Route::Login);
        assert!(app.render().contains("Error: Invalid role: guest"));
        assert_eq!(backend.count("list_tasks"), 0);
    }

    #[tokio::test]
    async fn test_start_resumes_stored_session() {
        let backend = Arc::new(StubBackend::default());
        let session = Arc::new(empty_session().await);
        session
            .set_identity(Identity {
                id: "e-2".to_string(),
                role: Role::Employee,
            })
            .await
            .unwrap();
        let mut app = App::new(backend, session);

        app.start().await;

        assert_eq!(app.route(), Route::EmployeeDashboard);
        let Screen::Employee(dashboard) = app.screen() else {
            panic!("expected the employee dashboard");
        };
        assert_eq!(dashboard.state().ready().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_returns_to_login() {
        let backend = Arc::new(StubBackend::default());
        let mut app = app_with(backend).await;
        app.login("bob", "secret").await.unwrap();

        app.logout().await.unwrap();

        assert_eq!(app.route(), Route::Login);
        assert_eq!(app.session().identity(), None);

        app.navigate(Route::EmployeeDashboard).await;
        let Screen::Employee(dashboard) = app.screen() else {
            panic!("expected the employee dashboard");
        };
        assert!(matches!(dashboard.state(), LoadState::Error(_)));
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_login() {
        let backend = Arc::new(StubBackend::default());
        let mut app = app_with(backend).await;

        app.navigate_path("/reports").await;
        assert_eq!(app.route(), Route::Login);

        app.navigate_path("/admin-dashboard").await;
        assert_eq!(app.route(), Route::AdminDashboard);
        assert!(app.render().starts_with("Admin Dashboard"));
    }

    #[tokio::test]
    async fn test_employee_can_complete_own_task() {
        let backend = Arc::new(StubBackend::default());
        let session = Arc::new(empty_session().await);
        session
            .set_identity(Identity {
                id: "e-2".to_string(),
                role: Role::Employee,
            })
            .await
            .unwrap();
        let mut app = App::new(backend.clone(), session);
        app.start().await;

        app.update_task_status("t-1", TaskStatus::Completed)
            .await
            .unwrap();

        assert!(app.render().contains("Status: Completed"));
        assert_eq!(backend.count("update_task t-1"), 1);
        assert!(app.open_task_form().await.is_err());
    }

    #[tokio::test]
    async fn test_admin_creates_task_through_the_form() {
        let backend = Arc::new(StubBackend {
            login_role: Some("admin".to_string()),
            ..StubBackend::default()
        });
        let mut app = app_with(backend.clone()).await;
        app.login("root", "secret").await.unwrap();
        assert!(app.task_form_mut().is_none());

        app.open_task_form().await.unwrap();
        let draft = app.task_form_mut().unwrap().draft_mut();
        draft.title = "Audit".to_string();
        draft.description = "Yearly audit".to_string();
        draft.deadline = "2025-12-01T10:00".to_string();
        draft.assigned_to = "e-2".to_string();

        let created = app.submit_task().await.unwrap();

        assert_eq!(created.task.title, "Audit");
        assert!(app.task_form_mut().is_none());
        assert!(app.render().contains("All Tasks (4)"));
        assert_eq!(backend.count("create_task"), 1);
        assert_eq!(backend.count("list_employees"), 1);
    }
}
