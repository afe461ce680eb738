// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Plain-text rendering of the screens.

use std::fmt::Write;

use common::{Employee, Task, TaskStatus};

use crate::dashboard::{EmployeeDashboard, LoadState, StaffDashboard};
use crate::login::{LoginForm, LoginState};
use crate::task_form::{FormState, TaskForm};

pub fn task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "  (no tasks)\n".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(out, "  [{}] {}", task.id, task.title);
        let _ = writeln!(out, "      {}", task.description);
        let _ = writeln!(
            out,
            "      Status: {} | Deadline: {} | Assigned to: {}",
            task.status,
            task.deadline.format("%Y-%m-%d"),
            task.assignee_id().unwrap_or("(unassigned)")
        );
    }
    out
}

pub fn employee_list(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "  (no employees)\n".to_string();
    }
    let mut out = String::new();
    for employee in employees {
        let _ = writeln!(out, "  [{}] {}", employee.id, employee.full_name());
        let _ = writeln!(out, "      Role: {}", employee.role);
        let _ = writeln!(out, "      Email: {}", employee.email);
        let _ = writeln!(out, "      Skills: {}", employee.skills.join(", "));
    }
    out
}

pub fn login(form: &LoginForm) -> String {
    let mut out = String::from("Login\n");
    match form.state() {
        LoginState::Submitting => out.push_str("Signing in...\n"),
        LoginState::Failed(message) => {
            let _ = writeln!(out, "Error: {message}");
        }
        LoginState::Idle | LoginState::Authenticated(_) => {}
    }
    out
}

pub fn employee_dashboard(dashboard: &EmployeeDashboard) -> String {
    match dashboard.state() {
        LoadState::Loading => "Loading...\n".to_string(),
        LoadState::Error(message) => format!("{message}\n"),
        LoadState::Ready(tasks) => {
            format!("Employee Dashboard\n\nYour Tasks\n{}", task_list(tasks))
        }
    }
}

pub fn staff_dashboard(dashboard: &StaffDashboard) -> String {
    let mut out = match dashboard.state() {
        LoadState::Loading => return "Loading...\n".to_string(),
        LoadState::Error(message) => format!("{}\n\n{message}\n", dashboard.title()),
        LoadState::Ready(data) => format!(
            "{}\n\nAll Tasks ({})\n{}\nAll Employees ({})\n{}",
            dashboard.title(),
            data.tasks.len(),
            task_list(&data.tasks),
            data.employees.len(),
            employee_list(&data.employees)
        ),
    };
    if dashboard.task_form().is_open() {
        out.push('\n');
        out.push_str(&task_form(dashboard.task_form()));
    }
    out
}

pub fn task_form(form: &TaskForm) -> String {
    let mut out = String::from("Create Task\n");
    match form.state() {
        FormState::Closed => return String::new(),
        FormState::LoadingEmployees => out.push_str("  Loading employees...\n"),
        FormState::Submitting => out.push_str("  Submitting...\n"),
        FormState::Ready => {
            let statuses: Vec<String> = TaskStatus::ALL.iter().map(ToString::to_string).collect();
            let _ = writeln!(out, "  Statuses: {}", statuses.join(", "));
            for employee in form.employees() {
                let _ = writeln!(out, "  Assignable: [{}] {}", employee.id, employee.username);
            }
        }
    }
    if let Some(message) = form.error() {
        let _ = writeln!(out, "  Error: {message}");
    }
    out
}
