// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use common::TaskStatus;
use frontend::app::App;
use frontend::config::Config;
use frontend::error::{AppError, AppResult};
use frontend::gateway::HttpGateway;
use frontend::router::Route;
use frontend::session::Session;
use frontend::storage;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

const LOGIN_HELP: &str = "Enter your credentials (Ctrl-D to quit).";
const EMPLOYEE_HELP: &str = "Commands: status <task-id> <status>, refresh, logout, quit";
const STAFF_HELP: &str = "Commands: add, submit, cancel, refresh, logout, quit";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;

    ensure_database_dir(&config.session_db_url)?;
    let pool = storage::establish_connection_pool(&config.session_db_url).await?;
    let session = Arc::new(Session::restore(pool).await?);

    let gateway = HttpGateway::new(config.api_url.clone()).context("Failed to build HTTP client")?;
    tracing::info!("Using the task backend at {}", gateway.base_url());

    let mut app = App::new(Arc::new(gateway), session);
    app.start().await;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("\n{}", app.render());
        let keep_going = match app.route() {
            Route::Login => login_screen(&mut app, &mut input).await?,
            Route::EmployeeDashboard => {
                println!("{EMPLOYEE_HELP}");
                dashboard_command(&mut app, &mut input).await?
            }
            Route::ManagerDashboard | Route::AdminDashboard => {
                println!("{STAFF_HELP}");
                dashboard_command(&mut app, &mut input).await?
            }
        };
        if !keep_going {
            break;
        }
    }

    tracing::info!("Bye.");
    Ok(())
}

/// File path of a `sqlite:` URL, in either the `sqlite://path` or the
/// `sqlite:path` form. `None` for in-memory databases and other schemes.
fn database_path(database_url: &str) -> Option<&str> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}

/// sqlx creates the database file but not the directory holding it.
fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_path(database_url) else {
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Prints `label` and reads one line. `None` once stdin is closed.
async fn prompt<R>(input: &mut Lines<R>, label: &str) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    print!("{label}");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    input.next_line().await.context("Failed to read stdin")
}

async fn login_screen<R>(app: &mut App, input: &mut Lines<R>) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    println!("{LOGIN_HELP}");
    let Some(username) = prompt(input, "Username: ").await? else {
        return Ok(false);
    };
    let Some(password) = prompt(input, "Password: ").await? else {
        return Ok(false);
    };
    if let Err(e) = app.login(username.trim(), password.trim_end()).await {
        // Refused logins are shown by the login screen itself.
        if matches!(e, AppError::Validation(_)) {
            println!("{e}");
        }
    }
    Ok(true)
}

async fn dashboard_command<R>(app: &mut App, input: &mut Lines<R>) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let Some(line) = prompt(input, "> ").await? else {
        return Ok(false);
    };
    let mut words = line.split_whitespace();
    let outcome = match words.next() {
        None => Ok(()),
        Some("quit" | "exit") => return Ok(false),
        Some("refresh") => {
            app.refresh().await;
            Ok(())
        }
        Some("logout") => app.logout().await,
        Some("status") => {
            let task_id = words.next().unwrap_or_default();
            let status = words.collect::<Vec<_>>().join(" ");
            match TaskStatus::parse(&status) {
                Some(status) => app.update_task_status(task_id, status).await,
                None => {
                    println!("Unknown status '{status}'.");
                    Ok(())
                }
            }
        }
        Some("add") => match open_task_form(app).await {
            Ok(()) => match read_task_answers(input).await? {
                Some(answers) => fill_task_form(app, answers).await,
                None => return Ok(false),
            },
            Err(e) => Err(e),
        },
        Some("submit") => app.submit_task().await.map(|created| {
            println!("Task created successfully! ({})", created.task.id);
        }),
        Some("cancel") => {
            if let Some(form) = app.task_form_mut() {
                form.cancel();
            }
            Ok(())
        }
        Some(other) => {
            println!("Unknown command '{other}'.");
            Ok(())
        }
    };
    if let Err(e) = outcome {
        println!("Error: {e}");
    }
    Ok(true)
}

async fn open_task_form(app: &mut App) -> AppResult<()> {
    if app.task_form_mut().is_none() {
        app.open_task_form().await?;
        println!("\n{}", app.render());
    }
    Ok(())
}

/// Answers to the task form prompts, in prompt order.
struct TaskAnswers {
    title: String,
    description: String,
    status: String,
    deadline: String,
    assigned_to: String,
}

/// Asks for every field of the task form. `None` when stdin closes before
/// the last answer.
async fn read_task_answers<R>(input: &mut Lines<R>) -> Result<Option<TaskAnswers>>
where
    R: AsyncBufRead + Unpin,
{
    let labels = [
        "Title: ",
        "Description: ",
        "Status [Pending/In Progress/Completed]: ",
        "Deadline (YYYY-MM-DDTHH:MM): ",
        "Assign to (employee id): ",
    ];
    let mut answers = Vec::with_capacity(labels.len());
    for label in labels {
        let Some(answer) = prompt(input, label).await? else {
            return Ok(None);
        };
        answers.push(answer.trim().to_string());
    }
    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();
    Ok(Some(TaskAnswers {
        title: next(),
        description: next(),
        status: next(),
        deadline: next(),
        assigned_to: next(),
    }))
}

/// Copies the answers into the open form and submits it. A blank answer
/// keeps the current value.
async fn fill_task_form(app: &mut App, answers: TaskAnswers) -> AppResult<()> {
    let Some(form) = app.task_form_mut() else {
        return Err(AppError::Validation("The task form is not open.".to_string()));
    };
    let draft = form.draft_mut();
    for (field, value) in [
        (&mut draft.title, answers.title),
        (&mut draft.description, answers.description),
        (&mut draft.deadline, answers.deadline),
        (&mut draft.assigned_to, answers.assigned_to),
    ] {
        if !value.is_empty() {
            *field = value;
        }
    }
    let status = answers.status;
    if !status.is_empty() {
        match TaskStatus::parse(&status) {
            Some(status) => draft.status = status,
            None => println!("Unknown status '{status}', keeping {}.", draft.status),
        }
    }

    let created = app.submit_task().await?;
    println!("Task created successfully! ({})", created.task.id);
    Ok(())
}
