// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Date-time forms without an offset, read as UTC. The backend stores
/// deadlines this way and a `datetime-local` input produces the first two.
const LOCAL_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// The three roles the backend hands out.
///
/// Serialized in lowercase, which is also the spelling the backend uses
/// for the `role` field of an employee.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// Resolves a raw role string. Matching is exact: `"Admin"` is not a role.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user for the current session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub role: Role,
}

/// An employee as returned by the backend.
///
/// `role` stays a plain string here. It is only resolved into a [`Role`]
/// at login, so that an unknown value is reported as such instead of
/// failing the whole response decode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: String,

    pub username: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email: String,

    pub role: String,

    #[serde(default)]
    pub skills: Vec<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Progress of a task. The wire strings are the labels shown to users.
///
/// A status the backend sends outside the three known labels is kept
/// verbatim in `Other` and sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Other(String),
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Other(label) => label.as_str(),
        }
    }

    /// Maps a wire label. Only the exact known labels become known statuses.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == label)
            .unwrap_or_else(|| Self::Other(label.to_string()))
    }

    /// Parses a label typed by a user. Case and separators (`-`, `_`, space)
    /// are ignored, so `in-progress` and `In Progress` are the same status.
    /// Only the known statuses can be chosen.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized: String = input
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL.into_iter().find(|status| {
            status
                .label()
                .chars()
                .filter(|c| *c != ' ')
                .flat_map(char::to_lowercase)
                .eq(normalized.chars())
        })
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Reads a deadline: RFC 3339, or a date and time without offset taken
/// as UTC.
pub fn parse_deadline(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(deadline) = DateTime::parse_from_rfc3339(input) {
        return Some(deadline.with_timezone(&Utc));
    }
    LOCAL_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_deadline<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_deadline(&raw).ok_or_else(|| de::Error::custom(format!("invalid deadline '{raw}'")))
}

/// The employee a task is assigned to.
///
/// Depending on the endpoint the backend either populates the reference
/// with the full employee document or sends only its id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AssignedTo {
    Employee(Box<Employee>),
    Id(String),
}

impl AssignedTo {
    pub fn id(&self) -> &str {
        match self {
            Self::Employee(employee) => &employee.id,
            Self::Id(id) => id,
        }
    }
}

/// Represents a task within the system.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    pub description: String,

    pub status: TaskStatus,

    #[serde(deserialize_with = "deserialize_deadline")]
    pub deadline: DateTime<Utc>,

    /// `None` when the assignee no longer exists: the backend then sends
    /// `null` in place of the populated employee.
    #[serde(default)]
    pub assigned_to: Option<AssignedTo>,
}

impl Task {
    pub fn assignee_id(&self) -> Option<&str> {
        self.assigned_to.as_ref().map(AssignedTo::id)
    }
}

/// The task form as the user is filling it in.
///
/// Every field except `status` is raw input; nothing is checked until the
/// draft is turned into a [`NewTask`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: String,
    pub assigned_to: String,
}

/// Payload of a task creation request. Built from a validated draft.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: DateTime<Utc>,
    pub assigned_to: String,
}

/// Body of `POST /employees/login`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
