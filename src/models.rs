use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Entity types ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// The fixed icon set a label may use. Clients render these by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconName {
    Tag,
    Flag,
    Star,
    Heart,
    Bell,
    Bookmark,
    Briefcase,
    Calendar,
    Clock,
    Zap,
}

impl TaskStatus {
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "TODO" => Some(TaskStatus::Todo),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "DONE" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

impl Priority {
    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "LOW" => Some(Priority::Low),
            "MEDIUM" => Some(Priority::Medium),
            "HIGH" => Some(Priority::High),
            _ => None,
        }
    }
}

impl IconName {
    pub const ALL: [IconName; 10] = [
        IconName::Tag,
        IconName::Flag,
        IconName::Star,
        IconName::Heart,
        IconName::Bell,
        IconName::Bookmark,
        IconName::Briefcase,
        IconName::Calendar,
        IconName::Clock,
        IconName::Zap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IconName::Tag => "tag",
            IconName::Flag => "flag",
            IconName::Star => "star",
            IconName::Heart => "heart",
            IconName::Bell => "bell",
            IconName::Bookmark => "bookmark",
            IconName::Briefcase => "briefcase",
            IconName::Calendar => "calendar",
            IconName::Clock => "clock",
            IconName::Zap => "zap",
        }
    }

    pub fn parse(s: &str) -> Option<IconName> {
        IconName::ALL.iter().copied().find(|i| i.as_str() == s)
    }
}

/// A task as stored. Labels are attached as an ordered id list and
/// joined into full `Label` values at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub label_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reusable label. Shared across tasks and deduplicated by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: IconName,
}

// ── API request/response types ────────────────────────────────
//
// Enum-valued and date fields arrive as raw strings so that a bad
// member or an unparseable date surfaces as a per-field validation
// error rather than a body-level deserialization failure.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

/// Partial update: absent fields stay untouched. When `labels` is
/// present the task's label set is replaced wholesale.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub labels: Option<Vec<LabelInput>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLabelRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// A task joined with its labels, as returned to clients. Optional
/// fields serialize as explicit `null` so the response shape is stable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponse {
    pub fn from_parts(task: Task, labels: Vec<Label>) -> TaskResponse {
        TaskResponse {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            labels,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
