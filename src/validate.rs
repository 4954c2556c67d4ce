//! Request validation.
//!
//! Every write endpoint runs its body through here before touching the
//! store. Validation either yields normalized, typed values or a list of
//! `{field, message}` errors for a 400 response. It never partially
//! applies anything.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::models::{
    CreateTaskRequest, IconName, LabelInput, Priority, TaskStatus, UpdateLabelRequest,
    UpdateTaskRequest,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> FieldError {
        FieldError { field: field.into(), message: message.into() }
    }
}

/// A fully validated task body, defaults applied.
#[derive(Debug, Clone)]
pub struct ValidTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub labels: Vec<ValidLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLabel {
    pub name: String,
    pub color: String,
    pub icon: IconName,
}

/// A validated partial update. `due_date` distinguishes "leave alone"
/// (None) from "set/clear" (Some); an empty string on the wire clears.
#[derive(Debug, Clone, Default)]
pub struct ValidPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub labels: Option<Vec<ValidLabel>>,
}

#[derive(Debug, Clone, Default)]
pub struct ValidLabelPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<IconName>,
}

// ── Task bodies ────────────────────────────────────────────────

pub fn validate_create(req: &CreateTaskRequest) -> Result<ValidTask, Vec<FieldError>> {
    let mut errors = Vec::new();

    if req.title.is_empty() {
        errors.push(FieldError::new("title", "title is required"));
    }

    let priority = match req.priority.as_deref() {
        None => Priority::Medium,
        Some(s) => match Priority::parse(s) {
            Some(p) => p,
            None => {
                errors.push(FieldError::new("priority", "priority must be LOW, MEDIUM or HIGH"));
                Priority::Medium
            }
        },
    };

    let status = match req.status.as_deref() {
        None => TaskStatus::Todo,
        Some(s) => match TaskStatus::parse(s) {
            Some(st) => st,
            None => {
                errors.push(FieldError::new("status", "status must be TODO, IN_PROGRESS or DONE"));
                TaskStatus::Todo
            }
        },
    };

    // An empty string from the date input means "no due date".
    let due_date = match req.due_date.as_deref() {
        None | Some("") => None,
        Some(s) => match parse_due_date(s) {
            Some(dt) => Some(dt),
            None => {
                errors.push(FieldError::new("dueDate", "dueDate is not a valid date"));
                None
            }
        },
    };

    let mut labels = Vec::new();
    for (i, input) in req.labels.iter().enumerate() {
        match validate_label_at(input, &format!("labels[{i}]")) {
            Ok(label) => labels.push(label),
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if errors.is_empty() {
        Ok(ValidTask {
            title: req.title.clone(),
            description: req.description.clone(),
            status,
            priority,
            due_date,
            labels,
        })
    } else {
        Err(errors)
    }
}

pub fn validate_update(req: &UpdateTaskRequest) -> Result<ValidPatch, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut patch = ValidPatch::default();

    match &req.title {
        Some(title) if title.is_empty() => {
            errors.push(FieldError::new("title", "title must not be empty"));
        }
        Some(title) => patch.title = Some(title.clone()),
        None => {}
    }

    patch.description = req.description.clone();

    if let Some(s) = req.priority.as_deref() {
        match Priority::parse(s) {
            Some(p) => patch.priority = Some(p),
            None => errors.push(FieldError::new("priority", "priority must be LOW, MEDIUM or HIGH")),
        }
    }

    if let Some(s) = req.status.as_deref() {
        match TaskStatus::parse(s) {
            Some(st) => patch.status = Some(st),
            None => errors.push(FieldError::new("status", "status must be TODO, IN_PROGRESS or DONE")),
        }
    }

    match req.due_date.as_deref() {
        None => {}
        Some("") => patch.due_date = Some(None),
        Some(s) => match parse_due_date(s) {
            Some(dt) => patch.due_date = Some(Some(dt)),
            None => errors.push(FieldError::new("dueDate", "dueDate is not a valid date")),
        },
    }

    if let Some(inputs) = &req.labels {
        let mut labels = Vec::new();
        for (i, input) in inputs.iter().enumerate() {
            match validate_label_at(input, &format!("labels[{i}]")) {
                Ok(label) => labels.push(label),
                Err(mut errs) => errors.append(&mut errs),
            }
        }
        patch.labels = Some(labels);
    }

    if errors.is_empty() { Ok(patch) } else { Err(errors) }
}

// ── Label bodies ───────────────────────────────────────────────

pub fn validate_label(input: &LabelInput) -> Result<ValidLabel, Vec<FieldError>> {
    validate_label_at(input, "")
}

fn validate_label_at(input: &LabelInput, prefix: &str) -> Result<ValidLabel, Vec<FieldError>> {
    let at = |field: &str| {
        if prefix.is_empty() { field.to_string() } else { format!("{prefix}.{field}") }
    };
    let mut errors = Vec::new();

    if input.name.is_empty() {
        errors.push(FieldError::new(at("name"), "name is required"));
    }
    if !is_hex_color(&input.color) {
        errors.push(FieldError::new(at("color"), "color must be a hex color like #RGB or #RRGGBB"));
    }
    let icon = match IconName::parse(&input.icon) {
        Some(icon) => icon,
        None => {
            errors.push(FieldError::new(at("icon"), "icon is not a recognized icon name"));
            IconName::Tag
        }
    };

    if errors.is_empty() {
        Ok(ValidLabel { name: input.name.clone(), color: input.color.clone(), icon })
    } else {
        Err(errors)
    }
}

pub fn validate_label_update(req: &UpdateLabelRequest) -> Result<ValidLabelPatch, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut patch = ValidLabelPatch::default();

    match &req.name {
        Some(name) if name.is_empty() => {
            errors.push(FieldError::new("name", "name must not be empty"));
        }
        Some(name) => patch.name = Some(name.clone()),
        None => {}
    }

    if let Some(color) = &req.color {
        if is_hex_color(color) {
            patch.color = Some(color.clone());
        } else {
            errors.push(FieldError::new("color", "color must be a hex color like #RGB or #RRGGBB"));
        }
    }

    if let Some(s) = req.icon.as_deref() {
        match IconName::parse(s) {
            Some(icon) => patch.icon = Some(icon),
            None => errors.push(FieldError::new("icon", "icon is not a recognized icon name")),
        }
    }

    if errors.is_empty() { Ok(patch) } else { Err(errors) }
}

// ── Field helpers ──────────────────────────────────────────────

/// `#RGB` or `#RRGGBB`, case-insensitive.
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (the form's
/// date input submits the latter), normalized to UTC.
pub fn parse_due_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

// ── Tests ──────────────────────────────────────────────────────
