//! Task & label persistence over redb.
//!
//! One database file, three tables: tasks, labels, and a name index for
//! label find-or-create. A task row carries its label ids; labels are
//! joined into responses at read time. Every operation is one
//! transaction, so a task is never persisted without the labels its
//! request asked for.

use crate::models::{Label, Task, TaskResponse};
use crate::validate::{ValidLabel, ValidLabelPatch, ValidPatch};
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");
const LABELS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("labels");
const LABEL_NAME_INDEX: TableDefinition<&str, &[u8]> = TableDefinition::new("label_name_index");

/// Thin handle to the database. Cloneable (Arc inside).
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open (or create) the database at the given path.
    /// Creates tables if they don't exist.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TASKS_TABLE)?;
            let _ = write_txn.open_table(LABELS_TABLE)?;
            let _ = write_txn.open_table(LABEL_NAME_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Store { db: Arc::new(db) })
    }

    // ── Task operations ────────────────────────────────────────

    /// Persist a new task together with its labels, atomically.
    ///
    /// Each label is resolved by name: an existing label is reused as-is
    /// (its stored color/icon win over the incoming ones), a missing one
    /// is created. Attaching the same label twice is a no-op.
    pub fn create_task_with_labels(
        &self,
        mut task: Task,
        inputs: &[ValidLabel],
    ) -> Result<TaskResponse, StoreError> {
        let write_txn = self.db.begin_write()?;
        let attached;
        {
            let mut labels_table = write_txn.open_table(LABELS_TABLE)?;
            let mut name_index = write_txn.open_table(LABEL_NAME_INDEX)?;

            attached = attach_labels(&mut task, &mut labels_table, &mut name_index, inputs)?;

            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let task_bytes = postcard::to_allocvec(&task)
                .map_err(|e| StoreError::Encode(e.to_string()))?;
            tasks_table.insert(task.id.as_bytes().as_slice(), task_bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(TaskResponse::from_parts(task, attached))
    }

    pub fn get_task(&self, id: Uuid) -> Result<Option<TaskResponse>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let tasks_table = read_txn.open_table(TASKS_TABLE)?;

        let task = match tasks_table.get(id.as_bytes().as_slice())? {
            Some(data) => postcard::from_bytes::<Task>(data.value())
                .map_err(|e| StoreError::Decode(e.to_string()))?,
            None => return Ok(None),
        };

        let labels_table = read_txn.open_table(LABELS_TABLE)?;
        let mut labels = Vec::with_capacity(task.label_ids.len());
        for label_id in &task.label_ids {
            if let Some(data) = labels_table.get(label_id.as_bytes().as_slice())? {
                let label: Label = postcard::from_bytes(data.value())
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                labels.push(label);
            }
        }

        Ok(Some(TaskResponse::from_parts(task, labels)))
    }

    /// All tasks with labels joined, due date ascending. Tasks without a
    /// due date sink to the end; creation time then id break ties so
    /// repeated listings come back in the same order.
    pub fn list_tasks(&self) -> Result<Vec<TaskResponse>, StoreError> {
        let read_txn = self.db.begin_read()?;

        // Load all labels into an id -> label map (avoids N+1 lookups)
        let labels_table = read_txn.open_table(LABELS_TABLE)?;
        let mut labels_by_id = HashMap::new();
        for entry in labels_table.iter()? {
            let (_, value) = entry?;
            let label: Label = postcard::from_bytes(value.value())
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            labels_by_id.insert(label.id, label);
        }

        let tasks_table = read_txn.open_table(TASKS_TABLE)?;
        let mut tasks = Vec::new();
        for entry in tasks_table.iter()? {
            let (_, value) = entry?;
            let task: Task = postcard::from_bytes(value.value())
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            tasks.push(task);
        }

        tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x
                .cmp(&y)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)),
        });

        let responses = tasks
            .into_iter()
            .map(|task| {
                let labels = task
                    .label_ids
                    .iter()
                    .filter_map(|id| labels_by_id.get(id).cloned())
                    .collect();
                TaskResponse::from_parts(task, labels)
            })
            .collect();
        Ok(responses)
    }

    /// Apply a validated patch. When the patch carries a label list the
    /// task's label set is replaced (find-or-create, same transaction);
    /// otherwise the existing set stands. Returns None if the task is
    /// missing.
    pub fn update_task_with_labels(
        &self,
        id: Uuid,
        patch: &ValidPatch,
    ) -> Result<Option<TaskResponse>, StoreError> {
        let write_txn = self.db.begin_write()?;
        let mut response = None;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let existing = match tasks_table.get(id.as_bytes().as_slice())? {
                Some(data) => Some(
                    postcard::from_bytes::<Task>(data.value())
                        .map_err(|e| StoreError::Decode(e.to_string()))?,
                ),
                None => None,
            };

            if let Some(mut task) = existing {
                if let Some(title) = &patch.title {
                    task.title = title.clone();
                }
                if let Some(description) = &patch.description {
                    task.description = Some(description.clone());
                }
                if let Some(status) = patch.status {
                    task.status = status;
                }
                if let Some(priority) = patch.priority {
                    task.priority = priority;
                }
                if let Some(due_date) = patch.due_date {
                    task.due_date = due_date;
                }

                let mut labels_table = write_txn.open_table(LABELS_TABLE)?;
                let attached = match &patch.labels {
                    Some(inputs) => {
                        let mut name_index = write_txn.open_table(LABEL_NAME_INDEX)?;
                        task.label_ids.clear();
                        attach_labels(&mut task, &mut labels_table, &mut name_index, inputs)?
                    }
                    None => {
                        let mut labels = Vec::with_capacity(task.label_ids.len());
                        for label_id in &task.label_ids {
                            if let Some(data) = labels_table.get(label_id.as_bytes().as_slice())? {
                                let label: Label = postcard::from_bytes(data.value())
                                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                                labels.push(label);
                            }
                        }
                        labels
                    }
                };

                task.updated_at = Utc::now();
                let task_bytes = postcard::to_allocvec(&task)
                    .map_err(|e| StoreError::Encode(e.to_string()))?;
                tasks_table.insert(task.id.as_bytes().as_slice(), task_bytes.as_slice())?;
                response = Some(TaskResponse::from_parts(task, attached));
            }
        }
        write_txn.commit()?;
        Ok(response)
    }

    pub fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let write_txn = self.db.begin_write()?;
        let deleted;
        {
            let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
            let result = tasks_table.remove(id.as_bytes().as_slice())?;
            deleted = result.is_some();
        }
        write_txn.commit()?;
        Ok(deleted)
    }

    // ── Label operations ───────────────────────────────────────

    pub fn list_labels(&self) -> Result<Vec<Label>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let labels_table = read_txn.open_table(LABELS_TABLE)?;

        let mut labels = Vec::new();
        for entry in labels_table.iter()? {
            let (_, value) = entry?;
            let label: Label = postcard::from_bytes(value.value())
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            labels.push(label);
        }
        labels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(labels)
    }

    /// Find-or-create: an existing name returns the stored label
    /// untouched, a new name persists the given color/icon.
    pub fn create_label(&self, input: &ValidLabel) -> Result<Label, StoreError> {
        let write_txn = self.db.begin_write()?;
        let label;
        {
            let mut labels_table = write_txn.open_table(LABELS_TABLE)?;
            let mut name_index = write_txn.open_table(LABEL_NAME_INDEX)?;
            label = find_or_create_label(&mut labels_table, &mut name_index, input)?;
        }
        write_txn.commit()?;
        Ok(label)
    }

    /// Update a label's fields, keeping the name index in step. Renaming
    /// onto a name another label holds is rejected: the index is a unique
    /// key and find-or-create depends on it.
    pub fn update_label(
        &self,
        id: Uuid,
        patch: &ValidLabelPatch,
    ) -> Result<Option<Label>, StoreError> {
        let write_txn = self.db.begin_write()?;
        let mut updated = None;
        {
            let mut labels_table = write_txn.open_table(LABELS_TABLE)?;
            let mut name_index = write_txn.open_table(LABEL_NAME_INDEX)?;

            let existing = match labels_table.get(id.as_bytes().as_slice())? {
                Some(data) => Some(
                    postcard::from_bytes::<Label>(data.value())
                        .map_err(|e| StoreError::Decode(e.to_string()))?,
                ),
                None => None,
            };

            if let Some(mut label) = existing {
                let old_name = label.name.clone();

                if let Some(name) = &patch.name {
                    if *name != old_name {
                        let taken = match name_index.get(name.as_str())? {
                            Some(data) => data.value() != label.id.as_bytes().as_slice(),
                            None => false,
                        };
                        if taken {
                            return Err(StoreError::LabelNameTaken);
                        }
                        label.name = name.clone();
                    }
                }
                if let Some(color) = &patch.color {
                    label.color = color.clone();
                }
                if let Some(icon) = patch.icon {
                    label.icon = icon;
                }

                let label_bytes = postcard::to_allocvec(&label)
                    .map_err(|e| StoreError::Encode(e.to_string()))?;
                labels_table.insert(label.id.as_bytes().as_slice(), label_bytes.as_slice())?;
                name_index.insert(label.name.as_str(), label.id.as_bytes().as_slice())?;
                if label.name != old_name {
                    name_index.remove(old_name.as_str())?;
                }
                updated = Some(label);
            }
        }
        write_txn.commit()?;
        Ok(updated)
    }

    /// Remove a label and detach it from every task carrying it, in one
    /// transaction.
    pub fn delete_label(&self, id: Uuid) -> Result<bool, StoreError> {
        let write_txn = self.db.begin_write()?;
        let deleted;
        {
            let mut labels_table = write_txn.open_table(LABELS_TABLE)?;
            let removed = match labels_table.remove(id.as_bytes().as_slice())? {
                Some(data) => Some(
                    postcard::from_bytes::<Label>(data.value())
                        .map_err(|e| StoreError::Decode(e.to_string()))?,
                ),
                None => None,
            };
            deleted = removed.is_some();

            if let Some(label) = removed {
                let mut name_index = write_txn.open_table(LABEL_NAME_INDEX)?;
                name_index.remove(label.name.as_str())?;

                let mut tasks_table = write_txn.open_table(TASKS_TABLE)?;
                let mut carrying = Vec::new();
                for entry in tasks_table.iter()? {
                    let (_, value) = entry?;
                    let task: Task = postcard::from_bytes(value.value())
                        .map_err(|e| StoreError::Decode(e.to_string()))?;
                    if task.label_ids.contains(&id) {
                        carrying.push(task);
                    }
                }
                for mut task in carrying {
                    task.label_ids.retain(|label_id| *label_id != id);
                    let task_bytes = postcard::to_allocvec(&task)
                        .map_err(|e| StoreError::Encode(e.to_string()))?;
                    tasks_table.insert(task.id.as_bytes().as_slice(), task_bytes.as_slice())?;
                }
            }
        }
        write_txn.commit()?;
        Ok(deleted)
    }
}

// ── Transaction helpers ────────────────────────────────────────

/// Resolve each input by name and attach it to the task. Returns the
/// attached labels in attachment order; an id already on the task is
/// skipped.
fn attach_labels(
    task: &mut Task,
    labels_table: &mut redb::Table<&'static [u8], &'static [u8]>,
    name_index: &mut redb::Table<&'static str, &'static [u8]>,
    inputs: &[ValidLabel],
) -> Result<Vec<Label>, StoreError> {
    let mut attached = Vec::with_capacity(inputs.len());
    for input in inputs {
        let label = find_or_create_label(labels_table, name_index, input)?;
        if !task.label_ids.contains(&label.id) {
            task.label_ids.push(label.id);
            attached.push(label);
        }
    }
    Ok(attached)
}

fn find_or_create_label(
    labels_table: &mut redb::Table<&'static [u8], &'static [u8]>,
    name_index: &mut redb::Table<&'static str, &'static [u8]>,
    input: &ValidLabel,
) -> Result<Label, StoreError> {
    let existing_id = match name_index.get(input.name.as_str())? {
        Some(data) => Some(
            Uuid::from_slice(data.value()).map_err(|e| StoreError::Decode(e.to_string()))?,
        ),
        None => None,
    };

    match existing_id {
        Some(id) => {
            let data = labels_table
                .get(id.as_bytes().as_slice())?
                .ok_or_else(|| StoreError::Decode(format!("label '{}' indexed but missing", input.name)))?;
            postcard::from_bytes(data.value()).map_err(|e| StoreError::Decode(e.to_string()))
        }
        None => {
            let label = Label {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                color: input.color.clone(),
                icon: input.icon,
            };
            let label_bytes = postcard::to_allocvec(&label)
                .map_err(|e| StoreError::Encode(e.to_string()))?;
            labels_table.insert(label.id.as_bytes().as_slice(), label_bytes.as_slice())?;
            name_index.insert(label.name.as_str(), label.id.as_bytes().as_slice())?;
            Ok(label)
        }
    }
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StoreError {
    Redb(String),
    Decode(String),
    Encode(String),
    /// Renaming a label onto a name another label already holds.
    LabelNameTaken,
}

// redb 2.x has many error types. Blanket them all into StoreError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Redb(e) => write!(f, "redb: {e}"),
            StoreError::Decode(e) => write!(f, "decode: {e}"),
            StoreError::Encode(e) => write!(f, "encode: {e}"),
            StoreError::LabelNameTaken => write!(f, "label name already in use"),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IconName, Priority, TaskStatus};
    use crate::validate::ValidLabelPatch;
    use chrono::{DateTime, TimeZone};
    use std::fs;

    /// Create a temp database that auto-cleans.
    fn temp_store(name: &str) -> (Store, String) {
        let path = format!("/tmp/taskboard_test_{name}_{}.redb", std::process::id());
        let _ = fs::remove_file(&path); // clean up any leftover
        let store = Store::open(&path).unwrap();
        (store, path)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_file(path);
    }

    fn new_task(title: &str, due_date: Option<DateTime<Utc>>) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date,
            label_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn label(name: &str, color: &str, icon: IconName) -> ValidLabel {
        ValidLabel { name: name.to_string(), color: color.to_string(), icon }
    }

    fn due(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn create_with_labels_and_reload() {
        let (store, path) = temp_store("create");

        let created = store
            .create_task_with_labels(
                new_task("Buy milk", None),
                &[label("Urgent", "#FF0000", IconName::Flag), label("Home", "#00FF00", IconName::Tag)],
            )
            .unwrap();
        assert_eq!(created.labels.len(), 2);
        assert_eq!(created.labels[0].name, "Urgent");

        let fetched = store.get_task(created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.labels, created.labels);

        cleanup(&path);
    }

    #[test]
    fn label_reused_across_tasks() {
        let (store, path) = temp_store("reuse");

        let first = store
            .create_task_with_labels(new_task("A", None), &[label("Urgent", "#FF0000", IconName::Flag)])
            .unwrap();
        let second = store
            .create_task_with_labels(new_task("B", None), &[label("Urgent", "#FF0000", IconName::Flag)])
            .unwrap();

        assert_eq!(first.labels[0].id, second.labels[0].id);
        assert_eq!(store.list_labels().unwrap().len(), 1);

        cleanup(&path);
    }

    #[test]
    fn existing_label_keeps_stored_color_and_icon() {
        let (store, path) = temp_store("keep_color");

        store
            .create_task_with_labels(new_task("A", None), &[label("Urgent", "#FF0000", IconName::Flag)])
            .unwrap();
        let second = store
            .create_task_with_labels(new_task("B", None), &[label("Urgent", "#0000FF", IconName::Star)])
            .unwrap();

        assert_eq!(second.labels[0].color, "#FF0000");
        assert_eq!(second.labels[0].icon, IconName::Flag);

        cleanup(&path);
    }

    #[test]
    fn duplicate_label_in_one_request_attaches_once() {
        let (store, path) = temp_store("dup");

        let created = store
            .create_task_with_labels(
                new_task("A", None),
                &[
                    label("Urgent", "#FF0000", IconName::Flag),
                    label("Urgent", "#FF0000", IconName::Flag),
                ],
            )
            .unwrap();

        assert_eq!(created.labels.len(), 1);
        assert_eq!(store.get_task(created.id).unwrap().unwrap().labels.len(), 1);

        cleanup(&path);
    }

    #[test]
    fn list_orders_by_due_date_nulls_last() {
        let (store, path) = temp_store("order");

        store
            .create_task_with_labels(new_task("March", Some(due(2024, 3, 1))), &[])
            .unwrap();
        store
            .create_task_with_labels(new_task("January", Some(due(2024, 1, 1))), &[])
            .unwrap();
        store.create_task_with_labels(new_task("Someday", None), &[]).unwrap();

        let titles: Vec<String> =
            store.list_tasks().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["January", "March", "Someday"]);

        cleanup(&path);
    }

    #[test]
    fn listing_is_stable_between_calls() {
        let (store, path) = temp_store("stable");

        for i in 0..5 {
            store
                .create_task_with_labels(new_task(&format!("Task {i}"), None), &[])
                .unwrap();
        }

        let first: Vec<Uuid> = store.list_tasks().unwrap().iter().map(|t| t.id).collect();
        let second: Vec<Uuid> = store.list_tasks().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(first, second);

        cleanup(&path);
    }

    #[test]
    fn update_replaces_label_set_when_present() {
        let (store, path) = temp_store("update_labels");

        let created = store
            .create_task_with_labels(new_task("A", None), &[label("Urgent", "#FF0000", IconName::Flag)])
            .unwrap();

        let patch = ValidPatch {
            labels: Some(vec![label("Home", "#00FF00", IconName::Tag)]),
            ..ValidPatch::default()
        };
        let updated = store.update_task_with_labels(created.id, &patch).unwrap().unwrap();

        assert_eq!(updated.labels.len(), 1);
        assert_eq!(updated.labels[0].name, "Home");
        // The detached label still exists for other tasks
        assert_eq!(store.list_labels().unwrap().len(), 2);

        cleanup(&path);
    }

    #[test]
    fn update_without_labels_keeps_label_set() {
        let (store, path) = temp_store("update_scalars");

        let created = store
            .create_task_with_labels(new_task("A", None), &[label("Urgent", "#FF0000", IconName::Flag)])
            .unwrap();

        let patch = ValidPatch {
            title: Some("B".to_string()),
            status: Some(TaskStatus::Done),
            due_date: Some(Some(due(2024, 6, 1))),
            ..ValidPatch::default()
        };
        let updated = store.update_task_with_labels(created.id, &patch).unwrap().unwrap();

        assert_eq!(updated.title, "B");
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.due_date, Some(due(2024, 6, 1)));
        assert_eq!(updated.labels.len(), 1);
        assert!(updated.updated_at >= created.updated_at);

        cleanup(&path);
    }

    #[test]
    fn update_missing_task_returns_none() {
        let (store, path) = temp_store("update_missing");
        let result = store.update_task_with_labels(Uuid::new_v4(), &ValidPatch::default()).unwrap();
        assert!(result.is_none());
        cleanup(&path);
    }

    #[test]
    fn delete_task_reports_presence() {
        let (store, path) = temp_store("delete");

        let created = store.create_task_with_labels(new_task("A", None), &[]).unwrap();
        assert!(store.delete_task(created.id).unwrap());
        assert!(!store.delete_task(created.id).unwrap());
        assert!(store.get_task(created.id).unwrap().is_none());

        cleanup(&path);
    }

    #[test]
    fn create_label_finds_existing_by_name() {
        let (store, path) = temp_store("find_or_create");

        let first = store.create_label(&label("Urgent", "#FF0000", IconName::Flag)).unwrap();
        let second = store.create_label(&label("Urgent", "#0000FF", IconName::Star)).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.color, "#FF0000");
        assert_eq!(store.list_labels().unwrap().len(), 1);

        cleanup(&path);
    }

    #[test]
    fn labels_listed_in_name_order() {
        let (store, path) = temp_store("label_order");

        store.create_label(&label("Work", "#FF0000", IconName::Briefcase)).unwrap();
        store.create_label(&label("Errands", "#00FF00", IconName::Tag)).unwrap();

        let names: Vec<String> =
            store.list_labels().unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, ["Errands", "Work"]);

        cleanup(&path);
    }

    #[test]
    fn rename_moves_the_name_index() {
        let (store, path) = temp_store("rename");

        let created = store.create_label(&label("Urgent", "#FF0000", IconName::Flag)).unwrap();
        let patch = ValidLabelPatch { name: Some("Critical".to_string()), ..Default::default() };
        let renamed = store.update_label(created.id, &patch).unwrap().unwrap();
        assert_eq!(renamed.name, "Critical");

        // The new name resolves to the same label...
        let by_new_name = store.create_label(&label("Critical", "#123456", IconName::Tag)).unwrap();
        assert_eq!(by_new_name.id, created.id);

        // ...and the old name is free again
        let by_old_name = store.create_label(&label("Urgent", "#654321", IconName::Tag)).unwrap();
        assert_ne!(by_old_name.id, created.id);

        cleanup(&path);
    }

    #[test]
    fn rename_onto_taken_name_is_rejected() {
        let (store, path) = temp_store("rename_conflict");

        store.create_label(&label("Urgent", "#FF0000", IconName::Flag)).unwrap();
        let other = store.create_label(&label("Home", "#00FF00", IconName::Tag)).unwrap();

        let patch = ValidLabelPatch { name: Some("Urgent".to_string()), ..Default::default() };
        let result = store.update_label(other.id, &patch);
        assert!(matches!(result, Err(StoreError::LabelNameTaken)));

        // Nothing changed
        let unchanged = store.list_labels().unwrap();
        assert!(unchanged.iter().any(|l| l.name == "Home"));

        cleanup(&path);
    }

    #[test]
    fn update_missing_label_returns_none() {
        let (store, path) = temp_store("label_missing");
        let result = store.update_label(Uuid::new_v4(), &ValidLabelPatch::default()).unwrap();
        assert!(result.is_none());
        cleanup(&path);
    }

    #[test]
    fn delete_label_detaches_from_tasks() {
        let (store, path) = temp_store("delete_label");

        let created = store
            .create_task_with_labels(
                new_task("A", None),
                &[label("Urgent", "#FF0000", IconName::Flag), label("Home", "#00FF00", IconName::Tag)],
            )
            .unwrap();
        let urgent_id = created.labels[0].id;

        assert!(store.delete_label(urgent_id).unwrap());
        assert!(!store.delete_label(urgent_id).unwrap());

        let fetched = store.get_task(created.id).unwrap().unwrap();
        assert_eq!(fetched.labels.len(), 1);
        assert_eq!(fetched.labels[0].name, "Home");

        // The freed name can be created anew
        let recreated = store.create_label(&label("Urgent", "#AA0000", IconName::Flag)).unwrap();
        assert_ne!(recreated.id, urgent_id);

        cleanup(&path);
    }
}
