//! Client-side mirror of server state.
//!
//! The list entry provides [`CacheTag::List`] and one [`CacheTag::Task`] per
//! task it holds; a single-task entry provides its own `Task` tag.
//! Invalidating a tag marks every providing entry stale. Stale entries stay
//! readable for display until the next fetch replaces them.

use std::collections::HashMap;

use crate::domain::task::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    List,
    Task(TaskId),
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stale: bool,
}

impl<T> Entry<T> {
    fn fresh(value: T) -> Self {
        Self { value, stale: false }
    }
}

/// Snapshot of the entries touched by an optimistic edit.
#[must_use = "keep the patch to undo it if the server rejects the change"]
#[derive(Debug, Clone)]
pub struct CachePatch {
    id: TaskId,
    list_before: Option<Task>,
    single_before: Option<Task>,
}

impl CachePatch {
    pub fn is_empty(&self) -> bool {
        self.list_before.is_none() && self.single_before.is_none()
    }
}

#[derive(Debug, Default)]
pub struct TaskCache {
    list: Option<Entry<Vec<Task>>>,
    tasks: HashMap<TaskId, Entry<Task>>,
}

impl TaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached list, stale or not.
    pub fn list(&self) -> Option<&[Task]> {
        self.list.as_ref().map(|e| e.value.as_slice())
    }

    pub fn fresh_list(&self) -> Option<&[Task]> {
        self.list.as_ref().filter(|e| !e.stale).map(|e| e.value.as_slice())
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id).map(|e| &e.value)
    }

    pub fn fresh_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id).filter(|e| !e.stale).map(|e| &e.value)
    }

    pub fn store_list(&mut self, tasks: Vec<Task>) {
        self.list = Some(Entry::fresh(tasks));
    }

    pub fn store_task(&mut self, task: Task) {
        self.tasks.insert(task.id, Entry::fresh(task));
    }

    pub fn is_stale(&self, tag: &CacheTag) -> bool {
        match tag {
            CacheTag::List => self.list.as_ref().is_none_or(|e| e.stale),
            CacheTag::Task(id) => self.tasks.get(id).is_none_or(|e| e.stale),
        }
    }

    pub fn invalidate(&mut self, tags: &[CacheTag]) {
        for tag in tags {
            match tag {
                CacheTag::List => {
                    if let Some(list) = self.list.as_mut() {
                        list.stale = true;
                    }
                }
                CacheTag::Task(id) => {
                    if let Some(entry) = self.tasks.get_mut(id) {
                        entry.stale = true;
                    }
                    if let Some(list) = self.list.as_mut() {
                        if list.value.iter().any(|t| t.id == *id) {
                            list.stale = true;
                        }
                    }
                }
            }
        }
    }

    /// Applies `edit` to every cached copy of task `id` and returns the
    /// pre-edit snapshot. Copies that are not cached are skipped.
    pub fn patch(&mut self, id: TaskId, edit: impl Fn(&mut Task)) -> CachePatch {
        let mut list_before = None;
        if let Some(list) = self.list.as_mut() {
            if let Some(task) = list.value.iter_mut().find(|t| t.id == id) {
                list_before = Some(task.clone());
                edit(task);
            }
        }

        let mut single_before = None;
        if let Some(entry) = self.tasks.get_mut(&id) {
            single_before = Some(entry.value.clone());
            edit(&mut entry.value);
        }

        CachePatch { id, list_before, single_before }
    }

    /// Restores the copies captured by `patch`, if they are still cached.
    pub fn undo(&mut self, patch: CachePatch) {
        if let Some(before) = patch.list_before {
            if let Some(list) = self.list.as_mut() {
                if let Some(task) = list.value.iter_mut().find(|t| t.id == patch.id) {
                    *task = before;
                }
            }
        }
        if let Some(before) = patch.single_before {
            if let Some(entry) = self.tasks.get_mut(&patch.id) {
                entry.value = before;
            }
        }
    }
}
