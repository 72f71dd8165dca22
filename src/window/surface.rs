use std::collections::HashMap;

use crate::keys::GlobalKey;

/// Committed state of one keyed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementState {
    pub content: Option<String>,
    pub visible: bool,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            content: None,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Content(GlobalKey, String),
    Visibility(GlobalKey, bool),
}

/// Keyed element store behind a window.
///
/// `update` and `set_visible` only queue changes; nothing becomes visible
/// to the renderer until `finalize` commits the whole batch.
#[derive(Debug, Default)]
pub struct Surface {
    committed: HashMap<GlobalKey, ElementState>,
    pending: Vec<Change>,
    commits: u64,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, key: &GlobalKey, content: impl Into<String>) {
        self.pending.push(Change::Content(key.clone(), content.into()));
    }

    pub fn set_visible(&mut self, key: &GlobalKey, visible: bool) {
        self.pending.push(Change::Visibility(key.clone(), visible));
    }

    /// Commit every queued change. Returns how many were applied.
    pub fn finalize(&mut self) -> usize {
        let applied = self.pending.len();
        for change in self.pending.drain(..) {
            match change {
                Change::Content(key, content) => {
                    self.committed.entry(key).or_default().content = Some(content);
                }
                Change::Visibility(key, visible) => {
                    self.committed.entry(key).or_default().visible = visible;
                }
            }
        }
        if applied > 0 {
            self.commits += 1;
        }
        applied
    }

    pub fn content(&self, key: &GlobalKey) -> Option<&str> {
        self.committed
            .get(key)
            .and_then(|state| state.content.as_deref())
    }

    /// Elements are visible until told otherwise.
    pub fn is_visible(&self, key: &GlobalKey) -> bool {
        self.committed.get(key).map_or(true, |state| state.visible)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of non-empty commits so far
    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}
