//! Model behind the layout editor screen.
//!
//! The editor keeps a fixed number of active slots that are always packed
//! to the left: an empty slot is never followed by an occupied one.

use log::{debug, info};

use crate::feature::{FeatureConfig, FeatureDescriptor};

pub const CAPACITY_REACHED: &str = "Can't add, max number of elements reached.";
pub const SELECT_TO_ADD: &str = "Select a feature from the Available Feature list to add.";
pub const SELECT_TO_REMOVE: &str = "Select a feature from the Active Feature list to remove.";
pub const NO_DESCRIPTION: &str = "-- Select a feature to see its description --";

/// A highlightable entry in one of the two lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRef {
    Available(usize),
    Active(usize),
}

/// One position in the candidate layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    pub label: Option<String>,
    pub visible: bool,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
    }

    fn fill(&mut self, label: String) {
        self.label = Some(label);
        self.visible = true;
    }

    fn clear(&mut self) {
        self.label = None;
        self.visible = false;
    }
}

#[derive(Debug, Clone)]
pub struct CompositionEditor {
    catalog: Vec<FeatureDescriptor>,
    slots: Vec<Slot>,
    rows: usize,
    cols: usize,
    next_free: usize,
    selection: Option<EntryRef>,
    feedback: String,
}

impl CompositionEditor {
    pub fn new(catalog: Vec<FeatureDescriptor>, rows: usize, cols: usize) -> Self {
        let capacity = rows * cols;
        debug!(
            "Editor opened with {} catalog entries and {} slots",
            catalog.len(),
            capacity
        );
        Self {
            catalog,
            slots: vec![Slot::default(); capacity],
            rows,
            cols,
            next_free: 0,
            selection: None,
            feedback: String::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn catalog(&self) -> &[FeatureDescriptor] {
        &self.catalog
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot labels with empty slots as `""`.
    pub fn slot_labels(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|slot| slot.label.as_deref().unwrap_or(""))
            .collect()
    }

    pub fn next_free_index(&self) -> usize {
        self.next_free
    }

    pub fn selection(&self) -> Option<EntryRef> {
        self.selection
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn dimension_line(&self) -> String {
        format!(
            "Rows: {} | Columns: {} | Max Elements: {}",
            self.rows,
            self.cols,
            self.capacity()
        )
    }

    /// Description of the highlighted entry's feature type.
    pub fn selected_description(&self) -> &str {
        let type_id = match self.selection {
            Some(EntryRef::Available(index)) => self.catalog.get(index).map(|d| d.type_id.as_str()),
            Some(EntryRef::Active(index)) => self.slots.get(index).and_then(|s| s.label.as_deref()),
            None => None,
        };
        type_id
            .and_then(|id| self.catalog.iter().find(|d| d.type_id == id))
            .map_or(NO_DESCRIPTION, |d| d.description.as_str())
    }

    /// Highlight `entry`, replacing any earlier highlight.
    ///
    /// Entries that do not exist, including empty active slots, cannot be
    /// highlighted; the call is ignored and returns `false`.
    pub fn select_entry(&mut self, entry: EntryRef) -> bool {
        let exists = match entry {
            EntryRef::Available(index) => index < self.catalog.len(),
            EntryRef::Active(index) => self.slots.get(index).is_some_and(|slot| !slot.is_empty()),
        };
        if exists {
            self.selection = Some(entry);
        }
        exists
    }

    pub fn add_enabled(&self) -> bool {
        matches!(self.selection, Some(EntryRef::Available(_)))
    }

    pub fn remove_enabled(&self) -> bool {
        matches!(self.selection, Some(EntryRef::Active(_)))
    }

    /// Copy the highlighted catalog entry into the first free slot.
    pub fn add_selected_to_active(&mut self) -> bool {
        let Some(EntryRef::Available(index)) = self.selection else {
            self.feedback = SELECT_TO_ADD.to_string();
            return false;
        };
        let Some(descriptor) = self.catalog.get(index) else {
            self.feedback = SELECT_TO_ADD.to_string();
            return false;
        };

        if self.next_free == self.capacity() {
            self.feedback = CAPACITY_REACHED.to_string();
            return false;
        }

        let label = descriptor.type_id.clone();
        debug!("Adding '{}' to slot {}", label, self.next_free);
        self.slots[self.next_free].fill(label);
        self.next_free += 1;
        true
    }

    /// Remove the highlighted active slot and pull later slots forward.
    pub fn remove_selected_from_active(&mut self) -> bool {
        let Some(EntryRef::Active(location)) = self.selection else {
            self.feedback = SELECT_TO_REMOVE.to_string();
            return false;
        };
        if self.slots.get(location).is_none_or(Slot::is_empty) {
            self.feedback = SELECT_TO_REMOVE.to_string();
            return false;
        }

        debug!("Removing slot {}", location);
        self.slots[location].label = None;

        let last = self.capacity() - 1;
        for i in location..location + self.next_free {
            if i != last && !self.slots[i + 1].is_empty() {
                let moved = self.slots[i + 1].label.clone();
                self.slots[i].label = moved;
            } else {
                self.slots[i].clear();
                break;
            }
        }

        self.next_free = self.next_free.saturating_sub(1);
        if self.next_free != self.capacity() {
            self.feedback.clear();
        }
        self.selection = None;
        true
    }

    /// Turn the occupied slots into main window features, row-major.
    ///
    /// Slot `i` lands at row `i / cols`, column `i % cols`, and is shifted
    /// `i` hours so default clocks never show the same time.
    pub fn commit(&self) -> Vec<FeatureConfig> {
        let configs: Vec<FeatureConfig> = self.slots[..self.next_free]
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let label = slot.label.as_deref()?;
                let descriptor = self.catalog.iter().find(|d| d.type_id == label)?;
                Some(
                    FeatureConfig::new(
                        descriptor.type_id.clone(),
                        index / self.cols,
                        index % self.cols,
                    )
                    .with_param("utcOffsetHours", index as i64),
                )
            })
            .collect();
        info!("Editor committed {} features", configs.len());
        configs
    }

    /// True when no occupied slot follows an empty one.
    pub fn is_left_packed(&self) -> bool {
        let occupied = self.slots.iter().take_while(|slot| !slot.is_empty()).count();
        occupied == self.next_free && self.slots[occupied..].iter().all(Slot::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::Position;

    fn catalog() -> Vec<FeatureDescriptor> {
        vec![
            FeatureDescriptor::new("Clock", "Simple clock."),
            FeatureDescriptor::new("Clock2", "Simple clock 2."),
            FeatureDescriptor::new("Network", "Network interfaces."),
        ]
    }

    fn add(editor: &mut CompositionEditor, index: usize) -> bool {
        assert!(editor.select_entry(EntryRef::Available(index)));
        editor.add_selected_to_active()
    }

    #[test]
    fn test_selection_toggles_add_and_remove() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        assert!(!editor.add_enabled());
        assert!(!editor.remove_enabled());

        add(&mut editor, 0);
        assert!(editor.add_enabled());
        assert!(!editor.remove_enabled());

        assert!(editor.select_entry(EntryRef::Active(0)));
        assert!(!editor.add_enabled());
        assert!(editor.remove_enabled());
    }

    #[test]
    fn test_empty_slots_cannot_be_selected() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        assert!(!editor.select_entry(EntryRef::Active(0)));
        assert!(!editor.select_entry(EntryRef::Available(9)));
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_fifth_add_hits_capacity() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        for i in 0..4 {
            assert!(add(&mut editor, i % 3));
        }
        let before = editor.slots().to_vec();

        assert!(!add(&mut editor, 1));
        assert_eq!(editor.slots(), before.as_slice());
        assert_eq!(editor.next_free_index(), 4);
        assert_eq!(editor.feedback(), CAPACITY_REACHED);
    }

    #[test]
    fn test_add_without_selection_sets_feedback() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        assert!(!editor.add_selected_to_active());
        assert_eq!(editor.feedback(), SELECT_TO_ADD);

        assert!(!editor.remove_selected_from_active());
        assert_eq!(editor.feedback(), SELECT_TO_REMOVE);
    }

    #[test]
    fn test_remove_first_slot_compacts_left() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        add(&mut editor, 0);
        add(&mut editor, 1);
        assert_eq!(editor.slot_labels(), vec!["Clock", "Clock2", "", ""]);

        editor.select_entry(EntryRef::Active(0));
        assert!(editor.remove_selected_from_active());

        assert_eq!(editor.slot_labels(), vec!["Clock2", "", "", ""]);
        assert_eq!(editor.next_free_index(), 1);
        assert_eq!(editor.selection(), None);
        assert!(!editor.slots()[1].visible);
        assert!(editor.is_left_packed());
    }

    #[test]
    fn test_remove_from_full_list_clears_feedback() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        for i in 0..4 {
            add(&mut editor, i % 3);
        }
        add(&mut editor, 0);
        assert_eq!(editor.feedback(), CAPACITY_REACHED);

        editor.select_entry(EntryRef::Active(3));
        editor.remove_selected_from_active();

        assert_eq!(editor.slot_labels(), vec!["Clock", "Clock2", "Network", ""]);
        assert_eq!(editor.feedback(), "");
    }

    #[test]
    fn test_commit_places_slots_row_major() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        add(&mut editor, 0);
        add(&mut editor, 0);
        add(&mut editor, 2);

        let configs = editor.commit();
        let positions: Vec<Position> = configs.iter().map(|c| c.position).collect();
        assert_eq!(
            positions,
            vec![Position::new(0, 0), Position::new(0, 1), Position::new(1, 0)]
        );
        assert_eq!(configs[2].type_id, "Network");
        assert_eq!(configs[1].params["utcOffsetHours"], 1);
    }

    #[test]
    fn test_description_follows_selection() {
        let mut editor = CompositionEditor::new(catalog(), 2, 2);
        assert_eq!(editor.selected_description(), NO_DESCRIPTION);

        editor.select_entry(EntryRef::Available(2));
        assert_eq!(editor.selected_description(), "Network interfaces.");
        assert_eq!(editor.dimension_line(), "Rows: 2 | Columns: 2 | Max Elements: 4");
    }
}
