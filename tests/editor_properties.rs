use desk_clock::editor::{CAPACITY_REACHED, CompositionEditor, EntryRef};
use desk_clock::feature::FeatureDescriptor;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    SelectAvailable(usize),
    SelectActive(usize),
    Add,
    Remove,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0usize..4).prop_map(Action::SelectAvailable),
        (0usize..7).prop_map(Action::SelectActive),
        Just(Action::Add),
        Just(Action::Remove),
    ]
}

fn catalog() -> Vec<FeatureDescriptor> {
    vec![
        FeatureDescriptor::new("Clock", "Simple clock."),
        FeatureDescriptor::new("Network", "Network interfaces."),
        FeatureDescriptor::new("PublicIp", "Public address lookup."),
    ]
}

fn apply(editor: &mut CompositionEditor, action: &Action) {
    match *action {
        Action::SelectAvailable(index) => {
            editor.select_entry(EntryRef::Available(index));
        }
        Action::SelectActive(index) => {
            editor.select_entry(EntryRef::Active(index));
        }
        Action::Add => {
            editor.add_selected_to_active();
        }
        Action::Remove => {
            editor.remove_selected_from_active();
        }
    }
}

#[test]
fn test_removing_the_middle_slot_pulls_later_slots_forward() {
    let mut editor = CompositionEditor::new(catalog(), 2, 2);
    for index in [0, 1, 2] {
        editor.select_entry(EntryRef::Available(index));
        editor.add_selected_to_active();
    }

    editor.select_entry(EntryRef::Active(1));
    assert!(editor.remove_selected_from_active());

    assert_eq!(editor.slot_labels(), vec!["Clock", "PublicIp", "", ""]);
    assert_eq!(editor.next_free_index(), 2);
    assert!(editor.is_left_packed());
}

#[test]
fn test_full_editor_reports_capacity_then_recovers_after_remove() {
    let mut editor = CompositionEditor::new(catalog(), 1, 2);
    editor.select_entry(EntryRef::Available(0));
    assert!(editor.add_selected_to_active());
    assert!(editor.add_selected_to_active());
    assert!(!editor.add_selected_to_active());
    assert_eq!(editor.feedback(), CAPACITY_REACHED);

    editor.select_entry(EntryRef::Active(0));
    assert!(editor.remove_selected_from_active());
    assert_eq!(editor.feedback(), "");
    assert_eq!(editor.next_free_index(), 1);
}

proptest! {
    #[test]
    fn prop_active_slots_stay_left_packed(
        rows in 1usize..4,
        cols in 1usize..4,
        actions in prop::collection::vec(action(), 0..60),
    ) {
        let mut editor = CompositionEditor::new(catalog(), rows, cols);
        for action in &actions {
            apply(&mut editor, action);
            prop_assert!(editor.is_left_packed(), "not packed after {:?}", action);
            prop_assert!(editor.next_free_index() <= editor.capacity());
        }
    }

    #[test]
    fn prop_commit_places_slots_row_major(
        cols in 1usize..4,
        actions in prop::collection::vec(action(), 0..40),
    ) {
        let mut editor = CompositionEditor::new(catalog(), 3, cols);
        for action in &actions {
            apply(&mut editor, action);
        }

        let layout = editor.commit();
        prop_assert_eq!(layout.len(), editor.next_free_index());
        for (index, config) in layout.iter().enumerate() {
            prop_assert_eq!(config.position.row, index / cols);
            prop_assert_eq!(config.position.col, index % cols);
            prop_assert_eq!(config.params.get("utcOffsetHours").and_then(|v| v.as_i64()), Some(index as i64));
        }
    }
}
