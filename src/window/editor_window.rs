use std::time::Duration;

use log::{debug, warn};
use ratatui::style::{Modifier, Style};

use super::{Signal, Surface, WindowEvent, WindowKind, WindowSession, events};
use crate::editor::{CompositionEditor, EntryRef};
use crate::tui::element::{ColumnBuilder, RowBuilder};
use crate::tui::{Element, LayoutConstraint, TextRole};

/// Layout editor screen wrapping a [`CompositionEditor`].
pub struct EditorWindow {
    editor: CompositionEditor,
    surface: Surface,
    closed: bool,
}

fn parse_entry(id: &str) -> Option<EntryRef> {
    if let Some(index) = id.strip_prefix(events::EDITOR_AVAILABLE_PREFIX) {
        return index.parse().ok().map(EntryRef::Available);
    }
    if let Some(index) = id.strip_prefix(events::EDITOR_ACTIVE_PREFIX) {
        return index.parse().ok().map(EntryRef::Active);
    }
    None
}

impl EditorWindow {
    pub fn new(editor: CompositionEditor) -> Self {
        debug!("Editor window created ({})", editor.dimension_line());
        Self {
            editor,
            surface: Surface::new(),
            closed: false,
        }
    }

    pub fn editor(&self) -> &CompositionEditor {
        &self.editor
    }

    fn available_list(&self) -> Element {
        let selection = self.editor.selection();
        let buttons = self
            .editor
            .catalog()
            .iter()
            .enumerate()
            .map(|(i, descriptor)| {
                Element::button(events::available_entry(i), descriptor.type_id.clone())
                    .highlighted(selection == Some(EntryRef::Available(i)))
                    .build()
            })
            .collect();
        Element::panel(Element::column(buttons).build())
            .title("Available Features")
            .build()
    }

    fn active_list(&self) -> Element {
        let selection = self.editor.selection();
        let buttons = self
            .editor
            .slots()
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                Element::button(events::active_entry(i), slot.label.clone().unwrap_or_default())
                    .highlighted(selection == Some(EntryRef::Active(i)))
                    .visible(slot.visible)
                    .build()
            })
            .collect();
        Element::panel(Element::column(buttons).build())
            .title("Active Features")
            .build()
    }

    fn transfer_buttons(&self) -> Element {
        ColumnBuilder::new()
            .add(Element::Spacer, LayoutConstraint::Fill(1))
            .add(
                Element::button(events::EDITOR_ADD, ">>")
                    .enabled(self.editor.add_enabled())
                    .build(),
                LayoutConstraint::Length(3),
            )
            .add(
                Element::button(events::EDITOR_REMOVE, "<<")
                    .enabled(self.editor.remove_enabled())
                    .build(),
                LayoutConstraint::Length(3),
            )
            .add(Element::Spacer, LayoutConstraint::Fill(1))
            .build()
    }
}

impl WindowSession for EditorWindow {
    fn kind(&self) -> WindowKind {
        WindowKind::Editor
    }

    fn timeout(&self) -> Option<Duration> {
        None
    }

    fn handle_event(&mut self, event: &WindowEvent) -> anyhow::Result<Option<Signal>> {
        let Some(id) = event.element_id() else {
            return Ok(None);
        };

        match id {
            events::EDITOR_ADD => {
                self.editor.add_selected_to_active();
            }
            events::EDITOR_REMOVE => {
                self.editor.remove_selected_from_active();
            }
            events::EDITOR_SAVE => return Ok(Some(Signal::Apply(self.editor.commit()))),
            events::EDITOR_EXIT => return Ok(Some(Signal::Close)),
            other => match parse_entry(other) {
                Some(entry) => {
                    if !self.editor.select_entry(entry) {
                        debug!("Ignoring selection of {:?}", entry);
                    }
                }
                None => warn!("Editor received unknown event '{}'", other),
            },
        }
        Ok(None)
    }

    fn update(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn finalize(&mut self) -> usize {
        self.surface.finalize()
    }

    fn view(&self) -> Element {
        let lists = RowBuilder::new()
            .add(self.available_list(), LayoutConstraint::Fill(1))
            .add(self.transfer_buttons(), LayoutConstraint::Length(8))
            .add(self.active_list(), LayoutConstraint::Fill(1))
            .build();

        let status = RowBuilder::new()
            .add(
                Element::text_with_role(self.editor.feedback(), TextRole::Error),
                LayoutConstraint::Fill(1),
            )
            .add(
                Element::text_with_role(self.editor.dimension_line(), TextRole::Subtle),
                LayoutConstraint::Fill(1),
            )
            .build();

        let description = Element::panel(Element::text(self.editor.selected_description()))
            .title("Feature Description")
            .build();

        let actions = Element::row(vec![
            Element::button(events::EDITOR_SAVE, "Save and Apply").hotkey('s').build(),
            Element::button(events::EDITOR_EXIT, "Exit").hotkey('x').build(),
        ])
        .build();

        ColumnBuilder::new()
            .add(
                Element::styled("Layout Manager", Style::default().add_modifier(Modifier::BOLD)),
                LayoutConstraint::Length(1),
            )
            .add(lists, LayoutConstraint::Fill(1))
            .add(status, LayoutConstraint::Length(1))
            .add(description, LayoutConstraint::Length(3))
            .add(actions, LayoutConstraint::Length(3))
            .build()
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn is_open(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        debug!("Editor window closed");
        self.closed = true;
    }
}
