use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::{Element, LayoutConstraint, TextRole, Theme};
use crate::window::Surface;

mod interaction_registry;

pub use interaction_registry::InteractionRegistry;

/// Calculate ratatui constraints from our layout constraints.
///
/// Fill weights share whatever the fixed and minimum sizes leave over.
pub fn calculate_constraints(items: &[(LayoutConstraint, Element)], available_space: u16) -> Vec<Constraint> {
    let mut fixed_total = 0u16;
    let mut fill_total_weight = 0u16;

    for (constraint, _) in items {
        match constraint {
            LayoutConstraint::Length(n) | LayoutConstraint::Min(n) => {
                fixed_total = fixed_total.saturating_add(*n)
            }
            LayoutConstraint::Fill(weight) => fill_total_weight += weight,
        }
    }

    let remaining = available_space.saturating_sub(fixed_total);

    items
        .iter()
        .map(|(constraint, _)| match constraint {
            LayoutConstraint::Length(n) => Constraint::Length(*n),
            LayoutConstraint::Min(n) => Constraint::Min(*n),
            LayoutConstraint::Fill(weight) if fill_total_weight > 0 => {
                let space = remaining as u32 * *weight as u32 / fill_total_weight as u32;
                Constraint::Length(space as u16)
            }
            LayoutConstraint::Fill(_) => Constraint::Length(0),
        })
        .collect()
}

/// Draws an element tree, resolving keyed text against the window surface
/// and recording where every enabled button landed.
pub struct Renderer;

impl Renderer {
    pub fn render(
        frame: &mut Frame,
        theme: &Theme,
        registry: &mut InteractionRegistry,
        surface: &Surface,
        element: &Element,
        area: Rect,
    ) {
        frame.render_widget(Block::default().style(Style::default().bg(theme.base)), area);
        Self::render_element(frame, theme, registry, surface, element, area);
    }

    fn render_element(
        frame: &mut Frame,
        theme: &Theme,
        registry: &mut InteractionRegistry,
        surface: &Surface,
        element: &Element,
        area: Rect,
    ) {
        match element {
            Element::None | Element::Spacer => {}

            Element::Text {
                content,
                role,
                style,
            } => {
                let base = Style::default().fg(Self::role_color(theme, *role));
                let widget = Paragraph::new(content.as_str())
                    .alignment(Alignment::Center)
                    .style(style.map_or(base, |style| base.patch(style)));
                frame.render_widget(widget, area);
            }

            Element::Keyed { key, initial, style } => {
                if !surface.is_visible(key) {
                    return;
                }
                let content = surface.content(key).unwrap_or(initial);
                let widget = Paragraph::new(content)
                    .alignment(Alignment::Center)
                    .style(style.unwrap_or(Style::default().fg(theme.text)));
                frame.render_widget(widget, area);
            }

            Element::Button {
                id,
                label,
                hotkey,
                enabled,
                highlighted,
                visible,
            } => {
                if !*visible {
                    return;
                }

                if *enabled {
                    registry.register_click(area, id.clone());
                    if let Some(key) = hotkey {
                        registry.register_hotkey(*key, id.clone());
                    }
                }

                let (text_style, border_style) = match (*enabled, *highlighted) {
                    (false, _) => (
                        Style::default().fg(theme.muted),
                        Style::default().fg(theme.muted),
                    ),
                    (true, true) => (
                        Style::default()
                            .fg(theme.base)
                            .bg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                        Style::default().fg(theme.accent),
                    ),
                    (true, false) => (
                        Style::default().fg(theme.text).bg(theme.button),
                        Style::default().fg(theme.subtext),
                    ),
                };

                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style);
                let widget = Paragraph::new(label.as_str())
                    .block(block)
                    .alignment(Alignment::Center)
                    .style(text_style);
                frame.render_widget(widget, area);
            }

            Element::Column { items, spacing } => {
                Self::render_children(frame, theme, registry, surface, items, *spacing, Direction::Vertical, area);
            }

            Element::Row { items, spacing } => {
                Self::render_children(frame, theme, registry, surface, items, *spacing, Direction::Horizontal, area);
            }

            Element::Panel { child, title } => {
                let mut block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.muted));
                if let Some(title) = title {
                    block = block.title(title.as_str()).title_style(Style::default().fg(theme.accent));
                }
                let inner = block.inner(area);
                frame.render_widget(block, area);
                Self::render_element(frame, theme, registry, surface, child, inner);
            }
        }
    }

    fn role_color(theme: &Theme, role: TextRole) -> ratatui::style::Color {
        match role {
            TextRole::Normal => theme.text,
            TextRole::Subtle => theme.subtext,
            TextRole::Error => theme.error,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_children(
        frame: &mut Frame,
        theme: &Theme,
        registry: &mut InteractionRegistry,
        surface: &Surface,
        items: &[(LayoutConstraint, Element)],
        spacing: u16,
        direction: Direction,
        area: Rect,
    ) {
        if items.is_empty() {
            return;
        }

        let available = match direction {
            Direction::Vertical => area.height,
            Direction::Horizontal => area.width,
        };
        let gaps = spacing.saturating_mul(items.len().saturating_sub(1) as u16);
        let constraints = calculate_constraints(items, available.saturating_sub(gaps));

        let chunks = Layout::default()
            .direction(direction)
            .constraints(constraints)
            .spacing(spacing)
            .split(area);

        for ((_, child), chunk) in items.iter().zip(chunks.iter()) {
            Self::render_element(frame, theme, registry, surface, child, *chunk);
        }
    }
}
