use ratatui::style::Style;

use crate::keys::GlobalKey;

/// Layout constraints for sizing elements within containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutConstraint {
    /// Fixed size (exact number of lines/columns)
    Length(u16),
    /// Minimum size (at least this many lines/columns)
    Min(u16),
    /// Proportional fill (weight for distributing remaining space)
    Fill(u16),
}

/// Theme colour a text element is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRole {
    #[default]
    Normal,
    Subtle,
    Error,
}

/// Declarative UI elements that compose to form a window's view.
///
/// Interactive elements carry the event id that the backend reports when
/// they are pressed.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Empty element that renders nothing
    None,

    /// Blank cell that still takes up layout space
    Spacer,

    /// Static text. An explicit style is layered over the role colour.
    Text {
        content: String,
        role: TextRole,
        style: Option<Style>,
    },

    /// Text owned by the window surface, looked up by key at render time
    Keyed {
        key: GlobalKey,
        initial: String,
        style: Option<Style>,
    },

    /// Pressable button
    Button {
        id: String,
        label: String,
        hotkey: Option<char>,
        enabled: bool,
        highlighted: bool,
        visible: bool,
    },

    /// Vertical layout container
    Column {
        items: Vec<(LayoutConstraint, Element)>,
        spacing: u16,
    },

    /// Horizontal layout container
    Row {
        items: Vec<(LayoutConstraint, Element)>,
        spacing: u16,
    },

    /// Panel with border
    Panel {
        child: Box<Element>,
        title: Option<String>,
    },
}

impl Element {
    /// Create a text element
    pub fn text(content: impl Into<String>) -> Self {
        Element::Text {
            content: content.into(),
            role: TextRole::Normal,
            style: None,
        }
    }

    /// Create a text element drawn in the theme colour for `role`
    pub fn text_with_role(content: impl Into<String>, role: TextRole) -> Self {
        Element::Text {
            content: content.into(),
            role,
            style: None,
        }
    }

    /// Create a text element with an explicit style
    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Element::Text {
            content: content.into(),
            role: TextRole::Normal,
            style: Some(style),
        }
    }

    /// Create a text element whose content lives on the surface under `key`
    pub fn keyed(key: &GlobalKey, initial: impl Into<String>) -> Self {
        Element::Keyed {
            key: key.clone(),
            initial: initial.into(),
            style: None,
        }
    }

    /// Create a button element
    pub fn button(id: impl Into<String>, label: impl Into<String>) -> ButtonBuilder {
        ButtonBuilder {
            id: id.into(),
            label: label.into(),
            hotkey: None,
            enabled: true,
            highlighted: false,
            visible: true,
        }
    }

    /// Create a column layout with default constraints
    pub fn column(children: Vec<Element>) -> ColumnBuilder {
        let items = children
            .into_iter()
            .map(|child| (child.default_constraint(), child))
            .collect();

        ColumnBuilder { items, spacing: 0 }
    }

    /// Create a row layout splitting its width evenly between children
    pub fn row(children: Vec<Element>) -> RowBuilder {
        let items = children
            .into_iter()
            .map(|child| (LayoutConstraint::Fill(1), child))
            .collect();

        RowBuilder { items, spacing: 1 }
    }

    /// Wrap element in a panel with border
    pub fn panel(child: Element) -> PanelBuilder {
        PanelBuilder {
            child: Box::new(child),
            title: None,
        }
    }

    /// Get the default layout constraint for this element type
    pub fn default_constraint(&self) -> LayoutConstraint {
        match self {
            Element::None => LayoutConstraint::Length(0),
            Element::Spacer => LayoutConstraint::Fill(1),
            Element::Text { .. } => LayoutConstraint::Length(1),
            Element::Keyed { .. } => LayoutConstraint::Length(1),
            Element::Button { .. } => LayoutConstraint::Length(3),
            Element::Column { .. } => LayoutConstraint::Fill(1),
            Element::Row { .. } => LayoutConstraint::Fill(1),
            Element::Panel { .. } => LayoutConstraint::Fill(1),
        }
    }

    /// Ids of every button in this tree, in render order
    pub fn button_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_button_ids(&mut ids);
        ids
    }

    fn collect_button_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Element::Button { id, .. } => ids.push(id.as_str()),
            Element::Column { items, .. } | Element::Row { items, .. } => {
                for (_, child) in items {
                    child.collect_button_ids(ids);
                }
            }
            Element::Panel { child, .. } => child.collect_button_ids(ids),
            _ => {}
        }
    }
}

/// Builder for button elements
pub struct ButtonBuilder {
    id: String,
    label: String,
    hotkey: Option<char>,
    enabled: bool,
    highlighted: bool,
    visible: bool,
}

impl ButtonBuilder {
    pub fn hotkey(mut self, key: char) -> Self {
        self.hotkey = Some(key);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn build(self) -> Element {
        Element::Button {
            id: self.id,
            label: self.label,
            hotkey: self.hotkey,
            enabled: self.enabled,
            highlighted: self.highlighted,
            visible: self.visible,
        }
    }
}

/// Builder for column layouts with explicit constraints
pub struct ColumnBuilder {
    items: Vec<(LayoutConstraint, Element)>,
    spacing: u16,
}

impl ColumnBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            spacing: 0,
        }
    }

    pub fn add(mut self, element: Element, constraint: LayoutConstraint) -> Self {
        self.items.push((constraint, element));
        self
    }

    pub fn spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn build(self) -> Element {
        Element::Column {
            items: self.items,
            spacing: self.spacing,
        }
    }
}

impl Default for ColumnBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for row layouts with explicit constraints
pub struct RowBuilder {
    items: Vec<(LayoutConstraint, Element)>,
    spacing: u16,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            spacing: 1,
        }
    }

    pub fn add(mut self, element: Element, constraint: LayoutConstraint) -> Self {
        self.items.push((constraint, element));
        self
    }

    pub fn spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn build(self) -> Element {
        Element::Row {
            items: self.items,
            spacing: self.spacing,
        }
    }
}

impl Default for RowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for bordered panels
pub struct PanelBuilder {
    child: Box<Element>,
    title: Option<String>,
}

impl PanelBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn build(self) -> Element {
        Element::Panel {
            child: self.child,
            title: self.title,
        }
    }
}
