//! Declarative content tree handed to the host for rendering.

use crate::projection::ProjectedTable;
use crate::settings::{DisplayUnits, SettingToggle};

/// Text emphasis for labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Section heading.
    Heading,
    /// Regular text.
    Body,
    /// Diagnostic shown instead of the table.
    Error,
    /// Secondary information.
    Hint,
}

/// What a checkbox edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    /// A boolean setting.
    Setting(SettingToggle),
    /// One option of the unit radio group.
    Units(DisplayUnits),
}

/// A node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewNode {
    /// Nothing.
    #[default]
    Empty,
    /// Children laid out top to bottom.
    Stack(Vec<ViewNode>),
    /// A line of text.
    Label {
        /// Text.
        text: String,
        /// Emphasis.
        style: LabelStyle,
    },
    /// A link to external documentation.
    Link {
        /// Text.
        text: String,
        /// Target URL.
        url: String,
    },
    /// A checkbox.
    Toggle {
        /// What the checkbox edits.
        target: ToggleTarget,
        /// Text beside the checkbox.
        label: String,
        /// Current state.
        checked: bool,
    },
    /// The transfer table.
    Table(ProjectedTable),
}

impl ViewNode {
    /// Create a label node.
    pub fn label(text: impl Into<String>, style: LabelStyle) -> Self {
        ViewNode::Label {
            text: text.into(),
            style,
        }
    }

    /// Depth-first iterator over this node and its descendants.
    pub fn walk(&self) -> Vec<&ViewNode> {
        let mut out = vec![self];
        if let ViewNode::Stack(children) = self {
            for child in children {
                out.extend(child.walk());
            }
        }
        out
    }

    /// The table inside this tree, if any.
    pub fn table(&self) -> Option<&ProjectedTable> {
        self.walk().into_iter().find_map(|node| match node {
            ViewNode::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Check whether this tree contains an error label.
    pub fn is_error(&self) -> bool {
        self.walk().into_iter().any(|node| {
            matches!(
                node,
                ViewNode::Label {
                    style: LabelStyle::Error,
                    ..
                }
            )
        })
    }
}
