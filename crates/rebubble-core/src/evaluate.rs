//! Condition evaluation against DOM nodes.

use rebubble_dom::{DomTree, ElementData, NodeId};

use crate::selector::{Condition, Level};

/// How `.name` conditions are tested against an element's `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassMatching {
    /// The raw attribute contains `name` anywhere, so `.nav` matches
    /// `class="nav-bar"`. This is the historical behavior and the default.
    #[default]
    Substring,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// `name` is one of the whitespace-separated class tokens.
    Token,
}

impl Condition {
    /// Whether `element` satisfies this condition.
    #[must_use]
    pub fn is_satisfied_by(&self, element: &ElementData, class_matching: ClassMatching) -> bool {
        match self {
            Self::Tag(name) => element.tag_name.eq_ignore_ascii_case(name),
            Self::Id(name) => element.id() == name.as_str(),
            Self::Class(name) => match class_matching {
                ClassMatching::Substring => element.class_name().contains(name.as_str()),
                ClassMatching::Token => element
                    .class_name()
                    .split_ascii_whitespace()
                    .any(|token| token == name.as_str()),
            },
        }
    }
}

impl Level {
    /// Whether the node satisfies every condition of this level.
    ///
    /// Non-element nodes satisfy only the empty level.
    #[must_use]
    pub fn is_satisfied_by(
        &self,
        tree: &DomTree,
        node: NodeId,
        class_matching: ClassMatching,
    ) -> bool {
        if self.is_empty() {
            return true;
        }
        tree.as_element(node).is_some_and(|element| {
            self.conditions()
                .iter()
                .all(|condition| condition.is_satisfied_by(element, class_matching))
        })
    }
}
