//! Selector-based event delegation.
//!
//! Given an event, a selector and a boundary node, find the node closest to
//! the event target (the target itself included) that matches the selector,
//! looking no higher than the boundary. This is the usual way to handle
//! events for many children with one listener on a common ancestor.
//!
//! # Selectors
//!
//! Only a small subset of CSS is understood: type (`li`), class (`.item`)
//! and ID (`#main`) selectors, compounded within a token (`li.item#first`)
//! and separated by single spaces meaning "somewhere above". See
//! [`selector`] for the exact rules.
//!
//! # Example
//!
//! ```
//! use rebubble::rebubble;
//! use rebubble_dom::{DomTree, ElementData, Event, NodeId};
//!
//! let mut tree = DomTree::new();
//! let content = ElementData::new("div").with_attr("id", "content");
//! let content = tree.create_element(NodeId::ROOT, content);
//! let title = ElementData::new("div").with_attr("class", "blog-title");
//! let title = tree.create_element(content, title);
//! let span = tree.create_element(title, ElementData::new("span"));
//!
//! let hit = rebubble(&tree, "#content div.blog-title", NodeId::ROOT, &Event::new(span)).unwrap();
//! assert_eq!(hit, Some(title));
//! ```

pub mod evaluate;
pub mod matcher;
pub mod selector;

pub use evaluate::ClassMatching;
pub use matcher::{DelegatedHandler, MatchError, Matcher, MatcherOptions};
pub use selector::{Condition, Level, Selector, SelectorError};

use rebubble_dom::{DomTree, Event, NodeId};

/// [`Matcher::rebubble`] with default options.
///
/// # Errors
///
/// See [`Matcher::rebubble`].
pub fn rebubble(
    tree: &DomTree,
    selector: &str,
    boundary: NodeId,
    event: &Event,
) -> Result<Option<NodeId>, MatchError> {
    Matcher::new().rebubble(tree, selector, boundary, event)
}

/// [`Matcher::handy`] with default options.
///
/// # Errors
///
/// See [`Matcher::handy`].
pub fn handy(
    tree: &DomTree,
    selector: &str,
    boundary: Option<NodeId>,
    event: &Event,
) -> Result<Option<NodeId>, MatchError> {
    Matcher::new().handy(tree, selector, boundary, event)
}
