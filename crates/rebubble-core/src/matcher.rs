//! The ancestor walk.
//!
//! Matching starts at the event target and climbs toward the boundary one
//! node at a time. Each node on the way is a *candidate*; a candidate is the
//! answer when it satisfies level 0 of the selector and every higher level
//! is satisfied, in order, somewhere between it and the boundary.
//!
//! ```text
//! "#content div.blog-title", target = span
//!
//!   div#content          <- level 1 found here (cursor climbs from the div)
//!     div.blog-title     <- candidate 2: level 0 ok  => result
//!       span (target)    <- candidate 1: level 0 fails
//! ```

use rebubble_dom::{DomTree, Event, NodeId};

use crate::evaluate::ClassMatching;
use crate::selector::{Selector, SelectorError};

/// Errors produced by a match call. "Nothing matched" is not an error; it is
/// reported as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The selector string could not be parsed.
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// A node id does not belong to the tree being searched.
    #[error("{0} is not part of this document")]
    UnknownNode(NodeId),

    /// The event target is not inside the boundary's subtree.
    #[error("event target {origin} is outside the delegation boundary {boundary}")]
    OutsideBoundary {
        /// The originating node.
        origin: NodeId,
        /// The requested boundary.
        boundary: NodeId,
    },

    /// No boundary was given and the event is not being dispatched to a listener.
    #[error("no delegation boundary: pass one explicitly or set the event's current target")]
    MissingBoundary,
}

/// Tunable matching behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatcherOptions {
    /// How `.class` conditions compare against the `class` attribute.
    pub class_matching: ClassMatching,
}

/// Stateless selector matcher. Construct once and share freely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Matcher {
    options: MatcherOptions,
}

impl Matcher {
    /// A matcher with default options (substring class matching).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: MatcherOptions {
                class_matching: ClassMatching::Substring,
            },
        }
    }

    /// A matcher with explicit options.
    #[must_use]
    pub const fn with_options(options: MatcherOptions) -> Self {
        Self { options }
    }

    /// The options this matcher was built with.
    #[must_use]
    pub const fn options(&self) -> MatcherOptions {
        self.options
    }

    /// Find the node nearest to `origin` (inclusive) that matches `selector`,
    /// searching no higher than `boundary`.
    ///
    /// # Errors
    ///
    /// - [`MatchError::UnknownNode`] if `boundary` or `origin` is not in `tree`.
    /// - [`MatchError::OutsideBoundary`] if `boundary` is not an inclusive
    ///   ancestor of `origin`.
    pub fn find(
        &self,
        tree: &DomTree,
        selector: &Selector,
        boundary: NodeId,
        origin: NodeId,
    ) -> Result<Option<NodeId>, MatchError> {
        for id in [boundary, origin] {
            if !tree.contains(id) {
                return Err(MatchError::UnknownNode(id));
            }
        }
        if !tree.is_inclusive_ancestor(boundary, origin) {
            return Err(MatchError::OutsideBoundary { origin, boundary });
        }

        let found = tree
            .chain_to(origin, boundary)
            .find(|&candidate| self.matches_at(tree, selector, boundary, candidate));

        match found {
            Some(node) => tracing::debug!(%selector, %origin, %node, "delegation matched"),
            None => tracing::debug!(%selector, %origin, %boundary, "delegation found no match"),
        }
        Ok(found)
    }

    /// Whether `candidate` itself satisfies level 0 and the remaining levels
    /// are satisfied in order between it and `boundary`.
    ///
    /// Each higher level is searched from the node where the previous one
    /// matched, inclusive; the fold threads that position forward.
    fn matches_at(
        &self,
        tree: &DomTree,
        selector: &Selector,
        boundary: NodeId,
        candidate: NodeId,
    ) -> bool {
        let class_matching = self.options.class_matching;
        let Some((innermost, outer)) = selector.levels().split_first() else {
            return true;
        };
        if !innermost.is_satisfied_by(tree, candidate, class_matching) {
            return false;
        }
        tracing::trace!(%candidate, "level 0 satisfied");

        outer
            .iter()
            .try_fold(candidate, |cursor, level| {
                tree.chain_to(cursor, boundary)
                    .find(|&node| level.is_satisfied_by(tree, node, class_matching))
            })
            .is_some()
    }

    /// Delegate `event`: parse `selector` and find the nearest match for the
    /// event target inside `boundary`.
    ///
    /// # Errors
    ///
    /// [`MatchError::Selector`] for an unparsable selector, otherwise as
    /// [`Matcher::find`].
    pub fn rebubble(
        &self,
        tree: &DomTree,
        selector: &str,
        boundary: NodeId,
        event: &Event,
    ) -> Result<Option<NodeId>, MatchError> {
        let selector = Selector::parse(selector)?;
        self.find(tree, &selector, boundary, event.target)
    }

    /// Like [`Matcher::rebubble`], but the boundary may be left out, in which
    /// case the node the event is currently being dispatched to is used.
    ///
    /// # Errors
    ///
    /// [`MatchError::MissingBoundary`] if `boundary` is `None` and the event
    /// has no current target, otherwise as [`Matcher::rebubble`].
    pub fn handy(
        &self,
        tree: &DomTree,
        selector: &str,
        boundary: Option<NodeId>,
        event: &Event,
    ) -> Result<Option<NodeId>, MatchError> {
        let boundary = boundary
            .or(event.current_target)
            .ok_or(MatchError::MissingBoundary)?;
        self.rebubble(tree, selector, boundary, event)
    }

    /// Compile `selector` into a reusable handler.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `selector` is malformed.
    pub fn handler(&self, selector: &str) -> Result<DelegatedHandler, SelectorError> {
        Ok(DelegatedHandler {
            matcher: self.clone(),
            selector: Selector::parse(selector)?,
        })
    }
}

/// A selector bound to a matcher, ready to be called from an event listener.
///
/// ```
/// use rebubble::Matcher;
/// use rebubble_dom::{DomTree, ElementData, Event, NodeId};
///
/// let mut tree = DomTree::new();
/// let list = tree.create_element(NodeId::ROOT, ElementData::new("ul"));
/// let item = tree.create_element(list, ElementData::new("li"));
/// let label = tree.create_element(item, ElementData::new("span"));
///
/// let on_click = Matcher::new().handler("li").unwrap();
/// let hit = on_click.handle(&tree, &Event::new(label).at(list)).unwrap();
/// assert_eq!(hit, Some(item));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedHandler {
    matcher: Matcher,
    selector: Selector,
}

impl DelegatedHandler {
    /// The compiled selector.
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Match using the event's current target as the boundary.
    ///
    /// # Errors
    ///
    /// [`MatchError::MissingBoundary`] if the event has no current target,
    /// otherwise as [`Matcher::find`].
    pub fn handle(&self, tree: &DomTree, event: &Event) -> Result<Option<NodeId>, MatchError> {
        let boundary = event.current_target.ok_or(MatchError::MissingBoundary)?;
        self.handle_within(tree, boundary, event)
    }

    /// Match inside an explicit boundary.
    ///
    /// # Errors
    ///
    /// As [`Matcher::find`].
    pub fn handle_within(
        &self,
        tree: &DomTree,
        boundary: NodeId,
        event: &Event,
    ) -> Result<Option<NodeId>, MatchError> {
        self.matcher.find(tree, &self.selector, boundary, event.target)
    }
}
