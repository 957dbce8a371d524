//! Delegation selector parsing.
//!
//! The grammar is a small subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/): compound
//! selectors made of a type, class and ID selectors, joined by single
//! spaces (descendant combinators). Nothing else is recognized.
//!
//! ```text
//! "#content div.blog-title"
//!   level 1: [Id("content")]
//!   level 0: [Tag("div"), Class("blog-title")]
//! ```
//!
//! Levels are stored innermost first, so level 0 is the condition set the
//! matched node itself must satisfy.

use std::fmt;
use std::str::FromStr;

use rebubble_common::warning::warn_once;

/// Characters that start a class or ID condition inside a token.
const MARKERS: [char; 2] = ['.', '#'];

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// A `.` or `#` marker with no name after it, as in `div.` or `a#.b`.
    #[error("selector token {token:?} has an empty name after {marker:?}")]
    EmptyName {
        /// The marker that was left dangling.
        marker: char,
        /// The whitespace-separated token it appeared in.
        token: String,
    },
}

/// An atomic condition on a single node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Bare identifier at the start of a token: `div`, `li`.
    Tag(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// `.name`
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// `#name`
    Id(String),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => f.write_str(name),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
        }
    }
}

/// One whitespace-separated token of a selector: a conjunction of
/// conditions that must all hold for the same node.
///
/// An empty level (from an empty token) is satisfied by every node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Level {
    conditions: Vec<Condition>,
}

impl Level {
    /// Build a level from its conditions.
    #[must_use]
    pub const fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// The conditions of this level, in source order.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether this level has no conditions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Decompose one token into conditions.
    ///
    /// Text before the first marker is a tag condition; each marker then
    /// owns the text up to the next marker.
    fn parse(token: &str) -> Result<Self, SelectorError> {
        let mut conditions = Vec::new();

        let tag_end = token.find(MARKERS).unwrap_or(token.len());
        if tag_end > 0 {
            conditions.push(Condition::Tag(token[..tag_end].to_string()));
        }

        let mut rest = &token[tag_end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[marker.len_utf8()..];
            let end = body.find(MARKERS).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return Err(SelectorError::EmptyName {
                    marker,
                    token: token.to_string(),
                });
            }
            conditions.push(if marker == '.' {
                Condition::Class(name.to_string())
            } else {
                Condition::Id(name.to_string())
            });
            rest = &body[end..];
        }

        Ok(Self { conditions })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for condition in &self.conditions {
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

/// A parsed delegation selector.
///
/// Parse once with [`Selector::parse`] (or `str::parse`) and reuse; the
/// value is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    /// Innermost first.
    levels: Vec<Level>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// The string is split on single spaces and the tokens are reversed, so
    /// the last token becomes level 0. The empty string has zero levels.
    /// Empty tokens (doubled, leading or trailing spaces) become empty
    /// levels; they are accepted but reported through
    /// [`warn_once`](rebubble_common::warning::warn_once).
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::EmptyName`] if a `.` or `#` is not followed
    /// by a name.
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        if source.is_empty() {
            return Ok(Self {
                source: String::new(),
                levels: Vec::new(),
            });
        }

        let levels = source
            .split(' ')
            .rev()
            .map(Level::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if levels.iter().any(Level::is_empty) {
            warn_once(
                "Selector",
                &format!("selector {source:?} has an empty level that matches any node"),
            );
        }

        Ok(Self {
            source: source.to_string(),
            levels,
        })
    }

    /// The levels, innermost (the matched node's own conditions) first.
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the selector has zero levels (and so matches any node).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The text this selector was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
