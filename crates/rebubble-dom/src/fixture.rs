//! JSON document fixtures.
//!
//! A fixture is a nested description of an element tree:
//!
//! ```json
//! { "tag": "div", "id": "content", "children": [
//!     { "tag": "div", "class": "blog-title", "children": ["Hello"] }
//! ] }
//! ```
//!
//! Bare strings in `children` become text nodes, and `text` is shorthand for
//! a leading text child. Unknown keys are rejected. The top-level element
//! becomes the document element of the resulting [`DomTree`].

use serde::{Deserialize, Serialize};

use crate::{AttributesMap, DomTree, ElementData, NodeId};

/// Errors produced while loading a fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The input is not a valid fixture document.
    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One element of a fixture tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    /// Element local name.
    pub tag: String,
    /// Shorthand for the `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Shorthand for the `class` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Text placed before any `children`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Any other attributes.
    #[serde(default, skip_serializing_if = "AttributesMap::is_empty")]
    pub attrs: AttributesMap,
    /// Child elements and text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FixtureChild>,
}

/// A child entry of a [`Fixture`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureChild {
    /// A text node.
    Text(String),
    /// A nested element.
    Element(Fixture),
}

impl Fixture {
    /// Parse a fixture from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Json`] if the text is not a well-formed fixture.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    fn element_data(&self) -> ElementData {
        let mut data = ElementData {
            tag_name: self.tag.clone(),
            attrs: self.attrs.clone(),
        };
        if let Some(id) = &self.id {
            let _ = data.attrs.insert("id".to_string(), id.clone());
        }
        if let Some(class) = &self.class {
            let _ = data.attrs.insert("class".to_string(), class.clone());
        }
        data
    }

    fn build(&self, tree: &mut DomTree, parent: NodeId) {
        let id = tree.create_element(parent, self.element_data());
        if let Some(text) = &self.text {
            let _ = tree.create_text(id, text.as_str());
        }
        for child in &self.children {
            match child {
                FixtureChild::Text(text) => {
                    let _ = tree.create_text(id, text.as_str());
                }
                FixtureChild::Element(element) => element.build(tree, id),
            }
        }
    }
}

impl DomTree {
    /// Materialize a fixture as the document element of a new tree.
    #[must_use]
    pub fn from_fixture(fixture: &Fixture) -> Self {
        let mut tree = Self::new();
        fixture.build(&mut tree, NodeId::ROOT);
        tree
    }

    /// Parse JSON fixture text straight into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Json`] if the text is not a well-formed fixture.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Fixture::from_json(json).map(|fixture| Self::from_fixture(&fixture))
    }
}
