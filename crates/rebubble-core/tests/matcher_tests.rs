//! Integration tests for the ancestor walk.

use rebubble::{
    ClassMatching, MatchError, Matcher, MatcherOptions, Selector, SelectorError, handy, rebubble,
};
use rebubble_dom::{DomTree, ElementData, Event, NodeId};

/// Helper to create an element under `parent` with optional id and class.
fn el(
    tree: &mut DomTree,
    parent: NodeId,
    tag: &str,
    id: Option<&str>,
    class: Option<&str>,
) -> NodeId {
    let mut data = ElementData::new(tag);
    if let Some(id) = id {
        data = data.with_attr("id", id);
    }
    if let Some(class) = class {
        data = data.with_attr("class", class);
    }
    tree.create_element(parent, data)
}

/// `body > div#content > div.blog-title > span`
struct Blog {
    tree: DomTree,
    body: NodeId,
    content: NodeId,
    title: NodeId,
    span: NodeId,
}

fn blog() -> Blog {
    let mut tree = DomTree::new();
    let body = el(&mut tree, NodeId::ROOT, "body", None, None);
    let content = el(&mut tree, body, "div", Some("content"), None);
    let title = el(&mut tree, content, "div", None, Some("blog-title"));
    let span = el(&mut tree, title, "span", None, None);
    Blog {
        tree,
        body,
        content,
        title,
        span,
    }
}

// ========== basic properties ==========

#[test]
fn test_empty_selector_returns_target() {
    let b = blog();
    for boundary in [b.span, b.title, b.content, b.body, NodeId::ROOT] {
        let hit = rebubble(&b.tree, "", boundary, &Event::new(b.span)).unwrap();
        assert_eq!(hit, Some(b.span), "boundary {boundary}");
    }
}

#[test]
fn test_target_equal_to_boundary() {
    let b = blog();
    let hit = rebubble(&b.tree, "", b.title, &Event::new(b.title)).unwrap();
    assert_eq!(hit, Some(b.title));

    let hit = rebubble(&b.tree, "div", b.title, &Event::new(b.title)).unwrap();
    assert_eq!(hit, Some(b.title));

    let hit = rebubble(&b.tree, "span", b.title, &Event::new(b.title)).unwrap();
    assert_eq!(hit, None);
}

#[test]
fn test_tag_selector_on_target() {
    let b = blog();
    let hit = rebubble(&b.tree, "div", b.body, &Event::new(b.title)).unwrap();
    assert_eq!(hit, Some(b.title));

    // Case of the selector does not matter
    let hit = rebubble(&b.tree, "DiV", b.body, &Event::new(b.title)).unwrap();
    assert_eq!(hit, Some(b.title));
}

#[test]
fn test_descendant_selector_returns_level_zero_node() {
    let b = blog();
    let hit = rebubble(&b.tree, "#content div.blog-title", b.body, &Event::new(b.span)).unwrap();
    assert_eq!(hit, Some(b.title));
}

#[test]
fn test_nearest_candidate_wins() {
    let b = blog();
    // Both title and content are divs; the one closest to the target is returned
    let hit = rebubble(&b.tree, "div", b.body, &Event::new(b.span)).unwrap();
    assert_eq!(hit, Some(b.title));
}

#[test]
fn test_no_level_zero_match_is_none() {
    let b = blog();
    let hit = rebubble(&b.tree, "body p", b.body, &Event::new(b.span)).unwrap();
    assert_eq!(hit, None);
}

#[test]
fn test_outer_level_not_found_is_none() {
    let b = blog();
    let hit = rebubble(&b.tree, "#sidebar div.blog-title", b.body, &Event::new(b.span)).unwrap();
    assert_eq!(hit, None);
}

#[test]
fn test_repeated_calls_are_identical() {
    let b = blog();
    let matcher = Matcher::new();
    let event = Event::new(b.span);
    let first = matcher.rebubble(&b.tree, "#content div", b.body, &event);
    let second = matcher.rebubble(&b.tree, "#content div", b.body, &event);
    assert_eq!(first, second);
    assert_eq!(first, Ok(Some(b.title)));
}

// ========== compound levels ==========

#[test]
fn test_compound_requires_every_condition() {
    let mut tree = DomTree::new();
    let body = el(&mut tree, NodeId::ROOT, "body", None, None);
    let great = el(&mut tree, body, "div", Some("great"), Some("coooool fun"));
    let inner = el(&mut tree, great, "img", None, None);
    let almost = el(&mut tree, body, "div", Some("great"), Some("coooool"));
    let wrong_tag = el(&mut tree, body, "section", Some("great"), Some("coooool fun"));

    let selector = "div.coooool#great.fun";
    assert_eq!(rebubble(&tree, selector, body, &Event::new(great)), Ok(Some(great)));
    assert_eq!(rebubble(&tree, selector, body, &Event::new(inner)), Ok(Some(great)));
    assert_eq!(rebubble(&tree, selector, body, &Event::new(almost)), Ok(None));
    assert_eq!(rebubble(&tree, selector, body, &Event::new(wrong_tag)), Ok(None));
}

// ========== boundary handling ==========

#[test]
fn test_search_stops_at_boundary() {
    let b = blog();
    // content would satisfy "#content" but lies above the boundary
    let hit = rebubble(&b.tree, "#content", b.title, &Event::new(b.span)).unwrap();
    assert_eq!(hit, None);

    let hit = rebubble(&b.tree, "#content div", b.title, &Event::new(b.span)).unwrap();
    assert_eq!(hit, None);

    // The boundary itself is a candidate
    let hit = rebubble(&b.tree, "#content", b.content, &Event::new(b.span)).unwrap();
    assert_eq!(hit, Some(b.content));
}

#[test]
fn test_outer_level_may_match_at_candidate() {
    // A higher level is searched from the candidate upward, inclusive
    let b = blog();
    let hit = rebubble(&b.tree, "div div", b.title, &Event::new(b.span)).unwrap();
    assert_eq!(hit, Some(b.title));

    let hit = rebubble(&b.tree, ".blog-title div", b.title, &Event::new(b.title)).unwrap();
    assert_eq!(hit, Some(b.title));
}

#[test]
fn test_levels_are_ordered_outward() {
    let b = blog();
    // "#content" is above ".blog-title", so the reversed order cannot match
    let hit = rebubble(&b.tree, ".blog-title #content span", b.body, &Event::new(b.span)).unwrap();
    assert_eq!(hit, None);

    let hit = rebubble(&b.tree, "#content .blog-title span", b.body, &Event::new(b.span)).unwrap();
    assert_eq!(hit, Some(b.span));
}

#[test]
fn test_target_outside_boundary_is_error() {
    let b = blog();
    let result = rebubble(&b.tree, "div", b.span, &Event::new(b.content));
    assert_eq!(
        result,
        Err(MatchError::OutsideBoundary {
            origin: b.content,
            boundary: b.span,
        })
    );
}

#[test]
fn test_unknown_node_is_error() {
    let b = blog();
    let result = rebubble(&b.tree, "div", b.body, &Event::new(NodeId(1000)));
    assert_eq!(result, Err(MatchError::UnknownNode(NodeId(1000))));

    let result = rebubble(&b.tree, "div", NodeId(1000), &Event::new(b.span));
    assert_eq!(result, Err(MatchError::UnknownNode(NodeId(1000))));
}

#[test]
fn test_rejected_cyclic_append_keeps_walk_bounded() {
    let mut b = blog();
    assert!(b.tree.append_child(b.span, b.body).is_err());

    let hit = rebubble(&b.tree, "p", NodeId::ROOT, &Event::new(b.span)).unwrap();
    assert_eq!(hit, None);
    let hit = rebubble(&b.tree, "body span", NodeId::ROOT, &Event::new(b.span)).unwrap();
    assert_eq!(hit, Some(b.span));
}

// ========== non-element targets ==========

#[test]
fn test_text_target_bubbles_to_element() {
    let mut b = blog();
    let text = b.tree.create_text(b.span, "click me");

    let hit = rebubble(&b.tree, "span", b.body, &Event::new(text)).unwrap();
    assert_eq!(hit, Some(b.span));
    let hit = rebubble(&b.tree, "", b.body, &Event::new(text)).unwrap();
    assert_eq!(hit, Some(text));
}

// ========== selector edge cases ==========

#[test]
fn test_malformed_selector_is_error() {
    let b = blog();
    let result = rebubble(&b.tree, "div.", b.body, &Event::new(b.span));
    assert_eq!(
        result,
        Err(MatchError::Selector(SelectorError::EmptyName {
            marker: '.',
            token: "div.".to_string(),
        }))
    );
}

#[test]
fn test_trailing_space_makes_empty_innermost_level() {
    // "div " has an empty level 0, so the target itself matches once a div
    // is found at or above it
    let b = blog();
    let hit = rebubble(&b.tree, "div ", b.body, &Event::new(b.span)).unwrap();
    assert_eq!(hit, Some(b.span));

    let selector = Selector::parse("div ").unwrap();
    assert_eq!(selector.len(), 2);
    assert!(selector.levels()[0].is_empty());
}

// ========== class matching options ==========

#[test]
fn test_class_matching_modes() {
    let mut tree = DomTree::new();
    let nav = el(&mut tree, NodeId::ROOT, "ul", None, Some("nav-bar"));
    let item = el(&mut tree, nav, "li", None, None);
    let event = Event::new(item);

    let loose = Matcher::new();
    assert_eq!(loose.options().class_matching, ClassMatching::Substring);
    assert_eq!(loose.rebubble(&tree, ".nav", nav, &event), Ok(Some(nav)));

    let strict = Matcher::with_options(MatcherOptions {
        class_matching: ClassMatching::Token,
    });
    assert_eq!(strict.rebubble(&tree, ".nav", nav, &event), Ok(None));
    assert_eq!(strict.rebubble(&tree, ".nav-bar li", nav, &event), Ok(Some(item)));
}

// ========== handy and handlers ==========

#[test]
fn test_handy_explicit_boundary() {
    let b = blog();
    let event = Event::new(b.span);
    assert_eq!(handy(&b.tree, "div", Some(b.content), &event), Ok(Some(b.title)));
    assert_eq!(handy(&b.tree, "#content", Some(b.title), &event), Ok(None));
}

#[test]
fn test_handy_infers_boundary_from_current_target() {
    let b = blog();
    let event = Event::new(b.span).at(b.title);
    assert_eq!(handy(&b.tree, "#content", None, &event), Ok(None));

    let event = Event::new(b.span).at(b.content);
    assert_eq!(handy(&b.tree, "#content", None, &event), Ok(Some(b.content)));

    // An explicit boundary overrides the current target
    assert_eq!(handy(&b.tree, "#content", Some(b.title), &event), Ok(None));
}

#[test]
fn test_handy_without_any_boundary() {
    let b = blog();
    assert_eq!(
        handy(&b.tree, "div", None, &Event::new(b.span)),
        Err(MatchError::MissingBoundary)
    );
}

#[test]
fn test_handler_reuses_compiled_selector() {
    let b = blog();
    let handler = Matcher::new().handler("#content div.blog-title").unwrap();
    assert_eq!(handler.selector().as_str(), "#content div.blog-title");
    assert_eq!(handler.selector().len(), 2);

    let event = Event::new(b.span).at(b.body);
    assert_eq!(handler.handle(&b.tree, &event), Ok(Some(b.title)));
    assert_eq!(handler.handle_within(&b.tree, b.title, &event), Ok(None));
    assert_eq!(
        handler.handle(&b.tree, &Event::new(b.span)),
        Err(MatchError::MissingBoundary)
    );
}

#[test]
fn test_handler_rejects_malformed_selector() {
    let err = Matcher::new().handler("ul #").unwrap_err();
    assert_eq!(
        err,
        SelectorError::EmptyName {
            marker: '#',
            token: "#".to_string(),
        }
    );
}
