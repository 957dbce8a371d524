//! DOM events, reduced to the two node references delegation reads.
//!
//! [§ 2.2 Interface Event](https://dom.spec.whatwg.org/#interface-event)

use crate::NodeId;

/// A dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-target)
    /// "The target getter steps are to return this's target."
    ///
    /// The node the event originated at.
    pub target: NodeId,

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-currenttarget)
    /// "The `currentTarget` getter steps are to return this's current target."
    ///
    /// The node whose listener is currently running, if the event is being
    /// dispatched. This is the implicit delegation boundary.
    pub current_target: Option<NodeId>,
}

impl Event {
    /// An event that has not reached any listener yet.
    #[must_use]
    pub const fn new(target: NodeId) -> Self {
        Self {
            target,
            current_target: None,
        }
    }

    /// The same event as seen by a listener registered on `node`.
    #[must_use]
    pub const fn at(self, node: NodeId) -> Self {
        Self {
            current_target: Some(node),
            ..self
        }
    }
}
