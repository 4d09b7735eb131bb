//! Per-node event listeners and dispatch.
//!
//! Dispatch is target-only: there is no capture or bubble phase. A listener
//! that fails does not stop the others; the failure is recorded in the
//! document's error log.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::node::NodeId;
use crate::tree::DomTree;

/// What a listener returns. Errors are logged and dispatch continues.
pub type ListenerResult = anyhow::Result<()>;

/// A callable event listener.
///
/// Two listeners are equal when they share the same closure allocation, so
/// registering a clone of an already registered listener is a no-op.
#[derive(Clone)]
pub struct EventListener(Rc<dyn Fn(&mut Event) -> ListenerResult>);

impl EventListener {
    /// Wrap a closure.
    pub fn new(callback: impl Fn(&mut Event) -> ListenerResult + 'static) -> Self {
        Self(Rc::new(callback))
    }

    fn call(&self, event: &mut Event) -> ListenerResult {
        (self.0)(event)
    }
}

impl PartialEq for EventListener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for EventListener {}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// [§ 2.2 Interface Event](https://dom.spec.whatwg.org/#interface-event)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: String,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    cancelable: bool,
    default_prevented: bool,
}

impl Event {
    /// A non-cancelable event of the given type.
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target: None,
            current_target: None,
            cancelable: false,
            default_prevented: false,
        }
    }

    /// A cancelable event of the given type.
    #[must_use]
    pub fn cancelable(event_type: impl Into<String>) -> Self {
        Self {
            cancelable: true,
            ..Self::new(event_type)
        }
    }

    /// The event type, e.g. `click`.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The node the event was first dispatched to.
    #[must_use]
    pub const fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The node whose listeners are currently running.
    #[must_use]
    pub const fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    /// Whether `prevent_default` has any effect.
    #[must_use]
    pub const fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// [§ 2.2](https://dom.spec.whatwg.org/#dom-event-preventdefault)
    ///
    /// "The preventDefault() method steps are to set the canceled flag if
    /// this's cancelable attribute value is true"
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Whether a listener cancelled the default action.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Listeners of one node, grouped by event type in registration order.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListenerRegistry {
    by_type: HashMap<String, Vec<EventListener>>,
}

impl ListenerRegistry {
    fn add(&mut self, event_type: &str, listener: EventListener) -> bool {
        let listeners = self.by_type.entry(event_type.to_string()).or_default();
        if listeners.contains(&listener) {
            return false;
        }
        listeners.push(listener);
        true
    }

    fn remove(&mut self, event_type: &str, listener: &EventListener) -> bool {
        let Some(listeners) = self.by_type.get_mut(event_type) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|registered| registered != listener);
        before != listeners.len()
    }

    /// Snapshot of the listeners for a type, so dispatch does not hold a
    /// borrow of the tree while user code runs.
    fn snapshot(&self, event_type: &str) -> Vec<EventListener> {
        self.by_type.get(event_type).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, event_type: &str) -> usize {
        self.by_type.get(event_type).map_or(0, Vec::len)
    }
}

impl DomTree {
    /// Register `listener` for `event_type` on `node`.
    ///
    /// Returns `false` if the same listener was already registered for that
    /// type.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `node` is not part of this tree.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: EventListener,
    ) -> DomResult<bool> {
        let node = self.get_mut(node).ok_or(DomError::UnknownNode(node))?;
        Ok(node.listeners.add(event_type, listener))
    }

    /// Unregister `listener` for `event_type` on `node`.
    ///
    /// Returns whether a listener was removed.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `node` is not part of this tree.
    pub fn remove_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: &EventListener,
    ) -> DomResult<bool> {
        let node = self.get_mut(node).ok_or(DomError::UnknownNode(node))?;
        Ok(node.listeners.remove(event_type, listener))
    }

    /// Number of listeners registered on `node` for `event_type`.
    #[must_use]
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.get(node).map_or(0, |n| n.listeners.count(event_type))
    }
}

impl Document {
    /// [§ 2.9 Dispatching events](https://dom.spec.whatwg.org/#dispatching-events)
    ///
    /// Run the listeners registered on `node` for the event's type, in
    /// registration order. Returns `false` if a listener called
    /// [`Event::prevent_default`] on a cancelable event.
    ///
    /// A listener error is recorded as `Event listener error: ...` and the
    /// remaining listeners still run.
    ///
    /// # Errors
    ///
    /// [`DomError::UnknownNode`] if `node` is not part of this document.
    pub fn dispatch_event(&self, node: NodeId, event: &mut Event) -> DomResult<bool> {
        let listeners = self
            .tree()
            .get(node)
            .ok_or(DomError::UnknownNode(node))?
            .listeners
            .snapshot(&event.event_type);

        if event.target.is_none() {
            event.target = Some(node);
        }
        event.current_target = Some(node);

        for listener in listeners {
            if let Err(error) = listener.call(event) {
                self.handle_error(format!("Event listener error: {error}"));
            }
        }
        Ok(!event.default_prevented)
    }
}
