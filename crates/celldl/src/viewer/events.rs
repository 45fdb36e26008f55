//! Notifications the viewer sends to its host.

use std::fmt;

use indexmap::IndexMap;

use celldl_core::identifier::Id;

/// Host-supplied data attached to one object, keyed by field name.
pub type Annotation = IndexMap<String, String>;

/// Annotations for a diagram, keyed by object id.
pub type Annotations = IndexMap<String, Annotation>;

/// What happened in a [`ViewerEvent::Viewer`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerEventKind {
    /// A diagram finished loading and is interactive.
    Loaded,
    /// The diagram was closed.
    Closed,
    Selected,
    Deselected,
}

impl fmt::Display for ViewerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewerEventKind::Loaded => "loaded",
            ViewerEventKind::Closed => "closed",
            ViewerEventKind::Selected => "selected",
            ViewerEventKind::Deselected => "deselected",
        };
        f.write_str(name)
    }
}

/// The object a [`ViewerEvent::Viewer`] event is about.
#[derive(Debug, Clone, PartialEq)]
pub struct EventComponent {
    pub id: Id,
    pub annotation: Option<Annotation>,
}

/// A notification to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// The diagram's data changed.
    FileEdited,
    /// An object was clicked and the click was honoured.
    ObjectClicked { id: Option<Id> },
    Viewer {
        kind: ViewerEventKind,
        component: Option<EventComponent>,
    },
}

impl ViewerEvent {
    /// The id of the object the event is about, if any.
    pub fn object_id(&self) -> Option<Id> {
        match self {
            ViewerEvent::FileEdited => None,
            ViewerEvent::ObjectClicked { id } => *id,
            ViewerEvent::Viewer { component, .. } => component.as_ref().map(|c| c.id),
        }
    }
}

/// A callback registered for viewer events.
pub type EventListener = Box<dyn FnMut(&ViewerEvent)>;

/// Listeners for viewer events, called in registration order.
#[derive(Default)]
pub struct EventListeners {
    listeners: Vec<EventListener>,
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

impl EventListeners {
    pub fn add(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, event: &ViewerEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}
