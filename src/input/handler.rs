use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use fxhash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

/// Lifecycle events a follower publishes
#[derive(Debug, Clone, PartialEq)]
pub enum FollowerEvent {
    /// `show` was requested
    Show,
    /// `hide` was requested
    Hide,
    /// A frame was rendered
    Render,
    /// The follower is being torn down
    Destroy,
    /// A state string was added
    AddState(String),
    /// A state string was removed
    RemoveState(String),
}

impl FollowerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            FollowerEvent::Show => EventKind::Show,
            FollowerEvent::Hide => EventKind::Hide,
            FollowerEvent::Render => EventKind::Render,
            FollowerEvent::Destroy => EventKind::Destroy,
            FollowerEvent::AddState(_) => EventKind::AddState,
            FollowerEvent::RemoveState(_) => EventKind::RemoveState,
        }
    }

    /// State carried by `AddState`/`RemoveState`
    pub fn state(&self) -> Option<&str> {
        match self {
            FollowerEvent::AddState(state) | FollowerEvent::RemoveState(state) => {
                Some(state.as_str())
            }
            _ => None,
        }
    }
}

/// Key under which listeners subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Show,
    Hide,
    Render,
    Destroy,
    AddState,
    RemoveState,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Show => "show",
            EventKind::Hide => "hide",
            EventKind::Render => "render",
            EventKind::Destroy => "destroy",
            EventKind::AddState => "addState",
            EventKind::RemoveState => "removeState",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "show" => Ok(EventKind::Show),
            "hide" => Ok(EventKind::Hide),
            "render" => Ok(EventKind::Render),
            "destroy" => Ok(EventKind::Destroy),
            "addState" => Ok(EventKind::AddState),
            "removeState" => Ok(EventKind::RemoveState),
            other => Err(format!("unknown follower event: {}", other)),
        }
    }
}

/// Handle returned by [`EventManager::on`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event listener callback type
pub type EventCallback = Rc<dyn Fn(&FollowerEvent)>;

/// Listener table shared between a follower and whoever delivers its events
pub type SharedEvents = Rc<RefCell<EventManager>>;

/// Multi-subscriber listener table keyed by event kind
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event kind, in subscription order
    listeners: HashMap<EventKind, Vec<(ListenerId, EventCallback)>>,
    next_id: u64,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&FollowerEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Rc::new(callback)));
        id
    }

    /// Remove one listener, or every listener of `kind` when `id` is `None`
    pub fn off(&mut self, kind: EventKind, id: Option<ListenerId>) {
        match id {
            Some(id) => {
                if let Some(listeners) = self.listeners.get_mut(&kind) {
                    listeners.retain(|(existing, _)| *existing != id);
                }
            }
            None => {
                self.listeners.remove(&kind);
            }
        }
    }

    /// Call every listener subscribed to the event's kind
    pub fn trigger(&self, event: &FollowerEvent) {
        for callback in self.listeners(event.kind()) {
            callback(event);
        }
    }

    /// Snapshot of the listeners of `kind`, in subscription order
    pub fn listeners(&self, kind: EventKind) -> Vec<EventCallback> {
        self.listeners
            .get(&kind)
            .map(|listeners| listeners.iter().map(|(_, callback)| callback.clone()).collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

/// Deliver `event` without holding the table borrowed, so listeners may
/// subscribe and unsubscribe while it runs
pub fn dispatch(events: &RefCell<EventManager>, event: &FollowerEvent) {
    let callbacks = events.borrow().listeners(event.kind());
    for callback in callbacks {
        callback(event);
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(kind, listeners)| (kind.as_str(), listeners.len()))
            .collect();
        f.debug_struct("EventManager")
            .field("listeners", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_on_trigger_in_subscription_order() {
        let mut events = EventManager::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = seen.clone();
        events.on(EventKind::AddState, move |event| {
            first
                .borrow_mut()
                .push(format!("first {}", event.state().unwrap_or("")));
        });
        let second = seen.clone();
        events.on(EventKind::AddState, move |_| second.borrow_mut().push("second".into()));

        events.trigger(&FollowerEvent::AddState("-pointer".into()));
        events.trigger(&FollowerEvent::Show);

        assert_eq!(*seen.borrow(), vec!["first -pointer", "second"]);
    }

    #[test]
    fn test_off_single_and_all() {
        let mut events = EventManager::new();
        let hits = Rc::new(RefCell::new(0));

        let a = hits.clone();
        let keep = events.on(EventKind::Render, move |_| *a.borrow_mut() += 1);
        let b = hits.clone();
        let dropped = events.on(EventKind::Render, move |_| *b.borrow_mut() += 10);

        events.off(EventKind::Render, Some(dropped));
        events.trigger(&FollowerEvent::Render);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(events.listener_count(EventKind::Render), 1);

        events.off(EventKind::Render, Some(keep));
        events.on(EventKind::Render, |_| {});
        events.off(EventKind::Render, None);
        assert_eq!(events.listener_count(EventKind::Render), 0);
    }

    #[test]
    fn test_dispatch_lets_listeners_subscribe() {
        let events: SharedEvents = Rc::new(RefCell::new(EventManager::new()));
        let hits = Rc::new(RefCell::new(0));

        let table = events.clone();
        let counter = hits.clone();
        events.borrow_mut().on(EventKind::Show, move |_| {
            let counter = counter.clone();
            table
                .borrow_mut()
                .on(EventKind::Show, move |_| *counter.borrow_mut() += 1);
        });

        dispatch(&events, &FollowerEvent::Show);
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(events.borrow().listener_count(EventKind::Show), 2);

        dispatch(&events, &FollowerEvent::Show);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_event_kind_names() {
        for kind in [
            EventKind::Show,
            EventKind::Hide,
            EventKind::Render,
            EventKind::Destroy,
            EventKind::AddState,
            EventKind::RemoveState,
        ] {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
        assert!("click".parse::<EventKind>().is_err());
    }
}
