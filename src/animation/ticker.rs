//! Per-frame scheduler
//!
//! The ticker is the animation engine's heartbeat: anything that animates
//! registers a frame callback, and whoever owns the frame loop (a
//! `requestAnimationFrame` chain in the browser, a test, a headless driver)
//! calls [`Ticker::tick`] once per frame.
//!
//! A process-wide ticker can be registered with [`register_ticker`]; followers
//! created without an explicit ticker attach to it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by [`Ticker::add`], used to detach the callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerId(u64);

type FrameCallback = Rc<RefCell<dyn FnMut(f64)>>;

/// Registry of frame callbacks
#[derive(Default)]
pub struct Ticker {
    callbacks: RefCell<Vec<(TickerId, FrameCallback)>>,
    next_id: Cell<u64>,
    frame: Cell<u64>,
    time: Cell<f64>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for the shared form the followers hold
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Register a callback, called with the frame time in milliseconds
    pub fn add<F>(&self, callback: F) -> TickerId
    where
        F: FnMut(f64) + 'static,
    {
        let id = TickerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.callbacks
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(callback))));
        id
    }

    /// Detach a callback. Returns whether it was registered.
    pub fn remove(&self, id: TickerId) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn contains(&self, id: TickerId) -> bool {
        self.callbacks
            .borrow()
            .iter()
            .any(|(existing, _)| *existing == id)
    }

    /// Run one frame.
    ///
    /// Callbacks may add or remove callbacks while the frame runs; a callback
    /// removed mid-frame does not fire, one added mid-frame waits for the next.
    pub fn tick(&self, time: f64) {
        self.frame.set(self.frame.get() + 1);
        self.time.set(time);

        let snapshot: Vec<(TickerId, FrameCallback)> = self.callbacks.borrow().clone();
        for (id, callback) in snapshot {
            if !self.contains(id) {
                continue;
            }
            // A callback that re-enters the ticker cannot be borrowed twice
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(time);
            }
        }
    }

    /// Number of frames ticked so far
    pub fn frame(&self) -> u64 {
        self.frame.get()
    }

    /// Time of the latest frame
    pub fn time(&self) -> f64 {
        self.time.get()
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

thread_local! {
    static REGISTERED: RefCell<Option<Rc<Ticker>>> = const { RefCell::new(None) };
}

/// Bind the ticker that followers use by default
pub fn register_ticker(ticker: Rc<Ticker>) {
    REGISTERED.with(|registered| *registered.borrow_mut() = Some(ticker));
}

/// The registered ticker, creating and registering a fresh one on first use
pub fn ticker() -> Rc<Ticker> {
    REGISTERED.with(|registered| {
        registered
            .borrow_mut()
            .get_or_insert_with(|| {
                log::debug!("no ticker registered, creating the default one");
                Ticker::shared()
            })
            .clone()
    })
}
