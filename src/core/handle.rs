//! Ticker-attached follower handle

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::animation::ticker::{self, Ticker, TickerId};
use crate::core::config::FollowerOptions;
use crate::core::follower::Follower;
use crate::dom::Dom;
use crate::input::events::PointerEvent;
use crate::input::handler::{self, SharedEvents};
use crate::{FollowerError, Result};

/// A [`Follower`] wired to a [`Ticker`], so every frame advances it.
///
/// The handle shares the follower with its frame callback. Lifecycle events
/// are delivered once the follower is released, so listeners may call back
/// into it through [`MouseFollower::shared`]. Events raised through a bare
/// [`MouseFollower::follower_mut`] wait for the next update or frame.
pub struct MouseFollower<D: Dom + 'static> {
    follower: Rc<RefCell<Follower<D>>>,
    ticker: Rc<Ticker>,
    ticker_id: Cell<Option<TickerId>>,
}

impl<D: Dom + 'static> MouseFollower<D> {
    /// Make `ticker` the one new followers attach to
    pub fn register_ticker(ticker: Rc<Ticker>) {
        ticker::register_ticker(ticker);
    }

    /// Create a follower on the registered ticker
    pub fn new(dom: D, options: FollowerOptions) -> Result<Self> {
        Ok(Self::attach(Follower::new(dom, options)?, ticker::ticker()))
    }

    /// Attach an already built follower to `ticker`
    pub fn attach(mut follower: Follower<D>, ticker: Rc<Ticker>) -> Self {
        follower.defer_events();
        let follower = Rc::new(RefCell::new(follower));
        let weak: Weak<RefCell<Follower<D>>> = Rc::downgrade(&follower);
        let ticker_id = ticker.add(move |_time| {
            if let Some(follower) = weak.upgrade() {
                // A frame landing inside a borrow is skipped rather than re-entered
                Self::run(&follower, Follower::tick);
            }
        });
        log::debug!("follower attached to ticker as {:?}", ticker_id);
        Self {
            follower,
            ticker,
            ticker_id: Cell::new(Some(ticker_id)),
        }
    }

    /// Run `update` if the follower is free, then deliver the events it raised
    pub(crate) fn run<T>(
        follower: &RefCell<Follower<D>>,
        update: impl FnOnce(&mut Follower<D>) -> T,
    ) -> Option<T> {
        let (result, events) = {
            let mut follower = follower.try_borrow_mut().ok()?;
            (update(&mut follower), follower.listeners())
        };
        Self::deliver(follower, &events);
        Some(result)
    }

    /// Hand queued events to their listeners with the follower released.
    ///
    /// Listeners that drive the follower queue more events, delivered in the
    /// same pass.
    fn deliver(follower: &RefCell<Follower<D>>, events: &SharedEvents) {
        loop {
            let (pending, destroyed) = match follower.try_borrow_mut() {
                Ok(mut follower) => (follower.take_events(), follower.is_destroyed()),
                // The outer borrow delivers them when it returns
                Err(_) => return,
            };
            if pending.is_empty() {
                if destroyed {
                    events.borrow_mut().clear();
                }
                return;
            }
            for event in &pending {
                handler::dispatch(events, event);
            }
        }
    }

    pub fn follower(&self) -> Ref<'_, Follower<D>> {
        self.follower.borrow()
    }

    /// Direct access; lifecycle events raised here are delivered later
    pub fn follower_mut(&self) -> RefMut<'_, Follower<D>> {
        self.follower.borrow_mut()
    }

    /// Run `update` against the follower and deliver the events it raised.
    ///
    /// Panics if the follower is already borrowed, like [`RefCell::borrow_mut`].
    pub fn update<T>(&self, update: impl FnOnce(&mut Follower<D>) -> T) -> T {
        let (result, events) = {
            let mut follower = self.follower.borrow_mut();
            (update(&mut follower), follower.listeners())
        };
        Self::deliver(&self.follower, &events);
        result
    }

    /// Shared handle, for hosts that dispatch events from their own callbacks
    pub fn shared(&self) -> Rc<RefCell<Follower<D>>> {
        self.follower.clone()
    }

    pub fn ticker(&self) -> &Rc<Ticker> {
        &self.ticker
    }

    pub fn handle_event(&self, event: PointerEvent<D::Node>) {
        self.update(|follower| follower.handle_event(event));
    }

    /// Whether the frame callback is still registered
    pub fn is_attached(&self) -> bool {
        self.ticker_id
            .get()
            .is_some_and(|ticker_id| self.ticker.contains(ticker_id))
    }

    /// Run `update` against a live follower
    pub fn try_update<T>(&self, update: impl FnOnce(&mut Follower<D>) -> T) -> Result<T> {
        if self.follower.borrow().is_destroyed() {
            return Err(FollowerError::Destroyed);
        }
        Ok(self.update(update))
    }

    /// Destroy the follower and detach it from the ticker
    pub fn destroy(&self) {
        self.detach();
        self.update(Follower::destroy);
    }

    fn detach(&self) {
        if let Some(ticker_id) = self.ticker_id.take() {
            self.ticker.remove(ticker_id);
        }
    }
}

impl<D: Dom + 'static> Drop for MouseFollower<D> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::dom::virtual_dom::{ManualClock, VirtualDom};
    use crate::input::handler::EventKind;

    #[test]
    fn test_ticker_drives_follower() {
        let clock = ManualClock::new();
        let ticker = Ticker::shared();
        let follower = Follower::new(
            VirtualDom::with_clock(clock.clone()),
            FollowerOptions::default(),
        )
        .unwrap();
        let handle = MouseFollower::attach(follower, ticker.clone());

        handle.handle_event(PointerEvent::MouseMove {
            position: Point::new(5.0, 5.0),
        });
        assert!(!handle.follower().is_visible());
        ticker.tick(clock.advance(16.0));
        assert!(handle.follower().is_visible());
    }

    #[test]
    fn test_destroy_detaches() {
        let ticker = Ticker::shared();
        let handle = MouseFollower::attach(
            Follower::new(VirtualDom::new(), FollowerOptions::default()).unwrap(),
            ticker.clone(),
        );
        assert!(handle.is_attached());
        assert_eq!(ticker.len(), 1);

        handle.destroy();
        assert!(!handle.is_attached());
        assert!(ticker.is_empty());
        assert!(matches!(
            handle.try_update(|follower| follower.show()),
            Err(FollowerError::Destroyed)
        ));
    }

    #[test]
    fn test_drop_detaches() {
        let ticker = Ticker::shared();
        {
            let _handle = MouseFollower::attach(
                Follower::new(VirtualDom::new(), FollowerOptions::default()).unwrap(),
                ticker.clone(),
            );
            assert_eq!(ticker.len(), 1);
        }
        assert!(ticker.is_empty());
    }

    #[test]
    fn test_registered_ticker() {
        let ticker = Ticker::shared();
        MouseFollower::<VirtualDom>::register_ticker(ticker.clone());
        let handle = MouseFollower::new(VirtualDom::new(), FollowerOptions::default()).unwrap();
        assert!(Rc::ptr_eq(handle.ticker(), &ticker));
        assert!(handle.is_attached());
    }

    /// Listeners may drive the follower that raised the event
    #[test]
    fn test_listener_reenters_follower() {
        let clock = ManualClock::new();
        let ticker = Ticker::shared();
        let handle = MouseFollower::attach(
            Follower::new(
                VirtualDom::with_clock(clock.clone()),
                FollowerOptions::default(),
            )
            .unwrap(),
            ticker.clone(),
        );
        let shared = Rc::downgrade(&handle.shared());
        let added = Rc::new(RefCell::new(Vec::new()));
        {
            let mut follower = handle.follower_mut();
            follower.on(EventKind::Show, move |_| {
                if let Some(shared) = shared.upgrade() {
                    shared.borrow_mut().add_state("-shown");
                }
            });
            let added = added.clone();
            follower.on(EventKind::AddState, move |event| {
                added
                    .borrow_mut()
                    .push(event.state().unwrap_or_default().to_string());
            });
        }

        handle.update(|follower| follower.show());
        assert!(handle.follower().has_state("-shown"));
        // The nested add is delivered in the same pass
        assert_eq!(*added.borrow(), vec!["-shown"]);

        ticker.tick(clock.advance(16.0));
        assert!(handle.follower().is_visible());
    }

    /// Events raised on a bare borrow wait for the next frame
    #[test]
    fn test_frame_delivers_events() {
        let clock = ManualClock::new();
        let ticker = Ticker::shared();
        let handle = MouseFollower::attach(
            Follower::new(
                VirtualDom::with_clock(clock.clone()),
                FollowerOptions::default(),
            )
            .unwrap(),
            ticker.clone(),
        );
        let hides = Rc::new(Cell::new(0));
        let counter = hides.clone();
        handle
            .follower_mut()
            .on(EventKind::Hide, move |_| counter.set(counter.get() + 1));

        handle.follower_mut().hide();
        assert_eq!(hides.get(), 0);
        ticker.tick(clock.advance(16.0));
        assert_eq!(hides.get(), 1);
    }

    #[test]
    fn test_destroy_reaches_listeners_then_clears_them() {
        let handle = MouseFollower::attach(
            Follower::new(VirtualDom::new(), FollowerOptions::default()).unwrap(),
            Ticker::shared(),
        );
        let destroyed = Rc::new(Cell::new(false));
        let flag = destroyed.clone();
        handle
            .follower_mut()
            .on(EventKind::Destroy, move |_| flag.set(true));

        handle.destroy();
        assert!(destroyed.get());
        assert_eq!(
            handle.follower().listeners().borrow().listener_count(EventKind::Destroy),
            0
        );
    }
}
