//! Debounced timers resolved on frame boundaries.
//!
//! Each concern owns one slot; scheduling into an occupied slot replaces the
//! pending timer, so the last request always wins.

use serde::{Deserialize, Serialize};

/// Concern a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerSlot {
    /// Show/hide debounce
    Visibility,
    /// Media state application and media box cleanup
    Media,
}

/// Deferred work carried by a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Drop the hidden state, mark visible and force a render
    Reveal,
    /// Mark the cursor as no longer visible
    MarkHidden,
    /// Apply the media state once the media node is in place
    ApplyMediaState,
    /// Empty the media box after the hide transition
    ClearMediaBox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    due: f64,
    action: TimerAction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timers {
    visibility: Option<Pending>,
    media: Option<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: TimerSlot) -> &mut Option<Pending> {
        match slot {
            TimerSlot::Visibility => &mut self.visibility,
            TimerSlot::Media => &mut self.media,
        }
    }

    fn slot(&self, slot: TimerSlot) -> Option<Pending> {
        match slot {
            TimerSlot::Visibility => self.visibility,
            TimerSlot::Media => self.media,
        }
    }

    /// Schedule `action` at `due`, replacing whatever the slot held
    pub fn schedule(&mut self, slot: TimerSlot, due: f64, action: TimerAction) {
        *self.slot_mut(slot) = Some(Pending { due, action });
    }

    pub fn cancel(&mut self, slot: TimerSlot) {
        *self.slot_mut(slot) = None;
    }

    pub fn clear(&mut self) {
        self.visibility = None;
        self.media = None;
    }

    pub fn pending(&self, slot: TimerSlot) -> Option<TimerAction> {
        self.slot(slot).map(|pending| pending.action)
    }

    /// Remove and return the actions due at `now`, earliest first
    pub fn take_due(&mut self, now: f64) -> Vec<TimerAction> {
        let mut due: Vec<Pending> = [TimerSlot::Visibility, TimerSlot::Media]
            .into_iter()
            .filter_map(|slot| {
                let pending = self.slot_mut(slot);
                if pending.is_some_and(|timer| timer.due <= now) {
                    pending.take()
                } else {
                    None
                }
            })
            .collect();
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|pending| pending.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_schedule_wins() {
        let mut timers = Timers::new();
        timers.schedule(TimerSlot::Visibility, 300.0, TimerAction::MarkHidden);
        timers.schedule(TimerSlot::Visibility, 0.0, TimerAction::Reveal);

        assert_eq!(timers.take_due(0.0), vec![TimerAction::Reveal]);
        assert_eq!(timers.take_due(1000.0), vec![]);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut timers = Timers::new();
        timers.schedule(TimerSlot::Media, 20.0, TimerAction::ApplyMediaState);
        timers.schedule(TimerSlot::Visibility, 10.0, TimerAction::Reveal);

        assert!(timers.take_due(5.0).is_empty());
        assert_eq!(
            timers.take_due(25.0),
            vec![TimerAction::Reveal, TimerAction::ApplyMediaState]
        );
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        timers.schedule(TimerSlot::Media, 20.0, TimerAction::ApplyMediaState);
        timers.cancel(TimerSlot::Media);
        assert_eq!(timers.pending(TimerSlot::Media), None);
        assert!(timers.take_due(100.0).is_empty());
    }
}
