//! Ammunition: clip and reload capabilities.

use super::{ModuleBehavior, ModuleContext};
use crate::capability::Capabilities;
use crate::event::{ActionEvent, EventTag};

/// Holds the uses available before a reload.
pub trait ClipModule {
    fn capacity(&self) -> u32;

    fn remaining(&self) -> u32;

    /// Takes up to `amount` uses; returns how many were taken.
    fn try_consume(&mut self, amount: u32) -> u32;

    /// Fills the clip; returns how many uses were added.
    fn refill(&mut self) -> u32;

    fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

/// Fixed-capacity clip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleClip {
    capacity: u32,
    remaining: u32,
}

impl SimpleClip {
    /// Creates a full clip.
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            remaining: capacity,
        }
    }

    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.remaining = remaining.min(self.capacity);
        self
    }
}

impl ClipModule for SimpleClip {
    fn capacity(&self) -> u32 {
        self.capacity
    }

    fn remaining(&self) -> u32 {
        self.remaining
    }

    fn try_consume(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.remaining);
        self.remaining -= taken;
        taken
    }

    fn refill(&mut self) -> u32 {
        let added = self.capacity - self.remaining;
        self.remaining = self.capacity;
        added
    }
}

impl ModuleBehavior for SimpleClip {
    fn capabilities(&self) -> Capabilities {
        Capabilities::CLIP
    }

    fn as_clip(&self) -> Option<&dyn ClipModule> {
        Some(self)
    }

    fn as_clip_mut(&mut self) -> Option<&mut dyn ClipModule> {
        Some(self)
    }
}

/// Progress reported by [`ReloadModule::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReloadProgress {
    Idle,
    InProgress { ticks_left: u32 },
    Completed,
}

/// Refills the active clip over time.
pub trait ReloadModule {
    /// Starts reloading. Returns false if already reloading.
    fn start_reload(&mut self) -> bool;

    fn tick(&mut self) -> ReloadProgress;

    fn is_reloading(&self) -> bool;

    fn cancel(&mut self);

    /// Whether an emptied clip starts a reload by itself.
    fn auto_reload(&self) -> bool;
}

/// Reload that completes after a fixed number of ticks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimedReload {
    duration: u32,
    auto_reload: bool,
    ticks_left: Option<u32>,
}

impl TimedReload {
    pub fn new(duration: u32) -> Self {
        Self {
            duration: duration.max(1),
            ..Self::default()
        }
    }

    pub fn with_auto_reload(mut self, auto_reload: bool) -> Self {
        self.auto_reload = auto_reload;
        self
    }
}

impl ReloadModule for TimedReload {
    fn start_reload(&mut self) -> bool {
        if self.ticks_left.is_some() {
            return false;
        }
        self.ticks_left = Some(self.duration);
        true
    }

    fn tick(&mut self) -> ReloadProgress {
        match self.ticks_left {
            None => ReloadProgress::Idle,
            Some(left) if left <= 1 => {
                self.ticks_left = None;
                ReloadProgress::Completed
            }
            Some(left) => {
                self.ticks_left = Some(left - 1);
                ReloadProgress::InProgress {
                    ticks_left: left - 1,
                }
            }
        }
    }

    fn is_reloading(&self) -> bool {
        self.ticks_left.is_some()
    }

    fn cancel(&mut self) {
        self.ticks_left = None;
    }

    fn auto_reload(&self) -> bool {
        self.auto_reload
    }
}

const RELOAD_EVENTS: &[EventTag] = &[EventTag::ClipEmptied];

impl ModuleBehavior for TimedReload {
    fn capabilities(&self) -> Capabilities {
        Capabilities::RELOAD
    }

    fn listened_events(&self) -> &'static [EventTag] {
        RELOAD_EVENTS
    }

    fn on_event(&mut self, event: &ActionEvent, cx: &mut ModuleContext<'_, '_>) {
        let ActionEvent::ClipEmptied { key: clip } = *event else {
            return;
        };
        let key = cx.key();
        if clip.action != key.action || !self.auto_reload {
            return;
        }
        if self.start_reload() {
            tracing::debug!(%key, "auto reload started");
            cx.publish(ActionEvent::ReloadStarted { key });
        }
    }

    fn on_disable(&mut self, _cx: &mut ModuleContext<'_, '_>) {
        self.cancel();
    }

    fn reset_module(&mut self, _force: bool) {
        self.cancel();
    }

    fn as_reload(&self) -> Option<&dyn ReloadModule> {
        Some(self)
    }

    fn as_reload_mut(&mut self) -> Option<&mut dyn ReloadModule> {
        Some(self)
    }
}
