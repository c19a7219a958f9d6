//! Trigger capability and its state machines.
//!
//! All triggers follow the same tick contract: `press`/`release` record
//! input, `tick` advances the state machine by one host tick and returns how
//! many uses to perform this tick. Triggers are only authoritative while
//! they head their group's enabled list.

use super::{ModuleBehavior, ModuleContext};
use crate::capability::Capabilities;
use crate::event::{ActionEvent, EventTag};

/// Decides when an item is used.
pub trait TriggerModule {
    /// Records a press. Returns true if this started triggering.
    fn press(&mut self) -> bool;

    /// Records a release. Returns true if the trigger was held.
    fn release(&mut self) -> bool;

    /// Advances one tick and returns the number of uses to perform.
    fn tick(&mut self) -> u32;

    fn is_triggering(&self) -> bool;

    /// Returns to idle, dropping any in-progress input.
    fn reset(&mut self);
}

const TRIGGER_EVENTS: &[EventTag] = &[EventTag::UseInput];

/// Routes a use-input event for this trigger's own action.
fn route_use_input(
    trigger: &mut dyn TriggerModule,
    event: &ActionEvent,
    cx: &mut ModuleContext<'_, '_>,
) {
    let ActionEvent::UseInput { action, pressed } = *event else {
        return;
    };
    let key = cx.key();
    if action != key.action {
        return;
    }

    if pressed {
        if trigger.press() {
            cx.publish(ActionEvent::TriggerStarted { key });
        }
    } else if trigger.release() {
        cx.publish(ActionEvent::TriggerStopped { key });
    }
}

macro_rules! trigger_behavior {
    ($ty:ty) => {
        impl ModuleBehavior for $ty {
            fn capabilities(&self) -> Capabilities {
                Capabilities::TRIGGER
            }

            fn active_only_if_first_enabled(&self) -> bool {
                true
            }

            fn listened_events(&self) -> &'static [EventTag] {
                TRIGGER_EVENTS
            }

            fn on_event(&mut self, event: &ActionEvent, cx: &mut ModuleContext<'_, '_>) {
                route_use_input(self, event, cx);
            }

            fn on_disable(&mut self, _cx: &mut ModuleContext<'_, '_>) {
                self.reset();
            }

            fn reset_module(&mut self, _force: bool) {
                self.reset();
            }

            fn as_trigger(&self) -> Option<&dyn TriggerModule> {
                Some(self)
            }

            fn as_trigger_mut(&mut self) -> Option<&mut dyn TriggerModule> {
                Some(self)
            }
        }
    };
}

// ============================================================================
// Single
// ============================================================================

/// One use per press, with a cooldown between uses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SingleTrigger {
    cooldown: u32,
    held: bool,
    fired: bool,
    cooldown_left: u32,
}

impl SingleTrigger {
    pub fn new(cooldown: u32) -> Self {
        Self {
            cooldown,
            ..Self::default()
        }
    }
}

impl TriggerModule for SingleTrigger {
    fn press(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        self.fired = false;
        true
    }

    fn release(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }

    fn tick(&mut self) -> u32 {
        if self.cooldown_left > 0 {
            self.cooldown_left -= 1;
        }
        if self.held && !self.fired && self.cooldown_left == 0 {
            self.fired = true;
            self.cooldown_left = self.cooldown;
            return 1;
        }
        0
    }

    fn is_triggering(&self) -> bool {
        self.held
    }

    fn reset(&mut self) {
        self.held = false;
        self.fired = false;
        self.cooldown_left = 0;
    }
}

trigger_behavior!(SingleTrigger);

// ============================================================================
// Repeat
// ============================================================================

/// Fires on the first held tick, then every `interval` ticks while held.
///
/// The interval keeps counting down while released so tapping cannot beat
/// the fire rate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepeatTrigger {
    interval: u32,
    held: bool,
    wait: u32,
}

impl RepeatTrigger {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ..Self::default()
        }
    }
}

impl TriggerModule for RepeatTrigger {
    fn press(&mut self) -> bool {
        !std::mem::replace(&mut self.held, true)
    }

    fn release(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }

    fn tick(&mut self) -> u32 {
        if self.wait > 0 {
            self.wait -= 1;
        }
        if !self.held || self.wait > 0 {
            return 0;
        }
        self.wait = self.interval;
        1
    }

    fn is_triggering(&self) -> bool {
        self.held
    }

    fn reset(&mut self) {
        self.held = false;
        self.wait = 0;
    }
}

trigger_behavior!(RepeatTrigger);

// ============================================================================
// Burst
// ============================================================================

/// A press starts a burst of `shots` uses spaced by `interval` ticks.
///
/// The burst completes even if released early; the next burst needs a new
/// press after release.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BurstTrigger {
    shots: u32,
    interval: u32,
    held: bool,
    remaining: u32,
    wait: u32,
}

impl BurstTrigger {
    pub fn new(shots: u32, interval: u32) -> Self {
        Self {
            shots: shots.max(1),
            interval: interval.max(1),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl TriggerModule for BurstTrigger {
    fn press(&mut self) -> bool {
        if self.held || self.remaining > 0 {
            return false;
        }
        self.held = true;
        self.remaining = self.shots;
        self.wait = 0;
        true
    }

    fn release(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }

    fn tick(&mut self) -> u32 {
        if self.remaining == 0 {
            return 0;
        }
        if self.wait > 0 {
            self.wait -= 1;
        }
        if self.wait > 0 {
            return 0;
        }
        self.remaining -= 1;
        self.wait = self.interval;
        1
    }

    fn is_triggering(&self) -> bool {
        self.remaining > 0
    }

    fn reset(&mut self) {
        self.held = false;
        self.remaining = 0;
        self.wait = 0;
    }
}

trigger_behavior!(BurstTrigger);

// ============================================================================
// Charged
// ============================================================================

/// Holding charges up to `max_charge` ticks; release fires once if the
/// charge reached `min_charge`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChargedTrigger {
    min_charge: u32,
    max_charge: u32,
    held: bool,
    charge: u32,
    release_pending: bool,
}

impl ChargedTrigger {
    pub fn new(min_charge: u32, max_charge: u32) -> Self {
        Self {
            min_charge,
            max_charge: max_charge.max(min_charge),
            ..Self::default()
        }
    }

    pub fn charge(&self) -> u32 {
        self.charge
    }
}

impl TriggerModule for ChargedTrigger {
    fn press(&mut self) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        self.charge = 0;
        self.release_pending = false;
        true
    }

    fn release(&mut self) -> bool {
        if !self.held {
            return false;
        }
        self.held = false;
        self.release_pending = true;
        true
    }

    fn tick(&mut self) -> u32 {
        if self.held {
            self.charge = (self.charge + 1).min(self.max_charge);
            return 0;
        }
        if !self.release_pending {
            return 0;
        }
        self.release_pending = false;
        let charge = std::mem::take(&mut self.charge);
        u32::from(charge >= self.min_charge)
    }

    fn is_triggering(&self) -> bool {
        self.held
    }

    fn reset(&mut self) {
        self.held = false;
        self.charge = 0;
        self.release_pending = false;
    }
}

trigger_behavior!(ChargedTrigger);

#[cfg(test)]
mod tests {
    use super::*;

    fn run(trigger: &mut dyn TriggerModule, ticks: usize) -> Vec<u32> {
        (0..ticks).map(|_| trigger.tick()).collect()
    }

    #[test]
    fn single_fires_once_per_press() {
        let mut trigger = SingleTrigger::new(0);
        assert!(trigger.press());
        assert!(!trigger.press());
        assert_eq!(run(&mut trigger, 3), vec![1, 0, 0]);

        assert!(trigger.release());
        trigger.press();
        assert_eq!(run(&mut trigger, 2), vec![1, 0]);
    }

    #[test]
    fn single_respects_cooldown_between_presses() {
        let mut trigger = SingleTrigger::new(2);
        trigger.press();
        assert_eq!(trigger.tick(), 1);
        trigger.release();
        trigger.press();
        // Cooldown of two ticks must elapse before the second use.
        assert_eq!(run(&mut trigger, 3), vec![0, 1, 0]);
    }

    #[test]
    fn repeat_fires_every_interval_while_held() {
        let mut trigger = RepeatTrigger::new(3);
        trigger.press();
        assert_eq!(run(&mut trigger, 7), vec![1, 0, 0, 1, 0, 0, 1]);

        trigger.release();
        assert_eq!(run(&mut trigger, 3), vec![0, 0, 0]);
    }

    #[test]
    fn repeat_tapping_cannot_beat_the_interval() {
        let mut trigger = RepeatTrigger::new(3);
        trigger.press();
        assert_eq!(trigger.tick(), 1);
        trigger.release();
        trigger.press();
        assert_eq!(run(&mut trigger, 3), vec![0, 0, 1]);
    }

    #[test]
    fn burst_completes_after_release_and_needs_a_new_press() {
        let mut trigger = BurstTrigger::new(3, 2);
        assert!(trigger.press());
        assert_eq!(trigger.tick(), 1);
        trigger.release();
        assert_eq!(run(&mut trigger, 4), vec![0, 1, 0, 1]);
        assert!(!trigger.is_triggering());
        assert_eq!(run(&mut trigger, 2), vec![0, 0]);

        assert!(trigger.press());
        assert_eq!(trigger.remaining(), 3);
    }

    #[test]
    fn burst_ignores_presses_mid_burst() {
        let mut trigger = BurstTrigger::new(2, 1);
        trigger.press();
        trigger.release();
        assert!(!trigger.press());
        assert_eq!(run(&mut trigger, 3), vec![1, 1, 0]);
    }

    #[test]
    fn charged_fires_on_release_when_charged_enough() {
        let mut trigger = ChargedTrigger::new(2, 4);
        trigger.press();
        assert_eq!(run(&mut trigger, 6), vec![0; 6]);
        assert_eq!(trigger.charge(), 4);

        trigger.release();
        assert_eq!(run(&mut trigger, 2), vec![1, 0]);
        assert_eq!(trigger.charge(), 0);
    }

    #[test]
    fn charged_release_too_early_is_a_dud() {
        let mut trigger = ChargedTrigger::new(3, 5);
        trigger.press();
        trigger.tick();
        trigger.release();
        assert_eq!(run(&mut trigger, 2), vec![0, 0]);
    }

    #[test]
    fn reset_drops_held_input() {
        let mut trigger = RepeatTrigger::new(1);
        trigger.press();
        trigger.reset();
        assert!(!trigger.is_triggering());
        assert_eq!(trigger.tick(), 0);
    }
}
