//! Index-based switchers.
//!
//! Where trigger groups pick the active variant through enabled flags, a
//! switcher keeps a single integer index and applies the transition itself.

use super::{ModuleBehavior, ModuleContext};
use crate::capability::Capabilities;
use crate::event::ActionEvent;

/// A completed switch, returned directly to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SwitchChange {
    pub from: usize,
    pub to: usize,
}

/// Current/previous index bookkeeping shared by switchers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SwitchIndex {
    index: usize,
    previous: Option<usize>,
    max_index: usize,
    looped: bool,
}

impl SwitchIndex {
    /// Index range `[0, count - 1]`, starting at 0.
    pub fn new(count: usize) -> Self {
        Self {
            max_index: count.saturating_sub(1),
            ..Self::default()
        }
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index.min(self.max_index);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Index after the current one, wrapping or clamping at the end.
    pub fn next_index(&self) -> usize {
        if self.index < self.max_index {
            self.index + 1
        } else if self.looped {
            0
        } else {
            self.max_index
        }
    }

    /// Index before the current one, wrapping or clamping at the start.
    pub fn previous_index(&self) -> usize {
        if self.index > 0 {
            self.index - 1
        } else if self.looped {
            self.max_index
        } else {
            0
        }
    }

    /// Moves to `index`. Out-of-range indices and the current index are
    /// ignored.
    fn advance(&mut self, index: usize) -> Option<SwitchChange> {
        if index > self.max_index || index == self.index {
            return None;
        }
        let change = SwitchChange {
            from: self.index,
            to: index,
        };
        self.previous = Some(self.index);
        self.index = index;
        Some(change)
    }
}

/// Capability of modules that select a variant by index.
pub trait ModuleSwitcher {
    fn switch_index(&self) -> &SwitchIndex;

    fn switch_index_mut(&mut self) -> &mut SwitchIndex;

    /// Applies a switch that has already been recorded.
    fn apply_switch(&mut self, change: SwitchChange, cx: &mut ModuleContext<'_, '_>);

    /// Switches to `index`, applies it and publishes [`ActionEvent::Switched`].
    ///
    /// Out-of-range indices and the current index are ignored and return
    /// `None`, so a clamped next/previous at the boundary publishes nothing.
    fn switch_to(&mut self, index: usize, cx: &mut ModuleContext<'_, '_>) -> Option<SwitchChange> {
        let change = self.switch_index_mut().advance(index)?;
        self.apply_switch(change, cx);

        let key = cx.key();
        tracing::debug!(%key, from = change.from, to = change.to, "switched");
        cx.publish(ActionEvent::Switched {
            key,
            from: change.from,
            to: change.to,
        });
        Some(change)
    }

    fn switch_to_next(&mut self, cx: &mut ModuleContext<'_, '_>) -> Option<SwitchChange> {
        let index = self.switch_index().next_index();
        self.switch_to(index, cx)
    }

    fn switch_to_previous(&mut self, cx: &mut ModuleContext<'_, '_>) -> Option<SwitchChange> {
        let index = self.switch_index().previous_index();
        self.switch_to(index, cx)
    }
}

/// Switcher that turns named character state flags on and off.
///
/// Only the flag for the current index is active while equipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateSwitcher {
    states: Vec<String>,
    index: SwitchIndex,
}

impl StateSwitcher {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let states: Vec<String> = states.into_iter().map(Into::into).collect();
        let index = SwitchIndex::new(states.len());
        Self { states, index }
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.index = self.index.with_loop(looped);
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = self.index.with_index(index);
        self
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Name of the state flag for the current index.
    pub fn current_state(&self) -> Option<&str> {
        self.states.get(self.index.index()).map(String::as_str)
    }

    fn set_current(&self, active: bool, cx: &mut ModuleContext<'_, '_>) {
        if let Some(name) = self.current_state() {
            cx.set_state(name, active);
        }
    }
}

impl ModuleSwitcher for StateSwitcher {
    fn switch_index(&self) -> &SwitchIndex {
        &self.index
    }

    fn switch_index_mut(&mut self) -> &mut SwitchIndex {
        &mut self.index
    }

    fn apply_switch(&mut self, change: SwitchChange, cx: &mut ModuleContext<'_, '_>) {
        if !cx.is_equipped() {
            return;
        }
        if let Some(name) = self.states.get(change.from) {
            cx.set_state(name, false);
        }
        if let Some(name) = self.states.get(change.to) {
            cx.set_state(name, true);
        }
    }
}

impl ModuleBehavior for StateSwitcher {
    fn capabilities(&self) -> Capabilities {
        Capabilities::SWITCHER
    }

    fn equip(&mut self, cx: &mut ModuleContext<'_, '_>) {
        self.set_current(true, cx);
    }

    fn unequip(&mut self, cx: &mut ModuleContext<'_, '_>) {
        self.set_current(false, cx);
    }

    fn on_destroy(&mut self, cx: &mut ModuleContext<'_, '_>) {
        self.set_current(false, cx);
    }

    fn as_switcher(&self) -> Option<&dyn ModuleSwitcher> {
        Some(self)
    }

    fn as_switcher_mut(&mut self) -> Option<&mut dyn ModuleSwitcher> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_only_when_looped() {
        let looped = SwitchIndex::new(3).with_loop(true).with_index(2);
        assert_eq!(looped.next_index(), 0);

        let clamped = SwitchIndex::new(3).with_index(2);
        assert_eq!(clamped.next_index(), 2);
    }

    #[test]
    fn previous_wraps_only_when_looped() {
        let looped = SwitchIndex::new(3).with_loop(true);
        assert_eq!(looped.previous_index(), 2);

        let clamped = SwitchIndex::new(3);
        assert_eq!(clamped.previous_index(), 0);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut index = SwitchIndex::new(2);
        assert_eq!(index.advance(5), None);
        assert_eq!(index.index(), 0);
        assert_eq!(index.previous(), None);

        assert_eq!(index.advance(1), Some(SwitchChange { from: 0, to: 1 }));
        assert_eq!(index.previous(), Some(0));
    }

    #[test]
    fn clamped_boundary_is_not_a_switch() {
        let mut index = SwitchIndex::new(3).with_index(2);
        index.previous = Some(1);

        let next = index.next_index();
        assert_eq!(index.advance(next), None);
        assert_eq!(index.index(), 2);
        assert_eq!(index.previous(), Some(1));
    }
}
