//! Borrowed view of an item action handed to groups and modules.

use std::collections::BTreeMap;

use crate::event::{ActionEvent, EventRegistry};
use crate::ids::{ActionId, EntityHandle, GroupId};
use crate::module::ActionModule;

/// Whether the host is authoring data or running live behavior.
///
/// Authoring mutates data only: no module initialization, no listener
/// updates, no per-module notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RunMode {
    Authoring,
    #[default]
    Running,
}

/// Named on/off flags of the owning character (stance, fire-mode states).
///
/// Switchers toggle these by name; animation or UI layers read them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateFlags {
    flags: BTreeMap<String, bool>,
}

impl StateFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, active: bool) {
        match self.flags.get_mut(name) {
            Some(flag) => *flag = active,
            None => {
                self.flags.insert(name.to_owned(), active);
            }
        }
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Names of every active flag, in name order.
    pub fn active(&self) -> impl Iterator<Item = &str> + '_ {
        self.flags
            .iter()
            .filter(|(_, active)| **active)
            .map(|(name, _)| name.as_str())
    }
}

/// Membership notifications from groups to their owning action.
///
/// Hosts override these to react to membership changes, e.g. to rebuild
/// action-level capability caches.
pub trait ActionObserver {
    fn on_module_added(&mut self, _group: GroupId, _module: &ActionModule) {}

    fn on_module_removed(&mut self, _group: GroupId, _module: &ActionModule) {}

    /// Authoring-only: a module was attached while editing data.
    fn on_module_attached_in_editor(&mut self, _group: GroupId, _module: &ActionModule) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ActionObserver for NoopObserver {}

/// Everything a group or module may touch on its owning action while the
/// action's group registry is borrowed.
pub struct ActionContext<'a> {
    pub action: ActionId,
    pub character: EntityHandle,
    pub mode: RunMode,
    /// Asset template: structural edits are refused at runtime.
    pub template: bool,
    pub equipped: bool,
    pub events: &'a mut EventRegistry,
    pub states: &'a mut StateFlags,
    pub observer: &'a mut dyn ActionObserver,
}

impl ActionContext<'_> {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.mode == RunMode::Running
    }

    /// Publishes an event on behalf of the owning character.
    pub fn publish(&mut self, event: ActionEvent) {
        self.events.publish(self.character, event);
    }
}
