//! Action modules: one behavior variant of an item capability.
//!
//! An [`ActionModule`] carries the state every module shares (id, name,
//! enabled flag, back-references to its owners) and boxes a
//! [`ModuleBehavior`] that supplies the capability-specific logic.
//!
//! # Module Structure
//!
//! - `context`: [`ModuleContext`] handed to behavior hooks
//! - `trigger`: trigger state machines (single, repeat, burst, charged)
//! - `clip`: clip and reload capabilities
//! - `switcher`: index-based switchers

mod clip;
mod context;
mod switcher;
mod trigger;

pub use clip::{ClipModule, ReloadModule, ReloadProgress, SimpleClip, TimedReload};
pub use context::ModuleContext;
pub use switcher::{ModuleSwitcher, StateSwitcher, SwitchChange, SwitchIndex};
pub use trigger::{BurstTrigger, ChargedTrigger, RepeatTrigger, SingleTrigger, TriggerModule};

use std::any::Any;
use std::fmt;

use crate::action::ActionContext;
use crate::capability::Capabilities;
use crate::event::{ActionEvent, EventTag};
use crate::ids::{ActionId, GroupId, ModuleId, ModuleKey};

/// Object-safe access to [`Any`] for trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Capability-specific logic of a module.
///
/// Every hook has a no-op default. A behavior advertising a capability tag
/// in [`capabilities`](Self::capabilities) must return `Some` from the
/// matching `as_*` accessor.
pub trait ModuleBehavior: AsAny {
    /// Capability tags this behavior implements.
    fn capabilities(&self) -> Capabilities;

    /// Trigger-style behaviors are only active while they head their group's
    /// enabled list.
    fn active_only_if_first_enabled(&self) -> bool {
        false
    }

    /// Tags this behavior wants routed to [`on_event`](Self::on_event) while
    /// equipped and enabled.
    fn listened_events(&self) -> &'static [EventTag] {
        &[]
    }

    fn on_initialize(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    fn on_enable(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    fn on_disable(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    /// Receives a routed event. Only called while the module is active.
    fn on_event(&mut self, _event: &ActionEvent, _cx: &mut ModuleContext<'_, '_>) {}

    fn pickup(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    fn will_equip(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    fn equip(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    fn start_unequip(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    fn unequip(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    /// Clears transient per-use state. `force` is set when the item is
    /// removed rather than just unequipped.
    fn reset_module(&mut self, _force: bool) {}

    fn on_destroy(&mut self, _cx: &mut ModuleContext<'_, '_>) {}

    fn as_trigger(&self) -> Option<&dyn TriggerModule> {
        None
    }

    fn as_trigger_mut(&mut self) -> Option<&mut dyn TriggerModule> {
        None
    }

    fn as_clip(&self) -> Option<&dyn ClipModule> {
        None
    }

    fn as_clip_mut(&mut self) -> Option<&mut dyn ClipModule> {
        None
    }

    fn as_reload(&self) -> Option<&dyn ReloadModule> {
        None
    }

    fn as_reload_mut(&mut self) -> Option<&mut dyn ReloadModule> {
        None
    }

    fn as_switcher(&self) -> Option<&dyn ModuleSwitcher> {
        None
    }

    fn as_switcher_mut(&mut self) -> Option<&mut dyn ModuleSwitcher> {
        None
    }
}

/// A single module: shared bookkeeping plus its boxed behavior.
pub struct ActionModule {
    id: ModuleId,
    name: String,
    enabled: bool,
    initialized: bool,
    listening: bool,
    action: ActionId,
    group: GroupId,
    behavior: Box<dyn ModuleBehavior>,
}

impl ActionModule {
    /// Creates an enabled, unbound module.
    pub fn new(name: impl Into<String>, behavior: impl ModuleBehavior) -> Self {
        Self::boxed(name, Box::new(behavior))
    }

    pub fn boxed(name: impl Into<String>, behavior: Box<dyn ModuleBehavior>) -> Self {
        Self {
            id: ModuleId::UNASSIGNED,
            name: name.into(),
            enabled: true,
            initialized: false,
            listening: false,
            action: ActionId::UNASSIGNED,
            group: GroupId::UNASSIGNED,
            behavior,
        }
    }

    pub fn with_id(mut self, id: ModuleId) -> Self {
        self.id = id;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True while the module has listeners registered.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn action(&self) -> ActionId {
        self.action
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn key(&self) -> ModuleKey {
        ModuleKey::new(self.action, self.group, self.id)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.behavior.capabilities()
    }

    pub fn has_capability(&self, capabilities: Capabilities) -> bool {
        self.capabilities().contains(capabilities)
    }

    pub fn active_only_if_first_enabled(&self) -> bool {
        self.behavior.active_only_if_first_enabled()
    }

    pub fn behavior(&self) -> &dyn ModuleBehavior {
        &*self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut dyn ModuleBehavior {
        &mut *self.behavior
    }

    /// Downcasts the behavior to a concrete type.
    pub fn behavior_as<T: ModuleBehavior>(&self) -> Option<&T> {
        (*self.behavior).as_any().downcast_ref::<T>()
    }

    pub fn behavior_as_mut<T: ModuleBehavior>(&mut self) -> Option<&mut T> {
        (*self.behavior).as_any_mut().downcast_mut::<T>()
    }

    pub fn trigger(&self) -> Option<&dyn TriggerModule> {
        self.behavior.as_trigger()
    }

    pub fn trigger_mut(&mut self) -> Option<&mut dyn TriggerModule> {
        self.behavior.as_trigger_mut()
    }

    pub fn clip(&self) -> Option<&dyn ClipModule> {
        self.behavior.as_clip()
    }

    pub fn clip_mut(&mut self) -> Option<&mut dyn ClipModule> {
        self.behavior.as_clip_mut()
    }

    pub fn reload(&self) -> Option<&dyn ReloadModule> {
        self.behavior.as_reload()
    }

    pub fn reload_mut(&mut self) -> Option<&mut dyn ReloadModule> {
        self.behavior.as_reload_mut()
    }

    pub fn switcher(&self) -> Option<&dyn ModuleSwitcher> {
        self.behavior.as_switcher()
    }

    pub fn switcher_mut(&mut self) -> Option<&mut dyn ModuleSwitcher> {
        self.behavior.as_switcher_mut()
    }

    /// Sets the flag without running hooks or notifying the group.
    ///
    /// Used when restoring authored data. The owning group must recompute
    /// its caches afterwards if the module is already a member.
    pub fn set_enabled_without_notify(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn assign_id(&mut self, id: ModuleId) {
        self.id = id;
    }

    /// Binds the module to its owners. Repeated calls are ignored.
    pub(crate) fn initialize(&mut self, group: GroupId, cx: &mut ActionContext<'_>) -> bool {
        if self.initialized {
            return false;
        }
        if !cx.action.is_assigned() {
            tracing::error!(module = %self.name, "module initialized without an owning action");
            return false;
        }

        self.action = cx.action;
        self.group = group;
        let key = self.key();
        self.behavior
            .on_initialize(&mut ModuleContext::new(key, cx));
        self.initialized = true;
        tracing::debug!(%key, module = %self.name, "module initialized");
        true
    }

    /// Changes the enabled flag, running hooks first while live.
    ///
    /// Returns true if the flag changed. The caller (the owning group) must
    /// recompute its caches when this returns true.
    pub(crate) fn set_enabled(&mut self, enabled: bool, cx: &mut ActionContext<'_>) -> bool {
        if self.enabled == enabled {
            return false;
        }

        if cx.is_running() && self.initialized {
            let key = self.key();
            let mut mcx = ModuleContext::new(key, cx);
            if enabled {
                self.behavior.on_enable(&mut mcx);
            } else {
                self.behavior.on_disable(&mut mcx);
            }
            let should_listen = enabled && mcx.is_equipped();
            self.sync_listeners(should_listen, mcx.action_context());
        }

        self.enabled = enabled;
        true
    }

    /// Registers or drops this module's event listeners.
    pub(crate) fn sync_listeners(&mut self, should_listen: bool, cx: &mut ActionContext<'_>) {
        if should_listen == self.listening || !self.initialized {
            return;
        }

        let key = self.key();
        for tag in self.behavior.listened_events() {
            if should_listen {
                cx.events.listen(cx.character, *tag, key);
            } else {
                cx.events.forget(cx.character, *tag, key);
            }
        }
        self.listening = should_listen;
    }

    /// Re-synchronizes listeners with the current enabled/equipped state.
    pub fn update_registered_events(&mut self, cx: &mut ActionContext<'_>) {
        let should_listen = self.enabled && cx.equipped && cx.is_running();
        self.sync_listeners(should_listen, cx);
    }

    pub fn pickup(&mut self, cx: &mut ActionContext<'_>) {
        let key = self.key();
        self.behavior.pickup(&mut ModuleContext::new(key, cx));
    }

    pub fn will_equip(&mut self, cx: &mut ActionContext<'_>) {
        let key = self.key();
        self.behavior.will_equip(&mut ModuleContext::new(key, cx));
    }

    pub fn equip(&mut self, cx: &mut ActionContext<'_>) {
        let key = self.key();
        self.behavior.equip(&mut ModuleContext::new(key, cx));
        self.update_registered_events(cx);
    }

    pub fn start_unequip(&mut self, cx: &mut ActionContext<'_>) {
        let key = self.key();
        self.behavior.start_unequip(&mut ModuleContext::new(key, cx));
    }

    pub fn unequip(&mut self, cx: &mut ActionContext<'_>) {
        let key = self.key();
        self.behavior.unequip(&mut ModuleContext::new(key, cx));
        self.update_registered_events(cx);
        self.reset_module(false);
    }

    pub fn remove_item(&mut self) {
        self.reset_module(true);
    }

    pub fn reset_module(&mut self, force: bool) {
        self.behavior.reset_module(force);
    }

    pub(crate) fn handle_event(&mut self, event: &ActionEvent, cx: &mut ActionContext<'_>) {
        let key = self.key();
        self.behavior
            .on_event(event, &mut ModuleContext::new(key, cx));
    }

    /// Releases listeners and unbinds the module.
    pub(crate) fn destroy(&mut self, cx: &mut ActionContext<'_>) {
        if !self.initialized {
            return;
        }
        let key = self.key();
        self.sync_listeners(false, cx);
        cx.events.forget_module(key);
        self.behavior
            .on_destroy(&mut ModuleContext::new(key, cx));
        self.initialized = false;
        self.action = ActionId::UNASSIGNED;
        self.group = GroupId::UNASSIGNED;
        tracing::debug!(%key, module = %self.name, "module destroyed");
    }
}

impl fmt::Debug for ActionModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionModule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("initialized", &self.initialized)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
