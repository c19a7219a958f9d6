//! The owning item action.
//!
//! An [`ItemAction`] owns an ordered registry of module groups, the event
//! registry its modules listen on and the character state flags switchers
//! toggle. It is the single authority that drives lifecycle hooks, routes
//! queued events to listening modules and runs the per-tick usage loop.
//!
//! # Module Structure
//!
//! - `context`: [`ActionContext`], the borrowed view handed to groups and modules
//! - `error`: [`ActionError`]

mod context;
mod error;

pub use context::{ActionContext, ActionObserver, NoopObserver, RunMode, StateFlags};
pub use error::ActionError;

use std::collections::HashMap;
use std::fmt;

use crate::capability::Capabilities;
use crate::config::ActionConfig;
use crate::error::report;
use crate::event::{ActionEvent, EventRegistry};
use crate::group::{GroupKind, ModuleGroup, ModuleGroupBase};
use crate::ids::{ActionId, EntityHandle, GroupId, ModuleId, ModuleKey};
use crate::module::{ActionModule, ModuleContext, ModuleSwitcher, ReloadProgress, SwitchChange};

/// Lifecycle phase of an [`ItemAction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActionPhase {
    #[default]
    Uninitialized,
    Initialized,
    /// Equipped and ticking.
    Active,
    Destroyed,
}

/// What one [`ItemAction::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Uses performed (`ItemUsed` events).
    pub uses: u32,
    pub dry_fires: u32,
    /// Shots the trigger produced while a reload was running.
    pub suppressed: u32,
    /// Amount refilled if a reload completed this tick.
    pub reloaded: Option<u32>,
}

type Groups = Vec<Box<dyn ModuleGroupBase>>;

/// Item capability host owning module groups.
pub struct ItemAction {
    id: ActionId,
    character: EntityHandle,
    name: String,
    mode: RunMode,
    template: bool,
    phase: ActionPhase,
    equipped: bool,
    config: ActionConfig,
    groups: Groups,
    groups_by_id: HashMap<GroupId, usize>,
    events: EventRegistry,
    states: StateFlags,
    observer: Box<dyn ActionObserver>,
}

impl ItemAction {
    pub fn new(id: ActionId, character: EntityHandle, name: impl Into<String>) -> Self {
        Self {
            id,
            character,
            name: name.into(),
            mode: RunMode::Running,
            template: false,
            phase: ActionPhase::Uninitialized,
            equipped: false,
            config: ActionConfig::default(),
            groups: Vec::new(),
            groups_by_id: HashMap::new(),
            events: EventRegistry::new(),
            states: StateFlags::new(),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Marks the action as an asset template: structural edits are refused
    /// at runtime.
    pub fn with_template(mut self, template: bool) -> Self {
        self.template = template;
        self
    }

    pub fn with_config(mut self, config: ActionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: impl ActionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn character(&self) -> EntityHandle {
        self.character
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn is_template(&self) -> bool {
        self.template
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    /// Mutable registry access, for subscribing observers.
    pub fn events_mut(&mut self) -> &mut EventRegistry {
        &mut self.events
    }

    pub fn states(&self) -> &StateFlags {
        &self.states
    }

    /// Union of the capabilities of every present module.
    pub fn capabilities(&self) -> Capabilities {
        self.groups
            .iter()
            .flat_map(|group| (0..group.len()).filter_map(|index| group.module_at(index)))
            .fold(Capabilities::empty(), |caps, module| {
                caps | module.capabilities()
            })
    }

    // ========================================================================
    // Group registry
    // ========================================================================

    /// Registers a group and returns its id.
    ///
    /// An unassigned group id becomes the number of groups already
    /// registered. If the action is already initialized the group is
    /// initialized right away.
    pub fn add_group(&mut self, group: impl ModuleGroupBase) -> Result<GroupId, ActionError> {
        self.add_group_boxed(Box::new(group))
    }

    pub fn add_group_boxed(
        &mut self,
        mut group: Box<dyn ModuleGroupBase>,
    ) -> Result<GroupId, ActionError> {
        self.ensure_alive()?;

        if !group.id().is_assigned() {
            group.set_id(GroupId(self.groups.len() as i32));
        }
        let id = group.id();

        if matches!(self.phase, ActionPhase::Initialized | ActionPhase::Active) {
            let (_, mut cx) = self.split();
            group.initialize(&mut cx).inspect_err(report)?;
        }

        if self.groups_by_id.contains_key(&id) {
            tracing::warn!(action = %self.id, group = %id, "group id collision, last registration wins");
        }
        self.groups.push(group);
        self.groups_by_id.insert(id, self.groups.len() - 1);
        if self.groups.len() > ActionConfig::MAX_GROUPS {
            tracing::warn!(action = %self.id, count = self.groups.len(), "item action exceeds group soft limit");
        }

        self.flush_events();
        Ok(id)
    }

    /// Unregisters a group, then destroys its modules.
    pub fn remove_group(&mut self, id: GroupId) -> Result<Box<dyn ModuleGroupBase>, ActionError> {
        let index = self.group_index(id)?;
        let mut group = self.groups.remove(index);
        self.rebuild_group_lookup();

        let (_, mut cx) = self.split();
        group.on_destroy(&mut cx);
        self.flush_events();
        Ok(group)
    }

    pub fn group_dyn(&self, id: GroupId) -> Option<&dyn ModuleGroupBase> {
        let index = *self.groups_by_id.get(&id)?;
        self.groups.get(index).map(|group| &**group)
    }

    pub fn group_dyn_mut(&mut self, id: GroupId) -> Option<&mut dyn ModuleGroupBase> {
        let index = *self.groups_by_id.get(&id)?;
        let group: &mut dyn ModuleGroupBase = &mut **self.groups.get_mut(index)?;
        Some(group)
    }

    /// Typed view of group `id`.
    pub fn group<K: GroupKind>(&self, id: GroupId) -> Result<&ModuleGroup<K>, ActionError> {
        let group = self.group_dyn(id).ok_or(ActionError::UnknownGroup(id))?;
        let actual = group.kind_name();
        group
            .as_any()
            .downcast_ref::<ModuleGroup<K>>()
            .ok_or(ActionError::GroupKindMismatch {
                id,
                expected: K::NAME,
                actual,
            })
    }

    pub fn group_mut<K: GroupKind>(
        &mut self,
        id: GroupId,
    ) -> Result<&mut ModuleGroup<K>, ActionError> {
        let group = self.group_dyn_mut(id).ok_or(ActionError::UnknownGroup(id))?;
        let actual = group.kind_name();
        group
            .as_any_mut()
            .downcast_mut::<ModuleGroup<K>>()
            .ok_or(ActionError::GroupKindMismatch {
                id,
                expected: K::NAME,
                actual,
            })
    }

    /// First registered group of kind `K`.
    pub fn first_group<K: GroupKind>(&self) -> Option<&ModuleGroup<K>> {
        self.groups
            .iter()
            .find_map(|group| (**group).as_any().downcast_ref::<ModuleGroup<K>>())
    }

    /// Every registered group in registration order.
    pub fn all_groups(&self) -> &[Box<dyn ModuleGroupBase>] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Initializes every registered group. Repeated calls are ignored.
    pub fn initialize(&mut self) -> Result<(), ActionError> {
        if self.mode == RunMode::Authoring {
            return Err(ActionError::AuthoringMode);
        }
        match self.phase {
            ActionPhase::Uninitialized => {}
            ActionPhase::Initialized | ActionPhase::Active => return Ok(()),
            ActionPhase::Destroyed => return Err(self.invalid_phase(ActionPhase::Uninitialized)),
        }

        let (groups, mut cx) = self.split();
        for group in groups.iter_mut() {
            group.initialize(&mut cx).inspect_err(report)?;
        }
        self.phase = ActionPhase::Initialized;
        tracing::debug!(action = %self.id, name = %self.name, groups = self.groups.len(), "item action initialized");

        self.flush_events();
        Ok(())
    }

    pub fn pickup(&mut self) -> Result<(), ActionError> {
        self.ensure_initialized()?;
        self.for_each_module(ActionModule::pickup);
        Ok(())
    }

    pub fn will_equip(&mut self) -> Result<(), ActionError> {
        self.expect_phase(ActionPhase::Initialized)?;
        self.for_each_module(ActionModule::will_equip);
        Ok(())
    }

    pub fn equip(&mut self) -> Result<(), ActionError> {
        self.expect_phase(ActionPhase::Initialized)?;
        self.equipped = true;
        self.for_each_module(ActionModule::equip);
        self.phase = ActionPhase::Active;
        tracing::debug!(action = %self.id, "equipped");

        let event = ActionEvent::Equipped { action: self.id };
        self.events.publish(self.character, event);
        self.flush_events();
        Ok(())
    }

    pub fn start_unequip(&mut self) -> Result<(), ActionError> {
        self.expect_phase(ActionPhase::Active)?;
        self.for_each_module(ActionModule::start_unequip);
        Ok(())
    }

    pub fn unequip(&mut self) -> Result<(), ActionError> {
        self.expect_phase(ActionPhase::Active)?;
        self.equipped = false;
        self.for_each_module(ActionModule::unequip);
        self.phase = ActionPhase::Initialized;
        tracing::debug!(action = %self.id, "unequipped");

        let event = ActionEvent::Unequipped { action: self.id };
        self.events.publish(self.character, event);
        self.flush_events();
        Ok(())
    }

    /// The item leaves the inventory: unequips if needed, then resets every
    /// module with `force`.
    pub fn remove_item(&mut self) -> Result<(), ActionError> {
        self.ensure_initialized()?;
        if self.phase == ActionPhase::Active {
            self.unequip()?;
        }
        for group in &mut self.groups {
            group.visit_modules_mut(&mut |module| module.remove_item());
        }
        Ok(())
    }

    /// Destroys every group. Repeated calls are ignored.
    pub fn shutdown(&mut self) -> Result<(), ActionError> {
        if self.phase == ActionPhase::Destroyed {
            return Ok(());
        }
        if self.phase == ActionPhase::Active {
            self.unequip()?;
        }

        let mut groups = std::mem::take(&mut self.groups);
        self.groups_by_id.clear();
        let (_, mut cx) = self.split();
        for group in groups.iter_mut() {
            group.on_destroy(&mut cx);
        }
        // Destroy notifications go to subscribers only.
        self.events.drain_pending();
        self.phase = ActionPhase::Destroyed;
        tracing::debug!(action = %self.id, "item action destroyed");
        Ok(())
    }

    // ========================================================================
    // Module mutation
    // ========================================================================

    pub fn add_module(&mut self, group: GroupId, module: ActionModule) -> Result<usize, ActionError> {
        self.ensure_alive()?;
        let index = self.group_index(group)?;
        let (groups, mut cx) = self.split();
        let slot = groups[index]
            .add_module(module, &mut cx)
            .inspect_err(report)?;
        self.flush_events();
        Ok(slot)
    }

    /// Removes module `id` from `group`. An absent module is a no-op.
    pub fn remove_module(
        &mut self,
        group: GroupId,
        id: ModuleId,
    ) -> Result<Option<ActionModule>, ActionError> {
        self.ensure_alive()?;
        let index = self.group_index(group)?;
        let (groups, mut cx) = self.split();
        let removed = groups[index]
            .remove_module(id, &mut cx)
            .inspect_err(report)?;
        self.flush_events();
        Ok(removed)
    }

    pub fn set_modules(
        &mut self,
        group: GroupId,
        modules: Vec<Option<ActionModule>>,
    ) -> Result<(), ActionError> {
        self.ensure_alive()?;
        let index = self.group_index(group)?;
        let (groups, mut cx) = self.split();
        groups[index]
            .set_modules(modules, &mut cx)
            .inspect_err(report)?;
        self.flush_events();
        Ok(())
    }

    /// Enables or disables the module at `slot`. Returns true on change.
    pub fn set_module_enabled(
        &mut self,
        group: GroupId,
        slot: usize,
        enabled: bool,
    ) -> Result<bool, ActionError> {
        self.ensure_alive()?;
        let index = self.group_index(group)?;
        let (groups, mut cx) = self.split();
        if groups[index].module_at(slot).is_none() {
            return Err(ActionError::UnknownModule { group, index: slot });
        }
        let changed = groups[index].set_module_enabled(slot, enabled, &mut cx);
        self.flush_events();
        Ok(changed)
    }

    /// Enables the next module of `group`, wrapping per
    /// [`ActionConfig::default_switch_loop`].
    pub fn switch_next(&mut self, group: GroupId) -> Result<bool, ActionError> {
        self.switch_module(group, true, self.config.default_switch_loop)
    }

    pub fn switch_previous(&mut self, group: GroupId) -> Result<bool, ActionError> {
        self.switch_module(group, false, self.config.default_switch_loop)
    }

    pub fn switch_module(
        &mut self,
        group: GroupId,
        forward: bool,
        looped: bool,
    ) -> Result<bool, ActionError> {
        self.ensure_alive()?;
        let index = self.group_index(group)?;
        let (groups, mut cx) = self.split();
        let changed = if forward {
            groups[index].switch_to_next_module(looped, &mut cx)
        } else {
            groups[index].switch_to_previous_module(looped, &mut cx)
        };
        self.flush_events();
        Ok(changed)
    }

    /// Moves the first enabled switcher of `group` to `index`.
    ///
    /// Returns `None` if the group has no enabled switcher or the index is
    /// out of range.
    pub fn switch_to(
        &mut self,
        group: GroupId,
        index: usize,
    ) -> Result<Option<SwitchChange>, ActionError> {
        self.with_switcher(group, |switcher, mcx| switcher.switch_to(index, mcx))
    }

    pub fn switcher_next(&mut self, group: GroupId) -> Result<Option<SwitchChange>, ActionError> {
        self.with_switcher(group, |switcher, mcx| switcher.switch_to_next(mcx))
    }

    pub fn switcher_previous(
        &mut self,
        group: GroupId,
    ) -> Result<Option<SwitchChange>, ActionError> {
        self.with_switcher(group, |switcher, mcx| switcher.switch_to_previous(mcx))
    }

    // ========================================================================
    // Usage
    // ========================================================================

    /// Use button pressed.
    pub fn start_use(&mut self) -> Result<(), ActionError> {
        self.publish_use_input(true)
    }

    /// Use button released.
    pub fn stop_use(&mut self) -> Result<(), ActionError> {
        self.publish_use_input(false)
    }

    /// Starts the active reload. Returns false if there is nothing to reload
    /// or a reload is already running.
    pub fn reload(&mut self) -> Result<bool, ActionError> {
        self.expect_phase(ActionPhase::Active)?;
        let clip_at = find_active(&self.groups, Capabilities::CLIP);
        let Some((g, i)) = find_active(&self.groups, Capabilities::RELOAD) else {
            return Ok(false);
        };

        let full = clip_at
            .and_then(|(cg, ci)| self.groups[cg].module_at(ci))
            .and_then(ActionModule::clip)
            .is_some_and(|clip| clip.remaining() >= clip.capacity());
        if full {
            return Ok(false);
        }

        let (groups, mut cx) = self.split();
        let Some(module) = groups[g].module_at_mut(i) else {
            return Ok(false);
        };
        let key = module.key();
        let started = module.reload_mut().is_some_and(|reload| reload.start_reload());
        if started {
            tracing::debug!(%key, "reload started");
            cx.publish(ActionEvent::ReloadStarted { key });
        }
        self.flush_events();
        Ok(started)
    }

    /// Advances the usage loop by one host tick.
    ///
    /// The active trigger ticks, each shot consumes from the active clip,
    /// the active reload ticks, and finally queued events are routed.
    pub fn tick(&mut self) -> Result<TickReport, ActionError> {
        self.expect_phase(ActionPhase::Active)?;

        let trigger_at = find_active(&self.groups, Capabilities::TRIGGER);
        let clip_at = find_active(&self.groups, Capabilities::CLIP);
        let reload_at = find_active(&self.groups, Capabilities::RELOAD);
        let mut report = TickReport::default();

        let (groups, mut cx) = self.split();

        let reloading = reload_at
            .and_then(|(g, i)| groups[g].module_at(i))
            .and_then(ActionModule::reload)
            .is_some_and(|reload| reload.is_reloading());

        let fired = match trigger_at {
            Some((g, i)) => groups[g].module_at_mut(i).and_then(|module| {
                let key = module.key();
                module.trigger_mut().map(|trigger| (key, trigger.tick()))
            }),
            None => None,
        };

        if let Some((key, shots)) = fired {
            if reloading {
                report.suppressed = shots;
            } else {
                for _ in 0..shots {
                    if !use_once(groups, clip_at, key, &mut cx, &mut report) {
                        break;
                    }
                }
            }
        }

        if let Some((g, i)) = reload_at {
            let completed = groups[g].module_at_mut(i).and_then(|module| {
                let key = module.key();
                let progress = module.reload_mut()?.tick();
                (progress == ReloadProgress::Completed).then_some(key)
            });
            if let Some(key) = completed {
                let amount = match clip_at {
                    Some((cg, ci)) => groups[cg]
                        .module_at_mut(ci)
                        .and_then(ActionModule::clip_mut)
                        .map_or(0, |clip| clip.refill()),
                    None => 0,
                };
                tracing::debug!(%key, amount, "reload completed");
                report.reloaded = Some(amount);
                cx.publish(ActionEvent::ReloadCompleted { key, amount });
            }
        }

        self.flush_events();
        Ok(report)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Splits the action into its group registry and a context over the
    /// remaining fields.
    fn split(&mut self) -> (&mut Groups, ActionContext<'_>) {
        let Self {
            id,
            character,
            mode,
            template,
            equipped,
            groups,
            events,
            states,
            observer,
            ..
        } = self;
        let cx = ActionContext {
            action: *id,
            character: *character,
            mode: *mode,
            template: *template,
            equipped: *equipped,
            events,
            states,
            observer: &mut **observer,
        };
        (groups, cx)
    }

    /// Routes queued events to listening modules, round by round, up to
    /// `max_event_chain` rounds.
    fn flush_events(&mut self) {
        let mut rounds = 0;
        while self.events.has_pending() {
            if rounds >= self.config.max_event_chain {
                let dropped = self.events.drain_pending().len();
                tracing::warn!(
                    action = %self.id,
                    dropped,
                    max = self.config.max_event_chain,
                    "event chain too deep, dropping queued events"
                );
                return;
            }
            rounds += 1;

            let action = self.id;
            for (entity, event) in self.events.drain_pending() {
                let keys: Vec<ModuleKey> = self.events.listeners(entity, event.tag()).to_vec();
                for key in keys.into_iter().filter(|key| key.action == action) {
                    let Some(&index) = self.groups_by_id.get(&key.group) else {
                        continue;
                    };
                    let (groups, mut cx) = self.split();
                    groups[index].route_event(key.module, &event, &mut cx);
                }
            }
        }
    }

    fn for_each_module(&mut self, hook: fn(&mut ActionModule, &mut ActionContext<'_>)) {
        let (groups, mut cx) = self.split();
        for group in groups.iter_mut() {
            group.visit_modules_mut(&mut |module| hook(module, &mut cx));
        }
    }

    fn with_switcher<F>(
        &mut self,
        group: GroupId,
        apply: F,
    ) -> Result<Option<SwitchChange>, ActionError>
    where
        F: FnOnce(&mut dyn ModuleSwitcher, &mut ModuleContext<'_, '_>) -> Option<SwitchChange>,
    {
        self.ensure_alive()?;
        let index = self.group_index(group)?;
        let (groups, mut cx) = self.split();

        let target = groups[index]
            .enabled_indices()
            .iter()
            .copied()
            .find(|&slot| {
                groups[index]
                    .module_at(slot)
                    .is_some_and(|module| module.has_capability(Capabilities::SWITCHER))
            });
        let module = match target {
            Some(slot) => groups[index].module_at_mut(slot),
            None => None,
        };
        let Some(module) = module else {
            return Ok(None);
        };

        let key = module.key();
        let change = module
            .switcher_mut()
            .and_then(|switcher| apply(switcher, &mut ModuleContext::new(key, &mut cx)));
        self.flush_events();
        Ok(change)
    }

    fn publish_use_input(&mut self, pressed: bool) -> Result<(), ActionError> {
        self.expect_phase(ActionPhase::Active)?;
        let event = ActionEvent::UseInput {
            action: self.id,
            pressed,
        };
        self.events.publish(self.character, event);
        self.flush_events();
        Ok(())
    }

    fn group_index(&self, id: GroupId) -> Result<usize, ActionError> {
        self.groups_by_id
            .get(&id)
            .copied()
            .ok_or(ActionError::UnknownGroup(id))
    }

    fn rebuild_group_lookup(&mut self) {
        self.groups_by_id = self
            .groups
            .iter()
            .enumerate()
            .map(|(index, group)| (group.id(), index))
            .collect();
    }

    fn invalid_phase(&self, expected: ActionPhase) -> ActionError {
        ActionError::InvalidPhase {
            expected,
            actual: self.phase,
        }
    }

    fn expect_phase(&self, expected: ActionPhase) -> Result<(), ActionError> {
        if self.phase != expected {
            return Err(self.invalid_phase(expected));
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<(), ActionError> {
        match self.phase {
            ActionPhase::Initialized | ActionPhase::Active => Ok(()),
            _ => Err(self.invalid_phase(ActionPhase::Initialized)),
        }
    }

    fn ensure_alive(&self) -> Result<(), ActionError> {
        if self.phase == ActionPhase::Destroyed {
            return Err(self.invalid_phase(ActionPhase::Initialized));
        }
        Ok(())
    }
}

/// Locates the active module advertising `capabilities`: the first group
/// (in registration order) with such a module, and within it the first
/// enabled one that is active.
fn find_active(
    groups: &[Box<dyn ModuleGroupBase>],
    capabilities: Capabilities,
) -> Option<(usize, usize)> {
    groups.iter().enumerate().find_map(|(g, group)| {
        group
            .enabled_indices()
            .iter()
            .copied()
            .find(|&index| {
                group.is_module_active(index)
                    && group
                        .module_at(index)
                        .is_some_and(|module| module.has_capability(capabilities))
            })
            .map(|index| (g, index))
    })
}

/// Performs one use. Returns false once the clip ran dry.
fn use_once(
    groups: &mut Groups,
    clip_at: Option<(usize, usize)>,
    trigger: ModuleKey,
    cx: &mut ActionContext<'_>,
    report: &mut TickReport,
) -> bool {
    let clip_module = match clip_at {
        Some((g, i)) => groups[g].module_at_mut(i),
        None => None,
    };
    let Some(clip_module) = clip_module else {
        report.uses += 1;
        cx.publish(ActionEvent::ItemUsed {
            key: trigger,
            remaining: None,
        });
        return true;
    };

    let clip_key = clip_module.key();
    let Some(clip) = clip_module.clip_mut() else {
        return false;
    };
    if clip.try_consume(1) == 0 {
        report.dry_fires += 1;
        cx.publish(ActionEvent::DryFire { key: trigger });
        return false;
    }

    report.uses += 1;
    let remaining = clip.remaining();
    cx.publish(ActionEvent::ItemUsed {
        key: trigger,
        remaining: Some(remaining),
    });
    if remaining == 0 {
        tracing::debug!(key = %clip_key, "clip emptied");
        cx.publish(ActionEvent::ClipEmptied { key: clip_key });
    }
    true
}

impl fmt::Debug for ItemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemAction")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("character", &self.character)
            .field("mode", &self.mode)
            .field("phase", &self.phase)
            .field("equipped", &self.equipped)
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}
