//! Module groups: ordered, typed collections of modules.
//!
//! A group keeps its main sequence in priority order and two derived
//! caches, the enabled and disabled subsets, that partition the present
//! modules. Every mutation path leaves the caches consistent; on any
//! enabled-flag change the caches are rebuilt from scratch with a linear
//! scan, which stays correct under re-entrant toggling and is cheap for the
//! handful of modules an item action carries.
//!
//! # Module Structure
//!
//! - `base`: [`ModuleGroupBase`], the type-erased contract the owning action uses
//! - `error`: [`GroupError`]
//! - `query`: [`ModuleFilter`] and [`ModuleSpan`] for allocation-free lookups

mod base;
mod error;
mod query;

pub use base::ModuleGroupBase;
pub use error::GroupError;
pub use query::{ModuleFilter, ModuleSpan};

use std::fmt;
use std::marker::PhantomData;

use crate::action::ActionContext;
use crate::capability::Capabilities;
use crate::config::ActionConfig;
use crate::event::ActionEvent;
use crate::ids::{ActionId, GroupId, ModuleId};
use crate::module::{ActionModule, ModuleBehavior};

/// Marker naming the capability contract of a [`ModuleGroup`].
pub trait GroupKind: 'static {
    const NAME: &'static str;

    /// Capabilities every member must advertise.
    const REQUIRED: Capabilities;

    fn accepts(behavior: &dyn ModuleBehavior) -> bool {
        behavior.capabilities().contains(Self::REQUIRED)
    }
}

/// Groups of [`TriggerModule`](crate::module::TriggerModule)s.
#[derive(Debug)]
pub enum Triggers {}

impl GroupKind for Triggers {
    const NAME: &'static str = "triggers";
    const REQUIRED: Capabilities = Capabilities::TRIGGER;
}

/// Groups of [`ClipModule`](crate::module::ClipModule)s.
#[derive(Debug)]
pub enum Clips {}

impl GroupKind for Clips {
    const NAME: &'static str = "clips";
    const REQUIRED: Capabilities = Capabilities::CLIP;
}

/// Groups of [`ReloadModule`](crate::module::ReloadModule)s.
#[derive(Debug)]
pub enum Reloads {}

impl GroupKind for Reloads {
    const NAME: &'static str = "reloads";
    const REQUIRED: Capabilities = Capabilities::RELOAD;
}

/// Groups of [`ModuleSwitcher`](crate::module::ModuleSwitcher)s.
#[derive(Debug)]
pub enum Switchers {}

impl GroupKind for Switchers {
    const NAME: &'static str = "switchers";
    const REQUIRED: Capabilities = Capabilities::SWITCHER;
}

/// Groups that accept any module.
#[derive(Debug)]
pub enum AnyModules {}

impl GroupKind for AnyModules {
    const NAME: &'static str = "modules";
    const REQUIRED: Capabilities = Capabilities::empty();
}

/// Ordered collection of modules sharing the capability contract `K`.
pub struct ModuleGroup<K: GroupKind> {
    id: GroupId,
    action: ActionId,
    initialized: bool,
    slots: Vec<Option<ActionModule>>,
    enabled: Vec<usize>,
    disabled: Vec<usize>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: GroupKind> Default for ModuleGroup<K> {
    fn default() -> Self {
        Self {
            id: GroupId::UNASSIGNED,
            action: ActionId::UNASSIGNED,
            initialized: false,
            slots: Vec::new(),
            enabled: Vec::new(),
            disabled: Vec::new(),
            _kind: PhantomData,
        }
    }
}

impl<K: GroupKind> ModuleGroup<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_modules(modules: impl IntoIterator<Item = ActionModule>) -> Self {
        Self::from_slots(modules.into_iter().map(Some).collect())
    }

    /// Builds a group from authored slots. Empty slots are modules that
    /// failed to load; they are kept in place and skipped at initialization.
    ///
    /// A module lacking `K::REQUIRED` is logged and its slot left empty.
    pub fn from_slots(slots: Vec<Option<ActionModule>>) -> Self {
        let mut group = Self {
            slots: Self::accepted_slots(slots),
            ..Self::default()
        };
        group.recompute_caches();
        group
    }

    /// Pre-assigns the group id, as authored data may do.
    pub fn with_id(mut self, id: GroupId) -> Self {
        self.id = id;
        self
    }

    pub fn accepts(module: &ActionModule) -> bool {
        K::accepts(module.behavior())
    }

    pub fn slots(&self) -> &[Option<ActionModule>] {
        &self.slots
    }

    /// Present modules in priority order.
    pub fn modules(&self) -> impl Iterator<Item = &ActionModule> + '_ {
        self.slots.iter().flatten()
    }

    pub fn enabled_modules(&self) -> impl Iterator<Item = &ActionModule> + '_ {
        self.enabled.iter().filter_map(|&index| self.module_at(index))
    }

    pub fn disabled_modules(&self) -> impl Iterator<Item = &ActionModule> + '_ {
        self.disabled.iter().filter_map(|&index| self.module_at(index))
    }

    pub fn module_by_id_mut(&mut self, id: ModuleId) -> Option<&mut ActionModule> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|module| module.id() == id)
    }

    /// Index of `module` by identity.
    pub fn index_of(&self, module: &ActionModule) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|candidate| std::ptr::eq(candidate, module))
        })
    }

    /// Lowest-index enabled module whose behavior is a `T`.
    pub fn first_enabled_with_type<T: ModuleBehavior>(&self) -> Option<&T> {
        self.enabled_modules()
            .find_map(|module| module.behavior_as::<T>())
    }

    /// Lowest-index enabled module advertising `capabilities`.
    pub fn first_enabled_with_capability(
        &self,
        capabilities: Capabilities,
    ) -> Option<&ActionModule> {
        self.enabled_modules()
            .find(|module| module.has_capability(capabilities))
    }

    /// Appends behaviors of type `T` matching `filter` to `out`.
    pub fn collect_modules_with_type<'g, T: ModuleBehavior>(
        &'g self,
        filter: ModuleFilter,
        out: &mut Vec<&'g T>,
    ) -> ModuleSpan {
        let start = out.len();
        out.extend(
            self.filtered(filter)
                .filter_map(|module| module.behavior_as::<T>()),
        );
        ModuleSpan::since(start, out)
    }

    pub fn for_each_module_mut(&mut self, mut visit: impl FnMut(&mut ActionModule)) {
        for module in self.slots.iter_mut().flatten() {
            visit(module);
        }
    }

    /// Empties every slot whose module lacks `K::REQUIRED`.
    fn accepted_slots(slots: Vec<Option<ActionModule>>) -> Vec<Option<ActionModule>> {
        slots
            .into_iter()
            .map(|slot| {
                slot.filter(|module| {
                    let accepted = Self::accepts(module);
                    if !accepted {
                        tracing::error!(
                            kind = K::NAME,
                            module = %module.name(),
                            "module rejected: missing required capability"
                        );
                    }
                    accepted
                })
            })
            .collect()
    }

    fn filtered(&self, filter: ModuleFilter) -> Box<dyn Iterator<Item = &ActionModule> + '_> {
        match filter {
            ModuleFilter::All => Box::new(self.modules()),
            ModuleFilter::Enabled => Box::new(self.enabled_modules()),
            ModuleFilter::Disabled => Box::new(self.disabled_modules()),
        }
    }

    fn recompute_caches(&mut self) {
        self.enabled.clear();
        self.disabled.clear();
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(module) = slot {
                if module.is_enabled() {
                    self.enabled.push(index);
                } else {
                    self.disabled.push(index);
                }
            }
        }
    }

    /// Next id not used by any other module in the group: one past the
    /// largest, or the lowest free one once `i32::MAX` is taken.
    fn free_module_id(&self) -> ModuleId {
        let used: Vec<i32> = self
            .modules()
            .map(|module| module.id().0)
            .filter(|&id| id >= 0)
            .collect();
        let max = used.iter().copied().max().unwrap_or(-1);
        if let Some(next) = max.checked_add(1) {
            return ModuleId(next);
        }

        let lowest = (0..=i32::MAX).find(|id| !used.contains(id)).unwrap_or(0);
        tracing::warn!(group = %self.id, id = lowest, "module ids exhausted upward, reusing lowest free id");
        ModuleId(lowest)
    }

    fn ensure_unique_id(&mut self, index: usize) {
        let Some(id) = self.slots[index].as_ref().map(ActionModule::id) else {
            return;
        };
        let duplicate = id.is_assigned()
            && self.slots.iter().enumerate().any(|(other, slot)| {
                other != index
                    && slot
                        .as_ref()
                        .is_some_and(|module| module.is_initialized() && module.id() == id)
            });
        if id.is_assigned() && !duplicate {
            return;
        }
        if duplicate {
            tracing::warn!(group = %self.id, kind = K::NAME, %id, "duplicate module id reassigned");
        }
        let fresh = self.free_module_id();
        if let Some(module) = self.slots[index].as_mut() {
            module.assign_id(fresh);
        }
    }

    fn reject_template(&self, cx: &ActionContext<'_>) -> Result<(), GroupError> {
        if cx.template && cx.is_running() {
            tracing::warn!(
                group = %self.id,
                action = %cx.action,
                "modules of an asset template cannot be changed at runtime"
            );
            return Err(GroupError::TemplateLocked { action: cx.action });
        }
        Ok(())
    }

    /// "Module added" path for the slot at `index`.
    fn on_module_added(&mut self, index: usize, cx: &mut ActionContext<'_>) {
        if !cx.is_running() {
            if let Some(module) = self.slots[index].as_ref() {
                cx.observer.on_module_attached_in_editor(self.id, module);
            }
            return;
        }
        if !self.initialized || !self.action.is_assigned() {
            return;
        }

        self.ensure_unique_id(index);
        let group = self.id;
        let Some(module) = self.slots[index].as_mut() else {
            return;
        };

        module.initialize(group, cx);
        module.update_registered_events(cx);

        let cache = if module.is_enabled() {
            &mut self.enabled
        } else {
            &mut self.disabled
        };
        if let Err(position) = cache.binary_search(&index) {
            cache.insert(position, index);
        }

        let key = module.key();
        cx.observer.on_module_added(group, module);
        cx.publish(ActionEvent::ModuleAdded { key });
        tracing::debug!(%key, module = %module.name(), "module added");
    }

    /// "Module removed" path for a module already taken out of the sequence.
    fn on_module_removed(&mut self, module: &mut ActionModule, cx: &mut ActionContext<'_>) {
        if !cx.is_running() || !self.initialized {
            return;
        }
        let key = module.key();
        cx.observer.on_module_removed(self.id, module);
        module.destroy(cx);
        cx.publish(ActionEvent::ModuleRemoved { key });
        tracing::debug!(%key, module = %module.name(), "module removed");
    }

    /// Nearest present module from `current` in the given direction.
    /// Empty slots are stepped over.
    fn neighbor_of(&self, current: usize, forward: bool, looped: bool) -> Option<usize> {
        let len = self.slots.len();
        let mut index = current;
        for _ in 1..len {
            index = match (forward, looped) {
                (true, _) if index + 1 < len => index + 1,
                (true, true) => 0,
                (false, _) if index > 0 => index - 1,
                (false, true) => len - 1,
                _ => return None,
            };
            if self.slots[index].is_some() {
                return Some(index);
            }
        }
        None
    }

    fn switch_module(&mut self, forward: bool, looped: bool, cx: &mut ActionContext<'_>) -> bool {
        let Some(&current) = self.enabled.first() else {
            let Some(&first_disabled) = self.disabled.first() else {
                return false;
            };
            return self.set_module_enabled(first_disabled, true, cx);
        };

        let Some(neighbor) = self.neighbor_of(current, forward, looped) else {
            return false;
        };

        // Disable first: enabling the neighbor is what makes it active, and
        // that must see the bookkeeping already settled.
        self.set_module_enabled(current, false, cx);
        self.set_module_enabled(neighbor, true, cx);
        true
    }
}

impl<K: GroupKind> ModuleGroupBase for ModuleGroup<K> {
    fn id(&self) -> GroupId {
        self.id
    }

    fn set_id(&mut self, id: GroupId) {
        self.id = id;
    }

    fn kind_name(&self) -> &'static str {
        K::NAME
    }

    fn required_capabilities(&self) -> Capabilities {
        K::REQUIRED
    }

    fn action(&self) -> ActionId {
        self.action
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn module_count(&self) -> usize {
        self.modules().count()
    }

    fn initialize(&mut self, cx: &mut ActionContext<'_>) -> Result<(), GroupError> {
        if self.initialized {
            return Ok(());
        }
        if !cx.action.is_assigned() {
            return Err(GroupError::MissingAction { group: K::NAME });
        }

        self.action = cx.action;
        self.initialized = true;
        if self.slots.len() > ActionConfig::MAX_MODULES_PER_GROUP {
            tracing::warn!(group = %self.id, count = self.slots.len(), "module group exceeds soft limit");
        }

        self.enabled.clear();
        self.disabled.clear();
        for index in 0..self.slots.len() {
            if self.slots[index].is_none() {
                tracing::warn!(group = %self.id, kind = K::NAME, index, "empty module slot skipped");
                continue;
            }
            self.on_module_added(index, cx);
        }
        self.recompute_caches();

        tracing::debug!(group = %self.id, kind = K::NAME, action = %self.action, "group initialized");
        Ok(())
    }

    fn module_at(&self, index: usize) -> Option<&ActionModule> {
        self.slots.get(index)?.as_ref()
    }

    fn module_at_mut(&mut self, index: usize) -> Option<&mut ActionModule> {
        self.slots.get_mut(index)?.as_mut()
    }

    fn module_by_id(&self, id: ModuleId) -> Option<&ActionModule> {
        self.modules().find(|module| module.id() == id)
    }

    fn index_of_id(&self, id: ModuleId) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|module| module.id() == id))
    }

    fn enabled_indices(&self) -> &[usize] {
        &self.enabled
    }

    fn disabled_indices(&self) -> &[usize] {
        &self.disabled
    }

    fn is_module_active(&self, index: usize) -> bool {
        let Some(module) = self.module_at(index) else {
            return false;
        };
        if !module.is_enabled() {
            return false;
        }
        !module.active_only_if_first_enabled() || self.enabled.first() == Some(&index)
    }

    fn add_module(
        &mut self,
        module: ActionModule,
        cx: &mut ActionContext<'_>,
    ) -> Result<usize, GroupError> {
        if !Self::accepts(&module) {
            return Err(GroupError::TypeMismatch {
                group: K::NAME,
                module: module.name().to_owned(),
                required: K::REQUIRED,
            });
        }
        self.reject_template(cx)?;

        self.slots.push(Some(module));
        let index = self.slots.len() - 1;
        if !cx.is_running() || !self.initialized {
            self.recompute_caches();
        }
        self.on_module_added(index, cx);
        Ok(index)
    }

    fn remove_module(
        &mut self,
        id: ModuleId,
        cx: &mut ActionContext<'_>,
    ) -> Result<Option<ActionModule>, GroupError> {
        match self.index_of_id(id) {
            Some(index) => self.remove_module_at(index, cx),
            None => Ok(None),
        }
    }

    fn remove_module_at(
        &mut self,
        index: usize,
        cx: &mut ActionContext<'_>,
    ) -> Result<Option<ActionModule>, GroupError> {
        if index >= self.slots.len() {
            return Ok(None);
        }
        self.reject_template(cx)?;

        let mut slot = self.slots.remove(index);
        // Indices past `index` shifted, so the caches are rebuilt outright.
        self.recompute_caches();
        if let Some(module) = slot.as_mut() {
            self.on_module_removed(module, cx);
        }
        Ok(slot)
    }

    fn set_modules(
        &mut self,
        modules: Vec<Option<ActionModule>>,
        cx: &mut ActionContext<'_>,
    ) -> Result<(), GroupError> {
        if !cx.is_running() {
            self.slots = Self::accepted_slots(modules);
            self.recompute_caches();
            return Ok(());
        }
        self.reject_template(cx)?;

        let previous = std::mem::take(&mut self.slots);
        self.recompute_caches();
        for mut module in previous.into_iter().flatten() {
            self.on_module_removed(&mut module, cx);
        }

        for (position, slot) in modules.into_iter().enumerate() {
            let Some(module) = slot else {
                tracing::warn!(group = %self.id, position, "empty module slot skipped");
                continue;
            };
            if !Self::accepts(&module) {
                tracing::error!(
                    group = %self.id,
                    kind = K::NAME,
                    module = %module.name(),
                    "module rejected: missing required capability"
                );
                continue;
            }
            self.slots.push(Some(module));
            self.on_module_added(self.slots.len() - 1, cx);
        }
        self.recompute_caches();
        Ok(())
    }

    fn set_module_enabled(
        &mut self,
        index: usize,
        enabled: bool,
        cx: &mut ActionContext<'_>,
    ) -> bool {
        let Some(module) = self.module_at_mut(index) else {
            return false;
        };
        if !module.set_enabled(enabled, cx) {
            return false;
        }
        let key = module.key();

        self.handle_module_enable_change();
        tracing::debug!(%key, enabled, "module enabled changed");
        cx.publish(ActionEvent::ModuleEnabledChanged {
            key,
            enabled,
            enabled_in_group: self.enabled.len(),
        });
        true
    }

    fn handle_module_enable_change(&mut self) {
        self.recompute_caches();
    }

    fn switch_to_next_module(&mut self, looped: bool, cx: &mut ActionContext<'_>) -> bool {
        self.switch_module(true, looped, cx)
    }

    fn switch_to_previous_module(&mut self, looped: bool, cx: &mut ActionContext<'_>) -> bool {
        self.switch_module(false, looped, cx)
    }

    fn collect_modules<'g>(
        &'g self,
        filter: ModuleFilter,
        capabilities: Capabilities,
        out: &mut Vec<&'g ActionModule>,
    ) -> ModuleSpan {
        let start = out.len();
        out.extend(
            self.filtered(filter)
                .filter(|module| module.has_capability(capabilities)),
        );
        ModuleSpan::since(start, out)
    }

    fn visit_modules_mut(&mut self, visit: &mut dyn FnMut(&mut ActionModule)) {
        for module in self.slots.iter_mut().flatten() {
            visit(module);
        }
    }

    fn route_event(&mut self, id: ModuleId, event: &ActionEvent, cx: &mut ActionContext<'_>) {
        let Some(index) = self.index_of_id(id) else {
            return;
        };
        if !self.is_module_active(index) {
            return;
        }
        if let Some(module) = self.module_at_mut(index) {
            module.handle_event(event, cx);
        }
    }

    fn on_destroy(&mut self, cx: &mut ActionContext<'_>) {
        for module in self.slots.iter_mut().flatten() {
            module.destroy(cx);
        }
        tracing::debug!(group = %self.id, kind = K::NAME, "group destroyed");
        self.initialized = false;
        self.action = ActionId::UNASSIGNED;
    }
}

impl<K: GroupKind> fmt::Debug for ModuleGroup<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleGroup")
            .field("kind", &K::NAME)
            .field("id", &self.id)
            .field("initialized", &self.initialized)
            .field("slots", &self.slots)
            .field("enabled", &self.enabled)
            .field("disabled", &self.disabled)
            .finish()
    }
}
