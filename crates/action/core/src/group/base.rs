//! Type-erased module group contract.

use super::{GroupError, ModuleFilter, ModuleSpan};
use crate::action::ActionContext;
use crate::capability::Capabilities;
use crate::event::ActionEvent;
use crate::ids::{ActionId, GroupId, ModuleId};
use crate::module::{ActionModule, AsAny};

/// What the owning action needs from a group without knowing its kind.
///
/// Implemented by every [`ModuleGroup<K>`](super::ModuleGroup); the owning
/// action stores groups as `Box<dyn ModuleGroupBase>` and downcasts through
/// [`AsAny`] when a typed view is needed.
pub trait ModuleGroupBase: AsAny {
    fn id(&self) -> GroupId;

    /// Records the id handed out by the owning action at registration.
    fn set_id(&mut self, id: GroupId);

    /// Name of the group kind, for logs and errors.
    fn kind_name(&self) -> &'static str;

    fn required_capabilities(&self) -> Capabilities;

    fn action(&self) -> ActionId;

    fn is_initialized(&self) -> bool;

    /// Length of the main sequence, empty slots included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of present (non-empty) modules.
    fn module_count(&self) -> usize;

    /// Binds the group to `cx.action` and initializes every present module.
    ///
    /// Repeated calls are ignored.
    fn initialize(&mut self, cx: &mut ActionContext<'_>) -> Result<(), GroupError>;

    fn module_at(&self, index: usize) -> Option<&ActionModule>;

    fn module_at_mut(&mut self, index: usize) -> Option<&mut ActionModule>;

    fn module_by_id(&self, id: ModuleId) -> Option<&ActionModule>;

    fn index_of_id(&self, id: ModuleId) -> Option<usize>;

    /// Indices of enabled modules, in main-sequence order.
    fn enabled_indices(&self) -> &[usize];

    /// Indices of disabled modules, in main-sequence order.
    fn disabled_indices(&self) -> &[usize];

    fn first_enabled_module(&self) -> Option<&ActionModule> {
        self.enabled_indices()
            .first()
            .and_then(|&index| self.module_at(index))
    }

    fn first_disabled_module(&self) -> Option<&ActionModule> {
        self.disabled_indices()
            .first()
            .and_then(|&index| self.module_at(index))
    }

    fn first_enabled_module_mut(&mut self) -> Option<&mut ActionModule> {
        let index = *self.enabled_indices().first()?;
        self.module_at_mut(index)
    }

    /// Enabled, and heading the enabled list if the module requires that.
    fn is_module_active(&self, index: usize) -> bool;

    /// Appends a module and runs the "module added" path.
    ///
    /// Returns the index of the new slot.
    fn add_module(
        &mut self,
        module: ActionModule,
        cx: &mut ActionContext<'_>,
    ) -> Result<usize, GroupError>;

    /// Removes the module with `id`. An absent id is a no-op returning `None`.
    fn remove_module(
        &mut self,
        id: ModuleId,
        cx: &mut ActionContext<'_>,
    ) -> Result<Option<ActionModule>, GroupError>;

    fn remove_module_at(
        &mut self,
        index: usize,
        cx: &mut ActionContext<'_>,
    ) -> Result<Option<ActionModule>, GroupError>;

    /// Replaces every module.
    ///
    /// Live groups run the full remove and add paths per module; while
    /// authoring the backing sequence is swapped directly.
    fn set_modules(
        &mut self,
        modules: Vec<Option<ActionModule>>,
        cx: &mut ActionContext<'_>,
    ) -> Result<(), GroupError>;

    /// Enables or disables the module at `index`. Returns true on change.
    fn set_module_enabled(
        &mut self,
        index: usize,
        enabled: bool,
        cx: &mut ActionContext<'_>,
    ) -> bool;

    /// Recomputes both caches from the main sequence.
    fn handle_module_enable_change(&mut self);

    /// Moves the enabled module one step forward, stepping over empty
    /// slots. Returns true on change.
    fn switch_to_next_module(&mut self, looped: bool, cx: &mut ActionContext<'_>) -> bool;

    /// Moves the enabled module one step back, stepping over empty slots.
    /// Returns true on change.
    fn switch_to_previous_module(&mut self, looped: bool, cx: &mut ActionContext<'_>) -> bool;

    /// Appends modules matching `filter` and `capabilities` to `out`.
    fn collect_modules<'g>(
        &'g self,
        filter: ModuleFilter,
        capabilities: Capabilities,
        out: &mut Vec<&'g ActionModule>,
    ) -> ModuleSpan;

    fn visit_modules_mut(&mut self, visit: &mut dyn FnMut(&mut ActionModule));

    /// Hands a routed event to module `id` if it is active.
    fn route_event(&mut self, id: ModuleId, event: &ActionEvent, cx: &mut ActionContext<'_>);

    /// Releases listeners and destroys every module.
    fn on_destroy(&mut self, cx: &mut ActionContext<'_>);
}
