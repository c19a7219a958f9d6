//! Module groups for item actions.
//!
//! `action-core` lets an item capability (a weapon's trigger, clip, reload,
//! fire-mode switch) be composed from interchangeable modules. Modules live
//! in typed, ordered [`ModuleGroup`]s that keep enabled/disabled caches in
//! sync; groups live in an [`ItemAction`] that owns lifecycle, event routing
//! and the per-tick usage loop. Everything is single-threaded and driven by
//! the host loop.
pub mod action;
pub mod capability;
pub mod config;
pub mod error;
pub mod event;
pub mod group;
pub mod ids;
pub mod module;
pub use action::{
    ActionContext, ActionError, ActionObserver, ActionPhase, ItemAction, NoopObserver, RunMode,
    StateFlags, TickReport,
};
pub use capability::Capabilities;
pub use config::ActionConfig;
pub use error::{ErrorSeverity, ModuleError};
pub use event::{ActionEvent, EventRegistry, EventTag, SubscriptionId};
pub use group::{
    AnyModules, Clips, GroupError, GroupKind, ModuleFilter, ModuleGroup, ModuleGroupBase,
    ModuleSpan, Reloads, Switchers, Triggers,
};
pub use ids::{ActionId, EntityHandle, GroupId, ModuleId, ModuleKey};
pub use module::{
    ActionModule, AsAny, BurstTrigger, ChargedTrigger, ClipModule, ModuleBehavior, ModuleContext,
    ModuleSwitcher, ReloadModule, ReloadProgress, RepeatTrigger, SimpleClip, SingleTrigger,
    StateSwitcher, SwitchChange, SwitchIndex, TimedReload, TriggerModule,
};
