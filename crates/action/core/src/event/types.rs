use crate::ids::{ActionId, ModuleKey};

/// Strongly-typed event tag; the routing key next to the character handle.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventTag {
    ModuleEnabledChanged,
    ModuleAdded,
    ModuleRemoved,
    Switched,
    UseInput,
    TriggerStarted,
    TriggerStopped,
    ItemUsed,
    DryFire,
    ClipEmptied,
    ReloadStarted,
    ReloadCompleted,
    Equipped,
    Unequipped,
}

/// Events published by item actions and their modules.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEvent {
    /// A module's enabled flag changed. `enabled_in_group` is the size of the
    /// group's enabled cache right after the recompute.
    ModuleEnabledChanged {
        key: ModuleKey,
        enabled: bool,
        enabled_in_group: usize,
    },
    ModuleAdded {
        key: ModuleKey,
    },
    ModuleRemoved {
        key: ModuleKey,
    },
    /// A switcher moved from one index to another.
    Switched {
        key: ModuleKey,
        from: usize,
        to: usize,
    },
    /// Use button pressed or released for an item action.
    UseInput {
        action: ActionId,
        pressed: bool,
    },
    TriggerStarted {
        key: ModuleKey,
    },
    TriggerStopped {
        key: ModuleKey,
    },
    /// One use of the item. `remaining` is the clip count afterwards, if the
    /// action has a clip.
    ItemUsed {
        key: ModuleKey,
        remaining: Option<u32>,
    },
    /// A shot was requested but the clip was empty.
    DryFire {
        key: ModuleKey,
    },
    ClipEmptied {
        key: ModuleKey,
    },
    ReloadStarted {
        key: ModuleKey,
    },
    ReloadCompleted {
        key: ModuleKey,
        amount: u32,
    },
    Equipped {
        action: ActionId,
    },
    Unequipped {
        action: ActionId,
    },
}

impl ActionEvent {
    pub const fn tag(&self) -> EventTag {
        match self {
            Self::ModuleEnabledChanged { .. } => EventTag::ModuleEnabledChanged,
            Self::ModuleAdded { .. } => EventTag::ModuleAdded,
            Self::ModuleRemoved { .. } => EventTag::ModuleRemoved,
            Self::Switched { .. } => EventTag::Switched,
            Self::UseInput { .. } => EventTag::UseInput,
            Self::TriggerStarted { .. } => EventTag::TriggerStarted,
            Self::TriggerStopped { .. } => EventTag::TriggerStopped,
            Self::ItemUsed { .. } => EventTag::ItemUsed,
            Self::DryFire { .. } => EventTag::DryFire,
            Self::ClipEmptied { .. } => EventTag::ClipEmptied,
            Self::ReloadStarted { .. } => EventTag::ReloadStarted,
            Self::ReloadCompleted { .. } => EventTag::ReloadCompleted,
            Self::Equipped { .. } => EventTag::Equipped,
            Self::Unequipped { .. } => EventTag::Unequipped,
        }
    }

    /// Owning item action of the event.
    pub const fn action(&self) -> ActionId {
        match self {
            Self::ModuleEnabledChanged { key, .. }
            | Self::ModuleAdded { key }
            | Self::ModuleRemoved { key }
            | Self::Switched { key, .. }
            | Self::TriggerStarted { key }
            | Self::TriggerStopped { key }
            | Self::ItemUsed { key, .. }
            | Self::DryFire { key }
            | Self::ClipEmptied { key }
            | Self::ReloadStarted { key }
            | Self::ReloadCompleted { key, .. } => key.action,
            Self::UseInput { action, .. }
            | Self::Equipped { action }
            | Self::Unequipped { action } => *action,
        }
    }
}
