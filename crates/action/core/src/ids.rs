//! Identifiers and non-owning back-references.
//!
//! Groups and modules refer to their owners by id only. Ownership runs
//! strictly top-down (action → group → module), so none of these handles
//! keep anything alive.

use core::fmt;

/// Identifier of a module, unique within its owning group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleId(pub i32);

impl ModuleId {
    /// Default id of a module nobody has numbered yet.
    pub const UNASSIGNED: Self = Self(-1);

    #[inline]
    pub const fn is_assigned(self) -> bool {
        self.0 >= 0
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Identifier of a module group, dense and assigned in registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(pub i32);

impl GroupId {
    pub const UNASSIGNED: Self = Self(-1);

    #[inline]
    pub const fn is_assigned(self) -> bool {
        self.0 >= 0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Identifier of an owning item action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionId(pub u32);

impl ActionId {
    /// Stands in for a missing owner. Binding anything to it is a
    /// configuration error.
    pub const UNASSIGNED: Self = Self(u32::MAX);

    #[inline]
    pub const fn is_assigned(self) -> bool {
        self.0 != Self::UNASSIGNED.0
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// Handle of the character that owns an item action.
///
/// Events are published and subscribed per character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityHandle(pub u32);

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Full address of a module: owning action, owning group, module id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleKey {
    pub action: ActionId,
    pub group: GroupId,
    pub module: ModuleId,
}

impl ModuleKey {
    pub const fn new(action: ActionId, group: GroupId, module: ModuleId) -> Self {
        Self {
            action,
            group,
            module,
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.action, self.group, self.module)
    }
}
