use bitflags::bitflags;

bitflags! {
    /// Capability tags a module behavior advertises.
    ///
    /// Groups validate membership against these tags and callers filter
    /// modules by tag instead of probing concrete types. A behavior that
    /// advertises a tag must also return `Some` from the matching accessor
    /// on [`ModuleBehavior`](crate::module::ModuleBehavior).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        const TRIGGER      = 1 << 0;
        const CLIP         = 1 << 1;
        const RELOAD       = 1 << 2;
        const SWITCHER     = 1 << 3;
        const SLOT_MONITOR = 1 << 4;
    }
}
