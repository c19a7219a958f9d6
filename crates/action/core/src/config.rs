/// Module-system configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionConfig {
    /// How many rounds of queued events are routed to module listeners per
    /// dispatch before the remainder is dropped.
    pub max_event_chain: u32,

    /// Whether `switch_next`/`switch_previous` wrap around when the caller
    /// does not say otherwise.
    pub default_switch_loop: bool,
}

impl ActionConfig {
    // ===== compile-time limits =====
    /// Soft limit on groups per item action; exceeding it only warns.
    pub const MAX_GROUPS: usize = 32;
    /// Soft limit on modules per group; exceeding it only warns.
    pub const MAX_MODULES_PER_GROUP: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_EVENT_CHAIN: u32 = 8;
    pub const DEFAULT_SWITCH_LOOP: bool = true;

    pub fn new() -> Self {
        Self {
            max_event_chain: Self::DEFAULT_MAX_EVENT_CHAIN,
            default_switch_loop: Self::DEFAULT_SWITCH_LOOP,
        }
    }

    pub fn with_max_event_chain(mut self, max_event_chain: u32) -> Self {
        self.max_event_chain = max_event_chain;
        self
    }

    pub fn with_default_switch_loop(mut self, looped: bool) -> Self {
        self.default_switch_loop = looped;
        self
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self::new()
    }
}
