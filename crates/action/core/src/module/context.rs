use crate::action::ActionContext;
use crate::event::{ActionEvent, EventTag};
use crate::ids::{EntityHandle, ModuleKey};

/// Context handed to [`ModuleBehavior`](super::ModuleBehavior) hooks.
///
/// Carries the calling module's own address next to the owning action's
/// context, so a behavior can publish events and toggle state flags without
/// holding references to its owners.
pub struct ModuleContext<'c, 'a> {
    key: ModuleKey,
    cx: &'c mut ActionContext<'a>,
}

impl<'c, 'a> ModuleContext<'c, 'a> {
    pub fn new(key: ModuleKey, cx: &'c mut ActionContext<'a>) -> Self {
        Self { key, cx }
    }

    pub fn key(&self) -> ModuleKey {
        self.key
    }

    pub fn character(&self) -> EntityHandle {
        self.cx.character
    }

    pub fn is_running(&self) -> bool {
        self.cx.is_running()
    }

    pub fn is_equipped(&self) -> bool {
        self.cx.equipped
    }

    pub fn action_context(&mut self) -> &mut ActionContext<'a> {
        self.cx
    }

    pub fn publish(&mut self, event: ActionEvent) {
        self.cx.publish(event);
    }

    /// Registers this module for an extra tag outside `listened_events`.
    pub fn listen(&mut self, tag: EventTag) {
        let character = self.cx.character;
        self.cx.events.listen(character, tag, self.key);
    }

    pub fn forget(&mut self, tag: EventTag) {
        let character = self.cx.character;
        self.cx.events.forget(character, tag, self.key);
    }

    pub fn set_state(&mut self, name: &str, active: bool) {
        self.cx.states.set(name, active);
    }

    pub fn is_state_active(&self, name: &str) -> bool {
        self.cx.states.is_active(name)
    }
}
