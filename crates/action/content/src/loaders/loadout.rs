//! Loadout loader: item actions, their groups and modules from RON.
//!
//! A loadout lists the item actions of one character. Each group is a list
//! of optional module entries; `None` marks a module that failed to load in
//! the authoring tool and is kept as an empty slot.

use std::path::Path;

use action_core::{
    ActionConfig, ActionId, ActionModule, AnyModules, BurstTrigger, ChargedTrigger, Clips,
    EntityHandle, GroupId, ItemAction, ModuleBehavior, ModuleGroup, ModuleGroupBase, ModuleId,
    Reloads, RepeatTrigger, RunMode, SimpleClip, SingleTrigger, StateSwitcher, Switchers,
    TimedReload, Triggers,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Root of a loadout RON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadoutSpec {
    /// Handle of the owning character.
    pub character: u32,
    pub actions: Vec<ActionSpec>,
}

/// One item action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSpec {
    pub id: u32,
    pub name: String,
    /// Asset template: module edits are refused at runtime.
    #[serde(default)]
    pub template: bool,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

/// Capability contract of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKindSpec {
    Triggers,
    Clips,
    Reloads,
    Switchers,
    Any,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    pub kind: GroupKindSpec,
    /// Explicit group id; assigned at registration when absent.
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub modules: Vec<Option<ModuleSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub id: Option<i32>,
    pub kind: ModuleKindSpec,
}

fn enabled_by_default() -> bool {
    true
}

/// Concrete behavior of a module with its tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKindSpec {
    Single {
        cooldown: u32,
    },
    Repeat {
        interval: u32,
    },
    Burst {
        shots: u32,
        interval: u32,
    },
    Charged {
        min_charge: u32,
        max_charge: u32,
    },
    Clip {
        capacity: u32,
        #[serde(default)]
        remaining: Option<u32>,
    },
    Reload {
        duration: u32,
        #[serde(default)]
        auto_reload: bool,
    },
    StateSwitcher {
        states: Vec<String>,
        #[serde(default)]
        looped: bool,
        #[serde(default)]
        index: usize,
    },
}

impl ModuleKindSpec {
    fn behavior(&self) -> Box<dyn ModuleBehavior> {
        match self {
            Self::Single { cooldown } => Box::new(SingleTrigger::new(*cooldown)),
            Self::Repeat { interval } => Box::new(RepeatTrigger::new(*interval)),
            Self::Burst { shots, interval } => Box::new(BurstTrigger::new(*shots, *interval)),
            Self::Charged {
                min_charge,
                max_charge,
            } => Box::new(ChargedTrigger::new(*min_charge, *max_charge)),
            Self::Clip {
                capacity,
                remaining,
            } => {
                let clip = SimpleClip::new(*capacity);
                Box::new(match remaining {
                    Some(remaining) => clip.with_remaining(*remaining),
                    None => clip,
                })
            }
            Self::Reload {
                duration,
                auto_reload,
            } => Box::new(TimedReload::new(*duration).with_auto_reload(*auto_reload)),
            Self::StateSwitcher {
                states,
                looped,
                index,
            } => Box::new(
                StateSwitcher::new(states.iter().cloned())
                    .with_loop(*looped)
                    .with_index(*index),
            ),
        }
    }
}

impl ModuleSpec {
    /// Restores the authored module. The enabled flag is applied without
    /// notifications: nothing is listening yet.
    pub fn build(&self) -> ActionModule {
        let mut module = ActionModule::boxed(self.name.clone(), self.kind.behavior());
        module.set_enabled_without_notify(self.enabled);
        match self.id {
            Some(id) => module.with_id(ModuleId(id)),
            None => module,
        }
    }
}

impl GroupSpec {
    pub fn build(&self) -> Box<dyn ModuleGroupBase> {
        let slots: Vec<Option<ActionModule>> = self
            .modules
            .iter()
            .map(|slot| slot.as_ref().map(ModuleSpec::build))
            .collect();
        let id = self.id.map_or(GroupId::UNASSIGNED, GroupId);

        match self.kind {
            GroupKindSpec::Triggers => {
                Box::new(ModuleGroup::<Triggers>::from_slots(slots).with_id(id))
            }
            GroupKindSpec::Clips => Box::new(ModuleGroup::<Clips>::from_slots(slots).with_id(id)),
            GroupKindSpec::Reloads => {
                Box::new(ModuleGroup::<Reloads>::from_slots(slots).with_id(id))
            }
            GroupKindSpec::Switchers => {
                Box::new(ModuleGroup::<Switchers>::from_slots(slots).with_id(id))
            }
            GroupKindSpec::Any => Box::new(ModuleGroup::<AnyModules>::from_slots(slots).with_id(id)),
        }
    }
}

impl ActionSpec {
    /// Builds the item action and registers its groups, uninitialized.
    pub fn build(
        &self,
        character: EntityHandle,
        config: &ActionConfig,
        mode: RunMode,
    ) -> LoadResult<ItemAction> {
        let mut action = ItemAction::new(ActionId(self.id), character, self.name.clone())
            .with_template(self.template)
            .with_config(config.clone())
            .with_mode(mode);

        for group in &self.groups {
            action
                .add_group_boxed(group.build())
                .map_err(|e| anyhow::anyhow!("Failed to register group of '{}': {}", self.name, e))?;
        }

        Ok(action)
    }
}

/// Loader for loadouts from RON files.
pub struct LoadoutLoader;

impl LoadoutLoader {
    /// Load a loadout from a RON file.
    pub fn load(path: &Path) -> LoadResult<LoadoutSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<LoadoutSpec> {
        let loadout: LoadoutSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse loadout RON: {}", e))?;

        let empty_slots: usize = loadout
            .actions
            .iter()
            .flat_map(|action| &action.groups)
            .map(|group| group.modules.iter().filter(|slot| slot.is_none()).count())
            .sum();
        if empty_slots > 0 {
            tracing::warn!(empty_slots, "loadout contains empty module slots");
        }

        Ok(loadout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../data/loadouts/rifle.ron");

    #[test]
    fn sample_loadout_parses() {
        let loadout = LoadoutLoader::parse(SAMPLE).unwrap();
        assert_eq!(loadout.character, 1);
        assert_eq!(loadout.actions.len(), 1);

        let rifle = &loadout.actions[0];
        assert_eq!(rifle.name, "rifle");
        assert_eq!(rifle.groups[0].kind, GroupKindSpec::Triggers);
        assert!(rifle.groups[0].modules.iter().any(Option::is_none));
    }

    #[test]
    fn module_enabled_defaults_to_true() {
        let spec: ModuleSpec =
            ron::from_str(r#"(name: "semi", kind: Single(cooldown: 1))"#).unwrap();
        assert!(spec.enabled);
        assert_eq!(spec.id, None);

        let module = spec.build();
        assert!(module.is_enabled());
        assert!(!module.is_initialized());
        assert_eq!(module.id(), ModuleId::UNASSIGNED);
    }

    #[test]
    fn build_restores_flags_and_empty_slots() {
        let spec = GroupSpec {
            kind: GroupKindSpec::Triggers,
            id: Some(4),
            modules: vec![
                Some(ModuleSpec {
                    name: "auto".into(),
                    enabled: false,
                    id: Some(2),
                    kind: ModuleKindSpec::Repeat { interval: 3 },
                }),
                None,
            ],
        };

        let group = spec.build();
        assert_eq!(group.id(), GroupId(4));
        assert_eq!(group.len(), 2);
        assert!(group.module_at(1).is_none());

        let auto = group.module_at(0).unwrap();
        assert!(!auto.is_enabled());
        assert_eq!(auto.id(), ModuleId(2));
        assert_eq!(group.disabled_indices(), &[0]);
    }

    #[test]
    fn mismatched_modules_become_empty_slots() {
        let spec = GroupSpec {
            kind: GroupKindSpec::Clips,
            id: None,
            modules: vec![Some(ModuleSpec {
                name: "semi".into(),
                enabled: true,
                id: None,
                kind: ModuleKindSpec::Single { cooldown: 0 },
            })],
        };

        let group = spec.build();
        assert_eq!(group.len(), 1);
        assert_eq!(group.module_count(), 0);
    }

    #[test]
    fn malformed_loadout_is_an_error() {
        let err = LoadoutLoader::parse("(character: 1, actions: [(id: 1)])").unwrap_err();
        assert!(err.to_string().contains("Failed to parse loadout RON"));
    }
}
