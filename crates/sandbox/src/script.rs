//! Scripted input for driving item actions outside a game loop.

use std::path::Path;

use action_core::{ActionError, GroupId, ItemAction, error::report};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One scripted host input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Equip,
    Unequip,
    StartUse,
    StopUse,
    /// Advance the usage loop this many ticks.
    Tick(u32),
    Reload,
    SwitchNext { group: i32 },
    SwitchPrevious { group: i32 },
    /// Move a switcher group to `index`.
    Select { group: i32, index: usize },
    Enable { group: i32, slot: usize, enabled: bool },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Equip, hold use for `ticks`, release, unequip.
    pub fn hold_use(ticks: u32) -> Self {
        Self::new(vec![
            Step::Equip,
            Step::StartUse,
            Step::Tick(ticks),
            Step::StopUse,
            Step::Unequip,
        ])
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let steps: Vec<Step> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse script RON: {}", e))?;
        Ok(Self::new(steps))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Totals over one script run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u32,
    pub uses: u32,
    pub dry_fires: u32,
    pub suppressed: u32,
    pub reloads: u32,
    /// Steps the action refused.
    pub rejected: u32,
}

/// Runs every step against `action`. Refused steps are logged and counted,
/// the run continues.
pub fn run(action: &mut ItemAction, script: &Script) -> RunSummary {
    let mut summary = RunSummary::default();
    for step in script.steps() {
        tracing::debug!(action = %action.id(), ?step, "step");
        if let Err(err) = apply(action, step, &mut summary) {
            report(&err);
            summary.rejected += 1;
        }
    }
    summary
}

fn apply(action: &mut ItemAction, step: &Step, summary: &mut RunSummary) -> Result<(), ActionError> {
    match *step {
        Step::Equip => {
            action.will_equip()?;
            action.equip()
        }
        Step::Unequip => {
            action.start_unequip()?;
            action.unequip()
        }
        Step::StartUse => action.start_use(),
        Step::StopUse => action.stop_use(),
        Step::Tick(ticks) => {
            for _ in 0..ticks {
                let tick = action.tick()?;
                summary.ticks += 1;
                summary.uses += tick.uses;
                summary.dry_fires += tick.dry_fires;
                summary.suppressed += tick.suppressed;
                summary.reloads += u32::from(tick.reloaded.is_some());
            }
            Ok(())
        }
        Step::Reload => action.reload().map(|_| ()),
        Step::SwitchNext { group } => action.switch_next(GroupId(group)).map(|_| ()),
        Step::SwitchPrevious { group } => action.switch_previous(GroupId(group)).map(|_| ()),
        Step::Select { group, index } => action.switch_to(GroupId(group), index).map(|_| ()),
        Step::Enable {
            group,
            slot,
            enabled,
        } => action
            .set_module_enabled(GroupId(group), slot, enabled)
            .map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use action_content::{ContentFactory, LoadoutLoader};
    use action_core::{ActionConfig, ActionPhase, RunMode};

    use super::*;

    const LOADOUT: &str = include_str!("../../action/content/data/loadouts/rifle.ron");
    const SCRIPT: &str = include_str!("../data/script.ron");

    fn rifle() -> ItemAction {
        let loadout = LoadoutLoader::parse(LOADOUT).unwrap();
        let mut actions =
            ContentFactory::build_actions(&loadout, &ActionConfig::default(), RunMode::Running)
                .unwrap();
        let mut rifle = actions.remove(0);
        rifle.initialize().unwrap();
        rifle
    }

    #[test]
    fn bundled_script_parses() {
        let script = Script::parse(SCRIPT).unwrap();
        assert_eq!(script.steps().first(), Some(&Step::Equip));
        assert!(script.steps().contains(&Step::Select { group: 3, index: 1 }));
    }

    #[test]
    fn hold_use_fires_and_reloads() {
        let mut rifle = rifle();

        let summary = run(&mut rifle, &Script::hold_use(16));

        // Six rounds, auto reload over three ticks, then one more shot.
        assert_eq!(summary.ticks, 16);
        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.uses, 7);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(summary.reloads, 1);
        assert_eq!(summary.dry_fires, 0);
        assert_eq!(rifle.phase(), ActionPhase::Initialized);
    }

    #[test]
    fn bundled_script_runs_without_rejections() {
        let mut rifle = rifle();
        let script = Script::parse(SCRIPT).unwrap();

        let summary = run(&mut rifle, &script);

        assert_eq!(summary.rejected, 0);
        assert_eq!(summary.ticks, 16);
        assert!(summary.uses > 0);
    }

    #[test]
    fn steps_out_of_phase_are_counted() {
        let mut rifle = rifle();
        let script = Script::new(vec![Step::StartUse, Step::Tick(1), Step::Equip]);

        let summary = run(&mut rifle, &script);

        assert_eq!(summary.rejected, 2);
        assert_eq!(rifle.phase(), ActionPhase::Active);
    }
}
