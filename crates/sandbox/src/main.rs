//! Headless driver: loads a loadout, equips each item action and feeds it a
//! scripted input sequence while logging every published event.
mod config;
mod script;

use action_content::{ConfigLoader, ContentFactory, LoadoutLoader};
use action_core::{ActionConfig, EventTag, ItemAction, RunMode};
use anyhow::Result;
use strum::IntoEnumIterator;

use crate::config::SandboxConfig;
use crate::script::Script;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SandboxConfig::from_env();
    tracing::info!(?config, "sandbox starting");

    let action_config = match &config.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ActionConfig::default(),
    };
    let loadout = LoadoutLoader::load(&config.loadout)?;
    let script = match &config.script {
        Some(path) => Script::load(path)?,
        None => Script::hold_use(config.ticks),
    };

    let actions = ContentFactory::build_actions(&loadout, &action_config, RunMode::Running)?;
    for mut action in actions {
        drive(&mut action, &script)?;
    }

    Ok(())
}

fn drive(action: &mut ItemAction, script: &Script) -> Result<()> {
    let name = action.name().to_owned();
    let character = action.character();
    for tag in EventTag::iter() {
        let name = name.clone();
        action.events_mut().subscribe(character, tag, move |entity, event| {
            tracing::info!(action = %name, %entity, %tag, ?event, "event");
        });
    }

    action.initialize()?;
    tracing::info!(action = %name, capabilities = ?action.capabilities(), "initialized");

    let summary = script::run(action, script);
    tracing::info!(
        action = %name,
        ticks = summary.ticks,
        uses = summary.uses,
        dry_fires = summary.dry_fires,
        suppressed = summary.suppressed,
        reloads = summary.reloads,
        rejected = summary.rejected,
        "script finished"
    );

    action.shutdown()?;
    Ok(())
}
