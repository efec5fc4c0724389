//! Command dispatch over the wired service container

use std::io;
use std::sync::Arc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::debug;

use crate::application::events::{TreeEvent, TreeObserver};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{matches, TreeQuery};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::JsonFileStore;

/// Observer that surfaces engine events on the terminal.
struct ConsoleObserver;

impl TreeObserver for ConsoleObserver {
    fn on_event(&self, event: &TreeEvent) {
        match event {
            TreeEvent::BranchCollapsed(id) => output::detail(&format!("collapsed branch {id}")),
            TreeEvent::ForestRefreshed { node_count } => {
                debug!(node_count, "forest refreshed");
            }
            TreeEvent::StaleLoadDiscarded { token } => {
                output::warning(&format!("discarded stale load response (token {token})"));
            }
            TreeEvent::SelectionChanged(_) | TreeEvent::ReparentCommitted(_) => {}
        }
    }
}

/// Effective settings: config layers plus command-line overrides.
fn resolve_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load()?;
    if let Some(file) = &cli.file {
        settings.store_path = file.clone();
    }
    if let Some(domain) = &cli.domain {
        settings.domain = domain.clone();
    }
    if let Some(kind) = &cli.kind {
        settings.kind = kind.clone();
    }
    Ok(settings)
}

fn container(settings: Settings) -> ServiceContainer {
    let store = Arc::new(JsonFileStore::new(settings.store_path.clone()));
    ServiceContainer::with_deps(settings, store, Arc::new(ConsoleObserver))
}

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Tree => tree(cli).await,
        Commands::Filter { text, category } => filter(cli, text, category).await,
        Commands::Reparent { id, parent } => reparent(cli, id, parent.as_deref()).await,
        Commands::Config { command } => config(command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

async fn tree(cli: &Cli) -> CliResult<()> {
    let services = container(resolve_settings(cli)?);
    services.tree.load().await?;

    let forest = services.tree.forest();
    output::header(&format!(
        "{} classifications in {}",
        services.settings.kind, services.settings.domain
    ));
    output::print_forest(&forest, &services.settings);
    output::info(&format!(
        "{} nodes in {} trees",
        forest.node_count(),
        forest.roots().len()
    ));
    Ok(())
}

async fn filter(cli: &Cli, text: &str, category: &str) -> CliResult<()> {
    let services = container(resolve_settings(cli)?);
    services.tree.load().await?;

    let query = TreeQuery::new(text, category);
    let forest = services.tree.forest();
    let mut hits = 0usize;
    for node in forest.iter() {
        if matches(node, &query) {
            output::info(&output::node_label(node, &services.settings));
            hits += 1;
        }
    }
    output::info(&format!("{hits} of {} nodes match", forest.node_count()));
    Ok(())
}

async fn reparent(cli: &Cli, id: &str, parent: Option<&str>) -> CliResult<()> {
    let services = container(resolve_settings(cli)?);
    services.tree.load().await?;

    let record = services.tree.apply_reparent(id, parent).await?;
    match parent {
        Some(parent_id) => output::success(&format!("moved {} under {}", record.key, parent_id)),
        None => output::success(&format!("moved {} to root", record.key)),
    }
    output::print_forest(&services.tree.forest(), &services.settings);
    Ok(())
}

fn config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init => {
            let path = global_config_path().ok_or_else(|| ApplicationError::Config {
                message: "cannot determine config directory".to_string(),
            })?;
            if path.exists() {
                output::warning(&format!("config already exists: {}", path.display()));
                return Ok(());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ApplicationError::Config {
                    message: format!("create {}: {}", parent.display(), e),
                })?;
            }
            std::fs::write(&path, Settings::template()).map_err(|e| {
                ApplicationError::Config {
                    message: format!("write {}: {}", path.display(), e),
                }
            })?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning(&"no config directory available"),
            }
            Ok(())
        }
    }
}
