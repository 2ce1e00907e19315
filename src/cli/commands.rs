//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::services::{ExportService, RegionNavigator};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::GeonameId;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

const STDOUT_MARKER: &str = "-";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "regiontree", &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => execute_config(cli, command),
        remote => {
            let settings = load_settings(cli)?;
            let container = ServiceContainer::new(settings)?;
            execute_remote(&container, remote)
        }
    }
}

fn execute_remote(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    let settings = &container.settings;
    match command {
        Commands::Report { out } => {
            let navigator = container.navigator()?;
            let target = out
                .clone()
                .unwrap_or_else(|| settings.output_dir.join("worldtree.txt"));
            cmd_report(&container.export_service(), &navigator, &target)
        }
        Commands::Dot { out } => {
            let navigator = container.navigator()?;
            let target = out
                .clone()
                .unwrap_or_else(|| settings.output_dir.join("worldtree.dot"));
            cmd_dot(&container.export_service(), &navigator, &target)
        }
        Commands::Continents { dir } => {
            let navigator = container.navigator()?;
            let dir = dir.clone().unwrap_or_else(|| settings.output_dir.clone());
            let written = container
                .export_service()
                .continent_dots_to_dir(navigator.tree(), &dir)?;
            for path in written {
                output::wrote(&path);
            }
            Ok(())
        }
        Commands::Tree => {
            let navigator = container.navigator()?;
            output::plain(&container.export_service().to_termtree(navigator.tree()));
            Ok(())
        }
        Commands::Find { id } => cmd_find(&container.navigator()?, *id),
        Commands::Countries => {
            let navigator = container.navigator()?;
            let countries = navigator.countries();
            output::heading(&format!("{} countries", countries.len()));
            for country in countries {
                output::region(country);
            }
            Ok(())
        }
        Commands::Children { id } => {
            let children = container.resolver().fetch_children(*id)?;
            if children.is_empty() {
                output::warning(&format!("no children for {id}"));
            }
            for child in &children {
                output::region(child);
            }
            Ok(())
        }
        Commands::Get { id } => {
            let detail = container.resolver().fetch_detail(*id)?;
            output::plain(&detail);
            Ok(())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

/// Layered settings plus command line overrides.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(username) = &cli.username {
        settings.username = username.clone();
    }
    if let Some(throttle) = cli.throttle {
        if !throttle.is_finite() || throttle < 0.0 {
            return Err(CliError::InvalidArgs(format!(
                "--throttle must be a non-negative number of seconds, got {throttle}"
            )));
        }
        settings.throttle_secs = throttle;
    }
    settings.throttle()?;
    if settings.username == "demo" {
        output::warning("using the shared 'demo' GeoNames account, expect rate limiting");
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn is_stdout(target: &Path) -> bool {
    target.as_os_str() == STDOUT_MARKER
}

#[instrument(skip(exporter, navigator))]
fn cmd_report(
    exporter: &ExportService,
    navigator: &RegionNavigator,
    target: &Path,
) -> CliResult<()> {
    let summary = if is_stdout(target) {
        let mut stdout = io::stdout().lock();
        exporter
            .write_report(navigator.tree(), &mut stdout)
            .map_err(|e| InfraError::io("write report to stdout", e))?
    } else {
        let summary = exporter.report_to_file(navigator.tree(), target)?;
        output::wrote(target);
        summary
    };
    debug!(?summary, "report written");
    Ok(())
}

#[instrument(skip(exporter, navigator))]
fn cmd_dot(
    exporter: &ExportService,
    navigator: &RegionNavigator,
    target: &Path,
) -> CliResult<()> {
    if is_stdout(target) {
        let mut stdout = io::stdout().lock();
        exporter
            .write_dot(navigator.tree(), &mut stdout)
            .and_then(|_| stdout.flush())
            .map_err(|e| InfraError::io("write graph to stdout", e))?;
    } else {
        exporter.dot_to_file(navigator.tree(), target)?;
        output::wrote(target);
    }
    Ok(())
}

fn cmd_find(navigator: &RegionNavigator, id: GeonameId) -> CliResult<()> {
    let tree = navigator.tree();
    let node = navigator.find_by_id(id)?;
    let path = tree
        .path_to(node.index)
        .iter()
        .map(|n| n.region.to_string())
        .collect::<Vec<_>>()
        .join(" > ");

    output::heading(&node.region);
    output::field("level", &node.level());
    output::field("toponym", &node.region.toponym_name);
    output::field("location", &node.region.coordinate);
    output::field("path", &path);
    output::field("children", &node.children.len());
    Ok(())
}

fn execute_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::plain(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::plain(&Settings::template()),
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(no config directory)".to_string());
            let local: PathBuf = cli.config.clone().unwrap_or_else(local_config_path);
            output::field("global", &global);
            let state = if local.exists() { "" } else { " (absent)" };
            output::field("local", &format!("{}{state}", local.display()));
        }
    }
    Ok(())
}
