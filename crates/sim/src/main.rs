//! Attribute simulator entry point.
//!
//! Loads attribute content, builds a character sheet and applies edits,
//! logging every attribute update through `tracing`.
//! Run with: `attrsim run hero --edit "set Vitality 20"`
mod config;
mod edit;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use attribute_content::{ContentFactory, FileRecordStore, RecordStore, SavedCharacter};
use attribute_core::{CharacterAttributes, TemplateRegistry};
use clap::Parser;

use crate::config::SimConfig;
use crate::edit::Edit;
use crate::report::OutputFormat;

/// Character attribute simulator
#[derive(Parser)]
#[command(name = "attrsim")]
#[command(about = "Build characters from attribute content and watch values propagate", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory (overrides ATTRSIM_DATA_DIR)
    #[arg(short, long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Propagation depth limit (overrides ATTRSIM_MAX_DEPTH and config.toml)
    #[arg(long, value_name = "DEPTH", global = true)]
    max_depth: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List attribute templates
    Templates,

    /// Print a freshly built character
    Show {
        /// Character file name under characters/ (without .ron)
        character: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Apply edits to a character and print the result
    Run {
        /// Character file name under characters/ (without .ron)
        character: String,

        /// Edit as `<op> <attribute> <amount>`; ops: set, add, modifier, current, drain
        #[arg(short, long = "edit", value_name = "EDIT")]
        edits: Vec<Edit>,

        /// Restore the saved state before editing
        #[arg(long)]
        resume: bool,

        /// Save the resulting state
        #[arg(long)]
        save: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SimConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = Some(depth.max(1));
    }

    let factory = ContentFactory::new(&config.data_dir);
    let registry = factory
        .load_templates()
        .with_context(|| format!("Failed to load templates from {}", config.data_dir.display()))?;
    let mut graph_config = factory.load_config()?;
    if let Some(depth) = config.max_depth {
        graph_config.max_propagation_depth = depth;
    }

    match cli.command {
        Command::Templates => {
            for template in registry.iter() {
                println!(
                    "{:>4}  {:<12} {:<8} [{}, {}]{}  formulas: {}",
                    template.id().0,
                    template.name(),
                    template.kind(),
                    template.min_value(),
                    template.max_value(),
                    if template.clamp_final_value() { " clamped" } else { "" },
                    template.formulas().len()
                );
            }
            Ok(())
        }
        Command::Show { character, format } => {
            let sheet = factory.build_character(&registry, &character, graph_config)?;
            print!("{}", report::render(&sheet, format)?);
            Ok(())
        }
        Command::Run {
            character,
            edits,
            resume,
            save,
            format,
        } => {
            let mut sheet = factory.build_character(&registry, &character, graph_config)?;
            let mut store = open_store(&config, resume || save)?;

            if resume && let Some(store) = &store {
                match store.load(&character)? {
                    Some(saved) => saved.restore(&mut sheet)?,
                    None => tracing::warn!(character = %character, "no saved state, starting fresh"),
                }
            }

            run_edits(&registry, &mut sheet, &edits)?;
            print!("{}", report::render(&sheet, format)?);

            if save && let Some(store) = &mut store {
                store.save(&SavedCharacter::capture(&character, &sheet))?;
                tracing::info!(character = %character, dir = %config.save_dir().display(), "saved character");
            }
            Ok(())
        }
    }
}

/// Opens the save directory only when a run reads or writes saved state.
fn open_store(config: &SimConfig, needed: bool) -> Result<Option<FileRecordStore>> {
    if !needed {
        return Ok(None);
    }
    Ok(Some(FileRecordStore::new(config.save_dir())?))
}

/// Logs every attribute update while `edits` are applied.
fn run_edits(
    registry: &TemplateRegistry,
    sheet: &mut CharacterAttributes,
    edits: &[Edit],
) -> Result<()> {
    let ids: Vec<_> = sheet.iter().map(|view| view.id()).collect();
    let mut handles = Vec::with_capacity(ids.len());
    for id in ids {
        let handle = sheet.graph_mut().subscribe(id, |update| {
            if !update.changed.is_empty() {
                tracing::info!(attribute = %update.node, changed = ?update.changed, "attribute updated");
            }
        })?;
        handles.push(handle);
    }

    let result = edits.iter().try_for_each(|edit| {
        tracing::info!(%edit, "applying edit");
        edit.apply(registry, sheet)
    });

    for handle in handles {
        if !sheet.graph_mut().unsubscribe(handle) {
            tracing::warn!(?handle, "listener already released");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use attribute_core::{GraphConfig, TemplateOracle};

    use super::*;

    #[test]
    fn cli_parses_repeated_edits() {
        let cli = Cli::parse_from([
            "attrsim",
            "--max-depth",
            "8",
            "run",
            "hero",
            "-e",
            "set Vitality 20",
            "--edit",
            "drain Health 10",
            "--save",
        ]);
        assert_eq!(cli.max_depth, Some(8));
        let Command::Run { edits, save, resume, .. } = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(edits.len(), 2);
        assert!(save);
        assert!(!resume);
    }

    #[test]
    fn edits_run_against_bundled_content() {
        let factory = ContentFactory::new(SimConfig::default().data_dir);
        let registry = factory.load_templates().unwrap();
        let mut sheet = factory
            .build_character(&registry, "hero", GraphConfig::default())
            .unwrap();
        let edits: Vec<Edit> = ["set Vitality 20", "drain Health 30"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();

        run_edits(&registry, &mut sheet, &edits).unwrap();

        let health = registry.resolve_name("Health").unwrap().id();
        let health = sheet.try_get_attribute(health).unwrap();
        assert_eq!(health.final_value(), 140);
        assert_eq!(health.current_value(), Some(70));
        assert!(sheet.iter().all(|view| sheet.graph().listener_count(view.id()) == 0));
    }

    #[test]
    fn save_dir_is_created_only_when_needed() {
        let temp = tempfile::tempdir().unwrap();
        let config = SimConfig {
            save_dir: Some(temp.path().join("saves")),
            ..SimConfig::default()
        };

        assert!(open_store(&config, false).unwrap().is_none());
        assert!(!temp.path().join("saves").exists());

        assert!(open_store(&config, true).unwrap().is_some());
        assert!(temp.path().join("saves").is_dir());
    }

    #[test]
    fn failed_edit_still_releases_listeners() {
        let factory = ContentFactory::new(SimConfig::default().data_dir);
        let registry = factory.load_templates().unwrap();
        let mut sheet = factory
            .build_character(&registry, "hero", GraphConfig::default())
            .unwrap();
        let edits: Vec<Edit> = ["set Vitality 20", "drain Vitality 5", "set Vitality 99"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();

        let err = run_edits(&registry, &mut sheet, &edits).unwrap_err();

        assert!(err.to_string().contains("drain Vitality 5"));
        assert!(sheet.iter().all(|view| sheet.graph().listener_count(view.id()) == 0));
        let vitality = registry.resolve_name("Vitality").unwrap().id();
        assert_eq!(sheet.try_get_attribute(vitality).unwrap().base_value(), 20);
    }
}
