//! dental-form - dental data page editor
//!
//! A CLI tool for assembling dental data page descriptions through a
//! sequence of field edits and exporting them as JSON files.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![allow(clippy::module_name_repetitions)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use dental_form::command::{self, Outcome};
use dental_form::editor_config::{EditorConfig, DEFAULT_CONFIG_FILE};
use dental_form::exporter;
use dental_form::location::{FieldPath, RepeatedGroup, Toggle};
use dental_form::output;
use dental_form::DocumentModel;
use itertools::Itertools;
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Main entry point for the dental-form CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Init {
            path,
            output_dir,
            force,
        } => {
            handle_init_command(path, output_dir, force)?;
        }

        Commands::Edit {
            open,
            output,
            force,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut target = OutputTarget::new(&config, output, force);
            handle_edit_command(open.as_deref(), &mut target)?;
        }

        Commands::Apply {
            script,
            open,
            output,
            force,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut target = OutputTarget::new(&config, output, force);
            handle_apply_command(&script, open.as_deref(), &mut target)?;
        }

        Commands::Validate { file } => {
            handle_validate_command(&file)?;
        }

        Commands::Fields => {
            handle_fields_command();
        }
    }

    Ok(())
}

/// Initialize logging; `RUST_LOG` still takes precedence for filtering
fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<EditorConfig> {
    EditorConfig::resolve(explicit).with_context(|| match explicit {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => format!("Failed to load {}", DEFAULT_CONFIG_FILE),
    })
}

/// Where exports go, after merging configuration and flags
///
/// Files written earlier in the same run may always be replaced.
struct OutputTarget {
    dir: PathBuf,
    overwrite: bool,
    written: HashSet<PathBuf>,
}

impl OutputTarget {
    fn new(config: &EditorConfig, output: Option<PathBuf>, force: bool) -> Self {
        Self {
            dir: output.unwrap_or_else(|| config.output_dir.clone()),
            overwrite: force || config.overwrite,
            written: HashSet::new(),
        }
    }

    fn save(&mut self, export: &dental_form::Export) -> Result<PathBuf> {
        let overwrite = self.overwrite || self.written.contains(&self.dir.join(&export.file_name));
        let path = output::save_export(export, &self.dir, overwrite)?;
        self.written.insert(path.clone());
        Ok(path)
    }
}

/// Handle the init command
fn handle_init_command(path: PathBuf, output_dir: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            config_path.display()
        );
    }

    if !path.exists() {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }

    let mut config = EditorConfig::default();
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    config
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("✓ Wrote {}", config_path.display());
    println!("  Exports go to: {}", config.output_dir.display());
    Ok(())
}

/// Handle the edit command
fn handle_edit_command(open: Option<&Path>, target: &mut OutputTarget) -> Result<()> {
    let mut model = open_model(open)?;

    println!("Editing dental data. Type 'help' for commands, 'quit' to finish.");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?
            == 0
        {
            println!();
            break;
        }

        let parsed = match command::parse_line(&line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };

        match command::apply(&mut model, parsed) {
            Ok(Outcome::Quit) => break,
            Ok(outcome) => {
                if let Err(e) = report_outcome(outcome, target) {
                    println!("Error: {:#}", e);
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    Ok(())
}

/// Handle the apply command
fn handle_apply_command(
    script: &Path,
    open: Option<&Path>,
    target: &mut OutputTarget,
) -> Result<()> {
    let content = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let mut model = open_model(open)?;

    println!("Applying {}...", script.display());

    let mut pending_changes = true;
    let mut applied = 0;

    for (number, line) in content.lines().enumerate() {
        let location = || format!("{}:{}", script.display(), number + 1);

        let Some(parsed) = command::parse_line(line).with_context(location)? else {
            continue;
        };

        let outcome = command::apply(&mut model, parsed).with_context(location)?;
        applied += 1;

        match outcome {
            Outcome::Quit => break,
            Outcome::Updated => pending_changes = true,
            other => {
                if matches!(other, Outcome::Exported(_)) {
                    pending_changes = false;
                }
                report_outcome(other, target).with_context(location)?;
            }
        }
    }

    println!("✓ Applied {} commands", applied);

    if pending_changes {
        let export = model.export().context("Failed to export document")?;
        report_outcome(Outcome::Exported(export), target)?;
    }

    Ok(())
}

/// Handle the validate command
fn handle_validate_command(file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot = exporter::parse(&content)
        .with_context(|| format!("{} is not a dental data document", file.display()))?;

    let reserialized = exporter::serialize(&snapshot)?;
    let reparsed = exporter::parse(&reserialized)?;
    if reparsed != snapshot {
        anyhow::bail!("{} does not survive a serialize/parse round trip", file.display());
    }

    let document = snapshot.document();
    println!("✓ {} is a valid dental data document", file.display());
    println!("  - {} call to actions", document.call_to_actions.len());
    println!(
        "  - {} sections: {}",
        document.sections.len(),
        document
            .sections
            .iter()
            .map(|s| format!(
                "\"{}\" ({} bullet points)",
                format!("{} {}", s.heading_light, s.heading_bold).trim(),
                s.description.bullet_points.len()
            ))
            .join(", ")
    );
    println!(
        "  - {} link cards ({})",
        document.link_cards.len(),
        if document.is_link_cards { "shown" } else { "hidden" }
    );
    println!(
        "  - {} link blocks ({})",
        document.link_blocks.len(),
        if document.is_link_blocks { "shown" } else { "hidden" }
    );
    if reserialized.trim_end() != content.trim_end() {
        println!("  Note: formatting differs from a fresh export");
    }

    Ok(())
}

/// Handle the fields command
fn handle_fields_command() {
    println!("Editable locations (replace i with a row index):\n");
    for path in FieldPath::templates() {
        println!("  {}", path.to_string().replace("[0]", "[i]"));
    }
    println!();
    println!("Toggles: {}", Toggle::ALL.iter().join(", "));
    println!("Groups:  {}", RepeatedGroup::ALL.iter().join(", "));
    println!("\nBullet points are set per section with: bullets <section> <text>");
}

/// Start from a fresh model or reopen an export
fn open_model(open: Option<&Path>) -> Result<DocumentModel> {
    let Some(path) = open else {
        return Ok(DocumentModel::new());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot = exporter::parse(&content)
        .with_context(|| format!("{} is not a dental data document", path.display()))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    println!("Opened {}", path.display());
    Ok(DocumentModel::from_snapshot(snapshot, name))
}

/// Print or save the result of a command
fn report_outcome(outcome: Outcome, target: &mut OutputTarget) -> Result<()> {
    match outcome {
        Outcome::Updated | Outcome::Quit => {}
        Outcome::Unchanged(reason) => println!("Unchanged: {}", reason),
        Outcome::Exported(export) => {
            let path = target.save(&export)?;
            println!("✓ Exported {}", path.display());
        }
        Outcome::Show(json) => println!("{}", json),
        Outcome::Help => println!("{}", command::HELP),
    }
    Ok(())
}
