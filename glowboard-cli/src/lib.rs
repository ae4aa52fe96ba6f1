//! # Glowboard CLI
//!
//! Command-line tools for Glowboard layout documents.
//!
//! ## Usage
//!
//! ```bash
//! # Move overlapping elements apart and save the result
//! glowboard validate layout.json --output fixed.json
//!
//! # List colliding pairs (exit code 2 when any exist)
//! glowboard check layout.json
//!
//! # Replay editor commands against a layout
//! glowboard apply layout.json commands.json --output edited.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved configuration: command, panel overrides, history limit
//! - `run` - Executes a command, writing its report to any `io::Write`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glowboard_core::{
    find_collisions, validate_and_correct_positions, EditorCommand, EditorState, Element,
    LayoutDocument, Panel, DEFAULT_HISTORY_LIMIT,
};

/// Command-line arguments for glowboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "glowboard")]
#[command(about = "Collision-aware layout tools for Glowboard panels")]
#[command(version)]
pub struct CliArgs {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Panel width override in pixels
    #[arg(long, global = true, env = "GLOWBOARD_PANEL_WIDTH")]
    pub panel_width: Option<f32>,

    /// Panel height override in pixels
    #[arg(long, global = true, env = "GLOWBOARD_PANEL_HEIGHT")]
    pub panel_height: Option<f32>,

    /// Undo steps kept while replaying commands
    #[arg(long, global = true, env = "GLOWBOARD_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,
}

/// Subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Batch-correct overlapping elements
    Validate {
        /// Layout document to read
        file: PathBuf,
        /// Where to write the corrected layout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List colliding element pairs
    Check {
        /// Layout document to read
        file: PathBuf,
    },

    /// Replay a JSON array of editor commands against a layout
    Apply {
        /// Layout document to read
        file: PathBuf,
        /// JSON file holding the commands
        commands: PathBuf,
        /// Where to write the edited layout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Command to run.
    pub command: Command,
    /// Panel width replacing the document's, if set.
    pub panel_width: Option<f32>,
    /// Panel height replacing the document's, if set.
    pub panel_height: Option<f32>,
    /// History bound for replayed commands.
    pub history_limit: usize,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            command: args.command,
            panel_width: args.panel_width,
            panel_height: args.panel_height,
            history_limit: args.history_limit,
        }
    }
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The resulting layout satisfies the collision invariant.
    Clean,
    /// At least one pair of elements still collides.
    CollisionsFound,
}

impl RunStatus {
    fn from_layout(elements: &[Element]) -> Self {
        if find_collisions(elements).is_empty() {
            Self::Clean
        } else {
            Self::CollisionsFound
        }
    }
}

/// Run the configured command, writing a human-readable report to `out`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, or if a document
/// or command list is malformed.
pub fn run(config: &CliConfig, out: &mut dyn Write) -> anyhow::Result<RunStatus> {
    match &config.command {
        Command::Validate { file, output } => validate(config, file, output.as_deref(), out),
        Command::Check { file } => check(config, file, out),
        Command::Apply {
            file,
            commands,
            output,
        } => apply(config, file, commands, output.as_deref(), out),
    }
}

/// Read a layout document, applying any panel overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the document is invalid.
pub fn load_layout(config: &CliConfig, path: &Path) -> anyhow::Result<(Panel, Vec<Element>)> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout {}", path.display()))?;
    let mut document = LayoutDocument::from_json(&json)
        .with_context(|| format!("Failed to parse layout {}", path.display()))?;

    if let Some(width) = config.panel_width {
        document.panel.width = width;
    }
    if let Some(height) = config.panel_height {
        document.panel.height = height;
    }

    let (panel, elements) = document
        .into_parts()
        .with_context(|| format!("Invalid layout {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        width = panel.width,
        height = panel.height,
        elements = elements.len(),
        "Loaded layout"
    );
    Ok((panel, elements))
}

/// Write a layout document.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_layout(path: &Path, panel: &Panel, elements: &[Element]) -> anyhow::Result<()> {
    let json = LayoutDocument::from_parts(panel, elements).to_json()?;
    fs::write(path, json).with_context(|| format!("Failed to write layout {}", path.display()))?;
    tracing::info!(path = %path.display(), elements = elements.len(), "Saved layout");
    Ok(())
}

fn validate(
    config: &CliConfig,
    file: &Path,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> anyhow::Result<RunStatus> {
    let (panel, elements) = load_layout(config, file)?;
    let corrected = validate_and_correct_positions(&elements, &panel);

    let mut moved = 0_usize;
    for (before, after) in elements.iter().zip(&corrected) {
        if before.geometry != after.geometry {
            moved += 1;
            writeln!(
                out,
                "moved {} from ({}, {}) to ({}, {})",
                after.id, before.geometry.x, before.geometry.y, after.geometry.x, after.geometry.y
            )?;
        }
    }

    let status = RunStatus::from_layout(&corrected);
    writeln!(out, "{moved} of {} element(s) moved", corrected.len())?;
    if status == RunStatus::CollisionsFound {
        writeln!(out, "some elements found no free space and still collide")?;
    }

    if let Some(path) = output {
        save_layout(path, &panel, &corrected)?;
    }
    Ok(status)
}

fn check(config: &CliConfig, file: &Path, out: &mut dyn Write) -> anyhow::Result<RunStatus> {
    let (_, elements) = load_layout(config, file)?;
    let collisions = find_collisions(&elements);

    for (a, b) in &collisions {
        writeln!(out, "collision: {a} <-> {b}")?;
    }
    writeln!(
        out,
        "{} colliding pair(s) among {} element(s)",
        collisions.len(),
        elements.len()
    )?;

    Ok(if collisions.is_empty() {
        RunStatus::Clean
    } else {
        RunStatus::CollisionsFound
    })
}

fn apply(
    config: &CliConfig,
    file: &Path,
    commands_path: &Path,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> anyhow::Result<RunStatus> {
    let (panel, elements) = load_layout(config, file)?;
    let json = fs::read_to_string(commands_path)
        .with_context(|| format!("Failed to read commands {}", commands_path.display()))?;
    let commands: Vec<EditorCommand> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse commands {}", commands_path.display()))?;

    let mut state =
        EditorState::with_elements(panel, elements).with_history_limit(config.history_limit);
    for (index, command) in commands.into_iter().enumerate() {
        let outcome = state.dispatch(command);
        writeln!(out, "[{index}] {outcome}")?;
    }

    if state.has_session() {
        tracing::warn!("Command list ended inside a drag or resize, discarding it");
    }
    writeln!(
        out,
        "{} element(s), version {}",
        state.elements().len(),
        state.version()
    )?;

    if let Some(path) = output {
        save_layout(path, state.panel(), state.elements())?;
    }
    Ok(RunStatus::from_layout(state.elements()))
}
