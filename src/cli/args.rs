//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::TaskId;

/// Kiln front-end asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (optional, searched upward from the current directory)
    #[arg(short = 'C', long, global = true, default_value = "kiln.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands (development run when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// One-shot production build: clean, then every writer
    #[command(visible_alias = "b")]
    Build,

    /// Build, then watch sources and serve the build directory
    #[command(visible_alias = "default")]
    Dev {
        #[command(flatten)]
        serve_args: ServeArgs,
    },

    #[command(flatten)]
    Task(TaskCommand),

    /// Watch sources and re-run the matching tasks
    #[command(visible_alias = "w")]
    Watch,

    /// Serve the build directory with live reload
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        serve_args: ServeArgs,
    },
}

/// Commands that run exactly one task
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCommand {
    /// Delete the whole build directory
    Clean,

    /// Delete the build image directory
    #[command(name = "clean:img")]
    CleanImg,

    /// Compile the entry stylesheet
    Scss,

    /// Copy images into the build directory
    #[command(name = "copy:img")]
    CopyImg,

    /// Copy fonts into the build directory
    #[command(name = "copy:fonts")]
    CopyFonts,

    /// Copy top-level HTML templates into the build directory
    Html,

    /// Pack icons into a sprite sheet and its SCSS partial
    Sprite,
}

impl TaskCommand {
    pub const fn task(self) -> TaskId {
        match self {
            Self::Clean => TaskId::Clean,
            Self::CleanImg => TaskId::CleanImages,
            Self::Scss => TaskId::Style,
            Self::CopyImg => TaskId::CopyImages,
            Self::CopyFonts => TaskId::CopyFonts,
            Self::Html => TaskId::Html,
            Self::Sprite => TaskId::Sprite,
        }
    }
}

/// Shared dev server arguments for Dev and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not open a browser window
    #[arg(long)]
    pub no_open: bool,
}

impl Commands {
    /// Serve arguments for commands that start the dev server.
    pub const fn serve_args(&self) -> Option<&ServeArgs> {
        match self {
            Self::Dev { serve_args } | Self::Serve { serve_args } => Some(serve_args),
            _ => None,
        }
    }
}

impl Cli {
    /// Resolved command: no subcommand means the development run.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Dev {
            serve_args: ServeArgs::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_is_dev() {
        let cli = Cli::parse_from(["kiln"]);
        assert!(matches!(cli.command(), Commands::Dev { .. }));
    }

    #[test]
    fn test_default_alias() {
        let cli = Cli::parse_from(["kiln", "default"]);
        assert!(matches!(cli.command(), Commands::Dev { .. }));
    }

    fn task_of(args: &[&str]) -> Option<TaskId> {
        match Cli::parse_from(args).command() {
            Commands::Task(command) => Some(command.task()),
            _ => None,
        }
    }

    #[test]
    fn test_colon_task_names() {
        assert_eq!(task_of(&["kiln", "clean:img"]), Some(TaskId::CleanImages));
        assert_eq!(task_of(&["kiln", "copy:fonts"]), Some(TaskId::CopyFonts));
        assert_eq!(task_of(&["kiln", "copy:img"]), Some(TaskId::CopyImages));
    }

    #[test]
    fn test_every_task_name_parses() {
        for task in [
            TaskId::Clean,
            TaskId::CleanImages,
            TaskId::Sprite,
            TaskId::Html,
            TaskId::Style,
            TaskId::CopyFonts,
            TaskId::CopyImages,
        ] {
            assert_eq!(task_of(&["kiln", task.name()]), Some(task));
        }
    }

    #[test]
    fn test_serve_args() {
        let cli = Cli::parse_from(["kiln", "serve", "--port", "8080", "--no-open"]);
        let command = cli.command();
        let args = command.serve_args().unwrap();
        assert_eq!(args.port, Some(8080));
        assert!(args.no_open);
    }

    #[test]
    fn test_build_has_no_single_task() {
        let cli = Cli::parse_from(["kiln", "build"]);
        assert!(task_of(&["kiln", "build"]).is_none());
        assert!(cli.command().serve_args().is_none());
    }
}
