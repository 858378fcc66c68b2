use crate::types::{Coordinates, WorkoutInput, WorkoutKind};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "mapty.sqlite3";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts at map coordinates and keep them across sessions"
)]
pub struct Cli {
    /// SQLite file holding the workout history.
    #[arg(long, env = "MAPTY_DB", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Log a new workout at the given coordinates.
    Add {
        #[command(subcommand)]
        workout: AddCmd,
    },

    /// Print every logged workout, oldest first.
    List,

    /// Show one workout and a map link centred on it.
    Show { id: String },

    /// Print the stored history as JSON.
    Export,

    /// Replace the history with the workouts in a JSON file.
    ///
    /// Accepts this tool's export as well as the browser app's `workouts`
    /// localStorage value.
    Import { file: PathBuf },

    /// Erase the whole history.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AddCmd {
    Running {
        #[command(flatten)]
        at: Location,

        #[command(flatten)]
        effort: Effort,

        /// Steps per minute.
        #[arg(long, allow_negative_numbers = true)]
        cadence: String,
    },
    Cycling {
        #[command(flatten)]
        at: Location,

        #[command(flatten)]
        effort: Effort,

        /// Elevation gain in metres.
        #[arg(long, allow_negative_numbers = true)]
        elevation: String,
    },
}

#[derive(Args, Debug)]
pub struct Location {
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

/// Raw values; checked by `WorkoutInput::validate`.
#[derive(Args, Debug)]
pub struct Effort {
    /// Distance in kilometres.
    #[arg(long, allow_negative_numbers = true)]
    pub distance: String,

    /// Duration in minutes.
    #[arg(long, allow_negative_numbers = true)]
    pub duration: String,
}

impl AddCmd {
    pub fn into_input(self) -> WorkoutInput {
        let (kind, at, effort, extra) = match self {
            Self::Running {
                at,
                effort,
                cadence,
            } => (WorkoutKind::Running, at, effort, cadence),
            Self::Cycling {
                at,
                effort,
                elevation,
            } => (WorkoutKind::Cycling, at, effort, elevation),
        };

        WorkoutInput {
            kind,
            coords: Coordinates::new(at.lat, at.lng),
            distance: effort.distance,
            duration: effort.duration,
            extra,
        }
    }
}
