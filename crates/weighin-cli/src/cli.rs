use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use weighin_sdk::{AnglerId, BoatId, Category, Division, TieBreak, TournamentId, CONFIG_FILE};

#[derive(Parser)]
#[command(
    name = "weighin",
    about = "Tournament weigh-in console: record catches, enforce limits, post standings",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Console configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the config, event and scoring matrix files for a tournament
    Init(InitArgs),
    /// Register and list boats
    Boat(BoatArgs),
    /// Manage boat crews and zip-tie colors
    Crew(CrewArgs),
    /// Record, correct, remove and list catches
    Catch(CatchArgs),
    /// Show the leaderboard
    Board(BoardArgs),
    /// Show how many fish a boat may still weigh in per category
    Limits(LimitsArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub id: TournamentId,
    pub name: String,
    #[arg(long, default_value = "offshore")]
    pub division: Division,
    #[arg(long, default_value = "1")]
    pub days: u16,
    /// Operator name recorded in the config
    #[arg(long, default_value = "scale")]
    pub operator: String,
    /// Grant the operator the editor capability
    #[arg(long)]
    pub editor: bool,
    /// Overwrite existing config and event files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct BoatArgs {
    #[command(subcommand)]
    pub action: BoatAction,
}

#[derive(Subcommand)]
pub enum BoatAction {
    Add {
        boat: BoatId,
        name: String,
        #[arg(long)]
        captain: AnglerId,
        #[arg(long)]
        captain_name: String,
        /// Club membership reference of the captain
        #[arg(long)]
        member_ref: Option<String>,
    },
    List,
}

#[derive(Args)]
pub struct CrewArgs {
    #[command(subcommand)]
    pub action: CrewAction,
}

#[derive(Subcommand)]
pub enum CrewAction {
    Add {
        boat: BoatId,
        angler: AnglerId,
        name: String,
        #[arg(long)]
        member_ref: Option<String>,
    },
    /// Rebuild every zip-tie color on an offshore boat
    Reassign { boat: BoatId },
}

#[derive(Args)]
pub struct CatchArgs {
    #[command(subcommand)]
    pub action: CatchAction,
}

#[derive(Subcommand)]
pub enum CatchAction {
    Add {
        boat: BoatId,
        angler: AnglerId,
        category: Category,
        #[arg(short, long, default_value = "1")]
        day: u16,
        #[arg(long)]
        species: Option<String>,
        /// Pounds
        #[arg(short, long)]
        weight: Option<f64>,
        /// Inches
        #[arg(short, long)]
        length: Option<f64>,
    },
    Edit {
        /// Full entry id or an unambiguous prefix
        id: String,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        species: Option<String>,
        #[arg(short, long)]
        weight: Option<f64>,
        #[arg(short, long)]
        length: Option<f64>,
        #[arg(long)]
        angler: Option<AnglerId>,
        /// Reject the edit unless the entry is still at this revision
        #[arg(long)]
        revision: Option<u32>,
    },
    Remove {
        id: String,
    },
    List {
        boat: Option<BoatId>,
        #[arg(short, long)]
        day: Option<u16>,
    },
}

#[derive(Args)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub view: BoardView,
    #[arg(short, long, global = true, default_value = "1")]
    pub day: u16,
    /// Override the configured tie-break policy
    #[arg(long, global = true)]
    pub tie_break: Option<TieBreak>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardView {
    Boats,
    Anglers,
}

#[derive(Args)]
pub struct LimitsArgs {
    pub boat: BoatId,
    #[arg(short, long, default_value = "1")]
    pub day: u16,
}
