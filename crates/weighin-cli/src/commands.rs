use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use tracing::debug;
use weighin_sdk::{
    BoatRoster, CrewMember, Division, EntryChanges, EntryDraft, EntryId, EventFile, FishEntry,
    OperatorConfig, Tournament, TournamentDay, WeighIn, WeighInConfig,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = &cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(&cli.config, args),
        Command::Boat(args) => {
            let (config, weigh_in) = open_console(&cli.config)?;
            cmd_boat(weigh_in, &config, args, format)
        }
        Command::Crew(args) => {
            let (config, weigh_in) = open_console(&cli.config)?;
            cmd_crew(weigh_in, &config, args)
        }
        Command::Catch(args) => {
            let (config, weigh_in) = open_console(&cli.config)?;
            cmd_catch(weigh_in, &config, args, format)
        }
        Command::Board(args) => {
            let (_, weigh_in) = open_console(&cli.config)?;
            cmd_board(weigh_in, args, format)
        }
        Command::Limits(args) => {
            let (_, weigh_in) = open_console(&cli.config)?;
            cmd_limits(&weigh_in, args)
        }
    }
}

/// Open the console from disk, picking up every prior write.
fn open_console(config_path: &Path) -> anyhow::Result<(WeighInConfig, WeighIn)> {
    let config = WeighInConfig::load(config_path)
        .with_context(|| format!("run `weighin init` to create {}", config_path.display()))?;
    let weigh_in = WeighIn::open(&config)?;
    debug!(
        tournament = %weigh_in.tournament().id,
        entries = weigh_in.ledger().len(),
        "console opened"
    );
    Ok((config, weigh_in))
}

fn cmd_init(config_path: &Path, args: InitArgs) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", config_path.display());
    }

    let division = args.division;
    let tournament = Tournament::new(args.id, args.name, division, args.days)?;
    let config = WeighInConfig {
        operator: OperatorConfig {
            name: args.operator,
            editor: args.editor,
        },
        ..WeighInConfig::default()
    };
    config.save(config_path)?;

    let base = config_path.parent().unwrap_or_else(|| Path::new(""));
    let resolved = config.resolved_against(base);
    EventFile::new(tournament.clone()).save(&resolved.event_path)?;
    if !resolved.matrix_path.exists() {
        fs::write(&resolved.matrix_path, matrix_template(division))
            .with_context(|| format!("cannot write {}", resolved.matrix_path.display()))?;
    }
    fs::create_dir_all(&resolved.data_dir)
        .with_context(|| format!("cannot create {}", resolved.data_dir.display()))?;

    println!(
        "{} Initialized {} ({}, {} day{})",
        "✓".green().bold(),
        tournament.name.bold(),
        division.to_string().cyan(),
        tournament.days,
        if tournament.days == 1 { "" } else { "s" }
    );
    println!("  Config: {}", config_path.display());
    println!("  Event: {}", resolved.event_path.display());
    println!("  Matrix: {}", resolved.matrix_path.display());
    Ok(())
}

fn cmd_boat(
    mut weigh_in: WeighIn,
    config: &WeighInConfig,
    args: BoatArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match args.action {
        BoatAction::Add {
            boat,
            name,
            captain,
            captain_name,
            member_ref,
        } => {
            let captain = crew_member(captain, captain_name, member_ref);
            let division = weigh_in.tournament().division;
            let roster = BoatRoster::new(boat, name, captain, division)?;
            let boat_id = roster.boat_id.clone();
            weigh_in.register_boat(&config.identity(), roster)?;
            weigh_in.event().save(&config.event_path)?;
            println!("{} Registered boat {}", "✓".green().bold(), boat_id.to_string().yellow());
        }
        BoatAction::List => {
            if matches!(format, OutputFormat::Json) {
                println!("{}", serde_json::to_string_pretty(weigh_in.rosters())?);
                return Ok(());
            }
            if weigh_in.rosters().is_empty() {
                println!("No boats registered.");
            }
            for roster in weigh_in.rosters() {
                println!("{}  {}", roster.boat_id.to_string().yellow().bold(), roster.name);
                for (i, member) in roster.members().enumerate() {
                    let role = if i == 0 { "captain" } else { "crew" };
                    let color = member
                        .zip_tie
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".into());
                    let status = if member.is_member { "member" } else { "guest" };
                    println!(
                        "  {:<8} {:<16} {:<20} {:<7} {}",
                        role,
                        member.angler_id.to_string(),
                        member.name,
                        color.cyan(),
                        status.dimmed()
                    );
                }
            }
        }
    }
    Ok(())
}

fn cmd_crew(mut weigh_in: WeighIn, config: &WeighInConfig, args: CrewArgs) -> anyhow::Result<()> {
    let who = config.identity();
    match args.action {
        CrewAction::Add {
            boat,
            angler,
            name,
            member_ref,
        } => {
            let member = weigh_in.add_crew(&who, &boat, crew_member(angler, name, member_ref))?;
            weigh_in.event().save(&config.event_path)?;
            match member.zip_tie {
                Some(color) => println!(
                    "{} {} joined {} with a {} zip-tie",
                    "✓".green().bold(),
                    member.name.bold(),
                    boat.to_string().yellow(),
                    color.to_string().cyan()
                ),
                None => println!(
                    "{} {} joined {}",
                    "✓".green().bold(),
                    member.name.bold(),
                    boat.to_string().yellow()
                ),
            }
        }
        CrewAction::Reassign { boat } => {
            let colors = weigh_in.reassign_zip_ties(&who, &boat)?.zip_ties();
            weigh_in.event().save(&config.event_path)?;
            let colors: Vec<String> = colors.iter().map(|c| c.to_string()).collect();
            println!(
                "{} Reassigned zip-ties on {}: {}",
                "✓".green().bold(),
                boat.to_string().yellow(),
                colors.join(", ").cyan()
            );
        }
    }
    Ok(())
}

fn cmd_catch(
    mut weigh_in: WeighIn,
    config: &WeighInConfig,
    args: CatchArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let who = config.identity();
    match args.action {
        CatchAction::Add {
            boat,
            angler,
            category,
            day,
            species,
            weight,
            length,
        } => {
            let mut draft = EntryDraft::new(boat, angler, TournamentDay::new(day)?, category);
            if let Some(species) = species {
                draft = draft.species(species);
            }
            if let Some(weight) = weight {
                draft = draft.weight(weight);
            }
            if let Some(length) = length {
                draft = draft.length(length);
            }
            let entry = weigh_in.record_catch(&who, draft)?;
            let points = weigh_in.score(&entry).points();
            println!(
                "{} Recorded {} {} for {} ({} pts)",
                "✓".green().bold(),
                entry.category.label(),
                entry.id.short_id().yellow(),
                entry.boat_id.to_string().bold(),
                points
            );
        }
        CatchAction::Edit {
            id,
            category,
            species,
            weight,
            length,
            angler,
            revision,
        } => {
            let id = resolve_entry(&weigh_in, &id)?;
            let mut changes = EntryChanges::new();
            if let Some(category) = category {
                changes = changes.category(category);
            }
            if let Some(species) = species {
                changes = changes.species(species);
            }
            if weight.is_some() {
                changes = changes.weight(weight);
            }
            if length.is_some() {
                changes = changes.length(length);
            }
            if let Some(angler) = angler {
                changes = changes.angler(angler);
            }
            if changes.is_empty() {
                bail!("nothing to change");
            }
            if let Some(revision) = revision {
                changes = changes.expect_revision(revision);
            }
            let entry = weigh_in.edit_catch(&who, id, changes)?;
            println!(
                "{} Updated {} (revision {}, {} pts)",
                "✓".green().bold(),
                entry.id.short_id().yellow(),
                entry.revision,
                weigh_in.score(&entry).points()
            );
        }
        CatchAction::Remove { id } => {
            let id = resolve_entry(&weigh_in, &id)?;
            let entry = weigh_in.remove_catch(&who, id)?;
            println!(
                "{} Removed {} {} from {}",
                "✓".green().bold(),
                entry.category.label(),
                entry.id.short_id().yellow(),
                entry.boat_id.to_string().bold()
            );
        }
        CatchAction::List { boat, day } => {
            let day = day.map(TournamentDay::new).transpose()?;
            let entries: Vec<&FishEntry> = match &boat {
                Some(boat) => weigh_in.entries(boat).iter().collect(),
                None => weigh_in.ledger().snapshot().entries().collect(),
            };
            let entries: Vec<&FishEntry> = entries
                .into_iter()
                .filter(|e| day.map_or(true, |d| e.day == d))
                .collect();

            if matches!(format, OutputFormat::Json) {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("No catches recorded.");
            }
            for entry in entries {
                println!(
                    "{}  day {}  {:<16} {:<14} {:<16} {:>9} {:>9} {:>5} pts{}",
                    entry.id.short_id().yellow(),
                    entry.day,
                    entry.boat_id.to_string(),
                    entry.angler_id.to_string(),
                    entry.category.label(),
                    measurement(entry.weight, "lb"),
                    measurement(entry.length, "in"),
                    weigh_in.score(entry).points(),
                    if entry.revision > 1 {
                        format!("  (rev {})", entry.revision).dimmed().to_string()
                    } else {
                        String::new()
                    }
                );
            }
        }
    }
    Ok(())
}

fn cmd_board(weigh_in: WeighIn, args: BoardArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let day = TournamentDay::new(args.day)?;
    if !weigh_in.tournament().has_day(day) {
        bail!(
            "day {} is outside {} ({} days)",
            day,
            weigh_in.tournament().name,
            weigh_in.tournament().days
        );
    }
    let weigh_in = match args.tie_break {
        Some(tie_break) => weigh_in.with_tie_break(tie_break),
        None => weigh_in,
    };

    match args.view {
        BoardView::Boats => {
            let board = weigh_in.boat_standings(day);
            if matches!(format, OutputFormat::Json) {
                println!("{}", serde_json::to_string_pretty(&board)?);
                return Ok(());
            }
            println!("{} day {}", weigh_in.tournament().name.bold(), day);
            for (rank, row) in board.iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:>6} total {:>6} today  {} fish",
                    rank + 1,
                    row.boat_id.to_string().yellow(),
                    row.total_points.to_string().bold(),
                    row.daily_points,
                    row.entry_count
                );
            }
        }
        BoardView::Anglers => {
            let board = weigh_in.angler_standings(day);
            if matches!(format, OutputFormat::Json) {
                println!("{}", serde_json::to_string_pretty(&board)?);
                return Ok(());
            }
            println!("{} day {}", weigh_in.tournament().name.bold(), day);
            for (rank, row) in board.iter().enumerate() {
                println!(
                    "{:>3}. {:<20} {:<16} {:>6} total {:>6} today  {}",
                    rank + 1,
                    row.name,
                    row.boat_id.to_string().yellow(),
                    row.total_points.to_string().bold(),
                    row.daily_points,
                    (if row.is_member { "" } else { "guest" }).dimmed()
                );
            }
        }
    }
    Ok(())
}

fn cmd_limits(weigh_in: &WeighIn, args: LimitsArgs) -> anyhow::Result<()> {
    let day = TournamentDay::new(args.day)?;
    println!("{} day {}", args.boat.to_string().yellow().bold(), day);
    for (category, left) in weigh_in.remaining(&args.boat, day) {
        let left = if left == 0 {
            "full".red().to_string()
        } else {
            left.to_string().green().to_string()
        };
        println!("  {:<16} {}", category.label(), left);
    }
    Ok(())
}

fn crew_member(
    angler: weighin_sdk::AnglerId,
    name: String,
    member_ref: Option<String>,
) -> CrewMember {
    match member_ref {
        Some(member_ref) => CrewMember::member(angler, name, member_ref),
        None => CrewMember::guest(angler, name),
    }
}

/// Accept a full entry id or a prefix matching exactly one recorded entry.
fn resolve_entry(weigh_in: &WeighIn, needle: &str) -> anyhow::Result<EntryId> {
    if let Ok(id) = needle.parse::<EntryId>() {
        return Ok(id);
    }
    let matches: Vec<EntryId> = weigh_in
        .ledger()
        .snapshot()
        .entries()
        .map(|e| e.id)
        .filter(|id| id.to_string().starts_with(needle))
        .collect();
    match matches.as_slice() {
        [] => bail!("no entry matches {needle}"),
        [id] => Ok(*id),
        _ => bail!("{needle} matches {} entries; use more characters", matches.len()),
    }
}

fn measurement(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.2} {unit}"))
}

/// Starter matrix: one rule per category on the division's primary metric.
pub(crate) fn matrix_template(division: Division) -> String {
    let metric = division.primary_metric();
    let mut out = String::new();
    let _ = writeln!(out, "# Scoring matrix for the {division} division.");
    let _ = writeln!(out, "# Each rule awards the points of the highest threshold the catch reaches.");
    for category in division.categories() {
        let _ = writeln!(out);
        let _ = writeln!(out, "[[rule]]");
        let _ = writeln!(out, "division = \"{}\"", division.as_str());
        let _ = writeln!(out, "category = \"{}\"", category.as_str());
        let _ = writeln!(out, "metric = \"{metric}\"");
        let _ = writeln!(out, "breakpoints = [");
        let _ = writeln!(out, "    {{ threshold = 10.0, points = 10 }},");
        let _ = writeln!(out, "    {{ threshold = 20.0, points = 20 }},");
        let _ = writeln!(out, "]");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use weighin_sdk::{BoatId, ScoringMatrix};

    fn run(args: &[&str]) -> anyhow::Result<()> {
        run_command(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn templates_load_for_both_divisions() {
        for division in [Division::Nearshore, Division::Offshore] {
            let matrix = ScoringMatrix::from_toml_str(&matrix_template(division)).unwrap();
            assert!(matrix.unscored_categories(division).is_empty(), "{division}");
        }
    }

    #[test]
    fn weigh_in_session() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("weighin.toml");
        let config = config.to_str().unwrap();

        run(&["weighin", "-c", config, "init", "slam", "Slam", "--days", "2", "--editor"]).unwrap();
        assert!(run(&["weighin", "-c", config, "init", "slam", "Slam"]).is_err());

        run(&[
            "weighin", "-c", config, "boat", "add", "reel-deal", "Reel Deal",
            "--captain", "casey", "--captain-name", "Casey", "--member-ref", "club-1",
        ])
        .unwrap();
        run(&["weighin", "-c", config, "crew", "add", "reel-deal", "dee", "Dee"]).unwrap();
        run(&["weighin", "-c", config, "catch", "add", "reel-deal", "dee", "wahoo", "-w", "25"]).unwrap();
        run(&["weighin", "-c", config, "board", "boats"]).unwrap();
        run(&["weighin", "-c", config, "limits", "reel-deal", "-d", "2"]).unwrap();
        assert!(run(&["weighin", "-c", config, "board", "boats", "--day", "3"]).is_err());

        let loaded = WeighInConfig::load(Path::new(config)).unwrap();
        let weigh_in = WeighIn::open(&loaded).unwrap();
        let boat = BoatId::new("reel-deal").unwrap();
        assert_eq!(weigh_in.roster(&boat).unwrap().len(), 2);
        let entries = weigh_in.entries(&boat);
        assert_eq!(entries.len(), 1);
        assert_eq!(weigh_in.score(&entries[0]).points(), 20);

        let prefix = entries[0].id.to_string()[..13].to_string();
        run(&["weighin", "-c", config, "catch", "edit", &prefix, "-w", "12"]).unwrap();
        let weigh_in = WeighIn::open(&loaded).unwrap();
        assert_eq!(weigh_in.entries(&boat)[0].revision, 2);
        assert_eq!(weigh_in.score(&weigh_in.entries(&boat)[0]).points(), 10);

        run(&["weighin", "-c", config, "catch", "remove", &prefix]).unwrap();
        assert!(WeighIn::open(&loaded).unwrap().ledger().is_empty());
    }

    #[test]
    fn viewer_console_cannot_record() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("weighin.toml");
        let config = config.to_str().unwrap();

        run(&["weighin", "-c", config, "init", "slam", "Slam"]).unwrap();
        let err = run(&[
            "weighin", "-c", config, "boat", "add", "skiff", "Skiff",
            "--captain", "sam", "--captain-name", "Sam",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("capability"));
    }

    #[test]
    fn missing_config_points_at_init() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("nope.toml");
        let config = config.to_str().unwrap();
        for command in [
            &["boat", "list"][..],
            &["crew", "reassign", "x"],
            &["catch", "list"],
            &["board", "boats"],
            &["limits", "x"],
        ] {
            let args: Vec<&str> = ["weighin", "-c", config].into_iter().chain(command.iter().copied()).collect();
            let err = run(&args).unwrap_err();
            assert!(err.to_string().contains("weighin init"), "{command:?}");
        }

        // init never needs an existing config.
        run(&["weighin", "-c", config, "init", "slam", "Slam"]).unwrap();
        assert!(Path::new(config).exists());
    }
}
