//! match-runner: headless matching runner for the mentoring scheduler.
//!
//! Usage:
//!   match-runner --db match.db --mode gap-averse --seed 42
//!   match-runner --db match.db --demo 30 --csv results.csv
//!   match-runner --db match.db --audit <run-id>
//!   match-runner --db match.db --commit

use anyhow::Result;
use mentormatch_core::{
    audit,
    config::MatchConfig,
    demo::DemoData,
    engine::{self, MatchEngine, MatchMode, MatchOutcome},
    grid::SlotGrid,
    manager,
    model::{AssignmentResult, RoomManagerEntry},
    ordering,
    rng::{MatchRng, RngStream},
    store::MatchStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let demo = parse_arg(&args, "--demo", 0usize);
    let commit = args.iter().any(|a| a == "--commit");

    let mode_name = str_arg(&args, "--mode").unwrap_or("gap-averse");
    let Some(mode) = MatchMode::parse(mode_name) else {
        anyhow::bail!("unknown --mode {mode_name:?} (expected simple | gap-averse)");
    };

    let config = match str_arg(&args, "--config") {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    let grid = SlotGrid::build(&config.grid);

    let store = MatchStore::open(db)?;
    store.migrate()?;

    if let Some(run_id) = str_arg(&args, "--audit") {
        return audit_run(&store, run_id);
    }

    if demo > 0 {
        seed_demo_data(&store, &grid, seed, demo)?;
    }

    let students = store.load_students()?;
    let mentors = store.load_mentors()?;
    let history = store.load_history()?;

    println!("match-runner");
    println!("  db:       {db}");
    println!("  mode:     {}", mode.as_str());
    println!("  seed:     {seed}");
    println!("  students: {}", students.len());
    println!("  mentors:  {}", mentors.len());
    println!();

    if let Err(e) = engine::check_inputs(&students, &mentors) {
        log::warn!("{e}");
        println!("{e} - nothing to match.");
        return Ok(());
    }

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    store.insert_run(&run_id, seed, mode.as_str(), env!("CARGO_PKG_VERSION"))?;

    let mut matcher = MatchEngine::new(&grid, mode, config.weights.clone(), seed);
    let outcome = matcher.run(&students, &mentors, &history);
    store.save_assignments(&run_id, &outcome.assignments)?;

    let managers = match mode {
        MatchMode::Simple => manager::select_daily_managers(&outcome, &mentors, &grid),
        MatchMode::GapAverse => manager::select_slot_coverage(&outcome, &grid),
    };

    // The engine's own output must audit clean; anything here is a bug.
    let violations = audit::validate(&outcome.assignments, &students, &mentors);
    for v in &violations {
        log::error!("internal inconsistency: {v}");
    }

    print_summary(&run_id, &grid, &outcome, &managers);

    if let Some(path) = str_arg(&args, "--csv") {
        let csv = render_csv(&grid, &outcome.assignments);
        std::fs::write(path, csv)?;
        println!("results written to {path}");
    }

    if commit {
        let appended = store.commit_results(&outcome.assignments)?;
        store.clear_students()?;
        store.clear_assignments(&run_id)?;
        println!("committed {appended} pairings to history; working data cleared");
    }

    Ok(())
}

/// Re-audit a (possibly hand-edited) run against the submitted records.
fn audit_run(store: &MatchStore, run_id: &str) -> Result<()> {
    let assignments = store.load_assignments(&run_id.to_string())?;
    if assignments.is_empty() {
        println!("no assignments stored for {run_id}");
        return Ok(());
    }
    let students = store.load_students()?;
    let mentors = store.load_mentors()?;

    let violations = audit::validate(&assignments, &students, &mentors);
    if violations.is_empty() {
        println!("{run_id}: {} assignments, no violations", assignments.len());
    } else {
        println!("{run_id}: {} violation(s)", violations.len());
        for v in &violations {
            println!("  {v}");
        }
    }
    Ok(())
}

fn seed_demo_data(store: &MatchStore, grid: &SlotGrid, seed: u64, count: usize) -> Result<()> {
    let mut rng = MatchRng::for_stream(seed, RngStream::Demo);
    let students = DemoData::students(&mut rng, grid, count);
    let mentors = DemoData::mentors(&mut rng, grid, (count / 3).max(2));
    for s in &students {
        store.upsert_student(s)?;
    }
    for m in &mentors {
        store.upsert_mentor(m)?;
    }
    println!(
        "seeded {} demo students and {} demo mentors",
        students.len(),
        mentors.len()
    );
    Ok(())
}

fn print_summary(
    run_id: &str,
    grid: &SlotGrid,
    outcome: &MatchOutcome,
    managers: &[RoomManagerEntry],
) {
    let mut results = outcome.assignments.clone();
    ordering::sort_assignments(grid, &mut results);

    println!("=== MATCH SUMMARY ===");
    println!("  run_id:    {run_id}");
    println!("  matched:   {}", outcome.matched_count());
    println!("  unmatched: {}", results.len() - outcome.matched_count());
    println!();
    for r in &results {
        match (&r.slot, &r.mentor_name) {
            (Some(slot), Some(mentor)) => {
                println!("  {slot} | {} -> {mentor}", r.student_name)
            }
            _ => println!("  (unmatched)     | {}", r.student_name),
        }
    }

    println!();
    println!("=== ROOM MANAGERS ===");
    if managers.is_empty() {
        println!("  (no active days)");
    }
    for entry in managers {
        let who = if entry.mentors.is_empty() {
            "(none)".to_string()
        } else {
            entry.mentors.join(", ")
        };
        println!("  {} | {who} ({})", entry.slot, entry.reason.label());
    }
}

fn render_csv(grid: &SlotGrid, assignments: &[AssignmentResult]) -> String {
    let mut results = assignments.to_vec();
    ordering::sort_assignments(grid, &mut results);

    let mut out = String::from("student,mentor,slot,status,school,track\n");
    for r in &results {
        let row = [
            r.student_name.as_str(),
            r.mentor_name.as_deref().unwrap_or(""),
            r.slot.as_deref().unwrap_or(""),
            if r.is_matched() { "matched" } else { "unmatched" },
            r.school.as_str(),
            r.track.as_str(),
        ];
        let line: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Minimal CSV quoting: wrap fields containing a comma, quote, or
/// newline and double any embedded quotes.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
