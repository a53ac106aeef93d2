//! Headless Battle Runner
//!
//! Plays a full battle with both sides on autopilot and prints a JSON (or
//! text) summary. The player side is driven through the same inputs a UI
//! would send.

use std::path::PathBuf;

use clap::Parser;
use grid_tactics::battle::{
    Ability, ActionChoice, ApproachPolicy, Battle, BattleInput, BattleOutcome, BattlePhase,
    BattlePolicy, BattleSetup, Grid, InputOutcome, Placement, TemplateLibrary, OPEN_WEIGHT,
};
use grid_tactics::core::{BattleConfig, BattleError, Faction, Result, TileCoord};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Headless Battle Runner - autopilot vs AI
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run a grid battle headlessly and report the outcome")]
struct Args {
    /// Obstacle map: an image (bright = open) or a .txt ASCII bitmap
    #[arg(long)]
    map: Option<PathBuf>,

    /// Width of the generated map when no --map is given
    #[arg(long, default_value_t = 12)]
    map_width: u32,

    /// Height of the generated map when no --map is given
    #[arg(long, default_value_t = 10)]
    map_height: u32,

    /// Fraction of generated tiles that become obstacles
    #[arg(long, default_value_t = 0.12)]
    obstacle_density: f64,

    /// Template library (JSON); the builtin library is used otherwise
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Pacing config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player party template ids, comma separated
    #[arg(long, value_delimiter = ',', default_value = "party/gunner,party/ranger,party/medic")]
    party: Vec<String>,

    /// Opponent template ids, comma separated
    #[arg(long, value_delimiter = ',', default_value = "coliseum/guard,coliseum/guard,coliseum/marksman")]
    foes: Vec<String>,

    /// Give up after this many rounds
    #[arg(long, default_value_t = 30)]
    max_rounds: u32,

    /// Simulated seconds per update
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every battle event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct BattleResult {
    outcome: String,
    rounds: u32,
    ticks: u64,
    survivors: Vec<SurvivorReport>,
    seed: u64,
}

#[derive(Serialize)]
struct SurvivorReport {
    name: String,
    faction: Faction,
    health: i32,
    max_health: i32,
}

// Safety valve for a phase that never settles
const MAX_TICKS_PER_WAIT: u32 = 100_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("grid_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        tracing::error!("Battle runner failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    let library = match &args.templates {
        Some(path) => TemplateLibrary::load(path)?,
        None => TemplateLibrary::builtin()?,
    };

    let mut grid = match &args.map {
        Some(path) if path.extension().is_some_and(|ext| ext == "txt") => {
            Grid::from_ascii(&std::fs::read_to_string(path)?)?
        }
        Some(path) => Grid::from_image_path(path)?,
        None => scatter_obstacles(args.map_width, args.map_height, args.obstacle_density, &mut rng),
    };

    let placements = place_sides(&grid, &args.party, &args.foes)?;
    for placement in &placements {
        grid.set_weight(placement.position, OPEN_WEIGHT);
    }
    let setup = BattleSetup { grid, placements };

    let mut battle = Battle::from_setup(&setup, &library, Box::new(ApproachPolicy::new()), config)?;
    let mut autopilot = ApproachPolicy::new();

    tracing::info!(
        "Battle started: {} combatants, seed {}",
        battle.board().combatants().len(),
        seed
    );

    while battle.outcome().is_none() && battle.round() <= args.max_rounds {
        play_player_turn(&mut battle, &mut autopilot, args);
        if battle.outcome().is_some() {
            break;
        }
        wait_for(&mut battle, BattlePhase::PlayerTurn, args);
    }

    report(&battle, seed, &args.format);
    Ok(())
}

/// Open grid with a seeded sprinkle of walls
fn scatter_obstacles(width: u32, height: u32, density: f64, rng: &mut ChaCha8Rng) -> Grid {
    let mut grid = Grid::open(width, height);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if rng.gen_bool(density.clamp(0.0, 1.0)) {
                grid.set_weight(TileCoord::new(x, y), 0);
            }
        }
    }
    grid
}

/// Party along the second-to-last row, foes along the second row
fn place_sides(grid: &Grid, party: &[String], foes: &[String]) -> Result<Vec<Placement>> {
    let width = grid.width() as usize;
    if party.len() > width || foes.len() > width || grid.height() < 4 {
        return Err(BattleError::InvalidPlacement(format!(
            "{} vs {} combatants do not fit a {}x{} map",
            party.len(),
            foes.len(),
            grid.width(),
            grid.height()
        )));
    }

    let spread = |count: usize, i: usize| ((i + 1) * width / (count + 1)) as i32;
    let mut placements = Vec::new();

    for (i, template) in party.iter().enumerate() {
        placements.push(Placement {
            name: format!("Hero {}", i + 1),
            template: template.clone(),
            faction: Faction::Player,
            position: TileCoord::new(spread(party.len(), i), grid.height() as i32 - 2),
        });
    }
    for (i, template) in foes.iter().enumerate() {
        placements.push(Placement {
            name: format!("Foe {}", i + 1),
            template: template.clone(),
            faction: Faction::Opponent,
            position: TileCoord::new(spread(foes.len(), i), 1),
        });
    }

    Ok(placements)
}

/// Move then act with every living party member, run the queue, end the turn
fn play_player_turn(battle: &mut Battle, autopilot: &mut ApproachPolicy, args: &Args) {
    let party: Vec<_> = battle
        .board()
        .faction_members(Faction::Player)
        .map(|c| c.id)
        .collect();

    for id in party {
        let Some(member) = battle.board().combatant(id) else {
            continue;
        };
        let decision = autopilot.decide(id, battle.board());

        if decision.destination != member.position {
            let steps = [
                BattleInput::Select(id),
                BattleInput::ChooseAction(ActionChoice::Move),
            ];
            if submit(battle, &steps, decision.destination, args) {
                wait_for(battle, BattlePhase::PlayerTurn, args);
            }
        }

        if let Some(command) = decision.command {
            let mut steps = vec![BattleInput::Select(id)];
            match command.ability {
                Ability::Attack => steps.push(BattleInput::ChooseAction(ActionChoice::Attack)),
                other => {
                    steps.push(BattleInput::ChooseAction(ActionChoice::Special));
                    steps.push(BattleInput::ChooseAbility(other));
                }
            }
            if submit(battle, &steps, command.target, args) {
                wait_for(battle, BattlePhase::PlayerTurn, args);
            }
        }
    }

    battle.handle_input(BattleInput::ExecuteQueued);
    wait_for(battle, BattlePhase::PlayerTurn, args);
    if battle.outcome().is_none() {
        battle.handle_input(BattleInput::EndTurn);
    }
}

/// Feed menu inputs, let the aim guard pass, then submit the target
fn submit(battle: &mut Battle, steps: &[BattleInput], target: TileCoord, args: &Args) -> bool {
    for step in steps {
        if battle.handle_input(*step) == InputOutcome::Ignored {
            battle.handle_input(BattleInput::Cancel);
            return false;
        }
    }

    let mut waited = 0.0;
    while waited <= battle.config().aim_guard_secs {
        drain(battle, args);
        waited += args.dt;
    }
    drain(battle, args);

    if battle.handle_input(BattleInput::SubmitTarget(target)) == InputOutcome::Ignored {
        tracing::warn!("Autopilot target ({}, {}) rejected", target.x, target.y);
        battle.handle_input(BattleInput::Cancel);
        return false;
    }
    true
}

fn wait_for(battle: &mut Battle, phase: BattlePhase, args: &Args) {
    for _ in 0..MAX_TICKS_PER_WAIT {
        drain(battle, args);
        if battle.phase() == phase || (battle.outcome().is_some() && phase_is_idle(battle.phase())) {
            return;
        }
    }
    tracing::warn!("Gave up waiting for {:?} in {:?}", phase, battle.phase());
}

fn phase_is_idle(phase: BattlePhase) -> bool {
    matches!(phase, BattlePhase::PlayerTurn | BattlePhase::EnemyTurn)
}

fn drain(battle: &mut Battle, args: &Args) {
    let log = battle.update(args.dt);
    if args.verbose {
        for event in log.iter().filter(|e| !e.description.is_empty()) {
            eprintln!("  [{}] {}", event.tick, event.description);
        }
    }
}

fn report(battle: &Battle, seed: u64, format: &str) {
    let outcome = match battle.outcome() {
        Some(BattleOutcome::Victory) => "Victory",
        Some(BattleOutcome::Defeat) => "Defeat",
        Some(BattleOutcome::Draw) => "Draw",
        None => "Undecided",
    };

    let result = BattleResult {
        outcome: outcome.to_string(),
        rounds: battle.round(),
        ticks: battle.tick(),
        survivors: battle
            .board()
            .combatants()
            .iter()
            .map(|c| SurvivorReport {
                name: c.name.clone(),
                faction: c.faction,
                health: c.current_health,
                max_health: c.max_health,
            })
            .collect(),
        seed,
    };

    match format {
        "text" => {
            println!("Battle Result");
            println!("=============");
            println!("Outcome: {}", result.outcome);
            println!("Rounds: {}", result.rounds);
            println!("Ticks: {}", result.ticks);
            for s in &result.survivors {
                println!("  {:<10} {:?} {}/{}", s.name, s.faction, s.health, s.max_health);
            }
            println!("Seed: {}", result.seed);
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{}', defaulting to json", other);
            }
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => tracing::error!("Could not serialize result: {}", e),
            }
        }
    }
}
