//! Skirmish headless harness
//!
//! Runs the combat simulation with a scripted bot at the controls and prints
//! a summary. Useful for soak runs and for checking that a seed replays the
//! same way.
//!
//! Run with: cargo run -p skirmish_sim --bin skirmish -- --seed 42 --seconds 120
//!
//! Flags:
//! - `--config <path>`  TOML config file
//! - `--seed <n>`       RNG seed (overrides the config and `SKIRMISH_SEED`)
//! - `--seconds <f>`    Simulated time limit (default 300)
//! - `--level <n>`      Starting level
//! - `--json`           Print the summary as JSON

use glam::{Vec2, Vec3};
use serde::Serialize;
use skirmish_ai::has_line_of_sight;
use skirmish_combat::Combatant;
use skirmish_sim::{
    CombatEvent, CombatSimulation, EventCollector, GameState, InputState, Shooter, SimConfig,
};

const TICK: f32 = 1.0 / 60.0;

/// Bot opens fire inside this range
const ENGAGE_RANGE: f32 = 40.0;
/// Bot walks toward its target beyond this range
const CLOSE_RANGE: f32 = 15.0;
/// Aim point above an enemy's feet
const AIM_HEIGHT: f32 = 1.5;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    seed: Option<u64>,
    seconds: Option<f32>,
    level: Option<u32>,
    json: bool,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = Args::default();
        let mut iter = std::env::args().skip(1);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => args.config = Some(value(&mut iter, &arg)?),
                "--seed" => args.seed = Some(parse_value(&mut iter, &arg)?),
                "--seconds" => args.seconds = Some(parse_value(&mut iter, &arg)?),
                "--level" => args.level = Some(parse_value(&mut iter, &arg)?),
                "--json" => args.json = true,
                other => return Err(format!("Unknown argument: {}", other)),
            }
        }
        Ok(args)
    }
}

fn value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    iter.next().ok_or_else(|| format!("{} needs a value", flag))
}

fn parse_value<T>(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = value(iter, flag)?;
    raw.parse()
        .map_err(|e| format!("Bad value for {}: {:?} ({})", flag, raw, e))
}

/// End-of-run report
#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    levels_completed: u32,
    final_level: u32,
    final_state: String,
    kills: u32,
    deaths: u32,
    shots: u32,
    hits: u32,
    elapsed: f32,
}

impl Summary {
    fn record(&mut self, events: &EventCollector) {
        for event in events.iter() {
            match event {
                CombatEvent::ShotFired {
                    shooter: Shooter::Player(_),
                    ..
                } => self.shots += 1,
                CombatEvent::EnemyHit { .. } => self.hits += 1,
                CombatEvent::EnemyKilled { .. } => self.kills += 1,
                CombatEvent::PlayerDied => self.deaths += 1,
                _ => {}
            }
        }
    }

    fn print(&self) {
        println!();
        println!("Skirmish run (seed {})", self.seed);
        println!("  Levels completed: {}", self.levels_completed);
        println!("  Final level:      {} ({})", self.final_level, self.final_state);
        println!("  Kills:            {}", self.kills);
        println!("  Deaths:           {}", self.deaths);
        let accuracy = if self.shots > 0 {
            self.hits as f32 / self.shots as f32 * 100.0
        } else {
            0.0
        };
        println!(
            "  Shots / hits:     {} / {} ({:.1}%)",
            self.shots, self.hits, accuracy
        );
        println!("  Simulated time:   {:.1}s", self.elapsed);
    }
}

/// Aim at the nearest living enemy, shoot when it is visible, close the
/// distance when it is far
fn drive_bot(sim: &mut CombatSimulation, input: &mut InputState) {
    input.clear();

    let eye = sim.player().position();
    let target = sim
        .enemies()
        .iter()
        .filter(|e| e.is_alive())
        .map(|e| e.position() + Vec3::Y * AIM_HEIGHT)
        .min_by(|a, b| a.distance_squared(eye).total_cmp(&b.distance_squared(eye)));

    let Some(target) = target else {
        return;
    };
    let distance = target.distance(eye);

    sim.player_mut().look_at(target);

    let weapon = sim.player().current_weapon();
    if weapon.current_ammo() == 0 && !weapon.is_reloading() {
        input.reload = true;
    } else if distance <= ENGAGE_RANGE && has_line_of_sight(sim.registry(), eye, target, 1.0) {
        input.fire = true;
    }

    if distance > CLOSE_RANGE {
        input.move_axes = Vec2::Y;
    }
}

fn run(args: Args) -> Result<Summary, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => {
            let mut config = SimConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let seconds = args.seconds.unwrap_or(300.0);
    let mut summary = Summary {
        seed: config.seed,
        ..Default::default()
    };

    let mut sim = CombatSimulation::new(config)?;
    if let Some(level) = args.level {
        sim.start_level(level)?;
    }
    let mut input = InputState::new();

    let max_ticks = (seconds / TICK).ceil() as u64;
    let mut ticks = 0;
    while ticks < max_ticks {
        drive_bot(&mut sim, &mut input);
        summary.record(sim.tick(&mut input, TICK));
        ticks += 1;

        match sim.state() {
            GameState::Playing => {}
            GameState::PlayerDead => {
                sim.respawn();
            }
            GameState::LevelComplete => {
                summary.levels_completed += 1;
                sim.advance_level()?;
            }
            GameState::GameComplete => break,
        }
    }

    summary.final_level = sim.level();
    summary.final_state = sim.state().to_string();
    summary.elapsed = ticks as f32 * TICK;
    log::info!("Run finished after {} ticks", ticks);
    Ok(summary)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Usage: skirmish [--config <path>] [--seed <n>] [--seconds <f>] [--level <n>] [--json]"
            );
            std::process::exit(2);
        }
    };
    let json = args.json;

    match run(args) {
        Ok(summary) if json => match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                log::error!("Failed to encode summary: {}", e);
                std::process::exit(1);
            }
        },
        Ok(summary) => summary.print(),
        Err(e) => {
            log::error!("Run failed: {}", e);
            std::process::exit(1);
        }
    }
}
