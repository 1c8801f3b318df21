pub mod battle;
pub mod battle_logger;
pub mod combatant;
pub mod conditions;
pub mod damage;
pub mod ledger;
pub mod model;
pub mod selector;
pub mod settings;
pub mod solver;
pub mod stats;
pub mod types;

use crate::ledger::WaveProgress;
use crate::model::{Attacker, EnemySlot, GameData, GameDataFile};
use crate::settings::CalcSettings;
use crate::solver::{solve_wave, RankedSchedule, SolveConstraints};
use anyhow::Context;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};

/// One wave to solve: the enemies to clear and the roster available for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveFile {
    pub enemies: Vec<EnemySlot>,
    pub attackers: Vec<Attacker>,
    #[serde(default)]
    pub settings: CalcSettings,
    #[serde(default)]
    pub constraints: SolveConstraints,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub data_path: PathBuf,
    pub wave_path: PathBuf,
    pub slack: Option<f64>,
    pub max_variants: Option<usize>,
    pub output_path: Option<PathBuf>,
    pub verbose: bool,
}

pub fn load_game_data(path: &Path) -> anyhow::Result<GameData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read game data at {}", path.display()))?;
    let parsed: GameDataFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    if parsed.species.is_empty() {
        anyhow::bail!("{} lists no species", path.display());
    }
    Ok(parsed.into())
}

pub fn load_wave(path: &Path) -> anyhow::Result<WaveFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read wave file at {}", path.display()))?;
    let parsed: WaveFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    Ok(parsed)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let data = load_game_data(&opts.data_path)?;
    let wave = load_wave(&opts.wave_path)?;
    let mut constraints = wave.constraints.clone();
    if let Some(slack) = opts.slack {
        constraints.slack = slack;
    }
    if let Some(max_variants) = opts.max_variants {
        constraints.max_variants_per_matching = max_variants;
    }

    let ranked = solve_wave(
        &data,
        &wave.enemies,
        &wave.attackers,
        &wave.settings,
        &constraints,
    )
    .with_context(|| format!("Failed to solve {}", opts.wave_path.display()))?;

    if ranked.is_empty() {
        println!("No schedule found");
        return Ok(());
    }
    for entry in &ranked {
        print_schedule(entry);
    }

    if let Some(path) = &opts.output_path {
        let mut progress =
            WaveProgress::new(wave.attackers.clone()).with_turn_cap(constraints.turn_cap);
        let fights = progress.activate(&data, &wave.settings, &ranked[0].schedule);
        let out = json!({
            "schedules": ranked,
            "activation": fights,
        });
        let text = serde_json::to_string_pretty(&out)?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {} schedules to {}", ranked.len(), path.display());
    }
    Ok(())
}

fn print_schedule(entry: &RankedSchedule) {
    println!(
        "#{} won {}/{} avg tier {:.2} (static {:.2}, one-shots {}) pp {}",
        entry.rank,
        entry.simulated.fights_won,
        entry.schedule.fights.len(),
        entry.simulated.average_tier,
        entry.score.average_tier(),
        entry.score.one_shots,
        entry.simulated.pp_used,
    );
    for (idx, fight) in entry.schedule.fights.iter().enumerate() {
        let plan: Vec<String> = fight
            .planned
            .iter()
            .map(|p| {
                format!(
                    "{} -> {}: {} (t{})",
                    p.attacker,
                    p.defender,
                    p.move_name.as_deref().unwrap_or("-"),
                    p.tier
                )
            })
            .collect();
        println!("  fight {}: {}", idx + 1, plan.join(", "));
    }
}
