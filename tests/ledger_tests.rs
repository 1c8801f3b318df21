mod common;

use common::{data, dummy, smasher};
use pokemon_wave_solver::battle::FightStatus;
use pokemon_wave_solver::ledger::WaveProgress;
use pokemon_wave_solver::model::EnemySlot;
use pokemon_wave_solver::settings::CalcSettings;
use pokemon_wave_solver::solver::{solve_wave, RankedSchedule, SolveConstraints};

fn wave() -> Vec<EnemySlot> {
    (1..=4).map(|i| dummy(&format!("w{i}"))).collect()
}

fn ranked() -> Vec<RankedSchedule> {
    let constraints = SolveConstraints {
        max_combos: 16,
        ..SolveConstraints::default()
    };
    solve_wave(
        &data(),
        &wave(),
        &[smasher("a"), smasher("b")],
        &CalcSettings::default(),
        &constraints,
    )
    .expect("solvable")
}

fn smash_pp(progress: &WaveProgress, id: &str) -> u8 {
    progress
        .roster()
        .iter()
        .find(|unit| unit.id == id)
        .and_then(|unit| unit.move_slot("Smash"))
        .map(|slot| slot.remaining_uses)
        .unwrap_or(0)
}

#[test]
fn activation_records_pp_and_claims() {
    let data = data();
    let settings = CalcSettings::default();
    let ranked = ranked();
    let mut progress = WaveProgress::new(vec![smasher("a"), smasher("b")]);

    let entries = progress.activate(&data, &settings, &ranked[0].schedule).to_vec();
    assert_eq!(entries.len(), 4);
    for entry in &entries {
        assert_eq!(entry.status, FightStatus::Won);
        assert_eq!(entry.pp_deltas.iter().map(|d| d.used as u32).sum::<u32>(), 2);
        assert!(!entry.log.is_empty());
    }
    let claimed: Vec<&str> = progress.claimed().iter().map(String::as_str).collect();
    assert_eq!(claimed, vec!["w1", "w2", "w3", "w4"]);
    assert_eq!(smash_pp(&progress, "a"), 16);
    assert_eq!(smash_pp(&progress, "b"), 16);
}

#[test]
fn undo_restores_everything() {
    let data = data();
    let settings = CalcSettings::default();
    let ranked = ranked();
    let mut progress = WaveProgress::new(vec![smasher("a"), smasher("b")]);
    progress.activate(&data, &settings, &ranked[0].schedule);

    let last = progress.undo_last().expect("an entry");
    assert_eq!(progress.entries().len(), 3);
    for key in &last.claimed {
        assert!(!progress.is_claimed(key));
    }
    while progress.undo_last().is_some() {}
    assert!(progress.claimed().is_empty());
    assert_eq!(smash_pp(&progress, "a"), 20);
    assert_eq!(smash_pp(&progress, "b"), 20);
}

#[test]
fn cycling_never_double_spends() {
    let data = data();
    let settings = CalcSettings::default();
    let ranked = ranked();
    let mut progress = WaveProgress::new(vec![smasher("a"), smasher("b")]);

    assert!(progress.cycle_to(&data, &settings, &ranked, 0).is_some());
    assert_eq!(progress.cycle_index(), Some(0));
    let second = 1.min(ranked.len() - 1);
    assert!(progress.cycle_next(&data, &settings, &ranked).is_some());
    assert_eq!(progress.cycle_index(), Some(second));

    assert_eq!(progress.entries().len(), 4);
    assert_eq!(smash_pp(&progress, "a"), 16);
    assert_eq!(smash_pp(&progress, "b"), 16);
    assert!(progress.cycle_to(&data, &settings, &ranked, ranked.len()).is_none());
}
