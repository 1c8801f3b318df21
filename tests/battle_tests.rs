mod common;

use common::{attacker, data, data_with_rules, dummy, enemy, smasher, with_tags};
use pokemon_wave_solver::battle::{
    FightStatus, ManualAction, PendingReinforcement, Side, Simulator,
};
use pokemon_wave_solver::combatant::Combatant;
use pokemon_wave_solver::damage::compute_damage_range;
use pokemon_wave_solver::model::{Attacker, EnemySlot, Rules};
use pokemon_wave_solver::settings::CalcSettings;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn assert_hp(actual: Option<f64>, remaining: u32, max_hp: u32) {
    let expected = remaining as f64 * 100.0 / max_hp as f64;
    let actual = actual.expect("combatant exists");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}%, got {actual}%"
    );
}

#[test]
fn area_move_into_two_targets_is_reduced() {
    let data = data();
    let settings = CalcSettings::default();
    let quaker = attacker("s", "Striker", &[("Quake", 1, 5)]);
    let idle = attacker("p", "Wall", &[]);
    let sim = Simulator::new(&data, &settings);
    let mut state = sim.init_fight("spread", &[quaker.clone(), idle], &[dummy("w1"), dummy("w2")]);
    sim.step_turn(&mut state);

    let hit = compute_damage_range(
        &data,
        &Combatant::from_attacker(&quaker, &data),
        &Combatant::from_enemy(&dummy("w1"), &data),
        "Quake",
        &settings,
    )
    .expect("damaging");
    assert_eq!(hit.min, 33);
    let applied = (hit.min as f64 * data.rules.spread_multiplier).floor() as u32;
    assert_eq!(applied, 24);
    assert_hp(state.hp(Side::Defenders, "w1"), 140 - applied, 140);
    assert_hp(state.hp(Side::Defenders, "w2"), 140 - applied, 140);
    assert_eq!(state.status(), FightStatus::Active);
}

#[test]
fn area_move_into_one_target_is_full_power() {
    let data = data();
    let settings = CalcSettings::default();
    let quaker = attacker("s", "Striker", &[("Quake", 1, 5)]);
    let idle = attacker("p", "Wall", &[]);
    let sim = Simulator::new(&data, &settings);
    let mut state = sim.init_fight("single", &[quaker, idle], &[dummy("w1")]);
    sim.step_turn(&mut state);
    assert_hp(state.hp(Side::Defenders, "w1"), 140 - 33, 140);
}

#[test]
fn speed_ties_follow_the_configured_side() {
    let data = data_with_rules(Rules::default());
    let fight = |settings: CalcSettings| {
        let sim = Simulator::new(&data, &settings);
        let mut state = sim.init_fight("tie", &[smasher("a")], &[enemy("e", "Twin", &["Smash"])]);
        sim.step_turn(&mut state);
        state.status()
    };
    assert_eq!(fight(CalcSettings::default()), FightStatus::Won);
    let enemy_first = CalcSettings {
        enemy_first_on_speed_tie: true,
        ..CalcSettings::default()
    };
    assert_eq!(fight(enemy_first), FightStatus::Lost);
}

#[test]
fn faster_generic_threat_wins() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let frail = attacker("f", "Frail", &[("Tackle", 1, 5)]);
    let mut state = sim.init_fight("threat", &[frail], &[enemy("e", "Twin", &[])]);
    sim.step_turn(&mut state);
    assert_eq!(state.status(), FightStatus::Lost);
    assert_eq!(state.actions().len(), 1);
    assert_eq!(state.actions()[0].side, Side::Defenders);
    assert_eq!(state.actions()[0].move_name, "fighting physical 80");
    assert_eq!(state.log().log_lines().last().map(String::as_str), Some("|win|defenders"));
}

#[test]
fn reinforcement_waits_for_a_choice() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let mut state = sim.init_fight(
        "bench",
        &[smasher("t")],
        &[dummy("w1"), dummy("w2"), dummy("w3")],
    );
    assert_eq!(state.bench(Side::Defenders), ["w3".to_string()]);

    sim.step_turn(&mut state);
    assert_eq!(state.hp(Side::Defenders, "w1"), Some(0.0));
    assert_eq!(
        state.pending(),
        Some(PendingReinforcement {
            side: Side::Defenders,
            slot: 0
        })
    );

    sim.step_turn(&mut state);
    assert_eq!(state.turn(), 1);

    assert!(!sim.choose_reinforcement(&mut state, Side::Defenders, 1, "w3"));
    assert!(!sim.choose_reinforcement(&mut state, Side::Defenders, 0, "w9"));
    assert!(sim.choose_reinforcement(&mut state, Side::Defenders, 0, "w3"));
    assert_eq!(state.active(Side::Defenders)[0].as_deref(), Some("w3"));
    assert!(state.pending().is_none());

    sim.run_to_completion(&mut state);
    assert_eq!(state.status(), FightStatus::Won);
    assert_eq!(state.turn(), 3);
    let smash = state.attacker_moves("t").expect("attacker present");
    assert_eq!(smash[0].remaining_uses, 17);
}

#[test]
fn full_hp_damage_reduction_survives_once() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let mut state = sim.init_fight(
        "sturdy",
        &[smasher("t")],
        &[with_tags(dummy("w"), &["sturdy"])],
    );
    sim.step_turn(&mut state);
    assert_hp(state.hp(Side::Defenders, "w"), 1, 140);
    assert!(state
        .log()
        .log_lines()
        .iter()
        .any(|line| line == "|-endure|p2a: w"));

    sim.step_turn(&mut state);
    assert_eq!(state.status(), FightStatus::Won);
    assert_eq!(state.turn(), 2);
}

#[test]
fn coordinated_turn_breaks_the_protected_defender() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let mut state = sim.init_fight(
        "protected",
        &[smasher("t1"), smasher("t2")],
        &[with_tags(dummy("w1"), &["sturdy"]), dummy("w2")],
    );
    sim.step_turn(&mut state);
    assert_eq!(state.hp(Side::Defenders, "w2"), Some(0.0));
    assert_hp(state.hp(Side::Defenders, "w1"), 1, 140);

    sim.step_turn(&mut state);
    assert_eq!(state.status(), FightStatus::Won);
}

#[test]
fn partner_fainting_area_move_is_refused() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let quaker = attacker("s", "Striker", &[("Earthquake", 1, 5)]);
    let frail = attacker("f", "Frail", &[]);
    let mut state = sim.init_fight("refuse", &[quaker, frail], &[dummy("w1"), dummy("w2")]);
    sim.step_turn(&mut state);

    assert_eq!(state.status(), FightStatus::Stalled);
    assert_eq!(state.turn(), 1);
    assert!(state.actions().is_empty());
    let lines = state.log().log_lines();
    assert!(lines.iter().any(|l| l == "|cant|p1a: s"));
    assert_eq!(lines.last().map(String::as_str), Some("|stall|"));
}

#[test]
fn ally_immunity_skips_the_partner() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let quaker = attacker("s", "Striker", &[("Earthquake", 1, 5)]);
    let mut frail = attacker("f", "Frail", &[]);
    frail.tags = vec!["Telepathy".to_string()];
    let mut state = sim.init_fight("immune", &[quaker, frail], &[dummy("w1"), dummy("w2")]);
    sim.step_turn(&mut state);

    assert_eq!(state.actions().len(), 1);
    assert_eq!(state.actions()[0].targets, vec!["w1".to_string(), "w2".to_string()]);
    assert_eq!(state.hp(Side::Attackers, "f"), Some(100.0));
    assert_hp(state.hp(Side::Defenders, "w1"), 140 - 40, 140);
}

#[test]
fn friendly_fire_allowance_hits_the_partner() {
    let data = data();
    let settings = CalcSettings {
        allow_friendly_fire: true,
        ..CalcSettings::default()
    };
    let sim = Simulator::new(&data, &settings);
    let quaker = attacker("s", "Striker", &[("Earthquake", 1, 5)]);
    let frail = attacker("f", "Frail", &[]);
    let mut state = sim.init_fight("ff", &[quaker, frail], &[dummy("w1"), dummy("w2")]);
    sim.step_turn(&mut state);

    assert_eq!(state.hp(Side::Attackers, "f"), Some(0.0));
    assert_eq!(state.active(Side::Attackers)[1], None);
    assert_eq!(state.status(), FightStatus::Active);
}

#[test]
fn manual_override_applies_until_its_pp_runs_out() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let twin = attacker("t", "Twin", &[("Smash", 1, 5), ("Alpha Strike", 3, 1)]);
    let mut state = sim.init_fight("manual", &[twin], &[dummy("w1"), dummy("w2")]);
    state.set_override(
        "t",
        ManualAction {
            move_name: "Alpha Strike".to_string(),
            target: Some("w2".to_string()),
        },
    );

    sim.step_turn(&mut state);
    assert_eq!(state.actions()[0].move_name, "Alpha Strike");
    assert_eq!(state.actions()[0].targets, vec!["w2".to_string()]);
    assert_eq!(state.actions()[0].tier, Some(3));

    sim.step_turn(&mut state);
    assert_eq!(state.actions()[1].move_name, "Smash");
}

#[test]
fn turn_cap_ends_in_a_stall() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let striker = attacker("s", "Striker", &[("Alpha Strike", 1, 20)]);
    let mut state = sim.init_fight("cap", &[striker], &[dummy("w")]);
    state.set_turn_cap(2);
    sim.run_to_completion(&mut state);
    assert_eq!(state.status(), FightStatus::Stalled);
    assert_eq!(state.turn(), 2);
    assert_eq!(state.log().to_json()["fight"], "cap");
}

#[test]
fn no_side_left_is_won_immediately() {
    let data = data();
    let settings = CalcSettings::default();
    let sim = Simulator::new(&data, &settings);
    let state = sim.init_fight("empty", &[smasher("t")], &[]);
    assert_eq!(state.status(), FightStatus::Won);
}

fn random_attacker(rng: &mut SmallRng, id: &str) -> Attacker {
    let species = ["Striker", "Twin", "Wall", "Mage", "Frail"];
    let pool = [
        "Tackle",
        "Smash",
        "Chop",
        "Quake",
        "Earthquake",
        "Psybeam",
        "Stone Edge",
        "Growl",
    ];
    let count = rng.gen_range(0..=4);
    let moves: Vec<(&str, u8, u8)> = pool
        .choose_multiple(rng, count)
        .map(|name| (*name, rng.gen_range(1..=3), rng.gen_range(0..=8)))
        .collect();
    let mut unit = attacker(id, species.choose(rng).copied().unwrap_or("Wall"), &moves);
    if rng.gen_bool(0.3) {
        unit.tags.push("telepathy".to_string());
    }
    unit
}

fn random_enemy(rng: &mut SmallRng, key: &str) -> EnemySlot {
    let species = ["Striker", "Twin", "Wall", "Mage", "Phantom"];
    let pool = ["Tackle", "Smash", "Psybeam", "Quake", "Growl"];
    let count = rng.gen_range(0..=2);
    let moves: Vec<&str> = pool.choose_multiple(rng, count).copied().collect();
    let mut slot = enemy(key, species.choose(rng).copied().unwrap_or("Wall"), &moves);
    if rng.gen_bool(0.3) {
        slot.tags.push("sturdy".to_string());
    }
    slot
}

#[test]
fn random_fights_always_terminate() {
    let data = data();
    let mut rng = SmallRng::seed_from_u64(42);
    for round in 0..60 {
        let settings = CalcSettings {
            allow_friendly_fire: rng.gen_bool(0.5),
            enemy_first_on_speed_tie: rng.gen_bool(0.5),
            spread_targets: rng.gen_bool(0.5),
            ..CalcSettings::default()
        };
        let sim = Simulator::new(&data, &settings);
        let attackers: Vec<Attacker> = (0..rng.gen_range(1..=3))
            .map(|i| random_attacker(&mut rng, &format!("a{i}")))
            .collect();
        let enemies: Vec<EnemySlot> = (0..rng.gen_range(1..=4))
            .map(|i| random_enemy(&mut rng, &format!("e{i}")))
            .collect();
        let mut state = sim.init_fight(&format!("round-{round}"), &attackers, &enemies);
        for _ in 0..200 {
            if state.status().is_terminal() {
                break;
            }
            if state.pending().is_some() {
                sim.auto_reinforce(&mut state);
            } else {
                sim.step_turn(&mut state);
            }
        }
        assert!(state.status().is_terminal(), "round {round} did not finish");
        assert!(state.turn() <= state.turn_cap());
    }
}
