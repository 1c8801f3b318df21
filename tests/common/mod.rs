#![allow(dead_code)]

use pokemon_wave_solver::model::{
    Attacker, BaseStats, EnemySlot, GameData, MoveCategory, MoveDef, MoveSlot, MoveTarget, Rules,
    Species,
};
use pokemon_wave_solver::types::TypeChart;

fn species(name: &str, types: &[&str], stats: [u32; 6]) -> Species {
    let [hp, atk, def, spa, spd, spe] = stats;
    Species {
        name: name.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
        stats: BaseStats {
            hp,
            atk,
            def,
            spa,
            spd,
            spe,
        },
    }
}

/// Enemies use IV 0 unless a test passes its own rules.
pub fn rules() -> Rules {
    Rules {
        enemy_iv: 0,
        ..Rules::default()
    }
}

pub fn data() -> GameData {
    data_with_rules(rules())
}

pub fn data_with_rules(rules: Rules) -> GameData {
    let species = vec![
        species("Striker", &["Normal"], [80, 100, 80, 60, 80, 100]),
        species("Wall", &["Normal"], [80, 60, 80, 60, 80, 50]),
        species("Twin", &["Fighting"], [50, 150, 50, 50, 50, 80]),
        species("Frail", &["Normal"], [1, 50, 5, 50, 5, 30]),
        species("Phantom", &["Ghost"], [60, 60, 60, 60, 60, 60]),
        species("Mage", &["Psychic"], [70, 40, 60, 130, 90, 90]),
    ];
    let growl = MoveDef {
        name: "Growl".to_string(),
        move_type: Some("normal".to_string()),
        category: Some(MoveCategory::Status),
        power: None,
        uses: None,
        target: MoveTarget::AllAdjacentFoes,
    };
    let moves = vec![
        MoveDef::new("Tackle", "normal", MoveCategory::Physical, 80),
        MoveDef::new("Alpha Strike", "normal", MoveCategory::Physical, 50),
        MoveDef::new("Beta Strike", "normal", MoveCategory::Physical, 50),
        MoveDef::new("Stone Edge", "rock", MoveCategory::Physical, 120),
        MoveDef::new("Smash", "fighting", MoveCategory::Physical, 150),
        MoveDef::new("Chop", "fighting", MoveCategory::Physical, 65),
        MoveDef::new("Psybeam", "psychic", MoveCategory::Special, 65),
        MoveDef::new("Shadow Ball", "ghost", MoveCategory::Special, 80),
        MoveDef::new("Quake", "ground", MoveCategory::Physical, 60)
            .with_target(MoveTarget::AllAdjacentFoes),
        MoveDef::new("Earthquake", "ground", MoveCategory::Physical, 100)
            .with_target(MoveTarget::AllAdjacent),
        growl,
    ];
    GameData::new(species, moves, TypeChart::standard(), rules)
}

/// `moves` entries are `(name, tier, max_uses)`.
pub fn attacker(id: &str, species: &str, moves: &[(&str, u8, u8)]) -> Attacker {
    Attacker {
        id: id.to_string(),
        species: species.to_string(),
        level: 50,
        tags: Vec::new(),
        moves: moves
            .iter()
            .map(|(name, tier, uses)| MoveSlot::new(name, *tier, *uses))
            .collect(),
    }
}

pub fn enemy(key: &str, species: &str, moves: &[&str]) -> EnemySlot {
    EnemySlot {
        key: key.to_string(),
        species: species.to_string(),
        level: 50,
        tags: Vec::new(),
        moves: moves.iter().map(|m| m.to_string()).collect(),
    }
}

/// An enemy that never deals damage.
pub fn dummy(key: &str) -> EnemySlot {
    enemy(key, "Wall", &["Growl"])
}

pub fn with_tags(mut slot: EnemySlot, tags: &[&str]) -> EnemySlot {
    slot.tags = tags.iter().map(|t| t.to_string()).collect();
    slot
}

pub fn smasher(id: &str) -> Attacker {
    attacker(id, "Twin", &[("Smash", 1, 20)])
}

/// Lands a tier-2 one-shot on `Phantom` and cannot touch `Wall`.
pub fn ghost_hunter(id: &str) -> Attacker {
    attacker(id, "Mage", &[("Shadow Ball", 2, 20)])
}
