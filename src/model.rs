use crate::settings::clamp_finite;
use crate::stats::{MAX_STAGE, MIN_STAGE};
use crate::types::TypeChart;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

/// Who a move hits. Area moves hit every adjacent foe; `AllAdjacent`
/// also hits the user's partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveTarget {
    #[default]
    Single,
    AllAdjacentFoes,
    AllAdjacent,
}

impl MoveTarget {
    pub fn is_area(self) -> bool {
        !matches!(self, MoveTarget::Single)
    }

    pub fn hits_partner(self) -> bool {
        matches!(self, MoveTarget::AllAdjacent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl BaseStats {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(alias = "baseStats")]
    pub stats: BaseStats,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDef {
    pub name: String,
    #[serde(rename = "type", default)]
    pub move_type: Option<String>,
    #[serde(default)]
    pub category: Option<MoveCategory>,
    #[serde(default)]
    pub power: Option<u32>,
    /// Offensive stat override (e.g. a physical move that scales from Def).
    #[serde(default)]
    pub uses: Option<Stat>,
    #[serde(default)]
    pub target: MoveTarget,
}

impl MoveDef {
    pub fn new(name: &str, move_type: &str, category: MoveCategory, power: u32) -> Self {
        MoveDef {
            name: name.to_string(),
            move_type: Some(move_type.to_ascii_lowercase()),
            category: Some(category),
            power: Some(power),
            uses: None,
            target: MoveTarget::Single,
        }
    }

    pub fn with_target(mut self, target: MoveTarget) -> Self {
        self.target = target;
        self
    }

    pub fn is_damaging(&self) -> bool {
        self.power.unwrap_or(0) > 0
            && self.move_type.is_some()
            && matches!(
                self.category,
                Some(MoveCategory::Physical) | Some(MoveCategory::Special)
            )
    }
}

/// An assumed move used when an enemy's real moveset is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveProfile {
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: MoveCategory,
    pub power: u32,
}

fn default_stab() -> f64 {
    1.5
}

fn default_roll_min() -> f64 {
    0.85
}

fn default_roll_max() -> f64 {
    1.0
}

fn default_support() -> f64 {
    1.5
}

fn default_spread() -> f64 {
    0.75
}

fn default_intimidate_stages() -> i8 {
    -1
}

fn default_full_hp() -> f64 {
    99.9
}

fn default_iv() -> u32 {
    31
}

pub const MAX_IV: u32 = 31;
pub const MAX_EV: u32 = 252;

fn default_turn_cap() -> u32 {
    50
}

fn default_generic_power() -> u32 {
    80
}

/// Numeric constants of the game rules, loaded alongside the species and
/// move records.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    #[serde(default = "default_stab")]
    pub stab: f64,
    #[serde(default = "default_roll_min")]
    pub roll_min: f64,
    #[serde(default = "default_roll_max")]
    pub roll_max: f64,
    #[serde(default = "default_support")]
    pub support_multiplier: f64,
    #[serde(default = "default_spread")]
    pub spread_multiplier: f64,
    #[serde(default = "default_intimidate_stages")]
    pub intimidate_stages: i8,
    #[serde(default = "default_full_hp")]
    pub full_hp_threshold: f64,
    #[serde(default = "default_iv")]
    pub ally_iv: u32,
    #[serde(default)]
    pub ally_ev: u32,
    #[serde(default = "default_iv")]
    pub enemy_iv: u32,
    #[serde(default)]
    pub enemy_ev: u32,
    #[serde(default = "default_turn_cap")]
    pub turn_cap: u32,
    #[serde(default = "default_generic_power")]
    pub generic_power: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            stab: default_stab(),
            roll_min: default_roll_min(),
            roll_max: default_roll_max(),
            support_multiplier: default_support(),
            spread_multiplier: default_spread(),
            intimidate_stages: default_intimidate_stages(),
            full_hp_threshold: default_full_hp(),
            ally_iv: default_iv(),
            ally_ev: 0,
            enemy_iv: default_iv(),
            enemy_ev: 0,
            turn_cap: default_turn_cap(),
            generic_power: default_generic_power(),
        }
    }
}

impl Rules {
    /// Copy with every value clamped into the range the damage math accepts.
    /// Non-finite multipliers fall back to their defaults; a reversed roll
    /// pair is put back in order.
    pub fn validated(&self) -> Self {
        let roll_a = clamp_finite(self.roll_min, 0.0, 1.0, default_roll_min());
        let roll_b = clamp_finite(self.roll_max, 0.0, 1.0, default_roll_max());
        Rules {
            stab: clamp_finite(self.stab, 0.0, f64::MAX, default_stab()),
            roll_min: roll_a.min(roll_b),
            roll_max: roll_a.max(roll_b),
            support_multiplier: clamp_finite(
                self.support_multiplier,
                0.0,
                f64::MAX,
                default_support(),
            ),
            spread_multiplier: clamp_finite(
                self.spread_multiplier,
                0.0,
                f64::MAX,
                default_spread(),
            ),
            intimidate_stages: self.intimidate_stages.clamp(MIN_STAGE, MAX_STAGE),
            full_hp_threshold: clamp_finite(
                self.full_hp_threshold,
                0.0,
                100.0,
                default_full_hp(),
            ),
            ally_iv: self.ally_iv.min(MAX_IV),
            ally_ev: self.ally_ev.min(MAX_EV),
            enemy_iv: self.enemy_iv.min(MAX_IV),
            enemy_ev: self.enemy_ev.min(MAX_EV),
            turn_cap: self.turn_cap.max(1),
            generic_power: self.generic_power,
        }
    }
}

/// Read-only reference data consumed by every calculation.
#[derive(Debug, Clone)]
pub struct GameData {
    species: HashMap<String, Species>,
    moves: HashMap<String, MoveDef>,
    pub type_chart: TypeChart,
    pub rules: Rules,
}

impl GameData {
    pub fn new(
        species: Vec<Species>,
        moves: Vec<MoveDef>,
        type_chart: TypeChart,
        rules: Rules,
    ) -> Self {
        let species = species
            .into_iter()
            .map(|mut s| {
                let mut types: Vec<String> = Vec::with_capacity(2);
                for t in &s.types {
                    let t = t.to_ascii_lowercase();
                    if !types.contains(&t) {
                        types.push(t);
                    }
                }
                s.types = types;
                (normalize_id(&s.name), s)
            })
            .collect();
        let moves = moves
            .into_iter()
            .map(|mut m| {
                m.move_type = m.move_type.map(|t| t.to_ascii_lowercase());
                (normalize_id(&m.name), m)
            })
            .collect();
        GameData {
            species,
            moves,
            type_chart,
            rules: rules.validated(),
        }
    }

    pub fn species(&self, name: &str) -> Option<&Species> {
        self.species.get(&normalize_id(name))
    }

    pub fn move_def(&self, name: &str) -> Option<&MoveDef> {
        self.moves.get(&normalize_id(name))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDataFile {
    #[serde(default)]
    pub species: Vec<Species>,
    #[serde(default)]
    pub moves: Vec<MoveDef>,
    #[serde(default)]
    pub type_chart: Option<TypeChart>,
    #[serde(default)]
    pub rules: Rules,
}

impl From<GameDataFile> for GameData {
    fn from(file: GameDataFile) -> Self {
        let chart = file.type_chart.unwrap_or_else(TypeChart::standard);
        GameData::new(file.species, file.moves, chart, file.rules)
    }
}

fn default_tier() -> u8 {
    2
}

fn default_true() -> bool {
    true
}

fn default_pp() -> u8 {
    10
}

fn full_uses() -> u8 {
    u8::MAX
}

fn default_level() -> u32 {
    50
}

/// One entry of a friendly unit's move pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlot {
    pub name: String,
    /// 1 = spend freely, 3 = save for when nothing else works.
    #[serde(default = "default_tier")]
    pub tier: u8,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_pp")]
    pub max_uses: u8,
    #[serde(default = "full_uses")]
    pub remaining_uses: u8,
}

impl MoveSlot {
    pub fn new(name: &str, tier: u8, max_uses: u8) -> Self {
        MoveSlot {
            name: name.to_string(),
            tier,
            enabled: true,
            max_uses,
            remaining_uses: max_uses,
        }
        .normalized()
    }

    pub fn normalized(mut self) -> Self {
        self.tier = self.tier.clamp(1, 3);
        self.remaining_uses = self.remaining_uses.min(self.max_uses);
        self
    }

    pub fn is_usable(&self) -> bool {
        self.enabled && self.remaining_uses > 0
    }
}

/// A friendly unit from the roster together with its PP ledger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attacker {
    pub id: String,
    pub species: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
}

impl Attacker {
    pub fn normalized(mut self) -> Self {
        self.moves = self.moves.into_iter().map(MoveSlot::normalized).collect();
        self
    }

    pub fn move_slot(&self, name: &str) -> Option<&MoveSlot> {
        let id = normalize_id(name);
        self.moves.iter().find(|m| normalize_id(&m.name) == id)
    }

    pub fn move_slot_mut(&mut self, name: &str) -> Option<&mut MoveSlot> {
        let id = normalize_id(name);
        self.moves.iter_mut().find(|m| normalize_id(&m.name) == id)
    }
}

/// One enemy instance of a wave. Duplicated species carry distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemySlot {
    pub key: String,
    pub species: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Known moveset; empty means "assume generic threat profiles".
    #[serde(default)]
    pub moves: Vec<String>,
}

pub fn normalize_id(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
