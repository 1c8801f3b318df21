use crate::model::Stat;
use serde::{Deserialize, Serialize};

pub const MIN_STAGE: i8 = -6;
pub const MAX_STAGE: i8 = 6;

// (numerator, denominator) for stages -6..=+6.
const STAGE_TABLE: [(u32, u32); 13] = [
    (2, 8),
    (2, 7),
    (2, 6),
    (2, 5),
    (2, 4),
    (2, 3),
    (2, 2),
    (3, 2),
    (4, 2),
    (5, 2),
    (6, 2),
    (7, 2),
    (8, 2),
];

/// Saturates at `u32::MAX` instead of overflowing on absurd inputs.
pub fn effective_stat(base: u32, level: u32, iv: u32, ev: u32, is_hp: bool) -> u32 {
    let (base, level, iv, ev) = (base as u64, level as u64, iv as u64, ev as u64);
    let inner = ((2 * base + iv + ev / 4) * level) / 100;
    let stat = if is_hp {
        inner + level + 10
    } else {
        inner + 5
    };
    saturate(stat)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

pub fn clamp_stage(stage: i32) -> i8 {
    stage.clamp(MIN_STAGE as i32, MAX_STAGE as i32) as i8
}

pub fn stage_multiplier(stage: i32) -> (u32, u32) {
    let idx = (clamp_stage(stage) - MIN_STAGE) as usize;
    STAGE_TABLE.get(idx).copied().unwrap_or((1, 1))
}

pub fn apply_stage(stat: u32, stage: i32) -> u32 {
    let (num, den) = stage_multiplier(stage);
    saturate(stat as u64 * num as u64 / den as u64)
}

/// Stat stages of one combatant. HP has no stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StageSet {
    #[serde(default)]
    atk: i8,
    #[serde(default)]
    def: i8,
    #[serde(default)]
    spa: i8,
    #[serde(default)]
    spd: i8,
    #[serde(default)]
    spe: i8,
}

impl StageSet {
    pub fn get(&self, stat: Stat) -> i8 {
        let raw = match stat {
            Stat::Hp => 0,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        };
        clamp_stage(raw as i32)
    }

    pub fn set(&mut self, stat: Stat, stage: i32) {
        let stage = clamp_stage(stage);
        match stat {
            Stat::Hp => {}
            Stat::Atk => self.atk = stage,
            Stat::Def => self.def = stage,
            Stat::Spa => self.spa = stage,
            Stat::Spd => self.spd = stage,
            Stat::Spe => self.spe = stage,
        }
    }

    pub fn with(mut self, stat: Stat, stage: i32) -> Self {
        self.set(stat, stage);
        self
    }
}
