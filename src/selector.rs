use crate::combatant::Combatant;
use crate::damage::{
    compute_damage_range, compute_generic_damage_range, generic_move_name, DamageError,
    DamageResult,
};
use crate::model::{GameData, MoveCategory, MoveProfile, MoveSlot, MoveTarget, Stat};
use crate::settings::CalcSettings;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMove {
    pub name: String,
    pub tier: u8,
    pub result: DamageResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub best: Option<ScoredMove>,
    pub all: Vec<ScoredMove>,
}

/// Usable entries of a move pool in tier, then name, order.
pub fn usable_moves(pool: &[MoveSlot]) -> Vec<&MoveSlot> {
    let mut moves: Vec<&MoveSlot> = pool.iter().filter(|m| m.is_usable()).collect();
    moves.sort_by(|a, b| a.tier.cmp(&b.tier).then_with(|| a.name.cmp(&b.name)));
    moves
}

pub fn choose_best_move(
    data: &GameData,
    attacker: &Combatant,
    defender: &Combatant,
    pool: &[MoveSlot],
    settings: &CalcSettings,
) -> Selection {
    let all: Vec<ScoredMove> = usable_moves(pool)
        .into_iter()
        .filter_map(|slot| {
            match compute_damage_range(data, attacker, defender, &slot.name, settings) {
                Ok(result) if result.deals_damage() => Some(ScoredMove {
                    name: slot.name.clone(),
                    tier: slot.tier,
                    result,
                }),
                Ok(_) => None,
                Err(err) => {
                    log::trace!("skipping {} for {}: {err}", slot.name, attacker.id);
                    None
                }
            }
        })
        .collect();
    let best = pick_best(&all, settings.stab_bonus).cloned();
    Selection { best, all }
}

pub fn pick_best(all: &[ScoredMove], stab_bonus: f64) -> Option<&ScoredMove> {
    all.iter().min_by(|a, b| preference(a, b, stab_bonus))
}

/// Total order of candidate moves, best first.
///
/// One-shots beat everything; among one-shots the lowest tier wins, then
/// the roll closest to exactly 100%, STAB, effectiveness, raw damage and
/// name. Without a one-shot the lowest tier wins, then
/// `min_pct + stab_bonus * stab`, raw damage and name.
pub fn preference(a: &ScoredMove, b: &ScoredMove, stab_bonus: f64) -> Ordering {
    b.result
        .one_shot
        .cmp(&a.result.one_shot)
        .then_with(|| a.tier.cmp(&b.tier))
        .then_with(|| {
            if a.result.one_shot {
                one_shot_order(a, b)
            } else {
                damage_order(a, b, stab_bonus)
            }
        })
}

fn one_shot_order(a: &ScoredMove, b: &ScoredMove) -> Ordering {
    let overkill_a = (a.result.min_pct - 100.0).abs();
    let overkill_b = (b.result.min_pct - 100.0).abs();
    overkill_a
        .total_cmp(&overkill_b)
        .then_with(|| b.result.stab.cmp(&a.result.stab))
        .then_with(|| b.result.effectiveness.total_cmp(&a.result.effectiveness))
        .then_with(|| b.result.min_pct.total_cmp(&a.result.min_pct))
        .then_with(|| a.name.cmp(&b.name))
}

fn damage_order(a: &ScoredMove, b: &ScoredMove, stab_bonus: f64) -> Ordering {
    let score = |m: &ScoredMove| m.result.min_pct + if m.result.stab { stab_bonus } else { 0.0 };
    score(b)
        .total_cmp(&score(a))
        .then_with(|| b.result.min_pct.total_cmp(&a.result.min_pct))
        .then_with(|| a.name.cmp(&b.name))
}

/// Assumed moves for an enemy without a known moveset: one per own type,
/// scaling from whichever offensive stat is higher.
pub fn generic_threat_profiles(data: &GameData, enemy: &Combatant) -> Vec<MoveProfile> {
    let (Some(atk), Some(spa)) = (enemy.stat(data, Stat::Atk), enemy.stat(data, Stat::Spa)) else {
        return Vec::new();
    };
    let category = if atk >= spa {
        MoveCategory::Physical
    } else {
        MoveCategory::Special
    };
    enemy
        .types(data)
        .iter()
        .map(|t| MoveProfile {
            move_type: t.clone(),
            category,
            power: data.rules.generic_power,
        })
        .collect()
}

/// A move an enemy may use: a real move from the data set or an assumed
/// profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MoveRef {
    Named(String),
    Generic(MoveProfile),
}

impl MoveRef {
    pub fn name(&self) -> String {
        match self {
            MoveRef::Named(name) => name.clone(),
            MoveRef::Generic(profile) => generic_move_name(profile),
        }
    }

    pub fn target_kind(&self, data: &GameData) -> MoveTarget {
        match self {
            MoveRef::Named(name) => data
                .move_def(name)
                .map(|m| m.target)
                .unwrap_or_default(),
            MoveRef::Generic(_) => MoveTarget::Single,
        }
    }

    pub fn damage(
        &self,
        data: &GameData,
        attacker: &Combatant,
        defender: &Combatant,
        settings: &CalcSettings,
    ) -> Result<DamageResult, DamageError> {
        match self {
            MoveRef::Named(name) => compute_damage_range(data, attacker, defender, name, settings),
            MoveRef::Generic(profile) => {
                compute_generic_damage_range(data, attacker, defender, profile, settings)
            }
        }
    }
}

/// The moves an enemy is assumed to have.
pub fn threat_moves(data: &GameData, enemy: &Combatant, known_moves: &[String]) -> Vec<MoveRef> {
    if known_moves.is_empty() {
        generic_threat_profiles(data, enemy)
            .into_iter()
            .map(MoveRef::Generic)
            .collect()
    } else {
        known_moves.iter().cloned().map(MoveRef::Named).collect()
    }
}

/// The enemy's pick against one target: highest average roll, then max
/// roll, then min roll, then name.
pub fn choose_threat_move(
    data: &GameData,
    enemy: &Combatant,
    known_moves: &[String],
    target: &Combatant,
    settings: &CalcSettings,
) -> Option<(MoveRef, DamageResult)> {
    threat_moves(data, enemy, known_moves)
        .into_iter()
        .filter_map(|mv| {
            let result = mv.damage(data, enemy, target, settings).ok()?;
            result.deals_damage().then_some((mv, result))
        })
        .min_by(|a, b| threat_order(&a.1, &b.1))
}

pub fn threat_order(a: &DamageResult, b: &DamageResult) -> Ordering {
    b.avg_pct()
        .total_cmp(&a.avg_pct())
        .then_with(|| b.max_pct.total_cmp(&a.max_pct))
        .then_with(|| b.min_pct.total_cmp(&a.min_pct))
        .then_with(|| a.move_name.cmp(&b.move_name))
}
