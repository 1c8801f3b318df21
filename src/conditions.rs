//! Battle conditions recognized by the damage engine and simulator.
//!
//! Roster and wave records describe abilities and support roles as free
//! form tags. They are resolved into [`BattleCondition`] once, when a
//! [`crate::combatant::Combatant`] is built.

use crate::model::normalize_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum BattleCondition {
    /// Survives one otherwise lethal hit while at full HP (Sturdy).
    DamageReductionOnce,
    /// Lowers the opposing physical attacker's offense on switch-in (Intimidate).
    OffenseDebuffOnSwitchIn,
    /// A partner supports this unit's attacks (Helping Hand).
    DamageSupportBoost,
    /// Ignores area damage dealt by its own partner (Telepathy and friends).
    AllyHitImmunity,
}

static TAG_ALIASES: phf::Map<&'static str, BattleCondition> = phf::phf_map! {
    "sturdy" => BattleCondition::DamageReductionOnce,
    "hassturdy" => BattleCondition::DamageReductionOnce,
    "damagereduction" => BattleCondition::DamageReductionOnce,
    "intimidate" => BattleCondition::OffenseDebuffOnSwitchIn,
    "hasintimidate" => BattleCondition::OffenseDebuffOnSwitchIn,
    "helpinghand" => BattleCondition::DamageSupportBoost,
    "hashelpinghand" => BattleCondition::DamageSupportBoost,
    "support" => BattleCondition::DamageSupportBoost,
    "telepathy" => BattleCondition::AllyHitImmunity,
    "hastelepathy" => BattleCondition::AllyHitImmunity,
    "allyimmune" => BattleCondition::AllyHitImmunity,
};

pub fn condition_for_tag(tag: &str) -> Option<BattleCondition> {
    TAG_ALIASES.get(normalize_id(tag).as_str()).copied()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConditionSet(Vec<BattleCondition>);

impl ConditionSet {
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let mut set = ConditionSet::default();
        for tag in tags {
            match condition_for_tag(tag.as_ref()) {
                Some(condition) => set.insert(condition),
                None => log::debug!("ignoring unrecognized tag {:?}", tag.as_ref()),
            }
        }
        set
    }

    pub fn insert(&mut self, condition: BattleCondition) {
        if !self.0.contains(&condition) {
            self.0.push(condition);
            self.0.sort();
        }
    }

    pub fn has(&self, condition: BattleCondition) -> bool {
        self.0.contains(&condition)
    }

    pub fn iter(&self) -> impl Iterator<Item = BattleCondition> + '_ {
        self.0.iter().copied()
    }
}
