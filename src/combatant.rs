use crate::conditions::{BattleCondition, ConditionSet};
use crate::model::{Attacker, EnemySlot, GameData, Stat};
use crate::settings::clamp_finite;
use crate::stats::{apply_stage, effective_stat, StageSet};
use serde::Serialize;

/// Either side's unit as seen by the damage engine: species reference,
/// level, IV/EV assumption, resolved conditions, stages and current HP.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combatant {
    pub id: String,
    pub species: String,
    pub level: u32,
    pub iv: u32,
    pub ev: u32,
    pub conditions: ConditionSet,
    pub stages: StageSet,
    hp_percent: f64,
}

impl Combatant {
    pub fn new(id: &str, species: &str, level: u32, iv: u32, ev: u32) -> Self {
        Combatant {
            id: id.to_string(),
            species: species.to_string(),
            level: level.clamp(1, 100),
            iv,
            ev,
            conditions: ConditionSet::default(),
            stages: StageSet::default(),
            hp_percent: 100.0,
        }
    }

    pub fn from_attacker(unit: &Attacker, data: &GameData) -> Self {
        let mut combatant = Combatant::new(
            &unit.id,
            &unit.species,
            unit.level,
            data.rules.ally_iv,
            data.rules.ally_ev,
        );
        combatant.conditions = ConditionSet::from_tags(&unit.tags);
        combatant
    }

    pub fn from_enemy(slot: &EnemySlot, data: &GameData) -> Self {
        let mut combatant = Combatant::new(
            &slot.key,
            &slot.species,
            slot.level,
            data.rules.enemy_iv,
            data.rules.enemy_ev,
        );
        combatant.conditions = ConditionSet::from_tags(&slot.tags);
        combatant
    }

    pub fn with_condition(mut self, condition: BattleCondition) -> Self {
        self.conditions.insert(condition);
        self
    }

    pub fn with_stage(mut self, stat: Stat, stage: i32) -> Self {
        self.stages.set(stat, stage);
        self
    }

    pub fn with_hp_percent(mut self, percent: f64) -> Self {
        self.set_hp_percent(percent);
        self
    }

    pub fn hp_percent(&self) -> f64 {
        self.hp_percent
    }

    pub fn set_hp_percent(&mut self, percent: f64) {
        self.hp_percent = clamp_finite(percent, 0.0, 100.0, 100.0);
    }

    pub fn is_fainted(&self) -> bool {
        self.hp_percent <= 0.0
    }

    pub fn has(&self, condition: BattleCondition) -> bool {
        self.conditions.has(condition)
    }

    /// Unstaged stat from species base stats; `None` if the species is unknown.
    pub fn stat(&self, data: &GameData, stat: Stat) -> Option<u32> {
        let species = data.species(&self.species)?;
        Some(effective_stat(
            species.stats.get(stat),
            self.level,
            self.iv,
            self.ev,
            stat == Stat::Hp,
        ))
    }

    pub fn max_hp(&self, data: &GameData) -> Option<u32> {
        self.stat(data, Stat::Hp)
    }

    pub fn speed(&self, data: &GameData) -> Option<u32> {
        let raw = self.stat(data, Stat::Spe)?;
        Some(apply_stage(raw, self.stages.get(Stat::Spe) as i32))
    }

    pub fn types<'d>(&self, data: &'d GameData) -> &'d [String] {
        data.species(&self.species)
            .map(|s| s.types.as_slice())
            .unwrap_or(&[])
    }

    /// Current HP as a whole number of hit points, at least 1 while alive.
    pub fn current_hp(&self, data: &GameData) -> Option<u32> {
        let max_hp = self.max_hp(data)?;
        if self.is_fainted() {
            return Some(0);
        }
        let hp = (max_hp as f64 * self.hp_percent / 100.0 + 1e-6).floor() as u32;
        Some(hp.max(1))
    }
}
