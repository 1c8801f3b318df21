use crate::combatant::Combatant;
use crate::conditions::BattleCondition;
use crate::model::{GameData, MoveCategory, MoveProfile, Stat};
use crate::settings::CalcSettings;
use crate::stats::{apply_stage, clamp_stage, effective_stat};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DamageError {
    #[error("{0} deals no damage")]
    NonDamaging(String),
    #[error("species {0} is not in the data set")]
    MissingSpecies(String),
    #[error("move {0} is not in the data set")]
    MissingMove(String),
}

/// Deterministic min/max roll of one move into one defender.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageResult {
    pub move_name: String,
    pub move_type: String,
    pub category: MoveCategory,
    pub min: u32,
    pub max: u32,
    /// Percent of the defender's current HP.
    pub min_pct: f64,
    pub max_pct: f64,
    pub target_hp: u32,
    pub max_hp: u32,
    pub one_shot: bool,
    pub stab: bool,
    pub effectiveness: f64,
    pub attacker_speed: u32,
    pub defender_speed: u32,
    pub slower: bool,
}

impl DamageResult {
    pub fn avg_pct(&self) -> f64 {
        (self.min_pct + self.max_pct) / 2.0
    }

    pub fn deals_damage(&self) -> bool {
        self.max > 0
    }
}

struct MoveSpec<'a> {
    name: &'a str,
    move_type: &'a str,
    category: MoveCategory,
    power: u32,
    uses: Option<Stat>,
}

pub fn compute_damage_range(
    data: &GameData,
    attacker: &Combatant,
    defender: &Combatant,
    move_name: &str,
    settings: &CalcSettings,
) -> Result<DamageResult, DamageError> {
    let def = data
        .move_def(move_name)
        .ok_or_else(|| DamageError::MissingMove(move_name.to_string()))?;
    let (Some(move_type), Some(category), Some(power)) =
        (def.move_type.as_deref(), def.category, def.power)
    else {
        return Err(DamageError::NonDamaging(def.name.clone()));
    };
    let spec = MoveSpec {
        name: &def.name,
        move_type,
        category,
        power,
        uses: def.uses,
    };
    compute(data, attacker, defender, &spec, settings)
}

/// Same pipeline for an assumed move, used when the real moveset is unknown.
pub fn compute_generic_damage_range(
    data: &GameData,
    attacker: &Combatant,
    defender: &Combatant,
    profile: &MoveProfile,
    settings: &CalcSettings,
) -> Result<DamageResult, DamageError> {
    let name = generic_move_name(profile);
    let spec = MoveSpec {
        name: &name,
        move_type: &profile.move_type,
        category: profile.category,
        power: profile.power,
        uses: None,
    };
    compute(data, attacker, defender, &spec, settings)
}

pub fn generic_move_name(profile: &MoveProfile) -> String {
    let category = match profile.category {
        MoveCategory::Physical => "physical",
        MoveCategory::Special => "special",
        MoveCategory::Status => "status",
    };
    format!("{} {} {}", profile.move_type, category, profile.power)
}

fn compute(
    data: &GameData,
    attacker: &Combatant,
    defender: &Combatant,
    spec: &MoveSpec<'_>,
    settings: &CalcSettings,
) -> Result<DamageResult, DamageError> {
    if spec.power == 0 || spec.category == MoveCategory::Status {
        return Err(DamageError::NonDamaging(spec.name.to_string()));
    }
    let settings = settings.validated();
    let rules = &data.rules;
    let atk_species = data
        .species(&attacker.species)
        .ok_or_else(|| DamageError::MissingSpecies(attacker.species.clone()))?;
    let def_species = data
        .species(&defender.species)
        .ok_or_else(|| DamageError::MissingSpecies(defender.species.clone()))?;

    let max_hp = effective_stat(
        def_species.stats.hp,
        defender.level,
        defender.iv,
        defender.ev,
        true,
    );
    let target_hp = ((max_hp as f64 * defender.hp_percent() / 100.0 + 1e-6).floor() as u32).max(1);

    let physical = spec.category == MoveCategory::Physical;
    let offense = spec
        .uses
        .unwrap_or(if physical { Stat::Atk } else { Stat::Spa });
    let mut offense_stage = attacker.stages.get(offense) as i32;
    if physical
        && settings.intimidate
        && defender.has(BattleCondition::OffenseDebuffOnSwitchIn)
    {
        offense_stage += rules.intimidate_stages as i32;
    }
    let raw_attack = effective_stat(
        atk_species.stats.get(offense),
        attacker.level,
        attacker.iv,
        attacker.ev,
        false,
    );
    let attack = apply_stage(raw_attack, clamp_stage(offense_stage) as i32) as u64;

    let defense_stat = if spec.category == MoveCategory::Special {
        Stat::Spd
    } else {
        Stat::Def
    };
    let raw_defense = effective_stat(
        def_species.stats.get(defense_stat),
        defender.level,
        defender.iv,
        defender.ev,
        false,
    );
    let defense = apply_stage(raw_defense, defender.stages.get(defense_stat) as i32).max(1) as u64;

    let level = attacker.level as u64;
    let base = ((level * 2 / 5 + 2)
        .saturating_mul(spec.power as u64)
        .saturating_mul(attack)
        / defense
        / 50)
        .saturating_add(2);

    let stab = atk_species
        .types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(spec.move_type));
    let effectiveness = data
        .type_chart
        .effectiveness(Some(spec.move_type), &def_species.types);

    let mut damage = base as f64;
    if stab {
        damage = floor_eps(damage * rules.stab);
    }
    damage = floor_eps(damage * effectiveness);
    if attacker.has(BattleCondition::DamageSupportBoost) {
        damage = floor_eps(damage * rules.support_multiplier);
    }
    damage = floor_eps(damage * settings.other_multiplier);

    let min = floor_eps(damage * rules.roll_min).max(0.0) as u32;
    let max = floor_eps(damage * rules.roll_max).max(0.0) as u32;

    let mut one_shot = min >= target_hp;
    if one_shot
        && settings.sturdy
        && defender.has(BattleCondition::DamageReductionOnce)
        && defender.hp_percent() >= rules.full_hp_threshold
    {
        one_shot = false;
    }

    let attacker_speed = attacker.speed(data).unwrap_or(0);
    let defender_speed = defender.speed(data).unwrap_or(0);

    Ok(DamageResult {
        move_name: spec.name.to_string(),
        move_type: spec.move_type.to_ascii_lowercase(),
        category: spec.category,
        min,
        max,
        min_pct: min as f64 * 100.0 / target_hp as f64,
        max_pct: max as f64 * 100.0 / target_hp as f64,
        target_hp,
        max_hp,
        one_shot,
        stab,
        effectiveness,
        attacker_speed,
        defender_speed,
        slower: attacker_speed < defender_speed,
    })
}

pub(crate) fn floor_eps(value: f64) -> f64 {
    (value + 1e-9).floor()
}
