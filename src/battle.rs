use crate::battle_logger::{slot_ident, BattleLogger};
use crate::combatant::Combatant;
use crate::conditions::BattleCondition;
use crate::damage::{compute_damage_range, floor_eps, DamageResult};
use crate::model::{normalize_id, Attacker, EnemySlot, GameData, MoveSlot, MoveTarget};
use crate::selector::{choose_best_move, preference, threat_moves, threat_order, MoveRef, ScoredMove};
use crate::settings::CalcSettings;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attackers,
    Defenders,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Attackers => Side::Defenders,
            Side::Defenders => Side::Attackers,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FightStatus {
    Active,
    Won,
    Lost,
    Stalled,
}

impl FightStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, FightStatus::Active)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PendingReinforcement {
    pub side: Side,
    pub slot: usize,
}

/// A move forced by the user for one attacker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAction {
    pub move_name: String,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fighter {
    pub combatant: Combatant,
    /// Live PP ledger copy; empty for enemies.
    pub moves: Vec<MoveSlot>,
    /// Known enemy moveset; empty for friendly units.
    pub known_moves: Vec<String>,
}

/// One executed action, kept for scoring and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub turn: u32,
    pub side: Side,
    pub actor: String,
    pub move_name: String,
    pub tier: Option<u8>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BattleState {
    label: String,
    attackers: BTreeMap<String, Fighter>,
    defenders: BTreeMap<String, Fighter>,
    active_attackers: [Option<String>; 2],
    bench_attackers: Vec<String>,
    active_defenders: [Option<String>; 2],
    bench_defenders: Vec<String>,
    overrides: BTreeMap<String, ManualAction>,
    turn: u32,
    turn_cap: u32,
    status: FightStatus,
    pending: Option<PendingReinforcement>,
    log: BattleLogger,
    actions: Vec<ActionRecord>,
}

impl BattleState {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn status(&self) -> FightStatus {
        self.status
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn turn_cap(&self) -> u32 {
        self.turn_cap
    }

    pub fn set_turn_cap(&mut self, cap: u32) {
        self.turn_cap = cap.max(1);
    }

    pub fn pending(&self) -> Option<PendingReinforcement> {
        self.pending
    }

    pub fn log(&self) -> &BattleLogger {
        &self.log
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn active(&self, side: Side) -> &[Option<String>; 2] {
        match side {
            Side::Attackers => &self.active_attackers,
            Side::Defenders => &self.active_defenders,
        }
    }

    pub fn bench(&self, side: Side) -> &[String] {
        match side {
            Side::Attackers => &self.bench_attackers,
            Side::Defenders => &self.bench_defenders,
        }
    }

    pub fn fighter(&self, side: Side, id: &str) -> Option<&Fighter> {
        self.roster(side).get(id)
    }

    pub fn hp(&self, side: Side, id: &str) -> Option<f64> {
        self.fighter(side, id).map(|f| f.combatant.hp_percent())
    }

    /// Percent HP of every combatant on one side, keyed by id or instance key.
    pub fn hp_map(&self, side: Side) -> BTreeMap<String, f64> {
        self.roster(side)
            .iter()
            .map(|(id, f)| (id.clone(), f.combatant.hp_percent()))
            .collect()
    }

    pub fn attacker_moves(&self, id: &str) -> Option<&[MoveSlot]> {
        self.attackers.get(id).map(|f| f.moves.as_slice())
    }

    pub fn set_override(&mut self, attacker_id: &str, action: ManualAction) {
        self.overrides.insert(attacker_id.to_string(), action);
    }

    pub fn clear_override(&mut self, attacker_id: &str) {
        self.overrides.remove(attacker_id);
    }

    fn roster(&self, side: Side) -> &BTreeMap<String, Fighter> {
        match side {
            Side::Attackers => &self.attackers,
            Side::Defenders => &self.defenders,
        }
    }

    fn roster_mut(&mut self, side: Side) -> &mut BTreeMap<String, Fighter> {
        match side {
            Side::Attackers => &mut self.attackers,
            Side::Defenders => &mut self.defenders,
        }
    }

    fn active_mut(&mut self, side: Side) -> &mut [Option<String>; 2] {
        match side {
            Side::Attackers => &mut self.active_attackers,
            Side::Defenders => &mut self.active_defenders,
        }
    }

    fn bench_mut(&mut self, side: Side) -> &mut Vec<String> {
        match side {
            Side::Attackers => &mut self.bench_attackers,
            Side::Defenders => &mut self.bench_defenders,
        }
    }

    fn combatant(&self, side: Side, id: &str) -> Option<&Combatant> {
        self.fighter(side, id).map(|f| &f.combatant)
    }

    fn is_active_alive(&self, side: Side, id: &str) -> bool {
        self.active(side).iter().flatten().any(|a| a == id)
            && self
                .combatant(side, id)
                .map(|c| !c.is_fainted())
                .unwrap_or(false)
    }

    /// Alive active ids in slot order.
    pub fn alive_active(&self, side: Side) -> Vec<(usize, String)> {
        self.active(side)
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| {
                let id = id.as_ref()?;
                self.is_active_alive(side, id).then(|| (slot, id.clone()))
            })
            .collect()
    }

    fn remaining(&self, side: Side) -> usize {
        self.alive_active(side).len() + self.bench(side).len()
    }

    fn slot_of(&self, side: Side, id: &str) -> Option<usize> {
        self.active(side)
            .iter()
            .position(|a| a.as_deref() == Some(id))
    }

    fn ident(&self, side: Side, id: &str) -> String {
        match self.slot_of(side, id) {
            Some(slot) => format!("{}: {id}", slot_ident(side == Side::Attackers, slot)),
            None => id.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct PlannedAction {
    side: Side,
    actor: String,
    slot: usize,
    move_ref: MoveRef,
    kind: MoveTarget,
    tier: Option<u8>,
    target: Option<String>,
    speed: u32,
}

/// Turn-based resolution of one fight. Holds only read-only context; all
/// mutable state lives in [`BattleState`].
pub struct Simulator<'a> {
    data: &'a GameData,
    settings: CalcSettings,
}

impl<'a> Simulator<'a> {
    pub fn new(data: &'a GameData, settings: &CalcSettings) -> Self {
        Simulator {
            data,
            settings: settings.validated(),
        }
    }

    pub fn data(&self) -> &GameData {
        self.data
    }

    pub fn settings(&self) -> &CalcSettings {
        &self.settings
    }

    /// The first two entries of each list start active; the rest wait on
    /// the bench in order.
    pub fn init_fight(
        &self,
        label: &str,
        attackers: &[Attacker],
        defenders: &[EnemySlot],
    ) -> BattleState {
        let mut state = BattleState {
            label: label.to_string(),
            attackers: BTreeMap::new(),
            defenders: BTreeMap::new(),
            active_attackers: [None, None],
            bench_attackers: Vec::new(),
            active_defenders: [None, None],
            bench_defenders: Vec::new(),
            overrides: BTreeMap::new(),
            turn: 0,
            turn_cap: self.data.rules.turn_cap.max(1),
            status: FightStatus::Active,
            pending: None,
            log: BattleLogger::new(label),
            actions: Vec::new(),
        };
        for (idx, unit) in attackers.iter().enumerate() {
            if state.attackers.contains_key(&unit.id) {
                log::warn!("{label}: attacker {} listed twice", unit.id);
                continue;
            }
            let unit = unit.clone().normalized();
            state.attackers.insert(
                unit.id.clone(),
                Fighter {
                    combatant: Combatant::from_attacker(&unit, self.data),
                    moves: unit.moves.clone(),
                    known_moves: Vec::new(),
                },
            );
            place(
                &mut state.active_attackers,
                &mut state.bench_attackers,
                idx,
                &unit.id,
            );
        }
        for (idx, slot) in defenders.iter().enumerate() {
            if state.defenders.contains_key(&slot.key) {
                log::warn!("{label}: enemy {} listed twice", slot.key);
                continue;
            }
            state.defenders.insert(
                slot.key.clone(),
                Fighter {
                    combatant: Combatant::from_enemy(slot, self.data),
                    moves: Vec::new(),
                    known_moves: slot.moves.clone(),
                },
            );
            place(
                &mut state.active_defenders,
                &mut state.bench_defenders,
                idx,
                &slot.key,
            );
        }
        self.check_termination(&mut state);
        state
    }

    pub fn step_turn(&self, state: &mut BattleState) {
        if state.status.is_terminal() || state.pending.is_some() {
            return;
        }
        state.turn += 1;
        state.log.log_turn(state.turn);

        let mut actions = self.plan_attacker_actions(state);
        actions.extend(self.plan_defender_actions(state));
        if actions.is_empty() {
            log::debug!("{}: no legal action on either side", state.label);
            state.status = FightStatus::Stalled;
            state.log.log_stall();
            return;
        }
        self.order_actions(&mut actions);
        for action in &actions {
            self.execute(state, action);
        }
        self.check_termination(state);
        if !state.status.is_terminal() {
            self.update_pending(state);
        }
    }

    /// Fill the pending slot with `chosen_id` from that side's bench.
    /// Returns false when nothing is pending there or the id is not benched.
    pub fn choose_reinforcement(
        &self,
        state: &mut BattleState,
        side: Side,
        slot: usize,
        chosen_id: &str,
    ) -> bool {
        match state.pending {
            Some(p) if p.side == side && p.slot == slot => {}
            _ => return false,
        }
        let Some(pos) = state.bench(side).iter().position(|id| id == chosen_id) else {
            return false;
        };
        let id = state.bench_mut(side).remove(pos);
        state.active_mut(side)[slot] = Some(id.clone());
        let ident = state.ident(side, &id);
        state.log.log_switch(&ident, &id);
        state.pending = None;
        self.update_pending(state);
        true
    }

    pub fn auto_reinforce(&self, state: &mut BattleState) -> bool {
        let Some(pending) = state.pending else {
            return false;
        };
        let Some(first) = state.bench(pending.side).first().cloned() else {
            state.pending = None;
            return false;
        };
        self.choose_reinforcement(state, pending.side, pending.slot, &first)
    }

    /// Auto-play until the fight ends, reinforcing with the first bench member.
    pub fn run_to_completion(&self, state: &mut BattleState) {
        while !state.status.is_terminal() {
            if state.pending.is_some() {
                if !self.auto_reinforce(state) {
                    state.pending = None;
                }
                continue;
            }
            self.step_turn(state);
        }
    }

    fn plan_attacker_actions(&self, state: &mut BattleState) -> Vec<PlannedAction> {
        let targets = state.alive_active(Side::Defenders);
        if targets.is_empty() {
            return Vec::new();
        }
        if let Some(plan) = self.protected_plan(state) {
            return plan;
        }
        let mut planned: Vec<PlannedAction> = Vec::new();
        let mut targeted: Vec<String> = Vec::new();
        for (slot, id) in state.alive_active(Side::Attackers) {
            if let Some(action) = self.manual_action(state, &id, slot) {
                targeted.extend(action.target.iter().cloned());
                planned.push(action);
                continue;
            }
            let mut candidates: Vec<String> = targets.iter().map(|(_, t)| t.clone()).collect();
            if self.settings.spread_targets && candidates.len() >= 2 {
                let spread: Vec<String> = candidates
                    .iter()
                    .filter(|t| !targeted.contains(t))
                    .cloned()
                    .collect();
                if !spread.is_empty() {
                    candidates = spread;
                }
            }
            match self.auto_attacker_action(state, &id, slot, &candidates) {
                Some(action) => {
                    match &action.target {
                        Some(t) => targeted.push(t.clone()),
                        None => targeted.extend(candidates.iter().cloned()),
                    }
                    planned.push(action);
                }
                None => {
                    let ident = state.ident(Side::Attackers, &id);
                    state.log.log_no_action(&ident);
                }
            }
        }
        planned
    }

    fn manual_action(&self, state: &BattleState, id: &str, slot: usize) -> Option<PlannedAction> {
        let manual = state.overrides.get(id)?;
        let fighter = state.attackers.get(id)?;
        let move_slot = fighter
            .moves
            .iter()
            .find(|m| normalize_id(&m.name) == normalize_id(&manual.move_name))?;
        if move_slot.remaining_uses == 0 {
            return None;
        }
        let kind = self
            .data
            .move_def(&move_slot.name)
            .map(|m| m.target)
            .unwrap_or_default();
        let target = if kind.is_area() {
            None
        } else {
            manual
                .target
                .clone()
                .filter(|t| state.is_active_alive(Side::Defenders, t))
                .or_else(|| {
                    state
                        .alive_active(Side::Defenders)
                        .first()
                        .map(|(_, t)| t.clone())
                })
        };
        Some(PlannedAction {
            side: Side::Attackers,
            actor: id.to_string(),
            slot,
            move_ref: MoveRef::Named(move_slot.name.clone()),
            kind,
            tier: Some(move_slot.tier),
            target,
            speed: fighter.combatant.speed(self.data).unwrap_or(0),
        })
    }

    fn auto_attacker_action(
        &self,
        state: &BattleState,
        id: &str,
        slot: usize,
        targets: &[String],
    ) -> Option<PlannedAction> {
        let fighter = state.attackers.get(id)?;
        let pool = self.safe_pool(state, id);
        let mut best: Option<(ScoredMove, String)> = None;
        for target_id in targets {
            let Some(target) = state.combatant(Side::Defenders, target_id) else {
                continue;
            };
            let selection =
                choose_best_move(self.data, &fighter.combatant, target, &pool, &self.settings);
            let Some(choice) = selection.best else {
                continue;
            };
            let better = match &best {
                None => true,
                Some((current, _)) => {
                    preference(&choice, current, self.settings.stab_bonus) == Ordering::Less
                }
            };
            if better {
                best = Some((choice, target_id.clone()));
            }
        }
        let (choice, target_id) = best?;
        let kind = self
            .data
            .move_def(&choice.name)
            .map(|m| m.target)
            .unwrap_or_default();
        Some(PlannedAction {
            side: Side::Attackers,
            actor: id.to_string(),
            slot,
            move_ref: MoveRef::Named(choice.name.clone()),
            kind,
            tier: Some(choice.tier),
            target: (!kind.is_area()).then_some(target_id),
            speed: fighter.combatant.speed(self.data).unwrap_or(0),
        })
    }

    /// The attacker's pool without area moves that would faint its partner,
    /// unless friendly fire is allowed.
    fn safe_pool(&self, state: &BattleState, id: &str) -> Vec<MoveSlot> {
        let Some(fighter) = state.attackers.get(id) else {
            return Vec::new();
        };
        if self.settings.allow_friendly_fire {
            return fighter.moves.clone();
        }
        fighter
            .moves
            .iter()
            .filter(|slot| !self.would_faint_partner(state, id, &slot.name))
            .cloned()
            .collect()
    }

    fn would_faint_partner(&self, state: &BattleState, id: &str, move_name: &str) -> bool {
        let hits_partner = self
            .data
            .move_def(move_name)
            .map(|m| m.target.hits_partner())
            .unwrap_or(false);
        if !hits_partner {
            return false;
        }
        let Some(actor) = state.combatant(Side::Attackers, id) else {
            return false;
        };
        let Some((_, partner_id)) = state
            .alive_active(Side::Attackers)
            .into_iter()
            .find(|(_, p)| p != id)
        else {
            return false;
        };
        let Some(partner) = state.combatant(Side::Attackers, &partner_id) else {
            return false;
        };
        if partner.has(BattleCondition::AllyHitImmunity) {
            return false;
        }
        let Ok(hit) = compute_damage_range(self.data, actor, partner, move_name, &self.settings)
        else {
            return false;
        };
        if !hit.deals_damage() {
            return false;
        }
        let foes_hit = state
            .alive_active(Side::Defenders)
            .iter()
            .filter_map(|(_, d)| state.combatant(Side::Defenders, d))
            .filter(|d| {
                compute_damage_range(self.data, actor, d, move_name, &self.settings)
                    .map(|r| r.deals_damage())
                    .unwrap_or(false)
            })
            .count();
        let factor = if foes_hit + 1 >= 2 {
            self.data.rules.spread_multiplier
        } else {
            1.0
        };
        let damage = floor_eps(hit.min as f64 * factor) as u32;
        let partner_hp = partner.current_hp(self.data).unwrap_or(0);
        damage >= partner_hp
    }

    /// When exactly one of two active defenders is protected by full-HP
    /// survival, look for a joint plan that wins now or kills the other
    /// defender while breaking the protection.
    fn protected_plan(&self, state: &BattleState) -> Option<Vec<PlannedAction>> {
        if !self.settings.sturdy {
            return None;
        }
        let attackers = state.alive_active(Side::Attackers);
        let defenders = state.alive_active(Side::Defenders);
        if attackers.len() != 2 || defenders.len() != 2 {
            return None;
        }
        if attackers.iter().any(|(slot, id)| self.manual_action(state, id, *slot).is_some()) {
            return None;
        }
        let threshold = self.data.rules.full_hp_threshold;
        let protected: Vec<&String> = defenders
            .iter()
            .map(|(_, id)| id)
            .filter(|id| {
                state
                    .combatant(Side::Defenders, id)
                    .map(|c| {
                        c.has(BattleCondition::DamageReductionOnce) && c.hp_percent() >= threshold
                    })
                    .unwrap_or(false)
            })
            .collect();
        if protected.len() != 1 {
            return None;
        }
        let protected = protected[0].clone();
        let other = defenders
            .iter()
            .map(|(_, id)| id.clone())
            .find(|id| *id != protected)?;

        let options: Vec<Vec<PlannedAction>> = attackers
            .iter()
            .map(|(slot, id)| self.plan_options(state, id, *slot, &defenders))
            .collect();
        let mut best: Option<(PlanScore, Vec<PlannedAction>)> = None;
        for first in &options[0] {
            for second in &options[1] {
                let plan = vec![first.clone(), second.clone()];
                let Some(score) = self.score_plan(state, &plan, &protected, &other) else {
                    continue;
                };
                if !(score.wins_now || (score.other_dead && score.hits_protected)) {
                    continue;
                }
                let better = match &best {
                    None => true,
                    Some((current, _)) => score.key() < current.key(),
                };
                if better {
                    best = Some((score, plan));
                }
            }
        }
        if let Some((score, _)) = &best {
            log::debug!(
                "{}: coordinated plan around {protected} (wins now: {})",
                state.label,
                score.wins_now
            );
        }
        best.map(|(_, plan)| plan)
    }

    fn plan_options(
        &self,
        state: &BattleState,
        id: &str,
        slot: usize,
        defenders: &[(usize, String)],
    ) -> Vec<PlannedAction> {
        let Some(fighter) = state.attackers.get(id) else {
            return Vec::new();
        };
        let speed = fighter.combatant.speed(self.data).unwrap_or(0);
        let mut options = Vec::new();
        for move_slot in fighter.moves.iter().filter(|m| m.is_usable()) {
            let Some(def) = self.data.move_def(&move_slot.name) else {
                continue;
            };
            if !def.is_damaging() {
                continue;
            }
            let targets: Vec<Option<String>> = if def.target.is_area() {
                vec![None]
            } else {
                defenders.iter().map(|(_, d)| Some(d.clone())).collect()
            };
            for target in targets {
                options.push(PlannedAction {
                    side: Side::Attackers,
                    actor: id.to_string(),
                    slot,
                    move_ref: MoveRef::Named(move_slot.name.clone()),
                    kind: def.target,
                    tier: Some(move_slot.tier),
                    target,
                    speed,
                });
            }
        }
        options
    }

    fn score_plan(
        &self,
        state: &BattleState,
        plan: &[PlannedAction],
        protected: &str,
        other: &str,
    ) -> Option<PlanScore> {
        let mut ordered = plan.to_vec();
        ordered.sort_by(|a, b| b.speed.cmp(&a.speed).then_with(|| a.slot.cmp(&b.slot)));

        let mut scratch = state.clone();
        let allies_before = scratch.alive_active(Side::Attackers).len();
        let protected_before = scratch.combatant(Side::Defenders, protected)?.hp_percent();
        let mut solo_area_kill = false;
        for action in &ordered {
            let other_alive = scratch.is_active_alive(Side::Defenders, other);
            self.execute(&mut scratch, action);
            if action.kind.is_area()
                && other_alive
                && !scratch.is_active_alive(Side::Defenders, other)
            {
                solo_area_kill = true;
            }
        }
        if !self.settings.allow_friendly_fire
            && scratch.alive_active(Side::Attackers).len() < allies_before
        {
            return None;
        }
        let protected_after = scratch.combatant(Side::Defenders, protected)?;
        let other_after = scratch.combatant(Side::Defenders, other)?;
        let mut names: Vec<String> = plan.iter().map(|a| a.move_ref.name()).collect();
        names.sort();
        Some(PlanScore {
            wins_now: protected_after.is_fainted()
                && other_after.is_fainted()
                && scratch.bench(Side::Defenders).is_empty(),
            solo_area_kill,
            other_dead: other_after.is_fainted(),
            hits_protected: protected_after.hp_percent() < protected_before,
            protected_dead: protected_after.is_fainted(),
            tier_sum: plan.iter().map(|a| a.tier.unwrap_or(3) as u32).sum(),
            remaining_hp: protected_after.current_hp(self.data).unwrap_or(0)
                + other_after.current_hp(self.data).unwrap_or(0),
            names,
        })
    }

    fn plan_defender_actions(&self, state: &BattleState) -> Vec<PlannedAction> {
        let targets = state.alive_active(Side::Attackers);
        let mut planned = Vec::new();
        for (slot, id) in state.alive_active(Side::Defenders) {
            let Some(fighter) = state.defenders.get(&id) else {
                continue;
            };
            let enemy = &fighter.combatant;
            let mut best: Option<(MoveRef, DamageResult, String)> = None;
            for mv in threat_moves(self.data, enemy, &fighter.known_moves) {
                for (_, target_id) in &targets {
                    let Some(target) = state.combatant(Side::Attackers, target_id) else {
                        continue;
                    };
                    let Ok(result) = mv.damage(self.data, enemy, target, &self.settings) else {
                        continue;
                    };
                    if !result.deals_damage() {
                        continue;
                    }
                    let better = match &best {
                        None => true,
                        Some((_, current, _)) => threat_order(&result, current) == Ordering::Less,
                    };
                    if better {
                        best = Some((mv.clone(), result, target_id.clone()));
                    }
                }
            }
            let Some((move_ref, _, target_id)) = best else {
                continue;
            };
            let kind = move_ref.target_kind(self.data);
            planned.push(PlannedAction {
                side: Side::Defenders,
                actor: id.clone(),
                slot,
                move_ref,
                kind,
                tier: None,
                target: (!kind.is_area()).then_some(target_id),
                speed: enemy.speed(self.data).unwrap_or(0),
            });
        }
        planned
    }

    fn order_actions(&self, actions: &mut [PlannedAction]) {
        let enemy_first = self.settings.enemy_first_on_speed_tie;
        let side_rank = |side: Side| match (side, enemy_first) {
            (Side::Defenders, true) | (Side::Attackers, false) => 0,
            _ => 1,
        };
        actions.sort_by(|a, b| {
            b.speed.cmp(&a.speed).then_with(|| {
                if a.side == b.side {
                    Ordering::Equal
                } else {
                    side_rank(a.side).cmp(&side_rank(b.side))
                }
            })
        });
    }

    fn execute(&self, state: &mut BattleState, action: &PlannedAction) {
        if state.status.is_terminal() || !state.is_active_alive(action.side, &action.actor) {
            return;
        }
        let foe_side = action.side.opponent();
        if state.alive_active(foe_side).is_empty() {
            return;
        }
        let move_name = action.move_ref.name();
        if action.side == Side::Attackers {
            let has_pp = state
                .attackers
                .get(&action.actor)
                .and_then(|f| {
                    f.moves
                        .iter()
                        .find(|m| normalize_id(&m.name) == normalize_id(&move_name))
                })
                .map(|m| m.remaining_uses > 0)
                .unwrap_or(false);
            if !has_pp {
                let ident = state.ident(action.side, &action.actor);
                state.log.log_no_action(&ident);
                return;
            }
        }
        let Some(actor) = state.combatant(action.side, &action.actor).cloned() else {
            return;
        };

        let mut hits: Vec<(Side, String, DamageResult)> = Vec::new();
        if action.kind.is_area() {
            let mut targets: Vec<(Side, String)> = state
                .alive_active(foe_side)
                .into_iter()
                .map(|(_, id)| (foe_side, id))
                .collect();
            if action.kind.hits_partner() {
                let partner = state
                    .alive_active(action.side)
                    .into_iter()
                    .find(|(_, id)| *id != action.actor);
                if let Some((_, partner_id)) = partner {
                    let immune = state
                        .combatant(action.side, &partner_id)
                        .map(|c| c.has(BattleCondition::AllyHitImmunity))
                        .unwrap_or(false);
                    if !immune {
                        targets.push((action.side, partner_id));
                    }
                }
            }
            for (side, id) in targets {
                let Some(target) = state.combatant(side, &id) else {
                    continue;
                };
                match action.move_ref.damage(self.data, &actor, target, &self.settings) {
                    Ok(result) if result.deals_damage() => hits.push((side, id, result)),
                    _ => {}
                }
            }
        } else {
            let target_id = action
                .target
                .clone()
                .filter(|t| state.is_active_alive(foe_side, t))
                .or_else(|| state.alive_active(foe_side).first().map(|(_, t)| t.clone()));
            let Some(target_id) = target_id else {
                return;
            };
            let Some(target) = state.combatant(foe_side, &target_id) else {
                return;
            };
            match action.move_ref.damage(self.data, &actor, target, &self.settings) {
                Ok(result) => hits.push((foe_side, target_id, result)),
                Err(err) => {
                    log::debug!("{}: {} skipped: {err}", state.label, action.actor);
                    let ident = state.ident(action.side, &action.actor);
                    state.log.log_no_action(&ident);
                    return;
                }
            }
        }

        if action.side == Side::Attackers {
            if let Some(slot) = state.attackers.get_mut(&action.actor).and_then(|f| {
                f.moves
                    .iter_mut()
                    .find(|m| normalize_id(&m.name) == normalize_id(&move_name))
            }) {
                slot.remaining_uses = slot.remaining_uses.saturating_sub(1);
            }
        }

        let source = state.ident(action.side, &action.actor);
        let target_label = match (&action.kind, hits.first()) {
            (kind, _) if kind.is_area() => "[spread]".to_string(),
            (_, Some((side, id, _))) => state.ident(*side, id),
            _ => String::new(),
        };
        state.log.log_move(&source, &move_name, &target_label);

        let factor = if action.kind.is_area() && hits.len() >= 2 {
            self.data.rules.spread_multiplier
        } else {
            1.0
        };
        let mut targets = Vec::with_capacity(hits.len());
        for (side, id, result) in &hits {
            let amount = floor_eps(result.min as f64 * factor) as u32;
            self.apply_damage(state, *side, id, amount);
            targets.push(id.clone());
        }
        state.actions.push(ActionRecord {
            turn: state.turn,
            side: action.side,
            actor: action.actor.clone(),
            move_name,
            tier: action.tier,
            targets,
        });
    }

    fn apply_damage(&self, state: &mut BattleState, side: Side, id: &str, amount: u32) {
        let ident = state.ident(side, id);
        let data = self.data;
        let sturdy = self.settings.sturdy;
        let threshold = data.rules.full_hp_threshold;
        let Some(fighter) = state.roster_mut(side).get_mut(id) else {
            return;
        };
        let combatant = &mut fighter.combatant;
        let (Some(max_hp), Some(current)) = (combatant.max_hp(data), combatant.current_hp(data))
        else {
            return;
        };
        let mut remaining = current.saturating_sub(amount);
        let mut endured = false;
        if remaining == 0
            && amount > 0
            && sturdy
            && combatant.has(BattleCondition::DamageReductionOnce)
            && combatant.hp_percent() >= threshold
        {
            remaining = 1;
            endured = true;
        }
        let percent = remaining as f64 * 100.0 / max_hp.max(1) as f64;
        combatant.set_hp_percent(percent);
        let fainted = remaining == 0;

        state.log.log_damage(&ident, percent);
        if endured {
            state.log.log_survive(&ident);
        }
        if fainted {
            state.log.log_faint(&ident);
            for slot in state.active_mut(side).iter_mut() {
                if slot.as_deref() == Some(id) {
                    *slot = None;
                }
            }
        }
    }

    fn update_pending(&self, state: &mut BattleState) {
        if state.pending.is_some() {
            return;
        }
        for side in [Side::Attackers, Side::Defenders] {
            if state.bench(side).is_empty() {
                continue;
            }
            if let Some(slot) = state.active(side).iter().position(|a| a.is_none()) {
                state.pending = Some(PendingReinforcement { side, slot });
                return;
            }
        }
    }

    fn check_termination(&self, state: &mut BattleState) {
        if state.status.is_terminal() {
            return;
        }
        if state.remaining(Side::Defenders) == 0 {
            state.status = FightStatus::Won;
            state.log.log_win("attackers");
        } else if state.remaining(Side::Attackers) == 0 {
            state.status = FightStatus::Lost;
            state.log.log_win("defenders");
        } else if state.turn >= state.turn_cap {
            state.status = FightStatus::Stalled;
            state.log.log_stall();
        }
        if state.status.is_terminal() {
            state.pending = None;
        }
    }
}

#[derive(Debug, Clone)]
struct PlanScore {
    wins_now: bool,
    solo_area_kill: bool,
    other_dead: bool,
    hits_protected: bool,
    protected_dead: bool,
    tier_sum: u32,
    remaining_hp: u32,
    names: Vec<String>,
}

impl PlanScore {
    fn key(&self) -> (bool, bool, bool, bool, bool, u32, u32, &[String]) {
        (
            !self.wins_now,
            !self.solo_area_kill,
            !self.other_dead,
            !self.hits_protected,
            !self.protected_dead,
            self.tier_sum,
            self.remaining_hp,
            &self.names,
        )
    }
}

fn place(active: &mut [Option<String>; 2], bench: &mut Vec<String>, idx: usize, id: &str) {
    match active.iter_mut().find(|slot| slot.is_none()) {
        Some(slot) if idx < 2 || bench.is_empty() => *slot = Some(id.to_string()),
        _ => bench.push(id.to_string()),
    }
}
