use crate::battle::{BattleState, FightStatus, Side, Simulator};
use crate::combatant::Combatant;
use crate::model::{Attacker, EnemySlot, GameData};
use crate::selector::{choose_best_move, ScoredMove};
use crate::settings::{clamp_finite, CalcSettings};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Tier charged for an attacker that has no damaging move against its target.
pub const UNRESOLVED_TIER: u8 = 4;
pub const MAX_FIGHTS: usize = 4;
const PAD_MARKER: &str = "+pad";

fn default_slack() -> f64 {
    0.25
}

fn default_max_variants() -> usize {
    8
}

fn default_max_combos() -> usize {
    512
}

fn default_max_distributions() -> usize {
    64
}

fn default_fights() -> usize {
    MAX_FIGHTS
}

/// Bounds on the search. Every ceiling is mandatory so a solve stays
/// interactive.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveConstraints {
    /// Allowed distance in average tier from the best candidate.
    #[serde(default = "default_slack")]
    pub slack: f64,
    #[serde(default = "default_max_variants")]
    pub max_variants_per_matching: usize,
    /// Total candidates handed to re-simulation.
    #[serde(default = "default_max_combos")]
    pub max_combos: usize,
    #[serde(default = "default_max_distributions")]
    pub max_distributions: usize,
    #[serde(default = "default_fights")]
    pub fights: usize,
    #[serde(default)]
    pub turn_cap: Option<u32>,
}

impl Default for SolveConstraints {
    fn default() -> Self {
        SolveConstraints {
            slack: default_slack(),
            max_variants_per_matching: default_max_variants(),
            max_combos: default_max_combos(),
            max_distributions: default_max_distributions(),
            fights: default_fights(),
            turn_cap: None,
        }
    }
}

impl SolveConstraints {
    pub fn validated(&self) -> Self {
        SolveConstraints {
            slack: clamp_finite(self.slack, 0.0, 3.0, default_slack()),
            max_variants_per_matching: self.max_variants_per_matching.max(1),
            max_combos: self.max_combos.max(1),
            max_distributions: self.max_distributions.max(1),
            fights: self.fights.clamp(1, MAX_FIGHTS),
            turn_cap: self.turn_cap.map(|cap| cap.max(1)),
        }
    }

    pub fn slots(&self) -> usize {
        self.fights * 2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("the wave has no enemies")]
    NoEnemies,
    #[error("need at least 2 usable attackers, found {0}")]
    NotEnoughAttackers(usize),
    #[error("{count} enemies do not fit the {limit} slots of a schedule")]
    TooManyEnemies { count: usize, limit: usize },
}

/// The move an attacker is expected to use on its assigned defender.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMove {
    pub attacker: String,
    pub defender: String,
    pub move_name: Option<String>,
    pub tier: u8,
    pub one_shot: bool,
    pub min_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FightSpec {
    pub attackers: [String; 2],
    /// Live copies of the enemy slots; padding instances carry `+pad<n>` keys.
    pub defenders: Vec<EnemySlot>,
    pub planned: Vec<PlannedMove>,
}

impl FightSpec {
    pub fn defender_keys(&self) -> Vec<&str> {
        self.defenders.iter().map(|d| d.key.as_str()).collect()
    }

    /// Sorted attacker pair and real defender keys. Padding copies are left
    /// out, so layouts that only differ in which instance was duplicated
    /// share a key; a fight against padding alone shows as `-`.
    pub fn canonical_key(&self) -> String {
        let mut attackers = self.attackers.to_vec();
        attackers.sort();
        let mut defenders: Vec<&str> = self
            .defenders
            .iter()
            .map(|d| d.key.as_str())
            .filter(|key| !is_padding(key))
            .collect();
        defenders.sort_unstable();
        let defenders = if defenders.is_empty() {
            "-".to_string()
        } else {
            defenders.join(",")
        };
        format!("{} vs {defenders}", attackers.join("+"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub fights: Vec<FightSpec>,
}

impl Schedule {
    pub fn canonical_key(&self) -> String {
        let mut fights: Vec<String> = self.fights.iter().map(FightSpec::canonical_key).collect();
        fights.sort();
        fights.join(" | ")
    }

    pub fn defender_keys(&self) -> Vec<&str> {
        self.fights.iter().flat_map(|f| f.defender_keys()).collect()
    }
}

/// Static cost of a schedule, compared lexicographically:
/// more one-shots, lower worst tier, fewer fights above tier 1, lower
/// summed average tier, less overkill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleScore {
    pub one_shots: u32,
    pub worst_tier: u8,
    pub above_tier_one: u32,
    pub tier_sum: f64,
    pub overkill: f64,
    pub fights: u32,
}

impl ScheduleScore {
    pub fn average_tier(&self) -> f64 {
        self.tier_sum / self.fights.max(1) as f64
    }

    pub fn rank_cmp(&self, other: &ScheduleScore) -> Ordering {
        other
            .one_shots
            .cmp(&self.one_shots)
            .then_with(|| self.worst_tier.cmp(&other.worst_tier))
            .then_with(|| self.above_tier_one.cmp(&other.above_tier_one))
            .then_with(|| self.tier_sum.total_cmp(&other.tier_sum))
            .then_with(|| self.overkill.total_cmp(&other.overkill))
    }

    pub fn within_slack(&self, best: &ScheduleScore, slack: f64) -> bool {
        self.one_shots == best.one_shots
            && self.worst_tier == best.worst_tier
            && self.average_tier() <= best.average_tier() + slack + 1e-9
    }

    fn from_fights(evals: &[FightEval]) -> Self {
        ScheduleScore {
            one_shots: evals.iter().map(|e| e.one_shots).sum(),
            worst_tier: evals.iter().map(|e| e.worst_tier).max().unwrap_or(UNRESOLVED_TIER),
            above_tier_one: evals.iter().filter(|e| e.worst_tier > 1).count() as u32,
            tier_sum: evals.iter().map(|e| e.avg_tier).sum(),
            overkill: evals.iter().map(|e| e.overkill).sum(),
            fights: evals.len() as u32,
        }
    }
}

/// Outcome of actually playing a schedule through the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedScore {
    pub fights_won: u32,
    pub average_tier: f64,
    pub pp_used: u32,
    pub turns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSchedule {
    pub rank: usize,
    pub key: String,
    pub schedule: Schedule,
    pub score: ScheduleScore,
    pub simulated: SimulatedScore,
}

/// Strip a padding suffix, giving the enemy instance a padded copy stands for.
pub fn real_key(key: &str) -> &str {
    key.split_once(PAD_MARKER).map(|(real, _)| real).unwrap_or(key)
}

pub fn is_padding(key: &str) -> bool {
    key.contains(PAD_MARKER)
}

/// Mixed-radix counter yielding every digit vector in order.
#[derive(Debug, Clone)]
pub struct Odometer {
    radices: Vec<usize>,
    digits: Vec<usize>,
    done: bool,
}

impl Odometer {
    pub fn new(radices: Vec<usize>) -> Self {
        let done = radices.iter().any(|&r| r == 0);
        let digits = vec![0; radices.len()];
        Odometer {
            radices,
            digits,
            done,
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.digits.clone();
        let mut pos = self.digits.len();
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            self.digits[pos] += 1;
            if self.digits[pos] < self.radices[pos] {
                break;
            }
            self.digits[pos] = 0;
        }
        Some(current)
    }
}

/// Lazily yields every perfect matching of `0..n` as index pairs.
/// The lowest unused index is always paired first, so each matching
/// appears exactly once: (n-1)(n-3)...1 in total, 105 for n = 8.
#[derive(Debug, Clone)]
pub struct PerfectMatchings {
    n: usize,
    choices: Odometer,
}

impl PerfectMatchings {
    pub fn new(n: usize) -> Self {
        let radices = if n == 0 || n % 2 == 1 {
            vec![0]
        } else {
            (0..n / 2).map(|k| n - 1 - 2 * k).collect()
        };
        PerfectMatchings {
            n,
            choices: Odometer::new(radices),
        }
    }
}

impl Iterator for PerfectMatchings {
    type Item = Vec<(usize, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        let digits = self.choices.next()?;
        let mut unused: Vec<usize> = (0..self.n).collect();
        let mut pairs = Vec::with_capacity(self.n / 2);
        for choice in digits {
            let first = unused.remove(0);
            let partner = unused.remove(choice);
            pairs.push((first, partner));
        }
        Some(pairs)
    }
}

/// Every multiset of size `need` over `0..real` as a non-decreasing index
/// list, in lexicographic order, at most `cap` of them.
pub fn padding_distributions(real: usize, need: usize, cap: usize) -> Vec<Vec<usize>> {
    if need == 0 {
        return vec![Vec::new()];
    }
    if real == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current = vec![0; need];
    while out.len() < cap {
        out.push(current.clone());
        let Some(pos) = current.iter().rposition(|&v| v + 1 < real) else {
            break;
        };
        let next = current[pos] + 1;
        for value in &mut current[pos..] {
            *value = next;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FightEval {
    one_shots: u32,
    worst_tier: u8,
    avg_tier: f64,
    overkill: f64,
}

impl FightEval {
    fn from_moves(moves: &[Option<ScoredMove>; 2]) -> Self {
        let tiers: Vec<u8> = moves
            .iter()
            .map(|m| m.as_ref().map(|m| m.tier).unwrap_or(UNRESOLVED_TIER))
            .collect();
        let one_shots: Vec<&ScoredMove> = moves
            .iter()
            .flatten()
            .filter(|m| m.result.one_shot)
            .collect();
        FightEval {
            one_shots: one_shots.len() as u32,
            worst_tier: tiers.iter().copied().max().unwrap_or(UNRESOLVED_TIER),
            avg_tier: tiers.iter().map(|&t| t as f64).sum::<f64>() / tiers.len().max(1) as f64,
            overkill: one_shots
                .iter()
                .map(|m| (m.result.min_pct - 100.0).max(0.0))
                .sum(),
        }
    }

    fn tie_order(&self, other: &FightEval) -> Ordering {
        other
            .one_shots
            .cmp(&self.one_shots)
            .then_with(|| self.worst_tier.cmp(&other.worst_tier))
            .then_with(|| self.avg_tier.total_cmp(&other.avg_tier))
    }
}

/// One way to staff a fight: attacker `k` is sent at enemy `targets[k]`.
#[derive(Debug, Clone)]
struct FightOption {
    attackers: [usize; 2],
    targets: [usize; 2],
    moves: [Option<ScoredMove>; 2],
    eval: FightEval,
}

#[derive(Debug, Clone)]
struct SlotRef {
    real: usize,
    key: String,
}

#[derive(Debug, Clone)]
struct Candidate {
    schedule: Schedule,
    score: ScheduleScore,
    key: String,
}

struct SolveContext<'a> {
    attackers: Vec<Attacker>,
    enemies: &'a [EnemySlot],
    options: HashMap<(usize, usize), Vec<FightOption>>,
}

impl<'a> SolveContext<'a> {
    fn new(
        data: &GameData,
        attackers: Vec<Attacker>,
        enemies: &'a [EnemySlot],
        settings: &CalcSettings,
    ) -> Self {
        let foes: Vec<Combatant> = enemies
            .iter()
            .map(|e| Combatant::from_enemy(e, data))
            .collect();
        let best_moves: Vec<Vec<Option<ScoredMove>>> = attackers
            .iter()
            .map(|unit| {
                let me = Combatant::from_attacker(unit, data);
                foes.iter()
                    .map(|foe| choose_best_move(data, &me, foe, &unit.moves, settings).best)
                    .collect()
            })
            .collect();

        let mut options = HashMap::new();
        for x in 0..enemies.len() {
            for y in x..enemies.len() {
                options.insert((x, y), fight_options(&attackers, &best_moves, x, y));
            }
        }
        SolveContext {
            attackers,
            enemies,
            options,
        }
    }

    fn options_for(&self, x: usize, y: usize) -> &[FightOption] {
        let key = if x <= y { (x, y) } else { (y, x) };
        self.options.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn score_matching(&self, slots: &[SlotRef], matching: &[(usize, usize)]) -> Option<ScheduleScore> {
        let evals: Option<Vec<FightEval>> = matching
            .iter()
            .map(|&(i, j)| {
                self.options_for(slots[i].real, slots[j].real)
                    .first()
                    .map(|o| o.eval)
            })
            .collect();
        evals.map(|e| ScheduleScore::from_fights(&e))
    }

    fn build_schedule(
        &self,
        slots: &[SlotRef],
        matching: &[(usize, usize)],
        variant: &[usize],
    ) -> Option<Schedule> {
        let mut fights = Vec::with_capacity(matching.len());
        for (&(i, j), &choice) in matching.iter().zip(variant) {
            let option = self.options_for(slots[i].real, slots[j].real).get(choice)?;
            let (first, second) = if slots[i].real == option.targets[0] {
                (&slots[i], &slots[j])
            } else {
                (&slots[j], &slots[i])
            };
            let ids = [
                self.attackers[option.attackers[0]].id.clone(),
                self.attackers[option.attackers[1]].id.clone(),
            ];
            let planned = [first, second]
                .iter()
                .zip(option.moves.iter())
                .zip(ids.iter())
                .map(|((slot, mv), attacker)| PlannedMove {
                    attacker: attacker.clone(),
                    defender: slot.key.clone(),
                    move_name: mv.as_ref().map(|m| m.name.clone()),
                    tier: mv.as_ref().map(|m| m.tier).unwrap_or(UNRESOLVED_TIER),
                    one_shot: mv.as_ref().map(|m| m.result.one_shot).unwrap_or(false),
                    min_pct: mv.as_ref().map(|m| m.result.min_pct).unwrap_or(0.0),
                })
                .collect();
            fights.push(FightSpec {
                attackers: ids,
                defenders: vec![self.instance(first), self.instance(second)],
                planned,
            });
        }
        Some(Schedule { fights })
    }

    fn instance(&self, slot: &SlotRef) -> EnemySlot {
        let mut enemy = self.enemies[slot.real].clone();
        enemy.key = slot.key.clone();
        enemy
    }
}

/// All staffings of the enemy pair `(x, y)` tied for best on one-shots,
/// worst tier and average tier, least overkill first.
fn fight_options(
    attackers: &[Attacker],
    best_moves: &[Vec<Option<ScoredMove>>],
    x: usize,
    y: usize,
) -> Vec<FightOption> {
    let mut all = Vec::new();
    for a in 0..attackers.len() {
        for b in (a + 1)..attackers.len() {
            let mut assignments = vec![[x, y]];
            if x != y {
                assignments.push([y, x]);
            }
            for targets in assignments {
                let moves = [
                    best_moves[a][targets[0]].clone(),
                    best_moves[b][targets[1]].clone(),
                ];
                let eval = FightEval::from_moves(&moves);
                all.push(FightOption {
                    attackers: [a, b],
                    targets,
                    moves,
                    eval,
                });
            }
        }
    }
    let Some(best) = all.iter().map(|o| o.eval).min_by(|a, b| a.tie_order(b)) else {
        return Vec::new();
    };
    all.retain(|o| o.eval.tie_order(&best) == Ordering::Equal);
    all.sort_by(|p, q| {
        p.eval
            .overkill
            .total_cmp(&q.eval.overkill)
            .then_with(|| attackers[p.attackers[0]].id.cmp(&attackers[q.attackers[0]].id))
            .then_with(|| attackers[p.attackers[1]].id.cmp(&attackers[q.attackers[1]].id))
            .then_with(|| p.targets.cmp(&q.targets))
    });
    all
}

fn slots_for(enemies: &[EnemySlot], padding: &[usize]) -> Vec<SlotRef> {
    let mut slots: Vec<SlotRef> = enemies
        .iter()
        .enumerate()
        .map(|(real, e)| SlotRef {
            real,
            key: e.key.clone(),
        })
        .collect();
    let mut counters = vec![0usize; enemies.len()];
    for &real in padding {
        counters[real] += 1;
        slots.push(SlotRef {
            real,
            key: format!("{}{PAD_MARKER}{}", enemies[real].key, counters[real]),
        });
    }
    slots
}

/// Find the ranked set of schedules tied (within slack) for best.
pub fn solve_wave(
    data: &GameData,
    enemies: &[EnemySlot],
    attackers: &[Attacker],
    settings: &CalcSettings,
    constraints: &SolveConstraints,
) -> Result<Vec<RankedSchedule>, SolveError> {
    let constraints = constraints.validated();
    let settings = settings.validated();
    if enemies.is_empty() {
        return Err(SolveError::NoEnemies);
    }
    let limit = constraints.slots();
    if enemies.len() > limit {
        return Err(SolveError::TooManyEnemies {
            count: enemies.len(),
            limit,
        });
    }
    let mut seen_ids = HashSet::new();
    let roster: Vec<Attacker> = attackers
        .iter()
        .filter(|unit| data.species(&unit.species).is_some())
        .filter(|unit| seen_ids.insert(unit.id.clone()))
        .map(|unit| unit.clone().normalized())
        .collect();
    if roster.len() < 2 {
        return Err(SolveError::NotEnoughAttackers(roster.len()));
    }

    let ctx = SolveContext::new(data, roster, enemies, &settings);
    let distributions = padding_distributions(
        enemies.len(),
        limit - enemies.len(),
        constraints.max_distributions,
    );
    let layouts: Vec<Vec<SlotRef>> = distributions
        .iter()
        .map(|padding| slots_for(enemies, padding))
        .collect();

    let mut scored: Vec<(ScheduleScore, usize, Vec<(usize, usize)>)> = Vec::new();
    for (layout_idx, slots) in layouts.iter().enumerate() {
        for matching in PerfectMatchings::new(slots.len()) {
            if let Some(score) = ctx.score_matching(slots, &matching) {
                scored.push((score, layout_idx, matching));
            }
        }
    }
    let Some(best) = scored
        .iter()
        .map(|(score, _, _)| *score)
        .min_by(|a, b| a.rank_cmp(b))
    else {
        return Ok(Vec::new());
    };
    scored.retain(|(score, _, _)| score.within_slack(&best, constraints.slack));
    scored.sort_by(|a, b| a.0.rank_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    log::debug!(
        "{} layouts, {} matchings within slack of best average tier {:.2}",
        layouts.len(),
        scored.len(),
        best.average_tier()
    );

    let mut seen = HashSet::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    'expand: for (score, layout_idx, matching) in &scored {
        let slots = &layouts[*layout_idx];
        let counts: Vec<usize> = matching
            .iter()
            .map(|&(i, j)| ctx.options_for(slots[i].real, slots[j].real).len())
            .collect();
        for variant in Odometer::new(counts).take(constraints.max_variants_per_matching) {
            let Some(schedule) = ctx.build_schedule(slots, matching, &variant) else {
                continue;
            };
            let key = schedule.canonical_key();
            if !seen.insert(key.clone()) {
                continue;
            }
            candidates.push(Candidate {
                schedule,
                score: *score,
                key,
            });
            if candidates.len() >= constraints.max_combos {
                log::info!("candidate cap of {} reached", constraints.max_combos);
                break 'expand;
            }
        }
    }

    let simulator = Simulator::new(data, &settings);
    let simulated: Vec<SimulatedScore> = candidates
        .par_iter()
        .map(|c| simulate_schedule(&simulator, &ctx.attackers, &c.schedule, constraints.turn_cap))
        .collect();

    let ranked = rank_simulated(
        candidates.into_iter().zip(simulated).collect(),
        constraints.slack,
    );
    log::info!("{} schedules kept", ranked.len());
    Ok(ranked)
}

/// Keep the candidates winning the most fights, drop those whose simulated
/// average tier is more than `slack` above the best of them, and rank the
/// rest.
fn rank_simulated(
    mut ranked: Vec<(Candidate, SimulatedScore)>,
    slack: f64,
) -> Vec<RankedSchedule> {
    let Some(most_won) = ranked.iter().map(|(_, s)| s.fights_won).max() else {
        return Vec::new();
    };
    ranked.retain(|(_, s)| s.fights_won == most_won);
    let best_avg = ranked
        .iter()
        .map(|(_, s)| s.average_tier)
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(UNRESOLVED_TIER as f64);
    ranked.retain(|(_, s)| s.average_tier <= best_avg + slack + 1e-9);
    ranked.sort_by(|(ca, sa), (cb, sb)| {
        sb.fights_won
            .cmp(&sa.fights_won)
            .then_with(|| sa.average_tier.total_cmp(&sb.average_tier))
            .then_with(|| ca.score.rank_cmp(&cb.score))
            .then_with(|| sa.pp_used.cmp(&sb.pp_used))
            .then_with(|| ca.key.cmp(&cb.key))
    });
    log::debug!("best simulated run wins {most_won} fights at average tier {best_avg:.2}");

    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, (candidate, simulated))| RankedSchedule {
            rank: rank + 1,
            key: candidate.key,
            schedule: candidate.schedule,
            score: candidate.score,
            simulated,
        })
        .collect()
}

/// Play one fight to completion on the given roster and write the spent PP
/// back into it.
pub fn run_fight(
    simulator: &Simulator<'_>,
    roster: &mut [Attacker],
    fight: &FightSpec,
    label: &str,
    turn_cap: Option<u32>,
) -> BattleState {
    let team: Vec<Attacker> = fight
        .attackers
        .iter()
        .filter_map(|id| roster.iter().find(|unit| &unit.id == id).cloned())
        .collect();
    let mut state = simulator.init_fight(label, &team, &fight.defenders);
    if let Some(cap) = turn_cap {
        state.set_turn_cap(cap);
    }
    simulator.run_to_completion(&mut state);
    for unit in roster.iter_mut() {
        if let Some(moves) = state.attacker_moves(&unit.id) {
            unit.moves = moves.to_vec();
        }
    }
    state
}

/// Simulate every fight of a schedule in order against one private roster
/// copy, so PP spent early is missing later.
pub fn simulate_schedule(
    simulator: &Simulator<'_>,
    roster: &[Attacker],
    schedule: &Schedule,
    turn_cap: Option<u32>,
) -> SimulatedScore {
    let mut roster = roster.to_vec();
    let mut fights_won = 0;
    let mut turns = 0;
    let mut tiers: Vec<u8> = Vec::new();
    for (idx, fight) in schedule.fights.iter().enumerate() {
        let label = format!("fight-{}", idx + 1);
        let state = run_fight(simulator, &mut roster, fight, &label, turn_cap);
        if state.status() == FightStatus::Won {
            fights_won += 1;
        }
        turns += state.turn();
        tiers.extend(
            state
                .actions()
                .iter()
                .filter(|a| a.side == Side::Attackers)
                .map(|a| a.tier.unwrap_or(UNRESOLVED_TIER)),
        );
    }
    let average_tier = if tiers.is_empty() {
        UNRESOLVED_TIER as f64
    } else {
        tiers.iter().map(|&t| t as f64).sum::<f64>() / tiers.len() as f64
    };
    SimulatedScore {
        fights_won,
        average_tier,
        pp_used: tiers.len() as u32,
        turns,
    }
}
