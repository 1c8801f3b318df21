use crate::battle::{FightStatus, Side, Simulator};
use crate::model::{Attacker, GameData};
use crate::settings::CalcSettings;
use crate::solver::{real_key, run_fight, RankedSchedule, Schedule};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PpDelta {
    pub attacker: String,
    pub move_name: String,
    pub used: u8,
}

/// Everything one activated fight changed, enough to undo it exactly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FightLogEntry {
    pub label: String,
    pub attackers: [String; 2],
    pub defenders: Vec<String>,
    pub pp_deltas: Vec<PpDelta>,
    /// Real enemy keys first defeated by this fight.
    pub claimed: Vec<String>,
    pub status: FightStatus,
    pub turns: u32,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CycleMark {
    index: usize,
    first_entry: usize,
}

/// The real roster and claimed enemies of a wave in progress.
#[derive(Debug, Clone)]
pub struct WaveProgress {
    roster: Vec<Attacker>,
    claimed: BTreeSet<String>,
    entries: Vec<FightLogEntry>,
    cycled: Option<CycleMark>,
    turn_cap: Option<u32>,
}

impl WaveProgress {
    pub fn new(roster: Vec<Attacker>) -> Self {
        WaveProgress {
            roster: roster.into_iter().map(Attacker::normalized).collect(),
            claimed: BTreeSet::new(),
            entries: Vec::new(),
            cycled: None,
            turn_cap: None,
        }
    }

    pub fn with_turn_cap(mut self, cap: Option<u32>) -> Self {
        self.turn_cap = cap;
        self
    }

    pub fn roster(&self) -> &[Attacker] {
        &self.roster
    }

    pub fn claimed(&self) -> &BTreeSet<String> {
        &self.claimed
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        self.claimed.contains(real_key(key))
    }

    pub fn entries(&self) -> &[FightLogEntry] {
        &self.entries
    }

    /// Index of the ranked schedule currently applied by cycling.
    pub fn cycle_index(&self) -> Option<usize> {
        self.cycled.map(|mark| mark.index)
    }

    /// Play every fight of `schedule` on the real roster, one log entry per
    /// fight.
    pub fn activate(
        &mut self,
        data: &GameData,
        settings: &CalcSettings,
        schedule: &Schedule,
    ) -> &[FightLogEntry] {
        self.cycled = None;
        let first = self.apply(data, settings, schedule);
        &self.entries[first..]
    }

    /// Undo the most recent fight entry, restoring PP and claims.
    pub fn undo_last(&mut self) -> Option<FightLogEntry> {
        let entry = self.entries.pop()?;
        for delta in &entry.pp_deltas {
            let Some(slot) = self
                .roster
                .iter_mut()
                .find(|unit| unit.id == delta.attacker)
                .and_then(|unit| unit.move_slot_mut(&delta.move_name))
            else {
                log::warn!("undo: {} no longer knows {}", delta.attacker, delta.move_name);
                continue;
            };
            slot.remaining_uses = slot.remaining_uses.saturating_add(delta.used).min(slot.max_uses);
        }
        for key in &entry.claimed {
            self.claimed.remove(key);
        }
        if let Some(mark) = self.cycled {
            if self.entries.len() <= mark.first_entry {
                self.cycled = None;
            }
        }
        Some(entry)
    }

    /// Replace the previously cycled activation with `ranked[index]`.
    pub fn cycle_to(
        &mut self,
        data: &GameData,
        settings: &CalcSettings,
        ranked: &[RankedSchedule],
        index: usize,
    ) -> Option<&[FightLogEntry]> {
        let choice = ranked.get(index)?;
        if let Some(mark) = self.cycled.take() {
            while self.entries.len() > mark.first_entry {
                self.undo_last();
            }
        }
        let first = self.apply(data, settings, &choice.schedule);
        self.cycled = Some(CycleMark {
            index,
            first_entry: first,
        });
        Some(&self.entries[first..])
    }

    pub fn cycle_next(
        &mut self,
        data: &GameData,
        settings: &CalcSettings,
        ranked: &[RankedSchedule],
    ) -> Option<&[FightLogEntry]> {
        if ranked.is_empty() {
            return None;
        }
        let next = self
            .cycle_index()
            .map(|idx| (idx + 1) % ranked.len())
            .unwrap_or(0);
        self.cycle_to(data, settings, ranked, next)
    }

    fn apply(&mut self, data: &GameData, settings: &CalcSettings, schedule: &Schedule) -> usize {
        let first = self.entries.len();
        let simulator = Simulator::new(data, settings);
        for (idx, fight) in schedule.fights.iter().enumerate() {
            let label = format!("fight-{}", first + idx + 1);
            let before = self.roster.clone();
            let state = run_fight(&simulator, &mut self.roster, fight, &label, self.turn_cap);

            let mut pp_deltas = Vec::new();
            for (old, new) in before.iter().zip(&self.roster) {
                for (old_slot, new_slot) in old.moves.iter().zip(&new.moves) {
                    let used = old_slot.remaining_uses.saturating_sub(new_slot.remaining_uses);
                    if used > 0 {
                        pp_deltas.push(PpDelta {
                            attacker: new.id.clone(),
                            move_name: new_slot.name.clone(),
                            used,
                        });
                    }
                }
            }

            let mut claimed = Vec::new();
            for enemy in &fight.defenders {
                let fainted = state
                    .hp(Side::Defenders, &enemy.key)
                    .map(|hp| hp <= 0.0)
                    .unwrap_or(false);
                let key = real_key(&enemy.key);
                if fainted && self.claimed.insert(key.to_string()) {
                    claimed.push(key.to_string());
                }
            }
            log::debug!(
                "{label}: {:?} after {} turns, claimed {claimed:?}",
                state.status(),
                state.turn()
            );

            self.entries.push(FightLogEntry {
                label,
                attackers: fight.attackers.clone(),
                defenders: fight.defenders.iter().map(|d| d.key.clone()).collect(),
                pp_deltas,
                claimed,
                status: state.status(),
                turns: state.turn(),
                log: state.log().log_lines().to_vec(),
            });
        }
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MoveSlot;

    fn unit(id: &str) -> Attacker {
        Attacker {
            id: id.to_string(),
            species: "Nowhere".to_string(),
            level: 50,
            tags: Vec::new(),
            moves: vec![MoveSlot::new("Tackle", 1, 5)],
        }
    }

    #[test]
    fn undo_restores_pp_and_claims() {
        let mut progress = WaveProgress::new(vec![unit("a")]);
        progress.roster[0].moves[0].remaining_uses = 3;
        progress.claimed.insert("geodude".to_string());
        progress.entries.push(FightLogEntry {
            label: "fight-1".to_string(),
            attackers: ["a".to_string(), "b".to_string()],
            defenders: vec!["geodude".to_string(), "geodude+pad1".to_string()],
            pp_deltas: vec![PpDelta {
                attacker: "a".to_string(),
                move_name: "Tackle".to_string(),
                used: 2,
            }],
            claimed: vec!["geodude".to_string()],
            status: FightStatus::Won,
            turns: 2,
            log: Vec::new(),
        });

        let undone = progress.undo_last();
        assert!(undone.is_some());
        assert_eq!(progress.roster()[0].moves[0].remaining_uses, 5);
        assert!(!progress.is_claimed("geodude+pad1"));
        assert!(progress.entries().is_empty());
        assert!(progress.undo_last().is_none());
    }

    #[test]
    fn restored_pp_never_exceeds_max() {
        let mut progress = WaveProgress::new(vec![unit("a")]);
        progress.entries.push(FightLogEntry {
            label: "fight-1".to_string(),
            attackers: ["a".to_string(), "b".to_string()],
            defenders: Vec::new(),
            pp_deltas: vec![PpDelta {
                attacker: "a".to_string(),
                move_name: "tackle".to_string(),
                used: 9,
            }],
            claimed: Vec::new(),
            status: FightStatus::Stalled,
            turns: 1,
            log: Vec::new(),
        });
        progress.undo_last();
        assert_eq!(progress.roster()[0].moves[0].remaining_uses, 5);
    }
}
