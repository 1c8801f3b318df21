use serde_json::json;

/// Protocol-style turn log of one fight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BattleLogger {
    label: String,
    log: Vec<String>,
}

impl BattleLogger {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            log: Vec::new(),
        }
    }

    pub fn log_turn(&mut self, turn: u32) {
        self.log.push(format!("|turn|{turn}"));
    }

    pub fn log_move(&mut self, source: &str, move_name: &str, target: &str) {
        self.log.push(format!("|move|{source}|{move_name}|{target}"));
    }

    pub fn log_damage(&mut self, target: &str, hp_percent: f64) {
        self.log.push(format!("|-damage|{target}|{hp_percent:.1}"));
    }

    pub fn log_survive(&mut self, target: &str) {
        self.log.push(format!("|-endure|{target}"));
    }

    pub fn log_faint(&mut self, target: &str) {
        self.log.push(format!("|faint|{target}"));
    }

    pub fn log_switch(&mut self, slot: &str, id: &str) {
        self.log.push(format!("|switch|{slot}|{id}"));
    }

    pub fn log_no_action(&mut self, source: &str) {
        self.log.push(format!("|cant|{source}"));
    }

    pub fn log_win(&mut self, winner: &str) {
        self.log.push(format!("|win|{winner}"));
    }

    pub fn log_stall(&mut self) {
        self.log.push("|stall|".to_string());
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "fight": self.label,
            "log": self.log,
        })
    }
}

pub fn slot_ident(attacking_side: bool, slot: usize) -> String {
    let side = if attacking_side { "p1" } else { "p2" };
    let letter = if slot == 0 { 'a' } else { 'b' };
    format!("{side}{letter}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_recorded_in_order() {
        let mut logger = BattleLogger::new("fight-1");
        logger.log_turn(1);
        logger.log_move("p1a: alpha", "Surf", "p2a: beta");
        logger.log_damage("p2a: beta", 37.24);
        logger.log_faint("p2a: beta");
        assert_eq!(
            logger.log_lines(),
            &[
                "|turn|1".to_string(),
                "|move|p1a: alpha|Surf|p2a: beta".to_string(),
                "|-damage|p2a: beta|37.2".to_string(),
                "|faint|p2a: beta".to_string(),
            ]
        );
        assert_eq!(logger.to_json()["fight"], "fight-1");
    }

    #[test]
    fn slot_idents() {
        assert_eq!(slot_ident(true, 0), "p1a");
        assert_eq!(slot_ident(false, 1), "p2b");
    }
}
