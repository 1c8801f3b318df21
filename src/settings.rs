use serde::{Deserialize, Serialize};

pub const MAX_STAB_BONUS: f64 = 100.0;
pub const MAX_OTHER_MULTIPLIER: f64 = 10.0;

fn default_true() -> bool {
    true
}

fn default_stab_bonus() -> f64 {
    5.0
}

fn default_other_multiplier() -> f64 {
    1.0
}

/// Switches for conditional mechanics plus scoring knobs. Passed by
/// reference into every calculation; never stored globally.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcSettings {
    /// Apply the -1 Atk drop against physical attacks into an Intimidate holder.
    #[serde(default = "default_true")]
    pub intimidate: bool,
    /// Honor full-HP survival (Sturdy).
    #[serde(default = "default_true")]
    pub sturdy: bool,
    /// Let auto selection pick area moves that would faint the partner.
    #[serde(default)]
    pub allow_friendly_fire: bool,
    /// On equal speed across sides the enemy acts first.
    #[serde(default)]
    pub enemy_first_on_speed_tie: bool,
    /// The second attacker avoids targets the first one already picked.
    #[serde(default = "default_true")]
    pub spread_targets: bool,
    /// Percent points credited to a same-type move when nothing one-shots.
    #[serde(default = "default_stab_bonus")]
    pub stab_bonus: f64,
    #[serde(default = "default_other_multiplier")]
    pub other_multiplier: f64,
}

impl Default for CalcSettings {
    fn default() -> Self {
        CalcSettings {
            intimidate: true,
            sturdy: true,
            allow_friendly_fire: false,
            enemy_first_on_speed_tie: false,
            spread_targets: true,
            stab_bonus: default_stab_bonus(),
            other_multiplier: default_other_multiplier(),
        }
    }
}

impl CalcSettings {
    /// Copy with every numeric option clamped into its valid domain.
    pub fn validated(&self) -> Self {
        CalcSettings {
            stab_bonus: clamp_finite(self.stab_bonus, 0.0, MAX_STAB_BONUS, default_stab_bonus()),
            other_multiplier: clamp_finite(
                self.other_multiplier,
                0.0,
                MAX_OTHER_MULTIPLIER,
                default_other_multiplier(),
            ),
            ..self.clone()
        }
    }
}

pub(crate) fn clamp_finite(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validated_clamps_numbers() {
        let settings = CalcSettings {
            stab_bonus: -3.0,
            other_multiplier: 250.0,
            ..CalcSettings::default()
        }
        .validated();
        assert_eq!(settings.stab_bonus, 0.0);
        assert_eq!(settings.other_multiplier, MAX_OTHER_MULTIPLIER);
    }

    #[test]
    fn non_finite_values_fall_back() {
        let settings = CalcSettings {
            other_multiplier: f64::NAN,
            ..CalcSettings::default()
        }
        .validated();
        assert_eq!(settings.other_multiplier, 1.0);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let settings: CalcSettings =
            serde_json::from_str(r#"{"enemyFirstOnSpeedTie": true}"#).unwrap();
        assert!(settings.enemy_first_on_speed_tie);
        assert!(settings.sturdy);
        assert_eq!(settings.stab_bonus, 5.0);
    }
}
