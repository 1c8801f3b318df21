use serde::Deserialize;
use std::collections::HashMap;

pub const TYPES: [&str; 18] = [
    "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

type RawChart = HashMap<String, HashMap<String, f64>>;

/// Attacking type × defending type → factor. Missing entries are neutral.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawChart")]
pub struct TypeChart {
    entries: HashMap<String, HashMap<String, f64>>,
}

impl From<RawChart> for TypeChart {
    fn from(raw: RawChart) -> Self {
        let mut chart = TypeChart::default();
        for (attacking, row) in raw {
            for (defending, factor) in row {
                chart.set(&attacking, &defending, factor);
            }
        }
        chart
    }
}

impl TypeChart {
    /// The current-generation chart, used when the data file ships none.
    pub fn standard() -> Self {
        let mut chart = TypeChart::default();
        for attacking in TYPES {
            for defending in TYPES {
                let factor = standard_factor(attacking, defending);
                if factor != 1.0 {
                    chart.set(attacking, defending, factor);
                }
            }
        }
        chart
    }

    pub fn set(&mut self, attacking: &str, defending: &str, factor: f64) {
        self.entries
            .entry(attacking.to_ascii_lowercase())
            .or_default()
            .insert(defending.to_ascii_lowercase(), factor.max(0.0));
    }

    pub fn factor(&self, attacking: &str, defending: &str) -> f64 {
        self.entries
            .get(&attacking.to_ascii_lowercase())
            .and_then(|row| row.get(&defending.to_ascii_lowercase()))
            .copied()
            .unwrap_or(1.0)
    }

    /// Product of the chart factor over every defending type.
    pub fn effectiveness(&self, move_type: Option<&str>, target_types: &[String]) -> f64 {
        let Some(move_type) = move_type else {
            return 1.0;
        };
        target_types
            .iter()
            .map(|t| self.factor(move_type, t))
            .product()
    }
}

fn standard_factor(attacking: &str, defending: &str) -> f64 {
    match attacking {
        "normal" => match defending {
            "rock" | "steel" => 0.5,
            "ghost" => 0.0,
            _ => 1.0,
        },
        "fire" => match defending {
            "fire" | "water" | "rock" | "dragon" => 0.5,
            "grass" | "ice" | "bug" | "steel" => 2.0,
            _ => 1.0,
        },
        "water" => match defending {
            "water" | "grass" | "dragon" => 0.5,
            "fire" | "ground" | "rock" => 2.0,
            _ => 1.0,
        },
        "electric" => match defending {
            "electric" | "grass" | "dragon" => 0.5,
            "water" | "flying" => 2.0,
            "ground" => 0.0,
            _ => 1.0,
        },
        "grass" => match defending {
            "fire" | "grass" | "poison" | "flying" | "bug" | "dragon" | "steel" => 0.5,
            "water" | "ground" | "rock" => 2.0,
            _ => 1.0,
        },
        "ice" => match defending {
            "fire" | "water" | "ice" | "steel" => 0.5,
            "grass" | "ground" | "flying" | "dragon" => 2.0,
            _ => 1.0,
        },
        "fighting" => match defending {
            "normal" | "ice" | "rock" | "dark" | "steel" => 2.0,
            "poison" | "flying" | "psychic" | "bug" | "fairy" => 0.5,
            "ghost" => 0.0,
            _ => 1.0,
        },
        "poison" => match defending {
            "grass" | "fairy" => 2.0,
            "poison" | "ground" | "rock" | "ghost" => 0.5,
            "steel" => 0.0,
            _ => 1.0,
        },
        "ground" => match defending {
            "fire" | "electric" | "poison" | "rock" | "steel" => 2.0,
            "grass" | "bug" => 0.5,
            "flying" => 0.0,
            _ => 1.0,
        },
        "flying" => match defending {
            "grass" | "fighting" | "bug" => 2.0,
            "electric" | "rock" | "steel" => 0.5,
            _ => 1.0,
        },
        "psychic" => match defending {
            "fighting" | "poison" => 2.0,
            "psychic" | "steel" => 0.5,
            "dark" => 0.0,
            _ => 1.0,
        },
        "bug" => match defending {
            "grass" | "psychic" | "dark" => 2.0,
            "fire" | "fighting" | "poison" | "flying" | "ghost" | "steel" | "fairy" => 0.5,
            _ => 1.0,
        },
        "rock" => match defending {
            "fire" | "ice" | "flying" | "bug" => 2.0,
            "fighting" | "ground" | "steel" => 0.5,
            _ => 1.0,
        },
        "ghost" => match defending {
            "ghost" | "psychic" => 2.0,
            "dark" => 0.5,
            "normal" => 0.0,
            _ => 1.0,
        },
        "dragon" => match defending {
            "dragon" => 2.0,
            "steel" => 0.5,
            "fairy" => 0.0,
            _ => 1.0,
        },
        "dark" => match defending {
            "psychic" | "ghost" => 2.0,
            "fighting" | "dark" | "fairy" => 0.5,
            _ => 1.0,
        },
        "steel" => match defending {
            "rock" | "ice" | "fairy" => 2.0,
            "fire" | "water" | "electric" | "steel" => 0.5,
            _ => 1.0,
        },
        "fairy" => match defending {
            "fighting" | "dragon" | "dark" => 2.0,
            "fire" | "poison" | "steel" => 0.5,
            _ => 1.0,
        },
        _ => 1.0,
    }
}
