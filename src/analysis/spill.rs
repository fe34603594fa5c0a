use serde::{Deserialize, Serialize};

/// Estimates how expensive it would be to keep a temporary in memory.
/// The allocator spills the cheapest candidates first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpillCostModel {
    /// Every temporary costs 1.
    Uniform,
    /// Defs plus uses, divided by interference degree plus one. Pre-colored
    /// temporaries cost infinity.
    #[default]
    UseDensity,
}

impl SpillCostModel {
    pub fn cost(&self, occurrences: usize, degree: usize, precolored: bool) -> f64 {
        match self {
            SpillCostModel::Uniform => 1.0,
            SpillCostModel::UseDensity => {
                if precolored {
                    f64::INFINITY
                } else {
                    occurrences as f64 / (degree as f64 + 1.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_constant() {
        assert_eq!(SpillCostModel::Uniform.cost(10, 3, false), 1.0);
        assert_eq!(SpillCostModel::Uniform.cost(0, 0, true), 1.0);
    }

    #[test]
    fn use_density_prefers_busy_and_isolated() {
        let m = SpillCostModel::UseDensity;
        assert!(m.cost(8, 1, false) > m.cost(2, 1, false));
        assert!(m.cost(4, 0, false) > m.cost(4, 7, false));
        assert_eq!(m.cost(4, 1, false), 2.0);
        assert!(m.cost(1, 1, true).is_infinite());
    }
}
