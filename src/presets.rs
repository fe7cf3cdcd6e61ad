//! Built-in example chains.

use std::fmt;
use std::str::FromStr;

use crate::dims::DimensionSequence;

/// Example chains of increasing size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Three matrices: `10x20, 20x30, 30x40`.
    Simple,
    /// Six matrices.
    Medium,
    /// The six-matrix CLRS textbook chain (optimal cost 15125).
    Complex,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Simple, Preset::Medium, Preset::Complex];

    pub fn values(self) -> &'static [i64] {
        match self {
            Preset::Simple => &[10, 20, 30, 40],
            Preset::Medium => &[5, 10, 3, 12, 5, 50, 6],
            Preset::Complex => &[30, 35, 15, 5, 10, 20, 25],
        }
    }

    pub fn dims(self) -> DimensionSequence {
        match DimensionSequence::from_values(self.values().iter().copied()) {
            Ok(dims) => dims,
            Err(err) => unreachable!("preset {self} is invalid: {err}"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Simple => "simple",
            Preset::Medium => "medium",
            Preset::Complex => "complex",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "simple" => Ok(Preset::Simple),
            "medium" => Ok(Preset::Medium),
            "complex" => Ok(Preset::Complex),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Preset;
    use crate::planner::ChainPlanner;

    #[test]
    fn presets_plan_to_known_costs() {
        let planner = ChainPlanner::new();
        let costs: Vec<_> = Preset::ALL
            .iter()
            .map(|p| planner.plan_dims(&p.dims()).min_cost())
            .collect();
        assert_eq!(costs, vec![18000, 2010, 15125]);
    }

    #[test]
    fn names_round_trip() {
        for p in Preset::ALL {
            assert_eq!(p.name().parse::<Preset>(), Ok(p));
        }
        assert!("huge".parse::<Preset>().is_err());
    }
}
