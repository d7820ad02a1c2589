//! # Relation Registry
//!
//! Every relation the derivation imposes or verifies, with metadata for the
//! presentation layer.
//!
//! ## Usage
//!
//! ```rust
//! use brace_core::equations::registry::Relation;
//!
//! let meta = Relation::TorqueBalance.metadata();
//! assert_eq!(meta.formula_plain, "r_1x*F_1y - r_1y*F_1x + r_2x*F_2y - r_2y*F_2x = 0");
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Relation Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationCategory {
    /// Net force and net torque balance
    Equilibrium,
    /// Constraints that pin the free parameter
    Parametrization,
    /// Conditions defining a minimum-force configuration
    Optimality,
}

impl RelationCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationCategory::Equilibrium => "Equilibrium",
            RelationCategory::Parametrization => "Parametrization",
            RelationCategory::Optimality => "Optimality",
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a symbol appearing in a relation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str) -> Self {
        Self { symbol, description }
    }
}

// ============================================================================
// Relation Metadata
// ============================================================================

#[derive(Debug, Clone)]
pub struct RelationMetadata {
    /// Human-readable name (e.g., "Net Torque Balance")
    pub name: &'static str,
    pub description: &'static str,
    /// The relation in plain text
    pub formula_plain: &'static str,
    pub variables: Vec<Variable>,
    pub category: RelationCategory,
}

// ============================================================================
// Relation Enum
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// ΣFx = 0
    ForceBalanceX,
    /// ΣFy = -g
    ForceBalanceY,
    /// Στ = 0 about the origin
    TorqueBalance,
    /// Torque of contact 1 equals t
    TensionDefinition,
    /// A chosen force component equals t
    PinnedComponent,
    /// Torque of contact 1 vanishes on its own
    IndividualTorqueOne,
    /// Torque of contact 2 vanishes on its own
    IndividualTorqueTwo,
    /// d|F_k|²/dt = 0
    StationaryMagnitude,
    /// F_k · (r1 - r2) = 0
    PerpendicularToJoin,
}

impl Relation {
    pub fn metadata(&self) -> RelationMetadata {
        match self {
            Relation::ForceBalanceX => RelationMetadata {
                name: "Horizontal Force Balance",
                description: "Horizontal contact forces cancel",
                formula_plain: "F_1x + F_2x = 0",
                variables: vec![
                    Variable::new("F_1x", "Horizontal force at contact 1"),
                    Variable::new("F_2x", "Horizontal force at contact 2"),
                ],
                category: RelationCategory::Equilibrium,
            },
            Relation::ForceBalanceY => RelationMetadata {
                name: "Vertical Force Balance",
                description: "Vertical contact forces sum to the downward load",
                formula_plain: "F_1y + F_2y = -g",
                variables: vec![
                    Variable::new("F_1y", "Vertical force at contact 1"),
                    Variable::new("F_2y", "Vertical force at contact 2"),
                    Variable::new("g", "Load parameter"),
                ],
                category: RelationCategory::Equilibrium,
            },
            Relation::TorqueBalance => RelationMetadata {
                name: "Net Torque Balance",
                description: "Contact torques about the origin cancel",
                formula_plain: "r_1x*F_1y - r_1y*F_1x + r_2x*F_2y - r_2y*F_2x = 0",
                variables: vec![
                    Variable::new("r_kx, r_ky", "Position of contact k"),
                    Variable::new("F_kx, F_ky", "Force at contact k"),
                ],
                category: RelationCategory::Equilibrium,
            },
            Relation::TensionDefinition => RelationMetadata {
                name: "Tension Definition",
                description: "The free parameter is the torque carried by contact 1",
                formula_plain: "r_1x*F_1y - r_1y*F_1x = t",
                variables: vec![Variable::new("t", "Internal tension")],
                category: RelationCategory::Parametrization,
            },
            Relation::PinnedComponent => RelationMetadata {
                name: "Pinned Force Component",
                description: "One force component is fixed to the free parameter",
                formula_plain: "F_ka = t",
                variables: vec![Variable::new("F_ka", "The pinned component")],
                category: RelationCategory::Parametrization,
            },
            Relation::IndividualTorqueOne => RelationMetadata {
                name: "Zero Torque at Contact 1",
                description: "Contact 1 carries no torque about the origin",
                formula_plain: "r_1x*F_1y - r_1y*F_1x = 0",
                variables: vec![],
                category: RelationCategory::Optimality,
            },
            Relation::IndividualTorqueTwo => RelationMetadata {
                name: "Zero Torque at Contact 2",
                description: "Contact 2 carries no torque about the origin",
                formula_plain: "r_2x*F_2y - r_2y*F_2x = 0",
                variables: vec![],
                category: RelationCategory::Optimality,
            },
            Relation::StationaryMagnitude => RelationMetadata {
                name: "Stationary Force Magnitude",
                description: "The squared force magnitude at the minimized contact is stationary in t",
                formula_plain: "d/dt (F_kx^2 + F_ky^2) = 0",
                variables: vec![Variable::new("k", "Minimized contact")],
                category: RelationCategory::Optimality,
            },
            Relation::PerpendicularToJoin => RelationMetadata {
                name: "Perpendicular to Contact Line",
                description: "The minimized force is perpendicular to the line joining the contacts",
                formula_plain: "F_kx*(r_1x - r_2x) + F_ky*(r_1y - r_2y) = 0",
                variables: vec![Variable::new("k", "Minimized contact")],
                category: RelationCategory::Optimality,
            },
        }
    }

    pub fn in_category(category: RelationCategory) -> Vec<Relation> {
        ALL_RELATIONS
            .iter()
            .copied()
            .filter(|r| r.metadata().category == category)
            .collect()
    }
}

pub static ALL_RELATIONS: &[Relation] = &[
    Relation::ForceBalanceX,
    Relation::ForceBalanceY,
    Relation::TorqueBalance,
    Relation::TensionDefinition,
    Relation::PinnedComponent,
    Relation::IndividualTorqueOne,
    Relation::IndividualTorqueTwo,
    Relation::StationaryMagnitude,
    Relation::PerpendicularToJoin,
];

/// Markdown reference of all relations, grouped by category.
pub fn generate_relations_markdown() -> String {
    let mut output = String::from("# Relations\n");
    for category in [
        RelationCategory::Equilibrium,
        RelationCategory::Parametrization,
        RelationCategory::Optimality,
    ] {
        output.push_str(&format!("\n## {}\n", category.display_name()));
        for relation in Relation::in_category(category) {
            let meta = relation.metadata();
            output.push_str(&format!("\n### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("```text\n{}\n```\n", meta.formula_plain));
            if !meta.variables.is_empty() {
                output.push('\n');
                for var in &meta.variables {
                    output.push_str(&format!("- `{}`: {}\n", var.symbol, var.description));
                }
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_relation_listed_once() {
        let mut seen = std::collections::HashSet::new();
        for r in ALL_RELATIONS {
            assert!(seen.insert(*r), "{:?} listed twice", r);
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_categories_partition_relations() {
        let total: usize = [
            RelationCategory::Equilibrium,
            RelationCategory::Parametrization,
            RelationCategory::Optimality,
        ]
        .iter()
        .map(|c| Relation::in_category(*c).len())
        .sum();
        assert_eq!(total, ALL_RELATIONS.len());
        assert_eq!(Relation::in_category(RelationCategory::Equilibrium).len(), 3);
    }

    #[test]
    fn test_markdown_contains_all_names() {
        let md = generate_relations_markdown();
        for r in ALL_RELATIONS {
            assert!(md.contains(r.metadata().name));
        }
    }
}
