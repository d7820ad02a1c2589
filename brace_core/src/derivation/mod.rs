//! # Equilibrium Derivation
//!
//! The pipeline from contact geometry to normalized minimum forces:
//!
//! ```text
//! equations ─┬─ parametrized solve ──┐
//!            └─ null-space solve ────┴─ cross-check ─ minimize ─ normalize
//! ```
//!
//! Every stage is exact. Identity checks run inside the pipeline according
//! to [`DerivationSettings`] and fail with
//! [`BraceError::InconsistentFormulations`].
//!
//! ## Example
//!
//! ```rust
//! use brace_core::derivation::derive;
//! use brace_core::geometry::{Geometry, Position};
//! use brace_core::settings::DerivationSettings;
//!
//! let geometry = Geometry::at(Position::int(1, 0), Position::int(0, -1));
//! let derivation = derive(&geometry, &DerivationSettings::default()).unwrap();
//! assert_eq!(derivation.normalized.len(), 4);
//! ```

pub mod family;
pub mod normalize;
pub mod nullspace;
pub mod optimizer;
pub mod parametrized;

pub use family::SolutionFamily;
pub use normalize::{common_scale, normalize, NormalizedForces};
pub use nullspace::{cross_check, solve_null_space, NullSpaceDecomposition};
pub use optimizer::{
    check_perpendicular, force_distribution, minimize, perpendicular_parameters, stationary_parameters,
    zero_torque_parameters, CriticalValue, MinimizationMode, MinimumForce,
};
pub use parametrized::{solve_parametrized, Pin};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::equations::{build_equation_set, EquationSet, Relation};
use crate::errors::{BraceError, BraceResult};
use crate::geometry::{tension_symbol, Geometry};
use crate::settings::DerivationSettings;
use crate::symbolic::Expr;

/// Everything the pipeline produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub geometry: Geometry,
    pub equations: EquationSet,
    /// Family in the pinned parameter, before reparametrization
    pub pinned: SolutionFamily,
    /// Family whose parameter is the tension
    pub family: SolutionFamily,
    /// Present when the cross-check ran
    pub decomposition: Option<NullSpaceDecomposition>,
    pub minima: Vec<MinimumForce>,
    pub normalized: Vec<NormalizedForces>,
    /// Relations imposed or verified, in the order they were used
    pub relations: Vec<Relation>,
}

impl Derivation {
    /// Normalized results for one mode.
    pub fn normalized_for(&self, mode: MinimizationMode) -> impl Iterator<Item = &NormalizedForces> {
        self.normalized.iter().filter(move |n| n.mode == mode)
    }
}

/// Substitutes the family into the balance equations.
pub fn verify_equilibrium(family: &SolutionFamily, equations: &EquationSet) -> BraceResult<()> {
    let residuals = family.residuals(equations)?;
    for (equation, residual) in equations.equations().iter().zip(&residuals) {
        if !residual.is_zero() {
            error!(relation = ?equation.relation, residual = %residual, "family violates equilibrium");
            return Err(BraceError::inconsistent(
                "equilibrium",
                equation.relation.metadata().name,
                "0",
                residual.to_string(),
            ));
        }
    }
    Ok(())
}

/// Requires `F_1y·r_1x - F_1x·r_1y = t`.
pub fn verify_tension(family: &SolutionFamily, geometry: &Geometry) -> BraceResult<()> {
    let tension = family.tension(geometry);
    let expected = Expr::from_symbol(tension_symbol());
    if family.parameter != *tension_symbol() || tension != expected {
        error!(tension = %tension, "tension identity fails");
        return Err(BraceError::inconsistent(
            "tension identity",
            "tension",
            expected.to_string(),
            tension.to_string(),
        ));
    }
    Ok(())
}

/// Runs the whole pipeline on `geometry`.
pub fn derive(geometry: &Geometry, settings: &DerivationSettings) -> BraceResult<Derivation> {
    settings.validate()?;
    geometry.validate("derivation")?;
    info!(pin = %settings.pin, modes = settings.modes.len(), contacts = settings.contacts.len(), "starting derivation");

    let equations = build_equation_set(geometry);
    let mut relations: Vec<Relation> = equations.equations().iter().map(|e| e.relation).collect();

    let pinned = solve_parametrized(geometry, settings.pin)?;
    relations.push(settings.pin.equation(geometry).relation);
    let family = match settings.pin {
        Pin::Tension => pinned.clone(),
        Pin::Component { .. } => {
            let family = pinned.reparametrize_by_tension(geometry)?;
            relations.push(Relation::TensionDefinition);
            family
        }
    };
    debug!(family = ?family.named().iter().map(|(k, v)| format!("{} = {}", k, v)).collect::<Vec<_>>(), "solution family");

    if settings.verify_equilibrium {
        verify_equilibrium(&family, &equations)?;
    }
    if settings.verify_tension {
        verify_tension(&family, geometry)?;
    }

    let decomposition = if settings.cross_check {
        let decomposition = solve_null_space(geometry)?;
        cross_check("null-space cross-check", &family, &decomposition.family())?;
        info!("parametrized and null-space families agree");
        Some(decomposition)
    } else {
        None
    };

    let mut minima = Vec::new();
    let mut normalized = Vec::new();
    for &mode in &settings.modes {
        let scale = common_scale(geometry, mode)?;
        for &contact in &settings.contacts {
            let minimum = minimize(&family, geometry, contact, mode)?;
            let relation = mode.relation(contact);
            if !relations.contains(&relation) {
                relations.push(relation);
            }

            if mode == MinimizationMode::Stationary && settings.verify_perpendicular {
                let direct = perpendicular_parameters(&family, geometry, contact)?;
                let calculus: Vec<Expr> = minimum.critical.iter().map(|c| c.parameter.clone()).collect();
                if !same_roots(&direct, &calculus) {
                    error!(%contact, "perpendicular and stationary parameters differ");
                    return Err(BraceError::inconsistent(
                        "perpendicularity",
                        contact.label(),
                        format_roots(&direct),
                        format_roots(&calculus),
                    ));
                }
                for critical in &minimum.critical {
                    check_perpendicular(geometry, &critical.forces, contact)?;
                }
                if !relations.contains(&Relation::PerpendicularToJoin) {
                    relations.push(Relation::PerpendicularToJoin);
                }
            }

            for critical in &minimum.critical {
                normalized.push(normalize(critical, &scale, mode, contact)?);
            }
            info!(%mode, %contact, roots = minimum.critical.len(), "minimized");
            minima.push(minimum);
        }
    }

    Ok(Derivation {
        geometry: geometry.clone(),
        equations,
        pinned,
        family,
        decomposition,
        minima,
        normalized,
        relations,
    })
}

fn same_roots(a: &[Expr], b: &[Expr]) -> bool {
    a.len() == b.len() && a.iter().all(|r| b.contains(r))
}

fn format_roots(roots: &[Expr]) -> String {
    let parts: Vec<String> = roots.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Contact, Position};

    fn fixture() -> Geometry {
        Geometry::at(Position::int(1, 0), Position::int(0, -1))
    }

    #[test]
    fn test_fixture_pipeline() {
        let derivation = derive(&fixture(), &DerivationSettings::default()).unwrap();
        assert_eq!(derivation.minima.len(), 4);
        let stationary: Vec<_> = derivation.normalized_for(MinimizationMode::Stationary).collect();
        assert_eq!(stationary.len(), 2);
        assert_eq!(stationary[0].contact, Contact::One);
        assert_eq!(stationary[0].coefficients["F_2y"], Expr::int(-2));
        assert!(derivation.decomposition.is_some());
        assert!(derivation.relations.contains(&Relation::PerpendicularToJoin));
    }

    #[test]
    fn test_component_pin_is_reparametrized() {
        let settings = DerivationSettings {
            pin: Pin::CONTACT_TWO_VERTICAL,
            ..Default::default()
        };
        let derivation = derive(&fixture(), &settings).unwrap();
        let default = derive(&fixture(), &DerivationSettings::default()).unwrap();
        assert_ne!(derivation.pinned, derivation.family);
        assert_eq!(derivation.family, default.family);
        assert_eq!(derivation.normalized, default.normalized);
        assert!(derivation.relations.contains(&Relation::PinnedComponent));
    }

    #[test]
    fn test_checks_can_be_disabled() {
        let settings = DerivationSettings {
            cross_check: false,
            modes: vec![MinimizationMode::ZeroIndividualTorque],
            ..Default::default()
        };
        let derivation = derive(&fixture(), &settings).unwrap();
        assert!(derivation.decomposition.is_none());
        assert_eq!(derivation.normalized.len(), 2);
    }

    #[test]
    fn test_verify_tension_rejects_foreign_parameter() {
        let geometry = fixture();
        let pinned = solve_parametrized(&geometry, Pin::CONTACT_TWO_VERTICAL).unwrap();
        // F_2y = t is not the tension on this geometry
        let err = verify_tension(&pinned, &geometry).unwrap_err();
        assert_eq!(err.error_code(), "INCONSISTENT_FORMULATIONS");
    }

    #[test]
    fn test_coincident_contacts_fail_before_solving() {
        let geometry = Geometry::at(Position::int(3, 1), Position::int(3, 1));
        let err = derive(&geometry, &DerivationSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_GEOMETRY");
    }
}
