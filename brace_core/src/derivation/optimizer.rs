//! # Minimum-Force Optimizer
//!
//! Picks members of a tension-parametrized family by one of two criteria:
//!
//! - [`MinimizationMode::Stationary`]: `d|F_k|²/dt = 0` for the chosen contact.
//!   At the solution `F_k` is perpendicular to `r1 - r2`.
//! - [`MinimizationMode::ZeroIndividualTorque`]: each contact carries zero
//!   torque on its own, which on a tension family means `t = 0`.
//!
//! All roots are returned. A family whose force at the contact does not
//! depend on `t` is degenerate.

use std::fmt;

use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::equations::Relation;
use crate::errors::{BraceError, BraceResult};
use crate::geometry::{Contact, Geometry, Position};
use crate::symbolic::{solve_univariate, Expr, Roots};

use super::family::SolutionFamily;
use super::normalize::common_scale;

const STAGE: &str = "minimization";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimizationMode {
    Stationary,
    ZeroIndividualTorque,
}

impl MinimizationMode {
    pub const ALL: [MinimizationMode; 2] = [
        MinimizationMode::Stationary,
        MinimizationMode::ZeroIndividualTorque,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MinimizationMode::Stationary => "stationary",
            MinimizationMode::ZeroIndividualTorque => "zero individual torque",
        }
    }

    /// The relation imposed when minimizing at `contact`.
    pub fn relation(self, contact: Contact) -> Relation {
        match (self, contact) {
            (MinimizationMode::Stationary, _) => Relation::StationaryMagnitude,
            (MinimizationMode::ZeroIndividualTorque, Contact::One) => Relation::IndividualTorqueOne,
            (MinimizationMode::ZeroIndividualTorque, Contact::Two) => Relation::IndividualTorqueTwo,
        }
    }
}

impl fmt::Display for MinimizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A critical parameter value and the forces there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriticalValue {
    pub parameter: Expr,
    pub forces: [Expr; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinimumForce {
    pub mode: MinimizationMode,
    pub contact: Contact,
    pub critical: Vec<CriticalValue>,
}

fn roots_of(condition: &Expr, family: &SolutionFamily, contact: Contact, what: &str) -> BraceResult<Vec<Expr>> {
    match solve_univariate(condition, &family.parameter)? {
        Roots::Identity => Err(BraceError::degenerate_geometry(
            STAGE,
            format!("{} holds for every {} at {}", what, family.parameter, contact),
        )),
        Roots::Finite(roots) if roots.is_empty() => Err(BraceError::no_stationary_point(
            contact.label(),
            format!("{} has no solution in {}", what, family.parameter),
        )),
        Roots::Finite(roots) => Ok(roots),
    }
}

/// Roots of `d|F_k|²/dt = 0`.
pub fn stationary_parameters(family: &SolutionFamily, contact: Contact) -> BraceResult<Vec<Expr>> {
    let magnitude = family.squared_magnitude(contact);
    let slope = magnitude.derivative(&family.parameter);
    debug!(%contact, magnitude = %magnitude, derivative = %slope, "stationary condition");
    roots_of(&slope, family, contact, "stationary condition")
}

/// Roots of `F_k · (r1 - r2) = 0`.
pub fn perpendicular_parameters(
    family: &SolutionFamily,
    geometry: &Geometry,
    contact: Contact,
) -> BraceResult<Vec<Expr>> {
    let (fx, fy) = family.force(contact);
    let along = Position::new(fx.clone(), fy.clone()).dot(&geometry.separation());
    roots_of(&along, family, contact, "perpendicularity")
}

/// Roots of `τ_k = 0`.
pub fn zero_torque_parameters(
    family: &SolutionFamily,
    geometry: &Geometry,
    contact: Contact,
) -> BraceResult<Vec<Expr>> {
    let torque = family.torque(geometry, contact);
    roots_of(&torque, family, contact, "zero torque")
}

/// Minimizes the force at `contact` under `mode`.
///
/// Fails with `DegenerateGeometry` when the mode's scale factor vanishes,
/// zero load included.
pub fn minimize(
    family: &SolutionFamily,
    geometry: &Geometry,
    contact: Contact,
    mode: MinimizationMode,
) -> BraceResult<MinimumForce> {
    common_scale(geometry, mode)?;
    let parameters = match mode {
        MinimizationMode::Stationary => stationary_parameters(family, contact)?,
        MinimizationMode::ZeroIndividualTorque => zero_torque_parameters(family, geometry, contact)?,
    };

    let mut critical = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        let forces = family.at(&parameter)?;
        if mode == MinimizationMode::ZeroIndividualTorque {
            let other = contact.other();
            let position = geometry.position(other);
            let i = other.index() * 2;
            let torque = position.torque(&forces[i], &forces[i + 1]);
            if !torque.is_zero() {
                error!(%contact, torque = %torque, "other contact still carries torque");
                return Err(BraceError::inconsistent(
                    "zero individual torque",
                    format!("torque at {}", other),
                    "0",
                    torque.to_string(),
                ));
            }
        }
        debug!(%mode, %contact, parameter = %parameter, "critical value");
        critical.push(CriticalValue { parameter, forces });
    }
    Ok(MinimumForce {
        mode,
        contact,
        critical,
    })
}

/// Requires `F_k · (r1 - r2) = 0` for the given forces.
pub fn check_perpendicular(geometry: &Geometry, forces: &[Expr; 4], contact: Contact) -> BraceResult<()> {
    let i = contact.index() * 2;
    let force = Position::new(forces[i].clone(), forces[i + 1].clone());
    let dot = force.dot(&geometry.separation());
    if !dot.is_zero() {
        error!(%contact, dot = %dot, "minimum force is not perpendicular to the contact line");
        return Err(BraceError::inconsistent(
            "perpendicularity",
            contact.label(),
            "0",
            dot.to_string(),
        ));
    }
    Ok(())
}

/// The family member at `t = (1 - s)·t1 + s·t2`.
///
/// With `t1`, `t2` the minima at contacts 1 and 2 this shifts the load from
/// the first minimum (`s = 0`) to the second (`s = 1`). A constant `s` must
/// lie in `[0, 1]`.
pub fn force_distribution(family: &SolutionFamily, t1: &Expr, t2: &Expr, s: &Expr) -> BraceResult<[Expr; 4]> {
    if let Some(value) = s.as_rational() {
        if value < BigRational::zero() || value > BigRational::one() {
            return Err(BraceError::invalid_input(
                "distribution",
                value.to_string(),
                "must lie between 0 and 1",
            ));
        }
    }
    let t = &(&(&Expr::one() - s) * t1) + &(s * t2);
    family.at(&t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::parametrized::{solve_parametrized, Pin};

    fn fixture() -> Geometry {
        Geometry::at(Position::int(1, 0), Position::int(0, -1))
    }

    fn g() -> Expr {
        Expr::symbol("g")
    }

    fn half(e: &Expr) -> Expr {
        e * &Expr::ratio(1, 2)
    }

    #[test]
    fn test_fixture_minimum_at_contact_one() {
        let geometry = fixture();
        let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
        let min = minimize(&family, &geometry, Contact::One, MinimizationMode::Stationary).unwrap();
        assert_eq!(min.critical.len(), 1);
        assert_eq!(min.critical[0].parameter, Expr::zero());
        assert_eq!(min.critical[0].forces, [Expr::zero(), Expr::zero(), Expr::zero(), -g()]);
    }

    #[test]
    fn test_fixture_minimum_at_contact_two() {
        let geometry = fixture();
        let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
        let min = minimize(&family, &geometry, Contact::Two, MinimizationMode::Stationary).unwrap();
        let h = half(&g());
        assert_eq!(min.critical[0].parameter, -&h);
        assert_eq!(min.critical[0].forces, [-&h, -&h, h.clone(), -&h]);
        check_perpendicular(&geometry, &min.critical[0].forces, Contact::Two).unwrap();
    }

    #[test]
    fn test_perpendicular_route_agrees_symbolically() {
        let geometry = Geometry::symbolic();
        let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
        for contact in Contact::ALL {
            assert_eq!(
                stationary_parameters(&family, contact).unwrap(),
                perpendicular_parameters(&family, &geometry, contact).unwrap()
            );
        }
    }

    #[test]
    fn test_zero_torque_mode_is_symmetric() {
        let geometry = Geometry::symbolic();
        let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
        let one = minimize(&family, &geometry, Contact::One, MinimizationMode::ZeroIndividualTorque).unwrap();
        let two = minimize(&family, &geometry, Contact::Two, MinimizationMode::ZeroIndividualTorque).unwrap();
        assert_eq!(one.critical[0].parameter, Expr::zero());
        assert_eq!(one.critical, two.critical);
    }

    #[test]
    fn test_constant_force_is_degenerate() {
        let family = SolutionFamily::new(
            crate::geometry::tension_symbol().clone(),
            [Expr::one(), Expr::zero(), Expr::symbol("t"), Expr::zero()],
        );
        let err = stationary_parameters(&family, Contact::One).unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_GEOMETRY");
    }

    #[test]
    fn test_singular_force_has_no_stationary_point() {
        // |F_1|² = 1/t², whose derivative -2/t³ never vanishes
        let t = Expr::symbol("t");
        let family = SolutionFamily::new(
            crate::geometry::tension_symbol().clone(),
            [t.inv().unwrap(), Expr::zero(), Expr::zero(), Expr::zero()],
        );
        let err = stationary_parameters(&family, Contact::One).unwrap_err();
        assert_eq!(err.error_code(), "NO_STATIONARY_POINT");
    }

    #[test]
    fn test_minimize_rejects_zero_load() {
        let geometry = Geometry::new(Position::int(1, 0), Position::int(0, -1), Expr::zero());
        let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
        for mode in MinimizationMode::ALL {
            let err = minimize(&family, &geometry, Contact::One, mode).unwrap_err();
            assert_eq!(err.error_code(), "DEGENERATE_GEOMETRY");
        }
    }

    #[test]
    fn test_perpendicular_check_rejects_oblique_force() {
        let forces = [Expr::one(), Expr::zero(), Expr::zero(), Expr::zero()];
        let err = check_perpendicular(&fixture(), &forces, Contact::One).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_force_distribution_blends_minima() {
        let geometry = fixture();
        let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
        let t2 = -half(&g());
        let mid = force_distribution(&family, &Expr::zero(), &t2, &Expr::ratio(1, 2)).unwrap();
        let q = &g() * &Expr::ratio(1, 4);
        assert_eq!(mid, [-&q, -&q, q.clone(), &q - &g()]);

        let end = force_distribution(&family, &Expr::zero(), &t2, &Expr::one()).unwrap();
        assert_eq!(end, family.at(&t2).unwrap());
    }

    #[test]
    fn test_force_distribution_rejects_out_of_range() {
        let geometry = fixture();
        let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
        let err = force_distribution(&family, &Expr::zero(), &Expr::one(), &Expr::int(2)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
