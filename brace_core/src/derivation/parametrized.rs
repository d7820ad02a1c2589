//! # Parametrized Solver
//!
//! Closes the underdetermined balance system with one pinning equation and
//! solves the resulting square system exactly.
//!
//! ## Pins
//!
//! - [`Pin::Tension`]: `r_1x·F_1y - r_1y·F_1x = t`. The determinant is
//!   `r_1x·r_2y - r_1y·r_2x`, so the solve fails when the contacts are
//!   collinear with the origin.
//! - [`Pin::Component`]: a single force component equals `t`. Pinning
//!   `F_2y` gives determinant `r_1y - r_2y`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equations::equilibrium::{pinned_component, pinned_form, tension_definition};
use crate::equations::Equation;
use crate::errors::{BraceError, BraceResult};
use crate::geometry::{tension_symbol, ForceComponent, Geometry};

use super::family::SolutionFamily;

const STAGE: &str = "parametrized solve";

/// The quantity fixed to the free parameter.
///
/// The default is [`Pin::Tension`], so the parameter of a default family is
/// the tension and the tension check in [`derive`](super::derive) holds by
/// construction. [`Pin::CONTACT_TWO_VERTICAL`] pins `F_2y` instead. Its family
/// is reparametrized by tension before any comparison, which makes the
/// tension check a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pin {
    #[default]
    Tension,
    Component { component: ForceComponent },
}

impl Pin {
    /// The conventional pin on the vertical force at contact 2.
    pub const CONTACT_TWO_VERTICAL: Pin = Pin::Component {
        component: ForceComponent::F2Y,
    };

    pub fn equation(self, geometry: &Geometry) -> Equation {
        match self {
            Pin::Tension => tension_definition(geometry),
            Pin::Component { component } => pinned_component(component),
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pin::Tension => f.write_str("tension"),
            Pin::Component { component } => write!(f, "{}", component),
        }
    }
}

/// Solves the balance equations with `pin` fixed to `t`.
///
/// Returns the family in the pinned parameter. The result is checked by the
/// pipeline, not here.
pub fn solve_parametrized(geometry: &Geometry, pin: Pin) -> BraceResult<SolutionFamily> {
    geometry.validate(STAGE)?;
    let form = pinned_form(geometry, pin.equation(geometry))?;

    let det = form
        .a
        .determinant()
        .ok_or_else(|| BraceError::internal("pinned system is not square"))?;
    debug!(%pin, determinant = %det, "pinned system");
    if det.is_zero() {
        return Err(BraceError::degenerate_geometry(
            STAGE,
            format!("pinning {} leaves a singular system", pin),
        ));
    }

    let solution = form
        .a
        .solve(&form.b)
        .ok_or_else(|| BraceError::degenerate_geometry(STAGE, "pinned system has no unique solution"))?;
    let components: [_; 4] = solution
        .try_into()
        .map_err(|_| BraceError::internal("pinned solve returned the wrong number of components"))?;
    Ok(SolutionFamily::new(tension_symbol().clone(), components))
}
