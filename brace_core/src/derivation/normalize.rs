//! # Normalizer
//!
//! Divides minimum-force results by a common scale factor so that each
//! component is reported as a coefficient free of the load.
//!
//! | Mode | Scale |
//! |------|-------|
//! | Stationary | `g / ((r_1x - r_2x)² + (r_1y - r_2y)²)` |
//! | Zero individual torque | `g / (r_1x·r_2y - r_1y·r_2x)` |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{BraceError, BraceResult};
use crate::geometry::{Contact, ForceComponent, Geometry};
use crate::symbolic::Expr;

use super::optimizer::{CriticalValue, MinimizationMode};

const STAGE: &str = "normalization";

/// The scale factor for `mode`. Fails when it vanishes or is undefined.
pub fn common_scale(geometry: &Geometry, mode: MinimizationMode) -> BraceResult<Expr> {
    if geometry.load.is_zero() {
        return Err(BraceError::degenerate_geometry(STAGE, "the load is zero"));
    }
    let (denominator, reason) = match mode {
        MinimizationMode::Stationary => (geometry.separation_squared(), "contacts 1 and 2 coincide"),
        MinimizationMode::ZeroIndividualTorque => (geometry.cross(), "contacts are collinear with the origin"),
    };
    geometry
        .load
        .checked_div(&denominator)
        .ok_or_else(|| BraceError::degenerate_geometry(STAGE, reason))
}

/// A minimum-force result as `coefficient × scale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedForces {
    pub mode: MinimizationMode,
    pub contact: Contact,
    pub scale: Expr,
    /// Component name → coefficient
    pub coefficients: BTreeMap<String, Expr>,
    /// Critical tension divided by the scale
    pub parameter: Expr,
}

impl NormalizedForces {
    /// The unnormalized forces, in column order.
    pub fn reconstruct(&self) -> [Expr; 4] {
        ForceComponent::ALL.map(|c| {
            self.coefficients
                .get(&c.name())
                .map(|k| k * &self.scale)
                .unwrap_or_default()
        })
    }

    pub fn coefficient(&self, component: ForceComponent) -> Option<&Expr> {
        self.coefficients.get(&component.name())
    }
}

pub fn normalize(
    critical: &CriticalValue,
    scale: &Expr,
    mode: MinimizationMode,
    contact: Contact,
) -> BraceResult<NormalizedForces> {
    let divide = |value: &Expr| {
        value
            .checked_div(scale)
            .ok_or_else(|| BraceError::degenerate_geometry(STAGE, "scale factor is zero"))
    };
    let mut coefficients = BTreeMap::new();
    for component in ForceComponent::ALL {
        coefficients.insert(component.name(), divide(&critical.forces[component.index()])?);
    }
    Ok(NormalizedForces {
        mode,
        contact,
        scale: scale.clone(),
        coefficients,
        parameter: divide(&critical.parameter)?,
    })
}
