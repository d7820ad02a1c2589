//! # Null-Space Solver
//!
//! Builds the same solution family as the parametrized solver from two
//! independent pieces:
//!
//! - the **zero-tension** solution, where each contact's torque vanishes on
//!   its own (the 4×4 individual-torque system);
//! - the one-dimensional **kernel** of the 3×4 balance matrix, scaled so
//!   that its tension is exactly 1.
//!
//! ```text
//! f(t) = f₀ + t·k / τ(k)
//! ```
//!
//! The kernel is proportional to `(r1 - r2, r2 - r1)`: equal and opposite
//! forces along the line joining the contacts.

use serde::Serialize;
use tracing::{debug, error};

use crate::equations::{build_equation_set, zero_tension_form};
use crate::errors::{BraceError, BraceResult};
use crate::geometry::{tension_symbol, Contact, ForceComponent, Geometry};
use crate::symbolic::Expr;

use super::family::SolutionFamily;

const STAGE: &str = "null-space solve";

/// Particular solution plus scaled kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullSpaceDecomposition {
    /// Zero-tension solution
    pub particular: [Expr; 4],
    /// `-1 / det(A₄)` of the individual-torque system
    pub fac: Expr,
    /// Kernel basis vector as produced by elimination
    pub kernel: [Expr; 4],
    /// Tension carried by `kernel`
    pub kernel_tension: Expr,
    /// `kernel / kernel_tension`
    pub scaled_kernel: [Expr; 4],
    /// Rank of the 3×4 balance matrix
    pub rank: usize,
}

impl NullSpaceDecomposition {
    /// `particular + t·scaled_kernel`
    pub fn family(&self) -> SolutionFamily {
        let t = Expr::from_symbol(tension_symbol());
        let mut components: [Expr; 4] = Default::default();
        for (i, slot) in components.iter_mut().enumerate() {
            *slot = &self.particular[i] + &(&t * &self.scaled_kernel[i]);
        }
        SolutionFamily::new(tension_symbol().clone(), components)
    }
}

fn to_array(v: Vec<Expr>, what: &str) -> BraceResult<[Expr; 4]> {
    v.try_into()
        .map_err(|_| BraceError::internal(format!("{} has the wrong length", what)))
}

pub fn solve_null_space(geometry: &Geometry) -> BraceResult<NullSpaceDecomposition> {
    geometry.validate(STAGE)?;

    let balance = build_equation_set(geometry).linear_form()?;
    let rank = balance.a.rank();
    debug!(rank, "balance matrix");
    if rank < 3 {
        return Err(BraceError::degenerate_geometry(
            STAGE,
            format!("balance matrix has rank {} < 3", rank),
        ));
    }
    let mut basis = balance.a.nullspace();
    if basis.len() != 1 {
        return Err(BraceError::internal(format!(
            "expected a one-dimensional kernel, found {}",
            basis.len()
        )));
    }
    let kernel = to_array(basis.remove(0), "kernel vector")?;

    let individual = zero_tension_form(geometry)?;
    let det = individual
        .a
        .determinant()
        .ok_or_else(|| BraceError::internal("individual-torque system is not square"))?;
    debug!(determinant = %det, "individual-torque system");
    let fac = (-Expr::one()).checked_div(&det).ok_or_else(|| {
        BraceError::degenerate_geometry(STAGE, "contacts are collinear with the origin")
    })?;
    let inverse = individual
        .a
        .inverse()
        .ok_or_else(|| BraceError::degenerate_geometry(STAGE, "individual-torque system is singular"))?;
    let particular = to_array(inverse.mul_vec(&individual.b)?, "particular solution")?;

    let (kx, ky) = (&kernel[0], &kernel[1]);
    let kernel_tension = geometry.position(Contact::One).torque(kx, ky);
    let inv_tension = kernel_tension.inv().ok_or_else(|| {
        BraceError::degenerate_geometry(STAGE, "kernel carries no tension")
    })?;
    let scaled_kernel = kernel.clone().map(|k| &k * &inv_tension);
    debug!(
        kernel_tension = %kernel_tension,
        fac = %fac,
        "kernel scaled to unit tension"
    );

    Ok(NullSpaceDecomposition {
        particular,
        fac,
        kernel,
        kernel_tension,
        scaled_kernel,
        rank,
    })
}

/// Requires two families in the same parameter to agree component by component.
pub fn cross_check(check: &str, expected: &SolutionFamily, actual: &SolutionFamily) -> BraceResult<()> {
    if expected.parameter != actual.parameter {
        error!(check, "families use different parameters");
        return Err(BraceError::inconsistent(
            check,
            "parameter",
            expected.parameter.to_string(),
            actual.parameter.to_string(),
        ));
    }
    for component in ForceComponent::ALL {
        let (e, a) = (expected.component(component), actual.component(component));
        if e != a {
            error!(check, %component, expected = %e, actual = %a, "formulations disagree");
            return Err(BraceError::inconsistent(
                check,
                component.name(),
                e.to_string(),
                a.to_string(),
            ));
        }
    }
    debug!(check, "formulations agree");
    Ok(())
}
