//! # Equilibrium System Builder
//!
//! Builds the balance equations for a body held at two contacts, in explicit
//! form ([`EquationSet`]) and in matrix form ([`LinearForm`]).
//!
//! ## Unknown Order
//!
//! Matrix columns follow [`ForceComponent::ALL`]: `F_1x, F_1y, F_2x, F_2y`.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::equations::equilibrium::{build_equation_set, zero_tension_form};
//! use brace_core::geometry::Geometry;
//!
//! let geometry = Geometry::symbolic();
//! let set = build_equation_set(&geometry);
//! assert_eq!(set.equations().len(), 3);
//!
//! let form = set.linear_form().unwrap();
//! assert_eq!((form.a.nrows(), form.a.ncols()), (3, 4));
//!
//! let square = zero_tension_form(&geometry).unwrap();
//! assert_eq!((square.a.nrows(), square.a.ncols()), (4, 4));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::equations::registry::Relation;
use crate::errors::{BraceError, BraceResult};
use crate::geometry::{tension_symbol, Contact, ForceComponent, Geometry};
use crate::symbolic::{Expr, Matrix, Symbol};

// ============================================================================
// Equations
// ============================================================================

/// A single equality `lhs = rhs` tagged with the relation it expresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Equation {
    pub relation: Relation,
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(relation: Relation, lhs: Expr, rhs: Expr) -> Self {
        Equation { relation, lhs, rhs }
    }

    /// `lhs - rhs`
    pub fn residual(&self) -> Expr {
        &self.lhs - &self.rhs
    }

    /// Residual after substituting `values`. `None` if a denominator vanishes.
    pub fn residual_at(&self, values: &BTreeMap<Symbol, Expr>) -> Option<Expr> {
        self.residual().subst_all(values)
    }

    /// True when the residual vanishes identically under `values`.
    pub fn is_satisfied_by(&self, values: &BTreeMap<Symbol, Expr>) -> bool {
        self.residual_at(values).is_some_and(|r| r.is_zero())
    }

    /// Coefficients of the unknowns and the constant right-hand side of the
    /// equation written as `row · f = b`.
    fn linear_row(&self) -> BraceResult<(Vec<Expr>, Expr)> {
        let residual = self.residual();
        let unknowns: Vec<Symbol> = ForceComponent::ALL.iter().map(|c| c.symbol()).collect();
        let mut row = Vec::with_capacity(unknowns.len());
        for u in &unknowns {
            let coeff = residual.derivative(u);
            if unknowns.iter().any(|v| coeff.depends_on(v)) {
                return Err(BraceError::internal(format!(
                    "{:?} is not linear in {}",
                    self.relation, u
                )));
            }
            row.push(coeff);
        }
        let at_zero: BTreeMap<Symbol, Expr> =
            unknowns.into_iter().map(|u| (u, Expr::zero())).collect();
        let constant = residual
            .subst_all(&at_zero)
            .ok_or_else(|| BraceError::internal("equation has a pole at zero force"))?;
        Ok((row, -constant))
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// The unknown force components as expressions.
pub fn unknown(component: ForceComponent) -> Expr {
    Expr::from_symbol(&component.symbol())
}

/// Maps the four unknown symbols to the given values, in column order.
pub fn unknown_assignment(values: &[Expr; 4]) -> BTreeMap<Symbol, Expr> {
    ForceComponent::ALL
        .iter()
        .zip(values)
        .map(|(c, v)| (c.symbol(), v.clone()))
        .collect()
}

fn contact_torque(geometry: &Geometry, contact: Contact) -> Expr {
    let (fx, fy) = match contact {
        Contact::One => (ForceComponent::F1X, ForceComponent::F1Y),
        Contact::Two => (ForceComponent::F2X, ForceComponent::F2Y),
    };
    geometry.position(contact).torque(&unknown(fx), &unknown(fy))
}

// ============================================================================
// Individual Relations
// ============================================================================

/// `F_1x + F_2x = 0`
pub fn force_balance_x() -> Equation {
    Equation::new(
        Relation::ForceBalanceX,
        unknown(ForceComponent::F1X) + unknown(ForceComponent::F2X),
        Expr::zero(),
    )
}

/// `F_1y + F_2y = -g`
pub fn force_balance_y(geometry: &Geometry) -> Equation {
    Equation::new(
        Relation::ForceBalanceY,
        unknown(ForceComponent::F1Y) + unknown(ForceComponent::F2Y),
        -&geometry.load,
    )
}

/// Net torque about the origin vanishes.
pub fn torque_balance(geometry: &Geometry) -> Equation {
    Equation::new(
        Relation::TorqueBalance,
        contact_torque(geometry, Contact::One) + contact_torque(geometry, Contact::Two),
        Expr::zero(),
    )
}

/// The torque of one contact vanishes on its own.
pub fn individual_torque(geometry: &Geometry, contact: Contact) -> Equation {
    let relation = match contact {
        Contact::One => Relation::IndividualTorqueOne,
        Contact::Two => Relation::IndividualTorqueTwo,
    };
    Equation::new(relation, contact_torque(geometry, contact), Expr::zero())
}

/// `r_1x·F_1y - r_1y·F_1x = t`
pub fn tension_definition(geometry: &Geometry) -> Equation {
    Equation::new(
        Relation::TensionDefinition,
        contact_torque(geometry, Contact::One),
        Expr::from_symbol(tension_symbol()),
    )
}

/// `F_ka = t`
pub fn pinned_component(component: ForceComponent) -> Equation {
    Equation::new(
        Relation::PinnedComponent,
        unknown(component),
        Expr::from_symbol(tension_symbol()),
    )
}

// ============================================================================
// Equation Set
// ============================================================================

/// The three balance equations, in the order x-force, y-force, torque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationSet {
    equations: [Equation; 3],
}

pub fn build_equation_set(geometry: &Geometry) -> EquationSet {
    EquationSet {
        equations: [
            force_balance_x(),
            force_balance_y(geometry),
            torque_balance(geometry),
        ],
    }
}

impl EquationSet {
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Residuals with the unknowns replaced by `forces`.
    pub fn residuals(&self, forces: &[Expr; 4]) -> Option<Vec<Expr>> {
        let values = unknown_assignment(forces);
        self.equations.iter().map(|e| e.residual_at(&values)).collect()
    }

    /// True when every equation holds identically for `forces`.
    pub fn is_satisfied_by(&self, forces: &[Expr; 4]) -> bool {
        self.residuals(forces)
            .is_some_and(|r| r.iter().all(Expr::is_zero))
    }

    /// The 3×4 matrix form `A·f = b`.
    pub fn linear_form(&self) -> BraceResult<LinearForm> {
        LinearForm::from_equations(&self.equations)
    }
}

impl fmt::Display for EquationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, eq) in self.equations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", eq)?;
        }
        Ok(())
    }
}

// ============================================================================
// Matrix Form
// ============================================================================

/// `A·f = b` over the unknowns in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearForm {
    pub a: Matrix,
    pub b: Vec<Expr>,
    /// Relation behind each row.
    pub relations: Vec<Relation>,
}

impl LinearForm {
    /// Extracts coefficients by differentiating each residual with respect
    /// to the unknowns. Fails if an equation is not linear in them.
    pub fn from_equations(equations: &[Equation]) -> BraceResult<Self> {
        let mut rows = Vec::with_capacity(equations.len());
        let mut b = Vec::with_capacity(equations.len());
        for eq in equations {
            let (row, rhs) = eq.linear_row()?;
            rows.push(row);
            b.push(rhs);
        }
        Ok(LinearForm {
            a: Matrix::from_rows(rows)?,
            b,
            relations: equations.iter().map(|e| e.relation).collect(),
        })
    }
}

/// Individual torques and the two force balances: the square system whose
/// solution is the zero-tension force distribution.
pub fn zero_tension_form(geometry: &Geometry) -> BraceResult<LinearForm> {
    LinearForm::from_equations(&[
        individual_torque(geometry, Contact::One),
        individual_torque(geometry, Contact::Two),
        force_balance_x(),
        force_balance_y(geometry),
    ])
}

/// The three balance equations plus one pinning equation.
pub fn pinned_form(geometry: &Geometry, pin: Equation) -> BraceResult<LinearForm> {
    let set = build_equation_set(geometry);
    let mut equations = set.equations.to_vec();
    equations.push(pin);
    LinearForm::from_equations(&equations)
}
