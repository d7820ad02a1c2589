//! Exact univariate equation solving.

use crate::errors::{BraceError, BraceResult};

use super::expr::Expr;
use super::symbol::Symbol;

/// Solutions of `expr = 0` in one unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Roots {
    /// Every distinct root. May be empty.
    Finite(Vec<Expr>),
    /// The equation holds for every value of the unknown.
    Identity,
}

impl Roots {
    pub fn is_empty(&self) -> bool {
        matches!(self, Roots::Finite(r) if r.is_empty())
    }
}

/// Solves `expr = 0` for `x`.
///
/// The numerator is treated as a polynomial in `x` with coefficients in the
/// other symbols. Degrees 0 and 1 always solve; degree 2 solves when the
/// discriminant is a perfect square. Roots at which the denominator
/// vanishes are discarded.
pub fn solve_univariate(expr: &Expr, x: &Symbol) -> BraceResult<Roots> {
    let coeffs: Vec<Expr> = expr
        .numer()
        .coeffs_in(x)
        .into_iter()
        .map(Expr::from_poly)
        .collect();

    let candidates = match coeffs.as_slice() {
        [] => return Ok(Roots::Identity),
        [_] => Vec::new(),
        [c0, c1] => vec![linear_root(c0, c1, x)?],
        [c0, c1, c2] => quadratic_roots(c0, c1, c2, x)?,
        _ => {
            return Err(BraceError::unsupported_equation(
                x.name(),
                coeffs.len() as u32 - 1,
            ))
        }
    };

    let denominator = Expr::from_poly(expr.denom().clone());
    let mut roots: Vec<Expr> = Vec::new();
    for root in candidates {
        let admissible = denominator
            .subst(x, &root)
            .is_some_and(|d| !d.is_zero());
        if admissible && !roots.contains(&root) {
            roots.push(root);
        }
    }
    Ok(Roots::Finite(roots))
}

fn linear_root(c0: &Expr, c1: &Expr, x: &Symbol) -> BraceResult<Expr> {
    (-c0)
        .checked_div(c1)
        .ok_or_else(|| BraceError::internal(format!("vanishing leading coefficient in {}", x)))
}

fn quadratic_roots(c: &Expr, b: &Expr, a: &Expr, x: &Symbol) -> BraceResult<Vec<Expr>> {
    let discriminant = b * b - &(&Expr::int(4) * &(a * c));
    let num_root = discriminant.numer().sqrt_exact();
    let den_root = discriminant.denom().sqrt_exact();
    let (Some(num_root), Some(den_root)) = (num_root, den_root) else {
        return Err(BraceError::unsupported_equation(x.name(), 2));
    };
    let root = Expr::from_parts(num_root, den_root)
        .ok_or_else(|| BraceError::internal("zero denominator in discriminant"))?;
    let two_a = &Expr::int(2) * a;
    [&-b + &root, &-b - &root]
        .iter()
        .map(|n| {
            n.checked_div(&two_a)
                .ok_or_else(|| BraceError::internal(format!("vanishing leading coefficient in {}", x)))
        })
        .collect()
}
