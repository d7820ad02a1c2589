//! # Exact Symbolic Engine
//!
//! Everything the derivation needs from a computer algebra system, over exact
//! rationals only. No floating point appears anywhere in this module.
//!
//! ## Layers
//!
//! - [`symbol`] - Named scalars (`r_1x`, `g`, `t`, ...)
//! - [`poly`] - Sparse multivariate polynomials over ℚ with exact division and GCD
//! - [`expr`] - Rational functions kept in canonical (fully cancelled) form
//! - [`matrix`] - Dense matrices of expressions: determinant, inverse, RREF, null space
//! - [`solve`] - Exact univariate root finding
//!
//! ## Canonical Form
//!
//! An [`Expr`] is stored as `num / den` with `gcd(num, den) = 1` and the
//! lexicographic leading coefficient of `den` equal to 1. Two expressions are
//! algebraically equal exactly when they are structurally equal, so there is
//! no separate `simplify` step: every operation returns a simplified result.

/// Implements the owned/borrowed operator combinations by forwarding to the
/// `&T op &T` implementation.
macro_rules! forward_binop {
    ($imp:ident, $method:ident, $ty:ty) => {
        impl $imp<$ty> for $ty {
            type Output = $ty;
            fn $method(self, rhs: $ty) -> $ty {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a $ty> for $ty {
            type Output = $ty;
            fn $method(self, rhs: &'a $ty) -> $ty {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<$ty> for &'a $ty {
            type Output = $ty;
            fn $method(self, rhs: $ty) -> $ty {
                self.$method(&rhs)
            }
        }
    };
}

pub mod expr;
pub mod matrix;
pub mod poly;
pub mod solve;
pub mod symbol;

pub use expr::Expr;
pub use matrix::Matrix;
pub use poly::{Monomial, Poly};
pub use solve::{solve_univariate, Roots};
pub use symbol::Symbol;
