//! Rational functions in canonical form.
//!
//! ```rust
//! use brace_core::symbolic::Expr;
//!
//! let x = Expr::symbol("x");
//! let y = Expr::symbol("y");
//!
//! // (x² - y²) / (x - y) cancels to x + y
//! let q = (&x * &x - &y * &y).checked_div(&(&x - &y)).unwrap();
//! assert_eq!(q, &x + &y);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Serialize, Serializer};

use super::poly::Poly;
use super::symbol::Symbol;

/// An exact rational function `num / den`.
///
/// Invariant: `gcd(num, den) = 1`, `den` is monic and nonzero, and zero is
/// stored as `0 / 1`. Structural equality is therefore algebraic equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    num: Poly,
    den: Poly,
}

impl Expr {
    pub fn zero() -> Self {
        Expr {
            num: Poly::zero(),
            den: Poly::one(),
        }
    }

    pub fn one() -> Self {
        Self::int(1)
    }

    pub fn int(n: i64) -> Self {
        Self::from_poly(Poly::from_int(n))
    }

    /// `n / d`
    ///
    /// # Panics
    ///
    /// Panics if `d` is zero.
    pub fn ratio(n: i64, d: i64) -> Self {
        Self::from_rational(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    pub fn from_rational(c: BigRational) -> Self {
        Self::from_poly(Poly::constant(c))
    }

    pub fn symbol(name: &str) -> Self {
        Self::from_symbol(&Symbol::new(name))
    }

    pub fn from_symbol(sym: &Symbol) -> Self {
        Self::from_poly(Poly::var(sym.clone()))
    }

    pub fn from_poly(num: Poly) -> Self {
        Expr {
            num,
            den: Poly::one(),
        }
    }

    /// `num / den`, or `None` when `den` is zero.
    pub fn from_parts(num: Poly, den: Poly) -> Option<Self> {
        if den.is_zero() {
            return None;
        }
        Some(Self::canonical(num, den))
    }

    fn canonical(num: Poly, den: Poly) -> Self {
        if num.is_zero() {
            return Self::zero();
        }
        let g = num.gcd(&den);
        // g divides both by construction
        let num = num.exact_div(&g).unwrap_or(num);
        let den = den.exact_div(&g).unwrap_or(den);
        let lead = den.leading_rational().recip();
        Expr {
            num: num.scale(&lead),
            den: den.scale(&lead),
        }
    }

    pub fn numer(&self) -> &Poly {
        &self.num
    }

    pub fn denom(&self) -> &Poly {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_polynomial(&self) -> bool {
        self.den.is_constant()
    }

    /// The value of a constant expression.
    pub fn as_rational(&self) -> Option<BigRational> {
        let n = self.num.as_constant()?;
        let d = self.den.as_constant()?;
        Some(n / d)
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        let mut out = self.num.symbols();
        out.extend(self.den.symbols());
        out
    }

    pub fn depends_on(&self, x: &Symbol) -> bool {
        self.num.depends_on(x) || self.den.depends_on(x)
    }

    pub fn inv(&self) -> Option<Expr> {
        Expr::from_parts(self.den.clone(), self.num.clone())
    }

    pub fn checked_div(&self, rhs: &Expr) -> Option<Expr> {
        Expr::from_parts(&self.num * &rhs.den, &self.den * &rhs.num)
    }

    pub fn pow(&self, e: u32) -> Expr {
        // powers of coprime polynomials stay coprime
        Expr {
            num: self.num.pow(e),
            den: self.den.pow(e),
        }
    }

    /// Exact derivative with respect to `x` (quotient rule).
    pub fn derivative(&self, x: &Symbol) -> Expr {
        let dn = self.num.derivative(x);
        let dd = self.den.derivative(x);
        if dd.is_zero() {
            return Self::canonical(dn, self.den.clone());
        }
        let num = &(&dn * &self.den) - &(&self.num * &dd);
        Self::canonical(num, &self.den * &self.den)
    }

    /// Degree in `x` when the expression is a polynomial in `x`.
    pub fn degree_in(&self, x: &Symbol) -> Option<u32> {
        if self.den.depends_on(x) {
            return None;
        }
        Some(self.num.degree_in(x))
    }

    /// Coefficients in `x` (index = power) when the expression is a polynomial in `x`.
    pub fn coeffs_in(&self, x: &Symbol) -> Option<Vec<Expr>> {
        if self.den.depends_on(x) {
            return None;
        }
        Some(
            self.num
                .coeffs_in(x)
                .into_iter()
                .map(|c| Self::canonical(c, self.den.clone()))
                .collect(),
        )
    }

    /// Replaces `x` by `value`. `None` if the denominator vanishes.
    pub fn subst(&self, x: &Symbol, value: &Expr) -> Option<Expr> {
        if !self.depends_on(x) {
            return Some(self.clone());
        }
        let num = horner(&self.num, x, value);
        let den = horner(&self.den, x, value);
        num.checked_div(&den)
    }

    /// Replaces every symbol in `values`, one after another in key order.
    pub fn subst_all(&self, values: &BTreeMap<Symbol, Expr>) -> Option<Expr> {
        values
            .iter()
            .try_fold(self.clone(), |acc, (sym, value)| acc.subst(sym, value))
    }
}

fn horner(p: &Poly, x: &Symbol, value: &Expr) -> Expr {
    p.coeffs_in(x)
        .into_iter()
        .rev()
        .fold(Expr::zero(), |acc, c| &(&acc * value) + &Expr::from_poly(c))
}

impl Default for Expr {
    fn default() -> Self {
        Expr::zero()
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<BigRational> for Expr {
    fn from(c: BigRational) -> Self {
        Expr::from_rational(c)
    }
}

impl From<&Symbol> for Expr {
    fn from(sym: &Symbol) -> Self {
        Expr::from_symbol(sym)
    }
}

impl<'a, 'b> Add<&'b Expr> for &'a Expr {
    type Output = Expr;
    fn add(self, rhs: &'b Expr) -> Expr {
        if self.den == rhs.den {
            return Expr::canonical(&self.num + &rhs.num, self.den.clone());
        }
        Expr::canonical(
            &(&self.num * &rhs.den) + &(&rhs.num * &self.den),
            &self.den * &rhs.den,
        )
    }
}

impl<'a, 'b> Sub<&'b Expr> for &'a Expr {
    type Output = Expr;
    fn sub(self, rhs: &'b Expr) -> Expr {
        self + &(-rhs)
    }
}

impl<'a, 'b> Mul<&'b Expr> for &'a Expr {
    type Output = Expr;
    fn mul(self, rhs: &'b Expr) -> Expr {
        Expr::canonical(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl<'a> Neg for &'a Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        -&self
    }
}

forward_binop!(Add, add, Expr);
forward_binop!(Sub, sub, Expr);
forward_binop!(Mul, mul, Expr);

impl Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Expr {
        iter.fold(Expr::zero(), |acc, e| &acc + &e)
    }
}

impl<'a> Sum<&'a Expr> for Expr {
    fn sum<I: Iterator<Item = &'a Expr>>(iter: I) -> Expr {
        iter.fold(Expr::zero(), |acc, e| &acc + e)
    }
}

/// Whether `p` can be written as a divisor without parentheses.
fn is_atomic(p: &Poly) -> bool {
    if p.is_constant() {
        return true;
    }
    match p.terms().next() {
        Some((m, c)) if p.term_count() == 1 => {
            c.is_one() && m.len() == 1 && m.values().all(|k| *k == 1)
        }
        _ => false,
    }
}

fn int_gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let (mut a, mut b) = (a.abs(), b.abs());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

fn int_lcm(a: &BigInt, b: &BigInt) -> BigInt {
    a / int_gcd(a, b) * b
}

/// Least common multiple of the coefficient denominators of `p`.
fn denominator_lcm(p: &Poly) -> BigInt {
    p.terms()
        .fold(BigInt::one(), |acc, (_, c)| int_lcm(&acc, c.denom()))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num.is_constant() && self.den.is_constant() {
            return write!(f, "{}", self.num);
        }
        // clear fractions so the quotient reads (x + 1)/(2*y), not (1/2*x + 1/2)/y
        let k = BigRational::from_integer(int_lcm(
            &denominator_lcm(&self.num),
            &denominator_lcm(&self.den),
        ));
        let num = self.num.scale(&k);
        let den = self.den.scale(&k);
        if den == Poly::one() {
            return write!(f, "{}", num);
        }
        if num.term_count() > 1 {
            write!(f, "({})", num)?;
        } else {
            write!(f, "{}", num)?;
        }
        if is_atomic(&den) {
            write!(f, "/{}", den)
        } else {
            write!(f, "/({})", den)
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
