//! Sparse multivariate polynomials over ℚ.
//!
//! Multivariate algorithms work recursively: a polynomial is viewed as a
//! univariate polynomial in its *main variable* (the greatest symbol it
//! contains) with coefficients in the remaining symbols. Exact division, GCD
//! and square roots are all built on that view.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::symbol::Symbol;

/// Exponents keyed by symbol. Absent symbols have exponent zero and stored
/// exponents are never zero.
pub type Monomial = BTreeMap<Symbol, u32>;

/// A polynomial with exact rational coefficients. Zero coefficients are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    pub fn constant(c: BigRational) -> Self {
        Self::term(Monomial::new(), c)
    }

    pub fn from_int(n: i64) -> Self {
        Self::constant(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn var(sym: Symbol) -> Self {
        let mut m = Monomial::new();
        m.insert(sym, 1);
        Self::term(m, BigRational::one())
    }

    fn term(m: Monomial, c: BigRational) -> Self {
        let mut terms = BTreeMap::new();
        if !c.is_zero() {
            terms.insert(m, c);
        }
        Poly { terms }
    }

    /// `x^k`
    fn var_pow(x: &Symbol, k: u32) -> Self {
        let mut m = Monomial::new();
        if k > 0 {
            m.insert(x.clone(), k);
        }
        Self::term(m, BigRational::one())
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(|m| m.is_empty())
    }

    /// The value of a constant polynomial (zero included), `None` otherwise.
    pub fn as_constant(&self) -> Option<BigRational> {
        if !self.is_constant() {
            return None;
        }
        Some(
            self.terms
                .get(&Monomial::new())
                .cloned()
                .unwrap_or_else(BigRational::zero),
        )
    }

    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &BigRational)> {
        self.terms.iter()
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.terms.keys().flat_map(|m| m.keys().cloned()).collect()
    }

    pub fn depends_on(&self, x: &Symbol) -> bool {
        self.terms.keys().any(|m| m.contains_key(x))
    }

    /// Greatest symbol present, if any.
    pub fn main_var(&self) -> Option<Symbol> {
        self.terms.keys().flat_map(|m| m.keys()).max().cloned()
    }

    pub fn degree_in(&self, x: &Symbol) -> u32 {
        self.terms
            .keys()
            .map(|m| m.get(x).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    /// Coefficients in `x`, index = power. Empty for the zero polynomial.
    pub fn coeffs_in(&self, x: &Symbol) -> Vec<Poly> {
        if self.is_zero() {
            return Vec::new();
        }
        let mut coeffs = vec![Poly::zero(); self.degree_in(x) as usize + 1];
        for (m, c) in &self.terms {
            let mut rest = m.clone();
            let k = rest.remove(x).unwrap_or(0) as usize;
            coeffs[k].add_term(rest, c.clone());
        }
        coeffs
    }

    pub fn from_coeffs_in(x: &Symbol, coeffs: &[Poly]) -> Poly {
        coeffs
            .iter()
            .enumerate()
            .fold(Poly::zero(), |acc, (k, c)| &acc + &(c * &Poly::var_pow(x, k as u32)))
    }

    pub fn leading_coeff_in(&self, x: &Symbol) -> Poly {
        self.coeffs_in(x).pop().unwrap_or_default()
    }

    /// Coefficient of the lexicographically leading term (main variable first).
    pub fn leading_rational(&self) -> BigRational {
        match self.main_var() {
            None => self.as_constant().unwrap_or_else(BigRational::zero),
            Some(x) => self.leading_coeff_in(&x).leading_rational(),
        }
    }

    /// Scaled so that [`leading_rational`](Self::leading_rational) is 1.
    pub fn monic(&self) -> Poly {
        if self.is_zero() {
            return Poly::zero();
        }
        self.scale(&self.leading_rational().recip())
    }

    fn add_term(&mut self, m: Monomial, c: BigRational) {
        match self.terms.entry(m) {
            Entry::Vacant(slot) => {
                if !c.is_zero() {
                    slot.insert(c);
                }
            }
            Entry::Occupied(mut slot) => {
                *slot.get_mut() += c;
                if slot.get().is_zero() {
                    slot.remove();
                }
            }
        }
    }

    pub fn scale(&self, c: &BigRational) -> Poly {
        if c.is_zero() {
            return Poly::zero();
        }
        Poly {
            terms: self
                .terms
                .iter()
                .map(|(m, v)| (m.clone(), v * c))
                .collect(),
        }
    }

    pub fn pow(&self, e: u32) -> Poly {
        (0..e).fold(Poly::one(), |acc, _| &acc * self)
    }

    pub fn derivative(&self, x: &Symbol) -> Poly {
        let mut out = Poly::zero();
        for (m, c) in &self.terms {
            let Some(&k) = m.get(x) else { continue };
            let mut reduced = m.clone();
            if k == 1 {
                reduced.remove(x);
            } else {
                reduced.insert(x.clone(), k - 1);
            }
            out.add_term(reduced, c * BigRational::from_integer(BigInt::from(k)));
        }
        out
    }

    /// `self / d` when `d` divides `self` exactly, `None` otherwise.
    pub fn exact_div(&self, d: &Poly) -> Option<Poly> {
        if d.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Poly::zero());
        }
        if let Some(c) = d.as_constant() {
            return Some(self.scale(&c.recip()));
        }
        let x = d.main_var()?;
        let n = d.degree_in(&x);
        let lc_d = d.leading_coeff_in(&x);
        let mut rem = self.clone();
        let mut quot = Poly::zero();
        while !rem.is_zero() {
            let m = rem.degree_in(&x);
            if m < n {
                return None;
            }
            let c = rem.leading_coeff_in(&x).exact_div(&lc_d)?;
            let step = &c * &Poly::var_pow(&x, m - n);
            rem = &rem - &(&step * d);
            quot = &quot + &step;
        }
        Some(quot)
    }

    /// Monic greatest common divisor. `gcd(0, 0) = 0`.
    pub fn gcd(&self, other: &Poly) -> Poly {
        if self.is_zero() {
            return other.monic();
        }
        if other.is_zero() {
            return self.monic();
        }
        if self.is_constant() || other.is_constant() {
            return Poly::one();
        }
        let x = match (self.main_var(), other.main_var()) {
            (Some(a), Some(b)) => a.max(b),
            _ => return Poly::one(),
        };
        if !self.depends_on(&x) {
            return self.gcd(&other.content_in(&x));
        }
        if !other.depends_on(&x) {
            return self.content_in(&x).gcd(other);
        }

        let content = self.content_in(&x).gcd(&other.content_in(&x));
        let mut u = self.primitive_part_in(&x);
        let mut v = other.primitive_part_in(&x);
        if u.degree_in(&x) < v.degree_in(&x) {
            std::mem::swap(&mut u, &mut v);
        }
        while !v.is_zero() {
            let r = u.pseudo_rem(&v, &x);
            u = v;
            v = if r.is_zero() { r } else { r.primitive_part_in(&x) };
        }
        (&u.primitive_part_in(&x) * &content).monic()
    }

    /// GCD of the coefficients in `x`.
    pub fn content_in(&self, x: &Symbol) -> Poly {
        let mut acc = Poly::zero();
        for c in self.coeffs_in(x) {
            acc = acc.gcd(&c);
            if acc.is_constant() && !acc.is_zero() {
                break;
            }
        }
        acc
    }

    fn primitive_part_in(&self, x: &Symbol) -> Poly {
        let content = self.content_in(x);
        // content always divides exactly
        self.exact_div(&content).unwrap_or_else(|| self.clone())
    }

    /// Pseudo-remainder of `self` by `v` in `x`.
    fn pseudo_rem(&self, v: &Poly, x: &Symbol) -> Poly {
        let n = v.degree_in(x);
        let lc_v = v.leading_coeff_in(x);
        let mut r = self.clone();
        while !r.is_zero() {
            let k = r.degree_in(x);
            if k < n {
                break;
            }
            let lc_r = r.leading_coeff_in(x);
            r = &(&r * &lc_v) - &(&(&lc_r * &Poly::var_pow(x, k - n)) * v);
        }
        r
    }

    /// A polynomial `s` with `s² = self`, when one exists.
    pub fn sqrt_exact(&self) -> Option<Poly> {
        if self.is_zero() {
            return Some(Poly::zero());
        }
        if let Some(c) = self.as_constant() {
            return rational_sqrt(&c).map(Poly::constant);
        }
        let x = self.main_var()?;
        let n = self.degree_in(&x);
        if n % 2 == 1 {
            return None;
        }
        let half = n / 2;
        let lead = self.leading_coeff_in(&x).sqrt_exact()?;
        let twice_lead = lead.scale(&BigRational::from_integer(BigInt::from(2)));
        let mut root = &lead * &Poly::var_pow(&x, half);
        for k in (0..half).rev() {
            let rem = self - &(&root * &root);
            let c = rem
                .coeffs_in(&x)
                .get((half + k) as usize)
                .cloned()
                .unwrap_or_default();
            let ck = c.exact_div(&twice_lead)?;
            root = &root + &(&ck * &Poly::var_pow(&x, k));
        }
        if (self - &(&root * &root)).is_zero() {
            Some(root)
        } else {
            None
        }
    }
}

fn rational_sqrt(c: &BigRational) -> Option<BigRational> {
    if c.is_negative() {
        return None;
    }
    let n = c.numer().sqrt();
    let d = c.denom().sqrt();
    if &(&n * &n) == c.numer() && &(&d * &d) == c.denom() {
        Some(BigRational::new(n, d))
    } else {
        None
    }
}

impl<'a, 'b> Add<&'b Poly> for &'a Poly {
    type Output = Poly;
    fn add(self, rhs: &'b Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), c.clone());
        }
        out
    }
}

impl<'a, 'b> Sub<&'b Poly> for &'a Poly {
    type Output = Poly;
    fn sub(self, rhs: &'b Poly) -> Poly {
        let mut out = self.clone();
        for (m, c) in &rhs.terms {
            out.add_term(m.clone(), -c.clone());
        }
        out
    }
}

impl<'a, 'b> Mul<&'b Poly> for &'a Poly {
    type Output = Poly;
    fn mul(self, rhs: &'b Poly) -> Poly {
        let mut out = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                let mut m = ma.clone();
                for (sym, k) in mb {
                    *m.entry(sym.clone()).or_insert(0) += k;
                }
                out.add_term(m, ca * cb);
            }
        }
        out
    }
}

impl<'a> Neg for &'a Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        Poly {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}

impl Neg for Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        -&self
    }
}

forward_binop!(Add, add, Poly);
forward_binop!(Sub, sub, Poly);
forward_binop!(Mul, mul, Poly);

fn write_monomial(f: &mut fmt::Formatter<'_>, m: &Monomial) -> fmt::Result {
    for (i, (sym, k)) in m.iter().enumerate() {
        if i > 0 {
            f.write_str("*")?;
        }
        if *k == 1 {
            write!(f, "{}", sym)?;
        } else {
            write!(f, "{}^{}", sym, k)?;
        }
    }
    Ok(())
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        // higher total degree first, then by monomial
        let mut ordered: Vec<_> = self.terms.iter().collect();
        ordered.sort_by(|(ma, _), (mb, _)| {
            let da: u32 = ma.values().sum();
            let db: u32 = mb.values().sum();
            db.cmp(&da).then_with(|| ma.cmp(mb))
        });
        for (i, (m, c)) in ordered.into_iter().enumerate() {
            let negative = c.is_negative();
            match (i, negative) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            let magnitude = c.abs();
            if m.is_empty() {
                write!(f, "{}", magnitude)?;
            } else if magnitude.is_one() {
                write_monomial(f, m)?;
            } else {
                write!(f, "{}*", magnitude)?;
                write_monomial(f, m)?;
            }
        }
        Ok(())
    }
}
