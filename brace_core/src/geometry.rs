//! # Contact Geometry
//!
//! Position vectors of the two contacts, the load parameter, and the names of
//! the unknown force components.
//!
//! ## Notation
//!
//! - `r_1x`, `r_1y` = Position of contact 1 relative to the center of mass
//! - `r_2x`, `r_2y` = Position of contact 2 relative to the center of mass
//! - `g` = Load parameter (gravitational force magnitude)
//! - `F_1x`, `F_1y`, `F_2x`, `F_2y` = Unknown contact force components
//! - `t` = Free parameter (internal tension)
//!
//! ## Sign Conventions
//!
//! - Load: acts downward, so `ΣFy = -g`
//! - Torque of a force at `r`: `x·Fy - y·Fx` (counterclockwise positive)
//!
//! ## Example
//!
//! ```rust
//! use brace_core::geometry::{Geometry, Position};
//!
//! // Fully symbolic: r_1x, r_1y, r_2x, r_2y, g
//! let symbolic = Geometry::symbolic();
//!
//! // Hand at (1, 0), foot at (0, -1), load stays symbolic
//! let concrete = Geometry::at(Position::int(1, 0), Position::int(0, -1));
//! assert!(concrete.validate("example").is_ok());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{BraceError, BraceResult};
use crate::symbolic::{Expr, Symbol};

/// Standard symbol names.
pub mod names {
    pub const R1X: &str = "r_1x";
    pub const R1Y: &str = "r_1y";
    pub const R2X: &str = "r_2x";
    pub const R2Y: &str = "r_2y";
    pub const LOAD: &str = "g";
    pub const TENSION: &str = "t";
}

static LOAD_SYMBOL: Lazy<Symbol> = Lazy::new(|| Symbol::new(names::LOAD));
static TENSION_SYMBOL: Lazy<Symbol> = Lazy::new(|| Symbol::new(names::TENSION));

/// The symbol `g`.
pub fn load_symbol() -> &'static Symbol {
    &LOAD_SYMBOL
}

/// The free parameter `t`.
pub fn tension_symbol() -> &'static Symbol {
    &TENSION_SYMBOL
}

/// True for names the derivation introduces itself: `t` and `F_1x`..`F_2y`.
/// Geometry values must not use them.
pub fn is_reserved(name: &str) -> bool {
    name == names::TENSION || ForceComponent::ALL.iter().any(|c| c.name() == name)
}

// ============================================================================
// Contacts and Force Components
// ============================================================================

/// One of the two contact points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contact {
    One,
    Two,
}

impl Contact {
    pub const ALL: [Contact; 2] = [Contact::One, Contact::Two];

    pub fn index(self) -> usize {
        match self {
            Contact::One => 0,
            Contact::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn other(self) -> Contact {
        match self {
            Contact::One => Contact::Two,
            Contact::Two => Contact::One,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Contact::One => "contact 1",
            Contact::Two => "contact 2",
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

/// An unknown force component, e.g. `F_2y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ForceComponent {
    pub contact: Contact,
    pub axis: Axis,
}

impl ForceComponent {
    pub const F1X: ForceComponent = ForceComponent::new(Contact::One, Axis::X);
    pub const F1Y: ForceComponent = ForceComponent::new(Contact::One, Axis::Y);
    pub const F2X: ForceComponent = ForceComponent::new(Contact::Two, Axis::X);
    pub const F2Y: ForceComponent = ForceComponent::new(Contact::Two, Axis::Y);

    /// Unknown order used by every matrix formulation.
    pub const ALL: [ForceComponent; 4] = [Self::F1X, Self::F1Y, Self::F2X, Self::F2Y];

    pub const fn new(contact: Contact, axis: Axis) -> Self {
        ForceComponent { contact, axis }
    }

    /// Column of this unknown in [`ALL`](Self::ALL).
    pub fn index(self) -> usize {
        let axis = match self.axis {
            Axis::X => 0,
            Axis::Y => 1,
        };
        self.contact.index() * 2 + axis
    }

    pub fn name(self) -> String {
        let axis = match self.axis {
            Axis::X => "x",
            Axis::Y => "y",
        };
        format!("F_{}{}", self.contact.number(), axis)
    }

    /// The unknown as a symbol, used by the explicit equation form.
    pub fn symbol(self) -> Symbol {
        Symbol::new(self.name())
    }
}

impl fmt::Display for ForceComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

// ============================================================================
// Position Vectors
// ============================================================================

/// Position of a contact relative to the reference origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub x: Expr,
    pub y: Expr,
}

impl Position {
    pub fn new(x: Expr, y: Expr) -> Self {
        Position { x, y }
    }

    pub fn int(x: i64, y: i64) -> Self {
        Position::new(Expr::int(x), Expr::int(y))
    }

    /// `(r_1x, r_1y)` or `(r_2x, r_2y)`.
    pub fn symbolic(contact: Contact) -> Self {
        match contact {
            Contact::One => Position::new(Expr::symbol(names::R1X), Expr::symbol(names::R1Y)),
            Contact::Two => Position::new(Expr::symbol(names::R2X), Expr::symbol(names::R2Y)),
        }
    }

    pub fn minus(&self, other: &Position) -> Position {
        Position::new(&self.x - &other.x, &self.y - &other.y)
    }

    pub fn dot(&self, other: &Position) -> Expr {
        &self.x * &other.x + &self.y * &other.y
    }

    /// 2-D cross product `self.x·other.y - self.y·other.x`.
    pub fn cross(&self, other: &Position) -> Expr {
        &self.x * &other.y - &self.y * &other.x
    }

    /// Torque of the force `(fx, fy)` applied here: `x·fy - y·fx`.
    pub fn torque(&self, fx: &Expr, fy: &Expr) -> Expr {
        &self.x * fy - &self.y * fx
    }

    pub fn is_origin(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Two contact positions and the downward load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub r1: Position,
    pub r2: Position,
    pub load: Expr,
}

impl Geometry {
    pub fn new(r1: Position, r2: Position, load: Expr) -> Self {
        Geometry { r1, r2, load }
    }

    /// Every coordinate and the load symbolic.
    pub fn symbolic() -> Self {
        Geometry::new(
            Position::symbolic(Contact::One),
            Position::symbolic(Contact::Two),
            Expr::from_symbol(load_symbol()),
        )
    }

    /// Given positions with the symbolic load `g`.
    pub fn at(r1: Position, r2: Position) -> Self {
        Geometry::new(r1, r2, Expr::from_symbol(load_symbol()))
    }

    pub fn position(&self, contact: Contact) -> &Position {
        match contact {
            Contact::One => &self.r1,
            Contact::Two => &self.r2,
        }
    }

    /// `r1 - r2`, the direction of the line joining the contacts.
    pub fn separation(&self) -> Position {
        self.r1.minus(&self.r2)
    }

    /// `(r_1x - r_2x)² + (r_1y - r_2y)²`
    pub fn separation_squared(&self) -> Expr {
        let d = self.separation();
        d.dot(&d)
    }

    /// `r_1x·r_2y - r_1y·r_2x`. Zero when the contacts are collinear with the origin.
    pub fn cross(&self) -> Expr {
        self.r1.cross(&self.r2)
    }

    /// Standard symbol → this geometry's value. Used to specialize results
    /// derived on [`Geometry::symbolic`].
    pub fn assignment(&self) -> BTreeMap<Symbol, Expr> {
        [
            (names::R1X, &self.r1.x),
            (names::R1Y, &self.r1.y),
            (names::R2X, &self.r2.x),
            (names::R2Y, &self.r2.y),
            (names::LOAD, &self.load),
        ]
        .into_iter()
        .map(|(name, value)| (Symbol::new(name), value.clone()))
        .collect()
    }

    /// Rejects geometries with no one-dimensional family of solutions:
    /// coincident contacts (both at the origin included). Coordinates and
    /// load that mention `t` or an unknown force are invalid input.
    pub fn validate(&self, stage: &str) -> BraceResult<()> {
        let values = [
            (names::R1X, &self.r1.x),
            (names::R1Y, &self.r1.y),
            (names::R2X, &self.r2.x),
            (names::R2Y, &self.r2.y),
            (names::LOAD, &self.load),
        ];
        for (field, value) in values {
            if let Some(symbol) = value.symbols().into_iter().find(|s| is_reserved(s.name())) {
                return Err(BraceError::invalid_input(
                    field,
                    value.to_string(),
                    format!("'{}' is reserved for the derivation", symbol),
                ));
            }
        }
        if self.r1.is_origin() && self.r2.is_origin() {
            return Err(BraceError::degenerate_geometry(stage, "both contacts lie at the origin"));
        }
        if self.separation().is_origin() {
            return Err(BraceError::degenerate_geometry(stage, "contacts 1 and 2 coincide"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_component_order_and_names() {
        let names: Vec<String> = ForceComponent::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["F_1x", "F_1y", "F_2x", "F_2y"]);
        for (i, c) in ForceComponent::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_contact_helpers() {
        assert_eq!(Contact::One.other(), Contact::Two);
        assert_eq!(Contact::Two.number(), 2);
        assert_eq!(serde_json::to_string(&Contact::Two).unwrap(), "\"two\"");
    }

    #[test]
    fn test_cross_and_separation() {
        let geometry = Geometry::at(Position::int(1, 0), Position::int(0, -1));
        assert_eq!(geometry.cross(), Expr::int(-1));
        assert_eq!(geometry.separation(), Position::int(1, 1));
        assert_eq!(geometry.separation_squared(), Expr::int(2));
    }

    #[test]
    fn test_torque_sign_convention() {
        // Upward force to the right of the origin turns counterclockwise
        let r = Position::int(2, 0);
        assert_eq!(r.torque(&Expr::zero(), &Expr::int(3)), Expr::int(6));
    }

    #[test]
    fn test_validate_rejects_coincident_contacts() {
        let geometry = Geometry::at(Position::int(1, 2), Position::int(1, 2));
        let err = geometry.validate("test").unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_GEOMETRY");

        let origin = Geometry::at(Position::int(0, 0), Position::int(0, 0));
        assert!(origin.validate("test").is_err());

        assert!(Geometry::symbolic().validate("test").is_ok());
    }

    #[test]
    fn test_validate_rejects_reserved_symbols() {
        let tension_load = Geometry::new(Position::int(1, 0), Position::int(0, -1), Expr::symbol("t"));
        let err = tension_load.validate("test").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let unknown_coordinate = Geometry::at(
            Position::new(Expr::symbol("F_2y"), Expr::zero()),
            Position::int(0, -1),
        );
        let err = unknown_coordinate.validate("test").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let shifted = Geometry::at(
            Position::new(&Expr::symbol("a") + &Expr::symbol("t"), Expr::zero()),
            Position::int(0, -1),
        );
        assert!(shifted.validate("test").is_err());

        assert!(is_reserved("F_1x"));
        assert!(!is_reserved("tau"));
    }

    #[test]
    fn test_assignment_specializes_symbolic_expressions() {
        let geometry = Geometry::at(Position::int(1, 0), Position::int(0, -1));
        let cross = Geometry::symbolic().cross();
        assert_eq!(cross.subst_all(&geometry.assignment()), Some(Expr::int(-1)));
    }
}
