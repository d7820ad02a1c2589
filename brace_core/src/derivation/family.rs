//! One-parameter families of equilibrium solutions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::equations::EquationSet;
use crate::errors::{BraceError, BraceResult};
use crate::geometry::{tension_symbol, Axis, Contact, ForceComponent, Geometry};
use crate::symbolic::{Expr, Symbol};

/// Force components as functions of a single free parameter.
///
/// Components are stored in [`ForceComponent::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionFamily {
    pub parameter: Symbol,
    components: [Expr; 4],
}

impl SolutionFamily {
    pub fn new(parameter: Symbol, components: [Expr; 4]) -> Self {
        SolutionFamily {
            parameter,
            components,
        }
    }

    pub fn components(&self) -> &[Expr; 4] {
        &self.components
    }

    pub fn component(&self, component: ForceComponent) -> &Expr {
        &self.components[component.index()]
    }

    /// `(F_kx, F_ky)`
    pub fn force(&self, contact: Contact) -> (&Expr, &Expr) {
        (
            self.component(ForceComponent::new(contact, Axis::X)),
            self.component(ForceComponent::new(contact, Axis::Y)),
        )
    }

    /// Component name → expression.
    pub fn named(&self) -> BTreeMap<String, Expr> {
        ForceComponent::ALL
            .iter()
            .map(|c| (c.name(), self.component(*c).clone()))
            .collect()
    }

    /// Torque of a contact's force about the origin.
    pub fn torque(&self, geometry: &Geometry, contact: Contact) -> Expr {
        let (fx, fy) = self.force(contact);
        geometry.position(contact).torque(fx, fy)
    }

    /// `F_1y·r_1x - F_1x·r_1y`
    pub fn tension(&self, geometry: &Geometry) -> Expr {
        self.torque(geometry, Contact::One)
    }

    /// `F_kx² + F_ky²`
    pub fn squared_magnitude(&self, contact: Contact) -> Expr {
        let (fx, fy) = self.force(contact);
        fx * fx + fy * fy
    }

    /// The member of the family at `parameter = value`.
    pub fn at(&self, value: &Expr) -> BraceResult<[Expr; 4]> {
        let mut out: [Expr; 4] = Default::default();
        for (slot, component) in out.iter_mut().zip(&self.components) {
            *slot = component.subst(&self.parameter, value).ok_or_else(|| {
                BraceError::degenerate_geometry(
                    "family evaluation",
                    format!("a component has a pole at {} = {}", self.parameter, value),
                )
            })?;
        }
        Ok(out)
    }

    /// Equation residuals, identically zero for a valid family.
    pub fn residuals(&self, equations: &EquationSet) -> BraceResult<Vec<Expr>> {
        equations
            .residuals(&self.components)
            .ok_or_else(|| BraceError::internal("equation residual has a pole"))
    }

    pub fn satisfies(&self, equations: &EquationSet) -> bool {
        equations.is_satisfied_by(&self.components)
    }

    /// Every component is a polynomial of degree at most 1 in the parameter.
    pub fn is_affine(&self) -> bool {
        self.components
            .iter()
            .all(|c| c.degree_in(&self.parameter).is_some_and(|d| d <= 1))
    }

    /// Rewrites the family so that its parameter is the tension `t`.
    ///
    /// The tension of an affine family is `α + β·p`; the new family
    /// substitutes `p = (t - α) / β`.
    pub fn reparametrize_by_tension(&self, geometry: &Geometry) -> BraceResult<SolutionFamily> {
        const STAGE: &str = "tension reparametrization";
        if !self.is_affine() {
            return Err(BraceError::internal(format!(
                "family is not affine in {}",
                self.parameter
            )));
        }
        let tension = self.tension(geometry);
        let beta = tension.derivative(&self.parameter);
        if beta.is_zero() {
            return Err(BraceError::degenerate_geometry(
                STAGE,
                format!("tension does not depend on {}", self.parameter),
            ));
        }
        let alpha = tension
            .subst(&self.parameter, &Expr::zero())
            .ok_or_else(|| BraceError::internal("tension has a pole at zero"))?;
        let t = Expr::from_symbol(tension_symbol());
        let p = (&t - &alpha)
            .checked_div(&beta)
            .ok_or_else(|| BraceError::degenerate_geometry(STAGE, "tension slope vanishes"))?;
        tracing::debug!(from = %self.parameter, slope = %beta, offset = %alpha, "reparametrized by tension");

        let mut components: [Expr; 4] = Default::default();
        for (slot, component) in components.iter_mut().zip(&self.components) {
            *slot = component
                .subst(&self.parameter, &p)
                .ok_or_else(|| BraceError::internal("component has a pole after reparametrization"))?;
        }
        Ok(SolutionFamily::new(tension_symbol().clone(), components))
    }

    /// Substitutes concrete values for geometry symbols.
    pub fn specialize(&self, values: &BTreeMap<Symbol, Expr>) -> BraceResult<SolutionFamily> {
        let mut components: [Expr; 4] = Default::default();
        for (slot, component) in components.iter_mut().zip(&self.components) {
            *slot = component.subst_all(values).ok_or_else(|| {
                BraceError::degenerate_geometry(
                    "specialization",
                    "a denominator vanishes at the given geometry",
                )
            })?;
        }
        Ok(SolutionFamily::new(self.parameter.clone(), components))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::build_equation_set;
    use crate::geometry::Position;

    fn fixture() -> Geometry {
        Geometry::at(Position::int(1, 0), Position::int(0, -1))
    }

    /// Fixture family parametrized by F_2y = s.
    fn pinned_fixture_family() -> SolutionFamily {
        let s = Expr::symbol("s");
        let g = Expr::symbol("g");
        // F1 = (-(g + s), -(g + s)), F2 = (g + s, s)
        let a = &g + &s;
        SolutionFamily::new(Symbol::new("s"), [-&a, -&a, a.clone(), s])
    }

    #[test]
    fn test_family_satisfies_equations() {
        let family = pinned_fixture_family();
        assert!(family.satisfies(&build_equation_set(&fixture())));
        assert!(family.is_affine());
    }

    #[test]
    fn test_reparametrize_by_tension() {
        let geometry = fixture();
        let family = pinned_fixture_family().reparametrize_by_tension(&geometry).unwrap();
        assert_eq!(family.parameter, *tension_symbol());
        assert_eq!(family.tension(&geometry), Expr::symbol("t"));
        assert!(family.satisfies(&build_equation_set(&geometry)));
    }

    #[test]
    fn test_constant_tension_cannot_reparametrize() {
        let family = SolutionFamily::new(
            Symbol::new("s"),
            [Expr::zero(), Expr::zero(), Expr::symbol("s"), Expr::zero()],
        );
        let err = family.reparametrize_by_tension(&fixture()).unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_GEOMETRY");
    }

    #[test]
    fn test_at_and_squared_magnitude() {
        let family = pinned_fixture_family();
        let g = Expr::symbol("g");
        let member = family.at(&-&g).unwrap();
        assert_eq!(member, [Expr::zero(), Expr::zero(), Expr::zero(), -&g]);
        let m = family.squared_magnitude(Contact::One);
        let a = &g + &Expr::symbol("s");
        assert_eq!(m, &Expr::int(2) * &(&a * &a));
    }

    #[test]
    fn test_specialize_load() {
        let family = pinned_fixture_family();
        let values = BTreeMap::from([(Symbol::new("g"), Expr::int(10))]);
        let special = family.specialize(&values).unwrap();
        assert_eq!(special.component(ForceComponent::F2X), &(&Expr::int(10) + &Expr::symbol("s")));
    }
}
