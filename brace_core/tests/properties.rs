//! Equilibrium, tension, perpendicularity, and linearity properties over
//! random integer geometries, plus the fixed regression cases.

use brace_core::derivation::{
    common_scale, cross_check, derive, minimize, solve_null_space, solve_parametrized, MinimizationMode, Pin,
};
use brace_core::equations::build_equation_set;
use brace_core::geometry::{load_symbol, Contact, ForceComponent, Geometry, Position};
use brace_core::settings::DerivationSettings;
use brace_core::Expr;

fn fixture() -> Geometry {
    Geometry::at(Position::int(1, 0), Position::int(0, -1))
}

// ============================================================================
// Regression Fixtures
// ============================================================================

#[test]
fn test_fixture_minimum_force_at_contact_one() {
    let settings = DerivationSettings {
        modes: vec![MinimizationMode::Stationary],
        contacts: vec![Contact::One],
        ..Default::default()
    };
    let derivation = derive(&fixture(), &settings).unwrap();
    assert_eq!(derivation.normalized.len(), 1);
    let result = &derivation.normalized[0];

    assert_eq!(result.scale, &Expr::symbol("g") * &Expr::ratio(1, 2));
    let coefficients: Vec<Expr> = ForceComponent::ALL
        .iter()
        .map(|c| result.coefficient(*c).unwrap().clone())
        .collect();
    assert_eq!(coefficients, vec![Expr::zero(), Expr::zero(), Expr::zero(), Expr::int(-2)]);

    let g = Expr::symbol("g");
    assert_eq!(result.reconstruct(), [Expr::zero(), Expr::zero(), Expr::zero(), -&g]);
}

#[test]
fn test_fixture_zero_torque_solution() {
    let settings = DerivationSettings {
        modes: vec![MinimizationMode::ZeroIndividualTorque],
        ..Default::default()
    };
    let derivation = derive(&fixture(), &settings).unwrap();
    for result in &derivation.normalized {
        // scale is g / (r_1x·r_2y - r_1y·r_2x) = -g
        assert_eq!(result.scale, -Expr::symbol("g"));
        assert_eq!(result.coefficient(ForceComponent::F2Y), Some(&Expr::one()));
        assert_eq!(result.parameter, Expr::zero());
    }
}

#[test]
fn test_symbolic_closed_form_minimum_at_contact_one() {
    // F1 = k·(r_2x(r_2y - r_1y), r_2x(r_1x - r_2x)) with k = g / |r1 - r2|²
    let geometry = Geometry::symbolic();
    let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
    let min = minimize(&family, &geometry, Contact::One, MinimizationMode::Stationary).unwrap();
    assert_eq!(min.critical.len(), 1);

    let (r1x, r1y) = (Expr::symbol("r_1x"), Expr::symbol("r_1y"));
    let (r2x, r2y) = (Expr::symbol("r_2x"), Expr::symbol("r_2y"));
    let k = common_scale(&geometry, MinimizationMode::Stationary).unwrap();
    let forces = &min.critical[0].forces;
    assert_eq!(forces[0], &k * &(&r2x * &(&r2y - &r1y)));
    assert_eq!(forces[1], &k * &(&r2x * &(&r1x - &r2x)));
}

#[test]
fn test_symbolic_closed_form_minimum_at_contact_two() {
    // F2 = k·(r_1x(r_1y - r_2y), r_1x(r_2x - r_1x))
    let geometry = Geometry::symbolic();
    let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
    let min = minimize(&family, &geometry, Contact::Two, MinimizationMode::Stationary).unwrap();

    let (r1x, r1y) = (Expr::symbol("r_1x"), Expr::symbol("r_1y"));
    let (r2x, r2y) = (Expr::symbol("r_2x"), Expr::symbol("r_2y"));
    let k = common_scale(&geometry, MinimizationMode::Stationary).unwrap();
    let forces = &min.critical[0].forces;
    assert_eq!(forces[2], &k * &(&r1x * &(&r1y - &r2y)));
    assert_eq!(forces[3], &k * &(&r1x * &(&r2x - &r1x)));
}

#[test]
fn test_symbolic_derivation_specializes_to_fixture() {
    let symbolic = solve_parametrized(&Geometry::symbolic(), Pin::Tension).unwrap();
    let direct = solve_parametrized(&fixture(), Pin::Tension).unwrap();
    assert_eq!(symbolic.specialize(&fixture().assignment()).unwrap(), direct);
}

#[test]
fn test_coincident_contacts_degenerate_on_both_paths() {
    let geometry = Geometry::at(Position::int(2, -1), Position::int(2, -1));
    for pin in [Pin::Tension, Pin::CONTACT_TWO_VERTICAL] {
        assert_eq!(
            solve_parametrized(&geometry, pin).unwrap_err().error_code(),
            "DEGENERATE_GEOMETRY"
        );
    }
    assert_eq!(
        solve_null_space(&geometry).unwrap_err().error_code(),
        "DEGENERATE_GEOMETRY"
    );
}

#[test]
fn test_collinear_with_origin_is_degenerate() {
    let geometry = Geometry::at(Position::int(1, 2), Position::int(-2, -4));
    let err = derive(&geometry, &DerivationSettings::default()).unwrap_err();
    assert_eq!(err.error_code(), "DEGENERATE_GEOMETRY");
    assert!(solve_null_space(&geometry).is_err());
}

#[test]
fn test_zero_load_is_degenerate() {
    let geometry = Geometry::new(Position::int(1, 0), Position::int(0, -1), Expr::zero());
    let err = derive(&geometry, &DerivationSettings::default()).unwrap_err();
    assert_eq!(err.error_code(), "DEGENERATE_GEOMETRY");
}

#[test]
fn test_reserved_symbols_in_geometry_are_invalid_input() {
    let tension_load = Geometry::new(Position::int(1, 0), Position::int(0, -1), Expr::symbol("t"));
    let err = derive(&tension_load, &DerivationSettings::default()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");

    let unknown_coordinate = Geometry::at(Position::new(Expr::symbol("F_2y"), Expr::zero()), Position::int(0, -1));
    let err = derive(&unknown_coordinate, &DerivationSettings::default()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
    assert!(!err.is_internal());
}

// ============================================================================
// Properties
// ============================================================================

mod props {
    use super::*;
    use proptest::prelude::*;

    // Integer positions with distinct contacts not collinear with the origin
    fn geometry() -> impl Strategy<Value = Geometry> {
        (-6i64..=6, -6i64..=6, -6i64..=6, -6i64..=6, prop_oneof![Just(None), (1i64..=20).prop_map(Some)])
            .prop_filter("contacts collinear with the origin", |(ax, ay, bx, by, _)| ax * by - ay * bx != 0)
            .prop_map(|(ax, ay, bx, by, load)| {
                let load = load.map_or_else(|| Expr::from_symbol(load_symbol()), Expr::int);
                Geometry::new(Position::int(ax, ay), Position::int(bx, by), load)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_family_satisfies_equilibrium(geometry in geometry()) {
            let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
            prop_assert!(family.satisfies(&build_equation_set(&geometry)));
            prop_assert!(family.is_affine());
        }

        #[test]
        fn prop_formulations_agree(geometry in geometry()) {
            let parametrized = solve_parametrized(&geometry, Pin::Tension).unwrap();
            let decomposition = solve_null_space(&geometry).unwrap();
            prop_assert!(cross_check("property", &parametrized, &decomposition.family()).is_ok());

            if geometry.r1.y != geometry.r2.y {
                let pinned = solve_parametrized(&geometry, Pin::CONTACT_TWO_VERTICAL).unwrap();
                let reparametrized = pinned.reparametrize_by_tension(&geometry).unwrap();
                prop_assert_eq!(reparametrized, parametrized);
            }
        }

        #[test]
        fn prop_tension_equals_parameter(geometry in geometry()) {
            let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
            prop_assert_eq!(family.tension(&geometry), Expr::symbol("t"));
            prop_assert_eq!(
                family.torque(&geometry, Contact::Two),
                -Expr::symbol("t")
            );
        }

        #[test]
        fn prop_minimum_is_perpendicular(geometry in geometry()) {
            let family = solve_parametrized(&geometry, Pin::Tension).unwrap();
            let separation = geometry.separation();
            for contact in Contact::ALL {
                let min = minimize(&family, &geometry, contact, MinimizationMode::Stationary).unwrap();
                prop_assert_eq!(min.critical.len(), 1);
                let forces = &min.critical[0].forces;
                let i = contact.index() * 2;
                let force = Position::new(forces[i].clone(), forces[i + 1].clone());
                prop_assert!(force.dot(&separation).is_zero());
            }
        }

        #[test]
        fn prop_results_linear_in_load(geometry in geometry()) {
            let derivation = derive(&geometry, &DerivationSettings::default()).unwrap();
            prop_assert_eq!(derivation.normalized.len(), 4);
            for result in &derivation.normalized {
                for coefficient in result.coefficients.values() {
                    prop_assert!(!coefficient.depends_on(load_symbol()));
                }
                for force in result.reconstruct() {
                    let degree = force.degree_in(load_symbol());
                    prop_assert!(degree.is_some_and(|d| d <= 1));
                }
            }
        }
    }
}
