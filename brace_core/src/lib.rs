//! # brace_core - Exact Two-Contact Equilibrium Derivation
//!
//! `brace_core` derives, in closed symbolic form, the forces that hold a rigid
//! body in static equilibrium at two contacts under a downward load, and the
//! members of that one-parameter family that minimize the force at either
//! contact. All arithmetic is exact; all results are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Exact**: Rational functions over ℚ, never floating point
//! - **Cross-Checked**: Two independent formulations must agree
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use brace_core::{derive, DerivationSettings, Expr, Geometry, Position};
//!
//! // Hand at (1, 0), foot at (0, -1), symbolic load g
//! let geometry = Geometry::at(Position::int(1, 0), Position::int(0, -1));
//! let derivation = derive(&geometry, &DerivationSettings::default()).unwrap();
//!
//! // Minimizing the hand force puts the whole load on the foot
//! let first = &derivation.normalized[0];
//! assert_eq!(first.scale.to_string(), "g/2");
//! assert_eq!(first.coefficients["F_2y"], Expr::int(-2));
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Contact positions, load, and symbol names
//! - [`equations`] - Balance equations and the relation registry
//! - [`derivation`] - Solvers, optimizer, normalizer, and the pipeline
//! - [`symbolic`] - Exact polynomial and rational-function engine
//! - [`settings`] - Derivation configuration
//! - [`errors`] - Structured error types

pub mod derivation;
pub mod equations;
pub mod errors;
pub mod geometry;
pub mod settings;
pub mod symbolic;

// Re-export commonly used types at crate root for convenience
pub use derivation::{derive, Derivation, MinimizationMode, NormalizedForces, Pin, SolutionFamily};
pub use errors::{BraceError, BraceResult};
pub use geometry::{Contact, ForceComponent, Geometry, Position};
pub use settings::DerivationSettings;
pub use symbolic::{Expr, Symbol};
