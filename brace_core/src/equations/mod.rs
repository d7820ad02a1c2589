//! # Equilibrium Equations
//!
//! The balance relations for a rigid body held at two contacts under a
//! downward load. Having them in one place enables:
//! - One sign convention shared by every formulation
//! - Metadata for presentation of each relation
//!
//! ## Modules
//!
//! - [`equilibrium`] - Explicit equations and their matrix forms
//! - [`registry`] - Relation metadata and the markdown reference
//!
//! ## Sign Conventions
//!
//! - **Load**: Positive downward, so the contact forces sum to `(0, -g)`
//! - **Torque**: `x·Fy - y·Fx` about the origin, counterclockwise positive
//! - **Tension**: The torque carried by contact 1; contact 2 carries its negative

pub mod equilibrium;
pub mod registry;

pub use equilibrium::{
    build_equation_set, pinned_form, unknown_assignment, zero_tension_form, Equation, EquationSet,
    LinearForm,
};
pub use registry::{generate_relations_markdown, Relation, RelationCategory, ALL_RELATIONS};
