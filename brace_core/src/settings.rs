//! # Derivation Settings
//!
//! Which parametrization to use, which minima to compute, and which
//! identities to verify along the way.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::settings::DerivationSettings;
//!
//! let settings = DerivationSettings::from_json(r#"{ "modes": ["stationary"] }"#).unwrap();
//! assert!(settings.cross_check);
//! assert_eq!(settings.modes.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::derivation::optimizer::MinimizationMode;
use crate::derivation::parametrized::Pin;
use crate::errors::{BraceError, BraceResult};
use crate::geometry::Contact;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationSettings {
    /// Quantity fixed to the free parameter by the parametrized solver
    pub pin: Pin,

    /// Minimization modes to run
    pub modes: Vec<MinimizationMode>,

    /// Contacts whose force is minimized
    pub contacts: Vec<Contact>,

    /// Compare the parametrized and null-space families
    pub cross_check: bool,

    /// Substitute the family back into the balance equations
    pub verify_equilibrium: bool,

    /// Require the family's tension to equal its parameter
    pub verify_tension: bool,

    /// Require stationary minima to be perpendicular to the contact line
    pub verify_perpendicular: bool,
}

impl Default for DerivationSettings {
    fn default() -> Self {
        DerivationSettings {
            pin: Pin::Tension,
            modes: MinimizationMode::ALL.to_vec(),
            contacts: Contact::ALL.to_vec(),
            cross_check: true,
            verify_equilibrium: true,
            verify_tension: true,
            verify_perpendicular: true,
        }
    }
}

impl DerivationSettings {
    /// Parses and validates settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> BraceResult<Self> {
        let settings: DerivationSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> BraceResult<()> {
        if self.modes.is_empty() {
            return Err(BraceError::invalid_input("modes", "[]", "at least one minimization mode is required"));
        }
        if self.contacts.is_empty() {
            return Err(BraceError::invalid_input("contacts", "[]", "at least one contact is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ForceComponent;

    #[test]
    fn test_defaults() {
        let settings = DerivationSettings::default();
        assert_eq!(settings.pin, Pin::Tension);
        assert_eq!(settings.modes.len(), 2);
        assert_eq!(settings.contacts, vec![Contact::One, Contact::Two]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_roundtrip() {
        let settings = DerivationSettings {
            pin: Pin::Component {
                component: ForceComponent::F2Y,
            },
            contacts: vec![Contact::Two],
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(DerivationSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_empty_modes_rejected() {
        let err = DerivationSettings::from_json(r#"{ "modes": [] }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = DerivationSettings::from_json("{ modes").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
