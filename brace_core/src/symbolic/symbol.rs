//! Named symbolic scalars.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named scalar such as `r_1x` or `g`.
///
/// Symbols order by name; that order is also the variable order used by
/// [`Poly`](super::Poly) when it picks a main variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_serializes_as_plain_string() {
        let sym = Symbol::new("r_1x");
        assert_eq!(serde_json::to_string(&sym).unwrap(), "\"r_1x\"");
        assert_eq!(sym.to_string(), "r_1x");
    }

    #[test]
    fn test_symbols_order_by_name() {
        assert!(Symbol::new("g") < Symbol::new("r_1x"));
        assert!(Symbol::new("r_1x") < Symbol::new("r_2y"));
    }
}
