//! Versioned scan token passed from planning to scan open.

use serde::{Deserialize, Serialize};

use crate::filters::Operator;

use super::errors::{PlannerError, PlannerResult};

/// Current token format version. Bumped whenever the layout changes;
/// decoding rejects any other version.
pub const TOKEN_VERSION: u32 = 1;

/// Everything the scan materializer needs to reconstruct the planner's
/// decisions: which constraints were accepted (in argument-slot order)
/// and which order-by entries were deferred to the adapter.
///
/// The token crosses the host engine as an opaque JSON string, so the
/// layout is explicit and versioned rather than a bare tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexToken {
    pub version: u32,
    /// Accepted `(column_index, operator)` pairs, ordered by argument slot.
    pub constraints: Vec<(usize, Operator)>,
    /// Deferred `(column_index, descending)` order-by entries.
    pub deferred_order: Vec<(usize, bool)>,
}

impl Default for IndexToken {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl IndexToken {
    pub fn new(constraints: Vec<(usize, Operator)>, deferred_order: Vec<(usize, bool)>) -> Self {
        Self {
            version: TOKEN_VERSION,
            constraints,
            deferred_order,
        }
    }

    /// Serializes the token to its JSON wire form.
    pub fn encode(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a token, rejecting unknown versions.
    pub fn decode(encoded: &str) -> PlannerResult<Self> {
        let token: Self = serde_json::from_str(encoded)?;
        if token.version != TOKEN_VERSION {
            return Err(PlannerError::TokenVersion {
                found: token.version,
                expected: TOKEN_VERSION,
            });
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let token = IndexToken::new(
            vec![(0, Operator::Eq), (2, Operator::Gt)],
            vec![(1, true)],
        );
        let encoded = token.encode().unwrap();
        assert_eq!(IndexToken::decode(&encoded).unwrap(), token);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let token = IndexToken::new(vec![(3, Operator::Le)], vec![]);
        assert_eq!(token.encode().unwrap(), token.encode().unwrap());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut token = IndexToken::new(vec![], vec![]);
        token.version = 99;
        let encoded = token.encode().unwrap();
        match IndexToken::decode(&encoded) {
            Err(PlannerError::TokenVersion { found: 99, expected }) => {
                assert_eq!(expected, TOKEN_VERSION);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            IndexToken::decode("not json"),
            Err(PlannerError::TokenEncoding(_))
        ));
    }
}
