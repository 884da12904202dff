//! Values exchanged with external collaborators through the host's
//! generic invoke capability.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LedgerError, LedgerResult};
use crate::identity::{Amount, Identity};

/// Who a nested call is addressed to. `System` carries host commands such
/// as the relay lookup, which are not bound to a contract identity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget {
    System,
    Contract(Identity),
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTarget::System => write!(f, "system"),
            CallTarget::Contract(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Identity(Identity),
    Amount(Amount),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum CallReturn {
    Unit,
    Bool(bool),
    Identity(Identity),
    Text(String),
}

impl CallReturn {
    /// Interprets the result as a boolean. Text results are parsed the
    /// way string-typed hosts report them ("true"/"false").
    pub fn as_bool(&self, method: &str) -> LedgerResult<bool> {
        match self {
            CallReturn::Bool(b) => Ok(*b),
            CallReturn::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(LedgerError::UnexpectedReturn { method: method.to_string() }),
            },
            _ => Err(LedgerError::UnexpectedReturn { method: method.to_string() }),
        }
    }

    pub fn as_identity(&self, method: &str) -> LedgerResult<Identity> {
        match self {
            CallReturn::Identity(id) => Ok(*id),
            CallReturn::Text(s) => s.parse(),
            _ => Err(LedgerError::UnexpectedReturn { method: method.to_string() }),
        }
    }
}
