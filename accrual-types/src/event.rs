use serde::{Deserialize, Serialize};

use crate::identity::{Amount, Identity};

/// Notifications emitted by the ledger, in emission order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// `from` is `None` only for the construction mint.
    Transfer {
        from: Option<Identity>,
        to: Identity,
        value: Amount,
    },
    Approval {
        owner: Identity,
        spender: Identity,
        value: Amount,
    },
}
