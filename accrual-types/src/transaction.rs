use serde::{Deserialize, Serialize};

use crate::identity::{Amount, Identity};
use crate::instruction::LedgerInstruction;

/// One call into the ledger as handed over by the hosting runtime: who is
/// calling, how much value is attached, and what to do.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub caller: Identity,
    pub attached_value: Amount,
    pub instruction: LedgerInstruction,
}

impl Invocation {
    pub fn new(caller: Identity, instruction: LedgerInstruction) -> Self {
        Self {
            caller,
            attached_value: 0,
            instruction,
        }
    }

    pub fn with_value(mut self, attached_value: Amount) -> Self {
        self.attached_value = attached_value;
        self
    }

    pub fn id(&self) -> [u8; 32] {
        let bytes = bincode::serialize(self).expect("invocation serialization failed");
        *blake3::hash(&bytes).as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_covers_attached_value() {
        let inv = Invocation::new(Identity([1u8; 32]), LedgerInstruction::DistributionRewards { amount: 5 });
        assert_eq!(inv.id(), inv.clone().id());
        assert_ne!(inv.id(), inv.clone().with_value(5).id());
    }
}
