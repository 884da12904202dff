pub mod call;
pub mod error;
pub mod event;
pub mod identity;
pub mod instruction;
pub mod state;
pub mod transaction;

pub use call::{CallArg, CallReturn, CallTarget};
pub use error::{LedgerError, LedgerResult};
pub use event::LedgerEvent;
pub use identity::{Amount, Identity};
pub use instruction::LedgerInstruction;
pub use state::LedgerState;
pub use transaction::Invocation;
