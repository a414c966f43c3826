//! # WASM Contract-Transaction Core
//!
//! Consensus-critical processing of WASM contract transactions on a
//! blockchain node: pre-flight validation, fee/fuel accounting, recursive
//! dispatch of inline contract calls, and structured trace production.
//!
//! ## Core Features
//!
//! - **Pre-flight Validation**
//!   - Transaction shape and fee sufficiency
//!   - Contract deployment checks (code + interface present)
//!   - Single-signer authorization matching
//!
//! - **Traced Execution**
//!   - Recursive inline-call dispatch with a depth bound
//!   - Pausable billing timer excluding book-keeping time
//!   - Nested trace tree rendered to a fixed JSON document
//!
//! - **Explicit Collaborator Seams**
//!   - Persistence, fee schedule, signatures, VM and validity state are
//!     traits; the bytecode interpreter itself is out of scope
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use wasm_tx_core::{ExecContext, NativeRegistry, Transaction};
//!
//! let registry = NativeRegistry::standard();
//! let mut tx = Transaction::from_wire_bytes(&wire_bytes)?;
//!
//! let mut ctx = ExecContext {
//!     height, fuel_rate,
//!     store: &store, schedule: &schedule, signatures: &sigs,
//!     state: &mut validity, vm: &mut vm, registry: &registry,
//! };
//!
//! tx.check(&mut ctx)?;    // read-only, fail-fast
//! tx.execute(&mut ctx)?;  // runs once, publishes the trace document
//! ```
//!
//! Both `check` and `execute` report every failure through the
//! validation-state sink with a fixed penalty and a stable machine code; see
//! [`errors::TxError`].

pub mod abi;
pub mod errors;
pub mod name;
pub mod native;
pub mod render;
pub mod timer;
pub mod traits;
pub mod tx;
pub mod types;

pub use abi::AbiDef;
pub use errors::TxError;
pub use name::{Name, NameError};
pub use native::{ContractKind, NativeRegistry, SETCODE_ACTION, SYSTEM_CONTRACT};
pub use render::render;
pub use timer::BillingTimer;
pub use traits::{
    ExecContext, FeeSchedule, SignatureChecker, StateStore, ValidationState, Vm, VmInvocation,
    VmOutput,
};
pub use tx::MAX_INLINE_CALL_DEPTH;
pub use types::{
    Account, Authorization, ContractRecord, InlineCall, InlineTrace, KeyId, PubKey, RegId,
    Transaction, TransactionTrace, TxHash, TxType,
};
