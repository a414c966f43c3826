//! Collaborator seams for the transaction core
//!
//! The core owns validation order, fuel arithmetic, dispatch and tracing;
//! everything else lives behind a trait here:
//! - `StateStore`: the account/contract persistence layer
//! - `FeeSchedule`: the network fee table
//! - `SignatureChecker`: signature verification primitives
//! - `ValidationState`: consensus-validity/result plumbing
//! - `Vm`: the WASM virtual machine
//!
//! Tests substitute in-memory fixtures for all of these; the node wires in
//! the real implementations.

use crate::errors::TxError;
use crate::name::Name;
use crate::types::{Account, ContractRecord, InlineCall, KeyId, PubKey, RegId, Transaction, TxType};

/// Read access to the account/contract persistence layer.
///
/// All methods are lookups; mutation during execution happens inside the VM
/// collaborator, which receives its own handle.
pub trait StateStore {
    /// Account by nickname, the identity form contracts are addressed by.
    fn get_account_by_nickname(&self, nickname: &str) -> Option<Account>;

    /// Contract record deployed under the given registration id.
    fn get_contract(&self, regid: RegId) -> Option<ContractRecord>;

    /// Signing-key id for the account, for mempool bookkeeping.
    fn get_key_id(&self, nickname: &str) -> Option<KeyId>;
}

/// Network fee-schedule lookup.
pub trait FeeSchedule {
    /// Minimum fee for a transaction type at a given height, in the smallest
    /// unit of `fee_symbol`. `None` means the schedule has no entry, which
    /// the caller treats as a node-level failure, not a user rejection.
    fn min_fee(&self, tx_type: TxType, height: u64, fee_symbol: &str) -> Option<u64>;
}

/// Signature verification, used as a black box.
pub trait SignatureChecker {
    /// True when the transaction's signature verifies against `pubkey`.
    fn verify(&self, tx: &Transaction, pubkey: &PubKey) -> bool;
}

/// Consensus-validity and result sink owned by the block-processing pipeline.
///
/// Both validation and execution failures are reported here with a fixed
/// penalty score plus the error's machine code and message; a successful
/// execution stores its rendered trace document through `set_return`.
pub trait ValidationState {
    /// Records a rejection with a DoS penalty score.
    fn reject(&mut self, penalty: u32, code: u32, message: &str);

    /// Stores the externally visible execution result.
    fn set_return(&mut self, result: String);
}

/// One contract invocation handed to the virtual machine.
#[derive(Debug, Clone)]
pub struct VmInvocation<'a> {
    /// Id of the originating transaction.
    pub trx_id: crate::types::TxHash,
    /// Contract the call is executing on (may differ from `call.contract`
    /// for notification-style redelivery).
    pub receiver: Name,
    /// The inline call being executed.
    pub call: &'a InlineCall,
    /// Current inline nesting depth, 0 for top-level calls.
    pub depth: u32,
}

/// What one VM invocation produced.
///
/// The dispatcher owns recursion: spawned calls come back here and are
/// re-dispatched with `depth + 1`, each growing one child trace.
#[derive(Debug, Clone, Default)]
pub struct VmOutput {
    /// Console/log output appended to the call's trace.
    pub console: String,
    /// Further inline calls the contract issued, in issue order.
    pub spawned: Vec<InlineCall>,
}

/// The WASM execution engine, out of scope for this core.
///
/// Implementations interpret the target contract's bytecode for the given
/// action and data and may mutate account/contract state through their own
/// store handle. State rollback on failure is the implementation's concern.
pub trait Vm {
    /// Runs one invocation to completion.
    fn execute(&mut self, invocation: &VmInvocation<'_>) -> Result<VmOutput, TxError>;
}

/// Block-processing context handed into `check` and `execute`.
///
/// Bundles the block coordinates with mutable handles to the collaborators
/// for the duration of one transaction.
pub struct ExecContext<'a> {
    /// Current block height.
    pub height: u64,
    /// Network-wide fuel rate at this height.
    pub fuel_rate: u64,
    /// Account/contract state database.
    pub store: &'a dyn StateStore,
    /// Fee schedule.
    pub schedule: &'a dyn FeeSchedule,
    /// Signature verification.
    pub signatures: &'a dyn SignatureChecker,
    /// Validity/result sink.
    pub state: &'a mut dyn ValidationState,
    /// Contract execution engine.
    pub vm: &'a mut dyn Vm,
    /// Built-in contract table.
    pub registry: &'a crate::native::NativeRegistry,
}
