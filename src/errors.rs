//! Error types for transaction validation and execution
//!
//! Every rejection a node can produce for a contract transaction maps to one
//! variant here, each with a stable machine code that is reported through the
//! validation-state sink. The codes are consensus-visible (they end up in the
//! rejection a peer sees), so they must never be renumbered.

use thiserror::Error;

/// Top-level error type for contract-transaction processing
///
/// Validator errors and execution errors are both terminal for the
/// transaction: no retry, no partial success. The one non-terminal failure
/// domain, best-effort argument decoding during trace rendering, never
/// surfaces here at all (the renderer falls back to hex locally).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
    /// Transaction carries no inline calls.
    #[error("transaction must carry at least one inline call")]
    InvalidStructure,

    /// Declared fee does not cover the computed fuel cost.
    #[error("fee {fee} too small to afford fuel {fuel}")]
    InsufficientFee { fee: u64, fuel: u64 },

    /// No account on record for the given identity.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Sender account exists but has no signing key on file.
    #[error("account {0} is unregistered (no owner key)")]
    AccountUnregistered(String),

    /// Target account exists but no contract is deployed under it.
    #[error("no contract deployed for account {0}")]
    ContractNotFound(String),

    /// Contract record is missing bytecode or interface description.
    #[error("contract {0} is missing code or abi")]
    ContractIncomplete(String),

    /// An inline call names an authorizing account other than the signer.
    #[error("authorization {0} does not have a signature")]
    AuthorizationMismatch(String),

    /// Transaction signature does not verify against the sender's key.
    #[error("invalid transaction signature")]
    SignatureInvalid,

    /// The virtual machine failed while running a contract.
    ///
    /// Wraps the VM's own machine code so the original cause survives the
    /// trip through the validation-state sink.
    #[error("contract execution failed (vm code {vm_code}): {message}")]
    ExecutionFailure { vm_code: u32, message: String },

    /// Inline dispatch exceeded the configured nesting bound.
    #[error("inline call depth {depth} exceeds maximum {max}")]
    RecursionLimitExceeded { depth: u32, max: u32 },

    /// Fee-schedule lookup failed.
    ///
    /// Unlike every other variant this is not a user error: the node itself
    /// cannot determine correct fees, which is a configuration or data
    /// integrity problem.
    #[error("min-fee schedule lookup failed for symbol {0}")]
    ScheduleLookupFailure(String),
}

impl TxError {
    /// Stable machine code reported alongside the rejection.
    pub fn code(&self) -> u32 {
        match self {
            TxError::InvalidStructure => 1,
            TxError::InsufficientFee { .. } => 2,
            TxError::AccountNotFound(_) => 3,
            TxError::AccountUnregistered(_) => 4,
            TxError::ContractNotFound(_) => 5,
            TxError::ContractIncomplete(_) => 6,
            TxError::AuthorizationMismatch(_) => 7,
            TxError::SignatureInvalid => 8,
            TxError::ExecutionFailure { .. } => 9,
            TxError::RecursionLimitExceeded { .. } => 10,
            TxError::ScheduleLookupFailure(_) => 11,
        }
    }

    /// True for failures that indicate node misconfiguration rather than a
    /// bad transaction; callers must not treat these as ordinary rejections.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TxError::ScheduleLookupFailure(_))
    }
}
