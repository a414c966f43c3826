//! Core data model for contract transactions and their execution traces
//!
//! This module defines the wire-visible transaction shape and the in-memory
//! trace tree execution produces:
//! - Inline calls and their authorizations
//! - The transaction envelope (version, sender, fee, validity window)
//! - Content hashing of the wire bytes
//! - Nested inline-transaction traces
//!
//! Field order on the serializable types is the persisted wire order and is
//! significant: the transaction id is the SHA-256 of the bincode encoding,
//! so reordering fields is a consensus change.

use std::fmt;
use std::time::Duration;

use digest::Digest;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::name::Name;

/// Size of a transaction id in bytes.
pub const HASH_BYTES: usize = 32;

/// A 32-byte content hash, rendered as lowercase hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxHash(pub [u8; HASH_BYTES]);

impl TxHash {
    /// Hashes an arbitrary byte string.
    pub fn digest(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let mut out = [0u8; HASH_BYTES];
        out.copy_from_slice(&hasher.finalize());
        TxHash(out)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl AsRef<[u8]> for TxHash {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

/// Transaction type tag carried on the wire and used for fee-schedule lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TxType {
    /// A WASM contract invocation transaction.
    WasmContract = 21,
}

/// A declared (account, permission) approval for one inline call.
///
/// At this layer the model is single-signer: every authorization must name
/// the identity that signed the enclosing transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// Account whose approval is claimed.
    pub account: Name,
    /// Permission level under that account (e.g. `active`).
    pub permission: Name,
}

/// One contract invocation request carried inside a transaction.
///
/// Inline calls are also how contracts call each other: execution of one call
/// may spawn further `InlineCall` values, dispatched recursively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineCall {
    /// Target contract, as a packed name.
    pub contract: Name,
    /// Action to invoke on the target.
    pub action: Name,
    /// Declared approvals, checked against the transaction signer.
    pub authorization: Vec<Authorization>,
    /// Opaque binary call arguments, interpreted by the target contract.
    #[serde(with = "serde_bytes_hex")]
    pub data: Vec<u8>,
}

// bincode encodes Vec<u8> compactly on its own; this shim only changes the
// human-readable (serde_json) form to hex instead of a byte array.
mod serde_bytes_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        if ser.is_human_readable() {
            ser.serialize_str(&hex::encode(data))
        } else {
            ser.serialize_bytes(data)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        if de.is_human_readable() {
            let s = String::deserialize(de)?;
            hex::decode(&s).map_err(serde::de::Error::custom)
        } else {
            let b: Vec<u8> = serde::Deserialize::deserialize(de)?;
            Ok(b)
        }
    }
}

/// The top-level contract transaction.
///
/// Constructed from wire bytes or a build request, validated read-only by
/// [`Transaction::check`], executed exactly once by [`Transaction::execute`],
/// then discarded. Field order is the wire order.
///
/// [`Transaction::check`]: crate::tx::Transaction::check
/// [`Transaction::execute`]: crate::tx::Transaction::execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Envelope version.
    pub version: u32,
    /// Transaction type tag.
    pub tx_type: TxType,
    /// Sender identity: the nickname of the signing account.
    pub sender: String,
    /// Declared fee in the smallest unit of `fee_symbol`.
    pub fee: u64,
    /// Currency symbol the fee is denominated in.
    pub fee_symbol: String,
    /// Last block height at which this transaction is valid.
    pub valid_height: u64,
    /// Ordered inline calls; empty is invalid.
    pub calls: Vec<InlineCall>,
    /// Estimated run-step count used for pre-flight fuel computation.
    ///
    /// A fixed per-transaction estimate, not a measurement: the fuel check
    /// runs before execution, so this cannot reflect actual steps.
    #[serde(skip)]
    pub run_steps: u64,
}

impl Transaction {
    /// Wire encoding of the order-significant fields.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        // Encoding plain structs and sequences cannot fail.
        bincode::serialize(self).expect("transaction wire encoding is infallible")
    }

    /// Decodes a transaction from its wire bytes.
    pub fn from_wire_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Content hash over the wire bytes, used as the transaction id.
    pub fn id(&self) -> TxHash {
        TxHash::digest(&self.to_wire_bytes())
    }
}

/// Registered account record, owned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Human-readable nickname, also the basis of the packed name identity.
    pub nickname: String,
    /// Registration id assigned at account creation.
    pub regid: RegId,
    /// Owner signing key; absent for unregistered accounts.
    pub pubkey: Option<PubKey>,
}

impl Account {
    /// True when the account has an owner key on file.
    pub fn has_owner_pubkey(&self) -> bool {
        self.pubkey.is_some()
    }
}

/// Account registration id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegId(pub u64);

/// Serialized public signing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey(pub Vec<u8>);

/// Key identifier used for mempool conflict analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyId(pub [u8; 20]);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Deployed contract record: bytecode plus interface description.
///
/// Both blobs must be present for the contract to be callable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// WASM bytecode.
    pub code: Vec<u8>,
    /// Interface-description (ABI) blob, JSON.
    pub abi: Vec<u8>,
}

impl ContractRecord {
    /// True when both bytecode and interface description are deployed.
    pub fn is_complete(&self) -> bool {
        !self.code.is_empty() && !self.abi.is_empty()
    }
}

/// Execution record of one inline call, including everything it spawned.
///
/// Forms a tree rooted at each top-level call; depth is bounded by the
/// dispatcher's recursion limit, so no cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineTrace {
    /// Id of the originating transaction.
    pub trx_id: TxHash,
    /// Contract that received the call.
    pub receiver: Name,
    /// The call that produced this trace.
    pub call: InlineCall,
    /// Console/log output the contract produced.
    pub console: String,
    /// Child traces, one per spawned inline call, in dispatch order.
    pub inline_traces: Vec<InlineTrace>,
}

impl InlineTrace {
    /// Empty trace slot for a call about to be dispatched.
    pub fn new(trx_id: TxHash, receiver: Name, call: InlineCall) -> Self {
        InlineTrace {
            trx_id,
            receiver,
            call,
            console: String::new(),
            inline_traces: Vec::new(),
        }
    }
}

/// Execution result of one whole transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTrace {
    /// Transaction id.
    pub trx_id: TxHash,
    /// Total billed wall-clock time.
    pub elapsed: Duration,
    /// Top-level traces, one per inline call, in declaration order.
    pub traces: Vec<InlineTrace>,
}
