//! Built-in contract registry
//!
//! Some contracts are implemented natively by the node rather than deployed
//! as bytecode; they have no account or contract record, so both the
//! validator and the renderer must know about them. The registry is an
//! explicit immutable table passed into whoever needs it, never ambient
//! process state, so tests can substitute a fixture table.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::errors::TxError;
use crate::name::Name;
use crate::traits::StateStore;

/// Display name of the system contract.
pub const SYSTEM_CONTRACT: &str = "wasmio";

/// Reserved action for deploying contract code; its arguments are never
/// ABI-decoded when rendering.
pub const SETCODE_ACTION: &str = "setcode";

/// Bundled interface description of the system contract.
///
/// Kept as JSON in the same shape as deployed ABI blobs so the renderer can
/// treat built-ins and deployed contracts uniformly.
const SYSTEM_CONTRACT_ABI: &str = r#"{
  "version": "wasm::abi/1.0",
  "structs": [
    {
      "name": "setcode",
      "fields": [
        {"name": "account", "type": "name"},
        {"name": "code", "type": "bytes"},
        {"name": "abi", "type": "bytes"},
        {"name": "memo", "type": "string"}
      ]
    }
  ],
  "actions": [
    {"name": "setcode", "type": "setcode"}
  ]
}"#;

/// How a call target resolves, decided once per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractKind {
    /// Implemented natively by the node; `abi` is the bundled interface.
    Builtin { abi: Vec<u8> },
    /// Deployed bytecode with its interface description.
    Deployed { code: Vec<u8>, abi: Vec<u8> },
}

/// Immutable table of natively implemented contracts.
#[derive(Debug, Clone, Default)]
pub struct NativeRegistry {
    contracts: BTreeMap<Name, Vec<u8>>,
}

impl NativeRegistry {
    /// Empty table, for tests that want no built-ins at all.
    pub fn empty() -> Self {
        NativeRegistry::default()
    }

    /// The node's standard built-ins: currently just the system contract.
    pub fn standard() -> Self {
        let mut registry = NativeRegistry::default();
        let name = Name::from_str(SYSTEM_CONTRACT).expect("system contract name is valid");
        registry.register(name, SYSTEM_CONTRACT_ABI.as_bytes().to_vec());
        registry
    }

    /// Adds a built-in with its bundled ABI.
    pub fn register(&mut self, contract: Name, abi: Vec<u8>) {
        self.contracts.insert(contract, abi);
    }

    /// True when the contract is implemented natively.
    pub fn contains(&self, contract: Name) -> bool {
        self.contracts.contains_key(&contract)
    }

    /// Bundled ABI of a built-in, if any.
    pub fn abi(&self, contract: Name) -> Option<&[u8]> {
        self.contracts.get(&contract).map(Vec::as_slice)
    }

    /// Resolves a call target to its tagged kind.
    ///
    /// Built-ins resolve from the table alone. Anything else requires a
    /// registered account under the contract's display name and a complete
    /// deployed record:
    /// - no account → [`TxError::AccountNotFound`]
    /// - no contract record → [`TxError::ContractNotFound`]
    /// - missing code or abi → [`TxError::ContractIncomplete`]
    pub fn resolve(&self, contract: Name, store: &dyn StateStore) -> Result<ContractKind, TxError> {
        if let Some(abi) = self.abi(contract) {
            return Ok(ContractKind::Builtin { abi: abi.to_vec() });
        }

        let nickname = contract.to_string();
        let account = store
            .get_account_by_nickname(&nickname)
            .ok_or_else(|| TxError::AccountNotFound(nickname.clone()))?;
        let record = store
            .get_contract(account.regid)
            .ok_or_else(|| TxError::ContractNotFound(nickname.clone()))?;
        if !record.is_complete() {
            return Err(TxError::ContractIncomplete(nickname));
        }
        Ok(ContractKind::Deployed {
            code: record.code,
            abi: record.abi,
        })
    }
}
