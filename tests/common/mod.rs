//! Shared in-memory fixtures for the integration tests
//!
//! Every external collaborator gets a scriptable stand-in here: a map-backed
//! state store, a flat fee schedule, accept/reject signature checkers, a
//! recording validity sink and a scripted VM.

// Each integration binary uses a subset of these fixtures.
#![allow(dead_code)]

use std::collections::HashMap;

use wasm_tx_core::{
    Account, Authorization, ContractRecord, FeeSchedule, InlineCall, KeyId, PubKey, RegId,
    SignatureChecker, StateStore, Transaction, TxError, TxType, ValidationState, Vm, VmInvocation,
    VmOutput,
};

/// Installs the log subscriber once per test binary so `RUST_LOG` surfaces
/// the core's tracing output during test runs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Interface description deployed for the `token` fixture contract.
pub const TOKEN_ABI: &str = r#"{
    "structs": [
        {"name": "transfer", "fields": [
            {"name": "from", "type": "name"},
            {"name": "to", "type": "name"},
            {"name": "quantity", "type": "u64"},
            {"name": "memo", "type": "string"}
        ]}
    ],
    "actions": [{"name": "transfer", "type": "transfer"}]
}"#;

#[derive(Default)]
pub struct MemoryStore {
    accounts: HashMap<String, Account>,
    contracts: HashMap<u64, ContractRecord>,
    keys: HashMap<String, KeyId>,
}

impl MemoryStore {
    pub fn with_account(mut self, nickname: &str, regid: u64, registered: bool) -> Self {
        let pubkey = registered.then(|| PubKey(vec![0x02; 33]));
        self.accounts.insert(
            nickname.to_string(),
            Account { nickname: nickname.to_string(), regid: RegId(regid), pubkey },
        );
        self.keys
            .insert(nickname.to_string(), KeyId([regid as u8; 20]));
        self
    }

    pub fn with_contract(mut self, regid: u64, code: &[u8], abi: &[u8]) -> Self {
        self.contracts
            .insert(regid, ContractRecord { code: code.to_vec(), abi: abi.to_vec() });
        self
    }

    /// The usual fixture: registered sender `alice` plus a deployed `token`
    /// contract with the transfer ABI.
    pub fn standard() -> Self {
        MemoryStore::default()
            .with_account("alice", 1, true)
            .with_account("token", 2, true)
            .with_contract(2, &[0x00, 0x61, 0x73, 0x6d], TOKEN_ABI.as_bytes())
    }
}

impl StateStore for MemoryStore {
    fn get_account_by_nickname(&self, nickname: &str) -> Option<Account> {
        self.accounts.get(nickname).cloned()
    }
    fn get_contract(&self, regid: RegId) -> Option<ContractRecord> {
        self.contracts.get(&regid.0).cloned()
    }
    fn get_key_id(&self, nickname: &str) -> Option<KeyId> {
        self.keys.get(nickname).copied()
    }
}

pub struct FlatSchedule(pub u64);

impl FeeSchedule for FlatSchedule {
    fn min_fee(&self, _tx_type: TxType, _height: u64, _fee_symbol: &str) -> Option<u64> {
        Some(self.0)
    }
}

/// Schedule with no entry for anything; triggers the fatal lookup path.
pub struct EmptySchedule;

impl FeeSchedule for EmptySchedule {
    fn min_fee(&self, _tx_type: TxType, _height: u64, _fee_symbol: &str) -> Option<u64> {
        None
    }
}

pub struct AcceptAll;

impl SignatureChecker for AcceptAll {
    fn verify(&self, _tx: &Transaction, _pubkey: &PubKey) -> bool {
        true
    }
}

pub struct RejectAll;

impl SignatureChecker for RejectAll {
    fn verify(&self, _tx: &Transaction, _pubkey: &PubKey) -> bool {
        false
    }
}

/// Records everything the core reports through the validity sink.
#[derive(Default)]
pub struct RecordingState {
    pub rejections: Vec<(u32, u32, String)>,
    pub result: Option<String>,
}

impl ValidationState for RecordingState {
    fn reject(&mut self, penalty: u32, code: u32, message: &str) {
        self.rejections.push((penalty, code, message.to_string()));
    }
    fn set_return(&mut self, result: String) {
        self.result = Some(result);
    }
}

/// VM stand-in driven by a per-invocation script.
///
/// Every invocation is logged; the behavior closure decides console output,
/// spawned calls, or failure.
pub struct ScriptedVm {
    pub invocations: Vec<(String, String, u32)>,
    behavior: Box<dyn FnMut(&VmInvocation<'_>) -> Result<VmOutput, TxError>>,
}

impl ScriptedVm {
    pub fn new(
        behavior: impl FnMut(&VmInvocation<'_>) -> Result<VmOutput, TxError> + 'static,
    ) -> Self {
        ScriptedVm { invocations: Vec::new(), behavior: Box::new(behavior) }
    }

    /// Succeeds on every call with a fixed console line and no spawns.
    pub fn quiet() -> Self {
        ScriptedVm::new(|_| Ok(VmOutput { console: "ok".into(), spawned: Vec::new() }))
    }
}

impl Vm for ScriptedVm {
    fn execute(&mut self, invocation: &VmInvocation<'_>) -> Result<VmOutput, TxError> {
        self.invocations.push((
            invocation.receiver.to_string(),
            invocation.call.action.to_string(),
            invocation.depth,
        ));
        (self.behavior)(invocation)
    }
}

pub fn call(contract: &str, action: &str, signer: &str, data: Vec<u8>) -> InlineCall {
    InlineCall {
        contract: contract.parse().unwrap(),
        action: action.parse().unwrap(),
        authorization: vec![Authorization {
            account: signer.parse().unwrap(),
            permission: "active".parse().unwrap(),
        }],
        data,
    }
}

/// Transaction from `alice` with the given calls and a comfortable fee.
pub fn transaction(calls: Vec<InlineCall>) -> Transaction {
    Transaction {
        version: 1,
        tx_type: TxType::WasmContract,
        sender: "alice".into(),
        fee: 1_000_000,
        fee_symbol: "WICC".into(),
        valid_height: 100,
        calls,
        run_steps: 0,
    }
}
