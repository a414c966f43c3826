//! Rendering execution traces into the externally visible result document
//!
//! Turns an in-memory trace tree into the JSON document RPC and explorer
//! tooling consume. Numeric identifiers are resolved back to display names,
//! and call arguments are decoded against the target's interface description
//! when one is available: the bundled ABI for built-ins, the deployed blob
//! for everything else. Decoding is best-effort only; on any failure the raw
//! bytes are rendered as hex instead. Rendering never fails.
//!
//! Document shape (field names are fixed):
//!
//! ```json
//! {
//!   "trx_id": "…", "elapsed": 123,
//!   "traces": [{
//!     "trx_id": "…", "receiver": "token",
//!     "trx": {"contract": "token", "action": "transfer",
//!             "authorization": [{"account": "alice", "permission": "active"}],
//!             "data": …},
//!     "console": "…",
//!     "inline_traces": […]
//!   }]
//! }
//! ```
//!
//! `elapsed` (microseconds) appears only at the top level, and empty
//! `traces`/`inline_traces` arrays are omitted rather than emitted empty.

use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::abi::AbiDef;
use crate::name::Name;
use crate::native::{NativeRegistry, SETCODE_ACTION};
use crate::traits::StateStore;
use crate::types::{Authorization, InlineCall, InlineTrace, TransactionTrace};

/// Renders one transaction trace into the result document.
pub fn render(
    trace: &TransactionTrace,
    store: &dyn StateStore,
    registry: &NativeRegistry,
) -> Value {
    let mut doc = Map::new();
    doc.insert("trx_id".into(), json!(trace.trx_id.to_string()));
    doc.insert("elapsed".into(), json!(trace.elapsed.as_micros() as u64));
    if !trace.traces.is_empty() {
        let traces: Vec<Value> = trace
            .traces
            .iter()
            .map(|t| render_inline(t, store, registry))
            .collect();
        doc.insert("traces".into(), Value::Array(traces));
    }
    Value::Object(doc)
}

fn render_inline(trace: &InlineTrace, store: &dyn StateStore, registry: &NativeRegistry) -> Value {
    let mut doc = Map::new();
    doc.insert("trx_id".into(), json!(trace.trx_id.to_string()));
    doc.insert("receiver".into(), json!(trace.receiver.to_string()));
    doc.insert("trx".into(), render_call(&trace.call, store, registry));
    doc.insert("console".into(), json!(trace.console));
    if !trace.inline_traces.is_empty() {
        let children: Vec<Value> = trace
            .inline_traces
            .iter()
            .map(|t| render_inline(t, store, registry))
            .collect();
        doc.insert("inline_traces".into(), Value::Array(children));
    }
    Value::Object(doc)
}

fn render_call(call: &InlineCall, store: &dyn StateStore, registry: &NativeRegistry) -> Value {
    let authorization: Vec<Value> = call.authorization.iter().map(render_authorization).collect();
    json!({
        "contract": call.contract.to_string(),
        "action": call.action.to_string(),
        "authorization": authorization,
        "data": render_data(call, store, registry),
    })
}

fn render_authorization(auth: &Authorization) -> Value {
    json!({
        "account": auth.account.to_string(),
        "permission": auth.permission.to_string(),
    })
}

/// Decode-or-hex policy for call arguments.
///
/// The `setcode` payload is never decoded (it embeds whole code/abi blobs);
/// everything else is decoded when an interface is on hand.
fn render_data(call: &InlineCall, store: &dyn StateStore, registry: &NativeRegistry) -> Value {
    let setcode = Name::from_str(SETCODE_ACTION).expect("setcode is a valid name");
    if call.action != setcode && !call.data.is_empty() {
        if let Some(decoded) = lookup_abi(call.contract, store, registry)
            .and_then(|blob| AbiDef::parse(&blob))
            .and_then(|abi| abi.try_decode(&call.action.to_string(), &call.data))
        {
            return decoded;
        }
    }
    json!(hex::encode(&call.data))
}

/// Interface description for a contract: bundled for built-ins, the deployed
/// blob otherwise. `None` when the contract or its record is absent.
fn lookup_abi(
    contract: Name,
    store: &dyn StateStore,
    registry: &NativeRegistry,
) -> Option<Vec<u8>> {
    if let Some(abi) = registry.abi(contract) {
        return Some(abi.to_vec());
    }
    let account = store.get_account_by_nickname(&contract.to_string())?;
    let record = store.get_contract(account.regid)?;
    if record.abi.is_empty() {
        None
    } else {
        Some(record.abi)
    }
}
