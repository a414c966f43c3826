//! Validation and execution of contract transactions
//!
//! This module is the consensus-critical state machine: pre-flight checks,
//! fuel accounting, recursive dispatch of inline calls into the VM, and
//! publication of the rendered trace as the transaction's result. Check
//! order, fuel arithmetic, rejection codes and trace structure must match on
//! every node; any divergence here forks the chain.
//!
//! `check` is strictly read-only and fail-fast: the first failing check wins
//! and is reported through the validation-state sink with a fixed penalty.
//! `execute` runs at most once after a successful `check`, mutates state only
//! through the VM collaborator, and either completes fully or fails as a
//! whole (state rollback belongs to the store underneath the VM).

use std::str::FromStr;

use tracing::{debug, error};

use crate::errors::TxError;
use crate::name::Name;
use crate::render;
use crate::timer::BillingTimer;
use crate::traits::{ExecContext, StateStore, VmInvocation};
use crate::types::{InlineTrace, KeyId, Transaction, TransactionTrace};

/// Maximum nesting depth for inline dispatch. Exceeding it aborts the whole
/// transaction; it is an execution-time failure, not a pre-flight check,
/// because only execution discovers what a contract spawns.
pub const MAX_INLINE_CALL_DEPTH: u32 = 4;

/// DoS penalty score attached to every rejection.
const REJECT_PENALTY: u32 = 100;

impl Transaction {
    /// Pre-flight validation against persisted state. Read-only.
    ///
    /// Check order (first failure wins):
    /// 1. at least one inline call
    /// 2. every non-built-in target has a registered account and a complete
    ///    deployed contract
    /// 3. declared fee exceeds the computed fuel cost
    /// 4. sender account exists and has a signing key
    /// 5. signature verifies against that key
    /// 6. every authorization names the signer
    ///
    /// Failures are reported through `ctx.state` before returning.
    pub fn check(&self, ctx: &mut ExecContext<'_>) -> Result<(), TxError> {
        match self.check_inner(ctx) {
            Ok(()) => Ok(()),
            Err(e) => {
                ctx.state.reject(REJECT_PENALTY, e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    fn check_inner(&self, ctx: &mut ExecContext<'_>) -> Result<(), TxError> {
        if self.calls.is_empty() {
            return Err(TxError::InvalidStructure);
        }

        self.contracts_are_valid(ctx)?;

        let fuel = self.compute_fuel(ctx.height, ctx.fuel_rate, ctx.schedule)?;
        if self.fee <= fuel {
            return Err(TxError::InsufficientFee { fee: self.fee, fuel });
        }

        let account = ctx
            .store
            .get_account_by_nickname(&self.sender)
            .ok_or_else(|| TxError::AccountNotFound(self.sender.clone()))?;
        let pubkey = account
            .pubkey
            .as_ref()
            .ok_or_else(|| TxError::AccountUnregistered(self.sender.clone()))?;
        if !ctx.signatures.verify(self, pubkey) {
            return Err(TxError::SignatureInvalid);
        }

        let signer = Name::from_str(&account.nickname)
            .map_err(|_| TxError::AccountNotFound(self.sender.clone()))?;
        self.authorizations_are_valid(signer)?;

        Ok(())
    }

    /// Step 2 of `check`: every non-built-in target must resolve to a
    /// complete deployed contract.
    fn contracts_are_valid(&self, ctx: &ExecContext<'_>) -> Result<(), TxError> {
        for call in &self.calls {
            if ctx.registry.contains(call.contract) {
                continue;
            }
            ctx.registry.resolve(call.contract, ctx.store)?;
        }
        Ok(())
    }

    /// Step 6 of `check`: single-signer model, so each declared authorization
    /// must name the transaction signer.
    fn authorizations_are_valid(&self, signer: Name) -> Result<(), TxError> {
        for call in &self.calls {
            for auth in &call.authorization {
                if auth.account != signer {
                    return Err(TxError::AuthorizationMismatch(auth.account.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Executes the transaction, producing and publishing its trace.
    ///
    /// Runs each top-level inline call in declaration order, recursively
    /// dispatching whatever the contracts spawn. On success the rendered
    /// trace document is stored through `ctx.state`; on failure the error is
    /// reported there and nothing is stored.
    pub fn execute(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), TxError> {
        match self.execute_inner(ctx) {
            Ok(()) => Ok(()),
            Err(e) => {
                ctx.state.reject(REJECT_PENALTY, e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    fn execute_inner(&mut self, ctx: &mut ExecContext<'_>) -> Result<(), TxError> {
        let mut timer = BillingTimer::start();
        let trx_id = self.id();

        let mut traces = Vec::with_capacity(self.calls.len());
        for call in &self.calls {
            let mut trace = InlineTrace::new(trx_id, call.contract, call.clone());
            dispatch_inline(ctx, &trx_id, &mut trace, 0)?;
            traces.push(trace);
        }

        // Book-keeping below (rendering, result publication) is not billed.
        timer.pause();
        let trace = TransactionTrace {
            trx_id,
            elapsed: timer.elapsed(),
            traces,
        };

        let doc = render::render(&trace, ctx.store, ctx.registry);
        let result = serde_json::to_string(&doc).map_err(|e| TxError::ExecutionFailure {
            vm_code: 0,
            message: format!("trace serialization failed: {e}"),
        })?;
        debug!(trx_id = %trx_id, elapsed_us = trace.elapsed.as_micros() as u64, "executed contract transaction");
        ctx.state.set_return(result);
        Ok(())
    }

    /// Computed fuel cost: `max(run_steps / 100 * fuel_rate, min_fee)`.
    ///
    /// Integer arithmetic, not the historical float form, so the result is
    /// identical on every node. A failed schedule lookup is fatal: the node
    /// cannot price transactions, which is a configuration problem rather
    /// than a rejection.
    pub fn compute_fuel(
        &self,
        height: u64,
        fuel_rate: u64,
        schedule: &dyn crate::traits::FeeSchedule,
    ) -> Result<u64, TxError> {
        let min_fee = match schedule.min_fee(self.tx_type, height, &self.fee_symbol) {
            Some(fee) => fee,
            None => {
                error!(fee_symbol = %self.fee_symbol, height, "min-fee schedule lookup failed");
                return Err(TxError::ScheduleLookupFailure(self.fee_symbol.clone()));
            }
        };
        let stepped = self.run_steps.saturating_mul(fuel_rate) / 100;
        Ok(stepped.max(min_fee))
    }

    /// Signing key of the sender, for mempool conflict analysis.
    ///
    /// `None` when the account lookup fails; not consensus-critical.
    pub fn involved_keys(&self, store: &dyn StateStore) -> Option<KeyId> {
        store.get_key_id(&self.sender)
    }

    /// One-line human-readable summary.
    ///
    /// Summarizes by the first inline call only, even for multi-call
    /// transactions. Known limitation kept for compatibility with existing
    /// tooling that parses this line.
    pub fn describe(&self, store: &dyn StateStore) -> String {
        let Some(call) = self.calls.first() else {
            return String::new();
        };
        let Some(sender) = store.get_account_by_nickname(&self.sender) else {
            return String::new();
        };
        format!(
            "txType=WasmContract, hash={}, ver={}, sender={}, fee={}, contract={}, action={}, arguments={}, valid_height={}",
            self.id(),
            self.version,
            sender.nickname,
            self.fee,
            call.contract,
            call.action,
            hex::encode(&call.data),
            self.valid_height,
        )
    }

    /// JSON summary for RPC listings.
    ///
    /// Like [`describe`](Transaction::describe), shows only the first inline
    /// call.
    pub fn to_json(&self, store: &dyn StateStore) -> serde_json::Value {
        let Some(call) = self.calls.first() else {
            return serde_json::json!({});
        };
        let sender = store
            .get_account_by_nickname(&self.sender)
            .map(|a| a.nickname)
            .unwrap_or_default();
        serde_json::json!({
            "txtype": "WasmContract",
            "hash": self.id().to_string(),
            "ver": self.version,
            "sender": sender,
            "fee": self.fee,
            "fee_symbol": self.fee_symbol,
            "valid_height": self.valid_height,
            "contract": call.contract.to_string(),
            "action": call.action.to_string(),
            "arguments": hex::encode(&call.data),
        })
    }
}

/// Recursive dispatch of one inline call.
///
/// Invokes the VM for the call in `trace`, appends its console output, then
/// dispatches every spawned call with `depth + 1`, each growing exactly one
/// child trace in spawn order. The depth bound is checked before invoking the
/// VM, so a runaway spawn chain fails cleanly instead of exhausting the call
/// stack.
fn dispatch_inline(
    ctx: &mut ExecContext<'_>,
    trx_id: &crate::types::TxHash,
    trace: &mut InlineTrace,
    depth: u32,
) -> Result<(), TxError> {
    if depth > MAX_INLINE_CALL_DEPTH {
        return Err(TxError::RecursionLimitExceeded {
            depth,
            max: MAX_INLINE_CALL_DEPTH,
        });
    }

    let invocation = VmInvocation {
        trx_id: *trx_id,
        receiver: trace.receiver,
        call: &trace.call,
        depth,
    };
    let output = ctx.vm.execute(&invocation)?;
    trace.console.push_str(&output.console);

    for spawned in output.spawned {
        let mut child = InlineTrace::new(*trx_id, spawned.contract, spawned);
        dispatch_inline(ctx, trx_id, &mut child, depth + 1)?;
        trace.inline_traces.push(child);
    }
    Ok(())
}
