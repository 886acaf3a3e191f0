use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// CompileState
/// Ephemeral, in-memory compile counters.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct CompileState {
    pub totals: CompileTotals,
    pub resources: BTreeMap<String, ResourceCounters>,
    pub kinds: BTreeMap<String, u64>,
    pub errors: BTreeMap<String, u64>,
}

///
/// CompileTotals
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CompileTotals {
    pub started: u64,
    pub finished: u64,
    pub failed: u64,
}

///
/// ResourceCounters
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResourceCounters {
    pub started: u64,
    pub finished: u64,
    pub failed: u64,
}

///
/// CompileReport
///
/// Point-in-time view of the compile counters. `kinds` counts successful
/// compiles per aggregate kind; `errors` counts failures per error label.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct CompileReport {
    pub totals: CompileTotals,
    pub resources: BTreeMap<String, ResourceCounters>,
    pub kinds: BTreeMap<String, u64>,
    pub errors: BTreeMap<String, u64>,
}

thread_local! {
    static COMPILE_STATE: RefCell<CompileState> = RefCell::new(CompileState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&CompileState) -> R) -> R {
    COMPILE_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut CompileState) -> R) -> R {
    COMPILE_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = CompileState::default());
}

/// Build a report from the in-memory counters.
#[must_use]
pub(crate) fn report() -> CompileReport {
    with_state(|m| CompileReport {
        totals: m.totals,
        resources: m.resources.clone(),
        kinds: m.kinds.clone(),
        errors: m.errors.clone(),
    })
}
