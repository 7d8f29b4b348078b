//! # Session state — connection lifecycle and displayed amounts
//!
//! The interactive surface is modeled as an explicit state machine over
//! immutable snapshots instead of ad hoc mutable flags. Two invariants live
//! here:
//!
//! - Mutations are serialized: a second submission cannot start while one is
//!   outstanding (`SubmissionStarted` is illegal in `SubmittingTransaction`).
//! - Displayed quotes survive a failed submission (state did not change) and
//!   are invalidated only by a successful one.
//!
//! Quote recomputation is last-write-wins: every input change opens a
//! sequenced request, and only the newest in-flight request may land its
//! result. A stale response arriving late is dropped, never displayed.

use crate::{AccountBalances, ReserveSnapshot, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingConnection,
    Connected,
    SubmittingTransaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ConnectRequested,
    ConnectionEstablished,
    ConnectionFailed,
    SubmissionStarted,
    SubmissionSettled,
}

/// An event fired in a state with no defined transition for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub state: SessionState,
    pub event: SessionEvent,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event {:?} is not valid in state {:?}", self.event, self.state)
    }
}

impl std::error::Error for TransitionError {}

impl SessionState {
    /// Apply an event, producing the successor state or rejecting loudly.
    pub fn apply(self, event: SessionEvent) -> Result<SessionState, TransitionError> {
        use SessionEvent::*;
        use SessionState::*;
        match (self, event) {
            (Idle, ConnectRequested) => Ok(AwaitingConnection),
            (AwaitingConnection, ConnectionEstablished) => Ok(Connected),
            (AwaitingConnection, ConnectionFailed) => Ok(Idle),
            (Connected, SubmissionStarted) => Ok(SubmittingTransaction),
            (SubmittingTransaction, SubmissionSettled) => Ok(Connected),
            (state, event) => Err(TransitionError { state, event }),
        }
    }
}

/// Everything the surface displays, as one immutable snapshot. `None` means
/// "not loaded" or "no quote requested", never a failed read collapsed to
/// zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionView {
    pub reserves: Option<ReserveSnapshot>,
    pub balances: Option<AccountBalances>,
    pub deposit_quote: Option<U256>,
    pub withdrawal_quote: Option<(U256, U256)>,
    pub swap_quote: Option<U256>,
}

impl SessionView {
    pub fn with_reserves(self, reserves: ReserveSnapshot) -> Self {
        Self {
            reserves: Some(reserves),
            ..self
        }
    }

    pub fn with_balances(self, balances: AccountBalances) -> Self {
        Self {
            balances: Some(balances),
            ..self
        }
    }

    pub fn with_deposit_quote(self, quote: U256) -> Self {
        Self {
            deposit_quote: Some(quote),
            ..self
        }
    }

    pub fn with_withdrawal_quote(self, native_out: U256, token_out: U256) -> Self {
        Self {
            withdrawal_quote: Some((native_out, token_out)),
            ..self
        }
    }

    pub fn with_swap_quote(self, quote: U256) -> Self {
        Self {
            swap_quote: Some(quote),
            ..self
        }
    }

    /// A confirmed submission changed ledger state, so every derived value is
    /// stale: quotes and cached reads are dropped for re-query. A failed
    /// submission changed nothing; the view survives untouched for retry.
    pub fn after_submission(self, confirmed: bool) -> Self {
        if confirmed {
            SessionView::default()
        } else {
            self
        }
    }
}

/// Sequencer for in-flight quote requests. `begin` stamps each request;
/// `try_land` accepts a result only if no newer request has been opened since.
#[derive(Debug, Default)]
pub struct QuoteSequencer {
    issued: u64,
    landed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTicket(u64);

impl QuoteSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> QuoteTicket {
        self.issued += 1;
        QuoteTicket(self.issued)
    }

    /// True if this ticket's result may be displayed.
    pub fn try_land(&mut self, ticket: QuoteTicket) -> bool {
        if ticket.0 == self.issued && ticket.0 > self.landed {
            self.landed = ticket.0;
            true
        } else {
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────
