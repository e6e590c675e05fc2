//! # Connection Readiness Gate
//!
//! A latch every public operation awaits before touching the store. The
//! first awaiter establishes the store identity; concurrent awaiters wait on
//! the same attempt. The latch resolves exactly once and resolves even when
//! sign-in fails, so unauthenticated reads keep working through an auth
//! outage. Later awaits return immediately and never retry sign-in.

pub mod provider;

use std::sync::Arc;

use tokio::sync::OnceCell;

pub use provider::{AnonymousAuth, AuthProvider, NoAuth, ServiceAuth};

use crate::observability::{log_event, Event, MetricsRegistry};

/// Outcome recorded by the latch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Store identity established
    Authenticated(String),
    /// Sign-in failed; operating without an identity
    Unauthenticated,
}

impl GateState {
    pub fn identity(&self) -> Option<&str> {
        match self {
            GateState::Authenticated(id) => Some(id),
            GateState::Unauthenticated => None,
        }
    }
}

/// Single-initialization readiness latch
pub struct ReadinessGate {
    provider: Arc<dyn AuthProvider>,
    state: OnceCell<GateState>,
    metrics: Arc<MetricsRegistry>,
}

impl ReadinessGate {
    pub fn new(provider: Arc<dyn AuthProvider>, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            provider,
            state: OnceCell::new(),
            metrics,
        }
    }

    /// Wait until the store may be used
    pub async fn ready(&self) -> &GateState {
        self.state.get_or_init(|| self.establish()).await
    }

    /// Latch state if already resolved
    pub fn state(&self) -> Option<&GateState> {
        self.state.get()
    }

    async fn establish(&self) -> GateState {
        if let Some(identity) = self.provider.current_identity() {
            log_event(Event::GateReady, &[("identity", identity.as_str()), ("source", "existing")]);
            return GateState::Authenticated(identity);
        }

        match self.provider.sign_in().await {
            Ok(identity) => {
                log_event(Event::GateReady, &[("identity", identity.as_str()), ("source", "sign_in")]);
                GateState::Authenticated(identity)
            }
            Err(e) => {
                self.metrics.increment_gate_auth_failures();
                let reason = e.to_string();
                log_event(Event::GateAuthFailed, &[("error", reason.as_str())]);
                GateState::Unauthenticated
            }
        }
    }
}
