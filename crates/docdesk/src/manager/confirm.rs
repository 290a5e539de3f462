//! Confirmation gate for destructive actions.

/// Asks the user to approve a destructive action. Blocks until answered.
pub trait ConfirmGate: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything, for non-interactive use (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmGate for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

impl<F> ConfirmGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
