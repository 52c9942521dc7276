use serde::Deserialize;
use tracing::debug;

/// Asks the user a yes/no question before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answer given in the browser's `hx-confirm` dialog, forwarded as the
/// `confirmed` form field. A missing field counts as declined.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FormConfirmation {
    #[serde(default)]
    pub confirmed: bool,
}
impl Confirm for FormConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        debug!(prompt, confirmed = self.confirmed, "confirmation");
        self.confirmed
    }
}

/// Always says yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;
impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Always says no.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecline;
impl Confirm for AutoDecline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
