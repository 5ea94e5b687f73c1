//! Sign-up flow: `Editing -> Submitting -> Submitted`, then back to `Editing`.
//!
//! Nothing is persisted. A valid submission waits a simulated delay, shows the
//! confirmation, and resets on its own once the reset interval has elapsed.

use std::time::{Duration, Instant};

use super::{FieldErrors, SignupForm};

/// Simulated account-creation latency.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1500);

/// How long the confirmation stays up before the form resets.
pub const DEFAULT_RESET_AFTER: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupPhase {
    Editing,
    Submitting,
    Submitted { at: Instant },
}

/// Outcome of a submit attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed; wait `delay`, then call [`SignupFlow::finish`].
    Accepted { delay: Duration },
    /// Validation failed; the errors are kept on the flow.
    Rejected,
    /// A submission is already in progress or being confirmed.
    Busy,
}

#[derive(Debug)]
pub struct SignupFlow {
    phase: SignupPhase,
    draft: SignupForm,
    errors: FieldErrors,
    submit_delay: Duration,
    reset_after: Duration,
}

impl Default for SignupFlow {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY, DEFAULT_RESET_AFTER)
    }
}

impl SignupFlow {
    pub fn new(submit_delay: Duration, reset_after: Duration) -> Self {
        Self {
            phase: SignupPhase::Editing,
            draft: SignupForm::default(),
            errors: FieldErrors::new(),
            submit_delay,
            reset_after,
        }
    }

    pub fn reset_after(&self) -> Duration {
        self.reset_after
    }

    pub fn draft(&self) -> &SignupForm {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Current phase as of `now`, applying the timed reset.
    pub fn observe(&mut self, now: Instant) -> SignupPhase {
        if let SignupPhase::Submitted { at } = self.phase {
            if now.saturating_duration_since(at) >= self.reset_after {
                tracing::debug!("Sign-up confirmation expired, resetting form");
                self.phase = SignupPhase::Editing;
                self.draft = SignupForm::default();
                self.errors.clear();
            }
        }
        self.phase
    }

    /// Validate and, when valid, move to `Submitting`.
    pub fn submit(&mut self, form: SignupForm, now: Instant) -> SubmitOutcome {
        if self.observe(now) != SignupPhase::Editing {
            return SubmitOutcome::Busy;
        }

        self.errors = form.validate();
        self.draft = form;

        if !self.errors.is_empty() {
            return SubmitOutcome::Rejected;
        }

        self.phase = SignupPhase::Submitting;
        SubmitOutcome::Accepted {
            delay: self.submit_delay,
        }
    }

    /// Complete a submission started by [`SignupFlow::submit`].
    pub fn finish(&mut self, now: Instant) {
        if self.phase == SignupPhase::Submitting {
            tracing::info!(name = %self.draft.name.trim(), "Sign-up form submitted");
            self.phase = SignupPhase::Submitted { at: now };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SignupForm {
        SignupForm {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            password: "Password1".to_string(),
            confirm_password: "Password1".to_string(),
        }
    }

    #[test]
    fn test_invalid_submission_stays_editing() {
        let mut flow = SignupFlow::default();
        let now = Instant::now();

        let outcome = flow.submit(SignupForm::default(), now);
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(flow.observe(now), SignupPhase::Editing);
        assert_eq!(flow.errors()["name"], "Name is required");
    }

    #[test]
    fn test_full_cycle_with_auto_reset() {
        let mut flow = SignupFlow::new(Duration::from_millis(1500), Duration::from_secs(2));
        let start = Instant::now();

        assert_eq!(
            flow.submit(valid_form(), start),
            SubmitOutcome::Accepted {
                delay: Duration::from_millis(1500)
            }
        );
        assert_eq!(flow.observe(start), SignupPhase::Submitting);
        assert_eq!(flow.submit(valid_form(), start), SubmitOutcome::Busy);

        let done = start + Duration::from_millis(1500);
        flow.finish(done);
        assert_eq!(flow.observe(done), SignupPhase::Submitted { at: done });
        assert_eq!(flow.draft().name, "Jo");

        // Still confirming just before the reset interval
        let almost = done + Duration::from_millis(1999);
        assert!(matches!(flow.observe(almost), SignupPhase::Submitted { .. }));

        let later = done + Duration::from_secs(2);
        assert_eq!(flow.observe(later), SignupPhase::Editing);
        assert!(flow.draft().name.is_empty());
        assert!(flow.errors().is_empty());
    }

    #[test]
    fn test_finish_without_submit_is_ignored() {
        let mut flow = SignupFlow::default();
        flow.finish(Instant::now());
        assert_eq!(flow.observe(Instant::now()), SignupPhase::Editing);
    }
}
