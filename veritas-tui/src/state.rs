//! UI lifecycle as an explicit state record and a single transition function.
//!
//! `Idle | Succeeded | Failed` accept a non-blank claim and move to
//! `Pending`, which ignores further submissions until its own response
//! arrives. Responses are matched by token; anything else is stale and
//! dropped.
use veritas_common::AnalysisResult;

/// The only failure text users ever see; details go to the log.
pub const FAILURE_MESSAGE: &str = "Failed to verify the claim. Please check your internet connection or try a different query.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending {
        token: u64,
        claim: String,
    },
    Succeeded(AnalysisResult),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    phase: Phase,
    last_token: u64,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The user asked to check this claim.
    Submit(String),
    /// The request tagged `token` finished. Error text is for logs only.
    Resolved {
        token: u64,
        outcome: Result<AnalysisResult, String>,
    },
    /// Go back to the idle screen; ignored while a request is pending.
    Reset,
}

/// Work the caller must start after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Dispatch { token: u64, claim: String },
}

impl UiState {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    pub fn pending_token(&self) -> Option<u64> {
        match self.phase {
            Phase::Pending { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Whether submitting `claim` right now would start a request.
    pub fn can_submit(&self, claim: &str) -> bool {
        !self.is_pending() && !claim.trim().is_empty()
    }
}

/// Apply `event` to `state`.
///
/// ```
/// use veritas_tui::state::{transition, Effect, Phase, UiEvent, UiState};
///
/// let (state, effect) = transition(UiState::default(), UiEvent::Submit("Is the sky blue?".into()));
/// assert!(state.is_pending());
/// assert_eq!(effect, Some(Effect::Dispatch { token: 1, claim: "Is the sky blue?".into() }));
///
/// let (state, effect) = transition(state, UiEvent::Resolved { token: 1, outcome: Err("timeout".into()) });
/// assert!(matches!(state.phase(), Phase::Failed(_)));
/// assert_eq!(effect, None);
/// ```
pub fn transition(state: UiState, event: UiEvent) -> (UiState, Option<Effect>) {
    match event {
        UiEvent::Submit(claim) => {
            if !state.can_submit(&claim) {
                return (state, None);
            }
            let token = state.last_token + 1;
            let next = UiState {
                phase: Phase::Pending {
                    token,
                    claim: claim.clone(),
                },
                last_token: token,
            };
            (next, Some(Effect::Dispatch { token, claim }))
        }
        UiEvent::Resolved { token, outcome } => {
            if state.pending_token() != Some(token) {
                return (state, None);
            }
            let phase = match outcome {
                Ok(result) => Phase::Succeeded(result),
                Err(_) => Phase::Failed(FAILURE_MESSAGE.to_string()),
            };
            (UiState { phase, ..state }, None)
        }
        UiEvent::Reset => {
            if state.is_pending() {
                return (state, None);
            }
            (
                UiState {
                    phase: Phase::Idle,
                    ..state
                },
                None,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_common::Verdict;

    fn submit(state: UiState, claim: &str) -> (UiState, Option<Effect>) {
        transition(state, UiEvent::Submit(claim.to_string()))
    }

    fn resolve(state: UiState, token: u64, outcome: Result<AnalysisResult, String>) -> UiState {
        let (next, effect) = transition(state, UiEvent::Resolved { token, outcome });
        assert_eq!(effect, None);
        next
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            verdict: Verdict::Real,
            confidence_score: 88,
            explanation: "Yes.".into(),
            sources: vec![],
        }
    }

    #[test]
    fn submit_from_idle_dispatches_claim_verbatim() {
        let (state, effect) = submit(UiState::default(), "  padded claim ");
        assert_eq!(
            state.phase(),
            &Phase::Pending {
                token: 1,
                claim: "  padded claim ".into()
            }
        );
        assert_eq!(
            effect,
            Some(Effect::Dispatch {
                token: 1,
                claim: "  padded claim ".into()
            })
        );
    }

    #[test]
    fn blank_submissions_are_ignored() {
        for claim in ["", "   ", "\n\t"] {
            let (state, effect) = submit(UiState::default(), claim);
            assert_eq!(state, UiState::default());
            assert_eq!(effect, None);
        }
    }

    #[test]
    fn submit_while_pending_is_ignored() {
        let (pending, _) = submit(UiState::default(), "first");
        let (state, effect) = submit(pending.clone(), "second");
        assert_eq!(state, pending);
        assert_eq!(effect, None);
    }

    #[test]
    fn success_replaces_pending_with_result() {
        let (pending, _) = submit(UiState::default(), "claim");
        let state = resolve(pending, 1, Ok(sample_result()));
        assert_eq!(state.phase(), &Phase::Succeeded(sample_result()));
        assert!(!state.is_pending());
    }

    #[test]
    fn any_failure_shows_the_fixed_message() {
        for detail in ["dns lookup failed", "Invalid API key", ""] {
            let (pending, _) = submit(UiState::default(), "claim");
            let state = resolve(pending, 1, Err(detail.to_string()));
            assert_eq!(state.phase(), &Phase::Failed(FAILURE_MESSAGE.to_string()));
        }
    }

    #[test]
    fn new_submit_clears_previous_result_and_error() {
        let (pending, _) = submit(UiState::default(), "one");
        let done = resolve(pending, 1, Ok(sample_result()));

        let (pending, effect) = submit(done, "two");
        assert_eq!(
            pending.phase(),
            &Phase::Pending {
                token: 2,
                claim: "two".into()
            }
        );
        assert!(effect.is_some());

        let failed = resolve(pending, 2, Err("x".into()));
        let (pending, _) = submit(failed, "three");
        assert_eq!(pending.pending_token(), Some(3));
    }

    #[test]
    fn tokens_increase_monotonically() {
        let mut state = UiState::default();
        for expected in 1..=4 {
            let (pending, effect) = submit(state, "claim");
            assert_eq!(
                effect,
                Some(Effect::Dispatch {
                    token: expected,
                    claim: "claim".into()
                })
            );
            state = resolve(pending, expected, Err("x".into()));
        }
    }

    #[test]
    fn stale_response_is_ignored() {
        let (pending, _) = submit(UiState::default(), "one");
        let failed = resolve(pending, 1, Err("x".into()));
        let (pending, _) = submit(failed, "two");

        // A late reply for request 1 must not touch request 2.
        let state = resolve(pending.clone(), 1, Ok(sample_result()));
        assert_eq!(state, pending);

        let state = resolve(state, 2, Ok(sample_result()));
        assert!(matches!(state.phase(), Phase::Succeeded(_)));
    }

    #[test]
    fn response_without_pending_request_is_ignored() {
        let state = resolve(UiState::default(), 1, Ok(sample_result()));
        assert_eq!(state, UiState::default());

        let (pending, _) = submit(UiState::default(), "one");
        let done = resolve(pending, 1, Ok(sample_result()));
        let again = resolve(done.clone(), 1, Err("duplicate".into()));
        assert_eq!(again, done);
    }

    #[test]
    fn reset_returns_to_idle_except_while_pending() {
        let (pending, _) = submit(UiState::default(), "one");
        let (still_pending, effect) = transition(pending.clone(), UiEvent::Reset);
        assert_eq!(still_pending, pending);
        assert_eq!(effect, None);

        let done = resolve(pending, 1, Ok(sample_result()));
        let (idle, _) = transition(done, UiEvent::Reset);
        assert_eq!(idle.phase(), &Phase::Idle);

        // Tokens keep counting after a reset.
        let (next, _) = submit(idle, "two");
        assert_eq!(next.pending_token(), Some(2));
    }
}
