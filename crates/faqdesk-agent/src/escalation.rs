// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator handoff state machine.
//!
//! A user with no entry has no open escalation. Pressing the operator button
//! opens one in [`SessionState::Requested`]; relaying the user's next message
//! to the operator chat moves it to [`SessionState::Forwarded`] and records
//! which operator-chat message points back at the user. An operator reply to
//! that message closes the session. Sessions never expire.
//!
//! Both maps live behind one mutex so a session and its back-reference are
//! always created and removed together. The lock is never held across an
//! `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use faqdesk_core::{MessageId, UserId};
use thiserror::Error;

/// State of an open escalation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// The user asked for an operator; nothing has been relayed yet.
    Requested,
    /// The user's follow-up was relayed as this operator-chat message.
    Forwarded(MessageId),
}

/// Escalation protocol violations. None of these mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EscalationError {
    #[error("an escalation is already open for this user")]
    AlreadyPending,
    #[error("no escalation was requested for this user")]
    NotRequested,
    #[error("the user's request was already relayed to operators")]
    AlreadyForwarded,
    #[error("no open escalation is bound to this operator-chat message")]
    NotFound,
}

#[derive(Debug, Default)]
struct TrackerState {
    sessions: HashMap<UserId, SessionState>,
    backrefs: HashMap<MessageId, UserId>,
}

/// Shared escalation state for all users.
#[derive(Debug, Default)]
pub struct EscalationTracker {
    state: Mutex<TrackerState>,
}

impl EscalationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        // Every critical section leaves both maps consistent, so a poisoned
        // lock still guards valid state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open an escalation for `user`.
    pub fn request_escalation(&self, user: &UserId) -> Result<(), EscalationError> {
        let mut state = self.lock();
        if state.sessions.contains_key(user) {
            return Err(EscalationError::AlreadyPending);
        }
        state.sessions.insert(user.clone(), SessionState::Requested);
        Ok(())
    }

    /// Record that the user's follow-up was relayed as `admin_message`.
    pub fn record_forwarded(
        &self,
        user: &UserId,
        admin_message: &MessageId,
    ) -> Result<(), EscalationError> {
        let mut state = self.lock();
        match state.sessions.get(user) {
            None => Err(EscalationError::NotRequested),
            Some(SessionState::Forwarded(_)) => Err(EscalationError::AlreadyForwarded),
            Some(SessionState::Requested) => {
                state
                    .sessions
                    .insert(user.clone(), SessionState::Forwarded(admin_message.clone()));
                state.backrefs.insert(admin_message.clone(), user.clone());
                Ok(())
            }
        }
    }

    /// Close the escalation bound to `admin_message` and return its user.
    ///
    /// This is the only way a session is removed.
    pub fn resolve_by_admin_message(
        &self,
        admin_message: &MessageId,
    ) -> Result<UserId, EscalationError> {
        let mut state = self.lock();
        let user = state
            .backrefs
            .remove(admin_message)
            .ok_or(EscalationError::NotFound)?;
        state.sessions.remove(&user);
        Ok(user)
    }

    pub fn has_session(&self, user: &UserId) -> bool {
        self.lock().sessions.contains_key(user)
    }

    pub fn session_state(&self, user: &UserId) -> Option<SessionState> {
        self.lock().sessions.get(user).cloned()
    }

    /// The user an operator-chat message points back to, without closing anything.
    pub fn user_for_admin_message(&self, admin_message: &MessageId) -> Option<UserId> {
        self.lock().backrefs.get(admin_message).cloned()
    }

    /// Number of open escalations.
    pub fn pending_count(&self) -> usize {
        self.lock().sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn user(id: &str) -> UserId {
        UserId(id.to_string())
    }

    fn msg(id: &str) -> MessageId {
        MessageId(id.to_string())
    }

    #[test]
    fn full_lifecycle() {
        let tracker = EscalationTracker::new();
        let u = user("100");

        assert!(!tracker.has_session(&u));
        tracker.request_escalation(&u).unwrap();
        assert_eq!(tracker.session_state(&u), Some(SessionState::Requested));

        tracker.record_forwarded(&u, &msg("555")).unwrap();
        assert_eq!(
            tracker.session_state(&u),
            Some(SessionState::Forwarded(msg("555")))
        );
        assert_eq!(tracker.user_for_admin_message(&msg("555")), Some(u.clone()));

        assert_eq!(tracker.resolve_by_admin_message(&msg("555")), Ok(u.clone()));
        assert!(!tracker.has_session(&u));
        assert_eq!(tracker.pending_count(), 0);
    }

    #[test]
    fn second_request_is_already_pending() {
        let tracker = EscalationTracker::new();
        let u = user("1");
        tracker.request_escalation(&u).unwrap();
        assert_eq!(
            tracker.request_escalation(&u),
            Err(EscalationError::AlreadyPending)
        );
        tracker.record_forwarded(&u, &msg("9")).unwrap();
        assert_eq!(
            tracker.request_escalation(&u),
            Err(EscalationError::AlreadyPending)
        );
    }

    #[test]
    fn forward_requires_requested_state() {
        let tracker = EscalationTracker::new();
        let u = user("1");
        assert_eq!(
            tracker.record_forwarded(&u, &msg("9")),
            Err(EscalationError::NotRequested)
        );

        tracker.request_escalation(&u).unwrap();
        tracker.record_forwarded(&u, &msg("9")).unwrap();
        assert_eq!(
            tracker.record_forwarded(&u, &msg("10")),
            Err(EscalationError::AlreadyForwarded)
        );
        // the rejected call left no back-reference behind
        assert_eq!(tracker.user_for_admin_message(&msg("10")), None);
        assert_eq!(
            tracker.session_state(&u),
            Some(SessionState::Forwarded(msg("9")))
        );
    }

    #[test]
    fn resolution_removes_session_and_backref_together() {
        let tracker = EscalationTracker::new();
        let u = user("7");
        tracker.request_escalation(&u).unwrap();
        tracker.record_forwarded(&u, &msg("70")).unwrap();

        tracker.resolve_by_admin_message(&msg("70")).unwrap();
        assert!(!tracker.has_session(&u));
        assert_eq!(
            tracker.resolve_by_admin_message(&msg("70")),
            Err(EscalationError::NotFound)
        );
        // the user can escalate again
        tracker.request_escalation(&u).unwrap();
    }

    #[test]
    fn unknown_admin_message_is_not_found() {
        let tracker = EscalationTracker::new();
        tracker.request_escalation(&user("1")).unwrap();
        assert_eq!(
            tracker.resolve_by_admin_message(&msg("404")),
            Err(EscalationError::NotFound)
        );
        assert!(tracker.has_session(&user("1")));
    }

    #[test]
    fn sessions_are_independent_per_user() {
        let tracker = EscalationTracker::new();
        tracker.request_escalation(&user("a")).unwrap();
        tracker.request_escalation(&user("b")).unwrap();
        tracker.record_forwarded(&user("a"), &msg("1")).unwrap();
        tracker.record_forwarded(&user("b"), &msg("2")).unwrap();
        assert_eq!(tracker.pending_count(), 2);

        assert_eq!(tracker.resolve_by_admin_message(&msg("2")), Ok(user("b")));
        assert!(tracker.has_session(&user("a")));
        assert_eq!(tracker.pending_count(), 1);
    }

    #[test]
    fn concurrent_requests_open_exactly_one_session() {
        for n in [1usize, 2, 8, 64] {
            let tracker = Arc::new(EscalationTracker::new());
            let u = user("race");
            let barrier = Arc::new(std::sync::Barrier::new(n));

            let handles: Vec<_> = (0..n)
                .map(|_| {
                    let tracker = Arc::clone(&tracker);
                    let barrier = Arc::clone(&barrier);
                    let u = u.clone();
                    std::thread::spawn(move || {
                        barrier.wait();
                        tracker.request_escalation(&u)
                    })
                })
                .collect();

            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let ok = results.iter().filter(|r| r.is_ok()).count();
            let pending = results
                .iter()
                .filter(|r| **r == Err(EscalationError::AlreadyPending))
                .count();
            assert_eq!(ok, 1, "n = {n}");
            assert_eq!(pending, n - 1, "n = {n}");
            assert_eq!(tracker.session_state(&u), Some(SessionState::Requested));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_forward_and_resolve_never_tear() {
        let tracker = Arc::new(EscalationTracker::new());
        let mut tasks = Vec::new();
        for i in 0..32 {
            let tracker = Arc::clone(&tracker);
            tasks.push(tokio::spawn(async move {
                let u = UserId(format!("user-{i}"));
                let m = MessageId(format!("admin-{i}"));
                tracker.request_escalation(&u).unwrap();
                tracker.record_forwarded(&u, &m).unwrap();
                tokio::task::yield_now().await;
                assert_eq!(tracker.resolve_by_admin_message(&m), Ok(u.clone()));
                assert!(!tracker.has_session(&u));
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(tracker.pending_count(), 0);
    }
}
