// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out accounting.
//!
//! Folds per-recipient enqueue outcomes into the counts and the ordered
//! failed-recipient list of a [`FanOutResult`]. No retries happen here.

use courier_core::types::{FanOutResult, UserId};

/// Running tally of one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutTally {
    success_count: usize,
    failure_count: usize,
    failed_users: Vec<UserId>,
}

impl FanOutTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one enqueue attempt for `recipient`.
    pub fn record<E>(&mut self, recipient: UserId, outcome: &Result<(), E>) {
        match outcome {
            Ok(()) => self.success_count += 1,
            Err(_) => {
                self.failure_count += 1;
                self.failed_users.push(recipient);
            }
        }
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn failed_users(&self) -> &[UserId] {
        &self.failed_users
    }

    /// Number of recipients recorded so far.
    pub fn attempted(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Seal the tally into the result returned to the sender.
    pub fn finish(self, message_id: impl Into<String>) -> FanOutResult {
        let attempted = self.attempted();
        let message = match (self.success_count, self.failure_count) {
            (0, 0) => "no recipients to deliver to".to_string(),
            (n, 0) => format!("delivered to {n} recipient(s)"),
            (0, n) => format!("delivery failed for {n} recipient(s)"),
            (ok, _) => format!("delivered to {ok} of {attempted} recipients"),
        };
        FanOutResult {
            success: self.success_count > 0,
            message,
            message_id: message_id.into(),
            success_count: self.success_count,
            failure_count: self.failure_count,
            failed_users: self.failed_users,
        }
    }
}

/// Tally an ordered sequence of `(recipient, outcome)` pairs.
pub fn tally<I, E>(outcomes: I) -> FanOutTally
where
    I: IntoIterator<Item = (UserId, Result<(), E>)>,
{
    let mut tally = FanOutTally::new();
    for (recipient, outcome) in outcomes {
        tally.record(recipient, &outcome);
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn all_success() {
        let t = tally([(2, Ok::<(), ()>(())), (3, Ok(()))]);
        let res = t.finish("m-1");
        assert!(res.success);
        assert_eq!(res.success_count, 2);
        assert_eq!(res.failure_count, 0);
        assert!(res.failed_users.is_empty());
        assert_eq!(res.message, "delivered to 2 recipient(s)");
    }

    #[test]
    fn partial_failure_keeps_order() {
        let t = tally([(5, Err("down")), (2, Ok(())), (9, Err("down")), (4, Ok(()))]);
        assert_eq!(t.failed_users(), &[5, 9]);
        let res = t.finish("m-2");
        assert!(res.success);
        assert_eq!(res.success_count, 2);
        assert_eq!(res.failure_count, 2);
        assert_eq!(res.message, "delivered to 2 of 4 recipients");
    }

    #[test]
    fn all_failed_is_not_success() {
        let res = tally([(7, Err::<(), _>("down"))]).finish("m-3");
        assert!(!res.success);
        assert_eq!(res.failed_users, vec![7]);
    }

    #[test]
    fn empty_fan_out() {
        let res = FanOutTally::new().finish("m-4");
        assert!(!res.success);
        assert_eq!(res.attempted(), 0);
        assert_eq!(res.message, "no recipients to deliver to");
    }

    proptest! {
        #[test]
        fn counts_match_attempts(outcomes in proptest::collection::vec((1u64..1000, any::<bool>()), 0..64)) {
            let pairs: Vec<(UserId, Result<(), ()>)> = outcomes
                .iter()
                .map(|&(id, ok)| (id, if ok { Ok(()) } else { Err(()) }))
                .collect();
            let res = tally(pairs).finish("m");

            prop_assert_eq!(res.success_count + res.failure_count, outcomes.len());
            prop_assert_eq!(res.success, res.success_count > 0);

            let expected_failed: Vec<UserId> = outcomes
                .iter()
                .filter(|(_, ok)| !ok)
                .map(|(id, _)| *id)
                .collect();
            prop_assert_eq!(res.failed_users, expected_failed);
        }
    }
}
