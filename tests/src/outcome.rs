//! Outcomes and verdicts of a submitted batch.

use std::fmt;

/// How the store answered a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    /// Refused with the configured limit signal.
    RejectedForLimit,
    /// Refused for any other reason, or no answer before the deadline.
    RejectedOther(String),
}

impl Outcome {
    /// The outcome a correct store gives for a predicted count.
    pub fn expected(predicted: u64, limit: u64) -> Self {
        if predicted <= limit {
            Outcome::Accepted
        } else {
            Outcome::RejectedForLimit
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => write!(f, "accepted"),
            Outcome::RejectedForLimit => write!(f, "rejected for limit"),
            Outcome::RejectedOther(message) => write!(f, "rejected ({})", message),
        }
    }
}

/// A verified batch: what was predicted, against which limit, and what the
/// store did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub predicted: u64,
    pub limit: u64,
    pub outcome: Outcome,
}

impl Verdict {
    pub fn expected(&self) -> Outcome {
        Outcome::expected(self.predicted, self.limit)
    }

    /// Whether the store behaved as predicted.
    pub fn holds(&self) -> bool {
        self.outcome == self.expected()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "predicted {} / limit {}: {}",
            self.predicted, self.limit, self.outcome
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_outcome_at_the_limit() {
        assert_eq!(Outcome::expected(10, 10), Outcome::Accepted);
        assert_eq!(Outcome::expected(11, 10), Outcome::RejectedForLimit);
    }

    #[test]
    fn test_other_rejection_never_holds() {
        let verdict = Verdict {
            predicted: 11,
            limit: 10,
            outcome: Outcome::RejectedOther("Unavailable".into()),
        };

        assert!(!verdict.holds());
        assert_eq!(verdict.to_string(), "predicted 11 / limit 10: rejected (Unavailable)");
    }
}
