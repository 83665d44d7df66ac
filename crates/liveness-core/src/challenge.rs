//! Random liveness challenge selection.
//!
//! A challenge session asks the subject to perform one of up to five tasks
//! (blink, open mouth, turn head, ...). Only the index is picked here; what
//! each index means is up to the caller.

use rand::Rng;
use thiserror::Error;

/// Highest number of tasks a session can choose between.
pub const MAX_TASKS: u8 = 5;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("task count must be between 1 and 5, got {0}")]
    InvalidTaskCount(u8),
    #[error("task index must be below 5, got {0}")]
    InvalidTaskIndex(u8),
}

/// Number of tasks to choose from, 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxTaskNumber(u8);

impl MaxTaskNumber {
    pub fn new(value: u8) -> Result<Self, ChallengeError> {
        if (1..=MAX_TASKS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ChallengeError::InvalidTaskCount(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Selected task, 0..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TaskIndex(u8);

impl TaskIndex {
    pub fn new(value: u8) -> Result<Self, ChallengeError> {
        if value < MAX_TASKS {
            Ok(Self(value))
        } else {
            Err(ChallengeError::InvalidTaskIndex(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Pick a task uniformly from `0..max`.
pub fn random_task_index<R: Rng>(max: MaxTaskNumber, rng: &mut R) -> TaskIndex {
    TaskIndex(rng.gen_range(0..max.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_task_count_bounds() {
        assert!(MaxTaskNumber::new(1).is_ok());
        assert!(MaxTaskNumber::new(5).is_ok());
        assert_eq!(MaxTaskNumber::new(0), Err(ChallengeError::InvalidTaskCount(0)));
        assert_eq!(MaxTaskNumber::new(6), Err(ChallengeError::InvalidTaskCount(6)));
    }

    #[test]
    fn test_task_index_bounds() {
        assert_eq!(TaskIndex::new(4).unwrap().get(), 4);
        assert_eq!(TaskIndex::new(5), Err(ChallengeError::InvalidTaskIndex(5)));
    }

    #[test]
    fn test_single_task_always_zero() {
        let mut rng = StdRng::seed_from_u64(7);
        let max = MaxTaskNumber::new(1).unwrap();
        for _ in 0..50 {
            assert_eq!(random_task_index(max, &mut rng).get(), 0);
        }
    }

    #[test]
    fn test_indices_stay_below_max_and_cover_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let max = MaxTaskNumber::new(3).unwrap();
        let mut seen = [false; 3];
        for _ in 0..300 {
            let idx = random_task_index(max, &mut rng).get();
            assert!(idx < 3);
            seen[idx as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
