//! Retry policy: classifiers, a schedule, and an observer, plus the
//! execution loop that runs an operation under them.

use std::time::Duration;

use crate::cancel::{sleep_cancellable, CancelToken};
use crate::classify::Classifier;
use crate::error::RetryError;
use crate::schedule::Schedule;

/// A retry about to happen: which retry it is (1-based) and the delay
/// applied before the operation runs again (zero for count schedules).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    pub attempt: u32,
    pub delay: Duration,
}

/// Hook notified after each failed attempt that will be retried.
///
/// Never called on success, nor for the terminal failure once no retry is
/// allowed. Its return value does not exist; it must not be used for
/// control flow. A panic inside the observer unwinds straight through the
/// execution, abandoning further retries.
pub type Observer<E> = Box<dyn Fn(&E, &Retry) + Send + Sync>;

/// Immutable retry policy: which failures to retry, how often, how long to
/// wait, and whom to tell.
///
/// A policy holds no per-execution state (attempt counters live in the
/// `execute` frame), so one value can be built once, shared across threads,
/// and reused for the life of the process.
pub struct Policy<E> {
    classifiers: Vec<Classifier<E>>,
    schedule: Schedule,
    observer: Option<Observer<E>>,
}

impl<E> Policy<E> {
    /// Starts a builder for a policy with the given schedule.
    pub fn builder(schedule: Schedule) -> PolicyBuilder<E> {
        PolicyBuilder {
            classifiers: Vec::new(),
            schedule,
            observer: None,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Runs `op` under this policy.
    ///
    /// Returns the first success, or the terminal failure: either a failure
    /// no classifier accepts (propagated immediately, even if retries
    /// remain) or the last failure once the schedule is exhausted. The
    /// failure value is propagated untouched either way.
    pub fn execute<T, F>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 0usize;
        loop {
            let err = match op() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !self.is_retryable(&err) {
                return Err(err);
            }
            let delay = match self.schedule.delay(attempt) {
                Some(delay) => delay,
                None => return Err(err),
            };
            self.notify(&err, attempt, delay);
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            attempt += 1;
        }
    }

    /// Like [`Policy::execute`], but aborts when `cancel` is triggered.
    ///
    /// The token is checked before each attempt and while waiting out a
    /// delay; a triggered token yields [`RetryError::Aborted`]. The
    /// operation's own terminal failure comes back as
    /// [`RetryError::Failed`] with its identity preserved.
    pub fn execute_cancellable<T, F>(
        &self,
        cancel: &CancelToken,
        mut op: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 0usize;
        loop {
            if cancel.is_cancelled() {
                return Err(RetryError::Aborted);
            }
            let err = match op() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if !self.is_retryable(&err) {
                return Err(RetryError::Failed(err));
            }
            let delay = match self.schedule.delay(attempt) {
                Some(delay) => delay,
                None => return Err(RetryError::Failed(err)),
            };
            self.notify(&err, attempt, delay);
            if !sleep_cancellable(delay, cancel) {
                return Err(RetryError::Aborted);
            }
            attempt += 1;
        }
    }

    fn is_retryable(&self, err: &E) -> bool {
        self.classifiers.iter().any(|c| c.accepts(err))
    }

    fn notify(&self, err: &E, attempt: usize, delay: Duration) {
        if let Some(observer) = &self.observer {
            let retry = Retry {
                attempt: attempt as u32 + 1,
                delay,
            };
            observer(err, &retry);
        }
    }
}

/// Accumulates the named parts of a policy, then builds it.
///
/// With no classifiers registered nothing is retryable, so every failure is
/// terminal on its first occurrence.
pub struct PolicyBuilder<E> {
    classifiers: Vec<Classifier<E>>,
    schedule: Schedule,
    observer: Option<Observer<E>>,
}

impl<E> PolicyBuilder<E> {
    /// Adds a classifier built from a predicate over the failure value.
    pub fn retry_if(mut self, pred: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.classifiers.push(Classifier::new(pred));
        self
    }

    /// Adds a prebuilt classifier.
    pub fn classifier(mut self, classifier: Classifier<E>) -> Self {
        self.classifiers.push(classifier);
        self
    }

    /// Installs the retry observer.
    pub fn on_retry(mut self, observer: impl Fn(&E, &Retry) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn build(self) -> Policy<E> {
        Policy {
            classifiers: self.classifiers,
            schedule: self.schedule,
            observer: self.observer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Flake(&'static str);

    #[test]
    fn success_returns_without_observer() {
        let observed = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&observed);
        let policy: Policy<Flake> = Policy::builder(Schedule::Count(3))
            .classifier(Classifier::any())
            .on_retry(move |_, _| {
                seen.fetch_add(1, Ordering::Relaxed);
            })
            .build();
        let result: Result<u32, Flake> = policy.execute(|| Ok(7));
        assert_eq!(result, Ok(7));
        assert_eq!(observed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn no_classifiers_means_first_failure_is_terminal() {
        let calls = AtomicU32::new(0);
        let policy: Policy<Flake> = Policy::builder(Schedule::Count(5)).build();
        let result: Result<(), Flake> = policy.execute(|| {
            calls.fetch_add(1, Ordering::Relaxed);
            Err(Flake("nope"))
        });
        assert_eq!(result, Err(Flake("nope")));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn zero_count_schedule_fails_on_first_failure() {
        let calls = AtomicU32::new(0);
        let policy: Policy<Flake> = Policy::builder(Schedule::none())
            .classifier(Classifier::any())
            .build();
        let result: Result<(), Flake> = policy.execute(|| {
            calls.fetch_add(1, Ordering::Relaxed);
            Err(Flake("once"))
        });
        assert_eq!(result, Err(Flake("once")));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn retry_events_carry_one_based_index_and_delay() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&events);
        let policy: Policy<Flake> = Policy::builder(Schedule::Delays(vec![
            Duration::from_millis(1),
            Duration::from_millis(2),
        ]))
        .classifier(Classifier::any())
        .on_retry(move |_, retry| seen.lock().unwrap().push((retry.attempt, retry.delay)))
        .build();

        let result: Result<(), Flake> = policy.execute(|| Err(Flake("again")));
        assert_eq!(result, Err(Flake("again")));
        assert_eq!(
            *events.lock().unwrap(),
            vec![(1, Duration::from_millis(1)), (2, Duration::from_millis(2))]
        );
    }
}
