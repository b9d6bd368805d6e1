//! Failure classification: which failures are eligible for retry.

/// Predicate deciding whether a specific failure instance is eligible for
/// retry.
///
/// Classifiers are pure and side-effect-free. A policy holds a list of them
/// and accepts a failure if *any* classifier does; the list is evaluated in
/// registration order but the outcome is order-independent.
pub struct Classifier<E> {
    pred: Box<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Classifier<E> {
    /// Classifier from a predicate over the failure value.
    ///
    /// Match on the failure kind (the enum variant) and, where needed, its
    /// payload:
    ///
    /// ```ignore
    /// Classifier::new(|e| matches!(e, ProbeError::Net(s) if s.is_transient()))
    /// ```
    pub fn new(pred: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self {
            pred: Box::new(pred),
        }
    }

    /// Classifier that accepts every failure.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Whether this classifier accepts the given failure.
    pub fn accepts(&self, failure: &E) -> bool {
        (self.pred)(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Fault {
        Soft(u32),
        Hard,
    }

    #[test]
    fn predicate_sees_kind_and_payload() {
        let c = Classifier::new(|e| matches!(e, Fault::Soft(n) if *n < 10));
        assert!(c.accepts(&Fault::Soft(3)));
        assert!(!c.accepts(&Fault::Soft(10)));
        assert!(!c.accepts(&Fault::Hard));
    }

    #[test]
    fn any_accepts_everything() {
        let c = Classifier::any();
        assert!(c.accepts(&Fault::Soft(99)));
        assert!(c.accepts(&Fault::Hard));
    }
}
