use crate::domain::model::{ChurnLabel, CustomerRecord};
use crate::domain::ports::ChurnClassifier;
use crate::utils::error::{ChurnError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub probability: f64,
    pub label: ChurnLabel,
}

/// Calls the classifier for exactly one record and turns anything it does
/// wrong into [`ChurnError::Inference`].
#[derive(Clone)]
pub struct InferenceInvoker {
    classifier: Arc<dyn ChurnClassifier>,
}

impl InferenceInvoker {
    pub fn new(classifier: Arc<dyn ChurnClassifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn infer(&self, record: &CustomerRecord) -> Result<Inference> {
        let classifier = &self.classifier;

        let label = guarded("predict", || classifier.predict(record))?;
        let proba = guarded("predict_proba", || classifier.predict_proba(record))?;
        let probability = churn_probability(proba)?;

        tracing::debug!(
            "Classifier '{}' returned p(churn)={:.4}, label={:?}",
            classifier.name(),
            probability,
            label
        );

        Ok(Inference { probability, label })
    }
}

fn guarded<T>(call: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(ChurnError::Inference { message })) => Err(ChurnError::inference(message)),
        Ok(Err(other)) => Err(ChurnError::inference(format!("{} failed: {}", call, other))),
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("Classifier panicked during {}: {}", call, detail);
            Err(ChurnError::inference(format!("{} panicked: {}", call, detail)))
        }
    }
}

fn churn_probability(proba: [f64; 2]) -> Result<f64> {
    let [stay, churn] = proba;

    if !stay.is_finite() || !churn.is_finite() {
        return Err(ChurnError::inference(format!(
            "Classifier returned non-finite probabilities {:?}",
            proba
        )));
    }
    if !(0.0..=1.0).contains(&stay) || !(0.0..=1.0).contains(&churn) {
        return Err(ChurnError::inference(format!(
            "Classifier returned probabilities outside [0, 1]: {:?}",
            proba
        )));
    }
    if (stay + churn - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(ChurnError::inference(format!(
            "Class probabilities do not sum to 1: {:?}",
            proba
        )));
    }

    Ok(churn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AddonStatus, Contract, InternetService, YesNo};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        proba: [f64; 2],
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl ChurnClassifier for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn predict(&self, _record: &CustomerRecord) -> Result<ChurnLabel> {
            Ok(ChurnLabel::Stay)
        }

        fn predict_proba(&self, _record: &CustomerRecord) -> Result<[f64; 2]> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(ChurnError::Config {
                    field: "columns".into(),
                    message: "feature names mismatch".into(),
                });
            }
            Ok(self.proba)
        }
    }

    struct Panicking;

    impl ChurnClassifier for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn predict(&self, _record: &CustomerRecord) -> Result<ChurnLabel> {
            panic!("columns are missing: {{'tenure'}}");
        }

        fn predict_proba(&self, _record: &CustomerRecord) -> Result<[f64; 2]> {
            Ok([0.5, 0.5])
        }
    }

    fn record() -> CustomerRecord {
        CustomerRecord {
            dependents: YesNo::No,
            tenure: 12,
            online_security: AddonStatus::No,
            online_backup: AddonStatus::Yes,
            internet_service: InternetService::Dsl,
            device_protection: AddonStatus::No,
            tech_support: AddonStatus::No,
            contract: Contract::OneYear,
            paperless_billing: YesNo::Yes,
            monthly_charges: 50.0,
        }
    }

    fn scripted(proba: [f64; 2], fail_first: bool) -> Arc<Scripted> {
        Arc::new(Scripted {
            proba,
            calls: AtomicUsize::new(0),
            fail_first,
        })
    }

    #[test]
    fn test_returns_positive_class_probability() {
        let invoker = InferenceInvoker::new(scripted([0.3, 0.7], false));
        let inference = invoker.infer(&record()).unwrap();
        assert_eq!(inference.probability, 0.7);
        assert_eq!(inference.label, ChurnLabel::Stay);
    }

    #[test]
    fn test_failure_does_not_poison_next_call() {
        let classifier = scripted([0.6, 0.4], true);
        let invoker = InferenceInvoker::new(classifier.clone());

        let err = invoker.infer(&record()).unwrap_err();
        assert!(matches!(err, ChurnError::Inference { .. }));
        assert!(err.to_string().contains("feature names mismatch"));

        let inference = invoker.infer(&record()).unwrap();
        assert_eq!(inference.probability, 0.4);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_recomputes_every_call() {
        let classifier = scripted([0.2, 0.8], false);
        let invoker = InferenceInvoker::new(classifier.clone());

        let first = invoker.infer(&record()).unwrap();
        let second = invoker.infer(&record()).unwrap();
        assert_eq!(first, second);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panic_becomes_inference_failure() {
        let invoker = InferenceInvoker::new(Arc::new(Panicking));
        let err = invoker.infer(&record()).unwrap_err();
        assert!(matches!(err, ChurnError::Inference { .. }));
        assert!(err.to_string().contains("columns are missing"));
    }

    #[test]
    fn test_rejects_malformed_probabilities() {
        for proba in [[-0.1, 1.1], [0.5, f64::NAN], [0.2, 0.2]] {
            let invoker = InferenceInvoker::new(scripted(proba, false));
            assert!(matches!(
                invoker.infer(&record()),
                Err(ChurnError::Inference { .. })
            ));
        }
    }
}
