use std::collections::BTreeMap;

use crate::ArchitectureSpec;

/// Something able to train a network described by an `ArchitectureSpec`.
///
/// The compiler ships no implementation, training lives outside of this workspace.
pub trait TrainingBackend {
    /// The trained model.
    type Model;
    type Error: std::error::Error;

    /// Builds and trains a model following `spec`.
    ///
    /// # Arguments
    /// * `spec` - The compiled architecture.
    ///
    /// # Returns
    /// The trained model along with its metrics or an error if the backend failed.
    fn train(
        &mut self,
        spec: &ArchitectureSpec,
    ) -> Result<TrainingReport<Self::Model>, Self::Error>;
}

/// What a `TrainingBackend` hands back after training.
#[derive(Debug, Clone)]
pub struct TrainingReport<M> {
    pub model: M,
    /// Per epoch values of every tracked metric, e.g. `loss` or `val_accuracy`.
    pub history: BTreeMap<String, Vec<f32>>,
    pub test_loss: f32,
    pub test_accuracy: f32,
}

impl<M> TrainingReport<M> {
    /// Returns the per epoch values of a metric.
    pub fn metric(&self, name: &str) -> Option<&[f32]> {
        self.history.get(name).map(Vec::as_slice)
    }

    /// Returns the amount of epochs the model was trained for.
    pub fn epochs(&self) -> usize {
        self.history.values().map(Vec::len).max().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::{convert::Infallible, num::NonZeroUsize};

    use super::*;
    use crate::{LayerSpec, compile};

    /// Reports the amount of units of each layer as the "model".
    struct UnitCounter;

    impl TrainingBackend for UnitCounter {
        type Model = Vec<usize>;
        type Error = Infallible;

        fn train(
            &mut self,
            spec: &ArchitectureSpec,
        ) -> Result<TrainingReport<Vec<usize>>, Infallible> {
            let model = spec
                .dense_layers()
                .filter_map(|layer| match layer {
                    LayerSpec::Dense { units, .. } => Some(units.get()),
                    _ => None,
                })
                .collect();

            let history = BTreeMap::from([
                ("loss".to_string(), vec![0.9, 0.5, 0.3]),
                ("accuracy".to_string(), vec![0.6, 0.8, 0.9]),
            ]);

            Ok(TrainingReport {
                model,
                history,
                test_loss: 0.35,
                test_accuracy: 0.88,
            })
        }
    }

    #[test]
    fn backends_consume_compiled_specs() {
        let arch = "Dense(8, relu) -> Dropout(0.1) -> Dense(2, softmax)";
        let spec = compile(arch, NonZeroUsize::new(4)).unwrap();
        let report = UnitCounter.train(&spec).unwrap();

        assert_eq!(report.model, [8, 2]);
        assert_eq!(report.epochs(), 3);
        assert_eq!(report.metric("loss"), Some([0.9, 0.5, 0.3].as_slice()));
        assert!(report.metric("val_loss").is_none());
    }
}
