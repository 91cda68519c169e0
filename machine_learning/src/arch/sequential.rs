use ndarray::{Array2, ArrayView2};

use super::layers::Dense;
use crate::{MlErr, Result};

/// A sequential model: information flows forward through its dense layers, the output of each
/// one being the input of the next.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Dense>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance, `MlErr::EmptyNetwork` if there are no layers or
    /// `MlErr::ShapeMismatch` if a layer's input features don't match the previous layer's
    /// output features.
    pub fn new<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Dense>,
    {
        let layers: Vec<_> = layers.into_iter().collect();
        if layers.is_empty() {
            return Err(MlErr::EmptyNetwork);
        }

        for pair in layers.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.out_features() != next.in_features() {
                return Err(MlErr::ShapeMismatch {
                    got: prev.out_features(),
                    expected: next.in_features(),
                });
            }
        }

        Ok(Self { layers })
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `x` - A `[batch × in]` input.
    ///
    /// # Returns
    /// The `[batch × out]` prediction for the given input or an error if occurred.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (first, rest) = self.layers.split_first().ok_or(MlErr::EmptyNetwork)?;

        rest.iter()
            .try_fold(first.forward(x)?, |a, layer| layer.forward(a.view()))
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Returns the amount of dense layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// A `Sequential` always has at least one layer.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the amount of features the network expects.
    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, Dense::in_features)
    }

    /// Returns the amount of features the network outputs.
    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, Dense::out_features)
    }

    /// Returns the amount of parameters in the model.
    pub fn size(&self) -> usize {
        self.layers.iter().map(Dense::size).sum()
    }
}
