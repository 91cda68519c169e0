use mlp_compiler::Activation;
use ndarray::prelude::*;

use crate::{MlErr, Result, arch::activations::ActFn, initialization::ParamGen};

/// A fully connected layer: `a = act_fn(x · w + b)`.
///
/// The layer owns its weights `[in × out]` and biases `[out]`, they are set once when the layer
/// is built and a forward pass never mutates them.
#[derive(Clone, Debug)]
pub struct Dense {
    weights: Array2<f32>,
    biases: Array1<f32>,
    act_fn: ActFn,
}

impl Dense {
    /// Creates a new `Dense` layer with zeroed biases.
    ///
    /// # Arguments
    /// * `dim` - The `(in, out)` features of the layer.
    /// * `activation` - The activation function, `None` for identity.
    /// * `param_gen` - Where to sample the `in * out` weights from, in row-major order.
    ///
    /// # Returns
    /// The new layer or an error if a dimension is zero, the activation can't be evaluated or the
    /// generator runs out of parameters.
    pub fn new<G>(
        dim: (usize, usize),
        activation: Option<Activation>,
        param_gen: &mut G,
    ) -> Result<Self>
    where
        G: ParamGen + ?Sized,
    {
        let (in_features, out_features) = dim;
        let invalid = MlErr::InvalidFeatures {
            in_features,
            out_features,
        };

        if in_features == 0 || out_features == 0 {
            return Err(invalid);
        }

        let size = in_features.checked_mul(out_features).ok_or(invalid)?;
        let act_fn = ActFn::new(activation)?;

        let raw = param_gen
            .sample_exact(size)
            .map_err(|got| MlErr::ParamGenExhausted {
                got,
                expected: size,
            })?;

        Ok(Self {
            weights: Array2::from_shape_vec(dim, raw)?,
            biases: Array1::zeros(out_features),
            act_fn,
        })
    }

    /// Creates a new `Dense` layer from already known parameters.
    ///
    /// # Arguments
    /// * `weights` - The `[in × out]` weight matrix.
    /// * `biases` - The `[out]` bias vector.
    /// * `activation` - The activation function, `None` for identity.
    pub fn from_parts(
        weights: Array2<f32>,
        biases: Array1<f32>,
        activation: Option<Activation>,
    ) -> Result<Self> {
        let (in_features, out_features) = weights.dim();
        if in_features == 0 || out_features == 0 {
            return Err(MlErr::InvalidFeatures {
                in_features,
                out_features,
            });
        }

        if biases.len() != out_features {
            return Err(MlErr::ShapeMismatch {
                got: biases.len(),
                expected: out_features,
            });
        }

        Ok(Self {
            weights,
            biases,
            act_fn: ActFn::new(activation)?,
        })
    }

    /// Makes a forward pass through the layer.
    ///
    /// # Arguments
    /// * `x` - A `[batch × in]` input.
    ///
    /// # Returns
    /// The `[batch × out]` activations or `MlErr::ShapeMismatch` if `x` doesn't have `in`
    /// columns.
    pub fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let expected = self.in_features();
        if x.ncols() != expected {
            return Err(MlErr::ShapeMismatch {
                got: x.ncols(),
                expected,
            });
        }

        let mut z = x.dot(&self.weights);
        z += &self.biases;
        self.act_fn.apply(&mut z);
        Ok(z)
    }

    pub fn in_features(&self) -> usize {
        self.weights.nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weights.ncols()
    }

    /// Returns the amount of parameters of this layer.
    pub fn size(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub fn weights(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    pub fn biases(&self) -> ArrayView1<'_, f32> {
        self.biases.view()
    }

    pub fn activation(&self) -> Option<Activation> {
        self.act_fn.activation()
    }
}
