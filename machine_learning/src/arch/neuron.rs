use mlp_compiler::Activation;
use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::{MlErr, Result, arch::activations::ActFn};

/// Computes the output of a single neuron over a batch: `activation(x · w + b)`.
///
/// # Arguments
/// * `x` - A `[batch × in]` input.
/// * `w` - The `[in]` weights of the neuron.
/// * `b` - The bias of the neuron.
/// * `activation` - The activation function.
///
/// # Returns
/// The `[batch]` outputs or an error if `w` doesn't match the input features or the activation
/// isn't element-wise.
pub fn neuron_forward(
    x: ArrayView2<f32>,
    w: ArrayView1<f32>,
    b: f32,
    activation: Activation,
) -> Result<Array1<f32>> {
    let act_fn = ActFn::new(Some(activation))?;

    if x.ncols() != w.len() {
        return Err(MlErr::ShapeMismatch {
            got: x.ncols(),
            expected: w.len(),
        });
    }

    let mut z = x.dot(&w) + b;
    act_fn.apply(&mut z);
    Ok(z)
}
