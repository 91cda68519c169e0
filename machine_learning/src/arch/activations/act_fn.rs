use mlp_compiler::Activation;
use ndarray::{ArrayBase, DataMut, Dimension};

use crate::{MlErr, Result};

/// An activation resolved to its element-wise function. A layer without activation uses the
/// identity.
#[derive(Clone, Copy, Debug)]
pub struct ActFn {
    activation: Option<Activation>,
    f: fn(f32) -> f32,
}

impl ActFn {
    /// Creates a new `ActFn`.
    ///
    /// # Arguments
    /// * `activation` - The activation to resolve, `None` means identity.
    ///
    /// # Returns
    /// A new `ActFn` or `MlErr::UnsupportedByReferenceEngine` for activations that aren't
    /// element-wise.
    pub fn new(activation: Option<Activation>) -> Result<Self> {
        let Some(act) = activation else {
            return Ok(Self {
                activation,
                f: identity,
            });
        };

        let f = act
            .function()
            .ok_or(MlErr::UnsupportedByReferenceEngine { activation: act })?;

        Ok(Self { activation, f })
    }

    pub fn activation(&self) -> Option<Activation> {
        self.activation
    }

    /// Applies the activation to every element of `z` in place.
    pub fn apply<S, D>(&self, z: &mut ArrayBase<S, D>)
    where
        S: DataMut<Elem = f32>,
        D: Dimension,
    {
        z.mapv_inplace(self.f);
    }
}

fn identity(z: f32) -> f32 {
    z
}
