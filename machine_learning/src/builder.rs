use std::{cell::RefCell, rc::Rc};

use log::debug;
use mlp_compiler::{ArchitectureSpec, LayerSpec};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    MlErr, Result,
    arch::{Sequential, layers::Dense},
    initialization::RandParamGen,
};

/// Builds `Sequential` networks given an `ArchitectureSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkBuilder {
    /// Factor applied to the standard deviation of every weight initialization.
    weight_scale: f32,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self { weight_scale: 1. }
    }
}

impl NetworkBuilder {
    /// Creates a new `NetworkBuilder` with a neutral weight scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the factor applied to the standard deviation of the initial weights.
    ///
    /// It must be finite and non-negative, otherwise building fails with `MlErr::Init`.
    pub fn weight_scale(mut self, weight_scale: f32) -> Self {
        self.weight_scale = weight_scale;
        self
    }

    /// Builds a new `Sequential` following a spec.
    ///
    /// `Dropout` layers are skipped since they only act while training.
    ///
    /// # Arguments
    /// * `spec` - The specification of the network.
    /// * `rng` - The random number generator every weight is sampled from.
    ///
    /// # Returns
    /// The network or an error if the spec has no dense layers, uses an activation the
    /// reference engine can't evaluate or its dimensions can't be resolved.
    pub fn build<R: Rng>(&self, spec: &ArchitectureSpec, rng: R) -> Result<Sequential> {
        let rng = Rc::new(RefCell::new(rng));
        let mut fan_in = None;
        let mut layers = Vec::new();

        for (i, layer) in spec.into_iter().enumerate() {
            match *layer {
                LayerSpec::Input { dim } => {
                    if !layers.is_empty() {
                        return Err(MlErr::InvalidSpec {
                            layer: i,
                            reason: "Input after a Dense layer",
                        });
                    }

                    fan_in = Some(dim.get());
                }
                LayerSpec::Dense {
                    units,
                    activation,
                    input_dim,
                } => {
                    let n = input_dim
                        .map(|dim| dim.get())
                        .or(fan_in)
                        .ok_or(MlErr::InvalidSpec {
                            layer: i,
                            reason: "the input dimension of the first Dense layer is unknown",
                        })?;
                    let dim = (n, units.get());

                    let mut param_gen =
                        RandParamGen::for_dense(rng.clone(), dim, activation, self.weight_scale)?;
                    layers.push(Dense::new(dim, activation, &mut param_gen)?);
                    fan_in = Some(units.get());
                }
                LayerSpec::Dropout { rate } => {
                    debug!("skipping dropout layer #{i} with rate {rate}, inactive at inference");
                }
            }
        }

        let network = Sequential::new(layers)?;
        debug!(
            "built network with {} dense layer(s), {} -> {} features, {} parameters",
            network.len(),
            network.input_dim(),
            network.output_dim(),
            network.size()
        );
        Ok(network)
    }

    /// Builds a new `Sequential` whose weights are fully determined by `seed`.
    pub fn build_seeded(&self, spec: &ArchitectureSpec, seed: u64) -> Result<Sequential> {
        self.build(spec, StdRng::seed_from_u64(seed))
    }

    /// Builds a new `Sequential` seeding a fresh generator from the operating system.
    pub fn build_from_entropy(&self, spec: &ArchitectureSpec) -> Result<Sequential> {
        self.build(spec, StdRng::from_os_rng())
    }
}
