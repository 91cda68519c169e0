//! A minimal feed-forward evaluator able to run any `ArchitectureSpec` produced by
//! `mlp_compiler` without a training framework.

pub mod arch;
pub mod builder;
pub mod error;
pub mod initialization;

use mlp_compiler::ArchitectureSpec;
use rand::rngs::StdRng;

pub use arch::{Sequential, layers::Dense, neuron_forward};
pub use builder::NetworkBuilder;
pub use error::{MlErr, Result};

/// Builds a network with the default configuration.
///
/// # Arguments
/// * `spec` - The compiled architecture.
/// * `rng` - A seeded generator to pin the initial weights, a generator seeded by the operating
///   system is used when `None`.
pub fn build(spec: &ArchitectureSpec, rng: Option<StdRng>) -> Result<Sequential> {
    let builder = NetworkBuilder::new();

    match rng {
        Some(rng) => builder.build(spec, rng),
        None => builder.build_from_entropy(spec),
    }
}
