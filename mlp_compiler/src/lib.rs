//! Compiles a feed-forward network described as a single line of text, such as
//! `Dense(300, relu) -> Dropout(0.2) -> Dense(10, softmax)`, into a validated `ArchitectureSpec`.

pub mod activations;
pub mod assembler;
pub mod backend;
pub mod error;
pub mod specs;
pub mod tokenizer;

use std::num::NonZeroUsize;

use log::debug;

pub use activations::{Activation, SUPPORTED_ACTIVATIONS};
pub use backend::{TrainingBackend, TrainingReport};
pub use error::{CompileError, Result};
pub use specs::{ArchitectureSpec, LayerSpec};
pub use tokenizer::{LayerArgument, LayerToken};

/// Compiles an architecture string.
///
/// # Arguments
/// * `architecture` - Layers separated by `->`, e.g. `Input(784) -> Dense(10, softmax)`.
/// * `input_dim` - The input dimension of the first `Dense` layer. When given, it takes
///   precedence over an `Input(dim)` layer.
///
/// # Returns
/// The compiled architecture or the first error found, compilation is all-or-nothing.
pub fn compile(architecture: &str, input_dim: Option<NonZeroUsize>) -> Result<ArchitectureSpec> {
    debug!("compiling architecture '{architecture}'");

    let tokens = tokenizer::tokenize(architecture)?;
    let spec = assembler::assemble(&tokens, input_dim)?;

    debug!(
        "compiled {} layer(s), input dim {:?}, output dim {:?}",
        spec.len(),
        spec.input_dim(),
        spec.output_dim()
    );
    Ok(spec)
}
