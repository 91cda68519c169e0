use std::{
    fmt::{self, Display},
    num::NonZeroUsize,
};

use serde::{Deserialize, Serialize};

use crate::{Activation, CompileError, tokenizer::LAYER_DELIMITER};

/// A validated, backend-agnostic description of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerSpec {
    /// An input dimension that no `Dense` layer consumed.
    Input { dim: NonZeroUsize },
    /// A fully connected layer, `input_dim` is only set on the first one.
    Dense {
        units: NonZeroUsize,
        activation: Option<Activation>,
        input_dim: Option<NonZeroUsize>,
    },
    /// Randomly zeroes a `rate` fraction of its inputs while training.
    Dropout { rate: f64 },
}

impl LayerSpec {
    /// Whether this layer owns trainable parameters.
    pub fn is_weight_bearing(&self) -> bool {
        matches!(self, LayerSpec::Dense { .. })
    }
}

impl Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSpec::Input { dim } => write!(f, "Input({dim})"),
            LayerSpec::Dense {
                units,
                activation,
                input_dim,
            } => {
                if let Some(dim) = input_dim {
                    write!(f, "Input({dim}) {LAYER_DELIMITER} ")?;
                }

                match activation {
                    Some(act) => write!(f, "Dense({units}, {act})"),
                    None => write!(f, "Dense({units})"),
                }
            }
            LayerSpec::Dropout { rate } => write!(f, "Dropout({rate})"),
        }
    }
}

/// The compiled form of an architecture string: a non-empty sequence of layer specifications in
/// execution order.
///
/// It's the contract between the compiler and whatever executes the network, be it an external
/// training backend or the numeric reference engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LayerSpec>", into = "Vec<LayerSpec>")]
pub struct ArchitectureSpec {
    layers: Vec<LayerSpec>,
}

impl ArchitectureSpec {
    /// Returns the layers of this architecture.
    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    /// Returns the amount of layers, `Input` layers included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// An `ArchitectureSpec` always has at least one layer.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the weight-bearing layers.
    pub fn dense_layers(&self) -> impl Iterator<Item = &LayerSpec> {
        self.layers.iter().filter(|layer| layer.is_weight_bearing())
    }

    /// Returns the resolved input dimension of the network.
    ///
    /// # Returns
    /// The input dimension of the first `Dense` layer, or the one of a standalone `Input` if
    /// the architecture has no `Dense` layers.
    pub fn input_dim(&self) -> Option<NonZeroUsize> {
        self.layers.iter().find_map(|layer| match layer {
            LayerSpec::Input { dim } => Some(*dim),
            LayerSpec::Dense { input_dim, .. } => *input_dim,
            LayerSpec::Dropout { .. } => None,
        })
    }

    /// Returns the amount of units of the last `Dense` layer, if any.
    pub fn output_dim(&self) -> Option<NonZeroUsize> {
        self.dense_layers().last().and_then(|layer| match layer {
            LayerSpec::Dense { units, .. } => Some(*units),
            _ => None,
        })
    }

    /// Serializes this architecture as json.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserializes an architecture from json.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl TryFrom<Vec<LayerSpec>> for ArchitectureSpec {
    type Error = CompileError;

    fn try_from(layers: Vec<LayerSpec>) -> Result<Self, Self::Error> {
        if layers.is_empty() {
            return Err(CompileError::EmptyArchitecture);
        }

        Ok(Self { layers })
    }
}

impl From<ArchitectureSpec> for Vec<LayerSpec> {
    fn from(spec: ArchitectureSpec) -> Self {
        spec.layers
    }
}

impl<'a> IntoIterator for &'a ArchitectureSpec {
    type Item = &'a LayerSpec;
    type IntoIter = std::slice::Iter<'a, LayerSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Renders the canonical architecture string, compiling it again yields an equal spec.
impl Display for ArchitectureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                write!(f, " {LAYER_DELIMITER} ")?;
            }

            write!(f, "{layer}")?;
        }

        Ok(())
    }
}
