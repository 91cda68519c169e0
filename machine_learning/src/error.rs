use std::{
    error::Error,
    fmt::{self, Display},
};

use mlp_compiler::Activation;
use ndarray::ShapeError;

use crate::initialization::RandErr;

/// The result type used in the entire machine learning module.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The machine learning module's error type.
#[derive(Debug)]
pub enum MlErr {
    EmptyNetwork,
    ShapeMismatch {
        got: usize,
        expected: usize,
    },
    UnsupportedByReferenceEngine {
        activation: Activation,
    },
    InvalidSpec {
        layer: usize,
        reason: &'static str,
    },
    InvalidFeatures {
        in_features: usize,
        out_features: usize,
    },
    ParamGenExhausted {
        got: usize,
        expected: usize,
    },
    Shape(ShapeError),
    Init(RandErr),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::EmptyNetwork => write!(f, "the network has no dense layers"),
            MlErr::ShapeMismatch { got, expected } => write!(
                f,
                "there's a shape mismatch, got {got} input features and expected {expected}"
            ),
            MlErr::UnsupportedByReferenceEngine { activation } => write!(
                f,
                "the reference engine can't evaluate the '{activation}' activation"
            ),
            MlErr::InvalidSpec { layer, reason } => {
                write!(f, "invalid architecture at layer #{layer}: {reason}")
            }
            MlErr::InvalidFeatures {
                in_features,
                out_features,
            } => write!(
                f,
                "a dense layer needs positive dimensions, got ({in_features}, {out_features})"
            ),
            MlErr::ParamGenExhausted { got, expected } => write!(
                f,
                "the parameter generator yielded {got} of the {expected} expected parameters"
            ),
            MlErr::Shape(e) => write!(f, "shape error: {e}"),
            MlErr::Init(e) => write!(f, "initialization error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            MlErr::Init(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for MlErr {
    fn from(value: ShapeError) -> Self {
        Self::Shape(value)
    }
}

impl From<RandErr> for MlErr {
    fn from(value: RandErr) -> Self {
        Self::Init(value)
    }
}
