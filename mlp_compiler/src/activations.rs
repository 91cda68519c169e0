use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{CompileError, Result};

/// The lower-case names of every activation the compiler accepts.
pub const SUPPORTED_ACTIVATIONS: [&str; 5] = ["sigmoid", "relu", "tanh", "linear", "softmax"];

/// An activation function a `Dense` layer can be given.
///
/// `Softmax` is only meaningful as the activation of the last layer of a classifier and it is
/// not element-wise, so it has no numeric `function`: architectures may name it
/// but it is left to the training backend to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    Relu,
    Tanh,
    Linear,
    Softmax,
}
use Activation::*;

impl Activation {
    /// Every activation, in the same order as `SUPPORTED_ACTIVATIONS`.
    pub const ALL: [Activation; 5] = [Sigmoid, Relu, Tanh, Linear, Softmax];

    /// The normalized name of this activation.
    pub fn name(self) -> &'static str {
        match self {
            Sigmoid => "sigmoid",
            Relu => "relu",
            Tanh => "tanh",
            Linear => "linear",
            Softmax => "softmax",
        }
    }

    /// Returns the element-wise numeric function of this activation.
    ///
    /// # Returns
    /// `None` for activations that can't be applied one element at a time (`Softmax`).
    pub fn function(self) -> Option<fn(f32) -> f32> {
        match self {
            Sigmoid => Some(sigmoid),
            Relu => Some(relu),
            Tanh => Some(f32::tanh),
            Linear => Some(linear),
            Softmax => None,
        }
    }

    /// Applies this activation to a single value.
    ///
    /// # Arguments
    /// * `z` - The weighted sum.
    ///
    /// # Returns
    /// The activated value or `None` if the activation isn't element-wise.
    pub fn apply(self, z: f32) -> Option<f32> {
        self.function().map(|f| f(z))
    }
}

impl Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self> {
        lookup(s)
    }
}

/// Looks up an activation by name, ignoring case.
///
/// # Arguments
/// * `name` - The name of the activation.
///
/// # Returns
/// The activation or `CompileError::UnknownActivation` if the name isn't registered.
pub fn lookup(name: &str) -> Result<Activation> {
    let key = name.trim().to_lowercase();

    Activation::ALL
        .into_iter()
        .find(|act| act.name() == key)
        .ok_or_else(|| CompileError::UnknownActivation {
            name: name.to_string(),
        })
}

fn sigmoid(z: f32) -> f32 {
    1. / (1. + (-z).exp())
}

fn relu(z: f32) -> f32 {
    z.max(0.)
}

fn linear(z: f32) -> f32 {
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("ReLU").unwrap(), Relu);
        assert_eq!(lookup("SOFTMAX").unwrap(), Softmax);
        assert_eq!("tanh".parse::<Activation>().unwrap(), Tanh);
    }

    #[test]
    fn lookup_rejects_unknown_names() {
        let err = lookup("wobble").unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownActivation {
                name: "wobble".into()
            }
        );
    }

    #[test]
    fn names_match_the_supported_list() {
        let names: Vec<_> = Activation::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, SUPPORTED_ACTIVATIONS);
    }

    #[test]
    fn numeric_functions() {
        assert_eq!(Sigmoid.apply(0.), Some(0.5));
        assert_eq!(Relu.apply(-3.), Some(0.));
        assert_eq!(Relu.apply(2.5), Some(2.5));
        assert_eq!(Linear.apply(-7.), Some(-7.));
        assert!((Tanh.apply(1.).unwrap() - 1f32.tanh()).abs() < f32::EPSILON);
    }

    #[test]
    fn softmax_is_not_elementwise() {
        assert!(Softmax.apply(1.).is_none());
        assert!(Softmax.function().is_none());
        assert!(Relu.function().is_some());
    }
}
