use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire compiler.
pub type Result<T> = std::result::Result<T, CompileError>;

/// The compiler's error type.
///
/// Every failure is terminal for the compile call that produced it. The `index` fields refer
/// to the position of the offending layer segment in the architecture string, counting only
/// the non-empty segments and starting at zero.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    EmptyArchitecture,
    MalformedLayerSyntax {
        index: usize,
        segment: String,
        reason: &'static str,
    },
    UnsupportedLayerKind {
        index: usize,
        name: String,
    },
    MisplacedInput {
        index: usize,
    },
    MissingInputDimension {
        index: usize,
    },
    UnknownActivation {
        name: String,
    },
    UnsupportedActivation {
        index: usize,
        name: String,
    },
    InvalidDropoutRate {
        index: usize,
        rate: f64,
    },
    InvalidArguments {
        index: usize,
        layer: &'static str,
        reason: String,
    },
}

impl Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::EmptyArchitecture => {
                write!(f, "the architecture has no layers")
            }
            CompileError::MalformedLayerSyntax {
                index,
                segment,
                reason,
            } => write!(f, "malformed layer #{index} '{segment}': {reason}"),
            CompileError::UnsupportedLayerKind { index, name } => {
                write!(f, "layer #{index}: unsupported layer kind '{name}'")
            }
            CompileError::MisplacedInput { index } => write!(
                f,
                "layer #{index}: Input(dim) can only appear before the first Dense layer"
            ),
            CompileError::MissingInputDimension { index } => write!(
                f,
                "layer #{index}: the first Dense layer requires an explicit input dimension or a preceding Input(dim)"
            ),
            CompileError::UnknownActivation { name } => {
                write!(f, "unknown activation '{name}'")
            }
            CompileError::UnsupportedActivation { index, name } => {
                write!(f, "layer #{index}: unsupported activation '{name}'")
            }
            CompileError::InvalidDropoutRate { index, rate } => write!(
                f,
                "layer #{index}: dropout rate must be in [0, 1), got {rate}"
            ),
            CompileError::InvalidArguments {
                index,
                layer,
                reason,
            } => write!(f, "layer #{index}: {layer}: {reason}"),
        }
    }
}

impl Error for CompileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let err = CompileError::UnsupportedActivation {
            index: 2,
            name: "wobble".into(),
        };
        assert_eq!(err.to_string(), "layer #2: unsupported activation 'wobble'");

        let err = CompileError::InvalidDropoutRate {
            index: 0,
            rate: 1.5,
        };
        assert!(err.to_string().contains("1.5"));
    }
}
