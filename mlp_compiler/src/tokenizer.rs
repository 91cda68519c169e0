use std::{
    fmt::{self, Display},
    sync::LazyLock,
};

use regex::Regex;

use crate::{CompileError, Result};

/// The delimiter between two layers of an architecture string.
pub const LAYER_DELIMITER: &str = "->";

static LAYER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*\((?P<args>[^()]*)\)$")
        .expect("the layer grammar is a valid regex")
});
static INT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+$").expect("the integer grammar is a valid regex"));
static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d*\.\d+$").expect("the float grammar is a valid regex"));

/// A positional argument of a layer.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerArgument {
    Int(i64),
    Float(f64),
    Token(String),
}

impl LayerArgument {
    /// The argument as a number, if it is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LayerArgument::Int(i) => Some(*i as f64),
            LayerArgument::Float(x) => Some(*x),
            LayerArgument::Token(_) => None,
        }
    }
}

impl Display for LayerArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerArgument::Int(i) => write!(f, "{i}"),
            LayerArgument::Float(x) => write!(f, "{x}"),
            LayerArgument::Token(s) => f.write_str(s),
        }
    }
}

/// One `Name(args)` segment of an architecture string.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerToken {
    /// The lower-cased layer name.
    pub kind: String,
    pub args: Vec<LayerArgument>,
}

/// Splits an architecture string into its layer tokens.
///
/// # Arguments
/// * `architecture` - Layers separated by `->`, each of the form `Name(arg, ...)`.
///
/// # Returns
/// The tokens in architecture order or an error if there are no layers or a segment doesn't
/// follow the grammar.
pub fn tokenize(architecture: &str) -> Result<Vec<LayerToken>> {
    let tokens = segments(architecture)
        .enumerate()
        .map(|(index, segment)| parse_layer(index, segment))
        .collect::<Result<Vec<_>>>()?;

    if tokens.is_empty() {
        return Err(CompileError::EmptyArchitecture);
    }

    Ok(tokens)
}

fn segments(architecture: &str) -> impl Iterator<Item = &str> {
    architecture
        .split(LAYER_DELIMITER)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

fn parse_layer(index: usize, segment: &str) -> Result<LayerToken> {
    let malformed = |reason| CompileError::MalformedLayerSyntax {
        index,
        segment: segment.to_string(),
        reason,
    };

    let caps = LAYER_RE
        .captures(segment)
        .ok_or_else(|| malformed("expected `Name(arg, ...)`"))?;

    let kind = caps["name"].to_lowercase();
    let args = caps["args"]
        .split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(|arg| parse_arg(arg).ok_or_else(|| malformed("numeric argument out of range")))
        .collect::<Result<_>>()?;

    Ok(LayerToken { kind, args })
}

fn parse_arg(arg: &str) -> Option<LayerArgument> {
    if INT_RE.is_match(arg) {
        return arg.parse().ok().map(LayerArgument::Int);
    }

    if FLOAT_RE.is_match(arg) {
        return arg.parse().ok().map(LayerArgument::Float);
    }

    Some(LayerArgument::Token(arg.to_lowercase()))
}
