use std::num::NonZeroUsize;

use log::trace;

use crate::{
    Activation, ArchitectureSpec, CompileError, LayerSpec, Result, activations,
    tokenizer::{LayerArgument, LayerToken},
};

/// Validates the parsed layer tokens and assembles them into an `ArchitectureSpec`.
///
/// # Arguments
/// * `tokens` - The tokens of an architecture string, in order.
/// * `input_dim` - An explicit input dimension for the first `Dense` layer, it takes precedence
///   over any `Input(dim)` token.
///
/// # Returns
/// The assembled architecture or the first validation error found.
pub fn assemble(
    tokens: &[LayerToken],
    input_dim: Option<NonZeroUsize>,
) -> Result<ArchitectureSpec> {
    let mut assembler = Assembler::new(input_dim);

    for (index, token) in tokens.iter().enumerate() {
        assembler.push(index, token)?;
    }

    assembler.finish()
}

/// Running state of the semantic pass.
struct Assembler {
    explicit_input_dim: Option<NonZeroUsize>,
    // The last `Input(dim)` seen and where it would go if no `Dense` consumes it.
    pending_input: Option<(NonZeroUsize, usize)>,
    seen_dense: bool,
    layers: Vec<LayerSpec>,
}

impl Assembler {
    fn new(explicit_input_dim: Option<NonZeroUsize>) -> Self {
        Self {
            explicit_input_dim,
            pending_input: None,
            seen_dense: false,
            layers: Vec::new(),
        }
    }

    fn push(&mut self, index: usize, token: &LayerToken) -> Result<()> {
        match token.kind.as_str() {
            "input" => self.input(index, &token.args),
            "dense" => self.dense(index, &token.args),
            "dropout" => self.dropout(index, &token.args),
            name => Err(CompileError::UnsupportedLayerKind {
                index,
                name: name.to_string(),
            }),
        }
    }

    fn input(&mut self, index: usize, args: &[LayerArgument]) -> Result<()> {
        if self.seen_dense {
            return Err(CompileError::MisplacedInput { index });
        }

        let [arg] = args else {
            return Err(invalid(index, "Input", "expected exactly one argument, Input(dim)"));
        };

        let dim = positive(arg).ok_or_else(|| {
            invalid(index, "Input", format!("dim must be a positive integer, got '{arg}'"))
        })?;

        trace!(index = index; "input dimension {dim}");
        self.pending_input = Some((dim, self.layers.len()));
        Ok(())
    }

    fn dense(&mut self, index: usize, args: &[LayerArgument]) -> Result<()> {
        let (units, activation) = match args {
            [units] => (units, None),
            [units, activation] => (units, Some(activation)),
            _ => {
                return Err(invalid(
                    index,
                    "Dense",
                    format!("expected Dense(units, [activation]), got {} arguments", args.len()),
                ));
            }
        };

        let units = positive(units).ok_or_else(|| {
            invalid(index, "Dense", format!("units must be a positive integer, got '{units}'"))
        })?;

        let activation = activation
            .map(|arg| activation_of(index, arg))
            .transpose()?;

        let input_dim = if self.seen_dense {
            None
        } else {
            let pending = self.pending_input.take().map(|(dim, _)| dim);
            let dim = self
                .explicit_input_dim
                .or(pending)
                .ok_or(CompileError::MissingInputDimension { index })?;
            Some(dim)
        };

        trace!(index = index; "dense layer with {units} units");
        self.seen_dense = true;
        self.layers.push(LayerSpec::Dense {
            units,
            activation,
            input_dim,
        });
        Ok(())
    }

    fn dropout(&mut self, index: usize, args: &[LayerArgument]) -> Result<()> {
        let [arg] = args else {
            return Err(invalid(index, "Dropout", "expected exactly one argument, Dropout(rate)"));
        };

        let rate = arg.as_f64().ok_or_else(|| {
            invalid(index, "Dropout", format!("rate must be numeric, got '{arg}'"))
        })?;

        if !(0. ..1.).contains(&rate) {
            return Err(CompileError::InvalidDropoutRate { index, rate });
        }

        trace!(index = index; "dropout layer with rate {rate}");
        self.layers.push(LayerSpec::Dropout { rate });
        Ok(())
    }

    fn finish(mut self) -> Result<ArchitectureSpec> {
        // An input no dense layer consumed stays where it was declared.
        if let Some((dim, at)) = self.pending_input {
            let dim = self.explicit_input_dim.unwrap_or(dim);
            self.layers.insert(at, LayerSpec::Input { dim });
        }

        ArchitectureSpec::try_from(self.layers)
    }
}

fn positive(arg: &LayerArgument) -> Option<NonZeroUsize> {
    match arg {
        LayerArgument::Int(i) => usize::try_from(*i).ok().and_then(NonZeroUsize::new),
        _ => None,
    }
}

fn activation_of(index: usize, arg: &LayerArgument) -> Result<Activation> {
    let unsupported = || CompileError::UnsupportedActivation {
        index,
        name: arg.to_string(),
    };

    match arg {
        LayerArgument::Token(name) => activations::lookup(name).map_err(|_| unsupported()),
        _ => Err(unsupported()),
    }
}

fn invalid(index: usize, layer: &'static str, reason: impl Into<String>) -> CompileError {
    CompileError::InvalidArguments {
        index,
        layer,
        reason: reason.into(),
    }
}
