use std::{
    error::Error,
    fmt::{self, Display},
};

use rand_distr::NormalError;

/// The specific result type for the different instances of `RandParamGen` generators.
pub type Result<T> = std::result::Result<T, RandErr>;

/// Error returned by the `RandParamGen` constructors whenever the distribution can't be built,
/// e.g. a weight scale that makes the standard deviation negative or not finite.
#[derive(Debug)]
pub struct RandErr(String);

impl RandErr {
    pub(super) fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<NormalError> for RandErr {
    fn from(value: NormalError) -> Self {
        Self(value.to_string())
    }
}

impl Display for RandErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for RandErr {}
