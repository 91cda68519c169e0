/// A `ParamGen` generates values for the initial state of a layer's parameters.
pub trait ParamGen {
    /// Should sample at most `n` parameters.
    ///
    /// # Arguments
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// An option whether the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f32>>;

    /// Samples exactly `n` parameters.
    ///
    /// # Returns
    /// The sample, or `Err` with the amount of parameters the generator could provide.
    fn sample_exact(&mut self, n: usize) -> Result<Vec<f32>, usize> {
        match self.sample(n) {
            Some(sample) if sample.len() == n => Ok(sample),
            Some(sample) => Err(sample.len()),
            None if n == 0 => Ok(Vec::new()),
            None => Err(0),
        }
    }
}
