use std::{cell::RefCell, rc::Rc};

use mlp_compiler::Activation;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{ParamGen, RandErr, Result};

/// A parameter generator that follows a certain probabilistic distribution.
///
/// The random number generator is shared between the generators of every layer of a network, so
/// seeding it once pins the whole initialization.
pub struct RandParamGen<R: Rng, D: Distribution<f32>> {
    rng: Rc<RefCell<R>>,
    distribution: D,
    remaining: usize,
}

impl<R: Rng, D: Distribution<f32>> RandParamGen<R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: Rc<RefCell<R>>, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
        }
    }
}

impl<R: Rng> RandParamGen<R, Normal<f32>> {
    /// Creates a new `RandParamGen` parameter generator with a normal distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `mean` - The mean of the distribution.
    /// * `std_dev` - The standard deviation of the distribution.
    ///
    /// # Returns
    /// An error if `std_dev` is negative or not finite.
    pub fn normal(rng: Rc<RefCell<R>>, limit: usize, mean: f32, std_dev: f32) -> Result<Self> {
        if !std_dev.is_finite() || std_dev < 0. {
            return Err(RandErr::new(format!(
                "standard deviation must be finite and non-negative, got {std_dev}"
            )));
        }

        Ok(Self::new(rng, Normal::new(mean, std_dev)?, limit))
    }

    /// Creates a new `RandParamGen` parameter generator using Kaiming normal initialization,
    /// suited for layers followed by a ReLU.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of input units in the weight tensor.
    /// * `scale` - A factor applied to the standard deviation.
    pub fn kaiming(rng: Rc<RefCell<R>>, limit: usize, fan_in: usize, scale: f32) -> Result<Self> {
        let std_dev = (2. / fan_in as f32).sqrt() * scale;
        Self::normal(rng, limit, 0., std_dev)
    }

    /// Creates a new `RandParamGen` parameter generator using LeCun normal initialization.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of input units in the weight tensor.
    /// * `scale` - A factor applied to the standard deviation.
    pub fn lecun(rng: Rc<RefCell<R>>, limit: usize, fan_in: usize, scale: f32) -> Result<Self> {
        let std_dev = (1. / fan_in as f32).sqrt() * scale;
        Self::normal(rng, limit, 0., std_dev)
    }

    /// Picks the initialization for the weights of a dense layer given its activation: Kaiming
    /// for `relu`, LeCun for everything else.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `dim` - The `(in, out)` dimensions of the weight matrix.
    /// * `activation` - The activation of the layer.
    /// * `scale` - A factor applied to the standard deviation.
    ///
    /// # Returns
    /// An error if the weight matrix is too large to be indexed or `scale` is negative or not
    /// finite.
    pub fn for_dense(
        rng: Rc<RefCell<R>>,
        dim: (usize, usize),
        activation: Option<Activation>,
        scale: f32,
    ) -> Result<Self> {
        let (fan_in, fan_out) = dim;
        let limit = fan_in.checked_mul(fan_out).ok_or_else(|| {
            RandErr::new(format!("a {fan_in}x{fan_out} weight matrix is too large"))
        })?;

        match activation {
            Some(Activation::Relu) => Self::kaiming(rng, limit, fan_in, scale),
            _ => Self::lecun(rng, limit, fan_in, scale),
        }
    }
}

impl<R: Rng, D: Distribution<f32>> ParamGen for RandParamGen<R, D> {
    fn sample(&mut self, mut n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let mut rng = self.rng.borrow_mut();
        let sample = (0..n)
            .map(|_| self.distribution.sample(&mut *rng))
            .collect();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn seeded_rng(seed: u64) -> Rc<RefCell<StdRng>> {
        Rc::new(RefCell::new(StdRng::seed_from_u64(seed)))
    }

    fn std_dev(sample: &[f32]) -> f32 {
        let n = sample.len() as f32;
        let mean = sample.iter().sum::<f32>() / n;
        let var = sample.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
        var.sqrt()
    }

    #[test]
    fn stops_at_the_limit() {
        let mut param_gen = RandParamGen::normal(seeded_rng(42), 10, 0., 1.).unwrap();

        assert_eq!(param_gen.sample(7).unwrap().len(), 7);
        assert_eq!(param_gen.sample(7).unwrap().len(), 3);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn sample_exact_reports_shortfalls() {
        let mut param_gen = RandParamGen::normal(seeded_rng(42), 3, 0., 1.).unwrap();
        assert_eq!(param_gen.sample_exact(5), Err(3));
        assert_eq!(param_gen.sample_exact(1), Err(0));
    }

    #[test]
    fn same_seed_same_sample() {
        let a = RandParamGen::normal(seeded_rng(7), 32, 0., 1.)
            .unwrap()
            .sample(32)
            .unwrap();
        let b = RandParamGen::normal(seeded_rng(7), 32, 0., 1.)
            .unwrap()
            .sample(32)
            .unwrap();
        let c = RandParamGen::normal(seeded_rng(8), 32, 0., 1.)
            .unwrap()
            .sample(32)
            .unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn shared_rng_advances_across_generators() {
        let rng = seeded_rng(3);
        let a = RandParamGen::normal(rng.clone(), 4, 0., 1.).unwrap().sample(4).unwrap();
        let b = RandParamGen::normal(rng, 4, 0., 1.).unwrap().sample(4).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn scale_follows_the_activation() {
        const FAN_IN: usize = 50;
        const LIMIT: usize = FAN_IN * 400;

        let relu = RandParamGen::for_dense(seeded_rng(1), (FAN_IN, 400), Some(Activation::Relu), 1.)
            .unwrap()
            .sample(LIMIT)
            .unwrap();
        let tanh = RandParamGen::for_dense(seeded_rng(1), (FAN_IN, 400), Some(Activation::Tanh), 1.)
            .unwrap()
            .sample(LIMIT)
            .unwrap();

        assert!((std_dev(&relu) - (2. / FAN_IN as f32).sqrt()).abs() < 0.01);
        assert!((std_dev(&tanh) - (1. / FAN_IN as f32).sqrt()).abs() < 0.01);
    }

    #[test]
    fn weight_scale_multiplies_the_std_dev() {
        let base = RandParamGen::lecun(seeded_rng(5), 16, 4, 1.).unwrap().sample(16).unwrap();
        let doubled = RandParamGen::lecun(seeded_rng(5), 16, 4, 2.).unwrap().sample(16).unwrap();

        for (b, d) in base.iter().zip(&doubled) {
            assert!((2. * b - d).abs() < 1e-5);
        }
    }

    #[test]
    fn rejects_invalid_scales() {
        assert!(RandParamGen::lecun(seeded_rng(0), 4, 2, f32::NAN).is_err());
        assert!(RandParamGen::lecun(seeded_rng(0), 4, 2, f32::INFINITY).is_err());
        assert!(RandParamGen::kaiming(seeded_rng(0), 4, 2, -1.).is_err());
        assert!(RandParamGen::normal(seeded_rng(0), 4, 0., -0.5).is_err());
        assert!(RandParamGen::lecun(seeded_rng(0), 4, 2, 0.).is_ok());
    }

    #[test]
    fn rejects_unindexable_weight_matrices() {
        let dim = (usize::MAX / 2, 3);
        assert!(RandParamGen::for_dense(seeded_rng(0), dim, None, 1.).is_err());
    }
}
