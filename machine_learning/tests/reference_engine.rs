use std::num::NonZeroUsize;

use machine_learning::{MlErr, NetworkBuilder, Sequential, build};
use mlp_compiler::{Activation, ArchitectureSpec, compile};
use ndarray::Array2;
use rand::{SeedableRng, rngs::StdRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn compiled(arch: &str, input_dim: Option<usize>) -> ArchitectureSpec {
    compile(arch, input_dim.and_then(NonZeroUsize::new)).unwrap()
}

fn weights(network: &Sequential) -> Vec<Array2<f32>> {
    network
        .layers()
        .iter()
        .map(|layer| layer.weights().to_owned())
        .collect()
}

#[test]
fn prediction_shape_follows_the_spec() {
    init_logger();

    let spec = compiled(
        "Input(12) -> Dense(8, relu) -> Dropout(0.3) -> Dense(5, sigmoid) -> Dense(3)",
        None,
    );
    let network = build(&spec, Some(StdRng::seed_from_u64(1))).unwrap();

    for batch in [1, 7, 32] {
        let x = Array2::<f32>::ones((batch, 12));
        let y = network.predict(x.view()).unwrap();
        assert_eq!(y.dim(), (batch, 3));
    }
}

#[test]
fn same_seed_same_weights() {
    init_logger();

    let spec = compiled("Dense(16, relu) -> Dense(4, tanh)", Some(10));
    let a = NetworkBuilder::new().build_seeded(&spec, 42).unwrap();
    let b = NetworkBuilder::new().build_seeded(&spec, 42).unwrap();
    let c = NetworkBuilder::new().build_seeded(&spec, 43).unwrap();

    assert_eq!(weights(&a), weights(&b));
    assert_ne!(weights(&a), weights(&c));

    let x = Array2::from_shape_fn((3, 10), |(i, j)| (i * 10 + j) as f32 / 30.);
    assert_eq!(a.predict(x.view()).unwrap(), b.predict(x.view()).unwrap());
}

#[test]
fn entropy_seeded_builds_work() {
    init_logger();

    let spec = compiled("Dense(2, linear)", Some(3));
    let network = build(&spec, None).unwrap();

    assert_eq!(network.input_dim(), 3);
    assert_eq!(network.output_dim(), 2);
}

#[test]
fn predict_rejects_wrong_input_width() {
    init_logger();

    let spec = compiled("Dense(4, relu) -> Dense(2)", Some(6));
    let network = NetworkBuilder::new().build_seeded(&spec, 0).unwrap();
    let x = Array2::<f32>::zeros((2, 5));

    let err = network.predict(x.view()).unwrap_err();
    assert!(matches!(
        err,
        MlErr::ShapeMismatch {
            got: 5,
            expected: 6
        }
    ));
}

#[test]
fn dropout_only_architectures_cannot_be_built() {
    init_logger();

    let spec = compiled("Dropout(0.5)", None);
    let err = build(&spec, Some(StdRng::seed_from_u64(0))).unwrap_err();

    assert!(matches!(err, MlErr::EmptyNetwork));
}

#[test]
fn softmax_is_left_to_the_training_backend() {
    init_logger();

    let spec = compiled(
        "Dense(300, relu) -> Dropout(0.2) -> Dense(100, relu) -> Dense(10, softmax)",
        Some(784),
    );
    let err = build(&spec, Some(StdRng::seed_from_u64(0))).unwrap_err();

    assert!(matches!(
        err,
        MlErr::UnsupportedByReferenceEngine {
            activation: Activation::Softmax
        }
    ));
}

#[test]
fn relu_networks_are_non_negative() {
    init_logger();

    let spec = compiled("Dense(6, tanh) -> Dense(4, relu)", Some(3));
    let network = NetworkBuilder::new().build_seeded(&spec, 9).unwrap();
    let x = Array2::from_shape_fn((5, 3), |(i, j)| i as f32 - j as f32);

    let y = network.predict(x.view()).unwrap();
    assert!(y.iter().all(|v| *v >= 0.));
}

#[test]
fn oversized_layers_fail_to_build() {
    init_logger();

    let spec = compiled("Dense(4294967296)", Some(4294967296));
    let err = NetworkBuilder::new().build_seeded(&spec, 0).unwrap_err();

    assert!(matches!(err, MlErr::Init(_)));
}
