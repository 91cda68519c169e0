pub mod activations;
pub mod layers;
mod neuron;
mod sequential;

pub use neuron::neuron_forward;
pub use sequential::Sequential;
