//! Inference for classifier models: small MLPs loaded from JSON and
//! evaluated on the CPU. No training code lives here.

pub mod dense;

pub use dense::{Activation, DenseLayer, DenseNetwork};
