mod vector;

pub use vector::{StateDerivative, StateVector};
