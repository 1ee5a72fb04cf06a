mod encoder;

pub use encoder::StateEncoder;
