pub mod controllers;
pub mod eom;
pub mod forces;
pub mod ground;
pub mod integrator;
pub mod rotation;

pub use controllers::{ActuatorController, ControlSample, ControllerSet};
pub use eom::MixedEom;
pub use forces::{Aerodynamic, FixedWingThrust, ForceModel, QuadRotorThrust, Weight};
pub use ground::GroundContact;
pub use integrator::RungeKutta4;
