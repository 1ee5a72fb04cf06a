pub mod config;
pub mod environment;
pub mod mavlink;
pub mod physics;
pub mod sim;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use config::DroneConfig;
pub use environment::{ConstantEnvironment, EnvironmentProvider};
pub use sim::{Clock, Drone, LockstepClock, MessageRelay, TcpMessageRelay, WallClock};
pub use state::{StateDerivative, StateVector};
pub use utils::SimError;
