mod clock;
mod drone;
mod hil;
mod relay;
mod traits;

pub use clock::{LockstepClock, WallClock};
pub use drone::Drone;
pub use hil::HilController;
pub use relay::TcpMessageRelay;
pub use traits::{Clock, MessageRelay};
