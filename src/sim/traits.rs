use crossbeam_channel::Sender;

use crate::mavlink::MavFrame;

/// Simulation time source. `unlock_time` releases whoever paces real-time
/// advance on the lockstep gate; free-running clocks treat it as a no-op.
pub trait Clock: Send + Sync {
    fn current_time_us(&self) -> u64;
    fn unlock_time(&self);
}

/// Bidirectional MAVLink frame transport. Inbound frames are fanned out
/// to every registered handler from the relay's I/O thread; outbound
/// frames are serialized in registration order.
pub trait MessageRelay: Send + Sync {
    fn add_message_handler(&self, handler: Sender<MavFrame>);
    fn enqueue_message(&self, frame: MavFrame);
    fn connection_open(&self) -> bool;
}
