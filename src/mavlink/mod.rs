mod codec;
mod messages;

pub use codec::{FrameDecoder, FrameEncoder};
pub use messages::{
    CommandAck, CommandLong, Heartbeat, HilActuatorControls, HilGps, HilSensor,
    HilStateQuaternion, SystemTime, GPS_FIX_TYPE_3D, MAV_CMD_SET_MESSAGE_INTERVAL,
    MAV_MODE_FLAG_SAFETY_ARMED, MAV_RESULT_ACCEPTED,
};

/// System and component id of the simulated vehicle
pub const SYSTEM_ID: u8 = 1;
pub const COMPONENT_ID: u8 = 1;

/// One MAVLink v2 frame, transport-agnostic: routing header plus the
/// full-length (untruncated) payload of a known message
#[derive(Debug, Clone, PartialEq)]
pub struct MavFrame {
    pub system_id: u8,
    pub component_id: u8,
    pub message_id: u32,
    pub payload: Vec<u8>,
}
