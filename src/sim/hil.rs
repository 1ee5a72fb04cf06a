use crate::mavlink::{
    CommandAck, CommandLong, Heartbeat, HilActuatorControls, MavFrame,
    MAV_CMD_SET_MESSAGE_INTERVAL, MAV_MODE_FLAG_SAFETY_ARMED, MAV_RESULT_ACCEPTED,
};
use crate::physics::ControllerSet;

/// Unanswered ticks allowed to publish before lockstep takes over; keeps
/// the stream alive while the autopilot boots
const LOCKSTEP_BOOTSTRAP_WINDOW: u32 = 300;

/// SYSTEM_TIME goes out once per this many published ticks
const SYS_TIME_THROTTLE: u32 = 1000;

/// Protocol-side state of the HIL loop: inbound dispatch, the lockstep
/// gate and the outbound telemetry cadence.
#[derive(Debug)]
pub struct HilController {
    armed: bool,
    should_reply_lockstep: bool,
    hil_actuator_controls_msg_n: u32,
    sys_time_throttle_counter: u32,
    last_autopilot_telemetry: u64,
    /// Period of HIL_STATE_QUATERNION [us]; 0 rides along with every tick
    hil_state_quaternion_message_frequency: u64,
}

impl Default for HilController {
    fn default() -> Self {
        Self {
            armed: false,
            should_reply_lockstep: false,
            hil_actuator_controls_msg_n: 0,
            sys_time_throttle_counter: 0,
            last_autopilot_telemetry: 0,
            hil_state_quaternion_message_frequency: 0,
        }
    }
}

impl HilController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn telemetry_period_us(&self) -> u64 {
        self.hil_state_quaternion_message_frequency
    }

    /// Dispatch one inbound frame. Actuator commands are routed into the
    /// controller set; COMMAND_LONG yields the COMMAND_ACK to send back.
    pub fn handle_frame(
        &mut self,
        frame: &MavFrame,
        controllers: &mut ControllerSet,
    ) -> Option<MavFrame> {
        match frame.message_id {
            Heartbeat::ID => {
                let heartbeat = Heartbeat::unpack(&frame.payload);
                log::debug!(
                    "heartbeat from {}/{}: status {}",
                    frame.system_id,
                    frame.component_id,
                    heartbeat.system_status
                );
                None
            }
            HilActuatorControls::ID => {
                let msg = HilActuatorControls::unpack(&frame.payload);
                self.set_armed(msg.mode & MAV_MODE_FLAG_SAFETY_ARMED != 0);

                let controls: Vec<f64> = msg.controls.iter().map(|&v| v as f64).collect();
                controllers.vtol_propellers.set_control(&controls[0..4]);
                controllers.ailerons.set_control(&controls[4..6]);
                controllers.thrust_propellers.set_control(&controls[8..9]);

                self.should_reply_lockstep = true;
                self.hil_actuator_controls_msg_n =
                    self.hil_actuator_controls_msg_n.saturating_add(1);
                None
            }
            CommandLong::ID => {
                let msg = CommandLong::unpack(&frame.payload);
                if msg.command == MAV_CMD_SET_MESSAGE_INTERVAL {
                    let period_us = msg.param2.max(0.0) as u64;
                    log::info!("autopilot telemetry interval set to {period_us} us");
                    self.hil_state_quaternion_message_frequency = period_us;
                } else {
                    log::warn!("unhandled command {} acknowledged", msg.command);
                }
                Some(
                    CommandAck {
                        command: msg.command,
                        result: MAV_RESULT_ACCEPTED,
                    }
                    .into_frame(),
                )
            }
            other => {
                log::debug!("ignoring message id {other}");
                None
            }
        }
    }

    /// Lockstep gate: publish when the autopilot consumed the previous
    /// tick, or while the bootstrap window is still open
    pub fn should_publish(&self) -> bool {
        self.should_reply_lockstep || self.hil_actuator_controls_msg_n < LOCKSTEP_BOOTSTRAP_WINDOW
    }

    /// Bookkeeping after GPS/sensor went out: a lockstep reply consumes
    /// the flag, a bootstrap publication uses up part of the window
    pub fn note_published(&mut self) {
        if self.should_reply_lockstep {
            self.should_reply_lockstep = false;
        } else {
            self.hil_actuator_controls_msg_n = self.hil_actuator_controls_msg_n.saturating_add(1);
        }
    }

    /// Post-incremented modulo throttle: fires on the first published
    /// tick and every 1000th after it
    pub fn take_sys_time_due(&mut self) -> bool {
        let due = self.sys_time_throttle_counter % SYS_TIME_THROTTLE == 0;
        self.sys_time_throttle_counter = self.sys_time_throttle_counter.wrapping_add(1);
        due
    }

    pub fn telemetry_due(&self, now_us: u64) -> bool {
        now_us.saturating_sub(self.last_autopilot_telemetry)
            > self.hil_state_quaternion_message_frequency
    }

    pub fn note_telemetry(&mut self, now_us: u64) {
        self.last_autopilot_telemetry = now_us;
    }

    fn set_armed(&mut self, armed: bool) {
        if armed != self.armed {
            log::info!("vehicle {}", if armed { "armed" } else { "disarmed" });
        }
        self.armed = armed;
    }
}
