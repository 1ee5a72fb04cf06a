use byteorder::{ByteOrder, LittleEndian};

use crate::mavlink::{MavFrame, COMPONENT_ID, SYSTEM_ID};

pub const MAV_MODE_FLAG_SAFETY_ARMED: u8 = 128;
pub const MAV_CMD_SET_MESSAGE_INTERVAL: u16 = 511;
pub const MAV_RESULT_ACCEPTED: u8 = 0;
pub const GPS_FIX_TYPE_3D: u8 = 3;

/// Zero-extend a possibly truncated v2 payload to the full wire length
fn padded<const N: usize>(payload: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    let n = payload.len().min(N);
    buf[..n].copy_from_slice(&payload[..n]);
    buf
}

fn frame(message_id: u32, payload: Vec<u8>) -> MavFrame {
    MavFrame {
        system_id: SYSTEM_ID,
        component_id: COMPONENT_ID,
        message_id,
        payload,
    }
}

/// HEARTBEAT (#0), inbound only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heartbeat {
    pub custom_mode: u32,
    pub mav_type: u8,
    pub autopilot: u8,
    pub base_mode: u8,
    pub system_status: u8,
    pub mavlink_version: u8,
}

impl Heartbeat {
    pub const ID: u32 = 0;
    pub const CRC_EXTRA: u8 = 50;
    pub const LEN: usize = 9;

    pub fn unpack(payload: &[u8]) -> Self {
        let buf: [u8; Self::LEN] = padded(payload);
        Self {
            custom_mode: LittleEndian::read_u32(&buf[0..]),
            mav_type: buf[4],
            autopilot: buf[5],
            base_mode: buf[6],
            system_status: buf[7],
            mavlink_version: buf[8],
        }
    }
}

/// SYSTEM_TIME (#2), outbound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemTime {
    pub time_unix_usec: u64,
    pub time_boot_ms: u32,
}

impl SystemTime {
    pub const ID: u32 = 2;
    pub const CRC_EXTRA: u8 = 137;
    pub const LEN: usize = 12;

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        LittleEndian::write_u64(&mut buf[0..], self.time_unix_usec);
        LittleEndian::write_u32(&mut buf[8..], self.time_boot_ms);
        buf
    }

    pub fn into_frame(self) -> MavFrame {
        frame(Self::ID, self.pack())
    }
}

/// COMMAND_LONG (#76), inbound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandLong {
    pub param1: f32,
    pub param2: f32,
    pub param3: f32,
    pub param4: f32,
    pub param5: f32,
    pub param6: f32,
    pub param7: f32,
    pub command: u16,
    pub target_system: u8,
    pub target_component: u8,
    pub confirmation: u8,
}

impl CommandLong {
    pub const ID: u32 = 76;
    pub const CRC_EXTRA: u8 = 152;
    pub const LEN: usize = 33;

    pub fn unpack(payload: &[u8]) -> Self {
        let buf: [u8; Self::LEN] = padded(payload);
        Self {
            param1: LittleEndian::read_f32(&buf[0..]),
            param2: LittleEndian::read_f32(&buf[4..]),
            param3: LittleEndian::read_f32(&buf[8..]),
            param4: LittleEndian::read_f32(&buf[12..]),
            param5: LittleEndian::read_f32(&buf[16..]),
            param6: LittleEndian::read_f32(&buf[20..]),
            param7: LittleEndian::read_f32(&buf[24..]),
            command: LittleEndian::read_u16(&buf[28..]),
            target_system: buf[30],
            target_component: buf[31],
            confirmation: buf[32],
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        LittleEndian::write_f32(&mut buf[0..], self.param1);
        LittleEndian::write_f32(&mut buf[4..], self.param2);
        LittleEndian::write_f32(&mut buf[8..], self.param3);
        LittleEndian::write_f32(&mut buf[12..], self.param4);
        LittleEndian::write_f32(&mut buf[16..], self.param5);
        LittleEndian::write_f32(&mut buf[20..], self.param6);
        LittleEndian::write_f32(&mut buf[24..], self.param7);
        LittleEndian::write_u16(&mut buf[28..], self.command);
        buf[30] = self.target_system;
        buf[31] = self.target_component;
        buf[32] = self.confirmation;
        buf
    }
}

/// COMMAND_ACK (#77), outbound; extension fields stay zero and truncate away
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandAck {
    pub command: u16,
    pub result: u8,
}

impl CommandAck {
    pub const ID: u32 = 77;
    pub const CRC_EXTRA: u8 = 143;
    pub const LEN: usize = 3;

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        LittleEndian::write_u16(&mut buf[0..], self.command);
        buf[2] = self.result;
        buf
    }

    pub fn into_frame(self) -> MavFrame {
        frame(Self::ID, self.pack())
    }

    pub fn unpack(payload: &[u8]) -> Self {
        let buf: [u8; Self::LEN] = padded(payload);
        Self {
            command: LittleEndian::read_u16(&buf[0..]),
            result: buf[2],
        }
    }
}

/// HIL_ACTUATOR_CONTROLS (#93), inbound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilActuatorControls {
    pub time_usec: u64,
    pub flags: u64,
    pub controls: [f32; 16],
    pub mode: u8,
}

impl HilActuatorControls {
    pub const ID: u32 = 93;
    pub const CRC_EXTRA: u8 = 47;
    pub const LEN: usize = 81;

    pub fn unpack(payload: &[u8]) -> Self {
        let buf: [u8; Self::LEN] = padded(payload);
        let mut controls = [0.0f32; 16];
        for (i, value) in controls.iter_mut().enumerate() {
            *value = LittleEndian::read_f32(&buf[16 + 4 * i..]);
        }
        Self {
            time_usec: LittleEndian::read_u64(&buf[0..]),
            flags: LittleEndian::read_u64(&buf[8..]),
            controls,
            mode: buf[80],
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        LittleEndian::write_u64(&mut buf[0..], self.time_usec);
        LittleEndian::write_u64(&mut buf[8..], self.flags);
        for (i, value) in self.controls.iter().enumerate() {
            LittleEndian::write_f32(&mut buf[16 + 4 * i..], *value);
        }
        buf[80] = self.mode;
        buf
    }
}

/// HIL_SENSOR (#107), outbound; the `id` extension stays zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilSensor {
    pub time_usec: u64,
    pub xacc: f32,
    pub yacc: f32,
    pub zacc: f32,
    pub xgyro: f32,
    pub ygyro: f32,
    pub zgyro: f32,
    pub xmag: f32,
    pub ymag: f32,
    pub zmag: f32,
    pub abs_pressure: f32,
    pub diff_pressure: f32,
    pub pressure_alt: f32,
    pub temperature: f32,
    pub fields_updated: u32,
}

impl HilSensor {
    pub const ID: u32 = 107;
    pub const CRC_EXTRA: u8 = 108;
    pub const LEN: usize = 64;

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        LittleEndian::write_u64(&mut buf[0..], self.time_usec);
        let floats = [
            self.xacc,
            self.yacc,
            self.zacc,
            self.xgyro,
            self.ygyro,
            self.zgyro,
            self.xmag,
            self.ymag,
            self.zmag,
            self.abs_pressure,
            self.diff_pressure,
            self.pressure_alt,
            self.temperature,
        ];
        for (i, value) in floats.iter().enumerate() {
            LittleEndian::write_f32(&mut buf[8 + 4 * i..], *value);
        }
        LittleEndian::write_u32(&mut buf[60..], self.fields_updated);
        buf
    }

    pub fn into_frame(self) -> MavFrame {
        frame(Self::ID, self.pack())
    }

    pub fn unpack(payload: &[u8]) -> Self {
        let buf: [u8; Self::LEN] = padded(payload);
        let f = |i: usize| LittleEndian::read_f32(&buf[8 + 4 * i..]);
        Self {
            time_usec: LittleEndian::read_u64(&buf[0..]),
            xacc: f(0),
            yacc: f(1),
            zacc: f(2),
            xgyro: f(3),
            ygyro: f(4),
            zgyro: f(5),
            xmag: f(6),
            ymag: f(7),
            zmag: f(8),
            abs_pressure: f(9),
            diff_pressure: f(10),
            pressure_alt: f(11),
            temperature: f(12),
            fields_updated: LittleEndian::read_u32(&buf[60..]),
        }
    }
}

/// HIL_GPS (#113), outbound, with the `id`/`yaw` extension fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilGps {
    pub time_usec: u64,
    pub lat: i32,
    pub lon: i32,
    pub alt: i32,
    pub eph: u16,
    pub epv: u16,
    pub vel: u16,
    pub vn: i16,
    pub ve: i16,
    pub vd: i16,
    pub cog: u16,
    pub fix_type: u8,
    pub satellites_visible: u8,
    pub id: u8,
    pub yaw: u16,
}

impl HilGps {
    pub const ID: u32 = 113;
    pub const CRC_EXTRA: u8 = 124;
    pub const LEN: usize = 39;

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        LittleEndian::write_u64(&mut buf[0..], self.time_usec);
        LittleEndian::write_i32(&mut buf[8..], self.lat);
        LittleEndian::write_i32(&mut buf[12..], self.lon);
        LittleEndian::write_i32(&mut buf[16..], self.alt);
        LittleEndian::write_u16(&mut buf[20..], self.eph);
        LittleEndian::write_u16(&mut buf[22..], self.epv);
        LittleEndian::write_u16(&mut buf[24..], self.vel);
        LittleEndian::write_i16(&mut buf[26..], self.vn);
        LittleEndian::write_i16(&mut buf[28..], self.ve);
        LittleEndian::write_i16(&mut buf[30..], self.vd);
        LittleEndian::write_u16(&mut buf[32..], self.cog);
        buf[34] = self.fix_type;
        buf[35] = self.satellites_visible;
        buf[36] = self.id;
        LittleEndian::write_u16(&mut buf[37..], self.yaw);
        buf
    }

    pub fn into_frame(self) -> MavFrame {
        frame(Self::ID, self.pack())
    }

    pub fn unpack(payload: &[u8]) -> Self {
        let buf: [u8; Self::LEN] = padded(payload);
        Self {
            time_usec: LittleEndian::read_u64(&buf[0..]),
            lat: LittleEndian::read_i32(&buf[8..]),
            lon: LittleEndian::read_i32(&buf[12..]),
            alt: LittleEndian::read_i32(&buf[16..]),
            eph: LittleEndian::read_u16(&buf[20..]),
            epv: LittleEndian::read_u16(&buf[22..]),
            vel: LittleEndian::read_u16(&buf[24..]),
            vn: LittleEndian::read_i16(&buf[26..]),
            ve: LittleEndian::read_i16(&buf[28..]),
            vd: LittleEndian::read_i16(&buf[30..]),
            cog: LittleEndian::read_u16(&buf[32..]),
            fix_type: buf[34],
            satellites_visible: buf[35],
            id: buf[36],
            yaw: LittleEndian::read_u16(&buf[37..]),
        }
    }
}

/// HIL_STATE_QUATERNION (#115), outbound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HilStateQuaternion {
    pub time_usec: u64,
    pub attitude_quaternion: [f32; 4],
    pub rollspeed: f32,
    pub pitchspeed: f32,
    pub yawspeed: f32,
    pub lat: i32,
    pub lon: i32,
    pub alt: i32,
    pub vx: i16,
    pub vy: i16,
    pub vz: i16,
    pub ind_airspeed: u16,
    pub true_airspeed: u16,
    pub xacc: i16,
    pub yacc: i16,
    pub zacc: i16,
}

impl HilStateQuaternion {
    pub const ID: u32 = 115;
    pub const CRC_EXTRA: u8 = 4;
    pub const LEN: usize = 64;

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = vec![0u8; Self::LEN];
        LittleEndian::write_u64(&mut buf[0..], self.time_usec);
        for (i, value) in self.attitude_quaternion.iter().enumerate() {
            LittleEndian::write_f32(&mut buf[8 + 4 * i..], *value);
        }
        LittleEndian::write_f32(&mut buf[24..], self.rollspeed);
        LittleEndian::write_f32(&mut buf[28..], self.pitchspeed);
        LittleEndian::write_f32(&mut buf[32..], self.yawspeed);
        LittleEndian::write_i32(&mut buf[36..], self.lat);
        LittleEndian::write_i32(&mut buf[40..], self.lon);
        LittleEndian::write_i32(&mut buf[44..], self.alt);
        LittleEndian::write_i16(&mut buf[48..], self.vx);
        LittleEndian::write_i16(&mut buf[50..], self.vy);
        LittleEndian::write_i16(&mut buf[52..], self.vz);
        LittleEndian::write_u16(&mut buf[54..], self.ind_airspeed);
        LittleEndian::write_u16(&mut buf[56..], self.true_airspeed);
        LittleEndian::write_i16(&mut buf[58..], self.xacc);
        LittleEndian::write_i16(&mut buf[60..], self.yacc);
        LittleEndian::write_i16(&mut buf[62..], self.zacc);
        buf
    }

    pub fn into_frame(self) -> MavFrame {
        frame(Self::ID, self.pack())
    }

    pub fn unpack(payload: &[u8]) -> Self {
        let buf: [u8; Self::LEN] = padded(payload);
        let mut attitude_quaternion = [0.0f32; 4];
        for (i, value) in attitude_quaternion.iter_mut().enumerate() {
            *value = LittleEndian::read_f32(&buf[8 + 4 * i..]);
        }
        Self {
            time_usec: LittleEndian::read_u64(&buf[0..]),
            attitude_quaternion,
            rollspeed: LittleEndian::read_f32(&buf[24..]),
            pitchspeed: LittleEndian::read_f32(&buf[28..]),
            yawspeed: LittleEndian::read_f32(&buf[32..]),
            lat: LittleEndian::read_i32(&buf[36..]),
            lon: LittleEndian::read_i32(&buf[40..]),
            alt: LittleEndian::read_i32(&buf[44..]),
            vx: LittleEndian::read_i16(&buf[48..]),
            vy: LittleEndian::read_i16(&buf[50..]),
            vz: LittleEndian::read_i16(&buf[52..]),
            ind_airspeed: LittleEndian::read_u16(&buf[54..]),
            true_airspeed: LittleEndian::read_u16(&buf[56..]),
            xacc: LittleEndian::read_i16(&buf[58..]),
            yacc: LittleEndian::read_i16(&buf[60..]),
            zacc: LittleEndian::read_i16(&buf[62..]),
        }
    }
}
