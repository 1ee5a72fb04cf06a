use nalgebra::Vector3;

use crate::environment::{isa_pressure, mag_field, ned_to_lla};
use crate::mavlink::{
    HilGps, HilSensor, HilStateQuaternion, SystemTime, GPS_FIX_TYPE_3D,
};
use crate::physics::rotation::{body2earth, euler_to_quaternion};
use crate::state::{StateDerivative, StateVector};
use crate::utils::{rad_to_deg, GRAVITY};

/// Vertical accelerations this close to zero come from the ground clamp;
/// the encoder substitutes the 1 g specific force a resting accelerometer
/// actually measures
const FAKE_GROUND_ACC_THRESHOLD: f64 = 1e-4;

/// All nine HIL_SENSOR field groups: accel, gyro, mag, baro fields,
/// differential pressure, pressure altitude and temperature
const SENSOR_FIELDS_UPDATED: u32 = 0b111 | 0b111000 | 0b111000000 | 0b1111000000000;

/// Projects the simulated state into the sensor messages the autopilot
/// expects. Every conversion here is ABI: scaling, rounding, slot order
/// and substitutions must match the consuming autopilot bit for bit.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateEncoder;

impl StateEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn hil_state_quaternion(
        &self,
        time_usec: u64,
        x: &StateVector,
        dx: &StateDerivative,
        wind: &Vector3<f64>,
    ) -> HilStateQuaternion {
        let att = x.attitude();
        let q = euler_to_quaternion(att.x, att.y, att.z);
        let rates = x.angular_velocity();
        let lla = ned_to_lla(&x.position());

        let ground_speed = dx.earth_velocity() * 100.0; // cm/s
        let acc = dx.body_acceleration();
        let zacc_mg = if acc.z.abs() < FAKE_GROUND_ACC_THRESHOLD {
            -1000.0
        } else {
            (acc.z / GRAVITY * 1000.0).round()
        };

        // Airspeed over ground plus wind, magnitude of the reversed sum
        let true_airspeed = (-(ground_speed + wind * 100.0)).norm();

        HilStateQuaternion {
            time_usec,
            attitude_quaternion: [q[0] as f32, q[1] as f32, q[2] as f32, q[3] as f32],
            rollspeed: rates.x as f32,
            pitchspeed: rates.y as f32,
            yawspeed: rates.z as f32,
            lat: (lla[0] * 1e7) as i32,
            lon: (lla[1] * 1e7) as i32,
            alt: (lla[2] * 1000.0) as i32,
            vx: ground_speed.x as i16,
            vy: ground_speed.y as i16,
            vz: ground_speed.z as i16,
            ind_airspeed: 0,
            true_airspeed: true_airspeed as u16,
            xacc: (acc.x / GRAVITY * 1000.0).round() as i16,
            yacc: (acc.y / GRAVITY * 1000.0).round() as i16,
            zacc: zacc_mg as i16,
        }
    }

    pub fn hil_sensor(
        &self,
        time_usec: u64,
        x: &StateVector,
        dx: &StateDerivative,
        temperature: f64,
    ) -> HilSensor {
        let acc = dx.body_acceleration();
        let zacc = if acc.z.abs() < FAKE_GROUND_ACC_THRESHOLD {
            -GRAVITY
        } else {
            acc.z
        };

        let rates = x.angular_velocity();
        let lla = ned_to_lla(&x.position());
        let mag = mag_field(lla[0], lla[1], lla[2]);

        HilSensor {
            time_usec,
            xacc: acc.x as f32,
            yacc: acc.y as f32,
            zacc: zacc as f32,
            xgyro: rates.x as f32,
            ygyro: rates.y as f32,
            zgyro: rates.z as f32,
            xmag: mag.x as f32,
            ymag: mag.y as f32,
            zmag: mag.z as f32,
            abs_pressure: (isa_pressure(lla[2]) / 100.0) as f32,
            diff_pressure: 0.0,
            pressure_alt: lla[2] as f32,
            temperature: temperature as f32,
            fields_updated: SENSOR_FIELDS_UPDATED,
        }
    }

    pub fn hil_gps(&self, time_usec: u64, x: &StateVector, dx: &StateDerivative) -> HilGps {
        let lla = ned_to_lla(&x.position());
        let lat_lon_alt = [lla[0] * 1e7, lla[1] * 1e7, lla[2] * 1000.0];

        let v_earth = body2earth(x) * x.velocity() * 100.0; // cm/s
        let ground_speed = (v_earth.x * v_earth.x + v_earth.y * v_earth.y).sqrt();

        // Course over ground keeps the original's argument order on the
        // body velocity pair; the autopilot was tuned against it
        let cog_cdeg = rad_to_deg(x[3].atan2(x[4])) * 100.0;

        let mut yaw_cdeg = (x[8] * 18_000.0 / std::f64::consts::PI).round() as i32;
        if yaw_cdeg == 0 {
            // 0 is reserved for "yaw unknown" on the wire
            yaw_cdeg = 1;
        }

        HilGps {
            time_usec,
            // lat and lon are swapped at this call site, exactly as the
            // consuming autopilot expects them
            lat: lat_lon_alt[1] as i32,
            lon: lat_lon_alt[0] as i32,
            alt: lat_lon_alt[2] as i32,
            eph: 30,
            epv: 40,
            vel: ground_speed as u16,
            vn: v_earth.x as i16,
            ve: v_earth.y as i16,
            vd: v_earth.z as i16,
            cog: cog_cdeg as i32 as u16,
            fix_type: GPS_FIX_TYPE_3D,
            satellites_visible: 255,
            id: 0,
            yaw: yaw_cdeg as u16,
        }
    }

    pub fn system_time(&self, sim_time_us: u64) -> SystemTime {
        let wall_us = chrono::Utc::now().timestamp_micros().max(0) as u64;
        SystemTime {
            time_unix_usec: wall_us,
            time_boot_ms: (sim_time_us / 1000) as u32,
        }
    }
}
