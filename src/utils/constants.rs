/// Gravitational acceleration used by the dynamics and the milli-g
/// accelerometer scaling [m/s^2]
pub const GRAVITY: f64 = 9.81;

// ISA barometric constants
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 101_325.0; // Pa
pub const ISA_SEA_LEVEL_TEMP: f64 = 288.15; // K
pub const ISA_LAPSE_RATE: f64 = -0.0065; // K/m
pub const ISA_GRAVITY: f64 = 9.80665; // m/s^2
pub const ISA_AIR_MOLAR_MASS: f64 = 0.028_964_4; // kg/mol
pub const ISA_GAS_CONSTANT: f64 = 8.31432; // J/(mol*K)
pub const SEA_LEVEL_DENSITY: f64 = 1.225; // kg/m^3

/// WGS84 semi-major axis, used for the flat-earth projection [m]
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Geodetic origin of the NED frame [deg]
pub const INITIAL_LAT: f64 = 49.766_809;
pub const INITIAL_LON: f64 = -7.557_159_8;

/// Default macro-step of the fixed-step integrator [s]
pub const DEFAULT_TIMESTEP: f64 = 0.01;
