use crossbeam_channel::Receiver;
use std::path::Path;
use std::sync::Arc;

use crate::config::DroneConfig;
use crate::environment::EnvironmentProvider;
use crate::mavlink::MavFrame;
use crate::physics::{ControllerSet, GroundContact, MixedEom, RungeKutta4};
use crate::sim::{Clock, HilController, MessageRelay};
use crate::state::{StateDerivative, StateVector};
use crate::telemetry::StateEncoder;
use crate::utils::SimError;

/// The simulated vehicle: a composition of the mixed EOM, the fixed-step
/// integrator, the ground corrector, the actuator controllers, the sensor
/// encoder and the HIL loop state, wired to the host's relay, clock and
/// environment at construction.
pub struct Drone {
    controllers: ControllerSet,
    eom: MixedEom,
    ground: GroundContact,
    encoder: StateEncoder,
    hil: HilController,
    state: StateVector,
    derivative: StateDerivative,
    queue: Receiver<MavFrame>,
    relay: Arc<dyn MessageRelay>,
    clock: Arc<dyn Clock>,
    environment: Arc<dyn EnvironmentProvider>,
}

impl Drone {
    pub fn new(
        config: DroneConfig,
        relay: Arc<dyn MessageRelay>,
        clock: Arc<dyn Clock>,
        environment: Arc<dyn EnvironmentProvider>,
    ) -> Result<Self, SimError> {
        let (sender, queue) = crossbeam_channel::unbounded();
        relay.add_message_handler(sender);

        let mut state = StateVector::default();
        // Seeded forward speed: keeps the aero model's rate terms finite
        // on the very first derivative evaluation
        state[3] = 28.0;

        log::info!("drone '{}' initialized, mass {} kg", config.name, config.mass);

        Ok(Self {
            controllers: ControllerSet::new(&config.controllers),
            eom: MixedEom::new(&config)?,
            ground: GroundContact::default(),
            encoder: StateEncoder::new(),
            hil: HilController::new(),
            state,
            derivative: StateDerivative::default(),
            queue,
            relay,
            clock,
            environment,
        })
    }

    pub fn from_config_file<P: AsRef<Path>>(
        path: P,
        relay: Arc<dyn MessageRelay>,
        clock: Arc<dyn Clock>,
        environment: Arc<dyn EnvironmentProvider>,
    ) -> Result<Self, SimError> {
        let config = DroneConfig::from_file(path)?;
        Self::new(config, relay, clock, environment)
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn derivative(&self) -> &StateDerivative {
        &self.derivative
    }

    pub fn airborne(&self) -> bool {
        self.eom.airborne()
    }

    pub fn armed(&self) -> bool {
        self.hil.armed()
    }

    /// One simulation tick: drain inbound commands, advance the dynamics,
    /// enforce ground contact, then publish telemetry behind the lockstep
    /// gate.
    pub fn update(&mut self, dt_us: u64) {
        self.drain_inbound();
        self.advance_dynamics(dt_us);

        if !self.hil.should_publish() {
            // The autopilot has not consumed the previous tick yet
            return;
        }
        self.clock.unlock_time();
        self.publish_state();
    }

    fn drain_inbound(&mut self) {
        while let Ok(frame) = self.queue.try_recv() {
            if let Some(reply) = self.hil.handle_frame(&frame, &mut self.controllers) {
                if self.relay.connection_open() {
                    self.relay.enqueue_message(reply);
                }
            }
        }
    }

    fn advance_dynamics(&mut self, dt_us: u64) {
        let dt = dt_us as f64 * 1e-6;
        let t = self.clock.current_time_us() as f64 * 1e-6;

        let Self {
            eom,
            controllers,
            state,
            ..
        } = self;
        let sample = controllers.sample(dt);
        let derivative =
            RungeKutta4::new(dt).step(t, state, |t, x| eom.evaluate(t, x, &sample));
        self.derivative = derivative;

        if self.ground.apply(&mut self.state, &mut self.derivative, dt) {
            self.eom.set_grounded();
        }
    }

    fn publish_state(&mut self) {
        if !self.relay.connection_open() {
            return;
        }
        let now_us = self.clock.current_time_us();

        if self.hil.take_sys_time_due() {
            self.relay
                .enqueue_message(self.encoder.system_time(now_us).into_frame());
        }

        self.relay.enqueue_message(
            self.encoder
                .hil_gps(now_us, &self.state, &self.derivative)
                .into_frame(),
        );
        self.relay.enqueue_message(
            self.encoder
                .hil_sensor(
                    now_us,
                    &self.state,
                    &self.derivative,
                    self.environment.temperature(),
                )
                .into_frame(),
        );
        self.hil.note_published();

        if self.hil.telemetry_due(now_us) {
            let wind = self.environment.environment_wind();
            self.relay.enqueue_message(
                self.encoder
                    .hil_state_quaternion(now_us, &self.state, &self.derivative, &wind)
                    .into_frame(),
            );
            self.hil.note_telemetry(now_us);
        }
    }
}
