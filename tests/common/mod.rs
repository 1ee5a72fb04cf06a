#![allow(dead_code)]

use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hilsim::mavlink::{
    CommandLong, HilActuatorControls, MavFrame, COMPONENT_ID, SYSTEM_ID,
};
use hilsim::sim::{Clock, MessageRelay};
use hilsim::{ConstantEnvironment, Drone, DroneConfig};

/// Simulator macro-step used across the scenarios [us]
pub const STEP_US: u64 = 10_000;

/// In-memory relay: records every outbound frame, lets tests inject
/// inbound ones and flip the connection state
#[derive(Default)]
pub struct FakeRelay {
    sent: Mutex<Vec<MavFrame>>,
    handlers: Mutex<Vec<Sender<MavFrame>>>,
    open: AtomicBool,
}

impl FakeRelay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            open: AtomicBool::new(true),
            ..Self::default()
        })
    }

    pub fn inject(&self, frame: MavFrame) {
        for handler in self.handlers.lock().unwrap().iter() {
            handler.send(frame.clone()).unwrap();
        }
    }

    pub fn take_sent(&self) -> Vec<MavFrame> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }
}

impl MessageRelay for FakeRelay {
    fn add_message_handler(&self, handler: Sender<MavFrame>) {
        self.handlers.lock().unwrap().push(handler);
    }

    fn enqueue_message(&self, frame: MavFrame) {
        assert!(
            self.connection_open(),
            "enqueue_message called on a closed relay"
        );
        self.sent.lock().unwrap().push(frame);
    }

    fn connection_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// Test clock advanced by hand; counts lockstep unlocks
#[derive(Default)]
pub struct ManualClock {
    time_us: AtomicU64,
    unlocks: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn advance(&self, dt_us: u64) {
        self.time_us.fetch_add(dt_us, Ordering::SeqCst);
    }

    pub fn unlock_count(&self) -> u64 {
        self.unlocks.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn current_time_us(&self) -> u64 {
        self.time_us.load(Ordering::SeqCst)
    }

    fn unlock_time(&self) {
        self.unlocks.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct TestBench {
    pub relay: Arc<FakeRelay>,
    pub clock: Arc<ManualClock>,
    pub drone: Drone,
}

impl TestBench {
    pub fn new() -> Self {
        let relay = FakeRelay::new();
        let clock = ManualClock::new();
        let drone = Drone::new(
            DroneConfig::default(),
            relay.clone(),
            clock.clone(),
            Arc::new(ConstantEnvironment::default()),
        )
        .unwrap();
        Self {
            relay,
            clock,
            drone,
        }
    }

    /// Advance the clock and run one tick, returning the frames it emitted
    pub fn tick(&mut self) -> Vec<MavFrame> {
        self.clock.advance(STEP_US);
        self.drone.update(STEP_US);
        self.relay.take_sent()
    }

    pub fn run_ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }
}

pub fn actuator_frame(controls: [f32; 16], mode: u8) -> MavFrame {
    MavFrame {
        system_id: SYSTEM_ID,
        component_id: COMPONENT_ID,
        message_id: HilActuatorControls::ID,
        payload: HilActuatorControls {
            time_usec: 0,
            flags: 0,
            controls,
            mode,
        }
        .pack(),
    }
}

pub fn command_long_frame(command: u16, param1: f32, param2: f32) -> MavFrame {
    MavFrame {
        system_id: SYSTEM_ID,
        component_id: COMPONENT_ID,
        message_id: CommandLong::ID,
        payload: CommandLong {
            param1,
            param2,
            param3: 0.0,
            param4: 0.0,
            param5: 0.0,
            param6: 0.0,
            param7: 0.0,
            command,
            target_system: 1,
            target_component: 1,
            confirmation: 0,
        }
        .pack(),
    }
}
