use std::net::TcpListener;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use hilsim::sim::{Clock, MessageRelay};
use hilsim::utils::DEFAULT_TIMESTEP;
use hilsim::{ConstantEnvironment, Drone, DroneConfig, EnvironmentProvider, LockstepClock, SimError, TcpMessageRelay};

/// PX4's conventional simulator port
const LISTEN_ADDR: &str = "0.0.0.0:4560";

/// How long a tick may wait for the autopilot before running anyway
const LOCKSTEP_STALL_GUARD: Duration = Duration::from_millis(50);

fn main() {
    env_logger::init();

    let config_path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: hilsim_serve <drone-config.yaml>");
            process::exit(2);
        }
    };

    if let Err(err) = run(&config_path) {
        log::error!("{err}");
        process::exit(1);
    }
}

fn run(config_path: &str) -> Result<(), SimError> {
    // Config problems are fatal before the first tick
    let config = DroneConfig::from_file(config_path)?;

    let listener = TcpListener::bind(LISTEN_ADDR)?;
    log::info!("waiting for autopilot on {}", listener.local_addr()?);
    let (stream, peer) = listener.accept()?;
    log::info!("autopilot connected from {peer}");

    let relay = TcpMessageRelay::start(stream)?;
    let clock = Arc::new(LockstepClock::new());
    let environment = Arc::new(ConstantEnvironment::default());

    let relay_dyn: Arc<dyn MessageRelay> = relay.clone();
    let clock_dyn: Arc<dyn Clock> = clock.clone();
    let environment_dyn: Arc<dyn EnvironmentProvider> = environment;
    let mut drone = Drone::new(config, relay_dyn, clock_dyn, environment_dyn)?;

    let step_us = (DEFAULT_TIMESTEP * 1e6) as u64;
    while relay.connection_open() {
        clock.advance(step_us);
        drone.update(step_us);

        // Lockstep pacing: a published tick unlocked the clock and we run
        // straight on; a gated tick waits for the autopilot up to the
        // stall guard so a silent peer cannot freeze the simulator
        clock.wait_unlocked(LOCKSTEP_STALL_GUARD);
    }

    log::info!("connection closed, simulator stopping");
    Ok(())
}
