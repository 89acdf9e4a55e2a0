use docking::logger::Logger;
use docking::*;
use rand::Rng;
use std::time::Duration;
use tokio::time;

/// Seconds to stay hard docked before undocking.
const HOLD_DOCKED: f32 = 2.0;

/// Two vessels drift together, dock once in range, hold, then undock.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Logger::init(log::LevelFilter::Debug);

    let configs = match std::env::args().nth(1) {
        Some(path) => Configs::load(path)?,
        None => Configs::default(),
    };
    let dt = configs.physics.dt;
    let mut world = World::new(configs);

    let misalignment = rand::thread_rng().gen_range(-8.0..8.0);

    let vessel_a = world.spawn_vessel(vector![0.0, 0.0], vector![0.0, 0.0], 1000.0)?;
    let vessel_b = world.spawn_vessel(vector![300.0, misalignment], vector![0.0, 0.0], 1000.0)?;

    let port_a = world.spawn_item(vessel_a, Rect::from_center(vector![100.0, 0.0], 32.0, 64.0))?;
    let port_b = world.spawn_item(vessel_b, Rect::from_center(vector![-100.0, 0.0], 32.0, 64.0))?;
    add_docking_port(&mut world, port_a, DockingPort::new(true))?;
    add_docking_port(&mut world, port_b, DockingPort::new(true))?;

    world.set_vessel_velocity(vessel_b, vector![-60.0, 0.0]);

    let mut interval = time::interval(Duration::from_secs_f32(dt));
    let mut hard_docked_for = 0.0;
    let mut undocking = false;

    loop {
        interval.tick().await;
        world.step();

        let events = world.drain_events().collect::<Vec<_>>();
        for event in events {
            match event {
                DockingEvent::Signal { item, signal } => {
                    if item == port_a
                        && signal.connection == SIGNAL_PROXIMITY_SENSOR
                        && signal.value == "1"
                        && !undocking
                    {
                        receive_signal(&mut world, port_a, SIGNAL_SET_STATE, "1");
                    }
                }
                DockingEvent::NetworkSync { port } => {
                    if let Some(sync) = write_docking_sync(&world, port) {
                        log::info!("Sync port {:?}: {:?} {:?}", port, sync, sync.encode());
                    }
                }
            }
        }

        if world.tick % 30 == 0 {
            if let Some(port) = world.ports.get(&port_a) {
                log::info!(
                    "tick {} state {:?} progress {:.3}",
                    world.tick,
                    dock_state(&world, port_a),
                    port.progress()
                );
            }
        }

        match dock_state(&world, port_a) {
            DockState::HardDocked => {
                hard_docked_for += dt;
                if hard_docked_for >= HOLD_DOCKED && !undocking {
                    undocking = true;
                    receive_signal(&mut world, port_a, SIGNAL_TOGGLE, "1");
                    world.set_vessel_velocity(vessel_b, vector![60.0, 0.0]);
                }
            }
            DockState::Undocked if undocking => {
                let progress = world.ports.get(&port_a).map(|p| p.progress()).unwrap_or(0.0);
                if progress < configs.docking.undocked_progress_cutoff {
                    break;
                }
            }
            _ => {}
        }
    }

    log::info!("Done after {} ticks", world.tick);

    Ok(())
}
