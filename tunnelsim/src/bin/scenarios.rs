// Reproduce con tiempos fijos los dos escenarios de vivacidad del monitor:
// inanicion con `none` y deadlock con `turn-rotation`.

use bridgemon::{BridgeMonitor, EntityId, FairnessPolicy, Group};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tunnelsim::log::{init_tracing, LogObserver};
use tunnelsim::sim_log;

#[derive(Parser, Debug)]
#[command(name = "scenarios", about = "Escenarios de inanición y deadlock del túnel")]
struct Cli {
    #[command(subcommand)]
    scenario: Scenario,
}

#[derive(Subcommand, Debug)]
enum Scenario {
    /// flujo de coches al sur que nunca deja vaciar el puente
    Starvation {
        #[arg(long, default_value_t = 10)]
        rounds: u32,
        /// ms que cada coche al sur pasa encima
        #[arg(long, default_value_t = 50)]
        crossing_ms: u64,
    },
    /// turno entregado a un grupo sin nadie esperando
    Deadlock {
        /// ms que se observa el puente trabado antes de mandar un coche al sur
        #[arg(long, default_value_t = 500)]
        observe_ms: u64,
    },
}

fn spawn_waiter(
    monitor: &Arc<BridgeMonitor>,
    id: EntityId,
    group: Group,
) -> (mpsc::Receiver<()>, thread::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let m = Arc::clone(monitor);
    let handle = thread::spawn(move || {
        m.request_enter_as(id, group);
        let _ = tx.send(());
        m.notify_exit_as(id, group);
    });
    (rx, handle)
}

/// espera a que `group` tenga a alguien bloqueado
fn until_waiting(monitor: &BridgeMonitor, group: Group) {
    while monitor.snapshot().waiting(group) == 0 {
        thread::sleep(Duration::from_millis(1));
    }
}

fn starvation(rounds: u32, crossing_ms: u64) -> bool {
    sim_log!("=== Inanición con la política none ===");
    let monitor = Arc::new(BridgeMonitor::with_observer(
        FairnessPolicy::None,
        Arc::new(LogObserver),
    ));

    monitor.request_enter_as(1, Group::SouthCar);
    let (admitted, north) = spawn_waiter(&monitor, 1, Group::NorthCar);
    until_waiting(&monitor, Group::NorthCar);

    let mut starved = true;
    for id in 2..=rounds + 1 {
        thread::sleep(Duration::from_millis(crossing_ms));
        // el siguiente entra antes de que salga el anterior
        monitor.request_enter_as(id, Group::SouthCar);
        monitor.notify_exit_as(id - 1, Group::SouthCar);
        if admitted.try_recv().is_ok() {
            starved = false;
        }
    }
    sim_log!("🚗 north car 1 sigue esperando tras {} coches al sur: {}", rounds, starved);

    monitor.notify_exit_as(rounds + 1, Group::SouthCar);
    let _ = admitted.recv();
    let _ = north.join();
    sim_log!("flujo cortado, el norte cruzó. {}", monitor.snapshot());
    starved
}

fn deadlock(observe_ms: u64) -> bool {
    sim_log!("=== Deadlock con la política turn-rotation ===");
    let monitor = Arc::new(BridgeMonitor::with_observer(
        FairnessPolicy::TurnRotation,
        Arc::new(LogObserver),
    ));

    monitor.request_enter_as(1, Group::NorthCar);
    monitor.request_enter_as(2, Group::NorthCar);
    monitor.notify_exit_as(1, Group::NorthCar);

    let (ped_in, ped) = spawn_waiter(&monitor, 1, Group::Pedestrian);
    until_waiting(&monitor, Group::Pedestrian);
    let (north_in, north) = spawn_waiter(&monitor, 3, Group::NorthCar);
    until_waiting(&monitor, Group::NorthCar);
    monitor.notify_exit_as(2, Group::NorthCar);

    thread::sleep(Duration::from_millis(observe_ms));
    let stuck = ped_in.try_recv().is_err() && north_in.try_recv().is_err();
    sim_log!("⛔ tras {} ms nadie avanzó: {} | {}", observe_ms, stuck, monitor.snapshot());

    sim_log!("🚙 llega un coche al sur con el turno");
    monitor.request_enter_as(1, Group::SouthCar);
    monitor.notify_exit_as(1, Group::SouthCar);
    let _ = ped_in.recv();
    let _ = north_in.recv();
    let _ = ped.join();
    let _ = north.join();
    sim_log!("puente destrabado. {}", monitor.snapshot());
    stuck
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let reproduced = match cli.scenario {
        Scenario::Starvation { rounds, crossing_ms } => starvation(rounds, crossing_ms),
        Scenario::Deadlock { observe_ms } => deadlock(observe_ms),
    };

    if reproduced {
        ExitCode::SUCCESS
    } else {
        eprintln!("el escenario no se reprodujo");
        ExitCode::FAILURE
    }
}
