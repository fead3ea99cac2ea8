// Reproduce las dos fallas de vivacidad conocidas del monitor:
// inanicion con la politica `none` y deadlock con `turn-rotation`.
//
// Ejecutar con: cargo test -p bridgemon --test liveness_tests -- --nocapture

use bridgemon::*;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Espera hasta que `cond` se cumpla o venza el plazo
fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}

/// Lanza una entidad que pide entrar y avisa por el canal cuando es admitida.
/// Sale del puente apenas entra.
fn spawn_waiter(
    monitor: &Arc<BridgeMonitor>,
    id: EntityId,
    group: Group,
) -> (mpsc::Receiver<EntityId>, thread::JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let m = Arc::clone(monitor);
    let handle = thread::spawn(move || {
        m.request_enter_as(id, group);
        tx.send(id).ok();
        m.notify_exit_as(id, group);
    });
    (rx, handle)
}

#[test]
fn test_base_policy_starves_north_under_overlapping_south_stream() {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║ TEST: inanicion del norte con la politica none           ║");
    println!("╚═══════════════════════════════════════════════════════════╝\n");

    let monitor = Arc::new(BridgeMonitor::new(FairnessPolicy::None));

    // un coche al sur ya esta cruzando
    monitor.request_enter_as(1, Group::SouthCar);

    let (admitted, north) = spawn_waiter(&monitor, 1, Group::NorthCar);
    assert!(wait_until(Duration::from_secs(2), || {
        monitor.snapshot().waiting(Group::NorthCar) == 1
    }));

    // cada coche nuevo al sur entra antes de que salga el anterior, asi la
    // ocupacion del sur nunca llega a cero
    const ROUNDS: u32 = 40;
    for id in 2..=ROUNDS + 1 {
        monitor.request_enter_as(id, Group::SouthCar);
        monitor.notify_exit_as(id - 1, Group::SouthCar);

        let snap = monitor.snapshot();
        assert_eq!(snap.occupancy(Group::SouthCar), 1);
        assert_eq!(snap.waiting(Group::NorthCar), 1, "ronda {id}: {snap}");
        assert!(
            admitted.recv_timeout(Duration::from_millis(5)).is_err(),
            "el norte entro con el sur ocupado en la ronda {id}"
        );
    }
    println!("  norte sigue bloqueado despues de {} coches al sur", ROUNDS);

    // cuando el flujo del sur se corta el norte pasa
    monitor.notify_exit_as(ROUNDS + 1, Group::SouthCar);
    admitted
        .recv_timeout(Duration::from_secs(2))
        .expect("el norte debio entrar al vaciarse el sur");
    north.join().unwrap();
    assert!(monitor.snapshot().is_empty());
    println!("  ✓ inanicion reproducida y resuelta al cortar el flujo");
}

#[test]
fn test_turn_rotation_deadlocks_when_turn_goes_to_absent_group() {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║ TEST: deadlock de turn-rotation                          ║");
    println!("╚═══════════════════════════════════════════════════════════╝\n");

    let recorder = Arc::new(RecordingObserver::new());
    let monitor = Arc::new(BridgeMonitor::with_observer(
        FairnessPolicy::TurnRotation,
        recorder.clone(),
    ));

    // (1) dos coches al norte entran y uno sale: el turno pasa al sur
    monitor.request_enter_as(1, Group::NorthCar);
    monitor.request_enter_as(2, Group::NorthCar);
    monitor.notify_exit_as(1, Group::NorthCar);
    assert_eq!(monitor.snapshot().turn, Group::SouthCar);

    // (2) un peaton pide entrar y se bloquea: hay un coche encima
    let (ped_admitted, ped) = spawn_waiter(&monitor, 1, Group::Pedestrian);
    assert!(wait_until(Duration::from_secs(2), || {
        monitor.snapshot().waiting(Group::Pedestrian) == 1
    }));

    // (3) otro coche al norte se bloquea: turno del sur y un peaton esperando
    let (north_admitted, north) = spawn_waiter(&monitor, 3, Group::NorthCar);
    assert!(wait_until(Duration::from_secs(2), || {
        monitor.snapshot().waiting(Group::NorthCar) == 1
    }));

    // el ultimo coche sale, el puente queda vacio
    monitor.notify_exit_as(2, Group::NorthCar);

    // (4) nunca llega un coche al sur: nadie avanza
    thread::sleep(Duration::from_millis(300));
    assert!(ped_admitted.try_recv().is_err(), "el peaton no debio entrar");
    assert!(north_admitted.try_recv().is_err(), "el norte no debio entrar");

    let snap = monitor.snapshot();
    println!("  estado trabado: {}", snap);
    assert!(snap.is_empty());
    assert_eq!(snap.turn, Group::SouthCar);
    assert_eq!(snap.waiting(Group::Pedestrian), 1);
    assert_eq!(snap.waiting(Group::NorthCar), 1);
    assert_eq!(snap.waiting(Group::SouthCar), 0);

    // ningun evento Entered despues del vaciado
    let entered_after_drain = recorder
        .events()
        .iter()
        .skip_while(|e| !(e.kind == EventKind::Left && e.entity == Some(2)))
        .filter(|e| e.kind == EventKind::Entered)
        .count();
    assert_eq!(entered_after_drain, 0);
    println!("  ✓ deadlock confirmado tras una espera acotada");

    // un coche al sur que llega tarde rompe el ciclo:
    // entra por turno, al salir el turno pasa a peatones y luego al norte
    monitor.request_enter_as(1, Group::SouthCar);
    monitor.notify_exit_as(1, Group::SouthCar);

    ped_admitted
        .recv_timeout(Duration::from_secs(2))
        .expect("el peaton debio entrar despues del coche al sur");
    north_admitted
        .recv_timeout(Duration::from_secs(2))
        .expect("el norte debio entrar despues del peaton");
    ped.join().unwrap();
    north.join().unwrap();

    let snap = monitor.snapshot();
    assert!(snap.is_empty());
    assert_eq!(snap.total_waiting(), 0);
    assert_eq!(snap.turn, Group::SouthCar);
    println!("  ✓ la llegada del grupo con turno destraba el puente");
}

#[test]
fn test_base_policy_has_no_deadlock_in_same_sequence() {
    println!("\n=== TEST: la misma secuencia con la politica none avanza ===");

    let monitor = Arc::new(BridgeMonitor::new(FairnessPolicy::None));
    monitor.request_enter_as(1, Group::NorthCar);
    monitor.request_enter_as(2, Group::NorthCar);
    monitor.notify_exit_as(1, Group::NorthCar);

    let (ped_admitted, ped) = spawn_waiter(&monitor, 1, Group::Pedestrian);
    assert!(wait_until(Duration::from_secs(2), || {
        monitor.snapshot().waiting(Group::Pedestrian) == 1
    }));

    // sin turno, el norte entra directo: solo mira la ocupacion de los otros
    let (north_admitted, north) = spawn_waiter(&monitor, 3, Group::NorthCar);
    north_admitted
        .recv_timeout(Duration::from_secs(2))
        .expect("el norte entra con otro norte encima");
    north.join().unwrap();

    monitor.notify_exit_as(2, Group::NorthCar);
    ped_admitted
        .recv_timeout(Duration::from_secs(2))
        .expect("el peaton entra al vaciarse el norte");
    ped.join().unwrap();
    assert!(monitor.snapshot().is_empty());
    println!("  ✓ sin deadlock");
}
