// Test de integracion de la simulacion completa
//
// Ejecutar con: cargo test -p tunnelsim -- --nocapture

use bridgemon::*;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tunnelsim::*;

/// configuracion chica y acelerada para que las pruebas corran en milisegundos
fn fast_config(policy: FairnessPolicy, north: u32, south: u32, pedestrians: u32) -> SimConfig {
    let mut cfg = SimConfig {
        policy,
        time_scale: 0.001,
        seed: Some(2024),
        stall_timeout_ms: Some(2_000),
        ..Default::default()
    };
    cfg.north.count = north;
    cfg.south.count = south;
    cfg.pedestrians.count = pedestrians;
    cfg
}

#[test]
fn test_full_run_base_policy_crosses_everyone() {
    println!("\n=== TEST: corrida completa con none ===");

    let recorder = Arc::new(RecordingObserver::new());
    let cfg = fast_config(FairnessPolicy::None, 30, 30, 6);
    let report = run_simulation(&cfg, recorder.clone()).expect("la corrida debio terminar");

    assert_eq!(report.total_crossings(), 66);
    assert_eq!(report.stats(Group::NorthCar).crossings, 30);
    assert_eq!(report.stats(Group::SouthCar).crossings, 30);
    assert_eq!(report.stats(Group::Pedestrian).crossings, 6);

    let events = recorder.events();
    assert_eq!(events.len(), 66 * 4);
    for e in &events {
        assert!(e.snapshot.is_exclusive(), "exclusion rota: {}", e.snapshot);
    }
    let last = events.last().unwrap();
    assert!(last.snapshot.is_empty());
    assert_eq!(last.snapshot.total_waiting(), 0);

    println!(
        "  ✓ {} cruces en {:?}, espera media peatones {:?}",
        report.total_crossings(),
        report.elapsed,
        report.stats(Group::Pedestrian).mean_wait()
    );
}

#[test]
fn test_turn_rotation_single_group_never_stalls() {
    println!("\n=== TEST: turn-rotation con un solo grupo ===");

    // con un solo grupo nadie compite por el turno
    let cfg = fast_config(FairnessPolicy::TurnRotation, 0, 0, 8);
    let report = run_simulation(&cfg, Arc::new(NoopObserver)).unwrap();
    assert_eq!(report.stats(Group::Pedestrian).crossings, 8);
    assert_eq!(report.policy, FairnessPolicy::TurnRotation);
    println!("  ✓ sin trabas");
}

#[test]
fn test_empty_run_finishes_immediately() {
    let cfg = fast_config(FairnessPolicy::None, 0, 0, 0);
    let report = run_simulation(&cfg, Arc::new(NoopObserver)).unwrap();
    assert_eq!(report.total_crossings(), 0);
}

#[test]
fn test_invalid_config_is_rejected_before_running() {
    let mut cfg = fast_config(FairnessPolicy::None, 1, 1, 1);
    cfg.north.crossing_spread_secs = f64::INFINITY;

    let recorder = Arc::new(RecordingObserver::new());
    let err = run_simulation(&cfg, recorder.clone()).unwrap_err();
    assert!(matches!(err, SimError::Config(ConfigError::Invalid { .. })), "{err}");
    assert!(recorder.is_empty(), "no debio correr nada");
}

#[test]
fn test_huge_crossing_time_is_rejected_not_left_on_the_bridge() {
    let mut cfg = fast_config(FairnessPolicy::None, 1, 1, 0);
    cfg.north.crossing_mean_secs = 1e20;
    cfg.north.crossing_spread_secs = 0.0;
    cfg.stall_timeout_ms = Some(200);

    let (tx, rx) = mpsc::channel();
    let recorder = Arc::new(RecordingObserver::new());
    let obs = recorder.clone();
    thread::spawn(move || {
        let _ = tx.send(run_simulation(&cfg, obs));
    });

    let result = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("run_simulation no volvio");
    let err = result.unwrap_err();
    match err {
        SimError::Config(ConfigError::Invalid { ref field, .. }) => {
            assert_eq!(field, "north.crossing_mean_secs")
        }
        other => panic!("error inesperado: {other}"),
    }
    assert!(recorder.is_empty());
    println!("✓ tiempo de cruce fuera de rango rechazado");
}
