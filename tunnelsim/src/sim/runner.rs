use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::model::{derive_seed, ExpArrival, NormalCrossing};
use crate::sim::{Generator, ProgressObserver, SimReport, Watchdog};
use crate::sim_log;
use bridgemon::{BridgeMonitor, BridgeObserver, CrossingReport, CrossingTime, Group};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Corre una simulacion completa: un monitor, tres generadores y sus entidades.
///
/// Sin `stall_timeout_ms` la funcion espera lo que haga falta, incluso para
/// siempre si la politica cae en deadlock. Con el watchdog activo devuelve
/// `SimError::Stalled` y abandona los hilos bloqueados.
pub fn run_simulation(config: &SimConfig, observer: Arc<dyn BridgeObserver>) -> Result<SimReport> {
    config.validate()?;

    let progress = Arc::new(ProgressObserver::new(observer));
    let monitor = Arc::new(BridgeMonitor::with_observer(config.policy, progress.clone()));
    let timing: Arc<dyn CrossingTime> =
        Arc::new(NormalCrossing::from_config(config, derive_seed(config.seed, 0))?);

    sim_log!("\n╔════════════════════════════════════════════════════════════╗");
    sim_log!("║           Túnel de un carril - Simulación                  ║");
    sim_log!("╚════════════════════════════════════════════════════════════╝");
    sim_log!(
        "Política: {} | Norte: {} | Sur: {} | Peatones: {} | Escala: {}\n",
        monitor.policy(),
        config.north.count,
        config.south.count,
        config.pedestrians.count,
        config.time_scale
    );

    let start = Instant::now();
    let mut generators = Vec::with_capacity(Group::ALL.len());
    for (stream, group) in (1u64..).zip(Group::ALL) {
        let params = config.group(group);
        let arrivals = ExpArrival::new(
            params.mean_arrival_secs,
            config.time_scale,
            derive_seed(config.seed, stream),
        )?;
        let gen = Generator::new(
            group,
            params.count,
            arrivals,
            Arc::clone(&monitor),
            Arc::clone(&timing),
        );
        let name = format!("gen-{}", crate::config::section(group));
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || gen.run())
            .map_err(|source| SimError::Spawn { name, source })?;
        generators.push((group, handle));
    }

    let mut watchdog = config
        .stall_timeout_ms
        .map(|ms| Watchdog::new(Duration::from_millis(ms)));

    while generators.iter().any(|(_, h)| !h.is_finished()) {
        if let Some(dog) = watchdog.as_mut() {
            dog.check(&monitor, &progress)?;
        }
        thread::sleep(POLL_INTERVAL);
    }

    let mut report = SimReport::new(monitor.policy(), config.total_entities());
    for (group, handle) in generators {
        let crossings: Vec<CrossingReport> = handle.join().map_err(|_| SimError::Panicked(group))??;
        for c in &crossings {
            report.record(c);
        }
    }
    report.elapsed = start.elapsed();

    report.log_summary();
    Ok(report)
}
