// Watchdog de la corrida: solo observa, nunca toca el monitor

use crate::error::{Result, SimError};
use bridgemon::{BridgeEvent, BridgeMonitor, BridgeObserver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cuenta los eventos del monitor y los reenvia al observador interno.
pub struct ProgressObserver {
    inner: Arc<dyn BridgeObserver>,
    events: AtomicU64,
}

impl ProgressObserver {
    pub fn new(inner: Arc<dyn BridgeObserver>) -> Self {
        Self {
            inner,
            events: AtomicU64::new(0),
        }
    }

    pub fn events(&self) -> u64 {
        self.events.load(Ordering::Relaxed)
    }
}

impl BridgeObserver for ProgressObserver {
    fn on_event(&self, event: &BridgeEvent) {
        self.events.fetch_add(1, Ordering::Relaxed);
        self.inner.on_event(event);
    }
}

/// Detecta la firma del deadlock de `turn-rotation`: puente vacio, alguien
/// esperando y ningun evento durante `timeout`.
#[derive(Debug)]
pub struct Watchdog {
    timeout: Duration,
    last_count: u64,
    last_change: Instant,
}

impl Watchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            last_count: 0,
            last_change: Instant::now(),
        }
    }

    pub fn check(&mut self, monitor: &BridgeMonitor, progress: &ProgressObserver) -> Result<()> {
        let count = progress.events();
        if count != self.last_count {
            self.last_count = count;
            self.last_change = Instant::now();
            return Ok(());
        }

        let idle = self.last_change.elapsed();
        if idle < self.timeout {
            return Ok(());
        }

        let snapshot = monitor.snapshot();
        if snapshot.is_empty() && snapshot.total_waiting() > 0 {
            tracing::error!(%snapshot, "sin progreso en {:?}", idle);
            return Err(SimError::Stalled {
                idle_ms: idle.as_millis() as u64,
                snapshot,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridgemon::{FairnessPolicy, Group, NoopObserver};
    use std::thread;

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

    #[test]
    fn test_idle_empty_bridge_is_not_a_stall() {
        let progress = Arc::new(ProgressObserver::new(Arc::new(NoopObserver)));
        let monitor = BridgeMonitor::with_observer(FairnessPolicy::TurnRotation, progress.clone());
        let mut dog = Watchdog::new(Duration::from_millis(10));
        thread::sleep(Duration::from_millis(20));
        assert!(dog.check(&monitor, &progress).is_ok());
    }

    #[test]
    fn test_detects_turn_rotation_deadlock() {
        let progress = Arc::new(ProgressObserver::new(Arc::new(NoopObserver)));
        let monitor = Arc::new(BridgeMonitor::with_observer(
            FairnessPolicy::TurnRotation,
            progress.clone(),
        ));

        monitor.request_enter(Group::NorthCar);
        monitor.request_enter(Group::NorthCar);
        monitor.notify_exit(Group::NorthCar);

        // estos dos hilos quedan bloqueados para siempre; no se hace join
        for group in [Group::Pedestrian, Group::NorthCar] {
            let m = Arc::clone(&monitor);
            thread::spawn(move || m.request_enter(group));
            assert!(wait_until(Duration::from_secs(2), || {
                monitor.snapshot().waiting(group) == 1
            }));
        }
        monitor.notify_exit(Group::NorthCar);

        let mut dog = Watchdog::new(Duration::from_millis(50));
        let stalled = wait_until(Duration::from_secs(2), || {
            dog.check(&monitor, &progress).is_err()
        });
        assert!(stalled, "el watchdog no detecto el deadlock");
        assert_eq!(monitor.snapshot().turn, Group::SouthCar);
    }
}
