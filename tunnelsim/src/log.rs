// tunnelsim/src/log.rs
// Sink de lineas de la simulacion. Por defecto van a tracing::info!.
// Se puede redirigir con set_logger(fn(&str)) antes de correr la simulacion.

use bridgemon::{BridgeEvent, BridgeObserver, EventKind, Group};
use once_cell::sync::Lazy;
use std::sync::{PoisonError, RwLock};

type LogFn = fn(&str);

fn default_log(s: &str) {
    tracing::info!(target: "tunnelsim", "{}", s);
}

static LOGGER: Lazy<RwLock<LogFn>> = Lazy::new(|| RwLock::new(default_log as LogFn));

pub fn set_logger(f: LogFn) {
    *LOGGER.write().unwrap_or_else(PoisonError::into_inner) = f;
}

#[inline]
pub fn log_str(s: &str) {
    let f = *LOGGER.read().unwrap_or_else(PoisonError::into_inner);
    f(s);
}

#[macro_export]
macro_rules! sim_log {
    ($($arg:tt)*) => {{
        $crate::log::log_str(&format!($($arg)*));
    }};
}

/// Instala el subscriber de tracing para los binarios. Respeta `RUST_LOG`
/// y usa `info` si no esta definida.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // si ya habia un subscriber (p. ej. en pruebas) se deja el existente
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .try_init();
}

fn icon(group: Group) -> &'static str {
    match group {
        Group::NorthCar => "🚗",
        Group::SouthCar => "🚙",
        Group::Pedestrian => "🚶",
    }
}

/// Texto de un evento del monitor, con la foto del estado al final.
pub fn format_event(event: &BridgeEvent) -> String {
    let who = match event.entity {
        Some(id) => format!("{} {}", event.group, id),
        None => event.group.to_string(),
    };
    let what = match event.kind {
        EventKind::WantsEnter => "quiere entrar",
        EventKind::Entered => "entra al puente",
        EventKind::Leaving => "saliendo del puente",
        EventKind::Left => "fuera del puente",
    };
    format!("{} {} {}. {}", icon(event.group), who, what, event.snapshot)
}

/// observador que escribe cada evento con sim_log!
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl BridgeObserver for LogObserver {
    fn on_event(&self, event: &BridgeEvent) {
        crate::sim_log!("{}", format_event(event));
    }
}
