// ============================================================================
// main.rs - Túnel de un carril: coches al norte, coches al sur y peatones
// ============================================================================

use bridgemon::{BridgeObserver, FairnessPolicy, NoopObserver};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tunnelsim::config::{self, ConfigLayer, GroupLayer};
use tunnelsim::log::{init_tracing, LogObserver};
use tunnelsim::run_simulation;

#[derive(Parser, Debug)]
#[command(name = "tunnelsim", version, about = "Simula el túnel de un carril compartido")]
struct Cli {
    /// archivo TOML con la configuracion
    #[arg(long)]
    config: Option<PathBuf>,

    /// politica de admision: none | turn-rotation
    #[arg(long)]
    policy: Option<FairnessPolicy>,

    #[arg(long)]
    cars_north: Option<u32>,

    #[arg(long)]
    cars_south: Option<u32>,

    #[arg(long)]
    pedestrians: Option<u32>,

    /// multiplica todos los tiempos (0.01 corre 100 veces mas rapido)
    #[arg(long)]
    time_scale: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// declara la corrida trabada tras estos ms sin eventos
    #[arg(long)]
    stall_timeout_ms: Option<u64>,

    /// no imprime cada evento del monitor, solo el resumen
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn layer(&self) -> ConfigLayer {
        let count = |c: Option<u32>| {
            c.map(|count| GroupLayer {
                count: Some(count),
                ..Default::default()
            })
        };
        ConfigLayer {
            policy: self.policy.map(|p| p.to_string()),
            time_scale: self.time_scale,
            seed: self.seed,
            stall_timeout_ms: self.stall_timeout_ms,
            north: count(self.cars_north),
            south: count(self.cars_south),
            pedestrians: count(self.pedestrians),
        }
    }
}

fn run(cli: &Cli) -> tunnelsim::Result<()> {
    let cfg = config::load(cli.config.as_deref(), &cli.layer())?;

    let observer: Arc<dyn BridgeObserver> = if cli.quiet {
        Arc::new(NoopObserver)
    } else {
        Arc::new(LogObserver)
    };

    let report = run_simulation(&cfg, observer)?;
    tracing::info!(
        crossings = report.total_crossings(),
        elapsed = ?report.elapsed,
        "simulacion terminada"
    );
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
