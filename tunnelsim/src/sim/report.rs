// Estadisticas de una corrida

use crate::sim_log;
use bridgemon::{CrossingReport, FairnessPolicy, Group};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupStats {
    pub crossings: u32,
    pub total_wait: Duration,
    pub max_wait: Duration,
    pub total_crossing: Duration,
}

impl GroupStats {
    pub fn record(&mut self, report: &CrossingReport) {
        self.crossings += 1;
        self.total_wait += report.waited;
        self.max_wait = self.max_wait.max(report.waited);
        self.total_crossing += report.crossed;
    }

    pub fn mean_wait(&self) -> Duration {
        if self.crossings == 0 {
            return Duration::ZERO;
        }
        self.total_wait / self.crossings
    }

    pub fn mean_crossing(&self) -> Duration {
        if self.crossings == 0 {
            return Duration::ZERO;
        }
        self.total_crossing / self.crossings
    }
}

#[derive(Debug, Clone)]
pub struct SimReport {
    pub policy: FairnessPolicy,
    /// entidades que la configuracion mandaba a cruzar
    pub expected: u32,
    pub elapsed: Duration,
    stats: [GroupStats; 3],
}

impl SimReport {
    pub fn new(policy: FairnessPolicy, expected: u32) -> Self {
        Self {
            policy,
            expected,
            elapsed: Duration::ZERO,
            stats: Default::default(),
        }
    }

    pub fn record(&mut self, report: &CrossingReport) {
        self.stats[report.group.index()].record(report);
    }

    pub fn stats(&self, group: Group) -> &GroupStats {
        &self.stats[group.index()]
    }

    pub fn total_crossings(&self) -> u32 {
        self.stats.iter().map(|s| s.crossings).sum()
    }

    pub fn log_summary(&self) {
        sim_log!("\n╔════════════════════════════════════════════════════════════╗");
        sim_log!("║              Simulación Finalizada                        ║");
        sim_log!("╠════════════════════════════════════════════════════════════╣");
        sim_log!("║ Política: {:>48} ║", self.policy.to_string());
        sim_log!("║ Duración: {:>47.2?} ║", self.elapsed);
        sim_log!(
            "║ Cruces: {:>50} ║",
            format!("{}/{}", self.total_crossings(), self.expected)
        );
        for g in Group::ALL {
            let s = self.stats(g);
            sim_log!(
                "║ {:<11} cruces:{:>4}  espera media:{:>9.2?}  máx:{:>9.2?} ║",
                g.to_string(),
                s.crossings,
                s.mean_wait(),
                s.max_wait
            );
        }
        sim_log!("╚════════════════════════════════════════════════════════════╝\n");
    }
}
