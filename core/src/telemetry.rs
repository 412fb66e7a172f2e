use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

/// Prometheus-tellere for én økt, registrert i et eget `Registry`.
#[derive(Clone)]
pub struct Telemetry {
    registry: Registry,
    pub updates_total: IntCounter,
    pub steps_counted_total: IntCounter,
    pub discontinuities_total: IntCounter,
    pub outliers_rejected_total: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let c = IntCounter::with_opts(Opts::new(name, help).namespace("gaitgraph"))?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl Telemetry {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        Ok(Self {
            updates_total: counter(&registry, "updates_total", "Analysekall per økt")?,
            steps_counted_total: counter(&registry, "steps_counted_total", "Talte steg")?,
            discontinuities_total: counter(
                &registry,
                "discontinuities_total",
                "Strømmen krympet, økten nullstilt",
            )?,
            outliers_rejected_total: counter(
                &registry,
                "outliers_rejected_total",
                "Avlesninger over sanity_ceiling",
            )?,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tekstformat for scraping.
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        if TextEncoder::new().encode(&self.registry.gather(), &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl std::fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Telemetry")
            .field("updates_total", &self.updates_total.get())
            .field("steps_counted_total", &self.steps_counted_total.get())
            .finish()
    }
}
