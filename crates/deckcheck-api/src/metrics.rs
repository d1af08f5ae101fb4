//! Prometheus counters served at `/metrics`
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct ApiMetrics {
    registry: Registry,
    validation_runs: IntCounter,
    ai_fallbacks: IntCounter,
    resolutions: IntCounterVec,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let validation_runs = IntCounter::new(
            "deckcheck_validation_runs_total",
            "Validation runs completed",
        )?;
        let ai_fallbacks = IntCounter::new(
            "deckcheck_ai_fallbacks_total",
            "AI checks answered by a fail-open fallback",
        )?;
        let resolutions = IntCounterVec::new(
            Opts::new("deckcheck_resolutions_total", "URL resolutions by method"),
            &["method"],
        )?;

        registry.register(Box::new(validation_runs.clone()))?;
        registry.register(Box::new(ai_fallbacks.clone()))?;
        registry.register(Box::new(resolutions.clone()))?;

        Ok(Self {
            registry,
            validation_runs,
            ai_fallbacks,
            resolutions,
        })
    }

    pub fn record_run(&self, ai_fallbacks: usize) {
        self.validation_runs.inc();
        self.ai_fallbacks.inc_by(ai_fallbacks as u64);
    }

    pub fn record_fallback(&self) {
        self.ai_fallbacks.inc();
    }

    pub fn record_resolution(&self, method: &str) {
        self.resolutions.with_label_values(&[method]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_render() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.record_run(2);
        metrics.record_fallback();
        metrics.record_resolution("pdf-direct");

        let text = metrics.encode().unwrap();
        assert!(text.contains("deckcheck_validation_runs_total 1"));
        assert!(text.contains("deckcheck_ai_fallbacks_total 3"));
        assert!(text.contains("deckcheck_resolutions_total{method=\"pdf-direct\"} 1"));
    }
}
