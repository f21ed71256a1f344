use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::simulation::{SeriesPoint, SeriesResponse, SimulationRequest, SimulationSummary};
use crate::services::simulation_api::{ServiceError, SimulationService};

pub type CallLog = Arc<Mutex<Vec<(&'static str, SimulationRequest)>>>;

// The summary from the "0 / 0 / 100 rolls" scenario.
pub fn sample_summary() -> SimulationSummary {
    SimulationSummary {
        p_current_limited: 0.5,
        p_off: 0.3,
        p_other_limited: 0.2,
        min_6star: 2,
        e_5star: 4.57,
    }
}

pub fn sample_series(points: usize) -> SeriesResponse {
    let denominator = points.max(1) as f64;
    SeriesResponse {
        character: (0..points)
            .map(|index| SeriesPoint {
                x: index as f64,
                y: index as f64 / denominator,
            })
            .collect(),
    }
}

/// Lets a test hold `/simulate` open until it says otherwise.
#[derive(Default)]
pub struct SimulateGate {
    pub entered: Notify,
    pub release: Notify,
}

/// In-memory stand-in for the simulation service that records every call.
pub struct FakeService {
    summary: Arc<Mutex<SimulationSummary>>,
    series: SeriesResponse,
    calls: CallLog,
    fail_series: Arc<AtomicBool>,
    gate: Option<Arc<SimulateGate>>,
}

impl FakeService {
    pub fn new(summary: SimulationSummary, series: SeriesResponse) -> Self {
        Self {
            summary: Arc::new(Mutex::new(summary)),
            series,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_series: Arc::new(AtomicBool::new(false)),
            gate: None,
        }
    }

    pub fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    /// Changes what later `/simulate` calls answer with.
    pub fn summary_handle(&self) -> Arc<Mutex<SimulationSummary>> {
        Arc::clone(&self.summary)
    }

    /// While set, `/series` answers with a 503.
    pub fn fail_series_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_series)
    }

    pub fn hold_simulate(&mut self) -> Arc<SimulateGate> {
        let gate = Arc::new(SimulateGate::default());
        self.gate = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl SimulationService for FakeService {
    fn describe(&self) -> String {
        "fake://simulation".to_string()
    }

    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationSummary, ServiceError> {
        self.calls.lock().unwrap().push(("simulate", *request));
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        let summary = self.summary.lock().unwrap().clone();
        Ok(summary)
    }

    async fn series(&self, request: &SimulationRequest) -> Result<SeriesResponse, ServiceError> {
        self.calls.lock().unwrap().push(("series", *request));
        if self.fail_series.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                url: "fake://simulation/series".to_string(),
                status: 503,
            });
        }
        Ok(self.series.clone())
    }
}
