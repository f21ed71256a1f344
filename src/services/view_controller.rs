use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::simulation::{SimulationRequest, SimulationSummary};
use crate::services::chart_renderer::{ChartError, ChartRenderer, ChartSurface};
use crate::services::input_fields::{InputError, SimulationInputs};
use crate::services::simulation_api::{ServiceError, SimulationService};
use crate::services::stats_display::StatsDisplay;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error("a simulation run is already in progress")]
    RunInProgress,
    #[error("simulation service error: {0}")]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Chart(#[from] ChartError),
    #[error("chart task failed: {0}")]
    Task(String),
}

/// What a successful run committed to the view.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub request: SimulationRequest,
    pub summary: SimulationSummary,
    pub display: StatsDisplay,
    pub chart_points: usize,
}

struct ViewState {
    display: Option<StatsDisplay>,
    chart: ChartRenderer,
}

/// Reads inputs, queries the simulation service and updates the stats and chart.
pub struct SimulationViewController {
    service: Box<dyn SimulationService>,
    view: Arc<Mutex<ViewState>>,
    in_flight: AtomicBool,
}

// Clears the in-flight flag when a run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ViewError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ViewError::RunInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SimulationViewController {
    pub fn new(service: Box<dyn SimulationService>, surface: ChartSurface) -> Self {
        Self {
            service,
            view: Arc::new(Mutex::new(ViewState {
                display: None,
                chart: ChartRenderer::new(surface),
            })),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn service_description(&self) -> String {
        self.service.describe()
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The stats currently on display, if any run has succeeded.
    #[cfg(test)]
    pub fn display(&self) -> Option<StatsDisplay> {
        lock_view(&self.view).display.clone()
    }

    #[cfg(test)]
    pub fn live_charts(&self) -> usize {
        lock_view(&self.view).chart.live_instances()
    }

    pub fn chart_surface(&self) -> ChartSurface {
        lock_view(&self.view).chart.surface().clone()
    }

    /// Validates `inputs`, calls `/simulate` then `/series`, and commits the
    /// chart and stats together. A failed call or chart draw leaves the view
    /// untouched.
    pub async fn run_simulation(&self, inputs: &SimulationInputs) -> Result<RunOutcome, ViewError> {
        let request = inputs.parse()?;
        let _guard = RunGuard::acquire(&self.in_flight).inspect_err(|_| {
            warn!(?request, "rejecting run while another is in flight");
        })?;

        let summary = self.service.simulate(&request).await?;
        let series = self.service.series(&request).await?;
        let display = StatsDisplay::from_summary(&summary);
        debug!(?request, points = series.character.len(), "simulation data received");

        let view = Arc::clone(&self.view);
        let committed = display.clone();
        let chart_points = tokio::task::spawn_blocking(move || -> Result<usize, ChartError> {
            let mut state = lock_view(&view);
            let points = state.chart.render(&series.character)?.point_count();
            state.display = Some(committed);
            debug!(live_charts = state.chart.live_instances(), "view committed");
            Ok(points)
        })
        .await
        .map_err(|e| ViewError::Task(e.to_string()))??;

        Ok(RunOutcome {
            request,
            summary,
            display,
            chart_points,
        })
    }
}

fn lock_view(view: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}
