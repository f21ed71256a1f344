use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use thiserror::Error;

use crate::domain::simulation::{SimulationRequest, SimulationSummary};
use crate::services::stats_display::StatsDisplay;
use crate::services::view_controller::RunOutcome;

#[derive(Error, Debug)]
pub enum RunReportError {
    #[error("failed to serialize run report: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write run report: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChartReport {
    pub path: String,
    pub points: usize,
}

/// YAML record of one successful run.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunReport {
    pub generated_at: String,
    pub service_url: String,
    pub request: SimulationRequest,
    pub summary: SimulationSummary,
    pub display: StatsDisplay,
    pub chart: ChartReport,
}

impl RunReport {
    pub fn new(
        outcome: &RunOutcome,
        service_url: String,
        chart_path: String,
        generated_at: DateTime<Local>,
    ) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            service_url,
            request: outcome.request,
            summary: outcome.summary.clone(),
            display: outcome.display.clone(),
            chart: ChartReport {
                path: chart_path,
                points: outcome.chart_points,
            },
        }
    }
}

pub async fn write_run_report(path: &str, report: &RunReport) -> Result<(), RunReportError> {
    let yaml = serde_yaml::to_string(report)?;
    tokio::fs::write(path, yaml).await?;
    Ok(())
}
