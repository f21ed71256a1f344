use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use thiserror::Error;

use crate::services::chart_renderer::ChartSurface;
use crate::services::service_config::{ConfigError, ServiceConfig};
use crate::services::simulation_api::{ServiceError, SimulationApiClient};
use crate::services::view_controller::SimulationViewController;

pub const DEFAULT_CHART_PATH: &str = "character_chart.png";

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one banner simulation and draw the current limited curve
    Simulate(SimulateArgs),
    /// Read "<pity6> <pity120> <rolls>" lines from stdin and run each one
    Interactive(InteractiveArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub service: ServiceArgs,
    /// Pulls since the last 6-star
    #[arg(long, allow_hyphen_values = true)]
    pub pity6: String,
    /// Pulls counted towards the 120-pull limited guarantee
    #[arg(long, allow_hyphen_values = true)]
    pub pity120: String,
    /// Number of pulls to simulate
    #[arg(long, allow_hyphen_values = true)]
    pub rolls: String,
    /// Optional YAML run report
    #[arg(short, long)]
    pub report: Option<String>,
}

#[derive(Args, Debug)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Path to a service config YAML
    #[arg(short, long)]
    pub config: Option<String>,
    /// Simulation service base URL (overrides config and BANNER_SIM_URL)
    #[arg(long)]
    pub url: Option<String>,
    /// Chart output file (.png or .svg)
    #[arg(short, long, default_value = DEFAULT_CHART_PATH)]
    pub output: String,
}

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Service(#[from] ServiceError),
}

impl ServiceArgs {
    pub fn build_controller(&self) -> Result<SimulationViewController, SetupError> {
        let config = ServiceConfig::load(self.config.as_deref(), self.url.as_deref())?;
        let surface = ChartSurface::new(&self.output, config.chart_width, config.chart_height);
        let client = SimulationApiClient::new(config)?;
        Ok(SimulationViewController::new(Box::new(client), surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_defaults_chart_output() {
        let args = CliArgs::parse_from([
            "banner-sim",
            "simulate",
            "--pity6",
            "0",
            "--pity120",
            "0",
            "--rolls",
            "100",
        ]);

        if let Commands::Simulate(simulate) = args.command {
            assert_eq!(simulate.service.output, DEFAULT_CHART_PATH);
            assert_eq!(simulate.rolls, "100");
            assert!(simulate.report.is_none());
        } else {
            panic!("expected simulate command");
        }
    }

    #[test]
    fn simulate_passes_negative_values_through_to_validation() {
        let args = CliArgs::parse_from([
            "banner-sim",
            "simulate",
            "--pity6",
            "-3",
            "--pity120",
            "0",
            "--rolls",
            "10",
        ]);

        if let Commands::Simulate(simulate) = args.command {
            assert_eq!(simulate.pity6, "-3");
        } else {
            panic!("expected simulate command");
        }
    }

    #[test]
    fn interactive_accepts_url_override() {
        let args = CliArgs::parse_from([
            "banner-sim",
            "interactive",
            "--url",
            "http://sim:9000",
            "-o",
            "chart.svg",
        ]);

        if let Commands::Interactive(interactive) = args.command {
            assert_eq!(interactive.service.url.as_deref(), Some("http://sim:9000"));
            assert_eq!(interactive.service.output, "chart.svg");
        } else {
            panic!("expected interactive command");
        }
    }

    #[test]
    fn build_controller_rejects_bad_url() {
        let service = ServiceArgs {
            config: None,
            url: Some("ftp://sim".to_string()),
            output: DEFAULT_CHART_PATH.to_string(),
        };
        assert!(matches!(
            service.build_controller().err(),
            Some(SetupError::Config(ConfigError::InvalidBaseUrl(_)))
        ));
    }
}
