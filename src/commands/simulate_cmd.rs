use std::process::ExitCode;

use chrono::Local;
use tracing::warn;

use crate::commands::base_commands::SimulateArgs;
use crate::commands::report_format::format_run_summary;
use crate::services::input_fields::SimulationInputs;
use crate::services::run_report::{RunReport, write_run_report};

pub async fn simulate_command(args: SimulateArgs) -> ExitCode {
    let controller = match args.service.build_controller() {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Failed to set up simulation client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let inputs = SimulationInputs::new(args.pity6, args.pity120, args.rolls);
    let outcome = match controller.run_simulation(&inputs).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "simulation run failed");
            eprintln!("Simulation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let service = controller.service_description();
    let chart_path = controller.chart_surface().path().display().to_string();
    println!("{}", format_run_summary(&outcome, &service));
    println!("Chart written to {chart_path}");

    if let Some(report_path) = args.report {
        let report = RunReport::new(&outcome, service, chart_path, Local::now());
        if let Err(e) = write_run_report(&report_path, &report).await {
            eprintln!("Failed to write run report: {e}");
            return ExitCode::FAILURE;
        }
        println!("Run report written to {report_path}");
    }

    ExitCode::SUCCESS
}
