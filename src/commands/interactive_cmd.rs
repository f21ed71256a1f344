use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing::warn;

use crate::commands::base_commands::InteractiveArgs;
use crate::commands::report_format::format_run_summary;
use crate::services::input_fields::SimulationInputs;
use crate::services::view_controller::{RunOutcome, SimulationViewController, ViewError};

type RunResult = Result<RunOutcome, ViewError>;

pub async fn interactive_command(args: InteractiveArgs) -> ExitCode {
    let controller = match args.service.build_controller() {
        Ok(controller) => Arc::new(controller),
        Err(e) => {
            eprintln!("Failed to set up simulation client: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Connected to {}. Enter <pity6> <pity120> <rolls>, or quit.",
        controller.service_description()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut runs: JoinSet<RunResult> = JoinSet::new();
    let mut exit_code = ExitCode::SUCCESS;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("Failed to read input: {e}");
                        exit_code = ExitCode::FAILURE;
                        break;
                    }
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
                    break;
                }
                let Some(inputs) = SimulationInputs::from_line(line) else {
                    eprintln!("Expected three values: <pity6> <pity120> <rolls>");
                    continue;
                };
                if controller.is_running() {
                    eprintln!("Run rejected: a simulation run is already in progress");
                    continue;
                }
                let controller = Arc::clone(&controller);
                runs.spawn(async move { controller.run_simulation(&inputs).await });
            }
            Some(finished) = runs.join_next() => {
                report_run(&controller, finished);
            }
        }
    }

    while let Some(finished) = runs.join_next().await {
        report_run(&controller, finished);
    }
    exit_code
}

fn report_run(controller: &SimulationViewController, finished: Result<RunResult, JoinError>) {
    match finished {
        Ok(Ok(outcome)) => {
            println!(
                "{}",
                format_run_summary(&outcome, &controller.service_description())
            );
            println!(
                "Chart written to {}",
                controller.chart_surface().path().display()
            );
        }
        Ok(Err(ViewError::RunInProgress)) => {
            eprintln!("Run rejected: a simulation run is already in progress");
        }
        Ok(Err(e)) => {
            warn!(error = %e, "simulation run failed");
            eprintln!("Simulation failed: {e}");
        }
        Err(e) => eprintln!("Simulation task failed: {e}"),
    }
}
