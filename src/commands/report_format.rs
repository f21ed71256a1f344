use crate::services::view_controller::RunOutcome;

pub fn format_run_summary(outcome: &RunOutcome, service: &str) -> String {
    let request = &outcome.request;
    let display = &outcome.display;

    let mut lines = Vec::new();
    lines.push("Simulation Result".to_string());
    lines.push(format!("Service: {service}"));
    lines.push(format!("Pity (6-star): {}", request.pity_6));
    lines.push(format!("Pity (120): {}", request.pity_120));
    lines.push(format!("Rolls: {}", request.rolls));
    lines.push(String::new());
    lines.push(format!("Current limited: {}", display.p_current_limited));
    lines.push(format!("Off-banner 6-star: {}", display.p_off));
    lines.push(format!("Other limited: {}", display.p_other_limited));
    lines.push(format!("Guaranteed 6-star (min): {}", display.min_6star));
    lines.push(format!("Expected 5-star: {}", display.e_5star));

    lines.join("\n")
}
