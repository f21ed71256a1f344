use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use warp::Filter;
use warp::http::StatusCode;

pub type RequestLog = Arc<Mutex<Vec<(String, Value)>>>;

pub fn scenario_summary() -> Value {
    serde_json::json!({
        "p_current_limited": 0.5,
        "p_off": 0.3,
        "p_other_limited": 0.2,
        "min_6star": 2,
        "e_5star": 4.57
    })
}

pub fn scenario_series() -> Value {
    serde_json::json!({
        "character": [
            { "x": 0, "y": 0.0 },
            { "x": 1, "y": 0.004 },
            { "x": 2, "y": 0.008 },
            { "x": 3, "y": 0.012 }
        ]
    })
}

/// Serves `/simulate` and `/series` on an ephemeral port and logs every body.
pub fn spawn_simulation_service(
    simulate_status: StatusCode,
    summary: Value,
    series: Value,
) -> (SocketAddr, RequestLog) {
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));

    let simulate_log = Arc::clone(&log);
    let simulate = warp::path("simulate")
        .and(warp::post())
        .and(warp::body::json())
        .map(move |body: Value| {
            simulate_log
                .lock()
                .unwrap()
                .push(("simulate".to_string(), body));
            warp::reply::with_status(warp::reply::json(&summary), simulate_status)
        });

    let series_log = Arc::clone(&log);
    let series = warp::path("series")
        .and(warp::post())
        .and(warp::body::json())
        .map(move |body: Value| {
            series_log.lock().unwrap().push(("series".to_string(), body));
            warp::reply::json(&series)
        });

    let (addr, server) =
        warp::serve(simulate.or(series)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, log)
}
