use chrono::Local;

/// Timestamp stamped on every record of a run: local time, ISO-8601, microseconds
pub fn run_timestamp() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
