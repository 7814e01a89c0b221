use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings admitted. Labels: none.
pub const ADMISSIONS_TOTAL: &str = "roomlock_admissions_total";

/// Counter: booking requests rejected. Labels: reason.
pub const ADMISSIONS_REJECTED_TOTAL: &str = "roomlock_admissions_rejected_total";

/// Histogram: admission latency in seconds (validation through durability).
pub const ADMISSION_DURATION_SECONDS: &str = "roomlock_admission_duration_seconds";

/// Counter: bookings cancelled.
pub const CANCELLATIONS_TOTAL: &str = "roomlock_cancellations_total";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: rooms with a schedule loaded (lock arena size).
pub const ROOMS_ACTIVE: &str = "roomlock_rooms_active";

/// Counter: retried saves against the durable store.
pub const STORE_RETRIES_TOTAL: &str = "roomlock_store_retries_total";

/// Counter: reservations rolled back after the store kept failing.
pub const RESERVATIONS_ROLLED_BACK_TOTAL: &str = "roomlock_reservations_rolled_back_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
