use actix_web::{web, get, HttpResponse, Responder};
use humantime::format_duration;
use once_cell::sync::Lazy;
use chrono::Utc;
use std::{
    time::Duration,
    sync::{atomic::{AtomicI64, Ordering}, RwLock},
};
use sysinfo::System;
use serde::Serialize;
use crate::{constants::START_TIME, entities::asset::AssetCategory, repositories::storage::AssetStorage, AppState};

#[derive(Serialize, Clone, Default)]
struct SystemInfo {
    os: String,
    kernel: String,
    hostname: String,
    cpu_count: usize,
    memory_total: String,
}

#[derive(Serialize, Clone, Default)]
struct StorageStatus {
    images: String,
    files: String,
}

#[derive(Serialize, Clone, Default)]
struct MetricsResponse {
    status: String,
    uptime: String,
    timestamp: String,
    start_at: String,
    version: String,
    pid: u32,
    memory_usage: String,
    cpu_usage: String,
    storage: StorageStatus,
    system: SystemInfo,
}

static LAST_CHECK: AtomicI64 = AtomicI64::new(0);
static CACHED_METRICS: Lazy<RwLock<MetricsResponse>> = Lazy::new(||
    RwLock::new(MetricsResponse::default())
);

fn root_status(ready: bool) -> String {
    if ready { "OK" } else { "Unavailable" }.to_string()
}

async fn build_metrics(state: &web::Data<AppState>) -> MetricsResponse {
    let now_utc = Utc::now();
    let uptime_duration = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime_duration.num_seconds().max(0) as u64));

    let mut sys = System::new_all();
    sys.refresh_all();

    let system_info = SystemInfo {
        os: System::name().unwrap_or_else(|| "Unknown".to_string()),
        kernel: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: sys.cpus().len(),
        memory_total: format!("{:.2} GB", sys.total_memory() as f64 / 1024.0 / 1024.0 / 1024.0),
    };

    let storage = &state.asset_handler.storage;
    let storage_status = StorageStatus {
        images: root_status(storage.root_ready(AssetCategory::Image).await),
        files: root_status(storage.root_ready(AssetCategory::File).await),
    };

    let pid = std::process::id();
    let process = sys.process(sysinfo::Pid::from_u32(pid));
    let memory_usage = process.map_or("Unknown".to_string(), |p|
        format!("{:.2} MB", p.memory() as f64 / 1024.0 / 1024.0)
    );
    let cpu_usage = process.map_or("Unknown".to_string(), |p| format!("{:.1}%", p.cpu_usage()));

    MetricsResponse {
        status: "healthy".to_string(),
        uptime: human_uptime.to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pid,
        memory_usage,
        cpu_usage,
        storage: storage_status,
        system: system_info,
    }
}

/// Liveness probe: the process answers.
#[get("/livez")]
pub async fn livez() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Readiness probe: both storage roots are present.
#[get("/readyz")]
pub async fn readyz(state: web::Data<AppState>) -> impl Responder {
    if state.resolver.storage_ready().await {
        HttpResponse::Ok().body("OK")
    } else {
        tracing::warn!("Readiness check failed: storage root missing");
        HttpResponse::ServiceUnavailable().body("Service Unavailable")
    }
}

#[get("/metrics")]
pub async fn metrics(state: web::Data<AppState>) -> impl Responder {
    let now = Utc::now().timestamp();
    let last = LAST_CHECK.load(Ordering::Relaxed);

    if now - last > 5 {
        let response = build_metrics(&state).await;

        if let Ok(mut cache) = CACHED_METRICS.write() {
            *cache = response.clone();
            LAST_CHECK.store(now, Ordering::Relaxed);
        }

        HttpResponse::Ok().json(response)
    } else {
        match CACHED_METRICS.read() {
            Ok(response) => HttpResponse::Ok().json(response.clone()),
            Err(e) => {
                tracing::warn!("Metrics cache lock poisoned: {}", e);
                let response = build_metrics(&state).await;
                HttpResponse::Ok().json(response)
            }
        }
    }
}
