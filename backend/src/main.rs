#[macro_use]
extern crate rocket;

mod api;
mod config;
mod errors;
mod models;
mod services;
mod utils;

use crate::api::SpaRoot;
use crate::services::history_service::HistoryStore;
use crate::services::request_log::RequestLog;
use crate::services::usage_counter::UsageCounter;
use crate::services::youtube_client::VideoApi;
use config::{create_app_state, create_cors, init_logger, load_environment, static_dir};
use rocket::fs::FileServer;
use rocket::{Build, Rocket};
use std::path::PathBuf;

pub struct AppState {
    pub youtube: Box<dyn VideoApi>,
    pub usage: UsageCounter,
    pub history: HistoryStore,
    pub request_log: RequestLog,
    /// False on read-only deployments.
    pub save_history: bool,
}

pub fn build_rocket(state: AppState, static_dir: Option<PathBuf>) -> Rocket<Build> {
    let rocket = rocket::build()
        .manage(state)
        .mount(
            "/api",
            routes![
                api::run_search,
                api::health,
                api::usage_stats,
                api::list_history,
                api::get_history,
                api::clear_history,
                api::list_logs,
                api::log_statistics,
                api::clear_logs,
            ],
        )
        .register("/", catchers![api::not_found, api::default_catcher]);

    match static_dir {
        Some(dir) => rocket
            .mount("/", FileServer::from(&dir))
            .mount("/", routes![api::spa_fallback])
            .manage(SpaRoot(dir)),
        None => rocket,
    }
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    load_environment();
    init_logger();

    let app_state = create_app_state()?;
    let cors = create_cors()?;

    let _rocket = build_rocket(app_state, static_dir())
        .attach(cors)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed to launch: {e}"))?;

    Ok(())
}
