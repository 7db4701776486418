use crate::models::{HistoryEntry, LogEntry, UsageRecord};
use crate::services::history_service::HistoryStore;
use crate::services::record_store::JsonFileStore;
use crate::services::request_log::RequestLog;
use crate::services::usage_counter::UsageCounter;
use crate::services::youtube_client::YouTubeClient;
use crate::AppState;
use anyhow::{anyhow, Context, Result};
use env_logger::Builder;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

pub const USAGE_FILE: &str = "api-stats.json";
pub const HISTORY_FILE: &str = "search-history.json";
pub const REQUEST_LOG_FILE: &str = "search-request-log.json";

lazy_static! {
    pub static ref YOUTUBE_API_KEY: Option<String> = env::var("YOUTUBE_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    pub static ref YOUTUBE_API_BASE_URL: String = env::var("YOUTUBE_API_BASE_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string());
    pub static ref DATA_DIR: PathBuf =
        PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| ".".to_string()));
    pub static ref STATIC_DIR: PathBuf =
        PathBuf::from(env::var("STATIC_DIR").unwrap_or_else(|_| "frontend/dist".to_string()));
    pub static ref CORS_ALLOWED_ORIGIN: String = env::var("CORS_ALLOWED_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    /// Vercel deployments have a read-only filesystem, so history is not written there.
    pub static ref SERVERLESS: bool = env::var("VERCEL").is_ok();
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting view search backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
    dotenv::from_filename("key.env").ok();
}

pub fn youtube_api_key() -> Result<String> {
    YOUTUBE_API_KEY
        .clone()
        .ok_or_else(|| anyhow!("YOUTUBE_API_KEY must be set (in the environment, .env or key.env)"))
}

/// Directories probed for an existing data file, in order of preference.
const DATA_FILE_LOCATIONS: [&[&str]; 5] = [
    &["src", "public"],
    &["src"],
    &["public"],
    &[],
    &["build"],
];

/// First existing copy of `file_name` under the probed locations, or `data_dir/file_name`.
pub fn resolve_data_file(data_dir: &Path, file_name: &str) -> PathBuf {
    DATA_FILE_LOCATIONS
        .iter()
        .map(|segments| {
            segments
                .iter()
                .fold(data_dir.to_path_buf(), |dir, segment| dir.join(segment))
                .join(file_name)
        })
        .find(|candidate| candidate.exists())
        .unwrap_or_else(|| data_dir.join(file_name))
}

pub fn create_app_state() -> Result<AppState> {
    let api_key = youtube_api_key()?;
    let base_url = Url::parse(&YOUTUBE_API_BASE_URL)
        .with_context(|| format!("Invalid YOUTUBE_API_BASE_URL: {}", *YOUTUBE_API_BASE_URL))?;
    info!("Using YouTube Data API at: {base_url}");

    let data_dir = &*DATA_DIR;
    let usage_store: JsonFileStore<UsageRecord> =
        JsonFileStore::new(resolve_data_file(data_dir, USAGE_FILE));
    let history_store: JsonFileStore<Vec<HistoryEntry>> =
        JsonFileStore::new(resolve_data_file(data_dir, HISTORY_FILE));
    let log_store: JsonFileStore<Vec<LogEntry>> =
        JsonFileStore::new(resolve_data_file(data_dir, REQUEST_LOG_FILE));
    info!(
        "Data files: {}, {}, {}",
        usage_store.path().display(),
        history_store.path().display(),
        log_store.path().display()
    );

    if *SERVERLESS {
        info!("Serverless deployment detected, search history will not be saved");
    }

    Ok(AppState {
        youtube: Box::new(YouTubeClient::new(api_key, base_url)),
        usage: UsageCounter::new(Box::new(usage_store)),
        history: HistoryStore::new(Box::new(history_store)),
        request_log: RequestLog::new(Box::new(log_store)),
        save_history: !*SERVERLESS,
    })
}

/// `Some` when the built frontend exists and should be served by the backend.
pub fn static_dir() -> Option<PathBuf> {
    let dir = &*STATIC_DIR;
    if dir.join("index.html").exists() {
        info!("Serving frontend from {}", dir.display());
        Some(dir.clone())
    } else {
        info!("No frontend build at {}, serving the API only", dir.display());
        None
    }
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let origin = CORS_ALLOWED_ORIGIN.as_str();
    let allowed_origins = if origin == "*" {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&[origin])
    };

    let cors = CorsOptions::default()
        .allowed_origins(allowed_origins)
        .allowed_methods(
            vec![Method::Get, Method::Delete, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn data_file_prefers_public_copy_when_present() {
        let dir = tempdir().unwrap();
        assert_eq!(
            resolve_data_file(dir.path(), HISTORY_FILE),
            dir.path().join(HISTORY_FILE)
        );

        fs::create_dir(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public").join(HISTORY_FILE), "[]").unwrap();
        assert_eq!(
            resolve_data_file(dir.path(), HISTORY_FILE),
            dir.path().join("public").join(HISTORY_FILE)
        );
        // other stores are probed independently
        assert_eq!(
            resolve_data_file(dir.path(), USAGE_FILE),
            dir.path().join(USAGE_FILE)
        );
    }

    #[test]
    fn data_file_probes_locations_in_order() {
        let dir = tempdir().unwrap();
        let place = |segments: &[&str]| {
            let parent = segments.iter().fold(dir.path().to_path_buf(), |d, s| d.join(s));
            fs::create_dir_all(&parent).unwrap();
            fs::write(parent.join(REQUEST_LOG_FILE), "[]").unwrap();
            parent.join(REQUEST_LOG_FILE)
        };

        let build = place(&["build"]);
        assert_eq!(resolve_data_file(dir.path(), REQUEST_LOG_FILE), build);

        let root = place(&[]);
        assert_eq!(resolve_data_file(dir.path(), REQUEST_LOG_FILE), root);

        let public = place(&["public"]);
        assert_eq!(resolve_data_file(dir.path(), REQUEST_LOG_FILE), public);

        let src = place(&["src"]);
        assert_eq!(resolve_data_file(dir.path(), REQUEST_LOG_FILE), src);

        let src_public = place(&["src", "public"]);
        assert_eq!(resolve_data_file(dir.path(), REQUEST_LOG_FILE), src_public);
    }

    #[test]
    fn cors_options_build() {
        assert!(create_cors().is_ok());
    }
}
