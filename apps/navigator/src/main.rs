//! Tallyhub navigation inspector.
//!
//! Prints the navigation tree visible to a user snapshot, or the guard
//! decision for a single route.

#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tallyhub_application::{CatalogRepository, NavigationService};
use tallyhub_core::{AppError, AppResult};
use tallyhub_infrastructure::{
    EmbeddedCatalogRepository, JsonFileCatalogRepository, load_user_snapshot,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct NavigatorConfig {
    user_path: PathBuf,
    catalog_path: Option<PathBuf>,
    guard_path: Option<String>,
}

impl NavigatorConfig {
    fn load() -> AppResult<Self> {
        let user_path = PathBuf::from(required_env("TALLYHUB_USER_PATH")?);
        let catalog_path = optional_env("TALLYHUB_CATALOG_PATH").map(PathBuf::from);
        let guard_path = optional_env("TALLYHUB_GUARD_PATH");

        if let Some(path) = guard_path.as_deref()
            && !path.starts_with('/')
        {
            return Err(AppError::Validation(format!(
                "TALLYHUB_GUARD_PATH must start with '/', got '{path}'"
            )));
        }

        Ok(Self {
            user_path,
            catalog_path,
            guard_path,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = NavigatorConfig::load()?;
    let user = load_user_snapshot(config.user_path.as_path()).await?;
    let service = NavigationService::new(build_catalog_repository(&config));

    info!(
        user_path = %config.user_path.display(),
        catalog = %config
            .catalog_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "embedded".to_owned()),
        role = %user.role(),
        "tallyhub-navigator started"
    );

    if let Some(path) = config.guard_path.as_deref() {
        let allowed = service.can_access_path(Some(&user), path).await?;
        if !allowed {
            warn!(path, role = %user.role(), "route is not accessible");
        }
        println!("{}", if allowed { "allowed" } else { "denied" });
        return Ok(());
    }

    let navigation = service.visible_navigation(Some(&user)).await?;
    let rendered = serde_json::to_string_pretty(&navigation).map_err(|error| {
        AppError::Internal(format!("failed to render navigation: {error}"))
    })?;
    println!("{rendered}");

    Ok(())
}

fn build_catalog_repository(config: &NavigatorConfig) -> Arc<dyn CatalogRepository> {
    match config.catalog_path.as_ref() {
        Some(path) => Arc::new(JsonFileCatalogRepository::new(path.clone())),
        None => Arc::new(EmbeddedCatalogRepository::new()),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
