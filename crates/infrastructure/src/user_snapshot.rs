use std::path::Path;

use tallyhub_core::{AppError, AppResult};
use tallyhub_domain::User;
use tracing::debug;

/// Reads a session user snapshot serialized as JSON.
pub async fn load_user_snapshot(path: &Path) -> AppResult<User> {
    let source = tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to read user snapshot '{}': {error}",
            path.display()
        ))
    })?;

    let user = parse_user_snapshot(source.as_str())?;
    debug!(
        role = %user.role(),
        has_permission_grant = user.permission_grant().is_some(),
        "loaded user snapshot"
    );
    Ok(user)
}

/// Parses a session user snapshot from JSON text.
pub fn parse_user_snapshot(source: &str) -> AppResult<User> {
    serde_json::from_str::<User>(source)
        .map_err(|error| AppError::Validation(format!("invalid user snapshot: {error}")))
}
