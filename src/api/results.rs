use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use tracing::{info, warn};

use super::AppState;
use super::error::ApiError;
use super::model::ResultsQuery;
use crate::store::ResultSet;

/// GET /results?token=...
pub async fn get_all_by_token(
    State(state): State<AppState>,
    query: Result<Query<ResultsQuery>, QueryRejection>,
) -> Result<Json<ResultSet>, ApiError> {
    let Query(query) = query.map_err(|e| {
        warn!("Failed to decode results query: {}", e);
        ApiError::InvalidQuery(e.to_string())
    })?;

    let token = match query.token() {
        Some(token) if !token.is_empty() => token,
        _ => {
            warn!("Rejected results request without token");
            return Err(ApiError::MissingTokenParam);
        }
    };

    let results = state.store.get_all_by_token(token);
    info!("Returning {} results", results.len());
    Ok(Json(results))
}
