//! HTTP handlers for the directory API

use super::server::AppState;
use crate::filter::{filter_members, FilterCriteria};
use crate::graph::ResultBoard;
use crate::member::MemberId;
use crate::roster::{MemberUpdate, Roster, RosterError, RosterResult};
use crate::search::SearchResponse;
use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

/// Form field carrying the uploaded sheet
pub const CSV_FIELD: &str = "csv_file";

/// Error reply with a `{"message": ...}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<RosterError> for ApiError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::MemberNotFound(_) => ApiError::not_found("User not found"),
            RosterError::DuplicateEmail(_) => ApiError::new(StatusCode::CONFLICT, e.to_string()),
            e if e.is_invalid_input() => ApiError::bad_request(e.to_string()),
            e => {
                error!(error = %e, "roster operation failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Rewrite the roster file, when one is configured
async fn persist(state: &AppState, roster: &Roster) -> ApiResult<()> {
    let Some(path) = state.csv_path.as_deref() else {
        return Ok(());
    };
    let bytes = roster.to_csv_bytes()?;
    tokio::fs::write(path, bytes).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to write roster file");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save the roster")
    })
}

/// Apply a change to a copy of the roster, save the copy, then publish it
///
/// A failed save leaves the served roster as it was.
async fn commit<T>(
    state: &AppState,
    change: impl FnOnce(&mut Roster) -> RosterResult<T>,
) -> ApiResult<T> {
    let mut roster = state.roster.write().await;
    let mut staged = roster.clone();
    let outcome = change(&mut staged)?;
    persist(state, &staged).await?;
    *roster = staged;
    Ok(outcome)
}

/// Handler for `GET /users`
pub async fn list_users_handler(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let roster = state.roster.read().await;
    if roster.is_empty() {
        return Err(ApiError::not_found("Empty database"));
    }
    Ok(Json(roster.list()))
}

/// Handler for `GET /users/:id`
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let roster = state.roster.read().await;
    let member = roster
        .get(MemberId::new(id))
        .cloned()
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(member))
}

/// Handler for `POST /filter`
///
/// Runs the same engine as the client, so both sides agree on every result.
pub async fn filter_handler(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let criteria =
        FilterCriteria::from_query_payload(&payload).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let roster = state.roster.read().await;
    let members = roster.list();
    Ok(Json(filter_members(&members, Some(&criteria))))
}

/// Handler for `POST /keywords`: raw skills text in, keyword list out
pub async fn keywords_handler(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<impl IntoResponse> {
    if body.trim().is_empty() {
        return Err(ApiError::bad_request("No user expertise provided"));
    }
    let roster = state.roster.read().await;
    Ok(Json(roster.keywords(&body)))
}

/// Handler for `PUT /update_user/:id`
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(update): Json<MemberUpdate>,
) -> ApiResult<impl IntoResponse> {
    let member = commit(&state, |roster| roster.update(MemberId::new(id), update).cloned()).await?;

    Ok(Json(json!({
        "message": "User information updated successfully",
        "user": member,
    })))
}

/// Handler for `DELETE /delete_user/:id`
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let removed = commit(&state, |roster| roster.remove(MemberId::new(id))).await?;

    info!(id, email = %removed.email, "member deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// Handler for `GET /download_csv`
pub async fn download_csv_handler(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let roster = state.roster.read().await;
    let bytes = roster.to_csv_bytes()?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"membres.csv\""),
        ],
        bytes,
    ))
}

/// Handler for `POST /upload_csv` (multipart, file in the `csv_file` field)
///
/// The sheet is validated before any member changes.
pub async fn upload_csv_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some(CSV_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        upload = Some((file_name, bytes));
    }

    let (file_name, bytes) = upload.ok_or_else(|| ApiError::bad_request("No file part"))?;
    if file_name.is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(ApiError::bad_request("Only CSV format files are allowed."));
    }

    let report = commit(&state, |roster| roster.import_csv(bytes.as_ref())).await?;

    info!(file = %file_name, "roster sheet uploaded");
    Ok(Json(json!({
        "message": "CSV file uploaded and roster updated successfully",
        "report": report,
    })))
}

/// Handler for `POST /graph`: search response in, board out
pub async fn board_handler(Json(response): Json<SearchResponse>) -> impl IntoResponse {
    Json(ResultBoard::build(&response.experts))
}

/// Handler for system status
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let roster = state.roster.read().await;
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
        "roster": {
            "members": roster.len(),
        }
    }))
}
