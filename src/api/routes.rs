// Route handlers

use crate::api::error::ApiError;
use crate::api::models::{
    AddCertificateRequest, HealthResponse, RemoveCertificateRequest, SlashCommand,
};
use crate::api::state::AppState;
use crate::hostname;
use crate::reminder::ics_for_record;
use crate::store::{CertStatus, MonitoredRecord};
use axum::extract::{Form, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// GET /api/certificate
pub async fn list_certificates(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.list_all().await?;
    Ok(Json(records).into_response())
}

/// POST /api/certificate
pub async fn add_certificate(
    State(state): State<AppState>,
    Json(req): Json<AddCertificateRequest>,
) -> Result<Response, ApiError> {
    let record = state
        .coordinator
        .upsert(&req.url, req.expires, req.status)
        .await?;

    tracing::info!(hostname = %record.hostname, status = %record.status, "record upserted");
    Ok((StatusCode::OK, Json(record)).into_response())
}

/// DELETE /api/certificate
pub async fn remove_certificate(
    State(state): State<AppState>,
    Json(req): Json<RemoveCertificateRequest>,
) -> Result<Response, ApiError> {
    let removed = state.coordinator.remove(&req.url).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!(
            "no record for {}",
            req.url
        )));
    }

    Ok(Json(json!({ "status": "ok", "removed": removed })).into_response())
}

/// GET /api/certificate/:hostname/ics
pub async fn certificate_ics(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Response, ApiError> {
    let hostname = hostname::normalize(&raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let record = state
        .store
        .find_by_hostname(&hostname)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no record for {}", hostname)))?;

    if record.expires.is_none() {
        return Err(ApiError::NotFound(format!(
            "no expiry known for {}",
            hostname
        )));
    }

    let calendar = ics_for_record(&record)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        calendar,
    )
        .into_response())
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// Slash-command handlers below answer in plain text; the Slack bot prints
// the response body verbatim.

/// One status line for list output, with Slack `<url|label>` links for
/// records that have an expiry worth exporting
fn command_status_line(record: &MonitoredRecord, public_url: &str) -> String {
    let mut line = format!("- {}: ", record.hostname);

    match record.status {
        CertStatus::Unchecked => line.push_str("Certificate not checked yet."),
        CertStatus::Valid => match record.expires {
            Some(expires) => {
                line.push_str(&format!(
                    "Valid until {} - <{}/api/certificate/{}/ics|Download ICS> - <{}/api/command/remove/{}|Remove>",
                    expires.format("%Y-%m-%d %H:%M UTC"),
                    public_url,
                    record.hostname,
                    public_url,
                    record.hostname,
                ));
            }
            None => line.push_str("Somethings wrong here. May contact the administrator?"),
        },
        CertStatus::CheckFailed => line.push_str("Error occured. Is the url valid?"),
    }

    line.push('\n');
    line
}

/// POST /api/command/list
pub async fn command_list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.list_all().await?;

    if records.is_empty() {
        return Ok("Nothing found! You can add URLs by typing `/sally-add [URL]`".into_response());
    }

    let mut output = String::from("I have the following certificates stored:\n");
    for record in &records {
        output.push_str(&command_status_line(record, &state.public_url));
    }

    Ok(output.into_response())
}

/// POST /api/command/add
pub async fn command_add(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> Result<Response, ApiError> {
    let raw = command.text.trim();
    let record = match state.coordinator.upsert(raw, None, None).await {
        Ok(record) => record,
        Err(e) => return Ok(command_error_text(e.into())),
    };

    tracing::info!(hostname = %record.hostname, "record added via slash command");
    Ok(format!(
        "Thank you for submitting {}. I will keep you up to date!",
        raw
    )
    .into_response())
}

/// POST /api/command/remove
pub async fn command_remove(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> Result<Response, ApiError> {
    remove_as_text(&state, command.text.trim()).await
}

/// GET /api/command/remove/:url - target of the Remove link in list output
pub async fn command_remove_link(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Response, ApiError> {
    remove_as_text(&state, &raw).await
}

async fn remove_as_text(state: &AppState, raw: &str) -> Result<Response, ApiError> {
    let removed = match state.coordinator.remove(raw).await {
        Ok(removed) => removed,
        Err(e) => return Ok(command_error_text(e.into())),
    };

    if removed == 0 {
        return Ok((
            StatusCode::NOT_FOUND,
            format!("I do not know the url {}", raw),
        )
            .into_response());
    }

    Ok(format!("Successfully removed the url {}", raw).into_response())
}

/// A handler error rendered as plain text instead of the JSON error body
fn command_error_text(err: ApiError) -> Response {
    (err.status_code(), err.message().to_string()).into_response()
}

/// POST /api/command/help
pub async fn command_help() -> Response {
    let help = format!(
        ":dromedary_camel: Howdy! I am Sally.\n\
         I will remind you, when a SSL-certificate expires.\n\
         Version: {}\n\
         \n\
         ----\n\
         *Commands*\n\
         \n\
         `/sally-help` - Help command when you're stuck\n\
         `/sally-list` - List all stored URLs with their expiration date.\n\
         `/sally-add [URL]` - Add a URL, which you want to get reminders of. \
         (Also internal network URLs work). (E.g. `/sally-add google.com`)\n\
         `/sally-remove [URL]` - Remove a stored url. (E.g. `/sally-remove google.com`)\n",
        env!("CARGO_PKG_VERSION"),
    );

    help.into_response()
}
