use accord_core::{
    db::Db,
    extract::{self, Extractor},
    mediator::Mediator,
    types::{ChatMessage, Dispute, DisputeStatus, NewDispute, Parties},
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Uploads larger than this are rejected by the body-limit layer.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    pub db: Arc<Db>,
    pub extractor: Extractor,
    pub mediator: Mediator,
}

// ── Error mapping ─────────────────────────────────────────────────────────

/// Maps error kinds to status codes explicitly. Every variant renders as
/// `{"error": message}`.
pub enum ApiError {
    BadRequest(String),
    NotFound(&'static str),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            Self::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

// ── Request body types ────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct StatusBody {
    #[serde(default)]
    status: String,
}

/// The `parties` form field arrives as a JSON string; both keys must be
/// present and non-empty for the dispute to be accepted.
#[derive(Deserialize, Default)]
struct PartiesForm {
    #[serde(default)]
    plaintiff: String,
    #[serde(default)]
    defendant: String,
}

// ── Serializable wrappers ─────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatMessageJson {
    user_message: String,
    ai_response: String,
    timestamp: String,
}

impl From<ChatMessage> for ChatMessageJson {
    fn from(m: ChatMessage) -> Self {
        Self {
            user_message: m.user_message,
            ai_response: m.ai_response,
            timestamp: m.timestamp.to_rfc3339(),
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(health))
        // Disputes
        .route("/api/disputes", get(list_disputes))
        .route("/api/disputes", post(create_dispute))
        .route("/api/disputes/:id", get(get_dispute))
        .route("/api/disputes/:id/mediate", post(mediate_dispute))
        .route("/api/disputes/:id/status", put(update_status))
        // Mediator chat
        .route("/api/disputes/:id/chat", post(chat_with_mediator))
        .route("/api/disputes/:id/chat/history", get(chat_history))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn list_disputes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Dispute>>, ApiError> {
    let disputes = state.db.list_disputes()?;
    Ok(Json(disputes))
}

async fn get_dispute(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Dispute>, ApiError> {
    match state.db.get_dispute(id)? {
        None => Err(ApiError::NotFound("Dispute not found")),
        Some(dispute) => Ok(Json(dispute)),
    }
}

async fn create_dispute(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Dispute>), ApiError> {
    let mut title = String::new();
    let mut description = String::new();
    let mut category = String::new();
    let mut amount_raw = String::new();
    let mut parties_raw = String::new();
    let mut evidence_texts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name.starts_with("evidence_") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {e}")))?;
            // Files outside the allow-list are silently skipped.
            if !file_name.is_empty() && extract::is_allowed(&file_name) {
                evidence_texts.push(state.extractor.extract(&data, &file_name).await);
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid form field: {e}")))?;
            match name.as_str() {
                "title" => title = value,
                "description" => description = value,
                "category" => category = value,
                "amount" => amount_raw = value,
                "parties" => parties_raw = value,
                _ => {}
            }
        }
    }

    let parties: PartiesForm = if parties_raw.is_empty() {
        PartiesForm::default()
    } else {
        serde_json::from_str(&parties_raw)
            .map_err(|_| ApiError::BadRequest("Invalid parties JSON".to_string()))?
    };

    if title.is_empty()
        || description.is_empty()
        || category.is_empty()
        || parties.plaintiff.is_empty()
        || parties.defendant.is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let amount = if amount_raw.is_empty() {
        None
    } else {
        Some(
            amount_raw
                .parse::<f64>()
                .map_err(|_| ApiError::BadRequest("Invalid amount".to_string()))?,
        )
    };

    let dispute = state.db.insert_dispute(&NewDispute {
        title,
        description,
        category,
        amount,
        parties: Parties {
            plaintiff: parties.plaintiff,
            defendant: parties.defendant,
        },
        evidence_texts,
    })?;

    Ok((StatusCode::CREATED, Json(dispute)))
}

async fn mediate_dispute(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let dispute = state
        .db
        .get_dispute(id)?
        .ok_or(ApiError::NotFound("Dispute not found"))?;

    let outcome = state.mediator.mediate(&dispute).await;
    if outcome.degraded {
        tracing::warn!("mediation for dispute #{id} used degraded LLM output");
    }

    state
        .db
        .update_mediation(id, &outcome.analysis, &outcome.suggestions)?;

    Ok(Json(json!({
        "analysis": outcome.analysis,
        "settlement_suggestions": outcome.suggestions,
    })))
}

async fn chat_with_mediator(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Value>, ApiError> {
    if body.message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let dispute = state
        .db
        .get_dispute(id)?
        .ok_or(ApiError::NotFound("Dispute not found"))?;

    let reply = state.mediator.respond(&body.message, &dispute).await;
    if reply.degraded {
        tracing::warn!("chat for dispute #{id} used degraded LLM output");
    }

    state
        .db
        .insert_chat_message(id, &body.message, &reply.text)?;

    Ok(Json(json!({ "response": reply.text })))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Value>, ApiError> {
    let status = DisputeStatus::parse(&body.status)
        .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?;

    if !state.db.update_status(id, status)? {
        return Err(ApiError::NotFound("Dispute not found"));
    }

    Ok(Json(json!({ "message": "Status updated successfully" })))
}

async fn chat_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ChatMessageJson>>, ApiError> {
    let messages = state.db.list_chat_messages(id)?;
    Ok(Json(messages.into_iter().map(ChatMessageJson::from).collect()))
}
