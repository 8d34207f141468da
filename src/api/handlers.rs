use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{CategorySelections, MovieInfo, Registration, Review},
    services::{intro, reviews},
};

use super::AppState;

// Request types

/// Inbound SMS webhook payload (Twilio posts form-encoded From/Body/To).
#[derive(Debug, Deserialize)]
pub struct InboundSms {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetReviewsParams {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub consent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WittyIntroRequest {
    pub movie: Option<MovieInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResultsRequest {
    pub contacts: Vec<String>,
    /// Base64 data URL of the rendered result card
    pub image: String,
    #[serde(default)]
    pub poster_url: Option<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Spin result: generate a movie for the (possibly partial) category picks.
pub async fn generate_movie(
    State(state): State<AppState>,
    Json(selections): Json<CategorySelections>,
) -> AppResult<Json<MovieInfo>> {
    let movie = state.suggestions.generate(&selections).await?;
    Ok(Json(movie))
}

/// Current weekly pick.
pub async fn get_weekly_movie(State(state): State<AppState>) -> AppResult<Json<Value>> {
    match state.stores.weekly.read_document::<Value>().await {
        Some(doc) => Ok(Json(doc)),
        None => Err(AppError::NotFound("No weekly movie set".to_string())),
    }
}

/// Publishes the weekly pick, replacing the prior document wholesale. The
/// document passes through untouched apart from requiring title and code.
pub async fn set_weekly_movie(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let has_field = |field: &str| {
        body.get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };
    if !has_field("code") || !has_field("title") {
        return Err(AppError::InvalidInput("Missing required fields".to_string()));
    }

    state.stores.weekly.replace_document(&body).await?;

    tracing::info!(
        title = body["title"].as_str().unwrap_or(""),
        code = body["code"].as_str().unwrap_or(""),
        "weekly movie published"
    );

    Ok(Json(json!({ "success": true })))
}

/// Reviews for a code, matched case-insensitively. Unknown codes simply
/// return an empty list.
pub async fn get_reviews(
    State(state): State<AppState>,
    Query(params): Query<GetReviewsParams>,
) -> AppResult<Json<Vec<Review>>> {
    let code = params
        .code
        .ok_or_else(|| AppError::InvalidInput("Missing code parameter".to_string()))?;

    let stored: Vec<Review> = state.stores.reviews.read_array().await;
    let matching: Vec<Review> = stored
        .into_iter()
        .filter(|r| {
            r.code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(&code))
        })
        .collect();

    Ok(Json(matching))
}

/// Inbound SMS webhook: parse the leading review code and append the review.
/// No validation that the code matches any published movie.
pub async fn receive_review(
    State(state): State<AppState>,
    Form(sms): Form<InboundSms>,
) -> AppResult<Response> {
    let (from, body) = match (sms.from, sms.body) {
        (Some(from), Some(body)) if !from.is_empty() && !body.is_empty() => (from, body),
        _ => return Err(AppError::InvalidInput("Missing required fields".to_string())),
    };

    let (code, review_text) = reviews::extract_code_and_review(&body);
    let entry = Review {
        from,
        to: sms.to,
        code,
        review: review_text,
        raw: body,
        timestamp: Utc::now(),
    };

    state.stores.reviews.append(&entry).await?;

    tracing::info!(code = entry.code.as_deref().unwrap_or(""), "review received");

    Ok((StatusCode::OK, "Review received. Thank you!").into_response())
}

/// Member signup. The welcome SMS is best-effort; signup already succeeded
/// by the time it goes out.
pub async fn register_user(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Json<Value>> {
    let name = form.name.unwrap_or_default();
    let phone = form.phone.unwrap_or_default();
    let consent_given = matches!(form.consent.as_deref(), Some("yes") | Some("on") | Some("true"));

    if name.is_empty() || phone.is_empty() || !consent_given {
        return Err(AppError::InvalidInput(
            "Missing required fields or consent not given.".to_string(),
        ));
    }

    let registration = Registration {
        name: name.clone(),
        phone: phone.clone(),
        consent: true,
        date: Utc::now(),
    };
    state.stores.registrations.append(&registration).await?;

    let sms = state.sms.clone();
    tokio::spawn(async move {
        let body =
            format!("Hi {name}, thanks for joining the movie club! Reply STOP anytime to opt out.");
        if let Err(e) = sms.send_sms(&phone, &body, None).await {
            tracing::error!(error = %e, phone = %phone, "welcome SMS failed");
        }
    });

    Ok(Json(json!({ "success": true })))
}

/// One-line AI intro for a pick; always 200, with a templated fallback when
/// the model is unavailable and an empty intro when there is no movie.
pub async fn ai_witty_intro(
    State(state): State<AppState>,
    Json(request): Json<WittyIntroRequest>,
) -> Json<Value> {
    let Some(movie) = request.movie.filter(|m| !m.title.is_empty()) else {
        return Json(json!({ "intro": "" }));
    };

    let intro = intro::witty_intro(state.chat.as_ref(), &movie).await;
    Json(json!({ "intro": intro }))
}

/// Fan the rendered result out to a contact list; per-contact statuses,
/// never a wholesale failure.
pub async fn send_results(
    State(state): State<AppState>,
    Json(request): Json<SendResultsRequest>,
) -> AppResult<Json<Value>> {
    let encoded = request
        .image
        .split(',')
        .nth(1)
        .ok_or_else(|| AppError::InvalidInput("Image must be a base64 data URL".to_string()))?;
    let image = BASE64
        .decode(encoded)
        .map_err(|_| AppError::InvalidInput("Invalid base64 image data".to_string()))?;

    tracing::info!(contacts = request.contacts.len(), "dispatching results");

    let results = state
        .dispatcher
        .send_results(&request.contacts, image, request.poster_url.as_deref())
        .await;

    Ok(Json(json!({ "results": results })))
}
