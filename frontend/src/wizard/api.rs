use gloo_net::http::{Request, Response};
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config;

pub const READY_FOR_GENERATION: &str = "ready_for_generation";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Connection error. Please check your internet and try again.")]
    Network(String),
    #[error("{}", .message.as_deref().unwrap_or("Something went wrong. Please try again."))]
    Status { status: u16, message: Option<String> },
    #[error("Your session has expired. Please start again.")]
    SessionExpired,
    #[error("Unexpected response from the server. Please try again.")]
    Malformed(String),
    #[error("Generation incomplete. Nothing usable came back, please try again.")]
    Incomplete,
}

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequest {
    pub session_id: String,
    pub user_message: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Started {
    pub session_id: String,
    /// Empty when the server sent no question text.
    pub question: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContinueOutcome {
    NextQuestion(String),
    ReadyForGeneration,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationResult {
    pub script: Option<String>,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
}

impl GenerationResult {
    pub fn is_empty(&self) -> bool {
        self.script.is_none() && self.audio_url.is_none() && self.image_url.is_none()
    }
}

// Non-string or blank values are treated as absent.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct StartBody {
    #[serde(default, deserialize_with = "lenient_string")]
    session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    first_assistant_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ContinueBody {
    #[serde(default, deserialize_with = "lenient_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    assistant_message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    #[serde(default, deserialize_with = "lenient_string")]
    script: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    audio_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    audio_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    audio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    image_url: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default, deserialize_with = "lenient_string")]
    error: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    code: Option<String>,
    #[serde(default)]
    session_expired: Option<bool>,
}

fn parse<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

pub fn decode_start(body: &str) -> Result<Started, ApiError> {
    let raw: StartBody = parse(body)?;
    let session_id = raw
        .session_id
        .ok_or_else(|| ApiError::Malformed("missing sessionId".to_string()))?;
    Ok(Started {
        session_id,
        question: raw.first_assistant_message.or(raw.message).unwrap_or_default(),
    })
}

pub fn decode_continue(body: &str) -> Result<ContinueOutcome, ApiError> {
    let raw: ContinueBody = parse(body)?;
    if raw.status.as_deref() == Some(READY_FOR_GENERATION) {
        return Ok(ContinueOutcome::ReadyForGeneration);
    }
    Ok(ContinueOutcome::NextQuestion(
        raw.assistant_message.or(raw.message).unwrap_or_default(),
    ))
}

pub fn decode_generate(body: &str) -> Result<GenerationResult, ApiError> {
    let raw: GenerateBody = parse(body)?;
    let result = GenerationResult {
        script: raw.script.or(raw.message_text).or(raw.message).or(raw.text),
        audio_url: raw.audio_url.or(raw.audio_path).or(raw.audio),
        image_url: raw.image_url,
    };
    if result.is_empty() {
        return Err(ApiError::Incomplete);
    }
    Ok(result)
}

/// Maps a non-2xx response to an error. `session_bound` is set for calls
/// that refer to an existing session, where 404/410 mean it is gone.
pub fn decode_error(status: u16, body: &str, session_bound: bool) -> ApiError {
    let raw: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let flagged = raw.session_expired == Some(true)
        || raw.code.as_deref() == Some("session_expired");
    if flagged || (session_bound && matches!(status, 404 | 410)) {
        return ApiError::SessionExpired;
    }
    ApiError::Status {
        status,
        message: raw.error.or(raw.message),
    }
}

/// The remote thought-chat service.
#[allow(async_fn_in_trait)]
pub trait SessionApi {
    async fn start(&self, request: &StartRequest) -> Result<Started, ApiError>;
    async fn continue_session(&self, request: &ContinueRequest) -> Result<ContinueOutcome, ApiError>;
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, ApiError>;
    async fn probe(&self, session_id: &str) -> Result<(), ApiError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HttpSessionApi;

impl HttpSessionApi {
    async fn read(response: Response, session_bound: bool) -> Result<String, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if response.ok() {
            Ok(body)
        } else {
            warn!("thought-chat request failed with status: {}", status);
            Err(decode_error(status, &body, session_bound))
        }
    }

    async fn post<T: Serialize>(endpoint: &str, body: &T, session_bound: bool) -> Result<String, ApiError> {
        let response = Request::post(&config::thought_chat_url(endpoint))
            .json(body)
            .map_err(|e| ApiError::Malformed(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read(response, session_bound).await
    }
}

impl SessionApi for HttpSessionApi {
    async fn start(&self, request: &StartRequest) -> Result<Started, ApiError> {
        info!("Starting {} session", request.product_id);
        let body = Self::post("start", request, false).await?;
        decode_start(&body)
    }

    async fn continue_session(&self, request: &ContinueRequest) -> Result<ContinueOutcome, ApiError> {
        let body = Self::post("continue", request, true).await?;
        decode_continue(&body)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, ApiError> {
        info!("Requesting generation");
        let body = Self::post("generate", request, true).await?;
        decode_generate(&body)
    }

    async fn probe(&self, session_id: &str) -> Result<(), ApiError> {
        let url = config::thought_chat_url(&format!("session/{}", urlencoding::encode(session_id)));
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read(response, true).await.map(|_| ())
    }
}

/// A request the controller wants performed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outbound {
    Probe(String),
    Start(StartRequest),
    Continue(ContinueRequest),
    Generate(GenerateRequest),
}

/// The result of performing an [`Outbound`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    Probed(Result<(), ApiError>),
    Started(Result<Started, ApiError>),
    Continued(Result<ContinueOutcome, ApiError>),
    Generated(Result<GenerationResult, ApiError>),
}

pub async fn dispatch<A: SessionApi>(api: &A, outbound: Outbound) -> Inbound {
    match outbound {
        Outbound::Probe(id) => Inbound::Probed(api.probe(&id).await),
        Outbound::Start(req) => Inbound::Started(api.start(&req).await),
        Outbound::Continue(req) => Inbound::Continued(api.continue_session(&req).await),
        Outbound::Generate(req) => Inbound::Generated(api.generate(&req).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_prefers_first_assistant_message() {
        let started = decode_start(r#"{"sessionId":"s1","firstAssistantMessage":"Q1","message":"other"}"#).unwrap();
        assert_eq!(started, Started { session_id: "s1".into(), question: "Q1".into() });

        let fallback = decode_start(r#"{"sessionId":"s1","message":"Q1"}"#).unwrap();
        assert_eq!(fallback.question, "Q1");
    }

    #[test]
    fn start_without_session_id_is_malformed() {
        assert!(matches!(decode_start(r#"{"message":"hi"}"#), Err(ApiError::Malformed(_))));
        assert!(matches!(decode_start("not json"), Err(ApiError::Malformed(_))));
    }

    #[test]
    fn missing_question_text_falls_back_to_empty() {
        let outcome = decode_continue(r#"{"assistantMessage": null}"#).unwrap();
        assert_eq!(outcome, ContinueOutcome::NextQuestion(String::new()));
    }

    #[test]
    fn ready_status_wins_over_any_question_text() {
        let outcome = decode_continue(r#"{"status":"ready_for_generation","message":"ignored"}"#).unwrap();
        assert_eq!(outcome, ContinueOutcome::ReadyForGeneration);
    }

    #[test]
    fn generate_checks_field_names_in_priority_order() {
        let result = decode_generate(
            r#"{"text":"t","message":"m","audioPath":"/a.mp3","audio":"/b.mp3","imageUrl":"/i.png"}"#,
        )
        .unwrap();
        assert_eq!(result.script.as_deref(), Some("m"));
        assert_eq!(result.audio_url.as_deref(), Some("/a.mp3"));
        assert_eq!(result.image_url.as_deref(), Some("/i.png"));
    }

    #[test]
    fn generate_ignores_non_string_and_blank_fields() {
        assert_eq!(decode_generate(r#"{"script":"  ","audio":{"url":"x"}}"#), Err(ApiError::Incomplete));
    }

    #[test]
    fn error_bodies_are_surfaced_verbatim() {
        let err = decode_error(400, r#"{"error":"Token already used"}"#, false);
        assert_eq!(err.to_string(), "Token already used");

        let bare = decode_error(500, "", false);
        assert_eq!(bare, ApiError::Status { status: 500, message: None });
    }

    #[test]
    fn session_expiry_signals() {
        assert!(decode_error(404, "", true).is_session_expired());
        assert!(!decode_error(404, "", false).is_session_expired());
        assert!(decode_error(400, r#"{"code":"session_expired"}"#, false).is_session_expired());
        assert!(decode_error(401, r#"{"sessionExpired":true}"#, false).is_session_expired());
    }

    #[test]
    fn request_bodies_omit_absent_optionals() {
        let start = StartRequest { product_id: "santa_message".into(), token: None, first_name: Some("Mia".into()) };
        assert_eq!(serde_json::to_value(&start).unwrap(), json!({"productId":"santa_message","firstName":"Mia"}));

        let cont = ContinueRequest { session_id: "s1".into(), user_message: "hi".into() };
        assert_eq!(serde_json::to_value(&cont).unwrap(), json!({"sessionId":"s1","userMessage":"hi"}));
    }
}
