//! LLM integration for plan generation
//!
//! This module handles communication with the Gemini API: it turns user
//! preferences into a prompt plus a response schema, and maps the structured
//! reply into plan data with locally generated identifiers.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::config::Config;
use crate::models::{
  new_id, now_millis, Exercise, Goal, Level, UserPreferences, WorkoutDay, WorkoutPlan,
};

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

/// Any failure to obtain a usable plan or day from the generation service.
///
/// Callers treat every variant the same way; the variants only exist to make
/// logs useful.
#[derive(Error, Debug, Serialize)]
pub enum GenerationError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Empty response from generation service")]
  EmptyResponse,

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Gemini API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
  system_instruction: Content,
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  response_mime_type: String,
  response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  usage_metadata: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
  #[serde(default)]
  pub prompt_token_count: u32,
  #[serde(default)]
  pub candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
  error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Generated Shapes (what the model returns, before ids are assigned)
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPlan {
  #[serde(default)]
  modelo: Vec<String>,
  dias: Vec<RawDay>,
}

#[derive(Debug, Deserialize)]
struct RawDay {
  nome: String,
  musculos: Vec<String>,
  exercicios: Vec<RawExercise>,
}

#[derive(Debug, Deserialize)]
struct RawExercise {
  nome: String,
  series: String,
  reps: String,
  descanso: String,
  dicas: String,
  #[serde(default)]
  alternativa: Option<String>,
}

impl RawExercise {
  fn into_exercise(self) -> Exercise {
    Exercise {
      id: new_id(),
      name: self.nome,
      sets: self.series,
      reps: self.reps,
      rest: self.descanso,
      tips: self.dicas,
      alternative: self.alternativa.filter(|a| !a.trim().is_empty()),
    }
  }
}

impl RawDay {
  fn into_day(self, id: String) -> WorkoutDay {
    WorkoutDay {
      id,
      name: self.nome,
      muscles: self.musculos,
      exercises: self.exercicios.into_iter().map(RawExercise::into_exercise).collect(),
    }
  }
}

/// A freshly generated plan body, before it has a plan id or name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
  pub models: Vec<String>,
  pub goal: Goal,
  pub level: Level,
  pub days: Vec<WorkoutDay>,
}

impl GeneratedPlan {
  /// Give the plan its identity: new id, creation time and default name
  pub fn into_plan(self) -> WorkoutPlan {
    WorkoutPlan {
      id: new_id(),
      custom_name: WorkoutPlan::default_name(self.goal, &self.models),
      models: self.models,
      goal: self.goal,
      level: self.level,
      days: self.days,
      created_at: now_millis(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Response Schemas
/// ---------------------------------------------------------------------------

fn exercise_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "nome": { "type": "STRING" },
      "series": { "type": "STRING" },
      "reps": { "type": "STRING" },
      "descanso": { "type": "STRING" },
      "dicas": { "type": "STRING" },
      "alternativa": { "type": "STRING", "nullable": true }
    },
    "required": ["nome", "series", "reps", "descanso", "dicas"]
  })
}

fn day_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "nome": { "type": "STRING" },
      "musculos": { "type": "ARRAY", "items": { "type": "STRING" } },
      "exercicios": { "type": "ARRAY", "items": exercise_schema() }
    },
    "required": ["nome", "musculos", "exercicios"]
  })
}

fn plan_schema() -> Value {
  json!({
    "type": "OBJECT",
    "properties": {
      "modelo": { "type": "ARRAY", "items": { "type": "STRING" } },
      "objetivo": { "type": "STRING" },
      "nivel": { "type": "STRING" },
      "dias": { "type": "ARRAY", "items": day_schema() }
    },
    "required": ["modelo", "objetivo", "nivel", "dias"]
  })
}

/// ---------------------------------------------------------------------------
/// Prompts
/// ---------------------------------------------------------------------------

fn plan_prompt(prefs: &UserPreferences) -> String {
  format!(
    r#"Crie uma rotina de treino de musculação completa e detalhada.

CONTEXTO:
- Modelos desejados: {}
- Objetivo: {}
- Nível: {}
- Equipamento disponível: {}
- Frequência: {}
- Restrições físicas: {}

Retorne APENAS o JSON estruturado conforme o schema."#,
    prefs.models.join(", "),
    prefs.goal,
    prefs.level,
    prefs.equipment,
    prefs.frequency,
    prefs.restrictions.as_slice().join(", "),
  )
}

fn day_prompt(day: &WorkoutDay, prefs: &UserPreferences) -> String {
  format!(
    r#"Regenere um único dia de treino.

DIA ATUAL: {} - Foco: {}
Objetivo: {}. Nível: {}. Restrições físicas: {}.

Mantenha o foco muscular, mas troque os exercícios ou a estratégia.
Retorne APENAS o JSON estruturado conforme o schema."#,
    day.name,
    day.muscles.join(", "),
    prefs.goal,
    prefs.level,
    prefs.restrictions.as_slice().join(", "),
  )
}

/// ---------------------------------------------------------------------------
/// Gemini Client
/// ---------------------------------------------------------------------------

pub struct GeminiClient {
  client: Client,
  api_key: String,
  model: String,
  base_url: String,
}

impl GeminiClient {
  pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_key: api_key.into(),
      model: model.into(),
      base_url: base_url.into(),
    }
  }

  /// Build a client from configuration; fails when no API key is set
  pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
    let api_key = config
      .gemini_api_key
      .clone()
      .ok_or(GenerationError::MissingApiKey)?;

    Ok(Self::new(api_key, &config.gemini_model, &config.gemini_api_base))
  }

  fn endpoint(&self) -> Result<Url, GenerationError> {
    let raw = format!(
      "{}/v1beta/models/{}:generateContent",
      self.base_url.trim_end_matches('/'),
      self.model
    );
    Url::parse(&raw).map_err(|e| GenerationError::Request(format!("Invalid endpoint {}: {}", raw, e)))
  }

  /// Call Gemini with a prompt constrained to a JSON response schema
  pub async fn complete(
    &self,
    prompt: &str,
    response_schema: Value,
  ) -> Result<(String, Usage), GenerationError> {
    let request = GenerateContentRequest {
      system_instruction: Content {
        role: None,
        parts: vec![Part {
          text: Some(include_str!("prompts/coach_system.txt").to_string()),
        }],
      },
      contents: vec![Content {
        role: Some("user".to_string()),
        parts: vec![Part {
          text: Some(prompt.to_string()),
        }],
      }],
      generation_config: GenerationConfig {
        response_mime_type: "application/json".to_string(),
        response_schema,
      },
    };

    let response = self
      .client
      .post(self.endpoint()?)
      .header("x-goog-api-key", &self.api_key)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| GenerationError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| GenerationError::Request(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
        return Err(GenerationError::Api(error_resp.error.message));
      }
      return Err(GenerationError::Api(format!("HTTP {}: {}", status, body)));
    }

    let parsed: GenerateContentResponse =
      serde_json::from_str(&body).map_err(|e| GenerationError::Parse(e.to_string()))?;

    // Concatenate the text parts of the first candidate
    let text: String = parsed
      .candidates
      .into_iter()
      .next()
      .and_then(|c| c.content)
      .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
      .unwrap_or_default();

    if text.trim().is_empty() {
      return Err(GenerationError::EmptyResponse);
    }

    Ok((text, parsed.usage_metadata.unwrap_or_default()))
  }

  /// Generate a whole plan body from user preferences
  pub async fn generate_plan(&self, prefs: &UserPreferences) -> Result<GeneratedPlan, GenerationError> {
    tracing::info!(models = ?prefs.models, goal = %prefs.goal, "Generating workout plan");

    let (text, usage) = self.complete(&plan_prompt(prefs), plan_schema()).await?;
    tracing::debug!(
      input_tokens = usage.prompt_token_count,
      output_tokens = usage.candidates_token_count,
      "Plan generated"
    );

    let raw: RawPlan = parse_json(&text)?;

    let models = if raw.modelo.is_empty() {
      prefs.models.clone()
    } else {
      raw.modelo
    };

    Ok(GeneratedPlan {
      models,
      // The model tends to paraphrase these; trust the request instead
      goal: prefs.goal,
      level: prefs.level,
      days: raw.dias.into_iter().map(|d| d.into_day(new_id())).collect(),
    })
  }

  /// Generate a replacement for one day. The result keeps `day.id` so it
  /// can be spliced back into the plan; its exercises get new ids.
  pub async fn regenerate_day(
    &self,
    day: &WorkoutDay,
    prefs: &UserPreferences,
  ) -> Result<WorkoutDay, GenerationError> {
    tracing::info!(day_id = %day.id, day = %day.name, "Regenerating workout day");

    let (text, _usage) = self.complete(&day_prompt(day, prefs), day_schema()).await?;
    let raw: RawDay = parse_json(&text)?;

    Ok(raw.into_day(day.id.clone()))
  }
}

fn parse_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
  let json_str = extract_json(text)?;
  serde_json::from_str(json_str).map_err(|e| GenerationError::Parse(format!("{}: {}", e, json_str)))
}

/// Locate the JSON object in a response.
///
/// With a response schema Gemini answers with bare JSON; a fenced block or
/// prose around the object is still accepted.
fn extract_json(text: &str) -> Result<&str, GenerationError> {
  let trimmed = text.trim();
  if trimmed.starts_with('{') {
    return Ok(trimmed);
  }

  if let Some(body) = fenced_block(trimmed) {
    return Ok(body);
  }

  match (trimmed.find('{'), trimmed.rfind('}')) {
    (Some(start), Some(end)) if start < end => Ok(&trimmed[start..=end]),
    _ => Err(GenerationError::Parse("Could not extract JSON from response".to_string())),
  }
}

/// Body of the first ``` fence, without its language tag
fn fenced_block(text: &str) -> Option<&str> {
  let rest = &text[text.find("```")? + 3..];
  let body = match rest.find('\n') {
    Some(i) if !rest[..i].contains('{') => &rest[i + 1..],
    _ => rest.strip_prefix("json").unwrap_or(rest),
  };
  body.find("```").map(|end| body[..end].trim())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
