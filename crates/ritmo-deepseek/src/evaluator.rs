// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deepseek-backed plan/update scoring with a deterministic fallback.

use async_trait::async_trait;
use tracing::{error, warn};

use ritmo_config::model::EvaluatorConfig;
use ritmo_core::{Adapter, AdapterType, Evaluation, Evaluator, HealthStatus, RitmoError};
use ritmo_engine::HeuristicEvaluator;

use crate::client::{ChatClient, ChatMessage, ChatRequest};
use crate::parse::{clamp_score, parse_model_json, string_field};

const SYSTEM_PROMPT: &str = "Eres un evaluador de dailys Agile. Debes responder ÚNICAMENTE un JSON válido con la forma: \
{\"score\":0..100,\"rationale\":\"<=200 chars\",\"advice\":\"<=200 chars\"}. \
No incluyas nada más (sin texto extra ni bloques de código).";

const FIELD_MAX: usize = 200;
const DEFAULT_SCORE: u8 = 60;

/// Evaluator backed by the Deepseek chat completions API.
///
/// Without an API key the remote path is skipped entirely and every call
/// answers with the local heuristic under the model name
/// `deepseek-fallback`. Remote failures after retries degrade the same
/// way, tagging the model as `{model}-fallback` so evaluations record
/// which path produced them.
pub struct DeepseekEvaluator {
    client: Option<ChatClient>,
    model: String,
    rubric_version: String,
}

impl DeepseekEvaluator {
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, RitmoError> {
        let client = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Some(ChatClient::new(
                key,
                &config.base_url,
                config.timeout_ms,
                config.max_retries,
            )?),
            _ => {
                warn!("evaluator API key absent, using local heuristic scoring");
                None
            }
        };
        Ok(Self {
            client,
            model: config.model.clone(),
            rubric_version: config.rubric_version.clone(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_client(client: ChatClient, model: &str, rubric_version: &str) -> Self {
        Self {
            client: Some(client),
            model: model.to_string(),
            rubric_version: rubric_version.to_string(),
        }
    }

    fn fallback(&self, model: String) -> HeuristicEvaluator {
        HeuristicEvaluator::new(model, self.rubric_version.clone())
    }

    fn build_request(&self, plan: &str, update: &str) -> ChatRequest {
        let plan_block = if plan.is_empty() { "(sin plan)" } else { plan };
        let user = format!(
            "Plan:\n{plan_block}\n\nResultado:\n{update}\n\n\
             Criterios: claridad del plan, alineación plan-resultado, evidencia de cumplimiento. \
             Umbral 100 = cumplimiento total.\nResponde SOLO JSON válido."
        );
        ChatRequest {
            model: self.model.clone(),
            temperature: 0.0,
            max_tokens: 200,
            stream: false,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        }
    }
}

#[async_trait]
impl Evaluator for DeepseekEvaluator {
    async fn evaluate(&self, plan: &str, update: &str) -> Evaluation {
        let Some(client) = &self.client else {
            return self.fallback("deepseek-fallback".to_string()).evaluate(plan, update).await;
        };

        match client.chat(&self.build_request(plan, update)).await {
            Ok(content) => {
                let parsed = parse_model_json(&content);
                Evaluation {
                    score: clamp_score(&parsed["score"], 0, 100, DEFAULT_SCORE),
                    rationale: string_field(&parsed, "rationale", FIELD_MAX),
                    advice: string_field(&parsed, "advice", FIELD_MAX),
                    model: self.model.clone(),
                    rubric_version: self.rubric_version.clone(),
                }
            }
            Err(e) => {
                error!(error = %e, "remote evaluation failed, degrading to heuristic");
                self.fallback(format!("{}-fallback", self.model))
                    .evaluate(plan, update)
                    .await
            }
        }
    }
}

#[async_trait]
impl Adapter for DeepseekEvaluator {
    fn name(&self) -> &str {
        "deepseek"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Evaluator
    }

    async fn health_check(&self) -> Result<HealthStatus, RitmoError> {
        match &self.client {
            Some(_) => Ok(HealthStatus::Healthy),
            None => Ok(HealthStatus::Degraded(
                "no API key configured, heuristic scoring only".to_string(),
            )),
        }
    }
}
