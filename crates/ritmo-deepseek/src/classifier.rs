// SPDX-FileCopyrightText: 2026 Ritmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-label reason classification over the closed code set.
//!
//! Used only as the escalation path when the heuristic tagger comes back
//! empty or ambiguous, so it runs a single attempt under a tight timeout
//! and answers `other` on any failure.

use std::str::FromStr;

use async_trait::async_trait;
use tracing::warn;

use ritmo_config::model::EvaluatorConfig;
use ritmo_core::{Adapter, AdapterType, HealthStatus, ReasonClassifier, ReasonCode, RitmoError};

use crate::client::{ChatClient, ChatMessage, ChatRequest};
use crate::parse::parse_model_json;

fn build_prompt(plan: Option<&str>, update: &str) -> String {
    let plan_block = match plan {
        Some(p) => format!("\"\"\"{p}\"\"\""),
        None => "(no disponible)".to_string(),
    };
    format!(
        r#"Eres un clasificador de razones por las que un objetivo diario Agile NO se cumplió.
Debes elegir EXACTAMENTE UNA etiqueta del siguiente conjunto permitido:

impediment | blocked_dependency | scope_change | overcommitment | unknown_tech |
tech_debt | requirements_clarity | tooling_issues | major_incident |
meetings_overload | health_issue | personal_emergency | other

Definiciones breves:
- impediment: bloqueo genérico (accesos/permisos/colas), sin depender de otro equipo específico.
- blocked_dependency: esperando a otro equipo/tercero/QA/UX/aprobación.
- scope_change: cambio de alcance/prioridad/pivot.
- overcommitment: mala estimación/sobrecarga/falta de tiempo.
- unknown_tech: curva de aprendizaje/tecnología nueva/desconocimiento.
- tech_debt: deuda técnica/refactor/legacy.
- requirements_clarity: requerimientos poco claros/falta de criterios.
- tooling_issues: CI/CD/build/deploy/pipeline/runner/entornos.
- major_incident: incidente mayor/P0/P1/producción.
- meetings_overload: muchas reuniones/back-to-back.
- health_issue: problemas de salud.
- personal_emergency: urgencia personal/familiar.
- other: ninguna de las anteriores aplica razonablemente.

Entrada:
- Plan de la mañana (opcional): {plan_block}
- Actualización del final del día: """{update}"""

Reglas:
1) Elige la ÚNICA etiqueta que mejor explique la NO completitud (o "other").
2) Devuelve SOLO JSON, sin texto adicional, con el siguiente formato exacto:
{{"code":"<etiqueta_permitida>"}}"#
    )
}

/// Reason classifier backed by the Deepseek chat completions API.
pub struct DeepseekReasonClassifier {
    client: ChatClient,
    model: String,
}

impl DeepseekReasonClassifier {
    /// Builds the classifier, or `None` when no API key is configured.
    ///
    /// Uses `reason_model` when set, else the scoring model. Always a
    /// single attempt: by the time this runs the user is waiting on the
    /// evening reply, so a retry storm is worse than answering `other`.
    pub fn from_config(config: &EvaluatorConfig) -> Result<Option<Self>, RitmoError> {
        let Some(key) = config.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
        else {
            return Ok(None);
        };
        let client = ChatClient::new(key, &config.base_url, config.reason_timeout_ms, 0)?;
        Ok(Some(Self {
            client,
            model: config.reason_model.clone().unwrap_or_else(|| config.model.clone()),
        }))
    }

    #[cfg(test)]
    pub(crate) fn with_client(client: ChatClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn build_request(&self, plan: Option<&str>, update: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            temperature: 0.2,
            max_tokens: 40,
            stream: false,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(plan, update),
            }],
        }
    }
}

#[async_trait]
impl ReasonClassifier for DeepseekReasonClassifier {
    async fn classify(&self, plan: Option<&str>, update: &str) -> ReasonCode {
        let content = match self.client.chat(&self.build_request(plan, update)).await {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "reason classification failed, answering other");
                return ReasonCode::Other;
            }
        };
        let parsed = parse_model_json(&content);
        parsed["code"]
            .as_str()
            .and_then(|code| ReasonCode::from_str(code.trim()).ok())
            .unwrap_or(ReasonCode::Other)
    }

    fn model_version(&self) -> String {
        self.model.clone()
    }
}

#[async_trait]
impl Adapter for DeepseekReasonClassifier {
    fn name(&self) -> &str {
        "deepseek-reasons"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }

    async fn health_check(&self) -> Result<HealthStatus, RitmoError> {
        Ok(HealthStatus::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn classifier_for(server: &MockServer) -> DeepseekReasonClassifier {
        let client = ChatClient::new("test-key", "https://api.deepseek.com/v1", 2_200, 0)
            .unwrap()
            .with_base_url(server.uri());
        DeepseekReasonClassifier::with_client(client, "deepseek-chat")
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn valid_code_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(r#"{"code":"blocked_dependency"}"#)),
            )
            .mount(&server)
            .await;

        let code = classifier_for(&server)
            .classify(Some("terminar el informe"), "sigo esperando a QA")
            .await;
        assert_eq!(code, ReasonCode::BlockedDependency);
    }

    #[tokio::test]
    async fn fenced_code_is_recovered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                "```json\n{\"code\":\"meetings_overload\"}\n```",
            )))
            .mount(&server)
            .await;

        let code = classifier_for(&server)
            .classify(None, "me comieron las reuniones")
            .await;
        assert_eq!(code, ReasonCode::MeetingsOverload);
    }

    #[tokio::test]
    async fn unknown_label_answers_other() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(r#"{"code":"alien_invasion"}"#)),
            )
            .mount(&server)
            .await;

        let code = classifier_for(&server).classify(None, "pasaron cosas").await;
        assert_eq!(code, ReasonCode::Other);
    }

    #[tokio::test]
    async fn http_failure_answers_other_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let code = classifier_for(&server).classify(None, "no avancé").await;
        assert_eq!(code, ReasonCode::Other);
    }

    #[tokio::test]
    async fn missing_key_builds_nothing() {
        let config = EvaluatorConfig::default();
        assert!(DeepseekReasonClassifier::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn model_version_reports_reason_model() {
        let config = EvaluatorConfig {
            api_key: Some("k".into()),
            reason_model: Some("deepseek-reasoner".into()),
            ..EvaluatorConfig::default()
        };
        let classifier = DeepseekReasonClassifier::from_config(&config).unwrap().unwrap();
        assert_eq!(classifier.model_version(), "deepseek-reasoner");
    }
}
