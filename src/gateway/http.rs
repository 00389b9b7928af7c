use crate::gateway::{BusinessPlanSections, Gateway, GatewayError, GenerationOutput};
use crate::tools::ToolKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// JSON client for the generation service. The service exposes two routes:
/// `POST /generate` returning `{"content": ...}` (or the three plan sections
/// for FULL_PLAN) and `POST /converse` returning `{"reply": ...}`.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    kind: &'static str,
    payload: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ConverseBody {
    #[serde(default)]
    reply: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}/{route}", self.base_url)
    }

    async fn post_json(
        &self,
        route: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(self.endpoint(route))
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Upstream(format!(
                "{} returned {}",
                route,
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn generate(
        &self,
        kind: ToolKind,
        payload: &BTreeMap<String, String>,
    ) -> Result<GenerationOutput, GatewayError> {
        let body = serde_json::to_value(GenerateBody {
            kind: kind.as_str(),
            payload,
        })
        .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let response = self.post_json("generate", &body).await?;

        if kind == ToolKind::FullPlan {
            let sections: BusinessPlanSections = response
                .json()
                .await
                .map_err(|err| GatewayError::Upstream(err.to_string()))?;
            return Ok(GenerationOutput::BusinessPlan(sections));
        }

        let content: ContentBody = response
            .json()
            .await
            .map_err(|err| GatewayError::Upstream(err.to_string()))?;
        Ok(GenerationOutput::Text(content.content))
    }

    async fn converse(
        &self,
        message: &str,
        persona_label: &str,
        style_label: &str,
    ) -> Result<String, GatewayError> {
        let body = json!({
            "message": message,
            "persona": persona_label,
            "style": style_label,
        });

        let response = self.post_json("converse", &body).await?;
        let reply: ConverseBody = response
            .json()
            .await
            .map_err(|err| GatewayError::Upstream(err.to_string()))?;
        Ok(reply.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_doubling_slashes() {
        let gateway = HttpGateway::new("https://core.example.com/api/");
        assert_eq!(
            gateway.endpoint("generate"),
            "https://core.example.com/api/generate"
        );
    }
}
