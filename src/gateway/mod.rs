use crate::tools::ToolKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub mod http;

pub use http::HttpGateway;

/// Failure raised by the generation service. The detail is opaque to the
/// rest of the app: callers log it and surface a fixed message instead.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("gateway transport error: {0}")]
    Transport(String),

    #[error("gateway returned an unusable response: {0}")]
    Upstream(String),
}

/// The three named sections a full business plan comes back in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessPlanSections {
    #[serde(rename = "executiveSummary", default)]
    pub executive_summary: String,
    #[serde(rename = "marketAnalysis", default)]
    pub market_analysis: String,
    #[serde(rename = "financialProjections", default)]
    pub financial_projections: String,
}

/// Result of one generation call, tagged by shape: every tool produces flat
/// text except FULL_PLAN, which produces the sectioned plan document.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Text(String),
    BusinessPlan(BusinessPlanSections),
}

impl GenerationOutput {
    /// Serializes the result for the copy-to-clipboard action. Sectioned
    /// plans are copied as pretty JSON, matching the document export the
    /// product always offered.
    pub fn as_clipboard_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::BusinessPlan(sections) => serde_json::to_string_pretty(sections)
                .unwrap_or_else(|_| String::new()),
        }
    }
}

/// Narrow call contract against the external generation service. Both the
/// tool dispatcher and the mentor session consume the gateway through this
/// trait; tests substitute an in-memory implementation.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generates a business document for one tool kind from its form payload.
    async fn generate(
        &self,
        kind: ToolKind,
        payload: &BTreeMap<String, String>,
    ) -> Result<GenerationOutput, GatewayError>;

    /// One conversational exchange, conditioned by persona and style labels.
    async fn converse(
        &self,
        message: &str,
        persona_label: &str,
        style_label: &str,
    ) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_text_for_flat_output_is_the_text_itself() {
        let output = GenerationOutput::Text("ثلاث أفكار فريدة".to_string());
        assert_eq!(output.as_clipboard_text(), "ثلاث أفكار فريدة");
    }

    #[test]
    fn clipboard_text_for_plan_output_keeps_the_wire_section_names() {
        let output = GenerationOutput::BusinessPlan(BusinessPlanSections {
            executive_summary: "summary".to_string(),
            market_analysis: "market".to_string(),
            financial_projections: "numbers".to_string(),
        });

        let copied = output.as_clipboard_text();
        assert!(copied.contains("\"executiveSummary\": \"summary\""));
        assert!(copied.contains("\"marketAnalysis\": \"market\""));
        assert!(copied.contains("\"financialProjections\": \"numbers\""));
    }
}
