use crate::gateway::{GatewayError, GenerationOutput};
use crate::tools::{FormStore, ToolKind};
use std::collections::BTreeMap;

/// The one error string the UI shows for any generation failure; the real
/// cause only reaches the log.
pub const GENERATION_FAILED_MESSAGE: &str = "فشل محرك المعالجة الذكية. يرجى المحاولة لاحقاً.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Everything the async driver needs to issue one gateway call. The epoch
/// comes back with the response so stale resolutions can be discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchTicket {
    pub epoch: u64,
    pub kind: ToolKind,
    pub payload: BTreeMap<String, String>,
}

/// Builds the gateway payload for one tool from its form record. Every tool
/// passes its record through unchanged except FULL_PLAN, where the target
/// market and revenue model fold into the synthesized `vision3yr` field.
pub fn build_payload(kind: ToolKind, record: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    if kind != ToolKind::FullPlan {
        return record.clone();
    }

    let field = |name: &str| record.get(name).cloned().unwrap_or_default();
    let mut payload = BTreeMap::new();
    for name in ["name", "industry", "problem", "solution", "competitors"] {
        payload.insert(name.to_string(), field(name));
    }
    payload.insert(
        "vision3yr".to_string(),
        format!(
            "Market: {}, Revenue: {}",
            field("targetMarket"),
            field("revenueModel")
        ),
    );
    payload
}

/// Owns the request lifecycle for the active tool. At most one gateway call
/// is outstanding per dispatcher; switching tools abandons the in-flight
/// call by bumping the epoch rather than cancelling it.
pub struct ToolDispatcher {
    active: Option<ToolKind>,
    status: DispatchStatus,
    result: Option<GenerationOutput>,
    error_message: Option<&'static str>,
    epoch: u64,
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self {
            active: None,
            status: DispatchStatus::Idle,
            result: None,
            error_message: None,
            epoch: 0,
        }
    }

    pub fn active(&self) -> Option<ToolKind> {
        self.active
    }

    pub fn status(&self) -> DispatchStatus {
        self.status
    }

    pub fn result(&self) -> Option<&GenerationOutput> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error_message
    }

    /// Makes `kind` the active tool. Any result or in-flight response that
    /// belonged to the previous tool is discarded.
    pub fn open_tool(&mut self, kind: ToolKind) {
        self.active = Some(kind);
        self.status = DispatchStatus::Idle;
        self.result = None;
        self.error_message = None;
        self.epoch += 1;
    }

    /// Returns to the catalog. The next response for the old epoch, if one
    /// is still on the wire, resolves into nothing.
    pub fn close_tool(&mut self) {
        self.active = None;
        self.status = DispatchStatus::Idle;
        self.result = None;
        self.error_message = None;
        self.epoch += 1;
    }

    /// Starts one generation request for the active tool. Yields `None`
    /// while a request is already running (duplicate submissions are
    /// swallowed) or when no tool is open.
    pub fn dispatch(&mut self, forms: &FormStore) -> Option<DispatchTicket> {
        let kind = self.active?;
        if self.status == DispatchStatus::Running {
            return None;
        }

        self.status = DispatchStatus::Running;
        self.result = None;
        self.error_message = None;
        self.epoch += 1;

        Some(DispatchTicket {
            epoch: self.epoch,
            kind,
            payload: build_payload(kind, forms.record(kind)),
        })
    }

    /// Applies a gateway response. Responses carrying a stale epoch are the
    /// tail of an abandoned request and are ignored outright.
    pub fn resolve(&mut self, epoch: u64, outcome: Result<GenerationOutput, GatewayError>) {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding stale generation");
            return;
        }

        match outcome {
            Ok(output) => {
                self.result = Some(output);
                self.status = DispatchStatus::Succeeded;
            }
            Err(err) => {
                tracing::warn!(error = %err, tool = ?self.active, "generation failed");
                self.error_message = Some(GENERATION_FAILED_MESSAGE);
                self.status = DispatchStatus::Failed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher_with(kind: ToolKind) -> (ToolDispatcher, FormStore) {
        let mut dispatcher = ToolDispatcher::new();
        dispatcher.open_tool(kind);
        (dispatcher, FormStore::new())
    }

    #[test]
    fn full_plan_payload_folds_market_and_revenue_into_vision() {
        let mut forms = FormStore::new();
        forms.set(ToolKind::FullPlan, "name", "Acme");
        forms.set(ToolKind::FullPlan, "targetMarket", "GCC SMBs");
        forms.set(ToolKind::FullPlan, "revenueModel", "اشتراك شهري");

        let payload = build_payload(ToolKind::FullPlan, forms.record(ToolKind::FullPlan));
        assert_eq!(
            payload.get("vision3yr").map(String::as_str),
            Some("Market: GCC SMBs, Revenue: اشتراك شهري")
        );
        assert_eq!(payload.get("name").map(String::as_str), Some("Acme"));
        assert!(!payload.contains_key("targetMarket"));
        assert!(!payload.contains_key("revenueModel"));
    }

    #[test]
    fn full_plan_vision_keeps_its_shape_for_empty_fields() {
        let forms = FormStore::new();
        let payload = build_payload(ToolKind::FullPlan, forms.record(ToolKind::FullPlan));
        assert_eq!(
            payload.get("vision3yr").map(String::as_str),
            Some("Market: , Revenue: ")
        );
    }

    #[test]
    fn other_tools_pass_their_record_through_unchanged() {
        let mut forms = FormStore::new();
        forms.set(ToolKind::Gtm, "pricing", "Freemium");

        let payload = build_payload(ToolKind::Gtm, forms.record(ToolKind::Gtm));
        assert_eq!(payload, forms.record(ToolKind::Gtm).clone());
    }

    #[test]
    fn dispatch_while_running_is_a_no_op() {
        let (mut dispatcher, forms) = dispatcher_with(ToolKind::Swot);

        let first = dispatcher.dispatch(&forms).expect("first dispatch should start");
        assert_eq!(dispatcher.status(), DispatchStatus::Running);
        assert!(dispatcher.dispatch(&forms).is_none());

        dispatcher.resolve(first.epoch, Ok(GenerationOutput::Text("done".to_string())));
        assert_eq!(dispatcher.status(), DispatchStatus::Succeeded);
    }

    #[test]
    fn dispatch_is_allowed_again_after_success_and_failure() {
        let (mut dispatcher, forms) = dispatcher_with(ToolKind::Idea);

        let ticket = dispatcher.dispatch(&forms).expect("should start");
        dispatcher.resolve(ticket.epoch, Err(GatewayError::Transport("boom".to_string())));
        assert_eq!(dispatcher.status(), DispatchStatus::Failed);
        assert_eq!(dispatcher.error_message(), Some(GENERATION_FAILED_MESSAGE));
        assert!(dispatcher.result().is_none());

        let retry = dispatcher.dispatch(&forms).expect("manual retry should start");
        assert_eq!(dispatcher.status(), DispatchStatus::Running);
        assert!(dispatcher.error_message().is_none());

        dispatcher.resolve(retry.epoch, Ok(GenerationOutput::Text("ok".to_string())));
        assert_eq!(dispatcher.status(), DispatchStatus::Succeeded);
        assert!(dispatcher.dispatch(&forms).is_some());
    }

    #[test]
    fn response_for_a_switched_away_tool_never_lands() {
        let (mut dispatcher, forms) = dispatcher_with(ToolKind::Market);
        let ticket = dispatcher.dispatch(&forms).expect("should start");

        dispatcher.open_tool(ToolKind::Swot);
        dispatcher.resolve(ticket.epoch, Ok(GenerationOutput::Text("stale".to_string())));

        assert_eq!(dispatcher.active(), Some(ToolKind::Swot));
        assert_eq!(dispatcher.status(), DispatchStatus::Idle);
        assert!(dispatcher.result().is_none());
    }

    #[test]
    fn response_after_returning_to_catalog_is_discarded() {
        let (mut dispatcher, forms) = dispatcher_with(ToolKind::Finance);
        let ticket = dispatcher.dispatch(&forms).expect("should start");

        dispatcher.close_tool();
        dispatcher.resolve(ticket.epoch, Ok(GenerationOutput::Text("stale".to_string())));

        assert!(dispatcher.active().is_none());
        assert!(dispatcher.result().is_none());
        assert_eq!(dispatcher.status(), DispatchStatus::Idle);
    }

    #[test]
    fn dispatch_without_an_open_tool_yields_nothing() {
        let mut dispatcher = ToolDispatcher::new();
        assert!(dispatcher.dispatch(&FormStore::new()).is_none());
    }
}
