use crate::event::AppEvent;
use crate::gateway::Gateway;
use crate::mentor::{SendTicket, SyncTicket, SYNC_DELAY};
use crate::tools::DispatchTicket;
use std::sync::mpsc;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::time;

/// Bridges the synchronous egui loop and the async gateway. Each ticket
/// turns into exactly one spawned task whose outcome comes back as an
/// [`AppEvent`]; the state machines decide at resolution time whether the
/// outcome is still relevant.
#[derive(Clone)]
pub struct GatewayClient {
    gateway: Arc<dyn Gateway>,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl GatewayClient {
    pub fn new(gateway: Arc<dyn Gateway>, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self {
            gateway,
            tx,
            runtime_handle,
        }
    }

    /// Waits out the fixed pre-session preparation delay, then reports the
    /// session ready. Not retried, not cancellable.
    pub fn schedule_session_ready(&self, ticket: SyncTicket) {
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            time::sleep(SYNC_DELAY).await;
            let _ = tx.send(AppEvent::SessionReady {
                epoch: ticket.epoch,
            });
        });
    }

    /// One conversational exchange for the mentor session.
    pub fn converse(&self, ticket: SendTicket) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            let outcome = gateway
                .converse(&ticket.message, ticket.persona_label, ticket.style_label)
                .await;
            let _ = tx.send(AppEvent::MentorReply {
                epoch: ticket.epoch,
                outcome,
            });
        });
    }

    /// One document-generation call for the tool dispatcher.
    pub fn generate(&self, ticket: DispatchTicket) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            let outcome = gateway.generate(ticket.kind, &ticket.payload).await;
            let _ = tx.send(AppEvent::GenerationFinished {
                epoch: ticket.epoch,
                kind: ticket.kind,
                outcome,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, GenerationOutput};
    use crate::mentor::{MentorSession, SessionPhase};
    use crate::tools::{DispatchStatus, FormStore, ToolDispatcher, ToolKind};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingGateway {
        generate_calls: AtomicUsize,
        converse_calls: AtomicUsize,
    }

    impl CountingGateway {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                generate_calls: AtomicUsize::new(0),
                converse_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Gateway for CountingGateway {
        async fn generate(
            &self,
            _kind: ToolKind,
            payload: &BTreeMap<String, String>,
        ) -> Result<GenerationOutput, GatewayError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(GenerationOutput::Text(format!(
                "generated from {} fields",
                payload.len()
            )))
        }

        async fn converse(
            &self,
            message: &str,
            _persona_label: &str,
            _style_label: &str,
        ) -> Result<String, GatewayError> {
            self.converse_calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {message}"))
        }
    }

    fn recv_event(rx: &mpsc::Receiver<AppEvent>) -> AppEvent {
        rx.recv_timeout(Duration::from_secs(5))
            .expect("an event should arrive")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn each_dispatch_makes_exactly_one_gateway_call() {
        let gateway = CountingGateway::new();
        let (tx, rx) = mpsc::channel();
        let client = GatewayClient::new(gateway.clone(), tx, Handle::current());

        let mut dispatcher = ToolDispatcher::new();
        let forms = FormStore::new();
        dispatcher.open_tool(ToolKind::Swot);

        let ticket = dispatcher.dispatch(&forms).expect("dispatch should start");
        // A duplicate submission produces no ticket, so nothing to spawn.
        assert!(dispatcher.dispatch(&forms).is_none());
        client.generate(ticket);

        match recv_event(&rx) {
            AppEvent::GenerationFinished { epoch, outcome, .. } => {
                dispatcher.resolve(epoch, outcome);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.status(), DispatchStatus::Succeeded);
        assert!(dispatcher.result().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn mentor_round_trip_appends_the_assistant_reply() {
        let gateway = CountingGateway::new();
        let (tx, rx) = mpsc::channel();
        let client = GatewayClient::new(gateway.clone(), tx, Handle::current());

        let mut session = MentorSession::new(Some("Acme".to_string()));
        let sync = session.begin_sync().expect("sync should start");
        session.complete_sync(sync.epoch);

        let ticket = session.send("كيف أبدأ؟").expect("send should go out");
        client.converse(ticket);

        match recv_event(&rx) {
            AppEvent::MentorReply { epoch, outcome } => session.resolve_reply(epoch, outcome),
            other => panic!("unexpected event: {other:?}"),
        }

        assert_eq!(gateway.converse_calls.load(Ordering::SeqCst), 1);
        let last = session.transcript().last().expect("reply should exist");
        assert_eq!(last.text, "echo: كيف أبدأ؟");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn session_ready_fires_after_the_fixed_delay() {
        let gateway = CountingGateway::new();
        let (tx, rx) = mpsc::channel();
        let client = GatewayClient::new(gateway, tx, Handle::current());

        let mut session = MentorSession::new(None);
        let ticket = session.begin_sync().expect("sync should start");
        client.schedule_session_ready(ticket);

        match recv_event(&rx) {
            AppEvent::SessionReady { epoch } => session.complete_sync(epoch),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.transcript().len(), 1);
    }
}
