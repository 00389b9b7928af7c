use crate::gateway::{GatewayError, GenerationOutput};
use crate::tools::ToolKind;

/// Results of async work, posted back to the egui loop over the app channel.
/// Every variant carries the epoch of the state machine that asked for it so
/// stale resolutions can be dropped at the receiving end.
#[derive(Debug, Clone)]
pub enum AppEvent {
    SessionReady {
        epoch: u64,
    },
    MentorReply {
        epoch: u64,
        outcome: Result<String, GatewayError>,
    },
    GenerationFinished {
        epoch: u64,
        kind: ToolKind,
        outcome: Result<GenerationOutput, GatewayError>,
    },
}
