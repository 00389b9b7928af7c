use crate::gateway::GatewayError;
use std::time::Duration;

pub mod directory;

/// Fixed preparation delay between configuring a session and its first turn.
pub const SYNC_DELAY: Duration = Duration::from_secs(2);

/// Shown when the gateway answers successfully but with an empty reply.
pub const EMPTY_REPLY_FALLBACK: &str = "عذراً، لم أستطع تحليل ذلك.";

/// Shown as an assistant turn when the gateway call itself fails. Errors
/// become transcript content; the session never leaves the Active phase.
pub const CONNECTIVITY_ERROR_REPLY: &str = "حدث خطأ في الاتصال بمحرك التوجيه الذكي.";

/// Project name used in the greeting when the profile carries none.
pub const DEFAULT_PROJECT_NAME: &str = "الناشئ";

/// A conversational stance the mentor adopts. The prompt seed conditions
/// every gateway request made during the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiPersona {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub prompt_seed: &'static str,
    pub icon: &'static str,
}

/// A tone modifier applied alongside the persona; it never changes who the
/// mentor is, only how it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiStyle {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

static PERSONAS: [AiPersona; 4] = [
    AiPersona {
        id: "strategist",
        label: "محلل استراتيجي",
        description: "يركز على خارطة الطريق، التوسع، والميزة التنافسية.",
        prompt_seed: "You are a Senior Strategic Consultant from a top-tier firm.",
        icon: "👔",
    },
    AiPersona {
        id: "vc",
        label: "مستثمر جريء (VC)",
        description: "يركز على الجدوى المالية، مؤشرات النمو، والعرض الاستثماري.",
        prompt_seed: "You are a seasoned Venture Capitalist looking for high-growth potential.",
        icon: "🏦",
    },
    AiPersona {
        id: "growth",
        label: "خبير نمو (Growth)",
        description: "يركز على الاستحواذ، قنوات التسويق، والنمو السريع.",
        prompt_seed: "You are a Growth Hacking Expert focused on scaling startups.",
        icon: "🚀",
    },
    AiPersona {
        id: "product",
        label: "مدير منتج (Product)",
        description: "يركز على الـ MVP، تجربة المستخدم، والمزايا التقنية.",
        prompt_seed: "You are an Elite Product Manager focused on building high-value MVPs.",
        icon: "⚙️",
    },
];

static STYLES: [AiStyle; 3] = [
    AiStyle {
        id: "formal",
        label: "رسمي مؤسسي",
        description: "لغة رصينة ودقيقة ومبنية على الحقائق.",
        icon: "🏛️",
    },
    AiStyle {
        id: "casual",
        label: "توجيهي مباشر",
        description: "نقاش مريح وتلقائي يركز على الحلول العملية.",
        icon: "🤝",
    },
    AiStyle {
        id: "concise",
        label: "ملخص تنفيذي",
        description: "إجابات مباشرة وقصيرة تركز على الزبدة فقط.",
        icon: "⚡",
    },
];

pub fn personas() -> &'static [AiPersona] {
    &PERSONAS
}

pub fn styles() -> &'static [AiStyle] {
    &STYLES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. The transcript is append-only; insertion order is
/// the conversation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Configuring,
    Syncing,
    Active,
}

/// Handle for the timed sync wait; resolved by the async driver after
/// [`SYNC_DELAY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTicket {
    pub epoch: u64,
}

/// Everything the async driver needs for one `converse` call.
#[derive(Debug, Clone, PartialEq)]
pub struct SendTicket {
    pub epoch: u64,
    pub message: String,
    pub persona_label: &'static str,
    pub style_label: &'static str,
}

/// Persona- and style-configured chat session with a strictly ordered
/// transcript. Configuration is immutable for the lifetime of a transcript:
/// changing persona or style requires resetting back to Configuring first.
pub struct MentorSession {
    persona: &'static AiPersona,
    style: &'static AiStyle,
    project_name: String,
    phase: SessionPhase,
    transcript: Vec<Turn>,
    awaiting_reply: bool,
    epoch: u64,
}

impl MentorSession {
    pub fn new(project_name: Option<String>) -> Self {
        Self {
            persona: &PERSONAS[0],
            style: &STYLES[0],
            project_name: project_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            phase: SessionPhase::Configuring,
            transcript: Vec::new(),
            awaiting_reply: false,
            epoch: 0,
        }
    }

    pub fn persona(&self) -> &'static AiPersona {
        self.persona
    }

    pub fn style(&self) -> &'static AiStyle {
        self.style
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Selection is free only while configuring; once a transcript exists the
    /// pairing is fixed until the session is reset.
    pub fn select_persona(&mut self, persona: &'static AiPersona) {
        if self.phase == SessionPhase::Configuring {
            self.persona = persona;
        }
    }

    pub fn select_style(&mut self, style: &'static AiStyle) {
        if self.phase == SessionPhase::Configuring {
            self.style = style;
        }
    }

    /// Leaves Configuring for the timed sync wait. The returned ticket must
    /// come back through [`MentorSession::complete_sync`] after the delay.
    pub fn begin_sync(&mut self) -> Option<SyncTicket> {
        if self.phase != SessionPhase::Configuring {
            return None;
        }
        self.phase = SessionPhase::Syncing;
        self.epoch += 1;
        Some(SyncTicket { epoch: self.epoch })
    }

    /// Activates the session and seeds the transcript with the greeting
    /// turn. Deterministic for a given (persona, style, project name).
    pub fn complete_sync(&mut self, epoch: u64) {
        if self.phase != SessionPhase::Syncing || epoch != self.epoch {
            return;
        }
        self.phase = SessionPhase::Active;
        self.transcript.push(Turn {
            role: Role::Assistant,
            text: format!(
                "مرحباً بك! أنا موجهك الذكي المخصص لهذا اليوم بصفتي \"{}\". لقد قمت بمراجعة بيانات مشروعك \"{}\"، وأنا مستعد لمساعدتك بأسلوب \"{}\". بماذا تود أن نبدأ نقاشنا الاستراتيجي اليوم؟",
                self.persona.label, self.project_name, self.style.label
            ),
        });
    }

    /// Records the user's turn and hands back the gateway call to make.
    /// Empty input and overlapping sends are swallowed: the user turn is in
    /// the transcript before the reply is ever awaited, and at most one
    /// reply is outstanding.
    pub fn send(&mut self, text: &str) -> Option<SendTicket> {
        if self.phase != SessionPhase::Active || self.awaiting_reply {
            return None;
        }
        let message = text.trim();
        if message.is_empty() {
            return None;
        }

        let message = message.to_string();
        self.transcript.push(Turn {
            role: Role::User,
            text: message.clone(),
        });
        self.awaiting_reply = true;

        Some(SendTicket {
            epoch: self.epoch,
            message,
            persona_label: self.persona.label,
            style_label: self.style.label,
        })
    }

    /// Applies the gateway's reply. A reply carrying a pre-reset epoch
    /// belongs to a conversation that no longer exists and is dropped.
    pub fn resolve_reply(&mut self, epoch: u64, outcome: Result<String, GatewayError>) {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding stale mentor reply");
            return;
        }
        if !self.awaiting_reply {
            return;
        }
        self.awaiting_reply = false;

        let text = match outcome {
            Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY_FALLBACK.to_string(),
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "mentor exchange failed");
                CONNECTIVITY_ERROR_REPLY.to_string()
            }
        };
        self.transcript.push(Turn {
            role: Role::Assistant,
            text,
        });
    }

    /// Discards the conversation and returns to Configuring. The persona and
    /// style selections survive; any in-flight reply dies with the epoch.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.phase = SessionPhase::Configuring;
        self.awaiting_reply = false;
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona_by_id(id: &str) -> &'static AiPersona {
        personas()
            .iter()
            .find(|persona| persona.id == id)
            .expect("persona preset should exist")
    }

    fn style_by_id(id: &str) -> &'static AiStyle {
        styles()
            .iter()
            .find(|style| style.id == id)
            .expect("style preset should exist")
    }

    fn active_session(project: &str) -> MentorSession {
        let mut session = MentorSession::new(Some(project.to_string()));
        let ticket = session.begin_sync().expect("sync should start");
        session.complete_sync(ticket.epoch);
        session
    }

    #[test]
    fn greeting_is_deterministic_and_references_the_configuration() {
        let seed = || {
            let mut session = MentorSession::new(Some("Acme".to_string()));
            session.select_persona(persona_by_id("strategist"));
            session.select_style(style_by_id("formal"));
            let ticket = session.begin_sync().expect("sync should start");
            session.complete_sync(ticket.epoch);
            session
        };

        let session = seed();
        assert_eq!(session.transcript().len(), 1);
        let greeting = &session.transcript()[0];
        assert_eq!(greeting.role, Role::Assistant);
        assert!(greeting.text.contains("محلل استراتيجي"));
        assert!(greeting.text.contains("Acme"));
        assert!(greeting.text.contains("رسمي مؤسسي"));

        assert_eq!(seed().transcript(), session.transcript());
    }

    #[test]
    fn greeting_falls_back_to_the_default_project_name() {
        let session = active_session("   ");
        assert!(session.transcript()[0].text.contains(DEFAULT_PROJECT_NAME));
    }

    #[test]
    fn selection_is_frozen_outside_configuring() {
        let mut session = active_session("Acme");
        let before = session.persona();
        session.select_persona(persona_by_id("vc"));
        session.select_style(style_by_id("concise"));
        assert_eq!(session.persona(), before);
        assert_eq!(session.style().id, "formal");
    }

    #[test]
    fn blank_messages_never_reach_the_transcript_or_the_gateway() {
        let mut session = active_session("Acme");
        assert!(session.send("").is_none());
        assert!(session.send("   ").is_none());
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn second_send_while_awaiting_a_reply_is_rejected() {
        let mut session = active_session("Acme");

        let ticket = session.send("a").expect("first send should go out");
        assert!(session.send("b").is_none());

        let user_turns: Vec<&Turn> = session
            .transcript()
            .iter()
            .filter(|turn| turn.role == Role::User)
            .collect();
        assert_eq!(user_turns.len(), 1);
        assert_eq!(user_turns[0].text, "a");

        session.resolve_reply(ticket.epoch, Ok("reply".to_string()));
        assert!(session.send("b").is_some());
    }

    #[test]
    fn gateway_failure_becomes_an_assistant_turn_and_keeps_the_session_active() {
        let mut session = active_session("Acme");
        let baseline = session.transcript().len();

        let ticket = session.send("hello").expect("send should go out");
        session.resolve_reply(ticket.epoch, Err(GatewayError::Transport("down".to_string())));

        let turns = session.transcript();
        assert_eq!(turns.len(), baseline + 2);
        assert_eq!(turns[baseline].role, Role::User);
        assert_eq!(turns[baseline].text, "hello");
        assert_eq!(turns[baseline + 1].role, Role::Assistant);
        assert_eq!(turns[baseline + 1].text, CONNECTIVITY_ERROR_REPLY);
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn empty_successful_reply_substitutes_the_fixed_fallback() {
        let mut session = active_session("Acme");
        let ticket = session.send("ماذا عن التسعير؟").expect("send should go out");
        session.resolve_reply(ticket.epoch, Ok("  ".to_string()));

        let last = session.transcript().last().expect("reply turn should exist");
        assert_eq!(last.text, EMPTY_REPLY_FALLBACK);
    }

    #[test]
    fn reset_clears_the_transcript_but_keeps_the_selection() {
        let mut session = MentorSession::new(Some("Acme".to_string()));
        session.select_persona(persona_by_id("growth"));
        session.select_style(style_by_id("casual"));
        let ticket = session.begin_sync().expect("sync should start");
        session.complete_sync(ticket.epoch);

        session.reset();
        assert_eq!(session.transcript().len(), 0);
        assert_eq!(session.phase(), SessionPhase::Configuring);
        assert_eq!(session.persona().id, "growth");
        assert_eq!(session.style().id, "casual");
    }

    #[test]
    fn reply_arriving_after_a_reset_is_discarded() {
        let mut session = active_session("Acme");
        let ticket = session.send("hello").expect("send should go out");

        session.reset();
        let resumed = session.begin_sync().expect("sync should restart");
        session.complete_sync(resumed.epoch);
        session.resolve_reply(ticket.epoch, Ok("late".to_string()));

        assert_eq!(session.transcript().len(), 1);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn sync_completion_with_a_stale_epoch_does_not_activate() {
        let mut session = MentorSession::new(None);
        let ticket = session.begin_sync().expect("sync should start");
        session.reset();

        session.complete_sync(ticket.epoch);
        assert_eq!(session.phase(), SessionPhase::Configuring);
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn send_is_rejected_before_the_session_is_active() {
        let mut session = MentorSession::new(None);
        assert!(session.send("hello").is_none());
        session.begin_sync();
        assert!(session.send("hello").is_none());
    }
}
