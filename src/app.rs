use crate::client::GatewayClient;
use crate::event::AppEvent;
use crate::gateway::GenerationOutput;
use crate::mentor::directory::{self, SPECIALTIES};
use crate::mentor::{personas, styles, MentorSession, Role, SessionPhase};
use crate::profile::UserProfile;
use crate::theme::Theme;
use crate::tools::{self, DispatchStatus, FormStore, ToolDispatcher, ToolKind};
use eframe::egui::{self, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Mentorship,
    Tools,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MentorTab {
    AiMentor,
    Browse,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanTab {
    Summary,
    Market,
    Financials,
}

const FULL_PLAN_FIELDS: [(&str, &str, &str); 7] = [
    ("name", "اسم المشروع", "اسم الشركة"),
    ("industry", "القطاع", "مثلاً: Fintech"),
    ("problem", "المشكلة (Problem Statement)", "ما هي الفجوة التي تعالجها؟"),
    ("solution", "الحل المقترح (Solution)", "كيف ينهي منتجك هذه المشكلة؟"),
    ("competitors", "أهم المنافسين", "اذكر ٣ منافسين رئيسيين"),
    ("targetMarket", "السوق المستهدف", "المنطقة أو الفئة"),
    ("revenueModel", "نموذج الربح", "اشتراك، عمولة، الخ"),
];

pub struct MorshedApp {
    rx: Receiver<AppEvent>,
    client: GatewayClient,
    theme: Theme,
    screen: Screen,
    mentor_tab: MentorTab,
    session: MentorSession,
    chat_input: String,
    industry: String,
    dispatcher: ToolDispatcher,
    forms: FormStore,
    plan_tab: PlanTab,
    specialty_filter: String,
    mentor_query: String,
    diagnostics_log: Vec<String>,
    scroll_to_bottom: bool,
}

impl MorshedApp {
    pub fn new(rx: Receiver<AppEvent>, client: GatewayClient, profile: &UserProfile) -> Self {
        Self {
            rx,
            client,
            theme: Theme::default(),
            screen: Screen::Mentorship,
            mentor_tab: MentorTab::AiMentor,
            session: MentorSession::new(profile.startup_name.clone()),
            chat_input: String::new(),
            industry: profile
                .industry
                .clone()
                .unwrap_or_else(|| "التقنية".to_string()),
            dispatcher: ToolDispatcher::new(),
            forms: FormStore::new(),
            plan_tab: PlanTab::Summary,
            specialty_filter: "all".to_string(),
            mentor_query: String::new(),
            diagnostics_log: Vec::new(),
            scroll_to_bottom: false,
        }
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event, Some(ctx)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent, ctx: Option<&egui::Context>) {
        match event {
            AppEvent::SessionReady { epoch } => {
                self.session.complete_sync(epoch);
                self.scroll_to_bottom = true;
                self.log_diagnostic("mentor session ready");
            }
            AppEvent::MentorReply { epoch, outcome } => {
                if let Err(err) = &outcome {
                    self.log_diagnostic(format!("mentor exchange failed: {err}"));
                }
                self.session.resolve_reply(epoch, outcome);
                self.scroll_to_bottom = true;
            }
            AppEvent::GenerationFinished {
                epoch,
                kind,
                outcome,
            } => {
                match &outcome {
                    Ok(_) => self.log_diagnostic(format!("generation finished: {kind}")),
                    Err(err) => self.log_diagnostic(format!("generation failed: {kind}: {err}")),
                }
                self.dispatcher.resolve(epoch, outcome);
            }
        }
        if let Some(ctx) = ctx {
            ctx.request_repaint();
        }
    }

    fn submit_chat_message(&mut self, ctx: &egui::Context) {
        if let Some(ticket) = self.session.send(&self.chat_input) {
            self.client.converse(ticket);
            self.chat_input.clear();
            self.scroll_to_bottom = true;
            ctx.request_repaint();
        }
    }

    fn start_generation(&mut self) {
        if let Some(ticket) = self.dispatcher.dispatch(&self.forms) {
            self.log_diagnostic(format!("generation started: {}", ticket.kind));
            self.client.generate(ticket);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("مرشد");
                ui.separator();
                ui.selectable_value(&mut self.screen, Screen::Mentorship, "الإرشاد");
                ui.selectable_value(&mut self.screen, Screen::Tools, "أدوات الذكاء الاستراتيجي");
            });
        });
    }

    fn render_diagnostics_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("diagnostics_panel").show(ctx, |ui| {
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(RichText::new(entry).size(11.0));
                            }
                        });
                });
        });
    }

    fn render_mentorship(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.mentor_tab, MentorTab::AiMentor, "الموجه الذكي (AI)");
                ui.selectable_value(&mut self.mentor_tab, MentorTab::Browse, "شبكة الخبراء");
                ui.selectable_value(&mut self.mentor_tab, MentorTab::Register, "سجل كمرشد");
            });
            ui.separator();

            match self.mentor_tab {
                MentorTab::AiMentor => self.render_ai_mentor(ui, ctx),
                MentorTab::Browse => self.render_mentor_browse(ui),
                MentorTab::Register => Self::render_mentor_register(ui),
            }
        });
    }

    fn render_ai_mentor(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        match self.session.phase() {
            SessionPhase::Configuring => self.render_session_setup(ui),
            SessionPhase::Syncing => self.render_session_syncing(ui),
            SessionPhase::Active => self.render_session_chat(ui, ctx),
        }
    }

    fn render_session_setup(&mut self, ui: &mut egui::Ui) {
        ui.heading("تخصيص الموجه الاستراتيجي الذكي");
        ui.label(
            RichText::new(
                "اختر الشخصية المناسبة لمرحلتك الحالية وحدد أسلوب الرد الذي تفضله لبدء جلسة توجيه مخصصة لمشروعك.",
            )
            .color(self.theme.text_muted),
        );
        ui.add_space(self.theme.spacing_large);

        ui.label(RichText::new("اختر شخصية الموجه:").color(self.theme.text_muted).size(11.0));
        for persona in personas() {
            let selected = self.session.persona().id == persona.id;
            let frame = self.theme.selected_card_frame(selected);
            let response = frame
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(persona.icon).size(24.0));
                        ui.vertical(|ui| {
                            ui.label(RichText::new(persona.label).color(self.theme.text_strong).strong());
                            ui.label(RichText::new(persona.description).color(self.theme.text_muted).size(12.0));
                        });
                    });
                })
                .response
                .on_hover_text(persona.prompt_seed);
            if response.interact(egui::Sense::click()).clicked() {
                self.session.select_persona(persona);
            }
        }

        ui.add_space(self.theme.spacing_large);
        ui.label(RichText::new("أسلوب الرد المفضل:").color(self.theme.text_muted).size(11.0));
        for style in styles() {
            let selected = self.session.style().id == style.id;
            let frame = self.theme.selected_card_frame(selected);
            let response = frame
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(style.icon).size(20.0));
                        ui.vertical(|ui| {
                            ui.label(RichText::new(style.label).color(self.theme.text_strong).strong());
                            ui.label(RichText::new(style.description).color(self.theme.text_muted).size(12.0));
                        });
                    });
                })
                .response;
            if response.interact(egui::Sense::click()).clicked() {
                self.session.select_style(style);
            }
        }

        ui.add_space(self.theme.spacing_large);
        if ui
            .add_sized(
                [ui.available_width(), self.theme.button_height],
                egui::Button::new(
                    RichText::new("بدء جلسة الإرشاد الاستراتيجي الآن").color(self.theme.text_on_accent),
                )
                .fill(self.theme.accent),
            )
            .clicked()
        {
            if let Some(ticket) = self.session.begin_sync() {
                self.log_diagnostic("mentor session syncing");
                self.client.schedule_session_ready(ticket);
            }
        }
    }

    fn render_session_syncing(&mut self, ui: &mut egui::Ui) {
        ui.add_space(48.0);
        ui.vertical_centered(|ui| {
            ui.add(egui::Spinner::new().size(48.0));
            ui.add_space(self.theme.spacing_large);
            ui.label(RichText::new("جاري مزامنة مدخلاتك مع المحرك الذكي...").color(self.theme.text_strong).strong());
            ui.label(
                RichText::new(format!(
                    "تحليل قطاع {} والبيانات المالية لمشروع \"{}\"",
                    self.industry,
                    self.session.project_name()
                ))
                .color(self.theme.text_muted)
                .size(12.0),
            );
        });
    }

    fn render_session_chat(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(self.session.persona().icon).size(24.0));
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(self.session.persona().label).color(self.theme.text_strong).strong());
                    ui.label(RichText::new(self.session.style().label).color(self.theme.accent).size(11.0));
                });
                ui.label(
                    RichText::new(format!("جلسة استشارية نشطة لـ: {}", self.session.project_name()))
                        .color(self.theme.text_muted)
                        .size(11.0),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("تغيير التهيئة ↺").clicked() {
                    self.session.reset();
                    self.chat_input.clear();
                }
            });
        });
        ui.separator();

        let transcript_height = (ui.available_height() - 90.0).max(120.0);
        ScrollArea::vertical()
            .id_salt("mentor_transcript")
            .max_height(transcript_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for turn in self.session.transcript() {
                    let (fill, color) = match turn.role {
                        Role::User => (self.theme.chat_user_bubble, self.theme.text_on_accent),
                        Role::Assistant => (self.theme.chat_assistant_bubble, self.theme.text_body),
                    };
                    self.theme.bubble_frame(fill).show(ui, |ui| {
                        ui.label(RichText::new(&turn.text).color(color));
                    });
                    ui.add_space(self.theme.spacing_medium);
                }

                if self.session.awaiting_reply() {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new().size(14.0));
                        ui.label(RichText::new("الموجه يفكر...").color(self.theme.text_muted).size(11.0));
                    });
                }

                if self.scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
        self.scroll_to_bottom = false;

        ui.separator();
        let input_enabled = !self.session.awaiting_reply();
        let hint = if input_enabled {
            "اطرح استفسارك الاستراتيجي هنا..."
        } else {
            "الموجه يفكر..."
        };

        let mut send_now = false;
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                input_enabled,
                egui::TextEdit::singleline(&mut self.chat_input)
                    .desired_width(f32::INFINITY)
                    .hint_text(hint),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
            }

            let clicked = ui
                .add_enabled(
                    input_enabled && !self.chat_input.trim().is_empty(),
                    egui::Button::new("إرسال"),
                )
                .clicked();
            send_now |= clicked;
        });

        if send_now && input_enabled {
            self.submit_chat_message(ctx);
        }
    }

    fn render_mentor_browse(&mut self, ui: &mut egui::Ui) {
        ui.add(
            egui::TextEdit::singleline(&mut self.mentor_query)
                .desired_width(f32::INFINITY)
                .hint_text("ابحث بالاسم أو التخصص..."),
        );
        ui.add_space(self.theme.spacing_medium);

        ui.horizontal_wrapped(|ui| {
            for specialty in &SPECIALTIES {
                let selected = self.specialty_filter == specialty.id;
                if ui
                    .selectable_label(selected, format!("{} {}", specialty.icon, specialty.label))
                    .clicked()
                {
                    self.specialty_filter = specialty.id.to_string();
                }
            }
        });
        ui.add_space(self.theme.spacing_medium);

        let matches = directory::filter(&self.specialty_filter, &self.mentor_query);
        if matches.is_empty() {
            ui.label(RichText::new("لا توجد نتائج مطابقة").color(self.theme.text_muted));
            return;
        }

        for mentor in matches {
            self.theme.card_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(mentor.avatar).size(28.0));
                    ui.vertical(|ui| {
                        ui.label(RichText::new(mentor.name).color(self.theme.text_strong).strong());
                        ui.label(
                            RichText::new(format!("{} @ {}", mentor.role, mentor.company))
                                .color(self.theme.text_muted)
                                .size(12.0),
                        );
                        ui.label(RichText::new(mentor.bio).size(12.0));
                        ui.label(
                            RichText::new(format!("⭐ {} • {} سنة خبرة", mentor.rating, mentor.experience_years))
                                .color(self.theme.text_muted)
                                .size(11.0),
                        );
                    });
                });
            });
            ui.add_space(self.theme.spacing_medium);
        }
    }

    fn render_mentor_register(ui: &mut egui::Ui) {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.heading("انضم كمرشد خبير");
            ui.label("ساهم في بناء الجيل القادم من الشركات الناشئة.");
            ui.add_space(12.0);
            // Submission is not wired to a backend yet.
            let _ = ui.button("تقديم طلب الاعتماد كمرشد");
        });
    }

    fn render_tools(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| match self.dispatcher.active() {
            None => self.render_tool_catalog(ui),
            Some(kind) => self.render_active_tool(ui, ctx, kind),
        });
    }

    fn render_tool_catalog(&mut self, ui: &mut egui::Ui) {
        ui.heading("مختبر التأسيس الرقمي");
        ui.label(
            RichText::new("أدوات تنفيذية ذكية مصممة لتمكين رواد الأعمال من بناء مخرجات استراتيجية عالمية المستوى.")
                .color(self.theme.text_muted),
        );
        ui.add_space(self.theme.spacing_large);

        let mut opened: Option<ToolKind> = None;
        ScrollArea::vertical().id_salt("tool_catalog").show(ui, |ui| {
            for descriptor in tools::list() {
                let response = self
                    .theme
                    .card_frame()
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(descriptor.icon).size(26.0));
                            ui.vertical(|ui| {
                                ui.label(RichText::new(descriptor.title).color(self.theme.text_strong).strong());
                                ui.label(RichText::new(descriptor.description).size(12.0));
                                ui.label(
                                    RichText::new(descriptor.ai_logic)
                                        .color(self.theme.text_muted)
                                        .size(10.0),
                                );
                            });
                        });
                    })
                    .response;
                if response.interact(egui::Sense::click()).clicked() {
                    opened = Some(descriptor.kind);
                }
                ui.add_space(self.theme.spacing_medium);
            }
        });

        if let Some(kind) = opened {
            self.dispatcher.open_tool(kind);
            self.plan_tab = PlanTab::Summary;
        }
    }

    fn render_active_tool(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, kind: ToolKind) {
        let descriptor = tools::describe(kind);
        ui.horizontal(|ui| {
            if ui.button("→ العودة").clicked() {
                self.forms.reset(kind);
                self.dispatcher.close_tool();
            }
            ui.label(RichText::new(descriptor.title).color(self.theme.text_strong).strong());
            ui.label(RichText::new(descriptor.ai_logic).color(self.theme.text_muted).size(10.0));
        });
        ui.separator();

        if self.dispatcher.active() != Some(kind) {
            return;
        }

        ui.columns(2, |columns| {
            self.render_tool_form(&mut columns[0], kind);
            self.render_tool_output(&mut columns[1], ctx, kind);
        });
    }

    fn render_tool_form(&mut self, ui: &mut egui::Ui, kind: ToolKind) {
        ui.label(RichText::new("تحديد مدخلات التوليد الذكي").color(self.theme.text_muted).size(11.0));
        ui.add_space(self.theme.spacing_medium);

        if kind == ToolKind::FullPlan {
            for (field, label, placeholder) in FULL_PLAN_FIELDS {
                ui.label(RichText::new(label).color(self.theme.text_muted).size(11.0));
                let mut value = self.forms.value(kind, field).to_string();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut value)
                        .desired_width(f32::INFINITY)
                        .hint_text(placeholder),
                );
                if response.changed() {
                    self.forms.set(kind, field, value);
                }
                ui.add_space(self.theme.spacing_small);
            }
        } else {
            ui.label(
                RichText::new("يتم استخدام الإعدادات الافتراضية لهذا النوع من الأدوات.")
                    .color(self.theme.text_muted)
                    .italics(),
            );
        }

        ui.add_space(self.theme.spacing_medium);
        let running = self.dispatcher.status() == DispatchStatus::Running;
        let label = if running {
            "جاري المعالجة الاستراتيجية..."
        } else {
            "تفعيل المحرك الذكي 🚀"
        };
        if ui
            .add_enabled(
                !running,
                egui::Button::new(RichText::new(label).color(self.theme.text_on_accent))
                    .fill(self.theme.accent)
                    .min_size(egui::vec2(ui.available_width(), self.theme.button_height)),
            )
            .clicked()
        {
            self.start_generation();
        }
    }

    fn render_tool_output(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, kind: ToolKind) {
        match self.dispatcher.status() {
            DispatchStatus::Running => {
                ui.add_space(32.0);
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new().size(32.0));
                    ui.label(RichText::new("جاري بناء هيكلية الخطة...").color(self.theme.text_strong));
                });
            }
            DispatchStatus::Failed => {
                if let Some(message) = self.dispatcher.error_message() {
                    self.theme.sunken_frame().show(ui, |ui| {
                        ui.label(RichText::new(message).color(self.theme.danger));
                    });
                }
            }
            DispatchStatus::Succeeded => {
                // Clone so the copy button below can borrow the app again.
                if let Some(output) = self.dispatcher.result().cloned() {
                    self.render_generation_output(ui, ctx, kind, &output);
                }
            }
            DispatchStatus::Idle => {
                ui.add_space(32.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("بانتظار المدخلات").color(self.theme.text_muted));
                    ui.label(
                        RichText::new("املأ البيانات في الجهة المقابلة لتوليد مخرجاتك الاستراتيجية فوراً.")
                            .color(self.theme.text_muted)
                            .size(12.0),
                    );
                });
            }
        }
    }

    fn render_generation_output(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        kind: ToolKind,
        output: &GenerationOutput,
    ) {
        ui.horizontal(|ui| {
            let heading = if kind == ToolKind::FullPlan {
                "خطة العمل المعتمدة (AI Generated)"
            } else {
                "المخرج الاستراتيجي"
            };
            ui.label(RichText::new(heading).color(self.theme.text_strong).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let copy_label = if kind == ToolKind::FullPlan {
                    "نسخ كامل المستند"
                } else {
                    "نسخ النص"
                };
                if ui.button(copy_label).clicked() {
                    ctx.copy_text(output.as_clipboard_text());
                    self.log_diagnostic("result copied to clipboard");
                }
            });
        });

        match output {
            GenerationOutput::BusinessPlan(sections) => {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.plan_tab, PlanTab::Summary, "الملخص التنفيذي");
                    ui.selectable_value(&mut self.plan_tab, PlanTab::Market, "تحليل السوق");
                    ui.selectable_value(&mut self.plan_tab, PlanTab::Financials, "التوقعات المالية");
                });

                let (text, placeholder) = match self.plan_tab {
                    PlanTab::Summary => (&sections.executive_summary, "جاري الصياغة..."),
                    PlanTab::Market => (&sections.market_analysis, "جاري التحليل..."),
                    PlanTab::Financials => (&sections.financial_projections, "جاري المحاكاة..."),
                };
                let body = if text.is_empty() { placeholder } else { text.as_str() };
                self.theme.card_frame().show(ui, |ui| {
                    ScrollArea::vertical().id_salt("plan_section").show(ui, |ui| {
                        ui.label(body);
                    });
                });
            }
            GenerationOutput::Text(text) => {
                self.theme.card_frame().show(ui, |ui| {
                    ScrollArea::vertical().id_salt("tool_result").show(ui, |ui| {
                        ui.label(text);
                    });
                });
            }
        }
    }
}

impl eframe::App for MorshedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        self.render_top_bar(ctx);
        self.render_diagnostics_panel(ctx);
        match self.screen {
            Screen::Mentorship => self.render_mentorship(ctx),
            Screen::Tools => self.render_tools(ctx),
        }
    }
}
