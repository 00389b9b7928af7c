use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

/// Light visual language of the product: white surfaces, slate text, blue
/// accent, emerald for confirmation states.
#[derive(Debug, Clone)]
pub struct Theme {
    pub surface: Color32,
    pub surface_raised: Color32,
    pub surface_sunken: Color32,
    pub accent: Color32,
    pub accent_soft: Color32,
    pub confirm: Color32,
    pub danger: Color32,
    pub text_strong: Color32,
    pub text_body: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border: Color32,
    pub chat_user_bubble: Color32,
    pub chat_assistant_bubble: Color32,
    pub spacing_small: f32,
    pub spacing_medium: f32,
    pub spacing_large: f32,
    pub radius: u8,
    pub button_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface: Color32::WHITE,
            surface_raised: Color32::from_rgb(0xF8, 0xFA, 0xFC),
            surface_sunken: Color32::from_rgb(0xF1, 0xF5, 0xF9),
            accent: Color32::from_rgb(0x25, 0x63, 0xEB),
            accent_soft: Color32::from_rgb(0xEF, 0xF6, 0xFF),
            confirm: Color32::from_rgb(0x10, 0xB9, 0x81),
            danger: Color32::from_rgb(0xE1, 0x1D, 0x48),
            text_strong: Color32::from_rgb(0x0F, 0x17, 0x2A),
            text_body: Color32::from_rgb(0x33, 0x41, 0x55),
            text_muted: Color32::from_rgb(0x94, 0xA3, 0xB8),
            text_on_accent: Color32::WHITE,
            border: Color32::from_rgb(0xE2, 0xE8, 0xF0),
            chat_user_bubble: Color32::from_rgb(0x25, 0x63, 0xEB),
            chat_assistant_bubble: Color32::WHITE,
            spacing_small: 4.0,
            spacing_medium: 8.0,
            spacing_large: 16.0,
            radius: 10,
            button_height: 34.0,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.surface;
        visuals.override_text_color = Some(self.text_body);
        visuals.widgets.noninteractive.bg_fill = self.surface_raised;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke.color = self.text_body;
        visuals.widgets.inactive.bg_fill = self.surface_raised;
        visuals.widgets.inactive.fg_stroke.color = self.text_body;
        visuals.widgets.hovered.bg_fill = self.surface_sunken;
        visuals.widgets.hovered.fg_stroke.color = self.text_strong;
        visuals.widgets.active.bg_fill = self.accent_soft;
        visuals.widgets.active.fg_stroke.color = self.text_strong;
        visuals.selection.bg_fill = self.accent_soft;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;
        visuals.window_fill = self.surface;
        visuals.window_corner_radius = CornerRadius::same(self.radius);

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(14.0, 8.0);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(18.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Monospace, FontId::monospace(13.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(11.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface)
            .inner_margin(Margin::same(12))
            .corner_radius(CornerRadius::same(self.radius))
            .stroke(Stroke::new(1.0, self.border))
    }

    pub fn sunken_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_sunken)
            .inner_margin(Margin::same(12))
            .corner_radius(CornerRadius::same(self.radius))
            .stroke(Stroke::new(1.0, self.border))
    }

    pub fn bubble_frame(&self, fill: Color32) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(12, 8))
            .corner_radius(CornerRadius::same(self.radius))
            .stroke(Stroke::new(1.0, self.border))
    }

    pub fn selected_card_frame(&self, selected: bool) -> Frame {
        let stroke = if selected {
            Stroke::new(2.0, self.accent)
        } else {
            Stroke::new(1.0, self.border)
        };
        let fill = if selected { self.accent_soft } else { self.surface_raised };
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::same(12))
            .corner_radius(CornerRadius::same(self.radius))
            .stroke(stroke)
    }
}
