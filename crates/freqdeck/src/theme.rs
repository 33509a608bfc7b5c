use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub highlight: Color32,
    pub overlay: Color32,
    pub h1_size: f32,
    pub h2_size: f32,
    pub subtitle_size: f32,
    pub body_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0B, 0x2B, 0x2A),
            foreground: Color32::from_rgb(0xD8, 0xE6, 0xE3),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x00, 0x85, 0x7C),
            highlight: Color32::from_rgb(0xC9, 0xA9, 0x62),
            overlay: Color32::from_rgb(0x05, 0x14, 0x13),
            h1_size: 110.0,
            h2_size: 80.0,
            subtitle_size: 48.0,
            body_size: 42.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xF4, 0xF1, 0xEA),
            foreground: Color32::from_rgb(0x1A, 0x2B, 0x2A),
            heading_color: Color32::from_rgb(0x00, 0x4F, 0x4A),
            accent: Color32::from_rgb(0x00, 0x6B, 0x64),
            highlight: Color32::from_rgb(0xA8, 0x86, 0x3C),
            overlay: Color32::from_rgb(0xE6, 0xE1, 0xD6),
            h1_size: 110.0,
            h2_size: 80.0,
            subtitle_size: 48.0,
            body_size: 42.0,
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let opacity = opacity.clamp(0.0, 1.0);
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    /// Slide background: the deck's own colour in the dark theme, the theme
    /// background otherwise (deck colours are picked for dark rendering).
    pub fn slide_background(&self, deck_color: Option<Color32>) -> Color32 {
        match deck_color {
            Some(c) if self.name == "dark" => c,
            _ => self.background,
        }
    }
}

/// Parse `#RRGGBB` (or `RRGGBB`).
pub fn parse_hex_color(s: &str) -> Option<Color32> {
    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
