use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub panel_alt: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub bar_background: Color32,
    pub title_size: f32,
    pub body_size: f32,
    pub chrome_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x12, 0x12, 0x14),
            panel_alt: Color32::from_rgb(0x18, 0x18, 0x1B),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::from_rgb(0xF4, 0xF1, 0xEA),
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            bar_background: Color32::from_rgb(0x22, 0x22, 0x26),
            title_size: 72.0,
            body_size: 28.0,
            chrome_size: 12.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            panel_alt: Color32::from_rgb(0xF6, 0xF6, 0xF8),
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            bar_background: Color32::from_rgb(0xEC, 0xEC, 0xF0),
            title_size: 72.0,
            body_size: 28.0,
            chrome_size: 12.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    /// Alternating panel fill so neighbouring slides are told apart while scrolling.
    pub fn panel_fill(&self, index: usize) -> Color32 {
        if index % 2 == 0 {
            self.background
        } else {
            self.panel_alt
        }
    }
}
