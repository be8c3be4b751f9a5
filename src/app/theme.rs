//! Workbench colours, kept in one place instead of inside the render code.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct UiTheme {
    pub header_bg: Color,
    pub header_fg: Color,
    pub title_fg: Color,
    pub focus_border: Color,
    pub inactive_border: Color,
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive_fg: Color,
    pub new_tab_fg: Color,
    pub line_number_fg: Color,
    pub selection_bg: Color,
    pub explorer_dir_fg: Color,
    pub explorer_selected_bg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub menu_bg: Color,
    pub menu_fg: Color,
    pub info_fg: Color,
    pub warning_fg: Color,
    pub error_fg: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalColorSupport {
    TrueColor,
    Ansi256,
    Ansi16,
}

pub fn detect_terminal_color_support() -> TerminalColorSupport {
    let var = |name: &str| std::env::var(name).unwrap_or_default().to_ascii_lowercase();
    color_support_from(
        &var("TABEDIT_COLOR_SUPPORT"),
        &var("COLORTERM"),
        &var("TERM"),
    )
}

fn color_support_from(forced: &str, colorterm: &str, term: &str) -> TerminalColorSupport {
    match forced.trim() {
        "truecolor" | "24bit" | "rgb" => return TerminalColorSupport::TrueColor,
        "256" | "ansi256" => return TerminalColorSupport::Ansi256,
        "16" | "ansi16" | "basic" => return TerminalColorSupport::Ansi16,
        _ => {}
    }

    let truecolor = |s: &str| s.contains("truecolor") || s.contains("24bit");
    if truecolor(colorterm) || truecolor(term) {
        TerminalColorSupport::TrueColor
    } else if term.contains("256color") {
        TerminalColorSupport::Ansi256
    } else {
        TerminalColorSupport::Ansi16
    }
}

impl Default for UiTheme {
    fn default() -> Self {
        Self {
            header_bg: Color::Rgb(0x25, 0x25, 0x26),
            header_fg: Color::Rgb(0xCC, 0xCC, 0xCC),
            title_fg: Color::Rgb(0x4F, 0xC1, 0xFF),
            focus_border: Color::Rgb(0x00, 0x7A, 0xCC),
            inactive_border: Color::Rgb(0x55, 0x55, 0x55),
            tab_active_bg: Color::Rgb(0x1E, 0x1E, 0x1E),
            tab_active_fg: Color::Rgb(0xFF, 0xFF, 0xFF),
            tab_inactive_fg: Color::Rgb(0x96, 0x96, 0x96),
            new_tab_fg: Color::Rgb(0x4E, 0xC9, 0xB0),
            line_number_fg: Color::Rgb(0x85, 0x85, 0x85),
            selection_bg: Color::Rgb(0x26, 0x4F, 0x78),
            explorer_dir_fg: Color::Rgb(0xDC, 0xDC, 0xAA),
            explorer_selected_bg: Color::Rgb(0x37, 0x37, 0x3D),
            status_bg: Color::Rgb(0x00, 0x7A, 0xCC),
            status_fg: Color::Rgb(0xFF, 0xFF, 0xFF),
            menu_bg: Color::Rgb(0x25, 0x25, 0x26),
            menu_fg: Color::Rgb(0xCC, 0xCC, 0xCC),
            info_fg: Color::Rgb(0x4F, 0xC1, 0xFF),
            warning_fg: Color::Rgb(0xCC, 0xA7, 0x00),
            error_fg: Color::Rgb(0xF4, 0x87, 0x71),
        }
    }
}

impl UiTheme {
    pub fn adapt_to_terminal_capabilities(&mut self) {
        self.apply_color_support(detect_terminal_color_support());
    }

    fn apply_color_support(&mut self, support: TerminalColorSupport) {
        if support == TerminalColorSupport::TrueColor {
            return;
        }
        for color in [
            &mut self.header_bg,
            &mut self.header_fg,
            &mut self.title_fg,
            &mut self.focus_border,
            &mut self.inactive_border,
            &mut self.tab_active_bg,
            &mut self.tab_active_fg,
            &mut self.tab_inactive_fg,
            &mut self.new_tab_fg,
            &mut self.line_number_fg,
            &mut self.selection_bg,
            &mut self.explorer_dir_fg,
            &mut self.explorer_selected_bg,
            &mut self.status_bg,
            &mut self.status_fg,
            &mut self.menu_bg,
            &mut self.menu_fg,
            &mut self.info_fg,
            &mut self.warning_fg,
            &mut self.error_fg,
        ] {
            *color = map_color_for_support(*color, support);
        }
    }
}

fn map_color_for_support(color: Color, support: TerminalColorSupport) -> Color {
    match (support, color) {
        (TerminalColorSupport::Ansi256, Color::Rgb(r, g, b)) => Color::Indexed(rgb_to_ansi256(r, g, b)),
        (TerminalColorSupport::Ansi16, Color::Rgb(r, g, b)) => Color::Indexed(rgb_to_ansi16(r, g, b)),
        (_, other) => other,
    }
}

/// Nearest entry of the 6x6x6 cube or the 24-step gray ramp.
fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const STEPS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let nearest_step = |v: u8| {
        STEPS
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| (**s as i32 - v as i32).abs())
            .map(|(i, _)| i as u8)
            .unwrap_or(0)
    };
    let (ri, gi, bi) = (nearest_step(r), nearest_step(g), nearest_step(b));
    let cube = 16 + 36 * ri + 6 * gi + bi;
    let cube_rgb = (STEPS[ri as usize], STEPS[gi as usize], STEPS[bi as usize]);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_i = (avg.saturating_sub(8) / 10).min(23);
    let gray_v = 8 + gray_i * 10;
    let gray = 232 + gray_i;

    if distance_sq((r, g, b), (gray_v, gray_v, gray_v)) < distance_sq((r, g, b), cube_rgb) {
        gray
    } else {
        cube
    }
}

const ANSI16_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 0, 0),
    (0, 205, 0),
    (205, 205, 0),
    (0, 0, 238),
    (205, 0, 205),
    (0, 205, 205),
    (229, 229, 229),
    (127, 127, 127),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (92, 92, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> u8 {
    ANSI16_RGB
        .iter()
        .enumerate()
        .min_by_key(|(_, rgb)| distance_sq((r, g, b), **rgb))
        .map(|(i, _)| i as u8)
        .unwrap_or(7)
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

#[cfg(test)]
#[path = "../../tests/unit/app/theme.rs"]
mod tests;
