use ratatui::style::Color;

pub const SELECTED_BG: Color = Color::Rgb(50, 50, 80);
pub const STATUS_BG: Color = Color::Rgb(30, 30, 40);
pub const HEADER_BG: Color = Color::Rgb(25, 25, 38);
pub const ACCENT: Color = Color::Rgb(140, 115, 200);
pub const SEPARATOR: Color = Color::Rgb(55, 55, 75);
pub const BORDER_COLOR: Color = Color::Rgb(70, 70, 95);
pub const ACTIVE_BORDER: Color = Color::Rgb(120, 120, 180);
pub const FILTER_COLOR: Color = Color::Cyan;
pub const DIM_TEXT: Color = Color::Rgb(100, 100, 120);
pub const HIGHLIGHT_FG: Color = Color::Black;
pub const HIGHLIGHT_BG: Color = Color::Yellow;
pub const STAR_COLOR: Color = Color::Yellow;
pub const PRIVATE_COLOR: Color = Color::Magenta;
pub const ERROR_FG: Color = Color::LightRed;
pub const WARN_FG: Color = Color::Yellow;

const LANGUAGE_COLORS: &[(&str, Color)] = &[
    ("rust", Color::Rgb(222, 165, 132)),
    ("go", Color::Cyan),
    ("python", Color::Blue),
    ("javascript", Color::Yellow),
    ("typescript", Color::LightBlue),
    ("c", Color::Gray),
    ("c++", Color::LightMagenta),
    ("java", Color::Rgb(176, 114, 25)),
    ("shell", Color::Green),
];

pub fn language_color(language: &str) -> Color {
    let lower = language.to_lowercase();
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
        .unwrap_or(Color::White)
}
