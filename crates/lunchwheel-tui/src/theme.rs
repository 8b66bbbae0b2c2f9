use std::collections::HashMap;
use std::path::Path;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;
use tracing::warn;

use lunchwheel_core::food::SegmentColor;

/// Concrete colors for each wheel segment color.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPalette {
    pub red: Color,
    pub green: Color,
    pub blue: Color,
    pub yellow: Color,
    pub magenta: Color,
    pub cyan: Color,
    pub gray: Color,
    pub light_gray: Color,
    pub dark_gray: Color,
    pub black: Color,
}

impl SegmentPalette {
    /// Plain terminal colors, used by the light theme and as a fallback.
    pub fn ansi() -> Self {
        Self {
            red: Color::Red,
            green: Color::Green,
            blue: Color::Blue,
            yellow: Color::Yellow,
            magenta: Color::Magenta,
            cyan: Color::Cyan,
            gray: Color::Gray,
            light_gray: Color::White,
            dark_gray: Color::DarkGray,
            black: Color::Black,
        }
    }

    pub fn get(&self, color: SegmentColor) -> Color {
        match color {
            SegmentColor::Red => self.red,
            SegmentColor::Green => self.green,
            SegmentColor::Blue => self.blue,
            SegmentColor::Yellow => self.yellow,
            SegmentColor::Magenta => self.magenta,
            SegmentColor::Cyan => self.cyan,
            SegmentColor::Gray => self.gray,
            SegmentColor::LightGray => self.light_gray,
            SegmentColor::DarkGray => self.dark_gray,
            SegmentColor::Black => self.black,
        }
    }

    fn set(&mut self, color: SegmentColor, value: Color) {
        let slot = match color {
            SegmentColor::Red => &mut self.red,
            SegmentColor::Green => &mut self.green,
            SegmentColor::Blue => &mut self.blue,
            SegmentColor::Yellow => &mut self.yellow,
            SegmentColor::Magenta => &mut self.magenta,
            SegmentColor::Cyan => &mut self.cyan,
            SegmentColor::Gray => &mut self.gray,
            SegmentColor::LightGray => &mut self.light_gray,
            SegmentColor::DarkGray => &mut self.dark_gray,
            SegmentColor::Black => &mut self.black,
        };
        *slot = value;
    }
}

/// Application theme with styles for every UI element.
#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Style,
    pub border_focused: Style,
    pub selected: Style,
    pub header: Style,
    pub normal: Style,
    pub dimmed: Style,
    pub error: Style,
    pub warning: Style,
    pub success: Style,
    pub status_bar: Style,
    pub popup_border: Style,
    pub popup_title: Style,
    pub input_cursor: Style,
    pub checkbox: Style,
    pub pointer: Style,
    pub wheel_rim: Color,
    pub winner: Style,
    pub segments: SegmentPalette,
}

impl Theme {
    /// Default dark theme based on the Catppuccin Mocha palette.
    pub fn dark() -> Self {
        // Catppuccin Mocha palette
        let base = Color::Rgb(30, 30, 46); // #1e1e2e  background
        let mantle = Color::Rgb(24, 24, 37); // #181825
        let surface0 = Color::Rgb(49, 50, 68); // #313244  elevated surfaces
        let surface1 = Color::Rgb(69, 71, 90); // #45475a  selection/active bg
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086 muted/dim
        let overlay2 = Color::Rgb(147, 153, 178); // #9399b2
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8 secondary text
        let text = Color::Rgb(205, 214, 244); // #cdd6f4  primary text
        let blue = Color::Rgb(137, 180, 250); // #89b4fa  accent/focus
        let lavender = Color::Rgb(180, 190, 254); // #b4befe secondary accent
        let green = Color::Rgb(166, 227, 161); // #a6e3a1  success
        let red = Color::Rgb(243, 139, 168); // #f38ba8  error
        let peach = Color::Rgb(250, 179, 135); // #fab387  orange
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af  warning
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7  purple accent
        let teal = Color::Rgb(148, 226, 213); // #94e2d5

        Self {
            border: Style::default().fg(surface1),
            border_focused: Style::default().fg(blue).add_modifier(Modifier::BOLD),
            selected: Style::default().fg(base).bg(blue),
            header: Style::default().fg(lavender).add_modifier(Modifier::BOLD),
            normal: Style::default().fg(text),
            dimmed: Style::default().fg(overlay0),
            error: Style::default().fg(red).add_modifier(Modifier::BOLD),
            warning: Style::default().fg(yellow),
            success: Style::default().fg(green),
            status_bar: Style::default().fg(subtext0).bg(surface0),
            popup_border: Style::default().fg(mauve),
            popup_title: Style::default().fg(mauve).add_modifier(Modifier::BOLD),
            input_cursor: Style::default().fg(peach),
            checkbox: Style::default().fg(green),
            pointer: Style::default().fg(peach).add_modifier(Modifier::BOLD),
            wheel_rim: lavender,
            winner: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
            segments: SegmentPalette {
                red,
                green,
                blue,
                yellow,
                magenta: mauve,
                cyan: teal,
                gray: overlay2,
                light_gray: text,
                dark_gray: surface1,
                black: mantle,
            },
        }
    }

    /// Light theme for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Blue),
            selected: Style::default().fg(Color::White).bg(Color::Blue),
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            normal: Style::default().fg(Color::Black),
            dimmed: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            warning: Style::default().fg(Color::Yellow),
            success: Style::default().fg(Color::Green),
            status_bar: Style::default().fg(Color::Black).bg(Color::Gray),
            popup_border: Style::default().fg(Color::Blue),
            popup_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            input_cursor: Style::default().fg(Color::Blue),
            checkbox: Style::default().fg(Color::Green),
            pointer: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            wheel_rim: Color::Black,
            winner: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            segments: SegmentPalette::ansi(),
        }
    }

    /// Nord theme.
    pub fn nord() -> Self {
        let polar0 = Color::Rgb(46, 52, 64);
        let polar2 = Color::Rgb(67, 76, 94);
        let polar3 = Color::Rgb(76, 86, 106);
        let snow0 = Color::Rgb(216, 222, 233);
        let snow2 = Color::Rgb(236, 239, 244);
        let frost0 = Color::Rgb(143, 188, 187);
        let frost1 = Color::Rgb(136, 192, 208);
        let frost2 = Color::Rgb(129, 161, 193);
        let frost3 = Color::Rgb(94, 129, 172);
        let aurora_red = Color::Rgb(191, 97, 106);
        let aurora_orange = Color::Rgb(208, 135, 112);
        let aurora_yellow = Color::Rgb(235, 203, 139);
        let aurora_green = Color::Rgb(163, 190, 140);
        let aurora_purple = Color::Rgb(180, 142, 173);

        Self {
            border: Style::default().fg(frost0),
            border_focused: Style::default().fg(frost2),
            selected: Style::default().fg(polar0).bg(frost0),
            header: Style::default().fg(frost2).add_modifier(Modifier::BOLD),
            normal: Style::default().fg(snow0),
            dimmed: Style::default().fg(frost0),
            error: Style::default().fg(aurora_red).add_modifier(Modifier::BOLD),
            warning: Style::default().fg(aurora_orange),
            success: Style::default().fg(aurora_green),
            status_bar: Style::default().fg(snow2).bg(polar0),
            popup_border: Style::default().fg(aurora_yellow),
            popup_title: Style::default()
                .fg(aurora_yellow)
                .add_modifier(Modifier::BOLD),
            input_cursor: Style::default().fg(frost2),
            checkbox: Style::default().fg(aurora_green),
            pointer: Style::default()
                .fg(aurora_orange)
                .add_modifier(Modifier::BOLD),
            wheel_rim: snow2,
            winner: Style::default()
                .fg(aurora_yellow)
                .add_modifier(Modifier::BOLD),
            segments: SegmentPalette {
                red: aurora_red,
                green: aurora_green,
                blue: frost3,
                yellow: aurora_yellow,
                magenta: aurora_purple,
                cyan: frost1,
                gray: polar3,
                light_gray: snow0,
                dark_gray: polar2,
                black: polar0,
            },
        }
    }

    /// Load a theme by name. Supports built-in names and custom TOML files
    /// under `~/.config/lunchwheel/themes/`.
    pub fn load(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            "nord" => Self::nord(),
            _ => {
                if let Some(config_dir) = dirs::config_dir() {
                    let theme_path = config_dir
                        .join("lunchwheel")
                        .join("themes")
                        .join(format!("{}.toml", name));
                    if theme_path.exists() {
                        if let Some(theme) = Self::from_file(&theme_path) {
                            return theme;
                        }
                    }
                }
                warn!("Unknown theme '{}', using dark", name);
                Self::dark()
            }
        }
    }

    fn from_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read theme file {:?}: {}", path, e);
                return None;
            }
        };
        match Self::from_toml(&content) {
            Ok(theme) => Some(theme),
            Err(e) => {
                warn!("Failed to parse theme file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Parse a custom theme definition. Missing entries keep the dark theme's values.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        let def: ThemeDefinition = toml::from_str(content)?;
        Ok(def.to_theme())
    }

    pub fn segment_color(&self, color: SegmentColor) -> Color {
        self.segments.get(color)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

// --- TOML deserialization types ---

#[derive(Debug, Deserialize)]
struct ThemeDefinition {
    #[serde(default)]
    colors: ThemeColors,
    /// segment color name -> color, e.g. `red = "#ff5555"`
    #[serde(default)]
    segments: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ThemeColors {
    border: Option<StyleDef>,
    border_focused: Option<StyleDef>,
    selected: Option<StyleDef>,
    header: Option<StyleDef>,
    normal: Option<StyleDef>,
    dimmed: Option<StyleDef>,
    error: Option<StyleDef>,
    warning: Option<StyleDef>,
    success: Option<StyleDef>,
    status_bar: Option<StyleDef>,
    popup_border: Option<StyleDef>,
    popup_title: Option<StyleDef>,
    input_cursor: Option<StyleDef>,
    checkbox: Option<StyleDef>,
    pointer: Option<StyleDef>,
    winner: Option<StyleDef>,
    wheel_rim: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StyleDef {
    #[serde(default)]
    fg: Option<String>,
    #[serde(default)]
    bg: Option<String>,
    #[serde(default)]
    modifiers: Option<String>,
}

impl StyleDef {
    fn to_style(&self) -> Style {
        let mut style = Style::default();
        if let Some(ref fg) = self.fg {
            style = style.fg(parse_color(fg));
        }
        if let Some(ref bg) = self.bg {
            style = style.bg(parse_color(bg));
        }
        if let Some(ref mods) = self.modifiers {
            for m in mods.split('|') {
                match m.trim().to_uppercase().as_str() {
                    "BOLD" => style = style.add_modifier(Modifier::BOLD),
                    "ITALIC" => style = style.add_modifier(Modifier::ITALIC),
                    "UNDERLINED" => style = style.add_modifier(Modifier::UNDERLINED),
                    "DIM" => style = style.add_modifier(Modifier::DIM),
                    "REVERSED" => style = style.add_modifier(Modifier::REVERSED),
                    _ => {}
                }
            }
        }
        style
    }
}

fn overlay(target: &mut Style, def: &Option<StyleDef>) {
    if let Some(def) = def {
        *target = def.to_style();
    }
}

impl ThemeDefinition {
    fn to_theme(&self) -> Theme {
        let mut theme = Theme::dark();
        let c = &self.colors;
        overlay(&mut theme.border, &c.border);
        overlay(&mut theme.border_focused, &c.border_focused);
        overlay(&mut theme.selected, &c.selected);
        overlay(&mut theme.header, &c.header);
        overlay(&mut theme.normal, &c.normal);
        overlay(&mut theme.dimmed, &c.dimmed);
        overlay(&mut theme.error, &c.error);
        overlay(&mut theme.warning, &c.warning);
        overlay(&mut theme.success, &c.success);
        overlay(&mut theme.status_bar, &c.status_bar);
        overlay(&mut theme.popup_border, &c.popup_border);
        overlay(&mut theme.popup_title, &c.popup_title);
        overlay(&mut theme.input_cursor, &c.input_cursor);
        overlay(&mut theme.checkbox, &c.checkbox);
        overlay(&mut theme.pointer, &c.pointer);
        overlay(&mut theme.winner, &c.winner);
        if let Some(ref rim) = c.wheel_rim {
            theme.wheel_rim = parse_color(rim);
        }

        for (name, value) in &self.segments {
            match name.parse::<SegmentColor>() {
                Ok(color) => theme.segments.set(color, parse_color(value)),
                Err(_) => warn!("Unknown segment color '{}' in theme", name),
            }
        }
        theme
    }
}

/// Parse a color name ("red", "dark_gray") or hex value ("#RRGGBB").
/// Unknown values become white.
pub fn parse_color(s: &str) -> Color {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" | "darkgray" => Color::DarkGray,
        "light_red" | "lightred" => Color::LightRed,
        "light_green" | "lightgreen" => Color::LightGreen,
        "light_yellow" | "lightyellow" => Color::LightYellow,
        "light_blue" | "lightblue" => Color::LightBlue,
        "light_magenta" | "lightmagenta" => Color::LightMagenta,
        "light_cyan" | "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        _ => {
            // Try #RRGGBB or RRGGBB
            let hex = s.strip_prefix('#').unwrap_or(&s);
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return Color::Rgb(r, g, b);
                }
            }
            Color::White
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_color_names() {
        assert_eq!(parse_color("red"), Color::Red);
        assert_eq!(parse_color("dark_gray"), Color::DarkGray);
        assert_eq!(parse_color("DarkGray"), Color::DarkGray);
        assert_eq!(parse_color("no-such-color"), Color::White);
    }

    #[test]
    fn test_parse_color_hex() {
        assert_eq!(parse_color("#FF0000"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("00FF00"), Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_load_builtin_themes() {
        assert_eq!(Theme::load("nord").segments, Theme::nord().segments);
        assert_eq!(Theme::load("LIGHT").segments, SegmentPalette::ansi());
        // Unknown names fall back to dark
        assert_eq!(
            Theme::load("does-not-exist-anywhere").segments,
            Theme::dark().segments
        );
    }

    #[test]
    fn test_segment_colors_are_distinct() {
        for theme in [Theme::dark(), Theme::light(), Theme::nord()] {
            let colors: Vec<Color> = SegmentColor::iter()
                .map(|c| theme.segment_color(c))
                .collect();
            for (i, a) in colors.iter().enumerate() {
                for b in &colors[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn test_custom_theme_overlays_dark() {
        let toml = r##"
[colors]
pointer = { fg = "#ff0000", modifiers = "BOLD" }
wheel_rim = "white"

[segments]
red = "#aa0000"
light_gray = "gray"
banana = "yellow"
"##;
        let theme = Theme::from_toml(toml).unwrap();
        assert_eq!(
            theme.pointer,
            Style::default()
                .fg(Color::Rgb(255, 0, 0))
                .add_modifier(Modifier::BOLD)
        );
        assert_eq!(theme.wheel_rim, Color::White);
        assert_eq!(theme.segment_color(SegmentColor::Red), Color::Rgb(170, 0, 0));
        assert_eq!(theme.segment_color(SegmentColor::LightGray), Color::Gray);
        // Untouched entries keep the dark theme's values
        assert_eq!(theme.normal, Theme::dark().normal);
        assert_eq!(
            theme.segment_color(SegmentColor::Blue),
            Theme::dark().segment_color(SegmentColor::Blue)
        );
    }
}
