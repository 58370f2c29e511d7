//! Color theme system for cody.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! cody renders. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` is the Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the panel that has keyboard focus.
    pub border_active: Color,
    pub border_inactive: Color,

    // Chat
    /// Speaker label for the candidate's own turns.
    pub chat_user: Color,
    /// Speaker label for assistant turns.
    pub chat_assistant: Color,
    /// Body text of chat turns and the problem description.
    pub text: Color,
    /// Hints, placeholders, "thinking..." indicators.
    pub muted: Color,

    // Header
    pub title: Color,
    /// Countdown while more than five minutes remain.
    pub timer: Color,
    /// Countdown in its last five minutes.
    pub timer_low: Color,

    // Feedback
    pub related: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Transient notices such as "Start an interview first!".
    pub warning: Color,
    pub status_mode: Color,

    /// Text cursor in input lines and the editor.
    pub cursor: Color,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            chat_user: Color::Green,
            chat_assistant: Color::Cyan,
            text: Color::Reset,
            muted: Color::DarkGray,

            title: Color::White,
            timer: Color::Green,
            timer_low: Color::Red,

            related: Color::Yellow,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            warning: Color::Yellow,
            status_mode: Color::Cyan,

            cursor: Color::White,
        }
    }

    /// The Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let rosewater = Color::Rgb(245, 224, 220); // #f5e0dc

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            chat_user: green,
            chat_assistant: blue,
            text,
            muted: overlay1,

            title: lavender,
            timer: green,
            timer_low: red,

            related: peach,

            status_bar_bg: surface1,
            status_bar_fg: text,
            warning: yellow,
            status_mode: lavender,

            cursor: rosewater,
        }
    }

    /// Resolves a theme name from config. Unknown names fall back to `dark()`
    /// with a note on stderr.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                eprintln!("cody: unknown theme '{}', falling back to 'dark'", other);
                Self::dark()
            }
        }
    }
}
