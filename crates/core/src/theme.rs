//! Light/dark color tables and the switcher that writes them to a style
//! scope (the document root in a browser, a map in tests).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shipwake_protocol::{Color, ThemeToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn table(self) -> &'static ThemeTable {
        match self {
            ThemeMode::Light => &LIGHT,
            ThemeMode::Dark => &DARK,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme `{other}` (expected light or dark)")),
        }
    }
}

/// A named set of colors, one per [`ThemeToken`].
#[derive(Debug)]
pub struct ThemeTable {
    pub mode: ThemeMode,
    resolve: fn(ThemeToken) -> Color,
}

impl ThemeTable {
    pub fn color(&self, token: ThemeToken) -> Color {
        (self.resolve)(token)
    }

    /// Every `(css variable, value)` pair, in [`ThemeToken::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        ThemeToken::ALL
            .iter()
            .map(move |&token| (token.css_var(), self.color(token).to_hex()))
    }
}

pub static LIGHT: ThemeTable = ThemeTable {
    mode: ThemeMode::Light,
    resolve: resolve_light,
};

pub static DARK: ThemeTable = ThemeTable {
    mode: ThemeMode::Dark,
    resolve: resolve_dark,
};

fn resolve_light(token: ThemeToken) -> Color {
    // Shallow water
    use ThemeToken::*;
    match token {
        Background => Color::rgb(0xf4, 0xfa, 0xff),
        Surface => Color::rgb(0xe3, 0xf2, 0xfd),

        TextPrimary => Color::rgb(0x0b, 0x25, 0x45),
        TextMuted => Color::rgb(0x4a, 0x65, 0x82),
        Accent => Color::rgb(0x00, 0x77, 0xb6),

        NavBackground => Color::rgb(0x03, 0x45, 0x7a),
        NavText => Color::rgb(0xf1, 0xf8, 0xff),

        CardBackground => Color::rgb(0xff, 0xff, 0xff),
        CardBorder => Color::rgb(0x90, 0xe0, 0xef),
        TagBackground => Color::rgb(0xca, 0xf0, 0xf8),
        TagText => Color::rgb(0x02, 0x3e, 0x8a),

        PathStroke => Color::rgb(0x48, 0xca, 0xe4),
        Ship => Color::rgb(0xe7, 0x6f, 0x51),
    }
}

fn resolve_dark(token: ThemeToken) -> Color {
    // Night sea
    use ThemeToken::*;
    match token {
        Background => Color::rgb(0x0a, 0x19, 0x29),
        Surface => Color::rgb(0x10, 0x2a, 0x43),

        TextPrimary => Color::rgb(0xe0, 0xf2, 0xfe),
        TextMuted => Color::rgb(0x8d, 0xa9, 0xc4),
        Accent => Color::rgb(0x4c, 0xc9, 0xf0),

        NavBackground => Color::rgb(0x05, 0x10, 0x1c),
        NavText => Color::rgb(0xca, 0xf0, 0xf8),

        CardBackground => Color::rgb(0x13, 0x31, 0x4f),
        CardBorder => Color::rgb(0x1f, 0x4e, 0x79),
        TagBackground => Color::rgb(0x03, 0x45, 0x7a),
        TagText => Color::rgb(0xad, 0xe8, 0xf4),

        PathStroke => Color::rgb(0x4c, 0xc9, 0xf0),
        Ship => Color::rgb(0xf4, 0xa2, 0x61),
    }
}

/// Receives style variable writes.
pub trait StyleSink {
    fn set_property(&mut self, name: &str, value: &str);
}

impl StyleSink for BTreeMap<String, String> {
    fn set_property(&mut self, name: &str, value: &str) {
        self.insert(name.to_owned(), value.to_owned());
    }
}

/// Write every pair of `table` to `sink`, overwriting previous values.
pub fn apply_theme<S: StyleSink + ?Sized>(table: &ThemeTable, sink: &mut S) {
    for (name, value) in table.entries() {
        sink.set_property(name, &value);
    }
}

/// Owns the active-theme flag and the sink it is applied to.
#[derive(Debug)]
pub struct ThemeSwitcher<S> {
    sink: S,
    dark: bool,
}

impl<S: StyleSink> ThemeSwitcher<S> {
    /// Starts in light mode and applies it immediately.
    pub fn new(sink: S) -> Self {
        Self::with_mode(sink, ThemeMode::Light)
    }

    pub fn with_mode(mut sink: S, mode: ThemeMode) -> Self {
        apply_theme(mode.table(), &mut sink);
        Self {
            sink,
            dark: mode == ThemeMode::Dark,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        if self.dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }

    pub fn table(&self) -> &'static ThemeTable {
        self.mode().table()
    }

    /// Flip light/dark and re-apply. Returns the new mode.
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.dark = !self.dark;
        let mode = self.mode();
        apply_theme(mode.table(), &mut self.sink);
        tracing::debug!(%mode, "theme switched");
        mode
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
