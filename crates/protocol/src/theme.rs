use serde::{Deserialize, Serialize};

/// Semantic color tokens. Each maps to one CSS custom property on the
/// document root; the set is fixed and shared by every theme table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,

    TextPrimary,
    TextMuted,
    Accent,

    // Navigation bar
    NavBackground,
    NavText,

    // Timeline cards
    CardBackground,
    CardBorder,
    TagBackground,
    TagText,

    // Voyage path + ship
    PathStroke,
    Ship,
}

impl ThemeToken {
    pub const ALL: [ThemeToken; 13] = [
        ThemeToken::Background,
        ThemeToken::Surface,
        ThemeToken::TextPrimary,
        ThemeToken::TextMuted,
        ThemeToken::Accent,
        ThemeToken::NavBackground,
        ThemeToken::NavText,
        ThemeToken::CardBackground,
        ThemeToken::CardBorder,
        ThemeToken::TagBackground,
        ThemeToken::TagText,
        ThemeToken::PathStroke,
        ThemeToken::Ship,
    ];

    /// Name of the CSS custom property this token is written to.
    pub const fn css_var(self) -> &'static str {
        match self {
            ThemeToken::Background => "--bg-color",
            ThemeToken::Surface => "--surface-color",
            ThemeToken::TextPrimary => "--text-color",
            ThemeToken::TextMuted => "--text-muted",
            ThemeToken::Accent => "--accent-color",
            ThemeToken::NavBackground => "--nav-bg",
            ThemeToken::NavText => "--nav-text",
            ThemeToken::CardBackground => "--card-bg",
            ThemeToken::CardBorder => "--card-border",
            ThemeToken::TagBackground => "--tag-bg",
            ThemeToken::TagText => "--tag-text",
            ThemeToken::PathStroke => "--path-color",
            ThemeToken::Ship => "--ship-color",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn css_vars_are_unique_custom_properties() {
        let names: HashSet<_> = ThemeToken::ALL.iter().map(|t| t.css_var()).collect();
        assert_eq!(names.len(), ThemeToken::ALL.len());
        assert!(names.iter().all(|n| n.starts_with("--")));
    }
}
