//! Light and dark color schemes for the dashboard.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The sequential "Tealgrn" palette used by every chart.
pub const TEALGRN: [&str; 7] = [
    "rgb(176, 242, 188)",
    "rgb(137, 232, 172)",
    "rgb(103, 219, 165)",
    "rgb(76, 200, 163)",
    "rgb(56, 178, 163)",
    "rgb(44, 152, 160)",
    "rgb(37, 125, 152)",
];

/// Background of the KPI cards, independent of the theme.
pub const CARD_BACKGROUND: &str = "#44a1a0";

/// Corner radius of the KPI cards.
pub const CARD_BORDER_RADIUS: &str = "5px";

/// Dashboard theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// White background, black text.
    #[default]
    Light,
    /// Near-black background, white text.
    Dark,
}

impl Theme {
    /// The color scheme for this theme.
    #[must_use]
    pub fn colors(self) -> &'static ColorScheme {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(Error::UnknownTheme(s.to_string())),
        }
    }
}

/// Colors applied to page, cards and chart layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorScheme {
    /// Page background.
    pub background: &'static str,
    /// Page text.
    pub text: &'static str,
    /// KPI card background.
    pub card_bg: &'static str,
    /// KPI card text.
    pub card_text: &'static str,
    /// Chart plotting area background.
    pub plot_bg: &'static str,
    /// Chart paper background.
    pub paper_bg: &'static str,
}

static LIGHT: ColorScheme = ColorScheme {
    background: "white",
    text: "black",
    card_bg: "#0DCAF0",
    card_text: "black",
    plot_bg: "white",
    paper_bg: "white",
};

static DARK: ColorScheme = ColorScheme {
    background: "#1c1c1c",
    text: "white",
    card_bg: "#0DCAF0",
    card_text: "black",
    plot_bg: "#1c1c1c",
    paper_bg: "#1c1c1c",
};

/// Inline style of a page section: background and text color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStyle {
    /// CSS background color.
    pub background_color: &'static str,
    /// CSS text color.
    pub color: &'static str,
}

impl SectionStyle {
    /// The section style for a theme.
    #[must_use]
    pub fn for_theme(theme: Theme) -> Self {
        let colors = theme.colors();
        Self {
            background_color: colors.background,
            color: colors.text,
        }
    }
}

/// Inline style of a KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStyle {
    /// CSS background.
    pub background: &'static str,
    /// CSS border radius.
    pub border_radius: &'static str,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            background: CARD_BACKGROUND,
            border_radius: CARD_BORDER_RADIUS,
        }
    }
}
