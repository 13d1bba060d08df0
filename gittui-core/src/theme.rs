//! Color themes.
//!
//! A [`Theme`] is a plain value handed to every rendering function; there is
//! no process-wide "current theme". [`ThemeCycle`] tracks which built-in theme
//! the dashboard is showing and steps through them.

use crate::contrib::IntensityLevel;
use crate::error::{Error, Result};

/// Name of the theme used when none is configured or the configured one is unknown.
pub const DEFAULT_THEME: &str = "github-dark";

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build a color from a `0xRRGGBB` literal.
    pub const fn from_u32(value: u32) -> Self {
        Rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Config(format!("invalid hex color: {:?}", hex)));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|e| Error::Config(format!("invalid hex color {:?}: {}", hex, e)))?;
        Ok(Self::from_u32(value))
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Every color the dashboard draws with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,

    // Base
    pub background: Rgb,
    pub foreground: Rgb,
    pub subtle: Rgb,

    // Accents
    /// Titles, links and borders
    pub blue: Rgb,
    pub green: Rgb,
    pub red: Rgb,
    pub yellow: Rgb,
    pub purple: Rgb,
    /// Labels and muted text
    pub gray: Rgb,
    pub dark: Rgb,

    /// Contribution heatmap colors indexed by intensity level (0-4)
    pub contrib: [Rgb; 5],
}

impl Theme {
    /// Heatmap color for an intensity level.
    pub fn level_color(&self, level: IntensityLevel) -> Rgb {
        self.contrib[level.index()]
    }

    /// Look up a built-in theme by name.
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Built-in theme names in cycling order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUILT_IN.iter().map(|t| t.name)
    }

    /// The default GitHub dark theme.
    pub fn github_dark() -> &'static Theme {
        &BUILT_IN[0]
    }
}

const fn hex(value: u32) -> Rgb {
    Rgb::from_u32(value)
}

/// Built-in themes in cycling order.
static BUILT_IN: [Theme; 3] = [
    // GitHub Primer dark
    Theme {
        name: "github-dark",
        background: hex(0x0d1117),
        foreground: hex(0xc9d1d9),
        subtle: hex(0x484f58),
        blue: hex(0x58a6ff),
        green: hex(0x3fb950),
        red: hex(0xf85149),
        yellow: hex(0xd29922),
        purple: hex(0x8957e5),
        gray: hex(0x7d8590),
        dark: hex(0x6e7681),
        contrib: [
            hex(0x161b22),
            hex(0x0e4429),
            hex(0x006d32),
            hex(0x26a641),
            hex(0x39d353),
        ],
    },
    // Dracula, purple heatmap
    Theme {
        name: "dracula",
        background: hex(0x282a36),
        foreground: hex(0xf8f8f2),
        subtle: hex(0x44475a),
        blue: hex(0x8be9fd),
        green: hex(0x50fa7b),
        red: hex(0xff5555),
        yellow: hex(0xf1fa8c),
        purple: hex(0xbd93f9),
        gray: hex(0x6272a4),
        dark: hex(0x44475a),
        contrib: [
            hex(0x282a36),
            hex(0x44355b),
            hex(0x6d4a9e),
            hex(0x9d6fc9),
            hex(0xbd93f9),
        ],
    },
    // Nord, frost heatmap
    Theme {
        name: "nord",
        background: hex(0x2e3440),
        foreground: hex(0xeceff4),
        subtle: hex(0x4c566a),
        blue: hex(0x88c0d0),
        green: hex(0xa3be8c),
        red: hex(0xbf616a),
        yellow: hex(0xebcb8b),
        purple: hex(0xb48ead),
        gray: hex(0x616e88),
        dark: hex(0x4c566a),
        contrib: [
            hex(0x2e3440),
            hex(0x46586a),
            hex(0x5e7a94),
            hex(0x81a1c1),
            hex(0x88c0d0),
        ],
    },
];

/// Position in the built-in theme rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeCycle {
    index: usize,
}

impl ThemeCycle {
    /// Start at the named theme, falling back to [`DEFAULT_THEME`].
    pub fn starting_at(name: &str) -> Self {
        match BUILT_IN
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name.trim()))
        {
            Some(index) => Self { index },
            None => {
                tracing::warn!(theme = %name, fallback = DEFAULT_THEME, "Unknown theme");
                Self { index: 0 }
            }
        }
    }

    pub fn current(&self) -> &'static Theme {
        &BUILT_IN[self.index]
    }

    /// Advance to the next theme (wrapping) and return it.
    pub fn advance(&mut self) -> &'static Theme {
        self.index = (self.index + 1) % BUILT_IN.len();
        self.current()
    }

    /// Number of themes in the rotation.
    pub fn len(&self) -> usize {
        BUILT_IN.len()
    }

    pub fn is_empty(&self) -> bool {
        BUILT_IN.is_empty()
    }
}

impl Default for ThemeCycle {
    fn default() -> Self {
        Self::starting_at(DEFAULT_THEME)
    }
}

/// GitHub's display color for a language, gray when unknown.
pub fn language_color(language: &str) -> Rgb {
    match language {
        "Go" => hex(0x00add8),
        "JavaScript" => hex(0xf1e05a),
        "TypeScript" => hex(0x3178c6),
        "Python" => hex(0x3572a5),
        "Rust" => hex(0xdea584),
        "Java" => hex(0xb07219),
        "C" => hex(0x555555),
        "C++" => hex(0xf34b7d),
        "Ruby" => hex(0x701516),
        "PHP" => hex(0x4f5d95),
        "Swift" => hex(0xffac45),
        "Kotlin" => hex(0xa97bff),
        "Shell" => hex(0x89e051),
        "HTML" => hex(0xe34c26),
        "CSS" => hex(0x563d7c),
        _ => hex(0x858585),
    }
}
