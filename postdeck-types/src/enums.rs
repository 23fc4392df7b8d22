use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorScheme {
    #[default]
    Default,
    Dark,
    Light,
    Solarized,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [
        ColorScheme::Default,
        ColorScheme::Dark,
        ColorScheme::Light,
        ColorScheme::Solarized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Default => "Default",
            ColorScheme::Dark => "Dark",
            ColorScheme::Light => "Light",
            ColorScheme::Solarized => "Solarized",
        }
    }

    /// Parse a scheme name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(ColorScheme::Default),
            "dark" => Some(ColorScheme::Dark),
            "light" => Some(ColorScheme::Light),
            "solarized" => Some(ColorScheme::Solarized),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(ColorScheme::parse("dark"), Some(ColorScheme::Dark));
        assert_eq!(ColorScheme::parse("SOLARIZED"), Some(ColorScheme::Solarized));
        assert_eq!(ColorScheme::parse("neon"), None);
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for scheme in ColorScheme::ALL {
            assert_eq!(ColorScheme::parse(scheme.as_str()), Some(scheme));
        }
    }
}
