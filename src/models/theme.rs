use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Accent colours per mode, persisted in the config file and handed to the
/// renderer explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub mode: ThemeMode,
    #[serde(default = "default_accent_light")]
    pub accent_light: String,
    #[serde(default = "default_accent_dark")]
    pub accent_dark: String,
}

fn default_accent_light() -> String {
    "#1E3A8A".to_string()
}

fn default_accent_dark() -> String {
    "#2CFF05".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            mode: ThemeMode::default(),
            accent_light: default_accent_light(),
            accent_dark: default_accent_dark(),
        }
    }
}

impl Theme {
    pub fn accent_hex(&self) -> &str {
        match self.mode {
            ThemeMode::Light => &self.accent_light,
            ThemeMode::Dark => &self.accent_dark,
        }
    }

    pub fn accent(&self) -> AppResult<Rgb> {
        Rgb::from_hex(self.accent_hex())
    }
}

/// Colour as PDF fill components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GREY: Rgb = Rgb(0.5, 0.5, 0.5);

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> AppResult<Self> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::Config(format!(
                "invalid accent colour '{hex}' (expected #RRGGBB)"
            )));
        }

        let channel = |i: usize| -> AppResult<f32> {
            u8::from_str_radix(&h[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| AppError::Config(format!("invalid accent colour '{hex}'")))
        };

        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_accent() {
        let rgb = Theme::default().accent().unwrap();
        assert!((rgb.0 - 30.0 / 255.0).abs() < 1e-6);
        assert!((rgb.1 - 58.0 / 255.0).abs() < 1e-6);
        assert!((rgb.2 - 138.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn dark_mode_switches_accent() {
        let theme = Theme {
            mode: ThemeMode::Dark,
            ..Theme::default()
        };
        assert_eq!(theme.accent_hex(), "#2CFF05");
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("00F0FF").is_ok());
    }
}
