use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::quiz::theme::Theme;

/// Which external image backend turns `image_prompt` into a picture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageBackendKind {
    #[default]
    None,
    /// Paid image-generation API (`POST /v1/images/generations`).
    SiliconFlow,
    /// Free unauthenticated image-rendering URL service.
    Pollinations,
}

impl FromStr for ImageBackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(ImageBackendKind::None),
            "siliconflow" => Ok(ImageBackendKind::SiliconFlow),
            "pollinations" => Ok(ImageBackendKind::Pollinations),
            other => bail!("Unknown image backend '{other}' (expected none, siliconflow or pollinations)"),
        }
    }
}

/// Application configuration loaded from environment variables.
///
/// The Gemini key is optional at startup: a missing key is reported to the
/// user as a configuration error on every reading request instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub theme: Theme,
    pub image_backend: ImageBackendKind,
    pub image_api_key: Option<String>,
    pub image_model: String,
    pub image_size: String,
    pub image_base_url: String,
    pub pollinations_host: String,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-2.5-flash"),
            gemini_base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            theme: theme_setting(optional_env("SOUL_THEME"))?,
            image_backend: optional_env("IMAGE_BACKEND")
                .as_deref()
                .unwrap_or("none")
                .parse::<ImageBackendKind>()?,
            image_api_key: optional_env("IMAGE_API_KEY"),
            image_model: env_or("IMAGE_MODEL", "black-forest-labs/FLUX.1-schnell"),
            image_size: env_or("IMAGE_SIZE", "1024x1024"),
            image_base_url: env_or("IMAGE_BASE_URL", "https://api.siliconflow.cn"),
            pollinations_host: env_or("POLLINATIONS_HOST", "image.pollinations.ai"),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Image backend actually usable with the supplied credentials.
    /// `siliconflow` without a key degrades to text-only readings.
    pub fn effective_image_backend(&self) -> ImageBackendKind {
        match self.image_backend {
            ImageBackendKind::SiliconFlow if self.image_api_key.is_none() => ImageBackendKind::None,
            other => other,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset or blank falls back to the default theme.
fn theme_setting(value: Option<String>) -> Result<Theme> {
    value
        .as_deref()
        .unwrap_or("basilisk")
        .parse::<Theme>()
        .context("SOUL_THEME must be 'basilisk' or 'ethereal'")
}

/// Reads an env var, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_config() -> Config {
        Config {
            gemini_api_key: Some("test-key".to_string()),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_base_url: "http://127.0.0.1:9".to_string(),
            theme: Theme::Basilisk,
            image_backend: ImageBackendKind::None,
            image_api_key: None,
            image_model: "black-forest-labs/FLUX.1-schnell".to_string(),
            image_size: "1024x1024".to_string(),
            image_base_url: "http://127.0.0.1:9".to_string(),
            pollinations_host: "image.pollinations.ai".to_string(),
            request_timeout_secs: 30,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_image_backend_parses_known_names() {
        assert_eq!("none".parse::<ImageBackendKind>().unwrap(), ImageBackendKind::None);
        assert_eq!(
            "SiliconFlow".parse::<ImageBackendKind>().unwrap(),
            ImageBackendKind::SiliconFlow
        );
        assert_eq!(
            " pollinations ".parse::<ImageBackendKind>().unwrap(),
            ImageBackendKind::Pollinations
        );
        assert_eq!("".parse::<ImageBackendKind>().unwrap(), ImageBackendKind::None);
    }

    #[test]
    fn test_image_backend_rejects_unknown_name() {
        assert!("midjourney".parse::<ImageBackendKind>().is_err());
    }

    #[test]
    fn test_siliconflow_without_key_degrades_to_none() {
        let mut config = test_config();
        config.image_backend = ImageBackendKind::SiliconFlow;
        assert_eq!(config.effective_image_backend(), ImageBackendKind::None);

        config.image_api_key = Some("sk-image".to_string());
        assert_eq!(
            config.effective_image_backend(),
            ImageBackendKind::SiliconFlow
        );
    }

    #[test]
    fn test_pollinations_needs_no_key() {
        let mut config = test_config();
        config.image_backend = ImageBackendKind::Pollinations;
        assert_eq!(
            config.effective_image_backend(),
            ImageBackendKind::Pollinations
        );
    }

    #[test]
    fn test_blank_env_value_is_unset() {
        std::env::set_var("SOUL_API_TEST_BLANK_SETTING", "   ");
        assert_eq!(optional_env("SOUL_API_TEST_BLANK_SETTING"), None);
        assert_eq!(
            theme_setting(optional_env("SOUL_API_TEST_BLANK_SETTING")).unwrap(),
            Theme::Basilisk
        );
    }

    #[test]
    fn test_theme_setting_parses_or_rejects() {
        assert_eq!(theme_setting(None).unwrap(), Theme::Basilisk);
        assert_eq!(
            theme_setting(Some("ethereal".to_string())).unwrap(),
            Theme::Ethereal
        );
        assert!(theme_setting(Some("neon".to_string())).is_err());
    }
}
