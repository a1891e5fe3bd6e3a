//! Build-time settings for the client.
//!
//! Everything here is resolved at compile time so the wasm bundle carries no
//! runtime configuration file. Override the API origin or the log level by
//! setting `MONEYWISE_API_URL` or `MONEYWISE_LOG` when building.

use tracing::level_filters::LevelFilter;

const DEFAULT_ORIGIN: &str = "https://moneywise-api-backend.onrender.com";

/// The API root, e.g. `https://moneywise-api-backend.onrender.com/api`.
pub fn api_base_url() -> String {
    match option_env!("MONEYWISE_API_URL") {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => format!("{}/api", DEFAULT_ORIGIN),
    }
}

/// The server origin without the `/api` suffix. Uploaded files are served from here.
pub fn origin() -> String {
    let base = api_base_url();
    match base.strip_suffix("/api") {
        Some(origin) => origin.to_string(),
        None => base,
    }
}

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// How many transactions the dashboard shows.
pub const RECENT_TRANSACTION_LIMIT: u32 = 5;

/// Delay before leaving the forgot-password screen after a successful request.
pub const FORGOT_PASSWORD_REDIRECT_MS: i32 = 2000;

pub const CURRENCY_SUFFIX: &str = "Fca";

pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

/// The URL of a profile picture, or the default avatar when the user has none.
pub fn profile_image_url(profile_image: Option<&str>) -> String {
    match profile_image {
        Some(file) if !file.is_empty() => format!("{}/storage/profiles/{}", origin(), file),
        _ => DEFAULT_AVATAR.to_string(),
    }
}

pub fn log_level() -> LevelFilter {
    option_env!("MONEYWISE_LOG")
        .map(parse_log_level)
        .unwrap_or(LevelFilter::INFO)
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::{parse_log_level, profile_image_url, DEFAULT_AVATAR};

    #[test]
    fn profile_image_falls_back_to_default_avatar() {
        assert_eq!(profile_image_url(None), DEFAULT_AVATAR);
        assert_eq!(profile_image_url(Some("")), DEFAULT_AVATAR);
    }

    #[test]
    fn profile_image_is_served_from_storage() {
        let url = profile_image_url(Some("me.png"));

        assert!(url.ends_with("/storage/profiles/me.png"), "got {url}");
        assert!(!url.contains("/api/"), "got {url}");
    }

    #[test]
    fn log_level_parsing_is_case_insensitive() {
        assert_eq!(parse_log_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_log_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_log_level("verbose"), LevelFilter::INFO);
    }
}
