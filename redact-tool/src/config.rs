use std::path::PathBuf;

#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// Base URL of the redaction service handling authentication.
    pub server_url: String,
    /// Image to annotate; the built-in demo board is used when absent.
    pub image: Option<PathBuf>,
    /// File the bearer token is persisted to between sessions.
    pub token_path: PathBuf,
    pub viewport: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            image: None,
            token_path: ".redact-token".into(),
            viewport: [1024.0, 768.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"server_url":"http://10.0.0.1:9000"}"#).unwrap();
        assert_eq!(config.server_url, "http://10.0.0.1:9000");
        assert_eq!(config.token_path, PathBuf::from(".redact-token"));
        assert_eq!(config.viewport, [1024.0, 768.0]);
        assert!(config.image.is_none());
    }
}
