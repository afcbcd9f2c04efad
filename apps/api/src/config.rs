use anyhow::{anyhow, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the hosted identity service that issues bearer tokens.
    pub identity_url: String,
    pub identity_anon_key: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base used when building public resume-file URLs. Defaults to `s3_endpoint`.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).ok_or_else(|| anyhow!("Required environment variable '{key}' is not set"))
        };

        let s3_endpoint = require("S3_ENDPOINT")?;
        let s3_public_url = lookup("S3_PUBLIC_URL").unwrap_or_else(|| s3_endpoint.clone());

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            identity_url: require("IDENTITY_URL")?,
            identity_anon_key: require("IDENTITY_ANON_KEY")?,
            s3_bucket: require("S3_BUCKET")?,
            s3_public_url: s3_public_url.trim_end_matches('/').to_string(),
            s3_endpoint,
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(extra: &[(&str, &str)]) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://localhost/applytrack"),
            ("IDENTITY_URL", "https://auth.example.com"),
            ("IDENTITY_ANON_KEY", "anon"),
            ("S3_BUCKET", "resumes"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("AWS_ACCESS_KEY_ID", "minio"),
            ("AWS_SECRET_ACCESS_KEY", "minio123"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        vars
    }

    #[test]
    fn test_defaults() {
        let vars = vars(&[]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.s3_public_url, "http://localhost:9000");
    }

    #[test]
    fn test_public_url_override_drops_trailing_slash() {
        let vars = vars(&[("S3_PUBLIC_URL", "https://cdn.example.com/"), ("PORT", "3001")]);
        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(config.s3_public_url, "https://cdn.example.com");
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn test_missing_variable_is_named() {
        let mut vars = vars(&[]);
        vars.remove("IDENTITY_ANON_KEY");
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("IDENTITY_ANON_KEY"));
    }

    #[test]
    fn test_bad_port() {
        let vars = vars(&[("PORT", "http")]);
        assert!(Config::from_lookup(|k| vars.get(k).cloned()).is_err());
    }
}
