use anyhow::{Context, Result, anyhow};

use crate::token::TokenConfig;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) http_addr: String,
    pub(crate) user_service_endpoint: String,
    pub(crate) post_service_endpoint: String,
    pub(crate) comment_service_endpoint: String,
    pub(crate) rpc_timeout_secs: u64,
    pub(crate) token: TokenConfig,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let signing_key = get_required("SIGNING_KEY").context("SIGNING_KEY is required")?;
        if signing_key.chars().count() < 32 {
            return Err(anyhow!("SIGNING_KEY must be at least 32 characters"));
        }

        let access_token_ttl_secs = parse_i64_env("ACCESS_TOKEN_TTL_SECS", 6 * 60 * 60)?;
        let refresh_token_ttl_secs = parse_i64_env("REFRESH_TOKEN_TTL_SECS", 30 * 24 * 60 * 60)?;

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let user_service_endpoint = std::env::var("USER_SERVICE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:1111".to_string());
        let post_service_endpoint = std::env::var("POST_SERVICE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:2222".to_string());
        let comment_service_endpoint = std::env::var("COMMENT_SERVICE_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:3333".to_string());

        let rpc_timeout_secs = parse_u64_env("RPC_TIMEOUT_SECS", 7)?;

        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;

        Ok(Self {
            http_addr,
            user_service_endpoint,
            post_service_endpoint,
            comment_service_endpoint,
            rpc_timeout_secs,
            token: TokenConfig {
                signing_key,
                access_ttl_secs: access_token_ttl_secs,
                refresh_ttl_secs: refresh_token_ttl_secs,
            },
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_i64_env(key: &str, default: i64) -> Result<i64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<i64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value <= 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
