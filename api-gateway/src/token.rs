use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum TokenError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone)]
pub(crate) struct TokenConfig {
    pub(crate) signing_key: String,
    pub(crate) access_ttl_secs: i64,
    pub(crate) refresh_ttl_secs: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) role: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct TokenPair {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

/// Issues an access/refresh pair for one subject. Pure function of its
/// arguments; nothing is retained between calls, so concurrent requests
/// can never observe each other's claims.
pub(crate) fn issue_pair(
    cfg: &TokenConfig,
    subject: &str,
    role: &str,
    now: DateTime<Utc>,
) -> Result<TokenPair, TokenError> {
    let access_token = sign(cfg, subject, role, now, cfg.access_ttl_secs)?;
    let refresh_token = sign(cfg, subject, role, now, cfg.refresh_ttl_secs)?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

pub(crate) fn decode_claims(cfg: &TokenConfig, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 10;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.signing_key.as_bytes()),
        &validation,
    )
    .map_err(TokenError::Decode)?;

    Ok(token_data.claims)
}

fn sign(
    cfg: &TokenConfig,
    subject: &str,
    role: &str,
    now: DateTime<Utc>,
    ttl_secs: i64,
) -> Result<String, TokenError> {
    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.signing_key.as_bytes()),
    )
    .map_err(TokenError::Encode)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{TokenConfig, decode_claims, issue_pair};

    fn test_config() -> TokenConfig {
        TokenConfig {
            signing_key: "0123456789abcdef0123456789abcdef".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 86400,
        }
    }

    #[test]
    fn pair_carries_subject_role_and_expiries() {
        let cfg = test_config();
        let now = Utc::now();

        let pair = issue_pair(&cfg, "user-42", "user", now).expect("pair must be issued");

        let access = decode_claims(&cfg, &pair.access_token).expect("access must decode");
        let refresh = decode_claims(&cfg, &pair.refresh_token).expect("refresh must decode");

        assert_eq!(access.sub, "user-42");
        assert_eq!(access.role, "user");
        assert_eq!(access.iat, now.timestamp());
        assert_eq!(access.exp, now.timestamp() + 3600);
        assert_eq!(refresh.sub, "user-42");
        assert_eq!(refresh.exp, now.timestamp() + 86400);
    }

    #[tokio::test]
    async fn concurrent_issuance_keeps_claims_separate() {
        let cfg = test_config();
        let now = Utc::now();

        let mut handles = Vec::new();
        for i in 0..16 {
            let cfg = cfg.clone();
            handles.push(tokio::spawn(async move {
                let subject = format!("subject-{i}");
                let pair = issue_pair(&cfg, &subject, "user", now).expect("pair must be issued");
                (subject, pair)
            }));
        }

        for handle in handles {
            let (subject, pair) = handle.await.expect("task must finish");
            let access = decode_claims(&cfg, &pair.access_token).expect("access must decode");
            let refresh = decode_claims(&cfg, &pair.refresh_token).expect("refresh must decode");
            assert_eq!(access.sub, subject);
            assert_eq!(refresh.sub, subject);
        }
    }

    #[test]
    fn decode_rejects_a_foreign_key() {
        let cfg = test_config();
        let other = TokenConfig {
            signing_key: "ffffffffffffffffffffffffffffffff".to_string(),
            ..cfg.clone()
        };

        let pair = issue_pair(&other, "user-42", "user", Utc::now()).expect("pair must be issued");
        assert!(decode_claims(&cfg, &pair.access_token).is_err());
    }
}
