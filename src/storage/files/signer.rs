//! HMAC-signed, expiring download URLs for backends without native presigning

use crate::utils::error::{PipelineError, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;
use tracing::warn;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Signs `{base}/files/{ref}?expires={unix}&signature={hex}` URLs
#[derive(Clone)]
pub struct UrlSigner {
    base_url: Url,
    secret: Vec<u8>,
}

impl UrlSigner {
    pub fn new(base_url: &str, secret: Option<&str>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| PipelineError::config(format!("Invalid public base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PipelineError::config(format!(
                "Public base URL cannot carry paths: {}",
                base_url
            )));
        }

        let secret = match secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                warn!("No signing secret configured, download URLs are valid for this process only");
                uuid::Uuid::new_v4().as_bytes().to_vec()
            }
        };

        Ok(Self { base_url, secret })
    }

    /// URL for `file_ref` that expires after `ttl`
    pub fn sign(&self, file_ref: &str, ttl: Duration) -> Result<String> {
        let ttl = i64::try_from(ttl.as_secs())
            .map_err(|_| PipelineError::validation("URL lifetime is too long"))?;
        let expires = Utc::now().timestamp().saturating_add(ttl);
        let signature = self.signature(file_ref, expires)?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PipelineError::internal("Base URL cannot carry paths"))?
            .pop_if_empty()
            .push("files")
            .push(file_ref);
        url.query_pairs_mut()
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", &signature);

        Ok(url.to_string())
    }

    /// Check a signature produced by [`UrlSigner::sign`] at unix time `now`
    pub fn verify(&self, file_ref: &str, expires: i64, signature: &str, now: i64) -> bool {
        if now > expires {
            return false;
        }
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return false;
        };
        mac.update(Self::message(file_ref, expires).as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    fn signature(&self, file_ref: &str, expires: i64) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| PipelineError::internal(format!("Invalid signing key: {}", e)))?;
        mac.update(Self::message(file_ref, expires).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn message(file_ref: &str, expires: i64) -> String {
        format!("{}:{}", file_ref, expires)
    }
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
