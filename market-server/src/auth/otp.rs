//! One-time passwords for activation and password reset
//!
//! Codes are six digits. Only their sha256 hash is stored.

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use sha2::{Digest, Sha256};

pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Delivers an OTP to the phone owner
#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, phone_number: &str, code: &str);
}

/// Writes the code to the log instead of sending an SMS
#[derive(Debug, Default)]
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, phone_number: &str, code: &str) {
        tracing::info!(phone = %phone_number, otp = %code, "OTP issued");
    }
}

/// Per-phone resend cooldown for `send-otp`
#[derive(Debug, Default)]
pub struct OtpThrottle {
    cooldown_ms: i64,
    last_sent: DashMap<String, i64>,
}

impl OtpThrottle {
    pub fn new(cooldown_seconds: i64) -> Self {
        Self {
            cooldown_ms: cooldown_seconds.max(0) * 1000,
            last_sent: DashMap::new(),
        }
    }

    /// Record a send at `now` unless the phone is still cooling down.
    /// Returns the remaining wait in seconds when refused.
    pub fn try_acquire(&self, phone_number: &str, now: i64) -> Result<(), i64> {
        if self.cooldown_ms == 0 {
            return Ok(());
        }
        let mut entry = self.last_sent.entry(phone_number.to_string()).or_insert(i64::MIN);
        let elapsed = now.saturating_sub(*entry);
        if elapsed < self.cooldown_ms {
            let remaining_ms = self.cooldown_ms - elapsed;
            return Err((remaining_ms + 999) / 1000);
        }
        *entry = now;
        Ok(())
    }
}
