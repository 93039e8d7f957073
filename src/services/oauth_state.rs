// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed OAuth `state` parameter.
//!
//! The state is stateless on the server side: a random nonce and its issue
//! time, signed with HMAC-SHA256 and base64url encoded as
//! `nonce|issued_at_hex|signature_hex`. The callback recomputes the MAC and
//! rejects anything unsigned, tampered with, or stale.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// How long a consent round-trip may take before the state expires.
pub const STATE_MAX_AGE_MS: u128 = 10 * 60 * 1000;

/// Tolerated clock drift for states issued "in the future".
const CLOCK_SKEW_MS: u128 = 60 * 1000;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> Result<u128> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis())
}

/// Sign `nonce` issued at `issued_at_ms` into an opaque state value.
pub fn sign_state(nonce: &str, issued_at_ms: u128, key: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", nonce, issued_at_ms);

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Check the signature and age of a state value produced by [`sign_state`].
pub fn verify_state(state: &str, key: &[u8], now_ms: u128) -> bool {
    decode_and_verify(state, key, now_ms).is_some()
}

fn decode_and_verify(state: &str, key: &[u8], now_ms: u128) -> Option<()> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }
    let (nonce, issued_hex, signature_hex) = (parts[0], parts[1], parts[2]);

    let signature = hex::decode(signature_hex).ok()?;
    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(format!("{}|{}", nonce, issued_hex).as_bytes());
    if mac.verify_slice(&signature).is_err() {
        tracing::warn!("OAuth state signature mismatch");
        return None;
    }

    let issued_at = u128::from_str_radix(issued_hex, 16).ok()?;
    if issued_at > now_ms + CLOCK_SKEW_MS || now_ms.saturating_sub(issued_at) > STATE_MAX_AGE_MS {
        tracing::warn!(issued_at = %issued_at, "OAuth state expired");
        return None;
    }

    Some(())
}
