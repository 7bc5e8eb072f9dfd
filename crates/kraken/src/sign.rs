//! Kraken `API-Sign` computation for private endpoints.
//!
//! The exchange mandates this exact sequence and rejects any deviation with
//! a bare "invalid signature":
//! `base64(HMAC-SHA512(key = base64decode(secret), msg = path || SHA-256(nonce || body)))`

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256, Sha512};

use common::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Sign one private API call.
///
/// `body` must be the exact URL-encoded byte sequence that will be
/// transmitted, and `nonce` its decimal-string encoding as it appears in
/// that body. Pure and deterministic; the only failure is a secret key that
/// is not valid base64.
pub fn sign(
    api_path: &str,
    body: &str,
    nonce: &str,
    secret_key_b64: &SecretString,
) -> Result<String> {
    let key = B64
        .decode(secret_key_b64.expose_secret())
        .map_err(|e| Error::Encoding(format!("secret key is not valid base64: {e}")))?;

    let mut inner = Sha256::new();
    inner.update(nonce.as_bytes());
    inner.update(body.as_bytes());
    let digest = inner.finalize();

    let mut mac = HmacSha512::new_from_slice(&key).expect("HMAC accepts any key length");
    mac.update(api_path.as_bytes());
    mac.update(&digest);

    Ok(B64.encode(mac.finalize().into_bytes()))
}
