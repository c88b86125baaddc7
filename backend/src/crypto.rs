//! Transparent column encryption.
//!
//! Sensitive columns are stored as `v1:<nonce>:<ciphertext>` text produced by
//! [`FieldCipher`]; rows are decrypted in one place on their way into domain
//! values, never piecemeal in business logic.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_SIZE: usize = 12;
const VERSION: &str = "v1";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid encrypted field format")]
    Format,
    #[error("unsupported encryption version: {0}")]
    Version(String),
    #[error("invalid encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("field encryption failed")]
    Encrypt,
    #[error("field decryption failed")]
    Decrypt,
    #[error("decrypted value is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("decrypted value failed to parse: {0}")]
    Parse(String),
}

/// AES-256-GCM cipher for sensitive columns, keyed by the process-wide
/// `DB_SECRET`. The nonce is derived from key and plaintext, so equal
/// plaintexts yield equal ciphertexts; unique indexes and equality filters
/// over encrypted columns keep working.
#[derive(Clone)]
pub struct FieldCipher {
    key: [u8; 32],
}

impl FieldCipher {
    pub fn new(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        let digest = hasher.finalize();

        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);

        let nonce_bytes = self.derive_nonce(plaintext.as_bytes());
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::Encrypt)?;

        Ok(format!(
            "{}:{}:{}",
            VERSION,
            BASE64.encode(nonce_bytes),
            BASE64.encode(ciphertext)
        ))
    }

    pub fn decrypt(&self, blob: &str) -> Result<String, CryptoError> {
        let parts: Vec<&str> = blob.split(':').collect();
        if parts.len() != 3 {
            return Err(CryptoError::Format);
        }
        if parts[0] != VERSION {
            return Err(CryptoError::Version(parts[0].to_string()));
        }

        let nonce_bytes = BASE64.decode(parts[1])?;
        if nonce_bytes.len() != NONCE_SIZE {
            return Err(CryptoError::Format);
        }
        let ciphertext = BASE64.decode(parts[2])?;

        let key = Key::<Aes256Gcm>::from_slice(&self.key);
        let cipher = Aes256Gcm::new(key);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let plaintext = cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|_| CryptoError::Decrypt)?;

        Ok(String::from_utf8(plaintext)?)
    }

    pub fn encrypt_opt(&self, plaintext: Option<&str>) -> Result<Option<String>, CryptoError> {
        plaintext.map(|value| self.encrypt(value)).transpose()
    }

    pub fn decrypt_opt(&self, blob: Option<&str>) -> Result<Option<String>, CryptoError> {
        blob.map(|value| self.decrypt(value)).transpose()
    }

    pub fn encrypt_date(&self, date: NaiveDate) -> Result<String, CryptoError> {
        self.encrypt(&date.format(DATE_FORMAT).to_string())
    }

    pub fn decrypt_date(&self, blob: &str) -> Result<NaiveDate, CryptoError> {
        let value = self.decrypt(blob)?;
        NaiveDate::parse_from_str(&value, DATE_FORMAT)
            .map_err(|e| CryptoError::Parse(e.to_string()))
    }

    pub fn encrypt_time(&self, time: NaiveTime) -> Result<String, CryptoError> {
        self.encrypt(&time.format(TIME_FORMAT).to_string())
    }

    pub fn decrypt_time(&self, blob: &str) -> Result<NaiveTime, CryptoError> {
        let value = self.decrypt(blob)?;
        NaiveTime::parse_from_str(&value, TIME_FORMAT)
            .map_err(|e| CryptoError::Parse(e.to_string()))
    }

    pub fn encrypt_datetime(&self, stamp: DateTime<Utc>) -> Result<String, CryptoError> {
        self.encrypt(&stamp.to_rfc3339())
    }

    pub fn decrypt_datetime(&self, blob: &str) -> Result<DateTime<Utc>, CryptoError> {
        let value = self.decrypt(blob)?;
        DateTime::parse_from_rfc3339(&value)
            .map(|stamp| stamp.with_timezone(&Utc))
            .map_err(|e| CryptoError::Parse(e.to_string()))
    }

    fn derive_nonce(&self, plaintext: &[u8]) -> [u8; NONCE_SIZE] {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(plaintext);
        let digest = hasher.finalize();

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&digest[..NONCE_SIZE]);
        nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cipher() -> FieldCipher {
        FieldCipher::new("unit-test-secret")
    }

    #[test]
    fn round_trips_plaintext() {
        let cipher = cipher();
        let encrypted = cipher.encrypt("wonderwoman@example.com").unwrap();

        assert!(encrypted.starts_with("v1:"));
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "wonderwoman@example.com");
    }

    #[test]
    fn equal_plaintexts_encrypt_identically() {
        let cipher = cipher();
        let a = cipher.encrypt("ww").unwrap();
        let b = cipher.encrypt("ww").unwrap();
        let c = cipher.encrypt("ww2").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let cipher = cipher();
        let encrypted = cipher.encrypt("secret").unwrap();

        let mut parts: Vec<String> = encrypted.split(':').map(String::from).collect();
        parts[2] = BASE64.encode(b"garbage-ciphertext");
        let tampered = parts.join(":");

        assert!(matches!(cipher.decrypt(&tampered), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn rejects_wrong_key() {
        let encrypted = cipher().encrypt("secret").unwrap();
        let other = FieldCipher::new("a-different-secret");

        assert!(matches!(other.decrypt(&encrypted), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn rejects_malformed_blobs() {
        let cipher = cipher();

        assert!(matches!(cipher.decrypt("not-encrypted"), Err(CryptoError::Format)));
        assert!(matches!(
            cipher.decrypt("v2:AAAA:AAAA"),
            Err(CryptoError::Version(_))
        ));
    }

    #[test]
    fn round_trips_dates_times_and_stamps() {
        let cipher = cipher();

        let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        assert_eq!(
            cipher.decrypt_date(&cipher.encrypt_date(date).unwrap()).unwrap(),
            date
        );

        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(
            cipher.decrypt_time(&cipher.encrypt_time(time).unwrap()).unwrap(),
            time
        );

        let stamp = Utc.with_ymd_and_hms(2025, 3, 30, 9, 30, 0).unwrap();
        assert_eq!(
            cipher
                .decrypt_datetime(&cipher.encrypt_datetime(stamp).unwrap())
                .unwrap(),
            stamp
        );
    }
}
