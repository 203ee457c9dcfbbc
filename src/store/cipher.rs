/// XOR stream codec for at-rest obfuscation of saved data.
///
/// Each byte of the input is XORed with the corresponding byte of the
/// shared secret, the secret repeating cyclically. Applying the same
/// transform twice restores the input, so encode and decode share one
/// core.
///
/// This is obfuscation, NOT encryption: deterministic, keystream
/// reuse on every blob, no integrity check. It keeps saved files
/// opaque to a casual `cat`; a real deployment would need an
/// authenticated encryption primitive instead.
///
/// An empty secret would make the cyclic index ill-defined, so
/// construction rejects it up front.

use anyhow::{bail, Result};
use std::string::FromUtf8Error;

#[derive(Clone)]
pub struct XorCipher {
    secret: Vec<u8>,
}

impl XorCipher {
    /// Build a codec from the shared secret. Fails on an empty
    /// secret, which is a configuration error caught at startup.
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            bail!("cipher secret must not be empty");
        }
        Ok(XorCipher { secret: secret.as_bytes().to_vec() })
    }

    /// Obfuscate a plaintext string into its wire form.
    pub fn encode(&self, plaintext: &str) -> Vec<u8> {
        self.apply(plaintext.as_bytes())
    }

    /// Recover the plaintext from the wire form. Errors when the
    /// result is not valid UTF-8, which is how a wrongly-keyed or
    /// corrupted blob surfaces.
    pub fn decode(&self, data: &[u8]) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.apply(data))
    }

    fn apply(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.secret.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> XorCipher {
        XorCipher::new("s3cr3t").unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(XorCipher::new("").is_err());
    }

    #[test]
    fn round_trip_restores_input() {
        let c = cipher();
        for input in ["", "a", "hello world", r#"{"p1":{"level":3}}"#, "piñata 現在"] {
            let wire = c.encode(input);
            assert_eq!(c.decode(&wire).unwrap(), input);
        }
    }

    #[test]
    fn encode_is_deterministic() {
        let c = cipher();
        assert_eq!(c.encode("same input"), c.encode("same input"));
    }

    #[test]
    fn wire_form_differs_from_plaintext() {
        let c = cipher();
        assert_ne!(c.encode("plaintext"), b"plaintext".to_vec());
    }

    #[test]
    fn secret_repeats_cyclically() {
        let c = XorCipher::new("ab").unwrap();
        let wire = c.encode("xxxx");
        assert_eq!(wire[0], wire[2]);
        assert_eq!(wire[1], wire[3]);
        assert_ne!(wire[0], wire[1]);
    }

    #[test]
    fn wrong_secret_fails_to_decode_or_garbles() {
        let wire = cipher().encode(r#"{"k":"v"}"#);
        let other = XorCipher::new("different").unwrap();
        match other.decode(&wire) {
            Ok(text) => assert_ne!(text, r#"{"k":"v"}"#),
            Err(_) => {} // invalid UTF-8 is the usual outcome
        }
    }
}
