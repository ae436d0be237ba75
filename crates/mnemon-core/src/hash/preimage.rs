use sha2::{Digest, Sha256};

/// Renders a JSON object preimage with caller-controlled key order.
/// String values are escaped through serde_json so the preimage is
/// always valid JSON.
pub(super) struct Preimage {
    buf: String,
    first: bool,
}

impl Preimage {
    pub fn new() -> Self {
        Self {
            buf: String::from("{"),
            first: true,
        }
    }

    pub fn string_field(&mut self, name: &str, value: &str) {
        // Encoding a &str cannot fail.
        let encoded = serde_json::to_string(value).unwrap_or_default();
        self.raw_field(name, &encoded);
    }

    pub fn raw_field(&mut self, name: &str, encoded: &str) {
        if !self.first {
            self.buf.push(',');
        }
        self.first = false;
        self.buf.push('"');
        self.buf.push_str(name);
        self.buf.push_str("\":");
        self.buf.push_str(encoded);
    }

    /// Close the object and return the lowercase hex SHA-256 digest of
    /// the UTF-8 preimage bytes.
    pub fn digest(mut self) -> String {
        self.buf.push('}');
        format!("{:x}", Sha256::digest(self.buf.as_bytes()))
    }

    #[cfg(test)]
    pub fn render(mut self) -> String {
        self.buf.push('}');
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preimage_preserves_field_order() {
        let mut p = Preimage::new();
        p.string_field("b", "2");
        p.string_field("a", "1");
        assert_eq!(p.render(), r#"{"b":"2","a":"1"}"#);
    }

    #[test]
    fn test_preimage_escapes_strings() {
        let mut p = Preimage::new();
        p.string_field("text", "line\nbreak \"quoted\"");
        assert_eq!(p.render(), r#"{"text":"line\nbreak \"quoted\""}"#);
    }

    #[test]
    fn test_digest_is_lowercase_hex() {
        let digest = Preimage::new().digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
