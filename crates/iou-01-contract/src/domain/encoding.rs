//! Canonical byte encoding used to derive transaction ids.
//!
//! Every variable-length field is length-prefixed and every integer is
//! big-endian, so two distinct transactions never share an encoding.

use shared_types::Party;

pub(crate) struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    pub(crate) fn new(domain: &str) -> Self {
        let mut writer = Self { buf: Vec::new() };
        writer.put_str(domain);
        writer
    }

    pub(crate) fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn put_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn put_len(&mut self, len: usize) {
        self.buf.extend_from_slice(&(len as u64).to_be_bytes());
    }

    pub(crate) fn put_bytes(&mut self, bytes: &[u8]) {
        self.put_len(bytes.len());
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn put_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn put_str(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }

    pub(crate) fn put_party(&mut self, party: &Party) {
        self.put_str(&party.name);
        self.put_fixed(&party.owning_key);
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_prefix_disambiguates() {
        let mut a = CanonicalWriter::new("t");
        a.put_str("ab");
        a.put_str("c");

        let mut b = CanonicalWriter::new("t");
        b.put_str("a");
        b.put_str("bc");

        assert_ne!(a.finish(), b.finish());
    }
}
