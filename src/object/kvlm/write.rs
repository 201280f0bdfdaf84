impl super::Kvlm {
    /// Serialise headers in order, a blank line, then the message verbatim.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, value) in &self.headers {
            out.extend_from_slice(key);
            out.push(b' ');
            for &b in value.iter() {
                out.push(b);
                if b == b'\n' {
                    out.push(b' ');
                }
            }
            out.push(b'\n');
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }
}
