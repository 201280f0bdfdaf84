impl super::Tree {
    /// Serialise the entries in their current order. No framing header is added.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for entry in &self.entries {
            data.extend_from_slice(format!("{:o}", entry.mode).as_bytes());
            data.push(b' ');
            data.extend_from_slice(entry.path.as_bytes());
            data.push(b'\0');
            data.extend_from_slice(&*entry.digest);
        }
        data
    }
}
