use bstr::{BString, ByteSlice};
use memchr::memchr;

use crate::error::{ObjectError, ObjectResult};

use super::Kvlm;

impl Kvlm {
    /// Parse header lines up to the first blank line; everything after it is the message.
    ///
    /// The blank line is mandatory, even when the message is empty.
    pub fn parse(bytes: &[u8]) -> ObjectResult<Self> {
        let mut headers: Vec<(BString, BString)> = Vec::new();
        let mut rest = bytes;

        let message = loop {
            match rest.first() {
                None => {
                    return Err(ObjectError::MalformedHeaderLine(
                        "no blank line before the message".to_owned(),
                    ))
                }
                Some(b'\n') => break BString::from(&rest[1..]),
                _ => {}
            }

            let line_end = memchr(b'\n', rest).unwrap_or(rest.len());
            let line = &rest[..line_end];
            rest = rest.get(line_end + 1..).unwrap_or_default();

            if let Some(continuation) = line.strip_prefix(b" ") {
                let (_, value) = headers
                    .last_mut()
                    .ok_or_else(|| malformed(line))?;
                value.push(b'\n');
                value.extend_from_slice(continuation);
                continue;
            }

            let space = memchr(b' ', line).ok_or_else(|| malformed(line))?;
            headers.push((line[..space].into(), line[space + 1..].into()));
        };

        Ok(Self { headers, message })
    }
}

fn malformed(line: &[u8]) -> ObjectError {
    ObjectError::MalformedHeaderLine(line.to_str_lossy().into_owned())
}
