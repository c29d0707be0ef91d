//! JSON-lines element stream reader.

use std::io::Read;

use contracts::MkvElement;
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;

use crate::error::CliError;

/// Iterator over `MkvElement`s decoded from a JSON stream
///
/// Stops at the first malformed element; the error is kept and can be
/// retrieved with [`ElementReader::take_error`] once iteration ends.
pub struct ElementReader<R: Read> {
    inner: StreamDeserializer<'static, IoRead<R>, MkvElement>,
    error: Option<CliError>,
    decoded: u64,
}

impl<R: Read> ElementReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: serde_json::Deserializer::from_reader(reader).into_iter(),
            error: None,
            decoded: 0,
        }
    }

    /// Elements decoded so far
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Decode error that ended iteration, if any
    pub fn take_error(&mut self) -> Option<CliError> {
        self.error.take()
    }
}

impl<R: Read> Iterator for ElementReader<R> {
    type Item = MkvElement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }
        match self.inner.next()? {
            Ok(element) => {
                self.decoded += 1;
                Some(element)
            }
            Err(e) => {
                let offset = self.inner.byte_offset();
                self.error = Some(CliError::malformed_element(offset, e.to_string()));
                None
            }
        }
    }
}
