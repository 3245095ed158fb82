//! Raw buffer I/O.
//!
//! A single `read` on a stream may return fewer bytes than asked for, and
//! returns 0 only at end of stream. [`read_exact`] loops until the buffer is
//! full and reports how far it got when the stream runs dry.

use std::io::{ErrorKind, Read, Write};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::errors::{CodecError, Result};

/// Largest step the read buffer grows by.
///
/// Lengths come from untrusted prefixes, so memory is committed only as
/// content arrives.
pub const READ_CHUNK: usize = 64 * 1024;

/// Read exactly `length` bytes.
///
/// A zero length returns an empty buffer without touching the source. Short
/// reads are retried; end of stream before `length` bytes fails with
/// [`CodecError::IncompleteRead`] carrying the true count. Bytes consumed
/// before a failure are not given back.
pub fn read_exact<R: Read + ?Sized>(source: &mut R, length: usize) -> Result<Bytes> {
    if length == 0 {
        return Ok(Bytes::new());
    }

    let mut buffer = Vec::new();
    let mut offset = 0;
    while offset < length {
        if offset == buffer.len() {
            buffer.resize(offset + (length - offset).min(READ_CHUNK), 0);
        }
        match source.read(&mut buffer[offset..]) {
            Ok(0) => {
                debug!(read = offset, requested = length, "stream ended mid-read");
                return Err(CodecError::IncompleteRead { read: offset, requested: length });
            },
            Ok(read) => {
                offset += read;
                if offset < length {
                    trace!(read, total = offset, requested = length, "short read");
                }
            },
            Err(err) if err.kind() == ErrorKind::Interrupted => {},
            Err(err) => return Err(err.into()),
        }
    }
    Ok(Bytes::from(buffer))
}

/// Convert a signed length prefix, rejecting negatives.
pub fn checked_length(length: i64) -> Result<usize> {
    if length < 0 {
        return Err(CodecError::InvalidArgument(format!("length cannot be negative: {length}")));
    }
    usize::try_from(length)
        .map_err(|_| CodecError::InvalidArgument(format!("length {length} exceeds address space")))
}

/// Write the buffer verbatim. An empty buffer issues no write.
pub fn write_exact<W: Write + ?Sized>(sink: &mut W, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Ok(());
    }
    sink.write_all(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;

    /// Returns `Interrupted` once before every successful read.
    struct Flaky<'a> {
        data: &'a [u8],
        interrupt_next: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt_next = !self.interrupt_next;
            if self.interrupt_next {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let n = buf.len().min(self.data.len()).min(2);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn reads_requested_length_only() {
        let mut source = Cursor::new(vec![1, 2, 3, 4, 5]);
        assert_eq!(read_exact(&mut source, 3).unwrap().as_ref(), [1, 2, 3]);
        assert_eq!(source.position(), 3);
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let mut source = Flaky { data: &[1, 2, 3, 4, 5], interrupt_next: false };
        assert_eq!(read_exact(&mut source, 5).unwrap().as_ref(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn other_errors_surface() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("boom"))
            }
        }
        assert!(matches!(read_exact(&mut Broken, 1), Err(CodecError::Io(_))));
    }

    #[test]
    fn huge_length_over_short_source_reports_true_count() {
        let mut source = Cursor::new(vec![0x78u8]);
        let err = read_exact(&mut source, i32::MAX as usize).unwrap_err();
        assert!(matches!(
            err,
            CodecError::IncompleteRead { read: 1, requested } if requested == i32::MAX as usize
        ));
    }

    #[test]
    fn reads_spanning_several_chunks() {
        let data: Vec<u8> = (0..READ_CHUNK * 2 + 3).map(|i| i as u8).collect();
        let mut source = Cursor::new(data.clone());
        assert_eq!(read_exact(&mut source, data.len()).unwrap().as_ref(), data.as_slice());

        let mut source = Cursor::new(data[..READ_CHUNK + 1].to_vec());
        let err = read_exact(&mut source, READ_CHUNK * 3).unwrap_err();
        assert!(matches!(err, CodecError::IncompleteRead { read, .. } if read == READ_CHUNK + 1));
    }

    #[test]
    fn negative_length_is_invalid() {
        assert!(matches!(checked_length(-1), Err(CodecError::InvalidArgument(_))));
        assert_eq!(checked_length(7).unwrap(), 7);
    }

    #[test]
    fn empty_write_is_noop() {
        let mut sink = Vec::new();
        write_exact(&mut sink, &[]).unwrap();
        assert!(sink.is_empty());
        write_exact(&mut sink, &[9, 8]).unwrap();
        assert_eq!(sink, [9, 8]);
    }
}
