//! Ready-made conversion functions for resource-backed sources.
//!
//! Each function turns a reader into a lazy cursor of records, suitable as
//! the `convert` argument of [`PartitionSource::from_resource`]. None of
//! them close the reader.
//!
//! - [`delimited`] - records separated by a delimiter byte
//! - [`fixed_width`] - records of a fixed byte length
//! - [`lines`] - UTF-8 text lines
//!
//! [`PartitionSource::from_resource`]: crate::PartitionSource::from_resource

use std::io::{self, BufRead, Read};

use bytes::Bytes;

/// Splits `reader` into records terminated by `delimiter`.
///
/// The delimiter is stripped. A trailing record without a delimiter is
/// still yielded; an empty input yields nothing.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use partitionrs::decode;
///
/// let records: Vec<_> = decode::delimited(Cursor::new(b"a,bc,".to_vec()), b',')
///     .collect::<Result<_, _>>()?;
/// assert_eq!(records, vec![&b"a"[..], &b"bc"[..]]);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn delimited<R: BufRead>(reader: R, delimiter: u8) -> Delimited<R> {
    Delimited {
        reader,
        delimiter,
        finished: false,
    }
}

/// Iterator returned by [`delimited`].
#[derive(Debug)]
pub struct Delimited<R> {
    reader: R,
    delimiter: u8,
    finished: bool,
}

impl<R: BufRead> Iterator for Delimited<R> {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut record = Vec::new();
        match self.reader.read_until(self.delimiter, &mut record) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                if record.last() == Some(&self.delimiter) {
                    record.pop();
                }
                Some(Ok(Bytes::from(record)))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Splits `reader` into records of `width` bytes.
///
/// The last record is shorter if the input length is not a multiple of
/// `width`. Fails with [`io::ErrorKind::InvalidInput`] if `width` is zero.
pub fn fixed_width<R: Read>(reader: R, width: usize) -> io::Result<FixedWidth<R>> {
    if width == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "record width must be non-zero",
        ));
    }

    Ok(FixedWidth {
        reader,
        width,
        finished: false,
    })
}

/// Iterator returned by [`fixed_width`].
#[derive(Debug)]
pub struct FixedWidth<R> {
    reader: R,
    width: usize,
    finished: bool,
}

impl<R: Read> Iterator for FixedWidth<R> {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut record = vec![0u8; self.width];
        let mut filled = 0;
        while filled < self.width {
            match self.reader.read(&mut record[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        if filled < self.width {
            self.finished = true;
            if filled == 0 {
                return None;
            }
            record.truncate(filled);
        }
        Some(Ok(Bytes::from(record)))
    }
}

/// Splits `reader` into UTF-8 lines, without their line endings.
pub fn lines<R: BufRead>(reader: R) -> io::Lines<R> {
    reader.lines()
}
