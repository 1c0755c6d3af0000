//! Chunked stream copy through a caller-owned buffer.

use std::io::{self, Read, Write};

/// Size of the streaming buffer used for every entry copy.
pub const BUFFER_SIZE: usize = 8 * 1024;

/// Copies `reader` into `writer` through `buffer`, returning the byte count.
///
/// The buffer is reused across calls so one allocation serves a whole
/// operation. Interrupted reads are retried.
pub(crate) fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, buffer: &mut [u8]) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total = 0u64;
    loop {
        let length = match reader.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..length])?;
        total += length as u64;
    }
    Ok(total)
}
