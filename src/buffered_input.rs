//! Reading whole documents from files and readers.
//!
//! Input is passed through `encoding_rs_io`, which sniffs a byte order mark and
//! transcodes UTF-16 input to UTF-8 on the fly (UTF-8 input, with or without a
//! BOM, passes through with the BOM removed). Reading is chunked so that a
//! configured size limit is enforced before an oversized input is buffered.

use encoding_rs_io::DecodeReaderBytesBuilder;
use std::io::{self, Read};

const CHUNK: usize = 8 * 1024;

/// Read all of `reader` as UTF-8, failing once more than `max_bytes` decoded
/// bytes have been produced.
pub(crate) fn read_to_end_with_limit<R: Read>(reader: R, max_bytes: Option<usize>) -> io::Result<Vec<u8>> {
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(None)
        .strip_bom(true)
        .build(reader);

    let mut out = Vec::new();
    let mut tmp = vec![0u8; CHUNK];
    loop {
        let n = match decoder.read(&mut tmp) {
            Ok(0) => return Ok(out),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if let Some(limit) = max_bytes {
            if out.len().saturating_add(n) > limit {
                return Err(io::Error::new(
                    io::ErrorKind::FileTooLarge,
                    format!("input size limit of {limit} bytes exceeded"),
                ));
            }
        }
        out.extend_from_slice(&tmp[..n]);
    }
}
