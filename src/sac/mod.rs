//! SAC binary codec (little-endian, header version 6).

mod header;

pub use header::{FloatField, IntField, SacHeader, StringField};

use crate::constants::sac::HEADER_LEN;
use std::io::{self, Write};

/// Write a header followed by `data` as little-endian SAC.
pub fn write_sac<W: Write>(writer: &mut W, header: &SacHeader, data: &[f32]) -> io::Result<()> {
    writer.write_all(&header.to_le_bytes())?;
    let mut body = Vec::with_capacity(data.len() * 4);
    for value in data {
        body.extend_from_slice(&value.to_le_bytes());
    }
    writer.write_all(&body)?;
    writer.flush()
}

/// Parse a little-endian SAC file image into its header and samples.
pub fn read_sac(bytes: &[u8]) -> io::Result<(SacHeader, Vec<f32>)> {
    let header = SacHeader::from_le_bytes(bytes).ok_or_else(|| {
        io::Error::new(io::ErrorKind::UnexpectedEof, "SAC header truncated")
    })?;
    let npts = usize::try_from(header.int(IntField::Npts)).unwrap_or(0);
    let body = &bytes[HEADER_LEN..];
    if body.len() < npts * 4 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("SAC body holds {} bytes, npts {npts} needs {}", body.len(), npts * 4),
        ));
    }
    let data = body[..npts * 4]
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok((header, data))
}
