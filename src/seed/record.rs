//! miniSEED 2.x fixed header and blockette parsing.

use crate::constants::seed::{
    BLOCKETTE_1000, BLOCKETTE_1001, FIXED_HEADER_LEN, MAX_RECORD_EXPONENT, MIN_RECORD_EXPONENT,
    TIME_CORRECTION_APPLIED,
};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

/// Byte order of a multi-byte field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

impl ByteOrder {
    pub(crate) fn u16(self, bytes: &[u8], at: usize) -> u16 {
        let raw = [bytes[at], bytes[at + 1]];
        match self {
            Self::Big => u16::from_be_bytes(raw),
            Self::Little => u16::from_le_bytes(raw),
        }
    }

    pub(crate) fn i16(self, bytes: &[u8], at: usize) -> i16 {
        let raw = [bytes[at], bytes[at + 1]];
        match self {
            Self::Big => i16::from_be_bytes(raw),
            Self::Little => i16::from_le_bytes(raw),
        }
    }

    pub(crate) fn i32(self, bytes: &[u8], at: usize) -> i32 {
        let raw = [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
        match self {
            Self::Big => i32::from_be_bytes(raw),
            Self::Little => i32::from_le_bytes(raw),
        }
    }

    pub(crate) fn u32(self, bytes: &[u8], at: usize) -> u32 {
        let raw = [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
        match self {
            Self::Big => u32::from_be_bytes(raw),
            Self::Little => u32::from_le_bytes(raw),
        }
    }
}

/// Decoded fixed header plus the blockette fields needed to read the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordHeader {
    /// Network code.
    pub network: String,
    /// Station code.
    pub station: String,
    /// Location code.
    pub location: String,
    /// Channel code.
    pub channel: String,
    /// Time of the first sample, with corrections applied.
    pub start: DateTime<Utc>,
    /// Number of samples in the record.
    pub sample_count: usize,
    /// Samples per second; zero for records without a time series.
    pub sample_rate: f64,
    /// Payload encoding code from blockette 1000.
    pub encoding: u8,
    /// Byte order of the payload.
    pub data_order: ByteOrder,
    /// Total record length in bytes.
    pub record_len: usize,
    /// Offset of the payload from the start of the record.
    pub data_offset: usize,
}

/// Parse the header of the record at the start of `bytes`.
pub fn parse_header(bytes: &[u8]) -> Result<RecordHeader, String> {
    if bytes.len() < FIXED_HEADER_LEN {
        return Err(format!(
            "record shorter than the {FIXED_HEADER_LEN}-byte fixed header"
        ));
    }

    let order = detect_header_order(bytes)?;

    let start = parse_btime(bytes, order)?;
    let sample_count = usize::from(order.u16(bytes, 30));
    let sample_rate = sample_rate(order.i16(bytes, 32), order.i16(bytes, 34));
    let activity_flags = bytes[36];
    let blockette_count = usize::from(bytes[39]);
    let time_correction = order.i32(bytes, 40);
    let data_offset = usize::from(order.u16(bytes, 44));
    let first_blockette = usize::from(order.u16(bytes, 46));

    let mut b1000: Option<(u8, ByteOrder, usize)> = None;
    let mut microseconds = 0_i64;

    let mut offset = first_blockette;
    let mut visited = 0;
    while offset != 0 && visited < blockette_count.max(1) {
        if offset < FIXED_HEADER_LEN || offset + 8 > bytes.len() {
            return Err(format!("blockette offset {offset} outside record"));
        }
        let kind = order.u16(bytes, offset);
        let next = usize::from(order.u16(bytes, offset + 2));

        match kind {
            BLOCKETTE_1000 => {
                let encoding = bytes[offset + 4];
                let data_order = if bytes[offset + 5] == 0 {
                    ByteOrder::Little
                } else {
                    ByteOrder::Big
                };
                let exponent = bytes[offset + 6];
                if !(MIN_RECORD_EXPONENT..=MAX_RECORD_EXPONENT).contains(&exponent) {
                    return Err(format!("record length exponent {exponent} out of range"));
                }
                b1000 = Some((encoding, data_order, 1_usize << exponent));
            }
            BLOCKETTE_1001 => {
                microseconds = i64::from(bytes[offset + 5].cast_signed());
            }
            _ => {}
        }

        if next != 0 && next <= offset {
            return Err(format!("blockette chain loops back at offset {next}"));
        }
        offset = next;
        visited += 1;
    }

    let (encoding, data_order, record_len) =
        b1000.ok_or_else(|| "missing blockette 1000".to_string())?;

    if sample_count > 0 && (data_offset < FIXED_HEADER_LEN || data_offset >= record_len) {
        return Err(format!(
            "data offset {data_offset} outside record of {record_len} bytes"
        ));
    }

    let mut correction_us = microseconds;
    if activity_flags & TIME_CORRECTION_APPLIED == 0 {
        correction_us += i64::from(time_correction) * 100;
    }

    Ok(RecordHeader {
        network: field(bytes, 18..20),
        station: field(bytes, 8..13),
        location: field(bytes, 13..15),
        channel: field(bytes, 15..18),
        start: start + TimeDelta::microseconds(correction_us),
        sample_count,
        sample_rate,
        encoding,
        data_order,
        record_len,
        data_offset,
    })
}

/// Pick the header byte order from the plausibility of the start year and day.
fn detect_header_order(bytes: &[u8]) -> Result<ByteOrder, String> {
    let plausible = |order: ByteOrder| {
        let year = order.u16(bytes, 20);
        let day = order.u16(bytes, 22);
        (1900..=2100).contains(&year) && (1..=366).contains(&day)
    };

    if plausible(ByteOrder::Big) {
        Ok(ByteOrder::Big)
    } else if plausible(ByteOrder::Little) {
        Ok(ByteOrder::Little)
    } else {
        Err("start time is not a plausible BTIME in either byte order".to_string())
    }
}

fn parse_btime(bytes: &[u8], order: ByteOrder) -> Result<DateTime<Utc>, String> {
    let year = i32::from(order.u16(bytes, 20));
    let day = u32::from(order.u16(bytes, 22));
    let hour = u32::from(bytes[24]);
    let minute = u32::from(bytes[25]);
    let second = i64::from(bytes[26]);
    let fract = i64::from(order.u16(bytes, 28));

    // Seconds are added as a delta so a leap second (60) rolls into the next minute.
    let naive = NaiveDate::from_yo_opt(year, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| format!("invalid start time {year}.{day:03} {hour:02}:{minute:02}"))?;

    Ok(naive.and_utc() + TimeDelta::seconds(second) + TimeDelta::microseconds(fract * 100))
}

/// Nominal sample rate from the factor and multiplier fields.
pub fn sample_rate(factor: i16, multiplier: i16) -> f64 {
    let f = f64::from(factor);
    let m = f64::from(multiplier);
    match (factor.signum(), multiplier.signum()) {
        (0, _) | (_, 0) => 0.0,
        (1, 1) => f * m,
        (1, _) => -f / m,
        (_, 1) => -m / f,
        _ => 1.0 / (f * m),
    }
}

fn field(bytes: &[u8], range: std::ops::Range<usize>) -> String {
    String::from_utf8_lossy(&bytes[range]).trim().to_string()
}
