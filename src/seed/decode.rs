//! Sample payload decoders.

use super::record::ByteOrder;
use crate::constants::seed::{STEIM_FRAME_LEN, encoding};
use tracing::debug;

/// Decode `count` samples from a record payload.
pub fn decode_samples(
    payload: &[u8],
    encoding_code: u8,
    order: ByteOrder,
    count: usize,
) -> Result<Vec<f32>, String> {
    match encoding_code {
        encoding::INT16 => fixed_width(payload, 2, count, |b| f32::from(order.i16(b, 0))),
        encoding::INT32 => fixed_width(payload, 4, count, |b| int_sample(order.i32(b, 0))),
        encoding::FLOAT32 => fixed_width(payload, 4, count, |b| f32::from_bits(order.u32(b, 0))),
        encoding::FLOAT64 => fixed_width(payload, 8, count, |b| {
            let raw = [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]];
            narrow(match order {
                ByteOrder::Big => f64::from_be_bytes(raw),
                ByteOrder::Little => f64::from_le_bytes(raw),
            })
        }),
        encoding::STEIM1 => steim(payload, order, count, Steim::One),
        encoding::STEIM2 => steim(payload, order, count, Steim::Two),
        other => Err(format!("unsupported data encoding {other}")),
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn narrow(value: f64) -> f32 {
    value as f32
}

#[allow(clippy::cast_precision_loss)]
const fn int_sample(value: i32) -> f32 {
    value as f32
}

fn fixed_width(
    payload: &[u8],
    width: usize,
    count: usize,
    convert: impl Fn(&[u8]) -> f32,
) -> Result<Vec<f32>, String> {
    let needed = width * count;
    if payload.len() < needed {
        return Err(format!(
            "payload holds {} bytes, {count} samples need {needed}",
            payload.len()
        ));
    }
    Ok(payload[..needed].chunks_exact(width).map(convert).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Steim {
    One,
    Two,
}

/// Decode Steim-1 or Steim-2 compressed frames.
///
/// Word 0 of every frame holds sixteen 2-bit nibbles describing words 0..16. In the
/// first frame word 1 is the forward integration constant (first sample) and word 2
/// the reverse integration constant (last sample).
fn steim(payload: &[u8], order: ByteOrder, count: usize, variant: Steim) -> Result<Vec<f32>, String> {
    let mut diffs: Vec<i32> = Vec::with_capacity(count + 8);
    let mut first = None;
    let mut last = None;

    for (frame_idx, frame) in payload.chunks_exact(STEIM_FRAME_LEN).enumerate() {
        if diffs.len() >= count {
            break;
        }
        let control = order.u32(frame, 0);

        for word_idx in 1..16 {
            let nibble = (control >> (30 - 2 * word_idx)) & 0b11;
            let word = order.u32(frame, word_idx * 4);

            if frame_idx == 0 && word_idx == 1 {
                first = Some(word.cast_signed());
                continue;
            }
            if frame_idx == 0 && word_idx == 2 {
                last = Some(word.cast_signed());
                continue;
            }

            match (variant, nibble) {
                (_, 0b00) => {}
                (_, 0b01) => unpack(word, 8, 4, &mut diffs),
                (Steim::One, 0b10) => unpack(word, 16, 2, &mut diffs),
                (Steim::One, _) => diffs.push(word.cast_signed()),
                (Steim::Two, 0b10) => match word >> 30 {
                    0b01 => unpack(word, 30, 1, &mut diffs),
                    0b10 => unpack(word, 15, 2, &mut diffs),
                    0b11 => unpack(word, 10, 3, &mut diffs),
                    dnib => return Err(format!("invalid Steim-2 sub-code {dnib} for code 10")),
                },
                (Steim::Two, _) => match word >> 30 {
                    0b00 => unpack(word, 6, 5, &mut diffs),
                    0b01 => unpack(word, 5, 6, &mut diffs),
                    0b10 => unpack(word, 4, 7, &mut diffs),
                    dnib => return Err(format!("invalid Steim-2 sub-code {dnib} for code 11")),
                },
            }
        }
    }

    if count == 0 {
        return Ok(Vec::new());
    }

    let first = first.ok_or_else(|| "Steim payload has no complete frame".to_string())?;
    if diffs.len() < count {
        return Err(format!(
            "Steim payload holds {} differences, {count} samples expected",
            diffs.len()
        ));
    }

    let mut samples = Vec::with_capacity(count);
    let mut current = first;
    samples.push(current);
    for diff in &diffs[1..count] {
        current = current.wrapping_add(*diff);
        samples.push(current);
    }

    if let Some(last) = last
        && current != last
    {
        debug!("Steim reverse integration constant {last} differs from last sample {current}");
    }

    Ok(samples.into_iter().map(int_sample).collect())
}

/// Push `count` sign-extended `bits`-wide values packed right-aligned into `word`,
/// most significant first.
fn unpack(word: u32, bits: u32, count: u32, out: &mut Vec<i32>) {
    let shift_base = 32 - bits;
    for i in 0..count {
        let shift = bits * (count - 1 - i);
        // Move the field to the top of the word, then arithmetic-shift it back down.
        let value = (word << (shift_base - shift)).cast_signed() >> shift_base;
        out.push(value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn frame(words: [u32; 16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_be_bytes()).collect()
    }

    #[test]
    fn test_int16_and_int32() {
        let payload: Vec<u8> = [1_i16, -2, 300]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let samples = decode_samples(&payload, encoding::INT16, ByteOrder::Big, 3).unwrap();
        assert_eq!(samples, vec![1.0, -2.0, 300.0]);

        let payload: Vec<u8> = [7_i32, -70_000]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let samples = decode_samples(&payload, encoding::INT32, ByteOrder::Little, 2).unwrap();
        assert_eq!(samples, vec![7.0, -70_000.0]);
    }

    #[test]
    fn test_floats() {
        let payload: Vec<u8> = [1.5_f32, -0.25].iter().flat_map(|v| v.to_be_bytes()).collect();
        let samples = decode_samples(&payload, encoding::FLOAT32, ByteOrder::Big, 2).unwrap();
        assert_eq!(samples, vec![1.5, -0.25]);

        let payload: Vec<u8> = 2.5_f64.to_be_bytes().to_vec();
        let samples = decode_samples(&payload, encoding::FLOAT64, ByteOrder::Big, 1).unwrap();
        assert_eq!(samples, vec![2.5]);
    }

    #[test]
    fn test_short_payload_is_an_error() {
        let err = decode_samples(&[0, 1, 2], encoding::INT32, ByteOrder::Big, 1).unwrap_err();
        assert!(err.contains("need 4"));
    }

    #[test]
    fn test_unsupported_encoding() {
        let err = decode_samples(&[], 30, ByteOrder::Big, 1).unwrap_err();
        assert!(err.contains("30"));
    }

    #[test]
    fn test_steim1() {
        // Samples 10, 12, 9, 9, 20: differences (0), 2, -3, 0, 11.
        let mut words = [0_u32; 16];
        words[0] = 0x0180_0000; // word 3: code 01, word 4: code 10
        words[1] = 10;
        words[2] = 20;
        words[3] = u32::from_be_bytes([0x00, 0x02, 0xFD, 0x00]);
        words[4] = 0x000B_0000;
        let samples =
            decode_samples(&frame(words), encoding::STEIM1, ByteOrder::Big, 5).unwrap();
        assert_eq!(samples, vec![10.0, 12.0, 9.0, 9.0, 20.0]);
    }

    #[test]
    fn test_steim2() {
        // Samples 100, 101, 99, 130, -370: differences (0), 1, -2, 31, -500.
        let mut words = [0_u32; 16];
        words[0] = 0x0180_0000; // word 3: code 01, word 4: code 10
        words[1] = 100;
        words[2] = (-370_i32).cast_unsigned();
        words[3] = u32::from_be_bytes([0x00, 0x01, 0xFE, 0x1F]);
        words[4] = 0x7FFF_FE0C; // dnib 01, one 30-bit value
        let samples =
            decode_samples(&frame(words), encoding::STEIM2, ByteOrder::Big, 5).unwrap();
        assert_eq!(samples, vec![100.0, 101.0, 99.0, 130.0, -370.0]);
    }

    #[test]
    fn test_steim2_packed_widths() {
        // Code 11 with dnib 10: seven 4-bit differences.
        let mut words = [0_u32; 16];
        words[0] = 0x0300_0000; // word 3: code 11
        words[1] = 0;
        // dnib 10, then 1,1,1,1,1,1,-1 as 4-bit fields.
        words[3] = (0b10 << 30) | 0x0111_111F;
        let samples =
            decode_samples(&frame(words), encoding::STEIM2, ByteOrder::Big, 7).unwrap();
        assert_eq!(samples, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0]);
    }

    #[test]
    fn test_steim_too_few_differences() {
        let mut words = [0_u32; 16];
        words[1] = 5;
        let err = decode_samples(&frame(words), encoding::STEIM1, ByteOrder::Big, 3).unwrap_err();
        assert!(err.contains("3 samples expected"));
    }

    #[test]
    fn test_unpack_sign_extension() {
        let mut out = Vec::new();
        unpack(0x0000_FFFF, 16, 2, &mut out);
        assert_eq!(out, vec![0, -1]);
    }
}
