//! SAC v6 header words.

use crate::constants::sac::{
    FLOAT_WORDS, HEADER_LEN, INT_WORDS, STRING_BYTES, UNDEF_FLOAT, UNDEF_INT, UNDEF_STR,
};

/// Float header words used by this crate, by word index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum FloatField {
    /// Sample interval in seconds.
    Delta = 0,
    /// Minimum sample value.
    Depmin = 1,
    /// Maximum sample value.
    Depmax = 2,
    /// Begin time relative to reference.
    B = 5,
    /// End time relative to reference.
    E = 6,
    /// Event origin time relative to reference.
    O = 7,
    /// Station latitude.
    Stla = 31,
    /// Station longitude.
    Stlo = 32,
    /// Station elevation in metres.
    Stel = 33,
    /// Station depth in metres.
    Stdp = 34,
    /// Event latitude.
    Evla = 35,
    /// Event longitude.
    Evlo = 36,
    /// Event depth in kilometres.
    Evdp = 38,
    /// Event magnitude.
    Mag = 39,
    /// Mean sample value.
    Depmen = 56,
    /// Component azimuth.
    Cmpaz = 57,
    /// Component inclination.
    Cmpinc = 58,
}

/// Integer and logical header words, by word index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum IntField {
    /// Reference year.
    Nzyear = 0,
    /// Reference day of year.
    Nzjday = 1,
    /// Reference hour.
    Nzhour = 2,
    /// Reference minute.
    Nzmin = 3,
    /// Reference second.
    Nzsec = 4,
    /// Reference millisecond.
    Nzmsec = 5,
    /// Header version.
    Nvhdr = 6,
    /// Number of samples.
    Npts = 9,
    /// File type.
    Iftype = 15,
    /// Dependent variable type.
    Idep = 16,
    /// Reference time type.
    Iztype = 17,
    /// Evenly spaced samples flag.
    Leven = 35,
}

/// Character header fields as `(byte offset, width)` in the string section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringField {
    /// Station name.
    Kstnm,
    /// Event name.
    Kevnm,
    /// Location code.
    Khole,
    /// Component name.
    Kcmpnm,
    /// Network name.
    Knetwk,
}

impl StringField {
    const fn span(self) -> (usize, usize) {
        match self {
            Self::Kstnm => (0, 8),
            Self::Kevnm => (8, 16),
            Self::Khole => (24, 8),
            Self::Kcmpnm => (160, 8),
            Self::Knetwk => (168, 8),
        }
    }
}

/// The fixed 632-byte SAC header.
#[derive(Debug, Clone, PartialEq)]
pub struct SacHeader {
    floats: [f32; FLOAT_WORDS],
    ints: [i32; INT_WORDS],
    strings: [u8; STRING_BYTES],
}

impl Default for SacHeader {
    /// A header with every word undefined.
    fn default() -> Self {
        let mut strings = [b' '; STRING_BYTES];
        // Every 8-byte slot, and the first half of kevnm, starts with the marker.
        for chunk in strings.chunks_exact_mut(8) {
            chunk[..UNDEF_STR.len()].copy_from_slice(UNDEF_STR.as_bytes());
        }
        let (kevnm_offset, _) = StringField::Kevnm.span();
        strings[kevnm_offset + 8..kevnm_offset + 16].fill(b' ');

        Self {
            floats: [UNDEF_FLOAT; FLOAT_WORDS],
            ints: [UNDEF_INT; INT_WORDS],
            strings,
        }
    }
}

impl SacHeader {
    /// Read a float word.
    pub const fn float(&self, field: FloatField) -> f32 {
        self.floats[field as usize]
    }

    /// Set a float word.
    pub const fn set_float(&mut self, field: FloatField, value: f32) {
        self.floats[field as usize] = value;
    }

    /// Read an integer word.
    pub const fn int(&self, field: IntField) -> i32 {
        self.ints[field as usize]
    }

    /// Set an integer word.
    pub const fn set_int(&mut self, field: IntField, value: i32) {
        self.ints[field as usize] = value;
    }

    /// Read a character field with trailing padding removed.
    pub fn string(&self, field: StringField) -> String {
        let (offset, width) = field.span();
        String::from_utf8_lossy(&self.strings[offset..offset + width])
            .trim_end()
            .to_string()
    }

    /// Set a character field, truncating to its width and padding with spaces.
    pub fn set_string(&mut self, field: StringField, value: &str) {
        let (offset, width) = field.span();
        let slot = &mut self.strings[offset..offset + width];
        slot.fill(b' ');
        let bytes = value.as_bytes();
        let len = bytes.len().min(width);
        slot[..len].copy_from_slice(&bytes[..len]);
    }

    /// Serialise as little-endian bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        for value in &self.floats {
            out.extend_from_slice(&value.to_le_bytes());
        }
        for value in &self.ints {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&self.strings);
        out
    }

    /// Parse a little-endian header.
    pub fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_LEN {
            return None;
        }
        let word = |i: usize| [bytes[i * 4], bytes[i * 4 + 1], bytes[i * 4 + 2], bytes[i * 4 + 3]];

        let mut header = Self::default();
        for (i, slot) in header.floats.iter_mut().enumerate() {
            *slot = f32::from_le_bytes(word(i));
        }
        for (i, slot) in header.ints.iter_mut().enumerate() {
            *slot = i32::from_le_bytes(word(FLOAT_WORDS + i));
        }
        header
            .strings
            .copy_from_slice(&bytes[HEADER_LEN - STRING_BYTES..HEADER_LEN]);
        Some(header)
    }
}
