//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "seistrim";

/// Default event window length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 6000;

/// Longest allowed event window. Keeps every window inside at most two civil days.
pub const MAX_DURATION_SECS: u32 = 86_400;

/// Default civil-day offset in hours used to pick day folders (UTC+8).
pub const DEFAULT_CIVIL_OFFSET_HOURS: i32 = 8;

/// Valid civil-day offsets in hours.
pub const CIVIL_OFFSET_RANGE: std::ops::RangeInclusive<i32> = -12..=14;

/// Default archive file extension.
pub const DEFAULT_ARCHIVE_SUFFIX: &str = "mseed";

/// Lock file extension.
pub const LOCK_FILE_EXTENSION: &str = ".seistrim.lock";

/// Time a freshly created lock may stay without readable holder information.
pub const LOCK_WRITE_GRACE: std::time::Duration = std::time::Duration::from_secs(5);

/// Furthest a read segment may reach beyond either end of the event window.
pub const MAX_SEGMENT_DRIFT_SECS: i64 = 86_400;

/// Name of the missed-station log in the output root.
pub const MISSED_STATION_LOG: &str = "missed_station.info";

/// Day folder name format.
pub const DAY_FOLDER_FORMAT: &str = "%Y%m%d";

/// Event sub-folder name format.
pub const EVENT_FOLDER_FORMAT: &str = "%Y%m%d%H%M%S";

/// Output filename tokens.
pub mod output_name {
    /// Millisecond placeholder.
    pub const MILLISECOND: &str = "0000";
    /// Location code placeholder.
    pub const LOCATION: &str = "00";
    /// Data quality marker.
    pub const QUALITY: &str = "M";
    /// Format suffix.
    pub const SUFFIX: &str = "SAC";
}

/// miniSEED record layout.
pub mod seed {
    /// Length of the fixed section of the data header.
    pub const FIXED_HEADER_LEN: usize = 48;
    /// Blockette type carrying encoding, word order and record length.
    pub const BLOCKETTE_1000: u16 = 1000;
    /// Blockette type carrying microsecond time offset.
    pub const BLOCKETTE_1001: u16 = 1001;
    /// Smallest record length exponent accepted (256 bytes).
    pub const MIN_RECORD_EXPONENT: u8 = 8;
    /// Largest record length exponent accepted (1 MiB).
    pub const MAX_RECORD_EXPONENT: u8 = 20;
    /// Length of one Steim frame.
    pub const STEIM_FRAME_LEN: usize = 64;
    /// Activity flag bit: time correction already applied.
    pub const TIME_CORRECTION_APPLIED: u8 = 0x02;

    /// Data encoding codes from blockette 1000.
    pub mod encoding {
        /// ASCII text, carries no samples.
        pub const ASCII: u8 = 0;
        /// 16-bit integers.
        pub const INT16: u8 = 1;
        /// 32-bit integers.
        pub const INT32: u8 = 3;
        /// IEEE 32-bit floats.
        pub const FLOAT32: u8 = 4;
        /// IEEE 64-bit floats.
        pub const FLOAT64: u8 = 5;
        /// Steim-1 compression.
        pub const STEIM1: u8 = 10;
        /// Steim-2 compression.
        pub const STEIM2: u8 = 11;
    }
}

/// SAC header layout and enumerated values.
pub mod sac {
    /// Number of float header words.
    pub const FLOAT_WORDS: usize = 70;
    /// Number of integer header words.
    pub const INT_WORDS: usize = 40;
    /// Size of the string header section in bytes.
    pub const STRING_BYTES: usize = 192;
    /// Total header size in bytes.
    pub const HEADER_LEN: usize = FLOAT_WORDS * 4 + INT_WORDS * 4 + STRING_BYTES;
    /// Undefined float value.
    pub const UNDEF_FLOAT: f32 = -12345.0;
    /// Undefined integer value.
    pub const UNDEF_INT: i32 = -12345;
    /// Undefined string value.
    pub const UNDEF_STR: &str = "-12345";
    /// Header version.
    pub const NVHDR: i32 = 6;
    /// File type: time series.
    pub const ITIME: i32 = 1;
    /// Dependent variable type: unknown.
    pub const IUNKN: i32 = 5;
    /// Reference time is the event origin.
    pub const IO: i32 = 11;
}
