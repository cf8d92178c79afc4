/// Recycle Bin artifact layout constants.
///
/// Offsets follow the libyal dtformats notes on the Windows Recycle.Bin
/// (`$I`) and Recycler (`INFO2`) file formats. All integers are little-endian.
// Leading-byte discriminators
pub const DISCRIMINATOR_DOLLAR_I_PRE_WIN10: u8 = 1;
pub const DISCRIMINATOR_DOLLAR_I_WIN10: u8 = 2;
pub const DISCRIMINATOR_INFO2: u8 = 5;

// $I header (24 bytes, shared by both formats)
pub const DOLLAR_I_HEADER_SIZE: usize = 24;
pub const DOLLAR_I_FORMAT: usize = 0; // 8 bytes - format version (1 or 2)
pub const DOLLAR_I_FILE_SIZE: usize = 8; // 8 bytes - size of the deleted item
pub const DOLLAR_I_DELETED_ON: usize = 16; // 8 bytes - FILETIME of deletion

// $I format 1 (Vista through 8.1): UTF-16LE path fills the rest of the file
pub const DOLLAR_I_V1_NAME: usize = 24;

// $I format 2 (Windows 10+): length-prefixed UTF-16LE path
pub const DOLLAR_I_V2_NAME_LENGTH: usize = 24; // 4 bytes - path length in UTF-16 units
pub const DOLLAR_I_V2_NAME: usize = 28;

// $I / $R file name prefixes
pub const DOLLAR_I_PREFIX: &str = "$I";
pub const DOLLAR_I_DIRECTORY_PREFIX: &str = "$IR";
pub const DOLLAR_R_DIRECTORY_PREFIX: &str = "$RR";

// INFO2 header (20 bytes)
pub const INFO2_FILE_NAME: &str = "INFO2";
pub const INFO2_HEADER_SIZE: usize = 20;
pub const INFO2_VERSION: usize = 0; // 4 bytes - format version (5 on XP)
pub const INFO2_UNKNOWN1: usize = 4; // 4 bytes
pub const INFO2_UNKNOWN2: usize = 8; // 4 bytes
pub const INFO2_FILE_ENTRY_SIZE: usize = 12; // 4 bytes - record stride, 800 in practice
pub const INFO2_UNKNOWN3: usize = 16; // 4 bytes

// INFO2 file record (800 bytes)
pub const INFO2_RECORD_SIZE: usize = 800;
pub const INFO2_REC_ASCII_NAME: usize = 0; // 260 bytes - ANSI name, null-terminated
pub const INFO2_REC_ASCII_NAME_LEN: usize = 260;
pub const INFO2_REC_INDEX: usize = 260; // 4 bytes - deletion index (Dc<n>)
pub const INFO2_REC_DRIVE: usize = 264; // 4 bytes - drive number (0 = A:)
pub const INFO2_REC_DELETED_ON: usize = 268; // 8 bytes - FILETIME of deletion
pub const INFO2_REC_FILE_SIZE: usize = 276; // 4 bytes - size of the deleted file
pub const INFO2_REC_UNICODE_NAME: usize = 280; // 520 bytes - UTF-16LE name, null-terminated
pub const INFO2_REC_UNICODE_NAME_UNITS: usize = 260;

// Windows FILETIME
pub const FILETIME_TICKS_PER_SECOND: i64 = 10_000_000;
pub const FILETIME_NANOS_PER_TICK: i64 = 100;
/// Seconds between 1601-01-01 and 1970-01-01.
pub const FILETIME_UNIX_EPOCH_SECONDS: i64 = 11_644_473_600;
