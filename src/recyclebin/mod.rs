//! Windows Recycle Bin binary format parsing.
//!
//! This module contains types and functions for reading the metadata files
//! the Recycle Bin writes when an item is deleted: `$I` index files (Vista
//! and later, two layouts) and `INFO2` databases (Windows XP and earlier).
//!
//! Start with [`artifact::Artifact::decode`] to decode a buffer of either
//! family, or use [`dollar_i::DeletedItemRecord`] and [`info2::Info2Database`]
//! directly when the family is already known.

pub mod artifact;
pub mod bytes;
pub mod companion;
pub mod constants;
pub mod dollar_i;
pub mod filetime;
pub mod info2;
