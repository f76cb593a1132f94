use thiserror::Error;

use crate::resource::tgi::FourCc;

/// Errors produced while decoding or encoding a resource.
///
/// Decoders stop at the first malformed field. There is no partial recovery.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("bad tag: expected {expected}, found {found}")]
    BadTag { expected: FourCc, found: FourCc },

    #[error("unsupported {format} version 0x{version:X}")]
    UnsupportedVersion { format: &'static str, version: u32 },

    #[error("bad count for {what}: {count} (limit {limit})")]
    BadCount {
        what: &'static str,
        count: i64,
        limit: u64,
    },

    #[error("truncated buffer at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedBuffer {
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("{what} has {count} entries, more than its count field can hold ({max})")]
    CountOverflow {
        what: &'static str,
        count: usize,
        max: u64,
    },

    #[error("invalid value for {what}: {value:#X}")]
    InvalidValue { what: &'static str, value: u64 },

    #[error("error reading data: {0}")]
    Binrw(#[from] binrw::Error),
}

impl FormatError {
    pub(crate) fn truncated(offset: u64, needed: u64, available: u64) -> Self {
        Self::TruncatedBuffer {
            offset,
            needed,
            available,
        }
    }

    pub(crate) fn invalid(what: &'static str, value: impl Into<u64>) -> Self {
        Self::InvalidValue {
            what,
            value: value.into(),
        }
    }
}
