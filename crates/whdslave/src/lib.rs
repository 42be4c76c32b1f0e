//! A parser for the binary header of WHDLoad .slave files using [`binrw`].
//!
//! A slave is the per-title control file WHDLoad uses to launch installed
//! software. Its header starts 32 bytes into the file and grew over the
//! years: which fields exist depends on the header version, so everything
//! past the always-present base fields decodes to an `Option`.

pub mod flags;
pub mod hash;
pub mod header;
pub mod kickstart;
pub mod strings;

pub use binrw;

use crate::{
    flags::SlaveFlag,
    hash::Sha1Hash,
    header::{HEADER_OFFSET, Header},
    kickstart::Kickstart,
};
use binrw::BinRead;
use chrono::{DateTime, Local};
use easyerr::{Error, ResultExt};
use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

#[derive(Debug, Error)]
pub enum SlaveError {
    #[error(transparent)]
    Io { source: std::io::Error },
    /// The header could not be decoded: bad magic or truncated fields.
    #[error(transparent)]
    Header { source: binrw::Error },
    #[error("file is only {len} bytes long, too short to contain a slave header")]
    TooShort { len: u64 },
    #[error("kickstart list runs past the end of the file at offset {offset:#x}")]
    KickstartOverrun { offset: usize },
}

/// A decoded .slave file.
///
/// Built once by [`Slave::from_path`] or [`Slave::from_bytes`] and immutable
/// afterwards. Header fields gated behind a version threshold are `None` for
/// files of older versions, never zero defaults.
#[derive(Debug, Clone)]
pub struct Slave {
    pub path: PathBuf,
    pub file_name: String,
    /// Last modification time. `None` for buffer backed slaves.
    pub modified: Option<DateTime<Local>>,
    /// Size of the whole file in bytes.
    pub size: u64,
    /// Size of the file minus the header preamble.
    pub data_length: u64,
    /// SHA1 of the whole file, preamble included.
    pub hash: Sha1Hash,
    pub header: Header,
    pub current_dir: String,
    pub dont_cache: String,
    pub name: Option<String>,
    pub copyright: Option<String>,
    /// Info text with empty lines dropped.
    pub info: Option<String>,
    /// Configuration directives, split on `;`.
    pub config: Option<Vec<String>>,
    /// Flags set in the header bitmask, in canonical order.
    pub flags: Vec<SlaveFlag>,
    /// Kickstarts the slave supports.
    pub kickstarts: Vec<Kickstart>,
}

impl Slave {
    /// Reads and decodes the slave at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SlaveError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).context(SlaveCtx::Io)?;
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::from);

        Self::build(path.to_path_buf(), modified, &bytes)
    }

    /// Decodes a slave from an already loaded buffer holding the whole file,
    /// preamble included. `path` only identifies the slave; nothing is read
    /// from the filesystem.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, SlaveError> {
        Self::build(path.into(), None, bytes)
    }

    fn build(
        path: PathBuf,
        modified: Option<DateTime<Local>>,
        bytes: &[u8],
    ) -> Result<Self, SlaveError> {
        let size = bytes.len() as u64;
        let data_length = size
            .checked_sub(HEADER_OFFSET as u64)
            .ok_or(SlaveError::TooShort { len: size })?;

        // string offsets are relative to the header, so resolve them against
        // the data past the preamble
        let data = &bytes[HEADER_OFFSET..];
        let header = Header::read(&mut Cursor::new(data)).context(SlaveCtx::Header)?;

        let read = |offset| strings::read_string(data, offset);

        let (name, copyright, info) = match header.title_offsets {
            Some(offsets) => (
                Some(read(offsets.name)),
                Some(read(offsets.copyright)),
                Some(join_info_lines(&read(offsets.info))),
            ),
            None => (None, None, None),
        };

        let kickstarts = match header.kickstart {
            Some(kick) => kickstart::parse_kickstarts(data, kick.name_offset, kick.crc)?,
            None => Vec::new(),
        };

        let config = header
            .config_offset
            .map(|offset| split_config(&read(offset)));

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file_name,
            modified,
            size,
            data_length,
            hash: Sha1Hash::of(bytes),
            current_dir: read(header.current_dir_offset),
            dont_cache: read(header.dont_cache_offset),
            name,
            copyright,
            info,
            config,
            flags: flags::decode_flags(header.flags),
            kickstarts,
            header,
            path,
        })
    }

    /// Whether the slave requires the AGA chipset.
    pub fn requires_aga(&self) -> bool {
        self.flags.contains(&SlaveFlag::ReqAGA)
    }

    /// Whether the slave requires a 68020 or better CPU.
    pub fn requires_68020(&self) -> bool {
        self.flags.contains(&SlaveFlag::Req68020)
    }

    /// Whether any configuration directive patches in CD32 controls, i.e.
    /// carries `cd32` in its third `:` separated field. Directives with fewer
    /// fields are skipped.
    pub fn has_cd32_controls_patch(&self) -> bool {
        let Some(config) = &self.config else {
            return false;
        };

        config.iter().any(|directive| {
            directive
                .split(':')
                .nth(2)
                .is_some_and(|field| field.to_ascii_lowercase().contains("cd32"))
        })
    }

    /// Whether both slaves carry the same name. A missing name on either
    /// side compares unequal.
    pub fn same_name(&self, other: &Slave) -> bool {
        match (&self.name, &other.name) {
            (Some(this), Some(other)) => this == other,
            _ => false,
        }
    }

    /// Whether both slaves were read from a file of the same name.
    pub fn same_file_name(&self, other: &Slave) -> bool {
        self.file_name == other.file_name
    }

    /// Whether both slaves agree on name and file name.
    pub fn matches(&self, other: &Slave) -> bool {
        self.same_name(other) && self.same_file_name(other)
    }
}

/// Joins the non-empty lines of the info string.
fn join_info_lines(info: &str) -> String {
    info.split('\n')
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits the configuration string into its `;` separated directives. An
/// unset configuration yields no directives at all.
fn split_config(config: &str) -> Vec<String> {
    if config.is_empty() {
        return Vec::new();
    }

    config.split(';').map(str::to_owned).collect()
}

#[cfg(test)]
mod test {
    use super::{join_info_lines, split_config};

    #[test]
    fn info_lines_lose_empty_lines() {
        assert_eq!(
            join_info_lines("Installed by Codetapper\n\nVersion 1.2\n"),
            "Installed by Codetapper\nVersion 1.2"
        );
    }

    #[test]
    fn empty_config_has_no_directives() {
        assert!(split_config("").is_empty());
    }

    #[test]
    fn config_splits_on_semicolons() {
        assert_eq!(
            split_config("C1:X:Y;C2:CustomReq"),
            vec!["C1:X:Y".to_owned(), "C2:CustomReq".to_owned()]
        );
    }
}
