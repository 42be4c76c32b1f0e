//! The binary header of a .slave file.

use binrw::BinRead;

/// Offset of the slave header within the file. The bytes before it are an
/// Amiga hunk preamble and are skipped, not interpreted.
pub const HEADER_OFFSET: usize = 0x20;

/// Size of the version independent part of the header.
pub const BASE_HEADER_SIZE: usize = 30;

/// Version thresholds at which the optional header field groups appear.
/// Thresholds are cumulative: a header of version `v` carries every group
/// with a threshold `<= v`.
pub mod threshold {
    /// Debug and exit key codes.
    pub const KEYS: u16 = 4;
    /// Expansion memory size.
    pub const EXP_MEM: u16 = 8;
    /// Name, copyright and info strings.
    pub const TITLE: u16 = 10;
    /// Kickstart name, size and CRC.
    pub const KICKSTART: u16 = 16;
    /// Configuration string.
    pub const CONFIG: u16 = 17;
}

#[derive(Debug, Clone, Copy, BinRead)]
#[br(big, magic = b"WHDLOADS")]
pub struct MagicWord;

impl MagicWord {
    /// The magic identifier as text.
    pub const TEXT: &'static str = "WHDLOADS";
}

/// Debug and exit rawkey codes.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct KeyCodes {
    pub debug: u8,
    pub exit: u8,
}

/// Offsets of the name, copyright and info strings.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct TitleOffsets {
    pub name: u16,
    pub copyright: u16,
    pub info: u16,
}

/// Kickstart requirements of a slave.
#[derive(Debug, Clone, Copy, BinRead)]
#[br(big)]
pub struct KickstartInfo {
    /// Offset of the kickstart name string. When `crc` is the list sentinel,
    /// this is instead the offset of a packed (crc, name offset) array.
    pub name_offset: u16,
    /// Size of the kickstart image in bytes.
    pub size: u32,
    /// CRC of the kickstart image, or a sentinel: 0 means no kickstart info,
    /// 0xFFFF marks the multiple kickstart list.
    pub crc: u16,
}

/// The header of a .slave file.
///
/// Fields past the don't-cache offset only exist from a certain header
/// version on and decode to `None` below it.
#[derive(Debug, Clone, BinRead)]
#[br(big)]
pub struct Header {
    /// Security longword, a jump over the header.
    pub security: u32,
    pub magic: MagicWord,
    /// Header version. Decides which of the optional fields below exist.
    pub version: u16,
    /// Capability flags bitmask. See [`crate::flags::decode_flags`].
    pub flags: u16,
    /// Required base (chip) memory size in bytes.
    pub base_mem_size: u32,
    /// Address of the ExecInstall entry point.
    pub exec_install: u32,
    /// GameLoader BCPL segment value.
    pub game_loader: u16,
    /// Offset of the current directory string.
    pub current_dir_offset: u16,
    /// Offset of the don't-cache path string.
    pub dont_cache_offset: u16,
    #[br(if(version >= threshold::KEYS))]
    pub keys: Option<KeyCodes>,
    /// Required expansion (fast) memory size in bytes.
    #[br(if(version >= threshold::EXP_MEM))]
    pub exp_mem: Option<u32>,
    #[br(if(version >= threshold::TITLE))]
    pub title_offsets: Option<TitleOffsets>,
    #[br(if(version >= threshold::KICKSTART))]
    pub kickstart: Option<KickstartInfo>,
    /// Offset of the configuration string.
    #[br(if(version >= threshold::CONFIG))]
    pub config_offset: Option<u16>,
}

impl Header {
    /// The magic identifier of the header. Always `"WHDLOADS"`, since
    /// decoding fails on anything else.
    pub fn id(&self) -> &'static str {
        MagicWord::TEXT
    }
}
