use std::fmt;
use std::str::FromStr;

use binrw::binrw;

use crate::resource::error::FormatError;
use crate::resource::stream::{ResourceReader, ResourceWriter};

/// Type, group and instance of a referenced resource.
#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[br(little)]
#[bw(little)]
pub struct TGI {
    pub res_type: u32,
    pub res_group: u32,
    pub instance: u64,
}

/// The same triple stored instance first.
///
/// Catalog blocks keep [TGI] fields and map through this type, e.g.
/// `#[br(map = ItgTGI::into_tgi)]` and `#[bw(map = ItgTGI::from_tgi)]`.
#[binrw]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[br(little)]
#[bw(little)]
pub struct ItgTGI {
    pub instance: u64,
    pub res_type: u32,
    pub res_group: u32,
}

impl ItgTGI {
    pub fn into_tgi(self) -> TGI {
        self.into()
    }

    pub fn from_tgi(tgi: &TGI) -> Self {
        (*tgi).into()
    }
}

impl From<ItgTGI> for TGI {
    fn from(b: ItgTGI) -> Self {
        Self {
            res_type: b.res_type,
            res_group: b.res_group,
            instance: b.instance,
        }
    }
}

impl From<TGI> for ItgTGI {
    fn from(t: TGI) -> Self {
        Self {
            instance: t.instance,
            res_type: t.res_type,
            res_group: t.res_group,
        }
    }
}

/// Field order of a TGI on the wire. Fixed per format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TgiOrder {
    /// type, group, instance
    Tgi,
    /// instance, type, group
    Itg,
    /// instance with its 32-bit halves swapped, type, group
    SwappedItg,
}

impl TGI {
    pub const SIZE: u64 = 16;

    pub fn new(res_type: u32, res_group: u32, instance: u64) -> Self {
        Self {
            res_type,
            res_group,
            instance,
        }
    }

    pub fn read(reader: &mut ResourceReader<'_>, order: TgiOrder) -> Result<Self, FormatError> {
        match order {
            TgiOrder::Tgi => reader.read::<TGI>(),
            TgiOrder::Itg => reader.read::<ItgTGI>().map(TGI::from),
            TgiOrder::SwappedItg => {
                let mut tgi = TGI::from(reader.read::<ItgTGI>()?);
                tgi.instance = tgi.instance.rotate_left(32);
                Ok(tgi)
            }
        }
    }

    pub fn write(&self, writer: &mut ResourceWriter, order: TgiOrder) -> Result<(), FormatError> {
        match order {
            TgiOrder::Tgi => writer.write(self),
            TgiOrder::Itg => writer.write(&ItgTGI::from(*self)),
            TgiOrder::SwappedItg => {
                let mut itg = ItgTGI::from(*self);
                itg.instance = itg.instance.rotate_left(32);
                writer.write(&itg)
            }
        }
    }
}

impl fmt::Display for TGI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08X}:{:08X}:{:016X}",
            self.res_type, self.res_group, self.instance
        )
    }
}

/// The key of a resource slot in the surrounding package.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub res_type: u32,
    pub res_group: u32,
    pub instance: u64,
}

impl ResourceKey {
    /// Finds the key in an exported file name such as
    /// `S4_319E4F1D_00000000_0000000000012345.bin`.
    ///
    /// The first run of 8, 8 and 16 digit hex groups wins.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.split('.').next().unwrap_or(name);
        let parts: Vec<&str> = stem
            .split(|c: char| c == '_' || c == '!' || c == '-' || c == ':')
            .collect();

        parts.windows(3).find_map(|w| {
            let is_hex = |s: &str, len: usize| {
                let s = s.trim_start_matches("0x");
                s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit())
            };
            if is_hex(w[0], 8) && is_hex(w[1], 8) && is_hex(w[2], 16) {
                Some(Self {
                    res_type: u32::from_str_radix(w[0].trim_start_matches("0x"), 16).ok()?,
                    res_group: u32::from_str_radix(w[1].trim_start_matches("0x"), 16).ok()?,
                    instance: u64::from_str_radix(w[2].trim_start_matches("0x"), 16).ok()?,
                })
            } else {
                None
            }
        })
    }
}

impl FromStr for ResourceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_file_name(s).ok_or_else(|| format!("no resource key in {s:?}"))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&TGI::from(*self), f)
    }
}

impl From<ResourceKey> for TGI {
    fn from(k: ResourceKey) -> Self {
        Self::new(k.res_type, k.res_group, k.instance)
    }
}

impl From<TGI> for ResourceKey {
    fn from(t: TGI) -> Self {
        Self {
            res_type: t.res_type,
            res_group: t.res_group,
            instance: t.instance,
        }
    }
}

/// A four character chunk tag like `GEOM`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    pub const fn new(tag: &[u8; 4]) -> Self {
        Self(*tag)
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self
            .0
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        f.write_str(&text)
    }
}
