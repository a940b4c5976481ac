//! Volumetric image decoding
//!
//! Only the header is read: that is enough to tell a real NIfTI volume from
//! a corrupt or foreign file without loading voxel data. NIfTI-1 headers go
//! through the `nifti` crate; NIfTI-2 headers are read here.

use anyhow::{anyhow, bail, Context, Result};
use flate2::read::GzDecoder;
use nifti::NiftiHeader;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const NIFTI2_HEADER_SIZE: usize = 540;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Datatype codes shared by NIfTI-1 and NIfTI-2, named as the `nifti` crate names them
const DATATYPES: [(i16, &str); 16] = [
  (2, "Uint8"),
  (4, "Int16"),
  (8, "Int32"),
  (16, "Float32"),
  (32, "Complex64"),
  (64, "Float64"),
  (128, "Rgb24"),
  (256, "Int8"),
  (512, "Uint16"),
  (768, "Uint32"),
  (1024, "Int64"),
  (1280, "Uint64"),
  (1536, "Float128"),
  (1792, "Complex128"),
  (2048, "Complex256"),
  (2304, "Rgba32"),
];

/// What a successful probe learned about a volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeInfo {
  pub dims: Vec<u64>,
  pub datatype: String,
}

impl fmt::Display for VolumeInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let shape: Vec<String> = self.dims.iter().map(u64::to_string).collect();
    write!(f, "{} {}", shape.join("x"), self.datatype)
  }
}

// Seam between validation and the format-aware decoder
#[cfg_attr(test, mockall::automock)]
pub trait ImageProbe {
  fn probe(&self, path: &Path) -> Result<VolumeInfo>;
}

/// NIfTI-1 and NIfTI-2 header reader (`.nii`, `.nii.gz`, `.hdr`)
#[derive(Debug, Clone, Copy, Default)]
pub struct NiftiProbe;

impl ImageProbe for NiftiProbe {
  fn probe(&self, path: &Path) -> Result<VolumeInfo> {
    let head = read_head(path, NIFTI2_HEADER_SIZE)?;
    if let Some(little_endian) = nifti2_byte_order(&head) {
      return nifti2_info(&head, little_endian);
    }

    let header = NiftiHeader::from_file(path).map_err(|e| anyhow!("{e}"))?;

    if &header.magic != b"n+1\0" && &header.magic != b"ni1\0" {
      bail!("not a NIfTI-1 header");
    }

    let rank = header.dim[0] as usize;
    if rank == 0 || rank > 7 {
      bail!("dimension rank {rank} outside 1..=7");
    }
    let datatype = header.data_type().map_err(|e| anyhow!("{e}"))?;

    let dims = header.dim[1..=rank].iter().map(|&d| u64::from(d)).collect();
    Ok(VolumeInfo { dims, datatype: format!("{datatype:?}") })
  }
}

/// Up to `len` leading bytes, decompressed when the file is gzipped
fn read_head(path: &Path, len: usize) -> Result<Vec<u8>> {
  let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
  let mut reader = BufReader::new(file);
  let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

  let mut head = Vec::with_capacity(len);
  if gzipped {
    GzDecoder::new(reader).take(len as u64).read_to_end(&mut head)?;
  } else {
    reader.take(len as u64).read_to_end(&mut head)?;
  }
  Ok(head)
}

/// `Some(little_endian)` when `sizeof_hdr` announces a NIfTI-2 header
fn nifti2_byte_order(head: &[u8]) -> Option<bool> {
  let size: [u8; 4] = head.get(0..4)?.try_into().ok()?;
  if i32::from_le_bytes(size) == NIFTI2_HEADER_SIZE as i32 {
    Some(true)
  } else if i32::from_be_bytes(size) == NIFTI2_HEADER_SIZE as i32 {
    Some(false)
  } else {
    None
  }
}

fn field<const N: usize>(head: &[u8], offset: usize) -> [u8; N] {
  let mut bytes = [0u8; N];
  bytes.copy_from_slice(&head[offset..offset + N]);
  bytes
}

// Layout: sizeof_hdr i32 @0, magic [u8; 8] @4, datatype i16 @12, dim [i64; 8] @16
fn nifti2_info(head: &[u8], little_endian: bool) -> Result<VolumeInfo> {
  if head.len() < NIFTI2_HEADER_SIZE {
    bail!("NIfTI-2 header truncated at {} bytes", head.len());
  }
  let magic = &head[4..8];
  if magic != b"n+2\0" && magic != b"ni2\0" {
    bail!("not a NIfTI-2 header");
  }

  let read_i64 = |offset| {
    let bytes = field::<8>(head, offset);
    if little_endian {
      i64::from_le_bytes(bytes)
    } else {
      i64::from_be_bytes(bytes)
    }
  };
  let code = if little_endian {
    i16::from_le_bytes(field(head, 12))
  } else {
    i16::from_be_bytes(field(head, 12))
  };

  let rank = read_i64(16);
  if !(1..=7).contains(&rank) {
    bail!("dimension rank {rank} outside 1..=7");
  }
  let dims = (1..=rank as usize)
    .map(|i| {
      let size = read_i64(16 + i * 8);
      u64::try_from(size).map_err(|_| anyhow!("dimension {i} has negative size {size}"))
    })
    .collect::<Result<Vec<u64>>>()?;

  let datatype = DATATYPES
    .iter()
    .find(|(known, _)| *known == code)
    .map(|(_, name)| name.to_string())
    .ok_or_else(|| anyhow!("unknown datatype code {code}"))?;

  Ok(VolumeInfo { dims, datatype })
}
