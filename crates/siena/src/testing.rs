//! Fixtures shared by the unit tests

use std::fs;
use std::path::{Path, PathBuf};

/// Bytes of a minimal single-file NIfTI-1 volume: 2x2x2 uint8, little endian
pub fn nifti_bytes() -> Vec<u8> {
  let mut bytes = vec![0u8; 352];
  bytes[0..4].copy_from_slice(&348i32.to_le_bytes());

  let dims: [i16; 8] = [3, 2, 2, 2, 1, 1, 1, 1];
  for (i, dim) in dims.iter().enumerate() {
    let offset = 40 + i * 2;
    bytes[offset..offset + 2].copy_from_slice(&dim.to_le_bytes());
  }
  // datatype uint8, 8 bits per voxel
  bytes[70..72].copy_from_slice(&2i16.to_le_bytes());
  bytes[72..74].copy_from_slice(&8i16.to_le_bytes());
  for i in 0..8 {
    let offset = 76 + i * 4;
    bytes[offset..offset + 4].copy_from_slice(&1.0f32.to_le_bytes());
  }
  bytes[108..112].copy_from_slice(&352.0f32.to_le_bytes());
  bytes[112..116].copy_from_slice(&1.0f32.to_le_bytes());
  bytes[344..348].copy_from_slice(b"n+1\0");

  bytes.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
  bytes
}

/// Bytes of the same volume with a NIfTI-2 header
pub fn nifti2_bytes() -> Vec<u8> {
  let mut bytes = vec![0u8; 544];
  bytes[0..4].copy_from_slice(&540i32.to_le_bytes());
  bytes[4..12].copy_from_slice(b"n+2\0\r\n\x1a\n");
  bytes[12..14].copy_from_slice(&2i16.to_le_bytes());
  bytes[14..16].copy_from_slice(&8i16.to_le_bytes());

  let dims: [i64; 8] = [3, 2, 2, 2, 1, 1, 1, 1];
  for (i, dim) in dims.iter().enumerate() {
    let offset = 16 + i * 8;
    bytes[offset..offset + 8].copy_from_slice(&dim.to_le_bytes());
  }
  for i in 0..8 {
    let offset = 104 + i * 8;
    bytes[offset..offset + 8].copy_from_slice(&1.0f64.to_le_bytes());
  }
  bytes[168..176].copy_from_slice(&544i64.to_le_bytes());
  bytes[176..184].copy_from_slice(&1.0f64.to_le_bytes());

  bytes.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
  bytes
}

pub fn write_nifti(dir: &Path, file_name: &str) -> PathBuf {
  let path = dir.join(file_name);
  fs::write(&path, nifti_bytes()).unwrap();
  path
}

pub fn write_garbage(dir: &Path, file_name: &str) -> PathBuf {
  let path = dir.join(file_name);
  fs::write(&path, b"this is not a brain scan").unwrap();
  path
}
