use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::PathBuf;

/// Minimal single-file NIfTI-1 volume: 2x2x2 uint8, little endian
pub fn nifti_bytes() -> Vec<u8> {
  let mut bytes = vec![0u8; 352];
  bytes[0..4].copy_from_slice(&348i32.to_le_bytes());
  for (i, dim) in [3i16, 2, 2, 2, 1, 1, 1, 1].iter().enumerate() {
    bytes[40 + i * 2..42 + i * 2].copy_from_slice(&dim.to_le_bytes());
  }
  bytes[70..72].copy_from_slice(&2i16.to_le_bytes());
  bytes[72..74].copy_from_slice(&8i16.to_le_bytes());
  for i in 0..8 {
    bytes[76 + i * 4..80 + i * 4].copy_from_slice(&1.0f32.to_le_bytes());
  }
  bytes[108..112].copy_from_slice(&352.0f32.to_le_bytes());
  bytes[112..116].copy_from_slice(&1.0f32.to_le_bytes());
  bytes[344..348].copy_from_slice(b"n+1\0");
  bytes.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6, 7]);
  bytes
}

pub fn nifti(temp: &TempDir, name: &str) -> PathBuf {
  let file = temp.child(name);
  file.write_binary(&nifti_bytes()).unwrap();
  file.path().to_path_buf()
}

pub fn garbage(temp: &TempDir, name: &str) -> PathBuf {
  let file = temp.child(name);
  file.write_str("definitely not a volume").unwrap();
  file.path().to_path_buf()
}
