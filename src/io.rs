//! Host-side flat-array loaders.
//!
//! Waveform/metadata ingress is someone else's concern; this crate's
//! two engines only ever consume typed flat arrays. These loaders exist
//! so the CLI harness and tests have a way to *get* flat arrays onto the
//! heap. Neither `estimate_delays` nor `locate_events` ever sees a
//! `Path`; both take plain slices, called synchronously.

use std::fs::File;
use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::LocatorError;

/// Memory-map a raw little-endian flat binary file of `f32` values.
///
/// Used for large signal blocks (`signals[S, T]`) where copying the
/// whole file into a `Vec` up front would double peak memory; the
/// mapping is read once into an owned `Vec<f32>` here because the core
/// API takes `&[f32]` slices with a lifetime independent of any mapped
/// file.
pub fn read_flat_f32(path: &str) -> Result<Vec<f32>, LocatorError> {
    let file = File::open(path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| LocatorError::IoError {
        message: format!("failed to memory-map '{}': {}", path, e),
    })?;

    if mmap.len() % 4 != 0 {
        return Err(LocatorError::ValidationError {
            message: format!(
                "'{}' length {} is not a multiple of 4 bytes (f32)",
                path,
                mmap.len()
            ),
        });
    }

    let mut cursor = &mmap[..];
    let mut values = Vec::with_capacity(mmap.len() / 4);
    while !cursor.is_empty() {
        values.push(cursor.read_f32::<LittleEndian>().map_err(|e| LocatorError::IoError {
            message: format!("failed to read f32 from '{}': {}", path, e),
        })?);
    }
    Ok(values)
}

/// Memory-map a raw little-endian flat binary file of `i32` values.
pub fn read_flat_i32(path: &str) -> Result<Vec<i32>, LocatorError> {
    let file = File::open(path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(|e| LocatorError::IoError {
        message: format!("failed to memory-map '{}': {}", path, e),
    })?;

    if mmap.len() % 4 != 0 {
        return Err(LocatorError::ValidationError {
            message: format!(
                "'{}' length {} is not a multiple of 4 bytes (i32)",
                path,
                mmap.len()
            ),
        });
    }

    let mut cursor = &mmap[..];
    let mut values = Vec::with_capacity(mmap.len() / 4);
    while !cursor.is_empty() {
        values.push(cursor.read_i32::<LittleEndian>().map_err(|e| LocatorError::IoError {
            message: format!("failed to read i32 from '{}': {}", path, e),
        })?);
    }
    Ok(values)
}

/// Read an entire JSON job file into a `String`, for the CLI's
/// `serde_json`-deserialized job fixtures.
pub fn read_json_file(path: &str) -> Result<String, LocatorError> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}
