//! Binary Loader.
//!
//! This module places guest programs in memory. It performs:
//! 1. **Format detection:** ELF images are recognised by their magic; anything else is raw.
//! 2. **ELF loading:** Every loadable segment is copied to its virtual address and the
//!    remainder of its memory size is zero-filled; the entry point comes from the header.
//! 3. **Raw loading:** The file is copied to the load base, which is also the entry point.
//!
//! Segments outside existing mappings get a fresh read-write-execute region.

use std::path::Path;

use object::{Object, ObjectSegment};
use tracing::{debug, info};

use crate::common::constants::{PAGE_MASK, PAGE_SIZE};
use crate::common::{Error, VirtAddr};
use crate::memory::{GuestMemory, Perms};

const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

/// Summary of a loaded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedImage {
    /// Address execution should start at.
    pub entry: VirtAddr,
    /// Number of segments copied.
    pub segments: usize,
    /// Bytes copied from the file.
    pub bytes: u64,
}

/// Reads `path` and loads it, as ELF when it carries the ELF magic and as a raw
/// binary at `load_base` otherwise.
pub fn load_image(
    memory: &mut GuestMemory,
    path: &Path,
    load_base: u64,
) -> Result<LoadedImage, Error> {
    let data = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if data.is_empty() {
        return Err(Error::NoImage(path.to_path_buf()));
    }
    let image = if data.starts_with(ELF_MAGIC) {
        load_elf(memory, &data).and_then(|img| {
            if img.segments == 0 {
                Err(Error::NoImage(path.to_path_buf()))
            } else {
                Ok(img)
            }
        })?
    } else {
        load_raw(memory, &data, load_base)?
    };
    info!(
        path = %path.display(),
        entry = %image.entry,
        segments = image.segments,
        bytes = image.bytes,
        "loaded image"
    );
    Ok(image)
}

/// Copies a raw binary to `base`.
pub fn load_raw(memory: &mut GuestMemory, data: &[u8], base: u64) -> Result<LoadedImage, Error> {
    place(memory, base, data, data.len() as u64)?;
    Ok(LoadedImage {
        entry: VirtAddr::new(base),
        segments: 1,
        bytes: data.len() as u64,
    })
}

/// Copies the loadable segments of an ELF image.
pub fn load_elf(memory: &mut GuestMemory, data: &[u8]) -> Result<LoadedImage, Error> {
    let file = object::File::parse(data)?;
    let mut segments = 0;
    let mut bytes = 0;
    for segment in file.segments() {
        let contents = segment.data()?;
        let addr = segment.address();
        let mem_size = segment.size().max(contents.len() as u64);
        if mem_size == 0 {
            continue;
        }
        debug!(addr = %VirtAddr::new(addr), file_size = contents.len(), mem_size, "loading segment");
        place(memory, addr, contents, mem_size)?;
        segments += 1;
        bytes += contents.len() as u64;
    }
    Ok(LoadedImage {
        entry: VirtAddr::new(file.entry()),
        segments,
        bytes,
    })
}

/// Writes `contents` at `addr` and zero-fills up to `mem_size`, mapping whole pages
/// first if the range is not yet backed.
fn place(memory: &mut GuestMemory, addr: u64, contents: &[u8], mem_size: u64) -> Result<(), Error> {
    if !memory.is_mapped(addr, mem_size) {
        let start = addr & PAGE_MASK;
        let end = addr
            .checked_add(mem_size)
            .and_then(|e| e.checked_add(PAGE_SIZE - 1))
            .map(|e| e & PAGE_MASK)
            .ok_or(Error::MappingOverlap {
                base: addr,
                size: mem_size,
            })?;
        memory.map(start, end - start, Perms::RWX.with_user())?;
    }
    memory.write_bytes(addr, contents)?;
    let tail = mem_size - contents.len() as u64;
    if tail > 0 {
        memory.write_bytes(addr + contents.len() as u64, &vec![0; tail as usize])?;
    }
    Ok(())
}
