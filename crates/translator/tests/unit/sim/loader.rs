//! # Image Loader Tests
//!
//! Raw and ELF images, zero-filled BSS, fresh mappings for segments outside RAM,
//! and the error cases.

use std::io::Write;

use rvdbt_core::common::{Error, VirtAddr};
use rvdbt_core::config::Config;
use rvdbt_core::memory::{GuestMemory, Perms};
use rvdbt_core::sim::load_image;
use rvdbt_core::Engine;
use tempfile::NamedTempFile;

use crate::common::builder::instruction::insn;
use crate::common::harness::{BASE, RAM_SIZE, program_bytes};

const EHDR_SIZE: usize = 64;
const PHDR_SIZE: usize = 56;

/// A minimal little-endian RV64 executable with one `PT_LOAD` segment.
fn elf_image(vaddr: u64, entry: u64, payload: &[u8], mem_size: u64) -> Vec<u8> {
    let data_offset = (EHDR_SIZE + PHDR_SIZE) as u64;
    let mut out = Vec::new();

    out.extend_from_slice(b"\x7fELF");
    out.extend_from_slice(&[2, 1, 1, 0]);
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    out.extend_from_slice(&0xF3u16.to_le_bytes()); // EM_RISCV
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&entry.to_le_bytes());
    out.extend_from_slice(&(EHDR_SIZE as u64).to_le_bytes());
    out.extend_from_slice(&0u64.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&(PHDR_SIZE as u16).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&64u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    assert_eq!(out.len(), EHDR_SIZE);

    out.extend_from_slice(&1u32.to_le_bytes()); // PT_LOAD
    out.extend_from_slice(&7u32.to_le_bytes());
    out.extend_from_slice(&data_offset.to_le_bytes());
    out.extend_from_slice(&vaddr.to_le_bytes());
    out.extend_from_slice(&vaddr.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&mem_size.to_le_bytes());
    out.extend_from_slice(&0x1000u64.to_le_bytes());
    assert_eq!(out.len() as u64, data_offset);

    out.extend_from_slice(payload);
    out
}

fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

fn ram() -> GuestMemory {
    let mut memory = GuestMemory::new();
    memory.map(BASE, RAM_SIZE, Perms::RWX.with_user()).unwrap();
    memory
}

#[test]
fn raw_image_lands_at_load_base() {
    let bytes = program_bytes(&[insn().addi(1, 0, 1).build(), insn().ebreak().build()]);
    let file = temp_file(&bytes);
    let mut memory = ram();

    let image = load_image(&mut memory, file.path(), BASE).unwrap();
    assert_eq!(image.entry, VirtAddr::new(BASE));
    assert_eq!(image.segments, 1);
    assert_eq!(image.bytes, 8);
    assert_eq!(memory.read_bytes(BASE, 8).unwrap(), bytes);
}

#[test]
fn elf_segment_is_copied_and_bss_zeroed() {
    let payload = program_bytes(&[insn().addi(1, 0, 3).build(), insn().ebreak().build()]);
    let file = temp_file(&elf_image(BASE + 0x100, BASE + 0x104, &payload, 0x20));
    let mut memory = ram();
    memory.write_bytes(BASE + 0x100, &[0xFF; 0x40]).unwrap();

    let image = load_image(&mut memory, file.path(), BASE).unwrap();
    assert_eq!(image.entry, VirtAddr::new(BASE + 0x104));
    assert_eq!(image.segments, 1);
    assert_eq!(image.bytes, 8);
    assert_eq!(memory.read_bytes(BASE + 0x100, 8).unwrap(), payload);
    assert_eq!(memory.read_bytes(BASE + 0x108, 0x18).unwrap(), vec![0; 0x18]);
    assert_eq!(memory.read_bytes(BASE + 0x120, 4).unwrap(), vec![0xFF; 4]);
}

#[test]
fn elf_segment_outside_ram_gets_a_mapping() {
    let addr = 0x1_0000_0010;
    let payload = program_bytes(&[insn().nop().build()]);
    let file = temp_file(&elf_image(addr, addr, &payload, 4));
    let mut memory = ram();

    let _ = load_image(&mut memory, file.path(), BASE).unwrap();
    assert!(memory.is_mapped(0x1_0000_0000, 0x1000));
    assert_eq!(memory.read_bytes(addr, 4).unwrap(), payload);
}

#[test]
fn empty_file_has_nothing_to_load() {
    let file = temp_file(&[]);
    let err = load_image(&mut ram(), file.path(), BASE).unwrap_err();
    assert!(matches!(err, Error::NoImage(_)));
}

#[test]
fn missing_file_is_io_error() {
    let err = load_image(&mut ram(), "/nonexistent/image.bin".as_ref(), BASE).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn truncated_elf_is_rejected() {
    let file = temp_file(b"\x7fELF\x02\x01\x01");
    let err = load_image(&mut ram(), file.path(), BASE).unwrap_err();
    assert!(matches!(err, Error::Elf(_)));
}

#[test]
fn engine_starts_at_elf_entry() {
    let payload = program_bytes(&[insn().addi(1, 0, 3).build(), insn().ebreak().build()]);
    let file = temp_file(&elf_image(BASE + 0x200, BASE + 0x200, &payload, 8));
    let mut config = Config::default();
    config.memory.ram_size = RAM_SIZE;
    let mut engine = Engine::new(&config).unwrap();

    let image = engine.load_image(file.path()).unwrap();
    assert_eq!(engine.cpu().pc(), image.entry);
    let _ = engine.run(10);
    assert_eq!(engine.cpu().read_register(1), 3);
}
