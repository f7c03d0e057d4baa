//! # Compile Flag Tests

use rstest::rstest;
use rvdbt_core::translate::CompileFlags;

#[rstest]
#[case(0, 512)]
#[case(1, 1)]
#[case(511, 511)]
#[case(512, 512)]
#[case(513, 512)]
#[case(0x7FFF, 512)]
fn budget_is_clamped(#[case] count: u32, #[case] max: u32) {
    assert_eq!(CompileFlags::with_count(count).max_insns(), max);
}

#[test]
fn count_field_is_fifteen_bits() {
    let flags = CompileFlags::with_count(0x1_0005);
    assert_eq!(flags.count(), 5);
    assert!(!flags.last_io());
}

#[test]
fn raw_bits_round_trip_through_from_bits() {
    let flags = CompileFlags::with_count(12).with_last_io();
    assert_eq!(flags.bits(), 0x8000 | 12);
    assert_eq!(CompileFlags::from_bits(flags.bits()), flags);
    assert_eq!(CompileFlags::from_bits(0xFFFF_0000), CompileFlags::default());
}
