//! # IR Operation Semantics
//!
//! Arithmetic and comparison helpers shared by every backend.

use rstest::rstest;
use rvdbt_core::ir::{BinOp, Cond};

#[rstest]
#[case::add_wraps(BinOp::Add, u64::MAX, 1, 0)]
#[case::sub_wraps(BinOp::Sub, 0, 1, u64::MAX)]
#[case::sll_masks_amount(BinOp::Sll, 1, 65, 2)]
#[case::srl(BinOp::Srl, 0x8000_0000_0000_0000, 63, 1)]
#[case::sra_keeps_sign(BinOp::Sra, 0x8000_0000_0000_0000, 63, u64::MAX)]
#[case::slt_signed(BinOp::Slt, u64::MAX, 0, 1)]
#[case::sltu_unsigned(BinOp::Sltu, u64::MAX, 0, 0)]
#[case::addw_sign_extends(BinOp::AddW, 0x7FFF_FFFF, 1, 0xFFFF_FFFF_8000_0000)]
#[case::sllw_masks_amount(BinOp::SllW, 1, 33, 2)]
#[case::srlw_ignores_upper(BinOp::SrlW, 0xFFFF_FFFF_8000_0000, 31, 1)]
#[case::sraw(BinOp::SraW, 0x8000_0000, 4, 0xFFFF_FFFF_F800_0000)]
#[case::xor(BinOp::Xor, 0xF0, 0xFF, 0x0F)]
fn binop_apply(#[case] op: BinOp, #[case] a: u64, #[case] b: u64, #[case] expected: u64) {
    assert_eq!(op.apply(a, b), expected);
}

#[rstest]
#[case(Cond::Eq, 3, 3, true)]
#[case(Cond::Ne, 3, 3, false)]
#[case(Cond::Lt, u64::MAX, 0, true)]
#[case(Cond::Ltu, u64::MAX, 0, false)]
#[case(Cond::Ge, 0, u64::MAX, true)]
#[case(Cond::Geu, 0, u64::MAX, false)]
fn cond_holds(#[case] cond: Cond, #[case] a: u64, #[case] b: u64, #[case] expected: bool) {
    assert_eq!(cond.holds(a, b), expected);
}
