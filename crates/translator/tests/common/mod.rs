
/// Block-building harness.
pub mod harness;
