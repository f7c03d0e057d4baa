//! # Error and Trap Tests

use rstest::rstest;
use rvdbt_core::common::{Error, MemFault, Trap};
use rvdbt_core::isa::cause::{EXCP_DEBUG, exception};

#[rstest]
#[case(MemFault::AccessFault(0x10), exception::INSTRUCTION_ACCESS_FAULT, exception::LOAD_ACCESS_FAULT, exception::STORE_ACCESS_FAULT)]
#[case(MemFault::PageFault(0x10), exception::INSTRUCTION_PAGE_FAULT, exception::LOAD_PAGE_FAULT, exception::STORE_PAGE_FAULT)]
#[case(MemFault::Misaligned(0x10), exception::INSTRUCTION_ADDRESS_MISALIGNED, exception::LOAD_ADDRESS_MISALIGNED, exception::STORE_ADDRESS_MISALIGNED)]
fn fault_causes_per_access(
    #[case] fault: MemFault,
    #[case] fetch: u64,
    #[case] load: u64,
    #[case] store: u64,
) {
    assert_eq!(fault.addr(), 0x10);
    assert_eq!(fault.fetch_cause(), fetch);
    assert_eq!(fault.load_cause(), load);
    assert_eq!(fault.store_cause(), store);
}

#[rstest]
#[case(exception::ILLEGAL_INSTRUCTION, Trap::IllegalInstruction(0xdead))]
#[case(exception::LOAD_ACCESS_FAULT, Trap::LoadAccessFault(0xdead))]
#[case(exception::BREAKPOINT, Trap::Breakpoint(0x8000_0000))]
#[case(exception::ENVIRONMENT_CALL_FROM_M_MODE, Trap::EnvironmentCallFromMMode)]
#[case(EXCP_DEBUG, Trap::Debug(0x8000_0000))]
fn trap_from_cause(#[case] code: u64, #[case] expected: Trap) {
    let trap = Trap::from_cause(code, 0xdead, 0x8000_0000);
    assert_eq!(trap, expected);
    assert_eq!(trap.cause(), code);
}

#[test]
fn unknown_cause_is_kept_raw() {
    let trap = Trap::from_cause(42, 7, 0);
    assert_eq!(trap, Trap::Other { cause: 42, tval: 7 });
    assert_eq!(trap.cause(), 42);
}

#[test]
fn unknown_model_message_names_the_model() {
    let err = Error::UnknownModel("bogus".into());
    assert_eq!(err.to_string(), "no such CPU model: 'bogus'");
}
