//! Integration tests for the clocked driver and signal overrides.

use aes_conformance::common::{BitVector, HarnessError};
use aes_conformance::driver::{Clock, Driver, OverrideEvent, Phase, ResetPolicy, WaitOutcome};
use aes_conformance::dut::{self, DutHandle};
use aes_conformance::golden::State;
use aes_conformance::sim::nets::{self, AES_DONE, CLK, RST};
use aes_conformance::sim::{AesCore, SilentDut};

fn core_dut() -> DutHandle {
    dut::share(AesCore::new(State::default()).unwrap())
}

fn driver_for(dut: DutHandle) -> Driver {
    let clock = Clock::new(CLK, 1_000).unwrap();
    Driver::new(dut, clock, ResetPolicy::active_high(RST, 2)).unwrap()
}

fn running(dut: DutHandle) -> Driver {
    let mut driver = driver_for(dut);
    driver.reset().unwrap();
    driver
}

/// Tests clock period validation.
#[test]
fn test_clock_rejects_odd_period() {
    assert!(matches!(Clock::new(CLK, 999), Err(HarnessError::Config(_))));
    assert!(matches!(Clock::new(CLK, 0), Err(HarnessError::Config(_))));
    let mut clock = Clock::new(CLK, 10).unwrap();
    clock.toggle();
    clock.toggle();
    assert_eq!(clock.now_ps(), 10);
    assert_eq!(clock.rising_edges(), 1);
}

/// Tests the reset sequence: two rising edges, then Running.
#[test]
fn test_reset_sequence() {
    let dut = core_dut();
    let mut driver = driver_for(dut.clone());
    assert_eq!(driver.phase(), Phase::Idle);
    driver.reset().unwrap();
    assert_eq!(driver.phase(), Phase::Running);
    assert_eq!(driver.cycles(), 2);
    assert_eq!(driver.now_ps(), 2_000 - 500);
    assert!(!dut.borrow().read(RST).unwrap().is_high());
}

/// Tests that operations are refused in the wrong phase.
#[test]
fn test_phase_guards() {
    let mut driver = driver_for(core_dut());
    assert!(matches!(
        driver.drive(nets::RX_READY, BitVector::bit(true)),
        Err(HarnessError::Phase { .. })
    ));
    assert!(matches!(driver.rising_edge(), Err(HarnessError::Phase { .. })));
    driver.reset().unwrap();
    assert!(matches!(driver.reset(), Err(HarnessError::Phase { .. })));
}

/// Tests that a DUT that never raises done times out at the bound.
#[test]
fn test_timeout_against_silent_stub() {
    let mut driver = running(dut::share(SilentDut::new().unwrap()));
    let start = driver.now_ps();
    let err = driver.await_done(AES_DONE, 1_000).unwrap_err();
    assert_eq!(
        err,
        HarnessError::Timeout {
            signal: AES_DONE.to_string(),
            bound_ns: 1_000,
        }
    );
    assert!(err.to_string().contains("completion signal never asserted"));
    assert_eq!(driver.phase(), Phase::TimedOut);
    assert_eq!(driver.now_ps() - start, 1_000_000);
}

/// Tests that a timed-out driver is retired.
#[test]
fn test_timed_out_driver_is_retired() {
    let mut driver = running(dut::share(SilentDut::new().unwrap()));
    driver.await_rising(AES_DONE, 5).unwrap_err();
    assert!(matches!(driver.rising_edge(), Err(HarnessError::Phase { .. })));
    assert!(matches!(
        driver.force(nets::KEY, BitVector::wide(0)),
        Err(HarnessError::Phase { .. })
    ));
    assert!(driver.read(AES_DONE).is_ok());
    let summary = driver.finish().unwrap();
    assert_eq!(summary.phase, Phase::TimedOut);
}

/// Tests that wait_rising reports the outcome without retiring the driver.
#[test]
fn test_wait_rising_returns_outcome() {
    let mut driver = running(dut::share(SilentDut::new().unwrap()));
    let outcome = driver.wait_rising(AES_DONE, 3).unwrap();
    assert!(matches!(outcome, WaitOutcome::TimedOut { .. }));
    assert_eq!(driver.phase(), Phase::Running);
}

/// Tests that a handshake rising after a forced enable completes the driver.
#[test]
fn test_await_done_completes() {
    let mut driver = running(core_dut());
    let ena = driver
        .force(nets::SUBBYTES.ena, BitVector::bit(true))
        .unwrap();
    let start = driver.now_ps();
    let at = driver.await_done(nets::SUBBYTES.done, 10).unwrap();
    assert_eq!(at - start, 1_000);
    assert_eq!(driver.phase(), Phase::Completed);
    ena.release().unwrap();
    assert!(matches!(driver.rising_edge(), Err(HarnessError::Phase { .. })));
    assert!(driver.read(nets::SUBBYTES.state_out).is_ok());
    assert_eq!(driver.finish().unwrap().phase, Phase::Completed);
}

/// Tests force and release through a guard.
#[test]
fn test_force_guard_releases_on_drop() {
    let dut = core_dut();
    let mut driver = running(dut.clone());
    {
        let _guard = driver.force(nets::KEY, BitVector::wide(0xabcd)).unwrap();
        assert_eq!(dut.borrow().read(nets::KEY).unwrap().value(), 0xabcd);
        assert_eq!(driver.live_overrides(), vec![nets::KEY.to_string()]);
    }
    assert!(driver.live_overrides().is_empty());
    let summary = driver.finish().unwrap();
    assert_eq!(
        summary.overrides,
        vec![
            OverrideEvent::Forced {
                signal: nets::KEY.to_string(),
                value: format!("{:032x}", 0xabcd),
            },
            OverrideEvent::Released {
                signal: nets::KEY.to_string(),
            },
        ]
    );
}

/// Tests that forcing a signal twice is refused.
#[test]
fn test_double_force_rejected() {
    let mut driver = running(core_dut());
    let _guard = driver.force(nets::KEY, BitVector::wide(1)).unwrap();
    assert_eq!(
        driver.force(nets::KEY, BitVector::wide(2)).err(),
        Some(HarnessError::AlreadyForced(nets::KEY.to_string()))
    );
}

/// Tests that a force with the wrong width fails and leaves nothing live.
#[test]
fn test_force_width_mismatch() {
    let mut driver = running(core_dut());
    assert!(matches!(
        driver.force(nets::KEY, BitVector::bit(true)),
        Err(HarnessError::WidthMismatch { .. })
    ));
    assert!(matches!(
        driver.force("no.such.signal", BitVector::bit(true)),
        Err(HarnessError::UnknownSignal(_))
    ));
    assert!(driver.live_overrides().is_empty());
}

/// Tests that a leaked guard is reported at scenario end.
#[test]
fn test_leaked_force_is_reported() {
    let mut driver = running(core_dut());
    let guard = driver.force(nets::KEY, BitVector::wide(7)).unwrap();
    std::mem::forget(guard);
    assert_eq!(
        driver.finish().unwrap_err(),
        HarnessError::OverrideLeak(vec![nets::KEY.to_string()])
    );
}

/// Tests register and wire release semantics through the driver.
#[test]
fn test_release_semantics() {
    let dut = core_dut();
    let mut driver = running(dut.clone());

    let reg = driver.force(nets::ADDKEY_OUT, BitVector::wide(0x55)).unwrap();
    reg.release().unwrap();
    assert_eq!(dut.borrow().read(nets::ADDKEY_OUT).unwrap().value(), 0x55);

    let wire = driver
        .force(nets::SUBBYTES.ena, BitVector::bit(true))
        .unwrap();
    assert!(dut.borrow().read(nets::SUBBYTES.ena).unwrap().is_high());
    wire.release().unwrap();
    assert!(!dut.borrow().read(nets::SUBBYTES.ena).unwrap().is_high());
}
