//! Integration tests for the conformance scenarios and the suite runner.

use aes_conformance::common::{BitVector, HarnessError, Result};
use aes_conformance::config::{HarnessConfig, SignalMap};
use aes_conformance::driver::{Driver, Phase};
use aes_conformance::dut::{self, DutHandle};
use aes_conformance::golden::State;
use aes_conformance::report::Verdict;
use aes_conformance::runner::Runner;
use aes_conformance::scenarios::{
    self, expect_equal, AddKeyCapture, ClockDomain, FullEncryption, KeySchedule, Scenario,
    ScenarioContext, Stage, StageScenario, Stimulus,
};
use aes_conformance::sim::{nets, AesCore, Fault, SilentDut, Unit};

fn config(seed: u64) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.stimulus.seed = Some(seed);
    config
}

fn core(config: &HarnessConfig, faults: &[Fault]) -> DutHandle {
    let mut core = AesCore::new(config.master_key().unwrap()).unwrap();
    for fault in faults {
        core = core.with_fault(*fault);
    }
    dut::share(core)
}

fn runner(seed: u64, faults: &[Fault]) -> Runner {
    let config = config(seed);
    let dut = core(&config, faults);
    Runner::new(config, dut)
}

/// Tests that every scenario passes against a correct core.
#[test]
fn test_standard_suite_passes() {
    let mut runner = runner(7, &[]);
    let report = runner.run(&scenarios::standard_suite());
    for outcome in &report.outcomes {
        assert!(
            outcome.passed(),
            "{}: {:?}",
            outcome.scenario,
            outcome.diagnosis()
        );
    }
    assert_eq!(report.outcomes.len(), 7);
    assert!(report.all_passed());
}

/// Tests the suite over several seeds and iterations.
#[test]
fn test_suite_passes_for_many_vectors() {
    for seed in [1, 2, 3] {
        let mut config = config(seed);
        config.stimulus.iterations = 3;
        let dut = core(&config, &[]);
        let mut runner = Runner::new(config, dut);
        let report = runner.run(&scenarios::standard_suite());
        assert_eq!(report.outcomes.len(), 21);
        assert_eq!(report.failed(), 0, "seed {}", seed);
    }
}

/// Tests that every force in every scenario is paired with a release.
#[test]
fn test_overrides_balanced() {
    let mut runner = runner(11, &[]);
    let report = runner.run(&scenarios::standard_suite());
    for outcome in &report.outcomes {
        assert!(
            outcome.unbalanced_overrides().is_empty(),
            "{}",
            outcome.scenario
        );
    }
    let forces = |name: &str| {
        report
            .outcomes
            .iter()
            .find(|o| o.scenario == name)
            .map(|o| o.overrides.len() / 2)
            .unwrap()
    };
    assert_eq!(forces("full_encryption"), 0);
    assert_eq!(forces("subbytes"), 2);
    assert_eq!(forces("key_schedule"), 30);
    assert_eq!(forces("add_key_capture"), 3);
}

/// Tests that the end-to-end run completes well inside the bound.
#[test]
fn test_full_encryption_timing() {
    let mut runner = runner(3, &[]);
    let outcome = runner.run_one(&FullEncryption::random(), 0);
    assert!(outcome.passed());
    assert!(outcome.sim_time_ps < 1_000_000);
    assert!(outcome.cycles > 100);
}

/// Tests the zero-plaintext regression vector.
#[test]
fn test_known_answer_vector() {
    let mut runner = runner(0, &[]);
    let outcome = runner.run_one(&FullEncryption::known_answer(State::default()), 0);
    assert_eq!(outcome.scenario, "full_encryption_known_answer");
    assert!(outcome.passed(), "{:?}", outcome.diagnosis());
}

/// Tests that a corrupted stage is reported as a mismatch.
#[test]
fn test_stage_fault_is_mismatch() {
    let fault = Fault::FlipBit {
        unit: Unit::MixColumns,
        bit: 77,
    };
    let mut runner = runner(5, &[fault]);
    let report = runner.run(&scenarios::standard_suite());
    let verdict = |name: &str| {
        report
            .outcomes
            .iter()
            .find(|o| o.scenario == name)
            .map(|o| o.verdict)
            .unwrap()
    };
    assert_eq!(verdict("mixcolumns"), Verdict::Mismatch);
    assert_eq!(verdict("full_encryption"), Verdict::Mismatch);
    assert_eq!(verdict("subbytes"), Verdict::Passed);
    assert_eq!(verdict("shiftrows"), Verdict::Passed);
    assert_eq!(verdict("key_schedule"), Verdict::Passed);
    assert_eq!(verdict("add_key_capture"), Verdict::Passed);
}

/// Tests that a mismatch message names both values.
#[test]
fn test_mismatch_diagnosis() {
    let fault = Fault::FlipBit {
        unit: Unit::SubBytes,
        bit: 0,
    };
    let mut runner = runner(9, &[fault]);
    let input = State::from_hex("193de3bea0f4e22b9ac68d2ae9f84808").unwrap();
    let outcome = runner.run_one(&StageScenario::new(Stage::SubBytes, Stimulus::Fixed(input)), 0);
    assert_eq!(outcome.verdict, Verdict::Mismatch);
    assert_eq!(
        outcome.diagnosis(),
        Some(
            "subbytes output: expected d42711aee0bf98f1b8b45de51e415230, \
             got d52711aee0bf98f1b8b45de51e415230"
        )
    );
    assert!(outcome.unbalanced_overrides().is_empty());
}

/// Tests that a wrong round key fails at the round that diverges.
#[test]
fn test_key_schedule_fault() {
    let fault = Fault::FlipBit {
        unit: Unit::KeySchedule,
        bit: 100,
    };
    let mut runner = runner(4, &[fault]);
    let outcome = runner.run_one(&KeySchedule::new(Stimulus::Random), 0);
    assert_eq!(outcome.verdict, Verdict::Mismatch);
    assert!(outcome.diagnosis().unwrap().starts_with("round 1 key"));
}

/// Tests that a silent key scheduler trips the handshake bound.
#[test]
fn test_key_schedule_handshake_timeout() {
    let mut runner = runner(4, &[Fault::SilentDone(Unit::KeySchedule)]);
    let outcome = runner.run_one(&KeySchedule::new(Stimulus::Random), 0);
    assert_eq!(outcome.verdict, Verdict::TimedOut);
    assert_eq!(
        outcome.diagnosis(),
        Some(
            "completion signal never asserted: \
             `aes_module_inst.aes_inst.keysched_inst.done` did not rise within 100 ns"
        )
    );
}

/// Tests that a core that never signals completion times out.
#[test]
fn test_silent_core_times_out() {
    let mut runner = runner(8, &[Fault::SilentDone(Unit::Core)]);
    let outcome = runner.run_one(&FullEncryption::random(), 0);
    assert_eq!(outcome.verdict, Verdict::TimedOut);
    assert!(outcome.sim_time_ps >= 1_000_000);
}

/// Tests every handshake-driven scenario against the logic-free stub.
#[test]
fn test_stub_times_out() {
    let config = config(2);
    let mut runner = Runner::new(config, dut::share(SilentDut::new().unwrap()));
    let report = runner.run(&scenarios::standard_suite());
    for outcome in &report.outcomes {
        if outcome.scenario == "add_key_capture" {
            continue;
        }
        assert_eq!(outcome.verdict, Verdict::TimedOut, "{}", outcome.scenario);
        assert!(outcome.unbalanced_overrides().is_empty());
    }
    assert!(!report.all_passed());
}

/// Tests that the same seed reproduces the same stimulus.
#[test]
fn test_seed_is_reproducible() {
    let run = |seed| {
        let mut runner = runner(seed, &[]);
        runner.run_one(&AddKeyCapture::new(Stimulus::Random), 0).overrides
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

struct LeakyScenario;

impl Scenario for LeakyScenario {
    fn name(&self) -> &str {
        "leaky"
    }

    fn domain(&self, signals: &SignalMap) -> ClockDomain {
        ClockDomain {
            clock: signals.top.clk.clone(),
            reset: signals.top.rst.clone(),
        }
    }

    fn run(&self, driver: &mut Driver, _ctx: &mut ScenarioContext) -> Result<()> {
        let guard = driver.force(nets::KEY, BitVector::wide(1))?;
        std::mem::forget(guard);
        driver.rising_edge()?;
        Ok(())
    }
}

/// Tests that a leaked force is a failed outcome.
#[test]
fn test_leak_is_reported() {
    let mut runner = runner(1, &[]);
    let outcome = runner.run_one(&LeakyScenario, 0);
    assert_eq!(outcome.verdict, Verdict::OverrideLeak);
    assert!(outcome
        .diagnosis()
        .unwrap()
        .contains("aes_module_inst.aes_inst.key"));
}

/// Tests that setup errors are reported, not panicked on.
#[test]
fn test_bad_clock_period_is_an_error() {
    let mut config = config(1);
    config.clock.period_ps = 3;
    let dut = core(&config, &[]);
    let mut runner = Runner::new(config, dut);
    let outcome = runner.run_one(&AddKeyCapture::new(Stimulus::Random), 0);
    assert_eq!(outcome.verdict, Verdict::Error);
}

/// Tests that a zero iteration count is reported rather than run.
#[test]
fn test_zero_iterations_is_an_error() {
    let mut config = config(1);
    config.stimulus.iterations = 0;
    let dut = core(&config, &[]);
    let mut runner = Runner::new(config, dut);
    let report = runner.run(&scenarios::standard_suite());
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.outcomes[0].verdict, Verdict::Error);
    assert!(!report.all_passed());
}

/// Tests the comparison helper directly.
#[test]
fn test_expect_equal() {
    let s = State::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
    assert!(expect_equal("x", &s, &s.to_bits()).is_ok());
    let err = expect_equal("x", &s, &BitVector::wide(0)).unwrap_err();
    assert_eq!(
        err,
        HarnessError::Mismatch {
            label: "x".to_string(),
            expected: "000102030405060708090a0b0c0d0e0f".to_string(),
            observed: "0".repeat(32),
        }
    );
}

/// Tests scenario names and that a driver ends Completed after a stage check.
#[test]
fn test_scenario_names_and_phase() {
    let names: Vec<String> = scenarios::standard_suite()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "full_encryption",
            "full_encryption_known_answer",
            "subbytes",
            "shiftrows",
            "mixcolumns",
            "key_schedule",
            "add_key_capture",
        ]
    );

    let config = config(6);
    let dut = core(&config, &[]);
    let scenario = StageScenario::new(Stage::ShiftRows, Stimulus::Random);
    let domain = scenario.domain(&config.signals);
    let clock = aes_conformance::driver::Clock::new(domain.clock, 1_000).unwrap();
    let reset = aes_conformance::driver::ResetPolicy::active_high(domain.reset, 2);
    let mut driver = Driver::new(dut, clock, reset).unwrap();
    driver.reset().unwrap();
    let mut ctx = ScenarioContext::new(config, 6);
    scenario.run(&mut driver, &mut ctx).unwrap();
    assert_eq!(driver.finish().unwrap().phase, Phase::Completed);
}
