//! Power arbitration through the full tick loop: the overload example,
//! the one-tick-delayed constraint flag and both gating policies.

use rangectl::app::events::AppEvent;
use rangectl::app::service::ControlService;
use rangectl::config::{ConstraintPolicy, ControlConfig};
use rangectl::control::ADC_MAX;
use rangectl::control::channel::{AnalogInput, RelayOutput};

use crate::mock_hw::{EventLog, MockClock, MockHardware};

/// Raw oven pot reading that quantises to 300 °F.
const POT_300F: u16 = 2234;

struct Rig {
    svc: ControlService,
    hw: MockHardware,
    clock: MockClock,
    log: EventLog,
}

impl Rig {
    fn new(policy: ConstraintPolicy) -> Self {
        let config = ControlConfig {
            constraint_policy: policy,
            ..ControlConfig::default()
        };
        Self {
            svc: ControlService::new(config),
            hw: MockHardware::new(),
            clock: MockClock::at(0),
            log: EventLog::default(),
        }
    }

    fn full_burners(mut self) -> Self {
        self.hw.set_input(AnalogInput::Burner1Pot, ADC_MAX);
        self.hw.set_input(AnalogInput::Burner2Pot, ADC_MAX);
        self
    }

    fn baking_at_300(mut self) -> Self {
        self.hw.set_input(AnalogInput::OvenPot, POT_300F);
        self
    }

    /// Advance 100 ms and run one tick.
    fn step(&mut self) {
        self.step_by(100);
    }

    fn step_by(&mut self, ms: u64) {
        self.clock.advance(ms);
        self.svc.tick(&mut self.hw, &self.clock, &mut self.log);
    }

    /// Step until the arbiter latches an overload; returns ticks taken.
    fn step_until_constrained(&mut self) -> usize {
        for n in 1..=50 {
            self.step();
            if self.svc.constraint_active() {
                return n;
            }
        }
        panic!("constraint never raised");
    }

    fn raised(&self) -> usize {
        self.log
            .count(|e| matches!(e, AppEvent::ConstraintRaised(_)))
    }

    fn cleared(&self) -> usize {
        self.log.count(|e| matches!(e, AppEvent::ConstraintCleared))
    }
}

#[test]
fn two_full_burners_and_bake_overload_the_supply() {
    let mut rig = Rig::new(ConstraintPolicy::Advisory)
        .full_burners()
        .baking_at_300();
    for _ in 0..10 {
        rig.step();
    }

    let budget = rig.svc.last_budget();
    assert_eq!(budget.total_requested_watts, 8_585);
    assert_eq!(budget.grid_watts, 1_500);
    assert_eq!(budget.battery_watts, 3_000);
    assert_eq!(budget.total_duty_units, 90);
    assert!(budget.overload);
    assert!(rig.svc.constraint_active());

    // Raised once, on the first overloaded tick, never re-announced.
    assert_eq!(rig.raised(), 1);
    assert_eq!(rig.cleared(), 0);
}

#[test]
fn constraint_only_gates_the_following_tick() {
    let mut rig = Rig::new(ConstraintPolicy::Enforce)
        .full_burners()
        .baking_at_300();
    rig.step_until_constrained();

    // The tick that raised the flag was decided without it.
    for b in rig.svc.burners() {
        assert!(b.allowed());
        assert!(b.relay_on());
    }

    // Next tick: oven was heating, so neither burner may run.
    rig.step();
    for b in rig.svc.burners() {
        assert!(!b.allowed());
        assert!(!b.relay_on());
    }
    assert!(!rig.hw.level(RelayOutput::Burner1));
    assert!(!rig.hw.level(RelayOutput::Burner2));
    assert!(rig.hw.level(RelayOutput::OvenBake));
    assert_eq!(rig.cleared(), 1);
    assert!(!rig.svc.constraint_active());

    // Load fits again, so the burners come back on the tick after.
    rig.step();
    for b in rig.svc.burners() {
        assert!(b.allowed());
        assert!(b.relay_on());
    }
}

#[test]
fn advisory_policy_reports_but_never_suppresses() {
    let mut rig = Rig::new(ConstraintPolicy::Advisory)
        .full_burners()
        .baking_at_300();
    rig.step_until_constrained();
    rig.step();

    for b in rig.svc.burners() {
        assert!(!b.allowed());
        assert!(b.relay_on());
    }
    assert!(rig.hw.level(RelayOutput::Burner1));
    assert!(rig.hw.level(RelayOutput::Burner2));
    assert!(rig.svc.constraint_active());
    assert_eq!(rig.cleared(), 0);
}

#[test]
fn enforce_without_oven_keeps_the_first_burner() {
    let mut rig = Rig::new(ConstraintPolicy::Enforce).full_burners();
    rig.step_until_constrained();
    assert!(rig.hw.level(RelayOutput::Burner1));
    assert!(rig.hw.level(RelayOutput::Burner2));

    rig.step();
    let [b1, b2] = rig.svc.burners();
    assert!(b1.allowed() && b1.relay_on());
    assert!(!b2.allowed() && !b2.relay_on());
    assert!(!rig.hw.level(RelayOutput::Burner2));
    assert!(rig.svc.last_budget().total_requested_watts <= 3_000);
}

#[test]
fn recovery_after_denial_respects_debounce() {
    let mut rig = Rig::new(ConstraintPolicy::Enforce)
        .full_burners()
        .baking_at_300();
    rig.step_until_constrained();
    rig.step();
    assert!(!rig.svc.burners()[0].relay_on());
    assert!(!rig.svc.constraint_active());

    // Allowed again, but the relay switched off only 10 ms ago.
    rig.step_by(10);
    let b1 = &rig.svc.burners()[0];
    assert!(b1.allowed());
    assert!(!b1.relay_on());

    // 60 ms after the forced OFF the transition is accepted.
    rig.step_by(50);
    assert!(rig.svc.burners()[0].relay_on());
    assert!(rig.hw.level(RelayOutput::Burner1));
}
