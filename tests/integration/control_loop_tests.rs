//! ControlService tick loop against mock adapters: startup, time
//! proportioning, oven mode events, relay write discipline and sensor
//! failure handling.

use rangectl::app::events::AppEvent;
use rangectl::app::service::ControlService;
use rangectl::config::ControlConfig;
use rangectl::control::ADC_MAX;
use rangectl::control::channel::{AnalogInput, RelayOutput};
use rangectl::control::oven::OvenMode;

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
    fn new() -> Self {
        Self {
            svc: ControlService::new(ControlConfig::default()),
            hw: MockHardware::new(),
            clock: MockClock::at(0),
            log: EventLog::default(),
        }
    }

    fn tick_at(&mut self, ms: u64) {
        self.clock.set(ms);
        self.svc.tick(&mut self.hw, &self.clock, &mut self.log);
    }
}

#[test]
fn start_drives_every_relay_low_and_announces() {
    let mut rig = Rig::new();
    rig.svc.start(&mut rig.hw, &mut rig.log);

    for relay in RelayOutput::ALL {
        assert_eq!(rig.hw.writes_for(relay), 1);
        assert!(!rig.hw.level(relay));
    }
    assert_eq!(rig.log.events, vec![AppEvent::Started]);
}

#[test]
fn idle_range_never_writes_a_relay() {
    let mut rig = Rig::new();
    for t in (100..=5_000).step_by(100) {
        rig.tick_at(t);
    }
    assert!(rig.hw.writes.is_empty());
    assert_eq!(rig.svc.oven().mode(), OvenMode::Off);
    assert!(!rig.svc.constraint_active());
}

#[test]
fn half_duty_burner_follows_the_cycle() {
    let mut rig = Rig::new();
    rig.hw.set_input(AnalogInput::Burner1Pot, 2048);

    let mut level_at = Vec::new();
    for t in (100..=31_000).step_by(100) {
        rig.tick_at(t);
        level_at.push((t, rig.hw.level(RelayOutput::Burner1)));
    }
    let level = |ms: u64| level_at.iter().find(|(t, _)| *t == ms).map(|(_, on)| *on);

    assert_eq!(rig.svc.burners()[0].duty(), 15);
    assert_eq!(level(14_900), Some(true));
    assert_eq!(level(15_000), Some(false));
    assert_eq!(level(29_900), Some(false));
    // Cycle restarts once a full length has elapsed.
    assert_eq!(level(30_000), Some(true));
    assert!(!rig.hw.level(RelayOutput::Burner2));
}

#[test]
fn relay_writes_happen_only_on_change() {
    let mut rig = Rig::new();
    rig.hw.set_input(AnalogInput::Burner1Pot, 1_500);
    rig.hw.set_input(AnalogInput::Burner2Pot, 3_000);
    rig.hw.set_input(AnalogInput::OvenPot, POT_300F);
    for t in (100..=65_000).step_by(100) {
        rig.tick_at(t);
    }

    let changes = rig
        .log
        .count(|e| matches!(e, AppEvent::RelayChanged { .. }));
    assert_eq!(changes, rig.hw.writes.len());

    for relay in RelayOutput::ALL {
        let levels: Vec<bool> = rig
            .hw
            .writes
            .iter()
            .filter(|(r, _)| *r == relay)
            .map(|(_, on)| *on)
            .collect();
        assert!(
            levels.windows(2).all(|w| w[0] != w[1]),
            "{relay:?} was written twice with the same level"
        );
    }
}

#[test]
fn oven_mode_changes_are_reported() {
    let mut rig = Rig::new();
    rig.tick_at(100);
    assert_eq!(rig.log.count(|e| matches!(e, AppEvent::OvenModeChanged { .. })), 0);

    rig.hw.set_input(AnalogInput::OvenPot, ADC_MAX);
    rig.tick_at(200);
    assert!(rig.log.events.contains(&AppEvent::OvenModeChanged {
        from: OvenMode::Off,
        to: OvenMode::Broil,
    }));
    assert!(rig.hw.level(RelayOutput::OvenBake));
    assert!(rig.hw.level(RelayOutput::OvenBroil));

    // Bake with a cold cavity: broil drops, bake is already on.
    rig.hw.set_input(AnalogInput::OvenPot, POT_300F);
    rig.tick_at(300);
    assert_eq!(rig.svc.oven().setpoint_f(), 300);
    assert!(rig.log.events.contains(&AppEvent::OvenModeChanged {
        from: OvenMode::Broil,
        to: OvenMode::Bake,
    }));
    assert!(rig.hw.level(RelayOutput::OvenBake));
    assert!(!rig.hw.level(RelayOutput::OvenBroil));
    assert_eq!(rig.hw.writes_for(RelayOutput::OvenBake), 1);
    assert_eq!(rig.hw.writes_for(RelayOutput::OvenBroil), 2);

    // Off is forced immediately, debounce or not.
    rig.hw.set_input(AnalogInput::OvenPot, 0);
    rig.tick_at(310);
    assert!(!rig.hw.level(RelayOutput::OvenBake));
    assert!(!rig.hw.level(RelayOutput::OvenBroil));
}

#[test]
fn failed_read_holds_last_sample_and_other_inputs_continue() {
    let mut rig = Rig::new();
    rig.hw.set_input(AnalogInput::Burner1Pot, ADC_MAX);
    rig.hw.set_input(AnalogInput::Burner2Pot, ADC_MAX);
    rig.tick_at(100);

    rig.hw.fail_input(AnalogInput::Burner1Pot, true);
    rig.hw.set_input(AnalogInput::Burner2Pot, 0);
    rig.tick_at(200);

    let [b1, b2] = rig.svc.burners();
    assert_eq!(b1.last_raw(), ADC_MAX);
    assert_eq!(b1.conditioned(), 819);
    assert_eq!(b2.last_raw(), 0);
    assert_eq!(b2.conditioned(), 409);

    rig.hw.fail_input(AnalogInput::Burner1Pot, false);
    rig.hw.set_input(AnalogInput::Burner1Pot, 0);
    rig.tick_at(300);
    assert_eq!(rig.svc.burners()[0].last_raw(), 0);
}

#[test]
fn every_tick_hands_the_sink_a_frame() {
    let mut rig = Rig::new();
    for t in (10..=100).step_by(10) {
        rig.tick_at(t);
    }
    assert_eq!(rig.log.count(|e| matches!(e, AppEvent::Telemetry(_))), 10);
    assert_eq!(rig.log.last_telemetry().map(|f| f.uptime_ms), Some(100));
}

#[test]
fn telemetry_frame_carries_plain_data() {
    let mut rig = Rig::new();
    rig.hw.set_input(AnalogInput::Burner2Pot, ADC_MAX);
    rig.hw.set_input(AnalogInput::OvenPot, POT_300F);
    for t in (100..=1_000).step_by(100) {
        rig.tick_at(t);
    }

    let frame = rig.log.last_telemetry().copied().unwrap();
    assert_eq!(frame.uptime_ms, 1_000);
    assert_eq!(frame.battery_percent, Some(71));
    assert_eq!(frame.burners[0].label, "Burner 1");
    assert_eq!(frame.burners[1].label, "Burner 2");
    assert_eq!(frame.oven.mode, OvenMode::Bake);
    assert_eq!(frame.oven.setpoint_f, 300);
    assert_eq!(frame.max_total_duty_units, 40);

    // One frame per tick.
    assert_eq!(rig.log.count(|e| matches!(e, AppEvent::Telemetry(_))), 10);

    let live = rig.svc.build_telemetry(Some(71));
    assert_eq!(live.burners[1].duty, 30);
    assert_eq!(live.burners[1].power_percent, 100);
    assert_eq!(live.burners[1].millivolts, 3_300);
    assert!(live.burners[1].relay_on);
}
