//! Integration tests for the controller loop: ISR latch → event queue →
//! dispatch → device → hub sync.
//!
//! These run on the host (x86_64) and drive the controller tick by tick
//! with mock hub and display adapters.

use crate::mock_hw::{hw_guard, MockDisplay, MockTransport};

use smarthouse::app::Controller;
use smarthouse::config::SystemConfig;
use smarthouse::devices::alarm::AlarmMode;
use smarthouse::devices::button::{button_isr_handler, ButtonId};
use smarthouse::devices::motion::motion_isr_handler;
use smarthouse::hub::wire::{
    AlarmWire, BuzzerWire, FanWire, HouseStateWire, LedWire, MotionWire,
};
use smarthouse::hub::{HttpMethod, HubClient};

type Hub = HubClient<MockTransport>;

fn make_rig() -> (Controller, Hub, MockDisplay) {
    let controller = Controller::new(SystemConfig::default());
    let hub = HubClient::new(
        MockTransport::new(),
        "http://hub.local",
        "DEADBEEFCAFE",
        "192.168.0.2",
    );
    let mut display = MockDisplay::new();
    controller.refresh_display(&mut display);
    (controller, hub, display)
}

/// Latch a button-A press and run one tick.
fn press_a(c: &mut Controller, hub: &mut Hub, d: &mut MockDisplay, now_ms: u64) {
    button_isr_handler(ButtonId::A, now_ms as u32);
    c.tick(now_ms, hub, d);
}

fn press_b(c: &mut Controller, hub: &mut Hub, d: &mut MockDisplay, now_ms: u64) {
    button_isr_handler(ButtonId::B, now_ms as u32);
    c.tick(now_ms, hub, d);
}

// ── Menu navigation ───────────────────────────────────────────

#[test]
fn button_a_advances_menu_label() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    assert_eq!(d.lines[0], "ALARM: DISARM   ");
    press_a(&mut c, &mut hub, &mut d, 1_000);
    assert_eq!(d.lines[0], "ALARM: ARM[GLOB]");
}

#[test]
fn button_b_runs_selected_command() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    // Walk the cursor to "FAN: ON[+]".
    for i in 1..=5 {
        press_a(&mut c, &mut hub, &mut d, i * 1_000);
    }
    assert_eq!(d.lines[0], "FAN: ON[+]      ");

    press_b(&mut c, &mut hub, &mut d, 6_000);

    let fan = c.fan().state();
    assert!(fan.active);
    assert!(fan.clockwise);
    // The command marked local state dirty, so a push went out this tick.
    let push = hub
        .transport()
        .calls
        .iter()
        .find(|call| call.url.ends_with("/state"))
        .expect("state push expected");
    assert_eq!(push.method, HttpMethod::Put);
}

#[test]
fn reset_action_requests_shutdown() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    for i in 1..=10 {
        press_a(&mut c, &mut hub, &mut d, i * 1_000);
    }
    assert_eq!(d.lines[0], "RESET           ");
    assert!(!c.reset_requested());

    press_b(&mut c, &mut hub, &mut d, 11_000);
    assert!(c.reset_requested());
}

// ── Motion → alarm → buzzer pipeline ─────────────────────────

#[test]
fn motion_trips_armed_alarm_then_window_clears_it() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    // Arm in global mode from the menu.
    press_a(&mut c, &mut hub, &mut d, 1_000);
    press_b(&mut c, &mut hub, &mut d, 2_000);
    assert!(c.alarm().state().armed);

    // Motion edge latches in the ISR, the next tick consumes it.
    motion_isr_handler(true);
    c.tick(3_000, &mut hub, &mut d);
    assert!(c.alarm().state().triggered);

    // The queued alarm event starts the siren, files a hub report and
    // demotes the mode so the same trigger never reports twice.
    c.tick(3_100, &mut hub, &mut d);
    assert!(c.buzzer().state().active);
    assert_eq!(hub.transport().calls_to("/report_alarm"), 1);
    assert_eq!(c.alarm().state().mode, AlarmMode::Local);

    // After the 2 s window the trigger inverts and the siren stops.
    c.tick(5_100, &mut hub, &mut d);
    let alarm = c.alarm().state();
    assert!(!alarm.triggered);
    assert!(alarm.armed, "window expiry must not disarm");
    assert!(!c.buzzer().state().active);
    assert_eq!(
        hub.transport().calls_to("/report_alarm"),
        1,
        "untrigger must not report"
    );
}

#[test]
fn local_mode_alarm_never_reports() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    // Arm in local mode: skip to the third menu entry.
    press_a(&mut c, &mut hub, &mut d, 1_000);
    press_a(&mut c, &mut hub, &mut d, 2_000);
    press_b(&mut c, &mut hub, &mut d, 3_000);
    assert_eq!(c.alarm().state().mode, AlarmMode::Local);

    motion_isr_handler(true);
    c.tick(4_000, &mut hub, &mut d);
    c.tick(4_100, &mut hub, &mut d);

    assert!(c.buzzer().state().active, "local mode still sounds the siren");
    assert_eq!(hub.transport().calls_to("/report_alarm"), 0);
}

#[test]
fn motion_without_armed_alarm_only_updates_state() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    motion_isr_handler(true);
    c.tick(1_000, &mut hub, &mut d);

    assert!(c.motion().state().motion_detected);
    assert!(!c.alarm().state().triggered);
    assert_eq!(hub.transport().calls_to("/report_alarm"), 0);
}

// ── Keepalive command channel ─────────────────────────────────

#[test]
fn keepalive_202_activates_the_alarm_remotely() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    hub.transport_mut().push_response(202, "");
    c.note_keepalive_due();
    c.tick(1_000, &mut hub, &mut d);
    assert!(c.alarm().state().triggered);

    // Queued alarm event starts the siren, reports once and demotes the
    // mode to local so the trigger cannot echo back and forth.
    c.tick(1_100, &mut hub, &mut d);
    assert!(c.buzzer().state().active);
    assert_eq!(hub.transport().calls_to("/report_alarm"), 1);
    assert_eq!(c.alarm().state().mode, AlarmMode::Local);

    // Remote window is 4 s.
    c.tick(5_100, &mut hub, &mut d);
    assert!(!c.alarm().state().triggered);
    assert!(!c.buzzer().state().active);
}

#[test]
fn keepalive_205_pulls_and_applies_hub_state_same_tick() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    let desired = HouseStateWire {
        alarm: AlarmWire {
            triggered: false,
            armed: false,
            mode: 0,
            armed_timestamp: 0,
            triggered_timestamp: 0,
            disarmed_timestamp: 0,
        },
        buzzer: BuzzerWire {
            active: false,
            timestamp: 0,
        },
        fan: FanWire {
            active: false,
            clockwise: true,
            timestamp: 0,
        },
        led: LedWire {
            active: true,
            timestamp: 0,
        },
        motion: MotionWire {
            motion_detected: false,
            triggered_timestamp: 0,
            released_timestamp: 0,
        },
        wall_msg: String::from("hello house"),
    };
    let body = serde_json::to_string(&desired).unwrap();

    hub.transport_mut().push_response(205, "");
    hub.transport_mut().push_response(200, &body);
    c.note_keepalive_due();
    c.tick(1_000, &mut hub, &mut d);

    assert!(c.led().state().active);
    assert_eq!(c.wall_msg(), "hello house");
    assert_eq!(d.lines[1], "hello house");

    // Keepalive, pull, confirming push, all within one tick.
    let methods: Vec<HttpMethod> = hub.transport().calls.iter().map(|c| c.method).collect();
    assert_eq!(methods, [HttpMethod::Put, HttpMethod::Get, HttpMethod::Put]);
}

#[test]
fn failed_keepalive_does_not_stall_the_loop() {
    let _g = hw_guard();
    let (mut c, mut hub, mut d) = make_rig();

    hub.transport_mut().push_response(500, "");
    c.note_keepalive_due();
    c.tick(1_000, &mut hub, &mut d);
    assert_eq!(d.lines[1], "HUB SYNC ERR");

    // Flag was cleared before the call; the next tick issues nothing.
    c.tick(1_100, &mut hub, &mut d);
    assert_eq!(hub.transport().calls_to("/keepalive"), 1);
}
