//! Integration tests for the hub client: URL shape, body shape, status
//! code handling, transport failures.

use crate::mock_hw::MockTransport;

use smarthouse::hub::wire::{
    AlarmWire, BuzzerWire, FanWire, HouseStateWire, LedWire, MotionWire,
};
use smarthouse::hub::{
    HttpMethod, HubClient, HubError, KeepaliveOutcome, TransportError,
};

fn make_client() -> HubClient<MockTransport> {
    HubClient::new(
        MockTransport::new(),
        "http://hub.local:8000/",
        "001122AABBCC",
        "10.0.0.7",
    )
}

fn sample_state() -> HouseStateWire {
    HouseStateWire {
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
            active: false,
            timestamp: 0,
        },
        motion: MotionWire {
            motion_detected: false,
            triggered_timestamp: 0,
            released_timestamp: 0,
        },
        wall_msg: String::new(),
    }
}

#[test]
fn register_posts_identity_and_state() {
    let mut hub = make_client();
    hub.register(&sample_state()).unwrap();

    let call = hub.transport().last_call().unwrap();
    assert_eq!(call.method, HttpMethod::Post);
    // Trailing slash on the base URL must not double up.
    assert_eq!(call.url, "http://hub.local:8000/houses");
    let body = call.body.as_deref().unwrap();
    assert!(body.contains("\"unique_id\":\"001122AABBCC\""));
    assert!(body.contains("\"ip_address\":\"10.0.0.7\""));
    assert!(body.contains("\"state\":"));
}

#[test]
fn keepalive_maps_status_codes_to_outcomes() {
    let mut hub = make_client();
    hub.transport_mut().push_response(200, "");
    hub.transport_mut().push_response(202, "");
    hub.transport_mut().push_response(205, "");
    hub.transport_mut().push_response(404, "");

    assert_eq!(hub.keepalive().unwrap(), KeepaliveOutcome::Ok);
    assert_eq!(hub.keepalive().unwrap(), KeepaliveOutcome::ActivateAlarm);
    assert_eq!(hub.keepalive().unwrap(), KeepaliveOutcome::StateAvailable);
    assert_eq!(hub.keepalive(), Err(HubError::Status(404)));

    let call = hub.transport().last_call().unwrap();
    assert_eq!(call.method, HttpMethod::Put);
    assert_eq!(call.url, "http://hub.local:8000/houses/001122AABBCC/keepalive");
}

#[test]
fn push_state_puts_full_snapshot() {
    let mut hub = make_client();
    hub.push_state(&sample_state()).unwrap();

    let call = hub.transport().last_call().unwrap();
    assert_eq!(call.method, HttpMethod::Put);
    assert_eq!(call.url, "http://hub.local:8000/houses/001122AABBCC/state");
    let parsed: HouseStateWire =
        serde_json::from_str(call.body.as_deref().unwrap()).unwrap();
    assert_eq!(parsed, sample_state());
}

#[test]
fn pull_state_parses_hub_body() {
    let mut hub = make_client();
    let mut desired = sample_state();
    desired.wall_msg = String::from("dinner time");
    desired.fan.active = true;
    let body = serde_json::to_string(&desired).unwrap();
    hub.transport_mut().push_response(200, &body);

    let pulled = hub.pull_state().unwrap();
    assert_eq!(pulled, desired);
    assert_eq!(hub.transport().last_call().unwrap().method, HttpMethod::Get);
}

#[test]
fn pull_state_rejects_malformed_body() {
    let mut hub = make_client();
    hub.transport_mut().push_response(200, "not json at all");
    assert!(matches!(hub.pull_state(), Err(HubError::Protocol(_))));
}

#[test]
fn report_alarm_puts_to_the_house_resource() {
    let mut hub = make_client();
    hub.report_alarm().unwrap();

    let call = hub.transport().last_call().unwrap();
    assert_eq!(call.method, HttpMethod::Put);
    assert_eq!(
        call.url,
        "http://hub.local:8000/houses/001122AABBCC/report_alarm"
    );
    assert!(call.body.is_none());
}

#[test]
fn finalize_deletes_the_house_resource() {
    let mut hub = make_client();
    hub.finalize().unwrap();

    let call = hub.transport().last_call().unwrap();
    assert_eq!(call.method, HttpMethod::Delete);
    assert_eq!(call.url, "http://hub.local:8000/houses/001122AABBCC");
}

#[test]
fn transport_failure_surfaces_as_hub_error() {
    let mut hub = make_client();
    hub.transport_mut().push_failure(TransportError::Timeout);
    assert_eq!(
        hub.keepalive(),
        Err(HubError::Transport(TransportError::Timeout))
    );
}
