use duolane_core::{Command, Event, SessionState};
use duolane_ports::types::Lane;
use pretty_assertions::assert_eq;

#[test]
fn commands_use_tagged_json() {
    let cmd: Command =
        serde_json::from_str(r#"{ "type": "AttemptHit", "payload": { "lane": 1 } }"#).unwrap();
    assert!(matches!(cmd, Command::AttemptHit { lane: Lane::Right }));

    let cmd: Command = serde_json::from_str(r#"{ "type": "StartSession" }"#).unwrap();
    assert!(matches!(cmd, Command::StartSession));
}

#[test]
fn events_round_trip_through_json() {
    let event = Event::SessionStateChanged {
        state: SessionState::Finished,
    };
    let json = serde_json::to_string(&event).unwrap();

    assert_eq!(
        json,
        r#"{"type":"SessionStateChanged","payload":{"state":"Finished"}}"#
    );
    assert_eq!(serde_json::from_str::<Event>(&json).unwrap(), event);
}
