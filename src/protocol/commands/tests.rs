//! Checks on the generated catalogue.
use super::*;

#[test]
/// Binary search relies on strictly ascending ids.
fn test_table_sorted_without_duplicates() {
    assert!(!table().is_empty());
    assert!(table().windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
/// Every typed command resolves to its own descriptor.
fn test_command_enum_matches_table() {
    for descriptor in table() {
        let command = Command::try_from(descriptor.id).expect("id listed in the table");
        assert_eq!(command.name(), descriptor.name);
        assert_eq!(command.descriptor(), Some(descriptor));
    }
}

#[test]
/// Commands that drive the state machine carry the matching action.
fn test_state_commands_bound_to_actions() {
    let expect = |command: Command, action: CommandAction| {
        let descriptor = lookup(command.id()).expect("command present");
        assert_eq!(descriptor.action, action, "{}", descriptor.name);
    };
    expect(Command::Ping, CommandAction::Acknowledge);
    expect(Command::Start, CommandAction::Start);
    expect(Command::StartJamming, CommandAction::StartJamming);
    expect(Command::StopJamming, CommandAction::StopJamming);
    expect(Command::Zeroize, CommandAction::Zeroise);
    expect(Command::GetState, CommandAction::ReportState);
    expect(Command::BitTopLevel, CommandAction::BuiltInTest);
    expect(Command::Reboot, CommandAction::Reboot);
}

#[test]
/// Fixed answers are carried verbatim.
fn test_fixed_parameters() {
    let product = Command::EcmGetProductId.descriptor().expect("present");
    assert_eq!(product.action, CommandAction::Fixed(&[0x02, 0x00]));

    let drm = Command::EcmGetDrm.descriptor().expect("present");
    assert_eq!(drm.action, CommandAction::Fixed(&[0x00, 0x01]));
}

#[test]
/// Ids outside the catalogue are not found.
fn test_unknown_id() {
    assert!(lookup(0xFFFF).is_none());
    assert!(Command::try_from(0xFFFF).is_err());
}

#[test]
/// Typed ids round-trip through their wire value.
fn test_state_and_response_ids() {
    assert_eq!(ResponseCode::try_from(u16::from(ResponseCode::Ok)), Ok(ResponseCode::Ok));
    assert_ne!(ResponseCode::Ok.id(), ResponseCode::NotRecognised.id());
    assert_eq!(
        EcmState::try_from(EcmState::JammingWithError.id()),
        Ok(EcmState::JammingWithError)
    );
    assert_eq!(EcmState::StandbyWithMission.name(), "StandbyWithMission");
}
