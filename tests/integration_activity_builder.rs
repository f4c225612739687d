use presence_ipc::ActivityBuilder;

#[test]
fn default_activity_valid() {
    let activity = ActivityBuilder::new().build();
    assert!(activity.validate().is_ok());
}

#[test]
fn set_state_and_details() {
    let activity = ActivityBuilder::new()
        .state("Playing")
        .details("In game")
        .build();
    assert_eq!(activity.state.as_deref(), Some("Playing"));
    assert_eq!(activity.details.as_deref(), Some("In game"));
    assert!(activity.validate().is_ok());
}

#[test]
fn state_length_exceeds_limit() {
    let long_state = "a".repeat(129);
    let activity = ActivityBuilder::new().state(long_state).build();
    assert!(activity.validate().is_err());
}

#[test]
fn large_image_key_too_long() {
    let activity = ActivityBuilder::new().large_image("x".repeat(33)).build();
    assert!(activity.validate().is_err());
}

#[test]
fn valid_party_and_buttons_pass_validation() {
    let activity = ActivityBuilder::new()
        .state("Raiding")
        .party("raid-123", 3, 6)
        .button("Join", "https://example.com/join")
        .button("Watch", "https://example.com/watch")
        .build();

    assert!(activity.validate().is_ok());
}

#[test]
fn party_size_invalid() {
    let activity = ActivityBuilder::new().party("id", 5, 4).build();
    assert!(activity.validate().is_err());
}

#[test]
fn party_size_helper_preserves_max() {
    let activity = ActivityBuilder::new()
        .party("raid-123", 3, 6)
        .party_size(5)
        .build();

    let party = activity.party.unwrap();
    assert_eq!(party.size, Some([5, 6]));
}

#[test]
fn try_build_surfaces_validation_error() {
    let result = ActivityBuilder::new().party("id", 5, 4).try_build();
    assert!(result.is_err());
}
