use super::*;

fn profile() -> UserProfile {
    UserProfile {
        id: "u-1".to_owned(),
        name: "Alice".to_owned(),
        email: None,
        role: Role::Member,
        cohort: None,
        status: ApprovalStatus::Approved,
    }
}

#[test]
fn redirects_when_settled_and_logged_out() {
    let state = SessionState::default();
    assert!(should_redirect_to_login(&state));
}

#[test]
fn does_not_redirect_while_boot_check_is_loading() {
    let state = SessionState {
        loading: true,
        ..SessionState::default()
    };
    assert!(!should_redirect_to_login(&state));
}

#[test]
fn does_not_redirect_when_authenticated() {
    let state = SessionState {
        user: Some(profile()),
        token: Some("tok".to_owned()),
        loading: false,
    };
    assert!(!should_redirect_to_login(&state));
}

#[test]
fn role_labels_are_human_readable() {
    assert_eq!(role_label(Role::Admin), "Administrator");
    assert_eq!(role_label(Role::Member), "Member");
}

#[test]
fn status_labels_are_human_readable() {
    assert_eq!(status_label(ApprovalStatus::Approved), "Approved");
    assert_eq!(status_label(ApprovalStatus::Pending), "Awaiting approval");
    assert_eq!(status_label(ApprovalStatus::Rejected), "Rejected");
}
