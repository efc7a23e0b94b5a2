use clipgen_core::{AppState, RequestStatus};

#[test]
fn fresh_state_is_idle_with_medium_scope() {
    let view = AppState::new().view();

    assert_eq!(view.status, RequestStatus::Idle);
    assert_eq!(view.scope.value(), 2);
    assert_eq!(view.scope_label, "Medium");
    assert!(view.clips.is_empty());
    assert_eq!(view.is_video, None);
}
