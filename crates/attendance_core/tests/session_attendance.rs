use attendance_core::{
    AttendanceTracker, EntityKind, MemoryBlobRepository, ParticipantDraft, SessionDraft,
    StoreError, ValidationError,
};

fn tracker() -> AttendanceTracker<MemoryBlobRepository> {
    AttendanceTracker::load(MemoryBlobRepository::new()).unwrap()
}

fn intake() -> SessionDraft {
    SessionDraft::new("Intake", "2024-05-01", "Hall A").with_times("13:00", "14:30")
}

#[test]
fn add_session_starts_with_empty_attendance() {
    let mut tracker = tracker();
    let session = tracker.add_session(intake()).unwrap().into_value();

    assert!(session.attendance.is_empty());
    assert_eq!(session.start_time, "13:00");
    assert_eq!(session.end_time, "14:30");
    assert_eq!(tracker.sessions(), &[session]);
}

#[test]
fn add_session_requires_name_and_location() {
    let mut tracker = tracker();

    let err = tracker
        .add_session(SessionDraft::new("", "2024-05-01", "Hall A"))
        .unwrap_err();
    assert_eq!(err, StoreError::Validation(ValidationError::EmptyField("name")));

    let err = tracker
        .add_session(SessionDraft::new("Intake", "2024-05-01", "  "))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Validation(ValidationError::EmptyField("location"))
    );
    assert!(tracker.sessions().is_empty());
}

#[test]
fn update_session_keeps_identity_and_attendance() {
    let mut tracker = tracker();
    let ann = tracker
        .add_participant(ParticipantDraft::new("Ann"))
        .unwrap()
        .into_value();
    let session = tracker.add_session(intake()).unwrap().into_value();
    let _ = tracker.toggle_attendance(&session.id, &ann.id).unwrap();

    let updated = tracker
        .update_session(
            &session.id,
            SessionDraft::new("Intake (moved)", "2024-05-08", "Hall B")
                .with_description("Bring ID"),
        )
        .unwrap()
        .into_value();

    assert_eq!(updated.id, session.id);
    assert_eq!(updated.name, "Intake (moved)");
    assert_eq!(updated.start_time, "09:00");
    assert_eq!(updated.description.as_deref(), Some("Bring ID"));
    assert!(updated.is_present(&ann.id));
}

#[test]
fn update_and_remove_unknown_session_are_not_found() {
    let mut tracker = tracker();
    let session = tracker.add_session(intake()).unwrap().into_value();

    let err = tracker.update_session("ghost", intake()).unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            kind: EntityKind::Session,
            ..
        }
    ));
    let err = tracker.remove_session("ghost").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert_eq!(tracker.sessions(), &[session]);
}

#[test]
fn toggle_twice_restores_prior_value() {
    let mut tracker = tracker();
    let ann = tracker
        .add_participant(ParticipantDraft::new("Ann"))
        .unwrap()
        .into_value();
    let session = tracker.add_session(intake()).unwrap().into_value();

    assert!(tracker.toggle_attendance(&session.id, &ann.id).unwrap().into_value());
    assert!(!tracker.toggle_attendance(&session.id, &ann.id).unwrap().into_value());

    let stored = tracker.session(&session.id).unwrap();
    assert!(!stored.is_present(&ann.id));
    assert!(stored.attendance.has_entry(&ann.id));

    assert!(tracker.toggle_attendance(&session.id, &ann.id).unwrap().into_value());
    assert!(tracker.session(&session.id).unwrap().is_present(&ann.id));
}

#[test]
fn toggle_on_unknown_session_changes_nothing() {
    let mut tracker = tracker();
    let session = tracker.add_session(intake()).unwrap().into_value();

    let err = tracker.toggle_attendance("ghost", "p1").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { ref id, .. } if id == "ghost"));
    assert_eq!(tracker.session(&session.id), Some(&session));
}

#[test]
fn toggle_tolerates_unknown_participant() {
    let mut tracker = tracker();
    let session = tracker.add_session(intake()).unwrap().into_value();

    assert!(tracker
        .toggle_attendance(&session.id, "not-a-participant")
        .unwrap()
        .into_value());
    let summary = tracker.summary(&session.id).unwrap();
    assert_eq!(summary.present_count, 0);
    assert_eq!(summary.total, 0);
}

#[test]
fn attendance_view_opens_and_closes() {
    let mut tracker = tracker();
    let session = tracker.add_session(intake()).unwrap().into_value();

    assert!(tracker.open_attendance("ghost").is_err());
    assert!(tracker.active_session().is_none());

    tracker.open_attendance(&session.id).unwrap();
    assert_eq!(tracker.active_session().map(|s| s.id.clone()), Some(session.id.clone()));

    tracker.close_attendance();
    assert!(tracker.active_session().is_none());

    tracker.open_attendance(&session.id).unwrap();
    let _ = tracker.remove_session(&session.id).unwrap();
    assert!(tracker.active_session().is_none());
}
