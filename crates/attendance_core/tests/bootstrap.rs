use attendance_core::{logging_status, open_tracker, ParticipantDraft, TrackerConfig};

#[test]
fn open_tracker_initializes_logging_and_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = TrackerConfig::new(dir.path().join("data"));
    config.log_level = "info".to_string();

    {
        let mut tracker = open_tracker(&config).unwrap();
        let _ = tracker
            .add_participant(ParticipantDraft::new("Ann"))
            .unwrap();
    }

    assert!(config.db_path().exists());
    let (level, log_dir) = logging_status().unwrap();
    assert_eq!(level, "info");
    assert_eq!(log_dir, config.log_dir());

    let tracker = open_tracker(&config).unwrap();
    assert_eq!(tracker.participants().len(), 1);
    assert_eq!(tracker.participants()[0].name, "Ann");
}

#[test]
fn open_tracker_rejects_invalid_log_level() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = TrackerConfig::new(dir.path());
    config.log_level = "loud".to_string();

    assert!(open_tracker(&config).is_err());
}
