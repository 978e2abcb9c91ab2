//! Frame orchestrator scenarios with scripted collaborators


use emotion_recognition::{
    app::StartOptions,
    constants::{HEAD_PAN_JOINT, HEAD_TILT_JOINT},
    emotion::Emotion,
    frame::FaceRegion,
    speech::{phrases, Language},
    Result,
};
use std::time::{Duration, Instant};
use test_helpers::{entries, scores_with, test_frame, FixedRandom, RigBuilder, RobotMove, ScriptedLocator};

const MIRROR: StartOptions = StartOptions {
    show_display: false,
    face_tracking: false,
    mirror_emotion: true,
};

const TRACKING: StartOptions = StartOptions {
    show_display: false,
    face_tracking: true,
    mirror_emotion: false,
};

#[test]
fn test_start_twice_opens_device_once() -> Result<()> {
    let mut rig = RigBuilder::default().build();

    rig.recognition.start(StartOptions::default())?;
    rig.recognition.start(StartOptions::default())?;
    assert!(rig.recognition.is_running());
    assert_eq!(rig.capture.lock().unwrap().opens, 1);

    rig.recognition.stop();
    rig.recognition.stop();
    assert!(!rig.recognition.is_running());
    assert_eq!(rig.capture.lock().unwrap().closes, 1);
    Ok(())
}

#[test]
fn test_failed_open_stays_idle() {
    let mut rig = RigBuilder::default().failing_capture().build();
    assert!(rig.recognition.start(StartOptions::default()).is_err());
    assert!(!rig.recognition.is_running());
}

#[test]
fn test_queries_before_start_return_none() {
    let rig = RigBuilder::default().build();
    assert!(rig.recognition.categorical_data().is_none());
    assert!(rig.recognition.dimensional_data().is_none());
    assert!(rig.recognition.highest_matching_emotion().is_none());
}

#[test]
fn test_queries_after_no_face_frame_return_none() -> Result<()> {
    let mut rig = RigBuilder::default()
        .locator(ScriptedLocator::new(vec![vec![test_helpers::centered_face()], Vec::new()]))
        .build();
    rig.recognition.start(StartOptions::default())?;
    let frame = test_frame();

    rig.cycle(&frame, Instant::now());
    assert!(rig.recognition.categorical_data().is_some());

    let report = rig.cycle(&frame, Instant::now());
    assert_eq!(report.faces, 0);
    assert!(rig.recognition.categorical_data().is_none());
    assert!(rig.recognition.dimensional_data().is_none());
    assert!(rig.recognition.highest_matching_emotion().is_none());
    Ok(())
}

#[test]
fn test_fear_score_above_threshold_selects_fear() -> Result<()> {
    let mut scores = scores_with(6, 20.0);
    scores[0] = 70.0;
    let mut rig = RigBuilder::default().categorical(vec![scores]).build();
    rig.recognition.start(StartOptions::default())?;

    let report = rig.cycle(&test_frame(), Instant::now());

    assert_eq!(report.emotion, Some(Emotion::Fear));
    assert_eq!(rig.recognition.highest_matching_emotion(), Some(Emotion::Fear));
    let categorical = rig.recognition.categorical_data().unwrap();
    assert_eq!(categorical.score(Emotion::Neutral), Some(70.0));

    let dimensional = rig.recognition.dimensional_data().unwrap();
    assert!((dimensional.arousal().unwrap() - 25.0).abs() < 1e-4);
    assert!((dimensional.valence().unwrap() + 50.0).abs() < 1e-4);
    Ok(())
}

#[test]
fn test_sustained_happiness_speaks_once() -> Result<()> {
    let mut rig = RigBuilder::default()
        .voice(Language::English)
        .categorical(vec![scores_with(1, 90.0)])
        .build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    let spoken: Vec<_> = (0..10)
        .filter_map(|_| rig.cycle(&frame, Instant::now()).spoken)
        .collect();

    assert_eq!(entries(&rig.expressions), vec![Emotion::Happiness]);
    assert_eq!(spoken.len(), 1);
    assert!(phrases(Emotion::Happiness, Language::English).contains(&spoken[0]));

    let said = entries(&rig.said);
    assert_eq!(said.len(), 1);
    assert_eq!(said[0], (spoken[0].to_string(), Language::English));
    Ok(())
}

#[test]
fn test_speech_fires_on_fourth_consecutive_frame() -> Result<()> {
    let mut rig = RigBuilder::default()
        .voice(Language::German)
        .categorical(vec![scores_with(4, 30.0)])
        .build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    let reports: Vec<_> = (0..5)
        .map(|_| rig.cycle(&frame, Instant::now()))
        .collect();

    assert!(reports[..3].iter().all(|r| r.spoken.is_none()));
    let phrase = reports[3].spoken.unwrap();
    assert!(phrases(Emotion::Anger, Language::German).contains(&phrase));
    assert!(reports[4].spoken.is_none());
    Ok(())
}

#[test]
fn test_label_change_restarts_episode() -> Result<()> {
    let happy = scores_with(1, 90.0);
    let surprised = scores_with(2, 90.0);
    let mut rig = RigBuilder::default()
        .voice(Language::English)
        .categorical(vec![happy.clone(), happy.clone(), surprised, happy])
        .build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    for _ in 0..4 {
        rig.cycle(&frame, Instant::now());
    }

    assert_eq!(
        entries(&rig.expressions),
        vec![Emotion::Happiness, Emotion::Surprise, Emotion::Happiness]
    );
    assert_eq!(rig.recognition.tracking_state().repeat_count(), 0);
    assert!(entries(&rig.said).is_empty());
    Ok(())
}

#[test]
fn test_frame_without_face_keeps_episode() -> Result<()> {
    let face = test_helpers::centered_face();
    let mut rig = RigBuilder::default()
        .voice(Language::English)
        .categorical(vec![scores_with(2, 90.0)])
        .locator(ScriptedLocator::new(vec![
            vec![face],
            vec![face],
            Vec::new(),
            vec![face],
            vec![face],
        ]))
        .build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    for _ in 0..5 {
        rig.cycle(&frame, Instant::now());
    }

    assert_eq!(entries(&rig.expressions), vec![Emotion::Surprise]);
    assert_eq!(entries(&rig.said).len(), 1);
    Ok(())
}

#[test]
fn test_voice_disabled_is_silent() -> Result<()> {
    let mut rig = RigBuilder::default().categorical(vec![scores_with(1, 90.0)]).build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    for _ in 0..6 {
        assert!(rig.cycle(&frame, Instant::now()).spoken.is_none());
    }
    assert_eq!(entries(&rig.expressions), vec![Emotion::Happiness]);
    assert!(entries(&rig.said).is_empty());
    Ok(())
}

#[test]
fn test_mirroring_without_expression_output_is_skipped() -> Result<()> {
    let mut rig = RigBuilder::default()
        .voice(Language::English)
        .without_expression()
        .categorical(vec![scores_with(1, 90.0)])
        .build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    for _ in 0..6 {
        rig.cycle(&frame, Instant::now());
    }
    assert!(entries(&rig.said).is_empty());
    assert_eq!(rig.recognition.highest_matching_emotion(), Some(Emotion::Happiness));
    Ok(())
}

#[test]
fn test_lost_face_recovery_after_threshold() -> Result<()> {
    let mut rig = RigBuilder::default()
        .locator(ScriptedLocator::never())
        .random(FixedRandom { index: 0, value: 5 })
        .build();
    rig.recognition.start(TRACKING)?;
    let frame = test_frame();

    for _ in 0..50 {
        assert!(!rig.cycle(&frame, Instant::now()).head_recovered);
    }
    assert!(entries(&rig.moves).is_empty());
    assert_eq!(rig.recognition.tracking_state().not_found_counter(), 50);

    let report = rig.cycle(&frame, Instant::now());
    assert!(report.head_recovered);
    assert_eq!(rig.recognition.tracking_state().not_found_counter(), 0);
    assert_eq!(
        entries(&rig.moves),
        vec![
            RobotMove::Set {
                joint: HEAD_PAN_JOINT.to_string(),
                degrees: 5.0,
                speed: 0.01
            },
            RobotMove::Set {
                joint: HEAD_TILT_JOINT.to_string(),
                degrees: -25.0,
                speed: 0.01
            },
        ]
    );
    Ok(())
}

#[test]
fn test_found_face_resets_not_found_counter() -> Result<()> {
    let mut script = vec![Vec::new(); 30];
    script.push(vec![test_helpers::centered_face()]);
    script.extend(vec![Vec::new(); 30]);
    let mut rig = RigBuilder::default().locator(ScriptedLocator::new(script)).build();
    rig.recognition.start(TRACKING)?;
    let frame = test_frame();
    let start = Instant::now();

    for _ in 0..61 {
        assert!(!rig.cycle(&frame, start).head_recovered);
    }
    assert_eq!(rig.recognition.tracking_state().not_found_counter(), 30);
    Ok(())
}

#[test]
fn test_tracking_turns_head_towards_face() -> Result<()> {
    // Center (32, 240): pan (640 - 32) / 640 * 60 - 30 = 27, tilt 0
    let mut rig = RigBuilder::default()
        .locator(ScriptedLocator::always(FaceRegion::new(0, 208, 64, 64)))
        .build();
    rig.recognition.start(TRACKING)?;
    let frame = test_frame();
    let start = Instant::now();

    let report = rig.cycle(&frame, start);
    assert!(report.head_moved);

    let moves = entries(&rig.moves);
    assert_eq!(moves.len(), 2);
    match &moves[0] {
        RobotMove::Change { joint, degrees, speed } => {
            assert_eq!(joint, HEAD_PAN_JOINT);
            assert!((degrees - 27.0).abs() < 1e-9);
            assert!((speed - 0.03).abs() < 1e-12);
        }
        other => panic!("Expected a relative move, got {other:?}"),
    }
    match &moves[1] {
        RobotMove::Change { joint, degrees, .. } => {
            assert_eq!(joint, HEAD_TILT_JOINT);
            assert!(degrees.abs() < 1e-9);
        }
        other => panic!("Expected a relative move, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_tracking_waits_for_delta_and_settle_time() -> Result<()> {
    let mut rig = RigBuilder::default()
        .locator(ScriptedLocator::always(FaceRegion::new(0, 0, 64, 64)))
        .build();
    rig.recognition.start(TRACKING)?;
    let frame = test_frame();
    let start = Instant::now();

    // Evaluated on the first frame, then on every eleventh
    for _ in 0..11 {
        rig.cycle(&frame, start);
    }
    assert_eq!(entries(&rig.moves).len(), 2);
    assert_eq!(rig.recognition.tracking_state().tracking_counter(), 0);

    // Still settling
    let report = rig.cycle(&frame, start + Duration::from_millis(100));
    assert!(!report.head_moved);
    assert_eq!(entries(&rig.moves).len(), 2);

    for _ in 0..10 {
        rig.cycle(&frame, start + Duration::from_secs(2));
    }
    let report = rig.cycle(&frame, start + Duration::from_secs(2));
    assert!(report.head_moved);
    assert_eq!(entries(&rig.moves).len(), 4);
    Ok(())
}

#[test]
fn test_tracking_disabled_never_moves_head() -> Result<()> {
    let mut rig = RigBuilder::default().locator(ScriptedLocator::never()).build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    for _ in 0..60 {
        rig.cycle(&frame, Instant::now());
    }
    assert!(entries(&rig.moves).is_empty());
    assert_eq!(rig.recognition.tracking_state().not_found_counter(), 0);
    Ok(())
}

#[test]
fn test_tracking_without_robot_keeps_running() -> Result<()> {
    let mut rig = RigBuilder::default().without_robot().build();
    rig.recognition.start(TRACKING)?;

    let report = rig.cycle(&test_frame(), Instant::now());
    assert!(!report.head_moved);
    assert_eq!(report.faces, 1);
    assert!(rig.recognition.highest_matching_emotion().is_some());
    Ok(())
}

#[test]
fn test_frames_ignored_while_idle_or_invalid() -> Result<()> {
    let mut rig = RigBuilder::default().build();
    let frame = test_frame();

    assert!(rig.recognition.on_frame(true, Some(&frame)).is_none());
    assert_eq!(*rig.classifier_calls.lock().unwrap(), 0);

    rig.recognition.start(StartOptions::default())?;
    assert!(rig.recognition.on_frame(false, Some(&frame)).is_none());
    assert!(rig.recognition.on_frame(true, None).is_none());
    assert_eq!(*rig.classifier_calls.lock().unwrap(), 0);

    assert!(rig.recognition.on_frame(true, Some(&frame)).is_some());
    assert_eq!(*rig.classifier_calls.lock().unwrap(), 1);
    Ok(())
}

#[test]
fn test_run_stops_at_end_of_stream() -> Result<()> {
    let frame = test_frame();
    let mut rig = RigBuilder::default()
        .frames(vec![Some(frame.clone()), None, Some(frame)])
        .build();
    rig.recognition.start(StartOptions::default())?;

    rig.recognition.run()?;

    assert!(!rig.recognition.is_running());
    assert_eq!(*rig.classifier_calls.lock().unwrap(), 2);
    assert_eq!(rig.capture.lock().unwrap().closes, 1);
    Ok(())
}

#[test]
fn test_quit_key_stops_run() -> Result<()> {
    let frames = vec![Some(test_frame()); 5];
    let mut rig = RigBuilder::default()
        .frames(frames)
        .display_keys(vec![None, Some('q')])
        .build();
    rig.recognition.start(StartOptions {
        show_display: true,
        ..StartOptions::default()
    })?;

    rig.recognition.run()?;

    assert!(!rig.recognition.is_running());
    assert_eq!(entries(&rig.shown), vec![(1024, 768), (1024, 768)]);
    assert_eq!(*rig.display_closes.lock().unwrap(), 1);
    assert_eq!(*rig.classifier_calls.lock().unwrap(), 2);
    Ok(())
}

#[test]
fn test_stop_clears_state() -> Result<()> {
    let mut rig = RigBuilder::default().build();
    rig.recognition.start(MIRROR)?;
    rig.cycle(&test_frame(), Instant::now());
    assert!(rig.recognition.tracking_state().latest().is_some());

    rig.recognition.stop();
    assert!(rig.recognition.tracking_state().latest().is_none());
    assert!(rig.recognition.tracking_state().last_emotion().is_none());
    assert!(rig.recognition.highest_matching_emotion().is_none());

    // A new run starts a new episode
    rig.recognition.start(MIRROR)?;
    rig.cycle(&test_frame(), Instant::now());
    assert_eq!(entries(&rig.expressions), vec![Emotion::Neutral, Emotion::Neutral]);
    Ok(())
}

#[test]
fn test_failed_classification_clears_previous_result() -> Result<()> {
    let mut rig = RigBuilder::default()
        .categorical(vec![scores_with(1, 90.0)])
        .classifier_fails_after(1)
        .build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    assert_eq!(rig.cycle(&frame, Instant::now()).emotion, Some(Emotion::Happiness));

    let report = rig.cycle(&frame, Instant::now());
    assert_eq!(report.faces, 1);
    assert_eq!(report.emotion, None);
    assert!(rig.recognition.is_running());
    assert!(rig.recognition.highest_matching_emotion().is_none());
    assert!(rig.recognition.categorical_data().is_none());
    assert!(rig.recognition.dimensional_data().is_none());
    Ok(())
}

#[test]
fn test_direct_cycle_ignored_while_idle() -> Result<()> {
    let mut rig = RigBuilder::default().build();
    let frame = test_frame();

    assert!(rig.recognition.process_frame_at(&frame, Instant::now()).is_none());
    assert_eq!(*rig.classifier_calls.lock().unwrap(), 0);
    assert!(rig.recognition.tracking_state().latest().is_none());

    rig.recognition.start(MIRROR)?;
    rig.cycle(&frame, Instant::now());
    rig.recognition.stop();

    assert!(rig.recognition.process_frame_at(&frame, Instant::now()).is_none());
    assert_eq!(*rig.classifier_calls.lock().unwrap(), 1);
    assert!(rig.recognition.tracking_state().latest().is_none());
    Ok(())
}

#[test]
fn test_robot_failure_keeps_cycle_running() -> Result<()> {
    let mut rig = RigBuilder::default().failing_robot().build();
    rig.recognition.start(TRACKING)?;

    let report = rig.cycle(&test_frame(), Instant::now());
    assert!(!report.head_moved);
    assert_eq!(report.emotion, Some(Emotion::Neutral));
    assert!(rig.recognition.highest_matching_emotion().is_some());
    Ok(())
}

#[test]
fn test_expression_failure_still_speaks() -> Result<()> {
    let mut rig = RigBuilder::default()
        .voice(Language::English)
        .failing_expression()
        .categorical(vec![scores_with(1, 90.0)])
        .build();
    rig.recognition.start(MIRROR)?;
    let frame = test_frame();

    for _ in 0..5 {
        rig.cycle(&frame, Instant::now());
    }
    assert!(entries(&rig.expressions).is_empty());
    assert_eq!(entries(&rig.said).len(), 1);
    Ok(())
}

#[test]
fn test_display_failure_keeps_cycle_running() -> Result<()> {
    let mut rig = RigBuilder::default().failing_display().build();
    rig.recognition.start(StartOptions {
        show_display: true,
        ..StartOptions::default()
    })?;

    let report = rig.cycle(&test_frame(), Instant::now());
    assert!(!report.quit_requested);
    assert_eq!(report.emotion, Some(Emotion::Neutral));
    assert!(rig.recognition.is_running());
    assert!(entries(&rig.shown).is_empty());
    Ok(())
}
