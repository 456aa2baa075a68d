//! Record a session through a live graph, persist it, and replay it.

mod common;

use common::builders::RecorderGraphBuilder;
use common::{moved, three_frame_script};
use inputrec_rs::config::ForwardPolicy;
use inputrec_rs::graph::{names, DeviceInput, PortValues};
use inputrec_rs::session::{
    RecorderEntry, Session, SessionFile, SessionMetadata, SessionMode,
};
use inputrec_rs::{Point2, RecorderError};

/// Record `script` (one entry per frame) and return the session plus what the sink saw.
fn record(script: Vec<Vec<DeviceInput>>) -> (Session, Vec<PortValues>) {
    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();
    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("three frames"))
        .unwrap();

    for inputs in script {
        rg.send(inputs);
        controller.step(&mut rg.graph).unwrap();
    }
    controller.stop(&mut rg.graph);

    let session = controller.take_session().unwrap().unwrap();
    (session, rg.drain())
}

#[test]
fn test_three_frame_session_round_trip() {
    let (session, live) = record(three_frame_script());
    assert_eq!(session.frame_count(), 3);
    assert_eq!(session.metadata().frame_count, 3);

    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("three.irec"));
    file.save(&session).unwrap();
    let loaded = file.load().unwrap();
    assert_eq!(loaded, session);

    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();
    controller.begin_playback(&mut rg.graph, loaded).unwrap();
    assert_eq!(rg.recorder_mode(), SessionMode::Playing);

    while controller.play_frame(&mut rg.graph).unwrap() {
        rg.graph.traverse();
    }
    assert_eq!(controller.frame_index(), 3);
    assert_eq!(controller.mode(), SessionMode::Idle);
    assert_eq!(rg.recorder_mode(), SessionMode::Idle);

    let replayed = rg.drain();
    assert_eq!(replayed, live);

    let xy = rg.port(names::XY);
    let pixel_xy = rg.port(names::PIXEL_XY);
    let buttons = rg.port(names::BUTTON_EVENTS);
    assert_eq!(replayed[0].vec2(xy), Some(Point2::new(0.1, 0.2)));
    assert_eq!(replayed[0].vec2(pixel_xy), Some(Point2::new(12.0, 34.0)));
    assert_eq!(replayed[0].button_events(buttons).unwrap().len(), 1);
    assert!(!replayed[1].has(xy));
    assert!(!replayed[1].has(pixel_xy));
    assert!(replayed[1].button_events(buttons).unwrap().is_empty());
    assert_eq!(replayed[2].vec2(pixel_xy), Some(Point2::new(100.0, 100.0)));
    assert_eq!(replayed[2].button_events(buttons).unwrap().len(), 2);
}

#[test]
fn test_playback_is_deterministic() {
    let (session, _) = record(three_frame_script());
    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();

    let mut runs = Vec::new();
    for _ in 0..2 {
        controller
            .begin_playback(&mut rg.graph, session.clone())
            .unwrap();
        while controller.play_frame(&mut rg.graph).unwrap() {
            rg.graph.traverse();
        }
        runs.push(rg.drain());
    }
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn test_playback_ignores_live_input() {
    let (session, live) = record(three_frame_script());
    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();
    controller.begin_playback(&mut rg.graph, session).unwrap();

    for i in 0..3 {
        rg.send([
            moved((-0.9, -0.9), (1.0, 1.0)),
            DeviceInput::Button(inputrec_rs::ButtonEvent::press(99, i as f64)),
        ]);
        controller.step(&mut rg.graph).unwrap();
    }
    assert_eq!(rg.drain(), live);
}

#[test]
fn test_unknown_recorder_is_skipped() {
    let (session, _) = record(three_frame_script());
    let mut rg = RecorderGraphBuilder::new().recorder_name("other").build();
    let mut controller = rg.controller();
    controller.begin_playback(&mut rg.graph, session).unwrap();
    // Nothing bound: the recorder stays live.
    assert_eq!(rg.recorder_mode(), SessionMode::Idle);

    rg.send([moved((0.3, 0.3), (3.0, 3.0))]);
    assert!(controller.play_frame(&mut rg.graph).unwrap());
    rg.graph.traverse();

    let seen = rg.drain();
    assert_eq!(seen[0].vec2(rg.port(names::XY)), Some(Point2::new(0.3, 0.3)));
}

#[test]
fn test_type_tag_mismatch_is_rejected() {
    let mut session = Session::new(SessionMetadata::new("keyboard"));
    session.header.recorders.push(RecorderEntry {
        name: "mouse".to_string(),
        type_tag: "KeyboardRecorder".to_string(),
    });

    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();
    let err = controller.begin_playback(&mut rg.graph, session).unwrap_err();
    match err {
        RecorderError::RecorderMismatch { name, expected, found } => {
            assert_eq!(name, "mouse");
            assert_eq!(expected, "MouseRecorder");
            assert_eq!(found, "KeyboardRecorder");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(rg.recorder_mode(), SessionMode::Idle);
}

#[test]
fn test_max_frames_limits_recording() {
    let mut rg = RecorderGraphBuilder::new().max_frames(2).build();
    let mut controller = rg.controller();
    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("capped"))
        .unwrap();

    for inputs in three_frame_script() {
        rg.send(inputs);
        controller.step(&mut rg.graph).unwrap();
    }
    assert_eq!(controller.mode(), SessionMode::Idle);
    assert_eq!(rg.recorder_mode(), SessionMode::Idle);

    let session = controller.take_session().unwrap().unwrap();
    assert_eq!(session.frame_count(), 2);
    assert_eq!(session.metadata().frame_count, 2);
}

#[test]
fn test_on_change_recording_after_idle_matches_replay() {
    let mut rg = RecorderGraphBuilder::new()
        .forward_policy(ForwardPolicy::OnChange)
        .build();
    rg.send(vec![moved((0.5, 0.5), (50.0, 50.0))]);
    rg.graph.traverse();
    let idle = rg.drain();
    assert_eq!(idle.len(), 1);

    let mut controller = rg.controller();
    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("after idle"))
        .unwrap();
    controller.step(&mut rg.graph).unwrap();
    controller.step(&mut rg.graph).unwrap();
    controller.stop(&mut rg.graph);
    let session = controller.take_session().unwrap().unwrap();
    let live = rg.drain();

    let xy = rg.port(names::XY);
    assert_eq!(live[0].vec2(xy), Some(Point2::new(0.5, 0.5)));
    assert!(!live[1].has(xy));

    let mut replay = RecorderGraphBuilder::new()
        .forward_policy(ForwardPolicy::OnChange)
        .build();
    let mut controller = replay.controller();
    controller.begin_playback(&mut replay.graph, session).unwrap();
    while controller.play_frame(&mut replay.graph).unwrap() {
        replay.graph.traverse();
    }
    assert_eq!(replay.drain(), live);
}
