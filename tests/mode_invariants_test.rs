//! Pass-through, mode exclusivity and presence invariants of the recorder.

mod common;

use common::builders::RecorderGraphBuilder;
use common::moved;
use inputrec_rs::graph::{names, DeviceInput};
use inputrec_rs::session::{FrameReader, FrameWriter, SessionMetadata, SessionMode};
use inputrec_rs::{ButtonEvent, Point2, RecorderError};

#[test]
fn test_idle_forwards_source_output_unchanged() {
    let mut rg = RecorderGraphBuilder::new().build();
    rg.send([
        moved((0.25, -0.25), (500.0, 375.0)),
        DeviceInput::Resized {
            width: 800.0,
            height: 600.0,
        },
        DeviceInput::Button(ButtonEvent::press(1, 0.5)),
    ]);
    rg.graph.traverse();

    let seen = rg.drain();
    assert_eq!(seen.len(), 1);
    let source = rg.graph.find("pointer").unwrap();
    assert_eq!(&seen[0], rg.graph.outputs(source).unwrap());
}

#[test]
fn test_pixel_size_passes_through_in_every_mode() {
    let mut rg = RecorderGraphBuilder::new().build();
    let pixel_size = rg.port(names::PIXEL_SIZE);
    let mut controller = rg.controller();
    rg.send([DeviceInput::Resized {
        width: 1024.0,
        height: 768.0,
    }]);

    // Idle
    controller.step(&mut rg.graph).unwrap();
    // Recording
    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("sizes"))
        .unwrap();
    controller.step(&mut rg.graph).unwrap();
    controller.stop(&mut rg.graph);
    // Playing, with the window resized in between
    let session = controller.take_session().unwrap().unwrap();
    controller.begin_playback(&mut rg.graph, session).unwrap();
    rg.send([DeviceInput::Resized {
        width: 640.0,
        height: 480.0,
    }]);
    controller.step(&mut rg.graph).unwrap();

    let sizes: Vec<_> = rg.drain().iter().map(|v| v.vec2(pixel_size)).collect();
    assert_eq!(
        sizes,
        vec![
            Some(Point2::new(1024.0, 768.0)),
            Some(Point2::new(1024.0, 768.0)),
            Some(Point2::new(640.0, 480.0)),
        ]
    );
}

#[test]
fn test_frame_io_outside_matching_mode() {
    let mut rg = RecorderGraphBuilder::new().build();
    let err = rg.recorder().write_frame(&mut FrameWriter::new()).unwrap_err();
    assert!(matches!(
        err,
        RecorderError::ModeMisuse {
            expected: SessionMode::Recording,
            actual: SessionMode::Idle
        }
    ));

    rg.recorder().attach(SessionMode::Recording);
    let bytes = [0u8, 0, 0, 0, 0];
    let err = rg.recorder().read_frame(&mut FrameReader::new(&bytes)).unwrap_err();
    assert!(matches!(
        err,
        RecorderError::ModeMisuse {
            expected: SessionMode::Playing,
            actual: SessionMode::Recording
        }
    ));
}

#[test]
fn test_no_stale_events_after_restart() {
    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();

    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("aborted"))
        .unwrap();
    rg.send([DeviceInput::Button(ButtonEvent::press(3, 0.0))]);
    // Traverse without recording: the press stays pending.
    rg.graph.traverse();
    controller.stop(&mut rg.graph);

    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("clean"))
        .unwrap();
    controller.step(&mut rg.graph).unwrap();
    controller.stop(&mut rg.graph);

    let session = controller.take_session().unwrap().unwrap();
    let payload = session.frames[0].payload(0).unwrap();
    let mut r = FrameReader::new(payload);
    assert!(!r.read_bool().unwrap());
    assert!(r.read_button_events().unwrap().is_empty());
    assert!(r.is_at_end());
}

#[test]
fn test_switching_to_playback_stops_recording() {
    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();
    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("first"))
        .unwrap();
    rg.send([moved((0.0, 0.0), (1.0, 1.0))]);
    controller.step(&mut rg.graph).unwrap();
    let recorded = controller.session().unwrap().clone();

    controller.begin_playback(&mut rg.graph, recorded).unwrap();
    assert_eq!(controller.mode(), SessionMode::Playing);
    assert_eq!(rg.recorder_mode(), SessionMode::Playing);
    assert!(controller.record_frame(&mut rg.graph).is_err());
}

#[test]
fn test_missing_pointer_source_records_absent_frames() {
    let mut rg = RecorderGraphBuilder::new().without_source().build();
    let mut controller = rg.controller();
    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("no device"))
        .unwrap();
    for _ in 0..3 {
        controller.step(&mut rg.graph).unwrap();
    }
    controller.stop(&mut rg.graph);

    let session = controller.take_session().unwrap().unwrap();
    for frame in &session.frames {
        // has_pointer = false, button count = 0, nothing else.
        assert_eq!(frame.payload(0), Some(&[0u8, 0, 0, 0, 0][..]));
    }

    let xy = rg.port(names::XY);
    for values in rg.drain() {
        assert!(!values.has(xy));
    }
}

#[test]
fn test_absent_frame_advances_only_by_button_list() {
    let mut rg = RecorderGraphBuilder::new().build();
    let mut controller = rg.controller();
    controller
        .begin_recording(&mut rg.graph, SessionMetadata::new("absent"))
        .unwrap();
    rg.send([
        DeviceInput::Left,
        DeviceInput::Button(ButtonEvent::repeat(8, 1.5)),
    ]);
    controller.step(&mut rg.graph).unwrap();
    controller.stop(&mut rg.graph);

    let session = controller.take_session().unwrap().unwrap();
    let payload = session.frames[0].payload(0).unwrap();
    let mut r = FrameReader::new(payload);
    assert!(!r.read_bool().unwrap());
    assert_eq!(r.position(), 1);
    let events = r.read_button_events().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(r.position(), 1 + 4 + 11);
    assert!(r.is_at_end());
    common::assert_float_eq(events.as_slice()[0].time, 1.5, 1e-12);
}
