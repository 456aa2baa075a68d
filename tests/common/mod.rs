//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use inputrec_rs::events::{ButtonEvent, Point2};
use inputrec_rs::graph::DeviceInput;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Device input moving the pointer to `xy` / `pixel_xy`
pub fn moved(xy: (f32, f32), pixel_xy: (f32, f32)) -> DeviceInput {
    DeviceInput::Moved {
        xy: Point2::from(xy),
        pixel_xy: Point2::from(pixel_xy),
    }
}

/// The three frames used across the record/playback tests:
/// pointer present with one press, pointer absent with nothing, pointer
/// present again with two events.
pub fn three_frame_script() -> Vec<Vec<DeviceInput>> {
    vec![
        vec![
            moved((0.1, 0.2), (12.0, 34.0)),
            DeviceInput::Button(ButtonEvent::press(5, 0.01)),
        ],
        vec![DeviceInput::Left],
        vec![
            moved((0.5, 0.5), (100.0, 100.0)),
            DeviceInput::Button(ButtonEvent::release(5, 0.03)),
            DeviceInput::Button(ButtonEvent::press(6, 0.034)),
        ],
    ]
}
