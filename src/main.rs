//! inputrec: record a synthetic pointer session to a file, or replay one.
//!
//! ```text
//! inputrec [--config <path>] record <file> [--frames <n>]
//! inputrec [--config <path>] play <file>
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use crossbeam_channel::{Receiver, Sender};
use inputrec_rs::config::Config;
use inputrec_rs::events::{ButtonEvent, Point2};
use inputrec_rs::graph::{
    names, DataGraph, DeviceInput, EventLog, LoggedFrame, PointerSource, PortKind,
};
use inputrec_rs::recorder::MouseRecorder;
use inputrec_rs::session::{PlaybackController, SessionFile, SessionMetadata};

const DEFAULT_FRAMES: usize = 120;

#[derive(Debug, Clone, Parser)]
#[command(name = "inputrec")]
#[command(about = "Record or replay a pointer input session")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Record a synthetic pointer session to a file
    Record {
        path: PathBuf,
        #[arg(long, default_value_t = DEFAULT_FRAMES)]
        frames: usize,
    },
    /// Replay a session file and print its button events
    Play { path: PathBuf },
}
const WINDOW: (f32, f32) = (800.0, 600.0);

struct Pipeline {
    graph: DataGraph,
    input: Sender<DeviceInput>,
    log: Receiver<LoggedFrame>,
}

fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let mut graph = DataGraph::new();
    let (source, input) = PointerSource::new(graph.ports_mut(), "pointer")?;
    let source = graph.add_root(Box::new(source))?;
    let mouse = MouseRecorder::new(graph.ports_mut(), "mouse", &config.recorder)?;
    let mouse = graph.add_child(source, Box::new(mouse))?;
    let (log_node, log) = EventLog::new("log");
    graph.add_child(mouse, Box::new(log_node))?;
    Ok(Pipeline { graph, input, log })
}

/// Pointer sweeping a circle, with a click every 30 frames.
fn synthetic_input(frame: usize) -> Vec<DeviceInput> {
    let angle = frame as f32 * 0.05;
    let xy = Point2::new(angle.cos() * 0.5, angle.sin() * 0.5);
    let pixel_xy = Point2::new((xy.x + 1.0) * 0.5 * WINDOW.0, (1.0 - xy.y) * 0.5 * WINDOW.1);
    let time = frame as f64 / 60.0;

    let mut input = vec![DeviceInput::Moved { xy, pixel_xy }];
    match frame % 30 {
        0 => input.push(DeviceInput::Button(ButtonEvent::press(0, time))),
        5 => input.push(DeviceInput::Button(ButtonEvent::release(0, time))),
        _ => {}
    }
    input
}

fn record(config: &Config, path: &Path, frames: usize) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(config)?;
    pipeline
        .input
        .send(DeviceInput::Resized {
            width: WINDOW.0,
            height: WINDOW.1,
        })
        .context("pointer source disconnected")?;

    let mut controller = PlaybackController::discover(&mut pipeline.graph, config.session.clone())?;
    controller.begin_recording(
        &mut pipeline.graph,
        SessionMetadata::new("synthetic").with_description("circular sweep with periodic clicks"),
    )?;

    for frame in 0..frames {
        for input in synthetic_input(frame) {
            pipeline.input.send(input).context("pointer source disconnected")?;
        }
        controller.step(&mut pipeline.graph)?;
        if !controller.mode().is_recording() {
            break;
        }
    }
    controller.stop(&mut pipeline.graph);

    let Some(session) = controller.take_session()? else {
        bail!("no session was recorded");
    };
    SessionFile::new(path).save(&session)?;
    println!("Recorded {} frames to {}", session.frame_count(), path.display());
    Ok(())
}

fn play(config: &Config, path: &Path) -> anyhow::Result<()> {
    let session = SessionFile::new(path).load()?;
    let mut pipeline = build_pipeline(config)?;
    let xy = pipeline.graph.ports().lookup_kind(names::XY, PortKind::Vec2)?;
    let buttons = pipeline
        .graph
        .ports()
        .lookup_kind(names::BUTTON_EVENTS, PortKind::ButtonEvents)?;

    let mut controller = PlaybackController::discover(&mut pipeline.graph, config.session.clone())?;
    controller.begin_playback(&mut pipeline.graph, session)?;

    while controller.play_frame(&mut pipeline.graph)? {
        pipeline.graph.traverse();
        for logged in pipeline.log.try_iter() {
            let position = logged
                .values
                .vec2(xy)
                .map_or_else(|| "absent".to_string(), |p| p.to_string());
            let events = logged
                .values
                .button_events(buttons)
                .map(|list| list.iter().map(ToString::to_string).collect::<Vec<_>>())
                .unwrap_or_default();
            if events.is_empty() {
                tracing::debug!("frame {}: pointer {}", logged.frame, position);
            } else {
                println!("frame {}: pointer {} {}", logged.frame, position, events.join(", "));
            }
        }
    }
    println!("Replayed {} frames from {}", controller.frame_index(), path.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_or_default(),
    };
    inputrec_rs::logging::init(&config.logging)?;

    match &cli.command {
        Command::Record { path, frames } => record(&config, path, *frames),
        Command::Play { path } => play(&config, path),
    }
}
