//! Test data builders for creating test graphs

use crossbeam_channel::{Receiver, Sender};
use inputrec_rs::config::{Config, ForwardPolicy};
use inputrec_rs::graph::{
    DataGraph, DeviceInput, EventLog, LoggedFrame, NodeId, PointerSource, PortHandle, PortValues,
};
use inputrec_rs::recorder::MouseRecorder;
use inputrec_rs::session::{PlaybackController, Recordable, SessionMode};

/// `PointerSource -> MouseRecorder -> EventLog`, or without the source.
pub struct RecorderGraph {
    pub graph: DataGraph,
    pub input: Option<Sender<DeviceInput>>,
    pub log: Receiver<LoggedFrame>,
    pub mouse: NodeId,
    pub config: Config,
}

impl RecorderGraph {
    /// Controller over every recorder of the graph
    pub fn controller(&mut self) -> PlaybackController {
        PlaybackController::discover(&mut self.graph, self.config.session.clone()).unwrap()
    }

    /// Queue device input for the next step
    pub fn send(&self, inputs: impl IntoIterator<Item = DeviceInput>) {
        let tx = self.input.as_ref().expect("graph was built without a pointer source");
        for input in inputs {
            tx.send(input).unwrap();
        }
    }

    /// Values the sink saw, one entry per step since the last drain
    pub fn drain(&self) -> Vec<PortValues> {
        self.log.try_iter().map(|f| f.values).collect()
    }

    pub fn port(&self, name: &str) -> PortHandle {
        self.graph.ports().lookup(name).unwrap()
    }

    pub fn recorder(&mut self) -> &mut dyn Recordable {
        self.graph.recordable_mut(self.mouse).unwrap()
    }

    pub fn recorder_mode(&mut self) -> SessionMode {
        self.recorder().mode()
    }
}

/// Builder for creating test recorder graphs
pub struct RecorderGraphBuilder {
    config: Config,
    with_source: bool,
    recorder_name: String,
}

impl RecorderGraphBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            with_source: true,
            recorder_name: "mouse".to_string(),
        }
    }

    pub fn forward_policy(mut self, policy: ForwardPolicy) -> Self {
        self.config.recorder.forward_policy = policy;
        self
    }

    pub fn max_frames(mut self, max_frames: usize) -> Self {
        self.config.session.max_frames = max_frames;
        self
    }

    /// No pointing device: the recorder is a root node.
    pub fn without_source(mut self) -> Self {
        self.with_source = false;
        self
    }

    pub fn recorder_name(mut self, name: &str) -> Self {
        self.recorder_name = name.to_string();
        self
    }

    pub fn build(self) -> RecorderGraph {
        let mut graph = DataGraph::new();

        let (source, input) = if self.with_source {
            let (node, tx) = PointerSource::new(graph.ports_mut(), "pointer").unwrap();
            (Some(graph.add_root(Box::new(node)).unwrap()), Some(tx))
        } else {
            (None, None)
        };

        let recorder =
            MouseRecorder::new(graph.ports_mut(), self.recorder_name, &self.config.recorder).unwrap();
        let mouse = match source {
            Some(source) => graph.add_child(source, Box::new(recorder)).unwrap(),
            None => graph.add_root(Box::new(recorder)).unwrap(),
        };

        let (sink, log) = EventLog::new("log");
        graph.add_child(mouse, Box::new(sink)).unwrap();

        RecorderGraph {
            graph,
            input,
            log,
            mouse,
            config: self.config,
        }
    }
}

impl Default for RecorderGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_graph_builder() {
        let mut rg = RecorderGraphBuilder::new().max_frames(4).build();
        assert_eq!(rg.graph.len(), 3);
        assert_eq!(rg.config.session.max_frames, 4);
        assert_eq!(rg.recorder_mode(), SessionMode::Idle);
    }
}
