//! Presentation sinks — consumers of emitted frames.

use crate::frame::PlaybackFrame;

/// Receives every frame the controller emits, in order.
///
/// Frames arrive at up to the tick rate and must not block; a sink that
/// needs to keep data clones the frame (views are reference-counted).
pub trait FrameSink {
    fn present(&mut self, frame: &PlaybackFrame);
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn present(&mut self, frame: &PlaybackFrame) {
        (**self).present(frame);
    }
}

/// Discards frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &PlaybackFrame) {}
}

/// Keeps only the most recent frame.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    frame: Option<PlaybackFrame>,
    received: usize,
}

impl LatestFrame {
    pub fn frame(&self) -> Option<&PlaybackFrame> {
        self.frame.as_ref()
    }

    /// Frames received so far.
    pub fn received(&self) -> usize {
        self.received
    }
}

impl FrameSink for LatestFrame {
    fn present(&mut self, frame: &PlaybackFrame) {
        self.frame = Some(frame.clone());
        self.received += 1;
    }
}

/// Keeps every frame. Intended for tests and short replays.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub frames: Vec<PlaybackFrame>,
}

impl FrameRecorder {
    pub fn last(&self) -> Option<&PlaybackFrame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Cursor of every recorded frame.
    pub fn cursors(&self) -> Vec<usize> {
        self.frames.iter().map(|f| f.cursor).collect()
    }
}

impl FrameSink for FrameRecorder {
    fn present(&mut self, frame: &PlaybackFrame) {
        self.frames.push(frame.clone());
    }
}
