//=========================================================================
// Scene Test Harness
//=========================================================================

use crate::core::camera::CameraPlacementEngine;
use crate::core::host::mock::{MockFade, MockHost, MockRig, MoveLog};
use crate::core::input::{input_channel, HostInputEnd, InputSink, SyntheticInput};
use crate::core::settings::Settings;

use super::FrameContext;

/// Owns everything a [`FrameContext`] borrows.
pub struct Harness {
    pub settings: Settings,
    pub camera: CameraPlacementEngine,
    pub moves: MoveLog,
    pub input: InputSink,
    pub host_end: HostInputEnd,
    pub host: MockHost,
    pub frame: u64,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_channel_capacity(64)
    }

    pub fn with_channel_capacity(capacity: usize) -> Self {
        let rig = MockRig::default();
        let moves = rig.moves.clone();
        let (input, host_end) = input_channel(capacity);
        Self {
            settings: Settings::default(),
            camera: CameraPlacementEngine::new(Box::new(rig), Box::new(MockFade::default())),
            moves,
            input,
            host_end,
            host: MockHost::new(),
            frame: 0,
        }
    }

    pub fn cx(&mut self) -> FrameContext<'_> {
        FrameContext {
            frame: self.frame,
            settings: &self.settings,
            camera: &mut self.camera,
            input: &mut self.input,
            host: &mut self.host,
        }
    }

    /// Advances the frame counter and returns the new context.
    pub fn next(&mut self) -> FrameContext<'_> {
        self.frame += 1;
        self.cx()
    }

    pub fn sent(&self) -> Vec<SyntheticInput> {
        self.host_end.inputs.try_iter().collect()
    }
}
