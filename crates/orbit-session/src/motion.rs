// Latest-value cell between the sensor callback and the frame tick.
//
// The sensor publishes on its own thread; the frame tick reads on the draw
// thread. A triple buffer gives each side its own slot, so a reader always
// sees a whole sample and never blocks the sensor.

/// Three-axis gravity reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MotionSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Producer half, handed to the sensor listener.
pub struct MotionSink {
    input: triple_buffer::Input<MotionSample>,
}

/// Consumer half, owned by the frame driver.
pub struct MotionSource {
    output: triple_buffer::Output<MotionSample>,
}

/// Create a connected sink/source pair. Until the first publish the source
/// yields a zero sample.
pub fn motion_channel() -> (MotionSink, MotionSource) {
    let (input, output) = triple_buffer::triple_buffer(&MotionSample::default());
    (MotionSink { input }, MotionSource { output })
}

impl MotionSink {
    pub fn publish(&mut self, sample: MotionSample) {
        self.input.write(sample);
    }
}

impl MotionSource {
    /// Most recently published sample. Older unread samples are discarded.
    pub fn latest(&mut self) -> MotionSample {
        *self.output.read()
    }

    /// Whether a sample arrived since the last `latest()` call.
    pub fn has_new(&self) -> bool {
        self.output.updated()
    }
}

impl std::fmt::Debug for MotionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionSink").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for MotionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionSource").finish_non_exhaustive()
    }
}
