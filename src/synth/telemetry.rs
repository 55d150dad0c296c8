use rtrb::Producer;

/// One sample tick as seen by an oscilloscope.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScopeFrame {
    /// Final output sample.
    pub out: f32,
    /// Velocity gain times the amplitude envelope.
    pub amplitude: f32,
    /// Filter envelope level, before sensitivity scaling.
    pub filter_control: f32,
}

/// Receives one [`ScopeFrame`] per rendered sample.
///
/// Called from the audio thread, so implementations must not block. There
/// is no backpressure: a sink that cannot keep up drops frames.
pub trait TelemetrySink {
    fn log(&mut self, frame: ScopeFrame);
}

/// Discard everything.
impl TelemetrySink for () {
    #[inline]
    fn log(&mut self, _frame: ScopeFrame) {}
}

/// Realtime-safe hand-off to another thread. Frames are dropped when full.
impl TelemetrySink for Producer<ScopeFrame> {
    #[inline]
    fn log(&mut self, frame: ScopeFrame) {
        let _ = self.push(frame);
    }
}

/// Offline capture. Allocates, so keep it off the audio thread.
impl TelemetrySink for Vec<ScopeFrame> {
    fn log(&mut self, frame: ScopeFrame) {
        self.push(frame);
    }
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for &mut T {
    #[inline]
    fn log(&mut self, frame: ScopeFrame) {
        (**self).log(frame)
    }
}
