//! Hand-tracking back-ends.
//!
//! Every back-end runs on its own thread and delivers [`DetectionResult`]s
//! over a bounded `mpsc` channel.  The frame loop drains the channel once per
//! frame and feeds each result through the hand position source, so consumers
//! never need to know whether results came from hardware, the mouse or a
//! script.  A back-end never blocks on a stalled frame loop: results that find
//! the channel full are dropped.

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hand_signal::{DetectionResult, Hand};
use tracing::{info, warn};

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

/// Detector options handed to every back-end.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Results never carry more hands than this.
    pub max_hands:                usize,
    /// Confidence a hand needs to be picked up.
    pub min_detection_confidence: f32,
    /// Confidence an already tracked hand needs to stay tracked.
    pub min_tracking_confidence:  f32,
    /// Capture resolution; synthetic back-ends snap landmarks to its pixel grid.
    pub capture_width:            u32,
    pub capture_height:           u32,
    /// Results per second for the synthetic back-ends.
    pub rate_hz:                  u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_hands:                1,
            min_detection_confidence: 0.5,
            min_tracking_confidence:  0.5,
            capture_width:            640,
            capture_height:           480,
            rate_hz:                  30,
        }
    }
}

impl TrackerConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.rate_hz.max(1)))
    }

    /// Snap a normalised image point to the capture pixel grid.
    pub fn quantise(&self, x: f32, y: f32) -> (f32, f32) {
        let w = self.capture_width.max(1) as f32;
        let h = self.capture_height.max(1) as f32;
        ((x * w).round() / w, (y * h).round() / h)
    }

    /// Whether a hand with this confidence belongs in the result.  A hand
    /// seen in the previous frame only has to clear the tracking threshold.
    pub fn admits(&self, confidence: f32, was_tracked: bool) -> bool {
        let threshold = if was_tracked {
            self.min_tracking_confidence
        } else {
            self.min_detection_confidence
        };
        confidence >= threshold
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StopFlag
// ════════════════════════════════════════════════════════════════════════════

/// Shared "please exit" flag polled by back-end threads.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self { Self::default() }

    pub fn raise(&self) { self.0.store(true, Ordering::SeqCst); }

    pub fn is_raised(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`DetectionResult`]s over a channel.
///
/// `run` must return promptly once `stop` is raised or the receiver is gone.
pub trait HandSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn run(self: Box<Self>, tx: SyncSender<DetectionResult>, stop: StopFlag);
}

// ════════════════════════════════════════════════════════════════════════════
// TrackerHandle
// ════════════════════════════════════════════════════════════════════════════

/// Results pulled off the channel in one frame.
#[derive(Debug, Default)]
pub struct Drained {
    pub results:      Vec<DetectionResult>,
    /// The back-end thread has exited; no more results will arrive.
    pub disconnected: bool,
}

/// Owns a running back-end: its receiver, stop flag and thread.
///
/// Dropping the handle stops and joins the thread.
pub struct TrackerHandle {
    name:   &'static str,
    rx:     Receiver<DetectionResult>,
    stop:   StopFlag,
    thread: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    pub fn name(&self) -> &'static str { self.name }

    /// Take everything queued so far, in arrival order.
    pub fn drain(&self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.rx.try_recv() {
                Ok(result) => drained.results.push(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    drained.disconnected = true;
                    break;
                }
            }
        }
        drained
    }

    /// Raise the stop flag and wait for the thread.  Idempotent.
    pub fn shutdown(&mut self) {
        self.stop.raise();
        if let Some(thread) = self.thread.take() {
            match thread.join() {
                Ok(())  => info!(source = self.name, "hand tracker stopped"),
                Err(_)  => warn!(source = self.name, "hand tracker thread panicked"),
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().map_or(false, |t| !t.is_finished())
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Results the channel holds before a back-end starts dropping them.
pub const RESULT_BACKLOG: usize = 1;

/// Spawn a back-end on its own thread.
pub fn spawn_hand_source(source: Box<dyn HandSource>) -> TrackerHandle {
    let (tx, rx) = mpsc::sync_channel(RESULT_BACKLOG);
    let stop = StopFlag::new();
    let name = source.name();
    let thread_stop = stop.clone();
    let thread = thread::spawn(move || source.run(tx, thread_stop));
    info!(source = name, "hand tracker started");
    TrackerHandle { name, rx, stop, thread: Some(thread) }
}

/// Offer a result to the frame loop without blocking.  Returns false once the
/// receiver is gone.
pub fn deliver(tx: &SyncSender<DetectionResult>, result: DetectionResult) -> bool {
    match tx.try_send(result) {
        Ok(()) | Err(TrySendError::Full(_)) => true,
        Err(TrySendError::Disconnected(_))  => false,
    }
}

/// Sleep until `next`, then move it one period on.  Skips missed ticks
/// instead of bursting to catch up.
fn pace(next: &mut Instant, period: Duration) {
    let now = Instant::now();
    if *next > now {
        thread::sleep(*next - now);
        *next += period;
    } else {
        *next = now + period;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw pointer event from the visualizer window.
///
/// Coordinates are window-normalised: `(0, 0)` top-left, `(1, 1)` bottom-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    At { x: f32, y: f32, engaged: bool },
    /// Pointer left the window.
    Away,
    ToggleSecondHand,
}

/// Back-end driven by [`PointerInput`] events from the window.
///
/// The window shows a mirrored, selfie-style view, so the pointer is flipped
/// horizontally before it becomes an image-space landmark.  The pointer only
/// counts as a hand while engaged (left button held) unless `hover` is set.
pub struct SimHandSource {
    pub rx:    Receiver<PointerInput>,
    pub cfg:   TrackerConfig,
    pub hover: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct PointerState {
    at:      Option<(f32, f32)>,
    engaged: bool,
    second:  bool,
}

impl PointerState {
    fn apply(&mut self, input: PointerInput) {
        match input {
            PointerInput::At { x, y, engaged } => {
                self.at = Some((x, y));
                self.engaged = engaged;
            }
            PointerInput::Away => {
                self.at = None;
                self.engaged = false;
            }
            PointerInput::ToggleSecondHand => self.second = !self.second,
        }
    }

    fn hand_at(&self, hover: bool) -> Option<(f32, f32)> {
        self.at.filter(|_| hover || self.engaged)
    }
}

/// The result a camera would report for a pointer at window position
/// `pointer`.  The optional second hand sits at the mirror-opposite point and
/// is listed after the first, then the list is cut to `max_hands`.
pub fn synthetic_result(
    pointer: Option<(f32, f32)>,
    second:  bool,
    cfg:     &TrackerConfig,
) -> DetectionResult {
    let mut result = DetectionResult::empty();
    if let Some((px, py)) = pointer {
        let (x, y) = cfg.quantise(1.0 - px, py);
        result.hands.push(Hand::uniform(x, y));
        if second {
            let (x2, y2) = cfg.quantise(px, 1.0 - py);
            result.hands.push(Hand::uniform(x2, y2));
        }
    }
    result.truncate(cfg.max_hands);
    result
}

impl HandSource for SimHandSource {
    fn name(&self) -> &'static str { "sim" }

    fn run(self: Box<Self>, tx: SyncSender<DetectionResult>, stop: StopFlag) {
        let period = self.cfg.period();
        let mut state = PointerState::default();
        let mut next = Instant::now();

        while !stop.is_raised() {
            loop {
                match self.rx.try_recv() {
                    Ok(input) => state.apply(input),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            let result = synthetic_result(state.hand_at(self.hover), state.second, &self.cfg);
            if !deliver(&tx, result) { return; }
            pace(&mut next, period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// OrbitHandSource — scripted, unattended
// ════════════════════════════════════════════════════════════════════════════

/// Deterministic script: a hand circles the image centre for `present`,
/// then leaves for `absent`, forever.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitHandSource {
    pub cfg:     TrackerConfig,
    pub present: Duration,
    pub absent:  Duration,
    /// Circle radius in normalised image units.
    pub radius:  f32,
}

impl OrbitHandSource {
    pub fn new(cfg: TrackerConfig) -> Self {
        OrbitHandSource {
            cfg,
            present: Duration::from_secs(6),
            absent:  Duration::from_secs(3),
            radius:  0.3,
        }
    }

    /// What the script reports `elapsed` seconds after start.
    pub fn result_at(&self, elapsed: f64) -> DetectionResult {
        let present = self.present.as_secs_f64();
        let cycle = present + self.absent.as_secs_f64();
        if cycle <= 0.0 || present <= 0.0 {
            return DetectionResult::empty();
        }
        let phase = elapsed.rem_euclid(cycle);
        if phase >= present {
            return DetectionResult::empty();
        }
        let angle = TAU * (phase / present) as f32;
        let (x, y) = self.cfg.quantise(
            0.5 + self.radius * angle.cos(),
            0.5 + self.radius * angle.sin(),
        );
        let mut result = DetectionResult::single(Hand::uniform(x, y));
        result.truncate(self.cfg.max_hands);
        result
    }
}

impl HandSource for OrbitHandSource {
    fn name(&self) -> &'static str { "orbit" }

    fn run(self: Box<Self>, tx: SyncSender<DetectionResult>, stop: StopFlag) {
        let period = self.cfg.period();
        let start = Instant::now();
        let mut next = start;

        while !stop.is_raised() {
            let result = self.result_at(start.elapsed().as_secs_f64());
            if !deliver(&tx, result) { return; }
            pace(&mut next, period);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Back-end backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Leap reports millimetres in the device frame: `x` to the user's right,
/// `y` up from the device.  Positions are mapped into a virtual camera image
/// facing the user (so the user's right lands on the image's left) with
/// `X_RANGE` mm either side of centre and `Y_RANGE` mm above `Y_FLOOR`.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    pub cfg: TrackerConfig,
}

#[cfg(feature = "leap")]
impl LeapHandSource {
    const X_RANGE: f32 = 200.0;
    const Y_FLOOR: f32 = 100.0;
    const Y_RANGE: f32 = 300.0;

    fn to_image(&self, x_mm: f32, y_mm: f32, z_mm: f32) -> hand_signal::Landmark {
        let x = 0.5 - x_mm / (2.0 * Self::X_RANGE);
        let y = 1.0 - (y_mm - Self::Y_FLOOR) / Self::Y_RANGE;
        let (x, y) = self.cfg.quantise(x, y);
        hand_signal::Landmark::new(x, y, z_mm / (2.0 * Self::X_RANGE))
    }
}

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn name(&self) -> &'static str { "leap" }

    fn run(self: Box<Self>, tx: SyncSender<DetectionResult>, stop: StopFlag) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(_) => {
                warn!("failed to create LeapC connection");
                return;
            }
        };
        if connection.open().is_err() {
            warn!("failed to open LeapMotion device");
            return;
        }

        let mut tracked: Vec<u32> = Vec::new();

        while !stop.is_raised() {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut result = DetectionResult::empty();
                let mut kept = Vec::new();
                for hand in frame.hands() {
                    if !self.cfg.admits(hand.confidence, tracked.contains(&hand.id)) {
                        continue;
                    }
                    kept.push(hand.id);

                    let palm = hand.palm().position();
                    let rest = self.to_image(palm.x, palm.y, palm.z);

                    // Digits run thumb → pinky; index 2 is the middle finger.
                    let digits: Vec<_> = hand.digits().collect();
                    let mcp = match digits.get(2) {
                        Some(d) => d.metacarpal().next_joint(),
                        None    => continue,
                    };
                    let anchor = self.to_image(mcp.x, mcp.y, mcp.z);
                    result.hands.push(Hand::anchored(anchor.x, anchor.y, rest));
                }
                tracked = kept;
                result.truncate(self.cfg.max_hands);
                if !deliver(&tx, result) { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_signal::{DisplacementSignal, HandPositionSource};

    fn signal_of(result: &DetectionResult) -> DisplacementSignal {
        HandPositionSource::new().ingest(result).unwrap().signal
    }

    #[test]
    fn no_pointer_no_hands() {
        let r = synthetic_result(None, true, &TrackerConfig::default());
        assert!(r.is_empty());
    }

    #[test]
    fn pointer_is_mirrored() {
        let cfg = TrackerConfig::default();
        // Pointer at the right edge of the window, top: hand at the left of the
        // camera image, which maps to +x, +y.
        let r = synthetic_result(Some((1.0, 0.0)), false, &cfg);
        assert_eq!(r.hands.len(), 1);
        assert_eq!(signal_of(&r), DisplacementSignal::at(1.0, 1.0));

        let centre = synthetic_result(Some((0.5, 0.5)), false, &cfg);
        assert_eq!(signal_of(&centre), DisplacementSignal::at(0.0, 0.0));
    }

    #[test]
    fn second_hand_capped_by_max_hands() {
        let one = TrackerConfig::default();
        assert_eq!(synthetic_result(Some((0.2, 0.3)), true, &one).hands.len(), 1);

        let two = TrackerConfig { max_hands: 2, ..TrackerConfig::default() };
        let r = synthetic_result(Some((0.2, 0.3)), true, &two);
        assert_eq!(r.hands.len(), 2);
        // Only the pointer hand drives the signal.
        assert_eq!(signal_of(&r), signal_of(&synthetic_result(Some((0.2, 0.3)), false, &two)));
    }

    #[test]
    fn landmarks_snap_to_capture_grid() {
        let cfg = TrackerConfig::default();
        let (x, y) = cfg.quantise(0.1234, 0.5678);
        assert!(((x * 640.0) - (x * 640.0).round()).abs() < 1e-3);
        assert!(((y * 480.0) - (y * 480.0).round()).abs() < 1e-3);
        assert!((x - 0.1234).abs() <= 0.5 / 640.0 + 1e-6);
    }

    #[test]
    fn confidence_gates_new_and_tracked_hands() {
        let cfg = TrackerConfig {
            min_detection_confidence: 0.6,
            min_tracking_confidence:  0.3,
            ..TrackerConfig::default()
        };
        assert!(cfg.admits(0.6, false));
        assert!(!cfg.admits(0.45, false));
        // Once tracked, the lower threshold applies.
        assert!(cfg.admits(0.45, true));
        assert!(!cfg.admits(0.2, true));

        let stock = TrackerConfig::default();
        assert!(stock.admits(0.5, false));
        assert!(!stock.admits(0.49, true));
    }

    #[test]
    fn pointer_state_needs_engagement_without_hover() {
        let mut s = PointerState::default();
        s.apply(PointerInput::At { x: 0.3, y: 0.3, engaged: false });
        assert_eq!(s.hand_at(false), None);
        assert_eq!(s.hand_at(true), Some((0.3, 0.3)));
        s.apply(PointerInput::At { x: 0.3, y: 0.3, engaged: true });
        assert_eq!(s.hand_at(false), Some((0.3, 0.3)));
        s.apply(PointerInput::Away);
        assert_eq!(s.hand_at(true), None);
        s.apply(PointerInput::ToggleSecondHand);
        assert!(s.second);
    }

    #[test]
    fn orbit_alternates_presence() {
        let orbit = OrbitHandSource::new(TrackerConfig::default());
        assert_eq!(orbit.result_at(0.0).hands.len(), 1);
        assert_eq!(orbit.result_at(3.0).hands.len(), 1);
        assert!(orbit.result_at(7.0).is_empty());
        assert_eq!(orbit.result_at(9.5).hands.len(), 1);
    }

    #[test]
    fn orbit_stays_on_its_circle() {
        let orbit = OrbitHandSource::new(TrackerConfig::default());
        for i in 0..60 {
            let r = orbit.result_at(i as f64 * 0.1);
            let p = signal_of(&r).position().unwrap();
            // radius 0.3 in image units is 0.6 in signal units
            assert!((p.length() - 0.6).abs() < 0.01, "{:?}", p);
        }
    }

    struct Burst(usize);

    impl HandSource for Burst {
        fn name(&self) -> &'static str { "burst" }

        fn run(self: Box<Self>, tx: SyncSender<DetectionResult>, _stop: StopFlag) {
            for _ in 0..self.0 {
                if !deliver(&tx, DetectionResult::single(Hand::uniform(0.5, 0.5))) { return; }
            }
        }
    }

    #[test]
    fn undrained_results_stay_bounded() {
        let mut handle = spawn_hand_source(Box::new(Burst(500)));
        // Joins only if no send blocked on the full channel.
        handle.shutdown();
        let drained = handle.drain();
        assert_eq!(drained.results.len(), RESULT_BACKLOG);
        assert!(drained.disconnected);
    }

    #[test]
    fn deliver_reports_a_dropped_receiver() {
        let (tx, rx) = mpsc::sync_channel(RESULT_BACKLOG);
        assert!(deliver(&tx, DetectionResult::empty()));
        assert!(deliver(&tx, DetectionResult::empty()));
        assert_eq!(rx.try_iter().count(), RESULT_BACKLOG);
        drop(rx);
        assert!(!deliver(&tx, DetectionResult::empty()));
    }

    #[test]
    fn sim_thread_stops_on_shutdown() {
        let (_ptx, prx) = mpsc::channel();
        let src = SimHandSource { rx: prx, cfg: TrackerConfig::default(), hover: true };
        let mut handle = spawn_hand_source(Box::new(src));
        thread::sleep(Duration::from_millis(100));
        handle.shutdown();
        assert!(!handle.is_running());
        let drained = handle.drain();
        assert!(!drained.results.is_empty());
        assert!(drained.results.iter().all(DetectionResult::is_empty));
        assert!(drained.disconnected);
    }

    #[test]
    fn sim_thread_exits_when_window_input_closes() {
        let (ptx, prx) = mpsc::channel();
        let src = SimHandSource { rx: prx, cfg: TrackerConfig::default(), hover: false };
        let handle = spawn_hand_source(Box::new(src));
        ptx.send(PointerInput::At { x: 0.5, y: 0.5, engaged: true }).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while !handle.drain().results.iter().any(|r| r.hands.len() == 1) {
            assert!(Instant::now() < deadline, "pointer never became a hand");
            thread::sleep(Duration::from_millis(10));
        }

        drop(ptx);
        while !handle.drain().disconnected {
            assert!(Instant::now() < deadline, "sim source outlived its input");
            thread::sleep(Duration::from_millis(10));
        }
    }
}
