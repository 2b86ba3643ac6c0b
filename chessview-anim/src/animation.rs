//! Per-piece lift, translate and lower animation

use serde::{Deserialize, Serialize};

use chessview_core::{PieceId, Vec3};

use crate::phase::{ease_in_out_cubic, Phase};

/// Slack when deciding a phase has used up its duration, so summing many
/// small f32 steps still lands on the same phase boundary as one large step
const PHASE_EPSILON: f32 = 1e-4;

/// Heights and durations shared by every animation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTiming {
    /// Height pieces rise to before sliding
    pub lift_height: f32,
    /// Seconds spent rising, and again lowering
    pub lift_duration: f32,
    /// Seconds spent sliding
    pub move_duration: f32,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            lift_height: 2.0,
            lift_duration: 0.3,
            move_duration: 0.4,
        }
    }
}

impl AnimationTiming {
    /// Time from the start of the lift to the end of the lower
    pub fn total(&self) -> f32 {
        2.0 * self.lift_duration + self.move_duration
    }

    fn duration(&self, phase: Phase) -> Option<f32> {
        match phase {
            Phase::Lift | Phase::Lower => Some(self.lift_duration),
            Phase::Translate => Some(self.move_duration),
            Phase::Idle | Phase::Complete => None,
        }
    }
}

/// What an animation is for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    /// A move on the board; `captures` marks a move whose capture is
    /// resolved once it lands
    Move { captures: bool },
    /// A captured piece heading to its off-board slot
    Removal,
}

/// One piece travelling from `start` to `target`
#[derive(Clone, Debug)]
pub struct PieceAnimation {
    piece: PieceId,
    kind: AnimationKind,
    start: Vec3,
    target: Vec3,
    phase: Phase,
    elapsed: f32,
    timing: AnimationTiming,
}

impl PieceAnimation {
    pub fn start_move(piece: PieceId, start: Vec3, target: Vec3, captures: bool, timing: AnimationTiming) -> Self {
        Self::begin(piece, AnimationKind::Move { captures }, start, target, timing)
    }

    pub fn start_removal(piece: PieceId, start: Vec3, slot: Vec3, timing: AnimationTiming) -> Self {
        Self::begin(piece, AnimationKind::Removal, start, slot, timing)
    }

    fn begin(piece: PieceId, kind: AnimationKind, start: Vec3, target: Vec3, timing: AnimationTiming) -> Self {
        Self {
            piece,
            kind,
            start,
            target,
            phase: Phase::Lift,
            elapsed: 0.0,
            timing,
        }
    }

    pub fn piece(&self) -> &PieceId {
        &self.piece
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_running()
    }

    pub fn is_complete(&self) -> bool {
        !self.phase.is_running()
    }

    /// Whether landing this move releases a pending capture
    pub fn resolves_capture(&self) -> bool {
        matches!(self.kind, AnimationKind::Move { captures: true })
    }

    /// Advance by `dt` seconds and return the new position.
    ///
    /// Time left over when a phase ends carries into the next one, so the
    /// piece follows the same path however the frame times are split.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if !self.is_active() {
            return self.target;
        }

        self.elapsed += dt.max(0.0);
        while let Some(duration) = self.timing.duration(self.phase) {
            if self.elapsed + PHASE_EPSILON < duration {
                break;
            }
            self.elapsed = (self.elapsed - duration).max(0.0);
            self.phase = self.phase.next();
        }

        if self.phase == Phase::Complete {
            self.elapsed = 0.0;
        }
        self.position()
    }

    /// Position for the current phase and elapsed time
    pub fn position(&self) -> Vec3 {
        let height = self.timing.lift_height;
        let eased = ease_in_out_cubic(self.progress());
        match self.phase {
            Phase::Idle => self.start,
            Phase::Lift => self.start.raised(height * eased),
            Phase::Translate => self
                .start
                .raised(height)
                .lerp(self.target.raised(height), eased),
            Phase::Lower => self.target.raised(height * (1.0 - eased)),
            Phase::Complete => self.target,
        }
    }

    fn progress(&self) -> f32 {
        match self.timing.duration(self.phase) {
            Some(d) if d > 0.0 => (self.elapsed / d).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }
}
