//! Animation sequencing
//!
//! One board move animates at a time. A capturing move lands first, then
//! its victim lifts off and slides to the next free slot beside the board;
//! any number of those removals may run at once. Pieces that have been
//! captured can never be queued again.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use chessview_core::{BoardGeometry, Color, PieceId, SceneMap, Vec3};

use crate::animation::{AnimationTiming, PieceAnimation};

/// Piece taken by a move
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureInfo {
    pub piece: PieceId,
    /// Where the captured piece stands when it is taken
    pub position: Vec3,
    pub color: Color,
}

/// A queued board move
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    pub piece: PieceId,
    pub from: Vec3,
    pub to: Vec3,
    pub capture: Option<CaptureInfo>,
}

/// What happened during one tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Board move that started this tick
    pub started: Option<PieceId>,
    /// Board move that landed this tick
    pub landed: Option<PieceId>,
    /// Captured pieces that began leaving the board
    pub removals_started: Vec<PieceId>,
    /// Captured pieces that reached their slot and left the scene
    pub removed: Vec<PieceId>,
}

/// Queues board moves and capture removals and drives them frame by frame
#[derive(Clone, Debug)]
pub struct AnimationManager {
    timing: AnimationTiming,
    geometry: BoardGeometry,
    pending_moves: VecDeque<MoveRecord>,
    pending_captures: VecDeque<CaptureInfo>,
    current: Option<PieceAnimation>,
    removals: Vec<PieceAnimation>,
    captured: FxHashSet<PieceId>,
    capture_counts: [u32; 2],
}

impl AnimationManager {
    pub fn new(timing: AnimationTiming, geometry: BoardGeometry) -> Self {
        Self {
            timing,
            geometry,
            pending_moves: VecDeque::new(),
            pending_captures: VecDeque::new(),
            current: None,
            removals: Vec::new(),
            captured: FxHashSet::default(),
            capture_counts: [0; 2],
        }
    }

    pub fn timing(&self) -> &AnimationTiming {
        &self.timing
    }

    // ========================================================================
    // QUEUEING
    // ========================================================================

    /// Queue a plain move; false when `piece` has already been captured
    pub fn enqueue_move(&mut self, piece: PieceId, from: Vec3, to: Vec3) -> bool {
        self.enqueue(MoveRecord {
            piece,
            from,
            to,
            capture: None,
        })
    }

    /// Queue a move that takes `capture` when it lands
    pub fn enqueue_capture_move(&mut self, piece: PieceId, from: Vec3, to: Vec3, capture: CaptureInfo) -> bool {
        self.enqueue(MoveRecord {
            piece,
            from,
            to,
            capture: Some(capture),
        })
    }

    /// Queue a move record of either kind
    pub fn enqueue(&mut self, record: MoveRecord) -> bool {
        if self.captured.contains(&record.piece) {
            tracing::debug!("ignoring move of captured piece {}", record.piece);
            return false;
        }
        self.pending_moves.push_back(record);
        true
    }

    // ========================================================================
    // FRAME UPDATE
    // ========================================================================

    /// Advance all animations by `dt` seconds, writing positions into `scene`.
    ///
    /// Order: running removals first, then the current board move. A new
    /// board move only starts in a tick that began with none running.
    pub fn tick(&mut self, dt: f32, scene: &mut SceneMap) -> TickReport {
        let mut report = TickReport::default();

        let mut still_running = Vec::with_capacity(self.removals.len());
        for mut removal in self.removals.drain(..) {
            let position = removal.advance(dt);
            scene.set_position(removal.piece().as_str(), position);
            if removal.is_complete() {
                scene.remove(removal.piece().as_str());
                tracing::info!("Removed captured piece: {}", removal.piece());
                report.removed.push(removal.piece().clone());
            } else {
                still_running.push(removal);
            }
        }
        self.removals = still_running;

        match self.current.take() {
            Some(mut mover) => {
                let position = mover.advance(dt);
                scene.set_position(mover.piece().as_str(), position);
                if mover.is_complete() {
                    if mover.resolves_capture() {
                        if let Some(capture) = self.pending_captures.pop_front() {
                            self.start_removal(capture, &mut report);
                        }
                    }
                    report.landed = Some(mover.piece().clone());
                } else {
                    self.current = Some(mover);
                }
            }
            None => self.start_next_move(&mut report),
        }

        report
    }

    fn start_next_move(&mut self, report: &mut TickReport) {
        while let Some(record) = self.pending_moves.pop_front() {
            if self.captured.contains(&record.piece) {
                tracing::debug!("dropping queued move of captured piece {}", record.piece);
                continue;
            }

            let captures = record.capture.is_some();
            if let Some(capture) = record.capture {
                self.pending_captures.push_back(capture);
            }
            tracing::debug!("animating {} {:?} -> {:?}", record.piece, record.from, record.to);
            report.started = Some(record.piece.clone());
            self.current = Some(PieceAnimation::start_move(
                record.piece,
                record.from,
                record.to,
                captures,
                self.timing.clone(),
            ));
            return;
        }
    }

    fn start_removal(&mut self, capture: CaptureInfo, report: &mut TickReport) {
        if !self.captured.insert(capture.piece.clone()) {
            return;
        }

        let count = &mut self.capture_counts[capture.color as usize];
        let slot = self.geometry.capture_slot(capture.color, *count);
        *count += 1;

        tracing::debug!("capturing {} into slot {:?}", capture.piece, slot);
        report.removals_started.push(capture.piece.clone());
        self.removals.push(PieceAnimation::start_removal(
            capture.piece,
            capture.position,
            slot,
            self.timing.clone(),
        ));
    }

    // ========================================================================
    // STATUS
    // ========================================================================

    /// True while anything is moving or waiting to move
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
            || !self.pending_moves.is_empty()
            || !self.pending_captures.is_empty()
            || !self.removals.is_empty()
    }

    /// Every piece that has been captured so far
    pub fn captured(&self) -> &FxHashSet<PieceId> {
        &self.captured
    }

    pub fn is_captured(&self, piece: &PieceId) -> bool {
        self.captured.contains(piece)
    }

    /// Captures taken so far of pieces of `color`
    pub fn capture_count(&self, color: Color) -> u32 {
        self.capture_counts[color as usize]
    }

    /// Drop every queue and animation and forget all captures
    pub fn clear(&mut self) {
        self.pending_moves.clear();
        self.pending_captures.clear();
        self.current = None;
        self.removals.clear();
        self.captured.clear();
        self.capture_counts = [0; 2];
    }
}
