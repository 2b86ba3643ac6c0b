//! Animation phases and easing

use serde::{Deserialize, Serialize};

/// Ease-in-out cubic on [0, 1], zero velocity at both ends
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Lift, translate, lower
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Lift,
    Translate,
    Lower,
    Complete,
}

impl Phase {
    /// Phase entered when this one runs out of time
    pub fn next(self) -> Phase {
        match self {
            Phase::Idle => Phase::Idle,
            Phase::Lift => Phase::Translate,
            Phase::Translate => Phase::Lower,
            Phase::Lower => Phase::Complete,
            Phase::Complete => Phase::Complete,
        }
    }

    /// Whether time advances this phase
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Lift | Phase::Translate | Phase::Lower)
    }
}
