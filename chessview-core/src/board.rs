//! Board geometry: squares, world-space positions and capture slots

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::MoveError;
use crate::pieces::Color;

/// Number of files (and ranks) on the board
pub const BOARD_SIZE: u8 = 8;

/// Board square, zero-based file (a=0) and rank (1=0)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Create a square from zero-based coordinates
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Square displaced by (df, dr), or None when it falls off the board
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if (0..BOARD_SIZE as i8).contains(&file) && (0..BOARD_SIZE as i8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    /// Signed file and rank deltas from `self` to `to`
    pub fn delta(self, to: Square) -> (i8, i8) {
        (
            to.file as i8 - self.file as i8,
            to.rank as i8 - self.rank as i8,
        )
    }

    /// All 64 squares, rank by rank starting at a1
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|rank| (0..BOARD_SIZE).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

impl FromStr for Square {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(MoveError::InvalidSquare(s.to_string()));
        }
        let (f, r) = (bytes[0].to_ascii_lowercase(), bytes[1]);
        if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
            return Err(MoveError::InvalidSquare(s.to_string()));
        }
        Ok(Square {
            file: f - b'a',
            rank: r - b'1',
        })
    }
}

/// World-space position; `z` is the vertical axis
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Same point raised by `dz`
    pub fn raised(self, dz: f32) -> Self {
        Self::new(self.x, self.y, self.z + dz)
    }

    /// Linear interpolation, `t = 0` gives `self`, `t = 1` gives `other`
    pub fn lerp(self, other: Vec3, t: f32) -> Self {
        self + (other - self).scale(t)
    }

    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn distance(self, other: Vec3) -> f32 {
        let d = other - self;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Physical layout of the board in world space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardGeometry {
    /// Edge length of one square
    pub square_size: f32,
    /// Height at which pieces rest
    pub piece_height: f32,
    /// Distance from the board centre to the captured-piece columns
    pub capture_side_offset: f32,
    /// Column spacing of captured pieces, as a fraction of `square_size`
    pub capture_column_scale: f32,
    /// Uniform model scale for pieces
    pub piece_scale: f32,
    /// Uniform model scale for the board mesh
    pub board_scale: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            square_size: 1.0,
            piece_height: 0.0,
            capture_side_offset: 5.0,
            capture_column_scale: 0.8,
            piece_scale: 0.01,
            board_scale: 0.1,
        }
    }
}

impl BoardGeometry {
    /// Centre of a square at resting height
    pub fn world_position(&self, square: Square) -> Vec3 {
        Vec3::new(
            (square.file() as f32 - 3.5) * self.square_size,
            (square.rank() as f32 - 3.5) * self.square_size,
            self.piece_height,
        )
    }

    /// Off-board slot for the `count`-th captured piece of `color`.
    ///
    /// Slots fill two columns per row; White pieces line up on the negative
    /// x side, Black pieces on the positive side.
    pub fn capture_slot(&self, color: Color, count: u32) -> Vec3 {
        let side = match color {
            Color::White => -self.capture_side_offset,
            Color::Black => self.capture_side_offset,
        };
        let row = (count / 2) as f32;
        let col = (count % 2) as f32;
        Vec3::new(
            side + col * self.square_size * self.capture_column_scale,
            (row - 3.5) * self.square_size,
            self.piece_height,
        )
    }
}
