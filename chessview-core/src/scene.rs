//! Render-facing map of model transforms
//!
//! A renderer reads this map each frame; the animation layer writes the
//! `position` of moving pieces into it. Pieces are keyed by [`PieceId`], the
//! board mesh by [`BOARD_MODEL_ID`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::board::Vec3;
use crate::pieces::PieceId;
use crate::state::BoardState;

/// Key of the board mesh entry
pub const BOARD_MODEL_ID: &str = "board";

/// Pieces are modelled lying down and stood upright with this rotation
const PIECE_ROTATION_DEGREES: f32 = 90.0;

/// Placement of one model instance
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelTransform {
    /// Instances to draw
    pub count: u32,
    /// Spacing between instances
    pub distance: f32,
    pub rotation_angle: f32,
    pub rotation_axis: Vec3,
    pub scale: Vec3,
    pub position: Vec3,
}

impl ModelTransform {
    /// Single upright piece at `position`
    pub fn piece(position: Vec3, scale: f32) -> Self {
        Self {
            count: 1,
            distance: 0.0,
            rotation_angle: PIECE_ROTATION_DEGREES,
            rotation_axis: Vec3::new(1.0, 0.0, 0.0),
            scale: Vec3::splat(scale),
            position,
        }
    }

    /// Board mesh, unrotated and centred on the origin
    pub fn board(height: f32, scale: f32) -> Self {
        Self {
            count: 1,
            distance: 0.0,
            rotation_angle: 0.0,
            rotation_axis: Vec3::new(1.0, 0.0, 0.0),
            scale: Vec3::splat(scale),
            position: Vec3::new(0.0, 0.0, height),
        }
    }
}

/// Ordered map from model key to transform
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneMap {
    models: BTreeMap<String, ModelTransform>,
}

impl SceneMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board entry plus one entry per piece at its resting position
    pub fn from_board(board: &BoardState) -> Self {
        let geometry = board.geometry();
        let mut scene = Self::new();
        scene.models.insert(
            BOARD_MODEL_ID.to_string(),
            ModelTransform::board(geometry.piece_height, geometry.board_scale),
        );
        for (_, placement) in board.pieces() {
            scene.models.insert(
                placement.id.to_string(),
                ModelTransform::piece(placement.position, geometry.piece_scale),
            );
        }
        scene
    }

    pub fn get(&self, id: &str) -> Option<&ModelTransform> {
        self.models.get(id)
    }

    pub fn position(&self, id: &str) -> Option<Vec3> {
        self.models.get(id).map(|m| m.position)
    }

    /// Move an existing entry; returns false when `id` is not in the scene
    pub fn set_position(&mut self, id: &str, position: Vec3) -> bool {
        match self.models.get_mut(id) {
            Some(model) => {
                model.position = position;
                true
            }
            None => false,
        }
    }

    /// Drop an entry so it is no longer drawn
    pub fn remove(&mut self, id: &str) -> Option<ModelTransform> {
        self.models.remove(id)
    }

    pub fn contains(&self, id: &PieceId) -> bool {
        self.models.contains_key(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelTransform)> + '_ {
        self.models.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardGeometry;

    #[test]
    fn test_scene_from_standard_board() {
        let board = BoardState::standard(BoardGeometry::default());
        let scene = SceneMap::from_board(&board);
        assert_eq!(scene.len(), 33);

        let pawn = scene.get("white-pawn-e2").unwrap();
        assert_eq!(pawn.position, Vec3::new(0.5, -2.5, 0.0));
        assert_eq!(pawn.rotation_angle, 90.0);
        assert_eq!(pawn.scale, Vec3::splat(0.01));

        let board_model = scene.get(BOARD_MODEL_ID).unwrap();
        assert_eq!(board_model.position, Vec3::ZERO);
        assert_eq!(board_model.rotation_angle, 0.0);
    }

    #[test]
    fn test_set_position_and_remove() {
        let board = BoardState::standard(BoardGeometry::default());
        let mut scene = SceneMap::from_board(&board);
        assert!(scene.set_position("black-king-e8", Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(scene.position("black-king-e8"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert!(!scene.set_position("nobody", Vec3::ZERO));

        assert!(scene.remove("black-king-e8").is_some());
        assert!(!scene.contains(&PieceId::new("black-king-e8")));
    }

    #[test]
    fn test_scene_serializes_by_id() {
        let board = BoardState::standard(BoardGeometry::default());
        let scene = SceneMap::from_board(&board);
        let json = serde_json::to_string(&scene).unwrap();
        assert!(json.contains("\"white-queen-d1\""));
        let back: SceneMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }
}
