//! Line commands typed at the prompt

use chessview_core::Vec3;

pub const HELP: &str = "\
Available commands:
  move e2e4                - Make a chess move
  camera theta phi radius  - Move the camera (theta 10-80, phi 0-360, radius > 0)
  light theta phi radius   - Place the light (same ranges)
  power value              - Set the light power (> 0)
  help                     - Show this help message
  quit                     - Exit the program";

/// Direction and distance from the board centre, angles in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
}

impl Spherical {
    pub fn to_cartesian(self) -> Vec3 {
        let (theta, phi) = (self.theta.to_radians(), self.phi.to_radians());
        Vec3::new(
            self.radius * theta.sin() * phi.cos(),
            self.radius * theta.sin() * phi.sin(),
            self.radius * theta.cos(),
        )
    }
}

/// Parsed prompt line
#[derive(Clone, Debug, PartialEq)]
pub enum UserCommand {
    Move(String),
    /// Offset added to the current camera coordinates
    Camera(Spherical),
    /// Absolute light position
    Light(Spherical),
    Power(f32),
    Help,
    Quit,
}

/// Unparseable prompt line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', type 'help' for options")]
    Unknown(String),

    #[error("missing move, use: move e2e4")]
    MissingMove,

    #[error("invalid parameters, use: {0} theta phi radius (theta 10-80, phi 0-360, radius > 0)")]
    BadCoordinates(&'static str),

    #[error("invalid power value, enter a number greater than 0")]
    BadPower,
}

impl UserCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let cmd = words.next().ok_or(CommandError::Empty)?;

        match cmd {
            "move" => words
                .next()
                .map(|mv| UserCommand::Move(mv.to_string()))
                .ok_or(CommandError::MissingMove),
            "camera" => parse_spherical(words)
                .map(UserCommand::Camera)
                .ok_or(CommandError::BadCoordinates("camera")),
            "light" => parse_spherical(words)
                .map(UserCommand::Light)
                .ok_or(CommandError::BadCoordinates("light")),
            "power" => words
                .next()
                .and_then(|w| w.parse::<f32>().ok())
                .filter(|p| *p > 0.0)
                .map(UserCommand::Power)
                .ok_or(CommandError::BadPower),
            "help" => Ok(UserCommand::Help),
            "quit" => Ok(UserCommand::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_spherical<'a>(mut words: impl Iterator<Item = &'a str>) -> Option<Spherical> {
    let mut next = || words.next().and_then(|w| w.parse::<f32>().ok());
    let coords = Spherical {
        theta: next()?,
        phi: next()?,
        radius: next()?,
    };
    let valid = (10.0..=80.0).contains(&coords.theta)
        && (0.0..=360.0).contains(&coords.phi)
        && coords.radius > 0.0;
    valid.then_some(coords)
}

/// Camera and light state a renderer would read
#[derive(Clone, Debug, PartialEq)]
pub struct ViewSettings {
    pub camera: Spherical,
    pub light_position: Vec3,
    pub light_power: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            camera: Spherical {
                theta: 1.0,
                phi: -90.0,
                radius: 50.0,
            },
            light_position: Vec3::new(0.0, 0.0, 15.0),
            light_power: 400.0,
        }
    }
}

impl ViewSettings {
    /// Apply a view command; returns a confirmation, or None for commands
    /// that are not about the view
    pub fn apply(&mut self, command: &UserCommand) -> Option<String> {
        match command {
            UserCommand::Camera(offset) => {
                self.camera.theta += offset.theta;
                self.camera.phi += offset.phi;
                self.camera.radius += offset.radius;
                Some("Camera position updated.".to_string())
            }
            UserCommand::Light(coords) => {
                self.light_position = coords.to_cartesian();
                Some("Light position updated.".to_string())
            }
            UserCommand::Power(power) => {
                self.light_power = *power;
                Some(format!("Light power updated to: {power}"))
            }
            _ => None,
        }
    }
}
