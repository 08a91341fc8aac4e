//! ASCII Orbit - an animated sphere scene raytraced to the terminal
//!
//! One ray is cast per character cell, shaded with Lambertian diffuse plus
//! a specular highlight, and the resulting luminance is mapped onto a fixed
//! character gradient. The camera orbits the scene by default; the light
//! can be set to orbit as well.

pub mod camera;
pub mod renderer;
pub mod scene;
pub mod terminal;

pub use camera::Animator;
pub use renderer::{Ray, Renderer};
pub use scene::{Scene, Sphere};
pub use terminal::TerminalDisplay;

/// Character gradient from empty to most intense
pub const ASCII_GRADIENT: &str = " .:-=+*#%@";

/// Exponent of the specular highlight
pub const SPECULAR_EXPONENT: i32 = 32;

/// Flat term added to the diffuse factor so unlit faces stay visible
pub const AMBIENT_FLOOR: f32 = 0.3;

/// Weight of the white specular highlight
pub const SPECULAR_STRENGTH: f32 = 0.5;

/// Default per-frame rotation step in radians
pub const DEFAULT_ANGLE_STEP: f32 = 0.1;

/// Default distance of the camera from the origin
pub const DEFAULT_CAMERA_DISTANCE: f32 = 4.0;

/// Default frame period in milliseconds (~10 FPS)
pub const DEFAULT_FRAME_MS: u64 = 100;
