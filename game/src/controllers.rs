//! Camera and character controllers
//!
//! The rig drives the camera node directly. In free-look mode the mouse turns
//! the camera and WASD flies it; in chase mode the camera orbits behind the
//! character node and WASD walks the character.

use engine::core::math::{self, FORWARD, UP};
use engine::input::InputState;
use engine::scene::{NodeId, Scene, TransformSpace};
use glam::{Quat, Vec3};
use tracing::{debug, info};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Travel speed of the camera and the character in units per second
pub const MOVE_SPEED: f32 = 18.0;
/// Length of the transition into chase mode in seconds
pub const LERP_DURATION: f32 = 0.8;
/// Transition ends early once the camera is this close to its target
pub const LERP_SNAP_DISTANCE: f32 = 0.1;
/// Chase pitch limits in degrees; negative keeps the camera above the character
pub const CHASE_PITCH_MIN: f32 = -60.0;
pub const CHASE_PITCH_MAX: f32 = 0.0;
/// Largest yaw change per frame in chase mode
pub const CHASE_YAW_STEP: f32 = 5.0;
/// Chase distance in multiples of the character's bounding-sphere radius
pub const CHASE_DISTANCE_FACTOR: f32 = 20.0;
/// Radius used when the character has no drawable
pub const FALLBACK_RADIUS: f32 = 0.5;
/// Turn rate of the character while the right button is held, degrees per second
pub const TURN_RATE: f32 = 5.0;

/// Degrees of rotation per pixel of mouse travel
pub fn mouse_sensitivity(viewport_height: f32) -> f32 {
    0.1 * 768.0 / viewport_height.max(1.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraBehaviour {
    #[default]
    FreeLook,
    Chase,
}

impl CameraBehaviour {
    /// Value stored in the "Camera Behaviour" scene variable
    pub fn as_int(self) -> i32 {
        match self {
            CameraBehaviour::FreeLook => 0,
            CameraBehaviour::Chase => 1,
        }
    }

    pub fn from_int(value: i32) -> Option<Self> {
        match value {
            0 => Some(CameraBehaviour::FreeLook),
            1 => Some(CameraBehaviour::Chase),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            CameraBehaviour::FreeLook => CameraBehaviour::Chase,
            CameraBehaviour::Chase => CameraBehaviour::FreeLook,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CameraLerp {
    start: Vec3,
    elapsed: f32,
}

/// Inputs sampled once per frame for the rig
#[derive(Debug, Clone, Copy)]
pub struct RigFrame<'a> {
    pub input: &'a InputState,
    /// Editor menu shown; mouse look and movement pause while it is
    pub menu_visible: bool,
    pub viewport_height: f32,
    pub dt: f32,
}

/// Yaw/pitch state shared by both camera modes
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    behaviour: CameraBehaviour,
    yaw: f32,
    pitch: f32,
    /// Look angles saved while the middle button remaps them
    stashed: Option<(f32, f32)>,
    lerp: Option<CameraLerp>,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            behaviour: CameraBehaviour::FreeLook,
            yaw: 0.0,
            pitch: 0.0,
            stashed: None,
            lerp: None,
        }
    }
}

impl CameraRig {
    /// Free-look rig facing the way the camera node currently faces
    pub fn from_camera(scene: &Scene, camera: NodeId) -> Self {
        let rotation = scene.world_rotation(camera);
        Self {
            yaw: math::yaw_of(rotation),
            pitch: math::pitch_of(rotation),
            ..Default::default()
        }
    }

    pub fn behaviour(&self) -> CameraBehaviour {
        self.behaviour
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_lerping(&self) -> bool {
        self.lerp.is_some()
    }

    /// Switch between free-look and chase
    pub fn toggle(&mut self, scene: &Scene, camera: NodeId, character: Option<NodeId>) {
        match self.behaviour {
            CameraBehaviour::FreeLook => {
                if let Some(character) = character.filter(|c| scene.contains_node(*c)) {
                    self.yaw = math::yaw_of(scene.world_rotation(character));
                }
                let camera_pitch = math::pitch_of(scene.world_rotation(camera));
                self.pitch = (-camera_pitch).clamp(CHASE_PITCH_MIN, CHASE_PITCH_MAX);
                self.lerp = Some(CameraLerp {
                    start: scene.world_position(camera),
                    elapsed: 0.0,
                });
                self.behaviour = CameraBehaviour::Chase;
            }
            CameraBehaviour::Chase => {
                let rotation = scene.world_rotation(camera);
                self.yaw = math::yaw_of(rotation);
                self.pitch = math::pitch_of(rotation);
                self.lerp = None;
                self.stashed = None;
                self.behaviour = CameraBehaviour::FreeLook;
            }
        }
        info!(behaviour = ?self.behaviour, yaw = self.yaw, pitch = self.pitch, "Camera mode changed");
    }

    /// Re-derive the look angles after a scene load
    pub fn restore(&mut self, behaviour: CameraBehaviour, scene: &Scene, camera: NodeId) {
        let rotation = scene.world_rotation(camera);
        self.behaviour = behaviour;
        self.yaw = math::yaw_of(rotation);
        self.pitch = match behaviour {
            CameraBehaviour::FreeLook => math::pitch_of(rotation),
            CameraBehaviour::Chase => (-math::pitch_of(rotation)).clamp(CHASE_PITCH_MIN, CHASE_PITCH_MAX),
        };
        self.stashed = None;
        self.lerp = None;
        debug!(behaviour = ?behaviour, yaw = self.yaw, pitch = self.pitch, "Camera rig restored");
    }

    /// Middle button went down: look angles follow the character until release
    pub fn middle_pressed(&mut self, scene: &Scene, character: Option<NodeId>) {
        if self.behaviour != CameraBehaviour::Chase || self.stashed.is_some() {
            return;
        }
        let Some(character) = character.filter(|c| scene.contains_node(*c)) else {
            return;
        };
        self.stashed = Some((self.pitch, self.yaw));
        let rotation = scene.world_rotation(character);
        self.pitch = math::pitch_of(rotation).clamp(CHASE_PITCH_MIN, CHASE_PITCH_MAX);
        self.yaw = math::yaw_of(rotation);
    }

    pub fn middle_released(&mut self) {
        if let Some((pitch, yaw)) = self.stashed.take() {
            self.pitch = pitch;
            self.yaw = yaw;
        }
    }

    /// Where the chase camera sits for the current look angles
    pub fn chase_target(&self, scene: &Scene, character: NodeId) -> Vec3 {
        let (pitch, yaw) = self.stashed.unwrap_or((self.pitch, self.yaw));
        let direction = math::look_rotation(pitch, yaw + 180.0) * FORWARD;
        let radius = scene
            .first_drawable(character)
            .and_then(|c| scene.component(c))
            .and_then(|slot| slot.data().drawable_bounds())
            .map(|bounds| bounds.bounding_radius())
            .unwrap_or(FALLBACK_RADIUS);
        scene.world_position(character) + direction * (radius * CHASE_DISTANCE_FACTOR)
    }

    /// Advance the active controller by one frame
    pub fn update(&mut self, scene: &mut Scene, camera: NodeId, character: Option<NodeId>, frame: RigFrame) {
        if !scene.contains_node(camera) {
            debug!(camera = %camera, "Camera node missing, skipping controllers");
            return;
        }
        match self.behaviour {
            CameraBehaviour::FreeLook => self.update_free_look(scene, camera, frame),
            CameraBehaviour::Chase => match character.filter(|c| scene.contains_node(*c)) {
                Some(character) => self.update_chase(scene, camera, character, frame),
                None => debug!("No character node, skipping chase camera"),
            },
        }
    }

    fn update_free_look(&mut self, scene: &mut Scene, camera: NodeId, frame: RigFrame) {
        if frame.menu_visible {
            return;
        }
        let sensitivity = mouse_sensitivity(frame.viewport_height);
        let delta = frame.input.mouse_delta;
        self.yaw += sensitivity * delta.x;
        self.pitch = (self.pitch + sensitivity * delta.y).clamp(-90.0, 90.0);
        if let Some(node) = scene.node_mut(camera) {
            node.set_rotation(math::look_rotation(self.pitch, self.yaw));
        }

        let movement = key_direction(frame.input);
        if movement != Vec3::ZERO {
            scene.translate(camera, movement * MOVE_SPEED * frame.dt, TransformSpace::Local);
        }
    }

    fn update_chase(&mut self, scene: &mut Scene, camera: NodeId, character: NodeId, frame: RigFrame) {
        let input = frame.input;
        let target = if frame.menu_visible {
            scene.world_position(camera)
        } else {
            let sensitivity = mouse_sensitivity(frame.viewport_height);
            let delta = input.mouse_delta;
            self.yaw += (sensitivity * delta.x).clamp(-CHASE_YAW_STEP, CHASE_YAW_STEP);
            self.pitch = (self.pitch + sensitivity * delta.y).clamp(CHASE_PITCH_MIN, CHASE_PITCH_MAX);
            self.chase_target(scene, character)
        };
        let character_position = scene.world_position(character);

        if let Some(mut lerp) = self.lerp {
            let remaining = (target - scene.world_position(camera)).length();
            lerp.elapsed += frame.dt;
            let t = lerp.elapsed / LERP_DURATION;
            if remaining < LERP_SNAP_DISTANCE || t >= 1.0 {
                scene.set_world_position(camera, target);
                self.lerp = None;
                debug!("Chase transition finished");
            } else {
                scene.set_world_position(camera, lerp.start.lerp(target, t));
                self.lerp = Some(lerp);
            }
            scene.look_at(camera, character_position);
        } else {
            scene.set_world_position(camera, target);
            scene.look_at(camera, character_position);

            if input.is_mouse_button_pressed(MouseButton::Middle) {
                scene.set_world_rotation(character, math::yaw_rotation(self.yaw));
            } else if input.is_mouse_button_pressed(MouseButton::Right) {
                self.turn_character(scene, character, frame.dt);
            }
        }

        if frame.menu_visible {
            return;
        }
        let movement = key_direction(input);
        if movement == Vec3::ZERO {
            return;
        }
        let step = movement * MOVE_SPEED * frame.dt;
        if input.is_shift_down() {
            scene.translate(character, step, TransformSpace::Local);
        } else {
            scene.translate(character, math::yaw_rotation(self.yaw) * step, TransformSpace::World);
        }
    }

    fn turn_character(&self, scene: &mut Scene, character: NodeId, dt: f32) {
        let current = scene.world_rotation(character) * FORWARD;
        let current = Vec3::new(current.x, 0.0, current.z);
        let desired = math::yaw_rotation(self.yaw) * FORWARD;
        if current.length_squared() < 1e-8 {
            return;
        }
        let remaining = math::signed_angle(current, desired, UP);
        let step = TURN_RATE * dt;
        let angle = remaining.clamp(-step, step);
        if angle != 0.0 {
            scene.rotate(character, Quat::from_axis_angle(UP, angle.to_radians()), TransformSpace::World);
        }
    }
}

/// Unit direction of the held WASD keys in node-local axes
fn key_direction(input: &InputState) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if input.is_key_pressed(KeyCode::KeyW) {
        direction += FORWARD;
    }
    if input.is_key_pressed(KeyCode::KeyS) {
        direction -= FORWARD;
    }
    if input.is_key_pressed(KeyCode::KeyA) {
        direction -= math::RIGHT;
    }
    if input.is_key_pressed(KeyCode::KeyD) {
        direction += math::RIGHT;
    }
    direction
}
