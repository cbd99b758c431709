//! Camera state, projection and the first person controller.
//!
//! Angles are kept in degrees and wrapped to `[0, 360)` like the rest of the
//! transform path expects. The controller is a pure function of the polled
//! input state: pointer position, display resolution and the held-key set,
//! integrated once per frame with the previous frame's `dt`.

use cgmath::{Deg, Matrix4, Point3, SquareMatrix};
use instant::Duration;
use winit::keyboard::KeyCode;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Snap pitch values just past the poles back to the near side.
///
/// Pitch in `(180, 270)` becomes 271, pitch in `(90, 180)` becomes 89. This
/// keeps the camera from flipping when looking straight up or down; exactly
/// 90/180/270 pass through untouched.
pub fn guard_pitch(pitch: f32) -> f32 {
    if pitch > 180.0 && pitch < 270.0 {
        271.0
    } else if pitch > 90.0 && pitch < 180.0 {
        89.0
    } else {
        pitch
    }
}

/// Free-flying first person camera: position plus yaw/pitch in degrees.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, yaw: f32, pitch: f32) -> Self {
        Self {
            position: position.into(),
            yaw: wrap_degrees(yaw),
            pitch: wrap_degrees(pitch),
        }
    }

    /// View matrix: pitch about X, yaw about Y, then the inverse translation.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Deg(self.pitch))
            * Matrix4::from_angle_y(Deg(self.yaw))
            * Matrix4::from_translation(Point3::new(0.0, 0.0, 0.0) - self.position)
    }
}

/// Perspective frustum derived from the window aspect ratio.
///
/// Vertical extents are fixed at +-1 on a near plane of 1.0 with a far plane
/// of 300.0; only the horizontal extent follows the aspect ratio.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            znear: 1.0,
            zfar: 300.0,
        };
        projection.resize(width, height);
        projection
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        // prevent division by zero on minimized windows
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX
            * cgmath::frustum(-self.aspect, self.aspect, -1.0, 1.0, self.znear, self.zfar)
    }
}

/// Uniform buffer contents for the camera bind group.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = [camera.position.x, camera.position.y, camera.position.z, 1.0];
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Integrates pointer and keyboard state into the camera once per frame.
///
/// Mouse look maps the absolute pointer position over the display's reference
/// resolution to a full turn, scaled by `sensitivity`. Movement translates
/// along the yaw-rotated forward/right axes; forward and backward (and the
/// strafe pair) are mutually exclusive per frame, and forward motion couples
/// into the vertical axis through the pitch angle.
#[derive(Clone, Debug)]
pub struct CameraController {
    move_speed: f32,
    sensitivity: f32,
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    boost: bool,
    pointer: (f32, f32),
    display: (f32, f32),
}

impl CameraController {
    pub fn new(move_speed: f32, sensitivity: f32) -> Self {
        Self {
            move_speed,
            sensitivity,
            forward: false,
            backward: false,
            left: false,
            right: false,
            boost: false,
            pointer: (0.0, 0.0),
            display: (800.0, 600.0),
        }
    }

    /// Track a key transition. Returns whether the key was consumed.
    pub fn process_keyboard(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::KeyW => {
                self.forward = pressed;
                true
            }
            KeyCode::KeyS => {
                self.backward = pressed;
                true
            }
            KeyCode::KeyA => {
                self.left = pressed;
                true
            }
            KeyCode::KeyD => {
                self.right = pressed;
                true
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.boost = pressed;
                true
            }
            _ => false,
        }
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
    }

    /// The reference resolution mouse coordinates are scaled against.
    pub fn set_display(&mut self, width: f32, height: f32) {
        self.display = (width.max(1.0), height.max(1.0));
    }

    pub fn update(&self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        camera.yaw = wrap_degrees(self.pointer.0 / self.display.0 * 360.0 * self.sensitivity);
        camera.pitch = wrap_degrees(self.pointer.1 / self.display.1 * 360.0 * self.sensitivity);
        camera.pitch = guard_pitch(camera.pitch);

        let move_speed = if self.boost {
            self.move_speed * 2.0
        } else {
            self.move_speed
        };
        let step = move_speed * dt;
        let yaw = camera.yaw.to_radians();
        let pitch = camera.pitch.to_radians();

        if self.right {
            camera.position.z -= step * -yaw.sin();
            camera.position.x += step * yaw.cos();
        } else if self.left {
            camera.position.z += step * -yaw.sin();
            camera.position.x -= step * yaw.cos();
        }

        if self.backward {
            camera.position.z += step * yaw.cos();
            camera.position.x -= step * yaw.sin();
            camera.position.y += step * pitch.sin();
        } else if self.forward {
            camera.position.z -= step * yaw.cos();
            camera.position.x += step * yaw.sin();
            camera.position.y -= step * pitch.sin();
        }
    }
}

/// Camera plus its GPU resources, owned by the [`crate::context::Context`].
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
