//! View controls: held movement keys, mouse look, scroll and click actions.
//!
//! Window-system events are translated into calls on [`ViewControls`] by the
//! client; this module holds the state and applies it to the camera.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraMovement, FlyCamera, ProjectionMode};
use crate::light::LightRig;

/// Bitflags for held movement keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    pub bits: u16,
}

impl MoveFlags {
    pub const FORWARD: u16 = 1 << 0; // W
    pub const BACKWARD: u16 = 1 << 1; // S
    pub const LEFT: u16 = 1 << 2; // A
    pub const RIGHT: u16 = 1 << 3; // D
    pub const UP: u16 = 1 << 4; // Q
    pub const DOWN: u16 = 1 << 5; // E

    const ALL: [(u16, CameraMovement); 6] = [
        (Self::FORWARD, CameraMovement::Forward),
        (Self::BACKWARD, CameraMovement::Backward),
        (Self::LEFT, CameraMovement::Left),
        (Self::RIGHT, CameraMovement::Right),
        (Self::UP, CameraMovement::Up),
        (Self::DOWN, CameraMovement::Down),
    ];

    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    #[inline]
    pub const fn is_pressed(&self, flag: u16) -> bool {
        self.bits & flag != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u16, pressed: bool) {
        if pressed {
            self.bits |= flag;
        } else {
            self.bits &= !flag;
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Camera directions for every held key.
    pub fn directions(&self) -> impl Iterator<Item = CameraMovement> + '_ {
        Self::ALL
            .iter()
            .filter(|(flag, _)| self.is_pressed(*flag))
            .map(|(_, movement)| *movement)
    }
}

/// One-shot key commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    SetOrthographic,
    SetPerspective,
    EnableOrbit,
    DisableOrbit,
    Quit,
}

/// What the caller should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Tracks the last cursor position so motion can be turned into offsets.
#[derive(Debug, Clone, Copy, Default)]
struct MouseTracker {
    last: Option<Vec2>,
}

impl MouseTracker {
    /// Offset since the previous position with y pointing up, or `None` for
    /// the first sample.
    fn update(&mut self, position: Vec2) -> Option<Vec2> {
        let offset = self
            .last
            .map(|last| Vec2::new(position.x - last.x, last.y - position.y));
        self.last = Some(position);
        offset
    }
}

/// Input state driving the camera and projection.
#[derive(Debug, Clone, Default)]
pub struct ViewControls {
    projection: ProjectionMode,
    moves: MoveFlags,
    shift: bool,
    mouse: MouseTracker,
}

impl ViewControls {
    pub fn new(projection: ProjectionMode) -> Self {
        Self {
            projection,
            ..Default::default()
        }
    }

    pub fn projection(&self) -> ProjectionMode {
        self.projection
    }

    pub fn moves(&self) -> MoveFlags {
        self.moves
    }

    pub fn shift(&self) -> bool {
        self.shift
    }

    pub fn set_move(&mut self, flag: u16, pressed: bool) {
        self.moves.set(flag, pressed);
    }

    pub fn set_shift(&mut self, held: bool) {
        self.shift = held;
    }

    /// Release held keys and forget the cursor, e.g. when focus is lost.
    pub fn release_all(&mut self) {
        self.moves = MoveFlags::new();
        self.shift = false;
        self.mouse = MouseTracker::default();
    }

    /// Apply a one-shot command to the projection or light rig.
    pub fn apply_command(&mut self, command: ViewCommand, lights: &mut LightRig) -> CommandOutcome {
        match command {
            ViewCommand::SetOrthographic => self.set_projection(ProjectionMode::Orthographic),
            ViewCommand::SetPerspective => self.set_projection(ProjectionMode::Perspective),
            ViewCommand::EnableOrbit => {
                if lights.set_orbiting(true) {
                    tracing::info!("Light orbit enabled");
                }
            }
            ViewCommand::DisableOrbit => {
                if lights.set_orbiting(false) {
                    tracing::info!("Light orbit disabled");
                }
            }
            ViewCommand::Quit => return CommandOutcome::Exit,
        }
        CommandOutcome::Continue
    }

    fn set_projection(&mut self, mode: ProjectionMode) {
        if self.projection != mode {
            tracing::info!("Projection: {:?}", mode);
            self.projection = mode;
        }
    }

    /// Feed an absolute cursor position. The first sample only primes the
    /// tracker; later samples turn the camera.
    pub fn cursor_moved(&mut self, camera: &mut FlyCamera, x: f32, y: f32) {
        if let Some(offset) = self.mouse.update(Vec2::new(x, y)) {
            camera.process_mouse_movement(offset.x, offset.y, true);
        }
    }

    /// Feed a relative motion, as delivered by raw device events.
    pub fn mouse_motion(&mut self, camera: &mut FlyCamera, dx: f32, dy: f32) {
        camera.process_mouse_movement(dx, -dy, true);
    }

    /// Scroll zooms with shift held and changes speed otherwise.
    pub fn scroll(&mut self, camera: &mut FlyCamera, y_offset: f32) {
        if self.shift {
            camera.adjust_zoom(y_offset);
            tracing::info!("Camera zoom adjusted to {:.1}", camera.zoom());
        } else {
            camera.adjust_movement_speed(y_offset);
            tracing::info!("Camera movement speed adjusted to {:.1}", camera.movement_speed());
        }
    }

    /// Left resets position; right resets zoom with shift, speed otherwise.
    pub fn click(&mut self, camera: &mut FlyCamera, button: PointerButton) {
        match button {
            PointerButton::Left => {
                camera.reset_position();
                tracing::info!("Camera position reset");
            }
            PointerButton::Right if self.shift => {
                camera.reset_zoom();
                tracing::info!("Camera zoom reset");
            }
            PointerButton::Right => {
                camera.reset_speed();
                tracing::info!("Camera movement speed reset");
            }
            PointerButton::Middle => {}
        }
    }

    /// Move the camera for every held direction.
    pub fn apply_frame(&self, camera: &mut FlyCamera, delta_time: f32) {
        for direction in self.moves.directions() {
            camera.process_keyboard(direction, delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{DEFAULT_SPEED, DEFAULT_ZOOM};
    use glam::Vec3;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl LogCapture {
        fn run(&self, f: impl FnOnce()) -> String {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .finish();
            tracing::subscriber::with_default(subscriber, f);
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_move_flags() {
        let mut flags = MoveFlags::new();
        assert!(flags.is_empty());

        flags.set(MoveFlags::FORWARD, true);
        flags.set(MoveFlags::UP, true);
        assert!(flags.is_pressed(MoveFlags::FORWARD));
        assert!(!flags.is_pressed(MoveFlags::LEFT));

        let dirs: Vec<_> = flags.directions().collect();
        assert_eq!(dirs, vec![CameraMovement::Forward, CameraMovement::Up]);

        flags.set(MoveFlags::FORWARD, false);
        assert_eq!(flags.bits, MoveFlags::UP);
    }

    #[test]
    fn test_first_cursor_sample_does_not_turn() {
        let mut controls = ViewControls::default();
        let mut camera = FlyCamera::new(Vec3::ZERO);

        controls.cursor_moved(&mut camera, 400.0, 300.0);
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);

        // Right 10 px and up 20 px.
        controls.cursor_moved(&mut camera, 410.0, 280.0);
        assert!((camera.yaw() - -89.0).abs() < 1e-5);
        assert!((camera.pitch() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_raw_motion_points_y_up() {
        let mut controls = ViewControls::default();
        let mut camera = FlyCamera::new(Vec3::ZERO);

        // Device deltas grow downwards: 10 right and 20 down looks right and down.
        controls.mouse_motion(&mut camera, 10.0, 20.0);
        assert!((camera.yaw() - -89.0).abs() < 1e-5);
        assert!((camera.pitch() - -2.0).abs() < 1e-5);
    }

    #[test]
    fn test_release_all_reprimes_cursor() {
        let mut controls = ViewControls::default();
        let mut camera = FlyCamera::new(Vec3::ZERO);
        controls.set_move(MoveFlags::LEFT, true);
        controls.cursor_moved(&mut camera, 0.0, 0.0);
        controls.release_all();
        assert!(controls.moves().is_empty());

        controls.cursor_moved(&mut camera, 500.0, 500.0);
        assert_eq!(camera.yaw(), -90.0);
    }

    #[test]
    fn test_scroll_routing() {
        let mut controls = ViewControls::default();
        let mut camera = FlyCamera::new(Vec3::ZERO);

        controls.scroll(&mut camera, 2.0);
        assert_eq!(camera.movement_speed(), DEFAULT_SPEED + 2.0);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);

        controls.set_shift(true);
        controls.scroll(&mut camera, 5.0);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM - 5.0);
        assert_eq!(camera.movement_speed(), DEFAULT_SPEED + 2.0);
    }

    #[test]
    fn test_click_resets() {
        let mut controls = ViewControls::default();
        let start = Vec3::new(0.0, 3.0, 18.0);
        let mut camera = FlyCamera::new(start);

        camera.position = Vec3::new(5.0, 5.0, 5.0);
        camera.adjust_movement_speed(3.0);
        camera.adjust_zoom(10.0);

        controls.click(&mut camera, PointerButton::Left);
        assert_eq!(camera.position, start);

        controls.click(&mut camera, PointerButton::Right);
        assert_eq!(camera.movement_speed(), DEFAULT_SPEED);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM - 10.0);

        controls.set_shift(true);
        controls.click(&mut camera, PointerButton::Right);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn test_camera_adjustments_are_logged() {
        let mut controls = ViewControls::default();
        let mut camera = FlyCamera::new(Vec3::ZERO);

        let logs = LogCapture::default().run(|| {
            controls.scroll(&mut camera, 1.0);
            controls.click(&mut camera, PointerButton::Left);
            controls.click(&mut camera, PointerButton::Right);
            controls.set_shift(true);
            controls.scroll(&mut camera, 1.0);
            controls.click(&mut camera, PointerButton::Right);
        });

        for message in [
            "Camera movement speed adjusted",
            "Camera position reset",
            "Camera movement speed reset",
            "Camera zoom adjusted",
            "Camera zoom reset",
        ] {
            assert!(logs.contains(message), "missing '{message}' in:\n{logs}");
        }
    }

    #[test]
    fn test_commands() {
        let mut controls = ViewControls::default();
        let mut rig = LightRig::desk_lamps();

        assert_eq!(controls.projection(), ProjectionMode::Perspective);
        controls.apply_command(ViewCommand::SetOrthographic, &mut rig);
        assert_eq!(controls.projection(), ProjectionMode::Orthographic);
        controls.apply_command(ViewCommand::SetPerspective, &mut rig);
        assert_eq!(controls.projection(), ProjectionMode::Perspective);

        controls.apply_command(ViewCommand::EnableOrbit, &mut rig);
        assert!(rig.orbiting);
        controls.apply_command(ViewCommand::DisableOrbit, &mut rig);
        assert!(!rig.orbiting);

        assert_eq!(
            controls.apply_command(ViewCommand::Quit, &mut rig),
            CommandOutcome::Exit
        );
    }

    #[test]
    fn test_apply_frame_moves_along_held_directions() {
        let mut controls = ViewControls::default();
        let mut camera = FlyCamera::new(Vec3::ZERO);

        controls.set_move(MoveFlags::FORWARD, true);
        controls.set_move(MoveFlags::RIGHT, true);
        controls.apply_frame(&mut camera, 1.0);

        // Default orientation looks down -Z with +X to the right.
        let expected = Vec3::new(DEFAULT_SPEED, 0.0, -DEFAULT_SPEED);
        assert!((camera.position - expected).length() < 1e-5);

        // Opposite directions cancel.
        controls.set_move(MoveFlags::BACKWARD, true);
        controls.set_move(MoveFlags::LEFT, true);
        let before = camera.position;
        controls.apply_frame(&mut camera, 0.5);
        assert!((camera.position - before).length() < 1e-5);
    }
}
