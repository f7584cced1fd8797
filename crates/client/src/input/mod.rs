//! Input handling for the client.
//!
//! Converts winit events to view control updates.

use deskscene_core::{
    CommandOutcome, FlyCamera, LightRig, MoveFlags, PointerButton, ViewCommand, ViewControls,
};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels of trackpad scrolling treated as one wheel notch.
const PIXELS_PER_LINE: f32 = 40.0;

/// What a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Held movement key (a `MoveFlags` bit).
    Move(u16),
    /// Shift, which changes what scroll and right click do.
    Modifier,
    Command(ViewCommand),
}

pub fn map_key(key: PhysicalKey) -> Option<KeyAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let action = match code {
        KeyCode::KeyW => KeyAction::Move(MoveFlags::FORWARD),
        KeyCode::KeyS => KeyAction::Move(MoveFlags::BACKWARD),
        KeyCode::KeyA => KeyAction::Move(MoveFlags::LEFT),
        KeyCode::KeyD => KeyAction::Move(MoveFlags::RIGHT),
        KeyCode::KeyQ => KeyAction::Move(MoveFlags::UP),
        KeyCode::KeyE => KeyAction::Move(MoveFlags::DOWN),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => KeyAction::Modifier,
        KeyCode::KeyO => KeyAction::Command(ViewCommand::SetOrthographic),
        KeyCode::KeyP => KeyAction::Command(ViewCommand::SetPerspective),
        KeyCode::KeyL => KeyAction::Command(ViewCommand::EnableOrbit),
        KeyCode::KeyK => KeyAction::Command(ViewCommand::DisableOrbit),
        KeyCode::Escape => KeyAction::Command(ViewCommand::Quit),
        _ => return None,
    };
    Some(action)
}

pub fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Vertical scroll in wheel notches.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

/// Apply a key event. Commands fire on press only, ignoring key repeat.
pub fn process_key(
    controls: &mut ViewControls,
    lights: &mut LightRig,
    key: PhysicalKey,
    state: ElementState,
    repeat: bool,
) -> CommandOutcome {
    let pressed = state == ElementState::Pressed;

    match map_key(key) {
        Some(KeyAction::Move(flag)) => controls.set_move(flag, pressed),
        Some(KeyAction::Modifier) => controls.set_shift(pressed),
        Some(KeyAction::Command(command)) if pressed && !repeat => {
            return controls.apply_command(command, lights);
        }
        _ => {}
    }
    CommandOutcome::Continue
}

/// Apply a mouse button event; actions fire on press.
pub fn process_button(
    controls: &mut ViewControls,
    camera: &mut FlyCamera,
    button: MouseButton,
    state: ElementState,
) {
    if state != ElementState::Pressed {
        return;
    }
    if let Some(button) = map_button(button) {
        controls.click(camera, button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskscene_core::ProjectionMode;

    fn send(
        controls: &mut ViewControls,
        lights: &mut LightRig,
        code: KeyCode,
        state: ElementState,
        repeat: bool,
    ) -> CommandOutcome {
        process_key(controls, lights, PhysicalKey::Code(code), state, repeat)
    }

    #[test]
    fn input_mapping() {
        let mut controls = ViewControls::default();
        let mut lights = LightRig::desk_lamps();

        // Press W
        send(&mut controls, &mut lights, KeyCode::KeyW, ElementState::Pressed, false);
        assert!(controls.moves().is_pressed(MoveFlags::FORWARD));
        assert!(!controls.moves().is_pressed(MoveFlags::BACKWARD));

        // Press Q
        send(&mut controls, &mut lights, KeyCode::KeyQ, ElementState::Pressed, false);
        assert!(controls.moves().is_pressed(MoveFlags::UP));

        // Release W
        send(&mut controls, &mut lights, KeyCode::KeyW, ElementState::Released, false);
        assert!(!controls.moves().is_pressed(MoveFlags::FORWARD));
        assert!(controls.moves().is_pressed(MoveFlags::UP));
    }

    #[test]
    fn shift_tracking() {
        let mut controls = ViewControls::default();
        let mut lights = LightRig::desk_lamps();
        send(&mut controls, &mut lights, KeyCode::ShiftRight, ElementState::Pressed, false);
        assert!(controls.shift());
        send(&mut controls, &mut lights, KeyCode::ShiftRight, ElementState::Released, false);
        assert!(!controls.shift());
    }

    #[test]
    fn commands_fire_on_press() {
        let mut controls = ViewControls::default();
        let mut lights = LightRig::desk_lamps();
        let o = PhysicalKey::Code(KeyCode::KeyO);

        process_key(&mut controls, &mut lights, o, ElementState::Released, false);
        assert_eq!(controls.projection(), ProjectionMode::Perspective);
        process_key(&mut controls, &mut lights, o, ElementState::Pressed, false);
        assert_eq!(controls.projection(), ProjectionMode::Orthographic);

        send(&mut controls, &mut lights, KeyCode::KeyL, ElementState::Pressed, false);
        assert!(lights.orbiting);

        let outcome = send(
            &mut controls,
            &mut lights,
            KeyCode::Escape,
            ElementState::Pressed,
            false,
        );
        assert_eq!(outcome, CommandOutcome::Exit);

        let outcome = send(
            &mut controls,
            &mut lights,
            KeyCode::Escape,
            ElementState::Pressed,
            true,
        );
        assert_eq!(outcome, CommandOutcome::Continue);
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyZ)), None);
        assert_eq!(map_button(MouseButton::Back), None);
    }

    #[test]
    fn scroll_units() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let pixels = MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, 80.0));
        assert_eq!(scroll_lines(pixels), 2.0);
    }

    #[test]
    fn left_click_resets_position() {
        let mut controls = ViewControls::default();
        let mut camera = FlyCamera::new(glam::Vec3::new(0.0, 3.0, 18.0));
        camera.position = glam::Vec3::ZERO;
        process_button(&mut controls, &mut camera, MouseButton::Left, ElementState::Released);
        assert_eq!(camera.position, glam::Vec3::ZERO);
        process_button(&mut controls, &mut camera, MouseButton::Left, ElementState::Pressed);
        assert_eq!(camera.position, glam::Vec3::new(0.0, 3.0, 18.0));
    }
}
