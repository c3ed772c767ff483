use crate::coords::Viewport;
use crate::input::{InputEvent, InputFrame, InputState, Key, MouseButton, MouseWheelDelta};
use crate::settings::SharedSettings;

// Zoom-factor change per wheel notch and its clamp range.
const ZOOM_STEP: f32 = 1.25;
const ZOOM_MIN: f32 = 1.0e-4;
const ZOOM_MAX: f32 = 1.0e4;

// High-precision wheel input: device pixels per synthetic notch.
const PIXELS_PER_NOTCH: f32 = 120.0;

// Keyboard pan step as a fraction of the viewport extent.
const PAN_FRACTION: f32 = 0.1;

/// Mouse/keyboard navigation for the viewport camera.
///
/// Left-drag pans, the wheel zooms around the view, arrow keys pan, `-`/`=`
/// zoom, and Home/`R` reset the camera. All camera writes go through the
/// shared settings lock.
#[derive(Debug, Default)]
pub struct PanZoomController {
    drag: Option<DragOrigin>,
}

#[derive(Debug, Copy, Clone)]
struct DragOrigin {
    pointer: (f32, f32),
    camera: (f32, f32),
}

impl PanZoomController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes this frame's input and applies the resulting camera motion.
    pub fn handle(
        &mut self,
        input: &InputState,
        frame: &InputFrame,
        viewport: Viewport,
        settings: &SharedSettings,
    ) {
        self.handle_drag(input, frame, settings);
        self.handle_wheel(frame, settings);
        self.handle_keys(frame, viewport, settings);
    }

    fn handle_drag(&mut self, input: &InputState, frame: &InputFrame, settings: &SharedSettings) {
        if frame.buttons_pressed.contains(&MouseButton::Left) {
            if let Some(pointer) = input.pointer_pos {
                let camera = settings.mutate(|s| (s.camera_x, s.camera_y));
                self.drag = Some(DragOrigin { pointer, camera });
            }
        }

        if frame.buttons_released.contains(&MouseButton::Left)
            || !input.button_down(MouseButton::Left)
        {
            self.drag = None;
            return;
        }

        let (Some(origin), Some((px, py))) = (self.drag, input.pointer_pos) else {
            return;
        };

        let dx = px - origin.pointer.0;
        let dy = py - origin.pointer.1;

        settings.mutate(|s| {
            let zoom = s.zoom();
            // Content follows the pointer: screen X tracks world X directly,
            // screen Y is flipped by the projection correction.
            s.camera_x = origin.camera.0 - dx * zoom;
            s.camera_y = origin.camera.1 + dy * zoom;
        });
    }

    fn handle_wheel(&mut self, frame: &InputFrame, settings: &SharedSettings) {
        let mut notches = 0.0f32;
        for ev in &frame.events {
            if let InputEvent::MouseWheel { delta, .. } = ev {
                notches += match delta {
                    MouseWheelDelta::Line { y, .. } => *y,
                    MouseWheelDelta::Pixel { y, .. } => *y / PIXELS_PER_NOTCH,
                };
            }
        }

        if notches != 0.0 {
            zoom_by(settings, notches);
        }
    }

    fn handle_keys(&mut self, frame: &InputFrame, viewport: Viewport, settings: &SharedSettings) {
        for key in &frame.keys_pressed {
            match key {
                Key::ArrowLeft => pan(settings, -viewport.width * PAN_FRACTION, 0.0),
                Key::ArrowRight => pan(settings, viewport.width * PAN_FRACTION, 0.0),
                Key::ArrowUp => pan(settings, 0.0, viewport.height * PAN_FRACTION),
                Key::ArrowDown => pan(settings, 0.0, -viewport.height * PAN_FRACTION),
                Key::Equal => zoom_by(settings, 1.0),
                Key::Minus => zoom_by(settings, -1.0),
                Key::Home | Key::R => settings.mutate(|s| s.reset_camera()),
                _ => {}
            }
        }
    }
}

/// Pans by a pixel delta, converted to world units at the current zoom.
fn pan(settings: &SharedSettings, dx_px: f32, dy_px: f32) {
    settings.mutate(|s| {
        let zoom = s.zoom();
        s.camera_x += dx_px * zoom;
        s.camera_y += dy_px * zoom;
    });
}

/// Zooms by whole/fractional wheel notches; positive zooms in.
///
/// The zoom factor is world units per pixel, so zooming in divides.
fn zoom_by(settings: &SharedSettings, notches: f32) {
    settings.mutate(|s| {
        s.zoom_factor = (s.zoom_factor / ZOOM_STEP.powf(notches)).clamp(ZOOM_MIN, ZOOM_MAX);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{
        InputEvent, KeyState, Modifiers, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
    };
    use crate::settings::ViewSettings;

    struct Harness {
        controller: PanZoomController,
        state: InputState,
        frame: InputFrame,
        settings: SharedSettings,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                controller: PanZoomController::new(),
                state: InputState::default(),
                frame: InputFrame::default(),
                settings: SharedSettings::new(ViewSettings::default()),
            }
        }

        fn event(&mut self, ev: InputEvent) {
            self.state.apply_event(&mut self.frame, ev);
        }

        fn run(&mut self) {
            self.controller.handle(
                &self.state,
                &self.frame,
                Viewport::new(100.0, 100.0),
                &self.settings,
            );
            self.frame.clear();
        }

        fn camera(&self) -> (f32, f32) {
            let snap = self.settings.snapshot();
            (snap.settings.camera_x, snap.settings.camera_y)
        }
    }

    fn button(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn drag_pans_against_pointer_motion() {
        let mut h = Harness::new();

        h.event(button(MouseButtonState::Pressed, 50.0, 50.0));
        h.run();

        h.event(InputEvent::PointerMoved(PointerMoveEvent { x: 60.0, y: 45.0 }));
        h.run();

        // zoom = 1: 10 px right, 5 px up.
        let (cx, cy) = h.camera();
        assert_eq!(cx, -10.0);
        assert_eq!(cy, -5.0);
    }

    #[test]
    fn drag_scales_with_zoom() {
        let mut h = Harness::new();
        h.settings.mutate(|s| s.zoom_factor = 2.0);

        h.event(button(MouseButtonState::Pressed, 0.0, 0.0));
        h.run();
        h.event(InputEvent::PointerMoved(PointerMoveEvent { x: 10.0, y: 0.0 }));
        h.run();

        assert_eq!(h.camera().0, -20.0);
    }

    #[test]
    fn release_ends_the_drag() {
        let mut h = Harness::new();

        h.event(button(MouseButtonState::Pressed, 0.0, 0.0));
        h.run();
        h.event(button(MouseButtonState::Released, 5.0, 0.0));
        h.run();

        let after_release = h.camera();
        h.event(InputEvent::PointerMoved(PointerMoveEvent { x: 80.0, y: 0.0 }));
        h.run();

        assert_eq!(h.camera(), after_release);
    }

    #[test]
    fn wheel_zoom_is_multiplicative_and_clamped() {
        let mut h = Harness::new();

        h.event(InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 },
            modifiers: Modifiers::default(),
        });
        h.run();
        let z1 = h.settings.snapshot().settings.zoom_factor;
        assert!((z1 - 1.0 / ZOOM_STEP).abs() < 1e-6);

        for _ in 0..200 {
            h.event(InputEvent::MouseWheel {
                delta: MouseWheelDelta::Line { x: 0.0, y: -1.0 },
                modifiers: Modifiers::default(),
            });
            h.run();
        }
        assert!(h.settings.snapshot().settings.zoom_factor <= ZOOM_MAX);
    }

    #[test]
    fn home_resets_camera() {
        let mut h = Harness::new();
        h.settings.mutate(|s| {
            s.camera_x = 99.0;
            s.zoom_factor = 8.0;
        });

        h.event(InputEvent::Key {
            key: Key::Home,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        h.run();

        let snap = h.settings.snapshot().settings;
        assert_eq!(snap.camera_x, 0.0);
        assert_eq!(snap.zoom_factor, 1.0);
    }
}
