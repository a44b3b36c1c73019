// input.rs — winit 输入归一化

use winit::event::MouseScrollDelta;

/// Pixels per wheel "line", matching what browsers report for one notch.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Convert a winit wheel delta to a DOM-style `deltaY`: positive means the
/// wheel moved toward the user (scroll down, zoom out).
pub fn wheel_delta_y(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
    }
}

/// Cursor position mapped to [-1, 1] on both axes, (0, 0) at the center.
pub fn normalized_pointer(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    (
        ((x / width) * 2.0 - 1.0).clamp(-1.0, 1.0),
        ((y / height) * 2.0 - 1.0).clamp(-1.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn scrolling_down_is_positive() {
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, -1.0)), 100.0);
        assert_eq!(wheel_delta_y(MouseScrollDelta::LineDelta(0.0, 2.0)), -200.0);
        assert_eq!(
            wheel_delta_y(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -35.0))),
            35.0
        );
    }

    #[test]
    fn pointer_normalizes_to_unit_square() {
        assert_eq!(normalized_pointer(0.0, 0.0, 800.0, 600.0), (-1.0, -1.0));
        assert_eq!(normalized_pointer(400.0, 300.0, 800.0, 600.0), (0.0, 0.0));
        assert_eq!(normalized_pointer(800.0, 600.0, 800.0, 600.0), (1.0, 1.0));
        assert_eq!(normalized_pointer(10.0, 10.0, 0.0, 600.0), (0.0, 0.0));
    }
}
