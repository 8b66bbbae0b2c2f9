use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Painter, Shape};

use lunchwheel_core::resolver::{segment_at_angle, FULL_TURN};

/// Share of the radius drawn as the outer rim.
const RIM_WIDTH: f64 = 0.06;
/// Radius of the hub in the middle.
const HUB_RADIUS: f64 = 0.08;
/// Distance from the center, as a share of the radius, where labels sit.
pub const LABEL_RADIUS: f64 = 0.62;

/// A filled wheel centered on the canvas origin. Segment `i` spans
/// `[i * w + rotation, (i + 1) * w + rotation)` degrees, counter-clockwise
/// from 3 o'clock, so the segment drawn under 12 o'clock is the resolved winner.
#[derive(Debug, Clone)]
pub struct WheelFace {
    pub colors: Vec<Color>,
    pub rotation: f64,
    pub radius: f64,
    pub rim: Color,
    /// Canvas units per dot, horizontally and vertically.
    pub step: (f64, f64),
}

impl WheelFace {
    /// Color of the wheel at canvas point `(x, y)`, or `None` outside it.
    pub fn color_at(&self, x: f64, y: f64) -> Option<Color> {
        let distance = x.hypot(y);
        if distance > self.radius || self.colors.is_empty() {
            return None;
        }
        if distance >= self.radius * (1.0 - RIM_WIDTH) || distance <= self.radius * HUB_RADIUS {
            return Some(self.rim);
        }
        let angle = y.atan2(x).to_degrees();
        let index = segment_at_angle(angle, self.colors.len(), self.rotation);
        self.colors.get(index).copied()
    }

    /// Canvas position for the label of segment `index`.
    pub fn label_anchor(&self, index: usize) -> (f64, f64) {
        let n = self.colors.len().max(1) as f64;
        let width = FULL_TURN / n;
        let center = ((index as f64 + 0.5) * width + self.rotation).to_radians();
        let r = self.radius * LABEL_RADIUS;
        (r * center.cos(), r * center.sin())
    }
}

impl Shape for WheelFace {
    fn draw(&self, painter: &mut Painter<'_, '_>) {
        let (step_x, step_y) = self.step;
        if step_x <= 0.0 || step_y <= 0.0 {
            return;
        }
        let mut y = -self.radius;
        while y <= self.radius {
            let mut x = -self.radius;
            while x <= self.radius {
                if let Some(color) = self.color_at(x, y) {
                    if let Some((px, py)) = painter.get_point(x, y) {
                        painter.paint(px, py, color);
                    }
                }
                x += step_x;
            }
            y += step_y;
        }
    }
}

/// Canvas bounds for a braille canvas filling `area` so a unit circle stays
/// round and leaves room for the pointer above it.
/// Returns `(x_bounds, y_bounds, step)`.
pub fn canvas_bounds(area: Rect) -> ([f64; 2], [f64; 2], (f64, f64)) {
    let w = f64::from(area.width.max(1));
    let h = f64::from(area.height.max(1));
    // Braille dots are roughly square: 2 per cell across, 4 per cell down.
    let half_y = 1.25_f64.max(1.15 * 2.0 * h / w);
    let half_x = half_y * w / (2.0 * h);
    let step = (2.0 * half_x / (2.0 * w), 2.0 * half_y / (4.0 * h));
    ([-half_x, half_x], [-half_y, half_y], step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunchwheel_core::resolver::{resolve_segment, POINTER_OFFSET_DEGREES};
    use ratatui::buffer::Buffer;
    use ratatui::symbols::Marker;
    use ratatui::widgets::canvas::Canvas;
    use ratatui::widgets::Widget;

    const PALETTE: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    fn face(rotation: f64) -> WheelFace {
        WheelFace {
            colors: PALETTE.to_vec(),
            rotation,
            radius: 1.0,
            rim: Color::White,
            step: (0.05, 0.05),
        }
    }

    #[test]
    fn test_color_under_pointer_is_winner() {
        for step in 0..50 {
            let rotation = 13.5 + step as f64 * 37.0;
            let winner = resolve_segment(rotation, PALETTE.len()).unwrap();
            // Half-degree rotations never put a boundary under the pointer
            let angle = POINTER_OFFSET_DEGREES.to_radians();
            let (x, y) = (0.7 * angle.cos(), 0.7 * angle.sin());
            assert_eq!(face(rotation).color_at(x, y), Some(PALETTE[winner]));
        }
    }

    #[test]
    fn test_rim_hub_and_outside() {
        let f = face(0.0);
        assert_eq!(f.color_at(0.0, 0.0), Some(Color::White));
        assert_eq!(f.color_at(0.99, 0.0), Some(Color::White));
        assert_eq!(f.color_at(1.1, 0.0), None);
        // At rotation 0 segment 0 starts at 3 o'clock
        assert_eq!(f.color_at(0.5, 0.05), Some(Color::Red));
        assert_eq!(f.color_at(-0.05, 0.5), Some(Color::Green));
    }

    #[test]
    fn test_label_anchor_sits_mid_segment() {
        let f = face(0.0);
        let (x, y) = f.label_anchor(0);
        // Segment 0 of four is centered at 45°
        assert!((x - y).abs() < 1e-9);
        assert!((x.hypot(y) - LABEL_RADIUS).abs() < 1e-9);
        assert_eq!(f.color_at(x, y), Some(Color::Red));
    }

    #[test]
    fn test_canvas_bounds_keep_circle_round() {
        let ([x0, x1], [y0, y1], (sx, sy)) = canvas_bounds(Rect::new(0, 0, 80, 20));
        assert!(y1 >= 1.25 && x1 >= 1.15);
        assert_eq!(x0, -x1);
        assert_eq!(y0, -y1);
        assert!((sx - sy).abs() < 1e-9);

        // Tall and narrow: width limits the size
        let ([_, x1], _, _) = canvas_bounds(Rect::new(0, 0, 10, 40));
        assert!(x1 >= 1.15 - 1e-9);
    }

    #[test]
    fn test_draws_onto_canvas() {
        let area = Rect::new(0, 0, 40, 20);
        let (x_bounds, y_bounds, step) = canvas_bounds(area);
        let shape = WheelFace {
            step,
            ..face(0.0)
        };
        let mut buf = Buffer::empty(area);
        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| ctx.draw(&shape))
            .render(area, &mut buf);

        let painted: Vec<Color> = buf.content().iter().map(|c| c.fg).collect();
        for color in PALETTE {
            assert!(painted.contains(&color), "{color:?} missing");
        }
        // Corners are outside the wheel
        assert_eq!(buf.content()[0].symbol(), " ");
    }
}
