//! Geometry for the dashboard's small charts: the sales split pie, the
//! horizontal ranking bars and the KPI sparklines.

use crate::aggregate::{safe_max, safe_min, safe_sum};

/// Canvas is 200x200 with the pie centred.
pub const PIE_CENTER: f64 = 100.0;
pub const PIE_RADIUS: f64 = 80.0;

/// Slices start at the top of the circle and run clockwise.
const START_ANGLE: f64 = -90.0;

pub const PALETTE: [&str; 8] = [
    "#06a77d", "#1c3d5a", "#796d5f", "#2185c7", "#e6e1c4", "#ff8c00", "#4b5563", "#10b981",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the total, 0..=100.
    pub percentage: f64,
    /// Degrees.
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: &'static str,
}

impl PieSlice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn large_arc(&self) -> bool {
        self.sweep() > 180.0
    }

    pub fn start_point(&self) -> (f64, f64) {
        point_on_circle(self.start_angle)
    }

    pub fn end_point(&self) -> (f64, f64) {
        point_on_circle(self.end_angle)
    }

    /// SVG path data for this wedge.
    pub fn svg_path(&self) -> String {
        let (x1, y1) = self.start_point();
        let (x2, y2) = self.end_point();

        // A full circle has identical endpoints, which SVG draws as nothing.
        if self.sweep() >= 360.0 - f64::EPSILON {
            let (mx, my) = point_on_circle(self.start_angle + 180.0);
            return format!(
                "M {x1} {y1} A {r} {r} 0 1 1 {mx} {my} A {r} {r} 0 1 1 {x1} {y1} Z",
                r = PIE_RADIUS
            );
        }

        format!(
            "M {c} {c} L {x1} {y1} A {r} {r} 0 {flag} 1 {x2} {y2} Z",
            c = PIE_CENTER,
            r = PIE_RADIUS,
            flag = u8::from(self.large_arc()),
        )
    }
}

fn point_on_circle(angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (PIE_CENTER + PIE_RADIUS * rad.cos(), PIE_CENTER + PIE_RADIUS * rad.sin())
}

/// Splits the circle proportionally to each value.
///
/// Negative and NaN values count as zero. When the total is zero there is
/// nothing to draw and no slices are returned.
pub fn pie_slices<S: AsRef<str>>(items: &[(S, f64)]) -> Vec<PieSlice> {
    let values: Vec<f64> = items
        .iter()
        .map(|(_, v)| if v.is_nan() || *v < 0.0 { 0.0 } else { *v })
        .collect();
    let total = safe_sum(values.iter().copied());
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }

    let mut current = START_ANGLE;
    items
        .iter()
        .zip(values)
        .enumerate()
        .map(|(index, ((label, _), value))| {
            let share = value / total;
            let start_angle = current;
            let end_angle = start_angle + share * 360.0;
            current = end_angle;
            PieSlice {
                label: label.as_ref().to_string(),
                value,
                percentage: share * 100.0,
                start_angle,
                end_angle,
                color: PALETTE[index % PALETTE.len()],
            }
        })
        .collect()
}

/// Bar length as a percentage of the longest bar, clamped to 0..=100.
pub fn bar_width_percent(value: f64, max: f64) -> f64 {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

/// Bar widths for a whole series, scaled against its own maximum.
pub fn bar_widths(values: &[f64]) -> Vec<f64> {
    let max = safe_max(values.iter().copied());
    values.iter().map(|v| bar_width_percent(*v, max)).collect()
}

/// Normalises a series into 0..=1. A flat series sits in the middle.
pub fn sparkline_points(values: &[f64]) -> Vec<f64> {
    let max = safe_max(values.iter().copied());
    let min = safe_min(values.iter().copied());
    let range = max - min;

    values
        .iter()
        .map(|v| {
            if v.is_nan() {
                0.0
            } else if range <= 0.0 {
                0.5
            } else {
                ((v - min) / range).clamp(0.0, 1.0)
            }
        })
        .collect()
}

/// Block-character rendering of [`sparkline_points`] for terminals.
pub fn sparkline(values: &[f64]) -> String {
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    sparkline_points(values)
        .into_iter()
        .map(|p| BLOCKS[((p * (BLOCKS.len() - 1) as f64).round() as usize).min(BLOCKS.len() - 1)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_pie_slices_cover_the_circle() {
        let slices = pie_slices(&[("Beverages", 300.0), ("Dairy", 100.0)]);
        assert_eq!(slices.len(), 2);

        assert!(close(slices[0].percentage, 75.0));
        assert!(close(slices[0].start_angle, -90.0));
        assert!(close(slices[0].end_angle, 180.0));
        assert!(slices[0].large_arc());

        assert!(close(slices[1].start_angle, 180.0));
        assert!(close(slices[1].end_angle, 270.0));
        assert!(!slices[1].large_arc());
        assert_eq!(slices[1].color, PALETTE[1]);
    }

    #[test]
    fn test_first_slice_starts_at_top() {
        let slices = pie_slices(&[("Only", 5.0), ("Other", 5.0)]);
        let (x, y) = slices[0].start_point();
        assert!(close(x, 100.0));
        assert!(close(y, 20.0));
        assert!(slices[0].svg_path().starts_with("M 100 100 L "));
    }

    #[test]
    fn test_zero_total_yields_no_slices() {
        assert!(pie_slices(&[("A", 0.0), ("B", f64::NAN)]).is_empty());
        assert!(pie_slices::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_single_slice_draws_full_circle() {
        let slices = pie_slices(&[("All", 42.0)]);
        assert!(close(slices[0].sweep(), 360.0));
        assert_eq!(slices[0].svg_path().matches(" A ").count(), 2);
    }

    #[test]
    fn test_bar_widths() {
        assert_eq!(bar_widths(&[50.0, 100.0, 25.0]), vec![50.0, 100.0, 25.0]);
        assert_eq!(bar_width_percent(10.0, 0.0), 0.0);
        assert_eq!(bar_width_percent(150.0, 100.0), 100.0);
        assert_eq!(bar_width_percent(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn test_sparkline_points() {
        assert_eq!(sparkline_points(&[10.0, 20.0, 15.0]), vec![0.0, 1.0, 0.5]);
        assert_eq!(sparkline_points(&[7.0, 7.0]), vec![0.5, 0.5]);
        assert!(sparkline_points(&[]).is_empty());
        assert_eq!(sparkline(&[0.0, 1.0]), "▁█");
    }
}
