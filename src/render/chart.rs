//! SVG scatter chart of a report
//!
//! x is the attempt's sequence position, y its similarity. Successes are
//! circles, failures triangles, the threshold a dashed line. Reference points
//! are drawn as a line only and never get a tooltip.

use super::format::{tooltip_lines, xml_escape};
use crate::report::{ChartDataset, DisplayThreshold, PlotPoint, RealPoint, ReferencePoint};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const POINT_RADIUS: f64 = 4.0;
const MAX_X_TICKS: usize = 10;

const SUCCESS_FILL: &str = "rgba(75, 192, 192, 0.6)";
const SUCCESS_STROKE: &str = "rgba(75, 192, 192, 1)";
const FAILURE_FILL: &str = "rgba(255, 99, 132, 0.5)";
const FAILURE_STROKE: &str = "rgba(255, 99, 132, 1)";
const THRESHOLD_STROKE: &str = "rgba(0, 0, 0, 0.7)";

/// Maps data coordinates into the plot area
struct Scale {
    max_x: f64,
}

impl Scale {
    fn for_dataset(dataset: &ChartDataset) -> Self {
        // Domain matches the reference line: 0 ..= N + 1
        Self {
            max_x: (dataset.len() + 1) as f64,
        }
    }

    fn x(&self, x: usize) -> f64 {
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (x as f64 / self.max_x) * plot_width
    }

    fn y(&self, y: f64) -> f64 {
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - y.clamp(0.0, 1.0) * plot_height
    }
}

pub fn render_chart(dataset: &ChartDataset, threshold: DisplayThreshold) -> String {
    let scale = Scale::for_dataset(dataset);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"chart\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" role=\"img\">"
    ));

    push_axes(&mut svg, &scale, dataset.len());
    push_legend(&mut svg, threshold);

    if dataset.is_empty() {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" class=\"chart__empty\">No login attempts found</text>",
            WIDTH / 2.0,
            HEIGHT / 2.0
        ));
        svg.push_str("</svg>");
        return svg;
    }

    let mut reference: Vec<&ReferencePoint> = Vec::new();
    for point in dataset.plot_points() {
        match point {
            PlotPoint::Real(p) => push_marker(&mut svg, &scale, p),
            PlotPoint::Reference(p) => reference.push(p),
        }
    }

    if let (Some(start), Some(end)) = (reference.first(), reference.last()) {
        svg.push_str(&format!(
            "<line class=\"threshold-line\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{THRESHOLD_STROKE}\" stroke-width=\"2\" stroke-dasharray=\"5 5\"/>",
            scale.x(start.x),
            scale.y(start.y),
            scale.x(end.x),
            scale.y(end.y),
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn push_marker(svg: &mut String, scale: &Scale, point: &RealPoint) {
    let cx = scale.x(point.x);
    let cy = scale.y(point.y);
    let title = xml_escape(&tooltip_lines(point).join("\n"));

    let shape = if point.passed {
        format!(
            "<circle class=\"point point--success\" cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{POINT_RADIUS}\" fill=\"{SUCCESS_FILL}\" stroke=\"{SUCCESS_STROKE}\"/>"
        )
    } else {
        let r = POINT_RADIUS + 1.0;
        format!(
            "<polygon class=\"point point--failure\" points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{FAILURE_FILL}\" stroke=\"{FAILURE_STROKE}\"/>",
            cx,
            cy - r,
            cx - r,
            cy + r * 0.8,
            cx + r,
            cy + r * 0.8,
        )
    };

    svg.push_str(&format!("<g class=\"attempt\"><title>{title}</title>{shape}</g>"));
}

fn push_axes(svg: &mut String, scale: &Scale, count: usize) {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    svg.push_str(&format!(
        "<g class=\"axes\" stroke=\"#888\" stroke-width=\"1\"><line x1=\"{left}\" y1=\"{bottom}\" x2=\"{right}\" y2=\"{bottom}\"/><line x1=\"{left}\" y1=\"{top}\" x2=\"{left}\" y2=\"{bottom}\"/></g>"
    ));

    // y: 0.0 ..= 1.0 in steps of 0.1
    for step in 0..=10 {
        let value = step as f64 / 10.0;
        let y = scale.y(value);
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{left}\" y2=\"{y:.2}\" stroke=\"#888\"/><text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-size=\"11\">{value:.1}</text>",
            left - 4.0,
            left - 8.0,
            y + 4.0,
        ));
    }

    // x: integer positions only
    let stride = count.div_ceil(MAX_X_TICKS).max(1);
    for position in (1..=count).step_by(stride) {
        let x = scale.x(position);
        svg.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{bottom}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"#888\"/><text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"11\">{position}</text>",
            bottom + 4.0,
            bottom + 16.0,
        ));
    }

    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"12\">Login Attempts (Time Sequence)</text>",
        (left + right) / 2.0,
        HEIGHT - 10.0,
    ));
    svg.push_str(&format!(
        "<text x=\"14\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"12\" transform=\"rotate(-90 14 {:.2})\">Similarity</text>",
        (top + bottom) / 2.0,
        (top + bottom) / 2.0,
    ));
}

fn push_legend(svg: &mut String, threshold: DisplayThreshold) {
    let y = 18.0;
    svg.push_str(&format!(
        "<g class=\"legend\" font-size=\"12\">\
<circle cx=\"{:.2}\" cy=\"{y}\" r=\"{POINT_RADIUS}\" fill=\"{SUCCESS_FILL}\" stroke=\"{SUCCESS_STROKE}\"/>\
<text x=\"{:.2}\" y=\"{:.2}\">Successful Attempts</text>\
<polygon points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{FAILURE_FILL}\" stroke=\"{FAILURE_STROKE}\"/>\
<text x=\"{:.2}\" y=\"{:.2}\">Failed Attempts</text>\
<line x1=\"{:.2}\" y1=\"{y}\" x2=\"{:.2}\" y2=\"{y}\" stroke=\"{THRESHOLD_STROKE}\" stroke-width=\"2\" stroke-dasharray=\"5 5\"/>\
<text x=\"{:.2}\" y=\"{:.2}\">Threshold ({})</text>\
</g>",
        MARGIN_LEFT + 10.0,
        MARGIN_LEFT + 20.0,
        y + 4.0,
        MARGIN_LEFT + 190.0,
        y - 5.0,
        MARGIN_LEFT + 185.0,
        y + 4.0,
        MARGIN_LEFT + 195.0,
        y + 4.0,
        MARGIN_LEFT + 205.0,
        y + 4.0,
        MARGIN_LEFT + 340.0,
        MARGIN_LEFT + 370.0,
        MARGIN_LEFT + 378.0,
        y + 4.0,
        threshold,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttemptRecord;
    use crate::report::{ReportParams, ReportView};

    fn view(records: &[AttemptRecord]) -> ReportView {
        ReportView::build(
            records,
            ReportParams {
                window: 100,
                threshold: DisplayThreshold::new(0.88).unwrap(),
            },
        )
    }

    #[test]
    fn test_markers_match_series() {
        let records = vec![
            AttemptRecord::new("a", 0.95, "2024-01-01T00:00:01Z", true),
            AttemptRecord::new("b", 0.40, "2024-01-01T00:00:02Z", false),
            AttemptRecord::new("c", 1.2, "2024-01-01T00:00:03Z", true),
        ];
        let view = view(&records);
        let svg = render_chart(&view.dataset, view.threshold);

        assert!(svg.starts_with("<svg") && svg.ends_with("</svg>"));
        assert_eq!(svg.matches("point point--success").count(), 2);
        assert_eq!(svg.matches("point point--failure").count(), 1);
        assert_eq!(svg.matches("<title>").count(), 3);
        assert_eq!(svg.matches("class=\"threshold-line\"").count(), 1);
        assert!(svg.contains("Threshold (0.88)"));
    }

    #[test]
    fn test_threshold_line_spans_plot_area() {
        let records = vec![AttemptRecord::new("a", 0.5, "2024-01-01T00:00:01Z", false)];
        let view = view(&records);
        let svg = render_chart(&view.dataset, view.threshold);

        let x1 = format!("x1=\"{:.2}\"", MARGIN_LEFT);
        let x2 = format!("x2=\"{:.2}\"", WIDTH - MARGIN_RIGHT);
        let line = svg
            .split("<line class=\"threshold-line\"")
            .nth(1)
            .unwrap();
        assert!(line.contains(&x1));
        assert!(line.contains(&x2));
    }

    #[test]
    fn test_tooltip_input_is_escaped() {
        let records = vec![AttemptRecord::new("<script>x</script>", 0.9, "2024-01-01T00:00:01Z", true)];
        let view = view(&records);
        let svg = render_chart(&view.dataset, view.threshold);

        assert!(!svg.contains("<script>"));
        assert!(svg.contains("Password Input: &lt;script&gt;x&lt;/script&gt;"));
        assert!(svg.contains("Similarity: 0.9000"));
    }

    #[test]
    fn test_empty_dataset_has_no_line_or_markers() {
        let view = view(&[]);
        let svg = render_chart(&view.dataset, view.threshold);

        assert!(svg.contains("No login attempts found"));
        assert!(!svg.contains("threshold-line"));
        assert!(!svg.contains("<title>"));
    }

    #[test]
    fn test_x_ticks_are_thinned_for_large_windows() {
        let records: Vec<AttemptRecord> = (0..100)
            .map(|i| AttemptRecord::new("x", 0.5, format!("2024-01-01T00:{:02}:{:02}Z", i / 60, i % 60), true))
            .collect();
        let view = view(&records);
        let svg = render_chart(&view.dataset, view.threshold);

        // 1, 11, 21, ..., 91
        assert!(svg.contains(">91</text>"));
        assert!(!svg.contains(">92</text>"));
    }
}
