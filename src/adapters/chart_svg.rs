//! Multi-series SVG line charts of cumulative returns.

use crate::domain::returns::ReturnTable;

const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 130.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 30.0;
const LEGEND_ROW: f64 = 14.0;

const PALETTE: [&str; 10] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
    "#475569", "#ea580c",
];

fn fmt_pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Render every column of `returns` as one line, with a legend on the right.
///
/// Missing cells break the line rather than being drawn as zero. Returns an
/// empty string when the table has no finite value to plot.
pub fn generate_returns_svg(returns: &ReturnTable, title: &str) -> String {
    let values = returns.columns().flat_map(|(_, c)| c.iter().flatten().copied());
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return String::new();
    }
    let range = (max - min).max(1e-9);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let rows = returns.len();

    let x_scale =
        |i: usize| -> f64 { MARGIN_LEFT + (i as f64 / (rows - 1).max(1) as f64) * plot_width };
    let y_scale = |v: f64| -> f64 { MARGIN_TOP + plot_height - ((v - min) / range) * plot_height };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{CHART_WIDTH}" height="{CHART_HEIGHT}" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" xmlns="http://www.w3.org/2000/svg" role="img" aria-label="{}">"##,
        escape(title)
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    // Axes
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        CHART_WIDTH - MARGIN_RIGHT,
        y = CHART_HEIGHT - MARGIN_BOTTOM
    ));
    if min < 0.0 && max > 0.0 {
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{}\" y2=\"{y:.1}\" stroke=\"#999\" stroke-dasharray=\"4 3\" stroke-width=\"1\"/>\n",
            CHART_WIDTH - MARGIN_RIGHT,
            y = y_scale(0.0)
        ));
    }

    for (value, y) in [
        (max, MARGIN_TOP + 5.0),
        ((max + min) / 2.0, MARGIN_TOP + plot_height / 2.0),
        (min, CHART_HEIGHT - MARGIN_BOTTOM - 5.0),
    ] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{y}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            MARGIN_LEFT - 5.0,
            fmt_pct(value)
        ));
    }

    let dates = returns.dates();
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        let mid = dates[dates.len() / 2];
        for (x, label) in [
            (MARGIN_LEFT, first),
            (MARGIN_LEFT + plot_width / 2.0, &mid),
            (CHART_WIDTH - MARGIN_RIGHT, last),
        ] {
            svg.push_str(&format!(
                "  <text x=\"{x}\" y=\"{CHART_HEIGHT}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{label}</text>\n"
            ));
        }
    }

    for (n, (symbol, column)) in returns.columns().enumerate() {
        let color = PALETTE[n % PALETTE.len()];
        let mut path_data = String::new();
        let mut pen_down = false;
        for (i, cell) in column.iter().enumerate() {
            match cell {
                Some(v) => {
                    let cmd = if pen_down { " L" } else { " M" };
                    path_data.push_str(&format!("{cmd} {:.1} {:.1}", x_scale(i), y_scale(*v)));
                    pen_down = true;
                }
                None => pen_down = false,
            }
        }
        if !path_data.is_empty() {
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"1.5\"/>\n",
                path_data.trim_start()
            ));
        }

        let legend_y = MARGIN_TOP + n as f64 * LEGEND_ROW;
        let legend_x = CHART_WIDTH - MARGIN_RIGHT + 10.0;
        svg.push_str(&format!(
            "  <rect x=\"{legend_x}\" y=\"{}\" width=\"10\" height=\"3\" fill=\"{color}\"/>\n",
            legend_y + 4.0
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#333\">{}</text>\n",
            legend_x + 14.0,
            legend_y + 9.0,
            escape(symbol)
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use crate::domain::price_table::PriceTable;
    use crate::domain::returns::cumulative_returns;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn returns() -> ReturnTable {
        cumulative_returns(&PriceTable::from_series(vec![
            (
                "M&M.NS",
                vec![
                    PricePoint::new(day(1), 100.0),
                    PricePoint::new(day(2), 110.0),
                    PricePoint::new(day(3), 120.0),
                ],
            ),
            (
                "LATE",
                vec![PricePoint::new(day(2), 50.0), PricePoint::new(day(3), 40.0)],
            ),
        ]))
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert!(generate_returns_svg(&ReturnTable::default(), "Empty").is_empty());
    }

    #[test]
    fn one_path_per_series() {
        let svg = generate_returns_svg(&returns(), "Best 90 days");
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("stroke=\"#2563eb\""));
        assert!(svg.contains("stroke=\"#dc2626\""));
    }

    #[test]
    fn legend_is_escaped() {
        let svg = generate_returns_svg(&returns(), "A & B");
        assert!(svg.contains("M&amp;M.NS"));
        assert!(svg.contains("aria-label=\"A &amp; B\""));
    }

    #[test]
    fn leading_gap_starts_line_later() {
        let svg = generate_returns_svg(&returns(), "t");
        // LATE has no value on day 1, so its path opens at the second x position.
        let late = svg
            .lines()
            .filter(|l| l.contains("<path"))
            .nth(1)
            .unwrap();
        assert!(late.contains("d=\"M 325.0"));
    }

    #[test]
    fn axis_labels_show_percent_and_dates() {
        let svg = generate_returns_svg(&returns(), "t");
        assert!(svg.contains("20.0%"));
        assert!(svg.contains("-20.0%"));
        assert!(svg.contains("2024-01-01"));
        assert!(svg.contains("2024-01-03"));
    }

    #[test]
    fn zero_line_drawn_when_crossing() {
        let svg = generate_returns_svg(&returns(), "t");
        assert!(svg.contains("stroke-dasharray"));
    }
}
