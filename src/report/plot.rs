//! Diagnostic scatter of sentiment against momentum exposure

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::overlay::{Insight, OverlayTable};

/// Both axes span [-AXIS_LIMIT, AXIS_LIMIT]
const AXIS_LIMIT: f64 = 1.1;

fn insight_color(insight: Insight) -> RGBColor {
    match insight {
        Insight::NegativeSentimentHighMomentum => RGBColor(214, 39, 40),
        Insight::PositiveSentimentLosingMomentum => RGBColor(255, 127, 14),
        Insight::Normal => RGBColor(31, 119, 180),
    }
}

/// Render one marker per overlay row: x = momentum, y = sentiment,
/// color by insight, marker shape cycling by ticker. Grey reference
/// lines mark x = 0 and y = 0.
pub fn render_scatter(table: &OverlayTable, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Sentiment vs Momentum Overlay", ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-AXIS_LIMIT..AXIS_LIMIT, -AXIS_LIMIT..AXIS_LIMIT)?;

    chart
        .configure_mesh()
        .x_desc("Momentum Exposure")
        .y_desc("Sentiment Score")
        .draw()?;

    let reference = BLACK.mix(0.4).stroke_width(1);
    chart.draw_series(LineSeries::new([(-AXIS_LIMIT, 0.0), (AXIS_LIMIT, 0.0)], reference))?;
    chart.draw_series(LineSeries::new([(0.0, -AXIS_LIMIT), (0.0, AXIS_LIMIT)], reference))?;

    for (idx, row) in table.rows.iter().enumerate() {
        let color = insight_color(row.insight);
        let point = (row.factors.momentum, row.sentiment);
        let label = format!("{} - {}", row.ticker, row.insight);

        match idx % 3 {
            0 => chart
                .draw_series(std::iter::once(Circle::new(point, 6, color.filled())))?
                .label(label)
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled())),
            1 => chart
                .draw_series(std::iter::once(TriangleMarker::new(point, 7, color.filled())))?
                .label(label)
                .legend(move |(x, y)| TriangleMarker::new((x, y), 5, color.filled())),
            _ => chart
                .draw_series(std::iter::once(Cross::new(point, 6, color.stroke_width(2))))?
                .label(label)
                .legend(move |(x, y)| Cross::new((x, y), 5, color.stroke_width(2))),
        };

        chart.draw_series(std::iter::once(Text::new(
            row.ticker.clone(),
            (point.0 + 0.02, point.1 + 0.03),
            ("sans-serif", 12).into_font(),
        )))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;

    root.present()?;
    Ok(())
}
