//! PNG charts of singular value spectra and of the planar SVD stages.

use crate::geometry::GeometryStage;
use crate::spectrum::singular_value_at_rank;
use crate::types::{Result, SvdCompressionError};
use log::warn;
use ndarray::ArrayView1;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1400, 1000);
const PANEL_SIZE: (u32, u32) = (1600, 1600);
const GEOMETRY_LIMIT: f64 = 3.0;

fn plot_err<E: Display>(err: E) -> SvdCompressionError {
    SvdCompressionError::PlotError(err.to_string())
}

// Points (rank, value) for the ranks inside 1..=values.len().
fn marked_points(values: ArrayView1<f64>, ranks: &[usize]) -> Vec<(f64, f64)> {
    ranks
        .iter()
        .filter_map(|&rank| match singular_value_at_rank(values, rank) {
            Ok(value) => Some((rank as f64, value)),
            Err(err) => {
                warn!("Not marking rank {}: {}", rank, err);
                None
            }
        })
        .collect()
}

/// Plot the singular values `s` against the rank on a logarithmic axis.
///
/// The ranks in `marked_ranks` are highlighted. Non-positive singular values cannot be
/// shown on a log scale and are left out.
pub fn plot_singular_values<P: AsRef<Path>>(
    path: P,
    s: ArrayView1<f64>,
    marked_ranks: &[usize],
) -> Result<()> {
    let curve: Vec<(f64, f64)> = s
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value > 0.0)
        .map(|(index, &value)| ((index + 1) as f64, value))
        .collect();

    let (lower, upper) = curve
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(lower, upper), &(_, value)| {
            (lower.min(value), upper.max(value))
        });
    if curve.is_empty() {
        return Err(SvdCompressionError::PlotError(
            "no positive singular values to plot".to_string(),
        ));
    }

    let root = BitMapBackend::new(path.as_ref(), CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Singular values versus rank r", ("sans-serif", 36))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(
            0.0..(s.len() as f64 + 1.0),
            (0.5 * lower..2.0 * upper).log_scale(),
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Rank (r)")
        .y_desc("Singular value (log scale)")
        .y_label_formatter(&|item| format!("{:.1E}", item))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(curve, BLUE.stroke_width(2)))
        .map_err(plot_err)?
        .label("Singular values")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    let marks = marked_points(s, marked_ranks);
    if !marks.is_empty() {
        let caption = ranks_caption(&marks);
        chart
            .draw_series(
                marks
                    .into_iter()
                    .map(|point| Circle::new(point, 6, RED.filled())),
            )
            .map_err(plot_err)?
            .label(caption)
            .legend(|(x, y)| Circle::new((x + 10, y), 6, RED.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)
}

/// Plot the cumulative energy (as a percentage) against the rank.
pub fn plot_cumulative_energy<P: AsRef<Path>>(
    path: P,
    energy: ArrayView1<f64>,
    marked_ranks: &[usize],
) -> Result<()> {
    let percent = energy.mapv(|item| 100.0 * item);

    let root = BitMapBackend::new(path.as_ref(), CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative energy versus rank r", ("sans-serif", 36))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..(percent.len() as f64 + 1.0), 0.0..105.0)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Rank (r)")
        .y_desc("Cumulative sum (%)")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            percent
                .iter()
                .enumerate()
                .map(|(index, &value)| ((index + 1) as f64, value)),
            BLUE.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label("Cumulative energy")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    for (index, point) in marked_points(percent.view(), marked_ranks)
        .into_iter()
        .enumerate()
    {
        let color = Palette99::pick(index + 1).to_rgba();
        chart
            .draw_series(std::iter::once(Circle::new(point, 6, color.filled())))
            .map_err(plot_err)?
            .label(format!("r = {}", point.0))
            .legend(move |(x, y)| Circle::new((x + 10, y), 6, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)
}

/// Draw the geometry stages as panels of a grid with two columns.
pub fn plot_geometry_stages<P: AsRef<Path>>(path: P, stages: &[GeometryStage]) -> Result<()> {
    let root = BitMapBackend::new(path.as_ref(), PANEL_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let rows = (stages.len() + 1) / 2;
    let panels = root.split_evenly((rows.max(1), 2));

    for (panel, stage) in panels.iter().zip(stages) {
        draw_stage(panel, stage)?;
    }

    root.present().map_err(plot_err)
}

fn draw_stage(panel: &DrawingArea<BitMapBackend, Shift>, stage: &GeometryStage) -> Result<()> {
    let mut chart = ChartBuilder::on(panel)
        .caption(&stage.label, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(
            -GEOMETRY_LIMIT..GEOMETRY_LIMIT,
            -GEOMETRY_LIMIT..GEOMETRY_LIMIT,
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .map_err(plot_err)?;

    let axes = [
        vec![(-GEOMETRY_LIMIT, 0.0), (GEOMETRY_LIMIT, 0.0)],
        vec![(0.0, -GEOMETRY_LIMIT), (0.0, GEOMETRY_LIMIT)],
    ];
    chart
        .draw_series(axes.into_iter().map(|line| PathElement::new(line, BLACK)))
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            stage
                .points
                .columns()
                .into_iter()
                .map(|point| (point[0], point[1])),
            BLUE.stroke_width(3),
        ))
        .map_err(plot_err)?;

    for vector in stage.basis.columns() {
        let tip = (vector[0], vector[1]);
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, 0.0), tip],
                RED.stroke_width(2),
            )))
            .map_err(plot_err)?;
        if let Some(head) = arrow_head(tip) {
            chart
                .draw_series(std::iter::once(Polygon::new(head, RED.filled())))
                .map_err(plot_err)?;
        }
    }

    Ok(())
}

// Triangle at the tip of the arrow from the origin to `tip`, in data coordinates.
fn arrow_head(tip: (f64, f64)) -> Option<Vec<(f64, f64)>> {
    const HEAD_LENGTH: f64 = 0.15;
    const HEAD_WIDTH: f64 = 0.05;

    let length = tip.0.hypot(tip.1);
    if length <= HEAD_LENGTH {
        return None;
    }
    let (dx, dy) = (tip.0 / length, tip.1 / length);
    let base = (tip.0 - HEAD_LENGTH * dx, tip.1 - HEAD_LENGTH * dy);

    Some(vec![
        tip,
        (base.0 - HEAD_WIDTH * dy, base.1 + HEAD_WIDTH * dx),
        (base.0 + HEAD_WIDTH * dy, base.1 - HEAD_WIDTH * dx),
    ])
}

fn ranks_caption(marks: &[(f64, f64)]) -> String {
    let ranks: Vec<String> = marks.iter().map(|(rank, _)| rank.to_string()).collect();
    format!("r = {}", ranks.join(", "))
}
