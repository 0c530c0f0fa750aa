//! Concentration maps of a cook
//!
//! One panel per component: time on the x axis, position z ∈ \[0, 1\] on the
//! y axis, the liquor drawn as a strip below the wood at z ∈ \[−2dz, 0\]. A
//! last panel shows the total moles, which only change through reactions.
//!
//! ```text
//!  z  1 ┤██████████████████
//!       ┤████▓▓▓▓▒▒▒▒░░░░░░   wood
//!     0 ┤──────────────────
//!       ┤▓▓▓▓▒▒▒▒░░░░░░░░░░   liquor
//!       └──────────────────  t
//! ```

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::output::report::CookReport;
use crate::output::visualization::config::{PlotConfig, NO_TITLE};

/// Render the concentration maps of `report` to `output_path`
///
/// The format follows the extension: `.svg` for SVG, a bitmap otherwise.
///
/// # Errors
///
/// Returns `Err` for a report with fewer than two output times or if the
/// backend cannot write to `output_path`.
///
/// # Example
///
/// ```rust,ignore
/// use pulpsim::output::visualization::plot_cook;
///
/// let report = CookReport::from_result(&cook, &result, 1e-9)?;
/// plot_cook(&report, "cook.png", None)?;
/// ```
pub fn plot_cook(
    report: &CookReport,
    output_path: impl AsRef<Path>,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if report.len() < 2 {
        return Err("At least two output times are needed to draw concentration maps".into());
    }

    let default_config = PlotConfig::cook(NO_TITLE);
    let config = config.unwrap_or(&default_config);
    let path = output_path.as_ref();

    match path.extension().and_then(|s| s.to_str()) {
        Some("svg") => plot_cook_impl(SVGBackend::new(path, (config.width, config.height)), report, config),
        _ => plot_cook_impl(BitMapBackend::new(path, (config.width, config.height)), report, config),
    }
}

/// Lowest and highest value of one component over liquor and wood
pub(crate) fn component_range(report: &CookReport, component: usize) -> (f64, f64) {
    let liquor = report.liquor_concentrations.iter().map(|c| c[component]);
    let wood = report
        .wood_concentrations
        .iter()
        .flat_map(|w| w.row(component).iter().copied().collect::<Vec<_>>());

    liquor
        .chain(wood)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| (lo.min(c), hi.max(c)))
}

/// Blue-green-yellow map of `value` normalized to \[lo, hi\]
pub(crate) fn heat_color(value: f64, lo: f64, hi: f64) -> RGBColor {
    const STOPS: [(u8, u8, u8); 5] = [
        (68, 1, 84),
        (59, 82, 139),
        (33, 145, 140),
        (94, 201, 98),
        (253, 231, 37),
    ];

    let x = if hi > lo { ((value - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.0 };
    let position = x * (STOPS.len() - 1) as f64;
    let i = (position.floor() as usize).min(STOPS.len() - 2);
    let w = position - i as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * w).round() as u8;
    let (a, b) = (STOPS[i], STOPS[i + 1]);
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

fn plot_cook_impl<DB: DrawingBackend>(
    backend: DB,
    report: &CookReport,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;
    let root = root.titled(&config.title, ("sans-serif", 30))?;

    let n_components = report.n_components();
    let panels = root.split_evenly((n_components + 1, 1));

    let times = &report.time_points;
    let (t0, t_end) = (times[0], times[times.len() - 1]);
    let dz = 1.0 / report.n_compartments() as f64;

    // ====== Concentration maps ======

    for (i, panel) in panels.iter().take(n_components).enumerate() {
        let (lo, hi) = component_range(report, i);

        let mut chart = ChartBuilder::on(panel)
            .margin(5)
            .x_label_area_size(20)
            .y_label_area_size(50)
            .build_cartesian_2d(t0..t_end, (-2.0 * dz)..1.0)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .y_desc(format!("[{}]", report.component_names[i]))
            .y_labels(3)
            .draw()?;

        for k in 0..times.len() - 1 {
            let (ta, tb) = (times[k], times[k + 1]);

            let liquor = report.liquor_concentrations[k][i];
            chart.draw_series(std::iter::once(Rectangle::new(
                [(ta, -2.0 * dz), (tb, 0.0)],
                heat_color(liquor, lo, hi).filled(),
            )))?;

            let wood = &report.wood_concentrations[k];
            chart.draw_series((0..wood.ncols()).map(|j| {
                Rectangle::new(
                    [(ta, j as f64 * dz), (tb, (j + 1) as f64 * dz)],
                    heat_color(wood[(i, j)], lo, hi).filled(),
                )
            }))?;
        }
    }

    // ====== Total moles ======

    let (m_lo, m_hi) = report
        .total_moles
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| (lo.min(*m), hi.max(*m)));
    let pad = ((m_hi - m_lo) * 0.1).max(1e-12);

    let mut chart = ChartBuilder::on(&panels[n_components])
        .margin(5)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(t0..t_end, (m_lo - pad)..(m_hi + pad))?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel).y_desc("Total moles").y_labels(3);
    if !config.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    chart.draw_series(LineSeries::new(
        times.iter().zip(&report.total_moles).map(|(t, m)| (*t, *m)),
        ShapeStyle::from(&config.line_color).stroke_width(config.line_width),
    ))?;

    root.present()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
