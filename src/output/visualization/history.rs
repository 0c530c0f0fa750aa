//! Temperature and kappa number histories

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::output::report::CookReport;
use crate::output::visualization::config::{PlotConfig, NO_TITLE};

/// Plot temperature (top) and kappa number (bottom) against time
///
/// Output times without a kappa number are skipped.
///
/// # Errors
///
/// Returns `Err` for an empty report or if the backend fails.
pub fn plot_history(
    report: &CookReport,
    output_path: impl AsRef<Path>,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if report.is_empty() {
        return Err("Cannot plot an empty report".into());
    }

    let default_config = PlotConfig::history(NO_TITLE);
    let config = config.unwrap_or(&default_config);
    let path = output_path.as_ref();

    let temperature: Vec<(f64, f64)> = report
        .time_points
        .iter()
        .copied()
        .zip(report.temperature.iter().copied())
        .collect();
    let kappa: Vec<(f64, f64)> = report
        .time_points
        .iter()
        .zip(&report.kappa)
        .filter_map(|(t, k)| k.map(|k| (*t, k)))
        .collect();

    match path.extension().and_then(|s| s.to_str()) {
        Some("svg") => plot_history_impl(
            SVGBackend::new(path, (config.width, config.height)),
            &temperature,
            &kappa,
            config,
        ),
        _ => plot_history_impl(
            BitMapBackend::new(path, (config.width, config.height)),
            &temperature,
            &kappa,
            config,
        ),
    }
}

/// Padded \[min, max\] of the y values, never empty
fn y_range(series: &[(f64, f64)]) -> (f64, f64) {
    let (lo, hi) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-9 * hi.abs().max(1.0));
    (lo - pad, hi + pad)
}

fn plot_history_impl<DB: DrawingBackend>(
    backend: DB,
    temperature: &[(f64, f64)],
    kappa: &[(f64, f64)],
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;
    let root = root.titled(&config.title, ("sans-serif", 30))?;
    let (upper, lower) = root.split_vertically(config.height as i32 / 2 - 20);

    let t0 = temperature[0].0;
    let t_end = temperature[temperature.len() - 1].0.max(t0 + f64::EPSILON);

    let panels = [
        (&upper, temperature, "Temperature (K)", 0),
        (&lower, kappa, "Kappa number", 1),
    ];

    for (area, series, label, color_index) in panels {
        let (lo, hi) = y_range(series);
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d(t0..t_end, lo..hi)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(&config.xlabel).y_desc(label);
        if !config.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        chart.draw_series(LineSeries::new(
            series.iter().copied(),
            ShapeStyle::from(&config.series_color(color_index)).stroke_width(config.line_width),
        ))?;
    }

    root.present()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
