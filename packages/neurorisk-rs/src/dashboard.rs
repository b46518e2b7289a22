//! Dashboard PNG rendering.
//!
//! Fusion layout: connectivity heatmap | PSD with band shading | risk
//! panel. Network layout drops the PSD panel.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{EngineError, Result};
use crate::spectral::{ALPHA_BAND, THETA_BAND};
use crate::types::{FusionReport, NetworkBiomarkers, NetworkReport, RiskCategory};

const THETA_FILL: RGBColor = RGBColor(220, 60, 60);
const ALPHA_FILL: RGBColor = RGBColor(60, 160, 60);
const LOW_COLOR: RGBColor = RGBColor(34, 139, 34);
const MONITOR_COLOR: RGBColor = RGBColor(255, 140, 0);
const HIGH_COLOR: RGBColor = RGBColor(200, 30, 30);

/// Profile bar denominators: the "healthy ceiling" each metric is drawn
/// against (efficiency, clustering, hub strength, density)
const PROFILE_SCALE: [f64; 4] = [0.6, 1.0, 10.0, 0.5];
const PROFILE_NAMES: [&str; 4] = ["Efficiency", "Clustering", "Hub", "Density"];

fn category_color(category: RiskCategory) -> RGBColor {
    match category {
        RiskCategory::Low => LOW_COLOR,
        RiskCategory::Monitor => MONITOR_COLOR,
        RiskCategory::High => HIGH_COLOR,
    }
}

/// Render the dual-stream dashboard to a PNG file.
pub fn render_fusion_dashboard<P: AsRef<Path>>(report: &FusionReport, path: P) -> Result<()> {
    draw_fusion(report, path.as_ref())
        .map_err(|e| EngineError::RenderFailed(e.to_string()))?;
    log::info!("Dashboard written to {}", path.as_ref().display());
    Ok(())
}

/// Render the unimodal network dashboard to a PNG file.
pub fn render_network_dashboard<P: AsRef<Path>>(report: &NetworkReport, path: P) -> Result<()> {
    draw_network(report, path.as_ref())
        .map_err(|e| EngineError::RenderFailed(e.to_string()))?;
    log::info!("Dashboard written to {}", path.as_ref().display());
    Ok(())
}

fn draw_fusion(
    report: &FusionReport,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1800, 650)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));

    draw_heatmap(
        &panels[0],
        &report.connectivity_matrix,
        "Functional Connectivity (|r|)",
    )?;
    draw_psd(&panels[1], &report.psd_freqs, &report.psd_power)?;
    draw_risk_panel(
        &panels[2],
        "MULTI-MODAL DIAGNOSIS",
        report.fused_risk * 100.0,
        report.category,
        &report.network,
    )?;

    root.present()?;
    Ok(())
}

fn draw_network(
    report: &NetworkReport,
    path: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1200, 650)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    draw_heatmap(
        &panels[0],
        &report.connectivity_matrix,
        "Functional Connectivity (|r|)",
    )?;
    draw_risk_panel(
        &panels[1],
        "NETWORK RISK ASSESSMENT",
        report.risk_percent as f64,
        report.category,
        &report.biomarkers,
    )?;

    root.present()?;
    Ok(())
}

fn draw_heatmap(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    matrix: &[Vec<f64>],
    title: &str,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let n = matrix.len() as i32;
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0i32..n, 0i32..n)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Region")
        .y_desc("Region")
        .draw()?;

    chart.draw_series(matrix.iter().enumerate().flat_map(|(i, row)| {
        row.iter().enumerate().map(move |(j, &w)| {
            let intensity = (w.clamp(0.0, 1.0) * 255.0) as u8;
            let color = RGBColor(255, 255 - intensity, 255 - intensity);
            Rectangle::new(
                [(j as i32, i as i32), (j as i32 + 1, i as i32 + 1)],
                color.filled(),
            )
        })
    }))?;

    Ok(())
}

fn draw_psd(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    freqs: &[f64],
    power: &[f64],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Axis limited to 0-30 Hz, matching the bands of interest
    let visible: Vec<(f64, f64)> = freqs
        .iter()
        .zip(power.iter())
        .filter(|(&f, _)| f <= 30.0)
        .map(|(&f, &p)| (f, p))
        .collect();
    let y_max = visible
        .iter()
        .map(|&(_, p)| p)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut chart = ChartBuilder::on(area)
        .caption("Spectral Analysis (EEG)", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..30.0, 0.0..y_max * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (Hz)")
        .y_desc("Power density")
        .draw()?;

    let band_series = |lo: f64, hi: f64| {
        visible
            .iter()
            .filter(move |&&(f, _)| f >= lo && f <= hi)
            .copied()
            .collect::<Vec<_>>()
    };

    chart
        .draw_series(AreaSeries::new(
            band_series(THETA_BAND.0, THETA_BAND.1),
            0.0,
            THETA_FILL.mix(0.3),
        ))?
        .label("Theta 4-8 Hz")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], THETA_FILL.mix(0.3).filled()));

    chart
        .draw_series(AreaSeries::new(
            band_series(ALPHA_BAND.0, ALPHA_BAND.1),
            0.0,
            ALPHA_FILL.mix(0.3),
        ))?
        .label("Alpha 8-12 Hz")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], ALPHA_FILL.mix(0.3).filled()));

    chart.draw_series(LineSeries::new(visible.clone(), &BLUE))?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_risk_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    heading: &str,
    risk_percent: f64,
    category: RiskCategory,
    biomarkers: &NetworkBiomarkers,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (width, _) = area.dim_in_pixel();
    let cx = width as i32 / 2;

    let centered = Pos::new(HPos::Center, VPos::Center);
    area.draw(&Text::new(
        heading.to_string(),
        (cx, 40),
        ("sans-serif", 26).into_font().color(&BLACK).pos(centered),
    ))?;
    area.draw(&Text::new(
        format!("{:.1}%", risk_percent),
        (cx, 120),
        ("sans-serif", 64)
            .into_font()
            .color(&category_color(category))
            .pos(centered),
    ))?;
    area.draw(&Text::new(
        format!("Status: {}", category.label()),
        (cx, 180),
        ("sans-serif", 24).into_font().color(&BLACK).pos(centered),
    ))?;

    // Lower half: biomarker profile bars against healthy ceilings
    let halves = area.split_evenly((2, 1));
    let lower = &halves[1];
    let values = [
        biomarkers.global_efficiency / PROFILE_SCALE[0],
        biomarkers.average_clustering / PROFILE_SCALE[1],
        biomarkers.hub_strength / PROFILE_SCALE[2],
        biomarkers.density / PROFILE_SCALE[3],
    ];

    let mut chart = ChartBuilder::on(lower)
        .caption("Network Integrity Profile", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..1.2, 0i32..4i32)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(4)
        .y_label_formatter(&|idx| {
            PROFILE_NAMES
                .get(*idx as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
        Rectangle::new(
            [(0.0, i as i32), (v.clamp(0.0, 1.2), i as i32 + 1)],
            BLUE.mix(0.5).filled(),
        )
    }))?;

    Ok(())
}
