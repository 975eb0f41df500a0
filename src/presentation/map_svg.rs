// SVG rendering of map panels
use crate::application::dashboard_shell::{DashboardShell, MapPanel};
use crate::domain::map_instance::MapInstance;
use crate::domain::parameter;
use crate::domain::telemetry::DataPoint;
use anyhow::{Context, Result};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

const BASE_WIDTH: f64 = 400.0;
const BASE_HEIGHT: f64 = 300.0;
const FALLBACK_COLOR: &str = "#94a3b8";

const COASTLINE: &str = "M 50 50 Q 100 40 150 60 T 300 80 L 350 120 Q 340 200 320 250 L 280 280 Q 200 270 120 250 Q 80 200 70 150 Q 60 100 50 50 Z";
const COASTLINE_FULLSCREEN: &str = "M 100 100 Q 200 80 300 120 T 600 160 L 700 240 Q 680 400 640 500 L 560 560 Q 400 540 240 500 Q 160 400 140 300 Q 120 200 100 100 Z";

/// (cx, cy, rx, ry) at base scale
const REEFS: [(f64, f64, f64, f64); 3] = [
    (180.0, 120.0, 60.0, 30.0),
    (220.0, 180.0, 40.0, 20.0),
    (150.0, 200.0, 30.0, 15.0),
];

/// Projects a sample onto panel coordinates
fn project(point: &DataPoint, scale: f64) -> (f64, f64) {
    let x = 100.0 * scale + (point.lng - 113.0) * 50.0 * scale;
    let y = 100.0 * scale + (point.lat + 22.5) * 40.0 * scale;
    (x, y)
}

fn marker_radius(value: f64, scale: f64) -> f64 {
    (4.0 + value.abs() / 100.0 * 6.0) * scale
}

pub fn render_map(
    instance: &MapInstance,
    points: &[DataPoint],
    loading: bool,
    fullscreen: bool,
) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    write_map(&mut svg, instance, points, loading, fullscreen)?;
    Ok(svg)
}

fn write_map<W: Write>(
    svg: &mut W,
    instance: &MapInstance,
    points: &[DataPoint],
    loading: bool,
    fullscreen: bool,
) -> fmt::Result {
    let scale = if fullscreen { 2.0 } else { 1.0 };
    let width = BASE_WIDTH * scale;
    let height = BASE_HEIGHT * scale;
    let param = parameter::find(&instance.parameter);
    let color = param.map(|p| p.color).unwrap_or(FALLBACK_COLOR);
    let unit = param.map(|p| p.unit).unwrap_or("");
    let glyph = param.map(|p| p.icon.glyph()).unwrap_or("");

    writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}' role='img'>",
        width, height, width, height
    )?;
    writeln!(svg, "  <defs>")?;
    writeln!(svg, "    <linearGradient id='sea' x1='0' y1='0' x2='1' y2='1'>")?;
    writeln!(svg, "      <stop offset='0%' stop-color='#1e3a8a'/>")?;
    writeln!(svg, "      <stop offset='50%' stop-color='#1d4ed8'/>")?;
    writeln!(svg, "      <stop offset='100%' stop-color='#0d9488'/>")?;
    writeln!(svg, "    </linearGradient>")?;
    writeln!(svg, "  </defs>")?;
    writeln!(svg, "  <rect width='100%' height='100%' fill='url(#sea)'/>")?;

    let coastline = if fullscreen { COASTLINE_FULLSCREEN } else { COASTLINE };
    writeln!(
        svg,
        "  <path d='{}' fill='rgba(139,69,19,0.3)' stroke='rgba(139,69,19,0.6)' stroke-width='2'/>",
        coastline
    )?;
    for (cx, cy, rx, ry) in REEFS {
        writeln!(
            svg,
            "  <ellipse cx='{:.0}' cy='{:.0}' rx='{:.0}' ry='{:.0}' fill='rgba(34,197,94,0.4)'/>",
            cx * scale,
            cy * scale,
            rx * scale,
            ry * scale
        )?;
    }

    if loading {
        writeln!(
            svg,
            "  <text x='{:.0}' y='{:.0}' fill='white' text-anchor='middle'>Loading…</text>",
            width / 2.0,
            height / 2.0
        )?;
    } else {
        for point in points {
            let (x, y) = project(point, scale);
            writeln!(
                svg,
                "  <circle cx='{:.1}' cy='{:.1}' r='{:.1}' fill='{}' fill-opacity='0.7'/>",
                x,
                y,
                marker_radius(point.value, scale),
                color
            )?;
            writeln!(
                svg,
                "  <circle cx='{:.1}' cy='{:.1}' r='{:.1}' fill='white' fill-opacity='0.9'/>",
                x,
                y,
                2.0 * scale
            )?;
        }
    }

    writeln!(
        svg,
        "  <text x='16' y='24' fill='white' font-size='12'>{} {}</text>",
        glyph, instance.title
    )?;
    if !loading {
        writeln!(
            svg,
            "  <text x='16' y='42' fill='white' font-size='12'>{} data points</text>",
            points.len()
        )?;
    }
    writeln!(
        svg,
        "  <text x='{:.0}' y='{:.0}' fill='white' font-size='11' text-anchor='end'>Range ({})</text>",
        width - 16.0,
        height - 16.0,
        unit
    )?;
    writeln!(svg, "</svg>")
}

pub fn render_panel(panel: &MapPanel, fullscreen: bool) -> Result<String, fmt::Error> {
    render_map(panel.instance(), panel.points(), panel.is_loading(), fullscreen)
}

/// Writes one `<index>-<parameter>.svg` per open panel
pub fn write_snapshots(shell: &DashboardShell, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(shell.panels().len());
    for (index, panel) in shell.panels().iter().enumerate() {
        let instance = panel.instance();
        let fullscreen = shell.fullscreen() == Some(instance.id.as_str());
        let path = dir.join(format!("{}-{}.svg", index + 1, instance.parameter));
        let svg = render_panel(panel, fullscreen)
            .with_context(|| format!("Failed to render panel {}", instance.id))?;
        std::fs::write(&path, svg)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    tracing::info!("Wrote {} map snapshots to {}", written.len(), dir.display());
    Ok(written)
}
