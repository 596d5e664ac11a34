//! Plain-text performance report.

use std::fmt::Write;

use rc_core::ReportFormat;

use crate::comfort::{ComfortMetrics, Quantity};

const RULE_WIDTH: usize = 60;
const LABEL_WIDTH: usize = 22;

/// Identifies the analysis a report belongs to.
#[derive(Clone, Debug)]
pub struct ReportHeader<'a> {
    pub name: &'a str,
    pub execution_date: &'a str,
    pub t_span: (f64, f64),
}

fn units(quantity: Quantity) -> [&'static str; 3] {
    match quantity {
        Quantity::Linear => ["m", "m/s", "m/s²"],
        Quantity::Angular => ["deg", "rad/s", "rad/s²"],
    }
}

/// Render the metrics as a per-mass table.
pub fn format_report(
    header: &ReportHeader<'_>,
    metrics: &ComfortMetrics,
    format: &ReportFormat,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, header, metrics, format);
    out
}

fn write_report(
    out: &mut String,
    header: &ReportHeader<'_>,
    metrics: &ComfortMetrics,
    format: &ReportFormat,
) -> std::fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    let (t0, t1) = header.t_span;
    let td = format.time;

    writeln!(out, "{rule}")?;
    writeln!(out, " Performance Metrics for {}", header.name)?;
    writeln!(out, " {}", header.execution_date)?;
    writeln!(out, " {} over [{t0:.td$}, {t1:.td$}] s", metrics.kind())?;
    writeln!(out, "{rule}")?;

    let dd = format.displacement;
    let vd = format.velocity;
    let ad = format.acceleration;
    for channel in metrics.channels() {
        let m = channel.metrics;
        let [disp_unit, vel_unit, acc_unit] = units(channel.quantity);
        let disp_decimals = match channel.quantity {
            Quantity::Linear => dd,
            Quantity::Angular => format.angle,
        };
        let w = LABEL_WIDTH;

        writeln!(out)?;
        writeln!(out, "{} Metrics:", channel.label)?;
        writeln!(out, "{}", "-".repeat(30))?;
        writeln!(
            out,
            "{:<w$} {:.disp_decimals$} {disp_unit}",
            "Displacement (max):", m.peak_displacement
        )?;
        writeln!(
            out,
            "{:<w$} {:.vd$} {vel_unit}",
            "Velocity (max):", m.peak_velocity
        )?;
        writeln!(
            out,
            "{:<w$} {:.ad$} {acc_unit}",
            "Acceleration (max):", m.peak_acceleration
        )?;
        writeln!(
            out,
            "{:<w$} {:.ad$} {acc_unit}",
            "RMS Acceleration:", m.rms_acceleration
        )?;
        writeln!(
            out,
            "{:<w$} {:.disp_decimals$} {disp_unit}",
            "Displacement Range:", m.displacement_range
        )?;
    }
    Ok(())
}
