//! PDF performance report.
//!
//! The report has a title, a summary table and three charts (average ROAS by
//! ad type, average CTR by device and revenue over time) drawn as vector
//! graphics on US Letter pages.

mod draw;

use chrono::{DateTime, TimeZone};
use printpdf::{BuiltinFont, Mm, PdfDocument, PdfDocumentReference};
use tracing::debug;

use crate::campaign::{CampaignRecord, Dimension};
use crate::error::{Error, Result};
use crate::stats::{self, ReportSummary};
use crate::theme::TEALGRN;

use draw::{text_width, Area, Canvas, Paint};

/// Report title, also used as the document title.
pub const REPORT_TITLE: &str = "Ad Performance Report";

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 20.0;

const TITLE_SIZE: f32 = 24.0;
const HEADER_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const CHART_TITLE_SIZE: f32 = 13.0;
const LABEL_SIZE: f32 = 8.0;

const ROW_HEIGHT: f32 = 8.0;
const TABLE_WIDTH: f32 = 130.0;
const CHART_HEIGHT: f32 = 95.0;

/// File name of a report downloaded at `at`, e.g.
/// `ad_performance_report_20240101_120000.pdf`.
#[must_use]
pub fn report_file_name<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}_{}.pdf", at.format("%Y%m%d_%H%M%S"))
}

/// Render the report for `records`.
///
/// # Errors
///
/// Returns [`Error::NoData`] when `records` is empty and [`Error::Report`]
/// when the document cannot be assembled.
pub fn render_report(records: &[CampaignRecord]) -> Result<Vec<u8>> {
    let summary = ReportSummary::compute(records).ok_or(Error::NoData)?;

    let (doc, page, layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::report(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::report(e.to_string()))?;

    let layer = doc.get_page(page).get_layer(layer);
    let first = Canvas::new(layer, regular.clone(), bold.clone());
    let mut y = PAGE_HEIGHT - MARGIN - 10.0;
    first.centered_text(REPORT_TITLE, TITLE_SIZE, PAGE_WIDTH / 2.0, y, true);

    y -= 15.0;
    y = summary_table(&first, &summary, y);

    y -= 10.0;
    let roas = stats::group_mean(records, |r| r.ad_type, |r| r.roas);
    let bars: Vec<(&str, f64)> = roas.iter().map(|g| (g.key.label(), g.value)).collect();
    bar_chart(
        &first,
        "Average ROAS by Ad Type",
        &bars,
        chart_area(y - CHART_HEIGHT),
    );

    let second = new_page(&doc, regular, bold);
    let ctr = stats::group_mean(records, |r| r.device, |r| r.ctr);
    let bars: Vec<(&str, f64)> = ctr.iter().map(|g| (g.key.label(), g.value)).collect();
    let top = PAGE_HEIGHT - MARGIN - CHART_HEIGHT;
    bar_chart(&second, "Average CTR by Device", &bars, chart_area(top));

    let revenue: Vec<f64> = records.iter().map(|r| r.revenue).collect();
    line_chart(
        &second,
        "Revenue Over Time",
        &revenue,
        chart_area(top - CHART_HEIGHT - 20.0),
    );

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| Error::report(e.to_string()))?;
    debug!(records = records.len(), size = bytes.len(), "Rendered report");
    Ok(bytes)
}

fn new_page(
    doc: &PdfDocumentReference,
    regular: printpdf::IndirectFontRef,
    bold: printpdf::IndirectFontRef,
) -> Canvas {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    Canvas::new(doc.get_page(page).get_layer(layer), regular, bold)
}

fn chart_area(bottom: f32) -> Area {
    Area::new(MARGIN, bottom, PAGE_WIDTH - 2.0 * MARGIN, CHART_HEIGHT)
}

fn chart_color(index: usize) -> Paint {
    Paint::from_css(TEALGRN[index % TEALGRN.len()]).unwrap_or(Paint::GREY)
}

/// Draw the summary table with its top edge at `top`. Returns its bottom.
fn summary_table(canvas: &Canvas, summary: &ReportSummary, top: f32) -> f32 {
    let left = (PAGE_WIDTH - TABLE_WIDTH) / 2.0;
    let column = TABLE_WIDTH / 2.0;
    let pad = 3.0;

    let mut y = top - ROW_HEIGHT;
    let header = Area::new(left, y, TABLE_WIDTH, ROW_HEIGHT);
    canvas.fill_rect(header, Paint::GREY);
    canvas.bold_text("Metric", HEADER_SIZE, left + pad, y + 2.5, Paint::WHITESMOKE);
    let value_x = left + column + pad;
    canvas.bold_text("Value", HEADER_SIZE, value_x, y + 2.5, Paint::WHITESMOKE);

    let rows = summary.rows();
    for (label, value) in &rows {
        y -= ROW_HEIGHT;
        canvas.fill_rect(Area::new(left, y, TABLE_WIDTH, ROW_HEIGHT), Paint::BEIGE);
        canvas.text(label, BODY_SIZE, left + pad, y + 2.5, Paint::BLACK);
        canvas.text(value, BODY_SIZE, value_x, y + 2.5, Paint::BLACK);
    }

    // Grid
    for i in 0..=rows.len() {
        #[allow(clippy::cast_precision_loss)]
        let row_y = y + i as f32 * ROW_HEIGHT;
        canvas.stroke_rect(Area::new(left, row_y, column, ROW_HEIGHT), Paint::BLACK, 1.0);
        canvas.stroke_rect(
            Area::new(left + column, row_y, column, ROW_HEIGHT),
            Paint::BLACK,
            1.0,
        );
    }

    y
}

fn axes(canvas: &Canvas, plot: Area) {
    canvas.line(
        &[
            (plot.x, plot.y + plot.height),
            (plot.x, plot.y),
            (plot.x + plot.width, plot.y),
        ],
        Paint::BLACK,
        0.75,
    );
}

fn chart_frame(canvas: &Canvas, title: &str, area: Area) -> Area {
    canvas.centered_text(
        title,
        CHART_TITLE_SIZE,
        area.x + area.width / 2.0,
        area.y + area.height - 5.0,
        true,
    );
    Area::new(
        area.x + 15.0,
        area.y + 12.0,
        area.width - 20.0,
        area.height - 25.0,
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn bar_chart(canvas: &Canvas, title: &str, bars: &[(&str, f64)], area: Area) {
    let plot = chart_frame(canvas, title, area);
    axes(canvas, plot);

    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    if bars.is_empty() || max <= 0.0 {
        return;
    }

    let slot = plot.width / bars.len() as f32;
    let bar_width = slot * 0.6;
    for (i, (label, value)) in bars.iter().enumerate() {
        let height = (value / max) as f32 * plot.height;
        let center = plot.x + slot * (i as f32 + 0.5);
        canvas.fill_rect(
            Area::new(center - bar_width / 2.0, plot.y, bar_width, height),
            chart_color(i),
        );
        let value_label = format!("{value:.2}");
        canvas.centered_text(&value_label, LABEL_SIZE, center, plot.y + height + 1.5, false);
        canvas.centered_text(label, LABEL_SIZE, center, plot.y - 5.0, false);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn line_chart(canvas: &Canvas, title: &str, values: &[f64], area: Area) {
    let plot = chart_frame(canvas, title, area);
    axes(canvas, plot);
    if values.is_empty() {
        return;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let step = if values.len() > 1 {
        plot.width / (values.len() - 1) as f32
    } else {
        0.0
    };

    let points: Vec<(f32, f32)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = plot.x + step * i as f32;
            let y = plot.y + ((v - min) / span) as f32 * plot.height;
            (x, y)
        })
        .collect();
    canvas.line(&points, chart_color(TEALGRN.len() - 1), 1.5);

    let max_label = format!("{max:.0}");
    let min_label = format!("{min:.0}");
    canvas.text(
        &max_label,
        LABEL_SIZE,
        plot.x - text_width(&max_label, LABEL_SIZE) - 2.0,
        plot.y + plot.height - 1.0,
        Paint::BLACK,
    );
    canvas.text(
        &min_label,
        LABEL_SIZE,
        plot.x - text_width(&min_label, LABEL_SIZE) - 2.0,
        plot.y,
        Paint::BLACK,
    );
    canvas.centered_text("Record", LABEL_SIZE, plot.x + plot.width / 2.0, plot.y - 5.0, false);
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::generator::CampaignGenerator;

    #[test]
    fn test_report_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(
            report_file_name("ad_performance_report", &at),
            "ad_performance_report_20240305_070809.pdf"
        );
    }

    #[test]
    fn test_render_empty_is_no_data() {
        let err = render_report(&[]).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_render_produces_pdf() {
        let records = CampaignGenerator::new(Some(5)).generate_batch(25);
        let bytes = render_report(&records).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_render_single_record() {
        let records = CampaignGenerator::new(Some(6)).generate_batch(1);
        let bytes = render_report(&records).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
