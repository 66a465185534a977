//! Plotters-powered panel widgets for the dashboard grid.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering for the line panel
//! - shared drawing primitives for bars and pie slices
//! - easy to extend later (legend, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. Each widget is data-driven: the aggregated
//! series is computed by the pipeline, render code only draws it.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::agg::PanelData;
use crate::domain::Encoding;
use crate::panel::Panel;

/// Series palette: high-contrast colors for terminal rendering.
const PALETTE: [RGBColor; 8] = [
    RGBColor(0, 255, 255),
    RGBColor(0, 255, 0),
    RGBColor(255, 255, 0),
    RGBColor(255, 0, 255),
    RGBColor(80, 160, 255),
    RGBColor(255, 160, 0),
    RGBColor(255, 80, 80),
    RGBColor(160, 255, 160),
];

/// One grid cell: a titled block around the encoded chart.
///
/// The title travels with the dimension (see `Dimension::titulo`), so
/// whichever dimension occupies the slot carries its own labeling.
pub struct PanelWidget<'a> {
    pub panel: &'a Panel,
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.panel.titulo())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if inner.width < 18 || inner.height < 6 {
            buf.set_string(
                inner.x,
                inner.y,
                "Área pequena (redimensione).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if self.panel.data.is_empty() {
            buf.set_string(
                inner.x,
                inner.y,
                "Sem categorias.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        match self.panel.encoding {
            Encoding::Linha => {
                let pontos: Vec<(f64, f64)> = match &self.panel.data {
                    PanelData::Anos(v) => v.iter().map(|&(a, c)| (a as f64, c as f64)).collect(),
                    PanelData::Categorias(v) => v
                        .iter()
                        .enumerate()
                        .map(|(i, &(_, c))| (i as f64, c as f64))
                        .collect(),
                };
                render_linha(pontos, inner, buf);
            }
            Encoding::BarrasH => render_barras_h(self.panel.data.rotulos(), inner, buf),
            Encoding::BarrasV => render_barras_v(self.panel.data.rotulos(), inner, buf),
            Encoding::Pizza => render_pizza(self.panel.data.rotulos(), false, 140.0, inner, buf),
            Encoding::Rosca => render_pizza(self.panel.data.rotulos(), true, 90.0, inner, buf),
        }
    }
}

/// Time series with point markers, chronological x axis.
fn render_linha(pontos: Vec<(f64, f64)>, area: Rect, buf: &mut Buffer) {
    let x0 = pontos.first().map(|p| p.0).unwrap_or(0.0) - 0.5;
    let x1 = pontos.last().map(|p| p.0).unwrap_or(1.0) + 0.5;
    let y_max = pontos.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    let y1 = (y_max * 1.15).max(1.0);
    let n_labels = pontos.len().min(5);

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 5)
            .set_label_area_size(LabelAreaPosition::Bottom, 2)
            .build_cartesian_2d(x0..x1, 0.0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n_labels)
            .y_labels(4)
            .x_label_formatter(&|v| format!("{v:.0}"))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .draw()?;

        chart.draw_series(LineSeries::new(pontos.iter().copied(), &PALETTE[0]))?;
        // Point markers: colored pixels read better than circles in terminals.
        chart.draw_series(
            pontos
                .iter()
                .map(|&(x, y)| Pixel::new((x, y), PALETTE[2])),
        )?;

        Ok(())
    });
    widget.render(area, buf);
}

/// Horizontal bars, highest count on top, label and count drawn in the bar row.
fn render_barras_h(series: Vec<(String, u64)>, area: Rect, buf: &mut Buffer) {
    let n = series.len();
    let x_max = (series.iter().map(|&(_, c)| c).max().unwrap_or(1).max(1) as f64) * 1.05;

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .build_cartesian_2d(0.0..x_max, 0.0..n as f64)?;

        for (i, (rotulo, quantidade)) in series.iter().enumerate() {
            // Slot 0 (highest count) occupies the top band.
            let y0 = (n - 1 - i) as f64 + 0.15;
            let y1 = (n - i) as f64 - 0.15;
            let cor = PALETTE[i % PALETTE.len()];
            chart.draw_series(std::iter::once(Rectangle::new(
                [(0.0, y0), (*quantidade as f64, y1)],
                cor.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("{} ({quantidade})", abrevia(rotulo, 14)),
                (x_max * 0.02, (y0 + y1) / 2.0),
                ("sans-serif", 10)
                    .into_font()
                    .color(&WHITE)
                    .pos(Pos::new(HPos::Left, VPos::Center)),
            )))?;
        }

        Ok(())
    });
    widget.render(area, buf);
}

/// Vertical bars in frequency order, abbreviated category labels underneath.
fn render_barras_v(series: Vec<(String, u64)>, area: Rect, buf: &mut Buffer) {
    let n = series.len();
    let y_max = (series.iter().map(|&(_, c)| c).max().unwrap_or(1).max(1) as f64) * 1.15;
    let rotulos: Vec<String> = series.iter().map(|(r, _)| abrevia(r, 6)).collect();

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 5)
            .set_label_area_size(LabelAreaPosition::Bottom, 2)
            .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n.min(6))
            .y_labels(4)
            .x_label_formatter(&|v| {
                // Integer ticks land on bar centers; anything else is noise.
                let idx = v.round();
                if (v - idx).abs() > 0.25 || idx < 0.0 {
                    return String::new();
                }
                rotulos.get(idx as usize).cloned().unwrap_or_default()
            })
            .y_label_formatter(&|v| format!("{v:.0}"))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .draw()?;

        for (i, (_, quantidade)) in series.iter().enumerate() {
            let cor = PALETTE[i % PALETTE.len()];
            chart.draw_series(std::iter::once(Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *quantidade as f64)],
                cor.filled(),
            )))?;
        }

        Ok(())
    });
    widget.render(area, buf);
}

/// Pie (or donut) slices as polygon fans, with per-slice percentage labels.
fn render_pizza(series: Vec<(String, u64)>, rosca: bool, inicio_graus: f64, area: Rect, buf: &mut Buffer) {
    let total = series.iter().map(|&(_, c)| c).sum::<u64>().max(1) as f64;

    let widget = widget_fn(move |root| {
        // Wider x range compensates for non-square terminal cells.
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .build_cartesian_2d(-1.9..1.9, -1.25..1.25)?;

        let mut angulo = inicio_graus.to_radians();
        for (i, (rotulo, quantidade)) in series.iter().enumerate() {
            let fracao = *quantidade as f64 / total;
            let varredura = fracao * std::f64::consts::TAU;
            let cor = PALETTE[i % PALETTE.len()];

            // Slice as a fan of short chords, counterclockwise.
            let passos = ((varredura / 0.08).ceil() as usize).max(2);
            let mut pontos = Vec::with_capacity(passos + 2);
            pontos.push((0.0, 0.0));
            for passo in 0..=passos {
                let a = angulo + varredura * passo as f64 / passos as f64;
                pontos.push((a.cos(), a.sin()));
            }
            chart.draw_series(std::iter::once(Polygon::new(pontos, cor.filled())))?;

            let meio = angulo + varredura / 2.0;
            let hpos = if meio.cos() >= 0.0 { HPos::Left } else { HPos::Right };
            chart.draw_series(std::iter::once(Text::new(
                format!("{} {:.1}%", abrevia(rotulo, 10), 100.0 * fracao),
                (meio.cos() * 1.12, meio.sin() * 1.12),
                ("sans-serif", 10)
                    .into_font()
                    .color(&WHITE)
                    .pos(Pos::new(hpos, VPos::Center)),
            )))?;

            angulo += varredura;
        }

        if rosca {
            // Hollow centre: a background-colored disc over the fans.
            let passos = 40;
            let pontos: Vec<(f64, f64)> = (0..=passos)
                .map(|p| {
                    let a = std::f64::consts::TAU * p as f64 / passos as f64;
                    (0.55 * a.cos(), 0.55 * a.sin())
                })
                .collect();
            chart.draw_series(std::iter::once(Polygon::new(pontos, BLACK.filled())))?;
        }

        Ok(())
    });
    widget.render(area, buf);
}

/// Shorten a category label for in-chart display.
fn abrevia(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abrevia_keeps_short_labels_and_marks_long_ones() {
        assert_eq!(abrevia("OPM", 6), "OPM");
        assert_eq!(abrevia("Espingarda", 6), "Espin.");
    }
}
