//! Colored terminal output: previews, charts and status lines

use std::io::{IsTerminal, Write};

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::chart::BarChart;
use crate::model::Table;

/// Width of the longest bar in characters
const BAR_WIDTH: usize = 40;
const BAR_GLYPHS: [char; 2] = ['█', '▒'];

/// Kind of status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Error,
}

/// Terminal output with colors
pub struct TerminalOutput {
    stdout: StandardStream,
}

impl TerminalOutput {
    /// Colors only when stdout is a terminal
    pub fn new() -> Self {
        let choice = if std::io::stdout().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::with_color_choice(choice)
    }

    pub fn with_color_choice(color_choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(color_choice),
        }
    }

    pub fn write_title(&mut self, title: &str) -> Result<()> {
        self.stdout
            .set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Cyan)))?;
        writeln!(self.stdout, "{}", title)?;
        self.stdout.reset()?;
        Ok(())
    }

    pub fn write_status(&mut self, status: Status, message: &str) -> Result<()> {
        let (color, label) = match status {
            Status::Success => (Color::Green, "✓"),
            Status::Warning => (Color::Yellow, "warning:"),
            Status::Error => (Color::Red, "error:"),
        };
        self.stdout.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(self.stdout, "{}", label)?;
        self.stdout.reset()?;
        writeln!(self.stdout, " {}", message)?;
        Ok(())
    }

    pub fn write_preview(&mut self, heading: &str, table: &Table, rows: usize) -> Result<()> {
        if rows == 0 {
            return Ok(());
        }
        self.write_title(heading)?;
        write!(self.stdout, "{}", render_preview(table, rows))?;
        writeln!(self.stdout)?;
        Ok(())
    }

    pub fn write_chart(&mut self, chart: &BarChart) -> Result<()> {
        write!(self.stdout, "{}", render_chart(chart))?;
        writeln!(self.stdout)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// First `rows` rows as a boxed table, followed by the table's shape
pub fn render_preview(table: &Table, rows: usize) -> String {
    let shape = format!("{} rows × {} columns\n", table.row_count(), table.column_count());

    if table.column_count() == 0 {
        return format!("(no columns)\n{}", shape);
    }

    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.name.clone()));
    for row in table.rows.iter().take(rows) {
        builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
    }

    let mut rendered = builder.build();
    rendered.with(Style::modern());

    format!("{}\n{}", rendered, shape)
}

/// Horizontal bars, one line per row and series, scaled to the largest value
pub fn render_chart(chart: &BarChart) -> String {
    let mut out = String::new();

    let legend: Vec<String> = chart
        .series
        .iter()
        .zip(BAR_GLYPHS)
        .map(|(s, glyph)| format!("{} {}", glyph, s.name))
        .collect();
    out.push_str(&legend.join("   "));
    out.push('\n');

    let max = chart.max_magnitude();
    let label_width = chart.row_count().saturating_sub(1).to_string().len();

    for row in 0..chart.row_count() {
        for (i, (series, glyph)) in chart.series.iter().zip(BAR_GLYPHS).enumerate() {
            let label = if i == 0 { row.to_string() } else { String::new() };
            let bar = match series.values.get(row).copied().flatten() {
                Some(value) => {
                    let len = if max > 0.0 {
                        ((value.abs() / max) * BAR_WIDTH as f64).round() as usize
                    } else {
                        0
                    };
                    let sign = if value < 0.0 { "-" } else { "" };
                    format!("{}{} {}", sign, glyph.to_string().repeat(len), value)
                }
                None => "(missing)".to_string(),
            };
            out.push_str(&format!("{:>width$} │ {}\n", label, bar, width = label_width));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_preview_limits_rows() {
        let table = Table::from_rows(
            vec!["n"],
            (0..10).map(|i| vec![CellValue::Int(i)]).collect(),
        );
        let rendered = render_preview(&table, 3);
        assert!(rendered.contains(" 2 "));
        assert!(!rendered.contains(" 3 "));
        assert!(rendered.contains("10 rows × 1 columns"));
    }

    #[test]
    fn test_preview_without_columns() {
        let rendered = render_preview(&Table::default(), 5);
        assert!(rendered.starts_with("(no columns)"));
    }

    #[test]
    fn test_chart_scales_to_largest_value() {
        let table = Table::from_rows(
            vec!["x", "y"],
            vec![
                vec![CellValue::Int(10), CellValue::Int(5)],
                vec![CellValue::Null, CellValue::Int(-10)],
            ],
        );
        let chart = BarChart::from_table(&table).unwrap();
        let rendered = render_chart(&chart);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "█ x   ▒ y");
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('▒').count(), BAR_WIDTH / 2);
        assert!(lines[3].ends_with("(missing)"));
        assert!(lines[4].contains("-▒"));
    }
}
