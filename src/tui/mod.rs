//! Ratatui-based terminal dashboard.
//!
//! The TUI shows the two dashboard dropdowns as a settings list (report type
//! and year) and renders the output container below it: a 2x2 grid of
//! Plotters charts, the red "no data" alert, or a placeholder.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::chart::ChartSpec;
use crate::dashboard::{ControlChange, Dashboard, DashboardLayout};
use crate::data::SalesTable;
use crate::domain::ReportMode;
use crate::error::AppError;
use crate::report::ReportOutput;

mod plotters_chart;

use plotters_chart::ChartWidget;

/// Directory (relative to the working directory) that `e` exports into.
const EXPORT_ROOT: &str = "exports";

/// Start the TUI over an already-loaded table.
pub fn run(table: &SalesTable) -> Result<(), AppError> {
    let mut app = App::new(table)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Dropdown focused by ↑/↓.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Statistics,
    Year,
}

impl Field {
    fn index(self) -> usize {
        match self {
            Field::Statistics => 0,
            Field::Year => 1,
        }
    }
}

struct App<'t> {
    dashboard: Dashboard<'t>,
    layout: DashboardLayout,
    field: Field,
    status: String,
}

impl<'t> App<'t> {
    fn new(table: &'t SalesTable) -> Result<Self, AppError> {
        let layout = DashboardLayout::from_table(table);
        let dashboard = Dashboard::new(table)?;
        Ok(Self {
            dashboard,
            layout,
            field: Field::Statistics,
            status: format!("Loaded {} rows.", table.len()),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.field = Field::Statistics,
            KeyCode::Down => self.field = Field::Year,
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Backspace | KeyCode::Delete => {
                if self.field == Field::Statistics {
                    self.apply(ControlChange::Statistics(None));
                }
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: isize) {
        match self.field {
            Field::Statistics => {
                let current = self
                    .dashboard
                    .controls()
                    .statistics
                    .as_deref()
                    .and_then(ReportMode::from_value);
                let next = cycle_mode(current, delta);
                self.apply(ControlChange::Statistics(next.map(|m| m.value().to_string())));
            }
            Field::Year => {
                if self.dashboard.view().year_disabled {
                    self.status = "Select a report type first.".to_string();
                    return;
                }
                let years = &self.layout.years;
                let current = self.dashboard.controls().year;
                let Some(next) = step_year(years, current, delta) else {
                    return;
                };
                if next != current {
                    self.apply(ControlChange::Year(next));
                }
            }
        }
    }

    fn apply(&mut self, change: ControlChange) {
        match self.dashboard.change(change) {
            Ok(_) => self.status = self.describe_selection(),
            Err(err) => self.status = format!("Update failed: {err}"),
        }
    }

    fn describe_selection(&self) -> String {
        let controls = self.dashboard.controls();
        match controls.statistics.as_deref() {
            Some(mode) => format!("{mode} | year {}", controls.year),
            None => "No report selected.".to_string(),
        }
    }

    fn export(&mut self) {
        if self.dashboard.view().output.is_empty() {
            self.status = "Nothing to export.".to_string();
            return;
        }

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let dir = PathBuf::from(EXPORT_ROOT).join(format!("autosales_{stamp}"));
        match crate::io::export::export_report(&dir, &self.dashboard.view().output) {
            Ok(files) => {
                self.status = format!("Exported {} file(s) to {}", files.len(), dir.display());
            }
            Err(err) => {
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
        self.draw_output(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let table = self.dashboard.table();
        let (first, last) = table.year_range();

        let lines = vec![
            Line::from(Span::styled(
                self.layout.heading.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("rows: {} | years: {first} - {last}", table.len()),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(self.layout.title.as_str())
                .borders(Borders::ALL),
        );
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let controls = self.dashboard.controls();
        let view = self.dashboard.view();

        let statistics = controls
            .statistics
            .clone()
            .unwrap_or_else(|| self.layout.statistics.placeholder.clone());
        let year_style = if view.year_disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let year_label = if view.year_disabled {
            format!("Year: {} (disabled)", controls.year)
        } else {
            format!("Year: {}", controls.year)
        };

        let items = vec![
            ListItem::new(format!("Report type: {statistics}")),
            ListItem::new(year_label).style(year_style),
        ];

        let list = List::new(items)
            .block(Block::default().title(self.layout.prompt.as_str()).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.field.index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_output(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match &self.dashboard.view().output {
            ReportOutput::Empty => {
                let msg = Paragraph::new("Select a report type to display charts.")
                    .style(Style::default().fg(Color::Gray))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
            }
            ReportOutput::Alert(alert) => {
                let msg = Paragraph::new(alert.message.as_str())
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
            }
            ReportOutput::Charts(rows) => {
                let row_areas = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints(rows.iter().map(|_| Constraint::Ratio(1, rows.len() as u32)))
                    .split(area);

                for (row, row_area) in rows.iter().zip(row_areas.iter()) {
                    let cells = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .split(*row_area);
                    for (chart, cell) in row.charts.iter().zip(cells.iter()) {
                        draw_chart_cell(frame, *cell, chart);
                    }
                }
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  Del clear  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_chart_cell(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let block = Block::default().title(chart.title.as_str()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let legend = legend_lines(chart);
    if legend.is_empty() {
        frame.render_widget(ChartWidget { spec: chart }, inner);
        return;
    }

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(inner);
    frame.render_widget(ChartWidget { spec: chart }, split[0]);
    frame.render_widget(
        Paragraph::new(Text::from(legend)).wrap(Wrap { trim: true }),
        split[1],
    );
}

fn legend_lines(chart: &ChartSpec) -> Vec<Line<'static>> {
    chart
        .legend()
        .into_iter()
        .map(|entry| {
            let rgb = crate::plot::palette(entry.color_index);
            let mut spans = vec![
                Span::styled("■ ", Style::default().fg(Color::Rgb(rgb.0, rgb.1, rgb.2))),
                Span::raw(entry.label),
            ];
            if let Some(share) = entry.share {
                spans.push(Span::styled(
                    format!(" {:.1}%", share * 100.0),
                    Style::default().fg(Color::Gray),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

/// Cycle through "no selection" followed by every report mode.
fn cycle_mode(current: Option<ReportMode>, delta: isize) -> Option<ReportMode> {
    let mut options: Vec<Option<ReportMode>> = vec![None];
    options.extend(ReportMode::ALL.into_iter().map(Some));

    let idx = options.iter().position(|o| *o == current).unwrap_or(0) as isize;
    let len = options.len() as isize;
    options[(idx + delta).rem_euclid(len) as usize]
}

/// Move to the neighbouring year option, clamped at both ends.
fn step_year(years: &[i32], current: i32, delta: isize) -> Option<i32> {
    if years.is_empty() {
        return None;
    }
    let idx = years.iter().position(|y| *y == current).unwrap_or(0) as isize;
    let next = (idx + delta).clamp(0, years.len() as isize - 1) as usize;
    years.get(next).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{record, table};

    #[test]
    fn mode_cycle_wraps_through_no_selection() {
        assert_eq!(cycle_mode(None, 1), Some(ReportMode::Recession));
        assert_eq!(cycle_mode(Some(ReportMode::Recession), 1), Some(ReportMode::Yearly));
        assert_eq!(cycle_mode(Some(ReportMode::Yearly), 1), None);
        assert_eq!(cycle_mode(None, -1), Some(ReportMode::Yearly));
    }

    #[test]
    fn year_steps_are_clamped() {
        let years = [1980, 1981, 1982];
        assert_eq!(step_year(&years, 1980, -1), Some(1980));
        assert_eq!(step_year(&years, 1980, 1), Some(1981));
        assert_eq!(step_year(&years, 1982, 1), Some(1982));
        assert_eq!(step_year(&[], 1982, 1), None);
    }

    #[test]
    fn disabled_year_ignores_arrow_keys() {
        let t = table(vec![
            record(1980, "Jan", 1, "Sedan", 1.0, 1.0, 1.0),
            record(1981, "Jan", 1, "Sedan", 1.0, 1.0, 1.0),
        ]);
        let mut app = App::new(&t).unwrap();

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.dashboard.controls().year, 1980);
        assert_eq!(app.status, "Select a report type first.");

        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.dashboard.controls().year, 1981);
        assert_eq!(
            app.dashboard.controls().statistics.as_deref(),
            Some("Recession Statistics")
        );
    }

    #[test]
    fn quit_keys_exit() {
        let t = table(vec![record(1980, "Jan", 1, "Sedan", 1.0, 1.0, 1.0)]);
        let mut app = App::new(&t).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(!app.handle_key(KeyCode::Char('x')));
    }
}
