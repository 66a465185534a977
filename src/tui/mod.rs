//! Ratatui-based terminal dashboard.
//!
//! The dashboard has two views: the composed panel grid (statistics) and the
//! open-transit table. Both are built from the same pipeline used by the
//! plain-text reports; this module only decides *what* to draw *where* and
//! delegates pixel-level drawing to the Plotters chart surface.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Terminal,
};

use crate::abertos::OpenListing;
use crate::app::pipeline::{self, PanelsRun};
use crate::cli::RunArgs;
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::panel::{GRID_CAPACITY, GRID_COLS};
use crate::report::TITULO_GERAL;

mod panels;

use panels::PanelWidget;

/// Start the dashboard.
pub fn run(args: RunArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Paineis,
    Tramitacao,
}

struct App {
    args: RunArgs,
    config: RunConfig,
    view: View,
    panels: Result<PanelsRun, AppError>,
    abertos: Result<OpenListing, AppError>,
    table_state: TableState,
    status: String,
}

impl App {
    fn new(args: RunArgs) -> Result<Self, AppError> {
        let config = crate::app::run_config_from_args(&args);
        // Fail fast if the database cannot be opened at all; per-artifact
        // problems are rendered inside the dashboard instead.
        let exec = crate::app::executor_from(&args.db)?;
        let panels = pipeline::run_panels(&exec, &config);
        let abertos = pipeline::run_abertos(&exec);

        let mut app = Self {
            args,
            config,
            view: View::Paineis,
            panels,
            abertos,
            table_state: TableState::default(),
            status: String::new(),
        };
        app.refresh_status();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.view = match self.view {
                    View::Paineis => View::Tramitacao,
                    View::Tramitacao => View::Paineis,
                };
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            _ => {}
        }
        false
    }

    fn move_selection(&mut self, delta: i64) {
        if self.view != View::Tramitacao {
            return;
        }
        let len = match &self.abertos {
            Ok(listing) => listing.len(),
            Err(_) => 0,
        };
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.table_state.select(Some(next));
    }

    /// Re-run both pipelines with a freshly opened executor. The handle is
    /// scoped to this call, not to the process.
    fn reload(&mut self) {
        match crate::app::executor_from(&self.args.db) {
            Ok(exec) => {
                self.panels = pipeline::run_panels(&exec, &self.config);
                self.abertos = pipeline::run_abertos(&exec);
                self.table_state = TableState::default();
                self.refresh_status();
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn refresh_status(&mut self) {
        let mut parts = Vec::new();
        match &self.panels {
            Ok(run) => {
                parts.push(format!("laudos: {}", run.total_laudos));
                for (dim, reason) in &run.plan.skipped {
                    parts.push(format!("painel omitido ({}): {reason}", dim.rotulo_eixo()));
                }
            }
            Err(err) => parts.push(err.to_string()),
        }
        match &self.abertos {
            Ok(listing) => parts.push(format!("em aberto: {}", listing.len())),
            Err(err) => parts.push(err.to_string()),
        }
        self.status = parts.join(" | ");
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.view {
            View::Paineis => self.draw_paineis(frame, chunks[1]),
            View::Tramitacao => self.draw_tramitacao(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view_name = match self.view {
            View::Paineis => "Gráficos",
            View::Tramitacao => "Tramitação",
        };
        let line = Line::from(vec![
            Span::styled(
                TITULO_GERAL,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" — "),
            Span::styled(view_name, Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(Text::from(line)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_paineis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let run = match &self.panels {
            Ok(run) => run,
            Err(err) => {
                let msg = Paragraph::new(err.to_string())
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(msg, area);
                return;
            }
        };

        // First N panels fill the first N slots; trailing slots are excised
        // from the layout, not drawn as empty chrome.
        let areas = grid_areas(area, run.plan.panels.len());
        for (panel, cell) in run.plan.panels.iter().zip(areas) {
            frame.render_widget(PanelWidget { panel }, cell);
        }
    }

    fn draw_tramitacao(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Laudos - Tramitação").borders(Borders::ALL);

        let listing = match &self.abertos {
            Ok(listing) => listing,
            Err(err) => {
                let msg = Paragraph::new(err.to_string())
                    .style(Style::default().fg(Color::Yellow))
                    .block(block);
                frame.render_widget(msg, area);
                return;
            }
        };

        let linhas = match listing {
            OpenListing::Vazio => {
                let msg = Paragraph::new(crate::abertos::AVISO_SEM_ABERTOS)
                    .style(Style::default().fg(Color::Yellow))
                    .block(block);
                frame.render_widget(msg, area);
                return;
            }
            OpenListing::Abertos(linhas) => linhas,
        };

        let header = Row::new(vec![
            "Laudo",
            "Ano",
            "OPM",
            "Responsável",
            "Recebimento",
            "Observação",
        ])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = linhas
            .iter()
            .map(|l| {
                Row::new(vec![
                    l.numero_laudo.clone(),
                    l.ano.clone(),
                    l.opm.clone(),
                    l.responsavel_atual.clone(),
                    l.recebimento.clone(),
                    l.observacao.clone(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(5),
                Constraint::Length(12),
                Constraint::Length(18),
                Constraint::Length(19),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::White));

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab alternar  ↑/↓ navegar  r recarregar  q sair";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Compute the cells of the panel grid: row-major, fixed column count, at
/// most `GRID_CAPACITY` cells. Exactly `min(n, capacity)` rects come back;
/// slots beyond the plan's length simply do not exist.
pub fn grid_areas(area: Rect, n: usize) -> Vec<Rect> {
    let n = n.min(GRID_CAPACITY);
    if n == 0 {
        return Vec::new();
    }

    let rows = n.div_ceil(GRID_COLS);
    let row_rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    let mut cells = Vec::with_capacity(n);
    'rows: for row_rect in row_rects.iter() {
        let col_rects = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLS as u32); GRID_COLS])
            .split(*row_rect);
        for cell in col_rects.iter() {
            cells.push(*cell);
            if cells.len() == n {
                break 'rows;
            }
        }
    }
    cells
}
