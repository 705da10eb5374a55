//! Ratatui-based premium form.
//!
//! Two pages, like a sidebar menu: "Predict Premium" (the six-field form, a
//! submit button and the tier-styled result panel) and "About Us".

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
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::pipeline::{Submission, run_submission};
use crate::domain::{ApplicantForm, hex_rgb};
use crate::error::AppError;
use crate::models::PremiumModel;
use crate::report::{PANEL_NOTE, PANEL_TITLE};

mod form;

use form::{FIELD_COUNT, FormState, SUBMIT_INDEX};

/// Start the TUI.
pub fn run(model: Box<dyn PremiumModel>, report_dir: PathBuf) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(model, report_dir);
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
enum Page {
    Predict,
    About,
}

/// Result of the last submit action.
enum Outcome {
    Done(Box<Submission>),
    Failed(String),
}

struct App {
    model: Box<dyn PremiumModel>,
    report_dir: PathBuf,
    page: Page,
    form: FormState,
    outcome: Option<Outcome>,
    status: String,
}

impl App {
    fn new(model: Box<dyn PremiumModel>, report_dir: PathBuf) -> Self {
        let status = format!("model: {}", model.describe());
        Self {
            model,
            report_dir,
            page: Page::Predict,
            form: FormState::default(),
            outcome: None,
            status,
        }
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
        if self.form.is_editing() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => {
                self.page = match self.page {
                    Page::Predict => Page::About,
                    Page::About => Page::Predict,
                };
            }
            _ if self.page == Page::About => {}
            KeyCode::Up => self.form.select_prev(),
            KeyCode::Down => self.form.select_next(),
            KeyCode::Left => self.form.adjust(-1),
            KeyCode::Right => self.form.adjust(1),
            KeyCode::Enter => {
                if self.form.selected() == SUBMIT_INDEX {
                    self.submit();
                } else if self.form.begin_edit() {
                    self.status = "Editing. Enter to apply, Esc to cancel.".to_string();
                } else {
                    self.form.adjust(1);
                }
            }
            KeyCode::Char('p') => self.submit(),
            KeyCode::Char('s') => self.save_report(),
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.form.cancel_edit();
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.form.commit_edit();
                self.status.clear();
            }
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn submit(&mut self) {
        self.outcome = Some(submit_form(self.model.as_ref(), self.form.values()));
        self.status = match &self.outcome {
            Some(Outcome::Done(_)) => "Press s to save the PDF report.".to_string(),
            _ => String::new(),
        };
    }

    fn save_report(&mut self) {
        let Some(Outcome::Done(sub)) = &self.outcome else {
            self.status = "Submit the form before saving a report.".to_string();
            return;
        };

        let path = crate::io::unique_report_path(&self.report_dir);
        let written = sub
            .report_pdf()
            .and_then(|bytes| {
                crate::io::write_report_pdf(&path, &bytes)
                    .map_err(crate::app::pipeline::PipelineError::Report)
            });
        self.status = match written {
            Ok(()) => crate::io::report_saved_message(&path),
            Err(e) => e.user_message(),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_menu(frame, body[0]);
        match self.page {
            Page::Predict => self.draw_predict(frame, body[1]),
            Page::About => draw_about(frame, body[1]),
        }

        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Medical Insurance Premium Predictor",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Predicting future medical expenses to help insurers make smarter decisions on premiums.",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )),
        ];
        let p = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_menu(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![ListItem::new("Predict Premium"), ListItem::new("About Us")];
        let list = List::new(items)
            .block(Block::default().title("Main Menu").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(match self.page {
            Page::Predict => 0,
            Page::About => 1,
        }));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_predict(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(FIELD_COUNT as u16 + 3), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_result(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .form
            .rows()
            .into_iter()
            .map(|(label, value)| ListItem::new(format!("{label:<22} {value}")))
            .chain(std::iter::once(ListItem::new(Span::styled(
                "[ Predict Premium ]",
                Style::default().add_modifier(Modifier::BOLD),
            ))))
            .collect();

        let title = if self.form.is_editing() {
            "Enter User Details (editing)"
        } else {
            "Enter User Details"
        };
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.form.selected()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match &self.outcome {
            None => {
                let p = Paragraph::new("Fill in the form and press p (or Enter on Predict Premium).")
                    .style(Style::default().fg(Color::Gray))
                    .block(Block::default().title("Result").borders(Borders::ALL));
                frame.render_widget(p, area);
            }
            Some(Outcome::Failed(message)) => {
                let p = Paragraph::new(message.as_str())
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .title("Result")
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(Color::Red)),
                    );
                frame.render_widget(p, area);
            }
            Some(Outcome::Done(sub)) => {
                let style = sub.view.style;
                let text = hex_color(style.text);
                let lines = vec![
                    Line::from(Span::styled(
                        sub.view.headline(),
                        Style::default().fg(text).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        PANEL_TITLE,
                        Style::default().fg(text).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(style.description, Style::default().fg(text))),
                    Line::from(Span::styled(PANEL_NOTE, Style::default().fg(text))),
                ];
                let p = Paragraph::new(Text::from(lines))
                    .style(Style::default().bg(hex_color(style.background)))
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .title(format!("{} Tier", sub.tier.display_name()))
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(hex_color(style.border))),
                    );
                frame.render_widget(p, area);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.page {
            Page::Predict => "↑/↓ select  ←/→ adjust  Enter edit  p predict  s save PDF  Tab menu  q quit",
            Page::About => "Tab menu  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_about(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let p = Paragraph::new(crate::app::ABOUT_TEXT)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(crate::app::ABOUT_TITLE)
                .borders(Borders::ALL),
        );
    frame.render_widget(p, area);
}

fn submit_form(model: &dyn PremiumModel, form: &ApplicantForm) -> Outcome {
    let record = match form.submit() {
        Ok(r) => r,
        Err(e) => return Outcome::Failed(format!("Invalid input: {e}")),
    };
    match run_submission(model, &record) {
        Ok(sub) => Outcome::Done(Box::new(sub)),
        Err(e) => Outcome::Failed(e.user_message()),
    }
}

fn hex_color(hex: &str) -> Color {
    hex_rgb(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Reset)
}
