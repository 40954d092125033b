use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use netprophet::history::load_matchups;
use netprophet::odds::format_odds;
use netprophet::params::ModelParams;
use netprophet::predict::PredictionResult;
use netprophet::profile::{Matchup, Side};
use netprophet::sample;
use netprophet::state::DemoState;

const MATCHUPS_ENV: &str = "NETPROPHET_MATCHUPS";

struct App {
    state: DemoState,
    should_quit: bool,
}

impl App {
    fn new(state: DemoState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') => self.state.cycle_surface(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.bump_rating(Side::A, true),
            KeyCode::Char('-') => self.state.bump_rating(Side::A, false),
            KeyCode::Char(']') => self.state.bump_rating(Side::B, true),
            KeyCode::Char('[') => self.state.bump_rating(Side::B, false),
            KeyCode::Char('w') => self.state.swap_sides(),
            KeyCode::Char('r') => self.state.push_random(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let (matchups, load_note) = initial_matchups();
    let mut state = DemoState::new(matchups, ModelParams::from_env());
    if let Some(note) = load_note {
        state.push_log(note);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// First CLI argument, then `NETPROPHET_MATCHUPS`, then the built-in demo set.
fn initial_matchups() -> (Vec<Matchup>, Option<String>) {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(MATCHUPS_ENV).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    let Some(path) = path else {
        return (sample::demo_matchups(), None);
    };
    match load_matchups(&path) {
        Ok(list) if !list.is_empty() => (
            list,
            Some(format!("[INFO] Matchups from {}", path.display())),
        ),
        Ok(_) => (
            sample::demo_matchups(),
            Some(format!("[WARN] {} is empty, using demo set", path.display())),
        ),
        Err(err) => (
            sample::demo_matchups(),
            Some(format!("[WARN] {err:#}; using demo set")),
        ),
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    render_matchup_list(frame, body[0], &app.state);
    render_prediction(frame, body[1], &app.state);
    render_console(frame, chunks[2], &app.state);

    let footer = Paragraph::new(
        "j/k/↑/↓ Move | s Surface | +/- Rating A | ]/[ Rating B | w Swap | r Random | ? Help | q Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &DemoState) -> String {
    let title = match state.selected_matchup() {
        Some(m) => format!(
            "NETPROPHET | {} | {} | k={:.2} margin={:.0}%",
            m.label(),
            m.context.surface,
            state.params.logistic_k,
            state.params.margin * 100.0
        ),
        None => "NETPROPHET | no matchups".to_string(),
    };
    format!("  (o)  {title}\n  /|\n  / \\")
}

fn render_matchup_list(frame: &mut Frame, area: Rect, state: &DemoState) {
    let block = Block::default().title("Matchups").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.matchups.is_empty() {
        let empty = Paragraph::new("No matchups loaded (r adds one)")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.selected, state.matchups.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let Some(line) = state.row_summary(idx) else {
            continue;
        };
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let style = if idx == state.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(line).style(style), row_area);
    }
}

fn render_prediction(frame: &mut Frame, area: Rect, state: &DemoState) {
    let block = Block::default().title("Prediction").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (Some(m), Some(pred)) = (state.selected_matchup(), state.prediction()) else {
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    frame.render_widget(win_bar_chart(&pred), sections[0]);

    let summary = format!(
        "{}  {:.1}%  @ {}\n{}  {:.1}%  @ {}\nConfidence {:.0}%",
        m.player_a.name,
        pred.probability_a * 100.0,
        format_odds(pred.decimal_odds_a),
        m.player_b.name,
        pred.probability_b * 100.0,
        format_odds(pred.decimal_odds_b),
        pred.confidence * 100.0
    );
    frame.render_widget(
        Paragraph::new(summary).style(Style::default().add_modifier(Modifier::BOLD)),
        sections[1],
    );

    frame.render_widget(Paragraph::new(explain_lines(&pred)), sections[2]);
}

fn explain_lines(pred: &PredictionResult) -> String {
    let mut lines = vec!["Factors (+ favors A):".to_string()];
    for (factor, value) in pred.factors.iter() {
        lines.push(format!("  {:<20} {:+.3}", factor.as_str(), value));
    }
    if !pred.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        for rec in &pred.recommendations {
            lines.push(format!("  - {rec}"));
        }
    }
    lines.join("\n")
}

fn render_console(frame: &mut Frame, area: Rect, state: &DemoState) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let take = inner.height as usize;
    let skip = state.logs.len().saturating_sub(take);
    let text = state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn win_bar_chart(pred: &PredictionResult) -> BarChart<'static> {
    let a = Bar::default()
        .value((pred.probability_a * 100.0).round() as u64)
        .text_value(String::new())
        .style(Style::default().fg(Color::Green));
    let b = Bar::default()
        .value((pred.probability_b * 100.0).round() as u64)
        .text_value(String::new())
        .style(Style::default().fg(Color::Red));

    BarChart::default()
        .data(BarGroup::default().bars(&[a, b]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }
    let start = selected.saturating_sub(visible - 1).min(total - visible);
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "NetProphet - Help",
        "",
        "  j/k or ↑/↓   Select matchup",
        "  s            Cycle surface",
        "  + / -        Raise / lower A's rating",
        "  ] / [        Raise / lower B's rating",
        "  w            Swap sides (H2H reoriented)",
        "  r            Add a random matchup",
        "  ? / Esc      Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
