use keytutor::app::{App, Screen};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn render(app: &App, f: &mut Frame) {
    match app.screen {
        Screen::Lessons => render_lessons(app, f),
        Screen::Typing => render_typing(app, f),
        Screen::Results => render_results(app, f),
        Screen::History => render_history(app, f),
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn legend(text: &str) -> Paragraph<'_> {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}

fn render_lessons(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let lines = app
        .lessons()
        .iter()
        .enumerate()
        .map(|(idx, lesson)| {
            let marker = if idx == app.selected { "▶ " } else { "  " };
            let style = if idx == app.selected {
                bold().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{marker}{lesson}"), style))
        })
        .collect::<Vec<Line>>();

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Lessons")),
        chunks[0],
    );

    if let Some(lesson) = app.selected_lesson() {
        f.render_widget(
            Paragraph::new(lesson.coaching_tip.as_str())
                .block(Block::default().borders(Borders::ALL).title("Coaching tip"))
                .wrap(Wrap { trim: true }),
            chunks[1],
        );
    }

    f.render_widget(
        Paragraph::new(app.scoreboard().to_string()).alignment(Alignment::Center),
        chunks[2],
    );
    f.render_widget(
        legend("(↑/↓) select / (enter) start / (h)istory / (esc)ape"),
        chunks[3],
    );
}

fn render_typing(app: &App, f: &mut Frame) {
    let area = f.area();
    let Some(lesson) = app.manager.current_lesson() else {
        return;
    };
    let passage = lesson.passage.as_str();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_occupied_lines = if passage.width() <= max_chars_per_line as usize {
        1
    } else {
        ((passage.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };
    let padding = area.height.saturating_sub(prompt_occupied_lines + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(2),
            Constraint::Length(prompt_occupied_lines),
            Constraint::Length(padding),
            Constraint::Length(1),
        ])
        .split(area);

    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);
    let underlined_dim_bold = dim_bold().add_modifier(Modifier::UNDERLINED);

    let typed = app.input.chars().collect::<Vec<char>>();
    let spans = passage
        .chars()
        .enumerate()
        .map(|(idx, expected)| match typed.get(idx) {
            Some(&c) if c == expected => Span::styled(expected.to_string(), green_bold),
            Some(&c) => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold,
            ),
            None if idx == typed.len() => {
                Span::styled(expected.to_string(), underlined_dim_bold)
            }
            None => Span::styled(expected.to_string(), dim_bold()),
        })
        .collect::<Vec<Span>>();

    let widget = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    f.render_widget(widget, chunks[2]);

    if let Some(remaining) = app.seconds_remaining {
        let timer = Paragraph::new(Span::styled(
            format!("{} · {:.1}", lesson.title, remaining.max(0.0)),
            dim_bold(),
        ))
        .alignment(Alignment::Center);
        f.render_widget(timer, chunks[1]);
    }

    f.render_widget(legend("(tab) finish / (esc)ape"), chunks[4]);
}

fn render_results(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(f.area());

    if let Some(result) = &app.last_result {
        let summary = Paragraph::new(format!("Session complete: {}", result.summary()))
            .style(bold().fg(Color::Magenta))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(result.lesson_title.as_str()));
        f.render_widget(summary, chunks[0]);
    }

    f.render_widget(
        Paragraph::new(app.scoreboard().to_string()).alignment(Alignment::Center),
        chunks[1],
    );

    render_coaching(app, f, chunks[2]);

    f.render_widget(
        legend("(r)etry / (n)ew / (h)istory / (esc)ape"),
        chunks[3],
    );
}

fn render_coaching(app: &App, f: &mut Frame, area: Rect) {
    let text = app.coaching_note.as_deref().unwrap_or(
        "Performance coaching will appear here after you complete a session.",
    );
    f.render_widget(
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Coaching Notes"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_history(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Row::new(vec!["Started", "Lesson", "Time", "WPM", "Accuracy", "Errors"])
        .style(bold().fg(Color::Yellow));

    let rows = app
        .recent_sessions()
        .into_iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.started_at.format("%b %d %H:%M").to_string()),
                Cell::from(r.lesson_title),
                Cell::from(format!("{}s", r.duration.as_secs())),
                Cell::from(format!("{:.0}", r.words_per_minute)),
                Cell::from(format!("{:.0}%", r.accuracy)),
                Cell::from(r.error_count.to_string()),
            ])
        })
        .collect::<Vec<Row>>();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Progress · {}", app.scoreboard())),
    );
    f.render_widget(table, chunks[0]);

    render_coaching(app, f, chunks[1]);

    f.render_widget(legend("(b)ack / (esc)ape"), chunks[2]);
}
