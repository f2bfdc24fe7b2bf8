//! Stateless rendering of the terminal game.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Row, Table},
};
use word_battle::{
    Difficulty, NotificationKind, PhaseKind, SessionView, SubmissionStatus,
};

use super::app::App;

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Clock
            Constraint::Length(5), // Current word
            Constraint::Min(5),    // History
            Constraint::Length(3), // Input
            Constraint::Length(3), // Notification
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new(format!("Word Battle [{}]", view.language))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    draw_clock(frame, chunks[1], view);
    draw_current(frame, chunks[2], view);
    draw_history(frame, chunks[3], view);
    draw_input(frame, chunks[4], app);
    draw_notification(frame, chunks[5], app);

    let help = Paragraph::new(help_text(view))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[6]);

    if let Some((filter, entries)) = app.leaderboard() {
        draw_leaderboard(frame, area, &filter.to_string(), entries);
    }
}

fn draw_clock(frame: &mut Frame, area: Rect, view: &SessionView) {
    let Some(difficulty) = view.difficulty else {
        let prompt = Paragraph::new("Pick a difficulty: 1 easy (60s), 2 medium (30s), 3 hard (15s)")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(prompt, area);
        return;
    };

    let total = difficulty.duration_secs().max(1);
    let ratio = f64::from(view.time_left.min(total)) / f64::from(total);
    let color = if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} | score {} ", difficulty_label(difficulty), view.score)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(format!("{}s", view.time_left));
    frame.render_widget(gauge, area);
}

fn draw_current(frame: &mut Frame, area: Rect, view: &SessionView) {
    let headline = match (view.phase, &view.pending_word) {
        (PhaseKind::AwaitingJudge, Some(word)) => {
            format!("{} {}  vs  {} ...", view.current_emoji, view.current_word, word)
        }
        (PhaseKind::Intro, _) => {
            format!("Get ready! Beat {} {}", view.current_emoji, view.current_word)
        }
        (PhaseKind::GameOver, _) => match view.game_over_reason {
            Some(reason) => format!("Game over: {} (score {})", reason, view.score),
            None => format!("Game over (score {})", view.score),
        },
        _ => format!("{} {}", view.current_emoji, view.current_word),
    };
    let current = Paragraph::new(Line::from(Span::styled(
        headline,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Word to beat "));
    frame.render_widget(current, area);
}

fn draw_history(frame: &mut Frame, area: Rect, view: &SessionView) {
    let items: Vec<ListItem> = view
        .history
        .iter()
        .rev()
        .map(|played| {
            let style = if *played.accepted() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {}", played.emoji(), played.word()), style),
                Span::raw(format!("  {}", played.explanation())),
            ]))
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" History "));
    frame.render_widget(list, area);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let (title, text) = match (view.phase, &view.score_submission) {
        (PhaseKind::GameOver, SubmissionStatus::Open) => (" Your name ", app.input().to_string()),
        (PhaseKind::GameOver, SubmissionStatus::InFlight) => {
            (" Leaderboard ", "Saving...".to_string())
        }
        (PhaseKind::GameOver, SubmissionStatus::Submitted(stored)) => (
            " Leaderboard ",
            format!("Saved as #{} for {}", stored.id(), stored.entry().player_name()),
        ),
        (PhaseKind::AwaitingJudge, _) => (" Judging... ", app.input().to_string()),
        (PhaseKind::Playing, _) => (" Your word ", app.input().to_string()),
        _ => (" ", String::new()),
    };
    let input = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);
}

fn draw_notification(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match (app.notification(), app.status()) {
        (Some(n), _) => (
            n.message.clone(),
            match n.kind {
                NotificationKind::Success => Color::Green,
                NotificationKind::Error => Color::Red,
            },
        ),
        (None, Some(status)) => (status.to_string(), Color::Yellow),
        (None, None) => (String::new(), Color::Reset),
    };
    let notification = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(notification, area);
}

fn draw_leaderboard(
    frame: &mut Frame,
    area: Rect,
    filter: &str,
    entries: &[word_battle::StoredEntry],
) {
    let popup = center_rect(area, 70, 16);
    frame.render_widget(Clear, popup);

    let rows = entries.iter().enumerate().map(|(rank, stored)| {
        let entry = stored.entry();
        Row::new(vec![
            format!("{}", rank + 1),
            entry.player_name().clone(),
            entry.score().to_string(),
            entry.difficulty().to_string(),
            entry.date().format("%Y-%m-%d").to_string(),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["#", "Player", "Score", "Level", "Date"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Leaderboard: {} (←/→ filter, Tab close) ", filter)),
    );
    frame.render_widget(table, popup);
}

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy",
        Difficulty::Medium => "Medium",
        Difficulty::Hard => "Hard",
    }
}

fn help_text(view: &SessionView) -> &'static str {
    match view.phase {
        PhaseKind::SelectingDifficulty => {
            "1/2/3 difficulty · l language · Tab leaderboard · q quit"
        }
        PhaseKind::Intro => "Esc give up",
        PhaseKind::Playing => "Type a word · Enter submit · Esc give up",
        PhaseKind::AwaitingJudge => "The judge is deciding... · Esc give up",
        PhaseKind::GameOver => match view.score_submission {
            SubmissionStatus::Open => {
                "Type your name · Enter save score · Tab leaderboard · Esc new game"
            }
            _ => "Enter/Esc new game · Tab leaderboard",
        },
    }
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
