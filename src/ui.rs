//! UI rendering helpers for the terminal user interface.
//!
//! The left half is the console (status strip, LCD screen, buttons and the
//! controls legend); the right half is the playlist.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{
    collections::BTreeMap,
    sync::LazyLock,
    time::{Duration, Instant},
};

use crate::app::{App, ScreenMode};
use crate::config::UiSettings;
use crate::player::Player;

mod spectrum;

pub use spectrum::SpectrumBars;

// Four-shade LCD palette.
pub const LCD_LIGHTEST: Color = Color::Rgb(155, 188, 15);
pub const LCD_LIGHT: Color = Color::Rgb(139, 172, 15);
pub const LCD_DARK: Color = Color::Rgb(48, 98, 48);
pub const LCD_DARKEST: Color = Color::Rgb(15, 56, 15);

const LED_ON: Color = Color::Rgb(255, 51, 51);
const LED_OFF: Color = Color::Rgb(51, 0, 0);

const REEL_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("←/→", "prev/next");
    map.insert("↑/↓", "volume");
    map.insert("space", "start/pause");
    map.insert("o", "select");
    map.insert("a/b", "tape/info");
    map.insert("j/k", "browse");
    map.insert("enter", "play row");
    map.insert("q", "quit");
    map
});

/// Render the controls help text.
fn controls_text() -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["←/→", "↑/↓", "space", "o", "a/b", "j/k", "enter", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// First line of the info screen.
pub fn status_text(player: &Player) -> &'static str {
    if player.is_playing() {
        "NOW PLAYING:"
    } else if player.current_track().is_some() {
        "PAUSED"
    } else {
        "INSERT CARTRIDGE"
    }
}

pub fn title_text(player: &Player) -> String {
    player
        .current_track()
        .map(|t| t.name.to_uppercase())
        .unwrap_or_else(|| "NO SELECT MUSIC".to_string())
}

pub fn volume_text(volume: f32) -> String {
    format!("VOL {}", (volume * 10.0).round() as u8)
}

fn start_label(playing: bool) -> &'static str {
    if playing { "PAUSE" } else { "START" }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

fn lcd_style() -> Style {
    Style::default().fg(LCD_DARKEST).bg(LCD_LIGHTEST)
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, player: &Player, ui: &UiSettings, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(frame.area());

    draw_console(frame, chunks[0], app, player, ui, now);
    draw_playlist(frame, chunks[1], app, player);

    if let Some(input) = &app.prompt {
        let area = centered_rect_sized(chunks[0].width.saturating_sub(4), 3, chunks[0]);
        frame.render_widget(Clear, area);
        let prompt = Paragraph::new(format!("{input}_")).block(
            Block::bordered()
                .title(" SELECT file or folder (enter loads, esc cancels) ")
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(prompt, area);
    }
}

fn draw_console(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    player: &Player,
    ui: &UiSettings,
    now: Instant,
) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(" cartridge ")
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(5),
        ])
        .split(inner);

    // Power LED and header strip
    let playing = player.is_playing();
    let led = Span::styled(
        "●",
        Style::default().fg(if playing { LED_ON } else { LED_OFF }),
    );
    let strip = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        led,
        Span::raw("  "),
        Span::raw(app.header_text.as_str()).italic(),
    ]));
    frame.render_widget(strip, rows[0]);

    draw_screen(frame, rows[1], app, player, ui, now);

    let buttons = Paragraph::new(format!(
        "[SELECT]  [{}]      (B)  (A)",
        start_label(playing)
    ))
    .alignment(Alignment::Center)
    .bold();
    frame.render_widget(buttons, rows[2]);

    let controls = Paragraph::new(controls_text())
        .block(
            Block::bordered()
                .title(" controls ")
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(controls, rows[3]);
}

fn draw_screen(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    player: &Player,
    ui: &UiSettings,
    now: Instant,
) {
    let title = match app.screen {
        ScreenMode::Info => " INFO ",
        ScreenMode::Tape => " TAPE ",
    };
    let block = Block::bordered()
        .border_style(Style::default().fg(LCD_DARK))
        .style(lcd_style())
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.screen {
        ScreenMode::Info => {
            let mut lines = vec![
                Line::from(status_text(player)),
                Line::from(""),
                Line::from(title_text(player)).bold(),
            ];

            if player.current_track().is_none() {
                lines.push(Line::from("(PRESS O TO SELECT)").fg(LCD_DARK));
            }

            if let (Some(track), Some(pos)) = (player.current_track(), player.position()) {
                let time = match track.duration {
                    Some(total) => format!("{} / {}", format_mmss(pos), format_mmss(total)),
                    None => format_mmss(pos),
                };
                lines.push(Line::from(""));
                lines.push(Line::from(time).fg(LCD_DARK));
            }

            if !player.audio_available() {
                lines.push(Line::from(""));
                lines.push(Line::from("NO AUDIO DEVICE").fg(LCD_DARK));
            }

            let info = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(lcd_style());
            frame.render_widget(info, inner);
        }
        ScreenMode::Tape => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(inner);

            let reel = if player.is_playing() {
                REEL_FRAMES[(app.frame / 4 % REEL_FRAMES.len() as u64) as usize]
            } else {
                REEL_FRAMES[0]
            };
            let cassette = Paragraph::new(vec![
                Line::from(".--------------."),
                Line::from(format!("|  ({reel})====({reel})  |")),
                Line::from("'--------------'"),
            ])
            .alignment(Alignment::Center)
            .style(lcd_style());
            frame.render_widget(cassette, parts[0]);

            let bars = SpectrumBars::new(&app.spectrum)
                .block_height(ui.block_height)
                .style(Style::default().fg(LCD_DARKEST).bg(LCD_LIGHT));
            frame.render_widget(bars, parts[1]);
        }
    }

    if app.overlay.is_visible(now) {
        let area = centered_rect_sized(10, 3, inner);
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(volume_text(player.volume()))
            .alignment(Alignment::Center)
            .block(Block::bordered())
            .style(Style::default().fg(LCD_LIGHTEST).bg(LCD_DARKEST));
        frame.render_widget(overlay, area);
    }
}

fn draw_playlist(frame: &mut Frame, area: Rect, app: &App, player: &Player) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(" PLAYLIST ")
        .padding(Padding::horizontal(1));

    let playlist = player.playlist();
    if playlist.is_empty() {
        let empty = Paragraph::new(vec![Line::from(""), Line::from("NO CARTRIDGE LOADED")])
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let current = player.current_index();
    let items: Vec<ListItem> = playlist
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let active = current == Some(i);
            let mut spans = vec![
                Span::raw(format!("{:>2}  ", i + 1)),
                Span::raw(track.name.as_str()),
            ];
            if active && player.is_playing() {
                spans.push(Span::raw("  PLAYING...").italic());
            }
            let style = if active {
                Style::default()
                    .fg(LCD_LIGHTEST)
                    .bg(LCD_DARKEST)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.cursor.min(playlist.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests;
