use super::*;
use crate::audio::testing::{FakeBackend, track};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer, widgets::Widget};

fn player(names: &[&str]) -> Player {
    let (backend, _recorder) = FakeBackend::new();
    let mut p = Player::new(Box::new(backend), 0.5);
    if !names.is_empty() {
        p.add_files(names.iter().map(|n| track(n)).collect());
    }
    p
}

fn render(app: &App, player: &Player, now: Instant) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| draw(f, app, player, &UiSettings::default(), now))
        .unwrap();
    buffer_text(terminal.backend().buffer())
}

fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn empty_console_asks_for_a_cartridge() {
    let app = App::new(&UiSettings::default());
    let text = render(&app, &player(&[]), Instant::now());

    assert!(text.contains("INSERT CARTRIDGE"));
    assert!(text.contains("NO SELECT MUSIC"));
    assert!(text.contains("NO CARTRIDGE LOADED"));
    assert!(text.contains("[START]"));
    assert!(text.contains("(PRESS O TO SELECT)"));
}

#[test]
fn loaded_but_paused_shows_the_uppercased_title() {
    let app = App::new(&UiSettings::default());
    let p = player(&["chiptune", "bleeps"]);
    let text = render(&app, &p, Instant::now());

    assert!(text.contains("PAUSED"));
    assert!(text.contains("CHIPTUNE"));
    assert!(text.contains(" 1  chiptune"));
    assert!(text.contains(" 2  bleeps"));
    assert!(text.contains("00:42 / 03:00"));
    assert!(!text.contains("PLAYING..."));
    assert!(!text.contains("PRESS O TO SELECT"));
}

#[test]
fn playing_track_is_tagged_in_the_playlist() {
    let app = App::new(&UiSettings::default());
    let mut p = player(&["chiptune"]);
    p.toggle_play();
    let text = render(&app, &p, Instant::now());

    assert!(text.contains("NOW PLAYING:"));
    assert!(text.contains("PLAYING..."));
    assert!(text.contains("[PAUSE]"));
}

#[test]
fn volume_overlay_appears_until_its_deadline() {
    let mut app = App::new(&UiSettings::default());
    let p = player(&[]);
    let t0 = Instant::now();
    app.overlay.show(t0);

    assert!(render(&app, &p, t0).contains("VOL 5"));
    assert!(!render(&app, &p, t0 + Duration::from_secs(2)).contains("VOL 5"));
}

#[test]
fn select_prompt_echoes_the_typed_path() {
    let mut app = App::new(&UiSettings::default());
    app.open_prompt();
    for c in "~/music".chars() {
        app.push_prompt_char(c);
    }
    let text = render(&app, &player(&[]), Instant::now());
    assert!(text.contains("~/music_"));
}

#[test]
fn tape_screen_draws_the_spectrum() {
    let mut app = App::new(&UiSettings::default());
    app.show_tape();
    app.set_spectrum(Some(vec![255; 16]));
    let text = render(&app, &player(&["chiptune"]), Instant::now());

    assert!(text.contains(" TAPE "));
    assert!(text.contains('█'));
}

#[test]
fn volume_text_rounds_to_tenths() {
    assert_eq!(volume_text(0.0), "VOL 0");
    assert_eq!(volume_text(0.5), "VOL 5");
    assert_eq!(volume_text(0.6000001), "VOL 6");
    assert_eq!(volume_text(1.0), "VOL 10");
}

#[test]
fn spectrum_bars_stack_from_the_bottom() {
    let area = Rect::new(0, 0, 16, 4);
    let mut buf = Buffer::empty(area);
    SpectrumBars::new(&[255, 0, 128, 64]).render(area, &mut buf);

    let filled = |x: u16| {
        (0..4)
            .filter(|&y| buf[(x, y)].symbol() == "█")
            .count()
    };
    // Four columns of width four, one cell gap each.
    assert_eq!(filled(0), 4);
    assert_eq!(filled(3), 0);
    assert_eq!(filled(4), 0);
    assert_eq!(filled(8), 2);
    assert_eq!(filled(12), 1);
    assert_eq!(buf[(8, 3)].symbol(), "█");
    assert_eq!(buf[(8, 0)].symbol(), " ");
}

#[test]
fn tall_blocks_leave_a_gap_row() {
    let area = Rect::new(0, 0, 2, 6);
    let mut buf = Buffer::empty(area);
    SpectrumBars::new(&[255])
        .block_height(3)
        .render(area, &mut buf);

    let column: Vec<&str> = (0..6).map(|y| buf[(0, y)].symbol()).collect();
    assert_eq!(column, vec![" ", "█", "█", " ", "█", "█"]);
}
