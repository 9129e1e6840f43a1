//! End-to-end dashboard flow: real worker thread, manual clock, test backend.

use std::sync::mpsc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use replaylab_core::{ManualClock, PlaybackStatus};
use replaylab_runner::{InputSource, ReplayConfig};
use replaylab_tui::worker::{spawn_worker, WorkerCommand};
use replaylab_tui::{input, ui, App};

fn press(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn wait_for_build(app: &mut App<ManualClock>) {
    let resp = app
        .worker_rx
        .recv_timeout(Duration::from_secs(30))
        .expect("worker should answer");
    app.handle_response(resp);
}

fn screen(app: &App<ManualClock>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn build_play_rebuild() {
    let mut config = ReplayConfig::default();
    config.data.start_date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    config.data.end_date = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();

    let clock = ManualClock::new();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let handle = spawn_worker(cmd_rx, resp_tx).unwrap();
    let mut app = App::new(
        config,
        InputSource::synthetic(),
        clock.clone(),
        cmd_tx.clone(),
        resp_rx,
    );

    app.request_build();
    assert!(screen(&app).contains("Building dataset"));
    wait_for_build(&mut app);
    assert!(screen(&app).contains("50 / 364"));

    input::handle_key(&mut app, press(' '));
    clock.advance_millis(1_000);
    assert_eq!(app.pump(), 20);
    assert!(screen(&app).contains("LIVE"));
    assert!(screen(&app).contains("70 / 364"));

    // Changing a parameter mid-replay and rebuilding reloads from the top.
    input::handle_key(&mut app, press('S'));
    assert!(screen(&app).contains("press l to rebuild"));
    input::handle_key(&mut app, press('l'));
    wait_for_build(&mut app);
    assert_eq!(app.status(), PlaybackStatus::Idle);
    assert_eq!(app.config.strategy.short_window, 6);
    assert!(screen(&app).contains("50 / 364"));

    cmd_tx.send(WorkerCommand::Shutdown).unwrap();
    handle.join().unwrap();
}

#[test]
fn missing_csv_shows_error_once() {
    let mut config = ReplayConfig::default();
    config.data.price_csv = "/definitely/missing.csv".into();

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let handle = spawn_worker(cmd_rx, resp_tx).unwrap();
    let mut app = App::new(
        config,
        InputSource::Csv,
        ManualClock::new(),
        cmd_tx.clone(),
        resp_rx,
    );

    app.request_build();
    wait_for_build(&mut app);
    let s = screen(&app);
    assert!(s.contains("ERROR"));
    assert!(app.session.is_none());
    // Nothing else arrives; the failure is not retried.
    assert!(app.worker_rx.recv_timeout(Duration::from_millis(100)).is_err());

    cmd_tx.send(WorkerCommand::Shutdown).unwrap();
    handle.join().unwrap();
}
