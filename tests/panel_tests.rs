//! Integration tests for the panel: state machine, drivers and storage
//! working together.

use rs_rgbknob::{
    color::Palette,
    drivers::{Buzzer, RgbLed},
    hal::{MemoryStore, MockClock, MockDelay, MockInput, MockLine, MockPwm},
    tone::{NOTE_C5, NOTE_E5, NOTE_G5},
    Direction, Mode, Panel, PanelConfig, PanelEvent, PanelRunner, PersistedSnapshot, PowerState,
    Rgb,
};
use rs_rgbknob::traits::Clock;

fn rgb_config() -> PanelConfig {
    PanelConfig::default().with_palette(Palette::new(&[Rgb::RED, Rgb::GREEN, Rgb::BLUE]).unwrap())
}

fn panel(store: MemoryStore, config: PanelConfig) -> Panel<MockPwm, MemoryStore> {
    let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
    let buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
    let mut panel = Panel::new(led, buzzer, store, config).unwrap();
    panel.update(0).unwrap();
    panel
}

fn off_snapshot() -> PersistedSnapshot {
    PersistedSnapshot {
        power: PowerState::Off,
        ..PersistedSnapshot::default()
    }
}

// ============================================================================
// End-to-End Scenario
// ============================================================================

#[test]
fn power_on_walk_palette_power_off() {
    let mut panel = panel(MemoryStore::new().with_snapshot(off_snapshot()), rgb_config());
    assert_eq!(panel.led().color(), Rgb::BLACK);

    // Short press while off: power on at the stored color
    panel.handle(PanelEvent::ShortPress, 100).unwrap();
    assert_eq!(panel.state().power, PowerState::On);
    assert_eq!(panel.led().color(), Rgb::RED);
    assert_eq!(panel.buzzer().frequency(), Some(NOTE_C5));

    // Melody: C5, gap, E5, gap, G5
    panel.update(160).unwrap();
    assert_eq!(panel.buzzer().frequency(), None);
    panel.update(180).unwrap();
    assert_eq!(panel.buzzer().frequency(), Some(NOTE_E5));
    panel.update(250).unwrap();
    assert_eq!(panel.buzzer().frequency(), Some(NOTE_G5));
    panel.update(300).unwrap();
    assert_eq!(panel.buzzer().frequency(), None);

    // Four clockwise steps cross to the next color
    for i in 0..4 {
        panel
            .handle(PanelEvent::Rotate(Direction::Clockwise), 400 + i * 60)
            .unwrap();
    }
    assert_eq!(panel.state().color_index, 1);
    assert_eq!(panel.led().color(), Rgb::GREEN);

    // Long press: fade to black and save
    panel.handle(PanelEvent::LongPress, 1000).unwrap();
    assert_eq!(panel.state().power, PowerState::Off);
    panel.update(1300).unwrap();
    assert_eq!(panel.led().color(), Rgb::BLACK);

    let saved = panel.store().snapshot.unwrap();
    assert_eq!(saved.mode, Mode::Color);
    assert_eq!(saved.color_index, 1);
    assert_eq!(saved.power, PowerState::Off);
}

#[test]
fn dim_mode_scales_current_color() {
    let mut panel = panel(MemoryStore::new(), rgb_config());
    panel.handle(PanelEvent::ShortPress, 0).unwrap();
    assert_eq!(panel.state().mode, Mode::Dim);

    for i in 0..5 {
        panel
            .handle(PanelEvent::Rotate(Direction::CounterClockwise), 200 + i * 10)
            .unwrap();
    }
    assert_eq!(panel.state().intensity, 255 - 5 * 12);
    assert_eq!(panel.led().color(), Rgb::RED.scaled(195));

    // Intensity does not wrap below zero
    for i in 0..40 {
        panel
            .handle(PanelEvent::Rotate(Direction::CounterClockwise), 300 + i * 10)
            .unwrap();
    }
    assert_eq!(panel.state().intensity, 0);
    assert_eq!(panel.led().color(), Rgb::BLACK);
    assert_eq!(panel.state().power, PowerState::On);
}

#[test]
fn rotation_ignored_while_off() {
    let mut panel = panel(MemoryStore::new().with_snapshot(off_snapshot()), rgb_config());
    for i in 0..8 {
        panel
            .handle(PanelEvent::Rotate(Direction::Clockwise), i * 10)
            .unwrap();
    }
    assert_eq!(panel.state().color_index, 0);
    assert_eq!(panel.led().color(), Rgb::BLACK);
    assert_eq!(panel.buzzer().frequency(), None);
}

#[test]
fn restart_restores_saved_state() {
    let mut first = panel(MemoryStore::new(), rgb_config());
    for i in 0..8 {
        first
            .handle(PanelEvent::Rotate(Direction::Clockwise), i * 10)
            .unwrap();
    }
    first.handle(PanelEvent::ShortPress, 200).unwrap();
    let saved = first.store().snapshot.unwrap();
    assert_eq!(saved.color_index, 2);
    assert_eq!(saved.mode, Mode::Dim);

    let second = panel(MemoryStore::new().with_snapshot(saved), rgb_config());
    assert_eq!(*second.state(), *first.state());
    assert_eq!(second.led().color(), Rgb::BLUE);
}

#[test]
fn stale_index_falls_back_to_first_color() {
    let snapshot = PersistedSnapshot {
        color_index: 5,
        ..PersistedSnapshot::default()
    };
    let panel = panel(MemoryStore::new().with_snapshot(snapshot), rgb_config());
    assert_eq!(panel.state().color_index, 0);
    assert_eq!(panel.led().color(), Rgb::RED);
}

#[test]
fn invalid_config_rejected() {
    let config = PanelConfig::default().with_interaction(
        rs_rgbknob::config::InteractionConfig::default().with_steps_per_color(0),
    );
    let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
    let buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
    assert!(Panel::new(led, buzzer, MemoryStore::new(), config).is_err());
}

// ============================================================================
// Runner With Raw Input Lines
// ============================================================================

struct Lines {
    clk: MockLine,
    dt: MockLine,
    sw: MockLine,
}

fn runner(config: PanelConfig) -> (PanelRunner<MockInput, MockPwm, MemoryStore>, Lines) {
    let (clk, dt, sw) = (MockInput::new(true), MockInput::new(true), MockInput::new(true));
    let lines = Lines {
        clk: clk.line(),
        dt: dt.line(),
        sw: sw.line(),
    };
    let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
    let buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
    let panel = Panel::new(led, buzzer, MemoryStore::new(), config.clone()).unwrap();
    (PanelRunner::new(panel, clk, dt, sw, &config, 0), lines)
}

#[test]
fn long_hold_powers_off_through_runner() {
    let (mut runner, lines) = runner(rgb_config());
    runner.tick(0).unwrap();

    lines.sw.set(false);
    for now in 1..=1100 {
        runner.tick(now).unwrap();
    }
    // Still held: nothing classified yet
    assert_eq!(runner.panel().state().power, PowerState::On);

    lines.sw.set(true);
    for now in 1101..=1500 {
        runner.tick(now).unwrap();
    }
    assert_eq!(runner.panel().state().power, PowerState::Off);
    assert_eq!(runner.panel().led().color(), Rgb::BLACK);
}

#[test]
fn bouncy_press_counts_once() {
    let (mut runner, lines) = runner(rgb_config());
    runner.tick(0).unwrap();

    // Contact bounce within the debounce window
    for (now, level) in [(100, false), (110, true), (120, false)] {
        lines.sw.set(level);
        runner.tick(now).unwrap();
    }
    for now in 121..=300 {
        runner.tick(now).unwrap();
    }
    lines.sw.set(true);
    for now in 301..=500 {
        runner.tick(now).unwrap();
    }

    assert_eq!(runner.panel().state().mode, Mode::Dim);
    assert_eq!(runner.panel().store().saves, 1);
}

#[test]
fn encoder_edges_walk_the_palette() {
    let (mut runner, lines) = runner(rgb_config());
    runner.tick(0).unwrap();

    // One detent clockwise is two decoded edges
    let mut now = 0;
    for _ in 0..2 {
        for (line, level) in [
            (&lines.clk, false),
            (&lines.dt, false),
            (&lines.clk, true),
            (&lines.dt, true),
        ] {
            now += 5;
            line.set(level);
            runner.tick(now).unwrap();
        }
    }

    assert_eq!(runner.encoder().position(), 4);
    assert_eq!(runner.panel().state().color_index, 1);
    assert_eq!(runner.panel().led().color(), Rgb::GREEN);
}

#[tokio::test]
async fn async_loop_runs_on_mock_time() {
    let (mut runner, lines) = runner(rgb_config());
    let clock = MockClock::new();
    let mut delay = MockDelay::new(&clock);

    lines.sw.set(false);
    runner
        .run_until(&clock, &mut delay, |_| {
            if clock.now_ms() >= 120 {
                lines.sw.set(true);
            }
            clock.now_ms() >= 400
        })
        .await
        .unwrap();

    assert_eq!(runner.panel().state().mode, Mode::Dim);
    assert_eq!(delay.total_ms, 400);
    assert_eq!(delay.calls, 400);
}

// ============================================================================
// File Persistence
// ============================================================================

#[cfg(feature = "file-store")]
#[test]
fn file_store_survives_restart() {
    use rs_rgbknob::FileStore;

    let path = std::env::temp_dir().join(format!("rs_rgbknob_restart_{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let build = || {
        let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
        let buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
        let mut panel = Panel::new(led, buzzer, FileStore::new(&path), rgb_config()).unwrap();
        panel.update(0).unwrap();
        panel
    };

    let mut first = build();
    for i in 0..4 {
        first
            .handle(PanelEvent::Rotate(Direction::Clockwise), i * 10)
            .unwrap();
    }
    first.handle(PanelEvent::LongPress, 100).unwrap();
    assert!(path.exists());

    let mut second = build();
    assert_eq!(*second.state(), *first.state());
    assert_eq!(second.led().color(), Rgb::BLACK);

    second.handle(PanelEvent::ShortPress, 10).unwrap();
    assert_eq!(second.led().color(), Rgb::GREEN);

    std::fs::remove_file(&path).unwrap();
}
