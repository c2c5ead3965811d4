//! Desktop simulation of the knob panel.
//!
//! Runs the real control loop against mock PWM channels and scripted input
//! lines, in real time, with settings saved to a JSON file in the system
//! temp directory. The script presses the button, walks the palette,
//! switches modes and dims, then powers the LED off with a long press.
//! Run it twice to see the saved state restored.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_sim --features file-store
//! RUST_LOG=debug cargo run --example desktop_sim --features file-store
//! ```

use std::cell::Cell;

use rs_rgbknob::hal::{MockInput, MockLine, MockPwm, SystemClock};
use rs_rgbknob::traits::{Clock, Delay};
use rs_rgbknob::{Buzzer, FileStore, Panel, PanelConfig, PanelRunner, RgbLed};

/// Spacing between scripted line changes while turning.
const EDGE_MS: u64 = 5;

/// Delay backed by the tokio timer.
struct TokioDelay;

impl Delay for TokioDelay {
    async fn delay_ms(&mut self, ms: u32) {
        tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
    }
}

#[derive(Clone, Copy, Debug)]
enum Line {
    Clk,
    Dt,
    Sw,
}

/// Timed line changes.
struct Script {
    steps: Vec<(u64, Line, bool)>,
    at: u64,
}

impl Script {
    fn new(start_ms: u64) -> Self {
        Self {
            steps: Vec::new(),
            at: start_ms,
        }
    }

    fn wait(mut self, ms: u64) -> Self {
        self.at += ms;
        self
    }

    fn set(mut self, line: Line, level: bool) -> Self {
        self.steps.push((self.at, line, level));
        self
    }

    /// Full detents; each produces two counts with both edges decoded.
    fn turn(mut self, detents: u32, clockwise: bool) -> Self {
        let (first, second) = if clockwise {
            (Line::Clk, Line::Dt)
        } else {
            (Line::Dt, Line::Clk)
        };
        for _ in 0..detents {
            for (line, level) in [(first, false), (second, false), (first, true), (second, true)] {
                self = self.set(line, level).wait(EDGE_MS);
            }
        }
        self
    }

    /// Hold the button for `hold_ms` (active low).
    fn press(self, hold_ms: u64) -> Self {
        self.set(Line::Sw, false).wait(hold_ms).set(Line::Sw, true).wait(200)
    }

    fn end_ms(&self) -> u64 {
        self.at
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=================================");
    println!("  rs-rgbknob Desktop Simulation");
    println!("=================================");
    println!();

    let config = PanelConfig::default();
    config.validate()?;

    let path = std::env::temp_dir().join("rs_rgbknob_led_state.json");
    println!("Settings file: {}", path.display());

    let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), config.pwm.led_hz)
        .map_err(|_| anyhow::anyhow!("LED setup failed"))?;
    let buzzer = Buzzer::new(MockPwm::new(), config.tones.duty)
        .map_err(|_| anyhow::anyhow!("buzzer setup failed"))?;
    let panel = Panel::new(led, buzzer, FileStore::new(&path), config.clone())?;

    let (clk, dt, sw) = (MockInput::new(true), MockInput::new(true), MockInput::new(true));
    let lines: [MockLine; 3] = [clk.line(), dt.line(), sw.line()];

    let clock = SystemClock::new();
    let mut runner = PanelRunner::new(panel, clk, dt, sw, &config, clock.now_ms());
    println!("Restored: {:?}", runner.panel().state());

    let script = Script::new(200)
        // powers on when off, otherwise switches to dim mode
        .press(100)
        .turn(6, true)
        .wait(300)
        .turn(2, false)
        .wait(300)
        .press(100)
        .turn(5, false)
        .wait(300)
        .press(100)
        .wait(500)
        .press(1200)
        .wait(500);

    let end_ms = script.end_ms();
    let next = Cell::new(0usize);
    let last_report = Cell::new(0u64);

    runner
        .run_until(&clock, &mut TokioDelay, |runner| {
            let now = clock.now_ms();
            while let Some(&(at, line, level)) = script.steps.get(next.get()) {
                if at > now {
                    break;
                }
                lines[line as usize].set(level);
                next.set(next.get() + 1);
            }
            if now >= last_report.get() + 250 {
                last_report.set(now);
                let status = runner.panel().status();
                log::info!(
                    "{:>5}ms {:?} {:?} index={} intensity={} progress={:+.2} led={:?} tone={:?}",
                    now,
                    status.state.power,
                    status.state.mode,
                    status.state.color_index,
                    status.state.intensity,
                    status.progress,
                    status.color,
                    status.tone_hz
                );
            }
            now >= end_ms
        })
        .await
        .map_err(|_| anyhow::anyhow!("PWM write failed"))?;

    let mut panel = runner.into_panel();
    println!();
    println!("Final state: {:?}", panel.state());
    panel
        .shutdown()
        .map_err(|_| anyhow::anyhow!("shutdown failed"))?;
    println!("Saved to {}", path.display());
    Ok(())
}
