//! Cooperative tick loop.
//!
//! [`PanelRunner`] owns the panel and both input monitors. Each tick it
//! samples the encoder and the button when their cadence is due, hands any
//! events to the panel, and steps the transitions. The async loop suspends
//! only between ticks.
//!
//! # Example
//!
//! ```rust
//! use rs_rgbknob::config::PanelConfig;
//! use rs_rgbknob::drivers::{Buzzer, RgbLed};
//! use rs_rgbknob::hal::{MemoryStore, MockInput, MockPwm};
//! use rs_rgbknob::{Panel, PanelRunner};
//!
//! let config = PanelConfig::default();
//! let led = RgbLed::new(MockPwm::new(), MockPwm::new(), MockPwm::new(), 1000).unwrap();
//! let buzzer = Buzzer::new(MockPwm::new(), 0.5).unwrap();
//! let panel = Panel::new(led, buzzer, MemoryStore::new(), config.clone()).unwrap();
//!
//! let mut runner = PanelRunner::new(
//!     panel,
//!     MockInput::new(true),
//!     MockInput::new(true),
//!     MockInput::new(true),
//!     &config,
//!     0,
//! );
//!
//! for now in 0..20 {
//!     runner.tick(now).unwrap();
//! }
//! assert_eq!(runner.encoder().position(), 0);
//! ```

use crate::button::ButtonMonitor;
use crate::config::{PanelConfig, TimingConfig};
use crate::encoder::EncoderMonitor;
use crate::panel::Panel;
use crate::traits::{Clock, Delay, DigitalInput, PwmChannel, SettingsStore};

/// Owns the panel and its inputs and runs them on their cadences.
pub struct PanelRunner<I, P, S>
where
    I: DigitalInput,
    P: PwmChannel,
    S: SettingsStore,
{
    panel: Panel<P, S>,
    encoder: EncoderMonitor<I>,
    button: ButtonMonitor<I>,
    timing: TimingConfig,
    next_encoder_ms: u64,
    next_button_ms: u64,
}

impl<I, P, S> PanelRunner<I, P, S>
where
    I: DigitalInput,
    P: PwmChannel,
    S: SettingsStore,
{
    /// Runner over `panel` reading the encoder on `clk`/`dt` and the button
    /// on `sw`. Both monitors take their seed sample at `now_ms`.
    pub fn new(
        panel: Panel<P, S>,
        clk: I,
        dt: I,
        sw: I,
        config: &PanelConfig,
        now_ms: u64,
    ) -> Self {
        Self {
            panel,
            encoder: EncoderMonitor::new(clk, dt, &config.encoder, now_ms),
            button: ButtonMonitor::new(sw, &config.timing, &config.button),
            timing: config.timing.clone(),
            next_encoder_ms: now_ms,
            next_button_ms: now_ms,
        }
    }

    /// Run one tick at `now_ms`.
    ///
    /// Order: encoder sample (if due), button sample (if due), then one
    /// transition step. Both samples are applied before anything is
    /// written, so each output is written at most once per tick.
    pub fn tick(&mut self, now_ms: u64) -> Result<(), P::Error> {
        if now_ms >= self.next_encoder_ms {
            self.next_encoder_ms = now_ms + self.timing.encoder_period_ms as u64;
            if let Some(rotation) = self.encoder.sample(now_ms) {
                self.panel.apply(rotation.into(), now_ms);
            }
        }

        if now_ms >= self.next_button_ms {
            self.next_button_ms = now_ms + self.timing.button_period_ms as u64;
            if let Some(gesture) = self.button.sample(now_ms) {
                self.panel.apply(gesture.into(), now_ms);
            }
        }

        self.panel.update(now_ms)?;
        Ok(())
    }

    /// Time of the next due input sample.
    pub fn next_due_ms(&self) -> u64 {
        self.next_encoder_ms.min(self.next_button_ms)
    }

    /// Tick until `stop` returns true, sleeping one encoder period between
    /// ticks.
    pub async fn run_until<C, D, F>(
        &mut self,
        clock: &C,
        delay: &mut D,
        mut stop: F,
    ) -> Result<(), P::Error>
    where
        C: Clock,
        D: Delay,
        F: FnMut(&Self) -> bool,
    {
        log::info!(
            "control loop started: encoder every {}ms, button every {}ms",
            self.timing.encoder_period_ms,
            self.timing.button_period_ms
        );
        while !stop(self) {
            self.tick(clock.now_ms())?;
            delay.delay_ms(self.timing.encoder_period_ms).await;
        }
        log::info!("control loop stopped");
        Ok(())
    }

    /// Tick forever. Returns only on a driver error.
    pub async fn run<C, D>(&mut self, clock: &C, delay: &mut D) -> Result<(), P::Error>
    where
        C: Clock,
        D: Delay,
    {
        self.run_until(clock, delay, |_| false).await
    }

    /// The panel.
    pub fn panel(&self) -> &Panel<P, S> {
        &self.panel
    }

    /// The encoder monitor.
    pub fn encoder(&self) -> &EncoderMonitor<I> {
        &self.encoder
    }

    /// The button monitor.
    pub fn button(&self) -> &ButtonMonitor<I> {
        &self.button
    }

    /// Give back the panel.
    pub fn into_panel(self) -> Panel<P, S> {
        self.panel
    }
}
