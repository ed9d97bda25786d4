//! Display sink that reports screen changes over defmt-RTT.
//!
//! Stands in for a physical OLED: the presenter only hands over screens
//! that changed, so each render becomes one log line.

use defmt::info;
use remote_core::presentation::{GaugeBar, Screen};
use remote_core::{DisplayError, DisplaySink};

/// Logs every rendered screen.
#[derive(Debug, Default)]
pub struct LogDisplay {
    frames: u32,
}

impl LogDisplay {
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: 0 }
    }

    /// Screens rendered since boot.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl DisplaySink for LogDisplay {
    fn render(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        self.frames = self.frames.wrapping_add(1);
        match screen {
            Screen::Splash => info!("[display] esk8 remote"),
            Screen::Title(title) => info!("[display] {=str}", title),
            Screen::Settings(view) => {
                let marker = if view.editing { "  > " } else { "" };
                info!(
                    "[display] {=u8}. {=str}: {=str}{} {=str}",
                    view.number, view.name, marker, view.value, view.unit
                );
            }
            Screen::Main(view) => {
                let (direction, width) = match view.gauge {
                    GaugeBar::Forward(w) => ("+", w),
                    GaugeBar::Reverse(w) => ("-", w),
                };
                info!(
                    "[display] {} | gauge {=str}{=u8} | battery {=u8}/5 | {}",
                    view.readout,
                    direction,
                    width,
                    view.battery.lit(),
                    view.signal
                );
            }
        }
        Ok(())
    }
}
