//! Analog arming controls.
//!
//! Each configured control is one ADC channel (a key switch or panel
//! toggle behind a divider).  Control `i` arms zone `i + 1` while its
//! reading is on the configured side of its threshold.

use heapless::Vec;

use crate::app::ports::ControlPort;
use crate::config::{ControlConfig, MAX_CONTROLS};

pub struct ControlDecoder {
    controls: Vec<ControlConfig, MAX_CONTROLS>,
}

impl ControlDecoder {
    pub fn new(controls: &[ControlConfig]) -> Self {
        let mut table = Vec::new();
        for c in controls.iter().take(MAX_CONTROLS) {
            let _ = table.push(*c);
        }
        Self { controls: table }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Sample every control; bit `i` of the result is set when control `i`
    /// asks for its zone to be armed.
    pub fn decode(&self, port: &mut impl ControlPort) -> u8 {
        self.controls
            .iter()
            .enumerate()
            .filter(|(_, c)| asserted(c, port.sample(c.channel)))
            .fold(0, |mask, (i, _)| mask | 1 << i)
    }
}

fn asserted(control: &ControlConfig, reading: u16) -> bool {
    (reading > control.threshold) == control.sense_high
}
