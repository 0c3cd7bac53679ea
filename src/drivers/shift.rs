//! Bit-banged shift-register cascades over embedded-hal pins.
//!
//! ## Input (74HC165 chain)
//!
//! `load` low captures every parallel input; while `load` is high each
//! rising edge on `clock` shifts the chain one place towards `data`.
//! Bit 0 is the first bit presented on `data` after the load.
//!
//! ## Output (74HC595 chain)
//!
//! Bits are shifted in highest index first, so after a full frame bit 0
//! sits on the first register's Q0.  A rising edge on `latch` copies the
//! shift stage to the outputs in one step.
//!
//! A pin error aborts the transfer: the input keeps its previous image and
//! the output keeps its staged bits for the next write.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{InputCascade, OutputCascade};
use crate::config::MAX_CASCADE_REGISTERS;
use crate::error::IoError;

const IMAGE_BYTES: usize = MAX_CASCADE_REGISTERS as usize;

type Image = [u8; IMAGE_BYTES];

fn get_bit(image: &Image, bits: u16, bit: u8) -> bool {
    u16::from(bit) < bits && image[usize::from(bit / 8)] & (1 << (bit % 8)) != 0
}

fn put_bit(image: &mut Image, bit: u16, on: bool) {
    let byte = &mut image[usize::from(bit / 8)];
    let mask = 1 << (bit % 8);
    if on {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}

fn pulse<P: OutputPin>(pin: &mut P) -> Result<(), IoError> {
    pin.set_high().map_err(|_| IoError::PinWrite)?;
    pin.set_low().map_err(|_| IoError::PinWrite)
}

// ───────────────────────────────────────────────────────────────
// ShiftIn
// ───────────────────────────────────────────────────────────────

pub struct ShiftIn<D, C, L> {
    data: D,
    clock: C,
    load: L,
    bits: u16,
    image: Image,
    failures: u32,
}

impl<D: InputPin, C: OutputPin, L: OutputPin> ShiftIn<D, C, L> {
    /// `registers` is clamped to the supported cascade length.
    pub fn new(data: D, clock: C, load: L, registers: u8) -> Self {
        Self {
            data,
            clock,
            load,
            bits: u16::from(registers.min(MAX_CASCADE_REGISTERS)) * 8,
            image: [0; IMAGE_BYTES],
            failures: 0,
        }
    }

    /// Failed transfers since construction.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn transfer(&mut self) -> Result<Image, IoError> {
        let mut image = [0; IMAGE_BYTES];
        self.clock.set_low().map_err(|_| IoError::PinWrite)?;
        self.load.set_low().map_err(|_| IoError::PinWrite)?;
        self.load.set_high().map_err(|_| IoError::PinWrite)?;
        for bit in 0..self.bits {
            let level = self.data.is_high().map_err(|_| IoError::PinRead)?;
            put_bit(&mut image, bit, level);
            pulse(&mut self.clock)?;
        }
        Ok(image)
    }
}

impl<D: InputPin, C: OutputPin, L: OutputPin> InputCascade for ShiftIn<D, C, L> {
    fn read(&mut self) {
        match self.transfer() {
            Ok(image) => self.image = image,
            Err(e) => {
                self.failures = self.failures.wrapping_add(1);
                warn!("input cascade: {e}, keeping last image");
            }
        }
    }

    fn get(&self, bit: u8) -> bool {
        get_bit(&self.image, self.bits, bit)
    }
}

// ───────────────────────────────────────────────────────────────
// ShiftOut
// ───────────────────────────────────────────────────────────────

pub struct ShiftOut<D, C, L> {
    data: D,
    clock: C,
    latch: L,
    bits: u16,
    staged: Image,
    failures: u32,
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> ShiftOut<D, C, L> {
    pub fn new(data: D, clock: C, latch: L, registers: u8) -> Self {
        Self {
            data,
            clock,
            latch,
            bits: u16::from(registers.min(MAX_CASCADE_REGISTERS)) * 8,
            staged: [0; IMAGE_BYTES],
            failures: 0,
        }
    }

    /// Staged level of one bit.
    pub fn staged(&self, bit: u8) -> bool {
        get_bit(&self.staged, self.bits, bit)
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn transfer(&mut self) -> Result<(), IoError> {
        self.latch.set_low().map_err(|_| IoError::PinWrite)?;
        for bit in (0..self.bits).rev() {
            let on = get_bit(&self.staged, self.bits, bit as u8);
            self.data.set_state(on.into()).map_err(|_| IoError::PinWrite)?;
            pulse(&mut self.clock)?;
        }
        pulse(&mut self.latch)
    }
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> OutputCascade for ShiftOut<D, C, L> {
    fn set(&mut self, bit: u8, on: bool) {
        if u16::from(bit) < self.bits {
            put_bit(&mut self.staged, u16::from(bit), on);
        }
    }

    fn write(&mut self) {
        if let Err(e) = self.transfer() {
            self.failures = self.failures.wrapping_add(1);
            warn!("output cascade: {e}");
        }
    }
}
