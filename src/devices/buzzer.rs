//! Buzzer melody sequencer.
//!
//! Table-driven tone player: a one-shot deadline fires per note, looks up
//! `tones[note_index]` / `rhythm[note_index]`, retunes the PWM (or silences
//! it for a rest slot), computes `duration = tempo / divisor`, advances the
//! index modulo the melody length and re-arms for the next note.  Stopping
//! always resets the index so a restart plays from the first note.

use log::info;

use crate::devices::Device;
use crate::drivers::hw_init;
use crate::events::{EventSource, StateSnapshot};
use crate::melody::{Melody, REST};
use crate::pins;

/// Plain value record of the buzzer's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuzzerState {
    pub active: bool,
    pub timestamp: u64,
}

pub struct Buzzer {
    state: BuzzerState,
    melody: Melody,
    note_index: usize,
    /// PWM duty applied while a tone sounds.
    duty: u16,
    /// Monotonic deadline (ms) for the next note, if playing.
    note_deadline_ms: Option<u64>,
    /// Mirror of the last tone written to hardware (0 = silent).
    current_tone_hz: u16,
}

impl Buzzer {
    pub fn new(melody: Melody, duty: u16) -> Self {
        debug_assert!(!melody.is_empty());
        debug_assert_eq!(melody.tones.len(), melody.rhythm.len());
        Self {
            state: BuzzerState::default(),
            melody,
            note_index: 0,
            duty,
            note_deadline_ms: None,
            current_tone_hz: 0,
        }
    }

    pub fn state(&self) -> &BuzzerState {
        &self.state
    }

    /// Index of the next note to play.  Always a valid table index.
    pub fn note_index(&self) -> usize {
        self.note_index
    }

    /// Last tone written to the output (0 = silent).
    pub fn current_tone_hz(&self) -> u16 {
        self.current_tone_hz
    }

    /// Mark active and arm the first-note deadline.  Calling while already
    /// playing re-arms from the current position.
    pub fn start_melody(&mut self, start_delay_ms: u64, now_ms: u64) {
        info!("buzzer: melody start (delay {} ms)", start_delay_ms);
        self.state.active = true;
        self.state.timestamp = now_ms;
        self.note_deadline_ms = Some(now_ms + start_delay_ms);
    }

    /// Disarm the note timer, silence the output and rewind to the first
    /// note.  Idempotent.
    pub fn stop_melody(&mut self, now_ms: u64) {
        info!("buzzer: melody stop");
        self.state.active = false;
        self.state.timestamp = now_ms;
        self.note_deadline_ms = None;
        self.note_index = 0;
        self.silence();
    }

    /// Service the note deadline.  Called every loop tick.
    pub fn poll(&mut self, now_ms: u64) {
        let Some(deadline) = self.note_deadline_ms else {
            return;
        };
        if now_ms < deadline {
            return;
        }

        let tone = self.melody.tones[self.note_index];
        let divisor = self.melody.rhythm[self.note_index];
        let duration_ms = u64::from(self.melody.tempo / u32::from(divisor));

        self.start_tone(tone);

        self.note_index = (self.note_index + 1) % self.melody.len();
        self.note_deadline_ms = Some(now_ms + duration_ms);
    }

    fn start_tone(&mut self, tone: u16) {
        if tone == REST {
            self.silence();
        } else {
            hw_init::ledc_set_freq(pins::LEDC_CH_BUZZER, u32::from(tone));
            hw_init::ledc_set_duty(pins::LEDC_CH_BUZZER, self.duty);
            self.current_tone_hz = tone;
        }
    }

    fn silence(&mut self) {
        hw_init::ledc_set_duty(pins::LEDC_CH_BUZZER, 0);
        self.current_tone_hz = 0;
    }
}

impl Device for Buzzer {
    fn source(&self) -> EventSource {
        EventSource::Buzzer
    }

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::Buzzer(self.state)
    }

    fn finalize(&mut self) {
        self.note_deadline_ms = None;
        self.silence();
    }
}
