//! Static melody data for the buzzer sequencer.
//!
//! A melody is two parallel tables: `tones` (Hz, `REST` = silence) and
//! `rhythm` (note-duration divisors — a larger divisor yields a shorter
//! note: `duration_ms = tempo / divisor`).  The sequencer walks both tables
//! in lockstep, wrapping at the end.

/// Sentinel tone value: keep the output silent for this slot.
pub const REST: u16 = 0;

// ── Equal-temperament tone frequencies (Hz), octaves 6-7 ─────
// Only the octaves the bundled theme uses; extend downward if a
// future melody needs them.

pub const C6: u16 = 1047;
pub const CS6: u16 = 1109;
pub const D6: u16 = 1175;
pub const DS6: u16 = 1245;
pub const E6: u16 = 1319;
pub const F6: u16 = 1397;
pub const FS6: u16 = 1480;
pub const G6: u16 = 1568;
pub const GS6: u16 = 1661;
pub const A6: u16 = 1760;
pub const AS6: u16 = 1865;
pub const B6: u16 = 1976;
pub const C7: u16 = 2093;
pub const CS7: u16 = 2217;
pub const D7: u16 = 2349;
pub const DS7: u16 = 2489;
pub const E7: u16 = 2637;
pub const F7: u16 = 2794;
pub const FS7: u16 = 2960;
pub const G7: u16 = 3136;
pub const GS7: u16 = 3322;
pub const A7: u16 = 3520;
pub const AS7: u16 = 3729;
pub const B7: u16 = 3951;

/// A table-driven melody.  `tones` and `rhythm` are always the same length.
#[derive(Debug, Clone, Copy)]
pub struct Melody {
    /// Whole-note duration basis (ms); per-note duration = tempo / divisor.
    pub tempo: u32,
    pub tones: &'static [u16],
    pub rhythm: &'static [u16],
}

impl Melody {
    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }
}

#[rustfmt::skip]
const THEME_TONES: [u16; 80] = [
    E7, E7, REST, E7, REST, C7, E7, REST,
    G7, REST, REST, REST, G6, REST, REST, REST,
    C7, REST, REST, G6, REST, REST, E6, REST,
    REST, A6, REST, B6, REST, AS6, A6, REST,
    G6, E7, REST, G7, A7, REST, F7, G7,
    REST, E7, REST, C7, D7, B6, REST, REST,
    C7, REST, REST, G6, REST, REST, E6, REST,
    REST, A6, REST, B6, REST, AS6, A6, REST,
    G6, E7, REST, G7, A7, REST, F7, G7,
    REST, E7, REST, C7, D7, B6, REST, REST,
];

const THEME_RHYTHM: [u16; 80] = [8; 80];

/// The alarm theme tune: straight eighth notes at tempo 1200
/// (150 ms per slot).
pub const THEME: Melody = Melody {
    tempo: 1200,
    tones: &THEME_TONES,
    rhythm: &THEME_RHYTHM,
};
