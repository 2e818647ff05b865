//! Outbound ports for the application core.

/// Character display abstraction (16x2 LCD on hardware, log lines on host).
pub trait DisplayPort {
    /// Write `text` on the given row, replacing its previous content.
    fn write_line(&mut self, row: u8, text: &str);

    /// Blank the whole display.
    fn clear(&mut self);
}
