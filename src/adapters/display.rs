//! 16x2 character display adapters.
//!
//! [`Lcd1602Display`] drives an HD44780 behind a PCF8574 I2C backpack in
//! 4-bit mode.  [`LogDisplay`] mirrors rows to the log for host runs and
//! tests.

use crate::app::ports::DisplayPort;

pub const DISPLAY_COLS: usize = 16;
pub const DISPLAY_ROWS: u8 = 2;

/// Host/simulation display: each row becomes a log line.
#[derive(Default)]
pub struct LogDisplay;

impl DisplayPort for LogDisplay {
    fn write_line(&mut self, row: u8, text: &str) {
        log::info!("lcd[{row}]: {text}");
    }

    fn clear(&mut self) {
        log::info!("lcd: cleared");
    }
}

#[cfg(target_os = "espidf")]
pub use esp_lcd::Lcd1602Display;

#[cfg(target_os = "espidf")]
mod esp_lcd {
    use esp_idf_hal::delay::{FreeRtos, BLOCK};
    use esp_idf_hal::i2c::I2cDriver;
    use log::warn;

    use super::{DisplayPort, DISPLAY_COLS};
    use crate::pins;

    // PCF8574 bit mapping: P0=RS, P1=RW, P2=EN, P3=backlight, P4-P7=data.
    const BACKLIGHT: u8 = 0x08;
    const ENABLE: u8 = 0x04;
    const RS_DATA: u8 = 0x01;

    const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

    pub struct Lcd1602Display {
        i2c: I2cDriver<'static>,
        addr: u8,
    }

    impl Lcd1602Display {
        pub fn new(i2c: I2cDriver<'static>) -> Self {
            let mut lcd = Self {
                i2c,
                addr: pins::LCD_I2C_ADDR,
            };
            lcd.init();
            lcd
        }

        fn init(&mut self) {
            FreeRtos::delay_ms(50);
            // Force 8-bit mode three times, then drop to 4-bit.
            self.write_nibble(0x30, false);
            FreeRtos::delay_ms(5);
            self.write_nibble(0x30, false);
            FreeRtos::delay_ms(1);
            self.write_nibble(0x30, false);
            self.write_nibble(0x20, false);

            self.command(0x28); // 4-bit, 2 lines, 5x8 font
            self.command(0x0C); // display on, cursor off
            self.command(0x06); // entry mode: increment
            self.command(0x01); // clear
            FreeRtos::delay_ms(2);
        }

        fn write_nibble(&mut self, nibble: u8, rs: bool) {
            let base = (nibble & 0xF0) | BACKLIGHT | if rs { RS_DATA } else { 0 };
            // Latch on the falling edge of EN.
            let frames = [base | ENABLE, base];
            for byte in frames {
                if self.i2c.write(self.addr, &[byte], BLOCK).is_err() {
                    warn!("lcd: i2c write failed");
                    return;
                }
            }
        }

        fn write_byte(&mut self, byte: u8, rs: bool) {
            self.write_nibble(byte & 0xF0, rs);
            self.write_nibble(byte << 4, rs);
        }

        fn command(&mut self, cmd: u8) {
            self.write_byte(cmd, false);
        }
    }

    impl DisplayPort for Lcd1602Display {
        fn write_line(&mut self, row: u8, text: &str) {
            let row = row.min(1);
            self.command(0x80 | ROW_OFFSETS[row as usize]);
            let mut written = 0;
            for ch in text.bytes().take(DISPLAY_COLS) {
                self.write_byte(ch, true);
                written += 1;
            }
            // Pad the rest of the row so stale characters never linger.
            for _ in written..DISPLAY_COLS {
                self.write_byte(b' ', true);
            }
        }

        fn clear(&mut self) {
            self.command(0x01);
            FreeRtos::delay_ms(2);
        }
    }
}
