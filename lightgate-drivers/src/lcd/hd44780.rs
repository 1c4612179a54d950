//! HD44780 character LCD via PCF8574 I2C backpack
//!
//! Driver for the common 16x2 modules with an I2C "backpack". The expander
//! drives the LCD in 4-bit mode; every nibble is clocked with an enable
//! pulse written as two expander bytes.
//!
//! Expander wiring: P0=RS, P1=RW, P2=EN, P3=backlight, P4..P7=D4..D7.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use lightgate_display::backend::padded;
use lightgate_display::{CharDisplay, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// Default PCF8574 I2C address (A0..A2 pulled high)
pub const PCF8574_ADDR: u8 = 0x27;

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Expander control bits
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// HD44780 commands
#[allow(dead_code)]
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const ENTRY_MODE_INCREMENT: u8 = 0x06;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const DISPLAY_OFF: u8 = 0x08;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// HD44780 LCD driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: bool,
    initialized: bool,
}

impl<I2C, D> Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new driver; call [`Hd44780::init`] before drawing
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: true,
            initialized: false,
        }
    }

    /// Run the 4-bit initialization sequence
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        // Power-on wait
        self.delay.delay_ms(50).await;

        // Three times "8-bit mode" to sync, then switch to 4-bit
        self.write_nibble(0x03, 0).await?;
        self.delay.delay_us(4500).await;
        self.write_nibble(0x03, 0).await?;
        self.delay.delay_us(4500).await;
        self.write_nibble(0x03, 0).await?;
        self.delay.delay_us(150).await;
        self.write_nibble(0x02, 0).await?;

        self.command(cmd::FUNCTION_4BIT_2LINE).await?;
        self.command(cmd::DISPLAY_ON).await?;
        self.command(cmd::ENTRY_MODE_INCREMENT).await?;
        self.initialized = true;
        self.clear().await
    }

    /// Switch the backlight on or off
    pub async fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        let byte = self.backlight_bit();
        self.i2c
            .write(self.address, &[byte])
            .await
            .map_err(|_| DisplayError::Communication)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn backlight_bit(&self) -> u8 {
        if self.backlight {
            pin::BACKLIGHT
        } else {
            0
        }
    }

    async fn write_nibble(&mut self, nibble: u8, flags: u8) -> Result<(), DisplayError> {
        let byte = (nibble << 4) | flags | self.backlight_bit();
        self.i2c
            .write(self.address, &[byte | pin::EN, byte])
            .await
            .map_err(|_| DisplayError::Communication)
    }

    async fn write_byte(&mut self, value: u8, flags: u8) -> Result<(), DisplayError> {
        self.write_nibble(value >> 4, flags).await?;
        self.write_nibble(value & 0x0F, flags).await?;
        self.delay.delay_us(50).await;
        Ok(())
    }

    async fn command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.write_byte(command, 0).await
    }

    async fn data(&mut self, value: u8) -> Result<(), DisplayError> {
        self.write_byte(value, pin::RS).await
    }
}

impl<I2C, D> CharDisplay for Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    async fn clear(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.command(cmd::CLEAR).await?;
        // Clear takes 1.52 ms
        self.delay.delay_ms(2).await;
        Ok(())
    }

    async fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        let offset = *ROW_OFFSETS
            .get(row as usize)
            .ok_or(DisplayError::InvalidCoordinates)?;

        self.command(cmd::SET_DDRAM_ADDR | offset).await?;
        for byte in padded(text) {
            // Character ROM matches ASCII only
            let byte = if byte.is_ascii() && !byte.is_ascii_control() {
                byte
            } else {
                b'?'
            };
            self.data(byte).await?;
        }
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}
