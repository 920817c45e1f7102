// Hardware drivers: chip-level, board-independent.
//
// Each module only depends on embedded-hal traits; pin assignments and
// bus wiring live in board/.

pub mod audio;
pub mod display;
pub mod input;
pub mod mpu6050;
pub mod ssd1306;
pub mod tone;
