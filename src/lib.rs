// Drivers for the RPi-Spark pHAT (MPU-6050, SSD1306 OLED, keypad, tone, audio)
//
// drivers/ and screen/ only speak embedded-hal, so they build no_std and
// test on the host. board/ binds them to a Raspberry Pi through rppal.

#![cfg_attr(not(any(test, feature = "rpi")), no_std)]

extern crate alloc;

pub mod board;
pub mod config;
pub mod drivers;
pub mod screen;

#[cfg(test)]
mod testing;
