// MPU-6050 accelerometer / gyroscope / thermometer (I2C, board-independent)
// Register numbers and bit layouts per the InvenSense register map rev 4.2.
//
// Samples are big-endian two's-complement words. The scale factor is
// picked from the range bits read back at conversion time, so a range
// changed behind the driver's back still converts correctly.
//
// Configuration writes go through `send_cmd`, which zeroes the register
// before writing the new value.

use embedded_hal::i2c::I2c;
use log::{debug, info};

pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Standard gravity in m/s².
pub const GRAVITY_EARTH: f32 = 9.806_65;

mod reg {
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const MOT_THR: u8 = 0x1F;
    pub const MOT_DUR: u8 = 0x20;
    pub const INT_PIN_CFG: u8 = 0x37;
    pub const INT_ENABLE: u8 = 0x38;
    pub const INT_STATUS: u8 = 0x3A;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const TEMP_OUT_H: u8 = 0x41;
    pub const GYRO_XOUT_H: u8 = 0x43;
    pub const SIGNAL_PATH_RESET: u8 = 0x68;
    pub const MOT_DETECT_CTRL: u8 = 0x69;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const PWR_MGMT_2: u8 = 0x6C;
}

// PWR_MGMT_1
const PWR1_DEVICE_RESET: u8 = 0x80;
const PWR1_SLEEP: u8 = 0x40;
const PWR1_CYCLE: u8 = 0x20;
const PWR1_TEMP_DIS: u8 = 0x08;

// PWR_MGMT_2 standby bits
const PWR2_STBY_ACCEL: u8 = 0x20 | 0x10 | 0x08;
const PWR2_STBY_GYRO: u8 = 0x04 | 0x02 | 0x01;

// INT_ENABLE
const INT_MOTION: u8 = 0x40;
const INT_DATA_RDY: u8 = 0x01;

/// Range field (bits 4:3) shared by ACCEL_CONFIG and GYRO_CONFIG.
const RANGE_MASK: u8 = 0x18;

/// Latched INT pin, cleared by reading INT_STATUS.
pub const INT_CFG_LATCH: u8 = 0x20;

#[derive(Debug)]
pub enum Error<E> {
    I2c(E),
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::I2c(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "MPU-6050 bus error: {:?}", e),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccelRange {
    #[default]
    G2,
    G4,
    G8,
    G16,
}

impl AccelRange {
    pub const fn bits(self) -> u8 {
        match self {
            AccelRange::G2 => 0x00,
            AccelRange::G4 => 0x08,
            AccelRange::G8 => 0x10,
            AccelRange::G16 => 0x18,
        }
    }

    /// Decode from a raw ACCEL_CONFIG value; bits outside the range
    /// field are ignored.
    pub const fn from_bits(raw: u8) -> Self {
        match raw & RANGE_MASK {
            0x00 => AccelRange::G2,
            0x08 => AccelRange::G4,
            0x10 => AccelRange::G8,
            _ => AccelRange::G16,
        }
    }

    pub const fn lsb_per_g(self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }

    pub const fn from_g(g: u8) -> Option<Self> {
        match g {
            2 => Some(AccelRange::G2),
            4 => Some(AccelRange::G4),
            8 => Some(AccelRange::G8),
            16 => Some(AccelRange::G16),
            _ => None,
        }
    }

    pub const fn g(self) -> u8 {
        match self {
            AccelRange::G2 => 2,
            AccelRange::G4 => 4,
            AccelRange::G8 => 8,
            AccelRange::G16 => 16,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GyroRange {
    #[default]
    Dps250,
    Dps500,
    Dps1000,
    Dps2000,
}

impl GyroRange {
    pub const fn bits(self) -> u8 {
        match self {
            GyroRange::Dps250 => 0x00,
            GyroRange::Dps500 => 0x08,
            GyroRange::Dps1000 => 0x10,
            GyroRange::Dps2000 => 0x18,
        }
    }

    pub const fn from_bits(raw: u8) -> Self {
        match raw & RANGE_MASK {
            0x00 => GyroRange::Dps250,
            0x08 => GyroRange::Dps500,
            0x10 => GyroRange::Dps1000,
            _ => GyroRange::Dps2000,
        }
    }

    pub const fn lsb_per_dps(self) -> f32 {
        match self {
            GyroRange::Dps250 => 131.0,
            GyroRange::Dps500 => 65.5,
            GyroRange::Dps1000 => 32.8,
            GyroRange::Dps2000 => 16.4,
        }
    }
}

/// Wake-up rate in accelerometer-only low power (cycle) mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WakeFrequency {
    #[default]
    Hz1_25,
    Hz5,
    Hz20,
    Hz40,
}

impl WakeFrequency {
    /// LP_WAKE_CTRL field of PWR_MGMT_2.
    pub const fn bits(self) -> u8 {
        match self {
            WakeFrequency::Hz1_25 => 0x00,
            WakeFrequency::Hz5 => 0x40,
            WakeFrequency::Hz20 => 0x80,
            WakeFrequency::Hz40 => 0xC0,
        }
    }
}

/// Which sensors to wake in `open_with`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerConfig {
    pub accel: bool,
    pub gyro: bool,
    pub temp: bool,
    /// `Some` enters cycle mode at the given wake rate.
    pub cycle: Option<WakeFrequency>,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            accel: true,
            gyro: true,
            temp: true,
            cycle: None,
        }
    }
}

impl PowerConfig {
    /// (PWR_MGMT_1, PWR_MGMT_2) values for this configuration.
    pub const fn registers(&self) -> (u8, u8) {
        let mut pwr1 = 0x00;
        let mut pwr2 = 0x00;
        if !self.accel {
            pwr2 |= PWR2_STBY_ACCEL;
        }
        if !self.gyro {
            pwr2 |= PWR2_STBY_GYRO;
        }
        if !self.temp {
            pwr1 |= PWR1_TEMP_DIS;
        }
        if let Some(freq) = self.cycle {
            pwr1 |= PWR1_CYCLE;
            pwr2 |= freq.bits();
        }
        (pwr1, pwr2)
    }
}

/// Accelerometer digital high-pass filter (ACCEL_CONFIG bits 2:0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HighPassFilter {
    Reset,
    #[default]
    Hz5,
    Hz2_5,
    Hz1_25,
    Hz0_63,
    Hold,
}

impl HighPassFilter {
    pub const fn bits(self) -> u8 {
        match self {
            HighPassFilter::Reset => 0x00,
            HighPassFilter::Hz5 => 0x01,
            HighPassFilter::Hz2_5 => 0x02,
            HighPassFilter::Hz1_25 => 0x03,
            HighPassFilter::Hz0_63 => 0x04,
            HighPassFilter::Hold => 0x07,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionConfig {
    pub filter: HighPassFilter,
    /// MOT_THR, 2 mg per LSB.
    pub threshold: u8,
    /// MOT_DUR, 1 ms per LSB.
    pub duration: u8,
    /// MOT_DETECT_CTRL (decrement rates and accel on-delay).
    pub decrement: u8,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            filter: HighPassFilter::Hz5,
            threshold: 0x14,
            duration: 0x30,
            decrement: 0x15,
        }
    }
}

/// INT_STATUS snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntStatus(pub u8);

impl IntStatus {
    pub const fn motion(self) -> bool {
        self.0 & INT_MOTION != 0
    }

    pub const fn data_ready(self) -> bool {
        self.0 & INT_DATA_RDY != 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    fn scaled(raw: [i16; 3], divisor: f32) -> Self {
        Self {
            x: raw[0] as f32 / divisor,
            y: raw[1] as f32 / divisor,
            z: raw[2] as f32 / divisor,
        }
    }

    fn times(self, k: f32) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }
}

/// Result of `all_data`; groups that were not requested are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AllData {
    /// Degrees Celsius.
    pub temp: Option<f32>,
    /// m/s².
    pub accel: Option<Vector3>,
    /// Degrees per second.
    pub gyro: Option<Vector3>,
}

/// Raw count to degrees Celsius.
pub fn temperature_celsius(raw: i16) -> f32 {
    (raw as f32 + 12412.0) / 340.0
}

pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
    gravity: f32,
}

impl<I2C, E> Mpu6050<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Takes the bus and programs the accelerometer for ±2 g.
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Error<E>> {
        let mut imu = Self {
            i2c,
            address,
            gravity: GRAVITY_EARTH,
        };
        imu.set_accel_range(AccelRange::G2)?;
        info!("[IMU] MPU-6050 at {:#04x}", address);
        Ok(imu)
    }

    /// Gravity factor used by `accel` (g to m/s²).
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    // ── Power ───────────────────────────────────────────────

    /// Reset every register to its power-on default.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        self.write_byte(reg::PWR_MGMT_1, PWR1_DEVICE_RESET)
    }

    /// Wake with all sensors running.
    pub fn open(&mut self) -> Result<(), Error<E>> {
        self.send_cmd(reg::PWR_MGMT_1, 0x00)?;
        self.send_cmd(reg::PWR_MGMT_2, 0x00)?;
        info!("[IMU] open (all sensors)");
        Ok(())
    }

    pub fn open_with(&mut self, cfg: PowerConfig) -> Result<(), Error<E>> {
        let (pwr1, pwr2) = cfg.registers();
        self.send_cmd(reg::PWR_MGMT_2, pwr2)?;
        self.send_cmd(reg::PWR_MGMT_1, pwr1)?;
        info!("[IMU] open {:?}", cfg);
        Ok(())
    }

    /// Accelerometer-only low power mode.
    pub fn open_only_accel(&mut self, freq: WakeFrequency) -> Result<(), Error<E>> {
        self.open_with(PowerConfig {
            accel: true,
            gyro: false,
            temp: false,
            cycle: Some(freq),
        })
    }

    pub fn sleep(&mut self) -> Result<(), Error<E>> {
        self.send_cmd(reg::PWR_MGMT_1, PWR1_SLEEP)?;
        info!("[IMU] sleep");
        Ok(())
    }

    // ── Interrupts ──────────────────────────────────────────

    /// Route motion detection to the INT pin (active high, push-pull,
    /// auto-clearing).
    pub fn set_motion_interrupt(&mut self, cfg: MotionConfig) -> Result<(), Error<E>> {
        self.send_cmd(reg::SIGNAL_PATH_RESET, 0x07)?;
        self.send_cmd(reg::INT_PIN_CFG, 0x00)?;

        // keep the range bits, replace the high-pass filter field
        let accel_cfg = self.read_byte(reg::ACCEL_CONFIG)?;
        self.send_cmd(reg::ACCEL_CONFIG, (accel_cfg & RANGE_MASK) | cfg.filter.bits())?;

        self.send_cmd(reg::MOT_THR, cfg.threshold)?;
        self.send_cmd(reg::MOT_DUR, cfg.duration)?;
        self.send_cmd(reg::MOT_DETECT_CTRL, cfg.decrement)?;
        self.send_cmd(reg::INT_ENABLE, INT_MOTION)?;
        debug!("[IMU] motion interrupt {:?}", cfg);
        Ok(())
    }

    /// `int_cfg` is written to INT_PIN_CFG; see [`INT_CFG_LATCH`].
    pub fn set_data_ready_interrupt(&mut self, int_cfg: u8) -> Result<(), Error<E>> {
        self.send_cmd(reg::INT_PIN_CFG, int_cfg)?;
        self.send_cmd(reg::INT_ENABLE, INT_DATA_RDY)
    }

    pub fn disable_interrupts(&mut self) -> Result<(), Error<E>> {
        self.send_cmd(reg::INT_ENABLE, 0x00)
    }

    /// Reading clears latched interrupt flags.
    pub fn interrupt_status(&mut self) -> Result<IntStatus, Error<E>> {
        Ok(IntStatus(self.read_byte(reg::INT_STATUS)?))
    }

    // ── Ranges ──────────────────────────────────────────────

    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<(), Error<E>> {
        self.send_cmd(reg::ACCEL_CONFIG, range.bits())
    }

    pub fn accel_range(&mut self) -> Result<AccelRange, Error<E>> {
        Ok(AccelRange::from_bits(self.read_byte(reg::ACCEL_CONFIG)?))
    }

    pub fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), Error<E>> {
        self.send_cmd(reg::GYRO_CONFIG, range.bits())
    }

    pub fn gyro_range(&mut self) -> Result<GyroRange, Error<E>> {
        Ok(GyroRange::from_bits(self.read_byte(reg::GYRO_CONFIG)?))
    }

    // ── Samples ─────────────────────────────────────────────

    pub fn temperature(&mut self) -> Result<f32, Error<E>> {
        Ok(temperature_celsius(self.read_word(reg::TEMP_OUT_H)?))
    }

    pub fn accel_raw(&mut self) -> Result<[i16; 3], Error<E>> {
        self.read_xyz(reg::ACCEL_XOUT_H)
    }

    pub fn gyro_raw(&mut self) -> Result<[i16; 3], Error<E>> {
        self.read_xyz(reg::GYRO_XOUT_H)
    }

    /// Acceleration in g.
    pub fn accel_g(&mut self) -> Result<Vector3, Error<E>> {
        let raw = self.accel_raw()?;
        let range = self.accel_range()?;
        Ok(Vector3::scaled(raw, range.lsb_per_g()))
    }

    /// Acceleration in m/s².
    pub fn accel(&mut self) -> Result<Vector3, Error<E>> {
        Ok(self.accel_g()?.times(self.gravity))
    }

    /// Angular rate in degrees per second.
    pub fn gyro(&mut self) -> Result<Vector3, Error<E>> {
        let raw = self.gyro_raw()?;
        let range = self.gyro_range()?;
        Ok(Vector3::scaled(raw, range.lsb_per_dps()))
    }

    pub fn all_data(&mut self, temp: bool, accel: bool, gyro: bool) -> Result<AllData, Error<E>> {
        let mut data = AllData::default();
        if temp {
            data.temp = Some(self.temperature()?);
        }
        if accel {
            data.accel = Some(self.accel()?);
        }
        if gyro {
            data.gyro = Some(self.gyro()?);
        }
        Ok(data)
    }

    // ── Register access ─────────────────────────────────────

    fn send_cmd(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        self.write_byte(reg, 0x00)?;
        self.write_byte(reg, value)
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
        self.i2c.write(self.address, &[reg, value])?;
        Ok(())
    }

    fn read_byte(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn read_word(&mut self, reg: u8) -> Result<i16, Error<E>> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    fn read_xyz(&mut self, reg: u8) -> Result<[i16; 3], Error<E>> {
        let mut buf = [0u8; 6];
        self.i2c.write_read(self.address, &[reg], &mut buf)?;
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockI2c;

    fn imu() -> Mpu6050<MockI2c> {
        Mpu6050::new(MockI2c::new(DEFAULT_ADDRESS), DEFAULT_ADDRESS).unwrap()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn new_programs_two_g_with_clear_first() {
        let imu = imu();
        let bus = imu.release();
        assert_eq!(bus.writes, [(reg::ACCEL_CONFIG, 0x00), (reg::ACCEL_CONFIG, 0x00)]);
    }

    #[test]
    fn wrong_address_is_a_bus_error() {
        let res = Mpu6050::new(MockI2c::new(DEFAULT_ADDRESS), 0x69);
        assert!(matches!(res, Err(Error::I2c(_))));
    }

    #[test]
    fn words_are_twos_complement() {
        let mut imu = imu();
        imu.i2c.regs[reg::TEMP_OUT_H as usize] = 0xFF;
        imu.i2c.regs[reg::TEMP_OUT_H as usize + 1] = 0xFE;
        assert_eq!(imu.read_word(reg::TEMP_OUT_H).unwrap(), -2);

        imu.i2c.regs[reg::TEMP_OUT_H as usize] = 0x80;
        imu.i2c.regs[reg::TEMP_OUT_H as usize + 1] = 0x00;
        assert_eq!(imu.read_word(reg::TEMP_OUT_H).unwrap(), i16::MIN);

        imu.i2c.regs[reg::TEMP_OUT_H as usize] = 0x7F;
        imu.i2c.regs[reg::TEMP_OUT_H as usize + 1] = 0xFF;
        assert_eq!(imu.read_word(reg::TEMP_OUT_H).unwrap(), i16::MAX);
    }

    #[test]
    fn temperature_offset() {
        let mut imu = imu();
        imu.i2c.set_word(reg::TEMP_OUT_H, -12412);
        assert!(approx(imu.temperature().unwrap(), 0.0));
        imu.i2c.set_word(reg::TEMP_OUT_H, 340);
        assert!(approx(imu.temperature().unwrap(), 37.505882));
    }

    #[test]
    fn accel_scale_follows_range_register() {
        let mut imu = imu();
        imu.i2c.set_word(reg::ACCEL_XOUT_H, 16384);
        imu.i2c.set_word(reg::ACCEL_XOUT_H + 2, -8192);
        imu.i2c.set_word(reg::ACCEL_XOUT_H + 4, 0);

        let g = imu.accel_g().unwrap();
        assert!(approx(g.x, 1.0) && approx(g.y, -0.5) && approx(g.z, 0.0));

        imu.set_accel_range(AccelRange::G16).unwrap();
        let g = imu.accel_g().unwrap();
        assert!(approx(g.x, 8.0) && approx(g.y, -4.0));

        // filter bits in the same register do not disturb the range
        imu.i2c.regs[reg::ACCEL_CONFIG as usize] = AccelRange::G4.bits() | 0x07;
        assert_eq!(imu.accel_range().unwrap(), AccelRange::G4);
    }

    #[test]
    fn accel_in_meters_uses_gravity_factor() {
        let mut imu = imu().with_gravity(10.0);
        imu.i2c.set_word(reg::ACCEL_XOUT_H + 4, 16384);
        let a = imu.accel().unwrap();
        assert!(approx(a.z, 10.0));
    }

    #[test]
    fn gyro_scale() {
        let mut imu = imu();
        imu.i2c.set_word(reg::GYRO_XOUT_H, 131);
        imu.i2c.set_word(reg::GYRO_XOUT_H + 2, -262);
        assert!(approx(imu.gyro().unwrap().x, 1.0));
        assert!(approx(imu.gyro().unwrap().y, -2.0));

        imu.set_gyro_range(GyroRange::Dps2000).unwrap();
        imu.i2c.set_word(reg::GYRO_XOUT_H, 164);
        assert!(approx(imu.gyro().unwrap().x, 10.0));
        assert_eq!(imu.gyro_range().unwrap(), GyroRange::Dps2000);
    }

    #[test]
    fn all_data_reads_only_requested_groups() {
        let mut imu = imu();
        let d = imu.all_data(true, false, true).unwrap();
        assert!(d.temp.is_some());
        assert!(d.accel.is_none());
        assert!(d.gyro.is_some());
    }

    #[test]
    fn power_config_bits() {
        assert_eq!(PowerConfig::default().registers(), (0x00, 0x00));
        let accel_only = PowerConfig {
            accel: true,
            gyro: false,
            temp: false,
            cycle: Some(WakeFrequency::Hz20),
        };
        assert_eq!(accel_only.registers(), (0x28, 0x87));
        let no_accel = PowerConfig {
            accel: false,
            ..PowerConfig::default()
        };
        assert_eq!(no_accel.registers(), (0x00, 0x38));
    }

    #[test]
    fn open_with_writes_pwr2_before_pwr1() {
        let mut imu = imu();
        imu.i2c.writes.clear();
        imu.open_only_accel(WakeFrequency::Hz5).unwrap();
        assert_eq!(
            imu.i2c.writes,
            [
                (reg::PWR_MGMT_2, 0x00),
                (reg::PWR_MGMT_2, 0x47),
                (reg::PWR_MGMT_1, 0x00),
                (reg::PWR_MGMT_1, 0x28),
            ]
        );
    }

    #[test]
    fn reset_is_a_single_write() {
        let mut imu = imu();
        imu.i2c.writes.clear();
        imu.reset().unwrap();
        assert_eq!(imu.i2c.writes, [(reg::PWR_MGMT_1, 0x80)]);
    }

    #[test]
    fn motion_interrupt_sequence_keeps_range() {
        let mut imu = imu();
        imu.set_accel_range(AccelRange::G8).unwrap();
        imu.i2c.writes.clear();
        imu.set_motion_interrupt(MotionConfig::default()).unwrap();

        let finals: alloc::vec::Vec<(u8, u8)> =
            imu.i2c.writes.iter().copied().filter(|&(_, v)| v != 0).collect();
        assert_eq!(
            finals,
            [
                (reg::SIGNAL_PATH_RESET, 0x07),
                (reg::ACCEL_CONFIG, 0x11),
                (reg::MOT_THR, 0x14),
                (reg::MOT_DUR, 0x30),
                (reg::MOT_DETECT_CTRL, 0x15),
                (reg::INT_ENABLE, 0x40),
            ]
        );
        assert_eq!(imu.accel_range().unwrap(), AccelRange::G8);
    }

    #[test]
    fn interrupt_status_flags() {
        let mut imu = imu();
        imu.set_data_ready_interrupt(INT_CFG_LATCH).unwrap();
        assert_eq!(imu.i2c.regs[reg::INT_PIN_CFG as usize], 0x20);
        assert_eq!(imu.i2c.regs[reg::INT_ENABLE as usize], 0x01);

        imu.i2c.regs[reg::INT_STATUS as usize] = 0x41;
        let st = imu.interrupt_status().unwrap();
        assert!(st.motion() && st.data_ready());

        imu.disable_interrupts().unwrap();
        assert_eq!(imu.i2c.regs[reg::INT_ENABLE as usize], 0x00);
    }

    #[test]
    fn sleep_and_open() {
        let mut imu = imu();
        imu.sleep().unwrap();
        assert_eq!(imu.i2c.regs[reg::PWR_MGMT_1 as usize], 0x40);
        imu.open().unwrap();
        assert_eq!(imu.i2c.regs[reg::PWR_MGMT_1 as usize], 0x00);
        assert_eq!(imu.i2c.regs[reg::PWR_MGMT_2 as usize], 0x00);
    }

    #[test]
    fn range_helpers() {
        assert_eq!(AccelRange::from_g(8), Some(AccelRange::G8));
        assert_eq!(AccelRange::from_g(3), None);
        assert_eq!(AccelRange::G16.g(), 16);
        assert_eq!(GyroRange::from_bits(0xFF), GyroRange::Dps2000);
    }
}
