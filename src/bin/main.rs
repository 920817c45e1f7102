// spark: bring-up and demo tool for the RPi-Spark pHAT
//
// Each subcommand exercises one part of the board; with no subcommand
// the OLED shows a spirit level driven by the IMU until Act A is pressed.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    text::Text,
};
use tracing::{Level, info};
use tracing_subscriber::util::SubscriberInitExt;

use spark_phat::board::{Board, Button, Oled};
use spark_phat::config::SparkConfig;
use spark_phat::drivers::input::Event;
use spark_phat::drivers::ssd1306::ScrollConfig;
use spark_phat::drivers::tone::{self, Tone};
use spark_phat::screen::Screen;

#[derive(Parser)]
#[command(name = "spark")]
#[command(version, about = "RPi-Spark pHAT bring-up tool", long_about = None)]
struct Cli {
    /// key=value board config; defaults match the pHAT wiring
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print temperature, acceleration and rotation rate
    Imu {
        #[arg(short, long, default_value_t = 10)]
        samples: u32,

        #[arg(long, default_value_t = 200)]
        interval_ms: u64,
    },

    /// Draw a test card on the OLED
    Oled {
        /// Scroll the card diagonally
        #[arg(long)]
        scroll: bool,

        #[arg(long)]
        contrast: Option<u8>,

        /// Seconds to leave it up
        #[arg(long, default_value_t = 5)]
        hold: u64,
    },

    /// Play one octave on the tone pin
    Tone {
        #[arg(long, value_enum, default_value_t = ScaleArg::Mid)]
        scale: ScaleArg,

        #[arg(long, value_enum, default_value_t = KeyArg::C)]
        key: KeyArg,
    },

    /// Route PWM audio to the headphone jack, or back to GPIO
    Audio {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Print key events
    Keys {
        /// Use edge interrupts instead of polling
        #[arg(long)]
        watch: bool,

        #[arg(long, default_value_t = 30)]
        seconds: u64,
    },

    /// Spirit level on the OLED; Act A quits
    Level,

    /// Print the effective config
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScaleArg {
    Bass,
    Mid,
    Treble,
}

#[derive(Clone, Copy, ValueEnum)]
enum KeyArg {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .finish()
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SparkConfig> {
    let Some(path) = path else {
        return Ok(SparkConfig::defaults());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    Ok(SparkConfig::parse(&text))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = load_config(cli.config.as_ref())?;
    let command = cli.command.unwrap_or(Commands::Level);
    if let Commands::Config = command {
        print!("{}", config.to_text());
        return Ok(());
    }

    let mut board = Board::init(&config).context("Board bring-up failed")?;
    match command {
        Commands::Imu {
            samples,
            interval_ms,
        } => imu(&mut board, samples, Duration::from_millis(interval_ms)),
        Commands::Oled {
            scroll,
            contrast,
            hold,
        } => oled(&mut board, scroll, contrast, Duration::from_secs(hold)),
        Commands::Tone { scale, key } => play_octave(&board, scale, key),
        Commands::Audio { state } => {
            let mut audio = board.audio_device()?;
            match state {
                Switch::On => audio.on()?,
                Switch::Off => audio.off()?,
            }
            Ok(())
        }
        Commands::Keys { watch, seconds } => {
            keys(&mut board, watch, Duration::from_secs(seconds))
        }
        Commands::Level => level(&mut board),
        Commands::Config => Ok(()),
    }
}

fn imu(board: &mut Board, samples: u32, interval: Duration) -> Result<()> {
    board.imu.open()?;
    info!("accel range {:?}, gyro range {:?}", board.imu.accel_range()?, board.imu.gyro_range()?);
    for _ in 0..samples {
        let d = board.imu.all_data(true, true, true)?;
        if let (Some(t), Some(a), Some(g)) = (d.temp, d.accel, d.gyro) {
            println!(
                "{:6.2} C  accel {:7.3} {:7.3} {:7.3} m/s2  gyro {:8.2} {:8.2} {:8.2} dps",
                t, a.x, a.y, a.z, g.x, g.y, g.z
            );
        }
        thread::sleep(interval);
    }
    board.imu.sleep()?;
    Ok(())
}

fn oled(board: &mut Board, scroll: bool, contrast: Option<u8>, hold: Duration) -> Result<()> {
    let rotation = board.config().rotation;
    board.oled.on()?;
    if let Some(c) = contrast {
        board.oled.set_contrast(c)?;
    }

    let mut screen: Screen<&mut Oled, BinaryColor> = Screen::new(&mut board.oled, None, rotation);
    let size = screen.display_size();
    let canvas = screen.canvas_mut();
    let text = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    Rectangle::new(Point::zero(), size)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(canvas)?;
    Line::new(Point::zero(), Point::new(size.width as i32 - 1, size.height as i32 - 1))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(canvas)?;
    Text::new("RPi-Spark", Point::new(4, 12), text).draw(canvas)?;
    Text::new("spark-phat", Point::new(4, 24), text).draw(canvas)?;
    screen.refresh()?;

    if scroll {
        screen.display_mut().scroll_with(&ScrollConfig {
            h_end: 7,
            v_offset: 1,
            v_end: 64,
            interval: 0x07,
            ..ScrollConfig::default()
        })?;
    }
    thread::sleep(hold);

    let oled = screen.release();
    oled.scroll_off()?;
    oled.off()?;
    Ok(())
}

fn play_octave(board: &Board, scale: ScaleArg, key: KeyArg) -> Result<()> {
    let scale = match scale {
        ScaleArg::Bass => tone::Scale::Bass,
        ScaleArg::Mid => tone::Scale::Mid,
        ScaleArg::Treble => tone::Scale::Treble,
    };
    let key = match key {
        KeyArg::A => tone::Key::A,
        KeyArg::B => tone::Key::B,
        KeyArg::C => tone::Key::C,
        KeyArg::D => tone::Key::D,
        KeyArg::E => tone::Key::E,
        KeyArg::F => tone::Key::F,
        KeyArg::G => tone::Key::G,
    };

    let tones: Vec<Tone> = (0..7)
        .filter_map(|degree| tone::note(scale, key, degree))
        .map(|hz| Tone::new(hz as u32, 1, 180, 40))
        .collect();
    let mut player = board.tone_player()?;
    player.play_tone_list(&tones)?;
    Ok(())
}

fn keys(board: &mut Board, watch: bool, run_for: Duration) -> Result<()> {
    if watch {
        for button in Button::ALL {
            board.watch_key(button, |b, pressed| {
                println!("{} {}", b, if pressed { "down" } else { "up" })
            })?;
        }
        thread::sleep(run_for);
        board.unwatch_keys(&Button::ALL);
        return Ok(());
    }

    let start = Instant::now();
    while start.elapsed() < run_for {
        if let Some(event) = board.keys.poll(start.elapsed().as_millis() as u64) {
            println!("{:?}", event);
        }
        thread::sleep(Duration::from_millis(5));
    }
    Ok(())
}

fn level(board: &mut Board) -> Result<()> {
    const RING: u32 = 40;
    const BUBBLE: u32 = 12;

    let rotation = board.config().rotation;
    board.imu.open()?;
    board.oled.on()?;

    let mut screen: Screen<&mut Oled, BinaryColor> = Screen::new(&mut board.oled, None, rotation);
    let size = screen.display_size();
    let center = Point::new(size.width as i32 / 2, size.height as i32 / 2);
    let reach = (RING - BUBBLE) as f32 / 2.0;
    let start = Instant::now();

    info!("level running, Act A to quit");
    loop {
        if let Some(Event::Press(Button::ActA)) = board.keys.poll(start.elapsed().as_millis() as u64)
        {
            break;
        }

        // 1g of tilt puts the bubble on the ring
        let g = board.imu.accel_g()?;
        let offset = Point::new(
            (-g.x.clamp(-1.0, 1.0) * reach) as i32,
            (g.y.clamp(-1.0, 1.0) * reach) as i32,
        );

        screen.clear_canvas(BinaryColor::Off);
        let canvas = screen.canvas_mut();
        Circle::with_center(center, RING)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(canvas)?;
        Circle::with_center(center + offset, BUBBLE)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(canvas)?;
        screen.refresh()?;

        thread::sleep(Duration::from_millis(40));
    }

    screen.clear();
    screen.refresh()?;
    drop(screen);
    board.oled.off()?;
    board.imu.sleep()?;
    Ok(())
}
