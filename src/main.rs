//! nRF52840 alarm clock firmware.
//!
//! Wires the board peripherals into [`Firmware`] and runs it from a
//! fixed-period ticker:
//!
//!   - ST7735 TFT over SPIM3 (mipidsi), backlight on PWM0
//!   - one active-low push button, one pulse-triggered sound module
//!   - settings persisted in internal flash (sequential-storage)
//!
//! The nRF52840 has no Wi-Fi, so the network seam is an offline stub and
//! the wall clock counts up from a fixed start time.

#![no_std]
#![no_main]

use core::convert::Infallible;

use alarmclock::clock::{Monotonic, Network, WallClock};
use alarmclock::config::{BUTTON_COUNT, TFT_HEIGHT, TFT_WIDTH, TICK_PERIOD_MS};
use alarmclock::storage::SettingsStore;
use alarmclock::{
    AppConfig, Board, ButtonId, CivilDateTime, DimPolicy, Error, Firmware, GraphicsCanvas, Parts,
    Result, Style,
};
use defmt::{error, info, warn};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::peripherals::{PWM0, SPI3};
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::spim::{self, Spim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Delay, Instant, Ticker};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use embedded_hal_bus::spi::ExclusiveDevice;
use mipidsi::interface::SpiInterface;
use mipidsi::models::ST7735s;
use mipidsi::options::{Orientation, Rotation};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

type Tft = mipidsi::Display<
    SpiInterface<'static, ExclusiveDevice<Spim<'static, SPI3>, Output<'static>, Delay>, Output<'static>>,
    ST7735s,
    Output<'static>,
>;

/// Backlight LED on PWM0 channel 0.
struct Backlight(SimplePwm<'static, PWM0>);

impl ErrorType for Backlight {
    type Error = Infallible;
}

impl SetDutyCycle for Backlight {
    fn max_duty_cycle(&self) -> u16 {
        self.0.max_duty()
    }

    fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Infallible> {
        self.0.set_duty(0, duty);
        Ok(())
    }
}

/// Milliseconds since boot.
struct Uptime;

impl Monotonic for Uptime {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

/// Wall clock counting up from `start` at boot.
struct UptimeClock {
    start: CivilDateTime,
}

impl WallClock for UptimeClock {
    fn utc_now(&self) -> CivilDateTime {
        let elapsed = Instant::now().as_secs() as i64;
        self.start.checked_add_seconds(elapsed).unwrap_or(self.start)
    }
}

/// No radio for time sync on this board.
struct Offline;

impl Network for Offline {
    type Error = Error;

    fn is_connected(&self) -> bool {
        false
    }

    fn sync_time(&mut self) -> Result<()> {
        Err(Error::TimeSync)
    }
}

struct NrfBoard;

impl Board for NrfBoard {
    type Button = Input<'static>;
    type Buzzer = Output<'static>;
    type Delay = Delay;
    type Backlight = Backlight;
    type Network = Offline;
    type WallClock = UptimeClock;
    type Monotonic = Uptime;
    type Canvas = GraphicsCanvas<Tft>;
}

static DISPLAY_BUF: StaticCell<[u8; 512]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("alarmclock starting");
    if let Err(e) = run().await {
        defmt::panic!("Fatal: {}", e);
    }
}

async fn run() -> Result<()> {
    let p = embassy_nrf::init(Default::default());

    // Settings
    let mut flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let mut store = SettingsStore::new(AppConfig::default());
    let config = store.load_from_flash(&mut flash).await;

    // Display
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M8;
    let spi = Spim::new_txonly(p.SPI3, Irqs, p.P0_19, p.P0_20, spi_config);
    let cs = Output::new(p.P0_21, Level::High, OutputDrive::Standard);
    let dc = Output::new(p.P0_22, Level::Low, OutputDrive::Standard);
    let rst = Output::new(p.P0_23, Level::Low, OutputDrive::Standard);

    let spi_dev = ExclusiveDevice::new(spi, cs, Delay).map_err(|_| Error::Pin)?;
    let di = SpiInterface::new(spi_dev, dc, DISPLAY_BUF.init([0; 512]));
    let tft: Tft = mipidsi::Builder::new(ST7735s, di)
        .display_size(TFT_WIDTH, TFT_HEIGHT)
        .orientation(Orientation::new().rotate(Rotation::Deg90))
        .reset_pin(rst)
        .init(&mut Delay)
        .map_err(|_| Error::Display)?;

    // Backlight
    let mut pwm = SimplePwm::new_1ch(p.PWM0, p.P0_14);
    pwm.set_max_duty(1023);
    pwm.set_duty(0, 0);

    let parts: Parts<NrfBoard, BUTTON_COUNT> = Parts {
        buttons: [(ButtonId::PRIMARY, Input::new(p.P0_11, Pull::Up))],
        buzzer: Output::new(p.P0_13, Level::Low, OutputDrive::Standard),
        delay: Delay,
        backlight: Backlight(pwm),
        network: Offline,
        wall_clock: UptimeClock {
            start: CivilDateTime::new(2024, 1, 1, 0, 0, 0)?,
        },
        monotonic: Uptime,
        canvas: GraphicsCanvas::new(tft),
    };

    let mut firmware = Firmware::init(Style::default(), config, parts, DimPolicy::AlwaysOn)?;

    let mut ticker = Ticker::every(embassy_time::Duration::from_millis(TICK_PERIOD_MS));
    loop {
        ticker.next().await;

        if let Err(e) = firmware.tick() {
            error!("Tick failed: {}", e);
        }

        if let Some(config) = firmware.take_saved_config() {
            store.update(config);
            if store.save_to_flash(&mut flash).await.is_err() {
                warn!("Settings not saved, keeping them in RAM");
            }
        }
    }
}
