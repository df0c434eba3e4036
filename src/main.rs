use anyhow::Context;

use epaper_mono::ssd1680::pins::Pins;
use epaper_mono::ssd1680::{Color, PanelConfig, Ssd1680};
use epaper_mono::Screen;

use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi;

const GREETING: &str = "hello epaper";
const GREETING_SCALE: u16 = 2;

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take().context("Could not take peripherals")?;
    let pins = peripherals.pins;

    log::info!(
        "Panel wiring: SCK {} MOSI {} CS {} DC {} RST {} BUSY {} PWR {}",
        Pins::SCK,
        Pins::MOSI,
        Pins::CS,
        Pins::DC,
        Pins::RST,
        Pins::BSY,
        Pins::PWR
    );

    let mut driver = spi::SpiDeviceDriver::new_single(
        peripherals.spi2,
        pins.gpio12,                    // SCK - Pins::SCK
        pins.gpio11,                    // MOSI - Pins::MOSI
        Option::<gpio::AnyIOPin>::None, // No MISO, the panel is write-only
        Some(pins.gpio45),              // CS - Pins::CS
        &spi::SpiDriverConfig::new().dma(spi::Dma::Disabled),
        &spi::SpiConfig::new().baudrate(4.MHz().into()),
    )
    .context("Could not create SPI device driver")?;

    log::info!("Enabling display power (pin {})", Pins::PWR);
    let mut power_pin = gpio::PinDriver::output(pins.gpio7).context("Power pin")?;
    power_pin.set_high().context("Failed to set power pin high")?;

    let delay = Delay::default();
    delay.delay_ms(100); // Wait for power to stabilize

    let mut ssd1680 = Ssd1680::new(
        &mut driver,
        gpio::PinDriver::input(pins.gpio48).context("Busy pin")?, // Pins::BSY
        gpio::PinDriver::output(pins.gpio46).context("DC pin")?,  // Pins::DC
        gpio::PinDriver::output(pins.gpio47).context("RST pin")?, // Pins::RST
        delay,
        PanelConfig::default(),
    )?;

    let report = ssd1680.init().context("Panel initialization failed")?;
    log::info!(
        "Init sent {} commands, {} data bytes",
        report.commands,
        report.data_bytes
    );

    let report = ssd1680.clear(Color::White)?;
    if report.busy_timeouts > 0 {
        log::warn!("Clear finished with {} busy timeouts", report.busy_timeouts);
    }

    let mut screen = Screen::init(ssd1680)?;
    screen.set_scale(GREETING_SCALE);
    screen.print(GREETING, 8, 8);
    screen.draw_rect(4, 4, 12 * 8 * u32::from(GREETING_SCALE) + 8, 24);
    screen.flush()?;
    log::info!("Displayed \"{}\"", GREETING);

    delay.delay_ms(1000);

    let mut ssd1680 = screen.into_display();
    ssd1680.sleep().context("Failed to put panel to sleep")?;

    let reset_reason = esp_idf_svc::hal::reset::ResetReason::get();
    log::info!("Reset reason: {:?}", reset_reason);

    Ok(())
}
