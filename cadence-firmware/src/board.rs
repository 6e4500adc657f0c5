//! Board bring-up for the Nucleo-L476RG
//!
//! Pin assignments:
//! - USART2: PA2 (TX), PA3 (RX) via the ST-LINK virtual COM port
//! - TIM2: PA0 (CH1, actuator 0), PA1 (CH2, actuator 1)

use defmt::*;
use embassy_stm32::gpio::OutputType;
use embassy_stm32::peripherals::TIM2;
use embassy_stm32::time::hz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::usart::Uart;

use cadence_core::config::ServoConfig;
use cadence_hal::uart::UartConfig;
use cadence_hal_stm32l4::{usart_config, ConsoleUart, ServoPwm};

/// Peripherals the engine runs on
pub struct Board {
    pub console: ConsoleUart<'static>,
    pub servos: ServoPwm<'static, TIM2>,
}

/// Clock the core at 80 MHz and bring up the console and servo timer
pub fn init(baudrate: u32, servo: ServoConfig) -> Board {
    let p = embassy_stm32::init(clock_config());
    info!("Clocks configured");

    let uart_config = UartConfig {
        baudrate,
        ..UartConfig::default()
    };
    let uart = unwrap!(Uart::new_blocking(
        p.USART2,
        p.PA3,
        p.PA2,
        usart_config(&uart_config)
    ));
    info!("Console on USART2 at {} baud", baudrate);

    let pwm = SimplePwm::new(
        p.TIM2,
        Some(PwmPin::new(p.PA0, OutputType::PushPull)),
        Some(PwmPin::new(p.PA1, OutputType::PushPull)),
        None,
        None,
        hz(servo.frame_hz()),
        CountingMode::EdgeAlignedUp,
    );
    info!("Servo frame at {} Hz", servo.frame_hz());

    Board {
        console: ConsoleUart::new(uart),
        servos: ServoPwm::new(pwm, servo),
    }
}

/// 16 MHz HSI through the PLL: 16 / 1 * 10 / 2 = 80 MHz
fn clock_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hsi = true;
    config.rcc.pll = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL10,
        divp: None,
        divq: None,
        divr: Some(PllRDiv::DIV2),
    });
    config.rcc.sys = Sysclk::PLL1_R;
    config
}
