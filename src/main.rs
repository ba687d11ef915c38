#![cfg_attr(target_arch = "arm", no_std)]
#![cfg_attr(target_arch = "arm", no_main)]

mod engine;
mod intersection;
#[cfg(target_arch = "arm")]
mod io;

#[cfg(target_arch = "arm")]
mod board {
    use embassy_executor::Spawner;
    use embassy_stm32::gpio::{Input, Level, Output, Pin, Pull, Speed};
    use embassy_stm32::usart::{Config, Uart};
    use embassy_stm32::{bind_interrupts, peripherals, usart};
    use panic_halt as _;

    use crate::engine::Engine;
    use crate::io::{GpioPort, TimerDelay};

    #[embassy_executor::main]
    async fn main(_spawner: Spawner) {
        let peripherals = embassy_stm32::init(Default::default());

        bind_interrupts!(struct Irqs {
            USART1 => usart::InterruptHandler<peripherals::USART1>;
        });
        let mut usart = Uart::new(
            peripherals.USART1,
            peripherals.PA10,
            peripherals.PA9,
            Irqs,
            peripherals.DMA1_CH4,
            peripherals.DMA1_CH5,
            Config::default(), // 115200 baud
        )
        .unwrap();
        usart.write(b"crosswalk controller up\n").await.unwrap();

        // Detectors read high while something is present.
        let port = GpioPort::new(
            Input::new(peripherals.PE2, Pull::Down), // pedestrian
            Input::new(peripherals.PE1, Pull::Down), // north/south car
            Input::new(peripherals.PE0, Pull::Down), // east/west car
            [
                Output::new(peripherals.PD5.degrade(), Level::Low, Speed::Low), // EW red
                Output::new(peripherals.PD4.degrade(), Level::Low, Speed::Low), // EW amber
                Output::new(peripherals.PD3.degrade(), Level::Low, Speed::Low), // EW green
                Output::new(peripherals.PD2.degrade(), Level::Low, Speed::Low), // NS red
                Output::new(peripherals.PD1.degrade(), Level::Low, Speed::Low), // NS amber
                Output::new(peripherals.PD0.degrade(), Level::Low, Speed::Low), // NS green
            ],
            Output::new(peripherals.PC6, Level::Low, Speed::Low), // walk
            Output::new(peripherals.PC7, Level::Low, Speed::Low), // don't walk
        );

        Engine::new(port, TimerDelay).run().await
    }
}

// The firmware proper only exists for the board; this keeps `cargo test`
// and host builds of the state machine working.
#[cfg(not(target_arch = "arm"))]
fn main() {
    println!("This firmware is intended for target_arch = \"arm\".");
}
