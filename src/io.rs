/*
 * The I/O module for the intersection hardware.
 *
 * This module implements the engine's collaborators on top of the actual
 * pins and the timer, and is intended to be the only part of the program
 * that is device-specific. The engine hands it lamp codes and asks it for
 * sensor samples; which pin carries which bit is decided here.
 */

use embassy_stm32::gpio::{Input, Level, Output};
use embassy_time::Timer;

use crate::engine::{Delay, Port};
use crate::intersection::{DONT_WALK, SENSE_CAR_EW, SENSE_CAR_NS, SENSE_PED, WALK};

// Deal with active-high or active-low here, so that the state machine can
// just use easy to understand `true` for on logic.
fn light(led: &mut Output, on: bool) {
    led.set_level(if on { Level::High } else { Level::Low });
}

pub struct GpioPort {
    pedestrian: Input<'static>,
    car_ns: Input<'static>,
    car_ew: Input<'static>,
    // Road lamps in lamp-code bit order, MSB first: EW red, EW amber,
    // EW green, NS red, NS amber, NS green.
    road: [Output<'static>; 6],
    walk: Output<'static>,
    dont_walk: Output<'static>,
}

impl GpioPort {
    pub fn new(
        pedestrian: Input<'static>,
        car_ns: Input<'static>,
        car_ew: Input<'static>,
        road: [Output<'static>; 6],
        walk: Output<'static>,
        dont_walk: Output<'static>,
    ) -> Self {
        GpioPort {
            pedestrian,
            car_ns,
            car_ew,
            road,
            walk,
            dont_walk,
        }
    }
}

impl Port for GpioPort {
    fn read_sensors(&mut self) -> u8 {
        // Straight-line reads, composed before anything else runs, so the
        // engine sees one snapshot.
        let mut sample = 0;
        if self.pedestrian.is_high() {
            sample |= SENSE_PED;
        }
        if self.car_ns.is_high() {
            sample |= SENSE_CAR_NS;
        }
        if self.car_ew.is_high() {
            sample |= SENSE_CAR_EW;
        }
        sample
    }

    fn write_road(&mut self, code: u8) {
        for (bit, lamp) in self.road.iter_mut().enumerate() {
            light(lamp, code & (0x20 >> bit) != 0);
        }
    }

    fn write_ped(&mut self, code: u8) {
        light(&mut self.walk, code & WALK != 0);
        light(&mut self.dont_walk, code & DONT_WALK != 0);
    }
}

pub struct TimerDelay;

impl Delay for TimerDelay {
    async fn wait_ms(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}
