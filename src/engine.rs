/*
 * The cycle engine that drives the intersection.
 *
 * The engine is deliberately ignorant of pins and timers. It talks to the
 * outside world through two small collaborators: a `Port` for the lamp
 * codes and the sensor sample, and a `Delay` for the dwell. That keeps the
 * whole control loop runnable, and testable, without the board.
 */

use crate::intersection::Intersection;

pub trait Port {
    // Low 3 bits: bit 2 pedestrian request, bit 1 NS car, bit 0 EW car.
    // Must be a single consistent snapshot, not a bit-by-bit composite.
    fn read_sensors(&mut self) -> u8;

    fn write_road(&mut self, code: u8);
    fn write_ped(&mut self, code: u8);
}

pub trait Delay {
    async fn wait_ms(&mut self, ms: u64);
}

pub struct Engine<P, D> {
    intersection: Intersection,
    port: P,
    delay: D,
}

impl<P: Port, D: Delay> Engine<P, D> {
    pub fn new(port: P, delay: D) -> Self {
        Engine {
            intersection: Intersection::new(),
            port,
            delay,
        }
    }

    /*
     * One full cycle: assert the current phase's lamps, hold them for the
     * dwell, then sample the sensors and move on. The dwell is the only
     * point where this task yields.
     */
    async fn cycle(&mut self) {
        self.port.write_road(self.intersection.road_code());
        self.port.write_ped(self.intersection.ped_code());
        self.delay.wait_ms(self.intersection.dwell_ms()).await;

        let sample = self.port.read_sensors();
        self.intersection.to_next_phase(sample);
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.cycle().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::{DONT_WALK, Phase, SENSE_CAR_NS, SENSE_PED, WALK};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    enum Event {
        Road(u8),
        Ped(u8),
        Wait(u64),
        Sample(u8),
    }

    // Both collaborators append to one shared log, so tests can check the
    // order of operations within a cycle, not just their effects.
    type Log = Rc<RefCell<Vec<Event>>>;

    struct ScriptedPort {
        log: Log,
        samples: Vec<u8>,
    }

    impl Port for ScriptedPort {
        fn read_sensors(&mut self) -> u8 {
            let sample = self.samples.remove(0);
            self.log.borrow_mut().push(Event::Sample(sample));
            sample
        }

        fn write_road(&mut self, code: u8) {
            self.log.borrow_mut().push(Event::Road(code));
        }

        fn write_ped(&mut self, code: u8) {
            self.log.borrow_mut().push(Event::Ped(code));
        }
    }

    struct InstantDelay {
        log: Log,
    }

    impl Delay for InstantDelay {
        async fn wait_ms(&mut self, ms: u64) {
            self.log.borrow_mut().push(Event::Wait(ms));
        }
    }

    fn engine(samples: Vec<u8>) -> (Engine<ScriptedPort, InstantDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let port = ScriptedPort {
            log: log.clone(),
            samples,
        };
        let delay = InstantDelay { log: log.clone() };
        (Engine::new(port, delay), log)
    }

    #[tokio::test]
    async fn lamps_are_asserted_before_the_dwell_begins() {
        let (mut engine, log) = engine(vec![0]);
        engine.cycle().await;

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Road(0x0C),
                Event::Ped(DONT_WALK),
                Event::Wait(600),
                Event::Sample(0),
            ]
        );
    }

    #[tokio::test]
    async fn the_sample_read_after_the_dwell_picks_the_next_phase() {
        let (mut engine, _log) = engine(vec![SENSE_CAR_NS]);
        engine.cycle().await;
        assert_eq!(engine.intersection.phase(), Phase::WaitWest);
    }

    #[tokio::test]
    async fn a_pedestrian_request_walks_the_full_crossing_sequence() {
        // NS car, then a pedestrian: yellow, then walk, then the flash
        // sequence runs out regardless of the mid-flash samples, and the
        // quiet intersection falls back to GoWest.
        let samples = vec![SENSE_CAR_NS, SENSE_PED, SENSE_CAR_NS, 7, 0, 3, 0];
        let (mut engine, log) = engine(samples);

        let expected = [
            Phase::WaitWest,
            Phase::GoPed,
            Phase::FlashPed1,
            Phase::FlashPed2,
            Phase::FlashPed3,
            Phase::FlashPed4,
            Phase::GoWest,
        ];
        for phase in expected {
            engine.cycle().await;
            assert_eq!(engine.intersection.phase(), phase);
        }

        // Seven cycles of 600 ms each, and exactly one WALK phase shown.
        let log = log.borrow();
        let dwelled: u64 = log
            .iter()
            .map(|event| match event {
                Event::Wait(ms) => *ms,
                _ => 0,
            })
            .sum();
        assert_eq!(dwelled, 7 * 600);
        let walks = log
            .iter()
            .filter(|event| matches!(event, Event::Ped(code) if *code == WALK))
            .count();
        assert_eq!(walks, 1);
    }
}
