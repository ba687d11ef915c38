/*
 * The Moore machine for the intersection and its pedestrian crossing.
 *
 * All of the control policy lives in one constant table: each phase carries
 * the lamp codes to show, how long to hold them, and the successor phase for
 * every possible 3-bit sensor sample. Outputs depend on the current phase
 * only; the sample picks nothing but the next phase.
 */

use enum_ordinalize::Ordinalize;

// Road lamp code, MSB to LSB across the six lamps.
pub const EW_RED: u8 = 0x20;
pub const EW_YELLOW: u8 = 0x10;
pub const EW_GREEN: u8 = 0x08;
pub const NS_RED: u8 = 0x04;
pub const NS_YELLOW: u8 = 0x02;
pub const NS_GREEN: u8 = 0x01;

// Pedestrian lamp codes. DARK is the off-beat of the flash sequence.
pub const WALK: u8 = 0x08;
pub const DONT_WALK: u8 = 0x02;
pub const DARK: u8 = 0x00;

// Sensor sample bits.
pub const SENSE_PED: u8 = 0b100;
pub const SENSE_CAR_NS: u8 = 0b010;
pub const SENSE_CAR_EW: u8 = 0b001;

const DWELL_MS: u64 = 600;

#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Phase {
    GoWest,
    WaitWest,
    GoSouth,
    WaitSouth,
    GoPed,
    FlashPed1,
    FlashPed2,
    FlashPed3,
    FlashPed4,
}

struct Row {
    road: u8,
    ped: u8,
    dwell_ms: u64,
    next: [Phase; 8],
}

use self::Phase::*;

/*
 * One row per phase, indexed by `Phase::ordinal()`. The `next` column is
 * indexed by the sensor sample (bit 2 pedestrian, bit 1 NS car, bit 0 EW
 * car). Several entries look asymmetric on purpose, e.g. a lone pedestrian
 * re-request does not interrupt GoPed, and GoSouth ignores sample 6; these
 * are deliberate corner cases of the policy, not simplifiable to a uniform
 * priority rule.
 */
static TABLE: [Row; Phase::VARIANT_COUNT] = [
    Row {
        road: EW_GREEN | NS_RED,
        ped: DONT_WALK,
        dwell_ms: DWELL_MS,
        next: [GoWest, GoWest, WaitWest, WaitWest, WaitWest, WaitWest, WaitWest, WaitWest],
    },
    Row {
        road: EW_YELLOW | NS_RED,
        ped: DONT_WALK,
        dwell_ms: DWELL_MS,
        next: [GoSouth, GoWest, GoSouth, GoSouth, GoPed, GoPed, GoSouth, GoSouth],
    },
    Row {
        road: EW_RED | NS_GREEN,
        ped: DONT_WALK,
        dwell_ms: DWELL_MS,
        next: [GoSouth, WaitSouth, GoSouth, WaitSouth, WaitSouth, WaitSouth, GoSouth, WaitSouth],
    },
    Row {
        road: EW_RED | NS_YELLOW,
        ped: DONT_WALK,
        dwell_ms: DWELL_MS,
        next: [GoWest, GoWest, GoSouth, GoWest, GoPed, GoWest, GoPed, GoPed],
    },
    Row {
        road: EW_RED | NS_RED,
        ped: WALK,
        dwell_ms: DWELL_MS,
        next: [GoPed, FlashPed1, FlashPed1, FlashPed1, GoPed, FlashPed1, FlashPed1, FlashPed1],
    },
    // The four flash phases run to completion no matter what the sensors
    // say, giving the crossing a deterministic 4 x 600 ms warning flash.
    Row {
        road: EW_RED | NS_RED,
        ped: DONT_WALK,
        dwell_ms: DWELL_MS,
        next: [FlashPed2; 8],
    },
    Row {
        road: EW_RED | NS_RED,
        ped: DARK,
        dwell_ms: DWELL_MS,
        next: [FlashPed3; 8],
    },
    Row {
        road: EW_RED | NS_RED,
        ped: DONT_WALK,
        dwell_ms: DWELL_MS,
        next: [FlashPed4; 8],
    },
    Row {
        road: EW_RED | NS_RED,
        ped: DARK,
        dwell_ms: DWELL_MS,
        next: [GoWest, GoWest, GoSouth, GoWest, GoPed, GoWest, GoSouth, GoWest],
    },
];

#[derive(Debug)]
pub struct Intersection {
    phase: Phase,
}

impl Intersection {
    pub fn new() -> Self {
        Intersection { phase: GoWest }
    }

    fn row(&self) -> &'static Row {
        &TABLE[self.phase.ordinal()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn road_code(&self) -> u8 {
        self.row().road
    }

    pub fn ped_code(&self) -> u8 {
        self.row().ped
    }

    pub fn dwell_ms(&self) -> u64 {
        self.row().dwell_ms
    }

    /*
     * Determine the next phase for a sensor sample, without changing the
     * phase that we are in. Only the low 3 bits of the sample carry
     * meaning, so anything above them is masked off before indexing.
     */
    fn next_phase(&self, sample: u8) -> Phase {
        self.row().next[(sample & 0b111) as usize]
    }

    pub fn to_next_phase(&mut self, sample: u8) {
        self.phase = self.next_phase(sample);
    }
}
