/// Number of bits in the identifier space / number of finger table entries (m).
pub const FINGER_TABLE_SIZE: u32 = chord_proto::id::ID_BITS;

/// Safety bound on lookup hops: `2 * m`, per the lookup engine's loop guard.
pub const LOOKUP_STEP_BOUND: u32 = 2 * FINGER_TABLE_SIZE;

pub const DEFAULT_PORT: u16 = 5000;
pub const LOCALHOST: &str = "127.0.0.1";

pub const MIN_SUCCESSOR_LIST_LEN: usize = 1;
pub const MAX_SUCCESSOR_LIST_LEN: usize = 32;

pub const MIN_PERIOD_MS: u64 = 1;
pub const MAX_PERIOD_MS: u64 = 60_000;

pub const LEAVE_EXIT_DELAY_MS: u64 = 100;
