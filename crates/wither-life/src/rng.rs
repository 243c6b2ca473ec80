// SPDX-License-Identifier: MIT
//
// One seed per run. The binary draws or accepts a seed, logs it, and hands
// the stream built here to the spawner first and the frame loop's color
// picks after. Replaying a logged seed replays the whole run.

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// The random stream behind a run: initial placement, then cell colors.
pub type RunRng = ChaCha12Rng;

/// The stream a run with this seed draws from.
#[must_use]
pub fn seeded(seed: u64) -> RunRng {
    RunRng::seed_from_u64(seed)
}
