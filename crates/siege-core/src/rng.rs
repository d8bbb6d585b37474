//! Deterministic PRNG for team and seat assignment.
//!
//! This is `xoshiro256**` seeded via SplitMix64. The session owns one of
//! these, so tests can seed it and assert exact shuffles.

#[derive(Clone, Copy, Debug)]
pub struct SessionRng {
    state: [u64; 4],
}

impl SessionRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut sm = SplitMix64 { state: seed };
        Self {
            state: [sm.next(), sm.next(), sm.next(), sm.next()],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        // xoshiro256**
        let result = self.state[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);

        let t = self.state[1] << 17;

        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];

        self.state[2] ^= t;

        self.state[3] = self.state[3].rotate_left(45);

        result
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "empty range");

        let span = len as u64;
        let threshold = u64::MAX - u64::MAX % span;
        loop {
            let x = self.next_u64();
            if x < threshold {
                return (x % span) as usize;
            }
        }
    }

    /// Uniform value in `0..bound` (join-time jitter).
    pub fn gen_below_u64(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0, "empty range");

        let threshold = u64::MAX - u64::MAX % bound;
        loop {
            let x = self.next_u64();
            if x < threshold {
                return x % bound;
            }
        }
    }

    /// Uniform Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_index(i + 1);
            slice.swap(i, j);
        }
    }
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}
