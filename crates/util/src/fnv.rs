use std::hash::Hasher;

/// FNV-1a, 64-bit.
///
/// Unlike `DefaultHasher`, the output is fixed across builds, platforms, and
/// toolchain versions, which is what persisted cache keys and replay seeds need.
#[derive(Debug, Clone, Copy)]
pub struct Fnv64(u64);

impl Fnv64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;
    pub fn new() -> Self {
        Self(Self::OFFSET_BASIS)
    }
}

impl Default for Fnv64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv64 {
    fn finish(&self) -> u64 {
        self.0
    }
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 ^= u64::from(byte);
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }
}

/// FNV-1a, 32-bit. Source of every decision seed.
#[derive(Debug, Clone, Copy)]
pub struct Fnv32(u32);

impl Fnv32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    pub fn new() -> Self {
        Self(Self::OFFSET_BASIS)
    }
    pub fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 ^= u32::from(byte);
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }
    pub fn finish(&self) -> u32 {
        self.0
    }
}

impl Default for Fnv32 {
    fn default() -> Self {
        Self::new()
    }
}

/// 32-bit stable hash of a string.
pub fn stable_hash(s: &str) -> u32 {
    let mut hasher = Fnv32::new();
    hasher.write(s.as_bytes());
    hasher.finish()
}

/// 64-bit stable hash of a string, rendered as 16 lowercase hex digits.
pub fn stable_hex(s: &str) -> String {
    let mut hasher = Fnv64::new();
    hasher.write(s.as_bytes());
    format!("{:016x}", hasher.finish())
}
