/// Logical simulation step counter.
pub type Tick = u64;

/// Caller-assigned identifier used to order actions landing on the same tick.
pub type ActionId = u64;
