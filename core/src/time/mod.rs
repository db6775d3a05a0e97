pub mod bars;
pub mod events;
pub mod signature;
pub mod tempo;
pub mod ticks;
pub mod timeline;

pub use self::bars::BarsTime;
pub use self::signature::{Signature, SignatureChange};
pub use self::tempo::{Tempo, TempoChange};
pub use self::ticks::TicksTime;
pub use self::timeline::{Timeline, TimelineError, TimelineResult};

/// Ticks per quarter note
pub type Resolution = u32;

pub type Seconds = f64;
