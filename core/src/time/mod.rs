pub mod bars;
pub mod signature;
pub mod tempo;

pub use self::bars::BarsTime;
pub use self::signature::Signature;
pub use self::tempo::Tempo;

/// Position in beats; a note's attack and duration are measured with it.
pub type Beat = i32;
