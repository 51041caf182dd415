//! Mock filesystem and clock for testing collectors without real `/proc`.

mod clock;
mod filesystem;
mod scenarios;

pub use clock::MockClock;
pub use filesystem::MockFs;
pub use scenarios::SwapFixture;
