pub mod clock;
pub mod device;
pub mod dispatcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use device::{LineReader, Read, ScriptedSource, TagSource};
pub use dispatcher::{Backoff, Step, Terminal};
