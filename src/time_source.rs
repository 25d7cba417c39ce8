use chrono::{DateTime, Local};

/// Clock seam for the run loop. Matching and projection take `now` as an
/// argument, so only the loop itself needs a live source.
pub trait TimeSource {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
