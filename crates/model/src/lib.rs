pub mod country;
pub mod segment;

pub use country::{CountryCode, EmptyCountryCode};
pub use segment::{Coordinate, ResolvedSegment, Segment, TimestampError};
