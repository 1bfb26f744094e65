pub mod enums;
pub mod medication;
pub mod schedule;
pub mod user;

pub use enums::*;
pub use medication::*;
pub use schedule::{AdherenceEntry, CalendarDate, DosageDay, TimeOfDay};
pub use user::*;
