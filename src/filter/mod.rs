pub mod course;

pub use course::{CourseFilter, CourseFilterParams, DurationBand, OrderKey, SortDirection};
