pub mod catalog;
pub mod course;
pub mod user;

pub use catalog::{Category, SubCategory};
pub use course::{
    Chapter, Course, CourseLevel, CourseStatus, CourseSummary, Enrollment, Lesson, RatingWithUser,
};
pub use user::{Role, SellerWithUser, User, UserStatus};
