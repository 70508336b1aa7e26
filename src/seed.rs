//! Demo catalog for running without a database (and a convenient fixture
//! for exploratory testing). Nothing here is referenced by the Postgres
//! path.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::models::{
    Category, Chapter, Course, CourseLevel, CourseStatus, Enrollment, Lesson, RatingWithUser, Role,
    SellerWithUser, SubCategory, User, UserStatus,
};
use crate::store::MemoryStore;

/// Build a small but fully-wired catalog: two sellers, two buyers, two
/// categories, three published courses with chapters, lessons, ratings and
/// one enrollment. All demo accounts use the password `password123`.
pub fn demo_store() -> MemoryStore {
    let store = MemoryStore::new();
    let now = Utc::now();

    let admin_id = Uuid::new_v4();
    let seller_amy = Uuid::new_v4();
    let seller_raj = Uuid::new_v4();
    let buyer_lena = Uuid::new_v4();
    let buyer_tom = Uuid::new_v4();

    let user = |id: Uuid, first: &str, last: &str, email: &str, roles: Vec<Role>| User {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        password_hash: hash_password("password123"),
        status: UserStatus::Active,
        roles,
        profile_image_key: None,
        date_joined: now,
    };

    store.add_user(user(admin_id, "Ada", "Root", "admin@coursemart.test", vec![Role::SuperAdmin]));
    store.add_user(user(seller_amy, "Amy", "Chen", "amy@coursemart.test", vec![Role::Seller]));
    store.add_user(user(seller_raj, "Raj", "Patel", "raj@coursemart.test", vec![Role::Seller]));
    store.add_user(user(buyer_lena, "Lena", "Koch", "lena@coursemart.test", vec![Role::Buyer]));
    store.add_user(user(buyer_tom, "Tom", "Silva", "tom@coursemart.test", vec![Role::Buyer]));

    let seller_profile = |user_id: Uuid, first: &str, last: &str, email: &str, slug: &str| {
        SellerWithUser {
            id: Uuid::new_v4(),
            user_id,
            slug_name: slug.to_string(),
            designation: "Instructor".to_string(),
            description: Some(format!("{first} teaches on Coursemart.")),
            facebook_link: None,
            twitter_link: None,
            instagram_link: None,
            linkedin_link: None,
            user_first_name: first.to_string(),
            user_last_name: last.to_string(),
            user_email: email.to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    };
    store.add_seller(seller_profile(seller_amy, "Amy", "Chen", "amy@coursemart.test", "amy-chen-101"));
    store.add_seller(seller_profile(seller_raj, "Raj", "Patel", "raj@coursemart.test", "raj-patel-102"));

    let category = |name: &str| Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        is_deleted: false,
        created_by: admin_id,
        updated_by: admin_id,
        created_at: now,
        updated_at: now,
    };
    let development = category("Development");
    let design = category("Design");
    store.add_category(development.clone());
    store.add_category(design.clone());

    let sub_category = |name: &str, parent: &Category| SubCategory {
        id: Uuid::new_v4(),
        name: name.to_string(),
        category_id: parent.id,
        category_name: parent.name.clone(),
        is_deleted: false,
        created_by: admin_id,
        updated_by: admin_id,
        created_at: now,
        updated_at: now,
    };
    let web_dev = sub_category("Web Development", &development);
    let systems = sub_category("Systems Programming", &development);
    let ui_design = sub_category("UI Design", &design);
    store.add_sub_category(web_dev.clone());
    store.add_sub_category(systems.clone());
    store.add_sub_category(ui_design.clone());

    struct CourseSeed {
        title: &'static str,
        slug: &'static str,
        seller: Uuid,
        category: Uuid,
        sub_category: Uuid,
        price: i64,
        sale_price: i64,
        lesson_minutes: &'static [i64],
        stars: &'static [i32],
        age_days: i64,
    }

    let seeds = [
        CourseSeed {
            title: "Rust Web Services from Scratch",
            slug: "rust-web-services-from-scratch-101",
            seller: seller_amy,
            category: development.id,
            sub_category: systems.id,
            price: 129,
            sale_price: 59,
            lesson_minutes: &[25, 40, 35, 50, 45, 60, 30, 55],
            stars: &[5, 5, 4, 5],
            age_days: 90,
        },
        CourseSeed {
            title: "Modern Frontend Fundamentals",
            slug: "modern-frontend-fundamentals-204",
            seller: seller_amy,
            category: development.id,
            sub_category: web_dev.id,
            price: 89,
            sale_price: 39,
            lesson_minutes: &[20, 30, 25, 35],
            stars: &[4, 4, 3],
            age_days: 45,
        },
        CourseSeed {
            title: "Interface Design Essentials",
            slug: "interface-design-essentials-317",
            seller: seller_raj,
            category: design.id,
            sub_category: ui_design.id,
            price: 99,
            sale_price: 49,
            lesson_minutes: &[15, 20, 25],
            stars: &[5, 3],
            age_days: 20,
        },
    ];

    for seed in &seeds {
        let course_id = Uuid::new_v4();
        let created_at = now - Duration::days(seed.age_days);
        store.add_course(Course {
            id: course_id,
            slug_name: seed.slug.to_string(),
            seller_id: seed.seller,
            title: seed.title.to_string(),
            short_description: Some(format!("{} in a nutshell.", seed.title)),
            description: Some(format!("Everything {} covers, end to end.", seed.title)),
            what_student_learn: Some("Practical, production-grade skills.".to_string()),
            requirements: Some("A laptop and curiosity.".to_string()),
            level: Some(CourseLevel::Beginner),
            audio_language: Some("ENGLISH".to_string()),
            category_id: Some(seed.category),
            sub_category_id: Some(seed.sub_category),
            thumbnail_image_key: Some(format!("thumbnails/{}.jpg", seed.slug)),
            thumbnail_video_key: Some(format!("previews/{}.mp4", seed.slug)),
            is_course_free: false,
            course_price: Some(Decimal::new(seed.price, 0)),
            sale_price: Some(Decimal::new(seed.sale_price, 0)),
            course_status: CourseStatus::Published,
            is_deleted: false,
            created_by: seed.seller,
            updated_by: seed.seller,
            created_at,
            updated_at: created_at,
        });

        // Two chapters per course, lessons split between them.
        let half = (seed.lesson_minutes.len() + 1) / 2;
        for (chapter_no, minutes) in seed.lesson_minutes.chunks(half).enumerate() {
            let chapter_id = Uuid::new_v4();
            store.add_chapter(Chapter {
                id: chapter_id,
                course_id,
                title: format!("Part {}", chapter_no + 1),
                order_no: chapter_no as i32 + 1,
                is_deleted: false,
                created_by: seed.seller,
                updated_by: seed.seller,
                created_at,
                updated_at: created_at,
            });
            for (lesson_no, &length) in minutes.iter().enumerate() {
                store.add_lesson(Lesson {
                    id: Uuid::new_v4(),
                    chapter_id,
                    title: format!("Lesson {}.{}", chapter_no + 1, lesson_no + 1),
                    video_key: format!("videos/{}/{}-{}.mp4", seed.slug, chapter_no + 1, lesson_no + 1),
                    order_no: lesson_no as i32 + 1,
                    duration_secs: length * 60,
                    is_deleted: false,
                    created_by: seed.seller,
                    updated_by: seed.seller,
                    created_at,
                    updated_at: created_at,
                });
            }
        }

        let reviewers = [
            (buyer_lena, "Lena", "Koch"),
            (buyer_tom, "Tom", "Silva"),
            (buyer_lena, "Lena", "Koch"),
            (buyer_tom, "Tom", "Silva"),
        ];
        for (star_no, &stars) in seed.stars.iter().enumerate() {
            let (reviewer_id, first, last) = reviewers[star_no % reviewers.len()];
            let reviewed_at = created_at + Duration::days(star_no as i64 + 1);
            store.add_rating(RatingWithUser {
                id: Uuid::new_v4(),
                course_id,
                user_id: reviewer_id,
                rating: stars,
                title: format!("{} stars", stars),
                description: None,
                user_first_name: first.to_string(),
                user_last_name: last.to_string(),
                user_profile_image_key: None,
                is_deleted: false,
                created_by: reviewer_id,
                updated_by: reviewer_id,
                created_at: reviewed_at,
                updated_at: reviewed_at,
            });
        }

        if seed.seller == seller_amy {
            store.add_enrollment(Enrollment {
                id: Uuid::new_v4(),
                course_id,
                user_id: buyer_lena,
                created_at: now,
            });
        }
    }

    store
}
