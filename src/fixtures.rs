//! Sample records shared by unit tests

use chrono::{TimeZone, Utc};

use crate::models::{Author, Book};

pub fn author(id: i32, name: &str) -> Author {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    Author {
        id,
        name: name.to_string(),
        books_count: 0,
        created_at: created,
        updated_at: created,
    }
}

pub fn book(id: i32, author: &Author, title: &str) -> Book {
    let created = Utc.with_ymd_and_hms(2024, 3, 2, 18, 5, 9).unwrap();
    Book {
        id,
        title: title.to_string(),
        author_id: author.id,
        author_name: author.name.clone(),
        created_at: created,
        updated_at: created,
    }
}
