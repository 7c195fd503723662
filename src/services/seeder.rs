//! Bulk generation of synthetic books

use std::{
    ops::RangeInclusive,
    sync::Arc,
    time::{Duration, Instant},
};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::SeederConfig,
    error::{AppError, AppResult},
    repository::{AuthorsStore, BooksStore},
};

/// Postgres accepts at most 65535 bind parameters per statement and every
/// seeded row binds four.
pub const MAX_BATCH_SIZE: usize = 16_000;

const TITLE_VARIANTS: usize = 5;

/// Book title number `number` for `author`, in one of five fixed shapes
pub fn generate_title(author: &str, number: i64, variant: usize) -> String {
    match variant % TITLE_VARIANTS {
        0 => format!("Книга {} автора {}", number, author),
        1 => format!("Том {}. {}", number, author),
        2 => format!("Произведение №{} - {}", number, author),
        3 => format!("Издание {} ({})", number, author),
        _ => format!("{} - Работа {}", author, number),
    }
}

/// Split `first..=last` into consecutive chunks of at most `size` numbers
pub fn batches(first: i64, last: i64, size: usize) -> impl Iterator<Item = RangeInclusive<i64>> {
    let size = size.max(1);
    let span = size as i64;
    (first..=last)
        .step_by(size)
        .map(move |start| start..=(start + span - 1).min(last))
}

#[derive(Debug, Clone)]
struct SeedTarget {
    id: i32,
    name: String,
    existing: i64,
}

/// Per-author outcome of a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSeedSummary {
    pub author: String,
    pub created: u64,
    pub total: i64,
}

#[derive(Debug, Clone)]
pub struct SeedReport {
    pub created: u64,
    pub elapsed: Duration,
    pub authors: Vec<AuthorSeedSummary>,
}

impl SeedReport {
    pub fn books_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= f64::EPSILON {
            return self.created as f64;
        }
        self.created as f64 / secs
    }
}

pub struct Seeder {
    authors: Arc<dyn AuthorsStore>,
    books: Arc<dyn BooksStore>,
    config: SeederConfig,
}

impl Seeder {
    pub fn new(authors: Arc<dyn AuthorsStore>, books: Arc<dyn BooksStore>, config: SeederConfig) -> Self {
        Self {
            authors,
            books,
            config,
        }
    }

    /// Make sure every configured author exists, then top each one up to
    /// `target_books_per_author` books.
    pub async fn run(&self) -> AppResult<SeedReport> {
        if self.config.batch_size == 0 || self.config.batch_size > MAX_BATCH_SIZE {
            return Err(AppError::Config(format!(
                "seeder.batch_size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.config.batch_size
            )));
        }

        let targets = self.setup_authors().await?;
        self.seed_books(&targets).await
    }

    async fn setup_authors(&self) -> AppResult<Vec<SeedTarget>> {
        tracing::info!("Setting up authors");

        let mut targets = Vec::with_capacity(self.config.authors.len());
        for name in &self.config.authors {
            let target = match self.authors.find_by_name(name).await? {
                Some(author) => {
                    let existing = self.books.count_by_author(author.id).await?;
                    tracing::info!("Author: {} (has: {} books)", name, existing);
                    SeedTarget {
                        id: author.id,
                        name: author.name,
                        existing,
                    }
                }
                None => {
                    let author = self.authors.create(name).await?;
                    tracing::info!("Created author: {}", name);
                    SeedTarget {
                        id: author.id,
                        name: author.name,
                        existing: 0,
                    }
                }
            };
            targets.push(target);
        }

        Ok(targets)
    }

    async fn seed_books(&self, targets: &[SeedTarget]) -> AppResult<SeedReport> {
        tracing::info!("Seeding books");

        let target = self.config.target_books_per_author;
        let started = Instant::now();
        let mut rng = StdRng::from_entropy();
        let mut created = 0u64;
        let mut summaries = Vec::with_capacity(targets.len());

        for author in targets {
            let needed = target - author.existing;
            if needed <= 0 {
                tracing::info!("{} already has {} books", author.name, author.existing);
                summaries.push(AuthorSeedSummary {
                    author: author.name.clone(),
                    created: 0,
                    total: author.existing,
                });
                continue;
            }

            tracing::info!("Seeding {}: {} books needed", author.name, needed);

            let mut created_for_author = 0u64;
            for range in batches(author.existing + 1, target, self.config.batch_size) {
                let last = *range.end();
                let titles: Vec<String> = range
                    .map(|number| generate_title(&author.name, number, rng.gen_range(0..TITLE_VARIANTS)))
                    .collect();

                let inserted = self.books.insert_batch(author.id, &titles).await?;
                created_for_author += inserted;

                let progress = last as f64 / target as f64 * 100.0;
                tracing::info!(
                    "  Progress: {}/{} ({:.1}%) - Batch: {} books",
                    last,
                    target,
                    progress,
                    titles.len()
                );
            }

            created += created_for_author;
            let total = author.existing + created_for_author as i64;
            tracing::info!("{}: +{} books (total: {})", author.name, created_for_author, total);
            summaries.push(AuthorSeedSummary {
                author: author.name.clone(),
                created: created_for_author,
                total,
            });
        }

        let report = SeedReport {
            created,
            elapsed: started.elapsed(),
            authors: summaries,
        };
        tracing::info!(
            "Total books created: {}, time: {:.2} seconds, speed: {:.2} books/second",
            report.created,
            report.elapsed.as_secs_f64(),
            report.books_per_second()
        );

        Ok(report)
    }
}
