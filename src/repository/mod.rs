use crate::models::{
    ApplicationStatus, ContentFilter, DashboardStats, EBook, EBookCategory, JobApplication,
    JobCategory, JobPosting, NewsArticle, NewsCategory, Page, User, UserFilter, Vlog,
    VlogCategory,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

/// RepoError
///
/// Failures surfaced by the persistence layer. `Conflict` is a uniqueness violation the
/// caller can act on; everything else is an unexpected database failure.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers only talk to this
/// trait, so the Postgres implementation and the in-memory one are interchangeable.
///
/// Updates take the complete, already merged record and overwrite the stored one (last
/// write wins). Counter increments are single atomic operations and return the record
/// as it is after the increment, or `None` when the id does not exist.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: User) -> RepoResult<User>;
    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    async fn list_users(&self, filter: &UserFilter) -> RepoResult<Page<User>>;
    async fn update_user(&self, user: User) -> RepoResult<Option<User>>;
    async fn delete_user(&self, id: Uuid) -> RepoResult<bool>;

    // --- News ---
    async fn list_news(&self, filter: &ContentFilter<NewsCategory>) -> RepoResult<Page<NewsArticle>>;
    async fn get_news(&self, id: Uuid) -> RepoResult<Option<NewsArticle>>;
    async fn create_news(&self, article: NewsArticle) -> RepoResult<NewsArticle>;
    async fn update_news(&self, article: NewsArticle) -> RepoResult<Option<NewsArticle>>;
    async fn delete_news(&self, id: Uuid) -> RepoResult<bool>;
    async fn increment_news_views(&self, id: Uuid) -> RepoResult<Option<NewsArticle>>;

    // --- Jobs ---
    // `now` decides which postings count as open when the filter asks for visibility.
    async fn list_jobs(
        &self,
        filter: &ContentFilter<JobCategory>,
        now: DateTime<Utc>,
    ) -> RepoResult<Page<JobPosting>>;
    async fn get_job(&self, id: Uuid) -> RepoResult<Option<JobPosting>>;
    async fn create_job(&self, job: JobPosting) -> RepoResult<JobPosting>;
    async fn update_job(&self, job: JobPosting) -> RepoResult<Option<JobPosting>>;
    // Also removes the posting's applications.
    async fn delete_job(&self, id: Uuid) -> RepoResult<bool>;
    async fn increment_job_views(&self, id: Uuid) -> RepoResult<Option<JobPosting>>;

    // --- Applications ---
    // Fails with `Conflict` when the (job, applicant) pair already exists.
    async fn create_application(&self, application: JobApplication) -> RepoResult<JobApplication>;
    async fn find_application(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> RepoResult<Option<JobApplication>>;
    async fn list_applications_for_job(&self, job_id: Uuid) -> RepoResult<Vec<JobApplication>>;
    async fn list_applications_for_user(
        &self,
        applicant_id: Uuid,
    ) -> RepoResult<Vec<JobApplication>>;
    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> RepoResult<Option<JobApplication>>;

    // --- Vlogs ---
    async fn list_vlogs(&self, filter: &ContentFilter<VlogCategory>) -> RepoResult<Page<Vlog>>;
    async fn get_vlog(&self, id: Uuid) -> RepoResult<Option<Vlog>>;
    async fn create_vlog(&self, vlog: Vlog) -> RepoResult<Vlog>;
    async fn update_vlog(&self, vlog: Vlog) -> RepoResult<Option<Vlog>>;
    async fn delete_vlog(&self, id: Uuid) -> RepoResult<bool>;
    async fn increment_vlog_views(&self, id: Uuid) -> RepoResult<Option<Vlog>>;
    async fn increment_vlog_likes(&self, id: Uuid) -> RepoResult<Option<Vlog>>;

    // --- E-books ---
    async fn list_ebooks(&self, filter: &ContentFilter<EBookCategory>) -> RepoResult<Page<EBook>>;
    async fn get_ebook(&self, id: Uuid) -> RepoResult<Option<EBook>>;
    async fn create_ebook(&self, ebook: EBook) -> RepoResult<EBook>;
    async fn update_ebook(&self, ebook: EBook) -> RepoResult<Option<EBook>>;
    async fn delete_ebook(&self, id: Uuid) -> RepoResult<bool>;
    async fn increment_ebook_downloads(&self, id: Uuid) -> RepoResult<Option<EBook>>;

    // --- Dashboard ---
    async fn get_stats(&self, now: DateTime<Utc>) -> RepoResult<DashboardStats>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
