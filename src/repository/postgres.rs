use super::{RepoError, RepoResult, Repository};
use crate::models::{
    ApplicationStatus, ContentFilter, DashboardStats, EBook, EBookCategory, JobApplication,
    JobCategory, JobPosting, NewsArticle, NewsCategory, Page, Pagination, SortOrder, User,
    UserFilter, Vlog, VlogCategory,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    PgPool, Postgres,
    postgres::PgPoolOptions,
    query_builder::QueryBuilder,
};
use uuid::Uuid;

const SCHEMA: &str = include_str!("../../migrations/schema.sql");

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, is_verified, created_at, updated_at";

const NEWS_COLUMNS: &str = "id, title, content, excerpt, category, image, author_id, published, \
     featured, tags, views, created_at, updated_at";

const JOB_COLUMNS: &str = "id, title, company, location, job_type, category, description, \
     requirements, salary, application_email, application_url, deadline, active, featured, views, \
     posted_by, created_at, updated_at, \
     (SELECT COUNT(*) FROM job_applications a WHERE a.job_id = jobs.id) AS application_count";

const APPLICATION_COLUMNS: &str =
    "id, job_id, applicant_id, resume_url, cover_letter, status, created_at, updated_at";

const VLOG_COLUMNS: &str = "id, title, description, video_url, thumbnail, category, duration, \
     views, likes, published, featured, author_id, created_at, updated_at";

const EBOOK_COLUMNS: &str = "id, title, author, description, category, price, file_url, \
     cover_image, downloads, available, featured, created_at, updated_at";

// SQL form of `JobPosting::is_open`.
const JOB_OPEN_SQL: &str = "(active AND (deadline IS NULL OR deadline > ";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait backed by PostgreSQL. All dynamic
/// filtering goes through `QueryBuilder` with bound parameters; column and ORDER BY
/// fragments only ever come from the constants and enums in this module.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using an initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the repository over a lazily connecting pool: the first query opens the
    /// connection, later ones reuse it, and broken connections are replaced on demand.
    pub fn connect_lazy(db_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new().max_connections(5).connect_lazy(db_url)?;
        Ok(Self::new(pool))
    }

    /// Creates any missing tables and indexes. Safe to run on every startup.
    pub async fn ensure_schema(&self) -> RepoResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps a unique-constraint violation to `Conflict`; anything else stays a database error.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(message.to_string())
        }
        _ => RepoError::Database(err),
    }
}

/// Escapes LIKE wildcards so user input is matched literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_search(builder: &mut QueryBuilder<'_, Postgres>, search: Option<&str>, columns: &[&str]) {
    let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return;
    };
    let pattern = like_pattern(search);
    builder.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push(*column);
        builder.push(" ILIKE ");
        builder.push_bind(pattern.clone());
    }
    builder.push(")");
}

fn push_flag(builder: &mut QueryBuilder<'_, Postgres>, column: &str, value: Option<bool>) {
    if let Some(v) = value {
        builder.push(format!(" AND {} = ", column));
        builder.push_bind(v);
    }
}

/// `popularity` is the counter `SortOrder::Popular` ranks by; price orders only apply
/// when the table has a `price` column.
fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: SortOrder, popularity: &str, has_price: bool) {
    let clause = match sort {
        SortOrder::Newest => " ORDER BY created_at DESC, id".to_string(),
        SortOrder::Oldest => " ORDER BY created_at ASC, id".to_string(),
        SortOrder::Popular => format!(" ORDER BY {} DESC, created_at DESC, id", popularity),
        SortOrder::Title => " ORDER BY LOWER(title) ASC, id".to_string(),
        SortOrder::PriceAsc if has_price => " ORDER BY price ASC, created_at DESC, id".to_string(),
        SortOrder::PriceDesc if has_price => " ORDER BY price DESC, created_at DESC, id".to_string(),
        SortOrder::PriceAsc | SortOrder::PriceDesc => " ORDER BY created_at DESC, id".to_string(),
    };
    builder.push(clause);
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, pagination: Pagination) {
    builder.push(" LIMIT ");
    builder.push_bind(i64::from(pagination.limit));
    builder.push(" OFFSET ");
    builder.push_bind(pagination.offset() as i64);
}

fn news_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ContentFilter<NewsCategory>) {
    builder.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        builder.push(" AND category = ");
        builder.push_bind(category);
    }
    push_flag(builder, "published", filter.visible);
    push_flag(builder, "featured", filter.featured);
    push_search(
        builder,
        filter.search.as_deref(),
        &["title", "content", "excerpt", "array_to_string(tags, ' ')"],
    );
}

fn job_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &ContentFilter<JobCategory>,
    now: DateTime<Utc>,
) {
    builder.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        builder.push(" AND category = ");
        builder.push_bind(category);
    }
    match filter.visible {
        Some(true) => {
            builder.push(" AND ");
            builder.push(JOB_OPEN_SQL);
            builder.push_bind(now);
            builder.push("))");
        }
        Some(false) => {
            builder.push(" AND NOT ");
            builder.push(JOB_OPEN_SQL);
            builder.push_bind(now);
            builder.push("))");
        }
        None => {}
    }
    push_flag(builder, "featured", filter.featured);
    push_search(
        builder,
        filter.search.as_deref(),
        &["title", "company", "location", "description"],
    );
}

fn vlog_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ContentFilter<VlogCategory>) {
    builder.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        builder.push(" AND category = ");
        builder.push_bind(category);
    }
    push_flag(builder, "published", filter.visible);
    push_flag(builder, "featured", filter.featured);
    push_search(builder, filter.search.as_deref(), &["title", "description"]);
}

fn ebook_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ContentFilter<EBookCategory>) {
    builder.push(" WHERE TRUE");
    if let Some(category) = filter.category {
        builder.push(" AND category = ");
        builder.push_bind(category);
    }
    push_flag(builder, "available", filter.visible);
    push_flag(builder, "featured", filter.featured);
    push_search(
        builder,
        filter.search.as_deref(),
        &["title", "author", "description"],
    );
}

fn user_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    builder.push(" WHERE TRUE");
    if let Some(role) = filter.role {
        builder.push(" AND role = ");
        builder.push_bind(role);
    }
    push_search(builder, filter.search.as_deref(), &["name", "email"]);
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Users ---

    async fn create_user(&self, user: User) -> RepoResult<User> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.is_verified)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "User already exists"))
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self, filter: &UserFilter) -> RepoResult<Page<User>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users");
        user_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        user_filter(&mut query, filter);
        query.push(" ORDER BY created_at DESC, id");
        push_page(&mut query, filter.pagination);
        let items = query.build_query_as::<User>().fetch_all(&self.pool).await?;

        Ok(Page {
            items,
            total: total as u64,
        })
    }

    async fn update_user(&self, user: User) -> RepoResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, role = $5, \
             is_verified = $6, updated_at = $7 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.is_verified)
            .bind(user.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "Email is already in use"))
    }

    async fn delete_user(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- News ---

    async fn list_news(&self, filter: &ContentFilter<NewsCategory>) -> RepoResult<Page<NewsArticle>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM news");
        news_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!("SELECT {NEWS_COLUMNS} FROM news"));
        news_filter(&mut query, filter);
        push_order(&mut query, filter.sort, "views", false);
        push_page(&mut query, filter.pagination);
        let items = query
            .build_query_as::<NewsArticle>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            total: total as u64,
        })
    }

    async fn get_news(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        let sql = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");
        Ok(sqlx::query_as::<_, NewsArticle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_news(&self, article: NewsArticle) -> RepoResult<NewsArticle> {
        let sql = format!(
            "INSERT INTO news ({NEWS_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {NEWS_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, NewsArticle>(&sql)
            .bind(article.id)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.excerpt)
            .bind(article.category)
            .bind(&article.image)
            .bind(article.author_id)
            .bind(article.published)
            .bind(article.featured)
            .bind(&article.tags)
            .bind(article.views)
            .bind(article.created_at)
            .bind(article.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_news(&self, article: NewsArticle) -> RepoResult<Option<NewsArticle>> {
        let sql = format!(
            "UPDATE news SET title = $2, content = $3, excerpt = $4, category = $5, image = $6, \
             published = $7, featured = $8, tags = $9, updated_at = $10 \
             WHERE id = $1 RETURNING {NEWS_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, NewsArticle>(&sql)
            .bind(article.id)
            .bind(&article.title)
            .bind(&article.content)
            .bind(&article.excerpt)
            .bind(article.category)
            .bind(&article.image)
            .bind(article.published)
            .bind(article.featured)
            .bind(&article.tags)
            .bind(article.updated_at)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_news(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_news_views(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        let sql = format!("UPDATE news SET views = views + 1 WHERE id = $1 RETURNING {NEWS_COLUMNS}");
        Ok(sqlx::query_as::<_, NewsArticle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- Jobs ---

    async fn list_jobs(
        &self,
        filter: &ContentFilter<JobCategory>,
        now: DateTime<Utc>,
    ) -> RepoResult<Page<JobPosting>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM jobs");
        job_filter(&mut count, filter, now);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
        job_filter(&mut query, filter, now);
        push_order(&mut query, filter.sort, "views", false);
        push_page(&mut query, filter.pagination);
        let items = query
            .build_query_as::<JobPosting>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            total: total as u64,
        })
    }

    async fn get_job(&self, id: Uuid) -> RepoResult<Option<JobPosting>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        Ok(sqlx::query_as::<_, JobPosting>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_job(&self, job: JobPosting) -> RepoResult<JobPosting> {
        let sql = format!(
            "INSERT INTO jobs (id, title, company, location, job_type, category, description, \
             requirements, salary, application_email, application_url, deadline, active, featured, \
             views, posted_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {JOB_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, JobPosting>(&sql)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(job.job_type)
            .bind(job.category)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.salary)
            .bind(&job.application_email)
            .bind(&job.application_url)
            .bind(job.deadline)
            .bind(job.active)
            .bind(job.featured)
            .bind(job.views)
            .bind(job.posted_by)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_job(&self, job: JobPosting) -> RepoResult<Option<JobPosting>> {
        let sql = format!(
            "UPDATE jobs SET title = $2, company = $3, location = $4, job_type = $5, \
             category = $6, description = $7, requirements = $8, salary = $9, \
             application_email = $10, application_url = $11, deadline = $12, active = $13, \
             featured = $14, updated_at = $15 WHERE id = $1 RETURNING {JOB_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, JobPosting>(&sql)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(job.job_type)
            .bind(job.category)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.salary)
            .bind(&job.application_email)
            .bind(&job.application_url)
            .bind(job.deadline)
            .bind(job.active)
            .bind(job.featured)
            .bind(job.updated_at)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_job(&self, id: Uuid) -> RepoResult<bool> {
        // Applications go with the posting through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_job_views(&self, id: Uuid) -> RepoResult<Option<JobPosting>> {
        let sql = format!("UPDATE jobs SET views = views + 1 WHERE id = $1 RETURNING {JOB_COLUMNS}");
        Ok(sqlx::query_as::<_, JobPosting>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- Applications ---

    async fn create_application(&self, application: JobApplication) -> RepoResult<JobApplication> {
        let sql = format!(
            "INSERT INTO job_applications ({APPLICATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {APPLICATION_COLUMNS}"
        );
        sqlx::query_as::<_, JobApplication>(&sql)
            .bind(application.id)
            .bind(application.job_id)
            .bind(application.applicant_id)
            .bind(&application.resume_url)
            .bind(&application.cover_letter)
            .bind(application.status)
            .bind(application.created_at)
            .bind(application.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "You have already applied for this job"))
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> RepoResult<Option<JobApplication>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_applications \
             WHERE job_id = $1 AND applicant_id = $2"
        );
        Ok(sqlx::query_as::<_, JobApplication>(&sql)
            .bind(job_id)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_applications_for_job(&self, job_id: Uuid) -> RepoResult<Vec<JobApplication>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_applications \
             WHERE job_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, JobApplication>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_applications_for_user(
        &self,
        applicant_id: Uuid,
    ) -> RepoResult<Vec<JobApplication>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_applications \
             WHERE applicant_id = $1 ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, JobApplication>(&sql)
            .bind(applicant_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> RepoResult<Option<JobApplication>> {
        let sql = format!(
            "UPDATE job_applications SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {APPLICATION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- Vlogs ---

    async fn list_vlogs(&self, filter: &ContentFilter<VlogCategory>) -> RepoResult<Page<Vlog>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM vlogs");
        vlog_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!("SELECT {VLOG_COLUMNS} FROM vlogs"));
        vlog_filter(&mut query, filter);
        push_order(&mut query, filter.sort, "views", false);
        push_page(&mut query, filter.pagination);
        let items = query.build_query_as::<Vlog>().fetch_all(&self.pool).await?;

        Ok(Page {
            items,
            total: total as u64,
        })
    }

    async fn get_vlog(&self, id: Uuid) -> RepoResult<Option<Vlog>> {
        let sql = format!("SELECT {VLOG_COLUMNS} FROM vlogs WHERE id = $1");
        Ok(sqlx::query_as::<_, Vlog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_vlog(&self, vlog: Vlog) -> RepoResult<Vlog> {
        let sql = format!(
            "INSERT INTO vlogs ({VLOG_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {VLOG_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Vlog>(&sql)
            .bind(vlog.id)
            .bind(&vlog.title)
            .bind(&vlog.description)
            .bind(&vlog.video_url)
            .bind(&vlog.thumbnail)
            .bind(vlog.category)
            .bind(&vlog.duration)
            .bind(vlog.views)
            .bind(vlog.likes)
            .bind(vlog.published)
            .bind(vlog.featured)
            .bind(vlog.author_id)
            .bind(vlog.created_at)
            .bind(vlog.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_vlog(&self, vlog: Vlog) -> RepoResult<Option<Vlog>> {
        let sql = format!(
            "UPDATE vlogs SET title = $2, description = $3, video_url = $4, thumbnail = $5, \
             category = $6, duration = $7, published = $8, featured = $9, updated_at = $10 \
             WHERE id = $1 RETURNING {VLOG_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Vlog>(&sql)
            .bind(vlog.id)
            .bind(&vlog.title)
            .bind(&vlog.description)
            .bind(&vlog.video_url)
            .bind(&vlog.thumbnail)
            .bind(vlog.category)
            .bind(&vlog.duration)
            .bind(vlog.published)
            .bind(vlog.featured)
            .bind(vlog.updated_at)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_vlog(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM vlogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_vlog_views(&self, id: Uuid) -> RepoResult<Option<Vlog>> {
        let sql = format!("UPDATE vlogs SET views = views + 1 WHERE id = $1 RETURNING {VLOG_COLUMNS}");
        Ok(sqlx::query_as::<_, Vlog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn increment_vlog_likes(&self, id: Uuid) -> RepoResult<Option<Vlog>> {
        let sql = format!("UPDATE vlogs SET likes = likes + 1 WHERE id = $1 RETURNING {VLOG_COLUMNS}");
        Ok(sqlx::query_as::<_, Vlog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- E-books ---

    async fn list_ebooks(&self, filter: &ContentFilter<EBookCategory>) -> RepoResult<Page<EBook>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM ebooks");
        ebook_filter(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut query = QueryBuilder::new(format!("SELECT {EBOOK_COLUMNS} FROM ebooks"));
        ebook_filter(&mut query, filter);
        push_order(&mut query, filter.sort, "downloads", true);
        push_page(&mut query, filter.pagination);
        let items = query.build_query_as::<EBook>().fetch_all(&self.pool).await?;

        Ok(Page {
            items,
            total: total as u64,
        })
    }

    async fn get_ebook(&self, id: Uuid) -> RepoResult<Option<EBook>> {
        let sql = format!("SELECT {EBOOK_COLUMNS} FROM ebooks WHERE id = $1");
        Ok(sqlx::query_as::<_, EBook>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_ebook(&self, ebook: EBook) -> RepoResult<EBook> {
        let sql = format!(
            "INSERT INTO ebooks ({EBOOK_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {EBOOK_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, EBook>(&sql)
            .bind(ebook.id)
            .bind(&ebook.title)
            .bind(&ebook.author)
            .bind(&ebook.description)
            .bind(ebook.category)
            .bind(ebook.price)
            .bind(&ebook.file_url)
            .bind(&ebook.cover_image)
            .bind(ebook.downloads)
            .bind(ebook.available)
            .bind(ebook.featured)
            .bind(ebook.created_at)
            .bind(ebook.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_ebook(&self, ebook: EBook) -> RepoResult<Option<EBook>> {
        let sql = format!(
            "UPDATE ebooks SET title = $2, author = $3, description = $4, category = $5, \
             price = $6, file_url = $7, cover_image = $8, available = $9, featured = $10, \
             updated_at = $11 WHERE id = $1 RETURNING {EBOOK_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, EBook>(&sql)
            .bind(ebook.id)
            .bind(&ebook.title)
            .bind(&ebook.author)
            .bind(&ebook.description)
            .bind(ebook.category)
            .bind(ebook.price)
            .bind(&ebook.file_url)
            .bind(&ebook.cover_image)
            .bind(ebook.available)
            .bind(ebook.featured)
            .bind(ebook.updated_at)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_ebook(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM ebooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_ebook_downloads(&self, id: Uuid) -> RepoResult<Option<EBook>> {
        let sql = format!(
            "UPDATE ebooks SET downloads = downloads + 1 WHERE id = $1 RETURNING {EBOOK_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, EBook>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- Dashboard ---

    /// Compiles all dashboard counters in a single round trip.
    async fn get_stats(&self, now: DateTime<Utc>) -> RepoResult<DashboardStats> {
        let sql = format!(
            "SELECT \
                (SELECT COUNT(*) FROM users) AS total_users, \
                (SELECT COUNT(*) FROM news) AS total_news, \
                (SELECT COUNT(*) FROM jobs) AS total_jobs, \
                (SELECT COUNT(*) FROM jobs WHERE {JOB_OPEN_SQL}$1)) AS open_jobs, \
                (SELECT COUNT(*) FROM vlogs) AS total_vlogs, \
                (SELECT COUNT(*) FROM ebooks) AS total_ebooks, \
                (SELECT COUNT(*) FROM job_applications) AS total_applications"
        );
        Ok(sqlx::query_as::<_, DashboardStats>(&sql)
            .bind(now)
            .fetch_one(&self.pool)
            .await?)
    }
}
