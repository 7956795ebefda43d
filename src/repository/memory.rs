use super::{RepoError, RepoResult, Repository};
use crate::models::{
    ApplicationStatus, ContentFilter, DashboardStats, EBook, EBookCategory, JobApplication,
    JobCategory, JobPosting, NewsArticle, NewsCategory, Page, Pagination, SortOrder, User,
    UserFilter, Vlog, VlogCategory,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{cmp::Ordering, collections::HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

/// MemoryRepository
///
/// A process-local implementation of `Repository` backed by hash maps behind a single
/// `RwLock`. Used for local runs without `DATABASE_URL` and by the test-suite. Every
/// operation holds the lock for its whole duration, so increments and uniqueness checks
/// are atomic just like their SQL counterparts.
#[derive(Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    users: HashMap<Uuid, User>,
    news: HashMap<Uuid, NewsArticle>,
    jobs: HashMap<Uuid, JobPosting>,
    applications: HashMap<Uuid, JobApplication>,
    vlogs: HashMap<Uuid, Vlog>,
    ebooks: HashMap<Uuid, EBook>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store {
    fn application_count(&self, job_id: Uuid) -> i64 {
        self.applications
            .values()
            .filter(|a| a.job_id == job_id)
            .count() as i64
    }

    fn job_with_count(&self, job: &JobPosting) -> JobPosting {
        let mut job = job.clone();
        job.application_count = self.application_count(job.id);
        job
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Sort keys shared by the content types.
trait Listed {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn title(&self) -> &str;
    fn popularity(&self) -> i64;
    fn price(&self) -> Option<f64> {
        None
    }
}

impl Listed for NewsArticle {
    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn popularity(&self) -> i64 {
        self.views
    }
}

impl Listed for JobPosting {
    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn popularity(&self) -> i64 {
        self.views
    }
}

impl Listed for Vlog {
    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn popularity(&self) -> i64 {
        self.views
    }
}

impl Listed for EBook {
    fn id(&self) -> Uuid {
        self.id
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn popularity(&self) -> i64 {
        self.downloads
    }
    fn price(&self) -> Option<f64> {
        Some(self.price)
    }
}

fn newest_first<T: Listed>(a: &T, b: &T) -> Ordering {
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| a.id().cmp(&b.id()))
}

fn compare<T: Listed>(a: &T, b: &T, sort: SortOrder) -> Ordering {
    match sort {
        SortOrder::Newest => newest_first(a, b),
        SortOrder::Oldest => a
            .created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(&b.id())),
        SortOrder::Popular => b
            .popularity()
            .cmp(&a.popularity())
            .then_with(|| newest_first(a, b)),
        SortOrder::Title => a
            .title()
            .to_lowercase()
            .cmp(&b.title().to_lowercase())
            .then_with(|| a.id().cmp(&b.id())),
        SortOrder::PriceAsc | SortOrder::PriceDesc => match (a.price(), b.price()) {
            (Some(pa), Some(pb)) => {
                let by_price = pa.partial_cmp(&pb).unwrap_or(Ordering::Equal);
                let by_price = if sort == SortOrder::PriceDesc {
                    by_price.reverse()
                } else {
                    by_price
                };
                by_price.then_with(|| newest_first(a, b))
            }
            _ => newest_first(a, b),
        },
    }
}

fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit as usize)
        .collect();
    Page { items, total }
}

fn sort_and_paginate<T: Listed>(mut items: Vec<T>, sort: SortOrder, pagination: Pagination) -> Page<T> {
    items.sort_by(|a, b| compare(a, b, sort));
    paginate(items, pagination)
}

/// Case-insensitive substring match of `needle` against any of `fields`.
fn matches_search(needle: Option<&str>, fields: &[&str]) -> bool {
    let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
        return true;
    };
    let needle = needle.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

fn matches_flag(expected: Option<bool>, actual: bool) -> bool {
    expected.is_none_or(|e| e == actual)
}

fn matches_category<C: PartialEq>(expected: Option<&C>, actual: &C) -> bool {
    expected.is_none_or(|e| e == actual)
}

#[async_trait]
impl Repository for MemoryRepository {
    // --- Users ---

    async fn create_user(&self, user: User) -> RepoResult<User> {
        let mut store = self.store.write().await;
        if store.email_taken(&user.email, None) {
            return Err(RepoError::Conflict("User already exists".to_string()));
        }
        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, filter: &UserFilter) -> RepoResult<Page<User>> {
        let store = self.store.read().await;
        let mut users: Vec<User> = store
            .users
            .values()
            .filter(|u| matches_category(filter.role.as_ref(), &u.role))
            .filter(|u| matches_search(filter.search.as_deref(), &[u.name.as_str(), u.email.as_str()]))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(paginate(users, filter.pagination))
    }

    async fn update_user(&self, user: User) -> RepoResult<Option<User>> {
        let mut store = self.store.write().await;
        if !store.users.contains_key(&user.id) {
            return Ok(None);
        }
        if store.email_taken(&user.email, Some(user.id)) {
            return Err(RepoError::Conflict("Email is already in use".to_string()));
        }
        Ok(store.users.get_mut(&user.id).map(|stored| {
            *stored = User {
                created_at: stored.created_at,
                ..user
            };
            stored.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let removed = store.users.remove(&id).is_some();
        if removed {
            store.applications.retain(|_, a| a.applicant_id != id);
        }
        Ok(removed)
    }

    // --- News ---

    async fn list_news(&self, filter: &ContentFilter<NewsCategory>) -> RepoResult<Page<NewsArticle>> {
        let store = self.store.read().await;
        let items = store
            .news
            .values()
            .filter(|n| matches_category(filter.category.as_ref(), &n.category))
            .filter(|n| matches_flag(filter.visible, n.published))
            .filter(|n| matches_flag(filter.featured, n.featured))
            .filter(|n| {
                let tags = n.tags.join(" ");
                matches_search(
                    filter.search.as_deref(),
                    &[n.title.as_str(), n.content.as_str(), n.excerpt.as_str(), tags.as_str()],
                )
            })
            .cloned()
            .collect();
        Ok(sort_and_paginate(items, filter.sort, filter.pagination))
    }

    async fn get_news(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        Ok(self.store.read().await.news.get(&id).cloned())
    }

    async fn create_news(&self, article: NewsArticle) -> RepoResult<NewsArticle> {
        self.store.write().await.news.insert(article.id, article.clone());
        Ok(article)
    }

    async fn update_news(&self, article: NewsArticle) -> RepoResult<Option<NewsArticle>> {
        let mut store = self.store.write().await;
        // Counters and authorship stay as stored; only editable fields are written.
        Ok(store.news.get_mut(&article.id).map(|stored| {
            *stored = NewsArticle {
                views: stored.views,
                author_id: stored.author_id,
                created_at: stored.created_at,
                ..article
            };
            stored.clone()
        }))
    }

    async fn delete_news(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.store.write().await.news.remove(&id).is_some())
    }

    async fn increment_news_views(&self, id: Uuid) -> RepoResult<Option<NewsArticle>> {
        let mut store = self.store.write().await;
        Ok(store.news.get_mut(&id).map(|article| {
            article.views += 1;
            article.clone()
        }))
    }

    // --- Jobs ---

    async fn list_jobs(
        &self,
        filter: &ContentFilter<JobCategory>,
        now: DateTime<Utc>,
    ) -> RepoResult<Page<JobPosting>> {
        let store = self.store.read().await;
        let items = store
            .jobs
            .values()
            .filter(|j| matches_category(filter.category.as_ref(), &j.category))
            .filter(|j| matches_flag(filter.visible, j.is_open(now)))
            .filter(|j| matches_flag(filter.featured, j.featured))
            .filter(|j| {
                matches_search(
                    filter.search.as_deref(),
                    &[
                        j.title.as_str(),
                        j.company.as_str(),
                        j.location.as_str(),
                        j.description.as_str(),
                    ],
                )
            })
            .map(|j| store.job_with_count(j))
            .collect();
        Ok(sort_and_paginate(items, filter.sort, filter.pagination))
    }

    async fn get_job(&self, id: Uuid) -> RepoResult<Option<JobPosting>> {
        let store = self.store.read().await;
        Ok(store.jobs.get(&id).map(|j| store.job_with_count(j)))
    }

    async fn create_job(&self, job: JobPosting) -> RepoResult<JobPosting> {
        let mut store = self.store.write().await;
        store.jobs.insert(job.id, job.clone());
        Ok(store.job_with_count(&job))
    }

    async fn update_job(&self, job: JobPosting) -> RepoResult<Option<JobPosting>> {
        let mut store = self.store.write().await;
        let Some(stored) = store.jobs.get_mut(&job.id) else {
            return Ok(None);
        };
        *stored = JobPosting {
            views: stored.views,
            posted_by: stored.posted_by,
            created_at: stored.created_at,
            ..job
        };
        let job = stored.clone();
        Ok(Some(store.job_with_count(&job)))
    }

    async fn delete_job(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let removed = store.jobs.remove(&id).is_some();
        if removed {
            store.applications.retain(|_, a| a.job_id != id);
        }
        Ok(removed)
    }

    async fn increment_job_views(&self, id: Uuid) -> RepoResult<Option<JobPosting>> {
        let mut store = self.store.write().await;
        let Some(job) = store.jobs.get_mut(&id) else {
            return Ok(None);
        };
        job.views += 1;
        let job = job.clone();
        Ok(Some(store.job_with_count(&job)))
    }

    // --- Applications ---

    async fn create_application(&self, application: JobApplication) -> RepoResult<JobApplication> {
        let mut store = self.store.write().await;
        let duplicate = store.applications.values().any(|a| {
            a.job_id == application.job_id && a.applicant_id == application.applicant_id
        });
        if duplicate {
            return Err(RepoError::Conflict(
                "You have already applied for this job".to_string(),
            ));
        }
        store.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn find_application(
        &self,
        job_id: Uuid,
        applicant_id: Uuid,
    ) -> RepoResult<Option<JobApplication>> {
        let store = self.store.read().await;
        Ok(store
            .applications
            .values()
            .find(|a| a.job_id == job_id && a.applicant_id == applicant_id)
            .cloned())
    }

    async fn list_applications_for_job(&self, job_id: Uuid) -> RepoResult<Vec<JobApplication>> {
        let store = self.store.read().await;
        let mut apps: Vec<JobApplication> = store
            .applications
            .values()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        apps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apps)
    }

    async fn list_applications_for_user(
        &self,
        applicant_id: Uuid,
    ) -> RepoResult<Vec<JobApplication>> {
        let store = self.store.read().await;
        let mut apps: Vec<JobApplication> = store
            .applications
            .values()
            .filter(|a| a.applicant_id == applicant_id)
            .cloned()
            .collect();
        apps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apps)
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> RepoResult<Option<JobApplication>> {
        let mut store = self.store.write().await;
        Ok(store.applications.get_mut(&id).map(|app| {
            app.status = status;
            app.updated_at = Utc::now();
            app.clone()
        }))
    }

    // --- Vlogs ---

    async fn list_vlogs(&self, filter: &ContentFilter<VlogCategory>) -> RepoResult<Page<Vlog>> {
        let store = self.store.read().await;
        let items = store
            .vlogs
            .values()
            .filter(|v| matches_category(filter.category.as_ref(), &v.category))
            .filter(|v| matches_flag(filter.visible, v.published))
            .filter(|v| matches_flag(filter.featured, v.featured))
            .filter(|v| matches_search(filter.search.as_deref(), &[v.title.as_str(), v.description.as_str()]))
            .cloned()
            .collect();
        Ok(sort_and_paginate(items, filter.sort, filter.pagination))
    }

    async fn get_vlog(&self, id: Uuid) -> RepoResult<Option<Vlog>> {
        Ok(self.store.read().await.vlogs.get(&id).cloned())
    }

    async fn create_vlog(&self, vlog: Vlog) -> RepoResult<Vlog> {
        self.store.write().await.vlogs.insert(vlog.id, vlog.clone());
        Ok(vlog)
    }

    async fn update_vlog(&self, vlog: Vlog) -> RepoResult<Option<Vlog>> {
        let mut store = self.store.write().await;
        Ok(store.vlogs.get_mut(&vlog.id).map(|stored| {
            *stored = Vlog {
                views: stored.views,
                likes: stored.likes,
                author_id: stored.author_id,
                created_at: stored.created_at,
                ..vlog
            };
            stored.clone()
        }))
    }

    async fn delete_vlog(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.store.write().await.vlogs.remove(&id).is_some())
    }

    async fn increment_vlog_views(&self, id: Uuid) -> RepoResult<Option<Vlog>> {
        let mut store = self.store.write().await;
        Ok(store.vlogs.get_mut(&id).map(|vlog| {
            vlog.views += 1;
            vlog.clone()
        }))
    }

    async fn increment_vlog_likes(&self, id: Uuid) -> RepoResult<Option<Vlog>> {
        let mut store = self.store.write().await;
        Ok(store.vlogs.get_mut(&id).map(|vlog| {
            vlog.likes += 1;
            vlog.clone()
        }))
    }

    // --- E-books ---

    async fn list_ebooks(&self, filter: &ContentFilter<EBookCategory>) -> RepoResult<Page<EBook>> {
        let store = self.store.read().await;
        let items = store
            .ebooks
            .values()
            .filter(|e| matches_category(filter.category.as_ref(), &e.category))
            .filter(|e| matches_flag(filter.visible, e.available))
            .filter(|e| matches_flag(filter.featured, e.featured))
            .filter(|e| {
                matches_search(
                    filter.search.as_deref(),
                    &[e.title.as_str(), e.author.as_str(), e.description.as_str()],
                )
            })
            .cloned()
            .collect();
        Ok(sort_and_paginate(items, filter.sort, filter.pagination))
    }

    async fn get_ebook(&self, id: Uuid) -> RepoResult<Option<EBook>> {
        Ok(self.store.read().await.ebooks.get(&id).cloned())
    }

    async fn create_ebook(&self, ebook: EBook) -> RepoResult<EBook> {
        self.store.write().await.ebooks.insert(ebook.id, ebook.clone());
        Ok(ebook)
    }

    async fn update_ebook(&self, ebook: EBook) -> RepoResult<Option<EBook>> {
        let mut store = self.store.write().await;
        Ok(store.ebooks.get_mut(&ebook.id).map(|stored| {
            *stored = EBook {
                downloads: stored.downloads,
                created_at: stored.created_at,
                ..ebook
            };
            stored.clone()
        }))
    }

    async fn delete_ebook(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.store.write().await.ebooks.remove(&id).is_some())
    }

    async fn increment_ebook_downloads(&self, id: Uuid) -> RepoResult<Option<EBook>> {
        let mut store = self.store.write().await;
        Ok(store.ebooks.get_mut(&id).map(|ebook| {
            ebook.downloads += 1;
            ebook.clone()
        }))
    }

    // --- Dashboard ---

    async fn get_stats(&self, now: DateTime<Utc>) -> RepoResult<DashboardStats> {
        let store = self.store.read().await;
        Ok(DashboardStats {
            total_users: store.users.len() as i64,
            total_news: store.news.len() as i64,
            total_jobs: store.jobs.len() as i64,
            open_jobs: store.jobs.values().filter(|j| j.is_open(now)).count() as i64,
            total_vlogs: store.vlogs.len() as i64,
            total_ebooks: store.ebooks.len() as i64,
            total_applications: store.applications.len() as i64,
        })
    }
}
