//! Teacher dashboard controller: login, the submission list and file access.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::{
    api::ApiClient,
    error::{PortalError, Result},
    model::{
        draft::FileKind,
        login_object::TeacherInfo,
        submission_record::{FileRef, SubmissionRecord},
    },
    storage::{Storage, TOKEN_KEY},
    toast::{NewToast, Toaster},
};

use filter::{Query, Selection, SortOrder};

pub mod filter;

pub struct Dashboard<S: Storage> {
    storage: S,
    api: ApiClient,
    token: Option<String>,
    teacher: Option<TeacherInfo>,
    submissions: Vec<SubmissionRecord>,
    query: Query,
    loading: bool,
    toasts: Toaster,
}

impl<S: Storage> Dashboard<S> {
    /// Builds the dashboard. A stored token logs the teacher straight in and
    /// triggers a fetch.
    pub async fn mount(storage: S, api: ApiClient, toasts: Toaster) -> Self {
        let token = storage.get(TOKEN_KEY);
        let mut dashboard = Self {
            storage,
            api,
            token,
            teacher: None,
            submissions: Vec::new(),
            query: Query::default(),
            loading: false,
            toasts,
        };

        if dashboard.is_authenticated() {
            info!("Found stored token, fetching submissions");
            let _ = dashboard.fetch_submissions().await;
        }

        dashboard
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn teacher(&self) -> Option<&TeacherInfo> {
        self.teacher.as_ref()
    }

    pub fn submissions(&self) -> &[SubmissionRecord] {
        &self.submissions
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn toasts(&self) -> &Toaster {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toaster {
        &mut self.toasts
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let response = match self.api.login(email, password).await {
            Ok(r) => r,
            Err(e) => {
                error!("Login failed: {e}");
                let description = match &e {
                    PortalError::Api { message, .. } => message.clone(),
                    _ => "Invalid credentials".into(),
                };
                self.toasts.toast(NewToast::destructive("Login Failed", description));
                return Err(e);
            }
        };

        if let Err(e) = self.storage.set(TOKEN_KEY, response.token.clone()) {
            warn!("Could not store token: {e}");
        }
        self.token = Some(response.token);
        self.teacher = Some(response.teacher);
        self.toasts.toast(NewToast::success("Login Successful", "Welcome back!"));

        // Fetch failures are reported through their own toast.
        let _ = self.fetch_submissions().await;
        Ok(())
    }

    /// Replaces the list with the backend's. On failure the previous list stays.
    pub async fn fetch_submissions(&mut self) -> Result<()> {
        let Some(token) = self.token.clone() else {
            return Err(PortalError::InvalidInput("Not logged in".into()));
        };

        self.loading = true;
        let result = self.api.list_submissions(&token).await;
        self.loading = false;

        match result {
            Ok(submissions) => {
                info!("Fetched {} submissions", submissions.len());
                self.submissions = submissions;
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch submissions: {e}");
                self.toasts
                    .toast(NewToast::destructive("Error", "Failed to fetch submissions"));
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!("Could not remove stored token: {e}");
        }
        self.token = None;
        self.teacher = None;
        self.submissions.clear();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_branch_filter(&mut self, branch: Selection) {
        self.query.branch = branch;
    }

    pub fn set_course_filter(&mut self, course: Selection) {
        self.query.course = course;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.query.sort = sort;
    }

    /// The records to display under the current search, filters and sort.
    pub fn visible(&self) -> Vec<&SubmissionRecord> {
        self.query.apply(&self.submissions)
    }

    /// The address at which a record's file can be viewed.
    pub fn file_url(&self, record: &SubmissionRecord, kind: FileKind) -> String {
        self.api.url(&record.file(kind).path)
    }

    /// Downloads a file into `dest_dir`, named after its original filename.
    ///
    /// The bytes are staged in a temporary file in the same directory, which is
    /// deleted if anything fails before it is moved into place.
    pub async fn download(&mut self, file: FileRef, dest_dir: &Path) -> Result<PathBuf> {
        match self.download_inner(&file, dest_dir).await {
            Ok(path) => {
                info!("Saved {} to {}", file.filename, path.display());
                self.toasts.toast(NewToast::success(
                    "Download Complete",
                    format!("Saved {}", path.display()),
                ));
                Ok(path)
            }
            Err(e) => {
                error!("Download of {} failed: {e}", file.path);
                self.toasts.toast(NewToast::destructive(
                    "Download Failed",
                    format!("Could not download {}", file.filename),
                ));
                Err(e)
            }
        }
    }

    async fn download_inner(&self, file: &FileRef, dest_dir: &Path) -> Result<PathBuf> {
        if file.path.is_empty() {
            return Err(PortalError::InvalidInput("record has no file".into()));
        }

        let data = self.api.fetch_file(&file.path).await?;

        let mut staged = NamedTempFile::new_in(dest_dir)?;
        staged.write_all(&data)?;

        let target = dest_dir.join(local_name(file));
        staged
            .persist(&target)
            .map_err(|e| PortalError::Io(e.error))?;
        Ok(target)
    }
}

/// The file name to save under, stripped of any directory components.
fn local_name(file: &FileRef) -> String {
    [file.filename.as_str(), file.path.as_str()]
        .iter()
        .filter_map(|candidate| Path::new(candidate).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .next()
        .unwrap_or_else(|| "download".to_string())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, fs::read, time::Duration};

    use super::*;
    use crate::{
        storage::MemoryStorage,
        testing::{MockBackend, TEACHER_EMAIL, TEACHER_PASSWORD, TOKEN, record},
        toast::Variant,
    };

    fn backend() -> MockBackend {
        MockBackend {
            submissions: vec![
                record("1", "A1", "cs", "btech", "Roy", "2024-03-01T10:00:00Z"),
                record("2", "B2", "ee", "mtech", "Sam", "2024-03-02T10:00:00Z"),
            ],
            files: HashMap::from([("1.pdf".to_string(), b"%PDF-paper".to_vec())]),
            ..Default::default()
        }
    }

    async fn mount(url: String, storage: MemoryStorage) -> Dashboard<MemoryStorage> {
        let api = ApiClient::new(url, Duration::from_secs(2)).unwrap();
        Dashboard::mount(storage, api, Toaster::default()).await
    }

    #[tokio::test]
    async fn mount_without_token_stays_logged_out() {
        let (url, _backend) = backend().spawn().await;
        let dashboard = mount(url, MemoryStorage::default()).await;

        assert!(!dashboard.is_authenticated());
        assert!(dashboard.submissions().is_empty());
        assert_eq!(dashboard.toasts().len(), 0);
    }

    #[tokio::test]
    async fn mount_with_stored_token_fetches() {
        let (url, _backend) = backend().spawn().await;
        let mut storage = MemoryStorage::default();
        storage.set(TOKEN_KEY, TOKEN.into()).unwrap();

        let dashboard = mount(url, storage).await;
        assert!(dashboard.is_authenticated());
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.submissions().len(), 2);
    }

    #[tokio::test]
    async fn login_stores_token_and_fetches() {
        let (url, _backend) = backend().spawn().await;
        let mut dashboard = mount(url, MemoryStorage::default()).await;

        dashboard.login(TEACHER_EMAIL, TEACHER_PASSWORD).await.unwrap();

        assert!(dashboard.is_authenticated());
        assert_eq!(dashboard.storage().get(TOKEN_KEY).as_deref(), Some(TOKEN));
        assert_eq!(dashboard.teacher().unwrap().name, "Dr. Rao");
        assert_eq!(dashboard.submissions().len(), 2);
    }

    #[tokio::test]
    async fn failed_login_surfaces_server_message() {
        let (url, _backend) = backend().spawn().await;
        let mut dashboard = mount(url, MemoryStorage::default()).await;

        assert!(dashboard.login(TEACHER_EMAIL, "wrong").await.is_err());

        assert!(!dashboard.is_authenticated());
        assert_eq!(dashboard.storage().get(TOKEN_KEY), None);
        let last = dashboard.toasts().toasts().last().unwrap();
        assert_eq!(last.title, "Login Failed");
        assert_eq!(last.description.as_deref(), Some("Invalid email or password"));
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_list() {
        let (url, _backend) = backend().spawn().await;
        let mut dashboard = mount(url, MemoryStorage::default()).await;
        dashboard.login(TEACHER_EMAIL, TEACHER_PASSWORD).await.unwrap();

        let failing = MockBackend {
            fail_listing: true,
            ..Default::default()
        };
        let (failing_url, _failing) = failing.spawn().await;
        dashboard.api = ApiClient::new(failing_url, Duration::from_secs(2)).unwrap();

        assert!(dashboard.fetch_submissions().await.is_err());
        assert_eq!(dashboard.submissions().len(), 2);
        let last = dashboard.toasts().toasts().last().unwrap();
        assert_eq!(last.description.as_deref(), Some("Failed to fetch submissions"));
        assert_eq!(last.variant, Variant::Destructive);
    }

    #[tokio::test]
    async fn logout_clears_token_and_list() {
        let (url, _backend) = backend().spawn().await;
        let mut dashboard = mount(url, MemoryStorage::default()).await;
        dashboard.login(TEACHER_EMAIL, TEACHER_PASSWORD).await.unwrap();

        dashboard.logout();

        assert!(!dashboard.is_authenticated());
        assert!(dashboard.submissions().is_empty());
        assert_eq!(dashboard.storage().get(TOKEN_KEY), None);
        assert!(dashboard.fetch_submissions().await.is_err());
    }

    #[tokio::test]
    async fn controls_drive_visible_list() {
        let (url, _backend) = backend().spawn().await;
        let mut dashboard = mount(url, MemoryStorage::default()).await;
        dashboard.login(TEACHER_EMAIL, TEACHER_PASSWORD).await.unwrap();

        assert_eq!(dashboard.visible()[0].id, "2");
        dashboard.set_sort(SortOrder::Oldest);
        assert_eq!(dashboard.visible()[0].id, "1");

        dashboard.set_search("roy");
        assert_eq!(dashboard.visible().len(), 1);
        dashboard.set_search("");
        dashboard.set_branch_filter(Selection::Only("ee".into()));
        assert_eq!(dashboard.visible()[0].id, "2");
        dashboard.set_course_filter(Selection::Only("btech".into()));
        assert!(dashboard.visible().is_empty());
    }

    #[tokio::test]
    async fn download_saves_file_under_its_name() {
        let dir = tempfile::tempdir().unwrap();
        let (url, _backend) = backend().spawn().await;
        let mut dashboard = mount(url.clone(), MemoryStorage::default()).await;
        dashboard.login(TEACHER_EMAIL, TEACHER_PASSWORD).await.unwrap();

        let record = dashboard.submissions()[0].clone();
        assert_eq!(dashboard.file_url(&record, FileKind::Ieee), format!("{url}/uploads/1.pdf"));

        let saved = dashboard
            .download(record.ieee_file.clone(), dir.path())
            .await
            .unwrap();
        assert_eq!(saved, dir.path().join("1.pdf"));
        assert_eq!(read(&saved).unwrap(), b"%PDF-paper");
    }

    #[tokio::test]
    async fn failed_download_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let (url, _backend) = backend().spawn().await;
        let mut dashboard = mount(url, MemoryStorage::default()).await;
        dashboard.login(TEACHER_EMAIL, TEACHER_PASSWORD).await.unwrap();

        let record = dashboard.submissions()[0].clone();
        assert!(dashboard.download(record.ppt_file, dir.path()).await.is_err());

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(dashboard.toasts().toasts().last().unwrap().title, "Download Failed");
    }

    #[test]
    fn local_name_strips_directories() {
        let file = FileRef {
            filename: "../../etc/passwd".into(),
            path: "/uploads/x.pdf".into(),
        };
        assert_eq!(local_name(&file), "passwd");

        let unnamed = FileRef {
            filename: String::new(),
            path: "/uploads/x.pdf".into(),
        };
        assert_eq!(local_name(&unnamed), "x.pdf");
    }
}
