//! Page controller: access check, load, mutate-then-refetch, notices.

use std::{fmt, future::Future, sync::Arc};

use async_trait::async_trait;
use bb_types::pagination::{DEFAULT_PAGE_SIZE, PaginationConfig, Paginator};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    access::{PageAccess, Redirect, RoleGate, SessionGuard, UNAUTHORIZED_MESSAGE}, error::{ClientError, ClientResult}, session::SessionContext
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// Dismissible message shown on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }
}

impl From<&ClientError> for Notice {
    fn from(err: &ClientError) -> Self {
        let level = match err {
            ClientError::Validation(_) => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        };
        Self::new(level, err.user_message())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Empty,
    Failed(Notice),
    Populated(Vec<T>),
}

impl<T> ViewState<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() { ViewState::Empty } else { ViewState::Populated(items) }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ViewState::Populated(items) => items,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

/// Source of a page's rows.
#[async_trait]
pub trait Loader<T>: Send + Sync {
    async fn load(&self) -> ClientResult<Vec<T>>;
}

#[async_trait]
impl<T, F, Fut> Loader<T> for F
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ClientResult<Vec<T>>> + Send,
{
    async fn load(&self) -> ClientResult<Vec<T>> {
        (self)().await
    }
}

/// Shared unmount flag for one page view. Clones observe the same flag.
#[derive(Debug, Clone)]
pub struct MountHandle {
    unmounted: Arc<watch::Sender<bool>>,
}

impl Default for MountHandle {
    fn default() -> Self {
        let (tx, _) = watch::channel(false);
        Self { unmounted: Arc::new(tx) }
    }
}

impl MountHandle {
    /// Cancel in-flight work; later results are ignored.
    pub fn unmount(&self) {
        self.unmounted.send_replace(true);
    }

    pub fn is_unmounted(&self) -> bool {
        *self.unmounted.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.unmounted.subscribe()
    }
}

async fn wait_unmounted(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Drives one list page: evaluates access, loads through a [`Loader`],
/// re-fetches after every mutation, and turns failures into notices.
pub struct ListController<T> {
    route: String,
    session: SessionContext,
    guard: SessionGuard,
    gate: RoleGate,
    loader: Arc<dyn Loader<T>>,
    state: ViewState<T>,
    notice: Option<Notice>,
    redirect: Option<Redirect>,
    paginator: Paginator,
    page: usize,
    mount: MountHandle,
}

impl<T: Send + Sync + 'static> ListController<T> {
    pub fn new(route: impl Into<String>, session: SessionContext, gate: RoleGate, loader: impl Loader<T> + 'static) -> Self {
        Self {
            route: route.into(),
            session,
            guard: SessionGuard::default(),
            gate,
            loader: Arc::new(loader),
            state: ViewState::Loading,
            notice: None,
            redirect: None,
            paginator: Paginator::new(DEFAULT_PAGE_SIZE),
            page: 1,
            mount: MountHandle::default(),
        }
    }

    pub fn with_guard(mut self, guard: SessionGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.paginator = Paginator::new(page_size);
        self
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.notice = None;
    }

    /// Pending navigation, if the session failed.
    pub fn redirect(&self) -> Option<&Redirect> {
        self.redirect.as_ref()
    }

    /// Handle the page view drops or triggers on navigation away.
    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    /// Check access, then load. A no-op once unmounted.
    pub async fn refresh(&mut self) -> &ViewState<T> {
        if self.mount.is_unmounted() {
            return &self.state;
        }

        match PageAccess::evaluate(&self.guard, &self.gate, &self.session, &self.route) {
            PageAccess::Redirect(redirect) => {
                self.redirect = Some(redirect);
                return &self.state;
            }
            PageAccess::Denied(_) => {
                self.state = ViewState::Failed(Notice::error(UNAUTHORIZED_MESSAGE));
                return &self.state;
            }
            PageAccess::Granted(_) => {}
        }

        self.state = ViewState::Loading;
        let Some(result) = self.run(self.loader.load()).await else {
            return &self.state;
        };
        match result {
            Ok(items) => {
                self.page = self.paginator.clamp(self.page, items.len());
                self.state = ViewState::from_items(items);
            }
            Err(e) => {
                let notice = self.fail(&e);
                self.state = ViewState::Failed(notice);
            }
        }
        &self.state
    }

    /// Run a create/update/delete, then re-fetch regardless of outcome.
    ///
    /// Success sets a success notice; failure sets an error notice and, for
    /// session failures, clears the token and schedules the login redirect
    /// instead of re-fetching.
    pub async fn mutate<R>(&mut self, action: impl Future<Output = ClientResult<R>>, success: impl Into<String>) -> ClientResult<R> {
        let Some(result) = self.run(action).await else {
            return Err(ClientError::Network("page unmounted before the request finished".to_string()));
        };
        match &result {
            Ok(_) => self.notice = Some(Notice::success(success)),
            Err(e) => {
                self.fail(e);
                if e.is_session_failure() {
                    return result;
                }
            }
        }
        self.refresh().await;
        result
    }

    /// Rows on the current page.
    pub fn page_items(&self) -> &[T] {
        self.paginator.page(self.state.items(), self.page)
    }

    pub fn pagination(&self) -> PaginationConfig {
        self.paginator.config(self.page, self.state.items().len())
    }

    /// Move to `page`, clamped to the available range.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = self.paginator.clamp(page, self.state.items().len());
        self.page
    }

    /// Await `work` unless the page is unmounted first. Results that land
    /// after unmount are discarded.
    async fn run<R>(&self, work: impl Future<Output = ClientResult<R>>) -> Option<ClientResult<R>> {
        let mut unmounted = self.mount.subscribe();
        let result = tokio::select! {
            _ = wait_unmounted(&mut unmounted) => None,
            result = work => Some(result),
        };
        if result.is_none() || self.mount.is_unmounted() {
            debug!(route = %self.route, "page unmounted; dropping result");
            return None;
        }
        result
    }

    fn fail(&mut self, err: &ClientError) -> Notice {
        let notice = Notice::from(err);
        if err.is_session_failure() {
            warn!(route = %self.route, error = %err, "session failure; redirecting to login");
            self.session.clear();
            self.redirect = Some(Redirect::to_login_delayed());
        }
        self.notice = Some(notice.clone());
        notice
    }
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        self.mount.unmount();
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
