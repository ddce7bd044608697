use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{LOGIN_ROUTE, Redirect};
use crate::session::{Session, SessionContext, SessionIssue};

/// Routes reachable without a session.
pub const PUBLIC_ROUTES: [&str; 3] = ["/", "/login", "/register"];

/// Outcome of a guard check.
#[derive(Debug, Clone)]
pub enum GuardDecision {
    /// Render. Carries the session when one is valid; public routes may be
    /// allowed without one.
    Allow(Option<Session>),
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardDecision::Redirect(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            GuardDecision::Allow(session) => session.as_ref(),
            GuardDecision::Redirect(_) => None,
        }
    }
}

/// Decides whether any valid session exists for the current route.
///
/// Run once per mount and again on every route change.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    public_routes: Vec<String>,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self {
            public_routes: PUBLIC_ROUTES.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route to the public allow-list.
    pub fn with_public_route(mut self, route: impl Into<String>) -> Self {
        self.public_routes.push(normalize_route(&route.into()).to_string());
        self
    }

    pub fn is_public(&self, route: &str) -> bool {
        let route = normalize_route(route);
        self.public_routes.iter().any(|r| r == route)
    }

    pub fn check(&self, ctx: &SessionContext, route: &str) -> GuardDecision {
        self.check_at(ctx, route, Utc::now())
    }

    /// Evaluate as of `now`. Never fails: an undecodable token is the same as
    /// no session, and is removed from storage.
    pub fn check_at(&self, ctx: &SessionContext, route: &str, now: DateTime<Utc>) -> GuardDecision {
        let public = self.is_public(route);
        match ctx.current_at(now) {
            Ok(session) => GuardDecision::Allow(Some(session)),
            Err(issue) => {
                if !matches!(issue, SessionIssue::Missing) {
                    warn!(%issue, route, "discarding stored session");
                    ctx.clear();
                }
                if public {
                    GuardDecision::Allow(None)
                } else {
                    debug!(%issue, route, "redirecting to login");
                    GuardDecision::Redirect(Redirect::immediate(LOGIN_ROUTE))
                }
            }
        }
    }
}

/// Strip query, fragment and trailing slash so `/login/?next=x` matches `/login`.
pub fn normalize_route(route: &str) -> &str {
    let end = route.find(['?', '#']).unwrap_or(route.len());
    let path = &route[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
