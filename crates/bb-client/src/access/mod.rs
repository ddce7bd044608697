//! Page access: the session guard, the role gate, and their combination.
//!
//! Every protected page evaluates [`PageAccess`], which always runs the guard
//! before the gate so no page can skip either check.

mod gate;
mod guard;

use std::time::Duration;

pub use gate::RoleGate;
pub use guard::{GuardDecision, PUBLIC_ROUTES, SessionGuard, normalize_route};

use crate::session::{Session, SessionContext};

pub const LOGIN_ROUTE: &str = "/login";

/// Delay before navigating away after a session failure, so the notice is readable.
pub const SESSION_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Message shown in place of a page the session's role may not see.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized Access";

/// Navigation request produced by guards and controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub after: Duration,
}

impl Redirect {
    pub fn immediate(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            after: Duration::ZERO,
        }
    }

    /// Back to login after [`SESSION_REDIRECT_DELAY`].
    pub fn to_login_delayed() -> Self {
        Self {
            to: LOGIN_ROUTE.to_string(),
            after: SESSION_REDIRECT_DELAY,
        }
    }
}

/// Result of evaluating a page's access rules.
#[derive(Debug, Clone)]
pub enum PageAccess {
    /// Render the page. `None` only on public routes without a session.
    Granted(Option<Session>),
    /// Valid session, wrong role: render [`UNAUTHORIZED_MESSAGE`].
    Denied(Session),
    /// No usable session.
    Redirect(Redirect),
}

impl PageAccess {
    pub fn evaluate(guard: &SessionGuard, gate: &RoleGate, ctx: &SessionContext, route: &str) -> Self {
        match guard.check(ctx, route) {
            GuardDecision::Redirect(redirect) => PageAccess::Redirect(redirect),
            GuardDecision::Allow(None) => PageAccess::Granted(None),
            GuardDecision::Allow(Some(session)) => {
                // Public pages carry no role requirement
                if guard.is_public(route) || gate.authorize(&session) {
                    PageAccess::Granted(Some(session))
                } else {
                    PageAccess::Denied(session)
                }
            }
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, PageAccess::Granted(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            PageAccess::Granted(session) => session.as_ref(),
            PageAccess::Denied(session) => Some(session),
            PageAccess::Redirect(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use bb_types::auth::AccountType;
    use serde_json::json;

    use super::*;
    use crate::test_support::fake_token;

    fn ctx_with(account_type: &str) -> SessionContext {
        let ctx = SessionContext::in_memory();
        ctx.store_token(&fake_token(json!({"accountType": account_type, "userID": "u"}))).unwrap();
        ctx
    }

    #[test]
    fn wrong_role_is_denied_not_redirected() {
        let guard = SessionGuard::new();
        let access = PageAccess::evaluate(&guard, &RoleGate::admin(), &ctx_with("Parent"), "/users");
        match access {
            PageAccess::Denied(session) => assert_eq!(session.account_type(), AccountType::Parent),
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn matching_role_is_granted() {
        let guard = SessionGuard::new();
        let access = PageAccess::evaluate(&guard, &RoleGate::staff(), &ctx_with("staff"), "/children");
        assert!(access.is_granted());
        assert!(access.session().is_some());
    }

    #[test]
    fn missing_session_redirects_even_with_open_gate() {
        let guard = SessionGuard::new();
        let access = PageAccess::evaluate(&guard, &RoleGate::any(), &SessionContext::in_memory(), "/reports");
        match access {
            PageAccess::Redirect(r) => {
                assert_eq!(r.to, LOGIN_ROUTE);
                assert_eq!(r.after, Duration::ZERO);
            }
            other => panic!("expected redirect, got {:?}", other),
        }
    }

    #[test]
    fn public_route_ignores_gate() {
        let guard = SessionGuard::new();
        let access = PageAccess::evaluate(&guard, &RoleGate::admin(), &ctx_with("Parent"), "/");
        assert!(access.is_granted());
    }
}
