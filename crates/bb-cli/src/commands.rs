use std::{path::Path, sync::Arc};

use anyhow::{Context, Result, anyhow, bail};
use bb_client::{
    ApiClient, ClientError, PageAccess, PreferencesStore, RoleGate, Session, SessionGuard, access::UNAUTHORIZED_MESSAGE, api::MediaUpload
};
use bb_types::{
    auth::SignupRequest, pagination::Paginator, records::{EmailRequest, SuggestionRequest}
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{
    ChildrenCmd, Cli, Command, ContactsCmd, LocationListCmd, LogsArgs, MailCmd, MediaCmd, PageArgs, PrefsCmd, RelationshipsCmd, ReportsCmd, UsersCmd
};

/// Run one command and return what should be printed.
pub async fn run(cli: Cli) -> Result<Value> {
    let config = cli.client_config()?;
    debug!(origin = %config.origin, "using backend");
    let client = ApiClient::from_config(&config)?;

    match cli.cmd {
        Command::Login { email, password } => {
            let session = client.auth().login(&email, &password).await.map_err(report)?;
            Ok(json!({
                "message": "Logged in",
                "userID": session.user_id(),
                "accountType": session.account_type(),
                "locationID": session.location_id(),
            }))
        }
        Command::Signup {
            email,
            password,
            first_name,
            last_name,
            account_type,
            location,
        } => {
            let request = SignupRequest {
                email,
                password,
                first_name,
                last_name,
                account_type,
                location_id: location,
            };
            client.auth().signup(&request).await.map_err(report)?;
            Ok(json!({"message": "Account created; run `bb login` to sign in"}))
        }
        Command::Logout => {
            client.auth().logout();
            Ok(json!({"message": "Logged out"}))
        }
        Command::Whoami => {
            let session = require(&client, "/profile", &RoleGate::any())?;
            Ok(json!({
                "claims": session.claims(),
                "accountType": session.account_type(),
                "expiresAt": session.expires_at(),
            }))
        }
        Command::Children(cmd) => children(&client, cmd).await,
        Command::Users(UsersCmd::List { location, page }) => {
            let session = require(&client, "/users", &RoleGate::admin())?;
            let location = location_or_session(location, &session)?;
            paged(client.users().by_location(&location).await, page)
        }
        Command::Contacts(ContactsCmd::List { child, page }) => {
            require(&client, "/contacts", &RoleGate::staff())?;
            paged(client.contacts().by_child(&child).await, page)
        }
        Command::Relationships(RelationshipsCmd::List { child, parent, page }) => {
            require(&client, "/relationships", &RoleGate::staff())?;
            let relationships = match (child, parent) {
                (Some(child), _) => client.relationships().by_child(&child).await,
                (None, Some(parent)) => client.relationships().by_parent(&parent).await,
                (None, None) => bail!("pass --child or --parent"),
            };
            paged(relationships, page)
        }
        Command::MealPlans(LocationListCmd::List { location, page }) => {
            let session = require(&client, "/meal-plans", &RoleGate::any())?;
            let location = location_or_session(location, &session)?;
            paged(client.meal_plans().by_location(&location).await, page)
        }
        Command::Newsletters(LocationListCmd::List { location, page }) => {
            let session = require(&client, "/newsletters", &RoleGate::any())?;
            let location = location_or_session(location, &session)?;
            paged(client.newsletters().by_location(&location).await, page)
        }
        Command::Media(cmd) => media(&client, cmd).await,
        Command::Reports(ReportsCmd::List { child, page }) => {
            require(&client, "/reports", &RoleGate::any())?;
            let reports = client.progress_reports().by_child(&child).await.map_err(report)?;
            let summaries: Vec<Value> = reports
                .iter()
                .map(|r| {
                    json!({
                        "reportID": r.report_id,
                        "title": r.title,
                        "createdAt": r.created_at,
                        "sections": r.sections().sections(),
                    })
                })
                .collect();
            paged(Ok(summaries), page)
        }
        Command::Logs(LogsArgs { location, user, page }) => {
            require(&client, "/logs", &RoleGate::admin())?;
            let logs = match (location, user) {
                (Some(location), _) => client.activity_logs().by_location(&location).await,
                (None, Some(user)) => client.activity_logs().by_user(&user).await,
                (None, None) => bail!("pass --location or --user"),
            };
            paged(logs, page)
        }
        Command::Mail(MailCmd::Send { to, subject, body }) => {
            require(&client, "/mail", &RoleGate::admin())?;
            let request = EmailRequest {
                recipients: to,
                subject,
                body,
            };
            client.mail().send_emails(&request).await.map_err(report)?;
            Ok(json!({"message": format!("Sent to {} recipient(s)", request.recipients.len())}))
        }
        Command::Suggest { prompt, child } => {
            require(&client, "/suggestions", &RoleGate::staff())?;
            let request = SuggestionRequest { prompt, child_id: child };
            let suggestions = client.suggestions().generate(&request).await.map_err(report)?;
            Ok(json!({ "suggestions": suggestions }))
        }
        Command::Prefs(cmd) => prefs(&client, cmd),
    }
}

async fn children(client: &ApiClient, cmd: ChildrenCmd) -> Result<Value> {
    let session = require(client, "/children", &RoleGate::staff())?;
    match cmd {
        ChildrenCmd::List { location, page } => {
            let location = location_or_session(location, &session)?;
            paged(client.children().by_location(&location).await, page)
        }
        ChildrenCmd::Show { id } => to_json(&client.children().get(&id).await.map_err(report)?),
        ChildrenCmd::Delete { id } => {
            client.children().delete(&id).await.map_err(report)?;
            Ok(json!({"message": format!("Child {} deleted", id)}))
        }
    }
}

async fn media(client: &ApiClient, cmd: MediaCmd) -> Result<Value> {
    match cmd {
        MediaCmd::List { child, page } => {
            require(client, "/media", &RoleGate::any())?;
            paged(client.media().by_child(&child).await, page)
        }
        MediaCmd::Upload {
            child,
            file,
            caption,
            content_type,
        } => {
            require(client, "/media", &RoleGate::staff())?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("{} is not a file", file.display()))?;
            let upload = MediaUpload {
                child_id: child,
                content_type: content_type.unwrap_or_else(|| guess_content_type(&file).to_string()),
                file_name,
                bytes,
                caption,
            };
            to_json(&client.media().upload(upload).await.map_err(report)?)
        }
    }
}

fn prefs(client: &ApiClient, cmd: PrefsCmd) -> Result<Value> {
    let store = PreferencesStore::new(Arc::clone(client.session().storage()));
    match cmd {
        PrefsCmd::Show => to_json(&store.load()),
        PrefsCmd::Set {
            dark_mode,
            colorblind_mode,
            hand_mode,
        } => {
            let updated = store.update(|p| {
                if let Some(v) = dark_mode {
                    p.dark_mode = v;
                }
                if let Some(v) = colorblind_mode {
                    p.colorblind_mode = v;
                }
                if let Some(v) = hand_mode {
                    p.hand_mode = v;
                }
            })?;
            to_json(&updated)
        }
    }
}

/// Guard then gate, the same evaluation every protected page runs.
fn require(client: &ApiClient, route: &str, gate: &RoleGate) -> Result<Session> {
    match PageAccess::evaluate(&SessionGuard::default(), gate, client.session(), route) {
        PageAccess::Granted(Some(session)) => Ok(session),
        PageAccess::Granted(None) | PageAccess::Redirect(_) => bail!("not signed in; run `bb login` first"),
        PageAccess::Denied(session) => bail!("{} ({} accounts cannot open {})", UNAUTHORIZED_MESSAGE, session.account_type(), route),
    }
}

fn location_or_session(location: Option<String>, session: &Session) -> Result<String> {
    location
        .filter(|l| !l.trim().is_empty())
        .or_else(|| session.location_id().map(str::to_string))
        .ok_or_else(|| anyhow!("no --location given and the session has no locationID"))
}

/// One page of `items` plus its position.
pub fn page_of<T: Serialize>(items: &[T], page: PageArgs) -> Result<Value> {
    let paginator = Paginator::new(page.per_page);
    Ok(json!({
        "pagination": paginator.config(page.page, items.len()),
        "total": items.len(),
        "items": paginator.page(items, page.page),
    }))
}

fn paged<T: Serialize>(result: Result<Vec<T>, ClientError>, page: PageArgs) -> Result<Value> {
    page_of(&result.map_err(report)?, page)
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Flatten a client error into the message a user should see.
fn report(err: ClientError) -> anyhow::Error {
    anyhow!("{}: {}", err.kind(), err.user_message())
}

pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}
