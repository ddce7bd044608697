use std::{env, path::PathBuf, time::Duration};

use bb_cli::cli::{ChildrenCmd, Cli, Command, LogsArgs, PrefsCmd, RelationshipsCmd};
use bb_client::StorageType;
use bb_types::{auth::AccountType, pagination::DEFAULT_PAGE_SIZE, web::HandMode};
use clap::Parser;
use serial_test::serial;

fn parse(argv: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("bb").chain(argv.iter().copied()))
}

fn clear_env() {
    unsafe {
        env::remove_var("BB_API_ORIGIN");
        env::remove_var("BB_API_TIMEOUT_SECS");
        env::remove_var("BB_STORAGE_PATH");
        env::remove_var("BB_PASSWORD");
    }
}

#[test]
#[serial]
fn flags_override_environment() {
    clear_env();
    unsafe {
        env::set_var("BB_API_ORIGIN", "https://env.example");
        env::set_var("BB_API_TIMEOUT_SECS", "30");
    }

    let cli = parse(&["--origin", "http://localhost:4000", "whoami", "--storage", "/tmp/bb/s.json"]).unwrap();
    let config = cli.client_config().unwrap();
    assert_eq!(config.origin.as_str(), "http://localhost:4000/");
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    assert_eq!(config.storage, StorageType::File(PathBuf::from("/tmp/bb/s.json")));

    let cli = parse(&["whoami"]).unwrap();
    assert_eq!(cli.client_config().unwrap().origin.as_str(), "https://env.example/");

    let cli = parse(&["--timeout", "0", "whoami"]).unwrap();
    assert!(cli.client_config().is_err());
    clear_env();
}

#[test]
#[serial]
fn login_password_can_come_from_env() {
    clear_env();
    assert!(parse(&["login", "--email", "a@b.test"]).is_err());

    unsafe {
        env::set_var("BB_PASSWORD", "from-env");
    }
    match parse(&["login", "--email", "a@b.test"]).unwrap().cmd {
        Command::Login { email, password } => {
            assert_eq!(email, "a@b.test");
            assert_eq!(password, "from-env");
        }
        other => panic!("unexpected {:?}", other),
    }
    clear_env();
}

#[test]
fn signup_parses_account_type_case_insensitively() {
    let cli = parse(&[
        "signup",
        "--email",
        "new@daycare.test",
        "--password",
        "long-enough",
        "--first-name",
        "New",
        "--last-name",
        "Staff",
        "--account-type",
        "STAFF",
    ])
    .unwrap();
    match cli.cmd {
        Command::Signup { account_type, location, .. } => {
            assert_eq!(account_type, AccountType::Staff);
            assert_eq!(location, None);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(parse(&["signup", "--email", "x@y.z", "--password", "p", "--first-name", "a", "--last-name", "b", "--account-type", "janitor"]).is_err());
}

#[test]
fn list_commands_take_page_arguments() {
    match parse(&["children", "list", "--page", "3", "--per-page", "5"]).unwrap().cmd {
        Command::Children(ChildrenCmd::List { location, page }) => {
            assert_eq!(location, None);
            assert_eq!((page.page, page.per_page), (3, 5));
        }
        other => panic!("unexpected {:?}", other),
    }
    match parse(&["children", "list", "--location", "L2"]).unwrap().cmd {
        Command::Children(ChildrenCmd::List { location, page }) => {
            assert_eq!(location.as_deref(), Some("L2"));
            assert_eq!((page.page, page.per_page), (1, DEFAULT_PAGE_SIZE));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(parse(&["meal-plans", "list"]).is_ok());
    assert!(parse(&["children", "show", "42"]).is_ok());
}

#[test]
fn exactly_one_filter_for_relationships_and_logs() {
    assert!(parse(&["relationships", "list"]).is_err());
    assert!(parse(&["relationships", "list", "--child", "c", "--parent", "p"]).is_err());
    assert!(matches!(
        parse(&["relationships", "list", "--parent", "p"]).unwrap().cmd,
        Command::Relationships(RelationshipsCmd::List { child: None, parent: Some(_), .. })
    ));

    assert!(parse(&["logs"]).is_err());
    assert!(matches!(
        parse(&["logs", "--user", "u1"]).unwrap().cmd,
        Command::Logs(LogsArgs { location: None, user: Some(_), .. })
    ));
}

#[test]
fn mail_needs_a_recipient() {
    assert!(parse(&["mail", "send", "--subject", "s", "--body", "b"]).is_err());
    assert!(parse(&["mail", "send", "--to", "a@b.test", "--to", "c@d.test", "--subject", "s", "--body", "b"]).is_ok());
}

#[test]
fn prefs_set_takes_explicit_values() {
    match parse(&["prefs", "set", "--dark-mode", "true", "--hand-mode", "LEFT"]).unwrap().cmd {
        Command::Prefs(PrefsCmd::Set {
            dark_mode,
            colorblind_mode,
            hand_mode,
        }) => {
            assert_eq!(dark_mode, Some(true));
            assert_eq!(colorblind_mode, None);
            assert_eq!(hand_mode, Some(HandMode::Left));
        }
        other => panic!("unexpected {:?}", other),
    }
}
