//! CLI interface for the digest.
//!
//! Built for a scheduler first and a human second. Each subcommand is
//! non-interactive. Output goes to stdout and logs to stderr.
//!
//! - `ddl run`: the scheduled job (generate, reconcile, save, deliver).
//! - `ddl generate`: the term's assignments as JSON.
//! - `ddl list`: what the store currently holds.
//! - `ddl complete|reopen <id>`: flip a task's completion flag in the store.
//!
//! Task ids accept a full id or an unambiguous prefix.

mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jiff::{Timestamp, Zoned, civil::Date, tz::TimeZone};
use tracing::info;

use crate::calendar::Calendar;
use crate::config::Config;
use crate::deliver::{Delivery, Message};
use crate::digest::Digest;
use crate::model::CENTRAL;
use crate::recipient::resolve_recipient;
use crate::reconcile::reconcile;
use crate::storage::Store;

use format::{format_stats, format_task};

/// Daily assignment deadline digest.
#[derive(Debug, Parser)]
#[command(name = "ddl", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Config file (default: ~/.ddl-digest/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Task store path. Overrides `store` in the config.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Calendar file. Overrides `calendar` in the config; the built-in term is used otherwise.
    #[arg(long, global = true)]
    calendar: Option<PathBuf>,

    /// Log at debug level (ignored when RUST_LOG is set).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Scheduled run:
  ddl run                      save tasks.json, send the digest
  ddl run --dry-run            print the digest, leave the store alone
  ddl run --out digest.eml     write the MIME message to a file

After finishing something:
  ddl complete cs_128__mp_3
  ddl complete bioe            (any unambiguous prefix)"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate, reconcile against the store, save it, and deliver the digest.
    ///
    /// The store is saved before delivery. A delivery failure still exits
    /// non-zero, but the saved store stands.
    Run {
        /// Build the digest as of the start of this day (YYYY-MM-DD, Central Time).
        #[arg(long)]
        today: Option<Date>,

        /// Print the digest to stdout and don't write the store.
        #[arg(long)]
        dry_run: bool,

        /// Recipient. Falls back to DDL_TO_EMAIL, then the config.
        #[arg(long)]
        to: Option<String>,

        /// Write the MIME message to this file instead of running the delivery command.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the term's generated assignments as JSON.
    Generate,

    /// List tasks in the store.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,

        /// Print JSON instead of one line per task.
        #[arg(long)]
        json: bool,
    },

    /// Mark a stored task completed.
    Complete {
        /// Task id or unambiguous prefix.
        id: String,
    },

    /// Mark a stored task incomplete again.
    Reopen {
        /// Task id or unambiguous prefix.
        id: String,
    },
}

/// Settings resolved from flags and the config file.
struct Context {
    config: Config,
    store: Store,
    calendar: Option<PathBuf>,
}

/// Run the CLI, returning an error message on failure.
pub fn run(cli: Cli) -> Result<(), String> {
    let config = Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let store = Store::new(cli.store.unwrap_or_else(|| config.store.clone()));
    let calendar = cli.calendar.or_else(|| config.calendar.clone());
    let ctx = Context {
        config,
        store,
        calendar,
    };

    match cli.command {
        Command::Run {
            today,
            dry_run,
            to,
            out,
        } => cmd_run(&ctx, today, dry_run, to.as_deref(), out),
        Command::Generate => cmd_generate(&ctx),
        Command::List { all, json } => cmd_list(&ctx, all, json),
        Command::Complete { id } => cmd_set_completed(&ctx, &id, true),
        Command::Reopen { id } => cmd_set_completed(&ctx, &id, false),
    }
}

fn load_calendar(ctx: &Context) -> Result<Calendar, String> {
    let calendar = match &ctx.calendar {
        Some(path) => Calendar::load(path),
        None => Calendar::builtin(),
    };
    calendar.map_err(|e| format!("calendar error: {e}"))
}

fn central() -> Result<TimeZone, String> {
    TimeZone::get(CENTRAL).map_err(|e| format!("failed to load time zone {CENTRAL}: {e}"))
}

/// The digest's "now": the start of `today` if pinned, otherwise the current moment.
fn now_central(today: Option<Date>) -> Result<Zoned, String> {
    let tz = central()?;
    match today {
        Some(date) => date
            .to_zoned(tz)
            .map_err(|e| format!("invalid --today {date}: {e}")),
        None => Ok(Timestamp::now().to_zoned(tz)),
    }
}

fn cmd_run(
    ctx: &Context,
    today: Option<Date>,
    dry_run: bool,
    to: Option<&str>,
    out: Option<PathBuf>,
) -> Result<(), String> {
    // Configuration errors abort here, before the store is touched.
    let calendar = load_calendar(ctx)?;
    let generated = calendar
        .generate()
        .map_err(|e| format!("calendar error: {e}"))?;
    info!(term = %calendar.term.name, count = generated.len(), "generated assignments");

    let previous = ctx.store.load_or_empty();
    let reconciliation = reconcile(&generated, &previous);
    info!(
        "reconciled: {}",
        format_stats(&reconciliation.stats)
    );

    if dry_run {
        info!("dry run, store not written");
    } else {
        ctx.store
            .save(&reconciliation.updated)
            .map_err(|e| format!("failed to save store: {e}"))?;
        info!(
            path = %ctx.store.path().display(),
            count = reconciliation.updated.len(),
            "store saved"
        );
    }

    let digest = Digest::build(reconciliation.to_report, now_central(today)?);
    if digest.is_empty() {
        info!("nothing pending, skipping digest");
        return Ok(());
    }

    let dashboard_url = ctx.config.digest.dashboard_url.as_deref();
    let message = Message {
        from: ctx.config.digest.from.clone(),
        to: resolve_recipient(to, ctx.config.digest.to.as_deref()),
        subject: digest.subject(),
        text: digest.render_text(dashboard_url),
        html: digest.render_html(dashboard_url),
    };

    let delivery = if dry_run {
        Delivery::Stdout
    } else if let Some(path) = out {
        Delivery::File(path)
    } else {
        Delivery::command(&ctx.config.delivery.command).unwrap_or(Delivery::Stdout)
    };

    info!(
        pending = digest.tasks.len(),
        monday = digest.is_monday,
        "delivering digest"
    );
    delivery.send(&message).map_err(|e| {
        if dry_run {
            format!("delivery failed: {e}")
        } else {
            format!("store saved, but delivery failed: {e}")
        }
    })
}

fn cmd_generate(ctx: &Context) -> Result<(), String> {
    let assignments = load_calendar(ctx)?
        .generate()
        .map_err(|e| format!("calendar error: {e}"))?;

    let json = serde_json::to_string_pretty(&assignments)
        .map_err(|e| format!("failed to serialize assignments: {e}"))?;
    println!("{json}");
    Ok(())
}

fn cmd_list(ctx: &Context, all: bool, json: bool) -> Result<(), String> {
    let tasks: Vec<_> = ctx
        .store
        .load()
        .map_err(|e| format!("failed to load store: {e}"))?
        .into_iter()
        .filter(|t| all || !t.completed)
        .collect();

    if json {
        let json = serde_json::to_string_pretty(&tasks)
            .map_err(|e| format!("failed to serialize tasks: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks");
        return Ok(());
    }

    let tz = central()?;
    for task in &tasks {
        println!("{}", format_task(task, &tz));
    }
    Ok(())
}

fn cmd_set_completed(ctx: &Context, reference: &str, completed: bool) -> Result<(), String> {
    let task = ctx
        .store
        .set_completed(reference, completed)
        .map_err(|e| format!("failed to update task: {e}"))?;

    let state = if completed { "completed" } else { "incomplete" };
    eprintln!("Marked {} {state}: {} {}", task.id, task.course, task.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use jiff::civil;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from([
            "ddl",
            "--store",
            "site/tasks.json",
            "run",
            "--today",
            "2025-01-27",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.store, Some(PathBuf::from("site/tasks.json")));
        match cli.command {
            Command::Run { today, dry_run, .. } => {
                assert_eq!(today, Some(civil::date(2025, 1, 27)));
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_today() {
        assert!(Cli::try_parse_from(["ddl", "run", "--today", "01/27/2025"]).is_err());
    }

    #[test]
    fn pinned_today_starts_at_midnight_central() {
        let now = now_central(Some(civil::date(2025, 1, 27))).unwrap();
        assert_eq!(now.date(), civil::date(2025, 1, 27));
        assert_eq!(now.time(), civil::time(0, 0, 0, 0));
        assert_eq!(now.time_zone().iana_name(), Some(CENTRAL));
    }

    mod run {
        use tempfile::TempDir;

        use super::*;
        use crate::model::Task;

        fn context(dir: &TempDir) -> Context {
            Context {
                config: Config::default(),
                store: Store::new(dir.path().join("tasks.json")),
                calendar: None,
            }
        }

        #[test]
        fn run_writes_store_from_builtin_calendar() {
            let dir = TempDir::new().unwrap();
            let ctx = context(&dir);
            let out = dir.path().join("digest.eml");

            cmd_run(
                &ctx,
                Some(civil::date(2025, 1, 27)),
                false,
                Some("me@example.com"),
                Some(out.clone()),
            )
            .unwrap();

            let stored = ctx.store.load().unwrap();
            assert_eq!(stored.len(), Calendar::builtin().unwrap().generate().unwrap().len());
            assert!(stored.iter().all(|t| !t.completed));

            let mime = std::fs::read_to_string(out).unwrap();
            assert!(mime.contains("Subject: Monday reminder: BioE 210 due today!"));
        }

        #[test]
        fn rerun_preserves_completion() {
            let dir = TempDir::new().unwrap();
            let ctx = context(&dir);
            let out = dir.path().join("digest.eml");
            let today = Some(civil::date(2025, 2, 4));

            cmd_run(&ctx, today, false, Some("me@example.com"), Some(out.clone())).unwrap();
            let marked = ctx.store.set_completed("cs_173__hw_1", true).unwrap();
            assert!(marked.completed);

            cmd_run(&ctx, today, false, Some("me@example.com"), Some(out)).unwrap();
            let stored: Vec<Task> = ctx.store.load().unwrap();
            let hw1 = stored.iter().find(|t| t.id == "cs_173__hw_1").unwrap();
            assert!(hw1.completed);
        }

        #[test]
        fn dry_run_leaves_store_untouched() {
            let dir = TempDir::new().unwrap();
            let ctx = context(&dir);

            cmd_run(&ctx, Some(civil::date(2025, 2, 4)), true, None, None).unwrap();
            assert!(!ctx.store.path().exists());
        }

        #[cfg(unix)]
        #[test]
        fn delivery_failure_still_saves_store() {
            let dir = TempDir::new().unwrap();
            let mut ctx = context(&dir);
            ctx.config.delivery.command = vec![
                "sh".into(),
                "-c".into(),
                "cat >/dev/null; echo 'relay down' >&2; exit 1".into(),
            ];

            let err = cmd_run(
                &ctx,
                Some(civil::date(2025, 2, 4)),
                false,
                Some("me@example.com"),
                None,
            )
            .unwrap_err();

            assert!(err.starts_with("store saved, but delivery failed"));
            assert!(err.contains("relay down"));
            assert!(!ctx.store.load().unwrap().is_empty());
        }

        #[test]
        fn store_without_kind_keeps_completion() {
            let dir = TempDir::new().unwrap();
            let ctx = context(&dir);
            std::fs::write(
                ctx.store.path(),
                r#"[{"id":"cs_173__hw_1","title":"HW 1","course":"CS 173",
                    "platform":"PrairieLearn","due_at":"2025-01-27T23:59:00-06:00",
                    "completed":true}]"#,
            )
            .unwrap();

            cmd_run(
                &ctx,
                Some(civil::date(2025, 2, 4)),
                false,
                Some("me@example.com"),
                Some(dir.path().join("digest.eml")),
            )
            .unwrap();

            let stored = ctx.store.load().unwrap();
            let hw1 = stored.iter().find(|t| t.id == "cs_173__hw_1").unwrap();
            assert!(hw1.completed);
        }

        #[test]
        fn corrupt_store_is_replaced() {
            let dir = TempDir::new().unwrap();
            let ctx = context(&dir);
            std::fs::write(ctx.store.path(), "not json at all").unwrap();

            cmd_run(
                &ctx,
                Some(civil::date(2025, 2, 4)),
                false,
                Some("me@example.com"),
                Some(dir.path().join("digest.eml")),
            )
            .unwrap();

            assert!(!ctx.store.load().unwrap().is_empty());
        }

        #[test]
        fn bad_calendar_aborts_before_store_write() {
            let dir = TempDir::new().unwrap();
            let calendar = dir.path().join("bad.toml");
            std::fs::write(
                &calendar,
                "[term]\nname = \"Bad\"\nyear = 2025\nstart = \"01-21\"\nend = \"02-30\"\n",
            )
            .unwrap();
            let ctx = Context {
                calendar: Some(calendar),
                ..context(&dir)
            };

            let err = cmd_run(&ctx, None, false, None, None).unwrap_err();
            assert!(err.starts_with("calendar error"));
            assert!(!ctx.store.path().exists());
        }
    }
}
