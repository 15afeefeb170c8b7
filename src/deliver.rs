//! Digest delivery: hand the rendered message to whatever sends it.
//!
//! The crate does not speak SMTP. A message goes to stdout, to a file, or
//! into the stdin of an operator-configured command such as `sendmail -t`,
//! which owns credentials, retries, and transport.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
};

use tracing::info;

const BOUNDARY: &str = "ddl-digest-alternative";

/// Delivery failures. Reported after the store has been saved.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("no recipient: pass --to, set DDL_TO_EMAIL, or set `to` under [digest] in the config")]
    MissingRecipient,

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// A rendered digest ready to send.
#[derive(Debug, Clone)]
pub struct Message {
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl Message {
    /// The message as a `multipart/alternative` MIME document.
    pub fn to_mime(&self) -> String {
        let mut out = String::new();
        if let Some(from) = &self.from {
            out.push_str(&format!("From: {from}\r\n"));
        }
        if let Some(to) = &self.to {
            out.push_str(&format!("To: {to}\r\n"));
        }
        out.push_str(&format!("Subject: {}\r\n", self.subject));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str(&format!(
            "Content-Type: multipart/alternative; boundary=\"{BOUNDARY}\"\r\n\r\n"
        ));
        for (content_type, body) in [("text/plain", &self.text), ("text/html", &self.html)] {
            out.push_str(&format!("--{BOUNDARY}\r\n"));
            out.push_str(&format!(
                "Content-Type: {content_type}; charset=utf-8\r\n\
                 Content-Transfer-Encoding: 8bit\r\n\r\n"
            ));
            out.push_str(&body.replace('\n', "\r\n"));
            out.push_str("\r\n");
        }
        out.push_str(&format!("--{BOUNDARY}--\r\n"));
        out
    }
}

/// Where a digest goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Print the subject and plain-text body.
    Stdout,
    /// Write the MIME message to a file.
    File(PathBuf),
    /// Pipe the MIME message into a command's stdin.
    Command { program: String, args: Vec<String> },
}

impl Delivery {
    /// Builds a command delivery from an argv list. `None` if the list is empty.
    pub fn command(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::Command {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        match self {
            Self::Stdout => {
                println!("Subject: {}\n", message.subject);
                print!("{}", message.text);
                Ok(())
            }
            Self::File(path) => {
                require_recipient(message)?;
                fs::write(path, message.to_mime()).map_err(|source| DeliveryError::Write {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "digest written");
                Ok(())
            }
            Self::Command { program, args } => {
                require_recipient(message)?;
                pipe(program, args, &message.to_mime())?;
                info!(%program, to = message.to.as_deref().unwrap_or_default(), "digest sent");
                Ok(())
            }
        }
    }
}

fn require_recipient(message: &Message) -> Result<(), DeliveryError> {
    match message.to.as_deref() {
        Some(to) if !to.trim().is_empty() => Ok(()),
        _ => Err(DeliveryError::MissingRecipient),
    }
}

/// Run `program` with `input` on stdin.
fn pipe(program: &str, args: &[String], input: &str) -> Result<(), DeliveryError> {
    let spawn_error = |source| DeliveryError::Spawn {
        program: program.to_string(),
        source,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).map_err(spawn_error)?;
    }

    let output = child.wait_with_output().map_err(spawn_error)?;
    if output.status.success() {
        Ok(())
    } else {
        Err(DeliveryError::Failed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn message(to: Option<&str>) -> Message {
        Message {
            from: Some("digest@example.com".into()),
            to: to.map(String::from),
            subject: "Daily DDL Digest".into(),
            text: "1 pending\n".into(),
            html: "<p>1 pending</p>\n".into(),
        }
    }

    #[test]
    fn mime_has_headers_and_both_parts() {
        let mime = message(Some("me@example.com")).to_mime();

        assert!(mime.starts_with("From: digest@example.com\r\nTo: me@example.com\r\n"));
        assert!(mime.contains("Subject: Daily DDL Digest\r\n"));
        assert!(mime.contains(
            "Content-Type: text/plain; charset=utf-8\r\n\
             Content-Transfer-Encoding: 8bit\r\n\r\n1 pending\r\n"
        ));
        assert_eq!(mime.matches("Content-Transfer-Encoding: 8bit\r\n").count(), 2);
        assert!(mime.contains("Content-Type: text/html; charset=utf-8"));
        assert!(mime.ends_with(&format!("--{BOUNDARY}--\r\n")));
    }

    #[test]
    fn command_from_argv() {
        let argv = vec!["sendmail".to_string(), "-t".to_string()];
        assert_eq!(
            Delivery::command(&argv),
            Some(Delivery::Command {
                program: "sendmail".into(),
                args: vec!["-t".into()],
            })
        );
        assert_eq!(Delivery::command(&[]), None);
    }

    #[test]
    fn file_delivery_writes_mime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("digest.eml");

        Delivery::File(path.clone())
            .send(&message(Some("me@example.com")))
            .unwrap();

        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("To: me@example.com"));
    }

    #[test]
    fn file_delivery_requires_recipient() {
        let dir = TempDir::new().unwrap();
        let err = Delivery::File(dir.path().join("digest.eml"))
            .send(&message(None))
            .unwrap_err();
        assert!(matches!(err, DeliveryError::MissingRecipient));
    }

    #[test]
    fn blank_recipient_is_missing() {
        let err = require_recipient(&message(Some("  "))).unwrap_err();
        assert!(matches!(err, DeliveryError::MissingRecipient));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let delivery = Delivery::Command {
            program: "ddl-digest-no-such-program".into(),
            args: vec![],
        };
        let err = delivery.send(&message(Some("me@example.com"))).unwrap_err();
        assert!(matches!(err, DeliveryError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn command_receives_message_on_stdin() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("captured.eml");
        let delivery = Delivery::Command {
            program: "sh".into(),
            args: vec!["-c".into(), format!("cat > '{}'", out.display())],
        };

        delivery.send(&message(Some("me@example.com"))).unwrap();

        let captured = fs::read_to_string(out).unwrap();
        assert!(captured.contains("Subject: Daily DDL Digest"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_stderr() {
        let delivery = Delivery::Command {
            program: "sh".into(),
            args: vec!["-c".into(), "cat >/dev/null; echo 'auth failed' >&2; exit 3".into()],
        };
        let err = delivery.send(&message(Some("me@example.com"))).unwrap_err();
        assert!(matches!(err, DeliveryError::Failed { ref stderr, .. } if stderr == "auth failed"));
    }
}
