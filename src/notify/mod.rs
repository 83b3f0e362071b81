//! Notification channel: hand the tracker log to a local mail client.

use crate::config::MailConfig;
use crate::errors::{AppError, AppResult};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

/// Something able to deliver the log file to a recipient.
pub trait Notifier {
    fn send(&self, recipient: &str, attachment: &Path) -> AppResult<()>;
}

/// Reject blank recipients and values that cannot be an address.
pub fn validate_recipient(recipient: &str) -> AppResult<&str> {
    let r = recipient.trim();
    if r.is_empty() {
        return Err(AppError::Notification("email address is required".into()));
    }
    if !r.contains('@') || r.starts_with('@') || r.ends_with('@') || r.contains(char::is_whitespace)
    {
        return Err(AppError::Notification(format!(
            "'{r}' is not a valid email address"
        )));
    }
    Ok(r)
}

/// Runs an external mail program, e.g. `mutt -s {subject} -a {attachment} -- {to}`.
pub struct CommandMailer {
    cfg: MailConfig,
}

impl CommandMailer {
    pub fn new(cfg: MailConfig) -> Self {
        Self { cfg }
    }

    /// Arguments with `{to}`, `{subject}` and `{attachment}` substituted.
    pub fn render_args(&self, recipient: &str, attachment: &Path) -> Vec<String> {
        let attachment = attachment.to_string_lossy();
        self.cfg
            .args
            .iter()
            .map(|a| {
                a.replace("{to}", recipient)
                    .replace("{subject}", &self.cfg.subject)
                    .replace("{attachment}", &attachment)
            })
            .collect()
    }
}

impl Notifier for CommandMailer {
    fn send(&self, recipient: &str, attachment: &Path) -> AppResult<()> {
        let recipient = validate_recipient(recipient)?;

        if !attachment.is_file() {
            return Err(AppError::Notification(format!(
                "log file not found: {}",
                attachment.display()
            )));
        }

        let mut child = Command::new(&self.cfg.program)
            .args(self.render_args(recipient, attachment))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| {
                AppError::Notification(format!("cannot start '{}': {e}", self.cfg.program))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // a client that ignores the body may close stdin early
            match stdin.write_all(self.cfg.body.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(AppError::Notification(format!(
                        "cannot write message body: {e}"
                    )));
                }
                _ => {}
            }
        }

        let status = child
            .wait()
            .map_err(|e| AppError::Notification(format!("mail client failed: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::Notification(format!(
                "'{}' exited with {}",
                self.cfg.program, status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn attachment(name: &str) -> PathBuf {
        let p = env::temp_dir().join(name);
        fs::write(&p, b"log").unwrap();
        p
    }

    fn mailer(program: &str, args: &[&str]) -> CommandMailer {
        CommandMailer::new(MailConfig {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            ..MailConfig::default()
        })
    }

    #[test]
    fn recipients_are_validated() {
        assert!(validate_recipient("ada@example.com").is_ok());
        assert_eq!(validate_recipient("  ada@example.com ").unwrap(), "ada@example.com");
        for bad in ["", "   ", "ada", "@example.com", "ada@", "a da@example.com"] {
            assert!(
                matches!(validate_recipient(bad), Err(AppError::Notification(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn placeholders_are_substituted() {
        let m = CommandMailer::new(MailConfig::default());
        let args = m.render_args("ada@example.com", Path::new("/tmp/log.xlsx"));
        assert_eq!(
            args,
            vec![
                "-s",
                "Daily Activity Log",
                "-a",
                "/tmp/log.xlsx",
                "--",
                "ada@example.com"
            ]
        );
    }

    #[test]
    fn missing_attachment_is_reported() {
        let m = mailer("true", &[]);
        let res = m.send("ada@example.com", Path::new("/definitely/not/here.xlsx"));
        assert!(matches!(res, Err(AppError::Notification(_))));
    }

    #[test]
    fn unknown_program_is_reported() {
        let file = attachment("lilotracker_unit_mail_unknown.xlsx");
        let m = mailer("lilotracker-no-such-mailer", &[]);
        assert!(matches!(
            m.send("ada@example.com", &file),
            Err(AppError::Notification(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_decides_success() {
        let file = attachment("lilotracker_unit_mail_status.xlsx");

        assert!(mailer("sh", &["-c", "cat > /dev/null"]).send("ada@example.com", &file).is_ok());
        assert!(matches!(
            mailer("sh", &["-c", "exit 3"]).send("ada@example.com", &file),
            Err(AppError::Notification(_))
        ));
    }

    struct RecordingNotifier {
        sent: RefCell<Vec<(String, PathBuf)>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, recipient: &str, attachment: &Path) -> AppResult<()> {
            let r = validate_recipient(recipient)?;
            self.sent
                .borrow_mut()
                .push((r.to_string(), attachment.to_path_buf()));
            Ok(())
        }
    }

    #[test]
    fn notifier_can_be_swapped() {
        let n = RecordingNotifier {
            sent: RefCell::new(Vec::new()),
        };
        let dyn_n: &dyn Notifier = &n;

        dyn_n.send("ada@example.com", Path::new("/tmp/a.xlsx")).unwrap();
        assert!(dyn_n.send("", Path::new("/tmp/a.xlsx")).is_err());

        assert_eq!(n.sent.borrow().len(), 1);
    }
}
