//! Report delivery
//!
//! Delivery channels:
//! - console (stdout) when `console_override` is set
//! - push message through the `telegram-send` executable otherwise
//! - a copy of the full text in `capture_file`, when configured

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::config::ResolvedConfig;

/// Executable used for push messages
pub const PUSH_COMMAND: &str = "telegram-send";

/// Notification errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("push message failed: {0}")]
    Push(String),
}

/// Delivers a finished report
pub trait Notifier {
    fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// Prints to stdout
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", message)?;
        Ok(())
    }
}

/// Sends a push message via an external command
#[derive(Debug)]
pub struct PushNotifier {
    program: String,
}

impl Default for PushNotifier {
    fn default() -> Self {
        Self::new(PUSH_COMMAND)
    }
}

impl PushNotifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Notifier for PushNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let output = Command::new(&self.program)
            .arg(message)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| NotifyError::Push(format!("failed to spawn {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(NotifyError::Push(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end()
            )));
        }
        Ok(())
    }
}

/// Writes the report to a file
#[derive(Debug)]
pub struct CaptureFile {
    pub path: PathBuf,
}

impl Notifier for CaptureFile {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        fs::write(&self.path, message)?;
        debug!(path = %self.path.display(), "report captured");
        Ok(())
    }
}

/// Delivery plan for a resolved config
pub struct Delivery {
    pub primary: Box<dyn Notifier>,
    pub capture: Option<CaptureFile>,
}

impl Delivery {
    /// Pick channels from the config
    pub fn for_config(config: &ResolvedConfig) -> Self {
        let primary: Box<dyn Notifier> = if config.console_override {
            Box::new(ConsoleNotifier)
        } else {
            Box::new(PushNotifier::default())
        };
        let capture = config
            .capture_file
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| CaptureFile {
                path: PathBuf::from(p),
            });
        Self { primary, capture }
    }

    /// Keep the capture file but send through `primary` instead
    pub fn with_primary(self, primary: Box<dyn Notifier>) -> Self {
        Self {
            primary,
            capture: self.capture,
        }
    }

    /// Capture the full text (if configured) and send `message`.
    ///
    /// The primary channel is always tried. A primary failure is returned
    /// ahead of a capture failure.
    pub fn deliver(&self, message: &str, full_text: &str) -> Result<(), NotifyError> {
        let captured = match &self.capture {
            Some(capture) => capture.send(full_text),
            None => Ok(()),
        };
        let sent = self.primary.send(message);

        match (sent, captured) {
            (Err(e), Err(capture_err)) => {
                warn!("report capture failed: {}", capture_err);
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), captured) => captured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::tempdir;

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Notifier for Recorder {
        fn send(&self, message: &str) -> Result<(), NotifyError> {
            self.0.borrow_mut().push(message.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_capture_then_send() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let sent = Rc::new(RefCell::new(Vec::new()));
        let delivery = Delivery {
            primary: Box::new(Recorder(sent.clone())),
            capture: Some(CaptureFile { path: path.clone() }),
        };

        delivery.deliver("short", "long detail").unwrap();
        assert_eq!(*sent.borrow(), vec!["short".to_string()]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "long detail");
    }

    #[test]
    fn test_capture_failure_still_sends() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let delivery = Delivery {
            primary: Box::new(Recorder(sent.clone())),
            capture: Some(CaptureFile {
                path: PathBuf::from("/nonexistent/rsyncr-test/out.txt"),
            }),
        };

        let err = delivery.deliver("short", "long detail").unwrap_err();
        assert!(matches!(err, NotifyError::Io(_)));
        assert_eq!(*sent.borrow(), vec!["short".to_string()]);
    }

    #[test]
    fn test_primary_error_wins() {
        let delivery = Delivery {
            primary: Box::new(PushNotifier::new("/nonexistent/telegram-send-test")),
            capture: Some(CaptureFile {
                path: PathBuf::from("/nonexistent/rsyncr-test/out.txt"),
            }),
        };
        let err = delivery.deliver("short", "long").unwrap_err();
        assert!(matches!(err, NotifyError::Push(_)));
    }

    #[test]
    fn test_with_primary_keeps_capture() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let sent = Rc::new(RefCell::new(Vec::new()));
        let delivery = Delivery {
            primary: Box::new(ConsoleNotifier),
            capture: Some(CaptureFile { path: path.clone() }),
        }
        .with_primary(Box::new(Recorder(sent.clone())));

        delivery.deliver("short", "long").unwrap();
        assert_eq!(*sent.borrow(), vec!["short".to_string()]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "long");
    }

    #[test]
    fn test_push_missing_program() {
        let notifier = PushNotifier::new("/nonexistent/telegram-send-test");
        assert!(matches!(notifier.send("hi"), Err(NotifyError::Push(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_push_nonzero_exit() {
        let notifier = PushNotifier::new("false");
        let err = notifier.send("hi").unwrap_err();
        assert!(err.to_string().contains("false exited"));
    }
}
