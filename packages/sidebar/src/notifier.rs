//! User-facing notifications

use std::io::Write;

/// Shows a message to the user and returns once it has been delivered.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes every notification as one line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{message}").and_then(|()| stdout.flush()) {
            tracing::error!("Failed to deliver notification {:?}: {}", message, e);
        }
    }
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_notifier() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let notifier = move |message: &str| sink.lock().unwrap().push(message.to_string());

        notifier.notify("Room created: !a:x");

        assert_eq!(*seen.lock().unwrap(), vec!["Room created: !a:x".to_string()]);
    }
}
