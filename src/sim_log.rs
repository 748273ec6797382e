// Leveled progress logging for the optimizer and evaluator.
//
// Worker threads log concurrently, so every line goes through one lock
// before it reaches stdout. Level 0 is silent; level 1 gets sparse
// progress lines; level 2 adds warnings; higher levels get everything.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static LOG_SINK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Emit one line through the shared sink.
pub fn emit(line: &str) {
    let _guard = LOG_SINK.lock().unwrap();
    println!("{}", line);
}

/// Optimizer progress line, shown at log level >= 1.
pub fn progress(log_level: usize, line: &str) {
    if log_level >= 1 {
        emit(line);
    }
}

/// Recoverable problems (numeric failures, discarded samples), log level >= 2.
pub fn warn(log_level: usize, line: &str) {
    if log_level >= 2 {
        emit(&format!("warning: {}", line));
    }
}
