pub mod watch_progress;
