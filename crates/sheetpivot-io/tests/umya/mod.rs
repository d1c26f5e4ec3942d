// Integration tests for the umya backend; run with `--features umya`.
#[cfg(feature = "umya")]
mod save;
#[cfg(feature = "umya")]
mod styling;
