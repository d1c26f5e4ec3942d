// Integration tests for the calamine backend; run with `--features calamine`.
#[cfg(feature = "calamine")]
mod read;
