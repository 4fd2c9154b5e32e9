use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};

const DEFAULT_FILTER: &str = "ondot=info";

/// Route `log` records to `path`. The terminal belongs to the TUI, so nothing
/// is written to stdout or stderr. Filter comes from `RUST_LOG`.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}][{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.module_path().unwrap_or("<unknown>"),
                record.args()
            )
        });

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
    Ok(())
}
