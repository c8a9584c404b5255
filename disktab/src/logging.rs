use env_logger::Target;
use std::fs;
use std::path::PathBuf;

/// Initialise `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
///
/// With a log file, output is appended there. If the file cannot be opened
/// (permissions, readonly FS, etc.) logs fall back to stderr.
pub fn init_with(log_file: Option<PathBuf>) {
    let target = log_file
        .and_then(|path| {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).ok()?;
            }
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
        .map(|file| Target::Pipe(Box::new(file)))
        .unwrap_or(Target::Stderr);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    // RUST_LOG, when set, wins over the default level.
    builder.parse_default_env();
    builder.target(target);
    let _ = builder.try_init();
}
