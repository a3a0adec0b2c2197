use std::fs::create_dir_all;
use std::io;
use std::path::PathBuf;

/// `~/.dframe`.
pub fn dframe_dir() -> io::Result<PathBuf> {
    let dir = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "where's your home dir?"))?
        .join(".dframe");

    create_dir_all(&dir)?;
    Ok(dir)
}

pub fn log_file_path(name: &str) -> io::Result<PathBuf> {
    let log_dir = dframe_dir()?.join("log");
    create_dir_all(&log_dir)?;
    Ok(log_dir.join(&format!("{}.log", name)))
}
