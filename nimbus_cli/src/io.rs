use anyhow::{Context, Result};
use std::{
    fmt::Display,
    fs::File,
    io::{self, Stdout, Write, stdout},
};

/// Output path given on the command line, `-` is standard output
#[derive(Debug, Clone)]
pub enum FileOrStdout {
    FilePath(String),
    Stdout,
}

impl Display for FileOrStdout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => write!(f, "-"),
            Self::FilePath(path) => write!(f, "{path}"),
        }
    }
}

impl From<String> for FileOrStdout {
    fn from(value: String) -> Self {
        if value == "-" {
            Self::Stdout
        } else {
            Self::FilePath(value)
        }
    }
}

impl FileOrStdout {
    pub fn create(&self) -> io::Result<FileOrStdoutWriter> {
        match self {
            Self::FilePath(path) => Ok(FileOrStdoutWriter::File(File::create(path)?)),
            Self::Stdout => Ok(FileOrStdoutWriter::Stdout(stdout())),
        }
    }
}

pub enum FileOrStdoutWriter {
    File(File),
    Stdout(Stdout),
}

impl Write for FileOrStdoutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(f) => f.write(buf),
            Self::Stdout(fd) => fd.lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(f) => f.flush(),
            Self::Stdout(fd) => fd.lock().flush(),
        }
    }
}

/// Write `value` as a single JSON line
pub fn write_json_line<W, T>(output: &mut W, value: &T) -> Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::ser::to_writer(&mut *output, value).context("Could not write jsonl line")?;
    output
        .write_all(b"\n")
        .context("Could not write jsonl line")?;
    Ok(())
}
