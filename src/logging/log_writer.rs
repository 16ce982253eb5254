use anyhow::Context;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing_subscriber::fmt::MakeWriter;

enum LogTask {
    Write(usize, Vec<u8>),
    Flush(usize),
    AddFile(usize, File),
    Terminate(oneshot::Sender<()>),
}

pub struct Writer<'a> {
    id: usize,
    sender: &'a mpsc::Sender<LogTask>,
}

impl Writer<'_> {
    fn send(&self, task: LogTask) -> io::Result<()> {
        self.sender
            .try_send(task)
            .map_err(|_| io::Error::other("Failed to send log task"))
    }
}

impl Write for Writer<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.send(LogTask::Write(self.id, buf.to_vec()))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send(LogTask::Flush(self.id))
    }
}

pub struct FileWriter {
    id: usize,
    sender: mpsc::Sender<LogTask>,
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = Writer<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        Writer {
            id: self.id,
            sender: &self.sender,
        }
    }
}

/// Moves log file IO off the tasks that emit events.
///
/// Events are queued on a bounded channel and written by a background task,
/// a full queue drops the event instead of blocking the prompt loop.
pub struct LogWriter {
    next_id: usize,
    sender: mpsc::Sender<LogTask>,
}

impl LogWriter {
    pub fn new() -> (Self, JoinHandle<()>) {
        let (sender, mut tasks) = mpsc::channel::<LogTask>(128);
        let handle = tokio::spawn(async move {
            let mut files: HashMap<usize, File> = HashMap::new();
            let mut done = None;
            while let Some(task) = tasks.recv().await {
                match task {
                    LogTask::Write(id, buf) => {
                        let Some(file) = files.get_mut(&id) else {
                            continue;
                        };
                        if let Err(err) = file.write_all(&buf) {
                            eprintln!("Failed to write to log file: {}", err);
                        }
                    }
                    LogTask::Flush(id) => {
                        let Some(file) = files.get_mut(&id) else {
                            continue;
                        };
                        if let Err(err) = file.flush() {
                            eprintln!("Failed to flush log file: {}", err);
                        }
                    }
                    LogTask::AddFile(id, file) => {
                        files.insert(id, file);
                    }
                    LogTask::Terminate(ack) => {
                        done = Some(ack);
                        break;
                    }
                }
            }
            drop(tasks);
            for file in files.values_mut() {
                file.flush().ok();
            }
            if let Some(ack) = done {
                ack.send(()).ok();
            }
        });
        (Self { next_id: 0, sender }, handle)
    }

    pub fn create_file_writer(&mut self, path: impl AsRef<Path>) -> anyhow::Result<FileWriter> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file '{path:?}'"))?;
        self.next_id += 1;
        self.sender
            .try_send(LogTask::AddFile(self.next_id, file))
            .map_err(|_| io::Error::other("Failed to send log task"))?;
        Ok(FileWriter {
            id: self.next_id,
            sender: self.sender.clone(),
        })
    }

    /// Writes every event queued so far, flushes the files and stops the
    /// background task. Returns once the files are flushed, so the caller may
    /// exit the process right after. Later calls return immediately.
    pub async fn shutdown(&self) {
        let (ack, flushed) = oneshot::channel();
        if self.sender.send(LogTask::Terminate(ack)).await.is_err() {
            return;
        }
        flushed.await.ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_works() {
        let path = std::env::temp_dir().join(format!("pricewatch-{}.log", std::process::id()));
        std::fs::remove_file(&path).ok();
        let (mut log_writer, handle) = LogWriter::new();
        let file_writer = log_writer.create_file_writer(&path).unwrap();
        {
            let mut writer = file_writer.make_writer();
            writer.write_all(b"first line\n").unwrap();
            writer.write_all(b"second line\n").unwrap();
            writer.flush().unwrap();
        }
        log_writer.shutdown().await;
        handle.await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(content, "first line\nsecond line\n");
    }

    #[tokio::test]
    async fn test_shutdown_flushes_before_returning() {
        let path = std::env::temp_dir().join(format!(
            "pricewatch-shutdown-{}.log",
            std::process::id()
        ));
        std::fs::remove_file(&path).ok();
        let (mut log_writer, handle) = LogWriter::new();
        let file_writer = log_writer.create_file_writer(&path).unwrap();
        for line in ["Shutdown...\n", "last words\n"] {
            file_writer.make_writer().write_all(line.as_bytes()).unwrap();
        }
        // a signal exit never joins the writer task
        log_writer.shutdown().await;
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(content, "Shutdown...\nlast words\n");

        log_writer.shutdown().await;
        handle.await.unwrap();
        assert!(file_writer.make_writer().write_all(b"late\n").is_err());
    }
}
