use crate::services::{ElasticError, LineSource};
use std::path::Path;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Errors from bulk or line-oriented record sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Index source error: {0}")]
    Elastic(#[from] ElasticError),
}

/// Line-oriented reader over a JSON-lines dataset file
///
/// Feeds the ingestion relay one logical record per line.
pub struct FileLineSource {
    lines: Lines<BufReader<File>>,
}

impl FileLineSource {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let file = File::open(path).await?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }
}

impl LineSource for FileLineSource {
    async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        Ok(self.lines.next_line().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LineSource;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_lines_in_order() {
        let mut file = tempfile_path();
        writeln!(file.1, "{{\"business_id\": \"a\"}}").unwrap();
        writeln!(file.1, "{{\"business_id\": \"b\"}}").unwrap();
        file.1.flush().unwrap();

        let mut source = FileLineSource::open(&file.0).await.unwrap();
        assert_eq!(
            source.next_line().await.unwrap().as_deref(),
            Some("{\"business_id\": \"a\"}")
        );
        assert_eq!(
            source.next_line().await.unwrap().as_deref(),
            Some("{\"business_id\": \"b\"}")
        );
        assert_eq!(source.next_line().await.unwrap(), None);

        std::fs::remove_file(&file.0).ok();
    }

    #[tokio::test]
    async fn test_open_missing_file_errors() {
        let result = FileLineSource::open("/nonexistent/records.json").await;
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    fn tempfile_path() -> (std::path::PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!(
            "yelp-reco-test-{}-{:?}.jsonl",
            std::process::id(),
            std::thread::current().id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
