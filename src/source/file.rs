//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 本地或挂载存储上的文件源。

use super::{Fingerprint, SourceObject, SourceStream};
use crate::error::SourceError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::BufReader;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// 文件源对象
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SourceObject for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fingerprint(&self) -> Result<Option<Fingerprint>, SourceError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(Some(Fingerprint {
                len: meta.len(),
                modified: meta.modified().ok(),
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn open(&self) -> Result<SourceStream, SourceError> {
        let file = match tokio::fs::File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SourceError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        let size = file.metadata().await.ok().map(|m| m.len());

        Ok(SourceStream {
            reader: Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file)),
            size,
        })
    }
}
