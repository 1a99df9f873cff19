use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

/// Byte-stream access keyed by a logical, `/`-separated path.
pub trait FileSystem {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read>>;
    fn create(&self, path: &str) -> io::Result<Box<dyn Write>>;
}

/// Host file system rooted at a directory.
#[derive(Clone, Debug)]
pub struct StdFileSystem {
    root: PathBuf,
}

impl StdFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl Default for StdFileSystem {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileSystem for StdFileSystem {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create(&self, path: &str) -> io::Result<Box<dyn Write>> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Box::new(BufWriter::new(File::create(full)?)))
    }
}
