//! JSON as a configuration source.
//!
//! A [`JsonSource`] is configured with exactly one input (bytes, a string, a
//! file path or a reader), acquires the document when parsed, and binds it
//! onto a record.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use tracing::debug;

use crate::buffered_input::read_to_end_with_limit;
use crate::error::Error;
use crate::locate::Document;
use crate::options::Options;
use crate::path::JsonPath;
use crate::record::{bind_record, Record};

/// A configuration source that can populate records.
pub trait Source {
    /// Tag namespace this source reads its keys from.
    fn key_tag(&self) -> &str;

    /// Populate `record` from the source.
    ///
    /// Returns `true` when at least one field was set.
    fn parse<R: Record>(&mut self, record: &mut R) -> Result<bool, Error>;
}

/// JSON source builder.
///
/// ```rust
/// use json_source::{record, JsonSource, Source};
///
/// #[derive(Default)]
/// struct Config {
///     name: String,
/// }
/// record!(Config { pub name(json = "name") });
///
/// let mut config = Config::default();
/// let loaded = JsonSource::new()
///     .string(r#"{"name": "demo"}"#)
///     .parse(&mut config)
///     .unwrap();
/// assert!(loaded);
/// assert_eq!(config.name, "demo");
/// ```
#[derive(Default)]
pub struct JsonSource {
    bytes: Option<Vec<u8>>,
    path: Option<PathBuf>,
    reader: Option<Box<dyn Read + Send>>,
    must: bool,
    options: Options,
}

impl fmt::Debug for JsonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSource")
            .field("bytes", &self.bytes.as_ref().map(Vec::len))
            .field("path", &self.path)
            .field("reader", &self.reader.as_ref().map(|_| ".."))
            .field("must", &self.must)
            .field("options", &self.options)
            .finish()
    }
}

impl JsonSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the document from `bytes`, replacing earlier bytes or strings.
    /// Empty content counts as no input.
    pub fn bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        self.bytes = (!bytes.is_empty()).then_some(bytes);
        self
    }

    /// Read the document from a string. Same slot as [`JsonSource::bytes`].
    pub fn string(self, text: impl Into<String>) -> Self {
        self.bytes(text.into().into_bytes())
    }

    /// Read the document from a file, replacing an earlier path. An empty
    /// path counts as no input.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.path = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    /// Read the document from `reader`, replacing an earlier reader. The
    /// reader is consumed and dropped by the first [`Source::parse`].
    pub fn reader(mut self, reader: impl Read + Send + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    /// Fail with [`Error::SourceNotFound`] instead of silently skipping a
    /// missing input.
    pub fn must(mut self) -> Self {
        self.must = true;
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    fn verify(&self) -> Result<(), Error> {
        let count = [self.bytes.is_some(), self.path.is_some(), self.reader.is_some()]
            .into_iter()
            .filter(|&configured| configured)
            .count();
        match count {
            0 => Err(Error::NoDataSource),
            1 => Ok(()),
            count => Err(Error::MultipleDataSources { count }),
        }
    }

    /// Acquire the document. `Ok(None)` means the input was not found and the
    /// source is optional.
    fn acquire(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let limit = self.options.input_limit;
        let (source, result) = if let Some(bytes) = &self.bytes {
            return Ok(Some(bytes.clone()));
        } else if let Some(path) = &self.path {
            let read = File::open(path).and_then(|file| read_to_end_with_limit(file, limit));
            (path.display().to_string(), read)
        } else if let Some(reader) = self.reader.take() {
            ("reader".to_owned(), read_to_end_with_limit(reader, limit))
        } else {
            return Err(Error::NoDataSource);
        };
        match result {
            Ok(bytes) => {
                debug!(len = bytes.len(), "json source input acquired");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if self.must {
                    Err(Error::SourceNotFound { source })
                } else {
                    debug!(%source, "json source not found, skipping");
                    Ok(None)
                }
            }
            Err(cause) => Err(Error::IOError { cause }),
        }
    }
}

impl Source for JsonSource {
    fn key_tag(&self) -> &str {
        &self.options.key_tag
    }

    fn parse<R: Record>(&mut self, record: &mut R) -> Result<bool, Error> {
        self.verify()?;
        let Some(input) = self.acquire()? else {
            return Ok(false);
        };
        let document = Document::new(&input, &self.options);
        bind_record(record, document, &self.options, JsonPath::root())
    }
}
