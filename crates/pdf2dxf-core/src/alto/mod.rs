//! Illustrated page lookup in ALTO page metadata.
//!
//! The extractor describes each PDF page as an ALTO `Page` element with
//! `WIDTH` and `HEIGHT` attributes in points. Pages that contain vector
//! graphics carry an `Illustration` element whose `FILEID` names the
//! extracted vector file.
//!
//! [`IllustrationLocator`] streams the document: descriptors are produced as
//! the reader reaches them, so pages are reported in document order without
//! loading the whole tree.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::{debug, warn};

use crate::error::MetadataError;
use crate::models::PageDescriptor;
use crate::models::config::IllustrationSelection;

/// Namespace prefix shared by every ALTO schema version.
pub const ALTO_NAMESPACE_PREFIX: &str = "http://www.loc.gov/standards/alto/";

/// Stream the illustrated pages of a metadata document, first illustration only.
pub fn locate<R: BufRead>(reader: R) -> IllustrationLocator<R> {
    IllustrationLocator::new(reader, IllustrationSelection::First)
}

/// Iterator over the illustrated pages of an ALTO document.
///
/// Pages without size attributes, or with sizes that are not positive
/// numbers, are logged and skipped. A malformed document yields a single
/// error and ends the sequence.
pub struct IllustrationLocator<R> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    selection: IllustrationSelection,
    page: Option<OpenPage>,
    pages_seen: usize,
    done: bool,
}

struct OpenPage {
    number: usize,
    width: Option<String>,
    height: Option<String>,
    illustrations: usize,
    rejected: bool,
}

enum Step {
    PageStart {
        width: Option<String>,
        height: Option<String>,
        empty: bool,
    },
    PageEnd,
    Illustration {
        file_id: Option<String>,
    },
    Eof,
    Skip,
}

impl IllustrationLocator<BufReader<File>> {
    /// Open a metadata document on disk.
    pub fn from_file(path: &Path, selection: IllustrationSelection) -> Result<Self, MetadataError> {
        debug!("Parsing metadata {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), selection))
    }
}

impl<R: BufRead> IllustrationLocator<R> {
    pub fn new(reader: R, selection: IllustrationSelection) -> Self {
        Self {
            reader: NsReader::from_reader(reader),
            buf: Vec::new(),
            selection,
            page: None,
            pages_seen: 0,
            done: false,
        }
    }

    fn handle(&mut self, step: Step) -> Option<PageDescriptor> {
        match step {
            Step::PageStart {
                width,
                height,
                empty,
            } => {
                self.pages_seen += 1;
                self.page = (!empty).then(|| OpenPage {
                    number: self.pages_seen,
                    width,
                    height,
                    illustrations: 0,
                    rejected: false,
                });
                None
            }
            Step::PageEnd => {
                self.page = None;
                None
            }
            Step::Illustration { file_id } => {
                let selection = self.selection;
                let page = self.page.as_mut()?;
                if page.rejected
                    || (selection == IllustrationSelection::First && page.illustrations > 0)
                {
                    return None;
                }
                match page.describe(file_id) {
                    Ok(descriptor) => {
                        page.illustrations += 1;
                        Some(descriptor)
                    }
                    Err(Rejection::Page) => {
                        page.rejected = true;
                        None
                    }
                    Err(Rejection::Illustration) => None,
                }
            }
            Step::Eof => {
                self.done = true;
                None
            }
            Step::Skip => None,
        }
    }
}

/// Why an illustration produced no descriptor.
enum Rejection {
    /// The page size is unusable; later illustrations of the page are ignored too.
    Page,
    Illustration,
}

impl OpenPage {
    fn describe(&self, file_id: Option<String>) -> Result<PageDescriptor, Rejection> {
        let (Some(w), Some(h)) = (&self.width, &self.height) else {
            debug!("Skipping page {}: missing WIDTH or HEIGHT", self.number);
            return Err(Rejection::Page);
        };

        let (width, height) = match (w.trim().parse::<f64>(), h.trim().parse::<f64>()) {
            (Ok(width), Ok(height)) => (width, height),
            _ => {
                warn!("Skipping page {}: invalid size {:?} x {:?}", self.number, w, h);
                return Err(Rejection::Page);
            }
        };

        let Some(file_id) = file_id else {
            debug!("Skipping illustration on page {}: missing FILEID", self.number);
            return Err(Rejection::Illustration);
        };

        debug!("w: {}, h: {}, fileid: {}", width, height, file_id);
        PageDescriptor::new(width, height, file_id).ok_or_else(|| {
            warn!("Skipping page {}: size {} x {} rejected", self.number, width, height);
            Rejection::Page
        })
    }
}

impl<R: BufRead> Iterator for IllustrationLocator<R> {
    type Item = Result<PageDescriptor, MetadataError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            let step = match self.reader.read_resolved_event_into(&mut self.buf) {
                Ok((ns, event)) => classify(&ns, event),
                Err(e) => {
                    self.done = true;
                    return Some(Err(MetadataError::Xml(e)));
                }
            };

            if let Some(descriptor) = self.handle(step) {
                return Some(Ok(descriptor));
            }
        }
        None
    }
}

fn in_alto(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri.starts_with(ALTO_NAMESPACE_PREFIX.as_bytes()))
}

fn classify(ns: &ResolveResult<'_>, event: Event<'_>) -> Step {
    match event {
        Event::Eof => Step::Eof,
        Event::Start(ref e) | Event::Empty(ref e) if in_alto(ns) => {
            let empty = matches!(event, Event::Empty(_));
            match e.local_name().as_ref() {
                b"Page" => Step::PageStart {
                    width: attribute(e, "WIDTH"),
                    height: attribute(e, "HEIGHT"),
                    empty,
                },
                b"Illustration" => Step::Illustration {
                    file_id: attribute(e, "FILEID").filter(|id| !id.is_empty()),
                },
                _ => Step::Skip,
            }
        }
        Event::End(ref e) if in_alto(ns) && e.local_name().as_ref() == b"Page" => Step::PageEnd,
        _ => Step::Skip,
    }
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}
