use derive_more::Display;
use uuid::Uuid;

/// Identifies one file selection so late preview reads can be matched or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub struct SelectionId(Uuid);

impl SelectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SelectionId {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// A file offered by the browser before it is accepted.
///
/// `F` is the platform handle (a browser `File` in the app, anything cloneable in tests).
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingFile<F> {
    pub handle: F,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl<F> IncomingFile<F> {
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile<F> {
    pub id: SelectionId,
    pub handle: F,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub preview: Option<String>,
}

impl<F> SelectedFile<F> {
    fn from_incoming(file: IncomingFile<F>) -> Self {
        Self {
            id: SelectionId::new(),
            handle: file.handle,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size,
            preview: None,
        }
    }
}

/// Result of sorting a batch of offered files.
#[derive(Debug)]
pub struct Picked<F> {
    pub file: Option<SelectedFile<F>>,
    pub skipped: Vec<String>,
}

/// Keeps only the most recent image of a batch; names of non-images are reported back.
pub fn pick_last_image<F>(files: Vec<IncomingFile<F>>) -> Picked<F> {
    let mut skipped = Vec::new();
    let mut last = None;

    for file in files {
        if file.is_image() {
            last = Some(file);
        } else {
            skipped.push(file.name);
        }
    }

    Picked {
        file: last.map(SelectedFile::from_incoming),
        skipped,
    }
}
