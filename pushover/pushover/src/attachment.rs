use std::fs::File;
use std::io::{self, Chain, Cursor, Read};
use std::path::Path;
use std::str::FromStr as _;

use log::debug;
use mime::Mime;

// Enough for every signature infer knows about
const SNIFF_LEN: u64 = 8192;

/// Notification attachment streamed from a local file. Image in most cases.
#[derive(Debug)]
pub(crate) struct Attachment {
    /// Filename.
    pub(crate) filename: String,
    /// MIME type, inferred from leading bytes.
    pub(crate) mime: Mime,
    /// Sniffed head followed by the rest of the open file.
    pub(crate) stream: Chain<Cursor<Vec<u8>>, File>,
}

impl Attachment {
    /// Opens `path` once. The file is closed when the [`Attachment`] is dropped.
    pub(crate) fn from_path(path: &Path) -> io::Result<Attachment> {
        let mut file = File::open(path)?;
        let mut head = Vec::new();
        file.by_ref().take(SNIFF_LEN).read_to_end(&mut head)?;

        let filename = path
            .file_name()
            .and_then(|t| t.to_str())
            .unwrap_or("attachment")
            .to_owned();
        let mime = infer::get(&head)
            .and_then(|t| Mime::from_str(t.mime_type()).ok())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);
        debug!("attachment {path:?} as {filename} ({mime})");

        Ok(Self {
            filename,
            mime,
            stream: Cursor::new(head).chain(file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn t_from_path() -> io::Result<()> {
        let mut f = tempfile::Builder::new().suffix(".png").tempfile()?;
        f.write_all(PNG)?;

        let mut a = Attachment::from_path(f.path())?;
        assert!(a.filename.ends_with(".png"));
        assert_eq!("image/png", a.mime.to_string());

        let mut content = Vec::new();
        a.stream.read_to_end(&mut content)?;
        assert_eq!(PNG, content.as_slice());
        Ok(())
    }

    #[test]
    fn t_longer_than_sniffed_head() -> io::Result<()> {
        let mut f = tempfile::NamedTempFile::new()?;
        let body: Vec<u8> = (0..3 * SNIFF_LEN).map(|i| (i % 251) as u8).collect();
        f.write_all(&body)?;

        let mut a = Attachment::from_path(f.path())?;
        let mut content = Vec::new();
        a.stream.read_to_end(&mut content)?;
        assert_eq!(body, content);
        Ok(())
    }

    #[test]
    fn t_unknown_mime() -> io::Result<()> {
        let mut f = tempfile::NamedTempFile::new()?;
        f.write_all(b"plain text")?;

        let a = Attachment::from_path(f.path())?;
        assert_eq!(mime::APPLICATION_OCTET_STREAM, a.mime);
        Ok(())
    }

    #[test]
    fn t_missing() {
        let e = Attachment::from_path(Path::new("path/to/missing/file")).unwrap_err();
        assert_eq!(io::ErrorKind::NotFound, e.kind());
    }
}
