//! Tar serialization of a finalized closure.
//!
//! Entries are written in the order given. Each is re-probed at write time:
//! symlinks keep their raw target, regular files are streamed, directories
//! carry no content. Entry names are stored relative to the root (`/bin/ls`
//! becomes `bin/ls`), which is what `tar -x -C rootfs` and container image
//! importers expect.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use tar::{Builder, EntryType, Header, HeaderMode};

use crate::error::{Error, Result};

/// Counts of what was written to an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Regular files streamed.
    pub files: usize,
    /// Symlinks recorded.
    pub symlinks: usize,
    /// Directories recorded.
    pub directories: usize,
}

impl ArchiveSummary {
    /// Total number of entries written.
    #[must_use]
    pub fn total(&self) -> usize {
        self.files + self.symlinks + self.directories
    }
}

/// Write `entries` into a tar stream on `writer`.
///
/// The root directory itself is skipped, since every extraction target
/// already has one.
///
/// # Errors
///
/// Returns `Archive` naming the entry if it vanished, cannot be read, or is
/// neither a file, symlink nor directory. The stream is left partially
/// written in that case.
pub fn write_archive<W, I, P>(writer: W, entries: I) -> Result<ArchiveSummary>
where
    W: Write,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut builder = Builder::new(writer);
    builder.follow_symlinks(false);

    let mut summary = ArchiveSummary::default();
    for entry in entries {
        let path = entry.as_ref();
        let Ok(name) = path.strip_prefix("/") else {
            return Err(archive_error(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "entry path is not absolute"),
            ));
        };
        if name.as_os_str().is_empty() {
            log::debug!("skipping root directory");
            continue;
        }

        append_entry(&mut builder, path, name, &mut summary)
            .map_err(|source| archive_error(path, source))?;
        log::debug!("archived {}", path.display());
    }

    builder
        .into_inner()
        .and_then(|mut inner| inner.flush())
        .map_err(Error::Io)?;
    Ok(summary)
}

/// Create `output` and write `entries` into it.
///
/// # Errors
///
/// Returns `Io` if the output file cannot be created, and the errors of
/// [`write_archive`] otherwise.
pub fn write_archive_file<I, P>(output: &Path, entries: I) -> Result<ArchiveSummary>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let file = File::create(output)?;
    let summary = write_archive(io::BufWriter::new(file), entries)?;
    log::info!(
        "wrote {} entries to {}",
        summary.total(),
        output.display()
    );
    Ok(summary)
}

fn append_entry<W: Write>(
    builder: &mut Builder<W>,
    path: &Path,
    name: &Path,
    summary: &mut ArchiveSummary,
) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(&meta, HeaderMode::Complete);
    // Reading a file moves its atime; keep repeated runs byte-identical.
    if let Some(gnu) = header.as_gnu_mut() {
        gnu.set_atime(0);
        gnu.set_ctime(0);
    }

    let file_type = meta.file_type();
    if file_type.is_symlink() {
        let target = fs::read_link(path)?;
        header.set_entry_type(EntryType::Symlink);
        header.set_size(0);
        builder.append_link(&mut header, name, target)?;
        summary.symlinks += 1;
    } else if file_type.is_dir() {
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        builder.append_data(&mut header, name, io::empty())?;
        summary.directories += 1;
    } else if file_type.is_file() {
        append_bounded(builder, &mut header, name, File::open(path)?, meta.len())?;
        summary.files += 1;
    } else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "unsupported file type",
        ));
    }
    Ok(())
}

/// Append at most `len` bytes of `content`, the size recorded at lstat time.
fn append_bounded<W: Write, R: Read>(
    builder: &mut Builder<W>,
    header: &mut Header,
    name: &Path,
    content: R,
    len: u64,
) -> io::Result<()> {
    header.set_size(len);
    builder.append_data(header, name, content.take(len))
}

fn archive_error(path: &Path, source: io::Error) -> Error {
    Error::Archive {
        path: path.to_path_buf(),
        source,
    }
}
