//! ELF interpreter extraction.
//!
//! A dynamically linked executable names its runtime loader in a `PT_INTERP`
//! program header. That loader has to be present in any root filesystem the
//! executable is expected to run from, so a pack run seeds its closure with
//! it. Parsing is done by `goblin`, which handles both ELF classes and both
//! byte orders.

use std::fs;
use std::path::{Path, PathBuf};

use goblin::elf::program_header::PT_INTERP;
use goblin::elf::Elf;

use crate::error::{Error, Result};

/// Read the interpreter path embedded in the executable at `path`.
///
/// Symlinks to the executable are followed, so `/bin/sh -> dash` works.
///
/// # Errors
///
/// Returns `NotFound` if the path does not exist or is not a regular file,
/// and `MalformedBinary` if it is not an ELF file or has no `PT_INTERP`
/// program header (a statically linked executable, for instance).
///
/// # Examples
///
/// ```no_run
/// use micropack::elf::read_interpreter;
/// use std::path::Path;
///
/// let loader = read_interpreter(Path::new("/bin/sh")).unwrap();
/// println!("loader: {}", loader.display());
/// ```
pub fn read_interpreter(path: &Path) -> Result<PathBuf> {
    let not_found = || Error::NotFound {
        path: path.to_path_buf(),
    };

    let meta = fs::metadata(path).map_err(|_| not_found())?;
    if !meta.is_file() {
        return Err(not_found());
    }

    let image = fs::read(path)?;
    let interp = interpreter_from_bytes(&image).map_err(|e| match e {
        Error::MalformedBinary { reason, .. } => Error::MalformedBinary {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })?;

    log::debug!(
        "interpreter of {} is {}",
        path.display(),
        interp.display()
    );
    Ok(interp)
}

/// Read the interpreter path from an in-memory ELF image.
///
/// Errors carry an empty path; [`read_interpreter`] fills it in.
///
/// # Errors
///
/// Returns `MalformedBinary` if `image` is not a well-formed ELF image with
/// a non-empty `PT_INTERP` segment.
pub fn interpreter_from_bytes(image: &[u8]) -> Result<PathBuf> {
    let elf = Elf::parse(image).map_err(|e| malformed(e.to_string()))?;

    match elf.interpreter {
        Some("") => Err(malformed("empty interpreter path")),
        Some(interp) => Ok(PathBuf::from(interp)),
        None if elf.program_headers.iter().any(|ph| ph.p_type == PT_INTERP) => {
            Err(malformed("unreadable PT_INTERP segment"))
        }
        None => Err(malformed("no PT_INTERP program header (statically linked?)")),
    }
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedBinary {
        path: PathBuf::new(),
        reason: reason.into(),
    }
}

/// Build a minimal ELF image carrying a `PT_INTERP` header.
///
/// Only used by tests, here and in the integration suites, to fabricate
/// reference executables.
#[doc(hidden)]
#[must_use]
pub fn synthesize_elf64_le(interp: &str) -> Vec<u8> {
    use goblin::elf::header::{ELFCLASS64, ELFDATA2LSB, ELFMAG, ET_EXEC, EV_CURRENT};
    use goblin::elf::program_header::PF_R;

    const EHDR: usize = 64;
    const PHDR: usize = 56;

    let mut payload = interp.as_bytes().to_vec();
    payload.push(0);

    let mut image = vec![0u8; EHDR + PHDR];
    image[..4].copy_from_slice(ELFMAG);
    image[4] = ELFCLASS64;
    image[5] = ELFDATA2LSB;
    image[6] = EV_CURRENT;
    image[0x10..0x12].copy_from_slice(&ET_EXEC.to_le_bytes());
    image[0x20..0x28].copy_from_slice(&(EHDR as u64).to_le_bytes());
    image[0x34..0x36].copy_from_slice(&(EHDR as u16).to_le_bytes());
    image[0x36..0x38].copy_from_slice(&(PHDR as u16).to_le_bytes());
    image[0x38..0x3A].copy_from_slice(&1u16.to_le_bytes());

    let phdr = &mut image[EHDR..];
    phdr[0..4].copy_from_slice(&PT_INTERP.to_le_bytes());
    phdr[4..8].copy_from_slice(&PF_R.to_le_bytes());
    phdr[8..16].copy_from_slice(&((EHDR + PHDR) as u64).to_le_bytes());
    phdr[32..40].copy_from_slice(&(payload.len() as u64).to_le_bytes());
    phdr[40..48].copy_from_slice(&(payload.len() as u64).to_le_bytes());

    image.extend_from_slice(&payload);
    image
}
