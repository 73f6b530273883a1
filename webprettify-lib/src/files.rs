//! Reading, prettifying and writing files on disk.

use crate::error::{Error, Result};
use crate::options::PrettifyOptions;
use crate::prettify;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a file is prettified as, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Css,
    Html,
}

impl FileKind {
    /// `.css` / `.scss` or `.htm` / `.html`, in any letter case.
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "css" | "scss" => Some(FileKind::Css),
            "htm" | "html" => Some(FileKind::Html),
            _ => None,
        }
    }
}

/// Settings for one file run.
#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    pub prettify: PrettifyOptions,
    /// Written next to the input as `prefix + name`; `None` overwrites in place.
    pub prefix: Option<String>,
    /// Prepend a `/* YYYY-MM-DDtHH:MM:SS */ ` comment to CSS output.
    pub timestamp: bool,
}

/// Where the prettified text of `path` goes.
///
/// Same directory and stem, lower-cased extension, `prefix` in front of the
/// file name. Without a prefix that is the input itself.
pub fn output_path(path: &Path, prefix: Option<&str>) -> PathBuf {
    let Some(prefix) = prefix.filter(|p| !p.is_empty()) else {
        return path.to_path_buf();
    };
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}{}", prefix, stem);
    if let Some(extension) = path.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy().to_lowercase());
    }
    path.with_file_name(name)
}

/// Result of processing one file.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub text: String,
}

/// Prettify one file and write the result to its [`output_path`].
pub fn process_file(path: &Path, options: &FileOptions) -> Result<ProcessedFile> {
    let kind = FileKind::from_path(path).ok_or_else(|| Error::unsupported(path))?;
    log::info!("Processing file: {}", path.display());

    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let content = prettify::decode_utf8(&bytes)?;

    let text = match kind {
        FileKind::Css => {
            let pretty = prettify::prettify_css(content, &options.prettify);
            if options.timestamp {
                format!("{}{}", timestamp_comment(), pretty)
            } else {
                pretty
            }
        }
        FileKind::Html => {
            prettify::prettify_html(content, options.prettify.html_indent_width)?
        }
    };

    let output = output_path(path, options.prefix.as_deref());
    fs::write(&output, &text).map_err(|e| Error::io(&output, e))?;
    log::info!("Writing output file: {}", output.display());

    Ok(ProcessedFile {
        source: path.to_path_buf(),
        output,
        text,
    })
}

/// Process many files in parallel on the current rayon pool.
///
/// Results come back in the order of `paths`; one failure does not stop the
/// others.
pub fn process_files(paths: &[PathBuf], options: &FileOptions) -> Vec<Result<ProcessedFile>> {
    paths
        .par_iter()
        .map(|path| process_file(path, options))
        .collect()
}

/// Every prettifiable file under `root`, sorted.
///
/// Hidden files and directories are skipped, and so is anything ending in
/// `.min.css`.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if should_process(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    log::debug!("Found {} files under {}", files.len(), root.display());
    Ok(files)
}

/// A visible, prettifiable file name that is not a `.min.css` bundle.
pub fn should_process(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let minified = name.to_string_lossy().to_lowercase().ends_with(".min.css");
    !minified && !is_hidden(name) && FileKind::from_path(path).is_some()
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// `/* 2024-01-31t13:45:00 */ ` in local time.
pub fn timestamp_comment() -> String {
    format!("/* {} */ ", chrono::Local::now().format("%Y-%m-%dt%H:%M:%S"))
}
