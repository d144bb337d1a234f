//! Attachment resolution and upload.
//!
//! File patterns are expanded concurrently, then every matched file is
//! uploaded concurrently. Both stages wait for all of their tasks and fail on
//! the first error.

use crate::config::AttachmentOptions;
use crate::error::{FsError, Result};
use futures::future::try_join_all;
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tracing::{debug, info};
use workitem_core::{AttachmentReference, WorkItemTrackingApi};

/// Remove quote characters and use forward slashes as separators.
#[must_use]
pub fn normalize_pattern(pattern: &str) -> String {
    pattern.replace(['\'', '"'], "").replace('\\', "/")
}

/// Wildcards never match a leading `.`; hidden files must be named literally.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Expand a single pattern into absolute file paths. Directories and
/// unreadable entries are skipped.
fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let normalized = normalize_pattern(pattern);
    let entries =
        glob::glob_with(&normalized, MATCH_OPTIONS).map_err(|source| FsError::Pattern {
            pattern: normalized.clone(),
            source,
        })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                debug!(path = %err.path().display(), error = %err.error(), "Skipping unreadable entry");
                continue;
            }
        };
        if path.is_dir() {
            continue;
        }
        files.push(std::path::absolute(&path)?);
    }

    debug!(pattern = %normalized, matches = files.len(), "Expanded file pattern");
    Ok(files)
}

/// Expand all patterns concurrently and flatten the matches.
///
/// # Errors
/// Returns `FsError::Pattern` for invalid glob syntax and `FsError::Io` if a
/// match cannot be made absolute.
pub async fn resolve_files<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let expansions = patterns.iter().map(|pattern| {
        let pattern = pattern.as_ref().to_string();
        async move {
            tokio::task::spawn_blocking(move || expand_pattern(&pattern))
                .await
                .map_err(std::io::Error::other)?
        }
    });

    let matches = try_join_all(expansions).await?;
    Ok(matches.into_iter().flatten().collect())
}

/// Display name of an uploaded file.
fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

async fn upload_file<A>(
    api: &A,
    path: &Path,
    options: &AttachmentOptions,
) -> Result<AttachmentReference>
where
    A: WorkItemTrackingApi + ?Sized,
{
    let name = file_name(path);
    let file = File::open(path).await?;

    let attachment = api
        .create_attachment(
            &options.custom_headers,
            Box::new(file),
            &name,
            &options.upload_type,
            options.project.as_deref(),
            options.area_path.as_deref(),
        )
        .await?;

    debug!(file = %path.display(), url = %attachment.url, "Uploaded attachment");
    Ok(attachment)
}

/// Upload every file matched by `patterns` as an attachment.
///
/// The returned handles follow the order in which files were resolved.
///
/// # Errors
/// - `FsError::NoFilesResolved` if the patterns match no file, including an
///   empty pattern list
/// - the first upload failure; remaining uploads are abandoned
pub async fn create_attachments<A, S>(
    api: &A,
    patterns: &[S],
    options: &AttachmentOptions,
) -> Result<Vec<AttachmentReference>>
where
    A: WorkItemTrackingApi + ?Sized,
    S: AsRef<str>,
{
    let files = resolve_files(patterns).await?;
    debug!(files = ?files, "Resolved attachment files");

    if files.is_empty() {
        return Err(FsError::NoFilesResolved);
    }

    let uploads = files.iter().map(|path| upload_file(api, path, options));
    let attachments = try_join_all(uploads).await?;

    info!(count = attachments.len(), "Created attachments");
    Ok(attachments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup(names: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for name in names {
            fs::write(tmp.path().join(name), format!("content of {name}")).unwrap();
        }
        tmp
    }

    #[test]
    fn test_normalize_pattern() {
        assert_eq!(normalize_pattern("'logs/*.txt'"), "logs/*.txt");
        assert_eq!(normalize_pattern("\"out\\report.html\""), "out/report.html");
        assert_eq!(normalize_pattern("a\\b\\*.png"), "a/b/*.png");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/tmp/out/report.html")), "report.html");
    }

    #[tokio::test]
    async fn test_resolve_files_flattens_all_patterns() {
        let tmp = setup(&["a.txt", "b.txt", "c.log"]);
        let dir = tmp.path().display();

        let mut files = resolve_files(&[format!("{dir}/*.txt"), format!("{dir}/*.log")])
            .await
            .unwrap();
        files.sort();

        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.log"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[tokio::test]
    async fn test_resolve_files_normalizes_input() {
        let tmp = setup(&["a.txt"]);
        let dir = tmp.path().display();

        let files = resolve_files(&[format!("'{dir}\\a.txt'")]).await.unwrap();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_files_skips_directories() {
        let tmp = setup(&["a.txt"]);
        fs::create_dir(tmp.path().join("nested")).unwrap();
        let dir = tmp.path().display();

        let files = resolve_files(&[format!("{dir}/*")]).await.unwrap();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_files_skips_hidden_files() {
        let tmp = setup(&[".env", ".gitignore", "build.log"]);
        let dir = tmp.path().display();

        let files = resolve_files(&[format!("{dir}/*")]).await.unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["build.log"]);

        let files = resolve_files(&[format!("{dir}/.env")]).await.unwrap();
        assert_eq!(files.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_files_skips_unreadable_directories() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = setup(&["a.txt"]);
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("b.txt"), "b").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let dir = tmp.path().display();

        let result = resolve_files(&[format!("{dir}/**/*.txt")]).await;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<String> = result.unwrap().iter().map(|p| file_name(p)).collect();
        assert!(names.contains(&"a.txt".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_files_no_match() {
        let tmp = setup(&[]);
        let dir = tmp.path().display();

        let files = resolve_files(&[format!("{dir}/missing.txt")]).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_pattern() {
        let result = resolve_files(&["[unclosed"]).await;
        assert!(matches!(result, Err(FsError::Pattern { .. })));
    }
}
