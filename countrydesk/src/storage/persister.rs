use super::{HEADERS, into_io};
use crate::records::Country;
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum SaveErrors {
    /// The destination directory is missing or refuses new files. The caller
    /// should offer another destination.
    #[error("Can't write to {}: {reason}", path.display())]
    NotWritable { path: PathBuf, reason: String },
    #[error("Couldn't save {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes `countries` to `path` as CSV, header first.
///
/// The data goes to a temporary file beside `path` that is renamed over the
/// destination once complete. Either every record is persisted or the old
/// file stays as it was.
///
/// # Errors
/// - [`SaveErrors::NotWritable`] if the directory doesn't exist or a file
///   can't be created in it.
/// - [`SaveErrors::Io`] for failures while writing or renaming.
pub fn save(path: &Path, countries: &[Country]) -> Result<(), SaveErrors> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(SaveErrors::NotWritable {
            path: path.to_path_buf(),
            reason: format!("directory {} does not exist", dir.display()),
        });
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| SaveErrors::NotWritable {
            path: path.to_path_buf(),
            reason: "not a file path".to_string(),
        })?
        .to_string_lossy();
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let file = File::create(&tmp_path).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
            SaveErrors::NotWritable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
        _ => SaveErrors::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let written = to_writer(file, countries)
        .and_then(|file| file.sync_all())
        .and_then(|_| fs::rename(&tmp_path, path));

    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        tracing::error!(path = %path.display(), error = %source, "Save failed");
        return Err(SaveErrors::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!(
        path = %path.display(),
        countries = countries.len(),
        "Saved countries"
    );
    Ok(())
}

/// Serializes the header and one row per country into `writer`, returning
/// the writer once everything is flushed.
pub fn to_writer<W: Write>(writer: W, countries: &[Country]) -> Result<W, io::Error> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(HEADERS).map_err(into_io)?;
    for country in countries {
        out.serialize(country).map_err(into_io)?;
    }
    out.flush()?;
    out.into_inner().map_err(|e| e.into_error())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load, seed_countries};

    fn render(countries: &[Country]) -> String {
        String::from_utf8(to_writer(Vec::new(), countries).unwrap()).unwrap()
    }

    #[test]
    fn test_persister_writes_header_and_rows() {
        let text = render(&[Country::new("Japón", 125800000, 377975, "Asia")]);
        assert_eq!(
            text,
            "name,population,area,continent\nJapón,125800000,377975,Asia\n"
        );
    }

    #[test]
    fn test_persister_empty_store_keeps_header() {
        assert_eq!(render(&[]), "name,population,area,continent\n");
    }

    #[test]
    fn test_persister_quotes_delimiters() {
        let text = render(&[Country::new("Korea, South", 1, 2, "Asia \"East\"")]);
        assert_eq!(
            text,
            "name,population,area,continent\n\"Korea, South\",1,2,\"Asia \"\"East\"\"\"\n"
        );
    }

    #[test]
    fn test_persister_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.csv");
        let mut countries = seed_countries();
        countries.push(Country::new("Korea, South", 51780579, 100210, "Asia"));

        save(&path, &countries).unwrap();
        let first = load(&path).unwrap();
        assert_eq!(first.countries, countries);
        assert!(first.warnings.is_empty());

        save(&path, &first.countries).unwrap();
        let second = load(&path).unwrap();
        assert_eq!(second.countries, first.countries);
    }

    #[test]
    fn test_persister_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.csv");
        fs::write(&path, "stale").unwrap();

        save(&path, &[Country::new("Chile", 1, 2, "América")]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "name,population,area,continent\nChile,1,2,América\n"
        );
        assert!(!dir.path().join(".countries.csv.tmp").exists());
    }

    #[test]
    fn test_persister_missing_directory_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("countries.csv");
        let res = save(&path, &seed_countries());
        assert!(matches!(res, Err(SaveErrors::NotWritable { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_persister_directory_target_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();

        let res = save(&target, &seed_countries());
        assert!(matches!(res, Err(SaveErrors::Io { .. })));
        assert!(target.is_dir());
        assert!(!dir.path().join(".taken.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_persister_read_only_directory_is_not_writable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits don't bind root.
        let writable = File::create(locked.join("check")).is_ok();
        let res = if writable {
            None
        } else {
            Some(save(&locked.join("countries.csv"), &seed_countries()))
        };
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if let Some(res) = res {
            assert!(matches!(res, Err(SaveErrors::NotWritable { .. })));
            assert!(!locked.join("countries.csv").exists());
            assert!(!locked.join(".countries.csv.tmp").exists());
        }
    }
}
