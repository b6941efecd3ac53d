use std::{fs, io, path::Path};

use serde::{de::DeserializeOwned, Serialize};

/// Serializes `value` as pretty JSON and swaps it into place through a
/// sibling temporary file, so readers never observe a half-written document.
pub fn write_json_atomic<T, E>(value: &T, path: &Path) -> Result<(), E>
where
    T: Serialize + ?Sized,
    E: From<io::Error> + From<serde_json::Error>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads a JSON document, returning `None` when the file does not exist yet.
pub fn read_json_if_exists<T, E>(path: &Path) -> Result<Option<T>, E>
where
    T: DeserializeOwned,
    E: From<io::Error> + From<serde_json::Error>,
{
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug)]
    enum TestError {
        Io,
        Serde,
    }

    impl From<io::Error> for TestError {
        fn from(_: io::Error) -> Self {
            TestError::Io
        }
    }

    impl From<serde_json::Error> for TestError {
        fn from(_: serde_json::Error) -> Self {
            TestError::Serde
        }
    }

    #[test]
    fn writes_then_reads_back_without_leaving_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("eggs".to_string(), 120);

        write_json_atomic::<_, TestError>(&doc, &path).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let loaded: Option<BTreeMap<String, i32>> =
            read_json_if_exists::<_, TestError>(&path).unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[test]
    fn missing_file_reads_as_none_and_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing: Option<Vec<u8>> =
            read_json_if_exists::<_, TestError>(&dir.path().join("absent.json")).unwrap();
        assert!(missing.is_none());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ nope").unwrap();
        let err = read_json_if_exists::<Vec<u8>, TestError>(&bad).unwrap_err();
        assert!(matches!(err, TestError::Serde));
    }
}
