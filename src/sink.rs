use std::{fs, path::{Path, PathBuf}};
use serde::Serialize;

use crate::errors::EnricherError;

#[derive(Debug, Clone, Copy)]
pub enum ArtifactKind {
    EnrichedDataset,
    Summary,
    PlotSeries
}

pub struct JsonSink {
    root: PathBuf
}

impl JsonSink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Writes through a tempfile in the target dir so readers never see
    /// a half written artifact
    pub fn write_json<T: Serialize>(&self, kind: ArtifactKind, key: &str, value: &T) ->
        Result<PathBuf, EnricherError> {

        let rpath = Self::rel_path(kind, Self::sanitize_key(key));
        let path = self.root.join(rpath);
        let parent = path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        fs::create_dir_all(&parent).map_err(|e|
            EnricherError::Io(std::io::Error::new(
                e.kind(),
                format!("create dir {}: {e}", parent.display())
            ))
        )?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent)?;
        serde_json::to_writer_pretty(&mut temp, value)?;

        temp.persist(&path).map_err(|e|
            EnricherError::Io(std::io::Error::new(
                e.error.kind(),
                format!("persist {}: {}", path.display(), e.error)
            ))
        )?;

        Ok(path)
    }

    fn rel_path(kind: ArtifactKind, sanitize_key: String) -> PathBuf {
        let dir = match kind {
            ArtifactKind::EnrichedDataset => "enriched",
            ArtifactKind::Summary         => "summary",
            ArtifactKind::PlotSeries      => "series"
        };
        PathBuf::from(dir).join(format!("{sanitize_key}.json"))
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_keys() {
        assert_eq!(JsonSink::sanitize_key("imdb 100/../x"), "imdb_100____x");
        assert_eq!(JsonSink::sanitize_key("run-1_a"), "run-1_a");
    }

    #[test]
    fn writes_under_kind_dir() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSink::new(dir.path());

        let path = sink.write_json(
            ArtifactKind::Summary, "imdb 100", &serde_json::json!({"scored": 3})
        ).unwrap();

        assert_eq!(path, dir.path().join("summary").join("imdb_100.json"));
        let back: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back["scored"], 3);
    }

    #[test]
    fn overwrites_existing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSink::new(dir.path());

        sink.write_json(ArtifactKind::PlotSeries, "k", &vec![1, 2]).unwrap();
        let path = sink.write_json(ArtifactKind::PlotSeries, "k", &vec![3]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap().replace(char::is_whitespace, ""), "[3]");
    }
}
