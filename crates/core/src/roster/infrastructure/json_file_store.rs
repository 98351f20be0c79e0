use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::roster::domain::project::{Project, ProjectSummary};
use crate::roster::domain::project_store::ProjectStore;
use crate::roster::domain::session::Session;
use crate::roster::domain::store_error::StoreError;

#[derive(Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    projects: BTreeMap<String, Project>,
}

/// [`ProjectStore`] persisted as a single pretty-printed JSON document.
///
/// Mutations hold an exclusive OS lock on a sidecar `<file>.lock` across
/// load, merge and rewrite, so separate handles and separate processes on
/// the same path serialize. The rewrite goes through a uniquely named temp
/// file in the same directory and a rename, so readers never see a
/// half-written document and need no lock.
pub struct JsonFileProjectStore {
    path: PathBuf,
}

impl JsonFileProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("projects.json"));
        name.push(".lock");
        self.parent_dir().join(name)
    }

    /// Blocks until this handle holds the store's exclusive lock. The lock
    /// is released when the returned file is dropped.
    fn lock_exclusive(&self) -> Result<File, StoreError> {
        fs::create_dir_all(self.parent_dir()).map_err(|e| self.io_error(e))?;
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;
        FileExt::lock_exclusive(&lock_file).map_err(|e| self.io_error(e))?;
        Ok(lock_file)
    }

    fn load(&self) -> Result<StoreFile, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_str(&json).map_err(|source| StoreError::Serialization {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, file: &StoreFile) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(file).map_err(|source| StoreError::Serialization {
                path: self.path.clone(),
                source,
            })?;
        let mut temp = NamedTempFile::new_in(self.parent_dir()).map_err(|e| self.io_error(e))?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&StoreFile) -> Result<T, StoreError>) -> Result<T, StoreError> {
        f(&self.load()?)
    }

    fn modify<T>(
        &self,
        f: impl FnOnce(&mut StoreFile) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _lock = self.lock_exclusive()?;
        let mut file = self.load()?;
        let result = f(&mut file)?;
        self.save(&file)?;
        Ok(result)
    }
}

fn project_mut<'a>(file: &'a mut StoreFile, name: &str) -> Result<&'a mut Project, StoreError> {
    file.projects
        .get_mut(name)
        .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))
}

impl ProjectStore for JsonFileProjectStore {
    fn create_project(&self, project: Project) -> Result<(), StoreError> {
        self.modify(|file| {
            if file.projects.contains_key(&project.name) {
                return Err(StoreError::ProjectAlreadyExists(project.name));
            }
            file.projects.insert(project.name.clone(), project);
            Ok(())
        })
    }

    fn get_project(&self, name: &str) -> Result<Project, StoreError> {
        self.read(|file| {
            file.projects
                .get(name)
                .cloned()
                .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))
        })
    }

    fn list_projects(&self) -> Result<Vec<ProjectSummary>, StoreError> {
        self.read(|file| Ok(file.projects.values().map(Project::summary).collect()))
    }

    fn append_session(&self, project: &str, session: Session) -> Result<(), StoreError> {
        self.modify(|file| {
            project_mut(file, project)?.merge_session(session);
            Ok(())
        })
    }

    fn update_details(&self, project: &str, details: &str) -> Result<(), StoreError> {
        self.modify(|file| {
            project_mut(file, project)?.details = Some(details.to_string());
            Ok(())
        })
    }
}
