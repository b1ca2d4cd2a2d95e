// src/fs/mock.rs

use super::FileSystem;
use crate::errors::FlagOp;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

/// A mutating call made against the mock, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOp {
    Touch(PathBuf),
    Remove(PathBuf),
    RemoveRecursive(PathBuf),
}

#[derive(Debug, Default)]
struct MockState {
    entries: BTreeMap<PathBuf, MockEntry>,
    ops: Vec<MockOp>,
    checks: Vec<PathBuf>,
    failures: HashSet<(FlagOp, PathBuf)>,
}

/// In-memory filesystem for tests.
///
/// Clones share state, so a test can keep a handle while the launcher owns
/// another. Mutating calls are recorded and can be made to fail per path.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (and its parent directories) without recording an op.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        insert_with_parents(&mut state.entries, path.as_ref(), MockEntry::File);
    }

    /// Seed a directory (and its parents) without recording an op.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        insert_with_parents(&mut state.entries, path.as_ref(), MockEntry::Dir);
    }

    /// Make the given operation on `path` fail from now on.
    pub fn fail_on(&self, op: FlagOp, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state
            .failures
            .insert((op, path.as_ref().to_path_buf()));
    }

    /// Mutating operations performed so far.
    pub fn ops(&self) -> Vec<MockOp> {
        self.state.lock().unwrap().ops.clone()
    }

    /// Paths passed to `exists` so far.
    pub fn exists_checks(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().checks.clone()
    }

    /// Forget recorded operations and existence checks.
    pub fn clear_ops(&self) {
        let mut state = self.state.lock().unwrap();
        state.ops.clear();
        state.checks.clear();
    }

    pub fn entry(&self, path: impl AsRef<Path>) -> Option<MockEntry> {
        self.state.lock().unwrap().entries.get(path.as_ref()).copied()
    }

    /// Every path currently present, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().entries.keys().cloned().collect()
    }

    fn check_failure(state: &MockState, op: FlagOp, path: &Path) -> Result<()> {
        if state.failures.contains(&(op, path.to_path_buf())) {
            return Err(anyhow!("injected {} failure: {:?}", op, path));
        }
        Ok(())
    }
}

fn insert_with_parents(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path, entry: MockEntry) {
    for ancestor in path.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
    entries.insert(path.to_path_buf(), entry);
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let mut state = self.state.lock().unwrap();
        state.checks.push(path.to_path_buf());
        state.entries.contains_key(path)
    }

    fn touch(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(MockOp::Touch(path.to_path_buf()));
        Self::check_failure(&state, FlagOp::Touch, path)?;
        if let Some(MockEntry::Dir) = state.entries.get(path).copied() {
            return Err(anyhow!("Is a directory: {:?}", path));
        }
        insert_with_parents(&mut state.entries, path, MockEntry::File);
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(MockOp::Remove(path.to_path_buf()));
        Self::check_failure(&state, FlagOp::Remove, path)?;
        match state.entries.get(path).copied() {
            Some(MockEntry::File) => {
                state.entries.remove(path);
                Ok(())
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn remove_recursive(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(MockOp::RemoveRecursive(path.to_path_buf()));
        Self::check_failure(&state, FlagOp::RemoveRecursive, path)?;
        // `Path::starts_with` compares whole components, so `out` does not
        // swallow its sibling `out.done`.
        state.entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}
