use crate::config::CoreSettings;
use crate::parser::is_cpp_file;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Which files belong to the active project and which one is being edited.
#[derive(Debug, Clone, Default)]
pub struct ProjectFiles {
    files: BTreeSet<PathBuf>,
    current_editor: Option<PathBuf>,
}

impl ProjectFiles {
    /// Replace the project's files with the C++ files among `files`.
    pub fn set_files<I>(&mut self, files: I) -> BTreeSet<PathBuf>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.files = cpp_files(files);
        self.files.clone()
    }

    /// Returns the C++ files that were added.
    pub fn update<I, R>(&mut self, added: I, removed: R) -> BTreeSet<PathBuf>
    where
        I: IntoIterator<Item = PathBuf>,
        R: IntoIterator<Item = PathBuf>,
    {
        for file in removed {
            self.files.remove(&file);
        }
        let added = cpp_files(added);
        self.files.extend(added.iter().cloned());
        added
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    pub fn set_current_editor(&mut self, file: Option<PathBuf>) {
        self.current_editor = file;
    }

    pub fn should_parse(&self, file: &Path, core: &CoreSettings) -> bool {
        if core.only_parse_current_file && self.current_editor.as_deref() != Some(file) {
            return false;
        }
        if !core.check_external_files {
            return self.files.contains(file);
        }
        true
    }
}

fn cpp_files<I>(files: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    files.into_iter().filter(|f| is_cpp_file(f)).collect()
}
