//! One ad hoc compiled module derived from a single source file.

use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use exportbridge_attrs::AttributeParser;
use exportbridge_codegen::registration_block;
use exportbridge_core::{Error, FileInfo, Platform, Result, copy_with_suffix, create_dir_all};

use crate::BuildEnv;

/// Prefix of every unit's build directory under the build root.
pub const BUILD_DIR_PREFIX: &str = "bridge_";

/// A source file copied into a private build directory, with a registration
/// block for its exports appended to the copy.
///
/// The unit never writes outside its build directory. The directory outlives
/// the unit; removing it is the caller's business.
#[derive(Debug, Clone)]
pub struct BuildUnit {
    source_path: PathBuf,
    source_last_modified: SystemTime,
    source_filename: String,
    generated_source_path: PathBuf,
    generated_code: String,
    module_name: String,
    build_directory: PathBuf,
    exported_function_names: Vec<String>,
    dependency_names: Vec<String>,
    platform: Platform,
}

impl BuildUnit {
    /// Set up a unit for `source_path`: allocate its build directory and
    /// module name, then generate the source copy.
    pub fn create(source_path: impl AsRef<Path>, env: &mut BuildEnv<'_>) -> Result<Self> {
        let source_path = source_path.as_ref();
        let info = FileInfo::stat(source_path)?;
        if !info.exists() || !source_path.is_file() {
            return Err(Error::source_not_found(source_path));
        }

        let source_filename = source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::source_not_found(source_path))?;

        let build_directory = allocate_build_directory(&env.build_root)?;
        let generated_source_path = env
            .platform
            .join(&build_directory, [source_filename.as_str()]);
        let module_name = env.ids.next_module_name();

        tracing::debug!(
            source = %source_path.display(),
            module = %module_name,
            dir = %build_directory.display(),
            "created build unit"
        );

        let mut unit = Self {
            source_path: source_path.to_path_buf(),
            source_last_modified: info.last_modified(),
            source_filename,
            generated_source_path,
            generated_code: String::new(),
            module_name,
            build_directory,
            exported_function_names: Vec::new(),
            dependency_names: Vec::new(),
            platform: env.platform.clone(),
        };
        unit.regenerate_source(env.parser)?;
        Ok(unit)
    }

    /// Copy the source afresh into the build directory and append a newly
    /// generated registration block. Safe to call repeatedly.
    ///
    /// The source bytes are copied verbatim whatever their encoding.
    pub fn regenerate_source(&mut self, parser: &dyn AttributeParser) -> Result<()> {
        let attributes = parser.parse(&self.source_path)?;

        self.generated_code = registration_block(&self.module_name, &attributes);
        copy_with_suffix(
            &self.source_path,
            &self.generated_source_path,
            &format!("\n{}", self.generated_code),
        )?;

        self.exported_function_names = attributes.exports().map(|e| e.name.to_string()).collect();
        self.dependency_names = attributes.dependencies().map(str::to_string).collect();
        self.source_last_modified = FileInfo::stat(&self.source_path)?.last_modified();

        tracing::debug!(
            module = %self.module_name,
            exports = self.exported_function_names.len(),
            "regenerated source"
        );
        Ok(())
    }

    /// Whether the source changed after the copy was generated, or the module
    /// has not been compiled yet.
    ///
    /// Only modification times are compared, so an edit within the
    /// filesystem's timestamp resolution can go unnoticed.
    pub fn is_source_dirty(&self) -> Result<bool> {
        let source = FileInfo::stat(&self.source_path)?;
        let generated = FileInfo::stat(&self.generated_source_path)?;
        Ok(source.last_modified() > generated.last_modified() || !self.is_built()?)
    }

    /// Whether the compiled module exists.
    pub fn is_built(&self) -> Result<bool> {
        Ok(FileInfo::stat(self.artifact_path())?.exists())
    }

    pub fn artifact_filename(&self) -> String {
        format!("{}{}", self.module_name, self.platform.dynlib_ext)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.platform
            .join(&self.build_directory, [self.artifact_filename().as_str()])
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn source_last_modified(&self) -> SystemTime {
        self.source_last_modified
    }

    pub fn source_filename(&self) -> &str {
        &self.source_filename
    }

    pub fn generated_source_path(&self) -> &Path {
        &self.generated_source_path
    }

    /// The registration block appended to the copy.
    pub fn generated_code(&self) -> &str {
        &self.generated_code
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn build_directory(&self) -> &Path {
        &self.build_directory
    }

    pub fn exported_function_names(&self) -> &[String] {
        &self.exported_function_names
    }

    pub fn dependency_names(&self) -> &[String] {
        &self.dependency_names
    }
}

fn allocate_build_directory(build_root: &Path) -> Result<PathBuf> {
    create_dir_all(build_root)?;
    let dir = tempfile::Builder::new()
        .prefix(BUILD_DIR_PREFIX)
        .keep(true)
        .tempdir_in(build_root)
        .map_err(|e| Error::file_io(build_root, e))?;
    Ok(dir.path().to_path_buf())
}
