//! [`TestProject`] builder for manifest test scenarios.
//!
//! Generates complete, well-formed documents with deterministic
//! sequential identifiers, so tests can assert on exact text and
//! snapshots stay stable.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Declarative description of a manifest document.
///
/// # Example
///
/// ```rust
/// use pbx_test_utils::TestProject;
///
/// let manifest = TestProject::new("LyoApp")
///     .with_group("Models")
///     .with_registered_file("Models", "Core/Models/User.swift")
///     .manifest();
/// assert!(manifest.contains("/* Begin PBXSourcesBuildPhase section */"));
/// ```
pub struct TestProject {
    app_name: String,
    groups: Vec<GroupFixture>,
}

struct GroupFixture {
    name: String,
    files: Vec<FileFixture>,
}

struct FileFixture {
    path: String,
    /// Registered files get a build file and a phase membership;
    /// unregistered ones only a file reference and a group entry.
    registered: bool,
}

impl TestProject {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            groups: Vec::new(),
        }
    }

    /// Add an empty display group under the app group.
    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        self.groups.push(GroupFixture {
            name: name.into(),
            files: Vec::new(),
        });
        self
    }

    /// Add a file that is fully registered: file reference, build file,
    /// group child, and sources-phase membership.
    pub fn with_registered_file(self, group: &str, path: impl Into<String>) -> Self {
        self.with_file(group, path, true)
    }

    /// Add a file reference that is in the group but not in any phase.
    pub fn with_unregistered_file(self, group: &str, path: impl Into<String>) -> Self {
        self.with_file(group, path, false)
    }

    fn with_file(mut self, group: &str, path: impl Into<String>, registered: bool) -> Self {
        let fixture = FileFixture {
            path: path.into(),
            registered,
        };
        match self.groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => existing.files.push(fixture),
            None => self.groups.push(GroupFixture {
                name: group.to_string(),
                files: vec![fixture],
            }),
        }
        self
    }

    /// Render the complete document text.
    pub fn manifest(&self) -> String {
        let mut ids = IdCounter::default();

        let project_id = ids.next();
        let target_id = ids.next();
        let main_group_id = ids.next();
        let app_group_id = ids.next();
        let products_group_id = ids.next();
        let app_ref_id = ids.next();
        let sources_phase_id = ids.next();
        let frameworks_phase_id = ids.next();
        let config_list_id = ids.next();

        struct RenderedFile {
            file_ref_id: String,
            build_file_id: Option<String>,
            name: String,
            path: String,
        }
        struct RenderedGroup {
            id: String,
            name: String,
            files: Vec<RenderedFile>,
        }

        let groups: Vec<RenderedGroup> = self
            .groups
            .iter()
            .map(|g| RenderedGroup {
                id: ids.next(),
                name: g.name.clone(),
                files: g
                    .files
                    .iter()
                    .map(|f| RenderedFile {
                        file_ref_id: ids.next(),
                        build_file_id: f.registered.then(|| ids.next()),
                        name: basename(&f.path).to_string(),
                        path: f.path.clone(),
                    })
                    .collect(),
            })
            .collect();

        let app = &self.app_name;

        let mut build_file_lines = String::new();
        let mut file_ref_lines = String::new();
        let mut phase_member_lines = String::new();
        for group in &groups {
            for file in &group.files {
                file_ref_lines.push_str(&format!(
                    "\t\t{} /* {} */ = {{isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = {}; sourceTree = \"<group>\"; }};\n",
                    file.file_ref_id, file.name, file.path,
                ));
                if let Some(build_file_id) = &file.build_file_id {
                    build_file_lines.push_str(&format!(
                        "\t\t{} /* {} in Sources */ = {{isa = PBXBuildFile; fileRef = {} /* {} */; }};\n",
                        build_file_id, file.name, file.file_ref_id, file.name,
                    ));
                    phase_member_lines.push_str(&format!(
                        "\t\t\t\t{} /* {} in Sources */,\n",
                        build_file_id, file.name,
                    ));
                }
            }
        }

        let mut app_group_children = String::new();
        for group in &groups {
            app_group_children.push_str(&format!("\t\t\t\t{} /* {} */,\n", group.id, group.name));
        }

        let mut group_records = String::new();
        for group in &groups {
            let mut children = String::new();
            for file in &group.files {
                children.push_str(&format!("\t\t\t\t{} /* {} */,\n", file.file_ref_id, file.name));
            }
            group_records.push_str(&format!(
                "\t\t{id} /* {name} */ = {{\n\
                 \t\t\tisa = PBXGroup;\n\
                 \t\t\tchildren = (\n\
                 {children}\t\t\t);\n\
                 \t\t\tname = {name};\n\
                 \t\t\tsourceTree = \"<group>\";\n\
                 \t\t}};\n",
                id = group.id,
                name = group.name,
                children = children,
            ));
        }

        format!(
            "// !$*UTF8*$!\n\
             {{\n\
             \tarchiveVersion = 1;\n\
             \tclasses = {{\n\
             \t}};\n\
             \tobjectVersion = 60;\n\
             \tobjects = {{\n\
             \n\
             /* Begin PBXBuildFile section */\n\
             {build_file_lines}\
             /* End PBXBuildFile section */\n\
             \n\
             /* Begin PBXFileReference section */\n\
             \t\t{app_ref_id} /* {app}.app */ = {{isa = PBXFileReference; explicitFileType = wrapper.application; includeInIndex = 0; path = {app}.app; sourceTree = BUILT_PRODUCTS_DIR; }};\n\
             {file_ref_lines}\
             /* End PBXFileReference section */\n\
             \n\
             /* Begin PBXFrameworksBuildPhase section */\n\
             \t\t{frameworks_phase_id} /* Frameworks */ = {{\n\
             \t\t\tisa = PBXFrameworksBuildPhase;\n\
             \t\t\tbuildActionMask = 2147483647;\n\
             \t\t\tfiles = (\n\
             \t\t\t);\n\
             \t\t\trunOnlyForDeploymentPostprocessing = 0;\n\
             \t\t}};\n\
             /* End PBXFrameworksBuildPhase section */\n\
             \n\
             /* Begin PBXGroup section */\n\
             \t\t{main_group_id} = {{\n\
             \t\t\tisa = PBXGroup;\n\
             \t\t\tchildren = (\n\
             \t\t\t\t{app_group_id} /* {app} */,\n\
             \t\t\t\t{products_group_id} /* Products */,\n\
             \t\t\t);\n\
             \t\t\tsourceTree = \"<group>\";\n\
             \t\t}};\n\
             \t\t{products_group_id} /* Products */ = {{\n\
             \t\t\tisa = PBXGroup;\n\
             \t\t\tchildren = (\n\
             \t\t\t\t{app_ref_id} /* {app}.app */,\n\
             \t\t\t);\n\
             \t\t\tname = Products;\n\
             \t\t\tsourceTree = \"<group>\";\n\
             \t\t}};\n\
             \t\t{app_group_id} /* {app} */ = {{\n\
             \t\t\tisa = PBXGroup;\n\
             \t\t\tchildren = (\n\
             {app_group_children}\t\t\t);\n\
             \t\t\tpath = {app};\n\
             \t\t\tsourceTree = \"<group>\";\n\
             \t\t}};\n\
             {group_records}\
             /* End PBXGroup section */\n\
             \n\
             /* Begin PBXNativeTarget section */\n\
             \t\t{target_id} /* {app} */ = {{\n\
             \t\t\tisa = PBXNativeTarget;\n\
             \t\t\tbuildConfigurationList = {config_list_id} /* Build configuration list for PBXNativeTarget \"{app}\" */;\n\
             \t\t\tbuildPhases = (\n\
             \t\t\t\t{sources_phase_id} /* Sources */,\n\
             \t\t\t\t{frameworks_phase_id} /* Frameworks */,\n\
             \t\t\t);\n\
             \t\t\tbuildRules = (\n\
             \t\t\t);\n\
             \t\t\tdependencies = (\n\
             \t\t\t);\n\
             \t\t\tname = {app};\n\
             \t\t\tproductName = {app};\n\
             \t\t\tproductReference = {app_ref_id} /* {app}.app */;\n\
             \t\t\tproductType = \"com.apple.product-type.application\";\n\
             \t\t}};\n\
             /* End PBXNativeTarget section */\n\
             \n\
             /* Begin PBXProject section */\n\
             \t\t{project_id} /* Project object */ = {{\n\
             \t\t\tisa = PBXProject;\n\
             \t\t\tbuildConfigurationList = {config_list_id} /* Build configuration list for PBXProject \"{app}\" */;\n\
             \t\t\tcompatibilityVersion = \"Xcode 14.0\";\n\
             \t\t\tdevelopmentRegion = en;\n\
             \t\t\thasScannedForEncodings = 0;\n\
             \t\t\tknownRegions = (\n\
             \t\t\t\ten,\n\
             \t\t\t\tBase,\n\
             \t\t\t);\n\
             \t\t\tmainGroup = {main_group_id};\n\
             \t\t\tproductRefGroup = {products_group_id} /* Products */;\n\
             \t\t\tprojectDirPath = \"\";\n\
             \t\t\tprojectRoot = \"\";\n\
             \t\t\ttargets = (\n\
             \t\t\t\t{target_id} /* {app} */,\n\
             \t\t\t);\n\
             \t\t}};\n\
             /* End PBXProject section */\n\
             \n\
             /* Begin PBXSourcesBuildPhase section */\n\
             \t\t{sources_phase_id} /* Sources */ = {{\n\
             \t\t\tisa = PBXSourcesBuildPhase;\n\
             \t\t\tbuildActionMask = 2147483647;\n\
             \t\t\tfiles = (\n\
             {phase_member_lines}\t\t\t);\n\
             \t\t\trunOnlyForDeploymentPostprocessing = 0;\n\
             \t\t}};\n\
             /* End PBXSourcesBuildPhase section */\n\
             \t}};\n\
             \trootObject = {project_id} /* Project object */;\n\
             }}\n",
        )
    }

    /// Write the document into a fresh temp directory, under the usual
    /// `<App>.xcodeproj/project.pbxproj` location.
    pub fn on_disk(&self) -> DiskProject {
        let temp = TempDir::new().expect("TestProject::on_disk: failed to create temp dir");
        let project_dir = temp.path().join(format!("{}.xcodeproj", self.app_name));
        fs::create_dir_all(&project_dir).expect("TestProject::on_disk: failed to create dir");
        let manifest_path = project_dir.join("project.pbxproj");
        fs::write(&manifest_path, self.manifest())
            .expect("TestProject::on_disk: failed to write manifest");
        DiskProject {
            temp,
            manifest_path,
        }
    }
}

/// A [`TestProject`] written to a temporary directory.
pub struct DiskProject {
    temp: TempDir,
    manifest_path: PathBuf,
}

impl DiskProject {
    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn read_manifest(&self) -> String {
        fs::read_to_string(&self.manifest_path).expect("DiskProject: failed to read manifest")
    }
}

#[derive(Default)]
struct IdCounter(u64);

impl IdCounter {
    fn next(&mut self) -> String {
        self.0 += 1;
        format!("{:024X}", self.0)
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
