//! Cache behavior of `build_context` across repeated requests.

use std::{
    fs,
    path::PathBuf,
    time::{Duration, SystemTime},
};

use exportbridge_attrs::CommentScanner;
use exportbridge_build::{
    BuildEnv, BuildRequest, BuildUnitCache, RandomIds, SequentialIds, build_context,
};
use exportbridge_core::Platform;
use tempfile::TempDir;

const SOURCE: &str = r#"// [[depends(linalg)]]

// [[export]]
double square(double x) { return x * x; }
"#;

fn write_source(temp: &TempDir, name: &str) -> PathBuf {
    let path = temp.path().join(name);
    fs::write(&path, SOURCE).expect("Failed to write source");
    path
}

fn touch_artifact(path: &PathBuf) {
    fs::write(path, b"").expect("Failed to create artifact");
}

#[test]
fn test_unchanged_source_reuses_unit() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let source = write_source(&temp, "square.cpp");
    let platform = Platform::new("/", ".so");
    let scanner = CommentScanner::new();
    let mut ids = SequentialIds::new("unit");
    let mut env = BuildEnv::new(&platform, temp.path().join("build"), &scanner, &mut ids);
    let mut cache = BuildUnitCache::new();
    let request = BuildRequest::from_path(&source);

    let first = build_context(&mut cache, &request, &mut env).expect("first request");
    assert!(first.build_required);
    assert_eq!(first.exported_function_names, ["square"]);
    assert_eq!(first.dependency_names, ["linalg"]);
    assert_eq!(first.generated_source_filename, "square.cpp");
    assert_eq!(first.artifact_filename, "unit_1.so");

    // Not compiled yet: still required.
    let pending = build_context(&mut cache, &request, &mut env).expect("second request");
    assert_eq!(pending.module_name, first.module_name);
    assert!(pending.build_required);

    touch_artifact(&first.artifact_path);
    let built = build_context(&mut cache, &request, &mut env).expect("third request");
    assert_eq!(built.module_name, first.module_name);
    assert!(!built.build_required);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_touched_source_requires_rebuild() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let source = write_source(&temp, "square.cpp");
    let platform = Platform::new("/", ".so");
    let scanner = CommentScanner::new();
    let mut ids = SequentialIds::new("unit");
    let mut env = BuildEnv::new(&platform, temp.path().join("build"), &scanner, &mut ids);
    let mut cache = BuildUnitCache::new();
    let request = BuildRequest::from_path(&source);

    let first = build_context(&mut cache, &request, &mut env).expect("first request");
    touch_artifact(&first.artifact_path);

    fs::write(
        &source,
        "// [[export]]\nint cube(int x) { return x * x * x; }\n",
    )
    .expect("Failed to edit source");
    fs::File::options()
        .write(true)
        .open(&source)
        .and_then(|f| f.set_modified(SystemTime::now() + Duration::from_secs(60)))
        .expect("Failed to touch source");

    let second = build_context(&mut cache, &request, &mut env).expect("second request");
    assert!(second.build_required);
    assert_eq!(second.module_name, first.module_name);
    assert_eq!(second.exported_function_names, ["cube"]);
    assert!(second.dependency_names.is_empty());
    assert!(second.generated_code.contains("bridge::function(\"cube\", &cube);"));
}

#[test]
fn test_same_code_twice_gets_distinct_modules() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let a = write_source(&temp, "a.cpp");
    let b = write_source(&temp, "b.cpp");
    let platform = Platform::new("/", ".so");
    let scanner = CommentScanner::new();
    let mut ids = RandomIds::new();
    let mut env = BuildEnv::new(&platform, temp.path().join("build"), &scanner, &mut ids);

    // Two independent caches, as two callers that do not deduplicate.
    let first = build_context(
        &mut BuildUnitCache::new(),
        &BuildRequest::from_code(&a, SOURCE),
        &mut env,
    )
    .expect("first unit");
    let second = build_context(
        &mut BuildUnitCache::new(),
        &BuildRequest::from_code(&b, SOURCE),
        &mut env,
    )
    .expect("second unit");

    assert_ne!(first.module_name, second.module_name);
    assert_ne!(first.build_directory, second.build_directory);
    assert!(first.module_name.starts_with("bridge_"));
}

#[test]
fn test_content_key_hits_across_paths() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let a = write_source(&temp, "a.cpp");
    let b = write_source(&temp, "b.cpp");
    let platform = Platform::new("/", ".so");
    let scanner = CommentScanner::new();
    let mut ids = SequentialIds::new("unit");
    let mut env = BuildEnv::new(&platform, temp.path().join("build"), &scanner, &mut ids);
    let mut cache = BuildUnitCache::new();

    let first = build_context(&mut cache, &BuildRequest::from_code(&a, SOURCE), &mut env)
        .expect("first request");
    let second = build_context(&mut cache, &BuildRequest::from_code(&b, SOURCE), &mut env)
        .expect("second request");

    assert_eq!(first.module_name, second.module_name);
    assert_eq!(second.source_path, a);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_context_serializes() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let source = write_source(&temp, "square.cpp");
    let platform = Platform::new("/", ".so");
    let scanner = CommentScanner::new();
    let mut ids = SequentialIds::new("unit");
    let mut env = BuildEnv::new(&platform, temp.path().join("build"), &scanner, &mut ids);

    let context = build_context(
        &mut BuildUnitCache::new(),
        &BuildRequest::from_path(&source),
        &mut env,
    )
    .expect("request");
    let json = serde_json::to_value(&context).expect("Failed to serialize");

    assert_eq!(json["module_name"], "unit_1");
    assert_eq!(json["build_required"], true);
    assert_eq!(json["exported_function_names"][0], "square");
}
