//! End-to-end tests: build a graph from a real directory tree, then query it.

use std::fs;
use std::path::{Path, PathBuf};

use incdeps::{Config, store};
use rstest::rstest;
use tempfile::TempDir;

/// Create `files` (relative path, contents) under a fresh temporary directory.
fn workspace(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    dir
}

fn config_for(root: &Path) -> Config {
    Config::new(root, root.join("out/graph.jsonl")).with_include_roots([root])
}

fn under(root: &Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|name| root.join(name)).collect()
}

#[tokio::test]
async fn chain_of_includes_is_reported_in_bfs_order() {
    let dir = workspace(&[
        ("a.h", ""),
        ("b.h", "#include \"a.h\"\n"),
        ("c.cpp", "#include \"b.h\"\nint main() {}\n"),
    ]);
    let root = dir.path();
    let config = config_for(root);

    let stats = incdeps::build_dependency_tree(&config).await.unwrap();
    let result = incdeps::who_is_using(root, &config.output, &root.join("a.h"))
        .await
        .unwrap();

    assert_eq!(stats.files_retained, 3);
    assert_eq!(stats.includes_resolved, 2);
    assert_eq!(result, under(root, &["a.h", "b.h", "c.cpp"]));
}

#[tokio::test]
async fn repeated_queries_return_the_same_answer() {
    let dir = workspace(&[
        ("include/base.h", ""),
        ("include/app.h", "#include <base.h>\n"),
        ("src/main.cpp", "#include <app.h>\n#include <base.h>\n"),
    ]);
    let root = dir.path();
    let config = config_for(root).with_include_roots([root.join("include"), root.to_path_buf()]);
    incdeps::build_dependency_tree(&config).await.unwrap();
    let target = root.join("include/base.h");

    let first = incdeps::who_is_using(root, &config.output, &target).await.unwrap();
    let second = incdeps::who_is_using(root, &config.output, &target).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        under(root, &["include/base.h", "include/app.h", "src/main.cpp"])
    );
}

#[tokio::test]
async fn blacklisted_file_is_absent_even_when_included() {
    let dir = workspace(&[
        ("lib/common.h", ""),
        ("sources/others/vendor.h", ""),
        ("main.c", "#include \"sources/others/vendor.h\"\n#include \"lib/common.h\"\n"),
    ]);
    let root = dir.path();
    let config = config_for(root).with_blacklist(["sources/others"]);

    let stats = incdeps::build_dependency_tree(&config).await.unwrap();
    let graph = store::load_file(&config.output).await.unwrap();

    assert_eq!(stats.files_blacklisted, 1);
    assert!(graph.id_of("sources/others/vendor.h").is_none());
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.edge_count(), 1);
}

#[rstest]
#[case("notes.ch", false)]
#[case("widget.h", true)]
#[case("legacy.C", false)]
#[case("model.r", true)]
#[tokio::test]
async fn extensions_match_as_literal_suffixes(#[case] name: &str, #[case] kept: bool) {
    let dir = workspace(&[(name, "")]);
    let root = dir.path();
    let config = config_for(root);

    incdeps::build_dependency_tree(&config).await.unwrap();
    let graph = store::load_file(&config.output).await.unwrap();

    assert_eq!(graph.id_of(name).is_some(), kept);
}

#[tokio::test]
async fn first_include_root_wins() {
    let dir = workspace(&[
        ("vendor/config.h", ""),
        ("local/config.h", ""),
        ("main.cpp", "#include <config.h>\n"),
    ]);
    let root = dir.path();
    let config = config_for(root).with_include_roots([root.join("local"), root.join("vendor")]);

    incdeps::build_dependency_tree(&config).await.unwrap();
    let graph = store::load_file(&config.output).await.unwrap();

    let main = graph.id_of("main.cpp").unwrap();
    let local = graph.id_of("local/config.h").unwrap();
    assert_eq!(graph.direct_includes(main), vec![local]);
    assert!(graph.direct_dependents(graph.id_of("vendor/config.h").unwrap()).is_empty());
}

#[tokio::test]
async fn system_headers_stay_unresolved() {
    let dir = workspace(&[("main.c", "#include <stdio.h>\n#include <stdlib.h>\n")]);
    let root = dir.path();
    let config = config_for(root);

    let stats = incdeps::build_dependency_tree(&config).await.unwrap();

    assert_eq!(stats.includes_found, 2);
    assert_eq!(stats.includes_unresolved(), 2);
}

#[tokio::test]
async fn rebuilding_an_unchanged_tree_writes_identical_artifacts() {
    let dir = workspace(&[
        ("z.h", ""),
        ("m/y.h", "#include \"z.h\"\n"),
        ("a.cpp", "#include \"m/y.h\"\n#include \"z.h\"\n"),
        ("m/n/x.hpp", "#include \"z.h\"\n"),
    ]);
    let root = dir.path();
    let config = config_for(root);

    incdeps::build_dependency_tree(&config).await.unwrap();
    let first = fs::read(&config.output).unwrap();
    incdeps::build_dependency_tree(&config).await.unwrap();
    let second = fs::read(&config.output).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn stored_edges_are_mirrored() {
    let dir = workspace(&[
        ("a.h", ""),
        ("b.h", "#include \"a.h\"\n#include \"a.h\"\n"),
        ("c.c", "#include \"b.h\"\n#include \"a.h\"\n"),
    ]);
    let root = dir.path();
    let config = config_for(root);

    incdeps::build_dependency_tree(&config).await.unwrap();
    let graph = store::load_file(&config.output).await.unwrap();

    for (index, node) in graph.nodes().iter().enumerate() {
        for target in &node.includes {
            let back = graph.node(*target).unwrap();
            let forward = node.includes.iter().filter(|t| *t == target).count();
            let mirrored = back.used_by.iter().filter(|s| s.index() == index).count();
            assert_eq!(forward, mirrored, "edge {} -> {} not mirrored", node.file, back.file);
        }
    }
}

#[tokio::test]
async fn artifact_directory_is_not_cataloged() {
    let dir = workspace(&[("a.h", "")]);
    let root = dir.path();
    let config = Config::new(root, incdeps::config::default_output(root));

    incdeps::build_dependency_tree(&config).await.unwrap();
    incdeps::build_dependency_tree(&config).await.unwrap();
    let graph = store::load_file(&config.output).await.unwrap();

    assert_eq!(graph.len(), 1);
}

#[tokio::test]
async fn carriage_return_line_endings_keep_every_directive() {
    let dir = workspace(&[
        ("a.h", ""),
        ("b.h", ""),
        ("c.c", "#include \"a.h\"\r#include \"b.h\"\r"),
    ]);
    let root = dir.path();
    let config = config_for(root);

    let stats = incdeps::build_dependency_tree(&config).await.unwrap();
    let graph = store::load_file(&config.output).await.unwrap();

    assert_eq!(stats.includes_found, 2);
    let c = graph.id_of("c.c").unwrap();
    assert_eq!(
        graph.direct_includes(c),
        vec![graph.id_of("a.h").unwrap(), graph.id_of("b.h").unwrap()]
    );
}
