//! Integration tests for the full registry / implementation / test pipeline

use std::path::{Path, PathBuf};
use vuidstat_core::{
    Analysis, CheckKind, ConsistencyPolicy, DEFAULT_TEST_GROUPS, Error, ImplementationIndex,
    MemorySources, PathSources, Ratio, Registry, TestIndex, group_trigger,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixtures() -> &'static Path {
    Path::new(FIXTURES_DIR)
}

fn triggers() -> Vec<String> {
    DEFAULT_TEST_GROUPS.iter().map(|g| group_trigger(g)).collect()
}

fn fixture_analysis(policy: ConsistencyPolicy) -> Analysis {
    let root = fixtures();
    let registry = Registry::load(root.join("validusage.json")).expect("registry should load");
    let implementation = ImplementationIndex::build(
        PathSources::new([root.join("layers/core_validation.cpp")])
            .with_generated(root, &["object_tracker.cpp"], &["dbuild/layers", "build/layers"])
            .expect("generated source should resolve"),
    )
    .expect("implementation should index");
    let tests = TestIndex::build(
        PathSources::new([root.join("tests/layer_validation_tests.cpp")]),
        &triggers(),
    )
    .expect("tests should index");
    Analysis::new(registry, implementation, tests, policy)
}

fn minimal_registry() -> Registry {
    Registry::from_json(
        r#"{
            "version info": { "api version": "1.1.0" },
            "validation": {
                "vkFoo": { "core": [
                    { "vuid": "VUID-foo-bar-00001", "text": "explicit rule" },
                    { "vuid": "VUID-foo-baz", "text": "implicit rule" }
                ] },
                "vkTrimCommandPool": { "core": [
                    { "vuid": "VUID-vkTrimCommandPool-device-parameter", "text": "device" }
                ] }
            }
        }"#,
    )
    .expect("registry should parse")
}

#[test]
fn single_explicit_identifier_scenario() {
    let registry = Registry::from_json(
        r#"{
            "version info": { "api version": "1.1.0" },
            "validation": { "vkFoo": { "core": [
                { "vuid": "VUID-foo-bar-00001", "text": "explicit rule" },
                { "vuid": "VUID-foo-baz", "text": "implicit rule" }
            ] } }
        }"#,
    )
    .unwrap();
    let implementation = ImplementationIndex::build(
        MemorySources::new().add("layer.cpp", r#"skip |= Log(obj, "VUID-foo-bar-00001");"#),
    )
    .unwrap();
    let tests = TestIndex::build(
        MemorySources::new().add(
            "tests.cpp",
            "TEST_F(VkLayerTest, T1) {\n    Expect(\"VUID-foo-bar-00001\");\n}\n",
        ),
        &triggers(),
    )
    .unwrap();
    let analysis = Analysis::new(registry, implementation, tests, ConsistencyPolicy::default());

    let coverage = analysis.coverage();
    assert_eq!(coverage.checked_explicit.percent(), Some(100.0));
    assert_eq!(coverage.checked_implicit.percent(), Some(0.0));
    assert_eq!(coverage.tested_explicit.percent(), Some(100.0));
    assert!(analysis.consistency().is_consistent());

    let status = analysis.status("VUID-foo-bar-00001").expect("known identifier");
    assert!(status.defined());
    assert!(status.implemented());
    assert_eq!(status.sites.len(), 1);
    assert_eq!(status.sites[0].line, 1);
    assert!(status.tested());
    assert_eq!(status.tests, Some(["T1"].into()));
}

#[test]
fn undefined_implementation_identifier_scenario() {
    let implementation = ImplementationIndex::build(MemorySources::new().add(
        "layer.cpp",
        r#"Log("VUID-foo-bar-00001", "VUID-foo-typo-00002");"#,
    ))
    .unwrap();
    let analysis = Analysis::new(
        minimal_registry(),
        implementation,
        TestIndex::default(),
        ConsistencyPolicy::default(),
    );

    let report = analysis.consistency();
    assert_eq!(
        report.undefined_in_implementation.offenders,
        vec!["VUID-foo-typo-00002"]
    );
    assert!(!report.is_consistent());
}

#[test]
fn deprecated_alias_scenario() {
    let implementation = ImplementationIndex::build(MemorySources::new().add(
        "layer.cpp",
        r#"Log("VUID-vkTrimCommandPoolKHR-device-parameter");"#,
    ))
    .unwrap();
    let analysis = Analysis::new(
        minimal_registry(),
        implementation,
        TestIndex::default(),
        ConsistencyPolicy::default(),
    );

    assert!(analysis.consistency().undefined_in_implementation.passed());
    assert_eq!(analysis.coverage().checked_implicit, Ratio::new(1, 2));
}

#[test]
fn fixture_registry() {
    let analysis = fixture_analysis(ConsistencyPolicy::default());
    let registry = analysis.registry();
    assert_eq!(registry.api_version(), "1.1.82");
    assert_eq!(registry.ids().explicit.len(), 3);
    assert_eq!(registry.ids().implicit.len(), 4);

    let entry = registry.get("VUID-VkImageCreateInfo-samples-02257").unwrap();
    assert_eq!(entry.api, "VkImageCreateInfo");
    assert_eq!(entry.extension, "core");
    assert!(entry.text.contains("VK_IMAGE_TYPE_2D & mipLevels must be equal to 1"));

    let entry = registry.get("VUID-vkTrimCommandPool-flags-zerobitmask").unwrap();
    assert_eq!(entry.extension, "VK_KHR_maintenance1");
    assert_eq!(entry.text, "flags must be 0");
}

#[test]
fn fixture_implementation_index() {
    let analysis = fixture_analysis(ConsistencyPolicy::default());
    let implementation = analysis.implementation();

    assert_eq!(implementation.len(), 6);
    assert_eq!(implementation.duplicate_count(), 1);
    assert_eq!(implementation.ids().explicit.len(), 2);
    assert_eq!(implementation.ids().unassigned.len(), 1);
    assert!(implementation.occurrences("VUID-vkCmdDraw-renderpass").is_empty());

    let sites = implementation.occurrences("VUID-VkImageCreateInfo-imageType-00954");
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].line, 7);
    assert!(sites[0].file.ends_with("layers/core_validation.cpp"));

    let generated = implementation.occurrences("VUID-vkCmdDraw-commandBuffer-parameter");
    assert_eq!(generated.len(), 2);
    assert!(generated[0].file.ends_with("build/layers/object_tracker.cpp"));
}

#[test]
fn fixture_test_index() {
    let analysis = fixture_analysis(ConsistencyPolicy::default());
    let tests = analysis.tests();

    assert_eq!(tests.len(), 4);
    let names: Vec<&str> = tests
        .tests_for("VUID-VkImageCreateInfo-imageType-00954")
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["CreateImageWithBadExtentForOneDimensionalImageType"]);
    assert!(tests.tests_for("VUID-vkCmdDraw-renderpass").is_none());
}

#[test]
fn fixture_consistency() {
    let report = fixture_analysis(ConsistencyPolicy::default()).consistency();
    assert!(report.undefined_in_implementation.passed());
    assert!(report.undefined_in_tests.passed());
    assert_eq!(report.tested_not_checked.kind, CheckKind::TestedNotChecked);
    assert_eq!(
        report.tested_not_checked.offenders,
        vec!["VUID-VkImageCreateInfo-samples-02257"]
    );
    assert!(!report.is_consistent());

    let raw = fixture_analysis(ConsistencyPolicy {
        dealias: false,
        ignore_unassigned: false,
    })
    .consistency();
    assert_eq!(
        raw.undefined_in_implementation.offenders,
        vec![
            "UNASSIGNED-CoreValidation-DrawState-InvalidCommandBuffer",
            "VUID-vkTrimCommandPoolKHR-device-parameter",
        ]
    );
    assert_eq!(
        raw.undefined_in_tests.offenders,
        vec!["VUID-vkTrimCommandPoolKHR-device-parameter"]
    );
}

#[test]
fn fixture_coverage() {
    let analysis = fixture_analysis(ConsistencyPolicy::default());
    let coverage = analysis.coverage();
    assert_eq!(coverage.checked_explicit, Ratio::new(2, 3));
    assert_eq!(coverage.checked_implicit, Ratio::new(2, 4));
    assert_eq!(coverage.checked_overall, Ratio::new(4, 7));
    assert_eq!(coverage.tested_explicit, Ratio::new(2, 2));
    assert_eq!(coverage.tested_implicit, Ratio::new(1, 3));
    assert_eq!(coverage.tested_overall, Ratio::new(3, 5));

    assert_eq!(analysis.unimplemented(), vec!["VUID-VkImageCreateInfo-samples-02257"]);
}

#[test]
fn fixture_point_queries() {
    let analysis = fixture_analysis(ConsistencyPolicy::default());

    let status = analysis.status("VUID-vkCmdDraw-renderpass").unwrap();
    assert!(status.defined());
    assert!(!status.implemented());
    assert!(!status.tested());

    let status = analysis
        .status("UNASSIGNED-CoreValidation-DrawState-InvalidCommandBuffer")
        .unwrap();
    assert!(!status.defined());
    assert!(status.implemented());

    assert!(analysis.status("VUID-vkCmdDraw-doesNotExist-99999").is_none());
}

#[test]
fn fixture_database_rows() {
    let analysis = fixture_analysis(ConsistencyPolicy::default());
    let rows = analysis.rows();
    assert_eq!(rows.len(), 7);
    assert!(rows.windows(2).all(|w| w[0].id < w[1].id));

    let trim = rows
        .iter()
        .find(|row| row.id == "VUID-vkTrimCommandPool-device-parameter")
        .unwrap();
    assert!(trim.checked, "alias-folded implementation counts as checked");
    assert_eq!(trim.tests, Some(["TrimCommandPool"].into()));
}

#[test]
fn canonical_status_includes_deprecated_spellings() {
    let analysis = fixture_analysis(ConsistencyPolicy::default());
    let status = analysis
        .status("VUID-vkTrimCommandPool-device-parameter")
        .unwrap();
    assert!(status.defined());
    assert!(status.implemented());
    assert_eq!(status.sites.len(), 1);
    assert_eq!(status.sites[0].line, 14);
    assert!(status.sites[0].file.ends_with("layers/core_validation.cpp"));
    assert_eq!(status.tests, Some(["TrimCommandPool"].into()));

    let raw = fixture_analysis(ConsistencyPolicy {
        dealias: false,
        ..Default::default()
    });
    let status = raw.status("VUID-vkTrimCommandPool-device-parameter").unwrap();
    assert!(!status.implemented());
    assert!(!status.tested());
    let trim = raw
        .rows()
        .into_iter()
        .find(|row| row.id == "VUID-vkTrimCommandPool-device-parameter")
        .unwrap();
    assert!(!trim.checked);
    assert!(trim.tests.is_none());
}

#[test]
fn results_do_not_depend_on_file_order() {
    let root = fixtures();
    let forward = ImplementationIndex::build(PathSources::new([
        root.join("layers/core_validation.cpp"),
        root.join("build/layers/object_tracker.cpp"),
    ]))
    .unwrap();
    let backward = ImplementationIndex::build(PathSources::new([
        root.join("build/layers/object_tracker.cpp"),
        root.join("layers/core_validation.cpp"),
    ]))
    .unwrap();

    let registry = Registry::load(root.join("validusage.json")).unwrap();
    let policy = ConsistencyPolicy::default();
    let a = Analysis::new(registry.clone(), forward, TestIndex::default(), policy);
    let b = Analysis::new(registry, backward, TestIndex::default(), policy);
    assert_eq!(a.consistency(), b.consistency());
    assert_eq!(a.coverage(), b.coverage());
}

#[test]
fn generated_source_probe_takes_first_match() {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    for dir in ["build/layers", "release/layers"] {
        std::fs::create_dir_all(temp.path().join(dir)).unwrap();
        std::fs::write(
            temp.path().join(dir).join("parameter_validation.cpp"),
            format!("Log(\"VUID-vkFoo-{}-parameter\");\n", dir.replace('/', "_")),
        )
        .unwrap();
    }

    let sources = PathSources::new(Vec::<PathBuf>::new())
        .with_generated(
            temp.path(),
            &["parameter_validation.cpp"],
            &["dbuild/layers", "release/layers", "build/layers"],
        )
        .unwrap();
    assert_eq!(
        sources.paths(),
        &[temp.path().join("release/layers/parameter_validation.cpp")]
    );

    let err = PathSources::new(Vec::<PathBuf>::new())
        .with_generated(temp.path(), &["object_tracker.cpp"], &["build/layers"])
        .unwrap_err();
    assert!(matches!(err, Error::GeneratedSourceMissing { .. }));
}
