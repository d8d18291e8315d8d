use std::fs;
use std::path::Path;
use webintel::config::{ConfigLoader, OutputConfig};

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn loads_yaml_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "run.yaml",
        "name: crm\ngroups:\n  - name: ours\n    urls: [\"https://a.com\"]\n",
    );

    let config = ConfigLoader::load(dir.path().join("run.yaml")).unwrap();
    assert_eq!(config.name, "crm");
    assert_eq!(config.timeout_secs, 10);
    assert_eq!(config.max_urls, 10);
    assert!(!config.stealth_delay);
    assert_eq!(config.freshness_year, "2025");
    assert_eq!(config.pre_request_delay_ms.min, 250);
    assert_eq!(config.pre_request_delay_ms.max, 1000);
    assert!(config.output.is_none());
}

#[test]
fn child_overrides_parent() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "base.toml",
        r#"
name = "base"
timeout_secs = 20
stealth_delay = true

[output]
type = "json"
path = "out.json"
"#,
    );
    write(
        dir.path(),
        "child.json",
        r#"{
  "name": "child",
  "extends": "base.toml",
  "freshness_year": "2026",
  "groups": [
    {"name": "a", "urls": ["a.com"]},
    {"name": "b", "urls": ["b.com"]}
  ]
}"#,
    );

    let config = ConfigLoader::load(dir.path().join("child.json")).unwrap();
    assert_eq!(config.name, "child");
    assert_eq!(config.timeout_secs, 20);
    assert!(config.stealth_delay);
    assert_eq!(config.freshness_year, "2026");
    assert_eq!(config.groups.len(), 2);
    assert!(config.extends.is_none());
    assert!(matches!(config.output, Some(OutputConfig::Json { .. })));
}

#[test]
fn rejects_circular_inheritance() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.yaml", "name: a\nextends: b.yaml\n");
    write(dir.path(), "b.yaml", "name: b\nextends: a.yaml\n");

    let err = ConfigLoader::load(dir.path().join("a.yaml")).unwrap_err();
    assert!(err.to_string().contains("Circular inheritance"));
}

#[test]
fn validation_rejects_bad_configs() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "none.yaml", "name: empty\n");
    write(
        dir.path(),
        "three.yaml",
        "name: many\ngroups:\n  - {name: a, urls: [a.com]}\n  - {name: b, urls: [b.com]}\n  - {name: c, urls: [c.com]}\n",
    );
    write(
        dir.path(),
        "delay.yaml",
        "name: d\npre_request_delay_ms: {min: 900, max: 100}\ngroups:\n  - {name: a, urls: [a.com]}\n",
    );
    write(dir.path(), "nourls.yaml", "name: n\ngroups:\n  - {name: a}\n");

    for file in ["none.yaml", "three.yaml", "delay.yaml", "nourls.yaml"] {
        assert!(ConfigLoader::load(dir.path().join(file)).is_err(), "{}", file);
    }
}

#[test]
fn rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "run.ini", "name = x");
    assert!(ConfigLoader::load(dir.path().join("run.ini")).is_err());
}

#[test]
fn group_urls_merge_inline_and_file_lists() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "urls.txt", "\n  https://b.com \n\nc.com\nd.com\n");
    write(
        dir.path(),
        "run.yaml",
        "name: x\nmax_urls: 3\ngroups:\n  - name: g\n    urls: [\"https://a.com\"]\n    urls_file: urls.txt\n",
    );

    let config = ConfigLoader::load(dir.path().join("run.yaml")).unwrap();
    let urls = ConfigLoader::group_urls(&config, &config.groups[0]).unwrap();
    assert_eq!(urls, vec!["https://a.com", "https://b.com", "c.com"]);
}

#[test]
fn bundled_demo_configs_load() {
    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");

    let compare = ConfigLoader::load(demos.join("crm-compare.yaml")).unwrap();
    assert_eq!(compare.groups.len(), 2);
    let competitors = ConfigLoader::group_urls(&compare, &compare.groups[1]).unwrap();
    assert_eq!(competitors.len(), 2);

    let single = ConfigLoader::load(demos.join("single-group.json")).unwrap();
    assert_eq!(single.timeout_secs, 15);
    assert_eq!(single.pre_request_delay_ms.min, 500);
    assert!(matches!(single.output, Some(OutputConfig::Sqlite { .. })));
}
