//! End-to-end runs over a project on disk

use std::fs;
use std::path::{Path, PathBuf};

use apidoc_core::config::CONFIG_FILE;
use apidoc_core::generator::GenerateError;
use apidoc_core::render::RenderError;
use apidoc_core::{DocConfig, Generator};

fn write(root: &Path, path: &str, source: &str) {
    let target = root.join(path);
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(target, source).unwrap();
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        CONFIG_FILE,
        r#"
[project]
name = "Acme Collections"

[source]
paths = ["src"]
exclude = ["**/Fixtures/**"]
reference = ["vendor"]

[output]
dir = "build/docs"
"#,
    );
    write(
        dir.path(),
        "src/Collection.php",
        r"<?php
namespace Acme;

use Vendor\Arrayable;

/**
 * An ordered list of items.
 *
 * @template T
 * @implements \IteratorAggregate<int, T>
 */
class Collection implements \IteratorAggregate, \Countable, Arrayable
{
    /** @var list<T> */
    private array $items = [];

    /**
     * @param T $item the item to add
     * @return static
     * @throws \InvalidArgumentException when the item is null
     */
    public function add(mixed $item): static {}

    public function count(): int {}

    /** @return \Generator<int, T> */
    public function getIterator(): \Generator {}
}
",
    );
    write(
        dir.path(),
        "src/Http/HTTPClient.php",
        r"<?php
namespace Acme\Http;

/** @deprecated use Psr18 clients */
final class HTTPClient {}
",
    );
    write(dir.path(), "src/Fixtures/Fake.php", "<?php namespace Acme; class Fake {}");
    write(
        dir.path(),
        "vendor/Arrayable.php",
        "<?php namespace Vendor; interface Arrayable { public function toArray(): array; }",
    );
    dir
}

#[test]
fn test_generates_pages() {
    let dir = project();
    let config = DocConfig::from_path(dir.path().join(CONFIG_FILE)).unwrap();
    let report = Generator::new(config, dir.path()).run().unwrap();

    assert_eq!(report.files_scanned, 3);
    assert!(report.files_skipped.is_empty());
    assert_eq!(report.structures, 2);
    assert_eq!(
        report.pages,
        vec![
            PathBuf::from("classes/acme/collection.html"),
            PathBuf::from("classes/acme/http/http-client.html"),
            PathBuf::from("index.html"),
        ]
    );

    let out = dir.path().join("build/docs");
    let collection = fs::read_to_string(out.join("classes/acme/collection.html")).unwrap();
    assert!(collection.contains("<p>An ordered list of items.</p>"));
    assert!(collection.contains("title=\"IteratorAggregate\">IteratorAggregate</a>&lt;int, <span class=\"template\">T</span>&gt;"));
    assert!(collection.contains("<abbr title=\"Vendor\\Arrayable\">Arrayable</abbr>"));
    assert!(collection.contains("private list&lt;<span class=\"template\">T</span>&gt; $items = []"));
    assert!(collection.contains("the item to add"));
    assert!(collection.contains("when the item is null"));
    assert!(collection.contains("Specified by <a href=\"https://www.php.net/manual/en/class.countable.php\""));
    assert!(collection.contains("Declared in <abbr title=\"Vendor\\Arrayable\">"));

    let client = fs::read_to_string(out.join("classes/acme/http/http-client.html")).unwrap();
    assert!(client.contains("<span class=\"kind\">final class</span> HTTPClient"));
    assert!(client.contains("Deprecated: use Psr18 clients"));
    assert!(client.contains("<a href=\"../../../classes/acme/collection.html\">Collection</a>"));

    let index = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index.contains("<h1>Acme Collections</h1>"));
    assert!(index.find("<h2>Acme\\Http</h2>").unwrap() < index.find("<h2>Acme</h2>").unwrap());
    assert!(!index.contains("Fake"));
}

#[test]
fn test_runs_are_byte_identical() {
    let dir = project();
    let config = DocConfig::from_path(dir.path().join(CONFIG_FILE)).unwrap();
    let first_out = dir.path().join("first");
    let second_out = dir.path().join("second");
    Generator::new(config.clone(), dir.path())
        .with_output_dir(&first_out)
        .run()
        .unwrap();
    let report = Generator::new(config, dir.path())
        .with_output_dir(&second_out)
        .run()
        .unwrap();

    for page in report.pages {
        let first = fs::read(first_out.join(&page)).unwrap();
        let second = fs::read(second_out.join(&page)).unwrap();
        assert_eq!(first, second, "{} differs between runs", page.display());
    }
}

#[test]
fn test_unmodelled_type_aborts_without_output() {
    let dir = project();
    write(
        dir.path(),
        "src/Ratio.php",
        "<?php namespace Acme; class Ratio { /** @return 0.5 */ public function half() {} }",
    );
    let config = DocConfig::from_path(dir.path().join(CONFIG_FILE)).unwrap();
    let result = Generator::new(config, dir.path()).run();

    assert!(matches!(result, Err(GenerateError::Render(RenderError::Resolve(_)))));
    assert!(!dir.path().join("build/docs").exists());
}

#[test]
fn test_check_writes_nothing() {
    let dir = project();
    let config = DocConfig::from_path(dir.path().join(CONFIG_FILE)).unwrap();
    let report = Generator::new(config, dir.path()).check().unwrap();
    assert_eq!(report.structures, 2);
    assert!(report.pages.is_empty());
    assert!(!dir.path().join("build/docs").exists());
}
