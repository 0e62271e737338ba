//! Benchmarks for the manifest walk.
//!
//! Run with: cargo bench

use std::fs;

use criterion::{Criterion, criterion_group, criterion_main};

use bbcanvas::canvas::{BlackboardHtml, DryRun};
use bbcanvas::dom::parse_str;
use bbcanvas::{ImportConfig, import_package};

const HANDLERS: [&str; 6] = [
    "resource/x-bb-document",
    "resource/x-bb-file",
    "resource/x-bb-externallink",
    "resource/x-bb-assignment",
    "resource/x-bb-asmt-survey-link",
    "resource/x-bb-courselink",
];

/// A course with `modules` top-level modules of `items` leaves each.
fn build_package(modules: usize, items: usize) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let mut manifest = String::from("<MANIFEST><ORGANIZATIONS><ORGANIZATION>\n");

    for m in 0..modules {
        manifest.push_str(&format!("<ITEM IDENTIFIER=\"mod{m}\"><TITLE>Module {m}</TITLE>\n"));
        for i in 0..items {
            let id = format!("res{m:03}{i:03}");
            let handler = HANDLERS[(m + i) % HANDLERS.len()];
            manifest.push_str(&format!(
                "  <ITEM IDENTIFIER=\"itm_{id}\" IDENTIFIERREF=\"{id}\"><TITLE>{id}</TITLE></ITEM>\n"
            ));
            fs::write(
                dir.path().join(format!("{id}.dat")),
                format!(
                    "<CONTENT><TITLE VALUE=\"{id}\"/><BODY><TEXT>&lt;p&gt;Body of {id}&lt;/p&gt;</TEXT></BODY>\
                     <CONTENTHANDLER VALUE=\"{handler}\"/></CONTENT>"
                ),
            )
            .unwrap();
        }
        manifest.push_str("</ITEM>\n");
    }
    manifest.push_str("</ORGANIZATION></ORGANIZATIONS></MANIFEST>\n");
    fs::write(dir.path().join("imsmanifest.xml"), &manifest).unwrap();

    (dir, manifest)
}

fn bench_walk(c: &mut Criterion) {
    let (dir, manifest) = build_package(20, 25);
    let config = ImportConfig::new(dir.path());

    c.bench_function("parse_manifest_500_items", |b| {
        b.iter(|| parse_str(&manifest).unwrap())
    });

    c.bench_function("import_package_500_items", |b| {
        b.iter(|| {
            let mut pages = DryRun::new();
            import_package(&config, "1", &mut pages, &BlackboardHtml).unwrap()
        })
    });
}

criterion_group!(benches, bench_walk);
criterion_main!(benches);
