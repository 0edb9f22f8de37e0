use std::{cell::Cell, fs, path::PathBuf};

use codspeed_criterion_compat::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};
use miette::{Context as _, IntoDiagnostic};

use docquery::{recipe::Recipe, Document, NodeMatcher, SequenceMatcher};

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Fixture pages, repeated so traversal dominates parsing.
fn page_samples() -> Vec<(String, String)> {
    let fixture_path = root().join("tests/fixtures");
    let samples = fs::read_dir(&fixture_path)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|ent| ent.file_type().is_ok_and(|ft| ft.is_file()))
        .map(|ent| ent.path())
        .map(|p| {
            let src = fs::read_to_string(&p)
                .into_diagnostic()
                .with_context(|| format!("Could not open {}", p.display()))
                .unwrap();
            let name = p.file_name().unwrap().to_string_lossy().into_owned();
            (name, src.repeat(50))
        })
        .collect::<Vec<_>>();
    assert!(!samples.is_empty());
    samples
}

fn benchmark_traverse(c: &mut Criterion) {
    let samples = page_samples();
    let mut group = c.benchmark_group("traverse");

    for (name, html) in &samples {
        let doc = Document::parse(html);
        group.bench_with_input(BenchmarkId::new("static", name), &doc, |b, doc| {
            let hits = Cell::new(0usize);
            let matcher = NodeMatcher::new("div,section,main")
                .with_child(NodeMatcher::new("h1,h2,h3,p,pre").on_match(|_| hits.set(hits.get() + 1)))
                .into_ref();
            b.iter(|| doc.traverse(black_box(&[matcher.clone()])));
        });
        group.bench_with_input(BenchmarkId::new("sequence", name), &doc, |b, doc| {
            let hits = Cell::new(0usize);
            let matcher = SequenceMatcher::new("ul > li")
                .recursive(true)
                .on_match(|_| hits.set(hits.get() + 1))
                .into_ref();
            b.iter(|| doc.traverse(black_box(&[matcher.clone()])));
        });
    }
    group.finish()
}

fn benchmark_recipes(c: &mut Criterion) {
    let recipes = ["godoc", "godoc_readme", "python_modindex"]
        .map(|name| Recipe::from_file(root().join(format!("recipes/{name}.toml"))).unwrap());
    let samples = page_samples();
    let mut group = c.benchmark_group("recipes");

    for (name, html) in &samples {
        let doc = Document::parse(html);
        group.bench_with_input(BenchmarkId::new("extract_first", name), &doc, |b, doc| {
            b.iter(|| docquery::recipe::extract_first(&recipes, black_box(doc), None));
        });
    }
    group.finish()
}

criterion_group!(benches, benchmark_traverse, benchmark_recipes);
criterion_main!(benches);
