//! Benchmarks for row flattening and windowing.
//!
//! These measure the per-frame work of the virtualized row engine on a
//! canvas much larger than anything the terminal shell loads.

use canvas_nav::config::VirtualizationConfig;
use canvas_nav::demo::sample_sections;
use canvas_nav::store::View;
use canvas_nav::virtual_list::{flatten_sections, Align, FlatList, VirtualRowEngine};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_flatten(c: &mut Criterion) {
    let sections = sample_sections(View::Skills, 100, 20);
    c.bench_function("flatten_100x20", |b| {
        b.iter(|| flatten_sections(black_box(&sections)))
    });

    let mut list = FlatList::new();
    list.update(&sections);
    c.bench_function("flat_list_unchanged_update", |b| {
        b.iter(|| list.update(black_box(&sections)))
    });
}

fn bench_window(c: &mut Criterion) {
    let sections = sample_sections(View::Library, 100, 20);
    let mut engine = VirtualRowEngine::new(View::Library, &VirtualizationConfig::default());
    engine.set_sections(&sections);
    engine.set_viewport_height(900);
    let total = engine.total_size();

    c.bench_function("scroll_and_window", |b| {
        let mut offset = 0;
        b.iter(|| {
            offset = (offset + 137) % total;
            engine.scroll_to(black_box(offset));
            engine.visible_rows().len()
        })
    });

    c.bench_function("scroll_to_item_center", |b| {
        let mut index = 0;
        let count = engine.rows().len();
        b.iter(|| {
            index = (index + 31) % count;
            engine.scroll_to_item(black_box(index), Align::Center)
        })
    });
}

criterion_group!(benches, bench_flatten, bench_window);
criterion_main!(benches);
