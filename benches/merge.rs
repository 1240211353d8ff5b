//! Benchmarks for per-frame grid queries: merge resolution over the visible
//! window, hit testing and keyboard navigation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gridcore::{
    AllowMerging, CellRange, CellType, Grid, GridOptions, HitTester, SelMove, SelectionEngine,
    TableSource,
};

/// Grid of `rows` x 20 where every column repeats its value in runs of five
/// rows and every row allows merging.
fn build_grid(rows: usize) -> Grid {
    let options = GridOptions {
        allow_merging: AllowMerging::All,
        ..GridOptions::default()
    };
    let mut grid = Grid::with_size(options, rows, 20);
    grid.viewport.resize(1600.0, 900.0);
    grid.rows.set_frozen(2);
    grid.columns.set_frozen(1);
    for c in 0..20 {
        grid.columns.edit(c, |col| col.allow_merging = c % 2 == 0);
    }
    grid.set_data_source(TableSource::from_rows((0..rows).map(|r| {
        (0..20)
            .map(move |c| format!("{}-{}", c, r / 5))
            .collect::<Vec<_>>()
    })));
    grid
}

/// Resolve the merge of every visible cell, as a renderer does per frame
fn bench_visible_merges(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_merges");

    for rows in [1_000usize, 100_000] {
        let mut grid = build_grid(rows);
        grid.viewport.scroll_y = grid.rows.total_size() / 2.0;
        let window = grid.view_range();
        let cells = window.row_span() * window.column_span();
        group.throughput(Throughput::Elements(u64::try_from(cells).unwrap_or(0)));

        group.bench_with_input(BenchmarkId::from_parameter(rows), &grid, |b, grid| {
            b.iter(|| {
                let mut merged = 0usize;
                for r in window.top_row()..=window.bottom_row() {
                    for c in window.left_col()..=window.right_col() {
                        let (Ok(r), Ok(c)) = (usize::try_from(r), usize::try_from(c)) else {
                            continue;
                        };
                        if grid.merged_range(CellType::Cell, r, c, true).is_some() {
                            merged += 1;
                        }
                    }
                }
                black_box(merged)
            })
        });
    }

    group.finish();
}

/// Hit test a diagonal sweep of pointer positions
fn bench_hit_test(c: &mut Criterion) {
    let mut grid = build_grid(100_000);
    grid.viewport.scroll_y = 1_000_000.0;
    let tester = HitTester::new(&grid).expect("well-formed viewport");

    c.bench_function("hit_test_sweep", |b| {
        b.iter(|| {
            for i in 0..100 {
                let p = i as f32 * 9.0;
                black_box(tester.hit_test(black_box(p * 1.6), black_box(p)).expect("finite point"));
            }
        })
    });
}

/// Page through a tall grid with the selection engine
fn bench_page_down(c: &mut Criterion) {
    c.bench_function("page_down_100k", |b| {
        b.iter_batched(
            || {
                let mut grid = build_grid(100_000);
                let mut selection = SelectionEngine::from_options(&grid.options);
                selection.select(&mut grid, CellRange::cell(0, 0), false);
                (grid, selection)
            },
            |(mut grid, mut selection)| {
                for _ in 0..50 {
                    selection.move_selection(&mut grid, SelMove::NextPage, SelMove::None, false);
                }
                black_box(selection.selection())
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_visible_merges, bench_hit_test, bench_page_down);
criterion_main!(benches);
