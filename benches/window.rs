//! Window drawing and refresh benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ansi_ui::core::{Color, DisplayAtom, DisplayCoord, Face, Window};

fn sample_atoms() -> Vec<DisplayAtom> {
    vec![
        DisplayAtom::new("fn ", Face::new(Color::MAGENTA, Color::Default)),
        DisplayAtom::new("render", Face::new(Color::CYAN, Color::Default)),
        DisplayAtom::plain("(frame: &mut Frame, "),
        DisplayAtom::new("\"日本語のテキスト\"", Face::new(Color::GREEN, Color::Default)),
        DisplayAtom::plain(") {\n"),
    ]
}

fn bench_window_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    let atoms = sample_atoms();

    group.bench_function("draw_full_screen", |b| {
        let mut window = Window::new();
        window.create(DisplayCoord::default(), DisplayCoord::new(50, 200));
        b.iter(|| {
            for line in 0..50 {
                window.move_cursor(DisplayCoord::line(line));
                window.draw(black_box(&atoms), Face::default());
            }
        })
    });

    group.finish();
}

fn bench_window_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    let atoms = sample_atoms();

    let mut window = Window::new();
    window.create(DisplayCoord::default(), DisplayCoord::new(50, 200));
    for line in 0..50 {
        window.move_cursor(DisplayCoord::line(line));
        window.draw(&atoms, Face::default());
    }

    group.bench_function("refresh_full_screen", |b| {
        let mut out = Vec::with_capacity(64 * 1024);
        b.iter(|| {
            out.clear();
            window.refresh(&mut out);
            black_box(out.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_window_draw, bench_window_refresh);
criterion_main!(benches);
