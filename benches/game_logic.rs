use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{Board, GameLogic, LogicConfig, PieceGenerator, RenderSnapshot};
use blockfall::engine::{EngineConfig, GameEngine};
use blockfall::types::{ColorTag, Direction};

const STEP: Duration = Duration::from_millis(16);
const FALL: Duration = Duration::from_millis(1000);

fn started() -> GameLogic {
    let mut logic = GameLogic::new(LogicConfig::seeded(12345));
    logic.start();
    logic
}

fn bench_update(c: &mut Criterion) {
    let mut logic = started();

    c.bench_function("logic_update_16ms", |b| {
        b.iter(|| {
            if logic.is_game_over() {
                logic.restart();
            }
            logic.update(black_box(STEP), FALL);
            logic.drain_events();
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("remove_4_rows", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(ColorTag(0x00ffff)));
                }
            }
            let rows = board.full_rows();
            board.remove_rows(black_box(&rows))
        })
    });
}

fn bench_next_piece(c: &mut Criterion) {
    let mut generator = PieceGenerator::with_seed(12345, 10);

    c.bench_function("next_piece", |b| b.iter(|| generator.get_next_piece()));
}

fn bench_move(c: &mut Criterion) {
    let mut logic = started();

    c.bench_function("move_piece", |b| {
        b.iter(|| {
            logic.move_piece(Direction::Left);
            logic.move_piece(Direction::Right);
            logic.drain_events();
        })
    });
}

fn bench_rotate(c: &mut Criterion) {
    let mut logic = started();

    c.bench_function("rotate_piece", |b| {
        b.iter(|| {
            logic.rotate_piece(true);
            logic.drain_events();
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let logic = started();
    let mut snapshot = RenderSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| logic.snapshot_into(black_box(&mut snapshot), 3))
    });
}

fn bench_engine_frame(c: &mut Criterion) {
    let mut engine = GameEngine::new(LogicConfig::seeded(12345), EngineConfig::default());
    engine.start();
    let frame = Duration::from_secs(1) / 60;
    let mut now = Duration::ZERO;

    c.bench_function("engine_frame_60hz", |b| {
        b.iter(|| {
            if !engine.frame(now) {
                engine.restart();
            }
            now += frame;
        })
    });
}

criterion_group!(
    benches,
    bench_update,
    bench_line_clear,
    bench_next_piece,
    bench_move,
    bench_rotate,
    bench_snapshot,
    bench_engine_frame
);
criterion_main!(benches);
