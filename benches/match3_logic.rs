use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_match3::core::{Board, Config, Session, SimpleRng};
use tui_match3::engine::{possible_moves, Autoplayer};
use tui_match3::types::Mode;

fn seeded_board(mode: Mode) -> Board {
    let config = Config {
        mode,
        ..Config::default()
    };
    let mut board = Board::default();
    board.setup(&config, &mut SimpleRng::new(12345));
    board
}

fn bench_setup(c: &mut Criterion) {
    let config = Config::default();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("board_setup_9x7", |b| {
        b.iter(|| {
            let mut board = Board::default();
            board.setup(black_box(&config), &mut rng);
            board
        })
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let board = seeded_board(Mode::Normal);

    c.bench_function("find_matches_stable_board", |b| {
        b.iter(|| black_box(&board).find_matches())
    });

    // Worst case: every row is a run.
    let rows: Vec<String> = (0..9).map(|_| "DDDDDDD".to_string()).collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let full = Board::from_rows(&rows).unwrap();
    c.bench_function("find_matches_single_colour", |b| {
        b.iter(|| black_box(&full).find_matches())
    });
}

fn bench_possible_moves(c: &mut Criterion) {
    let board = seeded_board(Mode::Normal);

    c.bench_function("possible_moves_9x7", |b| {
        b.iter(|| possible_moves(black_box(&board)))
    });
}

fn bench_swap_cycle(c: &mut Criterion) {
    c.bench_function("autoplay_swap_cycle", |b| {
        let mut session = Session::new(12345);
        let mut player = Autoplayer::new();
        b.iter(|| {
            if !session.is_playing() || player.play(&mut session).is_err() {
                let _ = session.setup(Config::default());
                session.start();
            }
        })
    });
}

fn bench_frame_update(c: &mut Criterion) {
    let mut session = Session::new(12345);
    let _ = session.setup(Config {
        duration: u32::MAX,
        ..Config::default()
    });
    session.start();

    c.bench_function("session_update_16ms", |b| {
        b.iter(|| session.update(black_box(16)))
    });
}

criterion_group!(
    benches,
    bench_setup,
    bench_find_matches,
    bench_possible_moves,
    bench_swap_cycle,
    bench_frame_update
);
criterion_main!(benches);
