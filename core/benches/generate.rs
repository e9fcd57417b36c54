use cardmatch_core::*;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for (name, config) in [
        ("pair_match_4x4", GameConfig::pair_match()),
        ("target_hunt_4x4", GameConfig::target_hunt()),
        (
            "target_hunt_16x16",
            GameConfig::new((16, 16), GameMode::TargetHunt, Palette::fruits()),
        ),
    ] {
        group.bench_function(name, |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                RandomBoardGenerator::new(black_box(seed)).generate(black_box(&config))
            })
        });
    }

    group.finish();
}

fn bench_pair_turns(c: &mut Criterion) {
    c.bench_function("pair_match_full_sweep", |b| {
        b.iter(|| {
            let mut engine = BoardEngine::new(black_box(9), &GameConfig::pair_match()).unwrap();
            let (rows, cols) = engine.state().size();
            for first in iter_coords((rows, cols)) {
                for second in iter_coords((rows, cols)) {
                    if let Ok(result) = engine.select_cell(first) {
                        black_box(&result);
                    }
                    if let Some(reset) = engine
                        .select_cell(second)
                        .ok()
                        .and_then(|result| result.reset_ticket().cloned())
                    {
                        engine.complete_reset(&reset);
                    }
                }
            }
            engine.is_game_over()
        })
    });
}

criterion_group!(benches, bench_generate, bench_pair_turns);
criterion_main!(benches);
