criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        computing_fingerprint,
        querying_strategy_cache,
        blending_and_sampling,
        deciding_end_to_end,
}

fn computing_fingerprint(c: &mut criterion::Criterion) {
    let state = GameState::random();
    c.bench_function("fingerprint a GameState", |b| {
        b.iter(|| Fingerprint::from(&state))
    });
}

fn querying_strategy_cache(c: &mut criterion::Criterion) {
    let states = (0..4096).map(|_| GameState::random()).collect::<Vec<_>>();
    let strategies = strategies(&states);
    let probe = &states[states.len() / 2];
    c.bench_function("lookup a GameState in a 4096-entry cache", |b| {
        b.iter(|| strategies.lookup(probe))
    });
}

fn blending_and_sampling(c: &mut criterion::Criterion) {
    let state = GameState::random();
    let opinions = opinions();
    let blend = Blend::default();
    c.bench_function("blend 3 opinions and sample", |b| {
        b.iter(|| {
            blend
                .consensus(&opinions, state.legal())
                .and_then(|p| p.sample(stable_hash(state.hand_id())))
        })
    });
}

fn deciding_end_to_end(c: &mut criterion::Criterion) {
    let state = GameState::random();
    let opinions = opinions();
    let engine = Engine::default();
    let mut gate = Gate::default();
    c.bench_function("decide with 3 opinions and no cache", |b| {
        b.iter(|| engine.decide(Request::new(&state, "S-bench").opinions(&opinions), &mut gate))
    });
}

fn strategies(states: &[GameState]) -> Strategies {
    let manifest = Manifest::new(&Expectation::default(), Street::all().to_vec(), "bench");
    let entries = states.iter().map(|state| {
        let record = StrategyRecord {
            version: String::from(CACHE_FORMAT_VERSION),
            fingerprint: Fingerprint::from(state),
            exploitability: 0.05,
            compute_time_ms: 0,
            actions: vec![Stored {
                action: String::from("call"),
                amount_bb: None,
                seat: Some(state.hero()),
                stats: Stats {
                    frequency: 1.,
                    ..Stats::default()
                },
            }],
        };
        Entry::new(record, state.street())
    });
    Strategies::build(manifest, entries)
}

fn opinions() -> Vec<Opinion> {
    let choice = |s: &str| Choice::try_from(s).expect("valid choice");
    vec![
        Opinion::new("a", 0.9, Distribution::from(vec![(choice("CALL"), 0.6), (choice("FOLD"), 0.4)])),
        Opinion::new("b", 0.5, Distribution::from(vec![(choice("RAISE 800"), 1.0)])),
        Opinion::new("c", 0.3, Distribution::from(vec![(choice("ALLIN"), 0.2), (choice("CALL"), 0.8)])),
    ]
}

use tablepilot::cache::*;
use tablepilot::core::*;
use tablepilot::engine::*;
use tablepilot::fingerprint::*;
use tablepilot::risk::*;
use tablepilot::state::*;
