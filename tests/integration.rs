//! Integration tests for SURFACE-STATS

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use surface_stats::plot::{build_series, PlotError};
use surface_stats::stats::passes;
use surface_stats::{
    get_stats, Cell, Config, Grid, SeriesPlotter, StatValue, StatsCollector, StatsHistory,
    StatsPass, StatsRecord, Surface,
};

fn cell(gene: &str) -> Cell {
    Cell::new(gene.parse().unwrap())
}

fn float(stats: &StatsRecord, key: &str) -> f64 {
    stats.get(key).and_then(StatValue::as_f64).unwrap()
}

#[test]
fn test_random_surface_bounds() {
    let config = Config::default();
    let mut rng = ChaCha8Rng::seed_from_u64(12345);

    for _ in 0..20 {
        let grid = Grid::random(&config, &mut rng).unwrap();
        let stats = get_stats(&grid).unwrap();

        if grid.population() == 0 {
            continue;
        }

        let mean = float(&stats, passes::DEF_FRAC_MEAN);
        assert!((0.0..=100.0).contains(&mean));
        assert!(float(&stats, passes::DEF_FRAC_STDDEV) >= 0.0);

        let init = float(&stats, passes::INIT_MOVE_FRAC);
        assert!((0.0..=100.0).contains(&init));

        let rule_total: f64 = [
            passes::RULE_FRAC_TFTS,
            passes::RULE_FRAC_T2TS,
            passes::RULE_FRAC_FTFS,
            passes::RULE_FRAC_ALLD,
            passes::RULE_FRAC_ALLC,
        ]
        .iter()
        .map(|k| float(&stats, k))
        .sum();
        assert!(rule_total <= 100.0 + 1e-9);

        let length = float(&stats, passes::LENGTH_MEAN);
        assert!(length >= (config.genes.min_length - 1) as f64);
        assert!(length <= (config.genes.max_length - 1) as f64);
    }
}

#[test]
fn test_empty_surface_conventions() {
    let grid = Grid::new(4, 4).unwrap();
    let stats = get_stats(&grid).unwrap();

    for key in [
        passes::INIT_MOVE_FRAC,
        passes::LENGTH_MEAN,
        passes::LENGTH_STDDEV,
        passes::SCORES_MEAN,
        passes::SCORES_STDDEV,
        passes::AGE_MEAN,
        passes::AGE_STDDEV,
    ] {
        assert_eq!(stats.get(key), Some(StatValue::Null), "{}", key);
    }

    for key in [
        passes::DEF_FRAC_MEAN,
        passes::DEF_FRAC_STDDEV,
        passes::RULE_FRAC_TFTS,
        passes::RULE_FRAC_T2TS,
        passes::RULE_FRAC_FTFS,
        passes::RULE_FRAC_ALLD,
        passes::RULE_FRAC_ALLC,
    ] {
        assert_eq!(stats.get(key), Some(StatValue::Float(0.0)), "{}", key);
    }
}

#[test]
fn test_one_cell_per_archetype() {
    let grid = Grid::from_cells(
        5,
        1,
        ["ccd", "cccd", "ccdc", "cddd", "cccc"].into_iter().map(cell),
    )
    .unwrap();
    let stats = get_stats(&grid).unwrap();

    for key in [
        passes::RULE_FRAC_TFTS,
        passes::RULE_FRAC_T2TS,
        passes::RULE_FRAC_FTFS,
        passes::RULE_FRAC_ALLD,
        passes::RULE_FRAC_ALLC,
    ] {
        assert_eq!(float(&stats, key), 20.0, "{}", key);
    }
}

#[test]
fn test_population_pass_is_opt_in() {
    let mut grid = Grid::new(2, 2).unwrap();
    for (x, y) in [(0, 0), (1, 0), (0, 1)] {
        grid.place(x, y, cell("ccd").with_score(7.0)).unwrap();
    }

    let default = get_stats(&grid).unwrap();
    assert!(!default.contains_key(passes::POP_REL));
    assert_eq!(float(&default, passes::SCORES_STDDEV), 0.0);

    let full = StatsCollector::with_passes(&StatsPass::ALL)
        .collect(&grid)
        .unwrap();
    assert_eq!(full.get(passes::POP_REL), Some(StatValue::Float(75.0)));
    assert_eq!(full.get(passes::POP_ABS), Some(StatValue::Int(3)));
}

#[test]
fn test_snapshot_to_history_pipeline() {
    let mut config = Config::default();
    config.surface.width = 10;
    config.surface.height = 10;
    config.run.include_population_stats = true;

    let collector = StatsCollector::from_config(&config.run);
    let mut rng = ChaCha8Rng::seed_from_u64(777);
    let dir = std::env::temp_dir();
    let mut history = StatsHistory::new();

    for step in 0..3 {
        let path = dir.join(format!("surface_stats_pipeline_{}.json", step));
        Grid::random(&config, &mut rng).unwrap().save_json(&path).unwrap();

        let loaded = Grid::load_json(&path).unwrap();
        history.record(collector.collect(&loaded).unwrap());
        std::fs::remove_file(&path).ok();
    }

    let series = build_series(&history.records).unwrap();
    assert_eq!(series.len(), 16);
    assert!(series.windows(2).all(|w| w[0].name < w[1].name));
    assert!(series.iter().all(|s| s.points.len() == 3));

    let csv = history.to_csv();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("step,age_mean,age_stddev,def_frac_mean"));
}

#[test]
fn test_render_rejects_inconsistent_history() {
    let mut history = StatsHistory::new();
    history.record(get_stats(&Grid::new(2, 2).unwrap()).unwrap());
    history.record(
        StatsCollector::with_passes(&StatsPass::ALL)
            .collect(&Grid::new(2, 2).unwrap())
            .unwrap(),
    );

    let path = std::env::temp_dir().join("surface_stats_inconsistent.svg");
    std::fs::remove_file(&path).ok();

    let result = SeriesPlotter::default().render(&path, &history.records);
    assert!(matches!(result, Err(PlotError::KeyMismatch { step: 1, .. })));
    assert!(!path.exists());
}
