//! Host for the `wavegrid` binary: picks scenarios, paces each search with a
//! [`TickScheduler`], draws it in the terminal and reports the results.

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;

use wavegrid_crossterm::{CrosstermRenderer, HostKey};
use wavegrid_paths::{RunOutcome, RunStats, SchedulerConfig, SearchSession, TickScheduler};
use wavegrid_scenario::{ScatterConfig, ScatterGen, Scenario, ScenarioReport, ScenarioSet};

/// How long a paused host waits for a key between checks.
const PAUSED_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug, Clone)]
#[command(name = "wavegrid")]
#[command(about = "Bidirectional wavefront search on a square grid")]
pub struct Args {
    /// Cells per grid side for random and null scenarios
    #[arg(long, default_value_t = 40)]
    pub size: i32,

    /// Probability that a cell is obstructed
    #[arg(long, default_value_t = 0.5)]
    pub density: f64,

    /// Seed for the obstruction scatter (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Place the anchors at random instead of near opposite corners
    #[arg(long)]
    pub random_anchors: bool,

    /// Search an obstruction-free grid corner to corner
    #[arg(long, conflicts_with = "scenario")]
    pub null: bool,

    /// JSON file holding a list of recorded scenarios
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Which scenario of the file to run (default: the first)
    #[arg(long, requires = "scenario")]
    pub index: Option<usize>,

    /// Run every scenario of the file in turn
    #[arg(long, requires = "scenario", conflicts_with = "index")]
    pub all: bool,

    /// Run each search to completion with no frame budget
    #[arg(long)]
    pub blind: bool,

    /// Frames per second the scheduler paces batches to
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// Do not draw the grid
    #[arg(long)]
    pub no_render: bool,

    /// Print each scenario as JSON before running it
    #[arg(long)]
    pub dump: bool,
}

impl Args {
    /// Whether the terminal renderer will be used.
    pub fn renders(&self) -> bool {
        !self.no_render && !self.blind
    }

    /// The labelled scenarios these arguments select.
    pub fn scenarios(&self) -> Result<Vec<(String, Scenario)>, Box<dyn Error>> {
        if let Some(path) = &self.scenario {
            let set = ScenarioSet::load(path)?;
            if self.all {
                return Ok(set
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (ScenarioReport::indexed_label(i), s.clone()))
                    .collect());
            }
            let index = self.index.unwrap_or(0);
            let scenario = set.get(index)?.clone();
            return Ok(vec![(ScenarioReport::indexed_label(index), scenario)]);
        }
        if self.null {
            return Ok(vec![("Null test".to_owned(), Scenario::null(self.size))]);
        }
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("scatter seed {seed}");
        let config = ScatterConfig {
            density: self.density,
            corner_to_corner: !self.random_anchors,
        };
        let scenario =
            ScatterGen::with_config(config, StdRng::seed_from_u64(seed)).generate(self.size)?;
        Ok(vec![("Random test".to_owned(), scenario)])
    }

    fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::with_fps(self.fps)
    }
}

/// Run every selected scenario and return one report per completed search.
/// Quitting from the keyboard stops early with the reports so far.
pub fn run(args: &Args) -> Result<Vec<ScenarioReport>, Box<dyn Error>> {
    let scenarios = args.scenarios()?;
    if args.dump {
        for (_, scenario) in &scenarios {
            println!("{}", scenario.to_json()?);
        }
    }

    let mut renderer = if args.renders() {
        let mut r = CrosstermRenderer::stdout();
        r.init()?;
        Some(r)
    } else {
        None
    };

    let mut reports = Vec::with_capacity(scenarios.len());
    let count = scenarios.len();
    for (i, (label, scenario)) in scenarios.into_iter().enumerate() {
        let mut session = scenario.session()?;
        let mut scheduler = TickScheduler::new(args.scheduler_config());
        let stats = if args.blind {
            scheduler.run_blind(&mut session)
        } else if let Some(r) = renderer.as_mut() {
            match watch(&mut scheduler, &mut session, r)? {
                Some(stats) => stats,
                None => break,
            }
        } else {
            scheduler.run(&mut session, |_| {});
            scheduler.stats()
        };
        let report = ScenarioReport::new(label, session.state(), stats.inner, scenario.correct_length);
        if let Some(r) = renderer.as_mut() {
            let more = if i + 1 < count { "next" } else { "exit" };
            r.status(&format!("{report}  (any key: {more})"))?;
            r.flush()?;
            r.wait_key()?;
        }
        reports.push(report);
    }
    if let Some(mut r) = renderer {
        r.close();
    }
    Ok(reports)
}

/// Run one search on screen. Returns `None` if the user quit.
fn watch(
    scheduler: &mut TickScheduler,
    session: &mut SearchSession,
    renderer: &mut CrosstermRenderer,
) -> io::Result<Option<RunStats>> {
    renderer.draw_store(session.store())?;
    let pause = scheduler.pause_handle();
    let mut quit = false;
    let mut failure: Option<io::Error> = None;
    loop {
        let outcome = scheduler.run(session, |batch| {
            let drawn = batch
                .events
                .iter()
                .try_for_each(|ev| renderer.apply(ev))
                .and_then(|()| {
                    renderer.status(&format!(
                        "{} ticks per frame  (p: pause, q: quit)",
                        batch.next_batch_size
                    ))
                })
                .and_then(|()| renderer.flush())
                .and_then(|()| renderer.poll_key(Duration::ZERO));
            match drawn {
                Ok(Some(HostKey::TogglePause)) => pause.pause(),
                Ok(Some(HostKey::Quit)) => {
                    quit = true;
                    pause.pause();
                }
                Ok(None) => {}
                Err(e) => {
                    failure = Some(e);
                    pause.pause();
                }
            }
        });
        if let Some(e) = failure.take() {
            return Err(e);
        }
        if outcome == RunOutcome::Finished {
            return Ok(Some(scheduler.stats()));
        }
        if quit {
            return Ok(None);
        }
        renderer.status("paused  (p: resume, q: quit)")?;
        renderer.flush()?;
        loop {
            match renderer.poll_key(PAUSED_POLL)? {
                Some(HostKey::TogglePause) => break,
                Some(HostKey::Quit) => return Ok(None),
                None => {}
            }
        }
        pause.resume();
    }
}

/// The results table printed after all runs.
pub fn results_table(reports: &[ScenarioReport]) -> String {
    let mut out = format!("{:<14}{:>8}{:>12}{:>8}\n", "scenario", "cost", "inner", "expected");
    for r in reports {
        out.push_str(&r.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("wavegrid").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.size, 40);
        assert_eq!(args.density, 0.5);
        assert!(args.renders());
        assert!(!parse(&["--blind"]).unwrap().renders());
    }

    #[test]
    fn option_conflicts() {
        assert!(parse(&["--index", "2"]).is_err());
        assert!(parse(&["--all"]).is_err());
        assert!(parse(&["--null", "--scenario", "x.json"]).is_err());
        assert!(parse(&["--scenario", "x.json", "--all"]).is_ok());
    }

    #[test]
    fn seeded_scatter_is_reproducible() {
        let args = parse(&["--size", "16", "--seed", "99"]).unwrap();
        let a = args.scenarios().unwrap();
        let b = args.scenarios().unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].0, "Random test");
        assert_eq!(a[0].1.start, wavegrid_core::Point::new(2, 2));
    }

    #[test]
    fn null_run_without_rendering() {
        let args = parse(&["--null", "--size", "12", "--no-render"]).unwrap();
        let reports = run(&args).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].cost, Some(6 * 11));
        assert!(reports[0].matches_expected);
        let table = results_table(&reports);
        assert!(table.lines().nth(1).unwrap().starts_with("Null test"));
    }

    #[test]
    fn runs_every_scenario_of_a_file() {
        let set = ScenarioSet::new(vec![
            Scenario::null(5).with_correct_length(24),
            Scenario::null(6).with_correct_length(99),
        ]);
        let path = std::env::temp_dir().join(format!("wavegrid-set-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&set).unwrap()).unwrap();
        let args = parse(&["--scenario", path.to_str().unwrap(), "--all", "--blind"]).unwrap();
        let reports = run(&args);
        std::fs::remove_file(&path).ok();
        let reports = reports.unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].matches_expected);
        assert_eq!(reports[1].cost, Some(30));
        assert!(!reports[1].matches_expected);
        assert_eq!(reports[1].label, "Test 1");
    }

    #[test]
    fn bundled_scenarios_match_their_recorded_costs() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios.json");
        let args = parse(&["--scenario", path, "--all", "--no-render"]).unwrap();
        let reports = run(&args).unwrap();
        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|r| r.matches_expected), "{reports:#?}");
        assert_eq!(reports[2].cost, None);
    }
}
