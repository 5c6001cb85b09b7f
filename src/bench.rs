//! Timing whole tables of philosophers.

use std::fmt;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, ensure, Context};
use log::{debug, info};

use crate::config::Config;
use crate::dining::{Meals, Philosopher, Strategy};
use crate::sync::{fork::Fork, RawLock};

/// One line of benchmark output: `strategy,diners,seconds`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
    pub strategy: Strategy,
    pub diners: usize,
    pub elapsed: Duration,
}

impl ResultRecord {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.strategy, self.diners, self.seconds())
    }
}

/// Fastest possible finish: at most `diners / 2` of them can eat at the same time.
pub fn theoretical_minimum(diners: usize, full: Duration) -> Duration {
    assert!(diners >= 2, "a table needs at least 2 diners");
    full.mul_f64(diners as f64 / (diners / 2) as f64)
}

/// Runs one table of `diners` philosophers on [`Fork`]s until all of them are full.
pub fn run(strategy: Strategy, diners: usize, config: &Config) -> anyhow::Result<ResultRecord> {
    run_with(strategy, diners, config, Fork::new).map(|(record, _)| record)
}

/// Like [`run`], on locks built by `make_lock(seat)`. Also returns what each philosopher ate,
/// indexed by seat.
///
/// Philosopher `i` sits between locks `i` and `(i + 1) % diners`. Locks must report distinct ids.
pub fn run_with<L, F>(
    strategy: Strategy,
    diners: usize,
    config: &Config,
    make_lock: F,
) -> anyhow::Result<(ResultRecord, Vec<Meals>)>
where
    L: RawLock + Sync,
    F: FnMut(usize) -> L,
{
    config.validate()?;
    ensure!(diners >= 2, "a table needs at least 2 diners, got {diners}");
    let table = (0..diners).map(make_lock).collect::<Vec<_>>();
    let philosophers = (0..diners)
        .map(|i| Philosopher::new(i, &table[i], &table[(i + 1) % diners], strategy, config))
        .collect::<Vec<_>>();
    debug!("{strategy}: seated {diners} philosophers");

    let start = Instant::now();
    let meals = thread::scope(|s| -> anyhow::Result<Vec<Meals>> {
        let handles = philosophers
            .into_iter()
            .map(|p| {
                let seat = p.seat();
                thread::Builder::new()
                    .name(format!("philosopher-{seat}"))
                    .spawn_scoped(s, move || p.dine())
                    .with_context(|| format!("failed to seat philosopher {seat}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        // Join everyone before looking at results, so no panic is left for the scope to rethrow
        let joined = handles.into_iter().map(|h| h.join()).collect::<Vec<_>>();
        joined
            .into_iter()
            .enumerate()
            .map(|(seat, res)| res.map_err(|_| anyhow!("philosopher {seat} choked")))
            .collect()
    })?;
    let elapsed = start.elapsed();

    Ok((
        ResultRecord {
            strategy,
            diners,
            elapsed,
        },
        meals,
    ))
}

/// Runs every table size in `config.diners`, writing one record per run to `out` as soon as it
/// is known.
pub fn sweep<W: Write>(strategy: Strategy, config: &Config, out: &mut W) -> anyhow::Result<()> {
    config.validate()?;
    for diners in config.diners.clone() {
        let record = run(strategy, diners, config)?;
        writeln!(out, "{record}").context("failed to write result")?;
        out.flush().context("failed to flush result")?;
        info!(
            "{strategy} with {diners} diners: {:.3}s, theoretical minimum {:.3}s",
            record.seconds(),
            theoretical_minimum(diners, config.full).as_secs_f64()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::bench::{run, run_with, sweep, theoretical_minimum, ResultRecord};
    use crate::config::Config;
    use crate::dining::Strategy;
    use crate::sync::{audit::Audited, fork::Fork};
    use std::time::Duration;

    fn quick() -> Config {
        Config {
            diners: 2..=5,
            meal_ms: 1..=3,
            full: Duration::from_millis(20),
        }
    }

    #[test]
    fn record_format() {
        let record = ResultRecord {
            strategy: Strategy::Ordered,
            diners: 2,
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(record.to_string(), "Ordered,2,1.5");
    }

    #[test]
    fn minimum_follows_seats_that_can_eat() {
        let full = Duration::from_secs(10);
        assert_eq!(theoretical_minimum(2, full), Duration::from_secs(20));
        assert_eq!(theoretical_minimum(4, full), Duration::from_secs(20));
        assert_eq!(theoretical_minimum(5, full), Duration::from_secs(25));
    }

    #[test]
    fn rejects_lonely_table() {
        assert!(run(Strategy::Ordered, 1, &quick()).is_err());
    }

    #[test]
    fn rejects_meals_that_cannot_end() {
        let instant_meals = Config {
            meal_ms: 0..=10,
            ..quick()
        };
        let err = run(Strategy::Ordered, 2, &instant_meals).unwrap_err();
        assert!(err.to_string().contains("at least 1ms"));

        #[allow(clippy::reversed_empty_ranges)]
        let no_meals = Config {
            meal_ms: 5..=1,
            ..quick()
        };
        let err = run(Strategy::Ordered, 2, &no_meals).unwrap_err();
        assert!(err.to_string().contains("at least 1ms"));
    }

    #[test]
    fn everyone_eats_their_fill() {
        let config = quick();
        for strategy in [Strategy::SmartAndPolite, Strategy::Smart, Strategy::Ordered] {
            let (record, meals) =
                run_with(strategy, 5, &config, |i| Audited::new(Fork::new(i))).unwrap();
            assert_eq!(record.strategy, strategy);
            assert_eq!(record.diners, 5);
            assert_eq!(meals.len(), 5);
            assert!(meals.iter().all(|m| m.eaten == config.full));
            assert!(record.elapsed >= config.full);
        }
    }

    #[test]
    fn sweep_writes_one_line_per_table() {
        let config = quick();
        let mut out = Vec::new();
        sweep(Strategy::Ordered, &config, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        for (line, diners) in lines.iter().zip(2..) {
            let fields = line.split(',').collect::<Vec<_>>();
            assert_eq!(fields[0], "Ordered");
            assert_eq!(fields[1], diners.to_string());
            assert!(fields[2].parse::<f64>().unwrap() > 0.0);
        }
    }

    #[test]
    fn sweep_refuses_bad_config() {
        let config = Config {
            diners: 1..=3,
            ..quick()
        };
        let mut out = Vec::new();
        assert!(sweep(Strategy::Smart, &config, &mut out).is_err());
        assert!(out.is_empty());
    }
}
