use std::{env, process};

use anyhow::{Context, bail};
use log::info;
use softmax_loss::{
    Dims, SoftmaxProblem, Strategy,
    gradcheck::{DEFAULT_STEP, grad_check_sparse},
};

const USAGE: &str = "\
Usage:
  softmax-loss random <N> <D> <C> <reg> <out.json>
  softmax-loss eval <problem.json> [naive|vectorized]
  softmax-loss gradcheck <problem.json> [num_checks]";

const DEFAULT_NUM_CHECKS: usize = 10;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str) {
        Some("random") => random(&args[1..]),
        Some("eval") => eval(&args[1..]),
        Some("gradcheck") => gradcheck(&args[1..]),
        _ => bail!("{USAGE}"),
    }
}

fn parse<T>(arg: Option<&String>, name: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = arg.with_context(|| format!("missing <{name}>\n{USAGE}"))?;
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("invalid <{name}> {raw:?}: {e}"))
}

fn random(args: &[String]) -> anyhow::Result<()> {
    let dims = Dims {
        num_train: parse(args.first(), "N")?,
        dim: parse(args.get(1), "D")?,
        num_classes: parse(args.get(2), "C")?,
    };
    let reg: f64 = parse(args.get(3), "reg")?;
    let out: String = parse(args.get(4), "out.json")?;

    let problem = SoftmaxProblem::random(dims, reg, &mut rand::thread_rng())?;
    problem
        .save_json(&out)
        .with_context(|| format!("writing {out}"))?;

    println!("wrote {out}");
    Ok(())
}

fn load(args: &[String]) -> anyhow::Result<SoftmaxProblem> {
    let path: String = parse(args.first(), "problem.json")?;
    SoftmaxProblem::load_json(&path).with_context(|| format!("reading {path}"))
}

fn eval(args: &[String]) -> anyhow::Result<()> {
    let problem = load(args)?;

    if let Some(raw) = args.get(1) {
        let strategy: Strategy = parse(Some(raw), "strategy")?;
        let (loss, dw) = problem.evaluate(strategy)?;
        println!("{strategy:?} loss: {loss:.10}");
        println!("{strategy:?} gradient norm: {:.10}", dw.sum_squares().sqrt());
        return Ok(());
    }

    let (naive_loss, naive_dw) = problem.evaluate(Strategy::Naive)?;
    let (vec_loss, vec_dw) = problem.evaluate(Strategy::Vectorized)?;

    println!("naive loss:      {naive_loss:.10}");
    println!("vectorized loss: {vec_loss:.10}");
    println!("loss difference: {:e}", (naive_loss - vec_loss).abs());
    println!(
        "max gradient difference: {:e}",
        naive_dw.max_abs_diff(&vec_dw)?
    );

    Ok(())
}

fn gradcheck(args: &[String]) -> anyhow::Result<()> {
    let problem = load(args)?;
    let num_checks = match args.get(1) {
        Some(raw) => parse(Some(raw), "num_checks")?,
        None => DEFAULT_NUM_CHECKS,
    };

    let (_, analytic) = problem.evaluate(Strategy::Vectorized)?;
    info!("checking {num_checks} gradient entries");

    let checks = grad_check_sparse(
        |w| problem.loss_at(w, Strategy::Vectorized),
        &problem.weights,
        &analytic,
        num_checks,
        DEFAULT_STEP,
        &mut rand::thread_rng(),
    )?;

    for c in &checks {
        println!(
            "[{}, {}] numerical: {:.6e} analytic: {:.6e}, relative error: {:.3e}",
            c.row, c.col, c.numerical, c.analytic, c.rel_error
        );
    }

    let worst = checks.iter().map(|c| c.rel_error).fold(0.0, f64::max);
    println!("worst relative error: {worst:.3e}");

    Ok(())
}
